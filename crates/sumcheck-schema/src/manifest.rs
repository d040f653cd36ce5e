//! Expected-digest manifests.
//!
//! A manifest is a flat properties-style text file with one `name=hexdigest`
//! entry per line:
//!
//! ```text
//! # digests for release 1.4.2
//! bin/tool=b94d27b9934d3e08a52e52d7da7dabfac484efe37a5380ee9088f7ace2efcde9
//! share/doc/README\=1.txt : 9f86d081884c7d659a2feaa0c55ad015a3bf4f1b2b0b822cd15d6c15b0f00a08
//! ```
//!
//! Lines starting with `#` or `!` are comments. The name ends at the first
//! unescaped `=`, `:` or blank. Names may use the `\t`, `\n`, `\r`, `\f` and
//! `\uXXXX` escapes of Java properties files, and a trailing backslash
//! continues an entry on the next line. Duplicate names overwrite earlier ones.

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

use crate::hash::{DigestError, Sha256Digest};

/// Errors that can occur while loading or parsing a [`Manifest`].
#[derive(thiserror::Error, Debug)]
pub enum ManifestError {
    /// The manifest file could not be read.
    #[error("Failed to read manifest {}: {source}", path.display())]
    Io {
        /// Path of the manifest file.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// A line is not a comment and not a `name=digest` entry.
    #[error("Manifest line {line}: {reason}")]
    Syntax {
        /// 1-based line number.
        line: usize,
        /// What was wrong with the line.
        reason: &'static str,
    },

    /// The digest value of an entry is not a valid SHA256 hex string.
    #[error("Manifest line {line}: invalid digest for '{name}': {source}")]
    InvalidDigest {
        /// 1-based line number.
        line: usize,
        /// Entry name on that line.
        name: String,
        /// Why the digest was rejected.
        #[source]
        source: DigestError,
    },
}

/// A checklist mapping item names to their expected digests.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Manifest {
    entries: BTreeMap<String, Sha256Digest>,
}

impl Manifest {
    /// Create an empty manifest.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse manifest text.
    ///
    /// A line ending in an odd number of backslashes continues on the next
    /// line, whose leading blanks are dropped. Line numbers in errors refer to
    /// the first line of the entry.
    ///
    /// # Errors
    ///
    /// Returns [`ManifestError::Syntax`] for a line without a separator, with an
    /// empty name or with a malformed `\uXXXX` escape, and
    /// [`ManifestError::InvalidDigest`] for a malformed digest.
    pub fn parse(input: &str) -> Result<Self, ManifestError> {
        let mut manifest = Self::new();
        let mut lines = input.lines().enumerate();

        while let Some((idx, raw)) = lines.next() {
            let line = idx + 1;
            let trimmed = raw.trim_start_matches(is_blank);
            if trimmed.is_empty() || trimmed.starts_with('#') || trimmed.starts_with('!') {
                continue;
            }

            let mut logical = String::new();
            let mut part = trimmed;
            while let Some(head) = continued(part) {
                logical.push_str(head);
                match lines.next() {
                    Some((_, next)) => part = next.trim_start_matches(is_blank),
                    None => {
                        part = "";
                        break;
                    }
                }
            }
            logical.push_str(part);

            let syntax = |reason| ManifestError::Syntax { line, reason };
            let (name, value) = split_entry(&logical).map_err(syntax)?;
            if name.is_empty() {
                return Err(syntax("entry name is empty"));
            }

            let digest = Sha256Digest::new(&value).map_err(|source| {
                ManifestError::InvalidDigest {
                    line,
                    name: name.clone(),
                    source,
                }
            })?;

            if let Some(previous) = manifest.insert(name.clone(), digest) {
                tracing::warn!(line, %name, %previous, "duplicate manifest entry overwrites earlier value");
            }
        }

        Ok(manifest)
    }

    /// Read and parse a manifest file.
    ///
    /// # Errors
    ///
    /// Returns [`ManifestError::Io`] if the file cannot be read, or any error
    /// produced by [`Manifest::parse`].
    pub fn load(path: &Path) -> Result<Self, ManifestError> {
        let content = std::fs::read_to_string(path).map_err(|source| ManifestError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&content)
    }

    /// Insert an entry, returning the digest it replaced.
    pub fn insert(&mut self, name: impl Into<String>, digest: Sha256Digest) -> Option<Sha256Digest> {
        self.entries.insert(name.into(), digest)
    }

    /// Look up the expected digest for `name`.
    pub fn get(&self, name: &str) -> Option<&Sha256Digest> {
        self.entries.get(name)
    }

    /// Remove `name`, returning its expected digest.
    pub fn remove(&mut self, name: &str) -> Option<Sha256Digest> {
        self.entries.remove(name)
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the manifest has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entry names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Entries in sorted name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Sha256Digest)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl FromIterator<(String, Sha256Digest)> for Manifest {
    fn from_iter<I: IntoIterator<Item = (String, Sha256Digest)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for Manifest {
    type Item = (String, Sha256Digest);
    type IntoIter = std::collections::btree_map::IntoIter<String, Sha256Digest>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl fmt::Display for Manifest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (name, digest) in &self.entries {
            writeln!(f, "{}={digest}", escape_name(name))?;
        }
        Ok(())
    }
}

/// Blank characters that separate tokens on a manifest line.
fn is_blank(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\x0c')
}

/// The line without its continuation backslash, if it has one.
fn continued(line: &str) -> Option<&str> {
    let trailing = line.len() - line.trim_end_matches('\\').len();
    (trailing % 2 == 1).then(|| &line[..line.len() - 1])
}

/// Decode escapes, keeping track of which characters were escaped.
fn unescape(line: &str) -> Result<Vec<(char, bool)>, &'static str> {
    const BAD_UNICODE: &str = "malformed \\uXXXX escape";

    let mut out = Vec::with_capacity(line.len());
    let mut chars = line.chars();
    let mut units = Vec::new();

    while let Some(c) = chars.next() {
        if c != '\\' {
            if !units.is_empty() {
                return Err(BAD_UNICODE);
            }
            out.push((c, false));
            continue;
        }
        let Some(e) = chars.next() else {
            break;
        };
        let decoded = match e {
            't' => '\t',
            'n' => '\n',
            'r' => '\r',
            'f' => '\x0c',
            'u' => {
                let hex: String = chars.by_ref().take(4).collect();
                if hex.len() != 4 || !hex.chars().all(|h| h.is_ascii_hexdigit()) {
                    return Err(BAD_UNICODE);
                }
                let unit = u16::from_str_radix(&hex, 16).map_err(|_| BAD_UNICODE)?;
                units.push(unit);
                // A high surrogate needs its low half from the next escape
                if (0xD800..0xDC00).contains(&unit) {
                    continue;
                }
                let decoded = char::decode_utf16(units.drain(..))
                    .collect::<Result<String, _>>()
                    .map_err(|_| BAD_UNICODE)?;
                out.extend(decoded.chars().map(|c| (c, true)));
                continue;
            }
            other => other,
        };
        if !units.is_empty() {
            return Err(BAD_UNICODE);
        }
        out.push((decoded, true));
    }

    if units.is_empty() {
        Ok(out)
    } else {
        Err(BAD_UNICODE)
    }
}

/// Split a logical line into its unescaped name and digest text.
///
/// The name ends at the first unescaped `=`, `:` or blank. Blanks around the
/// separator are skipped, and a blank may itself be the separator.
fn split_entry(line: &str) -> Result<(String, String), &'static str> {
    let chars = unescape(line)?;
    let is_sep = |&(c, escaped): &(char, bool)| !escaped && (c == '=' || c == ':' || is_blank(c));
    let is_gap = |&(c, escaped): &(char, bool)| !escaped && is_blank(c);

    let Some(end) = chars.iter().position(is_sep) else {
        return Err("expected 'name=digest'");
    };
    let name = chars[..end].iter().map(|&(c, _)| c).collect();

    let mut rest = &chars[end..];
    while rest.first().is_some_and(is_gap) {
        rest = &rest[1..];
    }
    if matches!(rest.first(), Some(&('=' | ':', false))) {
        rest = &rest[1..];
    }
    while rest.first().is_some_and(is_gap) {
        rest = &rest[1..];
    }

    Ok((name, rest.iter().map(|&(c, _)| c).collect()))
}

fn escape_name(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    for c in name.chars() {
        match c {
            '\t' => out.push_str("\\t"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\x0c' => out.push_str("\\f"),
            '\\' | '=' | ':' | ' ' | '#' | '!' => {
                out.push('\\');
                out.push(c);
            }
            c if c.is_control() => {
                let mut units = [0u16; 2];
                for unit in c.encode_utf16(&mut units) {
                    out.push_str(&format!("\\u{unit:04X}"));
                }
            }
            c => out.push(c),
        }
    }
    out
}
