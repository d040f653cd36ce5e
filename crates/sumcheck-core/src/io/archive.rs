//! Archive enumeration module
//!
//! Exposes zip, tar, tar.gz and tar.zst containers as [`EntrySource`]s so the
//! manifest verifier can hash each entry as a stream.

use std::fs::File;
use std::io::{self, BufReader, Read, Seek};
use std::path::Path;

use flate2::read::GzDecoder;
use sumcheck_schema::{Manifest, VerificationReport};
use zip::ZipArchive;
use zstd::stream::Decoder as ZstdDecoder;

use crate::digest::digest_reader;
use crate::entry::{ArchiveError, Entry, EntrySource};
use crate::manifest::verify_all;
use crate::Reporter;

/// Number of leading bytes inspected when the file name gives no hint.
const SNIFF_LEN: u64 = 512;

/// Container formats that can be verified against a manifest.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArchiveFormat {
    /// Zip archive (`.zip`, `.jar`).
    Zip,
    /// Uncompressed tar archive (`.tar`).
    Tar,
    /// Gzip-compressed tar archive (`.tar.gz` / `.tgz`).
    TarGz,
    /// Zstandard-compressed tar archive (`.tar.zst` / `.tzst`).
    TarZst,
}

impl ArchiveFormat {
    /// Guess the format from the file name.
    pub fn from_path(path: &Path) -> Option<Self> {
        let name = path.file_name()?.to_string_lossy().to_ascii_lowercase();
        if name.ends_with(".zip") || name.ends_with(".jar") {
            Some(Self::Zip)
        } else if name.ends_with(".tar.gz") || name.ends_with(".tgz") {
            Some(Self::TarGz)
        } else if name.ends_with(".tar.zst") || name.ends_with(".tzst") {
            Some(Self::TarZst)
        } else if name.ends_with(".tar") {
            Some(Self::Tar)
        } else {
            None
        }
    }

    /// Guess the format from the first bytes of the file.
    pub fn sniff(header: &[u8]) -> Option<Self> {
        if header.starts_with(b"PK\x03\x04") || header.starts_with(b"PK\x05\x06") {
            Some(Self::Zip)
        } else if header.starts_with(&[0x1f, 0x8b]) {
            Some(Self::TarGz)
        } else if header.starts_with(&[0x28, 0xB5, 0x2F, 0xFD]) {
            Some(Self::TarZst)
        } else if header.get(257..262) == Some(b"ustar".as_slice()) {
            Some(Self::Tar)
        } else {
            None
        }
    }
}

/// Zip entries in central-directory order.
pub struct ZipSource<R: Read + Seek> {
    archive: ZipArchive<R>,
    index: usize,
}

impl<R: Read + Seek> ZipSource<R> {
    pub fn new(reader: R) -> Result<Self, ArchiveError> {
        let archive =
            ZipArchive::new(reader).map_err(|e| ArchiveError::Corrupted(e.to_string()))?;
        Ok(Self { archive, index: 0 })
    }
}

impl<R: Read + Seek> EntrySource for ZipSource<R> {
    fn next_entry(&mut self) -> Option<Result<Entry<'_>, ArchiveError>> {
        let (index, name) = loop {
            if self.index >= self.archive.len() {
                return None;
            }
            let index = self.index;
            self.index += 1;

            match self.archive.name_for_index(index) {
                // Directories have no content to hash
                Some(name) if name.ends_with('/') => {}
                Some(name) => break (index, name.to_string()),
                None => {
                    return Some(Err(ArchiveError::Corrupted(format!(
                        "no central directory record for entry {index}"
                    ))));
                }
            }
        };

        // An entry that cannot be opened (unsupported method, encryption) only
        // fails itself: hand out a reader that reports the error.
        let reader: Box<dyn Read + '_> = match self.archive.by_index(index) {
            Ok(file) => Box::new(file),
            Err(e) => Box::new(FailedEntry::new(io::Error::other(e.to_string()))),
        };

        Some(Ok(Entry { name, reader }))
    }
}

/// Tar entries in stream order. Only regular files are yielded.
pub struct TarSource<'a, R: 'a + Read> {
    entries: tar::Entries<'a, R>,
}

impl<'a, R: Read> TarSource<'a, R> {
    pub fn new(archive: &'a mut tar::Archive<R>) -> Result<Self, ArchiveError> {
        Ok(Self {
            entries: archive.entries()?,
        })
    }
}

impl<R: Read> EntrySource for TarSource<'_, R> {
    fn next_entry(&mut self) -> Option<Result<Entry<'_>, ArchiveError>> {
        loop {
            let entry = match self.entries.next()? {
                Ok(entry) => entry,
                Err(e) => return Some(Err(ArchiveError::Io(e))),
            };

            if !entry.header().entry_type().is_file() {
                continue;
            }

            let raw = String::from_utf8_lossy(&entry.path_bytes()).into_owned();
            let name = raw.strip_prefix("./").map(str::to_string).unwrap_or(raw);

            return Some(Ok(Entry {
                name,
                reader: Box::new(entry),
            }));
        }
    }
}

/// Reader standing in for an entry that could not be opened.
struct FailedEntry {
    error: Option<io::Error>,
}

impl FailedEntry {
    fn new(error: io::Error) -> Self {
        Self { error: Some(error) }
    }
}

impl Read for FailedEntry {
    fn read(&mut self, _: &mut [u8]) -> io::Result<usize> {
        Err(self
            .error
            .take()
            .unwrap_or_else(|| io::Error::other("entry could not be opened")))
    }
}

fn open(path: &Path) -> Result<File, ArchiveError> {
    File::open(path).map_err(|source| ArchiveError::Open {
        path: path.to_path_buf(),
        source,
    })
}

/// Determine the format of an open archive, leaving the file at offset 0.
fn detect(path: &Path, file: &mut File) -> Result<ArchiveFormat, ArchiveError> {
    if let Some(format) = ArchiveFormat::from_path(path) {
        return Ok(format);
    }

    let mut header = Vec::with_capacity(SNIFF_LEN as usize);
    file.by_ref().take(SNIFF_LEN).read_to_end(&mut header)?;
    file.rewind()?;

    ArchiveFormat::sniff(&header)
        .ok_or_else(|| ArchiveError::UnsupportedFormat(path.display().to_string()))
}

/// Run `f` over the entries of the archive at `path`.
fn with_entries<T>(
    path: &Path,
    f: impl FnOnce(&mut dyn EntrySource) -> Result<T, ArchiveError>,
) -> Result<T, ArchiveError> {
    let mut file = open(path)?;
    let format = detect(path, &mut file)?;
    tracing::debug!(path = %path.display(), ?format, "opened archive");

    match format {
        ArchiveFormat::Zip => f(&mut ZipSource::new(BufReader::new(file))?),
        ArchiveFormat::Tar => {
            let mut archive = tar::Archive::new(BufReader::new(file));
            f(&mut TarSource::new(&mut archive)?)
        }
        ArchiveFormat::TarGz => {
            let mut archive = tar::Archive::new(GzDecoder::new(BufReader::new(file)));
            f(&mut TarSource::new(&mut archive)?)
        }
        ArchiveFormat::TarZst => {
            let mut archive = tar::Archive::new(ZstdDecoder::new(file)?);
            f(&mut TarSource::new(&mut archive)?)
        }
    }
}

/// Verify every entry of the archive at `path` against `manifest`.
///
/// # Errors
///
/// Returns [`ArchiveError::Open`] if the file cannot be opened,
/// [`ArchiveError::UnsupportedFormat`] if its format is not recognised, and any
/// container-level error raised while enumerating entries.
pub fn verify_archive<P: Reporter + ?Sized>(
    path: &Path,
    manifest: &Manifest,
    reporter: &P,
) -> Result<VerificationReport, ArchiveError> {
    with_entries(path, |source| verify_all(source, manifest, reporter))
}

/// Hash every entry of the archive at `path` into a new manifest.
///
/// When a name occurs more than once, the first occurrence is kept, matching
/// which entry [`verify_archive`] would check.
///
/// # Errors
///
/// Fails on the same container errors as [`verify_archive`], and on any read
/// error inside an entry.
pub fn manifest_for_archive(path: &Path) -> Result<Manifest, ArchiveError> {
    with_entries(path, |source| {
        let mut manifest = Manifest::new();
        while let Some(entry) = source.next_entry() {
            let Entry { name, reader } = entry?;
            if manifest.get(&name).is_some() {
                continue;
            }
            let digested = digest_reader(reader)?;
            manifest.insert(name, digested.digest);
        }
        Ok(manifest)
    })
}
