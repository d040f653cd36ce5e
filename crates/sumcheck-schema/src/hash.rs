//! SHA256 digest newtype.

use serde::{Deserialize, Deserializer, Serialize};
use sha2::{Digest, Sha256};
use std::str::FromStr;

/// Number of hex characters in a rendered SHA-256 digest.
pub const SHA256_HEX_LEN: usize = 64;

/// Errors produced when parsing a hex digest supplied by a caller.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum DigestError {
    /// The hex portion is not exactly 64 characters long.
    #[error("Invalid SHA256 digest: expected 64 hex characters, got {len} in '{input}'")]
    InvalidLength {
        /// The rejected input, as supplied.
        input: String,
        /// Length of the hex portion after stripping prefix and whitespace.
        len: usize,
    },

    /// The hex portion contains a character outside `[0-9a-fA-F]`.
    #[error("Invalid SHA256 digest: contains non-hex characters in '{0}'")]
    NonHex(String),
}

/// A validated SHA256 digest (64 lowercase hex characters).
///
/// Both computed digests and caller-supplied expected digests use this type, so
/// every comparison happens between canonical lowercase renderings. Input is
/// accepted with or without a `sha256:` prefix and in any letter case.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct Sha256Digest(String);

impl Sha256Digest {
    /// Parse and canonicalise a hex digest.
    ///
    /// # Errors
    ///
    /// Returns [`DigestError::InvalidLength`] if the hex portion is not 64
    /// characters, or [`DigestError::NonHex`] if it contains non-hex characters.
    pub fn new(s: impl AsRef<str>) -> Result<Self, DigestError> {
        let raw = s.as_ref();
        let trimmed = raw.trim();
        let hex = trimmed
            .strip_prefix("sha256:")
            .or_else(|| trimmed.strip_prefix("SHA256:"))
            .unwrap_or(trimmed);

        if hex.len() != SHA256_HEX_LEN {
            return Err(DigestError::InvalidLength {
                input: raw.to_string(),
                len: hex.len(),
            });
        }

        if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(DigestError::NonHex(raw.to_string()));
        }

        Ok(Self(hex.to_ascii_lowercase()))
    }

    /// Render a finalized 32-byte hash.
    pub fn from_bytes(bytes: &[u8; 32]) -> Self {
        Self(hex::encode(bytes))
    }

    /// Compute the digest of an in-memory buffer.
    pub fn of(data: &[u8]) -> Self {
        Self(hex::encode(Sha256::digest(data)))
    }

    /// Get the digest as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for Sha256Digest {
    type Err = DigestError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl<'de> Deserialize<'de> for Sha256Digest {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Self::new(s).map_err(serde::de::Error::custom)
    }
}

impl std::fmt::Display for Sha256Digest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Sha256Digest {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
