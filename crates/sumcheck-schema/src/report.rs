//! Verification outcomes and the aggregate report.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use crate::hash::Sha256Digest;

/// Expected and received digests of an item whose content did not match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mismatch {
    /// Digest the caller supplied.
    pub expected: Sha256Digest,
    /// Digest computed from the bytes that were read.
    pub received: Sha256Digest,
}

/// Result of verifying one item against its expected digest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Outcome {
    /// Bytes were fully read and hash to the expected digest.
    Match {
        /// The computed (and expected) digest.
        digest: Sha256Digest,
    },
    /// Bytes were fully read but hash to a different digest.
    Mismatch(Mismatch),
    /// The item could not be read to completion, so no digest exists.
    Unreadable {
        /// Description of the read failure.
        reason: String,
    },
}

impl Outcome {
    /// Whether this outcome counts as verified.
    pub fn is_match(&self) -> bool {
        matches!(self, Self::Match { .. })
    }
}

/// Aggregate result of checking a collection of named items against a manifest.
///
/// Every manifest name that was found among the items has exactly one entry in
/// `outcomes`; every manifest name that was never found is in `missing`. Items
/// absent from the manifest never appear. Both collections are ordered by name,
/// so the report does not depend on the order items were enumerated in.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationReport {
    /// Outcome per verified item name.
    pub outcomes: BTreeMap<String, Outcome>,
    /// Manifest names with no corresponding item.
    pub missing: BTreeSet<String>,
}

impl VerificationReport {
    /// Create an empty report.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the outcome for `name`.
    pub fn record(&mut self, name: impl Into<String>, outcome: Outcome) {
        self.outcomes.insert(name.into(), outcome);
    }

    /// Record a manifest name that no item satisfied.
    pub fn record_missing(&mut self, name: impl Into<String>) {
        self.missing.insert(name.into());
    }

    /// Outcome recorded for `name`, if it was verified.
    pub fn outcome(&self, name: &str) -> Option<&Outcome> {
        self.outcomes.get(name)
    }

    /// Items whose digest matched.
    pub fn succeeded(&self) -> impl Iterator<Item = (&str, &Sha256Digest)> {
        self.outcomes.iter().filter_map(|(name, outcome)| match outcome {
            Outcome::Match { digest } => Some((name.as_str(), digest)),
            _ => None,
        })
    }

    /// Items whose digest did not match.
    pub fn mismatched(&self) -> impl Iterator<Item = (&str, &Mismatch)> {
        self.outcomes.iter().filter_map(|(name, outcome)| match outcome {
            Outcome::Mismatch(m) => Some((name.as_str(), m)),
            _ => None,
        })
    }

    /// Items that failed while being read.
    pub fn unreadable(&self) -> impl Iterator<Item = (&str, &str)> {
        self.outcomes.iter().filter_map(|(name, outcome)| match outcome {
            Outcome::Unreadable { reason } => Some((name.as_str(), reason.as_str())),
            _ => None,
        })
    }

    /// Manifest names never matched to an item.
    pub fn missing(&self) -> impl Iterator<Item = &str> {
        self.missing.iter().map(String::as_str)
    }

    /// Number of items that failed verification for any reason, including missing ones.
    pub fn failure_count(&self) -> usize {
        self.outcomes.values().filter(|o| !o.is_match()).count() + self.missing.len()
    }

    /// True when nothing mismatched, nothing was unreadable and nothing is missing.
    ///
    /// An empty report (empty manifest) is vacuously successful.
    pub fn is_success(&self) -> bool {
        self.failure_count() == 0
    }
}
