//! Shared types for sumcheck: digests, manifests and verification reports.
//!
//! Nothing in this crate performs I/O beyond reading a manifest file; hashing of
//! byte streams and the verifiers live in `sumcheck-core`.

pub mod hash;
pub mod manifest;
pub mod report;

// Re-exports
pub use hash::*;
pub use manifest::{Manifest, ManifestError};
pub use report::{Mismatch, Outcome, VerificationReport};
