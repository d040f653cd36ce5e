//! Streaming SHA256 verification of single files and archive contents.

pub mod compare;
pub mod digest;
pub mod entry;
pub mod io;
pub mod manifest;
pub mod reporter;
pub mod verify;

pub use compare::{Comparison, compare};
pub use digest::{DigestReader, Digested, digest_reader};
pub use entry::{ArchiveError, Entry, EntrySource, IterSource};
pub use io::archive::{ArchiveFormat, manifest_for_archive, verify_archive};
#[cfg(feature = "network")]
pub use io::download::{DownloadConfig, DownloadError, DownloadOutcome, DownloadRequest, download_and_verify};
pub use manifest::verify_all;
pub use reporter::{NullReporter, Reporter};
pub use verify::{verify, verify_file};

/// User Agent string for outbound requests
pub const USER_AGENT: &str = concat!("sumcheck/", env!("CARGO_PKG_VERSION"));
