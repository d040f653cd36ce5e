//! IO modules - side effects (network, filesystem)

pub mod archive;
#[cfg(feature = "network")]
pub mod download;
