//! Subcommand implementations

pub mod check;
pub mod completions;
pub mod download;
pub mod hash;
pub mod manifest;
