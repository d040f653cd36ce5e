//! sumcheck - streaming SHA256 verification
#![allow(missing_docs)]
#![allow(clippy::missing_errors_doc)]
//!
//! Verifies a single download against an expected digest, or every entry of an
//! archive against a manifest of `name=digest` lines.

pub mod cmd;
pub mod ui;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "sumcheck")]
#[command(author, version, about = "Verify files and archives against SHA256 digests")]
pub struct Cli {
    /// Only print failures
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Download a file unless it already exists, and verify its SHA256
    Download {
        /// Source URL
        url: String,
        /// Destination path
        dest: PathBuf,
        /// Expected SHA256 (hex, optionally prefixed with `sha256:`)
        sha256: String,
        /// User agent sent with the request
        #[arg(long, env = "SUMCHECK_USER_AGENT", default_value = sumcheck_core::USER_AGENT)]
        user_agent: String,
        /// Overall request timeout in seconds
        #[arg(long, env = "SUMCHECK_TIMEOUT", default_value_t = 300)]
        timeout: u64,
        /// Connection timeout in seconds
        #[arg(long, env = "SUMCHECK_CONNECT_TIMEOUT", default_value_t = 30)]
        connect_timeout: u64,
    },
    /// Verify the entries of an archive against a manifest
    Check {
        /// Archive to inspect (zip, jar, tar, tar.gz, tar.zst)
        archive: PathBuf,
        /// Manifest of `name=sha256` lines
        manifest: PathBuf,
        /// Print the report as JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Compute the SHA256 of files
    Hash {
        /// Files to hash
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
    /// Print a manifest describing every entry of an archive
    Manifest {
        /// Archive to describe
        archive: PathBuf,
    },
    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        shell: clap_complete::Shell,
    },
}
