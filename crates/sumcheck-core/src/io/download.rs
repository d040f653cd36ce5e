//! Download-verify module
//!
//! Streams a remote file into a staging file next to its destination, verifies
//! the staged bytes against an expected SHA256 and only then moves them into
//! place.

use std::path::{Path, PathBuf};
use std::time::Duration;

use futures::StreamExt;
use reqwest::Client;
use sumcheck_schema::{Outcome, Sha256Digest};
use thiserror::Error;
use tokio::io::AsyncWriteExt;

use crate::Reporter;
use crate::verify::verify_file;

#[derive(Error, Debug)]
pub enum DownloadError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Server returned {status} for {url}")]
    Status { url: String, status: u16 },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Hash mismatch: expected {expected}, got {received}")]
    Mismatch {
        expected: Sha256Digest,
        received: Sha256Digest,
    },

    #[error("Verification task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

/// HTTP client settings.
#[derive(Debug, Clone)]
pub struct DownloadConfig {
    pub user_agent: String,
    pub timeout: Duration,
    pub connect_timeout: Duration,
}

impl Default for DownloadConfig {
    fn default() -> Self {
        Self {
            user_agent: crate::USER_AGENT.to_string(),
            timeout: Duration::from_secs(300),
            connect_timeout: Duration::from_secs(30),
        }
    }
}

impl DownloadConfig {
    pub fn build_client(&self) -> Result<Client, DownloadError> {
        Ok(Client::builder()
            .user_agent(&self.user_agent)
            .timeout(self.timeout)
            .connect_timeout(self.connect_timeout)
            .build()?)
    }
}

/// Request for a download operation
#[derive(Debug, Clone)]
pub struct DownloadRequest {
    pub url: String,
    pub dest: PathBuf,
    pub expected: Sha256Digest,
}

impl DownloadRequest {
    pub fn new(url: impl Into<String>, dest: impl Into<PathBuf>, expected: Sha256Digest) -> Self {
        Self {
            url: url.into(),
            dest: dest.into(),
            expected,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DownloadOutcome {
    /// The destination already existed; nothing was fetched or hashed.
    AlreadyPresent,
    /// The file was fetched, matched the expected digest and was moved into place.
    Verified { digest: Sha256Digest, bytes: u64 },
}

/// Downloads `request.url` to `request.dest` if it is not already there.
///
/// An existing regular file at the destination is trusted as-is. Otherwise the
/// body is staged in the destination's directory and persisted only when its
/// digest matches; a mismatching download leaves no file behind.
pub async fn download_and_verify<P: Reporter + ?Sized>(
    client: &Client,
    request: &DownloadRequest,
    reporter: &P,
) -> Result<DownloadOutcome, DownloadError> {
    let dest = request.dest.as_path();

    if dest.is_file() {
        tracing::debug!(dest = %dest.display(), "already present, skipping download");
        reporter.info(&format!("{} already exists", dest.display()));
        return Ok(DownloadOutcome::AlreadyPresent);
    }

    let parent = match dest.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    tokio::fs::create_dir_all(parent).await?;

    tracing::debug!(url = %request.url, dest = %dest.display(), "downloading");
    reporter.info(&format!("Downloading {}", request.url));

    let response = client.get(&request.url).send().await?;
    let status = response.status();
    if status.is_client_error() || status.is_server_error() {
        return Err(DownloadError::Status {
            url: request.url.clone(),
            status: status.as_u16(),
        });
    }

    let staging = tempfile::Builder::new()
        .prefix(".sumcheck-")
        .suffix(".part")
        .tempfile_in(parent)?;
    let (file, staged_path) = staging.into_parts();
    let mut file = tokio::fs::File::from_std(file);

    let mut stream = response.bytes_stream();
    let mut bytes: u64 = 0;
    while let Some(chunk) = stream.next().await {
        let chunk = chunk?;
        file.write_all(&chunk).await?;
        bytes += chunk.len() as u64;
    }
    file.flush().await?;
    drop(file);
    tracing::trace!(bytes, staged = %staged_path.display(), "body staged");

    let name = dest.display().to_string();
    reporter.verifying(&name);

    let expected = request.expected.clone();
    let (staged_path, outcome) = tokio::task::spawn_blocking(move || {
        let outcome = verify_file(&staged_path, &expected);
        (staged_path, outcome)
    })
    .await?;

    match outcome? {
        Outcome::Match { digest } => {
            staged_path.persist(dest).map_err(|e| e.error)?;
            reporter.matched(&name, &digest);
            Ok(DownloadOutcome::Verified { digest, bytes })
        }
        Outcome::Mismatch(mismatch) => {
            // Dropping the staged path deletes it
            reporter.mismatched(&name, &mismatch);
            Err(DownloadError::Mismatch {
                expected: mismatch.expected,
                received: mismatch.received,
            })
        }
        Outcome::Unreadable { reason } => {
            reporter.unreadable(&name, &reason);
            Err(DownloadError::Io(std::io::Error::other(reason)))
        }
    }
}
