//! Download command

use anyhow::{Context, Result};
use std::path::Path;
use std::process::ExitCode;

use crossterm::style::Stylize;
use sumcheck_core::{DownloadConfig, DownloadOutcome, DownloadRequest, download_and_verify};
use sumcheck_schema::Sha256Digest;

use crate::ui::ConsoleReporter;

/// Fetch `url` into `dest` unless it already exists, verifying its digest.
pub async fn download(
    config: &DownloadConfig,
    url: &str,
    dest: &Path,
    sha256: &str,
    quiet: bool,
) -> Result<ExitCode> {
    let expected = Sha256Digest::new(sha256).context("Invalid expected digest")?;
    let client = config.build_client()?;
    let request = DownloadRequest::new(url, dest, expected);
    let reporter = ConsoleReporter::new(url, quiet);

    let outcome = download_and_verify(&client, &request, &reporter)
        .await
        .with_context(|| format!("Failed to download {url}"))?;

    if !quiet {
        match outcome {
            DownloadOutcome::AlreadyPresent => {
                println!("{} {} (already present)", "✔".green(), dest.display());
            }
            DownloadOutcome::Verified { bytes, .. } => {
                println!("{} {} ({bytes} bytes)", "✔".green(), dest.display());
            }
        }
    }
    Ok(ExitCode::SUCCESS)
}
