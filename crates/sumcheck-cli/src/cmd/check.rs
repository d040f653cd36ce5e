//! Check command

use anyhow::{Context, Result};
use std::path::Path;
use std::process::ExitCode;

use sumcheck_core::{NullReporter, verify_archive};
use sumcheck_schema::Manifest;

use crate::ui::ConsoleReporter;

/// Verify `archive` against the manifest at `manifest_path`.
///
/// Exits with status 1 when any listed file is missing, mismatched or unreadable.
pub fn check(archive: &Path, manifest_path: &Path, json: bool, quiet: bool) -> Result<ExitCode> {
    let manifest = Manifest::load(manifest_path)?;
    tracing::debug!(entries = manifest.len(), "manifest loaded");

    let report = if json {
        let report = verify_archive(archive, &manifest, &NullReporter)
            .with_context(|| format!("Failed to verify {}", archive.display()))?;
        println!("{}", serde_json::to_string_pretty(&report)?);
        report
    } else {
        let reporter = ConsoleReporter::new(archive.display().to_string(), quiet);
        let report = verify_archive(archive, &manifest, &reporter)
            .with_context(|| format!("Failed to verify {}", archive.display()))?;
        reporter.summary(&report);
        report
    };

    Ok(if report.is_success() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
