//! Manifest command

use anyhow::{Context, Result};
use std::path::Path;

use sumcheck_core::manifest_for_archive;

/// Print a manifest covering every entry of `archive`
pub fn manifest(archive: &Path) -> Result<()> {
    let manifest = manifest_for_archive(archive)
        .with_context(|| format!("Failed to hash entries of {}", archive.display()))?;
    print!("{manifest}");
    Ok(())
}
