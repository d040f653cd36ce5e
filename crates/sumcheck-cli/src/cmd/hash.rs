//! Hash command

use anyhow::{Context, Result};
use std::fs::File;
use std::path::PathBuf;

use sumcheck_core::digest_reader;

/// Print `hex  path` for each file, suitable for pasting into a manifest
pub fn hash(files: &[PathBuf]) -> Result<()> {
    for file in files {
        let reader =
            File::open(file).with_context(|| format!("Failed to open {}", file.display()))?;
        let digested =
            digest_reader(reader).with_context(|| format!("Failed to read {}", file.display()))?;
        println!("{}  {}", digested.digest, file.display());
    }
    Ok(())
}
