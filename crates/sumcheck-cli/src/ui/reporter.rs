//! Console implementation of the verification [`Reporter`]

use crossterm::style::Stylize;
use sumcheck_core::Reporter;
use sumcheck_schema::{Mismatch, Sha256Digest, VerificationReport};

/// Prints one block per verified item, failures always and successes unless quiet.
#[derive(Debug, Clone)]
pub struct ConsoleReporter {
    source: String,
    quiet: bool,
}

impl ConsoleReporter {
    /// `source` names the archive or download the items came from.
    pub fn new(source: impl Into<String>, quiet: bool) -> Self {
        Self {
            source: source.into(),
            quiet,
        }
    }

    fn failure(&self, headline: &str, name: &str, details: &[(&str, &str)]) {
        println!("{} {}", "FAILED:".red().bold(), headline.red());
        println!("  {:<15}{}", "Source:", self.source);
        println!("  {:<15}{}", "File:", name);
        for (label, value) in details {
            println!("  {label:<15}{value}");
        }
    }

    /// Final one-line summary of a manifest check.
    pub fn summary(&self, report: &VerificationReport) {
        let checked = report.outcomes.len() + report.missing.len();
        let failures = report.failure_count();
        if failures == 0 {
            if !self.quiet {
                println!("{} {checked} file(s) verified", "✔".green());
            }
        } else {
            println!(
                "{} {}",
                "✗".red(),
                format!("{failures} of {checked} file(s) failed verification").red()
            );
        }
    }
}

impl Reporter for ConsoleReporter {
    fn verifying(&self, name: &str) {
        tracing::trace!(%name, "verifying");
    }

    fn matched(&self, name: &str, digest: &Sha256Digest) {
        if !self.quiet {
            println!(
                "{} File {name} has expected hash {}",
                "SUCCEEDED:".green().bold(),
                digest.as_str().dark_grey()
            );
        }
    }

    fn mismatched(&self, name: &str, mismatch: &Mismatch) {
        self.failure(
            "File had the wrong hash value.",
            name,
            &[
                ("Hash Expected:", mismatch.expected.as_str()),
                ("Hash Received:", mismatch.received.as_str()),
            ],
        );
    }

    fn unreadable(&self, name: &str, reason: &str) {
        self.failure("File could not be read.", name, &[("Reason:", reason)]);
    }

    fn missing(&self, name: &str) {
        self.failure("Missing a required file.", name, &[]);
    }

    fn skipped(&self, name: &str) {
        tracing::debug!(%name, "not in manifest");
    }

    fn info(&self, msg: &str) {
        if !self.quiet {
            println!("{}", msg.dark_grey());
        }
    }
}
