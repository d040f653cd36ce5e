//! Reporter trait for dependency injection
//!
//! Verifiers report what they find through this trait instead of printing, so
//! the caller decides how (and whether) results are shown.

use sumcheck_schema::{Mismatch, Sha256Digest};

pub trait Reporter: Send + Sync {
    /// An item listed in the manifest is about to be hashed.
    fn verifying(&self, name: &str);

    /// An item hashed to its expected digest.
    fn matched(&self, name: &str, digest: &Sha256Digest);

    /// An item hashed to a different digest than expected.
    fn mismatched(&self, name: &str, mismatch: &Mismatch);

    /// An item could not be read to completion.
    fn unreadable(&self, name: &str, reason: &str);

    /// A manifest entry was never matched by any item.
    fn missing(&self, name: &str);

    /// An item is not listed in the manifest and was not verified.
    fn skipped(&self, name: &str);

    /// Log an informational message.
    fn info(&self, msg: &str);
}

impl<T: Reporter + ?Sized> Reporter for &T {
    fn verifying(&self, name: &str) {
        (**self).verifying(name);
    }
    fn matched(&self, name: &str, digest: &Sha256Digest) {
        (**self).matched(name, digest);
    }
    fn mismatched(&self, name: &str, mismatch: &Mismatch) {
        (**self).mismatched(name, mismatch);
    }
    fn unreadable(&self, name: &str, reason: &str) {
        (**self).unreadable(name, reason);
    }
    fn missing(&self, name: &str) {
        (**self).missing(name);
    }
    fn skipped(&self, name: &str) {
        (**self).skipped(name);
    }
    fn info(&self, msg: &str) {
        (**self).info(msg);
    }
}

impl<T: Reporter + ?Sized> Reporter for std::sync::Arc<T> {
    fn verifying(&self, name: &str) {
        (**self).verifying(name);
    }
    fn matched(&self, name: &str, digest: &Sha256Digest) {
        (**self).matched(name, digest);
    }
    fn mismatched(&self, name: &str, mismatch: &Mismatch) {
        (**self).mismatched(name, mismatch);
    }
    fn unreadable(&self, name: &str, reason: &str) {
        (**self).unreadable(name, reason);
    }
    fn missing(&self, name: &str) {
        (**self).missing(name);
    }
    fn skipped(&self, name: &str) {
        (**self).skipped(name);
    }
    fn info(&self, msg: &str) {
        (**self).info(msg);
    }
}

/// A no-op reporter for silent operations (e.g., manifest generation, testing).
#[derive(Debug, Clone, Copy)]
pub struct NullReporter;

impl Reporter for NullReporter {
    fn verifying(&self, _: &str) {}
    fn matched(&self, _: &str, _: &Sha256Digest) {}
    fn mismatched(&self, _: &str, _: &Mismatch) {}
    fn unreadable(&self, _: &str, _: &str) {}
    fn missing(&self, _: &str) {}
    fn skipped(&self, _: &str) {}
    fn info(&self, _: &str) {}
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::sync::Mutex;

    /// Records every event as a short string, in call order.
    #[derive(Debug, Default)]
    pub(crate) struct RecordingReporter {
        pub(crate) events: Mutex<Vec<String>>,
    }

    impl RecordingReporter {
        pub(crate) fn events(&self) -> Vec<String> {
            self.events.lock().unwrap().clone()
        }

        fn push(&self, event: String) {
            self.events.lock().unwrap().push(event);
        }
    }

    impl Reporter for RecordingReporter {
        fn verifying(&self, name: &str) {
            self.push(format!("verifying {name}"));
        }
        fn matched(&self, name: &str, _: &Sha256Digest) {
            self.push(format!("matched {name}"));
        }
        fn mismatched(&self, name: &str, _: &Mismatch) {
            self.push(format!("mismatched {name}"));
        }
        fn unreadable(&self, name: &str, _: &str) {
            self.push(format!("unreadable {name}"));
        }
        fn missing(&self, name: &str) {
            self.push(format!("missing {name}"));
        }
        fn skipped(&self, name: &str) {
            self.push(format!("skipped {name}"));
        }
        fn info(&self, msg: &str) {
            self.push(format!("info {msg}"));
        }
    }

    fn report_missing(reporter: impl Reporter, name: &str) {
        reporter.missing(name);
    }

    #[test]
    fn wrappers_forward_to_inner() {
        let inner = std::sync::Arc::new(RecordingReporter::default());
        report_missing(std::sync::Arc::clone(&inner), "a");
        report_missing(&*inner, "b");
        assert_eq!(inner.events(), ["missing a", "missing b"]);
    }
}
