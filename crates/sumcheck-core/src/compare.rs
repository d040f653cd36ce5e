//! Digest comparison.

use sumcheck_schema::{Mismatch, Outcome, Sha256Digest};

/// A computed digest paired with the digest it was expected to equal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comparison {
    /// Digest the caller supplied.
    pub expected: Sha256Digest,
    /// Digest computed from the source.
    pub received: Sha256Digest,
}

impl Comparison {
    /// Whether both digests are identical.
    pub fn is_match(&self) -> bool {
        self.expected == self.received
    }

    /// Convert into a per-item outcome.
    pub fn into_outcome(self) -> Outcome {
        if self.is_match() {
            Outcome::Match {
                digest: self.received,
            }
        } else {
            Outcome::Mismatch(Mismatch {
                expected: self.expected,
                received: self.received,
            })
        }
    }
}

/// Compare a computed digest with an expected one.
///
/// Both values are canonical lowercase hex (see [`Sha256Digest::new`]), so this
/// is exact equality of the canonical renderings and case in the caller's input
/// never causes a spurious mismatch.
pub fn compare(received: Sha256Digest, expected: Sha256Digest) -> Comparison {
    Comparison { expected, received }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equal_digests_match() {
        let d = Sha256Digest::of(b"same");
        let cmp = compare(d.clone(), d.clone());
        assert!(cmp.is_match());
        assert_eq!(cmp.into_outcome(), Outcome::Match { digest: d });
    }

    #[test]
    fn different_digests_keep_both_values() {
        let received = Sha256Digest::of(b"got");
        let expected = Sha256Digest::of(b"want");
        let cmp = compare(received.clone(), expected.clone());

        assert!(!cmp.is_match());
        assert_eq!(
            cmp.into_outcome(),
            Outcome::Mismatch(Mismatch { expected, received })
        );
    }

    #[test]
    fn case_of_expected_input_is_irrelevant() {
        let received = Sha256Digest::of(b"case");
        let expected = Sha256Digest::new(received.as_str().to_ascii_uppercase()).unwrap();
        assert!(compare(received, expected).is_match());
    }
}
