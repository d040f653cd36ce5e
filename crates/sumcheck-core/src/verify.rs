//! Single-item verification: hash one source and compare it to one digest.

use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::Path;

use sumcheck_schema::{Outcome, Sha256Digest};

use crate::compare::compare;
use crate::digest::digest_reader;

/// Hash `source` and compare the result with `expected`.
///
/// Returns [`Outcome::Match`] or [`Outcome::Mismatch`]. A mismatch means the
/// bytes were read in full and hash to something else; a read failure means no
/// digest could be computed and is returned as `Err`.
///
/// # Errors
///
/// Returns the underlying I/O error if the source fails mid-read.
pub fn verify<R: Read>(source: R, expected: &Sha256Digest) -> io::Result<Outcome> {
    let digested = digest_reader(source)?;
    Ok(compare(digested.digest, expected.clone()).into_outcome())
}

/// Open `path` and verify its contents against `expected`.
///
/// # Errors
///
/// Returns an I/O error if the file cannot be opened or read.
pub fn verify_file(path: &Path, expected: &Sha256Digest) -> io::Result<Outcome> {
    tracing::debug!(path = %path.display(), %expected, "verifying file");
    let file = File::open(path)?;
    verify(BufReader::new(file), expected)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::digest::tests::FailingReader;
    use sumcheck_schema::Mismatch;

    #[test]
    fn correct_digest_matches() {
        let data = b"payload bytes";
        let outcome = verify(&data[..], &Sha256Digest::of(data)).unwrap();
        assert_eq!(
            outcome,
            Outcome::Match {
                digest: Sha256Digest::of(data)
            }
        );
    }

    #[test]
    fn wrong_digest_reports_expected_and_received() {
        let data = b"payload bytes";
        let wrong = Sha256Digest::of(b"something else");
        let outcome = verify(&data[..], &wrong).unwrap();
        assert_eq!(
            outcome,
            Outcome::Mismatch(Mismatch {
                expected: wrong,
                received: Sha256Digest::of(data),
            })
        );
    }

    #[test]
    fn read_failure_is_an_error_not_a_mismatch() {
        let source = FailingReader::new(b"half", io::ErrorKind::UnexpectedEof);
        let err = verify(source, &Sha256Digest::of(b"half")).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::UnexpectedEof);
    }

    #[test]
    fn verify_file_roundtrip() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        std::io::Write::write_all(&mut file, b"on disk").unwrap();

        let outcome = verify_file(file.path(), &Sha256Digest::of(b"on disk")).unwrap();
        assert!(outcome.is_match());
    }

    #[test]
    fn verify_file_missing_path() {
        let dir = tempfile::tempdir().unwrap();
        let err = verify_file(&dir.path().join("nope"), &Sha256Digest::of(b"")).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }
}
