//! Manifest verification: check every named item against a checklist of digests.

use sumcheck_schema::{Manifest, Outcome, VerificationReport};

use crate::Reporter;
use crate::entry::{ArchiveError, Entry, EntrySource};
use crate::verify::verify;

/// Verify every item of `source` that is listed in `manifest`.
///
/// Items are visited in the source's natural order. A listed item is removed
/// from a working copy of the manifest before it is hashed, so each manifest
/// entry is satisfied at most once; later items with the same name are skipped.
/// Items not listed are skipped without being read. Whatever remains of the
/// working copy once the source is exhausted is recorded as missing.
///
/// A read failure inside one item is recorded as [`Outcome::Unreadable`] for
/// that item and the remaining items are still verified.
///
/// # Errors
///
/// Returns an [`ArchiveError`] only when the source itself fails to produce an
/// entry; no partial report is returned in that case.
pub fn verify_all<S, P>(
    source: &mut S,
    manifest: &Manifest,
    reporter: &P,
) -> Result<VerificationReport, ArchiveError>
where
    S: EntrySource + ?Sized,
    P: Reporter + ?Sized,
{
    let mut remaining = manifest.clone();
    let mut report = VerificationReport::new();

    while let Some(entry) = source.next_entry() {
        let Entry { name, reader } = entry?;

        let Some(expected) = remaining.remove(&name) else {
            tracing::trace!(%name, "not listed in manifest");
            reporter.skipped(&name);
            continue;
        };

        reporter.verifying(&name);
        let outcome = verify(reader, &expected).unwrap_or_else(|e| {
            tracing::warn!(%name, error = %e, "failed to read entry");
            Outcome::Unreadable {
                reason: e.to_string(),
            }
        });

        match &outcome {
            Outcome::Match { digest } => reporter.matched(&name, digest),
            Outcome::Mismatch(mismatch) => reporter.mismatched(&name, mismatch),
            Outcome::Unreadable { reason } => reporter.unreadable(&name, reason),
        }
        report.record(name, outcome);
    }

    for (name, _) in remaining {
        reporter.missing(&name);
        report.record_missing(name);
    }

    tracing::debug!(
        verified = report.outcomes.len(),
        missing = report.missing.len(),
        failures = report.failure_count(),
        "manifest verification finished"
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::IterSource;
    use crate::NullReporter;
    use crate::digest::tests::FailingReader;
    use crate::reporter::tests::RecordingReporter;
    use std::io::{self, Read};
    use sumcheck_schema::{Mismatch, Sha256Digest};

    fn h(data: &[u8]) -> Sha256Digest {
        Sha256Digest::of(data)
    }

    fn manifest(entries: &[(&str, Sha256Digest)]) -> Manifest {
        entries
            .iter()
            .map(|(n, d)| ((*n).to_string(), d.clone()))
            .collect()
    }

    fn run(items: Vec<(&str, &str)>, manifest: &Manifest) -> VerificationReport {
        let mut source = IterSource::new(items.into_iter().map(|(n, c)| (n, c.as_bytes())));
        verify_all(&mut source, manifest, &NullReporter).unwrap()
    }

    #[test]
    fn succeeded_mismatched_missing_and_ignored() {
        let manifest = manifest(&[("a", h(b"bytes_a")), ("b", h(b"bytes_b")), ("c", h(b"x"))]);
        let report = run(
            vec![("a", "bytes_a"), ("b", "bytes_y"), ("d", "bytes_d")],
            &manifest,
        );

        assert_eq!(report.succeeded().map(|(n, _)| n).collect::<Vec<_>>(), ["a"]);
        assert_eq!(
            report.mismatched().collect::<Vec<_>>(),
            [(
                "b",
                &Mismatch {
                    expected: h(b"bytes_b"),
                    received: h(b"bytes_y"),
                }
            )]
        );
        assert_eq!(report.missing().collect::<Vec<_>>(), ["c"]);
        assert!(report.outcome("d").is_none());
        assert!(!report.is_success());
    }

    #[test]
    fn all_matching_is_success() {
        let manifest = manifest(&[("one", h(b"1")), ("two", h(b"2"))]);
        let report = run(vec![("two", "2"), ("one", "1")], &manifest);
        assert!(report.is_success());
        assert_eq!(report.succeeded().count(), 2);
    }

    #[test]
    fn order_of_items_does_not_change_report() {
        let manifest = manifest(&[("a", h(b"A")), ("b", h(b"wrong")), ("z", h(b"Z"))]);
        let items = vec![("a", "A"), ("b", "B"), ("c", "C"), ("z", "Z")];

        let forward = run(items.clone(), &manifest);
        let reversed = run(items.iter().rev().copied().collect(), &manifest);
        let rotated = run(
            items.iter().cycle().skip(2).take(items.len()).copied().collect(),
            &manifest,
        );

        assert_eq!(forward, reversed);
        assert_eq!(forward, rotated);
    }

    #[test]
    fn empty_archive_reports_every_entry_missing() {
        let manifest = manifest(&[("a", h(b"a")), ("b", h(b"b"))]);
        let report = run(Vec::new(), &manifest);

        assert_eq!(report.missing().collect::<Vec<_>>(), ["a", "b"]);
        assert!(report.outcomes.is_empty());
        assert!(!report.is_success());
    }

    #[test]
    fn empty_manifest_is_vacuously_satisfied() {
        let report = run(vec![("a", "a"), ("b", "b")], &Manifest::new());

        assert!(report.outcomes.is_empty());
        assert!(report.missing.is_empty());
        assert!(report.is_success());
    }

    #[test]
    fn duplicate_item_names_are_verified_once() {
        let manifest = manifest(&[("dup", h(b"first"))]);
        let report = run(vec![("dup", "first"), ("dup", "second")], &manifest);

        assert_eq!(
            report.outcome("dup"),
            Some(&Outcome::Match { digest: h(b"first") })
        );
        assert!(report.is_success());
    }

    #[test]
    fn unreadable_item_is_recorded_and_batch_continues() {
        let manifest = manifest(&[
            ("before", h(b"ok")),
            ("broken", h(b"whatever")),
            ("after", h(b"ok")),
        ]);
        let items: Vec<(&str, Box<dyn Read>)> = vec![
            ("before", Box::new(&b"ok"[..]) as Box<dyn Read>),
            (
                "broken",
                Box::new(FailingReader::new(b"par", io::ErrorKind::InvalidData)) as Box<dyn Read>,
            ),
            ("after", Box::new(&b"ok"[..]) as Box<dyn Read>),
        ];
        let mut source = IterSource::new(items);
        let report = verify_all(&mut source, &manifest, &NullReporter).unwrap();

        assert!(report.outcome("before").unwrap().is_match());
        assert!(report.outcome("after").unwrap().is_match());
        assert!(matches!(
            report.outcome("broken"),
            Some(Outcome::Unreadable { .. })
        ));
        assert_eq!(report.failure_count(), 1);
        assert!(!report.is_success());
    }

    #[test]
    fn container_failure_aborts_batch() {
        struct Corrupt {
            yielded: bool,
        }

        impl EntrySource for Corrupt {
            fn next_entry(&mut self) -> Option<Result<Entry<'_>, ArchiveError>> {
                if self.yielded {
                    return Some(Err(ArchiveError::Corrupted("bad header".into())));
                }
                self.yielded = true;
                Some(Ok(Entry {
                    name: "a".into(),
                    reader: Box::new(&b"a"[..]),
                }))
            }
        }

        let manifest = manifest(&[("a", h(b"a")), ("b", h(b"b"))]);
        let err = verify_all(&mut Corrupt { yielded: false }, &manifest, &NullReporter)
            .unwrap_err();
        assert!(matches!(err, ArchiveError::Corrupted(_)));
    }

    #[test]
    fn reporter_sees_every_event() {
        let manifest = manifest(&[("a", h(b"a")), ("b", h(b"b")), ("c", h(b"c"))]);
        let reporter = RecordingReporter::default();
        let mut source = IterSource::new(vec![("a", &b"a"[..]), ("x", &b"x"[..]), ("b", &b"B"[..])]);

        verify_all(&mut source, &manifest, &reporter).unwrap();

        assert_eq!(
            reporter.events(),
            [
                "verifying a",
                "matched a",
                "skipped x",
                "verifying b",
                "mismatched b",
                "missing c",
            ]
        );
    }

    #[test]
    fn manifest_is_not_consumed() {
        let manifest = manifest(&[("a", h(b"a"))]);
        let _ = run(vec![("a", "a")], &manifest);
        assert_eq!(manifest.len(), 1);
    }
}
