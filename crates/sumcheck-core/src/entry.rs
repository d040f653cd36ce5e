//! Named byte sources handed to the manifest verifier.

use std::io::{self, Read};
use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ArchiveError {
    #[error("Failed to open archive {}: {source}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Unsupported archive format: {0}")]
    UnsupportedFormat(String),

    #[error("Archive error: {0}")]
    Corrupted(String),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

/// One named item and a reader over its content.
///
/// The reader may borrow the container it came from, so it must be drained or
/// dropped before asking the source for the next entry.
pub struct Entry<'a> {
    pub name: String,
    pub reader: Box<dyn Read + 'a>,
}

impl std::fmt::Debug for Entry<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Entry").field("name", &self.name).finish_non_exhaustive()
    }
}

/// A sequence of named byte sources, enumerated once in natural order.
///
/// Returning `Err` means the container itself could not produce the next entry;
/// failures while reading an entry's bytes surface through its reader instead.
pub trait EntrySource {
    fn next_entry(&mut self) -> Option<Result<Entry<'_>, ArchiveError>>;
}

/// Adapts an iterator of `(name, reader)` pairs into an [`EntrySource`].
///
/// ```
/// use sumcheck_core::{EntrySource, IterSource};
///
/// let data = b"alpha".to_vec();
/// let mut source = IterSource::new(vec![("a.txt", data.as_slice())]);
/// let entry = source.next_entry().unwrap().unwrap();
/// assert_eq!(entry.name, "a.txt");
/// ```
pub struct IterSource<'a> {
    items: Box<dyn Iterator<Item = (String, Box<dyn Read + 'a>)> + 'a>,
}

impl<'a> IterSource<'a> {
    pub fn new<I, N, R>(items: I) -> Self
    where
        I: IntoIterator<Item = (N, R)> + 'a,
        I::IntoIter: 'a,
        N: Into<String> + 'a,
        R: Read + 'a,
    {
        let items = items
            .into_iter()
            .map(|(name, reader)| (name.into(), Box::new(reader) as Box<dyn Read + 'a>));
        Self {
            items: Box::new(items),
        }
    }
}

impl std::fmt::Debug for IterSource<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IterSource").finish_non_exhaustive()
    }
}

impl EntrySource for IterSource<'_> {
    fn next_entry(&mut self) -> Option<Result<Entry<'_>, ArchiveError>> {
        let (name, reader) = self.items.next()?;
        Some(Ok(Entry { name, reader }))
    }
}
