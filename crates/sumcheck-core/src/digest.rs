//! Streaming SHA256 over arbitrary byte sources.
//!
//! Bytes are hashed as they pass through a fixed-size buffer; nothing read is
//! retained, so memory use does not depend on the size of the source.

use std::io::{self, Read};

use sha2::{Digest, Sha256};
use sumcheck_schema::Sha256Digest;

/// Read buffer size used when draining a source.
pub const BUFFER_SIZE: usize = 64 * 1024;

/// Final digest of a drained source and the number of bytes hashed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Digested {
    /// SHA256 of every byte read.
    pub digest: Sha256Digest,
    /// Total bytes read from the source.
    pub bytes: u64,
}

/// Reader that hashes data as it passes through.
///
/// Every byte returned from [`Read::read`] is fed to a single SHA256
/// accumulator. Call [`DigestReader::finish`] once the source is exhausted.
#[derive(Debug)]
pub struct DigestReader<R> {
    inner: R,
    hasher: Sha256,
    bytes: u64,
}

impl<R: Read> DigestReader<R> {
    /// Wrap `inner`.
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            hasher: Sha256::new(),
            bytes: 0,
        }
    }

    /// Bytes hashed so far.
    pub fn bytes_read(&self) -> u64 {
        self.bytes
    }

    /// Finalize the hash. The wrapped source is dropped here.
    pub fn finish(self) -> Digested {
        Digested {
            digest: Sha256Digest::from_bytes(&self.hasher.finalize().into()),
            bytes: self.bytes,
        }
    }
}

impl<R: Read> Read for DigestReader<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n = self.inner.read(buf)?;
        if n > 0 {
            self.hasher.update(&buf[..n]);
            self.bytes += n as u64;
        }
        Ok(n)
    }
}

/// Drain `source` completely and return its digest.
///
/// The source is consumed; its handle is released when this returns, whether
/// it succeeded or not.
///
/// # Errors
///
/// Propagates any read error other than [`io::ErrorKind::Interrupted`].
pub fn digest_reader<R: Read>(source: R) -> io::Result<Digested> {
    let mut reader = DigestReader::new(source);
    let mut buffer = vec![0u8; BUFFER_SIZE];

    loop {
        match reader.read(&mut buffer) {
            Ok(0) => break,
            Ok(_) => {}
            Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
            Err(e) => return Err(e),
        }
    }

    let digested = reader.finish();
    tracing::trace!(bytes = digested.bytes, digest = %digested.digest, "drained source");
    Ok(digested)
}
