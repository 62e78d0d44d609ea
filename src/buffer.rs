//! Owned byte buffers.
//!
//! [`Buf`] wraps `Vec<u8>` and is what the pending write queue stores: one
//! contiguous copy per outbound message, independent of the caller's memory.

use std::fmt;
use std::ops::Deref;

/// Growable owned buffer.
///
/// The `Debug` output only shows the length, never the payload.
#[derive(Clone, PartialEq, Eq)]
pub struct Buf(Vec<u8>);

impl Buf {
    /// Create an empty buffer with room for `capacity` bytes.
    pub fn with_capacity(capacity: usize) -> Self {
        Buf(Vec::with_capacity(capacity))
    }

    /// Copy a sequence of spans, in order, into one contiguous buffer.
    pub fn compact<'a, I>(spans: I) -> Self
    where
        I: IntoIterator<Item = &'a [u8]>,
        I::IntoIter: Clone,
    {
        let spans = spans.into_iter();
        let len = spans.clone().map(|s| s.len()).sum();

        let mut buf = Buf::with_capacity(len);
        for span in spans {
            buf.extend_from_slice(span);
        }
        buf
    }

    /// Extend the buffer with a slice of bytes.
    pub fn extend_from_slice(&mut self, other: &[u8]) {
        self.0.extend_from_slice(other);
    }

    /// Convert the buffer into the underlying `Vec<u8>`.
    pub fn into_vec(self) -> Vec<u8> {
        self.0
    }
}

impl Deref for Buf {
    type Target = [u8];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl fmt::Debug for Buf {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Buf").field("len", &self.0.len()).finish()
    }
}
