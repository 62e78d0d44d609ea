//! Scatter/gather messages passed through a [`Socket`][crate::Socket].
//!
//! A message is an ordered list of byte spans. Most callers use a single span,
//! but a framing layer can hand over a header and a body without first copying
//! them together.

use std::fmt;
use std::net::SocketAddr;

use tinyvec::TinyVec;

use crate::buffer::Buf;

/// Outgoing message, borrowed from the caller for the duration of a send.
#[derive(Clone)]
pub struct OutputMessage<'a> {
    to: Option<SocketAddr>,
    buffers: TinyVec<[&'a [u8]; 4]>,
}

impl<'a> OutputMessage<'a> {
    /// Message consisting of a single span.
    ///
    /// `to` is `None` for connected transports, which ignore it anyway.
    pub fn new(to: Option<SocketAddr>, data: &'a [u8]) -> Self {
        let mut buffers = TinyVec::new();
        buffers.push(data);
        OutputMessage { to, buffers }
    }

    /// Message made of several spans, sent back to back in iteration order.
    pub fn from_spans<I>(to: Option<SocketAddr>, spans: I) -> Self
    where
        I: IntoIterator<Item = &'a [u8]>,
    {
        OutputMessage {
            to,
            buffers: spans.into_iter().collect(),
        }
    }

    /// Destination address, if any.
    pub fn to(&self) -> Option<SocketAddr> {
        self.to
    }

    /// The spans making up this message.
    pub fn buffers(&self) -> &[&'a [u8]] {
        &self.buffers
    }

    /// Total length over all spans.
    pub fn len(&self) -> usize {
        self.buffers.iter().map(|b| b.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Owned contiguous copy of the message payload.
    pub fn compact(&self) -> Buf {
        Buf::compact(self.buffers.iter().copied())
    }
}

impl<'a> fmt::Debug for OutputMessage<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OutputMessage")
            .field("to", &self.to)
            .field("spans", &self.buffers.len())
            .field("len", &self.len())
            .finish()
    }
}

/// Incoming message, receiving into caller-provided spans.
///
/// The socket filling the message records how many bytes it wrote with
/// [`InputMessage::fill`] or [`InputMessage::set_len`].
pub struct InputMessage<'a> {
    buffers: TinyVec<[&'a mut [u8]; 4]>,
    length: usize,
    from: Option<SocketAddr>,
}

impl<'a> InputMessage<'a> {
    /// Message receiving into a single span.
    pub fn new(buf: &'a mut [u8]) -> Self {
        let mut buffers = TinyVec::new();
        buffers.push(buf);
        InputMessage {
            buffers,
            length: 0,
            from: None,
        }
    }

    /// Message receiving into several spans, filled in iteration order.
    pub fn from_spans<I>(spans: I) -> Self
    where
        I: IntoIterator<Item = &'a mut [u8]>,
    {
        InputMessage {
            buffers: spans.into_iter().collect(),
            length: 0,
            from: None,
        }
    }

    /// Total room over all spans.
    pub fn capacity(&self) -> usize {
        self.buffers.iter().map(|b| b.len()).sum()
    }

    /// Number of bytes received.
    pub fn len(&self) -> usize {
        self.length
    }

    pub fn is_empty(&self) -> bool {
        self.length == 0
    }

    /// Set the number of bytes received, for sockets writing into
    /// [`InputMessage::buffers_mut`] directly.
    pub fn set_len(&mut self, length: usize) {
        self.length = length;
    }

    /// Source address, if the transport reports one.
    pub fn from(&self) -> Option<SocketAddr> {
        self.from
    }

    pub fn set_from(&mut self, from: Option<SocketAddr>) {
        self.from = from;
    }

    pub fn buffers(&self) -> &[&'a mut [u8]] {
        &self.buffers
    }

    pub fn buffers_mut(&mut self) -> &mut [&'a mut [u8]] {
        &mut self.buffers
    }

    /// Scatter `data` over the spans and set the received length.
    ///
    /// Returns the number of bytes copied, which is less than `data.len()`
    /// if the message does not have room for all of it.
    pub fn fill(&mut self, data: &[u8]) -> usize {
        let mut offset = 0;

        for span in self.buffers.iter_mut() {
            if offset == data.len() {
                break;
            }
            let span: &mut [u8] = span;
            let n = span.len().min(data.len() - offset);
            span[..n].copy_from_slice(&data[offset..offset + n]);
            offset += n;
        }

        self.length = offset;
        offset
    }

    /// Gather the received bytes into one vector.
    pub fn to_vec(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.length);
        let mut left = self.length;

        for span in self.buffers.iter() {
            let n = span.len().min(left);
            out.extend_from_slice(&span[..n]);
            left -= n;
        }

        out
    }
}

impl<'a> fmt::Debug for InputMessage<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InputMessage")
            .field("from", &self.from)
            .field("spans", &self.buffers.len())
            .field("capacity", &self.capacity())
            .field("len", &self.length)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn output_spans_compact_in_order() {
        let header = [0xaa, 0xbb];
        let body = [1, 2, 3, 4, 5];
        let trailer = [0xff];

        let msg = OutputMessage::from_spans(None, [&header[..], &body[..], &trailer[..]]);
        assert_eq!(msg.len(), 8);
        assert_eq!(msg.buffers().len(), 3);
        assert_eq!(&*msg.compact(), &[0xaa, 0xbb, 1, 2, 3, 4, 5, 0xff]);
    }

    #[test]
    fn output_spill_past_inline_spans() {
        let spans: Vec<[u8; 1]> = (0u8..10).map(|i| [i]).collect();
        let msg = OutputMessage::from_spans(None, spans.iter().map(|s| &s[..]));
        assert_eq!(msg.len(), 10);
        assert_eq!(msg.compact().into_vec(), (0u8..10).collect::<Vec<_>>());
    }

    #[test]
    fn input_fill_scatters_over_spans() {
        let mut a = [0u8; 3];
        let mut b = [0u8; 4];
        let mut msg = InputMessage::from_spans([&mut a[..], &mut b[..]]);
        assert_eq!(msg.capacity(), 7);

        let n = msg.fill(&[1, 2, 3, 4, 5]);
        assert_eq!(n, 5);
        assert_eq!(msg.len(), 5);
        assert_eq!(msg.to_vec(), vec![1, 2, 3, 4, 5]);
        drop(msg);

        assert_eq!(a, [1, 2, 3]);
        assert_eq!(b, [4, 5, 0, 0]);
    }

    #[test]
    fn input_fill_truncates_to_capacity() {
        let mut a = [0u8; 2];
        let mut msg = InputMessage::new(&mut a);
        assert_eq!(msg.fill(&[9, 8, 7]), 2);
        assert_eq!(msg.to_vec(), vec![9, 8]);
    }

    #[test]
    fn debug_shows_sizes_only() {
        let data = b"payload";
        let msg = OutputMessage::new(None, data);
        assert_eq!(
            format!("{:?}", msg),
            "OutputMessage { to: None, spans: 1, len: 7 }"
        );
    }
}
