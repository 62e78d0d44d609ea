//! Queue of writes held back until the handshake completes.
//!
//! Debug output only shows metadata, never payload data.

use std::collections::VecDeque;
use std::fmt;
use std::net::SocketAddr;

use crate::buffer::Buf;
use crate::OutputMessage;

/// One outbound message, compacted and owned.
pub(crate) struct PendingWrite {
    pub to: Option<SocketAddr>,
    pub buf: Buf,
}

impl fmt::Debug for PendingWrite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PendingWrite")
            .field("to", &self.to)
            .field("len", &self.buf.len())
            .finish()
    }
}

/// FIFO of [`PendingWrite`].
pub(crate) struct PendingQueue(VecDeque<PendingWrite>);

impl PendingQueue {
    pub fn with_capacity(capacity: usize) -> Self {
        Self(VecDeque::with_capacity(capacity))
    }

    /// Copy the message out of the caller's spans and append it.
    pub fn push(&mut self, message: &OutputMessage<'_>) {
        let write = PendingWrite {
            to: message.to(),
            buf: message.compact(),
        };
        trace!("Queue {:?}", write);
        self.0.push_back(write);
    }

    /// Take every queued write, oldest first, leaving the queue empty and
    /// without an allocation.
    pub fn take(&mut self) -> VecDeque<PendingWrite> {
        std::mem::take(&mut self.0)
    }

    /// Drop every queued write unsent. Returns how many there were.
    pub fn discard(&mut self) -> usize {
        self.take().len()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn total_bytes(&self) -> usize {
        self.0.iter().map(|w| w.buf.len()).sum()
    }
}

impl fmt::Debug for PendingQueue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PendingQueue")
            .field("writes", &self.0.len())
            .field("total_bytes", &self.total_bytes())
            .finish()
    }
}
