//! The socket contract shared by every transport.

use std::mem;
use std::net::SocketAddr;

use crate::{Error, InputMessage, OutputMessage};

/// A connected, non-blocking message transport.
///
/// All calls return immediately. "Nothing to read yet" is `Ok(0)`, not an
/// error and not a wait.
pub trait Socket {
    /// Send messages, in order.
    ///
    /// Returns the number of messages accepted by the transport.
    fn send_messages(&mut self, messages: &[OutputMessage<'_>]) -> Result<usize, Error>;

    /// Receive into `messages`.
    ///
    /// Returns the number of messages filled, `Ok(0)` if nothing is ready.
    fn recv_messages(&mut self, messages: &mut [InputMessage<'_>]) -> Result<usize, Error>;

    /// Whether the transport delivers in order and without loss.
    fn is_reliable(&self) -> bool;

    /// Release the underlying transport.
    fn close(&mut self);

    /// Local address of the transport.
    fn local_addr(&self) -> Option<SocketAddr> {
        None
    }

    /// Send a single contiguous buffer.
    ///
    /// Returns the number of bytes accepted, which is either all or nothing.
    fn send(&mut self, to: Option<SocketAddr>, data: &[u8]) -> Result<usize, Error> {
        let sent = self.send_messages(&[OutputMessage::new(to, data)])?;
        Ok(if sent == 1 { data.len() } else { 0 })
    }
}

impl<S: Socket + ?Sized> Socket for Box<S> {
    fn send_messages(&mut self, messages: &[OutputMessage<'_>]) -> Result<usize, Error> {
        (**self).send_messages(messages)
    }

    fn recv_messages(&mut self, messages: &mut [InputMessage<'_>]) -> Result<usize, Error> {
        (**self).recv_messages(messages)
    }

    fn is_reliable(&self) -> bool {
        (**self).is_reliable()
    }

    fn close(&mut self) {
        (**self).close()
    }

    fn local_addr(&self) -> Option<SocketAddr> {
        (**self).local_addr()
    }
}

/// Ownership slot for a wrapped socket.
///
/// `Absent` after the socket has been released. There is no way back.
#[derive(Debug)]
pub(crate) enum BaseSocket<S> {
    Owned(S),
    Absent,
}

impl<S: Socket> BaseSocket<S> {
    pub fn get(&self) -> Option<&S> {
        match self {
            BaseSocket::Owned(s) => Some(s),
            BaseSocket::Absent => None,
        }
    }

    pub fn get_mut(&mut self) -> Option<&mut S> {
        match self {
            BaseSocket::Owned(s) => Some(s),
            BaseSocket::Absent => None,
        }
    }

    /// Close and drop the socket, if still owned.
    ///
    /// Returns whether there was a socket to release.
    pub fn release(&mut self) -> bool {
        match mem::replace(self, BaseSocket::Absent) {
            BaseSocket::Owned(mut s) => {
                s.close();
                true
            }
            BaseSocket::Absent => false,
        }
    }
}
