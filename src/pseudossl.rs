// Pseudo-SSL handshake flow:
//
// 1. On creation, send CLIENT_HANDSHAKE to the base socket.
// 2. Pending: outgoing messages are copied into the pending queue. Reads pull
//    one message of SERVER_HANDSHAKE length from the base socket.
//    - nothing ready / transport error: returned as is, still Pending
//    - exact SERVER_HANDSHAKE: Established, flush the queue in order
//    - anything else: Failed, the base socket is closed and dropped
// 3. Established: every call goes straight to the base socket.
// 4. Failed: sends error, reads return 0.
//
// There is no timeout. A server that never answers leaves the socket Pending
// until the owner closes it.

use std::fmt;
use std::net::SocketAddr;
use std::sync::Arc;

use crate::handshake::{self, CLIENT_HANDSHAKE, SERVER_HANDSHAKE_LEN};
use crate::queue::PendingQueue;
use crate::socket::BaseSocket;
use crate::{Config, Error, InputMessage, OutputMessage, Socket};

/// Where a [`PseudoSsl`] is in its handshake.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandshakeState {
    /// Client handshake sent, server handshake not yet seen.
    Pending,
    /// Server handshake matched. Pure pass-through.
    Established,
    /// Server handshake did not match. The base socket is gone.
    Failed,
}

/// Socket wrapper performing the pseudo-SSL handshake.
///
/// Wraps an already connected [`Socket`] and implements [`Socket`] itself.
/// Data sent before the handshake completes is held back and delivered, in
/// order, as soon as the server handshake arrives.
///
/// ```
/// # use pseudossl::{Error, InputMessage, OutputMessage, Socket};
/// # struct Tcp;
/// # impl Socket for Tcp {
/// #     fn send_messages(&mut self, m: &[OutputMessage<'_>]) -> Result<usize, Error> { Ok(m.len()) }
/// #     fn recv_messages(&mut self, _: &mut [InputMessage<'_>]) -> Result<usize, Error> { Ok(0) }
/// #     fn is_reliable(&self) -> bool { true }
/// #     fn close(&mut self) {}
/// # }
/// use pseudossl::{HandshakeState, PseudoSsl};
///
/// let mut sock = PseudoSsl::new(Tcp);
///
/// // Queued until the server has answered.
/// sock.send(None, b"hello").unwrap();
/// assert_eq!(sock.pending_writes(), 1);
///
/// // Nothing from the server yet.
/// let mut buf = [0; 1500];
/// let n = sock.recv_messages(&mut [InputMessage::new(&mut buf)]).unwrap();
/// assert_eq!(n, 0);
/// assert_eq!(sock.state(), HandshakeState::Pending);
///
/// sock.close();
/// ```
pub struct PseudoSsl<S: Socket> {
    config: Arc<Config>,
    state: HandshakeState,
    base: BaseSocket<S>,
    queue: PendingQueue,
    local_addr: Option<SocketAddr>,
}

impl<S: Socket> PseudoSsl<S> {
    /// Wrap `base` with the default configuration.
    ///
    /// Sends the client handshake right away.
    pub fn new(base: S) -> Self {
        Self::with_config(Arc::new(Config::default()), base)
    }

    /// Wrap `base`, sending the client handshake right away.
    ///
    /// A failure to send is not reported here. It shows up on a later call,
    /// typically as a transport error or a server that never answers.
    pub fn with_config(config: Arc<Config>, mut base: S) -> Self {
        // Connected transport, the destination is ignored.
        match base.send(None, &CLIENT_HANDSHAKE) {
            Ok(n) if n == CLIENT_HANDSHAKE.len() => {
                debug!("Sent client handshake: {} bytes", n);
            }
            Ok(n) => {
                warn!(
                    "Client handshake not accepted: {} of {} bytes",
                    n,
                    CLIENT_HANDSHAKE.len()
                );
            }
            Err(e) => {
                warn!("Failed to send client handshake: {}", e);
            }
        }

        let local_addr = base.local_addr();

        PseudoSsl {
            queue: PendingQueue::with_capacity(config.queue_capacity()),
            config,
            state: HandshakeState::Pending,
            base: BaseSocket::Owned(base),
            local_addr,
        }
    }

    pub fn state(&self) -> HandshakeState {
        self.state
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Number of messages waiting for the handshake to complete.
    pub fn pending_writes(&self) -> usize {
        self.queue.len()
    }

    /// Total payload bytes waiting for the handshake to complete.
    pub fn pending_bytes(&self) -> usize {
        self.queue.total_bytes()
    }

    /// The wrapped socket, unless released.
    ///
    /// Shared access only. Writes to the base bypassing the handshake are
    /// not possible:
    ///
    /// ```compile_fail
    /// # use pseudossl::{Error, InputMessage, OutputMessage, PseudoSsl, Socket};
    /// # struct Tcp;
    /// # impl Socket for Tcp {
    /// #     fn send_messages(&mut self, m: &[OutputMessage<'_>]) -> Result<usize, Error> { Ok(m.len()) }
    /// #     fn recv_messages(&mut self, _: &mut [InputMessage<'_>]) -> Result<usize, Error> { Ok(0) }
    /// #     fn is_reliable(&self) -> bool { true }
    /// #     fn close(&mut self) {}
    /// # }
    /// let mut sock = PseudoSsl::new(Tcp);
    /// let base: &mut Tcp = sock.base_mut().unwrap();
    /// base.send(None, b"early").unwrap();
    /// ```
    pub fn base(&self) -> Option<&S> {
        self.base.get()
    }

    fn set_state(&mut self, new_state: HandshakeState) {
        trace!("{:?} -> {:?}", self.state, new_state);
        self.state = new_state;
    }

    fn recv_server_handshake(&mut self) -> Result<usize, Error> {
        let Some(base) = self.base.get_mut() else {
            return Err(Error::Closed);
        };

        let mut data = [0u8; SERVER_HANDSHAKE_LEN];
        let (received, len) = {
            let mut messages = [InputMessage::new(&mut data)];
            let received = base.recv_messages(&mut messages)?;
            (received, messages[0].len())
        };

        if received == 0 {
            return Ok(0);
        }

        match handshake::verify_server_handshake(received, len, &data) {
            Ok(()) => {
                self.set_state(HandshakeState::Established);
                self.flush_pending();
                // The handshake itself is not application data.
                Ok(0)
            }
            Err(received) => {
                warn!(
                    "Server handshake mismatch ({}), releasing base socket",
                    received
                );
                self.base.release();
                self.set_state(HandshakeState::Failed);
                Err(Error::mismatch(received))
            }
        }
    }

    fn flush_pending(&mut self) {
        let writes = self.queue.take();

        let Some(base) = self.base.get_mut() else {
            return;
        };

        if !writes.is_empty() {
            debug!("Sending queued writes: {}", writes.len());
        }

        for write in writes {
            match base.send(write.to, &write.buf) {
                Ok(n) if n == write.buf.len() => {}
                Ok(_) => warn!("Queued write not accepted: {:?}", write),
                Err(e) => warn!("Failed to send queued write {:?}: {}", write, e),
            }
        }
    }
}

impl<S: Socket> Socket for PseudoSsl<S> {
    fn send_messages(&mut self, messages: &[OutputMessage<'_>]) -> Result<usize, Error> {
        match self.state {
            HandshakeState::Pending => {
                if self.base.get().is_none() {
                    return Err(Error::Closed);
                }
                for message in messages {
                    self.queue.push(message);
                }
                Ok(messages.len())
            }
            HandshakeState::Established => match self.base.get_mut() {
                Some(base) => base.send_messages(messages),
                None => Err(Error::Closed),
            },
            HandshakeState::Failed => Err(Error::HandshakeFailed),
        }
    }

    fn recv_messages(&mut self, messages: &mut [InputMessage<'_>]) -> Result<usize, Error> {
        match self.state {
            HandshakeState::Pending => self.recv_server_handshake(),
            HandshakeState::Established => match self.base.get_mut() {
                Some(base) => base.recv_messages(messages),
                None => Ok(0),
            },
            // The mismatch was reported once, that is enough.
            HandshakeState::Failed => Ok(0),
        }
    }

    /// Always true, whatever the base socket says.
    ///
    /// Queueing until the handshake completes relies on in order, lossless
    /// delivery underneath.
    fn is_reliable(&self) -> bool {
        true
    }

    fn close(&mut self) {
        let released = self.base.release();
        let discarded = self.queue.discard();
        debug!(
            "Close in state {:?}, released base: {}, discarded writes: {}",
            self.state, released, discarded
        );
    }

    fn local_addr(&self) -> Option<SocketAddr> {
        self.local_addr
    }
}

impl<S: Socket> Drop for PseudoSsl<S> {
    fn drop(&mut self) {
        if self.base.release() {
            debug!("Dropped without close, released base");
        }
    }
}

impl<S: Socket> fmt::Debug for PseudoSsl<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PseudoSsl")
            .field("state", &self.state)
            .field("base", &self.base.get().is_some())
            .field("queue", &self.queue)
            .field("local_addr", &self.local_addr)
            .finish()
    }
}
