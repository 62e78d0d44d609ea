use std::io;

use thiserror::Error;

use crate::handshake::SERVER_HANDSHAKE;

/// Errors reported by a [`Socket`][crate::Socket].
#[derive(Debug, Error)]
pub enum Error {
    /// The first read while pending was not the expected server handshake.
    ///
    /// This is fatal. The base socket is released and the handshake socket
    /// stays failed.
    #[error("Handshake mismatch, expected {expected} byte server handshake but got: {received}")]
    HandshakeMismatch {
        /// Length of the expected server handshake.
        expected: usize,
        /// What the base socket handed back instead.
        received: Received,
    },

    /// Send attempted after the handshake failed.
    #[error("Handshake failed, base socket released")]
    HandshakeFailed,

    /// Operation needs the base socket, but the socket has been closed.
    #[error("Socket closed")]
    Closed,

    /// Invalid configuration.
    #[error("Config error: {0}")]
    Config(String),

    /// Transport error from the base socket.
    #[error("Transport error: {0}")]
    Io(#[from] io::Error),
}

impl Error {
    pub(crate) fn mismatch(received: Received) -> Self {
        Error::HandshakeMismatch {
            expected: SERVER_HANDSHAKE.len(),
            received,
        }
    }
}

/// Summary of a read that did not match the server handshake.
///
/// Only sizes and offsets, never payload bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Received {
    /// The base socket reported this many messages instead of exactly one.
    Messages(usize),
    /// One message, but of the wrong length.
    Length(usize),
    /// One message of the right length, first differing at this offset.
    Content(usize),
}

impl std::fmt::Display for Received {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Received::Messages(n) => write!(f, "{} messages", n),
            Received::Length(n) => write!(f, "{} bytes", n),
            Received::Content(at) => write!(f, "differing byte at offset {}", at),
        }
    }
}
