//! Pseudo-SSL handshake socket.
//!
//! Some relay servers only accept connections that open with what looks like
//! an SSL handshake. [`PseudoSsl`] wraps an already connected [`Socket`],
//! sends a fixed client handshake, waits for a fixed server handshake, and
//! from then on passes everything straight through. There is no encryption and
//! no certificate checking, only two constant byte sequences.
//!
//! Writes made before the server handshake arrives are copied into a queue and
//! delivered in order once it does, so callers can start sending immediately.
//!
//! The crate is sans-IO in the sense that it never blocks and never spawns:
//! every call is driven by the owner's readiness loop.

#![forbid(unsafe_code)]
#![warn(clippy::all)]
// #![deny(missing_docs)]

#[macro_use]
extern crate log;

mod buffer;
pub use buffer::Buf;

mod config;
pub use config::{Config, ConfigBuilder, MAX_QUEUE_CAPACITY};

mod error;
pub use error::{Error, Received};

pub mod handshake;

mod message;
pub use message::{InputMessage, OutputMessage};

mod queue;

mod socket;
pub use socket::Socket;

mod pseudossl;
pub use pseudossl::{HandshakeState, PseudoSsl};
