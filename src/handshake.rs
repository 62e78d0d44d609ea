//! The fixed pseudo-SSL preambles.
//!
//! Some relay servers expect every connection to open with what looks like an
//! SSL handshake before they let traffic through. Nothing is negotiated: the
//! client sends [`CLIENT_HANDSHAKE`] and the server answers with exactly
//! [`SERVER_HANDSHAKE`]. Neither is parsed, only compared.

use crate::error::Received;

/// Length of [`CLIENT_HANDSHAKE`].
pub const CLIENT_HANDSHAKE_LEN: usize = 72;

/// Length of [`SERVER_HANDSHAKE`].
pub const SERVER_HANDSHAKE_LEN: usize = 79;

/// Sent once, when the handshake socket is created.
///
/// An SSLv2-framed ClientHello.
pub const CLIENT_HANDSHAKE: [u8; CLIENT_HANDSHAKE_LEN] = [
    0x80, 0x46, 0x01, 0x03, 0x01, 0x00, 0x2d, 0x00, //
    0x00, 0x00, 0x10, 0x01, 0x00, 0x80, 0x03, 0x00, //
    0x80, 0x07, 0x00, 0xc0, 0x06, 0x00, 0x40, 0x02, //
    0x00, 0x80, 0x04, 0x00, 0x80, 0x00, 0x00, 0x04, //
    0x00, 0xfe, 0xff, 0x00, 0x00, 0x0a, 0x00, 0xfe, //
    0xfe, 0x00, 0x00, 0x09, 0x00, 0x00, 0x64, 0x00, //
    0x00, 0x62, 0x00, 0x00, 0x03, 0x00, 0x00, 0x06, //
    0x1f, 0x17, 0x0c, 0xa6, 0x2f, 0x00, 0x78, 0xfc, //
    0x46, 0x55, 0x2e, 0xb1, 0x83, 0x39, 0xf1, 0xea, //
];

/// The exact first message expected from the server.
///
/// A TLS 1.0 handshake record carrying a ServerHello.
pub const SERVER_HANDSHAKE: [u8; SERVER_HANDSHAKE_LEN] = [
    0x16, 0x03, 0x01, 0x00, 0x4a, 0x02, 0x00, 0x00, //
    0x46, 0x03, 0x01, 0x42, 0x85, 0x45, 0xa7, 0x27, //
    0xa9, 0x5d, 0xa0, 0xb3, 0xc5, 0xe7, 0x53, 0xda, //
    0x48, 0x2b, 0x3f, 0xc6, 0x5a, 0xca, 0x89, 0xc1, //
    0x58, 0x52, 0xa1, 0x78, 0x3c, 0x5b, 0x17, 0x46, //
    0x00, 0x85, 0x3f, 0x20, 0x0e, 0xd3, 0x06, 0x72, //
    0x5b, 0x5b, 0x1b, 0x5f, 0x15, 0xac, 0x13, 0xf9, //
    0x88, 0x53, 0x9d, 0x9b, 0xe8, 0x3d, 0x7b, 0x0c, //
    0x30, 0x32, 0x6e, 0x38, 0x4d, 0xa2, 0x75, 0x57, //
    0x41, 0x6c, 0x34, 0x5c, 0x00, 0x04, 0x00, //
];

/// Check the outcome of the first read against [`SERVER_HANDSHAKE`].
///
/// * `received` - message count reported by the base socket (non-zero).
/// * `len` - length of the single message read.
/// * `data` - the read buffer.
pub(crate) fn verify_server_handshake(
    received: usize,
    len: usize,
    data: &[u8],
) -> Result<(), Received> {
    if received != 1 {
        return Err(Received::Messages(received));
    }

    if len != SERVER_HANDSHAKE_LEN || data.len() < len {
        return Err(Received::Length(len));
    }

    match data[..len]
        .iter()
        .zip(SERVER_HANDSHAKE.iter())
        .position(|(a, b)| a != b)
    {
        Some(offset) => Err(Received::Content(offset)),
        None => Ok(()),
    }
}
