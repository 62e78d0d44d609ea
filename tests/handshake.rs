//! Handshake state machine: client preamble, server preamble match and mismatch.


use std::io;

use pseudossl::handshake::{CLIENT_HANDSHAKE, SERVER_HANDSHAKE};
use pseudossl::{Error, HandshakeState, InputMessage, PseudoSsl, Received, Socket};
use pseudossl_common::*;

#[test]
fn client_handshake_is_first_and_only_write() {
    let _ = env_logger::try_init();

    let (base, rec) = MockSocket::new();
    let mut sock = PseudoSsl::new(base);

    // The handshake goes out before anything else is asked of the base.
    assert_eq!(
        rec.calls(),
        vec![
            Call::Send {
                to: None,
                data: CLIENT_HANDSHAKE.to_vec(),
            },
            Call::LocalAddr,
        ]
    );

    // Pending sends and reads add no writes of their own.
    sock.send(None, b"early").unwrap();
    assert_eq!(recv(&mut sock).unwrap(), 0);
    assert_eq!(rec.calls()[2..], [Call::Recv]);
    assert_eq!(sock.state(), HandshakeState::Pending);
}

#[test]
fn client_handshake_send_failure_is_not_fatal() {
    let _ = env_logger::try_init();

    let (base, rec) = MockSocket::new();
    rec.fail_sends(io::ErrorKind::BrokenPipe);

    let sock = PseudoSsl::new(base);
    assert_eq!(sock.state(), HandshakeState::Pending);
    assert_eq!(rec.sends(), vec![CLIENT_HANDSHAKE.to_vec()]);
}

#[test]
fn server_handshake_establishes_and_returns_zero() {
    let _ = env_logger::try_init();

    let (mut sock, rec) = pending();
    rec.reply_server_handshake();

    let mut buf = [0xeeu8; 256];
    let mut messages = [InputMessage::new(&mut buf)];
    let n = sock.recv_messages(&mut messages).unwrap();

    assert_eq!(n, 0);
    assert_eq!(messages[0].len(), 0, "handshake is not application data");
    drop(messages);
    assert!(buf.iter().all(|b| *b == 0xee));

    assert_eq!(sock.state(), HandshakeState::Established);
    assert_eq!(rec.calls(), vec![Call::Recv]);
}

#[test]
fn no_data_keeps_pending() {
    let _ = env_logger::try_init();

    let (mut sock, rec) = pending();
    sock.send(None, &payload(0, 10)).unwrap();

    assert_eq!(recv(&mut sock).unwrap(), 0);
    assert_eq!(recv(&mut sock).unwrap(), 0);

    assert_eq!(sock.state(), HandshakeState::Pending);
    assert_eq!(sock.pending_writes(), 1);
    assert_eq!(sock.pending_bytes(), 10);
    assert_eq!(rec.calls(), vec![Call::Recv, Call::Recv]);

    // Still able to complete later.
    rec.reply_server_handshake();
    assert_eq!(recv(&mut sock).unwrap(), 0);
    assert_eq!(sock.state(), HandshakeState::Established);
}

#[test]
fn transport_error_propagates_and_keeps_pending() {
    let _ = env_logger::try_init();

    let (mut sock, rec) = pending();
    rec.reply(Reply::Error(io::ErrorKind::ConnectionReset));

    let err = recv(&mut sock).unwrap_err();
    assert!(
        matches!(err, Error::Io(ref e) if e.kind() == io::ErrorKind::ConnectionReset),
        "unexpected error: {err}"
    );
    assert_eq!(sock.state(), HandshakeState::Pending);
    assert!(sock.base().is_some());
    assert_eq!(rec.closes(), 0);
}

#[test]
fn short_server_handshake_fails() {
    let _ = env_logger::try_init();

    let (mut sock, rec) = pending();
    rec.reply_data(&SERVER_HANDSHAKE[..SERVER_HANDSHAKE.len() - 1]);

    let err = recv(&mut sock).unwrap_err();
    assert!(matches!(
        err,
        Error::HandshakeMismatch {
            expected: 79,
            received: Received::Length(78),
        }
    ));

    assert_eq!(sock.state(), HandshakeState::Failed);
    assert!(sock.base().is_none());
    assert_eq!(rec.closes(), 1);
    assert!(rec.is_dropped());
}

#[test]
fn one_differing_byte_fails() {
    let _ = env_logger::try_init();

    let (mut sock, rec) = pending();
    let mut reply = SERVER_HANDSHAKE.to_vec();
    reply[50] ^= 0x01;
    rec.reply_data(&reply);

    let err = recv(&mut sock).unwrap_err();
    assert!(matches!(
        err,
        Error::HandshakeMismatch {
            received: Received::Content(50),
            ..
        }
    ));
    assert_eq!(sock.state(), HandshakeState::Failed);
    assert!(rec.is_dropped());
    rec.clear_calls();

    // Sends fail, reads are quiet, the old base is never touched.
    assert!(matches!(
        sock.send(None, &payload(0, 4)),
        Err(Error::HandshakeFailed)
    ));
    assert_eq!(recv(&mut sock).unwrap(), 0);
    assert_eq!(recv(&mut sock).unwrap(), 0);
    assert!(rec.calls().is_empty());
}

#[test]
fn wrong_message_count_fails() {
    let _ = env_logger::try_init();

    let (mut sock, rec) = pending();
    rec.reply(Reply::Count(2, SERVER_HANDSHAKE.to_vec()));

    let err = recv(&mut sock).unwrap_err();
    assert!(matches!(
        err,
        Error::HandshakeMismatch {
            received: Received::Messages(2),
            ..
        }
    ));
    assert_eq!(sock.state(), HandshakeState::Failed);
}

#[test]
fn failure_discards_pending_writes() {
    let _ = env_logger::try_init();

    let (mut sock, rec) = pending();
    sock.send(None, &payload(0, 10)).unwrap();
    sock.send(None, &payload(10, 20)).unwrap();

    rec.reply_data(b"HTTP/1.1 400 Bad Request\r\n\r\n");
    assert!(recv(&mut sock).is_err());

    // Nothing beyond the client handshake ever reached the wire.
    assert!(rec.sends().is_empty());

    sock.close();
    assert_eq!(sock.pending_writes(), 0);
    assert_eq!(rec.closes(), 1, "base closed once, on failure");
}

#[test]
fn server_handshake_only_checked_once() {
    let _ = env_logger::try_init();

    let (mut sock, rec) = established();

    // A second copy of the handshake is ordinary data now.
    rec.reply_server_handshake();
    let (data, _) = recv_data(&mut sock).unwrap().expect("data");
    assert_eq!(data, SERVER_HANDSHAKE.to_vec());
    assert_eq!(sock.state(), HandshakeState::Established);
}

#[test]
fn oversized_first_reply_compares_prefix() {
    let _ = env_logger::try_init();

    let (mut sock, rec) = pending();
    sock.send(None, b"queued").unwrap();

    // The read has room for the handshake only. What follows it is not
    // looked at by the handshake read.
    let mut reply = SERVER_HANDSHAKE.to_vec();
    reply.extend_from_slice(&[0xab; 8]);
    rec.reply_data(&reply);

    assert_eq!(recv(&mut sock).unwrap(), 0);
    assert_eq!(sock.state(), HandshakeState::Established);
    assert_eq!(rec.sends(), vec![b"queued".to_vec()]);
}

#[test]
fn oversized_first_reply_with_bad_prefix_fails() {
    let _ = env_logger::try_init();

    let (mut sock, rec) = pending();
    let mut reply = SERVER_HANDSHAKE.to_vec();
    reply[0] = 0x17;
    reply.extend_from_slice(&[0xab; 8]);
    rec.reply_data(&reply);

    let err = recv(&mut sock).unwrap_err();
    assert!(matches!(
        err,
        Error::HandshakeMismatch {
            received: Received::Content(0),
            ..
        }
    ));
    assert_eq!(sock.state(), HandshakeState::Failed);
}
