#![no_main]

//! Fuzz target for the first read of the handshake.
//!
//! Feeds arbitrary bytes as the server's answer, split into chunks by the
//! first input byte, and checks the state machine never panics and never
//! lets queued data through without the exact server handshake.

use libfuzzer_sys::fuzz_target;

use pseudossl::handshake::SERVER_HANDSHAKE;
use pseudossl::{Error, HandshakeState, InputMessage, OutputMessage, PseudoSsl, Socket};

#[derive(Default)]
struct Feed {
    chunks: Vec<Vec<u8>>,
    sent: usize,
}

impl Socket for Feed {
    fn send_messages(&mut self, messages: &[OutputMessage<'_>]) -> Result<usize, Error> {
        self.sent += messages.len();
        Ok(messages.len())
    }

    fn recv_messages(&mut self, messages: &mut [InputMessage<'_>]) -> Result<usize, Error> {
        if self.chunks.is_empty() {
            return Ok(0);
        }
        let chunk = self.chunks.remove(0);
        messages[0].fill(&chunk);
        Ok(1)
    }

    fn is_reliable(&self) -> bool {
        true
    }

    fn close(&mut self) {}
}

fuzz_target!(|data: &[u8]| {
    let Some((&split, rest)) = data.split_first() else {
        return;
    };
    let split = (split as usize).max(1);

    let feed = Feed {
        chunks: rest.chunks(split).map(|c| c.to_vec()).collect(),
        sent: 0,
    };
    let n_chunks = feed.chunks.len();
    // Reads are capped at the handshake length, anything beyond stays unread.
    let first_is_handshake = feed
        .chunks
        .first()
        .map_or(false, |c| c.starts_with(&SERVER_HANDSHAKE));

    let mut sock = PseudoSsl::new(feed);
    sock.send(None, b"queued").unwrap();

    let mut buf = [0u8; 2048];
    for _ in 0..n_chunks {
        let mut messages = [InputMessage::new(&mut buf)];
        let _ = sock.recv_messages(&mut messages);
    }

    match sock.state() {
        HandshakeState::Pending => assert_eq!(n_chunks, 0),
        HandshakeState::Established => {
            assert!(first_is_handshake);
            // Client handshake plus the queued write.
            assert_eq!(sock.base().map(|b| b.sent), Some(2));
        }
        HandshakeState::Failed => {
            assert!(!first_is_handshake);
            assert!(sock.base().is_none());
        }
    }

    sock.close();
});
