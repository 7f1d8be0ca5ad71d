//! Bidirectional framing state for one terminal connection
//!
//! Couples the outgoing [`SequenceCounter`] with the incoming
//! [`FrameDecoder`]. One codec belongs to exactly one connection and is
//! driven from a single task; it has no internal locking.

use heapless::Vec;

use crate::frame::{
    DecodeEvent, DecoderStats, Frame, FrameDecoder, FrameError, Reply, SequenceCounter,
    MAX_FRAME_SIZE,
};

/// Frame encoder and decoder sharing one connection's sequence state
#[derive(Debug, Clone, Default)]
pub struct FrameCodec {
    sequence: SequenceCounter,
    decoder: FrameDecoder,
}

impl FrameCodec {
    /// Create a codec with the default payload limit
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a codec whose decoder drops payloads over `max_stuffed` wire bytes
    pub fn with_limit(max_stuffed: usize) -> Self {
        Self {
            sequence: SequenceCounter::new(),
            decoder: FrameDecoder::with_limit(max_stuffed),
        }
    }

    /// Encode `payload` into a wire frame carrying the next sequence number
    ///
    /// The sequence number is only consumed when encoding succeeds.
    pub fn encode(&mut self, payload: &[u8]) -> Result<Vec<u8, MAX_FRAME_SIZE>, FrameError> {
        let frame = Frame::new(payload, self.sequence.peek())?;
        let bytes = frame.encode_to_vec()?;
        self.sequence.advance();
        Ok(bytes)
    }

    /// Feed one received byte; see [`FrameDecoder::feed`]
    pub fn decode(&mut self, byte: u8) -> Option<Frame> {
        self.decoder.feed(byte)
    }

    /// Acknowledgement owed to the peer, if a frame just completed
    pub fn take_reply(&mut self) -> Option<Reply> {
        self.decoder.take_reply()
    }

    /// Last non-frame decoder outcome
    pub fn take_event(&mut self) -> Option<DecodeEvent> {
        self.decoder.take_event()
    }

    /// Sequence number the next outgoing frame will carry
    pub fn next_sequence(&self) -> u8 {
        self.sequence.peek()
    }

    /// Sequence number of the last delivered incoming frame
    pub fn last_accepted(&self) -> Option<u8> {
        self.decoder.last_accepted()
    }

    /// Whether the decoder is between frames with nothing pending
    pub fn is_idle(&self) -> bool {
        self.decoder.is_idle()
    }

    /// Decoder error counters
    pub fn stats(&self) -> &DecoderStats {
        self.decoder.stats()
    }

    /// Start a new session: sequence back to the first-contact marker,
    /// partial frame and accepted sequence forgotten
    pub fn reset(&mut self) {
        self.sequence.reset();
        self.decoder.reset();
    }
}
