//! Frame encoding and decoding for the EuroBraille link.
//!
//! Frame format:
//! - SOH (1 byte): 0x01 start of frame
//! - PAYLOAD (0-512 stuffed bytes): one or more messages
//! - SEQUENCE (1 byte): 127 for the first frame, then 128..=255 cycling
//! - PARITY (1 byte): XOR of all unstuffed payload bytes and the sequence byte
//! - EOT (1 byte): 0x04 end of frame
//!
//! Any payload, sequence or parity byte equal to SOH, EOT, DLE, ACK or NACK
//! is preceded by a DLE on the wire. The DLE itself is never doubled; a
//! payload DLE is sent as `DLE DLE` only because the second one is the
//! escaped data byte.

use heapless::Vec;

/// Start of frame
pub const SOH: u8 = 0x01;
/// End of frame
pub const EOT: u8 = 0x04;
/// Positive acknowledgement
pub const ACK: u8 = 0x06;
/// Escape: the next byte is literal data
pub const DLE: u8 = 0x10;
/// Negative acknowledgement, followed by an [`ErrorCode`] byte
pub const NACK: u8 = 0x15;

/// Maximum stuffed payload size accepted or produced, in wire bytes
pub const MAX_STUFFED_PAYLOAD: usize = 512;

/// Maximum unstuffed payload size
pub const MAX_PAYLOAD_SIZE: usize = MAX_STUFFED_PAYLOAD;

/// Sequence and parity, each possibly escaped
const MAX_TRAILER: usize = 4;

/// Maximum complete frame size (SOH + stuffed payload + trailer + EOT)
pub const MAX_FRAME_SIZE: usize = 1 + MAX_STUFFED_PAYLOAD + MAX_TRAILER + 1;

/// Unstuffed body capacity: payload plus sequence and parity
const MAX_BODY_SIZE: usize = MAX_PAYLOAD_SIZE + 2;

/// Sequence number of the first frame of a session
pub const FIRST_SEQUENCE: u8 = 127;

/// Sequence number the counter wraps back to after 255
const WRAP_SEQUENCE: u8 = 128;

/// Errors that can occur during frame construction or encoding
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FrameError {
    /// Payload exceeds the maximum stuffed size
    PayloadTooLarge,
    /// Buffer too small for encoding
    BufferTooSmall,
}

impl core::fmt::Display for FrameError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            FrameError::PayloadTooLarge => f.write_str("payload too large for one frame"),
            FrameError::BufferTooSmall => f.write_str("encode buffer too small"),
        }
    }
}

impl core::error::Error for FrameError {}

/// Error codes carried after a NACK
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ErrorCode {
    /// Parity mismatch
    Parity,
    /// Unexpected frame number
    FrameNumber,
    /// Bad length
    Length,
    /// Unknown command
    Command,
    /// Bad data
    Data,
    /// Syntax error
    Syntax,
}

impl ErrorCode {
    /// Parse an error code from its wire byte
    pub fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            0x01 => Some(ErrorCode::Parity),
            0x02 => Some(ErrorCode::FrameNumber),
            0x03 => Some(ErrorCode::Length),
            0x04 => Some(ErrorCode::Command),
            0x05 => Some(ErrorCode::Data),
            0x06 => Some(ErrorCode::Syntax),
            _ => None,
        }
    }

    /// Convert to wire byte
    pub fn to_byte(self) -> u8 {
        match self {
            ErrorCode::Parity => 0x01,
            ErrorCode::FrameNumber => 0x02,
            ErrorCode::Length => 0x03,
            ErrorCode::Command => 0x04,
            ErrorCode::Data => 0x05,
            ErrorCode::Syntax => 0x06,
        }
    }
}

/// Acknowledgement the receiver owes the sender after a complete frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Reply {
    /// Frame accepted (or recognised as a retransmission)
    Ack,
    /// Frame rejected
    Nack(ErrorCode),
}

impl Reply {
    /// Wire bytes of this reply
    pub fn to_bytes(self) -> Vec<u8, 2> {
        let mut bytes = Vec::new();
        match self {
            Reply::Ack => {
                let _ = bytes.push(ACK);
            }
            Reply::Nack(code) => {
                let _ = bytes.push(NACK);
                let _ = bytes.push(code.to_byte());
            }
        }
        bytes
    }
}

/// Something the decoder noticed that did not produce a frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DecodeEvent {
    /// Parity mismatch; a NACK is owed
    ParityError,
    /// Same sequence as the last accepted frame; an ACK is owed
    Duplicate { sequence: u8 },
    /// Payload exceeded the stuffed size limit
    Oversized,
    /// Frame too short to hold sequence and parity
    Runt,
    /// A partial frame was dropped by a new SOH, ACK or NACK
    Abandoned { len: usize },
    /// The peer acknowledged our last frame
    PeerAck,
    /// The peer rejected our last frame with this raw error code
    PeerNack { code: u8 },
}

/// Running counters of recoverable transport errors
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DecoderStats {
    pub frames: u32,
    pub parity_errors: u32,
    pub duplicates: u32,
    pub oversized: u32,
    pub runts: u32,
    pub abandoned: u32,
    pub stray_bytes: u32,
    pub peer_nacks: u32,
}

/// Whether a byte must be preceded by DLE on the wire
pub const fn needs_escape(byte: u8) -> bool {
    matches!(byte, SOH | EOT | DLE | ACK | NACK)
}

/// Parity over the unstuffed payload and the sequence byte
pub fn parity(payload: &[u8], sequence: u8) -> u8 {
    payload.iter().fold(sequence, |acc, &byte| acc ^ byte)
}

/// Number of wire bytes `payload` occupies once stuffed
pub fn stuffed_len(payload: &[u8]) -> usize {
    payload
        .iter()
        .map(|&byte| if needs_escape(byte) { 2 } else { 1 })
        .sum()
}

/// A decoded, parity-checked frame
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    /// Unstuffed payload
    pub payload: Vec<u8, MAX_PAYLOAD_SIZE>,
    /// Sequence number assigned by the sender
    pub sequence: u8,
}

impl Frame {
    /// Create a new frame with the given payload and sequence number
    pub fn new(payload: &[u8], sequence: u8) -> Result<Self, FrameError> {
        if stuffed_len(payload) > MAX_STUFFED_PAYLOAD {
            return Err(FrameError::PayloadTooLarge);
        }

        let mut payload_vec = Vec::new();
        payload_vec
            .extend_from_slice(payload)
            .map_err(|_| FrameError::PayloadTooLarge)?;

        Ok(Self {
            payload: payload_vec,
            sequence,
        })
    }

    /// Parity byte this frame carries on the wire
    pub fn parity(&self) -> u8 {
        parity(&self.payload, self.sequence)
    }

    /// Encode this frame into a byte buffer
    ///
    /// Returns the number of bytes written
    pub fn encode(&self, buffer: &mut [u8]) -> Result<usize, FrameError> {
        let stuffed = stuffed_len(&self.payload);
        if stuffed > MAX_STUFFED_PAYLOAD {
            return Err(FrameError::PayloadTooLarge);
        }

        let parity = self.parity();
        let trailer = stuffed_len(&[self.sequence, parity]);
        let frame_len = 1 + stuffed + trailer + 1;
        if buffer.len() < frame_len {
            return Err(FrameError::BufferTooSmall);
        }

        let mut pos = 0;
        buffer[pos] = SOH;
        pos += 1;
        for &byte in self.payload.iter().chain([self.sequence, parity].iter()) {
            if needs_escape(byte) {
                buffer[pos] = DLE;
                pos += 1;
            }
            buffer[pos] = byte;
            pos += 1;
        }
        buffer[pos] = EOT;
        pos += 1;

        Ok(pos)
    }

    /// Encode this frame into a heapless Vec
    pub fn encode_to_vec(&self) -> Result<Vec<u8, MAX_FRAME_SIZE>, FrameError> {
        let mut buffer = [0u8; MAX_FRAME_SIZE];
        let len = self.encode(&mut buffer)?;
        let mut vec = Vec::new();
        vec.extend_from_slice(&buffer[..len])
            .map_err(|_| FrameError::BufferTooSmall)?;
        Ok(vec)
    }
}

/// Outgoing sequence numbers: 127 first, then 128..=255, wrapping to 128
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SequenceCounter {
    next: u8,
}

impl Default for SequenceCounter {
    fn default() -> Self {
        Self::new()
    }
}

impl SequenceCounter {
    /// Counter positioned at the first-contact marker
    pub const fn new() -> Self {
        Self {
            next: FIRST_SEQUENCE,
        }
    }

    /// Sequence number the next frame will carry
    pub fn peek(&self) -> u8 {
        self.next
    }

    /// Take the next sequence number and advance
    pub fn advance(&mut self) -> u8 {
        let current = self.next;
        self.next = if current == u8::MAX {
            WRAP_SEQUENCE
        } else {
            current + 1
        };
        current
    }

    /// Start over at the first-contact marker
    pub fn reset(&mut self) {
        self.next = FIRST_SEQUENCE;
    }
}

/// State machine for decoding incoming frames, one byte at a time
#[derive(Debug, Clone)]
pub struct FrameDecoder {
    state: DecodeState,
    /// Unstuffed bytes captured since SOH
    body: Vec<u8, MAX_BODY_SIZE>,
    /// Wire bytes captured since SOH, escapes included
    stuffed: usize,
    /// Bit 0: last body byte was escaped, bit 1: the one before
    tail_escapes: u8,
    max_stuffed: usize,
    last_accepted: Option<u8>,
    reply: Option<Reply>,
    event: Option<DecodeEvent>,
    stats: DecoderStats,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DecodeState {
    /// Waiting for SOH; everything else is dropped
    WaitingForStart,
    /// Inside a frame
    Capturing,
    /// Inside a frame, previous byte was DLE
    Escaped,
    /// Got a NACK, the next byte is its error code
    WaitingForErrorCode,
}

impl Default for FrameDecoder {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameDecoder {
    /// Create a decoder with the default payload limit
    pub fn new() -> Self {
        Self::with_limit(MAX_STUFFED_PAYLOAD)
    }

    /// Create a decoder that drops payloads longer than `max_stuffed` wire bytes
    ///
    /// The limit is clamped to [`MAX_STUFFED_PAYLOAD`].
    pub fn with_limit(max_stuffed: usize) -> Self {
        Self {
            state: DecodeState::WaitingForStart,
            body: Vec::new(),
            stuffed: 0,
            tail_escapes: 0,
            max_stuffed: max_stuffed.min(MAX_STUFFED_PAYLOAD),
            last_accepted: None,
            reply: None,
            event: None,
            stats: DecoderStats::default(),
        }
    }

    /// Forget the partial frame and the accepted sequence (new session)
    pub fn reset(&mut self) {
        self.state = DecodeState::WaitingForStart;
        self.clear_capture();
        self.last_accepted = None;
        self.reply = None;
        self.event = None;
    }

    /// Sequence number of the last frame delivered
    pub fn last_accepted(&self) -> Option<u8> {
        self.last_accepted
    }

    /// Whether a frame is partially captured
    pub fn in_frame(&self) -> bool {
        matches!(self.state, DecodeState::Capturing | DecodeState::Escaped)
    }

    /// Whether the decoder is between frames with nothing pending
    pub fn is_idle(&self) -> bool {
        self.state == DecodeState::WaitingForStart
    }

    /// Counters of recoverable errors seen so far
    pub fn stats(&self) -> &DecoderStats {
        &self.stats
    }

    /// Acknowledgement owed to the peer for the last completed frame
    pub fn take_reply(&mut self) -> Option<Reply> {
        self.reply.take()
    }

    /// Last non-frame outcome, for diagnostics and flow control
    pub fn take_event(&mut self) -> Option<DecodeEvent> {
        self.event.take()
    }

    /// Feed a single byte to the decoder
    ///
    /// Returns `Some(frame)` when a complete, valid, non-duplicate frame
    /// has been received. Everything else (more bytes needed, parity
    /// error, retransmission, garbage) returns `None`; check
    /// [`take_reply`](Self::take_reply) and [`take_event`](Self::take_event)
    /// to learn what happened.
    pub fn feed(&mut self, byte: u8) -> Option<Frame> {
        match self.state {
            DecodeState::WaitingForErrorCode => {
                self.state = DecodeState::WaitingForStart;
                self.stats.peer_nacks = self.stats.peer_nacks.wrapping_add(1);
                self.event = Some(DecodeEvent::PeerNack { code: byte });
                None
            }
            DecodeState::Escaped => {
                self.state = DecodeState::Capturing;
                self.capture(byte, true);
                None
            }
            DecodeState::WaitingForStart | DecodeState::Capturing => match byte {
                SOH => {
                    self.abandon();
                    self.state = DecodeState::Capturing;
                    None
                }
                ACK => {
                    self.abandon();
                    self.state = DecodeState::WaitingForStart;
                    self.event = Some(DecodeEvent::PeerAck);
                    None
                }
                NACK => {
                    self.abandon();
                    self.state = DecodeState::WaitingForErrorCode;
                    None
                }
                _ if self.state == DecodeState::WaitingForStart => {
                    // Silently ignore bytes outside a frame
                    self.stats.stray_bytes = self.stats.stray_bytes.wrapping_add(1);
                    None
                }
                DLE => {
                    self.stuffed += 1;
                    self.state = DecodeState::Escaped;
                    self.check_overflow();
                    None
                }
                EOT => {
                    self.state = DecodeState::WaitingForStart;
                    let frame = self.finish();
                    self.clear_capture();
                    frame
                }
                _ => {
                    self.capture(byte, false);
                    None
                }
            },
        }
    }

    /// Feed multiple bytes to the decoder
    ///
    /// Returns the first complete frame found, if any.
    /// Remaining bytes after a complete frame are not consumed.
    pub fn feed_bytes(&mut self, bytes: &[u8]) -> Option<Frame> {
        for &byte in bytes {
            if let Some(frame) = self.feed(byte) {
                return Some(frame);
            }
        }
        None
    }

    fn clear_capture(&mut self) {
        self.body.clear();
        self.stuffed = 0;
        self.tail_escapes = 0;
    }

    /// Drop a partial frame, if any
    fn abandon(&mut self) {
        if self.in_frame() {
            self.stats.abandoned = self.stats.abandoned.wrapping_add(1);
            self.event = Some(DecodeEvent::Abandoned {
                len: self.body.len(),
            });
        }
        self.clear_capture();
    }

    fn capture(&mut self, byte: u8, escaped: bool) {
        self.stuffed += 1;
        if self.body.push(byte).is_err() {
            self.drop_oversized();
            return;
        }
        self.tail_escapes = ((self.tail_escapes << 1) | escaped as u8) & 0b11;
        self.check_overflow();
    }

    fn check_overflow(&mut self) {
        if self.stuffed > self.max_stuffed + MAX_TRAILER {
            self.drop_oversized();
        }
    }

    fn drop_oversized(&mut self) {
        // The terminal enforces its own limit, so no NACK here
        self.stats.oversized = self.stats.oversized.wrapping_add(1);
        self.event = Some(DecodeEvent::Oversized);
        self.state = DecodeState::WaitingForStart;
        self.clear_capture();
    }

    fn finish(&mut self) -> Option<Frame> {
        let len = self.body.len();
        if len < 2 {
            self.stats.runts = self.stats.runts.wrapping_add(1);
            self.event = Some(DecodeEvent::Runt);
            return None;
        }

        let trailer = 2 + self.tail_escapes.count_ones() as usize;
        if self.stuffed - trailer > self.max_stuffed {
            self.drop_oversized();
            return None;
        }

        let (payload, tail) = self.body.split_at(len - 2);
        let sequence = tail[0];
        if parity(payload, sequence) != tail[1] {
            self.stats.parity_errors = self.stats.parity_errors.wrapping_add(1);
            self.reply = Some(Reply::Nack(ErrorCode::Parity));
            self.event = Some(DecodeEvent::ParityError);
            return None;
        }

        self.reply = Some(Reply::Ack);
        if self.last_accepted == Some(sequence) {
            self.stats.duplicates = self.stats.duplicates.wrapping_add(1);
            self.event = Some(DecodeEvent::Duplicate { sequence });
            return None;
        }

        let mut frame_payload = Vec::new();
        // Cannot fail: payload is a prefix of a body no larger than MAX_BODY_SIZE - 2
        let _ = frame_payload.extend_from_slice(payload);
        self.last_accepted = Some(sequence);
        self.stats.frames = self.stats.frames.wrapping_add(1);
        Some(Frame {
            payload: frame_payload,
            sequence,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_encode_plain_payload() {
        let frame = Frame::new(&[0x02, b'S', b'I'], FIRST_SEQUENCE).unwrap();
        let mut buffer = [0u8; 16];
        let len = frame.encode(&mut buffer).unwrap();

        // 0x02 is not a control byte; 127 ^ 0x02 ^ 'S' ^ 'I' = 0x67
        assert_eq!(&buffer[..len], &[SOH, 0x02, b'S', b'I', 127, 0x67, EOT]);
    }

    #[test]
    fn test_frame_encode_escapes_controls() {
        let frame = Frame::new(&[SOH, 0x41, DLE], 200).unwrap();
        let encoded = frame.encode_to_vec().unwrap();

        let parity = SOH ^ 0x41 ^ DLE ^ 200;
        assert_eq!(
            &encoded[..],
            &[SOH, DLE, SOH, 0x41, DLE, DLE, 200, parity, EOT]
        );
    }

    #[test]
    fn test_frame_encode_escapes_parity() {
        // Parity of [0x80] with sequence 0x84 is 0x04 (EOT)
        let frame = Frame::new(&[0x80], 0x84).unwrap();
        let encoded = frame.encode_to_vec().unwrap();
        assert_eq!(&encoded[..], &[SOH, 0x80, 0x84, DLE, EOT, EOT]);
    }

    #[test]
    fn test_frame_roundtrip() {
        let original = Frame::new(&[3, b'K', b'I', 5], 130).unwrap();
        let encoded = original.encode_to_vec().unwrap();

        let mut decoder = FrameDecoder::new();
        let parsed = decoder.feed_bytes(&encoded).unwrap();

        assert_eq!(parsed, original);
        assert_eq!(decoder.take_reply(), Some(Reply::Ack));
        assert_eq!(decoder.last_accepted(), Some(130));
    }

    #[test]
    fn test_empty_payload_roundtrip() {
        let original = Frame::new(&[], 128).unwrap();
        let encoded = original.encode_to_vec().unwrap();

        let mut decoder = FrameDecoder::new();
        let parsed = decoder.feed_bytes(&encoded).unwrap();
        assert!(parsed.payload.is_empty());
        assert_eq!(parsed.sequence, 128);
    }

    #[test]
    fn test_decoder_parity_error_sends_nack() {
        let frame = Frame::new(&[0x41, 0x42], 140).unwrap();
        let mut encoded = frame.encode_to_vec().unwrap();
        encoded[1] ^= 0x20;

        let mut decoder = FrameDecoder::new();
        assert!(decoder.feed_bytes(&encoded).is_none());
        assert_eq!(decoder.take_reply(), Some(Reply::Nack(ErrorCode::Parity)));
        assert_eq!(decoder.take_event(), Some(DecodeEvent::ParityError));
        assert_eq!(decoder.last_accepted(), None);
        assert_eq!(decoder.stats().parity_errors, 1);
    }

    #[test]
    fn test_decoder_suppresses_duplicate() {
        let frame = Frame::new(&[0x41], 150).unwrap();
        let encoded = frame.encode_to_vec().unwrap();

        let mut decoder = FrameDecoder::new();
        assert!(decoder.feed_bytes(&encoded).is_some());
        assert_eq!(decoder.take_reply(), Some(Reply::Ack));

        assert!(decoder.feed_bytes(&encoded).is_none());
        assert_eq!(decoder.take_reply(), Some(Reply::Ack));
        assert_eq!(
            decoder.take_event(),
            Some(DecodeEvent::Duplicate { sequence: 150 })
        );
        assert_eq!(decoder.stats().duplicates, 1);
    }

    #[test]
    fn test_decoder_resync_after_garbage() {
        let frame = Frame::new(&[0x41], 131).unwrap();
        let encoded = frame.encode_to_vec().unwrap();

        let mut data = Vec::<u8, 32>::new();
        data.extend_from_slice(&[0x00, 0xFF, EOT, DLE, 0x34]).unwrap();
        data.extend_from_slice(&encoded).unwrap();

        let mut decoder = FrameDecoder::new();
        let parsed = decoder.feed_bytes(&data).unwrap();
        assert_eq!(&parsed.payload[..], &[0x41]);
        assert_eq!(decoder.stats().stray_bytes, 5);
    }

    #[test]
    fn test_decoder_abandons_stalled_partial() {
        let frame = Frame::new(&[0x41, 0x42], 132).unwrap();
        let encoded = frame.encode_to_vec().unwrap();

        let mut decoder = FrameDecoder::new();
        assert!(decoder.feed_bytes(&[SOH, 0x33, 0x34]).is_none());
        assert!(decoder.in_frame());

        let parsed = decoder.feed_bytes(&encoded).unwrap();
        assert_eq!(&parsed.payload[..], &[0x41, 0x42]);
        assert_eq!(decoder.stats().abandoned, 1);
    }

    #[test]
    fn test_decoder_peer_nack() {
        let mut decoder = FrameDecoder::new();
        assert!(decoder.feed(NACK).is_none());
        assert!(!decoder.is_idle());
        assert!(decoder.feed(0x01).is_none());
        assert!(decoder.is_idle());
        assert_eq!(decoder.take_event(), Some(DecodeEvent::PeerNack { code: 0x01 }));
        assert!(decoder.take_reply().is_none());

        assert!(decoder.feed(ACK).is_none());
        assert_eq!(decoder.take_event(), Some(DecodeEvent::PeerAck));
    }

    #[test]
    fn test_decoder_drops_runt() {
        let mut decoder = FrameDecoder::new();
        assert!(decoder.feed_bytes(&[SOH, 0x80, EOT]).is_none());
        assert_eq!(decoder.take_event(), Some(DecodeEvent::Runt));
        assert!(decoder.take_reply().is_none());
    }

    #[test]
    fn test_decoder_drops_oversized() {
        let mut decoder = FrameDecoder::with_limit(4);
        let frame = Frame::new(&[0x41, 0x42, 0x43, 0x44, 0x45], 133).unwrap();
        let encoded = frame.encode_to_vec().unwrap();

        assert!(decoder.feed_bytes(&encoded).is_none());
        assert_eq!(decoder.stats().oversized, 1);
        assert!(decoder.take_reply().is_none());

        let fits = Frame::new(&[0x41, 0x42, 0x43, 0x44], 134).unwrap();
        let encoded = fits.encode_to_vec().unwrap();
        assert!(decoder.feed_bytes(&encoded).is_some());
    }

    #[test]
    fn test_limit_counts_escapes() {
        let mut decoder = FrameDecoder::with_limit(4);
        // Three escaped bytes take six wire bytes
        let frame = Frame::new(&[SOH, EOT, DLE], 135).unwrap();
        let encoded = frame.encode_to_vec().unwrap();
        assert!(decoder.feed_bytes(&encoded).is_none());
        assert_eq!(decoder.take_event(), Some(DecodeEvent::Oversized));
    }

    #[test]
    fn test_sequence_counter_wraps_past_marker() {
        let mut counter = SequenceCounter::new();
        assert_eq!(counter.advance(), 127);
        assert_eq!(counter.advance(), 128);

        for _ in 129..=255u16 {
            counter.advance();
        }
        assert_eq!(counter.peek(), 128);
    }

    #[test]
    fn test_payload_too_large() {
        let large_payload = [0u8; MAX_STUFFED_PAYLOAD + 1];
        assert_eq!(Frame::new(&large_payload, 128), Err(FrameError::PayloadTooLarge));

        let escaped_payload = [SOH; MAX_STUFFED_PAYLOAD / 2 + 1];
        assert_eq!(
            Frame::new(&escaped_payload, 128),
            Err(FrameError::PayloadTooLarge)
        );
    }

    #[test]
    fn test_reply_bytes() {
        assert_eq!(&Reply::Ack.to_bytes()[..], &[ACK]);
        assert_eq!(
            &Reply::Nack(ErrorCode::Parity).to_bytes()[..],
            &[NACK, 0x01]
        );
    }
}
