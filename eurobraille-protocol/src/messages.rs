//! Message types carried inside frame payloads
//!
//! A payload holds one or more messages, each `[LEN][TAG][SUB][DATA...]`
//! where LEN counts the bytes after itself:
//! - Terminal → host: mode checks (`R`), keyboard events (`K`),
//!   status / identification (`S`)
//! - Host → terminal: identification request (`S I`), braille line (`D P`),
//!   visual line (`D L`)

use heapless::Vec;

use crate::events::{numpad_key, numpad_wire, ChordCode, KeyEvent};
use crate::frame::MAX_PAYLOAD_SIZE;

// Tags
pub const TAG_MODE: u8 = b'R';
pub const TAG_KEYBOARD: u8 = b'K';
pub const TAG_STATUS: u8 = b'S';
pub const TAG_DISPLAY: u8 = b'D';

// Sub-tags: mode check
pub const SUB_PC_MODE: u8 = b'B';
pub const SUB_LEAVE_PC_MODE: u8 = b'K';
pub const SUB_SPEECH_MODE: u8 = b'V';

// Sub-tags: keyboard
pub const SUB_ROUTING: u8 = b'I';
pub const SUB_BRAILLE: u8 = b'B';
pub const SUB_NUMPAD: u8 = b'T';

// Sub-tags: status
pub const SUB_IDENTIFY: u8 = b'I';

// Sub-tags: display
pub const SUB_BRAILLE_LINE: u8 = b'P';
pub const SUB_VISUAL_LINE: u8 = b'L';

/// Largest LEN value; a length byte at or above 0x80 ends the payload
pub const MAX_MESSAGE_LEN: usize = 0x7F;

/// Longest line a single display message can carry
pub const MAX_LINE_LEN: usize = MAX_MESSAGE_LEN - 2;

/// Longest version string kept from an identify response
pub const MAX_VERSION_LEN: usize = 20;

/// Errors from interpreting a message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MessageError {
    /// Tag / sub-tag pair not understood
    UnknownTag { tag: u8, sub: u8 },
    /// Data length disagrees with what the tag implies
    BadLength { tag: u8, sub: u8, len: usize },
    /// Key id not present in the numeric-pad table
    UnmappedKey(u8),
    /// Line does not fit one message
    LineTooLong,
    /// Output buffer too small
    BufferTooSmall,
}

impl core::fmt::Display for MessageError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            MessageError::UnknownTag { tag, sub } => {
                write!(f, "unknown message {:#04x}/{:#04x}", tag, sub)
            }
            MessageError::BadLength { tag, sub, len } => {
                write!(f, "bad length {} for message {:#04x}/{:#04x}", len, tag, sub)
            }
            MessageError::UnmappedKey(key) => write!(f, "unmapped numeric-pad key {}", key),
            MessageError::LineTooLong => f.write_str("line too long for one message"),
            MessageError::BufferTooSmall => f.write_str("output buffer too small"),
        }
    }
}

impl core::error::Error for MessageError {}

/// One message sliced out of a payload, not yet interpreted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawMessage<'a> {
    pub tag: u8,
    pub sub: u8,
    pub data: &'a [u8],
}

/// Iterator over the messages of a frame payload
#[derive(Debug, Clone)]
pub struct Messages<'a> {
    payload: &'a [u8],
    pos: usize,
}

/// Split a frame payload into its messages
pub fn messages(payload: &[u8]) -> Messages<'_> {
    Messages { payload, pos: 0 }
}

impl<'a> Iterator for Messages<'a> {
    type Item = RawMessage<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let len = *self.payload.get(self.pos)? as usize;
        let start = self.pos + 1;
        let end = start + len;
        if len > MAX_MESSAGE_LEN || end > self.payload.len() {
            self.pos = self.payload.len();
            return None;
        }
        self.pos = end;

        let body = &self.payload[start..end];
        Some(RawMessage {
            tag: body.first().copied().unwrap_or(0),
            sub: body.get(1).copied().unwrap_or(0),
            data: body.get(2..).unwrap_or(&[]),
        })
    }
}

/// Mode-check notifications
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ModeCheck {
    /// Terminal entered PC-Braille mode
    PcModeEntered,
    /// Terminal is leaving PC-Braille mode
    PcModeLeft,
    /// Terminal entered braille-and-speech mode
    SpeechModeEntered,
}

/// Identification data reported by the terminal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IdentifyResponse<'a> {
    /// Two-letter model code, e.g. `b"CN"` for Clio
    pub model: [u8; 2],
    /// ASCII digit giving the cell count in tens
    pub column_digit: u8,
    /// Firmware identification, starting with the model letters
    pub version: &'a [u8],
}

/// Messages from the terminal to the host
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TerminalMessage<'a> {
    ModeCheck(ModeCheck),
    Key(KeyEvent),
    Identify(IdentifyResponse<'a>),
}

fn expect_len(raw: &RawMessage<'_>, len: usize) -> Result<(), MessageError> {
    if raw.data.len() != len {
        return Err(MessageError::BadLength {
            tag: raw.tag,
            sub: raw.sub,
            len: raw.data.len(),
        });
    }
    Ok(())
}

impl<'a> TerminalMessage<'a> {
    /// Interpret a raw message
    pub fn parse(raw: &RawMessage<'a>) -> Result<Self, MessageError> {
        match (raw.tag, raw.sub) {
            (TAG_MODE, sub @ (SUB_PC_MODE | SUB_LEAVE_PC_MODE | SUB_SPEECH_MODE)) => {
                expect_len(raw, 0)?;
                let mode = match sub {
                    SUB_PC_MODE => ModeCheck::PcModeEntered,
                    SUB_LEAVE_PC_MODE => ModeCheck::PcModeLeft,
                    _ => ModeCheck::SpeechModeEntered,
                };
                Ok(TerminalMessage::ModeCheck(mode))
            }
            (TAG_KEYBOARD, SUB_ROUTING) => {
                expect_len(raw, 1)?;
                Ok(TerminalMessage::Key(KeyEvent::Routing(raw.data[0])))
            }
            (TAG_KEYBOARD, SUB_BRAILLE) => {
                expect_len(raw, 2)?;
                let chord = ChordCode::from_bytes(raw.data[0], raw.data[1]);
                Ok(TerminalMessage::Key(KeyEvent::Braille(chord)))
            }
            (TAG_KEYBOARD, SUB_NUMPAD) => {
                expect_len(raw, 1)?;
                let id = numpad_key(raw.data[0]).ok_or(MessageError::UnmappedKey(raw.data[0]))?;
                Ok(TerminalMessage::Key(KeyEvent::Numpad(id)))
            }
            (TAG_STATUS, SUB_IDENTIFY) => {
                if raw.data.len() < 3 {
                    return Err(MessageError::BadLength {
                        tag: raw.tag,
                        sub: raw.sub,
                        len: raw.data.len(),
                    });
                }
                let version_len = raw.data.len().min(MAX_VERSION_LEN);
                Ok(TerminalMessage::Identify(IdentifyResponse {
                    model: [raw.data[0], raw.data[1]],
                    column_digit: raw.data[2],
                    version: &raw.data[..version_len],
                }))
            }
            (tag, sub) => Err(MessageError::UnknownTag { tag, sub }),
        }
    }

    /// Append this message, length-prefixed, to a payload
    ///
    /// Terminals produce these; the host uses it to simulate a terminal.
    pub fn write_to<const N: usize>(&self, out: &mut Vec<u8, N>) -> Result<(), MessageError> {
        let mut body = Vec::<u8, MAX_MESSAGE_LEN>::new();
        let result = match self {
            TerminalMessage::ModeCheck(mode) => {
                let sub = match mode {
                    ModeCheck::PcModeEntered => SUB_PC_MODE,
                    ModeCheck::PcModeLeft => SUB_LEAVE_PC_MODE,
                    ModeCheck::SpeechModeEntered => SUB_SPEECH_MODE,
                };
                body.extend_from_slice(&[TAG_MODE, sub])
            }
            TerminalMessage::Key(KeyEvent::Routing(index)) => {
                body.extend_from_slice(&[TAG_KEYBOARD, SUB_ROUTING, *index])
            }
            TerminalMessage::Key(KeyEvent::Braille(chord)) => {
                let [low, high] = chord.to_bytes();
                body.extend_from_slice(&[TAG_KEYBOARD, SUB_BRAILLE, low, high])
            }
            TerminalMessage::Key(KeyEvent::Numpad(id)) => {
                let wire = numpad_wire(*id).ok_or(MessageError::UnmappedKey(*id))?;
                body.extend_from_slice(&[TAG_KEYBOARD, SUB_NUMPAD, wire])
            }
            TerminalMessage::Identify(identify) => {
                let [first, second] = identify.model;
                let header = [TAG_STATUS, SUB_IDENTIFY, first, second, identify.column_digit];
                // The version string repeats the model letters and digit
                let tail = identify.version.get(3..).unwrap_or(&[]);
                body.extend_from_slice(&header)
                    .and_then(|_| body.extend_from_slice(tail))
            }
        };
        result.map_err(|_| MessageError::LineTooLong)?;
        write_prefixed(out, &body)
    }
}

/// Messages from the host to the terminal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostMessage<'a> {
    /// Ask the terminal to identify itself
    Identify,
    /// Write a full braille line (device-native cell codes)
    BrailleLine(&'a [u8]),
    /// Write a full line of the visual (LCD) display, raw bytes
    VisualLine(&'a [u8]),
}

impl<'a> HostMessage<'a> {
    /// Append this message, length-prefixed, to a payload
    pub fn write_to<const N: usize>(&self, out: &mut Vec<u8, N>) -> Result<(), MessageError> {
        let (tag, sub, data): (u8, u8, &[u8]) = match self {
            HostMessage::Identify => (TAG_STATUS, SUB_IDENTIFY, &[]),
            HostMessage::BrailleLine(cells) => (TAG_DISPLAY, SUB_BRAILLE_LINE, cells),
            HostMessage::VisualLine(bytes) => (TAG_DISPLAY, SUB_VISUAL_LINE, bytes),
        };
        if data.len() > MAX_LINE_LEN {
            return Err(MessageError::LineTooLong);
        }

        let mut body = Vec::<u8, MAX_MESSAGE_LEN>::new();
        body.extend_from_slice(&[tag, sub])
            .and_then(|_| body.extend_from_slice(data))
            .map_err(|_| MessageError::LineTooLong)?;
        write_prefixed(out, &body)
    }

    /// Encode this message as a complete frame payload
    pub fn to_payload(&self) -> Result<Vec<u8, MAX_PAYLOAD_SIZE>, MessageError> {
        let mut payload = Vec::new();
        self.write_to(&mut payload)?;
        Ok(payload)
    }
}

fn write_prefixed<const N: usize>(out: &mut Vec<u8, N>, body: &[u8]) -> Result<(), MessageError> {
    out.push(body.len() as u8)
        .map_err(|_| MessageError::BufferTooSmall)?;
    out.extend_from_slice(body)
        .map_err(|_| MessageError::BufferTooSmall)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::CHORD_CONTROL;

    #[test]
    fn test_identify_request_payload() {
        let payload = HostMessage::Identify.to_payload().unwrap();
        assert_eq!(&payload[..], &[0x02, b'S', b'I']);
    }

    #[test]
    fn test_braille_line_payload() {
        let payload = HostMessage::BrailleLine(&[0x01, 0x03, 0xFF]).to_payload().unwrap();
        assert_eq!(&payload[..], &[0x05, b'D', b'P', 0x01, 0x03, 0xFF]);
    }

    #[test]
    fn test_line_too_long() {
        let line = [0u8; MAX_LINE_LEN + 1];
        assert_eq!(
            HostMessage::VisualLine(&line).to_payload(),
            Err(MessageError::LineTooLong)
        );
    }

    #[test]
    fn test_split_multiple_messages() {
        let payload = [
            0x03, b'K', b'I', 0x05, // routing key 5
            0x02, b'R', b'B', // PC mode
        ];
        let mut iter = messages(&payload);

        let first = iter.next().unwrap();
        assert_eq!((first.tag, first.sub, first.data), (b'K', b'I', &[0x05][..]));
        let second = iter.next().unwrap();
        assert_eq!((second.tag, second.sub), (b'R', b'B'));
        assert!(second.data.is_empty());
        assert!(iter.next().is_none());
    }

    #[test]
    fn test_split_stops_at_overrun() {
        let payload = [0x02, b'R', b'K', 0x09, b'K', b'I'];
        let collected: Vec<RawMessage<'_>, 4> = messages(&payload).collect();
        assert_eq!(collected.len(), 1);
    }

    #[test]
    fn test_split_stops_at_high_length() {
        let payload = [0x80, b'R', b'K'];
        assert!(messages(&payload).next().is_none());
    }

    #[test]
    fn test_parse_routing() {
        let raw = RawMessage {
            tag: b'K',
            sub: b'I',
            data: &[0x83],
        };
        assert_eq!(
            TerminalMessage::parse(&raw),
            Ok(TerminalMessage::Key(KeyEvent::Routing(0x83)))
        );
    }

    #[test]
    fn test_parse_rejects_bad_length() {
        let raw = RawMessage {
            tag: b'K',
            sub: b'B',
            data: &[0x01],
        };
        assert!(matches!(
            TerminalMessage::parse(&raw),
            Err(MessageError::BadLength { len: 1, .. })
        ));
    }

    #[test]
    fn test_mode_check_carries_no_data() {
        let raw = RawMessage {
            tag: b'R',
            sub: b'B',
            data: &[],
        };
        assert_eq!(
            TerminalMessage::parse(&raw),
            Ok(TerminalMessage::ModeCheck(ModeCheck::PcModeEntered))
        );

        for sub in [b'B', b'K', b'V'] {
            let raw = RawMessage {
                tag: b'R',
                sub,
                data: &[1, 2, 3],
            };
            assert!(matches!(
                TerminalMessage::parse(&raw),
                Err(MessageError::BadLength { tag: b'R', len: 3, .. })
            ));
        }
    }

    #[test]
    fn test_parse_identify() {
        let raw = RawMessage {
            tag: b'S',
            sub: b'I',
            data: b"CN4 v1.2",
        };
        let TerminalMessage::Identify(identify) = TerminalMessage::parse(&raw).unwrap() else {
            panic!("expected identify");
        };
        assert_eq!(&identify.model, b"CN");
        assert_eq!(identify.column_digit, b'4');
        assert_eq!(identify.version, b"CN4 v1.2");
    }

    #[test]
    fn test_parse_unknown_tag() {
        let raw = RawMessage {
            tag: b'X',
            sub: b'Y',
            data: &[],
        };
        assert_eq!(
            TerminalMessage::parse(&raw),
            Err(MessageError::UnknownTag { tag: b'X', sub: b'Y' })
        );
    }

    #[test]
    fn test_parse_unmapped_numpad() {
        let raw = RawMessage {
            tag: b'K',
            sub: b'T',
            data: &[b'?'],
        };
        assert_eq!(
            TerminalMessage::parse(&raw),
            Err(MessageError::UnmappedKey(b'?'))
        );
    }

    #[test]
    fn test_terminal_message_write_roundtrip() {
        let original = TerminalMessage::Key(KeyEvent::Braille(ChordCode::new(CHORD_CONTROL)));
        let mut payload = Vec::<u8, 16>::new();
        original.write_to(&mut payload).unwrap();

        let raw = messages(&payload).next().unwrap();
        assert_eq!(TerminalMessage::parse(&raw), Ok(original));
    }
}
