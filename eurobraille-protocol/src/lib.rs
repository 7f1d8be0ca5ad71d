//! EuroBraille Terminal Link Protocol
//!
//! This crate defines the serial protocol spoken by EuroBraille terminals
//! (NoteBraille, Clio, Scriba, AzerBraille, Iris). The protocol is a
//! byte-stuffed, parity-checked, sequence-numbered framing around one or
//! more length-prefixed messages.
//!
//! # Protocol Overview
//!
//! ```text
//! ┌─────┬──────────────────────┬──────────┬────────┬─────┐
//! │ SOH │ PAYLOAD (stuffed)    │ SEQUENCE │ PARITY │ EOT │
//! │ 1B  │ 0–512B               │ 1–2B     │ 1–2B   │ 1B  │
//! └─────┴──────────────────────┴──────────┴────────┴─────┘
//! ```
//!
//! Inside the payload, messages follow each other:
//!
//! ```text
//! ┌─────┬─────┬─────────┬──────────┐
//! │ LEN │ TAG │ SUB-TAG │ DATA     │
//! │ 1B  │ 1B  │ 1B      │ LEN-2 B  │
//! └─────┴─────┴─────────┴──────────┘
//! ```
//!
//! Every frame is acknowledged by the receiver with ACK, or rejected with
//! NACK followed by an error code.

#![no_std]
#![deny(unsafe_code)]

pub mod codec;
pub mod events;
pub mod frame;
pub mod messages;

pub use codec::FrameCodec;
pub use events::{ChordCode, KeyEvent};
pub use frame::{
    DecodeEvent, DecoderStats, ErrorCode, Frame, FrameDecoder, FrameError, Reply,
    SequenceCounter, FIRST_SEQUENCE, MAX_FRAME_SIZE, MAX_PAYLOAD_SIZE, MAX_STUFFED_PAYLOAD,
};
pub use messages::{
    messages, HostMessage, IdentifyResponse, MessageError, ModeCheck, RawMessage,
    TerminalMessage,
};
