//! Input state machine
//!
//! Turns terminal key and mode-check messages into abstract commands.
//! The machine is explicit, finite and deterministic: every outcome is a
//! function of the current context, the link state and one message.

pub mod context;
pub mod decoder;

pub use context::{InputContext, InputMode};
pub use decoder::{InputDecoder, LinkRequest, Outcome};
