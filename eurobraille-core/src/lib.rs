//! Board-agnostic core logic for the EuroBraille driver
//!
//! This crate contains the parts of the driver that do not touch the
//! byte channel:
//!
//! - Abstract command vocabulary returned to the hosting layer
//! - Link state and model identification
//! - Per-model key binding tables
//! - Input state machine (menus, console picker, modifier latches)
//! - Prompts shown on the braille line
//! - Configuration type definitions

#![no_std]
#![deny(unsafe_code)]

pub mod command;
pub mod config;
pub mod keymap;
pub mod link;
pub mod prompt;
pub mod state;

pub use command::{Command, Key, NavCommand, OffsetKind};
pub use keymap::{Action, Binding, Handler, KeyBindingTable};
pub use link::{IdentifyError, LinkState, ModelId, MAX_COLUMNS};
pub use prompt::Prompt;
pub use state::{InputContext, InputDecoder, InputMode, LinkRequest, Outcome};
