//! Host-side driver for EuroBraille terminals
//!
//! Ties the protocol and core crates to a byte channel:
//!
//! - [`LinkSession`]: identify handshake, acknowledgements, dispatch
//! - [`OutputRenderer`]: braille and LCD lines, rewritten only on change
//! - [`BrailleDriver`]: the facade a screen reader talks to
//! - TOML configuration loading
//!
//! Logging goes through the `log` facade; pick a logger in the binary.

pub mod config;
pub mod driver;
pub mod error;
pub mod renderer;
pub mod session;

pub use config::{load_config, parse_config};
pub use driver::BrailleDriver;
pub use error::{ConfigError, LinkError};
pub use renderer::{DisplayBuffer, DotTranslator, IdentityTranslator, OutputRenderer};
pub use session::{LinkSession, SessionEvent};

pub use eurobraille_core::config::DriverConfig;
pub use eurobraille_core::{Command, Key, NavCommand, OffsetKind, Prompt};
