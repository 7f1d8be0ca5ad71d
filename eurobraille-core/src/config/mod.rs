//! Configuration types
//!
//! Board-agnostic driver settings, deserialized by the host from TOML.

pub mod types;

pub use types::*;
