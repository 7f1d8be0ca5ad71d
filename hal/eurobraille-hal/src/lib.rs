//! Byte-channel abstraction for EuroBraille terminals
//!
//! The driver core talks to the terminal through a duplex byte channel
//! (serial line or USB-CDC). Opening and enumerating ports is the job of
//! whoever implements these traits; the core only reads with a timeout and
//! writes best-effort.
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  eurobraille-driver (session, renderer) │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  eurobraille-hal (this crate - traits)  │
//! └─────────────────────────────────────────┘
//!                     │
//!         ┌───────────┴───────────┐
//!         ▼                       ▼
//! ┌───────────────┐       ┌───────────────┐
//! │  serial port  │       │   USB-CDC     │
//! └───────────────┘       └───────────────┘
//! ```

#![no_std]
#![deny(unsafe_code)]

pub mod serial;

pub use serial::{DataBits, Parity, SerialConfig, SerialRx, SerialTx, StopBits};
