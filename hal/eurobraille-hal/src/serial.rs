//! Serial byte-channel traits
//!
//! The channel has no notion of message boundaries: a read may return any
//! chunk of the stream, including a single byte or nothing at all.

use core::time::Duration;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Receiving half of a byte channel
pub trait SerialRx {
    /// Error type for receive operations
    type Error: core::fmt::Debug;

    /// Read up to `buf.len()` bytes, waiting at most `timeout`
    ///
    /// Returns `Ok(0)` when nothing arrived before the timeout expired.
    fn read_timeout(&mut self, buf: &mut [u8], timeout: Duration) -> Result<usize, Self::Error>;

    /// Read a single byte, or `None` on timeout
    fn read_byte(&mut self, timeout: Duration) -> Result<Option<u8>, Self::Error> {
        let mut buf = [0u8; 1];
        match self.read_timeout(&mut buf, timeout)? {
            0 => Ok(None),
            _ => Ok(Some(buf[0])),
        }
    }
}

/// Transmitting half of a byte channel
pub trait SerialTx {
    /// Error type for transmit operations
    type Error: core::fmt::Debug;

    /// Write all of `data`
    ///
    /// Writes are best-effort: a failure is reported, never retried here.
    fn write_all(&mut self, data: &[u8]) -> Result<(), Self::Error>;

    /// Wait until buffered output has left the host
    fn flush(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
}

/// Line settings for the terminal's serial port
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SerialConfig {
    /// Baud rate in bits per second
    pub baudrate: u32,
    /// Number of data bits
    pub data_bits: DataBits,
    /// Parity mode
    pub parity: Parity,
    /// Number of stop bits
    pub stop_bits: StopBits,
}

impl Default for SerialConfig {
    fn default() -> Self {
        Self {
            baudrate: 9600,
            data_bits: DataBits::Eight,
            parity: Parity::Even,
            stop_bits: StopBits::One,
        }
    }
}

impl SerialConfig {
    /// Bits on the wire per transmitted byte (start + data + parity + stop)
    pub fn bits_per_byte(&self) -> u32 {
        let data = match self.data_bits {
            DataBits::Seven => 7,
            DataBits::Eight => 8,
        };
        let parity = match self.parity {
            Parity::None => 0,
            Parity::Even | Parity::Odd => 1,
        };
        let stop = match self.stop_bits {
            StopBits::One => 1,
            StopBits::Two => 2,
        };
        1 + data + parity + stop
    }

    /// Time the line needs to carry `len` bytes
    ///
    /// Callers use this to pace writes so the terminal's receive buffer
    /// is not overrun.
    pub fn transmit_time(&self, len: usize) -> Duration {
        let bytes_per_sec = (self.baudrate / self.bits_per_byte()).max(1) as u64;
        Duration::from_millis(len as u64 * 1000 / bytes_per_sec + 1)
    }
}

/// Number of data bits per character
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum DataBits {
    Seven,
    Eight,
}

/// Parity mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Parity {
    None,
    Even,
    Odd,
}

/// Number of stop bits
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum StopBits {
    One,
    Two,
}
