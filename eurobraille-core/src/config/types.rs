//! Configuration type definitions

use core::time::Duration;

use eurobraille_hal::SerialConfig;
use eurobraille_protocol::MAX_STUFFED_PAYLOAD;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Settings rejected by [`DriverConfig::validate`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigIssue {
    /// Frame limit is zero or above the protocol maximum
    MaxFrameLen(usize),
    /// Identify would never be attempted
    NoIdentifyAttempts,
}

/// Driver configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct DriverConfig {
    /// Give up on identify after this long (ms)
    pub identify_timeout_ms: u32,
    /// Identify requests sent before giving up
    pub identify_attempts: u8,
    /// Re-send the identify request after this long without an answer (ms)
    pub identify_retry_ms: u32,
    /// How long one poll waits for input (ms); 0 polls without blocking
    pub poll_timeout_ms: u32,
    /// Largest stuffed payload accepted, in wire bytes
    pub max_frame_len: usize,
    /// Write the LCD line as well as the braille line
    pub visual_display: bool,
    /// Serial line settings
    pub serial: SerialConfig,
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            identify_timeout_ms: 2000,
            identify_attempts: 10,
            identify_retry_ms: 100,
            poll_timeout_ms: 0,
            max_frame_len: MAX_STUFFED_PAYLOAD,
            visual_display: true,
            serial: SerialConfig::default(),
        }
    }
}

impl DriverConfig {
    /// Check value ranges
    pub fn validate(&self) -> Result<(), ConfigIssue> {
        if self.max_frame_len == 0 || self.max_frame_len > MAX_STUFFED_PAYLOAD {
            return Err(ConfigIssue::MaxFrameLen(self.max_frame_len));
        }
        if self.identify_attempts == 0 {
            return Err(ConfigIssue::NoIdentifyAttempts);
        }
        Ok(())
    }

    pub fn identify_timeout(&self) -> Duration {
        Duration::from_millis(self.identify_timeout_ms as u64)
    }

    pub fn identify_retry(&self) -> Duration {
        Duration::from_millis(self.identify_retry_ms as u64)
    }

    pub fn poll_timeout(&self) -> Duration {
        Duration::from_millis(self.poll_timeout_ms as u64)
    }
}
