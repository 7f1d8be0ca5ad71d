//! Error types for the host-side driver

use std::fmt::Debug;
use std::path::PathBuf;

use eurobraille_core::config::ConfigIssue;
use eurobraille_protocol::{FrameError, MessageError};
use thiserror::Error;

/// Failures of an open connection
#[derive(Debug, Error)]
pub enum LinkError {
    /// Identify handshake ran out of attempts; the session is unusable
    #[error("terminal not responding after {attempts} identify attempts")]
    NotResponding { attempts: u8 },

    /// The byte channel reported an error
    #[error("channel error: {0}")]
    Io(String),

    /// An outgoing payload could not be framed
    #[error("frame error: {0}")]
    Frame(#[from] FrameError),

    /// An outgoing message could not be built
    #[error("message error: {0}")]
    Message(#[from] MessageError),

    /// Operation needs the display width, which is not known yet
    #[error("terminal not identified")]
    NotIdentified,
}

impl LinkError {
    /// Wrap a channel error
    pub fn io<E: Debug>(error: E) -> Self {
        LinkError::Io(format!("{error:?}"))
    }
}

/// Failures loading the driver configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("config parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid config: {0:?}")]
    Invalid(ConfigIssue),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    fn frame_payload(len: usize) -> Result<(), LinkError> {
        if len > eurobraille_protocol::MAX_PAYLOAD_SIZE {
            return Err(FrameError::PayloadTooLarge.into());
        }
        Ok(())
    }

    #[test]
    fn test_protocol_errors_convert() {
        let err = frame_payload(1000).unwrap_err();
        assert!(matches!(err, LinkError::Frame(FrameError::PayloadTooLarge)));
        assert!(err.source().is_some());
        assert_eq!(err.to_string(), "frame error: payload too large for one frame");

        let err = LinkError::from(MessageError::LineTooLong);
        assert!(matches!(err, LinkError::Message(MessageError::LineTooLong)));
        assert!(frame_payload(10).is_ok());
    }
}
