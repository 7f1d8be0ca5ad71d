//! TOML configuration loading
//!
//! Every key is optional; a missing key keeps its default. A file holding
//! only a `[serial]` table is valid:
//!
//! ```toml
//! identify_timeout_ms = 3000
//! visual_display = false
//!
//! [serial]
//! baudrate = 9600
//! parity = "even"
//! ```

use std::fs;
use std::path::Path;

use eurobraille_core::config::DriverConfig;
use log::{debug, info};

use crate::error::ConfigError;

/// Parse and validate a configuration from TOML text
pub fn parse_config(input: &str) -> Result<DriverConfig, ConfigError> {
    let config: DriverConfig = toml::from_str(input)?;
    config.validate().map_err(ConfigError::Invalid)?;
    debug!("Parsed driver config: {:?}", config);
    Ok(config)
}

/// Read, parse and validate a configuration file
pub fn load_config(path: impl AsRef<Path>) -> Result<DriverConfig, ConfigError> {
    let path = path.as_ref();
    let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let config = parse_config(&text)?;
    info!("Loaded driver config from {}", path.display());
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use eurobraille_core::config::ConfigIssue;
    use eurobraille_hal::{Parity, StopBits};

    #[test]
    fn test_empty_config_is_default() {
        assert_eq!(parse_config("").unwrap(), DriverConfig::default());
    }

    #[test]
    fn test_partial_config() {
        let config = parse_config(
            r#"
            identify_attempts = 3
            visual_display = false

            [serial]
            parity = "odd"
            stop_bits = "two"
            "#,
        )
        .unwrap();

        assert_eq!(config.identify_attempts, 3);
        assert!(!config.visual_display);
        assert_eq!(config.identify_timeout_ms, 2000);
        assert_eq!(config.serial.parity, Parity::Odd);
        assert_eq!(config.serial.stop_bits, StopBits::Two);
        assert_eq!(config.serial.baudrate, 9600);
    }

    #[test]
    fn test_rejects_invalid_values() {
        assert!(matches!(
            parse_config("max_frame_len = 1024"),
            Err(ConfigError::Invalid(ConfigIssue::MaxFrameLen(1024)))
        ));
        assert!(matches!(
            parse_config("identify_attempts = 0"),
            Err(ConfigError::Invalid(ConfigIssue::NoIdentifyAttempts))
        ));
    }

    #[test]
    fn test_rejects_bad_toml() {
        assert!(matches!(
            parse_config("identify_attempts = \"many\""),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_missing_file() {
        let err = load_config("/nonexistent/eurobraille.toml").unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }
}
