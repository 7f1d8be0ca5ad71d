//! Per-connection link state and terminal identification

use heapless::String;

use eurobraille_protocol::messages::MAX_VERSION_LEN;
use eurobraille_protocol::IdentifyResponse;

/// Widest display any model reports (digit 9)
pub const MAX_COLUMNS: u16 = 90;

/// Terminal families, told apart by the two identify letters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ModelId {
    #[default]
    Unknown,
    NoteBraille,
    Clio,
    Scriba,
    AzerBraille,
    Iris,
}

impl ModelId {
    /// Map the two model letters of an identify response
    pub fn from_letters(letters: [u8; 2]) -> Self {
        match &letters {
            b"NB" => ModelId::NoteBraille,
            b"CN" => ModelId::Clio,
            b"SC" | b"SB" => ModelId::Scriba,
            b"CZ" | b"CP" => ModelId::AzerBraille,
            b"IR" | b"IS" => ModelId::Iris,
            _ => ModelId::Unknown,
        }
    }

    /// Cell count for a column digit, or `None` if the digit is malformed
    ///
    /// Columns are the digit times ten, except the 32-cell Iris which
    /// reports a 3.
    pub fn columns(self, digit: u8) -> Option<u16> {
        if !(b'1'..=b'9').contains(&digit) {
            return None;
        }
        let columns = (digit - b'0') as u16 * 10;
        match (self, columns) {
            (ModelId::Iris, 30) => Some(32),
            _ => Some(columns),
        }
    }
}

/// Why an identify response was not applied
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum IdentifyError {
    /// Column digit is not `1`..=`9`
    BadColumnDigit(u8),
}

/// What is known about the terminal on the other end of one connection
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkState {
    /// Terminal family
    pub model: ModelId,
    /// Display width; `None` until an identify response arrived
    columns: Option<u16>,
    /// Firmware identification as reported, at most 20 characters
    pub version: String<MAX_VERSION_LEN>,
    /// An identify response arrived and no PC-mode notice has followed yet
    pub just_identified: bool,
}

impl Default for LinkState {
    fn default() -> Self {
        Self::new()
    }
}

impl LinkState {
    /// State of a connection that has not identified yet
    pub fn new() -> Self {
        let mut version = String::new();
        let _ = version.push_str("Unknown");
        Self {
            model: ModelId::Unknown,
            columns: None,
            version,
            just_identified: false,
        }
    }

    /// Display width, once identified
    pub fn columns(&self) -> Option<u16> {
        self.columns
    }

    /// Check if an identify response has been applied
    pub fn is_identified(&self) -> bool {
        self.columns.is_some()
    }

    /// Apply an identify response and return the new column count
    ///
    /// A malformed response leaves the state untouched.
    pub fn apply_identify(&mut self, identify: &IdentifyResponse<'_>) -> Result<u16, IdentifyError> {
        let model = ModelId::from_letters(identify.model);
        let columns = model
            .columns(identify.column_digit)
            .ok_or(IdentifyError::BadColumnDigit(identify.column_digit))?;

        self.model = model;
        self.columns = Some(columns);
        self.just_identified = true;
        self.version.clear();
        for &byte in identify.version.iter().take(MAX_VERSION_LEN) {
            let ch = if byte.is_ascii_graphic() || byte == b' ' {
                byte as char
            } else {
                '?'
            };
            // Cannot fail: at most MAX_VERSION_LEN single-byte characters
            let _ = self.version.push(ch);
        }
        Ok(columns)
    }

    /// Forget the terminal (connection closed)
    pub fn clear(&mut self) {
        *self = Self::new();
    }
}
