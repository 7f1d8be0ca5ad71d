//! Key events reported by the terminal's keyboards

/// Bit set when the backspace thumb key is part of a chord
pub const CHORD_BACKSPACE: u16 = 0x100;
/// Bit set when the space thumb key is part of a chord
pub const CHORD_SPACE: u16 = 0x200;
/// Space + dot 8: alt latch toggle
pub const CHORD_ALT: u16 = CHORD_SPACE | 0x80;
/// Space + dots 7 and 8: control latch toggle
pub const CHORD_CONTROL: u16 = CHORD_SPACE | 0xC0;

/// A braille-keyboard chord as a 10-bit key code
///
/// Bits 0-7 are dots 1-8, bit 8 is backspace and bit 9 is space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ChordCode(u16);

impl ChordCode {
    /// Build a key code from its raw value (upper bits are ignored)
    pub const fn new(code: u16) -> Self {
        Self(code & 0x3FF)
    }

    /// Decode the two data bytes of a braille-keyboard message
    ///
    /// Dots 1-6 come from byte 0 bits 0-5, dots 7-8 from byte 1 bits 0-1,
    /// backspace and space from byte 0 bits 6-7.
    pub fn from_bytes(low: u8, high: u8) -> Self {
        let dots16 = (low & 0x3F) as u16;
        let dots78 = ((high & 0x03) as u16) << 6;
        let thumbs = ((low & 0xC0) as u16) << 2;
        Self(dots16 | dots78 | thumbs)
    }

    /// Encode back to the two wire bytes
    pub fn to_bytes(self) -> [u8; 2] {
        let low = (self.0 & 0x3F) as u8 | ((self.0 >> 2) & 0xC0) as u8;
        let high = ((self.0 >> 6) & 0x03) as u8;
        [low, high]
    }

    /// Raw 10-bit code
    pub fn code(self) -> u16 {
        self.0
    }

    /// The eight dot bits
    pub fn dots(self) -> u8 {
        (self.0 & 0xFF) as u8
    }

    /// True for a pure dot pattern or a bare space
    ///
    /// These are typed characters; everything else is a control chord
    /// or a named key.
    pub fn is_character(self) -> bool {
        self.0 <= 0xFF || self.0 == CHORD_SPACE
    }
}

/// Numeric-pad wire characters and the physical key ids they report
const NUMPAD_KEYS: [(u8, u8); 26] = [
    (b'1', 1),
    (b'2', 2),
    (b'3', 3),
    (b'4', 4),
    (b'5', 5),
    (b'6', 6),
    (b'7', 7),
    (b'8', 8),
    (b'9', 9),
    (b'*', 10),
    (b'0', 30),
    (b'#', 11),
    (b'A', 12),
    (b'B', 13),
    (b'C', 14),
    (b'D', 15),
    (b'E', 16),
    (b'F', 17),
    (b'G', 18),
    (b'H', 19),
    (b'I', 20),
    (b'J', 21),
    (b'K', 22),
    (b'L', 23),
    (b'M', 24),
    (b'Z', 25),
];

/// Map a numeric-pad wire character to its physical key id (1-30)
pub fn numpad_key(wire: u8) -> Option<u8> {
    NUMPAD_KEYS
        .iter()
        .find(|(character, _)| *character == wire)
        .map(|&(_, id)| id)
}

/// Map a physical key id back to its numeric-pad wire character
pub fn numpad_wire(id: u8) -> Option<u8> {
    NUMPAD_KEYS
        .iter()
        .find(|(_, key)| *key == id)
        .map(|&(character, _)| character)
}

/// Keyboard events sent by the terminal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum KeyEvent {
    /// Cursor-routing key tap, 1-based index (some indices are reserved)
    Routing(u8),
    /// Braille-keyboard chord
    Braille(ChordCode),
    /// Numeric-pad / function key, as a physical key id
    Numpad(u8),
}

impl KeyEvent {
    /// Returns true if this is a braille-keyboard chord
    pub fn is_chord(&self) -> bool {
        matches!(self, KeyEvent::Braille(_))
    }
}
