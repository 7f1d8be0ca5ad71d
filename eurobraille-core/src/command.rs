//! Abstract commands surfaced to the hosting layer

/// How a cursor-routing tap is interpreted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum OffsetKind {
    /// Move the cursor to the column
    #[default]
    Route,
    /// Start a cut block at the column
    CutBegin,
    /// End a cut block at the column (line-wise)
    CutLine,
}

/// Keyboard keys that have no dot-pattern equivalent
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Key {
    Backspace,
    Enter,
    Tab,
    CursorUp,
    CursorDown,
    CursorLeft,
    CursorRight,
    PageUp,
    PageDown,
    Home,
    End,
    Delete,
    Escape,
    Insert,
    /// Function key, 0-based (`Function(0)` is F1)
    Function(u8),
}

/// Screen-review navigation handled by the host
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum NavCommand {
    WindowLeft,
    WindowRight,
    LineUp,
    LineDown,
    PrevPrompt,
    NextPrompt,
    PrevSearch,
    NextSearch,
    Info,
    TopLeft,
    BottomLeft,
    PrevDiffLine,
    NextDiffLine,
    Home,
    CursorTrack,
    Freeze,
    PrefMenu,
    Tunes,
    CursorVisible,
    Paste,
    DisplayMode,
}

/// Everything the driver can ask the host to do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Command {
    /// Input was consumed; nothing to do
    Noop,
    /// Type a braille character
    PassDots { dots: u8, control: bool, alt: bool },
    /// Type a named key
    PassKey(Key),
    /// Cursor-routing key action on a 0-based column
    Route { column: u16, kind: OffsetKind },
    /// Switch to virtual console, 0-based
    SwitchConsole(u8),
    /// Show the help screen
    Help,
    /// The link is unusable; tear down and reopen
    RestartDriver,
    /// The terminal asked for something this driver cannot do
    FeatureUnavailable(&'static str),
    /// The display size changed
    Resize(u16),
    /// Navigation handled by the host's screen reviewer
    Nav(NavCommand),
}

impl Command {
    /// Check if this command carries typed input
    pub fn is_input(&self) -> bool {
        matches!(self, Command::PassDots { .. } | Command::PassKey(_))
    }
}

/// Named keys reachable from the braille keyboard, keyed by raw chord code
const RAW_KEYS: [(u16, Key); 26] = [
    (0x100, Key::Backspace),
    (0x300, Key::Enter),
    (0x232, Key::Tab),
    (0x208, Key::CursorUp),
    (0x220, Key::CursorDown),
    (0x210, Key::CursorRight),
    (0x202, Key::CursorLeft),
    (0x205, Key::PageUp),
    (0x228, Key::PageDown),
    (0x207, Key::Home),
    (0x238, Key::End),
    (0x224, Key::Delete),
    (0x21b, Key::Escape),
    (0x215, Key::Insert),
    (0x101, Key::Function(0)),
    (0x103, Key::Function(1)),
    (0x109, Key::Function(2)),
    (0x119, Key::Function(3)),
    (0x111, Key::Function(4)),
    (0x10b, Key::Function(5)),
    (0x11b, Key::Function(6)),
    (0x113, Key::Function(7)),
    (0x10a, Key::Function(8)),
    (0x11a, Key::Function(9)),
    (0x105, Key::Function(10)),
    (0x107, Key::Function(11)),
];

/// Look up a raw chord code in the named-key table
pub fn raw_key(code: u16) -> Option<Key> {
    RAW_KEYS
        .iter()
        .find(|(raw, _)| *raw == code)
        .map(|&(_, key)| key)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_key_lookup() {
        assert_eq!(raw_key(0x300), Some(Key::Enter));
        assert_eq!(raw_key(0x101), Some(Key::Function(0)));
        assert_eq!(raw_key(0x107), Some(Key::Function(11)));
        assert_eq!(raw_key(0x3FF), None);
    }

    #[test]
    fn test_input_classification() {
        assert!(Command::PassKey(Key::Tab).is_input());
        assert!(Command::PassDots {
            dots: 1,
            control: false,
            alt: false
        }
        .is_input());
        assert!(!Command::Noop.is_input());
        assert!(!Command::Nav(NavCommand::LineUp).is_input());
    }
}
