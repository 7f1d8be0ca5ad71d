//! Messages shown on the braille line while a gesture is in progress

use heapless::String;

use eurobraille_protocol::messages::MAX_VERSION_LEN;

use crate::link::ModelId;

/// A short message the host should display instead of the screen
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Prompt {
    /// Main menu legend
    Menu,
    /// Console picker with 6 or 7 slots
    ConsolePicker { slots: u8 },
    /// Programming level entered
    Programming(ModelId),
    /// View-on level entered
    ViewOn(ModelId),
    /// Firmware version of the terminal
    Version(String<MAX_VERSION_LEN>),
    /// Alt latched
    Alt,
    /// Control latched
    Control,
    /// Both latched
    AltControl,
    /// Requested level has no bindings for this model
    Unimplemented,
}

impl Prompt {
    /// Console picker sized for the display width
    pub fn console_picker(columns: u16) -> Self {
        let slots = if columns == 20 { 6 } else { 7 };
        Prompt::ConsolePicker { slots }
    }

    /// Text to show
    pub fn text(&self) -> &str {
        match self {
            Prompt::Menu => "-:tty hlp info t",
            Prompt::ConsolePicker { slots: 6 } => "switch:1 2 3 4 5 6 t",
            Prompt::ConsolePicker { .. } => "switch:1 2 3 4 5 6 7 t",
            Prompt::Programming(ModelId::Scriba) => "Beta level ...",
            Prompt::Programming(ModelId::Iris) => "Level 2 ...",
            Prompt::Programming(_) => "P PROGRAMMING      x",
            Prompt::ViewOn(ModelId::Scriba) => "Alpha level ...",
            Prompt::ViewOn(_) => "V VIEW ON          x",
            Prompt::Version(version) => version.as_str(),
            Prompt::Alt => "! alt",
            Prompt::Control => "! control ",
            Prompt::AltControl => "! alt control",
            Prompt::Unimplemented => "P Unimplemented yet!",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_console_picker_slots() {
        assert_eq!(Prompt::console_picker(20).text(), "switch:1 2 3 4 5 6 t");
        assert_eq!(Prompt::console_picker(40).text(), "switch:1 2 3 4 5 6 7 t");
        assert_eq!(Prompt::console_picker(32).text(), "switch:1 2 3 4 5 6 7 t");
    }

    #[test]
    fn test_model_specific_levels() {
        assert_eq!(Prompt::Programming(ModelId::Clio).text(), "P PROGRAMMING      x");
        assert_eq!(Prompt::Programming(ModelId::Scriba).text(), "Beta level ...");
        assert_eq!(Prompt::ViewOn(ModelId::Scriba).text(), "Alpha level ...");
        assert_eq!(Prompt::ViewOn(ModelId::Iris).text(), "V VIEW ON          x");
    }
}
