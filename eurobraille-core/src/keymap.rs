//! Numeric-pad key bindings per terminal model
//!
//! Each model has a primary table, consulted in normal navigation, and a
//! programming table, consulted after the programming key. Tables map the
//! physical key id (1-30, see `eurobraille_protocol::events`) either to a
//! command or to a handler that changes input state.

use crate::command::{Command, Key, NavCommand};
use crate::link::ModelId;

/// Input-state changes a key can trigger instead of a plain command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Handler {
    /// Enter the programming level
    Program,
    /// Enter the view-on level
    ViewOn,
    /// Next routing tap starts a cut block
    BeginBlock,
    /// Next routing tap ends a cut block
    EndBlock,
    /// Open the menu, as routing index 0x83 does
    EnterMenu,
}

/// What a bound key does
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Action {
    Command(Command),
    Handler(Handler),
}

/// One physical key and its action
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Binding {
    pub key: u8,
    pub action: Action,
}

const fn nav(key: u8, command: NavCommand) -> Binding {
    Binding {
        key,
        action: Action::Command(Command::Nav(command)),
    }
}

const fn pass(key: u8, passed: Key) -> Binding {
    Binding {
        key,
        action: Action::Command(Command::PassKey(passed)),
    }
}

const fn handler(key: u8, handler: Handler) -> Binding {
    Binding {
        key,
        action: Action::Handler(handler),
    }
}

const fn noop(key: u8) -> Binding {
    Binding {
        key,
        action: Action::Command(Command::Noop),
    }
}

const SCRIBA: &[Binding] = &[
    pass(2, Key::CursorUp),
    pass(4, Key::CursorLeft),
    pass(6, Key::CursorRight),
    pass(8, Key::CursorDown),
    handler(10, Handler::Program),
    handler(11, Handler::ViewOn),
    noop(13),
    nav(16, NavCommand::WindowLeft),
    nav(17, NavCommand::LineUp),
    nav(18, NavCommand::PrevPrompt),
    nav(19, NavCommand::PrevSearch),
    nav(20, NavCommand::Info),
    nav(21, NavCommand::NextSearch),
    nav(22, NavCommand::NextPrompt),
    nav(23, NavCommand::LineDown),
    nav(24, NavCommand::WindowRight),
];

/// Programming level, shared by every known model
const PROGRAMMING: &[Binding] = &[
    nav(2, NavCommand::PrefMenu),
    nav(6, NavCommand::Tunes),
    nav(8, NavCommand::CursorTrack),
    handler(16, Handler::BeginBlock),
    nav(23, NavCommand::Paste),
    handler(24, Handler::EndBlock),
];

const AZER40: &[Binding] = &[
    nav(16, NavCommand::WindowLeft),
    nav(17, NavCommand::LineUp),
    nav(18, NavCommand::PrevPrompt),
    nav(20, NavCommand::Info),
    nav(22, NavCommand::NextPrompt),
    nav(23, NavCommand::LineDown),
    nav(24, NavCommand::WindowRight),
];

/// AzerBraille 80, also NoteBraille and Clio
const AZER80: &[Binding] = &[
    nav(1, NavCommand::TopLeft),
    pass(2, Key::CursorUp),
    nav(3, NavCommand::PrevDiffLine),
    pass(4, Key::CursorLeft),
    nav(5, NavCommand::Home),
    pass(6, Key::CursorRight),
    nav(7, NavCommand::BottomLeft),
    pass(8, Key::CursorDown),
    nav(9, NavCommand::NextDiffLine),
    handler(10, Handler::Program),
    nav(30, NavCommand::CursorTrack),
    handler(11, Handler::ViewOn),
    nav(12, NavCommand::Freeze),
    nav(16, NavCommand::WindowLeft),
    nav(17, NavCommand::LineUp),
    nav(18, NavCommand::PrevPrompt),
    nav(19, NavCommand::PrevSearch),
    nav(20, NavCommand::Info),
    nav(21, NavCommand::NextSearch),
    nav(22, NavCommand::NextPrompt),
    nav(23, NavCommand::LineDown),
    nav(24, NavCommand::WindowRight),
];

const IRIS: &[Binding] = &[
    pass(2, Key::CursorUp),
    pass(4, Key::CursorLeft),
    pass(6, Key::CursorRight),
    pass(8, Key::CursorDown),
    handler(10, Handler::Program),
    handler(11, Handler::ViewOn),
    nav(16, NavCommand::WindowLeft),
    nav(17, NavCommand::LineUp),
    nav(18, NavCommand::CursorVisible),
    nav(19, NavCommand::PrefMenu),
    noop(20),
    handler(21, Handler::EnterMenu),
    nav(22, NavCommand::Tunes),
    nav(23, NavCommand::LineDown),
    nav(24, NavCommand::WindowRight),
];

/// Bindings selected for one terminal, read-only for the session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct KeyBindingTable {
    primary: &'static [Binding],
    programming: &'static [Binding],
}

impl KeyBindingTable {
    /// Table with no bindings (unknown or unidentified terminal)
    pub const fn empty() -> Self {
        Self {
            primary: &[],
            programming: &[],
        }
    }

    /// Pick the tables for a model and display width
    ///
    /// AzerBraille has separate 40- and 80-cell layouts; other widths of
    /// that family get no primary bindings.
    pub fn select(model: ModelId, columns: u16) -> Self {
        let primary: &'static [Binding] = match (model, columns) {
            (ModelId::NoteBraille, _) | (ModelId::Clio, _) => AZER80,
            (ModelId::Scriba, _) => SCRIBA,
            (ModelId::AzerBraille, 40) => AZER40,
            (ModelId::AzerBraille, 80) => AZER80,
            (ModelId::AzerBraille, _) => &[],
            (ModelId::Iris, _) => IRIS,
            (ModelId::Unknown, _) => return Self::empty(),
        };
        Self {
            primary,
            programming: PROGRAMMING,
        }
    }

    /// Action bound to a key in normal navigation
    pub fn lookup(&self, key: u8) -> Option<Action> {
        find(self.primary, key)
    }

    /// Action bound to a key at the programming level
    pub fn lookup_programming(&self, key: u8) -> Option<Action> {
        find(self.programming, key)
    }

    /// Check if the programming level has any bindings
    pub fn has_programming(&self) -> bool {
        !self.programming.is_empty()
    }

    /// Number of primary bindings
    pub fn len(&self) -> usize {
        self.primary.len()
    }

    /// Check if no primary bindings exist
    pub fn is_empty(&self) -> bool {
        self.primary.is_empty()
    }
}

fn find(table: &[Binding], key: u8) -> Option<Action> {
    table
        .iter()
        .find(|binding| binding.key == key)
        .map(|binding| binding.action)
}
