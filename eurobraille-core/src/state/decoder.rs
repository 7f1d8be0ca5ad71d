//! Message-driven transitions of the input context

use eurobraille_protocol::events::{ChordCode, CHORD_ALT, CHORD_CONTROL};
use eurobraille_protocol::{KeyEvent, ModeCheck, TerminalMessage};

use super::context::{InputContext, InputMode};
use crate::command::{raw_key, Command, NavCommand, OffsetKind};
use crate::keymap::{Action, Handler, KeyBindingTable};
use crate::link::{LinkState, ModelId};
use crate::prompt::Prompt;

// Routing indices with a fixed meaning in normal mode
const ROUTE_MENU: u8 = 0x83;
const ROUTE_MENU_ALT: u8 = 0x57;
const ROUTE_MENU_IRIS: u8 = 0x29;

// Routing indices in the menu
const MENU_EXIT: u8 = 0x02;
const MENU_CONSOLES: u8 = 0x06;
const MENU_HELP: u8 = 0x0A;
const MENU_VERSION: u8 = 0x0F;

// Routing indices in the console picker: exit, then one odd index per console
const CONSOLE_EXIT: u8 = 0x07;
const CONSOLE_FIRST: u8 = 0x09;
const CONSOLE_LAST: u8 = 0x15;

// Numeric-pad keys with a fixed meaning
const KEY_PROGRAM_EXIT: u8 = 10;
const VIEW_ON_CONSOLE_FIRST: u8 = 16;
const VIEW_ON_CONSOLE_LAST: u8 = 22;

/// Something only the link session can do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LinkRequest {
    /// Send a fresh identify request
    Reidentify,
    /// The expected PC-mode notice after identify arrived
    AcknowledgePcMode,
}

/// Result of one message
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Outcome {
    /// Command for the host, or `None` if the message produced nothing
    pub command: Option<Command>,
    /// Prompt the host should show on the braille line
    pub prompt: Option<Prompt>,
    /// The braille line must be fully rewritten on the next render
    pub refresh: bool,
    /// Work for the link session
    pub link: Option<LinkRequest>,
}

impl Outcome {
    /// Nothing happened
    pub fn none() -> Self {
        Self::default()
    }

    /// A plain command
    pub fn command(command: Command) -> Self {
        Self {
            command: Some(command),
            ..Self::default()
        }
    }

    fn noop() -> Self {
        Self::command(Command::Noop)
    }

    fn with_prompt(mut self, prompt: Prompt) -> Self {
        self.prompt = Some(prompt);
        self
    }

    fn with_refresh(mut self) -> Self {
        self.refresh = true;
        self
    }

    fn with_link(mut self, request: LinkRequest) -> Self {
        self.link = Some(request);
        self
    }
}

/// Input state machine for one connection
///
/// Fed only with messages from frames the codec has accepted, so a
/// retransmitted frame never reaches it twice.
#[derive(Debug, Clone, Default)]
pub struct InputDecoder {
    context: InputContext,
    table: KeyBindingTable,
}

impl InputDecoder {
    /// Decoder for a terminal that has not identified yet
    pub fn new() -> Self {
        Self {
            context: InputContext::new(),
            table: KeyBindingTable::empty(),
        }
    }

    /// Current context
    pub fn context(&self) -> &InputContext {
        &self.context
    }

    /// Current mode
    pub fn mode(&self) -> InputMode {
        self.context.mode
    }

    /// Bindings in use
    pub fn table(&self) -> &KeyBindingTable {
        &self.table
    }

    /// Select bindings for a freshly identified terminal and start over
    pub fn on_identified(&mut self, link: &LinkState) {
        self.table = match link.columns() {
            Some(columns) => KeyBindingTable::select(link.model, columns),
            None => KeyBindingTable::empty(),
        };
        self.context.reset();
    }

    /// Forget the terminal (connection closed)
    pub fn reset(&mut self) {
        self.context.reset();
        self.table = KeyBindingTable::empty();
    }

    /// Process one terminal message
    ///
    /// Identify responses are the link session's business and produce
    /// nothing here.
    pub fn handle(&mut self, link: &LinkState, message: &TerminalMessage<'_>) -> Outcome {
        match message {
            TerminalMessage::ModeCheck(mode) => self.handle_mode(link, *mode),
            TerminalMessage::Key(event) => self.handle_key(link, *event),
            TerminalMessage::Identify(_) => Outcome::none(),
        }
    }

    /// Process a mode-check notice
    ///
    /// The PC-mode notice that follows an identify is expected and only
    /// acknowledged; a later one means the terminal was reset and triggers
    /// a re-identify.
    pub fn handle_mode(&mut self, link: &LinkState, mode: ModeCheck) -> Outcome {
        match mode {
            ModeCheck::PcModeEntered if link.just_identified => {
                Outcome::none().with_link(LinkRequest::AcknowledgePcMode)
            }
            ModeCheck::PcModeEntered => {
                self.context.return_to_normal();
                Outcome::noop()
                    .with_refresh()
                    .with_link(LinkRequest::Reidentify)
            }
            ModeCheck::PcModeLeft => Outcome::none(),
            ModeCheck::SpeechModeEntered => {
                Outcome::command(Command::FeatureUnavailable("Speech unavailable"))
            }
        }
    }

    /// Process a key event
    pub fn handle_key(&mut self, link: &LinkState, event: KeyEvent) -> Outcome {
        // Any other key cancels a pending modifier before it is processed
        if !event.is_chord() && self.context.mode == InputMode::ModifierPending {
            self.context.return_to_normal();
        }

        match event {
            KeyEvent::Routing(index) => self.routing(link, index),
            KeyEvent::Braille(chord) => self.chord(chord),
            KeyEvent::Numpad(key) => self.numpad(link, key),
        }
    }

    fn routing(&mut self, link: &LinkState, index: u8) -> Outcome {
        match self.context.mode {
            InputMode::Normal | InputMode::ModifierPending => self.route_normal(link, index),
            InputMode::Menu => self.route_menu(link, index),
            InputMode::ConsoleSwitchPending => self.route_console(index),
            InputMode::Programming | InputMode::ViewOn => Outcome::none(),
        }
    }

    fn route_normal(&mut self, link: &LinkState, index: u8) -> Outcome {
        let Some(columns) = link.columns() else {
            return Outcome::none();
        };

        let menu = match index {
            ROUTE_MENU | ROUTE_MENU_ALT => true,
            ROUTE_MENU_IRIS => link.model == ModelId::Iris,
            _ => false,
        };
        if menu {
            return self.enter_menu();
        }

        if index == 0 || index as u16 > columns {
            return Outcome::none();
        }
        let kind = self.context.take_offset();
        Outcome::command(Command::Route {
            column: index as u16 - 1,
            kind,
        })
    }

    fn enter_menu(&mut self) -> Outcome {
        self.context.enter(InputMode::Menu);
        Outcome::noop().with_prompt(Prompt::Menu)
    }

    fn route_menu(&mut self, link: &LinkState, index: u8) -> Outcome {
        match index {
            MENU_EXIT => self.finish(Outcome::noop()),
            MENU_CONSOLES => {
                self.context.enter(InputMode::ConsoleSwitchPending);
                let columns = link.columns().unwrap_or(0);
                Outcome::noop().with_prompt(Prompt::console_picker(columns))
            }
            MENU_HELP => self.finish(Outcome::command(Command::Help)),
            MENU_VERSION => {
                self.finish(Outcome::noop().with_prompt(Prompt::Version(link.version.clone())))
            }
            _ => Outcome::none(),
        }
    }

    fn route_console(&mut self, index: u8) -> Outcome {
        match index {
            CONSOLE_EXIT => self.finish(Outcome::noop()),
            CONSOLE_FIRST..=CONSOLE_LAST if index % 2 == 1 => {
                let console = (index - CONSOLE_FIRST) / 2;
                self.finish(Outcome::command(Command::SwitchConsole(console)))
            }
            _ => Outcome::none(),
        }
    }

    /// Leave a prompt mode and force the screen back
    fn finish(&mut self, outcome: Outcome) -> Outcome {
        self.context.return_to_normal();
        outcome.with_refresh()
    }

    fn chord(&mut self, chord: ChordCode) -> Outcome {
        if matches!(
            self.context.mode,
            InputMode::Programming | InputMode::ViewOn
        ) {
            return Outcome::none();
        }

        match chord.code() {
            CHORD_ALT => self.toggle_alt(),
            CHORD_CONTROL => self.toggle_control(),
            _ if chord.is_character() => self.pass_dots(chord.dots()),
            code => self.pass_raw(code),
        }
    }

    fn toggle_alt(&mut self) -> Outcome {
        if self.context.alt {
            self.context.alt = false;
            return self.release_latch();
        }
        if self.context.control {
            // Alt cannot be added once control is latched
            return Outcome::none();
        }
        self.context.alt = true;
        self.context.enter(InputMode::ModifierPending);
        Outcome::none().with_prompt(Prompt::Alt)
    }

    fn toggle_control(&mut self) -> Outcome {
        if self.context.control {
            self.context.control = false;
            return self.release_latch();
        }
        self.context.control = true;
        self.context.enter(InputMode::ModifierPending);
        let prompt = if self.context.alt {
            Prompt::AltControl
        } else {
            Prompt::Control
        };
        Outcome::none().with_prompt(prompt)
    }

    /// One latch was switched off; leave modifier mode if none is left
    fn release_latch(&mut self) -> Outcome {
        if self.context.latched() {
            let prompt = if self.context.alt {
                Prompt::Alt
            } else {
                Prompt::Control
            };
            return Outcome::noop().with_prompt(prompt);
        }
        self.finish(Outcome::noop())
    }

    fn pass_dots(&mut self, dots: u8) -> Outcome {
        let command = Command::PassDots {
            dots,
            control: self.context.control,
            alt: self.context.alt,
        };
        if self.context.latched() {
            return self.finish(Outcome::command(command));
        }
        Outcome::command(command)
    }

    fn pass_raw(&mut self, code: u16) -> Outcome {
        if self.context.latched() {
            // Named keys take no modifiers; the chord just cancels them
            return self.finish(Outcome::noop());
        }
        match raw_key(code) {
            Some(key) => Outcome::command(Command::PassKey(key)),
            None => Outcome::none(),
        }
    }

    fn numpad(&mut self, link: &LinkState, key: u8) -> Outcome {
        match self.context.mode {
            InputMode::Programming => self.programming_key(link, key),
            InputMode::ViewOn => self.view_on_key(key),
            _ => match self.table.lookup(key) {
                Some(action) => self.run(link, action),
                None => Outcome::none(),
            },
        }
    }

    fn run(&mut self, link: &LinkState, action: Action) -> Outcome {
        match action {
            Action::Command(command) => Outcome::command(command),
            Action::Handler(handler) => self.run_handler(link, handler),
        }
    }

    fn run_handler(&mut self, link: &LinkState, handler: Handler) -> Outcome {
        match handler {
            Handler::Program if !self.table.has_programming() => {
                Outcome::noop().with_prompt(Prompt::Unimplemented)
            }
            Handler::Program => {
                self.context.enter(InputMode::Programming);
                Outcome::none().with_prompt(Prompt::Programming(link.model))
            }
            Handler::ViewOn => {
                self.context.enter(InputMode::ViewOn);
                Outcome::none().with_prompt(Prompt::ViewOn(link.model))
            }
            Handler::BeginBlock => {
                self.context.offset = OffsetKind::CutBegin;
                Outcome::none()
            }
            Handler::EndBlock => {
                self.context.offset = OffsetKind::CutLine;
                Outcome::none()
            }
            Handler::EnterMenu => self.enter_menu(),
        }
    }

    fn programming_key(&mut self, link: &LinkState, key: u8) -> Outcome {
        if key == KEY_PROGRAM_EXIT {
            return self.finish(Outcome::noop());
        }
        match self.table.lookup_programming(key) {
            Some(action) => {
                self.context.return_to_normal();
                self.run(link, action).with_refresh()
            }
            None => Outcome::none(),
        }
    }

    fn view_on_key(&mut self, key: u8) -> Outcome {
        let command = match key {
            1 | 11 => Command::Noop,
            3 => Command::Nav(NavCommand::TopLeft),
            9 => Command::Nav(NavCommand::BottomLeft),
            12 => Command::Nav(NavCommand::DisplayMode),
            VIEW_ON_CONSOLE_FIRST..=VIEW_ON_CONSOLE_LAST => {
                Command::SwitchConsole(key - VIEW_ON_CONSOLE_FIRST)
            }
            24 => Command::Help,
            _ => return Outcome::none(),
        };
        self.finish(Outcome::command(command))
    }
}
