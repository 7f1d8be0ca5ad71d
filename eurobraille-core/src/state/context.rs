//! Input context: current mode plus modifier latches

use crate::command::OffsetKind;

/// What the next key press means
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum InputMode {
    /// Plain navigation; every completed gesture returns here
    #[default]
    Normal,
    /// Routing keys pick a menu entry
    Menu,
    /// Routing keys pick a virtual console
    ConsoleSwitchPending,
    /// Control and/or alt latched, waiting for the chord they apply to
    ModifierPending,
    /// Numeric-pad keys use the programming-level bindings
    Programming,
    /// Numeric-pad keys pick a view-on action
    ViewOn,
}

impl InputMode {
    /// Check if a prompt owns the braille line in this mode
    pub fn holds_display(&self) -> bool {
        !matches!(self, InputMode::Normal)
    }
}

/// Mode, latches and pending routing kind of one connection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct InputContext {
    pub mode: InputMode,
    pub control: bool,
    pub alt: bool,
    /// Applied to the next routing tap, then reset
    pub offset: OffsetKind,
}

impl InputContext {
    /// Fresh context for a newly identified terminal
    pub const fn new() -> Self {
        Self {
            mode: InputMode::Normal,
            control: false,
            alt: false,
            offset: OffsetKind::Route,
        }
    }

    /// Back to the initial context, pending offset included
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// Check if either modifier is latched
    pub fn latched(&self) -> bool {
        self.control || self.alt
    }

    /// Drop both latches
    pub fn clear_latches(&mut self) {
        self.control = false;
        self.alt = false;
    }

    /// Switch to a prompt mode
    ///
    /// Menu-like modes and modifier-pending exclude each other, so entering
    /// any mode other than `ModifierPending` drops the latches.
    pub fn enter(&mut self, mode: InputMode) {
        if mode != InputMode::ModifierPending {
            self.clear_latches();
        }
        self.mode = mode;
    }

    /// Finish a gesture: `Normal` with no latches
    pub fn return_to_normal(&mut self) {
        self.clear_latches();
        self.mode = InputMode::Normal;
    }

    /// Take the pending routing kind, leaving the default behind
    pub fn take_offset(&mut self) -> OffsetKind {
        core::mem::take(&mut self.offset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_enter_menu_clears_latches() {
        let mut context = InputContext::new();
        context.control = true;
        context.enter(InputMode::ModifierPending);
        assert!(context.control);

        context.enter(InputMode::Menu);
        assert!(!context.latched());
        assert_eq!(context.mode, InputMode::Menu);
    }

    #[test]
    fn test_offset_is_taken_once() {
        let mut context = InputContext::new();
        context.offset = OffsetKind::CutBegin;
        assert_eq!(context.take_offset(), OffsetKind::CutBegin);
        assert_eq!(context.take_offset(), OffsetKind::Route);
    }

    #[test]
    fn test_return_to_normal_keeps_offset() {
        let mut context = InputContext::new();
        context.offset = OffsetKind::CutLine;
        context.alt = true;
        context.mode = InputMode::ModifierPending;
        context.return_to_normal();
        assert_eq!(context.mode, InputMode::Normal);
        assert!(!context.alt);
        assert_eq!(context.offset, OffsetKind::CutLine);
    }
}
