//! Keystrokes, control-key state and keystroke classification.
//!
//! The engine never pulls input itself. The host hands it one [`Keystroke`]
//! at a time, and [`classify`] decides whether that keystroke is text, an
//! editing command, a line ending or something to ignore.

use bitflags::bitflags;
use crossterm::event::{KeyCode, KeyEvent, KeyEventState, KeyModifiers};

bitflags! {
    /// Modifier and lock-key state sampled with each keystroke.
    ///
    /// Bit values follow the classic console `dwControlKeyState` layout so
    /// hosts bridging to a real console can pass them through unchanged.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct ControlKeyState: u32 {
        const RIGHT_ALT = 0x0001;
        const LEFT_ALT = 0x0002;
        const RIGHT_CTRL = 0x0004;
        const LEFT_CTRL = 0x0008;
        const SHIFT = 0x0010;
        const NUM_LOCK = 0x0020;
        const SCROLL_LOCK = 0x0040;
        const CAPS_LOCK = 0x0080;
        const ENHANCED_KEY = 0x0100;
    }
}

impl ControlKeyState {
    /// Either Ctrl key is held.
    pub fn ctrl(&self) -> bool {
        self.intersects(Self::LEFT_CTRL | Self::RIGHT_CTRL)
    }

    /// Either Alt key is held.
    pub fn alt(&self) -> bool {
        self.intersects(Self::LEFT_ALT | Self::RIGHT_ALT)
    }

    /// Shift is held.
    pub fn shift(&self) -> bool {
        self.contains(Self::SHIFT)
    }
}

impl From<KeyModifiers> for ControlKeyState {
    fn from(modifiers: KeyModifiers) -> Self {
        let mut state = ControlKeyState::empty();
        if modifiers.contains(KeyModifiers::CONTROL) {
            state |= ControlKeyState::LEFT_CTRL;
        }
        if modifiers.contains(KeyModifiers::ALT) {
            state |= ControlKeyState::LEFT_ALT;
        }
        if modifiers.contains(KeyModifiers::SHIFT) {
            state |= ControlKeyState::SHIFT;
        }
        state
    }
}

/// A single key press delivered by the input source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Keystroke {
    /// The key that was pressed.
    pub code: KeyCode,
    /// Modifier state at the time of the press.
    pub state: ControlKeyState,
}

impl Keystroke {
    /// A key with no modifiers held.
    pub fn new(code: KeyCode) -> Self {
        Self {
            code,
            state: ControlKeyState::empty(),
        }
    }

    /// A plain character key.
    pub fn char(c: char) -> Self {
        Self::new(KeyCode::Char(c))
    }

    /// A character key pressed together with the left Ctrl key.
    pub fn ctrl(c: char) -> Self {
        Self::new(KeyCode::Char(c)).with_state(ControlKeyState::LEFT_CTRL)
    }

    /// Replace the sampled modifier state.
    pub fn with_state(mut self, state: ControlKeyState) -> Self {
        self.state = state;
        self
    }

    /// The character this keystroke produces, if any.
    ///
    /// Ctrl+letter combinations map onto the C0 control range, so
    /// `Keystroke::ctrl('c')` yields `'\x03'`. Enter, Tab, Backspace and
    /// Escape yield their conventional control characters.
    pub fn as_char(&self) -> Option<char> {
        match self.code {
            KeyCode::Char(c) if self.state.ctrl() && !self.state.alt() => {
                control_char_for(c).or(Some(c))
            }
            KeyCode::Char(c) => Some(c),
            KeyCode::Enter => Some('\r'),
            KeyCode::Tab => Some('\t'),
            KeyCode::Backspace => Some('\x08'),
            KeyCode::Esc => Some('\x1b'),
            _ => None,
        }
    }
}

impl From<KeyEvent> for Keystroke {
    fn from(event: KeyEvent) -> Self {
        let mut state = ControlKeyState::from(event.modifiers);
        if event.state.contains(KeyEventState::CAPS_LOCK) {
            state |= ControlKeyState::CAPS_LOCK;
        }
        if event.state.contains(KeyEventState::NUM_LOCK) {
            state |= ControlKeyState::NUM_LOCK;
        }
        if matches!(
            event.code,
            KeyCode::Left
                | KeyCode::Right
                | KeyCode::Up
                | KeyCode::Down
                | KeyCode::Home
                | KeyCode::End
                | KeyCode::Insert
                | KeyCode::Delete
                | KeyCode::PageUp
                | KeyCode::PageDown
        ) {
            state |= ControlKeyState::ENHANCED_KEY;
        }
        Self {
            code: event.code,
            state,
        }
    }
}

/// Map `Ctrl+<c>` onto its C0 control character (`@` through `_`).
fn control_char_for(c: char) -> Option<char> {
    let upper = c.to_ascii_uppercase();
    if ('@'..='_').contains(&upper) {
        Some(((upper as u8) & 0x1f) as char)
    } else {
        None
    }
}

/// Set of control characters that complete a read without a carriage return.
///
/// Only characters below `0x20` can be members; bit `n` stands for the
/// character with code point `n`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct WakeMask(u32);

impl WakeMask {
    /// The empty mask: only a carriage return completes the line.
    pub const NONE: WakeMask = WakeMask(0);

    /// Build a mask from raw bits.
    pub fn from_bits(bits: u32) -> Self {
        Self(bits)
    }

    /// Add a control character to the mask. Characters at or above `0x20`
    /// are ignored.
    pub fn with(self, c: char) -> Self {
        match bit_for(c) {
            Some(bit) => Self(self.0 | bit),
            None => self,
        }
    }

    /// Whether `c` is a member of the mask.
    pub fn contains(&self, c: char) -> bool {
        bit_for(c).is_some_and(|bit| self.0 & bit != 0)
    }

    /// Raw bits.
    pub fn bits(&self) -> u32 {
        self.0
    }
}

fn bit_for(c: char) -> Option<u32> {
    let cp = c as u32;
    (cp < 0x20).then(|| 1 << cp)
}

/// Editing commands understood by the cooked read engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditCommand {
    Backspace,
    Delete,
    DeleteWordBack,
    DeleteToStart,
    DeleteToEnd,
    ClearLine,
    Left,
    Right,
    WordLeft,
    WordRight,
    Home,
    End,
    ToggleInsert,
    HistoryOlder,
    HistoryNewer,
    ReplayLast,
}

/// What a keystroke means to the line editor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyClass {
    /// Text to splice into the line (includes tab).
    Text(char),
    /// Carriage return.
    Enter,
    /// A control character with no editing meaning. It may still be a
    /// member of the wake mask.
    Control(char),
    /// An editing command.
    Edit(EditCommand),
    /// Nothing to do besides sampling the modifier state.
    Ignored,
}

/// Classify a keystroke.
pub fn classify(key: &Keystroke) -> KeyClass {
    let ctrl = key.state.ctrl();
    match key.code {
        KeyCode::Enter => KeyClass::Enter,
        KeyCode::Tab => KeyClass::Text('\t'),
        KeyCode::Backspace if ctrl => KeyClass::Edit(EditCommand::DeleteWordBack),
        KeyCode::Backspace => KeyClass::Edit(EditCommand::Backspace),
        KeyCode::Delete => KeyClass::Edit(EditCommand::Delete),
        KeyCode::Esc => KeyClass::Edit(EditCommand::ClearLine),
        KeyCode::Left if ctrl => KeyClass::Edit(EditCommand::WordLeft),
        KeyCode::Left => KeyClass::Edit(EditCommand::Left),
        KeyCode::Right if ctrl => KeyClass::Edit(EditCommand::WordRight),
        KeyCode::Right => KeyClass::Edit(EditCommand::Right),
        KeyCode::Home if ctrl => KeyClass::Edit(EditCommand::DeleteToStart),
        KeyCode::Home => KeyClass::Edit(EditCommand::Home),
        KeyCode::End if ctrl => KeyClass::Edit(EditCommand::DeleteToEnd),
        KeyCode::End => KeyClass::Edit(EditCommand::End),
        KeyCode::Insert => KeyClass::Edit(EditCommand::ToggleInsert),
        KeyCode::Up => KeyClass::Edit(EditCommand::HistoryOlder),
        KeyCode::Down => KeyClass::Edit(EditCommand::HistoryNewer),
        KeyCode::F(3) => KeyClass::Edit(EditCommand::ReplayLast),
        KeyCode::Char(_) => match key.as_char() {
            Some('\r') => KeyClass::Enter,
            Some('\x08') => KeyClass::Edit(EditCommand::Backspace),
            Some('\t') => KeyClass::Text('\t'),
            Some('\x1b') => KeyClass::Edit(EditCommand::ClearLine),
            Some(c) if c.is_control() => KeyClass::Control(c),
            // Ctrl+Alt together is AltGr, which produces text.
            Some(c) if ctrl == key.state.alt() => KeyClass::Text(c),
            Some(_) | None => KeyClass::Ignored,
        },
        _ => KeyClass::Ignored,
    }
}
