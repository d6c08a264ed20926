#![forbid(unsafe_code)]

//! Terminal input events a search field understands.
//!
//! Only the keys and pointer actions a single-line field reacts to are
//! modelled. Anything else coming from the terminal (function keys, Alt
//! chords, drags, wheel scrolling) maps to `None` and never reaches the
//! field. Hosts built on another toolkit skip this module and drive the field
//! through its toolkit-neutral `FieldEvent` interface instead.
//!
//! Mouse coordinates are 0-indexed cells.

use bitflags::bitflags;
#[cfg(not(target_arch = "wasm32"))]
use crossterm::event as cte;

/// Terminal input event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// A key press, repeat or release.
    Key(KeyEvent),

    /// A mouse button press or release.
    Mouse(MouseEvent),

    /// Terminal was resized.
    Resize {
        /// New width in columns.
        width: u16,
        /// New height in rows.
        height: u16,
    },

    /// Bracketed paste.
    Paste(PasteEvent),

    /// `true` when focus is gained, `false` when lost.
    Focus(bool),

    /// Idle wake-up from the host loop; used to poll timers.
    Tick,
}

impl Event {
    /// Map a crossterm event. Returns `None` for input the field ignores.
    #[must_use]
    #[cfg(not(target_arch = "wasm32"))]
    pub fn from_crossterm(event: cte::Event) -> Option<Self> {
        match event {
            cte::Event::Key(key) => map_key_event(key).map(Event::Key),
            cte::Event::Mouse(mouse) => map_mouse_event(mouse).map(Event::Mouse),
            cte::Event::Resize(width, height) => Some(Event::Resize { width, height }),
            cte::Event::Paste(text) => Some(Event::Paste(PasteEvent::new(text))),
            cte::Event::FocusGained => Some(Event::Focus(true)),
            cte::Event::FocusLost => Some(Event::Focus(false)),
        }
    }
}

/// A keyboard event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyEvent {
    /// Key that was pressed.
    pub code: KeyCode,

    /// Shift and Ctrl state.
    pub modifiers: Modifiers,

    /// Press, repeat or release.
    pub kind: KeyEventKind,
}

impl KeyEvent {
    /// An unmodified key press.
    #[must_use]
    pub const fn new(code: KeyCode) -> Self {
        Self {
            code,
            modifiers: Modifiers::NONE,
            kind: KeyEventKind::Press,
        }
    }

    /// Set the modifiers.
    #[must_use]
    pub const fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    /// Set the event kind.
    #[must_use]
    pub const fn with_kind(mut self, kind: KeyEventKind) -> Self {
        self.kind = kind;
        self
    }

    /// Whether this is the character key `c`.
    #[must_use]
    pub fn is_char(&self, c: char) -> bool {
        matches!(self.code, KeyCode::Char(ch) if ch == c)
    }

    /// Whether Ctrl is held.
    #[must_use]
    pub const fn ctrl(&self) -> bool {
        self.modifiers.contains(Modifiers::CTRL)
    }

    /// Press or auto-repeat; releases are ignored by the field.
    #[must_use]
    pub const fn is_actionable(&self) -> bool {
        matches!(self.kind, KeyEventKind::Press | KeyEventKind::Repeat)
    }
}

/// Keys a search field handles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    /// Printable character.
    Char(char),
    /// Confirm the highlighted row.
    Enter,
    /// Dismiss the panel.
    Escape,
    /// Accept the first row.
    Tab,
    Backspace,
    Delete,
    Home,
    End,
    Up,
    Down,
    Left,
    Right,
}

/// The type of key event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum KeyEventKind {
    /// Key pressed (also the default when the terminal cannot tell).
    #[default]
    Press,
    /// Key held down.
    Repeat,
    /// Key released.
    Release,
}

bitflags! {
    /// Modifier keys the field binds to.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Modifiers: u8 {
        /// No modifiers.
        const NONE  = 0b00;
        /// Extends the selection with caret keys.
        const SHIFT = 0b01;
        /// Word motions, select-all, and the demo's quit chords.
        const CTRL  = 0b10;
    }
}

impl Default for Modifiers {
    fn default() -> Self {
        Self::NONE
    }
}

/// A mouse button event at a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MouseEvent {
    /// Press or release, and which button.
    pub kind: MouseEventKind,
    /// Column (0 is leftmost).
    pub x: u16,
    /// Row (0 is topmost).
    pub y: u16,
}

impl MouseEvent {
    /// A mouse event at `(x, y)`.
    #[must_use]
    pub const fn new(kind: MouseEventKind, x: u16, y: u16) -> Self {
        Self { kind, x, y }
    }
}

/// Mouse button transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseEventKind {
    /// Button pressed.
    Down(MouseButton),
    /// Button released.
    Up(MouseButton),
}

/// Mouse buttons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    Left,
    Right,
}

/// Pasted text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PasteEvent {
    /// Pasted content, line breaks included.
    pub text: String,
}

impl PasteEvent {
    /// A paste of `text`.
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

/// Alt and Super chords have no binding; they are dropped rather than typed.
#[cfg(not(target_arch = "wasm32"))]
fn map_key_event(event: cte::KeyEvent) -> Option<KeyEvent> {
    let unbound = cte::KeyModifiers::ALT
        | cte::KeyModifiers::SUPER
        | cte::KeyModifiers::HYPER
        | cte::KeyModifiers::META;
    if event.modifiers.intersects(unbound) {
        return None;
    }
    let kind = match event.kind {
        cte::KeyEventKind::Press => KeyEventKind::Press,
        cte::KeyEventKind::Repeat => KeyEventKind::Repeat,
        cte::KeyEventKind::Release => KeyEventKind::Release,
    };
    Some(KeyEvent {
        code: map_key_code(event.code)?,
        modifiers: map_modifiers(event.modifiers),
        kind,
    })
}

#[cfg(not(target_arch = "wasm32"))]
fn map_key_code(code: cte::KeyCode) -> Option<KeyCode> {
    Some(match code {
        cte::KeyCode::Char(c) => KeyCode::Char(c),
        cte::KeyCode::Enter => KeyCode::Enter,
        cte::KeyCode::Esc => KeyCode::Escape,
        cte::KeyCode::Tab => KeyCode::Tab,
        cte::KeyCode::Backspace => KeyCode::Backspace,
        cte::KeyCode::Delete => KeyCode::Delete,
        cte::KeyCode::Home => KeyCode::Home,
        cte::KeyCode::End => KeyCode::End,
        cte::KeyCode::Up => KeyCode::Up,
        cte::KeyCode::Down => KeyCode::Down,
        cte::KeyCode::Left => KeyCode::Left,
        cte::KeyCode::Right => KeyCode::Right,
        _ => return None,
    })
}

#[cfg(not(target_arch = "wasm32"))]
fn map_modifiers(modifiers: cte::KeyModifiers) -> Modifiers {
    let mut mapped = Modifiers::NONE;
    mapped.set(Modifiers::SHIFT, modifiers.contains(cte::KeyModifiers::SHIFT));
    mapped.set(Modifiers::CTRL, modifiers.contains(cte::KeyModifiers::CONTROL));
    mapped
}

#[cfg(not(target_arch = "wasm32"))]
fn map_mouse_event(event: cte::MouseEvent) -> Option<MouseEvent> {
    let kind = match event.kind {
        cte::MouseEventKind::Down(button) => MouseEventKind::Down(map_mouse_button(button)?),
        cte::MouseEventKind::Up(button) => MouseEventKind::Up(map_mouse_button(button)?),
        _ => return None,
    };
    Some(MouseEvent::new(kind, event.column, event.row))
}

#[cfg(not(target_arch = "wasm32"))]
fn map_mouse_button(button: cte::MouseButton) -> Option<MouseButton> {
    match button {
        cte::MouseButton::Left => Some(MouseButton::Left),
        cte::MouseButton::Right => Some(MouseButton::Right),
        cte::MouseButton::Middle => None,
    }
}
