//! Raw input types delivered by the host.
//!
//! A host converts its native events into [`RawInput`] and hands them to
//! [`App::handle_input`](crate::app::App::handle_input). Pointer coordinates
//! are device (page) coordinates; the canvas converts them into its own
//! space. Terminal hosts can use [`from_crossterm`].

use std::ops::{BitAnd, BitOr};

// ---------------------------------------------------------------------------
// Key
// ---------------------------------------------------------------------------

/// Keyboard key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Char(char),
    Enter,
    Escape,
    Tab,
    BackTab,
    Backspace,
    Delete,
    Left,
    Right,
    Up,
    Down,
    Home,
    End,
    PageUp,
    PageDown,
    F(u8),
}

// ---------------------------------------------------------------------------
// Modifiers
// ---------------------------------------------------------------------------

/// Modifier key bitmask.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Modifiers(pub u8);

impl Modifiers {
    pub const NONE: Modifiers = Modifiers(0);
    pub const SHIFT: Modifiers = Modifiers(1);
    pub const CTRL: Modifiers = Modifiers(2);
    pub const ALT: Modifiers = Modifiers(4);
    pub const META: Modifiers = Modifiers(8);

    /// Whether `self` contains all the bits in `other`.
    pub fn contains(self, other: Modifiers) -> bool {
        (self.0 & other.0) == other.0
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }
}

impl BitOr for Modifiers {
    type Output = Modifiers;
    fn bitor(self, rhs: Self) -> Self::Output {
        Modifiers(self.0 | rhs.0)
    }
}

impl BitAnd for Modifiers {
    type Output = Modifiers;
    fn bitand(self, rhs: Self) -> Self::Output {
        Modifiers(self.0 & rhs.0)
    }
}

// ---------------------------------------------------------------------------
// KeyEvent
// ---------------------------------------------------------------------------

/// A key with its modifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyEvent {
    pub code: Key,
    pub modifiers: Modifiers,
}

impl KeyEvent {
    pub fn new(code: Key, modifiers: Modifiers) -> Self {
        Self { code, modifiers }
    }
}

/// Phase of a key stroke.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyAction {
    Pressed,
    Released,
    /// A character was produced.
    Typed,
}

// ---------------------------------------------------------------------------
// Pointers
// ---------------------------------------------------------------------------

/// Identifies one pointer (the mouse, or one touch point).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PointerId(pub u32);

impl PointerId {
    pub const MOUSE: PointerId = PointerId(0);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PointerButton {
    #[default]
    Primary,
    Secondary,
    Middle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PointerType {
    #[default]
    Mouse,
    Touch,
    Pen,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PointerAction {
    Down,
    Up,
    Move,
    /// The pointer left the canvas.
    Leave,
}

/// A device-level pointer sample.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RawPointer {
    pub action: PointerAction,
    pub pointer: PointerId,
    pub pointer_type: PointerType,
    pub button: PointerButton,
    pub x: f64,
    pub y: f64,
    pub modifiers: Modifiers,
}

impl RawPointer {
    /// A primary-button mouse sample.
    pub fn mouse(action: PointerAction, x: f64, y: f64) -> Self {
        Self {
            action,
            pointer: PointerId::MOUSE,
            pointer_type: PointerType::Mouse,
            button: PointerButton::Primary,
            x,
            y,
            modifiers: Modifiers::NONE,
        }
    }

    /// A touch sample for touch point `id`.
    pub fn touch(action: PointerAction, id: u32, x: f64, y: f64) -> Self {
        Self {
            pointer: PointerId(id),
            pointer_type: PointerType::Touch,
            ..Self::mouse(action, x, y)
        }
    }
}

// ---------------------------------------------------------------------------
// RawInput
// ---------------------------------------------------------------------------

/// Top-level raw input.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RawInput {
    Pointer(RawPointer),
    Key { action: KeyAction, key: KeyEvent },
}

impl RawInput {
    pub fn key(action: KeyAction, code: Key, modifiers: Modifiers) -> Self {
        RawInput::Key { action, key: KeyEvent::new(code, modifiers) }
    }
}

// ---------------------------------------------------------------------------
// crossterm conversions
// ---------------------------------------------------------------------------

fn convert_modifiers(m: crossterm::event::KeyModifiers) -> Modifiers {
    use crossterm::event::KeyModifiers;
    let mut out = Modifiers::NONE;
    if m.contains(KeyModifiers::SHIFT) {
        out = out | Modifiers::SHIFT;
    }
    if m.contains(KeyModifiers::CONTROL) {
        out = out | Modifiers::CTRL;
    }
    if m.contains(KeyModifiers::ALT) {
        out = out | Modifiers::ALT;
    }
    if m.contains(KeyModifiers::META) || m.contains(KeyModifiers::SUPER) {
        out = out | Modifiers::META;
    }
    out
}

fn convert_key(code: crossterm::event::KeyCode) -> Option<Key> {
    use crossterm::event::KeyCode;
    Some(match code {
        KeyCode::Char(c) => Key::Char(c),
        KeyCode::Enter => Key::Enter,
        KeyCode::Esc => Key::Escape,
        KeyCode::Tab => Key::Tab,
        KeyCode::BackTab => Key::BackTab,
        KeyCode::Backspace => Key::Backspace,
        KeyCode::Delete => Key::Delete,
        KeyCode::Left => Key::Left,
        KeyCode::Right => Key::Right,
        KeyCode::Up => Key::Up,
        KeyCode::Down => Key::Down,
        KeyCode::Home => Key::Home,
        KeyCode::End => Key::End,
        KeyCode::PageUp => Key::PageUp,
        KeyCode::PageDown => Key::PageDown,
        KeyCode::F(n) => Key::F(n),
        _ => return None,
    })
}

fn convert_button(b: crossterm::event::MouseButton) -> PointerButton {
    match b {
        crossterm::event::MouseButton::Left => PointerButton::Primary,
        crossterm::event::MouseButton::Right => PointerButton::Secondary,
        crossterm::event::MouseButton::Middle => PointerButton::Middle,
    }
}

/// Convert a crossterm event. Terminal cells map to device pixels one to
/// one. Returns `None` for events with no raw-input counterpart (resize,
/// paste, scroll, terminal focus, unsupported keys).
pub fn from_crossterm(event: crossterm::event::Event) -> Option<RawInput> {
    use crossterm::event::{Event, KeyEventKind, MouseEventKind};
    match event {
        Event::Key(ke) => {
            let action = match ke.kind {
                KeyEventKind::Press | KeyEventKind::Repeat => KeyAction::Pressed,
                KeyEventKind::Release => KeyAction::Released,
            };
            let code = convert_key(ke.code)?;
            Some(RawInput::key(action, code, convert_modifiers(ke.modifiers)))
        }
        Event::Mouse(me) => {
            let (action, button) = match me.kind {
                MouseEventKind::Down(b) => (PointerAction::Down, convert_button(b)),
                MouseEventKind::Up(b) => (PointerAction::Up, convert_button(b)),
                MouseEventKind::Drag(b) => (PointerAction::Move, convert_button(b)),
                MouseEventKind::Moved => (PointerAction::Move, PointerButton::Primary),
                _ => return None,
            };
            Some(RawInput::Pointer(RawPointer {
                button,
                modifiers: convert_modifiers(me.modifiers),
                ..RawPointer::mouse(action, me.column as f64, me.row as f64)
            }))
        }
        _ => None,
    }
}

// ===========================================================================
// Tests
// ===========================================================================
