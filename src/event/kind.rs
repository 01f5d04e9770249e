//! Events delivered to components and listeners.
//!
//! Every [`Event`] has a source component and a payload. Its [`EventKind`]
//! gives the stable name (`compAdded`, `pointerPressed`, ...) used in logs
//! and by listeners that filter on kind.

use super::input::{KeyAction, KeyEvent, Modifiers, PointerButton, PointerId, PointerType};
use crate::geometry::{Point, Size};
use crate::tree::ComponentId;

// ---------------------------------------------------------------------------
// Propagation
// ---------------------------------------------------------------------------

/// Returned by handlers and listeners: `Stop` marks the event as handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Propagation {
    #[default]
    Continue,
    Stop,
}

impl Propagation {
    pub fn is_stopped(self) -> bool {
        self == Propagation::Stop
    }
}

// ---------------------------------------------------------------------------
// EventKind
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    CompAdded,
    CompRemoved,
    CompMoved,
    CompSized,
    CompShown,
    CompEnabled,
    FocusGained,
    FocusLost,
    PointerPressed,
    PointerReleased,
    PointerMoved,
    PointerDragStarted,
    PointerDragged,
    PointerDragEnded,
    PointerEntered,
    PointerExited,
    PointerClicked,
    KeyPressed,
    KeyReleased,
    KeyTyped,
}

impl EventKind {
    pub fn name(self) -> &'static str {
        match self {
            EventKind::CompAdded => "compAdded",
            EventKind::CompRemoved => "compRemoved",
            EventKind::CompMoved => "compMoved",
            EventKind::CompSized => "compSized",
            EventKind::CompShown => "compShown",
            EventKind::CompEnabled => "compEnabled",
            EventKind::FocusGained => "focusGained",
            EventKind::FocusLost => "focusLost",
            EventKind::PointerPressed => "pointerPressed",
            EventKind::PointerReleased => "pointerReleased",
            EventKind::PointerMoved => "pointerMoved",
            EventKind::PointerDragStarted => "pointerDragStarted",
            EventKind::PointerDragged => "pointerDragged",
            EventKind::PointerDragEnded => "pointerDragEnded",
            EventKind::PointerEntered => "pointerEntered",
            EventKind::PointerExited => "pointerExited",
            EventKind::PointerClicked => "pointerClicked",
            EventKind::KeyPressed => "keyPressed",
            EventKind::KeyReleased => "keyReleased",
            EventKind::KeyTyped => "keyTyped",
        }
    }

    /// Input and focus events bubble to ancestors' child handlers;
    /// structural notifications do not.
    pub fn bubbles(self) -> bool {
        !matches!(
            self,
            EventKind::CompAdded
                | EventKind::CompRemoved
                | EventKind::CompMoved
                | EventKind::CompSized
                | EventKind::CompShown
                | EventKind::CompEnabled
        )
    }
}

// ---------------------------------------------------------------------------
// Pointer events
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PointerKind {
    Pressed,
    Released,
    Moved,
    DragStarted,
    Dragged,
    DragEnded,
    Entered,
    Exited,
    Clicked,
}

/// A pointer event resolved to a component.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    pub kind: PointerKind,
    pub pointer: PointerId,
    pub pointer_type: PointerType,
    pub button: PointerButton,
    /// Position relative to the event source.
    pub x: i32,
    pub y: i32,
    /// Position in canvas coordinates.
    pub canvas_x: i32,
    pub canvas_y: i32,
    pub modifiers: Modifiers,
}

// ---------------------------------------------------------------------------
// Event
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub enum EventData {
    /// Fired on the parent after `child` is attached at `index`.
    Added { child: ComponentId, index: usize },
    /// Fired on the parent while `child` is still attached at `index`.
    Removed { child: ComponentId, index: usize },
    Moved { previous: Point },
    Sized { previous: Size },
    Shown { visible: bool },
    Enabled { enabled: bool },
    FocusGained { previous: Option<ComponentId> },
    FocusLost { next: Option<ComponentId> },
    Pointer(PointerEvent),
    Key { action: KeyAction, key: KeyEvent },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Event {
    pub source: ComponentId,
    pub data: EventData,
}

impl Event {
    pub fn new(source: ComponentId, data: EventData) -> Self {
        Self { source, data }
    }

    pub fn kind(&self) -> EventKind {
        match &self.data {
            EventData::Added { .. } => EventKind::CompAdded,
            EventData::Removed { .. } => EventKind::CompRemoved,
            EventData::Moved { .. } => EventKind::CompMoved,
            EventData::Sized { .. } => EventKind::CompSized,
            EventData::Shown { .. } => EventKind::CompShown,
            EventData::Enabled { .. } => EventKind::CompEnabled,
            EventData::FocusGained { .. } => EventKind::FocusGained,
            EventData::FocusLost { .. } => EventKind::FocusLost,
            EventData::Pointer(p) => match p.kind {
                PointerKind::Pressed => EventKind::PointerPressed,
                PointerKind::Released => EventKind::PointerReleased,
                PointerKind::Moved => EventKind::PointerMoved,
                PointerKind::DragStarted => EventKind::PointerDragStarted,
                PointerKind::Dragged => EventKind::PointerDragged,
                PointerKind::DragEnded => EventKind::PointerDragEnded,
                PointerKind::Entered => EventKind::PointerEntered,
                PointerKind::Exited => EventKind::PointerExited,
                PointerKind::Clicked => EventKind::PointerClicked,
            },
            EventData::Key { action, .. } => match action {
                KeyAction::Pressed => EventKind::KeyPressed,
                KeyAction::Released => EventKind::KeyReleased,
                KeyAction::Typed => EventKind::KeyTyped,
            },
        }
    }

    pub fn name(&self) -> &'static str {
        self.kind().name()
    }

    pub fn pointer(&self) -> Option<&PointerEvent> {
        match &self.data {
            EventData::Pointer(p) => Some(p),
            _ => None,
        }
    }
}
