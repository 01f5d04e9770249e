//! Event system: raw input, event kinds, handlers, global listeners.

pub mod bus;
pub mod handler;
pub mod input;
pub mod kind;

pub use bus::{EventBus, Listener, ListenerId};
pub use handler::{ChildFnHandler, FnHandler, Handler};
pub use input::{
    from_crossterm, Key, KeyAction, KeyEvent, Modifiers, PointerAction, PointerButton, PointerId,
    PointerType, RawInput, RawPointer,
};
pub use kind::{Event, EventData, EventKind, PointerEvent, PointerKind, Propagation};
