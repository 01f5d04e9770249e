//! Pointer cursor shapes.
//!
//! A component may declare a cursor. The effective cursor for a component is
//! the one declared by the nearest ancestor-or-self; the dispatcher records it
//! on the canvas whenever a pointer enters a new component.

use crate::tree::{ComponentId, Tree};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Cursor {
    #[default]
    Default,
    Pointer,
    Text,
    Move,
    Wait,
    Crosshair,
    ResizeHorizontal,
    ResizeVertical,
    NotAllowed,
}

/// Cursor declared by `id` or its nearest declaring ancestor.
pub fn effective_cursor(tree: &Tree, id: ComponentId) -> Cursor {
    let mut current = Some(id);
    while let Some(c) = current {
        if let Some(cursor) = tree.get(c).and_then(|n| n.cursor()) {
            return cursor;
        }
        current = tree.parent(c);
    }
    Cursor::Default
}
