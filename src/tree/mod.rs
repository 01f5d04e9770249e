//! Component arena: slotmap-backed tree of components.

pub mod arena;
pub mod node;

pub use arena::Tree;
pub use node::{
    CapturePredicate, CatchInput, Component, ComponentId, ContainsHook, FocusPredicate,
    Focusability, LayerSpec, PaintHook, SizeHook, Traversal,
};
