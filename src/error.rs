//! Crate-wide error type.
//!
//! Structural misuse (removing a component that is not a child, attaching a
//! component twice, building a cycle, an unsupported layout constraint) is
//! reported through [`Error`] at the call site. Paint failures raised by views
//! and hooks are carried through [`Error::Paint`].

use thiserror::Error;

use crate::tree::ComponentId;

/// Errors returned by tree mutation, layout and painting.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    #[error("component {0:?} does not exist")]
    NoSuchComponent(ComponentId),

    #[error("component {child:?} is not a child of {parent:?}")]
    NotAChild { parent: ComponentId, child: ComponentId },

    #[error("component {0:?} already has a parent")]
    AlreadyAttached(ComponentId),

    #[error("adding {child:?} to {parent:?} would create a cycle")]
    Cycle { parent: ComponentId, child: ComponentId },

    #[error("index {index} out of bounds for {len} children")]
    IndexOutOfBounds { index: usize, len: usize },

    #[error("{layout} does not accept constraint {constraint}")]
    InvalidConstraint { layout: &'static str, constraint: String },

    #[error("layer id {0:?} is already registered on this canvas")]
    DuplicateLayer(String),

    #[error("component {0:?} is not a canvas")]
    NotACanvas(ComponentId),

    #[error("unknown property {0:?}")]
    UnknownProperty(String),

    #[error("property {name:?} expects {expected}")]
    PropertyType { name: String, expected: &'static str },

    #[error("layout failed: {0}")]
    Layout(String),

    #[error("paint failed: {0}")]
    Paint(String),
}

/// Shorthand result type.
pub type Result<T, E = Error> = std::result::Result<T, E>;
