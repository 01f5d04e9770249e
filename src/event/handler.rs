//! Per-component event handlers.
//!
//! A component's [`Handler`] sees events whose source is the component
//! (`handle`) and, while an unhandled input event bubbles upward, events from
//! its descendants (`handle_child`). Both default to `Continue`.

use super::kind::{Event, Propagation};
use crate::app::App;
use crate::tree::ComponentId;

pub trait Handler {
    fn handle(&self, _app: &mut App, _event: &Event) -> Propagation {
        Propagation::Continue
    }

    /// `this` is the ancestor the handler is attached to.
    fn handle_child(&self, _app: &mut App, _this: ComponentId, _event: &Event) -> Propagation {
        Propagation::Continue
    }
}

/// Closure adapter for [`Handler::handle`].
pub struct FnHandler<F>(pub F);

impl<F> Handler for FnHandler<F>
where
    F: Fn(&mut App, &Event) -> Propagation,
{
    fn handle(&self, app: &mut App, event: &Event) -> Propagation {
        (self.0)(app, event)
    }
}

/// Closure adapter for [`Handler::handle_child`].
pub struct ChildFnHandler<F>(pub F);

impl<F> Handler for ChildFnHandler<F>
where
    F: Fn(&mut App, ComponentId, &Event) -> Propagation,
{
    fn handle_child(&self, app: &mut App, this: ComponentId, event: &Event) -> Propagation {
        (self.0)(app, this, event)
    }
}
