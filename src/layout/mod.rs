//! Layout managers: the preferred-size / do-layout contract.
//!
//! Preferred sizes are queried bottom-up (a manager asks each child for its
//! preferred size, which recursively consults the child's own manager) while
//! sizes are assigned top-down by [`App::validate`](crate::app::App::validate).
//! A component without a manager lays itself out: its preferred size comes
//! from its size hook or content view and it has no children to position.

pub mod border;
pub mod flex;
pub mod stack;

use std::fmt;

pub use border::BorderLayout;
pub use flex::{FlexDirection, FlexLayout};
pub use stack::StackLayout;

use crate::app::App;
use crate::error::{Error, Result};
use crate::geometry::{Rect, Size};
use crate::tree::ComponentId;

/// Per-child hint attached by the parent's layout manager.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Constraint {
    Top,
    Bottom,
    Left,
    Right,
    Center,
    /// Share of free main-axis space for flex layouts.
    Grow(f32),
}

impl fmt::Display for Constraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Constraint::Grow(g) => write!(f, "Grow({g:?})"),
            other => write!(f, "{other:?}"),
        }
    }
}

/// A layout manager.
pub trait Layout {
    /// Preferred size of `target` excluding its insets.
    fn calc_preferred_size(&self, app: &mut App, target: ComponentId) -> Size;

    /// Position and size the visible children of `target`.
    fn do_layout(&self, app: &mut App, target: ComponentId) -> Result<()>;

    /// Reject constraints this manager cannot interpret.
    fn check_constraint(&self, constraint: Option<&Constraint>) -> Result<()> {
        match constraint {
            None => Ok(()),
            Some(c) => Err(self.invalid(c)),
        }
    }

    fn name(&self) -> &'static str;

    fn invalid(&self, constraint: &Constraint) -> Error {
        Error::InvalidConstraint {
            layout: self.name(),
            constraint: constraint.to_string(),
        }
    }
}

/// Visible children of `target`, in z-order.
pub(crate) fn visible_children(app: &App, target: ComponentId) -> Vec<ComponentId> {
    let tree = app.tree();
    tree.children(target)
        .iter()
        .copied()
        .filter(|&c| tree.get(c).is_some_and(|n| n.is_visible()))
        .collect()
}

/// The area of `target` inside its insets, in its own coordinates.
pub(crate) fn content_area(app: &App, target: ComponentId) -> Rect {
    app.tree()
        .get(target)
        .map(|n| Rect::from_size(n.size()).shrink(n.insets()))
        .unwrap_or(Rect::EMPTY)
}
