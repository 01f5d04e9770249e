//! # canvas-kit
//!
//! A retained-mode component toolkit core for 2D canvas hosts.
//!
//! canvas-kit keeps a tree of rectangular components, repaints only the
//! dirty region of each root canvas in one deferred task per burst of
//! invalidations, routes pointer and keyboard input through layers and
//! composite components, and tracks a single keyboard focus owner with
//! tab-order traversal. The host supplies a drawing [`Surface`] and feeds raw
//! input; everything else is single-threaded and synchronous.
//!
//! ## Core Systems
//!
//! - **[`tree`]**: slotmap-backed component arena and node data
//! - **[`layout`]**: the preferred-size / do-layout contract, with stack,
//!   border and taffy-powered flex managers
//! - **[`paint`]**: recursive painting with per-child clipping
//! - **[`repaint`]**: dirty-rectangle accumulation and the tokio-backed task queue
//! - **[`dispatch`]**: hit-testing, composite capture, pointer and key routing
//! - **[`focus`]**: focus owner, focus roots and traversal
//! - **[`canvas`]**: root canvas records, layers and pointer ownership
//! - **[`event`]**: raw input, events, handlers and global listeners
//! - **[`app`]**: the [`App`] that owns all of the above
//! - **[`testing`]**: headless [`Pilot`](testing::Pilot) and recording surface
//!
//! ## Example
//!
//! ```
//! use canvas_kit::prelude::*;
//!
//! let mut app = App::default();
//! let canvas = app.create_canvas(RecordingSurface::new(), 200, 100);
//! let layer = app.add_layer(canvas, "root", None).unwrap();
//! let panel = app.create(Component::named("panel").with_layout(BorderLayout::new()));
//! app.add(layer, panel).unwrap();
//! let title = app.create(Component::new().with_preferred_size(None, Some(20)));
//! app.add_with(panel, title, Constraint::Top).unwrap();
//!
//! app.flush_pending().unwrap();
//! assert_eq!(app.tree().get(title).unwrap().bounds(), Rect::new(0, 0, 200, 20));
//! ```

// Foundation
pub mod error;
pub mod geometry;

// Core systems
pub mod layout;
pub mod tree;

// Drawing
pub mod graphics;
pub mod paint;
pub mod repaint;
pub mod view;

// Input
pub mod cursor;
pub mod dispatch;
pub mod event;
pub mod focus;

// Application
pub mod app;
pub mod canvas;
pub mod properties;

// Headless testing support
pub mod testing;

pub use app::{App, AppConfig};
pub use error::{Error, Result};
pub use graphics::Surface;

/// Commonly used types.
pub mod prelude {
    pub use crate::app::{App, AppConfig};
    pub use crate::canvas::{LayerPolicy, Modal};
    pub use crate::cursor::Cursor;
    pub use crate::error::{Error, Result};
    pub use crate::event::{
        Event, EventData, EventKind, FnHandler, Handler, Key, KeyAction, Modifiers, PointerAction,
        PointerKind, Propagation, RawInput, RawPointer,
    };
    pub use crate::focus::Direction;
    pub use crate::geometry::{Insets, Point, Rect, Size};
    pub use crate::graphics::{Color, Graphics, Surface};
    pub use crate::layout::{BorderLayout, Constraint, FlexLayout, Layout, StackLayout};
    pub use crate::properties::Property;
    pub use crate::testing::RecordingSurface;
    pub use crate::tree::{CatchInput, Component, ComponentId, Focusability, Traversal, Tree};
    pub use crate::view::{Fill, LineBorder, View};
}
