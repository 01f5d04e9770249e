//! Root canvas state: drawing context, dirty rectangle, layers, pointers.
//!
//! A canvas is a component flagged as canvas plus a [`Canvas`] record held by
//! the [`App`](crate::app::App). The record owns the persistent
//! [`Graphics`], the accumulated dirty rectangle with its pending-repaint
//! marker, the layer registry and the per-pointer ownership maps.

use std::collections::HashMap;

use crate::cursor::Cursor;
use crate::event::{KeyEvent, PointerButton, PointerId};
use crate::geometry::{Point, Rect};
use crate::graphics::Graphics;
use crate::tree::{ComponentId, Tree};

// ---------------------------------------------------------------------------
// LayerPolicy
// ---------------------------------------------------------------------------

/// Decides whether a layer claims input before normal hit-testing.
///
/// Coordinates are in the layer's own space (equal to canvas space for
/// full-size layers).
pub trait LayerPolicy {
    fn is_active_at(&self, tree: &Tree, layer: ComponentId, x: i32, y: i32) -> bool;

    /// Claim a key event ahead of the focus owner.
    fn captures_key(&self, _tree: &Tree, _layer: ComponentId, _key: &KeyEvent) -> bool {
        false
    }
}

/// Layer that is active wherever it is visible, for example a modal layer.
#[derive(Debug, Clone, Copy, Default)]
pub struct Modal;

impl LayerPolicy for Modal {
    fn is_active_at(&self, tree: &Tree, layer: ComponentId, _x: i32, _y: i32) -> bool {
        tree.get(layer).is_some_and(|n| n.is_visible())
    }

    fn captures_key(&self, tree: &Tree, layer: ComponentId, _key: &KeyEvent) -> bool {
        tree.get(layer).is_some_and(|n| n.is_visible() && !tree.children(layer).is_empty())
    }
}

// ---------------------------------------------------------------------------
// Pointer ownership
// ---------------------------------------------------------------------------

/// The press a pointer is currently holding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PressState {
    pub target: ComponentId,
    pub button: PointerButton,
    pub x: i32,
    pub y: i32,
    /// A move was delivered since the press.
    pub dragged: bool,
}

/// Per-pointer maps. Entries never outlive the components they reference:
/// [`PointerState::forget_subtree`] runs on every removal.
#[derive(Debug, Default)]
pub struct PointerState {
    pub(crate) entered: HashMap<PointerId, ComponentId>,
    pub(crate) pressed: HashMap<PointerId, PressState>,
    pub(crate) last: HashMap<PointerId, Point>,
    /// Embedded canvas that took the press of a pointer.
    pub(crate) delegated: HashMap<PointerId, ComponentId>,
}

impl PointerState {
    pub fn entered(&self, pointer: PointerId) -> Option<ComponentId> {
        self.entered.get(&pointer).copied()
    }

    pub fn pressed(&self, pointer: PointerId) -> Option<&PressState> {
        self.pressed.get(&pointer)
    }

    /// Drop every entry pointing into the subtree rooted at `root`.
    pub fn forget_subtree(&mut self, tree: &Tree, root: ComponentId) {
        self.entered.retain(|_, c| !tree.is_in_subtree(root, *c));
        self.pressed.retain(|_, p| !tree.is_in_subtree(root, p.target));
        self.delegated.retain(|_, c| !tree.is_in_subtree(root, *c));
    }
}

// ---------------------------------------------------------------------------
// Canvas
// ---------------------------------------------------------------------------

pub struct Canvas {
    pub(crate) graphics: Graphics,
    pub(crate) dirty: Option<Rect>,
    pub(crate) pending: bool,
    pub(crate) layers: HashMap<String, ComponentId>,
    pub(crate) pointers: PointerState,
    pub(crate) cursor: Cursor,
    page: (f64, f64),
    scroll: (f64, f64),
}

impl Canvas {
    pub(crate) fn new(graphics: Graphics) -> Self {
        Self {
            graphics,
            dirty: None,
            pending: false,
            layers: HashMap::new(),
            pointers: PointerState::default(),
            cursor: Cursor::Default,
            page: (0.0, 0.0),
            scroll: (0.0, 0.0),
        }
    }

    /// Accumulated dirty rectangle, `None` when nothing needs painting.
    pub fn dirty(&self) -> Option<Rect> {
        self.dirty
    }

    /// Whether a repaint task is queued for this canvas.
    pub fn is_pending(&self) -> bool {
        self.pending
    }

    pub fn layer(&self, id: &str) -> Option<ComponentId> {
        self.layers.get(id).copied()
    }

    pub fn layer_ids(&self) -> impl Iterator<Item = &str> {
        self.layers.keys().map(String::as_str)
    }

    pub fn pointers(&self) -> &PointerState {
        &self.pointers
    }

    /// Cursor of the component most recently entered by a pointer.
    pub fn cursor(&self) -> Cursor {
        self.cursor
    }

    pub fn graphics(&self) -> &Graphics {
        &self.graphics
    }

    /// Mutable graphics. Transforms applied here become part of the base
    /// state used by every repaint.
    pub fn graphics_mut(&mut self) -> &mut Graphics {
        &mut self.graphics
    }

    /// Position of the canvas element on the page, in device units.
    pub fn set_page_location(&mut self, x: f64, y: f64) {
        self.page = (x, y);
    }

    /// Current page scroll offset.
    pub fn set_page_scroll(&mut self, x: f64, y: f64) {
        self.scroll = (x, y);
    }

    /// Convert device (page) coordinates into canvas pixel space, undoing the
    /// page offset, the scroll offset and the base transform.
    pub fn to_canvas_coords(&self, x: f64, y: f64) -> Option<(i32, i32)> {
        let px = x - self.page.0 + self.scroll.0;
        let py = y - self.page.1 + self.scroll.1;
        let (lx, ly) = self.graphics.to_local(px, py)?;
        Some((lx.floor() as i32, ly.floor() as i32))
    }

    /// Union `rect` into the dirty rectangle, clipped to `bounds`.
    pub(crate) fn add_dirty(&mut self, rect: Rect, bounds: Rect) {
        let rect = rect.intersection(bounds);
        if rect.is_empty() {
            return;
        }
        self.dirty = Some(match self.dirty {
            Some(d) => d.union(rect),
            None => rect,
        });
    }
}
