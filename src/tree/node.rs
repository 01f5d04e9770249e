//! Node types: ComponentId, Component and its capability flags.
//!
//! A [`Component`] is plain data plus optional strategy objects: a layout
//! manager, border/background/content views, an input handler and a handful
//! of paint and geometry hooks. Everything is optional; a bare component is an
//! empty, self-laid-out rectangle.

use std::fmt;
use std::rc::Rc;

use slotmap::new_key_type;

use super::arena::Tree;
use crate::canvas::LayerPolicy;
use crate::cursor::Cursor;
use crate::error::Result;
use crate::event::Handler;
use crate::geometry::{Insets, Rect, Size};
use crate::graphics::Graphics;
use crate::layout::{Constraint, Layout};
use crate::paint::PaintContext;
use crate::view::View;

new_key_type! {
    /// Unique identifier for a component. Copy, lightweight (u64).
    pub struct ComponentId;
}

/// Custom drawing hook, called with the surface translated to the component.
pub type PaintHook = Rc<dyn Fn(&mut Graphics, &PaintContext<'_>, ComponentId) -> Result<()>>;

/// Preferred-size hook for self-laid-out components (insets excluded).
pub type SizeHook = Rc<dyn Fn(&Tree, ComponentId) -> Size>;

/// Hit-test refinement in component-local coordinates.
pub type ContainsHook = Rc<dyn Fn(&Tree, ComponentId, i32, i32) -> bool>;

/// `(tree, this, descendant)`: whether `this` wants input aimed at `descendant`.
pub type CapturePredicate = Rc<dyn Fn(&Tree, ComponentId, ComponentId) -> bool>;

/// Computed focusability.
pub type FocusPredicate = Rc<dyn Fn(&Tree, ComponentId) -> bool>;

// ---------------------------------------------------------------------------
// Capability flags
// ---------------------------------------------------------------------------

/// Whether a component intercepts input directed at its descendants.
#[derive(Clone, Default)]
pub enum CatchInput {
    #[default]
    None,
    /// Every descendant's input is redirected here.
    All,
    /// Redirect only when the predicate accepts the descendant.
    When(CapturePredicate),
}

impl CatchInput {
    /// Evaluate the flag for a concrete descendant.
    pub fn catches(&self, tree: &Tree, this: ComponentId, descendant: ComponentId) -> bool {
        match self {
            CatchInput::None => false,
            CatchInput::All => true,
            CatchInput::When(pred) => pred(tree, this, descendant),
        }
    }
}

impl fmt::Debug for CatchInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CatchInput::None => f.write_str("None"),
            CatchInput::All => f.write_str("All"),
            CatchInput::When(_) => f.write_str("When(..)"),
        }
    }
}

/// Whether a component can own keyboard focus.
#[derive(Clone, Default)]
pub enum Focusability {
    #[default]
    Never,
    Always,
    When(FocusPredicate),
}

impl Focusability {
    pub fn can_have_focus(&self, tree: &Tree, id: ComponentId) -> bool {
        match self {
            Focusability::Never => false,
            Focusability::Always => true,
            Focusability::When(pred) => pred(tree, id),
        }
    }
}

impl fmt::Debug for Focusability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Focusability::Never => f.write_str("Never"),
            Focusability::Always => f.write_str("Always"),
            Focusability::When(_) => f.write_str("When(..)"),
        }
    }
}

/// How focus traversal treats a component's descendants.
///
/// `FollowCapture` hides exactly the descendants the component captures input
/// for. `Open` never hides any, `Opaque` always hides all of them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Traversal {
    #[default]
    FollowCapture,
    Open,
    Opaque,
}

/// Marks a canvas child as a named layer.
#[derive(Clone)]
pub struct LayerSpec {
    pub id: String,
    pub policy: Option<Rc<dyn LayerPolicy>>,
}

impl fmt::Debug for LayerSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LayerSpec")
            .field("id", &self.id)
            .field("policy", &self.policy.is_some())
            .finish()
    }
}

#[derive(Clone, Default)]
pub(crate) struct Hooks {
    pub(crate) update: Option<PaintHook>,
    pub(crate) paint: Option<PaintHook>,
    pub(crate) paint_on_top: Option<PaintHook>,
    pub(crate) preferred_size: Option<SizeHook>,
    pub(crate) contains: Option<ContainsHook>,
}

// ---------------------------------------------------------------------------
// Component
// ---------------------------------------------------------------------------

/// Data associated with a single component.
///
/// Fields are mutated through [`App`](crate::app::App) so that every change
/// fires its notification and schedules a repaint. The builder methods here
/// are meant for configuring a component before it is inserted.
#[derive(Clone)]
pub struct Component {
    pub(crate) name: Option<String>,
    pub(crate) bounds: Rect,
    pub(crate) padding: Insets,
    pub(crate) visible: bool,
    pub(crate) enabled: bool,
    /// Cached metrics (preferred size) are up to date.
    pub(crate) valid: bool,
    /// Children have been laid out for the current size.
    pub(crate) layout_valid: bool,
    pub(crate) cached_ps: Option<Size>,
    pub(crate) ps_override: (Option<i32>, Option<i32>),
    pub(crate) constraint: Option<Constraint>,
    pub(crate) layout: Option<Rc<dyn Layout>>,
    pub(crate) border: Option<Rc<dyn View>>,
    pub(crate) background: Option<Rc<dyn View>>,
    pub(crate) view: Option<Rc<dyn View>>,
    pub(crate) catch_input: CatchInput,
    pub(crate) focusable: Focusability,
    pub(crate) traversal: Traversal,
    pub(crate) focus_root: bool,
    pub(crate) canvas: bool,
    pub(crate) layer: Option<LayerSpec>,
    pub(crate) cursor: Option<Cursor>,
    pub(crate) handler: Option<Rc<dyn Handler>>,
    pub(crate) hooks: Hooks,
}

impl Component {
    /// A visible, enabled, zero-sized component with no layout manager.
    pub fn new() -> Self {
        Self {
            name: None,
            bounds: Rect::EMPTY,
            padding: Insets::ZERO,
            visible: true,
            enabled: true,
            valid: false,
            layout_valid: false,
            cached_ps: None,
            ps_override: (None, None),
            constraint: None,
            layout: None,
            border: None,
            background: None,
            view: None,
            catch_input: CatchInput::None,
            focusable: Focusability::Never,
            traversal: Traversal::FollowCapture,
            focus_root: false,
            canvas: false,
            layer: None,
            cursor: None,
            handler: None,
            hooks: Hooks::default(),
        }
    }

    /// A component with a diagnostic name (shown in `Debug` and logs).
    pub fn named(name: impl Into<String>) -> Self {
        Self::new().with_name(name)
    }

    // ── Builders ─────────────────────────────────────────────────────

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Set the initial bounds (builder). Negative sizes are clamped to zero.
    pub fn with_bounds(mut self, x: i32, y: i32, width: i32, height: i32) -> Self {
        let size = Size::clamped(width, height);
        self.bounds = Rect::new(x, y, size.width, size.height);
        self
    }

    pub fn with_padding(mut self, padding: Insets) -> Self {
        self.padding = padding;
        self
    }

    pub fn with_layout(mut self, layout: impl Layout + 'static) -> Self {
        self.layout = Some(Rc::new(layout));
        self
    }

    pub fn with_constraint(mut self, constraint: Constraint) -> Self {
        self.constraint = Some(constraint);
        self
    }

    pub fn with_border(mut self, border: Rc<dyn View>) -> Self {
        self.border = Some(border);
        self
    }

    pub fn with_background(mut self, background: Rc<dyn View>) -> Self {
        self.background = Some(background);
        self
    }

    pub fn with_view(mut self, view: Rc<dyn View>) -> Self {
        self.view = Some(view);
        self
    }

    /// Fix the preferred width and/or height, insets included.
    pub fn with_preferred_size(mut self, width: Option<i32>, height: Option<i32>) -> Self {
        self.ps_override = (width.map(|w| w.max(0)), height.map(|h| h.max(0)));
        self
    }

    pub fn with_catch_input(mut self, catch_input: CatchInput) -> Self {
        self.catch_input = catch_input;
        self
    }

    /// Capture input for descendants accepted by `pred`.
    pub fn catching_input_when(
        self,
        pred: impl Fn(&Tree, ComponentId, ComponentId) -> bool + 'static,
    ) -> Self {
        self.with_catch_input(CatchInput::When(Rc::new(pred)))
    }

    pub fn focusable(mut self, focusable: bool) -> Self {
        self.focusable = if focusable { Focusability::Always } else { Focusability::Never };
        self
    }

    pub fn focusable_when(mut self, pred: impl Fn(&Tree, ComponentId) -> bool + 'static) -> Self {
        self.focusable = Focusability::When(Rc::new(pred));
        self
    }

    pub fn with_traversal(mut self, traversal: Traversal) -> Self {
        self.traversal = traversal;
        self
    }

    pub fn focus_root(mut self, focus_root: bool) -> Self {
        self.focus_root = focus_root;
        self
    }

    pub fn visible(mut self, visible: bool) -> Self {
        self.visible = visible;
        self
    }

    pub fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    pub fn with_cursor(mut self, cursor: Cursor) -> Self {
        self.cursor = Some(cursor);
        self
    }

    pub fn with_handler(mut self, handler: impl Handler + 'static) -> Self {
        self.handler = Some(Rc::new(handler));
        self
    }

    /// Register as a named layer when added to a canvas.
    pub fn as_layer(mut self, id: impl Into<String>, policy: Option<Rc<dyn LayerPolicy>>) -> Self {
        self.layer = Some(LayerSpec { id: id.into(), policy });
        self
    }

    /// Custom drawing between the background and the border.
    pub fn on_update(
        mut self,
        hook: impl Fn(&mut Graphics, &PaintContext<'_>, ComponentId) -> Result<()> + 'static,
    ) -> Self {
        self.hooks.update = Some(Rc::new(hook));
        self
    }

    /// Content drawing, clipped to the inset area. Replaces the content view.
    pub fn on_paint(
        mut self,
        hook: impl Fn(&mut Graphics, &PaintContext<'_>, ComponentId) -> Result<()> + 'static,
    ) -> Self {
        self.hooks.paint = Some(Rc::new(hook));
        self
    }

    /// Overlay drawn after all children.
    pub fn on_paint_on_top(
        mut self,
        hook: impl Fn(&mut Graphics, &PaintContext<'_>, ComponentId) -> Result<()> + 'static,
    ) -> Self {
        self.hooks.paint_on_top = Some(Rc::new(hook));
        self
    }

    pub fn with_preferred_size_hook(
        mut self,
        hook: impl Fn(&Tree, ComponentId) -> Size + 'static,
    ) -> Self {
        self.hooks.preferred_size = Some(Rc::new(hook));
        self
    }

    pub fn with_contains(
        mut self,
        hook: impl Fn(&Tree, ComponentId, i32, i32) -> bool + 'static,
    ) -> Self {
        self.hooks.contains = Some(Rc::new(hook));
        self
    }

    // ── Accessors ────────────────────────────────────────────────────

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    pub fn x(&self) -> i32 {
        self.bounds.x
    }

    pub fn y(&self) -> i32 {
        self.bounds.y
    }

    pub fn width(&self) -> i32 {
        self.bounds.width
    }

    pub fn height(&self) -> i32 {
        self.bounds.height
    }

    pub fn size(&self) -> Size {
        self.bounds.size()
    }

    pub fn padding(&self) -> Insets {
        self.padding
    }

    /// Padding plus border insets.
    pub fn insets(&self) -> Insets {
        match &self.border {
            Some(border) => self.padding + border.insets(),
            None => self.padding,
        }
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn is_valid(&self) -> bool {
        self.valid
    }

    pub fn is_layout_valid(&self) -> bool {
        self.layout_valid
    }

    pub fn constraint(&self) -> Option<&Constraint> {
        self.constraint.as_ref()
    }

    pub fn layout(&self) -> Option<&Rc<dyn Layout>> {
        self.layout.as_ref()
    }

    pub fn border(&self) -> Option<&Rc<dyn View>> {
        self.border.as_ref()
    }

    pub fn background(&self) -> Option<&Rc<dyn View>> {
        self.background.as_ref()
    }

    pub fn view(&self) -> Option<&Rc<dyn View>> {
        self.view.as_ref()
    }

    pub fn catch_input(&self) -> &CatchInput {
        &self.catch_input
    }

    pub fn focusability(&self) -> &Focusability {
        &self.focusable
    }

    pub fn traversal(&self) -> Traversal {
        self.traversal
    }

    pub fn is_focus_root(&self) -> bool {
        self.focus_root
    }

    pub fn is_canvas(&self) -> bool {
        self.canvas
    }

    pub fn layer(&self) -> Option<&LayerSpec> {
        self.layer.as_ref()
    }

    pub fn cursor(&self) -> Option<Cursor> {
        self.cursor
    }

    pub fn handler(&self) -> Option<&Rc<dyn Handler>> {
        self.handler.as_ref()
    }

    pub fn preferred_size_override(&self) -> (Option<i32>, Option<i32>) {
        self.ps_override
    }
}

impl Default for Component {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Component")
            .field("name", &self.name)
            .field("bounds", &self.bounds)
            .field("visible", &self.visible)
            .field("enabled", &self.enabled)
            .field("canvas", &self.canvas)
            .field("layer", &self.layer)
            .field("catch_input", &self.catch_input)
            .field("focusable", &self.focusable)
            .finish_non_exhaustive()
    }
}
