//! App struct: the component arena plus everything that mutates it.
//!
//! [`App`] owns the [`Tree`], the per-canvas records, the focus manager, the
//! global listener registry and the repaint queue. Every mutation goes through
//! an `App` method so that it fires the matching structural event, invalidates
//! cached metrics and schedules a repaint. Routing, focus and repainting live
//! in their own modules as further `impl App` blocks.

use std::rc::Rc;

use slotmap::SecondaryMap;

use crate::canvas::{Canvas, LayerPolicy};
use crate::cursor::Cursor;
use crate::error::{Error, Result};
use crate::event::{Event, EventBus, EventData, EventKind, Handler, ListenerId, Propagation};
use crate::focus::FocusManager;
use crate::geometry::{Insets, Point, Rect, Size};
use crate::graphics::{Graphics, Surface};
use crate::layout::{Constraint, Layout, StackLayout};
use crate::repaint::RepaintScheduler;
use crate::tree::{CatchInput, Component, ComponentId, Focusability, Traversal, Tree};
use crate::view::View;

// ---------------------------------------------------------------------------
// AppConfig
// ---------------------------------------------------------------------------

/// Configuration for the application.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Optional application name, used as a prefix in log output.
    pub title: Option<String>,
    /// Request focus for the target of a primary-button press.
    pub focus_on_press: bool,
    /// Move focus on unhandled Tab / Shift+Tab.
    pub tab_traversal: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            title: None,
            focus_on_press: true,
            tab_traversal: true,
        }
    }
}

impl AppConfig {
    /// Create a new default config.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the title (builder).
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_focus_on_press(mut self, enabled: bool) -> Self {
        self.focus_on_press = enabled;
        self
    }

    pub fn with_tab_traversal(mut self, enabled: bool) -> Self {
        self.tab_traversal = enabled;
        self
    }
}

// ---------------------------------------------------------------------------
// App
// ---------------------------------------------------------------------------

/// The component tree and its runtime services.
///
/// Single-threaded: handlers, views and layout managers are `Rc` trait
/// objects and receive `&mut App` re-entrantly while an event is delivered.
pub struct App {
    pub(crate) tree: Tree,
    pub(crate) canvases: SecondaryMap<ComponentId, Canvas>,
    pub(crate) focus: FocusManager,
    pub(crate) bus: EventBus,
    pub(crate) scheduler: RepaintScheduler,
    pub(crate) config: AppConfig,
}

impl App {
    pub fn new(config: AppConfig) -> Self {
        Self {
            tree: Tree::new(),
            canvases: SecondaryMap::new(),
            focus: FocusManager::new(),
            bus: EventBus::new(),
            scheduler: RepaintScheduler::new(),
            config,
        }
    }

    pub fn tree(&self) -> &Tree {
        &self.tree
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    fn label(&self) -> &str {
        self.config.title.as_deref().unwrap_or("canvas-kit")
    }

    // ── Listeners ────────────────────────────────────────────────────

    /// Bind a global listener that sees every event after the source's own
    /// handler.
    pub fn bind(&mut self, listener: impl Fn(&mut App, &Event) -> Propagation + 'static) -> ListenerId {
        self.bus.bind(Rc::new(listener))
    }

    pub fn bind_kind(
        &mut self,
        kind: EventKind,
        listener: impl Fn(&mut App, &Event) -> Propagation + 'static,
    ) -> ListenerId {
        self.bus.bind_kind(kind, Rc::new(listener))
    }

    pub fn unbind(&mut self, id: ListenerId) -> bool {
        self.bus.unbind(id)
    }

    // ── Creation ─────────────────────────────────────────────────────

    /// Insert a detached component.
    pub fn create(&mut self, component: Component) -> ComponentId {
        self.tree.insert(component)
    }

    /// Create a root canvas drawing onto `surface`.
    ///
    /// The canvas is a focus root that stacks its layers full-size.
    pub fn create_canvas(&mut self, surface: impl Surface + 'static, width: i32, height: i32) -> ComponentId {
        let mut component = Component::named("canvas")
            .with_layout(StackLayout)
            .with_bounds(0, 0, width, height)
            .focus_root(true);
        component.canvas = true;
        let size = component.size();
        let id = self.tree.insert(component);
        let graphics = Graphics::new(Box::new(surface), size.width, size.height);
        self.canvases.insert(id, Canvas::new(graphics));
        log::debug!("{}: created canvas {id:?} ({}x{})", self.label(), size.width, size.height);
        self.repaint(id);
        id
    }

    /// Create a canvas and add it as a child of `parent`.
    ///
    /// The outer tree skips it when painting and delegates pointer input
    /// that lands on it.
    pub fn embed_canvas(
        &mut self,
        parent: ComponentId,
        surface: impl Surface + 'static,
        width: i32,
        height: i32,
    ) -> Result<ComponentId> {
        let id = self.create_canvas(surface, width, height);
        if let Err(err) = self.add(parent, id) {
            self.dispose(id)?;
            return Err(err);
        }
        Ok(id)
    }

    /// Add a named layer on top of the canvas's existing layers.
    pub fn add_layer(
        &mut self,
        canvas: ComponentId,
        id: &str,
        policy: Option<Rc<dyn LayerPolicy>>,
    ) -> Result<ComponentId> {
        if !self.canvases.contains_key(canvas) {
            return Err(Error::NotACanvas(canvas));
        }
        let layer = self.tree.insert(
            Component::named(id)
                .as_layer(id, policy)
                .with_layout(StackLayout)
                .focus_root(true),
        );
        if let Err(err) = self.add(canvas, layer) {
            self.tree.free(layer);
            return Err(err);
        }
        Ok(layer)
    }

    // ── Lookup ───────────────────────────────────────────────────────

    pub fn canvas(&self, id: ComponentId) -> Option<&Canvas> {
        self.canvases.get(id)
    }

    pub fn canvas_mut(&mut self, id: ComponentId) -> Option<&mut Canvas> {
        self.canvases.get_mut(id)
    }

    /// Layer registered under `id` on `canvas`.
    pub fn layer(&self, canvas: ComponentId, id: &str) -> Option<ComponentId> {
        self.canvases.get(canvas).and_then(|c| c.layer(id))
    }

    /// Cursor of the component last entered by a pointer on `canvas`.
    pub fn cursor(&self, canvas: ComponentId) -> Cursor {
        self.canvases.get(canvas).map(|c| c.cursor()).unwrap_or_default()
    }

    // ── Structure ────────────────────────────────────────────────────

    /// Append `child` to `parent`, keeping the child's own constraint.
    pub fn add(&mut self, parent: ComponentId, child: ComponentId) -> Result<()> {
        self.insert(parent, None, child, None)
    }

    pub fn add_with(&mut self, parent: ComponentId, child: ComponentId, constraint: Constraint) -> Result<()> {
        self.insert(parent, None, child, Some(constraint))
    }

    /// Attach `child` under `parent` at `index` (or at the end).
    ///
    /// The constraint is checked by the parent's layout manager before
    /// anything changes. `compAdded` fires on the parent once the child is
    /// attached.
    pub fn insert(
        &mut self,
        parent: ComponentId,
        index: Option<usize>,
        child: ComponentId,
        constraint: Option<Constraint>,
    ) -> Result<()> {
        let p = self.tree.require(parent)?;
        let c = self.tree.require(child)?;
        let constraint = constraint.or(c.constraint);
        if let Some(layout) = p.layout() {
            layout.check_constraint(constraint.as_ref())?;
        }
        let layer_id = c.layer().map(|spec| spec.id.clone());
        if let (Some(record), Some(layer_id)) = (self.canvases.get(parent), &layer_id) {
            if record.layers.contains_key(layer_id) {
                return Err(Error::DuplicateLayer(layer_id.clone()));
            }
        }

        let index = self.tree.attach(parent, child, index)?;
        if let Some(node) = self.tree.get_mut(child) {
            node.constraint = constraint;
        }
        if let (Some(record), Some(layer_id)) = (self.canvases.get_mut(parent), layer_id) {
            log::debug!("layer {layer_id:?} registered on {parent:?}");
            record.layers.insert(layer_id, child);
        }

        self.invalidate(parent);
        self.fire(Event::new(parent, EventData::Added { child, index }));
        self.repaint(child);
        Ok(())
    }

    /// Detach `child` from `parent`. The subtree stays in the arena and may
    /// be added again.
    ///
    /// `compRemoved` fires while the child is still attached; pointer and
    /// focus references into the subtree are dropped before it is detached.
    pub fn remove(&mut self, parent: ComponentId, child: ComponentId) -> Result<()> {
        self.tree.require(parent)?;
        let node = self.tree.require(child)?;
        let (old, visible) = (node.bounds(), node.is_visible());
        let index = match self.tree.index_of(child) {
            Some(index) if self.tree.parent(child) == Some(parent) => index,
            _ => return Err(Error::NotAChild { parent, child }),
        };

        self.fire(Event::new(parent, EventData::Removed { child, index }));
        if self.tree.parent(child) != Some(parent) {
            // A listener already moved it.
            return Ok(());
        }

        if let Some(canvas) = self.tree.canvas_of(parent) {
            if let Some(record) = self.canvases.get_mut(canvas) {
                record.pointers.forget_subtree(&self.tree, child);
            }
        }
        self.tree.detach(child)?;

        let layer_id = self.tree.get(child).and_then(|n| n.layer()).map(|spec| spec.id.clone());
        if let (Some(record), Some(layer_id)) = (self.canvases.get_mut(parent), layer_id) {
            if record.layers.get(&layer_id) == Some(&child) {
                record.layers.remove(&layer_id);
            }
        }

        self.invalidate(parent);
        if visible {
            self.repaint_rect(parent, old);
        }
        Ok(())
    }

    /// Detach the child at `index`, returning it.
    pub fn remove_at(&mut self, parent: ComponentId, index: usize) -> Result<ComponentId> {
        let kids = self.tree.children(parent);
        let Some(&child) = kids.get(index) else {
            return Err(Error::IndexOutOfBounds { index, len: kids.len() });
        };
        self.remove(parent, child)?;
        Ok(child)
    }

    /// Detach every child of `parent`, topmost first.
    pub fn remove_all(&mut self, parent: ComponentId) -> Result<()> {
        self.tree.require(parent)?;
        for child in self.tree.children(parent).to_vec().into_iter().rev() {
            self.remove(parent, child)?;
        }
        Ok(())
    }

    /// Detach `id` if attached, then free it and its whole subtree.
    pub fn dispose(&mut self, id: ComponentId) -> Result<()> {
        self.tree.require(id)?;
        if let Some(parent) = self.tree.parent(id) {
            self.remove(parent, id)?;
        }
        if self.focus.owner().is_some_and(|owner| self.tree.is_in_subtree(id, owner)) {
            self.request_focus(None);
        }
        for freed in self.tree.free(id) {
            if self.canvases.remove(freed).is_some() {
                log::debug!("{}: disposed canvas {freed:?}", self.label());
            }
        }
        Ok(())
    }

    // ── Geometry ─────────────────────────────────────────────────────

    pub fn set_location(&mut self, id: ComponentId, x: i32, y: i32) -> Result<()> {
        let node = self.tree.require_mut(id)?;
        let previous = node.bounds.location();
        if previous == Point::new(x, y) {
            return Ok(());
        }
        let old = node.bounds;
        node.bounds.x = x;
        node.bounds.y = y;
        let (new, visible) = (node.bounds, node.visible);

        if visible {
            if let Some(parent) = self.tree.parent(id) {
                self.repaint_rect(parent, old.union(new));
            }
        }
        self.fire(Event::new(id, EventData::Moved { previous }));
        Ok(())
    }

    /// Resize `id`. Negative dimensions are clamped to zero.
    ///
    /// The component's layout is marked stale; the next repaint task lays
    /// it out again.
    pub fn set_size(&mut self, id: ComponentId, width: i32, height: i32) -> Result<()> {
        let size = Size::clamped(width, height);
        let node = self.tree.require_mut(id)?;
        let previous = node.size();
        if previous == size {
            return Ok(());
        }
        let old = node.bounds;
        node.bounds.width = size.width;
        node.bounds.height = size.height;
        let (new, visible) = (node.bounds, node.visible);

        self.invalidate_layout(id);
        if let Some(record) = self.canvases.get_mut(id) {
            record.graphics.reset_size(size.width, size.height);
        }
        if visible {
            match self.tree.parent(id) {
                Some(parent) => self.repaint_rect(parent, old.union(new)),
                None => self.repaint_rect(
                    id,
                    Rect::new(0, 0, old.width.max(new.width), old.height.max(new.height)),
                ),
            }
            if self.canvases.contains_key(id) && self.tree.parent(id).is_some() {
                self.repaint(id);
            }
        }
        self.fire(Event::new(id, EventData::Sized { previous }));
        Ok(())
    }

    pub fn set_bounds(&mut self, id: ComponentId, x: i32, y: i32, width: i32, height: i32) -> Result<()> {
        self.set_location(id, x, y)?;
        self.set_size(id, width, height)
    }

    // ── State flags ──────────────────────────────────────────────────

    /// Show or hide `id`. Hiding releases focus held inside the subtree.
    pub fn set_visible(&mut self, id: ComponentId, visible: bool) -> Result<()> {
        let node = self.tree.require_mut(id)?;
        if node.visible == visible {
            return Ok(());
        }
        let bounds = node.bounds;
        node.visible = visible;

        self.invalidate(id);
        if visible {
            self.repaint(id);
        } else if let Some(parent) = self.tree.parent(id) {
            self.repaint_rect(parent, bounds);
        }
        self.fire(Event::new(id, EventData::Shown { visible }));
        Ok(())
    }

    /// Enable or disable `id`. Disabling releases focus held inside the
    /// subtree.
    pub fn set_enabled(&mut self, id: ComponentId, enabled: bool) -> Result<()> {
        let node = self.tree.require_mut(id)?;
        if node.enabled == enabled {
            return Ok(());
        }
        node.enabled = enabled;
        self.fire(Event::new(id, EventData::Enabled { enabled }));
        self.repaint(id);
        Ok(())
    }

    pub fn set_can_have_focus(&mut self, id: ComponentId, focusability: Focusability) -> Result<()> {
        self.tree.require_mut(id)?.focusable = focusability;
        if self.has_focus(id) && !self.is_focusable(id) {
            self.request_focus(None);
        }
        Ok(())
    }

    pub fn set_focus_root(&mut self, id: ComponentId, focus_root: bool) -> Result<()> {
        self.tree.require_mut(id)?.focus_root = focus_root;
        Ok(())
    }

    pub fn set_traversal(&mut self, id: ComponentId, traversal: Traversal) -> Result<()> {
        self.tree.require_mut(id)?.traversal = traversal;
        Ok(())
    }

    pub fn set_catch_input(&mut self, id: ComponentId, catch_input: CatchInput) -> Result<()> {
        self.tree.require_mut(id)?.catch_input = catch_input;
        Ok(())
    }

    pub fn set_cursor(&mut self, id: ComponentId, cursor: Option<Cursor>) -> Result<()> {
        self.tree.require_mut(id)?.cursor = cursor;
        Ok(())
    }

    pub fn set_handler(&mut self, id: ComponentId, handler: Option<Rc<dyn Handler>>) -> Result<()> {
        self.tree.require_mut(id)?.handler = handler;
        Ok(())
    }

    // ── Decoration and layout ────────────────────────────────────────

    pub fn set_padding(&mut self, id: ComponentId, padding: Insets) -> Result<()> {
        let node = self.tree.require_mut(id)?;
        if node.padding == padding {
            return Ok(());
        }
        node.padding = padding;
        self.invalidate(id);
        self.repaint(id);
        Ok(())
    }

    /// Replace the border view. Border insets count towards the component's
    /// insets, so this invalidates.
    pub fn set_border(&mut self, id: ComponentId, border: Option<Rc<dyn View>>) -> Result<()> {
        self.tree.require_mut(id)?.border = border;
        self.invalidate(id);
        self.repaint(id);
        Ok(())
    }

    pub fn set_background(&mut self, id: ComponentId, background: Option<Rc<dyn View>>) -> Result<()> {
        self.tree.require_mut(id)?.background = background;
        self.repaint(id);
        Ok(())
    }

    pub fn set_view(&mut self, id: ComponentId, view: Option<Rc<dyn View>>) -> Result<()> {
        self.tree.require_mut(id)?.view = view;
        self.invalidate(id);
        self.repaint(id);
        Ok(())
    }

    /// Replace the layout manager. Fails, leaving the old manager in place,
    /// if any current child carries a constraint the new one rejects.
    pub fn set_layout(&mut self, id: ComponentId, layout: Option<Rc<dyn Layout>>) -> Result<()> {
        self.tree.require(id)?;
        if let Some(layout) = &layout {
            for &child in self.tree.children(id) {
                let constraint = self.tree.get(child).and_then(|n| n.constraint());
                layout.check_constraint(constraint)?;
            }
        }
        self.tree.require_mut(id)?.layout = layout;
        self.invalidate(id);
        self.repaint(id);
        Ok(())
    }

    /// Fix either preferred dimension (insets included), or clear it with
    /// `None`.
    pub fn set_preferred_size(&mut self, id: ComponentId, width: Option<i32>, height: Option<i32>) -> Result<()> {
        let node = self.tree.require_mut(id)?;
        let fixed = (width.map(|w| w.max(0)), height.map(|h| h.max(0)));
        if node.ps_override == fixed {
            return Ok(());
        }
        node.ps_override = fixed;
        self.invalidate(id);
        Ok(())
    }

    /// Change the constraint `id` carries for its parent's layout manager.
    pub fn set_constraint(&mut self, id: ComponentId, constraint: Option<Constraint>) -> Result<()> {
        self.tree.require(id)?;
        let parent = self.tree.parent(id);
        if let Some(layout) = parent.and_then(|p| self.tree.get(p)).and_then(|n| n.layout()) {
            layout.check_constraint(constraint.as_ref())?;
        }
        self.tree.require_mut(id)?.constraint = constraint;
        if let Some(parent) = parent {
            self.invalidate(parent);
        }
        Ok(())
    }

    // ── Validation ───────────────────────────────────────────────────

    /// Drop cached metrics of `id` and every ancestor, and queue a task on
    /// each canvas passed on the way. Nothing is recomputed until the next
    /// validation.
    pub fn invalidate(&mut self, id: ComponentId) {
        let mut current = Some(id);
        while let Some(c) = current {
            let Some(node) = self.tree.get_mut(c) else { break };
            node.valid = false;
            node.layout_valid = false;
            node.cached_ps = None;
            if node.canvas {
                self.request_task(c);
            }
            current = self.tree.parent(c);
        }
    }

    /// Mark the layout of `id` and its ancestors stale, keeping cached
    /// preferred sizes.
    pub fn invalidate_layout(&mut self, id: ComponentId) {
        let mut current = Some(id);
        while let Some(c) = current {
            let Some(node) = self.tree.get_mut(c) else { break };
            node.layout_valid = false;
            if node.canvas {
                self.request_task(c);
            }
            current = self.tree.parent(c);
        }
    }

    /// Lay out `id` and its descendants where their layout is stale.
    ///
    /// Hidden and empty components are skipped; their layout stays stale
    /// until they are shown or sized.
    pub fn validate(&mut self, id: ComponentId) -> Result<()> {
        let node = self.tree.require_mut(id)?;
        node.valid = true;
        if !node.visible || node.layout_valid || node.bounds.size().is_empty() {
            return Ok(());
        }
        if let Some(layout) = node.layout.clone() {
            layout.do_layout(self, id)?;
        }
        for child in self.tree.children(id).to_vec() {
            self.validate(child)?;
        }
        if let Some(node) = self.tree.get_mut(id) {
            node.layout_valid = true;
        }
        Ok(())
    }

    /// Preferred size of `id` including its insets.
    ///
    /// Comes from the fixed override where set, otherwise from the layout
    /// manager, the size hook or the content view, in that order. Cached
    /// until the component is invalidated.
    pub fn preferred_size(&mut self, id: ComponentId) -> Size {
        let Some(node) = self.tree.get(id) else {
            return Size::ZERO;
        };
        if let Some(ps) = node.cached_ps {
            return ps;
        }
        let (fixed_w, fixed_h) = node.ps_override;
        let insets = node.insets();
        let layout = node.layout.clone();
        let hook = node.hooks.preferred_size.clone();
        let view_ps = node.view.as_ref().map(|v| v.preferred_size());

        let base = if fixed_w.is_some() && fixed_h.is_some() {
            Size::ZERO
        } else if let Some(layout) = layout {
            layout.calc_preferred_size(self, id)
        } else if let Some(hook) = hook {
            hook(&self.tree, id)
        } else {
            view_ps.unwrap_or(Size::ZERO)
        };
        let ps = Size::clamped(
            fixed_w.unwrap_or(base.width + insets.horizontal()),
            fixed_h.unwrap_or(base.height + insets.vertical()),
        );
        if let Some(node) = self.tree.get_mut(id) {
            node.cached_ps = Some(ps);
        }
        ps
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new(AppConfig::default())
    }
}

// ===========================================================================
// Tests
// ===========================================================================
