//! Raw input routing: hit-testing, composite capture, pointer pairing, keys.
//!
//! A pointer sample is converted into canvas space, offered to the canvas's
//! layers top-down, hit-tested, then resolved through
//! [`App::event_destination`] so composites receive input aimed at their
//! parts. The canvas's [`PointerState`](crate::canvas::PointerState) pairs
//! enter with exit and press with release per pointer id. Keys go to a
//! capturing layer or the focus owner; an unhandled Tab moves focus.

use crate::app::App;
use crate::cursor::effective_cursor;
use crate::error::{Error, Result};
use crate::event::{
    Event, EventData, Key, KeyAction, KeyEvent, Modifiers, PointerAction, PointerButton,
    PointerEvent, PointerKind, PointerType, Propagation, RawInput, RawPointer,
};
use crate::focus::Direction;
use crate::canvas::{PointerState, PressState};
use crate::geometry::{Point, Rect};
use crate::tree::ComponentId;

impl App {
    // ── Resolution ───────────────────────────────────────────────────

    /// Topmost visible component at `(x, y)`, in `id`'s coordinates.
    ///
    /// Children are tested in reverse z-order. Points outside a component are
    /// never matched by its descendants. An embedded canvas is returned as is;
    /// its own tree is hit-tested when input is delegated to it.
    pub fn component_at(&self, id: ComponentId, x: i32, y: i32) -> Option<ComponentId> {
        let node = self.tree.get(id)?;
        if !node.is_visible() || !Rect::from_size(node.size()).contains(x, y) {
            return None;
        }
        for &kid in self.tree.children(id).iter().rev() {
            let Some(child) = self.tree.get(kid) else { continue };
            if !child.is_visible() {
                continue;
            }
            let (lx, ly) = (x - child.x(), y - child.y());
            if child.is_canvas() {
                if Rect::from_size(child.size()).contains(lx, ly) {
                    return Some(kid);
                }
                continue;
            }
            if let Some(hit) = self.component_at(kid, lx, ly) {
                return Some(hit);
            }
        }
        if let Some(contains) = &node.hooks.contains {
            if !contains(&self.tree, id, x, y) {
                return None;
            }
        }
        Some(id)
    }

    /// The component that should receive input aimed at `id`.
    ///
    /// Walks up to the canvas; every ancestor that catches input for the
    /// current candidate replaces it, so nested composites resolve to the
    /// outermost one that captures.
    pub fn event_destination(&self, id: ComponentId) -> Option<ComponentId> {
        let mut target = id;
        let mut current = id;
        loop {
            let node = self.tree.get(current)?;
            if node.is_canvas() {
                break;
            }
            let Some(parent) = self.tree.parent(current) else { break };
            if let Some(p) = self.tree.get(parent) {
                if p.catch_input().catches(&self.tree, parent, target) {
                    target = parent;
                }
            }
            current = parent;
        }
        Some(target)
    }

    /// Resolve a canvas-space point to its event target.
    ///
    /// Layers are asked top-down first. A layer with a policy decides for
    /// itself; a layer without one is active where it has a visible
    /// descendant under the point. Otherwise the whole canvas is hit-tested,
    /// and a point over no layer content goes to the lowest layer under it.
    pub fn pointer_target(&self, canvas: ComponentId, x: i32, y: i32) -> Option<ComponentId> {
        for &layer in self.tree.children(canvas).iter().rev() {
            let Some(node) = self.tree.get(layer) else { continue };
            if !node.is_visible() {
                continue;
            }
            let (lx, ly) = (x - node.x(), y - node.y());
            let hit = self.component_at(layer, lx, ly);
            let active = match node.layer().and_then(|spec| spec.policy.as_ref()) {
                Some(policy) => policy.is_active_at(&self.tree, layer, lx, ly),
                None => hit.is_some_and(|h| h != layer),
            };
            if active {
                log::trace!("layer {layer:?} claims ({x}, {y})");
                return self.event_destination(hit.unwrap_or(layer));
            }
        }
        let hit = self.component_at(canvas, x, y)?;
        // Empty space belongs to the bottom layer, not whichever is on top.
        if hit == canvas || self.tree.parent(hit) == Some(canvas) {
            let base = self.tree.children(canvas).iter().copied().find(|&layer| {
                self.tree
                    .get(layer)
                    .is_some_and(|n| n.is_visible() && n.bounds().contains(x, y))
            });
            return self.event_destination(base.unwrap_or(hit));
        }
        self.event_destination(hit)
    }

    // ── Entry point ──────────────────────────────────────────────────

    /// Route one raw input sample arriving at `canvas`.
    pub fn handle_input(&mut self, canvas: ComponentId, input: RawInput) -> Result<()> {
        let Some(record) = self.canvases.get(canvas) else {
            return Err(Error::NotACanvas(canvas));
        };
        match input {
            RawInput::Pointer(p) => {
                let Some((x, y)) = record.to_canvas_coords(p.x, p.y) else {
                    return Ok(());
                };
                self.route_pointer(canvas, &p, x, y);
            }
            RawInput::Key { action, key } => self.route_key(canvas, action, key),
        }
        Ok(())
    }

    fn route_pointer(&mut self, canvas: ComponentId, p: &RawPointer, x: i32, y: i32) {
        match p.action {
            PointerAction::Down => self.pointer_down(canvas, p, x, y),
            PointerAction::Up => self.pointer_up(canvas, p, x, y),
            PointerAction::Move => self.pointer_move(canvas, p, x, y),
            PointerAction::Leave => self.pointer_leave(canvas, p),
        }
    }

    fn pointers_mut(&mut self, canvas: ComponentId) -> Option<&mut PointerState> {
        self.canvases.get_mut(canvas).map(|c| &mut c.pointers)
    }

    fn embedded_canvas(&self, outer: ComponentId, target: Option<ComponentId>) -> Option<ComponentId> {
        target.filter(|&t| t != outer && self.tree.get(t).is_some_and(|n| n.is_canvas()))
    }

    // ── Pointer actions ──────────────────────────────────────────────

    fn pointer_down(&mut self, canvas: ComponentId, p: &RawPointer, x: i32, y: i32) {
        if let Some(state) = self.pointers_mut(canvas) {
            state.last.insert(p.pointer, Point::new(x, y));
        }
        let target = self.pointer_target(canvas, x, y);
        if let Some(inner) = self.embedded_canvas(canvas, target) {
            if let Some(state) = self.pointers_mut(canvas) {
                state.delegated.insert(p.pointer, inner);
            }
            self.delegate(canvas, inner, p, x, y);
            return;
        }

        self.update_hover(canvas, p, target, x, y);
        let Some(target) = target else { return };
        if let Some(state) = self.pointers_mut(canvas) {
            state.pressed.insert(
                p.pointer,
                PressState { target, button: p.button, x, y, dragged: false },
            );
        }
        self.fire_pointer(PointerKind::Pressed, p, target, x, y);
        if self.config.focus_on_press && p.button == PointerButton::Primary {
            self.request_focus(Some(target));
        }
    }

    fn pointer_move(&mut self, canvas: ComponentId, p: &RawPointer, x: i32, y: i32) {
        let point = Point::new(x, y);
        let Some(state) = self.pointers_mut(canvas) else { return };
        if state.last.insert(p.pointer, point) == Some(point) {
            return;
        }
        if let Some(inner) = state.delegated.get(&p.pointer).copied() {
            self.delegate(canvas, inner, p, x, y);
            return;
        }

        if let Some(press) = state.pressed.get_mut(&p.pointer) {
            let first = !press.dragged;
            press.dragged = true;
            let target = press.target;
            if first && self.tree.contains(target) {
                self.fire_pointer(PointerKind::DragStarted, p, target, x, y);
            }
            if self.tree.contains(target) {
                self.fire_pointer(PointerKind::Dragged, p, target, x, y);
            }
            return;
        }

        let target = self.pointer_target(canvas, x, y);
        if let Some(inner) = self.embedded_canvas(canvas, target) {
            self.delegate(canvas, inner, p, x, y);
            return;
        }
        self.update_hover(canvas, p, target, x, y);
        let entered = self.canvases.get(canvas).and_then(|c| c.pointers.entered(p.pointer));
        if let Some(entered) = entered {
            self.fire_pointer(PointerKind::Moved, p, entered, x, y);
        }
    }

    fn pointer_up(&mut self, canvas: ComponentId, p: &RawPointer, x: i32, y: i32) {
        let Some(state) = self.pointers_mut(canvas) else { return };
        state.last.insert(p.pointer, Point::new(x, y));
        if let Some(inner) = state.delegated.remove(&p.pointer) {
            self.delegate(canvas, inner, p, x, y);
        } else if let Some(press) = state.pressed.remove(&p.pointer) {
            self.release(canvas, p, press, x, y);
        }

        // A lifted finger no longer hovers anything.
        if p.pointer_type == PointerType::Touch {
            self.update_hover(canvas, p, None, x, y);
            if let Some(state) = self.pointers_mut(canvas) {
                state.last.remove(&p.pointer);
            }
        }
    }

    /// Finish a press. Handlers may remove the target, so it is checked
    /// before every delivery.
    fn release(&mut self, canvas: ComponentId, p: &RawPointer, press: PressState, x: i32, y: i32) {
        if press.dragged && self.tree.contains(press.target) {
            self.fire_pointer(PointerKind::DragEnded, p, press.target, x, y);
        }
        if self.tree.contains(press.target) {
            self.fire_pointer(PointerKind::Released, p, press.target, x, y);
        }
        if !press.dragged && self.tree.contains(press.target) {
            self.fire_pointer(PointerKind::Clicked, p, press.target, x, y);
        }

        // A drag may have ended over another component.
        if p.pointer_type != PointerType::Touch {
            let target = self.pointer_target(canvas, x, y);
            self.update_hover(canvas, p, target, x, y);
        }
    }

    fn pointer_leave(&mut self, canvas: ComponentId, p: &RawPointer) {
        let Some(state) = self.pointers_mut(canvas) else { return };
        let last = state.last.remove(&p.pointer).unwrap_or(Point::ORIGIN);
        self.update_hover(canvas, p, None, last.x, last.y);
    }

    /// Exit the previous hover target before entering the new one.
    fn update_hover(
        &mut self,
        canvas: ComponentId,
        p: &RawPointer,
        target: Option<ComponentId>,
        x: i32,
        y: i32,
    ) {
        let Some(state) = self.pointers_mut(canvas) else { return };
        let previous = state.entered(p.pointer);
        if previous == target {
            return;
        }
        state.entered.remove(&p.pointer);

        if let Some(old) = previous {
            if self.tree.contains(old) {
                self.fire_pointer(PointerKind::Exited, p, old, x, y);
            }
            if self.embedded_canvas(canvas, Some(old)).is_some() {
                let leave = RawPointer { action: PointerAction::Leave, ..*p };
                self.route_pointer(old, &leave, 0, 0);
            }
        }

        let target = target.filter(|&t| self.tree.contains(t));
        let cursor = target.map(|t| effective_cursor(&self.tree, t)).unwrap_or_default();
        if let Some(record) = self.canvases.get_mut(canvas) {
            record.cursor = cursor;
            if let Some(t) = target {
                record.pointers.entered.insert(p.pointer, t);
            }
        }
        if let Some(new) = target {
            self.fire_pointer(PointerKind::Entered, p, new, x, y);
        }
    }

    /// Hand a pointer sample to an embedded canvas, converting `(x, y)` from
    /// the outer canvas into the inner canvas's pixel space.
    fn delegate(&mut self, outer: ComponentId, inner: ComponentId, p: &RawPointer, x: i32, y: i32) {
        if p.action != PointerAction::Up {
            self.update_hover(outer, p, Some(inner), x, y);
        }
        let origin = self.tree.get(inner).and_then(|node| {
            let parent = self.tree.parent(inner)?;
            Some(self.tree.location_in_canvas(parent)? + node.bounds().location())
        });
        let Some(origin) = origin else { return };
        let Some(local) = self
            .canvases
            .get(inner)
            .and_then(|c| c.graphics.to_local((x - origin.x) as f64, (y - origin.y) as f64))
        else {
            return;
        };
        let (ix, iy) = (local.0.floor() as i32, local.1.floor() as i32);
        log::trace!("delegating {:?} to embedded canvas {inner:?} at ({ix}, {iy})", p.action);
        self.route_pointer(inner, p, ix, iy);
    }

    fn fire_pointer(
        &mut self,
        kind: PointerKind,
        p: &RawPointer,
        target: ComponentId,
        x: i32,
        y: i32,
    ) -> Propagation {
        let origin = self.tree.location_in_canvas(target).unwrap_or(Point::ORIGIN);
        let event = PointerEvent {
            kind,
            pointer: p.pointer,
            pointer_type: p.pointer_type,
            button: p.button,
            x: x - origin.x,
            y: y - origin.y,
            canvas_x: x,
            canvas_y: y,
            modifiers: p.modifiers,
        };
        self.fire(Event::new(target, EventData::Pointer(event)))
    }

    // ── Keys ─────────────────────────────────────────────────────────

    fn route_key(&mut self, canvas: ComponentId, action: KeyAction, key: KeyEvent) {
        let owner = self
            .focus
            .owner()
            .filter(|&o| self.tree.is_in_subtree(canvas, o));

        let capturing = self.tree.children(canvas).iter().rev().copied().find(|&layer| {
            self.tree.get(layer).is_some_and(|n| {
                n.is_visible()
                    && n.layer()
                        .and_then(|spec| spec.policy.as_ref())
                        .is_some_and(|policy| policy.captures_key(&self.tree, layer, &key))
            })
        });

        let target = match capturing {
            Some(layer) => Some(owner.filter(|&o| self.tree.is_in_subtree(layer, o)).unwrap_or(layer)),
            None => owner,
        };

        let handled = match target {
            Some(t) => self.fire(Event::new(t, EventData::Key { action, key })),
            None => Propagation::Continue,
        };

        if handled.is_stopped() || action != KeyAction::Pressed || !self.config.tab_traversal {
            return;
        }
        let direction = match key.code {
            Key::BackTab => Direction::Backward,
            Key::Tab if key.modifiers.contains(Modifiers::SHIFT) => Direction::Backward,
            Key::Tab => Direction::Forward,
            _ => return,
        };
        let from = target.unwrap_or(canvas);
        if let Some(next) = self.find_next_focusable(from, direction) {
            self.request_focus(Some(next));
        }
    }
}

// ===========================================================================
// Tests
// ===========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::Modal;
    use crate::cursor::Cursor;
    use crate::event::{EventKind, FnHandler};
    use crate::testing::RecordingSurface;
    use crate::tree::{CatchInput, Component};
    use pretty_assertions::assert_eq;
    use std::cell::RefCell;
    use std::rc::Rc;

    type Log = Rc<RefCell<Vec<(&'static str, ComponentId)>>>;

    fn record_all(app: &mut App) -> Log {
        let log: Log = Rc::new(RefCell::new(Vec::new()));
        let l = Rc::clone(&log);
        app.bind(move |_, ev| {
            if ev.pointer().is_some() || matches!(ev.kind(), EventKind::KeyPressed | EventKind::KeyTyped) {
                l.borrow_mut().push((ev.name(), ev.source));
            }
            Propagation::Continue
        });
        log
    }

    /// Canvas 200x200 with one layer holding a root panel that has no layout.
    fn build_tree() -> (App, ComponentId, ComponentId) {
        let mut app = App::default();
        let canvas = app.create_canvas(RecordingSurface::new(), 200, 200);
        let layer = app.add_layer(canvas, "root", None).unwrap();
        let root = app.create(Component::named("root"));
        app.add(layer, root).unwrap();
        app.validate(canvas).unwrap();
        (app, canvas, root)
    }

    fn leaf(app: &mut App, parent: ComponentId, x: i32, y: i32, w: i32, h: i32) -> ComponentId {
        let id = app.create(Component::new().with_bounds(x, y, w, h));
        app.add(parent, id).unwrap();
        id
    }

    fn mouse(app: &mut App, canvas: ComponentId, action: PointerAction, x: f64, y: f64) {
        app.handle_input(canvas, RawInput::Pointer(RawPointer::mouse(action, x, y))).unwrap();
    }

    // ── Hit-testing ──────────────────────────────────────────────────

    #[test]
    fn topmost_sibling_wins() {
        let (mut app, _, root) = build_tree();
        let a = leaf(&mut app, root, 10, 10, 50, 50);
        let b = leaf(&mut app, root, 30, 30, 50, 50);
        assert_eq!(app.component_at(root, 40, 40), Some(b));
        assert_eq!(app.component_at(root, 15, 15), Some(a));
        assert_eq!(app.component_at(root, 150, 150), Some(root));
        assert_eq!(app.component_at(root, 500, 5), None);
    }

    #[test]
    fn children_clipped_by_parent_are_not_hit() {
        let (mut app, _, root) = build_tree();
        let panel = leaf(&mut app, root, 0, 0, 20, 20);
        let overflow = leaf(&mut app, panel, 10, 10, 50, 50);
        assert_eq!(app.component_at(root, 15, 15), Some(overflow));
        assert_eq!(app.component_at(root, 40, 40), Some(root));
    }

    #[test]
    fn contains_hook_refines_hits() {
        let (mut app, _, root) = build_tree();
        let ring = app.create(
            Component::new()
                .with_bounds(0, 0, 40, 40)
                .with_contains(|_, _, x, y| !(10..30).contains(&x) || !(10..30).contains(&y)),
        );
        app.add(root, ring).unwrap();
        assert_eq!(app.component_at(root, 2, 2), Some(ring));
        assert_eq!(app.component_at(root, 20, 20), Some(root));
    }

    #[test]
    fn composite_captures_descendant_input() {
        let (mut app, canvas, root) = build_tree();
        let composite = app.create(
            Component::named("button")
                .with_bounds(10, 10, 80, 30)
                .with_catch_input(CatchInput::All),
        );
        app.add(root, composite).unwrap();
        let icon = leaf(&mut app, composite, 5, 5, 10, 10);
        assert_eq!(app.event_destination(icon), Some(composite));

        let log = record_all(&mut app);
        mouse(&mut app, canvas, PointerAction::Down, 20.0, 20.0);
        assert!(log.borrow().contains(&("pointerPressed", composite)));
        assert!(!log.borrow().iter().any(|&(_, s)| s == icon));
    }

    #[test]
    fn nested_composites_resolve_outermost() {
        let (mut app, _, root) = build_tree();
        let outer = app.create(Component::new().with_bounds(0, 0, 100, 100).with_catch_input(CatchInput::All));
        app.add(root, outer).unwrap();
        let inner = app.create(
            Component::new()
                .with_bounds(0, 0, 50, 50)
                .catching_input_when(|_, _, _| true),
        );
        app.add(outer, inner).unwrap();
        let part = leaf(&mut app, inner, 0, 0, 10, 10);
        assert_eq!(app.event_destination(part), Some(outer));
    }

    #[test]
    fn predicate_capture_is_selective() {
        let (mut app, _, root) = build_tree();
        let list = app.create(Component::new().with_bounds(0, 0, 100, 100));
        app.add(root, list).unwrap();
        let header = leaf(&mut app, list, 0, 0, 100, 10);
        let body = leaf(&mut app, list, 0, 10, 100, 90);
        let only_header = move |_: &crate::tree::Tree, _: ComponentId, d: ComponentId| d == header;
        app.set_catch_input(list, CatchInput::When(Rc::new(only_header))).unwrap();
        assert_eq!(app.event_destination(header), Some(list));
        assert_eq!(app.event_destination(body), Some(body));
    }

    // ── Pointer pairing ──────────────────────────────────────────────

    #[test]
    fn exit_precedes_enter() {
        let (mut app, canvas, root) = build_tree();
        let x = leaf(&mut app, root, 0, 0, 20, 20);
        let y = leaf(&mut app, root, 50, 0, 20, 20);
        mouse(&mut app, canvas, PointerAction::Move, 5.0, 5.0);
        let log = record_all(&mut app);
        mouse(&mut app, canvas, PointerAction::Move, 55.0, 5.0);

        let events = log.borrow().clone();
        let exits: Vec<_> = events.iter().filter(|e| e.0 == "pointerExited").collect();
        let enters: Vec<_> = events.iter().filter(|e| e.0 == "pointerEntered").collect();
        assert_eq!(exits, vec![&("pointerExited", x)]);
        assert_eq!(enters, vec![&("pointerEntered", y)]);
        let exit_at = events.iter().position(|e| e.0 == "pointerExited").unwrap();
        let enter_at = events.iter().position(|e| e.0 == "pointerEntered").unwrap();
        assert!(exit_at < enter_at);
        assert_eq!(events.last(), Some(&("pointerMoved", y)));
    }

    #[test]
    fn repeated_position_is_ignored() {
        let (mut app, canvas, root) = build_tree();
        leaf(&mut app, root, 0, 0, 20, 20);
        mouse(&mut app, canvas, PointerAction::Move, 5.0, 5.0);
        let log = record_all(&mut app);
        mouse(&mut app, canvas, PointerAction::Move, 5.0, 5.0);
        assert!(log.borrow().is_empty());
    }

    #[test]
    fn leave_exits_hovered_component() {
        let (mut app, canvas, root) = build_tree();
        let x = leaf(&mut app, root, 0, 0, 20, 20);
        mouse(&mut app, canvas, PointerAction::Move, 5.0, 5.0);
        let log = record_all(&mut app);
        mouse(&mut app, canvas, PointerAction::Leave, 0.0, 0.0);
        assert_eq!(*log.borrow(), vec![("pointerExited", x)]);
        assert_eq!(app.canvas(canvas).unwrap().pointers().entered(crate::event::PointerId::MOUSE), None);
    }

    #[test]
    fn click_without_movement() {
        let (mut app, canvas, root) = build_tree();
        let target = leaf(&mut app, root, 0, 0, 50, 50);
        let log = record_all(&mut app);
        mouse(&mut app, canvas, PointerAction::Down, 10.0, 10.0);
        mouse(&mut app, canvas, PointerAction::Up, 10.0, 10.0);
        assert_eq!(
            *log.borrow(),
            vec![
                ("pointerEntered", target),
                ("pointerPressed", target),
                ("pointerReleased", target),
                ("pointerClicked", target),
            ]
        );
    }

    #[test]
    fn drag_suppresses_click() {
        let (mut app, canvas, root) = build_tree();
        let target = leaf(&mut app, root, 0, 0, 50, 50);
        let other = leaf(&mut app, root, 100, 0, 50, 50);
        let log = record_all(&mut app);
        mouse(&mut app, canvas, PointerAction::Down, 10.0, 10.0);
        mouse(&mut app, canvas, PointerAction::Move, 20.0, 10.0);
        mouse(&mut app, canvas, PointerAction::Move, 110.0, 10.0);
        mouse(&mut app, canvas, PointerAction::Up, 110.0, 10.0);
        assert_eq!(
            *log.borrow(),
            vec![
                ("pointerEntered", target),
                ("pointerPressed", target),
                ("pointerDragStarted", target),
                ("pointerDragged", target),
                ("pointerDragged", target),
                ("pointerDragEnded", target),
                ("pointerReleased", target),
                ("pointerExited", target),
                ("pointerEntered", other),
            ]
        );
    }

    #[test]
    fn pointer_events_carry_local_coordinates() {
        let (mut app, canvas, root) = build_tree();
        let panel = leaf(&mut app, root, 20, 30, 100, 100);
        let button = leaf(&mut app, panel, 10, 10, 20, 20);
        let seen = Rc::new(RefCell::new(None));
        let s = Rc::clone(&seen);
        app.set_handler(
            button,
            Some(Rc::new(FnHandler(move |_: &mut App, ev: &Event| {
                if let Some(p) = ev.pointer().filter(|p| p.kind == PointerKind::Pressed) {
                    *s.borrow_mut() = Some((p.x, p.y, p.canvas_x, p.canvas_y));
                }
                Propagation::Continue
            }))),
        )
        .unwrap();
        mouse(&mut app, canvas, PointerAction::Down, 35.0, 45.0);
        assert_eq!(*seen.borrow(), Some((5, 5, 35, 45)));
    }

    #[test]
    fn touch_pointers_are_tracked_independently() {
        let (mut app, canvas, root) = build_tree();
        let a = leaf(&mut app, root, 0, 0, 50, 50);
        let b = leaf(&mut app, root, 100, 0, 50, 50);
        let log = record_all(&mut app);
        let touch = |action, id, x| RawInput::Pointer(RawPointer::touch(action, id, x, 10.0));
        app.handle_input(canvas, touch(PointerAction::Down, 1, 10.0)).unwrap();
        app.handle_input(canvas, touch(PointerAction::Down, 2, 110.0)).unwrap();
        app.handle_input(canvas, touch(PointerAction::Up, 1, 10.0)).unwrap();
        app.handle_input(canvas, touch(PointerAction::Up, 2, 110.0)).unwrap();
        let clicks: Vec<_> = log.borrow().iter().filter(|e| e.0 == "pointerClicked").copied().collect();
        assert_eq!(clicks, vec![("pointerClicked", a), ("pointerClicked", b)]);
    }

    #[test]
    fn lifted_touches_exit_and_are_forgotten() {
        let (mut app, canvas, root) = build_tree();
        let a = leaf(&mut app, root, 0, 0, 50, 50);
        let log = record_all(&mut app);
        for id in 1..=5 {
            app.handle_input(canvas, RawInput::Pointer(RawPointer::touch(PointerAction::Down, id, 10.0, 10.0)))
                .unwrap();
            app.handle_input(canvas, RawInput::Pointer(RawPointer::touch(PointerAction::Up, id, 10.0, 10.0)))
                .unwrap();
        }

        let count = |name: &str| log.borrow().iter().filter(|e| e.0 == name && e.1 == a).count();
        assert_eq!(count("pointerEntered"), 5);
        assert_eq!(count("pointerExited"), 5);
        assert_eq!(count("pointerClicked"), 5);
        assert_eq!(log.borrow().last(), Some(&("pointerExited", a)));

        let pointers = app.canvas(canvas).unwrap().pointers();
        assert!(pointers.entered.is_empty());
        assert!(pointers.last.is_empty());
        assert!(pointers.pressed.is_empty());
    }

    #[test]
    fn target_disposed_on_release_gets_no_click() {
        let (mut app, canvas, root) = build_tree();
        let target = leaf(&mut app, root, 0, 0, 50, 50);
        app.set_handler(
            target,
            Some(Rc::new(FnHandler(|app: &mut App, ev: &Event| {
                if ev.pointer().is_some_and(|p| p.kind == PointerKind::Released) {
                    app.dispose(ev.source).unwrap();
                }
                Propagation::Continue
            }))),
        )
        .unwrap();
        let log = record_all(&mut app);
        mouse(&mut app, canvas, PointerAction::Down, 10.0, 10.0);
        mouse(&mut app, canvas, PointerAction::Up, 10.0, 10.0);

        assert!(!app.tree().contains(target));
        assert!(!log.borrow().contains(&("pointerClicked", target)));
        assert!(log.borrow().contains(&("pointerEntered", root)));
    }

    #[test]
    fn removal_clears_pointer_maps() {
        let (mut app, canvas, root) = build_tree();
        let target = leaf(&mut app, root, 0, 0, 50, 50);
        mouse(&mut app, canvas, PointerAction::Down, 10.0, 10.0);
        app.remove(root, target).unwrap();
        let pointers = app.canvas(canvas).unwrap().pointers();
        assert_eq!(pointers.entered(crate::event::PointerId::MOUSE), None);
        assert!(pointers.pressed(crate::event::PointerId::MOUSE).is_none());

        let log = record_all(&mut app);
        mouse(&mut app, canvas, PointerAction::Up, 10.0, 10.0);
        assert!(!log.borrow().iter().any(|&(_, s)| s == target));
    }

    #[test]
    fn hover_updates_cursor() {
        let (mut app, canvas, root) = build_tree();
        let field = app.create(Component::new().with_bounds(0, 0, 50, 50).with_cursor(Cursor::Text));
        app.add(root, field).unwrap();
        mouse(&mut app, canvas, PointerAction::Move, 10.0, 10.0);
        assert_eq!(app.cursor(canvas), Cursor::Text);
        mouse(&mut app, canvas, PointerAction::Move, 150.0, 150.0);
        assert_eq!(app.cursor(canvas), Cursor::Default);
    }

    #[test]
    fn device_coordinates_use_page_offset() {
        let (mut app, canvas, root) = build_tree();
        let target = leaf(&mut app, root, 0, 0, 10, 10);
        app.canvas_mut(canvas).unwrap().set_page_location(100.0, 100.0);
        let log = record_all(&mut app);
        mouse(&mut app, canvas, PointerAction::Move, 105.0, 105.0);
        assert!(log.borrow().contains(&("pointerEntered", target)));
    }

    #[test]
    fn input_to_non_canvas_is_an_error() {
        let (mut app, _, root) = build_tree();
        let err = app.handle_input(root, RawInput::Pointer(RawPointer::mouse(PointerAction::Move, 0.0, 0.0)));
        assert_eq!(err, Err(Error::NotACanvas(root)));
    }

    // ── Layers ───────────────────────────────────────────────────────

    #[test]
    fn modal_layer_claims_all_pointer_input() {
        let (mut app, canvas, root) = build_tree();
        let below = leaf(&mut app, root, 0, 0, 100, 100);
        let modal = app.add_layer(canvas, "modal", Some(Rc::new(Modal))).unwrap();
        let dialog = app.create(Component::named("dialog"));
        app.add(modal, dialog).unwrap();
        app.validate(canvas).unwrap();
        app.set_bounds(dialog, 150, 150, 40, 40).unwrap();

        assert_eq!(app.pointer_target(canvas, 10, 10), Some(modal));
        assert_eq!(app.pointer_target(canvas, 160, 160), Some(dialog));

        app.set_visible(modal, false).unwrap();
        assert_eq!(app.pointer_target(canvas, 10, 10), Some(below));
    }

    #[test]
    fn policy_free_layer_is_transparent_outside_its_children() {
        let (mut app, canvas, root) = build_tree();
        let below = leaf(&mut app, root, 0, 0, 200, 200);
        let popups = app.add_layer(canvas, "popup", None).unwrap();
        app.validate(canvas).unwrap();
        let popup = leaf(&mut app, popups, 50, 50, 20, 20);

        assert_eq!(app.pointer_target(canvas, 55, 55), Some(popup));
        assert_eq!(app.pointer_target(canvas, 10, 10), Some(below));
    }

    #[test]
    fn empty_space_goes_to_bottom_layer() {
        let mut app = App::default();
        let canvas = app.create_canvas(RecordingSurface::new(), 100, 100);
        let base = app.add_layer(canvas, "root", None).unwrap();
        let popups = app.add_layer(canvas, "popup", None).unwrap();
        app.validate(canvas).unwrap();
        let popup = leaf(&mut app, popups, 50, 50, 20, 20);

        assert_eq!(app.pointer_target(canvas, 5, 5), Some(base));
        assert_eq!(app.pointer_target(canvas, 55, 55), Some(popup));
        assert_eq!(app.pointer_target(canvas, 150, 5), None);
    }

    // ── Focus and keys ───────────────────────────────────────────────

    #[test]
    fn press_requests_focus() {
        let (mut app, canvas, root) = build_tree();
        let field = app.create(Component::new().with_bounds(0, 0, 50, 50).focusable(true));
        app.add(root, field).unwrap();
        mouse(&mut app, canvas, PointerAction::Down, 10.0, 10.0);
        assert_eq!(app.focus_owner(), Some(field));

        // Secondary button does not move focus.
        app.request_focus(None);
        let right = RawPointer { button: PointerButton::Secondary, ..RawPointer::mouse(PointerAction::Down, 12.0, 12.0) };
        app.handle_input(canvas, RawInput::Pointer(right)).unwrap();
        assert_eq!(app.focus_owner(), None);
    }

    #[test]
    fn keys_go_to_focus_owner() {
        let (mut app, canvas, root) = build_tree();
        let field = app.create(Component::new().with_bounds(0, 0, 50, 50).focusable(true));
        app.add(root, field).unwrap();
        app.request_focus(Some(field));
        let log = record_all(&mut app);
        app.handle_input(canvas, RawInput::key(KeyAction::Pressed, Key::Char('x'), Modifiers::NONE))
            .unwrap();
        assert_eq!(*log.borrow(), vec![("keyPressed", field)]);
    }

    #[test]
    fn tab_moves_focus_unless_handled() {
        let (mut app, canvas, root) = build_tree();
        let a = app.create(Component::new().with_bounds(0, 0, 10, 10).focusable(true));
        let b = app.create(Component::new().with_bounds(20, 0, 10, 10).focusable(true));
        app.add(root, a).unwrap();
        app.add(root, b).unwrap();

        let tab = RawInput::key(KeyAction::Pressed, Key::Tab, Modifiers::NONE);
        app.handle_input(canvas, tab).unwrap();
        assert_eq!(app.focus_owner(), Some(a));
        app.handle_input(canvas, tab).unwrap();
        assert_eq!(app.focus_owner(), Some(b));
        app.handle_input(canvas, RawInput::key(KeyAction::Pressed, Key::Tab, Modifiers::SHIFT))
            .unwrap();
        assert_eq!(app.focus_owner(), Some(a));

        app.set_handler(a, Some(Rc::new(FnHandler(|_: &mut App, _: &Event| Propagation::Stop))))
            .unwrap();
        app.handle_input(canvas, tab).unwrap();
        assert_eq!(app.focus_owner(), Some(a));
    }

    #[test]
    fn modal_layer_captures_keys() {
        let (mut app, canvas, root) = build_tree();
        let field = app.create(Component::new().with_bounds(0, 0, 10, 10).focusable(true));
        app.add(root, field).unwrap();
        app.request_focus(Some(field));
        let modal = app.add_layer(canvas, "modal", Some(Rc::new(Modal))).unwrap();
        let ok = app.create(Component::new().with_bounds(50, 50, 10, 10).focusable(true));
        app.add(modal, ok).unwrap();
        app.validate(canvas).unwrap();

        let log = record_all(&mut app);
        app.handle_input(canvas, RawInput::key(KeyAction::Pressed, Key::Enter, Modifiers::NONE))
            .unwrap();
        assert_eq!(*log.borrow(), vec![("keyPressed", modal)]);

        // Tab stays inside the modal layer.
        app.handle_input(canvas, RawInput::key(KeyAction::Pressed, Key::Tab, Modifiers::NONE))
            .unwrap();
        assert_eq!(app.focus_owner(), Some(ok));
    }

    // ── Embedded canvases ────────────────────────────────────────────

    #[test]
    fn pointer_input_is_delegated_to_embedded_canvas() {
        let (mut app, canvas, root) = build_tree();
        let host = leaf(&mut app, root, 20, 20, 100, 100);
        let inner = app.embed_canvas(host, RecordingSurface::new(), 50, 50).unwrap();
        app.set_location(inner, 10, 10).unwrap();
        let target = app.create(Component::new().with_bounds(5, 5, 10, 10));
        let inner_root = app.create(Component::named("inner-root"));
        app.add(inner, inner_root).unwrap();
        app.validate(inner).unwrap();
        app.add(inner_root, target).unwrap();
        app.canvas_mut(inner).unwrap().graphics_mut().scale(2.0, 2.0);

        assert_eq!(app.pointer_target(canvas, 35, 35), Some(inner));

        let log = record_all(&mut app);
        // (45, 45) is (15, 15) inside the inner canvas element, (7, 7) after scaling.
        mouse(&mut app, canvas, PointerAction::Down, 45.0, 45.0);
        mouse(&mut app, canvas, PointerAction::Up, 45.0, 45.0);
        let events = log.borrow().clone();
        assert!(events.contains(&("pointerPressed", target)));
        assert!(events.contains(&("pointerClicked", target)));
        assert!(!events.contains(&("pointerPressed", inner)));

        // Leaving the embedded canvas exits its hovered component too.
        log.borrow_mut().clear();
        mouse(&mut app, canvas, PointerAction::Move, 5.0, 5.0);
        let events = log.borrow().clone();
        assert!(events.contains(&("pointerExited", target)));
        assert!(events.contains(&("pointerExited", inner)));
    }
}
