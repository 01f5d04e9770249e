//! Integration tests for canvas-kit.
//!
//! These tests exercise the public API from outside the crate: layout,
//! repaint scheduling, painting, hit-testing, input routing and focus working
//! together on a headless canvas.

use std::cell::RefCell;
use std::rc::Rc;

use canvas_kit::layout::Layout;
use canvas_kit::prelude::*;
use canvas_kit::testing::Pilot;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn place(pilot: &mut Pilot, name: &str, x: i32, y: i32, w: i32, h: i32) -> ComponentId {
    let id = pilot
        .app_mut()
        .create(Component::named(name).with_bounds(x, y, w, h));
    let root = pilot.root();
    pilot.app_mut().add(root, id).unwrap();
    id
}

fn record(app: &mut App) -> Rc<RefCell<Vec<(&'static str, ComponentId)>>> {
    let log = Rc::new(RefCell::new(Vec::new()));
    let l = Rc::clone(&log);
    app.bind(move |_, ev| {
        l.borrow_mut().push((ev.name(), ev.source));
        Propagation::Continue
    });
    log
}

fn bounds(app: &App, id: ComponentId) -> Rect {
    app.tree().get(id).unwrap().bounds()
}

// ---------------------------------------------------------------------------
// End-to-end: border layout on a resizable canvas
// ---------------------------------------------------------------------------

#[test]
fn border_layout_follows_canvas_resize() {
    let mut app = App::default();
    let canvas = app.create_canvas(RecordingSurface::new(), 400, 400);
    let layer = app.add_layer(canvas, "root", None).unwrap();

    let panel = app.create(Component::named("P").with_layout(BorderLayout::new()));
    app.add(layer, panel).unwrap();
    let label = app.create(Component::named("top").with_preferred_size(None, Some(20)));
    app.add_with(panel, label, Constraint::Top).unwrap();
    let center = app.create(Component::named("center"));
    app.add_with(panel, center, Constraint::Center).unwrap();

    app.flush_pending().unwrap();
    assert_eq!(bounds(&app, panel), Rect::new(0, 0, 400, 400));
    assert_eq!(bounds(&app, label), Rect::new(0, 0, 400, 20));
    assert_eq!(bounds(&app, center), Rect::new(0, 20, 400, 380));
    assert_eq!(app.dirty_rect(canvas), None);

    app.set_size(canvas, 400, 500).unwrap();
    assert_eq!(app.dirty_rect(canvas), Some(Rect::new(0, 0, 400, 500)));
    assert!(app.is_repaint_pending(canvas));

    assert_eq!(app.flush_pending().unwrap(), 1);
    assert_eq!(bounds(&app, label), Rect::new(0, 0, 400, 20));
    assert_eq!(bounds(&app, center), Rect::new(0, 20, 400, 480));
    assert!(!app.is_repaint_pending(canvas));
}

// ---------------------------------------------------------------------------
// Layout
// ---------------------------------------------------------------------------

#[test]
fn layout_twice_gives_identical_bounds() {
    let mut app = App::default();
    let canvas = app.create_canvas(RecordingSurface::new(), 300, 200);
    let layer = app.add_layer(canvas, "root", None).unwrap();
    let panel = app.create(Component::new().with_layout(BorderLayout::with_gaps(2, 3)));
    app.add(layer, panel).unwrap();
    let mut kids = Vec::new();
    for (constraint, w, h) in [
        (Constraint::Top, 0, 15),
        (Constraint::Left, 40, 0),
        (Constraint::Right, 25, 0),
        (Constraint::Bottom, 0, 10),
        (Constraint::Center, 0, 0),
    ] {
        let kid = app.create(Component::new().with_preferred_size(Some(w), Some(h)));
        app.add_with(panel, kid, constraint).unwrap();
        kids.push(kid);
    }
    app.flush_pending().unwrap();

    let layout = BorderLayout::with_gaps(2, 3);
    layout.do_layout(&mut app, panel).unwrap();
    let first: Vec<Rect> = kids.iter().map(|&k| bounds(&app, k)).collect();
    layout.do_layout(&mut app, panel).unwrap();
    let second: Vec<Rect> = kids.iter().map(|&k| bounds(&app, k)).collect();
    assert_eq!(first, second);
    assert_eq!(first[4], Rect::new(42, 18, 231, 169));
}

// ---------------------------------------------------------------------------
// Repaint scheduling and painting
// ---------------------------------------------------------------------------

#[test]
fn dirty_rect_is_bounding_box_clamped_to_canvas() {
    let mut pilot = Pilot::new(200, 200);
    let a = place(&mut pilot, "a", 10, 10, 20, 20);
    let b = place(&mut pilot, "b", 150, 120, 100, 100);
    pilot.flush();

    let canvas = pilot.canvas();
    let app = pilot.app_mut();
    app.repaint_rect(a, Rect::new(5, 5, 5, 5));
    assert_eq!(app.dirty_rect(canvas), Some(Rect::new(15, 15, 5, 5)));
    app.repaint(b);
    // b is clipped to the canvas before joining the box.
    assert_eq!(app.dirty_rect(canvas), Some(Rect::new(15, 15, 185, 185)));
    assert_eq!(pilot.flush(), 1);
    assert_eq!(pilot.app().dirty_rect(canvas), None);
}

#[test]
fn repaint_paints_intersecting_components_once() {
    let mut pilot = Pilot::new(200, 200);
    let painted = Rc::new(RefCell::new(Vec::new()));
    let mut ids = Vec::new();
    for (x, y) in [(0, 0), (15, 0), (100, 100)] {
        let p = Rc::clone(&painted);
        let id = pilot.app_mut().create(
            Component::new()
                .with_bounds(x, y, 20, 20)
                .on_update(move |_, _, id| {
                    p.borrow_mut().push(id);
                    Ok(())
                }),
        );
        let root = pilot.root();
        pilot.app_mut().add(root, id).unwrap();
        ids.push(id);
    }
    pilot.flush();
    painted.borrow_mut().clear();

    pilot.app_mut().repaint_rect(ids[0], Rect::new(10, 5, 8, 8));
    pilot.app_mut().repaint_rect(ids[0], Rect::new(16, 5, 2, 2));
    assert_eq!(pilot.flush(), 1);
    assert_eq!(*painted.borrow(), vec![ids[0], ids[1]]);
}

// ---------------------------------------------------------------------------
// Hit-testing and capture
// ---------------------------------------------------------------------------

#[test]
fn topmost_sibling_wins_hit_test() {
    let mut pilot = Pilot::new(100, 100);
    let _a = place(&mut pilot, "a", 0, 0, 50, 50);
    let b = place(&mut pilot, "b", 25, 25, 50, 50);
    assert_eq!(pilot.app().component_at(pilot.canvas(), 30, 30), Some(b));
    assert_eq!(pilot.app().pointer_target(pilot.canvas(), 30, 30), Some(b));
}

#[test]
fn composite_receives_press_aimed_at_child() {
    let mut pilot = Pilot::new(100, 100);
    let composite = pilot.app_mut().create(
        Component::named("composite")
            .with_bounds(10, 10, 60, 60)
            .with_catch_input(CatchInput::All),
    );
    let root = pilot.root();
    pilot.app_mut().add(root, composite).unwrap();
    let inner = pilot
        .app_mut()
        .create(Component::named("inner").with_bounds(5, 5, 10, 10));
    pilot.app_mut().add(composite, inner).unwrap();

    assert_eq!(pilot.app().component_at(pilot.canvas(), 20, 20), Some(inner));
    assert_eq!(pilot.app().event_destination(inner), Some(composite));

    let log = record(pilot.app_mut());
    pilot.press(20, 20);
    assert!(log.borrow().contains(&("pointerPressed", composite)));
    assert!(!log.borrow().iter().any(|&(_, src)| src == inner));
}

// ---------------------------------------------------------------------------
// Pointer routing
// ---------------------------------------------------------------------------

#[test]
fn exit_precedes_enter_exactly_once() {
    let mut pilot = Pilot::new(100, 100);
    let x = place(&mut pilot, "x", 0, 0, 20, 20);
    let y = place(&mut pilot, "y", 40, 0, 20, 20);
    pilot.move_to(5, 5);

    let log = record(pilot.app_mut());
    pilot.move_to(45, 5);
    let transitions: Vec<_> = log
        .borrow()
        .iter()
        .copied()
        .filter(|(name, _)| *name == "pointerExited" || *name == "pointerEntered")
        .collect();
    assert_eq!(transitions, vec![("pointerExited", x), ("pointerEntered", y)]);
}

#[test]
fn drag_suppresses_click() {
    let mut pilot = Pilot::new(100, 100);
    let target = place(&mut pilot, "target", 0, 0, 80, 80);

    let log = record(pilot.app_mut());
    pilot.drag((10, 10), (30, 30));
    assert!(!log.borrow().contains(&("pointerClicked", target)));

    log.borrow_mut().clear();
    pilot.click(10, 10);
    assert_eq!(
        log.borrow()
            .iter()
            .filter(|&&entry| entry == ("pointerClicked", target))
            .count(),
        1
    );
}

// ---------------------------------------------------------------------------
// Focus
// ---------------------------------------------------------------------------

#[test]
fn traversal_skips_disabled_and_wraps() {
    let mut pilot = Pilot::new(100, 100);
    let root = pilot.root();
    let app = pilot.app_mut();
    let a = app.create(Component::named("a").with_bounds(0, 0, 10, 10).focusable(true));
    let b = app.create(
        Component::named("b")
            .with_bounds(0, 10, 10, 10)
            .focusable(true)
            .enabled(false),
    );
    let c = app.create(Component::named("c").with_bounds(0, 20, 10, 10).focusable(true));
    for id in [a, b, c] {
        app.add(root, id).unwrap();
    }

    assert!(app.request_focus(Some(a)));
    assert!(app.focus_next());
    assert_eq!(app.focus_owner(), Some(c));
    assert!(app.focus_next());
    assert_eq!(app.focus_owner(), Some(a));
    assert!(!app.request_focus(Some(b)));
}

#[test]
fn hiding_ancestor_releases_focus_immediately() {
    let mut pilot = Pilot::new(100, 100);
    let panel = place(&mut pilot, "panel", 0, 0, 50, 50);
    let field = pilot
        .app_mut()
        .create(Component::named("field").with_bounds(5, 5, 10, 10).focusable(true));
    pilot.app_mut().add(panel, field).unwrap();
    assert!(pilot.app_mut().request_focus(Some(field)));

    let log = record(pilot.app_mut());
    pilot.app_mut().set_visible(panel, false).unwrap();
    assert_eq!(pilot.app().focus_owner(), None);
    assert!(log.borrow().contains(&("focusLost", field)));
}

// ---------------------------------------------------------------------------
// Structural events
// ---------------------------------------------------------------------------

#[test]
fn removal_listener_sees_child_still_attached() {
    let mut pilot = Pilot::new(100, 100);
    let parent = place(&mut pilot, "parent", 0, 0, 50, 50);
    let child = pilot.app_mut().create(Component::named("child"));
    pilot.app_mut().add(parent, child).unwrap();

    let seen = Rc::new(RefCell::new(None));
    let s = Rc::clone(&seen);
    pilot.app_mut().bind_kind(EventKind::CompRemoved, move |app, ev| {
        if let EventData::Removed { child, .. } = ev.data {
            *s.borrow_mut() = Some(app.tree().parent(child));
        }
        Propagation::Continue
    });

    pilot.app_mut().remove(parent, child).unwrap();
    assert_eq!(*seen.borrow(), Some(Some(parent)));
    assert_eq!(pilot.app().tree().parent(child), None);
}

// ---------------------------------------------------------------------------
// Keyboard and declarative properties
// ---------------------------------------------------------------------------

#[test]
fn tab_cycles_through_root_layer() {
    let mut pilot = Pilot::new(100, 100);
    let root = pilot.root();
    let first = pilot
        .app_mut()
        .create(Component::named("first").with_bounds(0, 0, 10, 10).focusable(true));
    let second = pilot
        .app_mut()
        .create(Component::named("second").with_bounds(0, 20, 10, 10).focusable(true));
    pilot.app_mut().add(root, first).unwrap();
    pilot.app_mut().add(root, second).unwrap();

    pilot.press_key(Key::Tab);
    assert_eq!(pilot.app().focus_owner(), Some(first));
    pilot.press_key(Key::Tab);
    assert_eq!(pilot.app().focus_owner(), Some(second));
    pilot.press_key_with(Key::Tab, Modifiers::SHIFT);
    assert_eq!(pilot.app().focus_owner(), Some(first));
}

#[test]
fn properties_apply_through_setters() {
    let mut pilot = Pilot::new(100, 100);
    let target = place(&mut pilot, "target", 0, 0, 10, 10);
    pilot.flush();

    let log = record(pilot.app_mut());
    pilot
        .app_mut()
        .set_properties(
            target,
            [("x", Property::Int(30)), ("height", Property::Int(25))],
        )
        .unwrap();
    assert_eq!(bounds(pilot.app(), target), Rect::new(30, 0, 10, 25));
    assert_eq!(
        *log.borrow(),
        vec![("compMoved", target), ("compSized", target)]
    );
    assert!(pilot.app().is_repaint_pending(pilot.canvas()));
}
