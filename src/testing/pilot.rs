//! Pilot: programmatic interaction with a headless App.
//!
//! The `Pilot` owns an [`App`] with one canvas drawing onto a
//! [`RecordingSurface`] and a `"root"` layer, and provides methods to
//! simulate pointer and keyboard input, run queued repaint tasks, and render
//! the recorded draw calls to text for snapshot testing.

use crate::app::{App, AppConfig};
use crate::event::{Key, KeyAction, Modifiers, PointerAction, RawInput, RawPointer};
use crate::tree::ComponentId;

use super::snapshot::ops_to_string;
use super::surface::RecordingSurface;

// ---------------------------------------------------------------------------
// Pilot
// ---------------------------------------------------------------------------

/// A headless app driver for testing.
///
/// # Examples
///
/// ```
/// use canvas_kit::testing::Pilot;
/// use canvas_kit::tree::Component;
///
/// let mut pilot = Pilot::new(80, 24);
/// let button = pilot.app_mut().create(Component::named("ok").with_bounds(0, 0, 10, 3));
/// let root = pilot.root();
/// pilot.app_mut().add(root, button).unwrap();
/// pilot.click(2, 1);
/// pilot.flush();
/// ```
pub struct Pilot {
    app: App,
    canvas: ComponentId,
    root: ComponentId,
    surface: RecordingSurface,
}

impl Pilot {
    /// Create a headless app with a canvas of the given size.
    pub fn new(width: i32, height: i32) -> Self {
        Self::with_config(AppConfig::default(), width, height)
    }

    /// Create a Pilot from an [`AppConfig`].
    pub fn with_config(config: AppConfig, width: i32, height: i32) -> Self {
        let surface = RecordingSurface::new();
        let mut app = App::new(config);
        let canvas = app.create_canvas(surface.clone(), width, height);
        // Children of the root layer keep the bounds they are given.
        let root = match app.add_layer(canvas, "root", None) {
            Ok(root) => {
                if let Err(err) = app.set_layout(root, None) {
                    log::warn!("pilot: clearing root layout failed: {err}");
                }
                root
            }
            Err(err) => {
                log::warn!("pilot: adding root layer failed: {err}");
                canvas
            }
        };
        let mut pilot = Self { app, canvas, root, surface };
        pilot.flush();
        // Recordings start after the first full paint.
        pilot.surface.clear();
        pilot
    }

    // ── Pointer simulation ───────────────────────────────────────────

    fn send(&mut self, input: RawInput) {
        if let Err(err) = self.app.handle_input(self.canvas, input) {
            log::warn!("pilot: input rejected: {err}");
        }
    }

    fn pointer(&mut self, action: PointerAction, x: i32, y: i32) {
        self.send(RawInput::Pointer(RawPointer::mouse(action, x as f64, y as f64)));
    }

    /// Press the primary button at (x, y).
    pub fn press(&mut self, x: i32, y: i32) {
        self.pointer(PointerAction::Down, x, y);
    }

    pub fn release(&mut self, x: i32, y: i32) {
        self.pointer(PointerAction::Up, x, y);
    }

    pub fn move_to(&mut self, x: i32, y: i32) {
        self.pointer(PointerAction::Move, x, y);
    }

    /// Move the mouse off the canvas.
    pub fn leave(&mut self) {
        self.pointer(PointerAction::Leave, 0, 0);
    }

    /// Press and release at (x, y) without moving.
    pub fn click(&mut self, x: i32, y: i32) {
        self.press(x, y);
        self.release(x, y);
    }

    /// Press at `from`, move to `to`, release there.
    pub fn drag(&mut self, from: (i32, i32), to: (i32, i32)) {
        self.press(from.0, from.1);
        self.move_to(to.0, to.1);
        self.release(to.0, to.1);
    }

    // ── Keyboard simulation ──────────────────────────────────────────

    /// Simulate a key press with no modifiers.
    pub fn press_key(&mut self, key: Key) {
        self.press_key_with(key, Modifiers::NONE);
    }

    /// Simulate a key press with the given modifiers.
    pub fn press_key_with(&mut self, key: Key, modifiers: Modifiers) {
        self.send(RawInput::key(KeyAction::Pressed, key, modifiers));
    }

    pub fn release_key(&mut self, key: Key) {
        self.send(RawInput::key(KeyAction::Released, key, Modifiers::NONE));
    }

    /// Send one `Typed` key per character of `text`.
    pub fn type_text(&mut self, text: &str) {
        for ch in text.chars() {
            self.send(RawInput::key(KeyAction::Typed, Key::Char(ch), Modifiers::NONE));
        }
    }

    // ── Processing ───────────────────────────────────────────────────

    /// Run every queued repaint task. Returns how many ran.
    pub fn flush(&mut self) -> usize {
        match self.app.flush_pending() {
            Ok(ran) => ran,
            Err(err) => {
                log::warn!("pilot: repaint failed: {err}");
                0
            }
        }
    }

    // ── Query ────────────────────────────────────────────────────────

    pub fn app(&self) -> &App {
        &self.app
    }

    pub fn app_mut(&mut self) -> &mut App {
        &mut self.app
    }

    pub fn canvas(&self) -> ComponentId {
        self.canvas
    }

    /// The `"root"` layer.
    pub fn root(&self) -> ComponentId {
        self.root
    }

    pub fn surface(&self) -> &RecordingSurface {
        &self.surface
    }

    /// Recorded draw calls as indented text, then clear the recording.
    pub fn take_ops_text(&mut self) -> String {
        let text = ops_to_string(&self.surface.ops(), false);
        self.surface.clear();
        text
    }
}

// ===========================================================================
// Tests
// ===========================================================================
