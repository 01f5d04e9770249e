//! Drawing surface abstraction and the tracked graphics state stack.
//!
//! A host provides a [`Surface`] (a 2D context with save/restore, transforms,
//! path clipping and rectangle fills). The 2D context cannot be queried for its
//! transform or clip, so [`Graphics`] mirrors both in its own state stack.
//! [`Graphics::save`] hands out a [`SavedState`] guard that unwinds the stack
//! back to its depth when dropped, including on early returns through `?`.

use std::ops::{Deref, DerefMut};

use crate::geometry::Rect;

// ---------------------------------------------------------------------------
// Color
// ---------------------------------------------------------------------------

/// An RGBA color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const WHITE: Color = Color::rgb(255, 255, 255);
    pub const TRANSPARENT: Color = Color::rgba(0, 0, 0, 0);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn is_opaque(self) -> bool {
        self.a == 255
    }
}

// ---------------------------------------------------------------------------
// Surface
// ---------------------------------------------------------------------------

/// A host 2D drawing context.
///
/// `save`/`restore` nest like a stack. `clip` intersects the current clip with
/// the current path.
pub trait Surface {
    fn save(&mut self);
    fn restore(&mut self);
    fn translate(&mut self, dx: f64, dy: f64);
    fn scale(&mut self, sx: f64, sy: f64);
    fn rotate(&mut self, radians: f64);
    fn begin_path(&mut self);
    fn rect(&mut self, x: i32, y: i32, width: i32, height: i32);
    fn clip(&mut self);
    fn fill(&mut self);
    fn stroke(&mut self);
    fn set_fill_color(&mut self, color: Color);
    fn set_stroke_color(&mut self, color: Color);
    fn set_line_width(&mut self, width: f64);
    fn fill_rect(&mut self, x: i32, y: i32, width: i32, height: i32);
    fn stroke_rect(&mut self, x: i32, y: i32, width: i32, height: i32);
    fn clear_rect(&mut self, x: i32, y: i32, width: i32, height: i32);
}

// ---------------------------------------------------------------------------
// Transform
// ---------------------------------------------------------------------------

/// A 2D affine transform `[a c e; b d f]` mapping local to device space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub d: f64,
    pub e: f64,
    pub f: f64,
}

impl Transform {
    pub const IDENTITY: Transform = Transform { a: 1.0, b: 0.0, c: 0.0, d: 1.0, e: 0.0, f: 0.0 };

    pub fn translated(self, dx: f64, dy: f64) -> Self {
        Transform {
            e: self.e + self.a * dx + self.c * dy,
            f: self.f + self.b * dx + self.d * dy,
            ..self
        }
    }

    pub fn scaled(self, sx: f64, sy: f64) -> Self {
        Transform {
            a: self.a * sx,
            b: self.b * sx,
            c: self.c * sy,
            d: self.d * sy,
            ..self
        }
    }

    pub fn rotated(self, radians: f64) -> Self {
        let (sin, cos) = radians.sin_cos();
        Transform {
            a: self.a * cos + self.c * sin,
            b: self.b * cos + self.d * sin,
            c: self.c * cos - self.a * sin,
            d: self.d * cos - self.b * sin,
            ..self
        }
    }

    /// Map a local point to device space.
    pub fn apply(&self, x: f64, y: f64) -> (f64, f64) {
        (self.a * x + self.c * y + self.e, self.b * x + self.d * y + self.f)
    }

    /// Map a device point back to local space. `None` for a degenerate transform.
    pub fn invert_apply(&self, x: f64, y: f64) -> Option<(f64, f64)> {
        let det = self.a * self.d - self.b * self.c;
        if det.abs() < f64::EPSILON {
            return None;
        }
        let x = x - self.e;
        let y = y - self.f;
        Some(((self.d * x - self.c * y) / det, (self.a * y - self.b * x) / det))
    }

    fn is_translation(&self) -> bool {
        self.a == 1.0 && self.b == 0.0 && self.c == 0.0 && self.d == 1.0
    }
}

/// Bounding box of four points, rounded outward.
fn bounding_box(points: [(f64, f64); 4]) -> Rect {
    let (mut x0, mut y0) = (f64::MAX, f64::MAX);
    let (mut x1, mut y1) = (f64::MIN, f64::MIN);
    for (x, y) in points {
        x0 = x0.min(x);
        y0 = y0.min(y);
        x1 = x1.max(x);
        y1 = y1.max(y);
    }
    let (x0, y0) = (x0.floor() as i32, y0.floor() as i32);
    Rect::new(x0, y0, x1.ceil() as i32 - x0, y1.ceil() as i32 - y0)
}

fn corners(r: Rect) -> [(f64, f64); 4] {
    let (x0, y0) = (r.x as f64, r.y as f64);
    let (x1, y1) = (r.right() as f64, r.bottom() as f64);
    [(x0, y0), (x1, y0), (x0, y1), (x1, y1)]
}

// ---------------------------------------------------------------------------
// Graphics
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy)]
struct State {
    transform: Transform,
    /// Clip in device space.
    clip: Rect,
}

/// A [`Surface`] plus a mirrored stack of transform and clip states.
///
/// The bottom state is the canvas base state: transforms applied while no
/// [`SavedState`] is alive persist across repaints.
pub struct Graphics {
    surface: Box<dyn Surface>,
    stack: Vec<State>,
    path: Option<Rect>,
    width: i32,
    height: i32,
}

impl Graphics {
    pub fn new(surface: Box<dyn Surface>, width: i32, height: i32) -> Self {
        Self {
            surface,
            stack: vec![State {
                transform: Transform::IDENTITY,
                clip: Rect::new(0, 0, width.max(0), height.max(0)),
            }],
            path: None,
            width: width.max(0),
            height: height.max(0),
        }
    }

    fn top(&self) -> &State {
        // The base state is never popped.
        &self.stack[self.stack.len() - 1]
    }

    fn top_mut(&mut self) -> &mut State {
        let last = self.stack.len() - 1;
        &mut self.stack[last]
    }

    /// Resize the device area. Updates the base clip.
    pub fn reset_size(&mut self, width: i32, height: i32) {
        self.width = width.max(0);
        self.height = height.max(0);
        self.stack[0].clip = Rect::new(0, 0, self.width, self.height);
    }

    /// Number of states on the stack, base state included.
    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    pub fn transform(&self) -> Transform {
        self.top().transform
    }

    /// Current clip in device space.
    pub fn device_clip(&self) -> Rect {
        self.top().clip
    }

    /// Current clip in local coordinates.
    ///
    /// Exact under translation; under rotation or scaling it is the bounding
    /// box of the device clip mapped back to local space.
    pub fn clip_bounds(&self) -> Rect {
        let state = self.top();
        if state.clip.is_empty() {
            return Rect::EMPTY;
        }
        if state.transform.is_translation() {
            return state.clip.translate(-state.transform.e as i32, -state.transform.f as i32);
        }
        let mut points = corners(state.clip);
        for p in points.iter_mut() {
            match state.transform.invert_apply(p.0, p.1) {
                Some(local) => *p = local,
                None => return Rect::EMPTY,
            }
        }
        bounding_box(points)
    }

    /// Map a device point into the current local space.
    pub fn to_local(&self, x: f64, y: f64) -> Option<(f64, f64)> {
        self.top().transform.invert_apply(x, y)
    }

    fn to_device(&self, r: Rect) -> Rect {
        let t = self.top().transform;
        if t.is_translation() {
            return r.translate(t.e as i32, t.f as i32);
        }
        let mut points = corners(r);
        for p in points.iter_mut() {
            *p = t.apply(p.0, p.1);
        }
        bounding_box(points)
    }

    // ── State stack ──────────────────────────────────────────────────

    /// Push a state. The returned guard restores it (and anything pushed
    /// through it) when dropped.
    pub fn save(&mut self) -> SavedState<'_> {
        let depth = self.stack.len();
        let top = *self.top();
        self.stack.push(top);
        self.surface.save();
        SavedState { graphics: self, depth }
    }

    /// Pop states until the stack holds `depth` entries. The base state stays.
    pub fn restore_to(&mut self, depth: usize) {
        let depth = depth.max(1);
        while self.stack.len() > depth {
            self.stack.pop();
            self.surface.restore();
        }
    }

    // ── Transforms ───────────────────────────────────────────────────

    pub fn translate(&mut self, dx: i32, dy: i32) {
        if dx == 0 && dy == 0 {
            return;
        }
        let state = self.top_mut();
        state.transform = state.transform.translated(dx as f64, dy as f64);
        self.surface.translate(dx as f64, dy as f64);
    }

    pub fn scale(&mut self, sx: f64, sy: f64) {
        let state = self.top_mut();
        state.transform = state.transform.scaled(sx, sy);
        self.surface.scale(sx, sy);
    }

    pub fn rotate(&mut self, radians: f64) {
        let state = self.top_mut();
        state.transform = state.transform.rotated(radians);
        self.surface.rotate(radians);
    }

    // ── Clipping and paths ───────────────────────────────────────────

    pub fn begin_path(&mut self) {
        self.path = None;
        self.surface.begin_path();
    }

    pub fn rect(&mut self, x: i32, y: i32, width: i32, height: i32) {
        let r = Rect::new(x, y, width, height);
        self.path = Some(self.path.map_or(r, |p| p.union(r)));
        self.surface.rect(x, y, width, height);
    }

    /// Intersect the clip with the current path.
    pub fn clip(&mut self) {
        let bounds = self.path.map_or(Rect::EMPTY, |p| self.to_device(p));
        let state = self.top_mut();
        state.clip = state.clip.intersection(bounds);
        self.surface.clip();
    }

    /// Intersect the clip with a local rectangle.
    pub fn clip_rect(&mut self, x: i32, y: i32, width: i32, height: i32) {
        self.begin_path();
        self.rect(x, y, width, height);
        self.clip();
    }

    // ── Drawing ──────────────────────────────────────────────────────

    pub fn fill(&mut self) {
        self.surface.fill();
    }

    pub fn stroke(&mut self) {
        self.surface.stroke();
    }

    pub fn set_color(&mut self, color: Color) {
        self.surface.set_fill_color(color);
    }

    pub fn set_stroke_color(&mut self, color: Color) {
        self.surface.set_stroke_color(color);
    }

    pub fn set_line_width(&mut self, width: f64) {
        self.surface.set_line_width(width);
    }

    pub fn fill_rect(&mut self, x: i32, y: i32, width: i32, height: i32) {
        self.surface.fill_rect(x, y, width, height);
    }

    pub fn stroke_rect(&mut self, x: i32, y: i32, width: i32, height: i32) {
        self.surface.stroke_rect(x, y, width, height);
    }

    pub fn clear_rect(&mut self, x: i32, y: i32, width: i32, height: i32) {
        self.surface.clear_rect(x, y, width, height);
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }
}

// ---------------------------------------------------------------------------
// SavedState
// ---------------------------------------------------------------------------

/// Scoped graphics state. Dereferences to [`Graphics`]; dropping it restores
/// every state pushed since it was created.
pub struct SavedState<'a> {
    graphics: &'a mut Graphics,
    depth: usize,
}

impl Deref for SavedState<'_> {
    type Target = Graphics;

    fn deref(&self) -> &Graphics {
        self.graphics
    }
}

impl DerefMut for SavedState<'_> {
    fn deref_mut(&mut self) -> &mut Graphics {
        self.graphics
    }
}

impl Drop for SavedState<'_> {
    fn drop(&mut self) {
        self.graphics.restore_to(self.depth);
    }
}
