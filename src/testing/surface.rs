//! RecordingSurface: a [`Surface`] that logs every call.
//!
//! Clones share one recording, so a test can hand a clone to the
//! [`Graphics`](crate::graphics::Graphics) and keep the other for assertions.

use std::cell::RefCell;
use std::rc::Rc;

use crate::graphics::{Color, Surface};

/// One recorded surface call.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    Save,
    Restore,
    Translate(f64, f64),
    Scale(f64, f64),
    Rotate(f64),
    BeginPath,
    Rect(i32, i32, i32, i32),
    Clip,
    Fill,
    Stroke,
    FillColor(Color),
    StrokeColor(Color),
    LineWidth(f64),
    FillRect(i32, i32, i32, i32),
    StrokeRect(i32, i32, i32, i32),
    ClearRect(i32, i32, i32, i32),
}

#[derive(Debug, Default)]
struct Recording {
    ops: Vec<DrawOp>,
    depth: usize,
}

#[derive(Debug, Clone, Default)]
pub struct RecordingSurface {
    inner: Rc<RefCell<Recording>>,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the calls recorded so far.
    pub fn ops(&self) -> Vec<DrawOp> {
        self.inner.borrow().ops.clone()
    }

    /// Unbalanced `save` calls.
    pub fn save_depth(&self) -> usize {
        self.inner.borrow().depth
    }

    pub fn clear(&self) {
        self.inner.borrow_mut().ops.clear();
    }

    fn push(&self, op: DrawOp) {
        self.inner.borrow_mut().ops.push(op);
    }
}

impl Surface for RecordingSurface {
    fn save(&mut self) {
        let mut rec = self.inner.borrow_mut();
        rec.depth += 1;
        rec.ops.push(DrawOp::Save);
    }

    fn restore(&mut self) {
        let mut rec = self.inner.borrow_mut();
        rec.depth = rec.depth.saturating_sub(1);
        rec.ops.push(DrawOp::Restore);
    }

    fn translate(&mut self, dx: f64, dy: f64) {
        self.push(DrawOp::Translate(dx, dy));
    }

    fn scale(&mut self, sx: f64, sy: f64) {
        self.push(DrawOp::Scale(sx, sy));
    }

    fn rotate(&mut self, radians: f64) {
        self.push(DrawOp::Rotate(radians));
    }

    fn begin_path(&mut self) {
        self.push(DrawOp::BeginPath);
    }

    fn rect(&mut self, x: i32, y: i32, width: i32, height: i32) {
        self.push(DrawOp::Rect(x, y, width, height));
    }

    fn clip(&mut self) {
        self.push(DrawOp::Clip);
    }

    fn fill(&mut self) {
        self.push(DrawOp::Fill);
    }

    fn stroke(&mut self) {
        self.push(DrawOp::Stroke);
    }

    fn set_fill_color(&mut self, color: Color) {
        self.push(DrawOp::FillColor(color));
    }

    fn set_stroke_color(&mut self, color: Color) {
        self.push(DrawOp::StrokeColor(color));
    }

    fn set_line_width(&mut self, width: f64) {
        self.push(DrawOp::LineWidth(width));
    }

    fn fill_rect(&mut self, x: i32, y: i32, width: i32, height: i32) {
        self.push(DrawOp::FillRect(x, y, width, height));
    }

    fn stroke_rect(&mut self, x: i32, y: i32, width: i32, height: i32) {
        self.push(DrawOp::StrokeRect(x, y, width, height));
    }

    fn clear_rect(&mut self, x: i32, y: i32, width: i32, height: i32) {
        self.push(DrawOp::ClearRect(x, y, width, height));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clones_share_the_recording() {
        let surface = RecordingSurface::new();
        let mut other = surface.clone();
        other.save();
        other.fill_rect(1, 2, 3, 4);
        assert_eq!(surface.ops(), vec![DrawOp::Save, DrawOp::FillRect(1, 2, 3, 4)]);
        assert_eq!(surface.save_depth(), 1);
        other.restore();
        other.restore();
        assert_eq!(surface.save_depth(), 0);
        surface.clear();
        assert!(surface.ops().is_empty());
    }
}
