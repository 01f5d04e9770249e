//! View contract for borders, backgrounds and content decorators.
//!
//! The engine never interprets what a view draws. It only asks for the view's
//! insets, its preferred size, whether it is opaque, and whether it declares a
//! clip outline. [`Fill`] and [`LineBorder`] are minimal implementations.

use crate::error::Result;
use crate::geometry::{Insets, Size};
use crate::graphics::Graphics;
use crate::paint::PaintContext;
use crate::tree::ComponentId;

pub use crate::graphics::Color;

/// A decorator painted into a rectangle of its owning component.
pub trait View {
    fn paint(
        &self,
        g: &mut Graphics,
        x: i32,
        y: i32,
        width: i32,
        height: i32,
        ctx: &PaintContext<'_>,
        owner: ComponentId,
    ) -> Result<()>;

    fn preferred_size(&self) -> Size {
        Size::ZERO
    }

    /// Space the view occupies on each edge when used as a border.
    fn insets(&self) -> Insets {
        Insets::ZERO
    }

    /// Build a clip path for the owner's shape. Returns `true` when a path was
    /// built and should be used as a clip mask.
    fn outline(
        &self,
        _g: &mut Graphics,
        _x: i32,
        _y: i32,
        _width: i32,
        _height: i32,
        _owner: ComponentId,
    ) -> bool {
        false
    }

    /// Whether painting covers every pixel of the rectangle.
    fn is_opaque(&self) -> bool {
        false
    }
}

// ---------------------------------------------------------------------------
// Fill
// ---------------------------------------------------------------------------

/// Solid color background.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Fill {
    pub color: Color,
}

impl Fill {
    pub fn new(color: Color) -> Self {
        Self { color }
    }
}

impl View for Fill {
    fn paint(
        &self,
        g: &mut Graphics,
        x: i32,
        y: i32,
        width: i32,
        height: i32,
        _ctx: &PaintContext<'_>,
        _owner: ComponentId,
    ) -> Result<()> {
        g.set_color(self.color);
        g.fill_rect(x, y, width, height);
        Ok(())
    }

    fn is_opaque(&self) -> bool {
        self.color.is_opaque()
    }
}

// ---------------------------------------------------------------------------
// LineBorder
// ---------------------------------------------------------------------------

/// Rectangular stroke of a fixed width.
///
/// With `clips` set the border also acts as a clip mask for the owner's
/// background and update hook.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineBorder {
    pub color: Color,
    pub width: i32,
    pub clips: bool,
}

impl LineBorder {
    pub fn new(color: Color, width: i32) -> Self {
        Self { color, width: width.max(0), clips: false }
    }

    pub fn clipping(mut self) -> Self {
        self.clips = true;
        self
    }
}

impl View for LineBorder {
    fn paint(
        &self,
        g: &mut Graphics,
        x: i32,
        y: i32,
        width: i32,
        height: i32,
        _ctx: &PaintContext<'_>,
        _owner: ComponentId,
    ) -> Result<()> {
        if self.width == 0 {
            return Ok(());
        }
        g.set_stroke_color(self.color);
        g.set_line_width(self.width as f64);
        g.stroke_rect(x, y, width, height);
        Ok(())
    }

    fn insets(&self) -> Insets {
        Insets::all(self.width)
    }

    fn outline(
        &self,
        g: &mut Graphics,
        x: i32,
        y: i32,
        width: i32,
        height: i32,
        _owner: ComponentId,
    ) -> bool {
        if !self.clips {
            return false;
        }
        g.begin_path();
        g.rect(x, y, width, height);
        true
    }
}
