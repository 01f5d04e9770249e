//! BorderLayout: top, bottom, left, right and center regions.
//!
//! Top and bottom children get their preferred height and the full width.
//! Left and right children get their preferred width and the height left
//! between top and bottom. The center child takes whatever remains. A child
//! without a constraint goes to the center; when two children claim the same
//! region the later one wins.

use super::{content_area, visible_children, Constraint, Layout};
use crate::app::App;
use crate::error::Result;
use crate::geometry::Size;
use crate::tree::ComponentId;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BorderLayout {
    pub hgap: i32,
    pub vgap: i32,
}

#[derive(Default)]
struct Regions {
    top: Option<ComponentId>,
    bottom: Option<ComponentId>,
    left: Option<ComponentId>,
    right: Option<ComponentId>,
    center: Option<ComponentId>,
}

impl BorderLayout {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_gaps(hgap: i32, vgap: i32) -> Self {
        Self { hgap, vgap }
    }

    fn regions(app: &App, target: ComponentId) -> Regions {
        let mut regions = Regions::default();
        for child in visible_children(app, target) {
            let constraint = app.tree().get(child).and_then(|n| n.constraint().copied());
            let slot = match constraint {
                Some(Constraint::Top) => &mut regions.top,
                Some(Constraint::Bottom) => &mut regions.bottom,
                Some(Constraint::Left) => &mut regions.left,
                Some(Constraint::Right) => &mut regions.right,
                _ => &mut regions.center,
            };
            *slot = Some(child);
        }
        regions
    }
}

impl Layout for BorderLayout {
    fn calc_preferred_size(&self, app: &mut App, target: ComponentId) -> Size {
        let r = Self::regions(app, target);
        let mut ps = |c: Option<ComponentId>| c.map(|c| app.preferred_size(c));
        let (top, bottom) = (ps(r.top), ps(r.bottom));
        let (left, right, center) = (ps(r.left), ps(r.right), ps(r.center));

        let middle: Vec<Size> = [left, center, right].into_iter().flatten().collect();
        let mut middle_width: i32 = middle.iter().map(|s| s.width).sum();
        if !middle.is_empty() {
            middle_width += self.hgap * (middle.len() as i32 - 1);
        }
        let middle_height = middle.iter().map(|s| s.height).max().unwrap_or(0);

        let width = [top, bottom]
            .into_iter()
            .flatten()
            .map(|s| s.width)
            .fold(middle_width, i32::max);

        let stacked: Vec<i32> = [top.map(|s| s.height), (!middle.is_empty()).then_some(middle_height), bottom.map(|s| s.height)]
            .into_iter()
            .flatten()
            .collect();
        let mut height: i32 = stacked.iter().sum();
        if !stacked.is_empty() {
            height += self.vgap * (stacked.len() as i32 - 1);
        }
        Size::new(width, height)
    }

    fn do_layout(&self, app: &mut App, target: ComponentId) -> Result<()> {
        let area = content_area(app, target);
        let r = Self::regions(app, target);
        let (mut left, mut right) = (area.x, area.right());
        let (mut top, mut bottom) = (area.y, area.bottom());

        if let Some(c) = r.top {
            let ps = app.preferred_size(c);
            app.set_bounds(c, left, top, right - left, ps.height)?;
            top += ps.height + self.vgap;
        }
        if let Some(c) = r.bottom {
            let ps = app.preferred_size(c);
            app.set_bounds(c, left, bottom - ps.height, right - left, ps.height)?;
            bottom -= ps.height + self.vgap;
        }
        if let Some(c) = r.right {
            let ps = app.preferred_size(c);
            app.set_bounds(c, right - ps.width, top, ps.width, bottom - top)?;
            right -= ps.width + self.hgap;
        }
        if let Some(c) = r.left {
            let ps = app.preferred_size(c);
            app.set_bounds(c, left, top, ps.width, bottom - top)?;
            left += ps.width + self.hgap;
        }
        if let Some(c) = r.center {
            app.set_bounds(c, left, top, right - left, bottom - top)?;
        }
        Ok(())
    }

    fn check_constraint(&self, constraint: Option<&Constraint>) -> Result<()> {
        match constraint {
            Some(c @ Constraint::Grow(_)) => Err(self.invalid(c)),
            _ => Ok(()),
        }
    }

    fn name(&self) -> &'static str {
        "BorderLayout"
    }
}
