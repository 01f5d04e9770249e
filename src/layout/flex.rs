//! FlexLayout: a single row or column, positioned by taffy.
//!
//! Each visible child becomes a taffy leaf sized to its preferred size, with a
//! grow factor taken from its [`Constraint::Grow`]. Children stretch across the
//! cross axis. The taffy tree is rebuilt on every pass; the component tree is
//! the only persistent state.

use taffy::prelude::*;

use super::{content_area, visible_children, Constraint, Layout};
use crate::app::App;
use crate::error::{Error, Result};
use crate::geometry::Size as PxSize;
use crate::tree::ComponentId;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FlexDirection {
    #[default]
    Row,
    Column,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FlexLayout {
    pub direction: FlexDirection,
    pub gap: i32,
}

impl FlexLayout {
    pub fn row(gap: i32) -> Self {
        Self { direction: FlexDirection::Row, gap }
    }

    pub fn column(gap: i32) -> Self {
        Self { direction: FlexDirection::Column, gap }
    }

    fn grow_of(app: &App, child: ComponentId) -> f32 {
        match app.tree().get(child).and_then(|n| n.constraint().copied()) {
            Some(Constraint::Grow(g)) => g,
            _ => 0.0,
        }
    }

    fn container_style(&self, width: i32, height: i32) -> Style {
        let direction = match self.direction {
            FlexDirection::Row => taffy::style::FlexDirection::Row,
            FlexDirection::Column => taffy::style::FlexDirection::Column,
        };
        let gap = LengthPercentage::from_length(self.gap as f32);
        Style {
            display: Display::Flex,
            flex_direction: direction,
            gap: taffy::geometry::Size { width: gap, height: gap },
            size: taffy::geometry::Size {
                width: Dimension::from_length(width as f32),
                height: Dimension::from_length(height as f32),
            },
            ..Default::default()
        }
    }

    fn child_style(&self, ps: PxSize, grow: f32) -> Style {
        let (width, height) = match self.direction {
            FlexDirection::Row => (Dimension::from_length(ps.width as f32), Dimension::AUTO),
            FlexDirection::Column => (Dimension::AUTO, Dimension::from_length(ps.height as f32)),
        };
        Style {
            size: taffy::geometry::Size { width, height },
            flex_grow: grow,
            flex_shrink: 1.0,
            ..Default::default()
        }
    }
}

impl Layout for FlexLayout {
    fn calc_preferred_size(&self, app: &mut App, target: ComponentId) -> PxSize {
        let kids = visible_children(app, target);
        let gaps = self.gap * (kids.len() as i32 - 1).max(0);
        let sizes: Vec<PxSize> = kids.into_iter().map(|c| app.preferred_size(c)).collect();
        let (main, cross) = match self.direction {
            FlexDirection::Row => (
                sizes.iter().map(|s| s.width).sum::<i32>(),
                sizes.iter().map(|s| s.height).max().unwrap_or(0),
            ),
            FlexDirection::Column => (
                sizes.iter().map(|s| s.height).sum::<i32>(),
                sizes.iter().map(|s| s.width).max().unwrap_or(0),
            ),
        };
        match self.direction {
            FlexDirection::Row => PxSize::new(main + gaps, cross),
            FlexDirection::Column => PxSize::new(cross, main + gaps),
        }
    }

    fn do_layout(&self, app: &mut App, target: ComponentId) -> Result<()> {
        let area = content_area(app, target);
        let kids = visible_children(app, target);
        if kids.is_empty() {
            return Ok(());
        }

        let mut taffy: TaffyTree<()> = TaffyTree::new();
        let mut leaves = Vec::with_capacity(kids.len());
        for &child in &kids {
            let ps = app.preferred_size(child);
            let style = self.child_style(ps, Self::grow_of(app, child));
            leaves.push(taffy.new_leaf(style).map_err(layout_error)?);
        }
        let root = taffy
            .new_with_children(self.container_style(area.width, area.height), &leaves)
            .map_err(layout_error)?;
        taffy
            .compute_layout(
                root,
                taffy::geometry::Size {
                    width: AvailableSpace::Definite(area.width as f32),
                    height: AvailableSpace::Definite(area.height as f32),
                },
            )
            .map_err(layout_error)?;

        for (&child, &leaf) in kids.iter().zip(&leaves) {
            let l = taffy.layout(leaf).map_err(layout_error)?;
            app.set_bounds(
                child,
                area.x + l.location.x.round() as i32,
                area.y + l.location.y.round() as i32,
                l.size.width.round() as i32,
                l.size.height.round() as i32,
            )?;
        }
        Ok(())
    }

    fn check_constraint(&self, constraint: Option<&Constraint>) -> Result<()> {
        match constraint {
            None => Ok(()),
            Some(Constraint::Grow(g)) if *g >= 0.0 && g.is_finite() => Ok(()),
            Some(c) => Err(self.invalid(c)),
        }
    }

    fn name(&self) -> &'static str {
        "FlexLayout"
    }
}

fn layout_error(err: taffy::TaffyError) -> Error {
    log::warn!("flex layout failed: {err}");
    Error::Layout(err.to_string())
}
