//! Recursive paint traversal.
//!
//! [`paint_component`] draws one component and its subtree onto a surface
//! already translated to the component's origin and clipped to its bounds.
//! Order per component: background, update hook, border, content, children
//! (bottom to top), on-top hook. Children outside the current clip are never
//! visited, so the cost of a repaint follows the dirty rectangle.

use std::rc::Rc;

use crate::error::Result;
use crate::graphics::Graphics;
use crate::tree::{ComponentId, Tree};
use crate::view::View;

/// Read-only state available to views and paint hooks.
pub struct PaintContext<'a> {
    pub tree: &'a Tree,
    pub focus_owner: Option<ComponentId>,
}

impl PaintContext<'_> {
    pub fn has_focus(&self, id: ComponentId) -> bool {
        self.focus_owner == Some(id)
    }
}

/// Background differs from the parent's (absent parent background counts as
/// different). Identical view objects are not painted twice.
fn has_own_background(tree: &Tree, id: ComponentId) -> bool {
    let Some(bg) = tree.get(id).and_then(|n| n.background()) else {
        return false;
    };
    let parent_bg = tree.parent(id).and_then(|p| tree.get(p)).and_then(|p| p.background());
    !parent_bg.is_some_and(|p| Rc::ptr_eq(p, bg))
}

pub fn paint_component(g: &mut Graphics, ctx: &PaintContext<'_>, id: ComponentId) -> Result<()> {
    let Some(node) = ctx.tree.get(id) else {
        return Ok(());
    };
    if !node.is_visible() || g.clip_bounds().is_empty() {
        return Ok(());
    }
    let (w, h) = (node.width(), node.height());
    let own_bg = has_own_background(ctx.tree, id);
    let update = node.hooks.update.clone();

    let outlined = match node.border() {
        Some(border) if own_bg || update.is_some() => {
            let mut s = g.save();
            if border.outline(&mut s, 0, 0, w, h, id) {
                s.clip();
                paint_background(&mut s, ctx, id, own_bg, update.as_ref())?;
                true
            } else {
                false
            }
        }
        _ => false,
    };
    if !outlined {
        paint_background(g, ctx, id, own_bg, update.as_ref())?;
    }

    if let Some(border) = node.border() {
        border.paint(g, 0, 0, w, h, ctx, id)?;
    }

    paint_content(g, ctx, id)?;
    paint_children(g, ctx, id)?;

    if let Some(on_top) = &node.hooks.paint_on_top {
        on_top(g, ctx, id)?;
    }
    Ok(())
}

fn paint_background(
    g: &mut Graphics,
    ctx: &PaintContext<'_>,
    id: ComponentId,
    own_bg: bool,
    update: Option<&crate::tree::PaintHook>,
) -> Result<()> {
    let Some(node) = ctx.tree.get(id) else {
        return Ok(());
    };
    if own_bg {
        if let Some(bg) = node.background() {
            bg.paint(g, 0, 0, node.width(), node.height(), ctx, id)?;
        }
    }
    if let Some(update) = update {
        update(g, ctx, id)?;
    }
    Ok(())
}

/// Paint hook if present, otherwise the content view inside the insets.
fn paint_content(g: &mut Graphics, ctx: &PaintContext<'_>, id: ComponentId) -> Result<()> {
    let Some(node) = ctx.tree.get(id) else {
        return Ok(());
    };
    let paint = node.hooks.paint.clone();
    let view: Option<Rc<dyn View>> = node.view().cloned();
    if paint.is_none() && view.is_none() {
        return Ok(());
    }
    let insets = node.insets();
    let (w, h) = (node.width(), node.height());
    let (cw, ch) = (w - insets.horizontal(), h - insets.vertical());

    let draw = |g: &mut Graphics| -> Result<()> {
        match (&paint, &view) {
            (Some(paint), _) => paint(g, ctx, id),
            (None, Some(view)) => view.paint(g, insets.left, insets.top, cw, ch, ctx, id),
            (None, None) => Ok(()),
        }
    };

    if insets.is_zero() {
        draw(g)
    } else {
        let mut s = g.save();
        s.clip_rect(insets.left, insets.top, cw, ch);
        draw(&mut *s)
    }
}

fn paint_children(g: &mut Graphics, ctx: &PaintContext<'_>, id: ComponentId) -> Result<()> {
    for &child in ctx.tree.children(id) {
        let Some(kid) = ctx.tree.get(child) else { continue };
        // Embedded canvases run their own paint cycle.
        if !kid.is_visible() || kid.is_canvas() {
            continue;
        }
        let bounds = kid.bounds();
        if !bounds.intersects(g.clip_bounds()) {
            continue;
        }
        let mut s = g.save();
        s.translate(bounds.x, bounds.y);
        s.clip_rect(0, 0, bounds.width, bounds.height);
        paint_component(&mut s, ctx, child)?;
    }
    Ok(())
}
