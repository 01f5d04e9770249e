//! Dirty-region repaint scheduling.
//!
//! Invalidations are clipped through every ancestor into canvas space and
//! unioned into the canvas's single dirty rectangle. The first invalidation
//! after a paint pass queues the canvas on a tokio channel; later ones only
//! grow the rectangle. The host drains the queue with
//! [`App::flush_pending`] or [`App::flush_next`], and each queued canvas is
//! validated and painted once, clipped to its dirty rectangle.

use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

use crate::app::App;
use crate::error::Result;
use crate::geometry::Rect;
use crate::paint::{paint_component, PaintContext};
use crate::tree::ComponentId;

/// Queue of canvases waiting for a paint pass.
pub struct RepaintScheduler {
    tx: UnboundedSender<ComponentId>,
    rx: UnboundedReceiver<ComponentId>,
}

impl RepaintScheduler {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self { tx, rx }
    }

    fn schedule(&self, canvas: ComponentId) {
        if self.tx.send(canvas).is_err() {
            log::warn!("repaint queue closed, dropping task for {canvas:?}");
        }
    }
}

impl Default for RepaintScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl App {
    /// Repaint the whole of `id`.
    pub fn repaint(&mut self, id: ComponentId) {
        let Some(size) = self.tree.get(id).map(|n| n.size()) else {
            return;
        };
        self.repaint_rect(id, Rect::from_size(size));
    }

    /// Mark `rect` (in `id`'s coordinates) dirty on the owning canvas.
    ///
    /// No-op when `id` is unknown, has no canvas, or it or any ancestor up to
    /// the canvas is hidden.
    pub fn repaint_rect(&mut self, id: ComponentId, rect: Rect) {
        let Some(canvas) = self.tree.canvas_of(id) else {
            return;
        };
        let mut dirty = rect;
        let mut current = id;
        loop {
            let Some(node) = self.tree.get(current) else {
                return;
            };
            if !node.is_visible() {
                return;
            }
            dirty = dirty.intersection(Rect::from_size(node.size()));
            if current == canvas {
                break;
            }
            dirty = dirty.translate(node.x(), node.y());
            match self.tree.parent(current) {
                Some(parent) => current = parent,
                None => return,
            }
        }
        if dirty.is_empty() {
            return;
        }

        let Some(bounds) = self.tree.get(canvas).map(|n| Rect::from_size(n.size())) else {
            return;
        };
        let Some(record) = self.canvases.get_mut(canvas) else {
            return;
        };
        record.add_dirty(dirty, bounds);
        log::trace!("repaint {dirty:?} on {canvas:?}, now {:?}", record.dirty);
        self.request_task(canvas);
    }

    /// Queue a validate-and-paint task for `canvas` unless one is pending.
    pub(crate) fn request_task(&mut self, canvas: ComponentId) {
        let Some(record) = self.canvases.get_mut(canvas) else {
            return;
        };
        if !record.pending {
            record.pending = true;
            self.scheduler.schedule(canvas);
        }
    }

    /// The accumulated dirty rectangle of `canvas`.
    pub fn dirty_rect(&self, canvas: ComponentId) -> Option<Rect> {
        self.canvases.get(canvas).and_then(|c| c.dirty())
    }

    pub fn is_repaint_pending(&self, canvas: ComponentId) -> bool {
        self.canvases.get(canvas).is_some_and(|c| c.is_pending())
    }

    /// Validate `canvas` if needed, then paint its dirty rectangle.
    ///
    /// The dirty rectangle is reset even when validation or painting fails.
    /// A task already queued for `canvas` stays queued and counted.
    pub fn run_pending_repaint(&mut self, canvas: ComponentId) -> Result<()> {
        self.run_repaint(canvas, false)
    }

    /// Body of a repaint task. `queued` is set when the call consumes a task
    /// taken off the queue.
    fn run_repaint(&mut self, canvas: ComponentId, queued: bool) -> Result<()> {
        let Some(record) = self.canvases.get_mut(canvas) else {
            return Ok(());
        };
        // Invalidations raised while validating land in this pass.
        let keep_pending = record.pending && !queued;
        record.pending = true;

        let stale = self
            .tree
            .get(canvas)
            .is_some_and(|n| !n.is_valid() || !n.is_layout_valid());
        let validated = if stale { self.validate(canvas) } else { Ok(()) };

        let opaque = self
            .tree
            .get(canvas)
            .and_then(|n| n.background())
            .is_some_and(|bg| bg.is_opaque());
        let focus_owner = self.focus.owner();
        let Some(record) = self.canvases.get_mut(canvas) else {
            return validated;
        };
        let dirty = record.dirty.take();
        record.pending = keep_pending;
        if let Err(err) = validated {
            log::warn!("validation of {canvas:?} failed: {err}");
            return Err(err);
        }
        let Some(dirty) = dirty else {
            return Ok(());
        };

        log::debug!("painting {dirty:?} on {canvas:?}");
        let ctx = PaintContext { tree: &self.tree, focus_owner };
        let result = {
            let mut g = record.graphics.save();
            if !opaque {
                g.clear_rect(dirty.x, dirty.y, dirty.width, dirty.height);
            }
            g.clip_rect(dirty.x, dirty.y, dirty.width, dirty.height);
            paint_component(&mut g, &ctx, canvas)
        };
        if let Err(err) = &result {
            log::warn!("paint of {canvas:?} failed: {err}");
        }
        result
    }

    /// Run every queued repaint task. Returns how many ran.
    ///
    /// All queued tasks run even if one fails; the first error is returned.
    pub fn flush_pending(&mut self) -> Result<usize> {
        let mut ran = 0;
        let mut first_err = None;
        while let Ok(canvas) = self.scheduler.rx.try_recv() {
            ran += 1;
            if let Err(err) = self.run_repaint(canvas, true) {
                first_err.get_or_insert(err);
            }
        }
        match first_err {
            Some(err) => Err(err),
            None => Ok(ran),
        }
    }

    /// Wait for the next queued repaint task and run it.
    ///
    /// The app owns the sending half, so this waits until something is
    /// invalidated. Returns the painted canvas.
    pub async fn flush_next(&mut self) -> Result<Option<ComponentId>> {
        match self.scheduler.rx.recv().await {
            Some(canvas) => {
                self.run_repaint(canvas, true)?;
                Ok(Some(canvas))
            }
            None => Ok(None),
        }
    }
}

// ===========================================================================
// Tests
// ===========================================================================
