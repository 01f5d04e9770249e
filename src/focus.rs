//! Focus manager: the single focus owner and traversal between focusables.
//!
//! The only state is the current owner. [`App::request_focus`] resolves the
//! requested component through composite capture and checks it is
//! focusable before switching. [`App::find_next_focusable`] walks the tree
//! depth-first inside the nearest focus root, wrapping at either end.
//! Removing, hiding or disabling the owner (or any ancestor of it) releases
//! focus synchronously, from inside the structural event that reports it.

use crate::app::App;
use crate::event::{Event, EventData};
use crate::tree::{ComponentId, Traversal};

/// Direction of focus traversal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Forward,
    Backward,
}

/// Holds the current focus owner.
#[derive(Debug, Default)]
pub struct FocusManager {
    owner: Option<ComponentId>,
}

impl FocusManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn owner(&self) -> Option<ComponentId> {
        self.owner
    }
}

impl App {
    pub fn focus_owner(&self) -> Option<ComponentId> {
        self.focus.owner()
    }

    pub fn has_focus(&self, id: ComponentId) -> bool {
        self.focus.owner() == Some(id)
    }

    /// Attached to a canvas, able to own focus, and visible and enabled all
    /// the way up to the canvas.
    pub fn is_focusable(&self, id: ComponentId) -> bool {
        let Some(canvas) = self.tree.canvas_of(id) else {
            return false;
        };
        let Some(node) = self.tree.get(id) else {
            return false;
        };
        if !node.focusability().can_have_focus(&self.tree, id) {
            return false;
        }
        let mut current = id;
        loop {
            match self.tree.get(current) {
                Some(n) if n.is_visible() && n.is_enabled() => {}
                _ => return false,
            }
            if current == canvas {
                return true;
            }
            match self.tree.parent(current) {
                Some(parent) => current = parent,
                None => return false,
            }
        }
    }

    /// Nearest strict ancestor that bounds traversal. A canvas is its own root.
    pub fn focus_root_of(&self, id: ComponentId) -> Option<ComponentId> {
        if self.tree.get(id)?.is_canvas() {
            return Some(id);
        }
        self.tree.ancestors(id).into_iter().find(|&a| {
            self.tree
                .get(a)
                .is_some_and(|n| n.is_focus_root() || n.is_canvas())
        })
    }

    /// Give focus to `target`, or clear it with `None`.
    ///
    /// Returns `false` when the target cannot take focus; that is an expected
    /// outcome, not an error. Otherwise the old owner receives `FocusLost`
    /// before the new owner receives `FocusGained`.
    pub fn request_focus(&mut self, target: Option<ComponentId>) -> bool {
        let target = match target {
            Some(id) => match self.event_destination(id) {
                Some(dest) if self.is_focusable(dest) => Some(dest),
                _ => return false,
            },
            None => None,
        };
        let previous = self.focus.owner;
        if previous == target {
            return true;
        }

        log::debug!("focus {previous:?} -> {target:?}");
        if let Some(old) = previous {
            self.fire(Event::new(old, EventData::FocusLost { next: target }));
        }
        self.focus.owner = target;
        if let Some(new) = target {
            self.fire(Event::new(new, EventData::FocusGained { previous }));
        }
        for id in [previous, target].into_iter().flatten() {
            self.repaint(id);
        }
        true
    }

    pub fn focus_next(&mut self) -> bool {
        self.move_focus(Direction::Forward)
    }

    pub fn focus_previous(&mut self) -> bool {
        self.move_focus(Direction::Backward)
    }

    fn move_focus(&mut self, direction: Direction) -> bool {
        let Some(owner) = self.focus.owner else {
            return false;
        };
        match self.find_next_focusable(owner, direction) {
            Some(next) => self.request_focus(Some(next)),
            None => false,
        }
    }

    /// Next focusable component after (or before) `from` in depth-first
    /// order, bounded by `from`'s focus root and wrapping at the ends.
    ///
    /// Starting from a focus root searches its whole subtree. Returns `None`
    /// when nothing inside the root can take focus.
    pub fn find_next_focusable(&self, from: ComponentId, direction: Direction) -> Option<ComponentId> {
        let node = self.tree.get(from)?;
        let root = if node.is_canvas() || node.is_focus_root() {
            from
        } else {
            self.focus_root_of(from)?
        };

        if from != root {
            if direction == Direction::Forward {
                if let Some(found) = self.search_children(from, direction) {
                    return Some(found);
                }
            }
            let mut current = from;
            while current != root {
                let parent = self.tree.parent(current)?;
                let siblings = self.tree.children(parent);
                let index = siblings.iter().position(|&s| s == current)?;
                let rest: Vec<ComponentId> = match direction {
                    Direction::Forward => siblings[index + 1..].to_vec(),
                    Direction::Backward => siblings[..index].iter().rev().copied().collect(),
                };
                for sibling in rest {
                    if self.traversal_blocks(parent, sibling) {
                        continue;
                    }
                    if let Some(found) = self.candidate(sibling, direction) {
                        return Some(found);
                    }
                }
                // Going backward, the parent precedes its children.
                if direction == Direction::Backward && parent != root && self.accepts_focus(parent) {
                    return Some(parent);
                }
                current = parent;
            }
        }
        self.search_children(root, direction)
    }

    fn search_children(&self, parent: ComponentId, direction: Direction) -> Option<ComponentId> {
        let kids = self.tree.children(parent);
        let ordered: Vec<ComponentId> = match direction {
            Direction::Forward => kids.to_vec(),
            Direction::Backward => kids.iter().rev().copied().collect(),
        };
        ordered
            .into_iter()
            .filter(|&kid| !self.traversal_blocks(parent, kid))
            .find_map(|kid| self.candidate(kid, direction))
    }

    /// `id` itself or the first focusable in its subtree.
    fn candidate(&self, id: ComponentId, direction: Direction) -> Option<ComponentId> {
        let node = self.tree.get(id)?;
        if !node.is_visible() || !node.is_enabled() || node.size().is_empty() {
            return None;
        }
        if direction == Direction::Forward && self.accepts_focus(id) {
            return Some(id);
        }
        // Embedded canvases traverse on their own.
        if !node.is_canvas() {
            if let Some(found) = self.search_children(id, direction) {
                return Some(found);
            }
        }
        (direction == Direction::Backward && self.accepts_focus(id)).then_some(id)
    }

    fn accepts_focus(&self, id: ComponentId) -> bool {
        self.tree
            .get(id)
            .is_some_and(|n| n.focusability().can_have_focus(&self.tree, id))
            && self.is_focusable(id)
    }

    /// Whether `parent` hides `kid` from focus traversal.
    fn traversal_blocks(&self, parent: ComponentId, kid: ComponentId) -> bool {
        let Some(node) = self.tree.get(parent) else {
            return true;
        };
        match node.traversal() {
            Traversal::FollowCapture => node.catch_input().catches(&self.tree, parent, kid),
            Traversal::Open => false,
            Traversal::Opaque => true,
        }
    }

    /// Release focus when the owner, or an ancestor of it, is hidden,
    /// disabled or removed. Runs before the event reaches any handler.
    pub(crate) fn track_focus(&mut self, event: &Event) {
        let Some(owner) = self.focus.owner else {
            return;
        };
        let affected = match &event.data {
            EventData::Shown { visible: false } | EventData::Enabled { enabled: false } => event.source,
            EventData::Removed { child, .. } => *child,
            _ => return,
        };
        if self.tree.is_in_subtree(affected, owner) {
            log::debug!("releasing focus of {owner:?}: {} on {affected:?}", event.name());
            self.request_focus(None);
        }
    }
}

// ===========================================================================
// Tests
// ===========================================================================
