//! Tree operations: insert, attach, detach, free, walk.

use std::collections::VecDeque;

use slotmap::{SecondaryMap, SlotMap};

use super::node::{Component, ComponentId};
use crate::error::{Error, Result};
use crate::geometry::Point;

/// Empty slice constant for returning when a component has no children.
const EMPTY_CHILDREN: &[ComponentId] = &[];

/// The component tree, backed by a slotmap arena.
///
/// Components live in a single `SlotMap`. Parent/child edges are kept in
/// secondary maps: the children list is the owning direction and defines
/// z-order (first child is painted first); the parent link is lookup only.
/// Detached components stay in the arena until [`Tree::free`] is called, so a
/// removed subtree can be re-attached elsewhere.
pub struct Tree {
    nodes: SlotMap<ComponentId, Component>,
    children: SecondaryMap<ComponentId, Vec<ComponentId>>,
    parent: SecondaryMap<ComponentId, ComponentId>,
}

impl Tree {
    pub fn new() -> Self {
        Self {
            nodes: SlotMap::with_key(),
            children: SecondaryMap::new(),
            parent: SecondaryMap::new(),
        }
    }

    /// Insert a detached component.
    pub fn insert(&mut self, component: Component) -> ComponentId {
        let id = self.nodes.insert(component);
        self.children.insert(id, Vec::new());
        id
    }

    /// Attach `child` under `parent` at `index` (or at the end).
    ///
    /// Fails if either id is unknown, the child already has a parent, the edge
    /// would close a cycle, or the index is past the end.
    pub fn attach(
        &mut self,
        parent: ComponentId,
        child: ComponentId,
        index: Option<usize>,
    ) -> Result<usize> {
        self.require(parent)?;
        self.require(child)?;
        if self.parent.contains_key(child) {
            return Err(Error::AlreadyAttached(child));
        }
        if parent == child || self.is_ancestor(child, parent) {
            return Err(Error::Cycle { parent, child });
        }
        let kids = self
            .children
            .get_mut(parent)
            .ok_or(Error::NoSuchComponent(parent))?;
        let index = index.unwrap_or(kids.len());
        if index > kids.len() {
            return Err(Error::IndexOutOfBounds { index, len: kids.len() });
        }
        kids.insert(index, child);
        self.parent.insert(child, parent);
        Ok(index)
    }

    /// Detach `child` from its parent, returning the former parent and index.
    pub fn detach(&mut self, child: ComponentId) -> Result<(ComponentId, usize)> {
        self.require(child)?;
        let parent = self.parent.remove(child).ok_or(Error::NoSuchComponent(child))?;
        let kids = self
            .children
            .get_mut(parent)
            .ok_or(Error::NoSuchComponent(parent))?;
        let index = kids
            .iter()
            .position(|&k| k == child)
            .ok_or(Error::NotAChild { parent, child })?;
        kids.remove(index);
        Ok((parent, index))
    }

    /// Remove a component and all its descendants from the arena.
    ///
    /// Returns the ids that were freed, in breadth-first order.
    pub fn free(&mut self, id: ComponentId) -> Vec<ComponentId> {
        if !self.nodes.contains_key(id) {
            return Vec::new();
        }
        if let Some(parent_id) = self.parent.remove(id) {
            if let Some(siblings) = self.children.get_mut(parent_id) {
                siblings.retain(|&child| child != id);
            }
        }

        let mut freed = Vec::new();
        let mut queue = VecDeque::new();
        queue.push_back(id);
        while let Some(current) = queue.pop_front() {
            if let Some(kids) = self.children.remove(current) {
                queue.extend(kids);
            }
            self.parent.remove(current);
            if self.nodes.remove(current).is_some() {
                freed.push(current);
            }
        }
        freed
    }

    pub fn parent(&self, id: ComponentId) -> Option<ComponentId> {
        self.parent.get(id).copied()
    }

    /// Children in z-order. Empty if the component has none or does not exist.
    pub fn children(&self, id: ComponentId) -> &[ComponentId] {
        self.children
            .get(id)
            .map(Vec::as_slice)
            .unwrap_or(EMPTY_CHILDREN)
    }

    /// Position of `id` among its siblings.
    pub fn index_of(&self, id: ComponentId) -> Option<usize> {
        let parent = self.parent(id)?;
        self.children(parent).iter().position(|&k| k == id)
    }

    /// Ancestors of `id`, nearest first. Does not include `id`.
    pub fn ancestors(&self, id: ComponentId) -> Vec<ComponentId> {
        let mut result = Vec::new();
        let mut current = id;
        while let Some(p) = self.parent.get(current).copied() {
            result.push(p);
            current = p;
        }
        result
    }

    /// Whether `ancestor` is a strict ancestor of `id`.
    pub fn is_ancestor(&self, ancestor: ComponentId, id: ComponentId) -> bool {
        let mut current = id;
        while let Some(p) = self.parent.get(current).copied() {
            if p == ancestor {
                return true;
            }
            current = p;
        }
        false
    }

    /// Whether `id` is `root` or lies inside its subtree.
    pub fn is_in_subtree(&self, root: ComponentId, id: ComponentId) -> bool {
        id == root || self.is_ancestor(root, id)
    }

    /// Nearest canvas at or above `id`.
    pub fn canvas_of(&self, id: ComponentId) -> Option<ComponentId> {
        let mut current = Some(id);
        while let Some(c) = current {
            if self.nodes.get(c)?.canvas {
                return Some(c);
            }
            current = self.parent(c);
        }
        None
    }

    /// Location of `id` in the coordinate space of its canvas.
    pub fn location_in_canvas(&self, id: ComponentId) -> Option<Point> {
        let mut point = Point::ORIGIN;
        let mut current = id;
        loop {
            let node = self.nodes.get(current)?;
            if node.canvas {
                return Some(point);
            }
            point = point + node.bounds.location();
            current = self.parent(current)?;
        }
    }

    pub fn get(&self, id: ComponentId) -> Option<&Component> {
        self.nodes.get(id)
    }

    pub fn get_mut(&mut self, id: ComponentId) -> Option<&mut Component> {
        self.nodes.get_mut(id)
    }

    /// Like [`get`](Self::get) but reports unknown ids as an error.
    pub fn require(&self, id: ComponentId) -> Result<&Component> {
        self.nodes.get(id).ok_or(Error::NoSuchComponent(id))
    }

    pub fn require_mut(&mut self, id: ComponentId) -> Result<&mut Component> {
        self.nodes.get_mut(id).ok_or(Error::NoSuchComponent(id))
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn contains(&self, id: ComponentId) -> bool {
        self.nodes.contains_key(id)
    }
}

impl Default for Tree {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Build a small test tree:
    /// ```text
    ///       root
    ///      /    \
    ///    a        b
    ///   / \
    ///  c   d
    /// ```
    fn build_tree() -> (Tree, [ComponentId; 5]) {
        let mut tree = Tree::new();
        let root = tree.insert(Component::named("root"));
        let a = tree.insert(Component::named("a").with_bounds(10, 10, 50, 50));
        let b = tree.insert(Component::named("b"));
        let c = tree.insert(Component::named("c").with_bounds(5, 7, 10, 10));
        let d = tree.insert(Component::named("d"));
        tree.attach(root, a, None).unwrap();
        tree.attach(root, b, None).unwrap();
        tree.attach(a, c, None).unwrap();
        tree.attach(a, d, None).unwrap();
        (tree, [root, a, b, c, d])
    }

    #[test]
    fn attach_sets_parent_and_order() {
        let (tree, [root, a, b, c, d]) = build_tree();
        assert_eq!(tree.parent(a), Some(root));
        assert_eq!(tree.children(root), &[a, b]);
        assert_eq!(tree.children(a), &[c, d]);
        assert_eq!(tree.index_of(d), Some(1));
        assert_eq!(tree.parent(root), None);
    }

    #[test]
    fn attach_at_index() {
        let (mut tree, [root, a, b, ..]) = build_tree();
        let e = tree.insert(Component::new());
        assert_eq!(tree.attach(root, e, Some(1)).unwrap(), 1);
        assert_eq!(tree.children(root), &[a, e, b]);
    }

    #[test]
    fn attach_rejects_second_parent() {
        let (mut tree, [_root, _a, b, c, _d]) = build_tree();
        assert_eq!(tree.attach(b, c, None), Err(Error::AlreadyAttached(c)));
    }

    #[test]
    fn attach_rejects_cycles() {
        let (mut tree, [root, a, _b, c, _d]) = build_tree();
        let detached_a = tree.detach(a).unwrap();
        assert_eq!(detached_a, (root, 0));
        assert_eq!(tree.attach(c, a, None), Err(Error::Cycle { parent: c, child: a }));
        assert_eq!(tree.attach(a, a, None), Err(Error::Cycle { parent: a, child: a }));
    }

    #[test]
    fn attach_rejects_bad_index() {
        let (mut tree, [_root, _a, b, ..]) = build_tree();
        let e = tree.insert(Component::new());
        assert_eq!(
            tree.attach(b, e, Some(3)),
            Err(Error::IndexOutOfBounds { index: 3, len: 0 })
        );
    }

    #[test]
    fn detach_keeps_subtree_in_arena() {
        let (mut tree, [root, a, b, c, d]) = build_tree();
        tree.detach(a).unwrap();
        assert_eq!(tree.children(root), &[b]);
        assert_eq!(tree.parent(a), None);
        assert_eq!(tree.children(a), &[c, d]);
        assert_eq!(tree.len(), 5);
    }

    #[test]
    fn free_removes_subtree() {
        let (mut tree, [root, a, b, c, d]) = build_tree();
        let freed = tree.free(a);
        assert_eq!(freed, vec![a, c, d]);
        assert!(!tree.contains(c));
        assert_eq!(tree.children(root), &[b]);
        assert_eq!(tree.len(), 2);
        assert!(tree.free(a).is_empty());
    }

    #[test]
    fn ancestry_queries() {
        let (tree, [root, a, b, c, _d]) = build_tree();
        assert_eq!(tree.ancestors(c), vec![a, root]);
        assert!(tree.is_ancestor(root, c));
        assert!(!tree.is_ancestor(b, c));
        assert!(tree.is_in_subtree(a, a));
        assert!(tree.is_in_subtree(a, c));
    }

    #[test]
    fn canvas_lookup_and_location() {
        let (mut tree, [root, _a, _b, c, _d]) = build_tree();
        assert_eq!(tree.canvas_of(c), None);
        assert_eq!(tree.location_in_canvas(c), None);
        tree.get_mut(root).unwrap().canvas = true;
        assert_eq!(tree.canvas_of(c), Some(root));
        assert_eq!(tree.location_in_canvas(c), Some(Point::new(15, 17)));
    }
}
