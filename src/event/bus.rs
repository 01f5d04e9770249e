//! Global listeners and synchronous event delivery.
//!
//! [`App::fire`] delivers an event in three phases: the source component's
//! own handler, then every bound listener in bind order, then (for input and
//! focus events) each ancestor's `handle_child`, nearest first. Any phase
//! returning [`Propagation::Stop`] ends delivery. Delivery is synchronous:
//! the event has been fully handled when `fire` returns.

use std::rc::Rc;

use super::kind::{Event, EventKind, Propagation};
use crate::app::App;
use crate::tree::{ComponentId, Tree};

/// A bound global listener.
pub type Listener = Rc<dyn Fn(&mut App, &Event) -> Propagation>;

/// Handle returned by [`EventBus::bind`], used to unbind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

struct Entry {
    id: ListenerId,
    kind: Option<EventKind>,
    listener: Listener,
}

/// Registry of global listeners.
pub struct EventBus {
    entries: Vec<Entry>,
    next_id: u64,
}

impl EventBus {
    pub fn new() -> Self {
        Self { entries: Vec::new(), next_id: 0 }
    }

    /// Listen to every event.
    pub fn bind(&mut self, listener: Listener) -> ListenerId {
        self.push(None, listener)
    }

    /// Listen to events of one kind.
    pub fn bind_kind(&mut self, kind: EventKind, listener: Listener) -> ListenerId {
        self.push(Some(kind), listener)
    }

    fn push(&mut self, kind: Option<EventKind>, listener: Listener) -> ListenerId {
        let id = ListenerId(self.next_id);
        self.next_id += 1;
        self.entries.push(Entry { id, kind, listener });
        id
    }

    /// Remove a listener. Returns `false` if it was not bound.
    pub fn unbind(&mut self, id: ListenerId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| e.id != id);
        self.entries.len() != before
    }

    /// Listeners interested in `kind`, cloned so that delivery can bind or
    /// unbind without invalidating the iteration.
    pub fn listeners_for(&self, kind: EventKind) -> Vec<Listener> {
        self.entries
            .iter()
            .filter(|e| e.kind.is_none_or(|k| k == kind))
            .map(|e| Rc::clone(&e.listener))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// `[start, parent, ..., root]`. Empty if `start` does not exist.
    pub fn bubble_path(tree: &Tree, start: ComponentId) -> Vec<ComponentId> {
        if !tree.contains(start) {
            return Vec::new();
        }
        let mut path = vec![start];
        path.extend(tree.ancestors(start));
        path
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl App {
    /// Deliver `event` synchronously. Returns `Stop` if anything handled it.
    pub fn fire(&mut self, event: Event) -> Propagation {
        let kind = event.kind();
        log::trace!("{} on {:?}", kind.name(), event.source);

        self.track_focus(&event);

        let own = self.tree().get(event.source).and_then(|n| n.handler().cloned());
        if let Some(handler) = own {
            if handler.handle(self, &event).is_stopped() {
                return Propagation::Stop;
            }
        }

        for listener in self.bus.listeners_for(kind) {
            if listener(self, &event).is_stopped() {
                return Propagation::Stop;
            }
        }

        if kind.bubbles() {
            // Ancestors removed by an earlier handler are skipped.
            for ancestor in EventBus::bubble_path(self.tree(), event.source).into_iter().skip(1) {
                let handler = self.tree().get(ancestor).and_then(|n| n.handler().cloned());
                if let Some(handler) = handler {
                    if handler.handle_child(self, ancestor, &event).is_stopped() {
                        return Propagation::Stop;
                    }
                }
            }
        }
        Propagation::Continue
    }
}

// ===========================================================================
// Tests
// ===========================================================================
