//! Listener Registry
//!
//! Per-instance bookkeeping of the listeners a controller installed, keyed
//! by (element, event type). At most one listener per key, so re-attaching
//! never stacks duplicates and cleanup removes exactly what was added.

use std::collections::HashMap;

use ariaease_dom::{DomAccess, EventKind, EventListener, ListenerId, NodeId};

use crate::WidgetResult;

/// Listeners owned by one controller instance
#[derive(Debug, Default)]
pub struct ListenerRegistry {
    bindings: HashMap<(NodeId, EventKind), ListenerId>,
}

impl ListenerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_bound(&self, node: NodeId, kind: EventKind) -> bool {
        self.bindings.contains_key(&(node, kind))
    }

    /// Install a listener unless one is already bound for `(node, kind)`.
    /// `make` is only called when a listener is actually added.
    pub fn bind<D: DomAccess>(
        &mut self,
        dom: &mut D,
        node: NodeId,
        kind: EventKind,
        make: impl FnOnce() -> EventListener<D>,
    ) -> WidgetResult<bool> {
        if self.is_bound(node, kind) {
            return Ok(false);
        }
        let id = dom.add_event_listener(node, kind, make())?;
        self.bindings.insert((node, kind), id);
        Ok(true)
    }

    /// Drop bindings on nodes that are no longer widget items
    pub fn retain_nodes<D: DomAccess>(&mut self, dom: &mut D, keep: &[NodeId]) -> usize {
        let keys: Vec<_> = self
            .bindings
            .keys()
            .filter(|(n, _)| !keep.contains(n))
            .copied()
            .collect();
        self.remove_keys(dom, keys)
    }

    /// Remove everything; returns how many listeners were bound
    pub fn clear<D: DomAccess>(&mut self, dom: &mut D) -> usize {
        let count = self.bindings.len();
        for ((node, kind), id) in self.bindings.drain() {
            if !dom.remove_event_listener(node, kind, id) {
                tracing::debug!(node = %node, kind = kind.as_str(), "listener already gone");
            }
        }
        count
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    fn remove_keys<D: DomAccess>(&mut self, dom: &mut D, keys: Vec<(NodeId, EventKind)>) -> usize {
        let count = keys.len();
        for key in keys {
            if let Some(id) = self.bindings.remove(&key) {
                dom.remove_event_listener(key.0, key.1, id);
            }
        }
        count
    }
}
