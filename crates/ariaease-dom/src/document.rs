//! Headless Document
//!
//! Arena-backed element tree implementing [`DomAccess`] without a browser.
//! Used by tests and by hosts that drive widgets from a virtual DOM.

use std::collections::HashMap;
use std::rc::Rc;

use crate::{
    Display, DomAccess, DomError, DomEvent, DomResult, EventKind, EventListener, ListenerId,
    MutationLog, MutationRecord, Node, NodeId, TextSelection,
};

type ListenerTable = HashMap<(NodeId, EventKind), Vec<(ListenerId, EventListener<HeadlessDocument>)>>;

/// In-memory document
pub struct HeadlessDocument {
    nodes: Vec<Node>,
    root: NodeId,
    focused: Option<NodeId>,
    listeners: ListenerTable,
    next_listener: u64,
    mutations: MutationLog,
}

impl HeadlessDocument {
    /// Create a document with an empty `<body>` root
    pub fn new() -> Self {
        Self {
            nodes: vec![Node::new("body")],
            root: NodeId(0),
            focused: None,
            listeners: HashMap::new(),
            next_listener: 1,
            mutations: MutationLog::new(),
        }
    }

    /// The `<body>` element
    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.index())
    }

    fn get_mut(&mut self, id: NodeId) -> DomResult<&mut Node> {
        self.nodes.get_mut(id.index()).ok_or(DomError::NotFound(id))
    }

    /// Create a detached element
    pub fn create_element(&mut self, tag_name: &str) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(Node::new(tag_name));
        id
    }

    /// Append `child` as the last child of `parent`, moving it if attached
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> DomResult<()> {
        self.get(parent).ok_or(DomError::NotFound(parent))?;
        self.get(child).ok_or(DomError::NotFound(child))?;
        if child == self.root || self.is_inclusive_ancestor(child, parent) {
            return Err(DomError::HierarchyRequest { parent, child });
        }

        if let Some(old_parent) = self.nodes[child.index()].parent {
            self.nodes[old_parent.index()].children.retain(|&c| c != child);
        }
        self.nodes[child.index()].parent = Some(parent);
        self.nodes[parent.index()].children.push(child);
        Ok(())
    }

    /// Detach `child` from `parent`. Focus inside the removed subtree is lost.
    pub fn remove_child(&mut self, parent: NodeId, child: NodeId) -> DomResult<()> {
        let node = self.get(child).ok_or(DomError::NotFound(child))?;
        if node.parent != Some(parent) {
            return Err(DomError::HierarchyRequest { parent, child });
        }

        if let Some(focused) = self.focused {
            if self.is_inclusive_ancestor(child, focused) {
                self.focused = None;
            }
        }
        self.nodes[parent.index()].children.retain(|&c| c != child);
        self.nodes[child.index()].parent = None;
        Ok(())
    }

    /// Create an element with attributes and append it to `parent`.
    /// Builder writes are not recorded in the mutation log.
    pub fn append_element(
        &mut self,
        parent: NodeId,
        tag_name: &str,
        attrs: &[(&str, &str)],
    ) -> DomResult<NodeId> {
        let id = self.create_element(tag_name);
        for (name, value) in attrs {
            self.nodes[id.index()].element.set_attr(name, value);
        }
        self.append_child(parent, id)?;
        Ok(id)
    }

    /// Set a text control's value with the caret at the end.
    /// Returns false for elements that are not text controls.
    pub fn set_value(&mut self, node: NodeId, value: &str) -> DomResult<bool> {
        let element = &mut self.get_mut(node)?.element;
        match element.text.as_mut() {
            Some(text) => {
                *text = TextSelection::with_value(value);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Move a text control's selection. Returns false for other elements.
    pub fn set_selection(&mut self, node: NodeId, start: usize, end: usize) -> DomResult<bool> {
        let element = &mut self.get_mut(node)?.element;
        match element.text.as_mut() {
            Some(text) => {
                text.select(start, end);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Whether `node` is attached below the root
    pub fn is_connected(&self, node: NodeId) -> bool {
        self.is_inclusive_ancestor(self.root, node)
    }

    /// Dispatch an event at its target. Returns false if the default was
    /// prevented.
    pub fn dispatch_event(&mut self, event: &mut DomEvent) -> bool {
        let key = (event.target, event.kind);
        let snapshot: Vec<(ListenerId, EventListener<Self>)> = self
            .listeners
            .get(&key)
            .map(|list| list.iter().map(|(id, l)| (*id, Rc::clone(l))).collect())
            .unwrap_or_default();

        tracing::trace!(
            target_node = %event.target,
            kind = event.kind.as_str(),
            listeners = snapshot.len(),
            "dispatching event"
        );

        for (id, listener) in snapshot {
            // Listeners removed by an earlier listener in this dispatch are skipped
            if !self.is_registered(key, id) {
                continue;
            }
            listener(self, event);
            if event.is_propagation_stopped() {
                break;
            }
        }

        !event.is_default_prevented()
    }

    /// Dispatch a keydown at `target`
    pub fn key_down(&mut self, target: NodeId, key: &str) -> bool {
        let mut event = DomEvent::key_down(target, key);
        self.dispatch_event(&mut event)
    }

    /// Dispatch a keydown at the focused element, if any
    pub fn key_down_focused(&mut self, key: &str) -> Option<bool> {
        let target = self.focused?;
        Some(self.key_down(target, key))
    }

    /// Total registered listeners
    pub fn listener_count(&self) -> usize {
        self.listeners.values().map(Vec::len).sum()
    }

    /// Listeners registered on one node
    pub fn listeners_on(&self, node: NodeId) -> usize {
        self.listeners
            .iter()
            .filter(|((target, _), _)| *target == node)
            .map(|(_, list)| list.len())
            .sum()
    }

    pub fn mutations(&self) -> &[MutationRecord] {
        self.mutations.records()
    }

    pub fn take_mutations(&mut self) -> Vec<MutationRecord> {
        self.mutations.take_records()
    }

    fn is_registered(&self, key: (NodeId, EventKind), id: ListenerId) -> bool {
        self.listeners
            .get(&key)
            .is_some_and(|list| list.iter().any(|(l, _)| *l == id))
    }

    fn is_inclusive_ancestor(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut current = Some(node);
        while let Some(id) = current {
            if id == ancestor {
                return true;
            }
            current = self.get(id).and_then(|n| n.parent);
        }
        false
    }

    /// Descendants of `start` in document order, excluding `start`
    fn descendants(&self, start: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = match self.get(start) {
            Some(node) => node.children.iter().rev().copied().collect(),
            None => return out,
        };
        while let Some(id) = stack.pop() {
            out.push(id);
            if let Some(node) = self.get(id) {
                stack.extend(node.children.iter().rev().copied());
            }
        }
        out
    }
}

impl Default for HeadlessDocument {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for HeadlessDocument {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HeadlessDocument")
            .field("nodes", &self.nodes.len())
            .field("focused", &self.focused)
            .field("listeners", &self.listener_count())
            .field("mutations", &self.mutations.len())
            .finish()
    }
}

impl DomAccess for HeadlessDocument {
    fn get_element_by_id(&self, id: &str) -> Option<NodeId> {
        self.descendants(self.root)
            .into_iter()
            .find(|&node| self.nodes[node.index()].element.id() == Some(id))
    }

    fn get_elements_by_class_name(&self, root: NodeId, class: &str) -> Vec<NodeId> {
        self.descendants(root)
            .into_iter()
            .filter(|&node| self.nodes[node.index()].element.classes.contains(class))
            .collect()
    }

    fn get_attribute(&self, node: NodeId, name: &str) -> Option<String> {
        self.get(node)?.element.get_attr(name).map(str::to_string)
    }

    fn set_attribute(&mut self, node: NodeId, name: &str, value: &str) -> DomResult<()> {
        let old_value = self.get_mut(node)?.element.set_attr(name, value);
        tracing::trace!(target_node = %node, name, value, "setAttribute");
        self.mutations.push(MutationRecord {
            target: node,
            attribute_name: name.to_string(),
            old_value,
            new_value: Some(value.to_string()),
        });
        Ok(())
    }

    fn remove_attribute(&mut self, node: NodeId, name: &str) -> DomResult<bool> {
        let Some(old_value) = self.get_mut(node)?.element.remove_attr(name) else {
            return Ok(false);
        };
        self.mutations.push(MutationRecord {
            target: node,
            attribute_name: name.to_string(),
            old_value: Some(old_value),
            new_value: None,
        });
        Ok(true)
    }

    fn tag_name(&self, node: NodeId) -> Option<String> {
        self.get(node).map(|n| n.element.tag_name.clone())
    }

    fn focus(&mut self, node: NodeId) -> DomResult<()> {
        self.get(node).ok_or(DomError::NotFound(node))?;
        self.focused = Some(node);
        Ok(())
    }

    fn active_element(&self) -> Option<NodeId> {
        self.focused
    }

    fn computed_display(&self, node: NodeId) -> Option<Display> {
        self.get(node).map(|n| n.element.computed_display())
    }

    fn set_display(&mut self, node: NodeId, display: Display) -> DomResult<()> {
        self.get_mut(node)?.element.display = display;
        Ok(())
    }

    fn text_selection(&self, node: NodeId) -> Option<TextSelection> {
        self.get(node)?.element.text.clone()
    }

    fn add_event_listener(
        &mut self,
        node: NodeId,
        kind: EventKind,
        listener: EventListener<Self>,
    ) -> DomResult<ListenerId> {
        self.get(node).ok_or(DomError::NotFound(node))?;
        let id = ListenerId(self.next_listener);
        self.next_listener += 1;
        self.listeners.entry((node, kind)).or_default().push((id, listener));
        Ok(id)
    }

    fn remove_event_listener(&mut self, node: NodeId, kind: EventKind, id: ListenerId) -> bool {
        let Some(list) = self.listeners.get_mut(&(node, kind)) else {
            return false;
        };
        let before = list.len();
        list.retain(|(l, _)| *l != id);
        let removed = list.len() < before;
        if list.is_empty() {
            self.listeners.remove(&(node, kind));
        }
        removed
    }

    fn click(&mut self, node: NodeId) -> DomResult<bool> {
        self.get(node).ok_or(DomError::NotFound(node))?;
        let mut event = DomEvent::click(node);
        Ok(self.dispatch_event(&mut event))
    }
}
