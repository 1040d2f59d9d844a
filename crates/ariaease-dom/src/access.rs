//! DOM Access Capability
//!
//! The query/mutation surface widget controllers are handed. A browser host
//! implements it over the live document; `HeadlessDocument` implements it in
//! memory.

use crate::{Display, DomResult, EventKind, EventListener, ListenerId, NodeId, TextSelection};

/// Injected DOM capability
pub trait DomAccess: Sized + 'static {
    /// `document.getElementById`
    fn get_element_by_id(&self, id: &str) -> Option<NodeId>;

    /// Descendants of `root` carrying `class`, in document order
    fn get_elements_by_class_name(&self, root: NodeId, class: &str) -> Vec<NodeId>;

    fn get_attribute(&self, node: NodeId, name: &str) -> Option<String>;

    fn set_attribute(&mut self, node: NodeId, name: &str, value: &str) -> DomResult<()>;

    /// Returns whether the attribute was present
    fn remove_attribute(&mut self, node: NodeId, name: &str) -> DomResult<bool>;

    fn has_attribute(&self, node: NodeId, name: &str) -> bool {
        self.get_attribute(node, name).is_some()
    }

    /// Lowercase tag name
    fn tag_name(&self, node: NodeId) -> Option<String>;

    fn focus(&mut self, node: NodeId) -> DomResult<()>;

    /// `document.activeElement`
    fn active_element(&self) -> Option<NodeId>;

    /// `getComputedStyle(node).display`
    fn computed_display(&self, node: NodeId) -> Option<Display>;

    /// Inline `style.display`
    fn set_display(&mut self, node: NodeId, display: Display) -> DomResult<()>;

    /// Value and selection of a text control; None for other elements
    fn text_selection(&self, node: NodeId) -> Option<TextSelection>;

    fn add_event_listener(
        &mut self,
        node: NodeId,
        kind: EventKind,
        listener: EventListener<Self>,
    ) -> DomResult<ListenerId>;

    /// Returns whether a listener was removed
    fn remove_event_listener(&mut self, node: NodeId, kind: EventKind, id: ListenerId) -> bool;

    /// `element.click()`: dispatch a synthesized click. Returns false if a
    /// listener prevented the default action.
    fn click(&mut self, node: NodeId) -> DomResult<bool>;
}
