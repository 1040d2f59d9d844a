//! AriaEase DOM - Document Object Model surface
//!
//! The DOM capability widget controllers are written against, plus an
//! arena-backed headless document implementing it.

mod access;
mod attributes;
mod classlist;
mod document;
mod dom_events;
mod node;
mod observer;

pub use access::DomAccess;
pub use attributes::{Attr, NamedNodeMap};
pub use classlist::DOMTokenList;
pub use document::HeadlessDocument;
pub use dom_events::{DomEvent, EventKind, EventListener, ListenerId, listener};
pub use node::{Display, ElementData, Node, TextSelection};
pub use observer::{MutationLog, MutationRecord};

/// Node identifier (index into arena)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) u32);

impl NodeId {
    /// Arena slot of this node
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Result type for DOM operations
pub type DomResult<T> = Result<T, DomError>;

/// DOM operation errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DomError {
    #[error("Node not found: {0}")]
    NotFound(NodeId),

    #[error("Hierarchy request error: {child} cannot be inserted into {parent}")]
    HierarchyRequest { parent: NodeId, child: NodeId },
}
