//! Query Resolver
//!
//! Finds a widget's container by id and its items by class, in document
//! order. Read-only; every call queries the live DOM.

use ariaease_dom::{DomAccess, NodeId};

use crate::ResolutionError;

/// Container plus its matching items
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolved {
    pub container: NodeId,
    pub items: Vec<NodeId>,
}

impl Resolved {
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Position of an item in this resolution
    pub fn index_of(&self, node: NodeId) -> Option<usize> {
        self.items.iter().position(|&n| n == node)
    }

    pub fn get(&self, index: usize) -> Option<NodeId> {
        self.items.get(index).copied()
    }
}

/// Container id / item class pair, normalized
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WidgetQuery {
    pub container_id: String,
    pub item_class: String,
}

impl WidgetQuery {
    /// Accepts `"acc"` or `"#acc"`, `"trig"` or `".trig"`
    pub fn new(container_id: &str, item_class: &str) -> Self {
        Self {
            container_id: strip_selector(container_id, '#').to_string(),
            item_class: strip_selector(item_class, '.').to_string(),
        }
    }

    pub fn resolve<D: DomAccess>(&self, dom: &D) -> Result<Resolved, ResolutionError> {
        let container = dom
            .get_element_by_id(&self.container_id)
            .ok_or_else(|| ResolutionError::ContainerNotFound(self.container_id.clone()))?;

        let items = dom.get_elements_by_class_name(container, &self.item_class);
        if items.is_empty() {
            return Err(ResolutionError::NoItemsFound {
                container: self.container_id.clone(),
                class: self.item_class.clone(),
            });
        }

        Ok(Resolved { container, items })
    }
}

/// Resolve a container and its items
pub fn resolve<D: DomAccess>(
    dom: &D,
    container_id: &str,
    item_class: &str,
) -> Result<Resolved, ResolutionError> {
    WidgetQuery::new(container_id, item_class).resolve(dom)
}

/// Resolve a single element by id (menu triggers, single toggles)
pub fn resolve_element<D: DomAccess>(dom: &D, id: &str) -> Result<NodeId, ResolutionError> {
    let id = strip_selector(id, '#');
    dom.get_element_by_id(id)
        .ok_or_else(|| ResolutionError::ElementNotFound(id.to_string()))
}

fn strip_selector(s: &str, prefix: char) -> &str {
    let s = s.trim();
    s.strip_prefix(prefix).unwrap_or(s)
}
