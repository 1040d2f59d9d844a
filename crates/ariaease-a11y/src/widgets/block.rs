//! Block controller: generic caret-aware navigation across a cached list of
//! items, with keyboard activation of elements marked clickable.

use std::cell::RefCell;
use std::rc::Rc;

use ariaease_dom::{DomAccess, DomEvent, EventKind, NodeId};

use super::{Lifecycle, WidgetStatus, bind_handler};
use crate::keyboard_nav::{KeyboardNavigator, dispatch_key};
use crate::query::WidgetQuery;
use crate::{BlockConfig, WidgetResult, reported};

const WIDGET: &str = "block";

#[derive(Debug)]
struct BlockInner {
    query: WidgetQuery,
    items: Vec<NodeId>,
    lifecycle: Lifecycle,
}

/// Block handle
#[derive(Debug, Clone)]
pub struct Block {
    inner: Rc<RefCell<BlockInner>>,
}

impl Block {
    pub fn attach<D: DomAccess>(dom: &mut D, config: BlockConfig) -> Self {
        let block = Self {
            inner: Rc::new(RefCell::new(BlockInner {
                query: WidgetQuery::new(&config.block_id, &config.items_class),
                items: Vec::new(),
                lifecycle: Lifecycle::default(),
            })),
        };
        let _ = block.reattach(dom);
        block
    }

    pub fn reattach<D: DomAccess>(&self, dom: &mut D) -> WidgetResult<()> {
        let result = self.bind_pass(dom);
        let mut inner = self.inner.borrow_mut();
        if result.is_err() {
            inner.items.clear();
        }
        inner.lifecycle.settle(dom, WIDGET, &result);
        drop(inner);
        reported(WIDGET, result)
    }

    pub fn status(&self) -> WidgetStatus {
        self.inner.borrow().lifecycle.status()
    }

    /// Cached item list
    pub fn items(&self) -> Vec<NodeId> {
        self.inner.borrow().items.clone()
    }

    /// Re-resolve and rebind the items. Returns the item count.
    pub fn refresh<D: DomAccess>(&self, dom: &mut D) -> WidgetResult<usize> {
        let attached = self.inner.borrow().lifecycle.ensure_attached();
        let result = attached
            .and_then(|()| self.bind_pass(dom))
            .map(|()| self.inner.borrow().items.len());
        if let Ok(items) = result {
            tracing::debug!(widget = WIDGET, items, "refreshed");
        }
        reported(WIDGET, result)
    }

    pub fn cleanup<D: DomAccess>(&self, dom: &mut D) {
        self.inner.borrow_mut().lifecycle.cleanup(dom, WIDGET);
    }

    fn bind_pass<D: DomAccess>(&self, dom: &mut D) -> WidgetResult<()> {
        let query = self.inner.borrow().query.clone();
        let resolved = query.resolve(dom)?;

        let mut inner = self.inner.borrow_mut();
        inner.lifecycle.listeners.retain_nodes(dom, &resolved.items);
        for &item in &resolved.items {
            bind_handler(self, &mut inner.lifecycle.listeners, dom, item, EventKind::KeyDown, Self::on_key)?;
        }
        inner.items = resolved.items;
        Ok(())
    }

    fn on_key<D: DomAccess>(&self, dom: &mut D, event: &mut DomEvent, item: NodeId) {
        let items = self.items();
        let _ = reported(
            WIDGET,
            dispatch_key(dom, event, item, &items, &KeyboardNavigator::default(), None),
        );
    }
}
