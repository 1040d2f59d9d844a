//! Checkbox group controller

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use ariaease_dom::{DomAccess, DomEvent, EventKind, NodeId};

use super::{Lifecycle, WidgetStatus, bind_handler, ensure_attr, ensure_family_roles};
use crate::aria::{ARIA_CHECKED, AriaFamily, TABINDEX, parse_bool_token};
use crate::keyboard_nav::{Key, KeyboardNavigator, NavigationAction, dispatch_key};
use crate::query::{Resolved, WidgetQuery};
use crate::sync::{AriaSynchronizer, SyncScope};
use crate::{CheckboxConfig, CheckboxState, WidgetResult, check_index, reported};

const WIDGET: &str = "checkbox";

#[derive(Debug)]
struct CheckboxInner {
    query: WidgetQuery,
    checked: HashMap<NodeId, bool>,
    lifecycle: Lifecycle,
}

impl CheckboxInner {
    fn states(&self, items: &[NodeId]) -> Vec<CheckboxState> {
        items
            .iter()
            .map(|node| CheckboxState::new(self.checked.get(node).copied().unwrap_or(false)))
            .collect()
    }
}

/// Group of independent checkboxes, each a tab stop
#[derive(Debug, Clone)]
pub struct CheckboxGroup {
    inner: Rc<RefCell<CheckboxInner>>,
}

impl CheckboxGroup {
    pub fn attach<D: DomAccess>(dom: &mut D, config: CheckboxConfig) -> Self {
        let group = Self {
            inner: Rc::new(RefCell::new(CheckboxInner {
                query: WidgetQuery::new(&config.group_id, &config.checkboxes_class),
                checked: HashMap::new(),
                lifecycle: Lifecycle::default(),
            })),
        };
        let _ = group.reattach(dom);
        group
    }

    pub fn reattach<D: DomAccess>(&self, dom: &mut D) -> WidgetResult<()> {
        let result = self.attach_pass(dom);
        self.inner.borrow_mut().lifecycle.settle(dom, WIDGET, &result);
        reported(WIDGET, result)
    }

    pub fn status(&self) -> WidgetStatus {
        self.inner.borrow().lifecycle.status()
    }

    /// Flip checkbox `index`, returning its new value
    pub fn toggle_checkbox<D: DomAccess>(&self, dom: &mut D, index: usize) -> WidgetResult<bool> {
        let result = self.resolve_attached(dom).and_then(|resolved| {
            check_index(index, resolved.len())?;
            let checked = !self.checked_at(resolved.items[index]);
            self.set(dom, &resolved, index, checked)?;
            Ok(checked)
        });
        reported(WIDGET, result)
    }

    pub fn set_checked<D: DomAccess>(&self, dom: &mut D, index: usize, checked: bool) -> WidgetResult<()> {
        let result = self
            .resolve_attached(dom)
            .and_then(|resolved| self.set(dom, &resolved, index, checked));
        reported(WIDGET, result)
    }

    pub fn is_checked<D: DomAccess>(&self, dom: &D, index: usize) -> WidgetResult<bool> {
        let resolved = self.resolve_attached(dom)?;
        check_index(index, resolved.len())?;
        Ok(self.checked_at(resolved.items[index]))
    }

    pub fn checked_indices<D: DomAccess>(&self, dom: &D) -> WidgetResult<Vec<usize>> {
        let resolved = self.resolve_attached(dom)?;
        Ok((0..resolved.len())
            .filter(|&i| self.checked_at(resolved.items[i]))
            .collect())
    }

    pub fn cleanup<D: DomAccess>(&self, dom: &mut D) {
        self.inner.borrow_mut().lifecycle.cleanup(dom, WIDGET);
    }

    fn attach_pass<D: DomAccess>(&self, dom: &mut D) -> WidgetResult<()> {
        let query = self.inner.borrow().query.clone();
        let resolved = query.resolve(dom)?;

        ensure_family_roles(dom, AriaFamily::Checkbox, &resolved)?;
        for &item in &resolved.items {
            ensure_attr(dom, item, TABINDEX, "0")?;
        }

        // Markup supplies the initial state of items seen for the first time
        let states = {
            let mut inner = self.inner.borrow_mut();
            inner.checked.retain(|node, _| resolved.items.contains(node));
            for &item in &resolved.items {
                if !inner.checked.contains_key(&item) {
                    let initial = parse_bool_token(dom.get_attribute(item, ARIA_CHECKED).as_deref());
                    inner.checked.insert(item, initial);
                }
            }
            inner.states(&resolved.items)
        };
        AriaSynchronizer::new(AriaFamily::Checkbox).sync(dom, &resolved.items, &states, SyncScope::All)?;

        let mut inner = self.inner.borrow_mut();
        inner.lifecycle.listeners.retain_nodes(dom, &resolved.items);
        for &item in &resolved.items {
            bind_handler(self, &mut inner.lifecycle.listeners, dom, item, EventKind::KeyDown, Self::on_key)?;
            bind_handler(self, &mut inner.lifecycle.listeners, dom, item, EventKind::Click, Self::on_click)?;
        }
        Ok(())
    }

    fn resolve_attached<D: DomAccess>(&self, dom: &D) -> WidgetResult<Resolved> {
        let query = {
            let inner = self.inner.borrow();
            inner.lifecycle.ensure_attached()?;
            inner.query.clone()
        };
        Ok(query.resolve(dom)?)
    }

    fn checked_at(&self, node: NodeId) -> bool {
        self.inner.borrow().checked.get(&node).copied().unwrap_or(false)
    }

    fn set<D: DomAccess>(&self, dom: &mut D, resolved: &Resolved, index: usize, checked: bool) -> WidgetResult<()> {
        check_index(index, resolved.len())?;
        let states = {
            let mut inner = self.inner.borrow_mut();
            inner.checked.insert(resolved.items[index], checked);
            inner.states(&resolved.items)
        };
        AriaSynchronizer::new(AriaFamily::Checkbox).sync(dom, &resolved.items, &states, SyncScope::Changed(index))?;
        Ok(())
    }

    fn toggle_node<D: DomAccess>(&self, dom: &mut D, item: NodeId) -> WidgetResult<()> {
        let resolved = self.resolve_attached(dom)?;
        let Some(index) = resolved.index_of(item) else {
            return Ok(());
        };
        let checked = !self.checked_at(item);
        self.set(dom, &resolved, index, checked)
    }

    fn on_key<D: DomAccess>(&self, dom: &mut D, event: &mut DomEvent, item: NodeId) {
        let result = self.resolve_attached(dom).and_then(|resolved| {
            let action = dispatch_key(dom, event, item, &resolved.items, &KeyboardNavigator::default(), None)?;
            if action == NavigationAction::Ignore && event.key().map(Key::parse) == Some(Key::Space) {
                event.prevent_default();
                self.toggle_node(dom, item)?;
            }
            Ok(())
        });
        let _ = reported(WIDGET, result);
    }

    fn on_click<D: DomAccess>(&self, dom: &mut D, _event: &mut DomEvent, item: NodeId) {
        let _ = reported(WIDGET, self.toggle_node(dom, item));
    }
}
