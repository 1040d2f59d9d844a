//! Toggle button controller (single button or group)

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use ariaease_dom::{DomAccess, DomEvent, EventKind, NodeId};

use super::{Lifecycle, WidgetStatus, bind_handler, ensure_attr, ensure_role, is_native_button};
use crate::aria::{ARIA_PRESSED, AriaFamily, AriaRole, TABINDEX, parse_bool_token};
use crate::keyboard_nav::{Key, KeyboardNavigator, NavOptions, dispatch_key};
use crate::query::{Resolved, WidgetQuery, resolve_element};
use crate::sync::{AriaSynchronizer, SyncScope};
use crate::{ToggleConfig, ToggleState, WidgetResult, check_index, reported};

const WIDGET: &str = "toggle";

/// Where the toggles come from
#[derive(Debug, Clone)]
enum ToggleScope {
    Single(String),
    Group(WidgetQuery),
}

impl ToggleScope {
    fn resolve<D: DomAccess>(&self, dom: &D) -> WidgetResult<Resolved> {
        match self {
            Self::Single(id) => {
                let node = resolve_element(dom, id)?;
                Ok(Resolved {
                    container: node,
                    items: vec![node],
                })
            }
            Self::Group(query) => Ok(query.resolve(dom)?),
        }
    }
}

#[derive(Debug)]
struct ToggleInner {
    scope: ToggleScope,
    pressed: HashMap<NodeId, bool>,
    lifecycle: Lifecycle,
}

impl ToggleInner {
    fn states(&self, items: &[NodeId]) -> Vec<ToggleState> {
        items
            .iter()
            .map(|node| ToggleState::new(self.pressed.get(node).copied().unwrap_or(false)))
            .collect()
    }
}

/// Toggle buttons carrying `aria-pressed`
#[derive(Debug, Clone)]
pub struct ToggleGroup {
    inner: Rc<RefCell<ToggleInner>>,
}

impl ToggleGroup {
    pub fn attach<D: DomAccess>(dom: &mut D, config: ToggleConfig) -> Self {
        let scope = if config.is_single_toggle {
            ToggleScope::Single(config.toggle_id)
        } else {
            ToggleScope::Group(WidgetQuery::new(&config.container_id, &config.toggles_class))
        };
        let toggles = Self {
            inner: Rc::new(RefCell::new(ToggleInner {
                scope,
                pressed: HashMap::new(),
                lifecycle: Lifecycle::default(),
            })),
        };
        let _ = toggles.reattach(dom);
        toggles
    }

    pub fn reattach<D: DomAccess>(&self, dom: &mut D) -> WidgetResult<()> {
        let result = self.attach_pass(dom);
        self.inner.borrow_mut().lifecycle.settle(dom, WIDGET, &result);
        reported(WIDGET, result)
    }

    pub fn status(&self) -> WidgetStatus {
        self.inner.borrow().lifecycle.status()
    }

    /// Flip toggle `index`, returning its new value
    pub fn toggle<D: DomAccess>(&self, dom: &mut D, index: usize) -> WidgetResult<bool> {
        let result = self.resolve_attached(dom).and_then(|resolved| {
            check_index(index, resolved.len())?;
            let pressed = !self.pressed_at(resolved.items[index]);
            self.set(dom, &resolved, index, pressed)?;
            Ok(pressed)
        });
        reported(WIDGET, result)
    }

    pub fn set_pressed<D: DomAccess>(&self, dom: &mut D, index: usize, pressed: bool) -> WidgetResult<()> {
        let result = self
            .resolve_attached(dom)
            .and_then(|resolved| self.set(dom, &resolved, index, pressed));
        reported(WIDGET, result)
    }

    pub fn is_pressed<D: DomAccess>(&self, dom: &D, index: usize) -> WidgetResult<bool> {
        let resolved = self.resolve_attached(dom)?;
        check_index(index, resolved.len())?;
        Ok(self.pressed_at(resolved.items[index]))
    }

    pub fn pressed_indices<D: DomAccess>(&self, dom: &D) -> WidgetResult<Vec<usize>> {
        let resolved = self.resolve_attached(dom)?;
        Ok((0..resolved.len())
            .filter(|&i| self.pressed_at(resolved.items[i]))
            .collect())
    }

    pub fn cleanup<D: DomAccess>(&self, dom: &mut D) {
        self.inner.borrow_mut().lifecycle.cleanup(dom, WIDGET);
    }

    fn attach_pass<D: DomAccess>(&self, dom: &mut D) -> WidgetResult<()> {
        let scope = self.inner.borrow().scope.clone();
        let resolved = scope.resolve(dom)?;

        for &item in &resolved.items {
            if !is_native_button(dom, item) {
                ensure_role(dom, item, AriaRole::Button)?;
                ensure_attr(dom, item, TABINDEX, "0")?;
            }
        }

        let states = {
            let mut inner = self.inner.borrow_mut();
            inner.pressed.retain(|node, _| resolved.items.contains(node));
            for &item in &resolved.items {
                if !inner.pressed.contains_key(&item) {
                    let initial = parse_bool_token(dom.get_attribute(item, ARIA_PRESSED).as_deref());
                    inner.pressed.insert(item, initial);
                }
            }
            inner.states(&resolved.items)
        };
        AriaSynchronizer::new(AriaFamily::Toggle).sync(dom, &resolved.items, &states, SyncScope::All)?;

        let mut inner = self.inner.borrow_mut();
        inner.lifecycle.listeners.retain_nodes(dom, &resolved.items);
        for &item in &resolved.items {
            bind_handler(self, &mut inner.lifecycle.listeners, dom, item, EventKind::KeyDown, Self::on_key)?;
            bind_handler(self, &mut inner.lifecycle.listeners, dom, item, EventKind::Click, Self::on_click)?;
        }
        Ok(())
    }

    fn resolve_attached<D: DomAccess>(&self, dom: &D) -> WidgetResult<Resolved> {
        let scope = {
            let inner = self.inner.borrow();
            inner.lifecycle.ensure_attached()?;
            inner.scope.clone()
        };
        scope.resolve(dom)
    }

    fn is_single(&self) -> bool {
        matches!(self.inner.borrow().scope, ToggleScope::Single(_))
    }

    fn pressed_at(&self, node: NodeId) -> bool {
        self.inner.borrow().pressed.get(&node).copied().unwrap_or(false)
    }

    fn set<D: DomAccess>(&self, dom: &mut D, resolved: &Resolved, index: usize, pressed: bool) -> WidgetResult<()> {
        check_index(index, resolved.len())?;
        let states = {
            let mut inner = self.inner.borrow_mut();
            inner.pressed.insert(resolved.items[index], pressed);
            inner.states(&resolved.items)
        };
        AriaSynchronizer::new(AriaFamily::Toggle).sync(dom, &resolved.items, &states, SyncScope::Changed(index))?;
        Ok(())
    }

    fn on_key<D: DomAccess>(&self, dom: &mut D, event: &mut DomEvent, item: NodeId) {
        // A lone toggle has nowhere to move focus
        let key = event.key().map(Key::parse);
        if self.is_single() && key.is_some_and(|k| k.is_backward() || k.is_forward()) {
            return;
        }
        let navigator = KeyboardNavigator::new(NavOptions {
            items_clickable: true,
            ..NavOptions::default()
        });
        let result = self
            .resolve_attached(dom)
            .and_then(|resolved| dispatch_key(dom, event, item, &resolved.items, &navigator, None));
        let _ = reported(WIDGET, result);
    }

    fn on_click<D: DomAccess>(&self, dom: &mut D, _event: &mut DomEvent, item: NodeId) {
        let result = self.resolve_attached(dom).and_then(|resolved| match resolved.index_of(item) {
            Some(index) => {
                let pressed = !self.pressed_at(item);
                self.set(dom, &resolved, index, pressed)
            }
            None => Ok(()),
        });
        let _ = reported(WIDGET, result);
    }
}
