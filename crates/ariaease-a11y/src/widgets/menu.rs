//! Menu controller
//!
//! A trigger button opens a `role="menu"` container. The item list is
//! cached at attach time; call [`Menu::refresh`] after inserting or
//! removing items.

use std::cell::RefCell;
use std::rc::Rc;

use ariaease_dom::{Display, DomAccess, DomEvent, EventKind, NodeId};

use super::{Lifecycle, WidgetStatus, bind_handler, ensure_attr, ensure_role};
use crate::aria::{ARIA_CONTROLS, ARIA_HASPOPUP, AriaRole, TABINDEX};
use crate::focus::FocusTrap;
use crate::keyboard_nav::{Key, KeyboardNavigator, dispatch_key};
use crate::query::{WidgetQuery, resolve_element};
use crate::sync::{sync_trigger, write_if_changed};
use crate::{MenuConfig, TriggerLabels, WidgetResult, reported};

const WIDGET: &str = "menu";

/// Resolved trigger/container pair plus the cached items
#[derive(Debug, Clone)]
struct MenuParts {
    trap: FocusTrap,
    items: Vec<NodeId>,
}

#[derive(Debug)]
struct MenuInner {
    query: WidgetQuery,
    trigger_id: String,
    labels: Option<TriggerLabels>,
    parts: Option<MenuParts>,
    lifecycle: Lifecycle,
}

/// Menu handle
#[derive(Debug, Clone)]
pub struct Menu {
    inner: Rc<RefCell<MenuInner>>,
}

impl Menu {
    /// Attach and force the menu closed
    pub fn attach<D: DomAccess>(dom: &mut D, config: MenuConfig) -> Self {
        let menu = Self {
            inner: Rc::new(RefCell::new(MenuInner {
                query: WidgetQuery::new(&config.menu_id, &config.items_class),
                trigger_id: config.trigger_id,
                labels: config.labels,
                parts: None,
                lifecycle: Lifecycle::default(),
            })),
        };
        let _ = menu.reattach(dom);
        menu
    }

    pub fn reattach<D: DomAccess>(&self, dom: &mut D) -> WidgetResult<()> {
        let result = self.attach_pass(dom);
        let mut inner = self.inner.borrow_mut();
        if result.is_err() {
            inner.parts = None;
        }
        inner.lifecycle.settle(dom, WIDGET, &result);
        drop(inner);
        reported(WIDGET, result)
    }

    pub fn status(&self) -> WidgetStatus {
        self.inner.borrow().lifecycle.status()
    }

    /// Show the menu, mark the trigger expanded and focus the first item
    pub fn open_menu<D: DomAccess>(&self, dom: &mut D) -> WidgetResult<()> {
        let result = self.parts().and_then(|parts| open(dom, &parts));
        reported(WIDGET, result)
    }

    /// Hide the menu, mark the trigger collapsed and focus it
    pub fn close_menu<D: DomAccess>(&self, dom: &mut D) -> WidgetResult<()> {
        let result = self.parts().and_then(|parts| parts.trap.release(dom));
        reported(WIDGET, result)
    }

    /// Returns whether the menu is open afterwards
    pub fn toggle_menu<D: DomAccess>(&self, dom: &mut D) -> WidgetResult<bool> {
        let result = self.parts().and_then(|parts| {
            if parts.trap.is_active(dom) {
                parts.trap.release(dom)?;
                Ok(false)
            } else {
                open(dom, &parts)?;
                Ok(true)
            }
        });
        reported(WIDGET, result)
    }

    pub fn is_open<D: DomAccess>(&self, dom: &D) -> WidgetResult<bool> {
        Ok(self.parts()?.trap.is_active(dom))
    }

    /// Re-resolve the items: new ones are prepared and bound, removed ones
    /// unbound. Returns the item count.
    pub fn refresh<D: DomAccess>(&self, dom: &mut D) -> WidgetResult<usize> {
        let result = self.parts().and_then(|parts| {
            let query = self.inner.borrow().query.clone();
            let resolved = query.resolve(dom)?;
            self.bind_items(dom, parts.trap.trigger, &resolved.items)?;
            if let Some(cached) = self.inner.borrow_mut().parts.as_mut() {
                cached.items = resolved.items.clone();
            }
            tracing::debug!(widget = WIDGET, items = resolved.len(), "refreshed");
            Ok(resolved.len())
        });
        reported(WIDGET, result)
    }

    pub fn cleanup<D: DomAccess>(&self, dom: &mut D) {
        self.inner.borrow_mut().lifecycle.cleanup(dom, WIDGET);
    }

    fn attach_pass<D: DomAccess>(&self, dom: &mut D) -> WidgetResult<()> {
        let (query, trigger_id, labels, first_pass) = {
            let inner = self.inner.borrow();
            (
                inner.query.clone(),
                inner.trigger_id.clone(),
                inner.labels.clone(),
                inner.parts.is_none(),
            )
        };
        let resolved = query.resolve(dom)?;
        let trigger = resolve_element(dom, &trigger_id)?;

        ensure_role(dom, resolved.container, AriaRole::Menu)?;
        write_if_changed(dom, trigger, ARIA_HASPOPUP, "menu")?;
        write_if_changed(dom, trigger, ARIA_CONTROLS, &query.container_id)?;

        let trap = FocusTrap::new(resolved.container, trigger).with_labels(labels);
        if first_pass {
            dom.set_display(resolved.container, Display::None)?;
        }
        sync_trigger(dom, trigger, trap.is_active(dom), trap.labels.as_ref())?;

        self.inner.borrow_mut().parts = Some(MenuParts {
            trap,
            items: resolved.items.clone(),
        });
        self.bind_items(dom, trigger, &resolved.items)
    }

    fn bind_items<D: DomAccess>(&self, dom: &mut D, trigger: NodeId, items: &[NodeId]) -> WidgetResult<()> {
        for &item in items {
            ensure_role(dom, item, AriaRole::MenuItem)?;
            ensure_attr(dom, item, TABINDEX, "-1")?;
        }

        let mut keep = items.to_vec();
        keep.push(trigger);
        let mut inner = self.inner.borrow_mut();
        inner.lifecycle.listeners.retain_nodes(dom, &keep);
        bind_handler(self, &mut inner.lifecycle.listeners, dom, trigger, EventKind::Click, Self::on_trigger_click)?;
        bind_handler(self, &mut inner.lifecycle.listeners, dom, trigger, EventKind::KeyDown, Self::on_trigger_key)?;
        for &item in items {
            bind_handler(self, &mut inner.lifecycle.listeners, dom, item, EventKind::KeyDown, Self::on_item_key)?;
        }
        Ok(())
    }

    fn parts(&self) -> WidgetResult<MenuParts> {
        let inner = self.inner.borrow();
        inner.lifecycle.ensure_attached()?;
        inner.parts.clone().ok_or(crate::WidgetError::NotAttached)
    }

    fn on_trigger_click<D: DomAccess>(&self, dom: &mut D, _event: &mut DomEvent, _trigger: NodeId) {
        let _ = self.toggle_menu(dom);
    }

    fn on_trigger_key<D: DomAccess>(&self, dom: &mut D, event: &mut DomEvent, _trigger: NodeId) {
        let result = self.parts().and_then(|parts| {
            match event.key().map(Key::parse) {
                Some(Key::ArrowDown) => {
                    event.prevent_default();
                    open(dom, &parts)
                }
                Some(Key::Escape) if parts.trap.is_active(dom) => {
                    event.prevent_default();
                    parts.trap.release(dom)
                }
                _ => Ok(()),
            }
        });
        let _ = reported(WIDGET, result);
    }

    fn on_item_key<D: DomAccess>(&self, dom: &mut D, event: &mut DomEvent, item: NodeId) {
        let result = self.parts().and_then(|parts| {
            dispatch_key(dom, event, item, &parts.items, &KeyboardNavigator::default(), Some(&parts.trap))
        });
        let _ = reported(WIDGET, result);
    }
}

fn open<D: DomAccess>(dom: &mut D, parts: &MenuParts) -> WidgetResult<()> {
    let container = parts.trap.container;
    dom.remove_attribute(container, "hidden")?;
    dom.set_display(container, Display::Block)?;
    sync_trigger(dom, parts.trap.trigger, true, parts.trap.labels.as_ref())?;
    if let Some(&first) = parts.items.first() {
        dom.focus(first)?;
    }
    Ok(())
}
