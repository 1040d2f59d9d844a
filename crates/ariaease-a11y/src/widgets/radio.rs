//! Radio group controller

use std::cell::RefCell;
use std::rc::Rc;

use ariaease_dom::{DomAccess, DomEvent, EventKind, NodeId};

use super::{Lifecycle, WidgetStatus, bind_handler, ensure_family_roles};
use crate::aria::AriaFamily;
use crate::focus::RovingFocus;
use crate::keyboard_nav::{Key, KeyboardNavigator, NavigationAction, dispatch_key};
use crate::query::{Resolved, WidgetQuery};
use crate::sync::{AriaSynchronizer, SyncScope};
use crate::{RadioConfig, RadioState, WidgetResult, check_index, reported};

const WIDGET: &str = "radio";

#[derive(Debug)]
struct RadioInner {
    config: RadioConfig,
    query: WidgetQuery,
    selection: Option<RovingFocus>,
    /// Checked radio node, so removals before it do not move the selection
    selected: Option<NodeId>,
    lifecycle: Lifecycle,
}

/// Radio group: exactly one checked radio, which is also the only tab stop
#[derive(Debug, Clone)]
pub struct RadioGroup {
    inner: Rc<RefCell<RadioInner>>,
}

impl RadioGroup {
    /// Attach to `#groupId`. Resolution failures give an inert handle.
    pub fn attach<D: DomAccess>(dom: &mut D, config: RadioConfig) -> Self {
        let query = WidgetQuery::new(&config.group_id, &config.radios_class);
        let group = Self {
            inner: Rc::new(RefCell::new(RadioInner {
                config,
                query,
                selection: None,
                selected: None,
                lifecycle: Lifecycle::default(),
            })),
        };
        let _ = group.reattach(dom);
        group
    }

    /// Re-run attach: binds radios added since the last pass, unbinds
    /// removed ones and reconciles ARIA. Never stacks listeners.
    pub fn reattach<D: DomAccess>(&self, dom: &mut D) -> WidgetResult<()> {
        let result = self.attach_pass(dom);
        self.inner.borrow_mut().lifecycle.settle(dom, WIDGET, &result);
        reported(WIDGET, result)
    }

    pub fn status(&self) -> WidgetStatus {
        self.inner.borrow().lifecycle.status()
    }

    /// Check radio `index` and uncheck the rest. Focus is left alone.
    pub fn select_radio<D: DomAccess>(&self, dom: &mut D, index: usize) -> WidgetResult<()> {
        let result = self.resolve_attached(dom).and_then(|resolved| self.select(dom, &resolved, index));
        reported(WIDGET, result)
    }

    /// Currently checked radio; None when not attached
    pub fn selected_index(&self) -> Option<usize> {
        let inner = self.inner.borrow();
        inner.lifecycle.ensure_attached().ok()?;
        inner.selection.map(|s| s.index())
    }

    /// Remove every listener this group installed
    pub fn cleanup<D: DomAccess>(&self, dom: &mut D) {
        self.inner.borrow_mut().lifecycle.cleanup(dom, WIDGET);
    }

    fn attach_pass<D: DomAccess>(&self, dom: &mut D) -> WidgetResult<()> {
        let (query, default_index, previous) = {
            let inner = self.inner.borrow();
            (inner.query.clone(), inner.config.default_selected_index, inner.selection.zip(inner.selected))
        };
        let resolved = query.resolve(dom)?;

        ensure_family_roles(dom, AriaFamily::Radio, &resolved)?;

        let index = match previous {
            Some((mut selection, node)) => resolved.index_of(node).unwrap_or_else(|| {
                selection.resize(resolved.len());
                tracing::debug!(widget = WIDGET, index = selection.index(), "checked radio removed, clamping");
                selection.index()
            }),
            None => RovingFocus::new(resolved.len(), default_index)
                .or_else(|error| {
                    tracing::warn!(widget = WIDGET, %error, "default selection out of range, using 0");
                    RovingFocus::new(resolved.len(), 0)
                })?
                .index(),
        };
        self.select(dom, &resolved, index)?;

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

    fn select<D: DomAccess>(&self, dom: &mut D, resolved: &Resolved, index: usize) -> WidgetResult<()> {
        check_index(index, resolved.len())?;
        {
            let mut inner = self.inner.borrow_mut();
            match inner.selection.as_mut() {
                Some(selection) => {
                    selection.resize(resolved.len());
                    selection.select(index)?;
                }
                None => inner.selection = Some(RovingFocus::new(resolved.len(), index)?),
            }
            inner.selected = resolved.get(index);
        }

        let states: Vec<RadioState> = (0..resolved.len()).map(|i| RadioState::new(i == index)).collect();
        AriaSynchronizer::new(AriaFamily::Radio).sync(dom, &resolved.items, &states, SyncScope::All)?;
        Ok(())
    }

    fn on_key<D: DomAccess>(&self, dom: &mut D, event: &mut DomEvent, item: NodeId) {
        let _ = reported(WIDGET, self.handle_key(dom, event, item));
    }

    fn handle_key<D: DomAccess>(&self, dom: &mut D, event: &mut DomEvent, item: NodeId) -> WidgetResult<()> {
        let resolved = self.resolve_attached(dom)?;
        let action = dispatch_key(dom, event, item, &resolved.items, &KeyboardNavigator::default(), None)?;

        match action {
            NavigationAction::MoveFocus { to, .. } => self.select(dom, &resolved, to),
            NavigationAction::Ignore if event.key().map(Key::parse) == Some(Key::Space) => {
                let Some(index) = resolved.index_of(item) else {
                    return Ok(());
                };
                event.prevent_default();
                self.select(dom, &resolved, index)
            }
            _ => Ok(()),
        }
    }

    fn on_click<D: DomAccess>(&self, dom: &mut D, _event: &mut DomEvent, item: NodeId) {
        let result = self.resolve_attached(dom).and_then(|resolved| match resolved.index_of(item) {
            Some(index) => self.select(dom, &resolved, index),
            None => Ok(()),
        });
        let _ = reported(WIDGET, result);
    }
}
