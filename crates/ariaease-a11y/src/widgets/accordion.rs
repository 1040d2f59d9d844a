//! Accordion controller
//!
//! Triggers carry `aria-expanded`; panels, paired with triggers by
//! position, are shown or hidden to match. Unless `allow_multiple_open` is
//! set, expanding one item collapses the others.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use ariaease_dom::{Display, DomAccess, DomEvent, EventKind, NodeId};

use super::{Lifecycle, WidgetStatus, bind_handler, ensure_attr, ensure_role};
use crate::aria::{ARIA_CONTROLS, ARIA_EXPANDED, ARIA_LABELLEDBY, AriaFamily, AriaRole, parse_bool_token};
use crate::keyboard_nav::{KeyboardNavigator, dispatch_key};
use crate::query::{Resolved, WidgetQuery};
use crate::sync::{AriaSynchronizer, SyncScope, write_if_changed};
use crate::{AccordionConfig, AccordionState, WidgetResult, check_index, reported};

const WIDGET: &str = "accordion";

/// Triggers plus the panels paired with them
#[derive(Debug, Clone)]
struct Sections {
    triggers: Resolved,
    panels: Vec<NodeId>,
}

#[derive(Debug)]
struct AccordionInner {
    config: AccordionConfig,
    query: WidgetQuery,
    expanded: HashMap<NodeId, bool>,
    lifecycle: Lifecycle,
}

impl AccordionInner {
    fn states(&self, triggers: &[NodeId]) -> Vec<AccordionState> {
        triggers
            .iter()
            .map(|node| AccordionState::new(self.expanded.get(node).copied().unwrap_or(false)))
            .collect()
    }

    fn synchronizer(&self) -> AriaSynchronizer {
        AriaSynchronizer::new(AriaFamily::Accordion).exclusive(!self.config.allow_multiple_open)
    }
}

/// Accordion handle
#[derive(Debug, Clone)]
pub struct Accordion {
    inner: Rc<RefCell<AccordionInner>>,
}

impl Accordion {
    pub fn attach<D: DomAccess>(dom: &mut D, config: AccordionConfig) -> Self {
        let query = WidgetQuery::new(&config.accordion_id, &config.triggers_class);
        let accordion = Self {
            inner: Rc::new(RefCell::new(AccordionInner {
                config,
                query,
                expanded: HashMap::new(),
                lifecycle: Lifecycle::default(),
            })),
        };
        let _ = accordion.reattach(dom);
        accordion
    }

    pub fn reattach<D: DomAccess>(&self, dom: &mut D) -> WidgetResult<()> {
        let result = self.attach_pass(dom);
        self.inner.borrow_mut().lifecycle.settle(dom, WIDGET, &result);
        reported(WIDGET, result)
    }

    pub fn status(&self) -> WidgetStatus {
        self.inner.borrow().lifecycle.status()
    }

    pub fn expand_item<D: DomAccess>(&self, dom: &mut D, index: usize) -> WidgetResult<()> {
        let result = self.sections(dom).and_then(|sections| self.set(dom, &sections, index, true));
        reported(WIDGET, result)
    }

    pub fn collapse_item<D: DomAccess>(&self, dom: &mut D, index: usize) -> WidgetResult<()> {
        let result = self.sections(dom).and_then(|sections| self.set(dom, &sections, index, false));
        reported(WIDGET, result)
    }

    /// Flip item `index`, returning whether it is now expanded
    pub fn toggle_item<D: DomAccess>(&self, dom: &mut D, index: usize) -> WidgetResult<bool> {
        let result = self.sections(dom).and_then(|sections| {
            check_index(index, sections.triggers.len())?;
            let open = !self.expanded_at(sections.triggers.items[index]);
            self.set(dom, &sections, index, open)?;
            Ok(open)
        });
        reported(WIDGET, result)
    }

    pub fn is_expanded<D: DomAccess>(&self, dom: &D, index: usize) -> WidgetResult<bool> {
        let triggers = self.resolve_attached(dom)?;
        check_index(index, triggers.len())?;
        Ok(self.expanded_at(triggers.items[index]))
    }

    pub fn expanded_indices<D: DomAccess>(&self, dom: &D) -> WidgetResult<Vec<usize>> {
        let triggers = self.resolve_attached(dom)?;
        Ok((0..triggers.len())
            .filter(|&i| self.expanded_at(triggers.items[i]))
            .collect())
    }

    pub fn cleanup<D: DomAccess>(&self, dom: &mut D) {
        self.inner.borrow_mut().lifecycle.cleanup(dom, WIDGET);
    }

    fn attach_pass<D: DomAccess>(&self, dom: &mut D) -> WidgetResult<()> {
        let (query, accordion_id) = {
            let inner = self.inner.borrow();
            (inner.query.clone(), inner.query.container_id.clone())
        };
        let triggers = query.resolve(dom)?;
        let sections = self.pair_panels(dom, triggers)?;

        for (i, &trigger) in sections.triggers.items.iter().enumerate() {
            let Some(&panel) = sections.panels.get(i) else {
                continue;
            };
            let trigger_id = element_id(dom, trigger, &format!("{accordion_id}-trigger-{i}"))?;
            let panel_id = element_id(dom, panel, &format!("{accordion_id}-panel-{i}"))?;
            write_if_changed(dom, trigger, ARIA_CONTROLS, &panel_id)?;
            ensure_role(dom, panel, AriaRole::Region)?;
            write_if_changed(dom, panel, ARIA_LABELLEDBY, &trigger_id)?;
        }

        let (states, synchronizer) = {
            let mut inner = self.inner.borrow_mut();
            let items = &sections.triggers.items;
            inner.expanded.retain(|node, _| items.contains(node));
            for &trigger in items {
                if !inner.expanded.contains_key(&trigger) {
                    let initial = parse_bool_token(dom.get_attribute(trigger, ARIA_EXPANDED).as_deref());
                    inner.expanded.insert(trigger, initial);
                }
            }
            if !inner.config.allow_multiple_open {
                // Only the first open item survives in single-open mode
                let mut seen_open = false;
                for trigger in items {
                    if let Some(open) = inner.expanded.get_mut(trigger) {
                        *open = *open && !seen_open;
                        seen_open |= *open;
                    }
                }
            }
            (inner.states(items), inner.synchronizer())
        };
        synchronizer.sync(dom, &sections.triggers.items, &states, SyncScope::All)?;
        show_panels(dom, &sections, &states)?;

        let mut inner = self.inner.borrow_mut();
        inner.lifecycle.listeners.retain_nodes(dom, &sections.triggers.items);
        for &trigger in &sections.triggers.items {
            bind_handler(self, &mut inner.lifecycle.listeners, dom, trigger, EventKind::KeyDown, Self::on_key)?;
            bind_handler(self, &mut inner.lifecycle.listeners, dom, trigger, EventKind::Click, Self::on_click)?;
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

    fn sections<D: DomAccess>(&self, dom: &D) -> WidgetResult<Sections> {
        let triggers = self.resolve_attached(dom)?;
        self.pair_panels(dom, triggers)
    }

    fn pair_panels<D: DomAccess>(&self, dom: &D, triggers: Resolved) -> WidgetResult<Sections> {
        let panels_query = {
            let inner = self.inner.borrow();
            inner
                .config
                .panels_class
                .as_deref()
                .map(|class| WidgetQuery::new(&inner.query.container_id, class))
        };
        let panels = match panels_query {
            Some(query) => query.resolve(dom)?.items,
            None => Vec::new(),
        };
        if !panels.is_empty() && panels.len() != triggers.len() {
            tracing::warn!(
                widget = WIDGET,
                triggers = triggers.len(),
                panels = panels.len(),
                "trigger and panel counts differ, pairing by position"
            );
        }
        Ok(Sections { triggers, panels })
    }

    fn expanded_at(&self, node: NodeId) -> bool {
        self.inner.borrow().expanded.get(&node).copied().unwrap_or(false)
    }

    fn set<D: DomAccess>(&self, dom: &mut D, sections: &Sections, index: usize, open: bool) -> WidgetResult<()> {
        let triggers = &sections.triggers.items;
        check_index(index, triggers.len())?;
        let (states, synchronizer) = {
            let mut inner = self.inner.borrow_mut();
            let exclusive = !inner.config.allow_multiple_open;
            for (i, trigger) in triggers.iter().enumerate() {
                if i == index {
                    inner.expanded.insert(*trigger, open);
                } else if open && exclusive {
                    inner.expanded.insert(*trigger, false);
                }
            }
            (inner.states(triggers), inner.synchronizer())
        };
        synchronizer.sync(dom, triggers, &states, SyncScope::Changed(index))?;
        show_panels(dom, sections, &states)
    }

    fn on_key<D: DomAccess>(&self, dom: &mut D, event: &mut DomEvent, item: NodeId) {
        let result = self
            .resolve_attached(dom)
            .and_then(|triggers| dispatch_key(dom, event, item, &triggers.items, &KeyboardNavigator::default(), None));
        let _ = reported(WIDGET, result);
    }

    fn on_click<D: DomAccess>(&self, dom: &mut D, _event: &mut DomEvent, item: NodeId) {
        let result = self.sections(dom).and_then(|sections| match sections.triggers.index_of(item) {
            Some(index) => {
                let open = !self.expanded_at(item);
                self.set(dom, &sections, index, open)
            }
            None => Ok(()),
        });
        let _ = reported(WIDGET, result);
    }
}

/// Existing id of `node`, or `fallback` after assigning it
fn element_id<D: DomAccess>(dom: &mut D, node: NodeId, fallback: &str) -> WidgetResult<String> {
    if let Some(id) = dom.get_attribute(node, "id").filter(|id| !id.is_empty()) {
        return Ok(id);
    }
    ensure_attr(dom, node, "id", fallback)?;
    Ok(fallback.to_string())
}

/// Show expanded panels and hide the rest, touching only those that differ
fn show_panels<D: DomAccess>(dom: &mut D, sections: &Sections, states: &[AccordionState]) -> WidgetResult<()> {
    for (&panel, state) in sections.panels.iter().zip(states) {
        let visible = dom.computed_display(panel).is_some_and(|d| d.is_visible());
        if visible == state.display {
            continue;
        }
        if state.display {
            dom.remove_attribute(panel, "hidden")?;
            dom.set_display(panel, Display::Block)?;
        } else {
            dom.set_display(panel, Display::None)?;
        }
    }
    Ok(())
}
