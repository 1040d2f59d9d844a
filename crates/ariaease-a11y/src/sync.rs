//! ARIA State Synchronization
//!
//! Reconciles item ARIA attributes with caller-owned state records. Every
//! write is diffed against the current attribute value, and a malformed
//! call (arity or index) writes nothing at all.

use ariaease_dom::{DomAccess, NodeId};

use crate::aria::{ARIA_EXPANDED, ARIA_LABEL, AriaFamily, TABINDEX, bool_token};
use crate::focus::roving_tabindex;
use crate::query::{resolve, resolve_element};
use crate::state::{AccordionState, CheckboxState, ItemState, RadioState, ToggleState, TriggerLabels};
use crate::{WidgetError, WidgetResult, check_index, reported};

/// Which items a pass reconciles
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncScope {
    /// Only the item that changed (plus, for exclusive families, the items
    /// it forces off)
    Changed(usize),
    All,
}

/// Attribute writes performed by one pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SyncReport {
    pub writes: usize,
}

impl SyncReport {
    pub fn is_noop(&self) -> bool {
        self.writes == 0
    }

    fn record(&mut self, wrote: bool) {
        if wrote {
            self.writes += 1;
        }
    }
}

/// Set `name` only when its current value differs. Returns whether a write
/// happened.
pub fn write_if_changed<D: DomAccess>(
    dom: &mut D,
    node: NodeId,
    name: &str,
    value: &str,
) -> WidgetResult<bool> {
    if dom.get_attribute(node, name).as_deref() == Some(value) {
        return Ok(false);
    }
    dom.set_attribute(node, name, value)?;
    Ok(true)
}

/// Family-aware synchronizer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AriaSynchronizer {
    family: AriaFamily,
    exclusive: bool,
}

impl AriaSynchronizer {
    pub fn new(family: AriaFamily) -> Self {
        Self {
            family,
            exclusive: family.is_exclusive(),
        }
    }

    /// Override exclusivity (single-open accordions)
    pub fn exclusive(mut self, exclusive: bool) -> Self {
        self.exclusive = exclusive;
        self
    }

    pub fn family(&self) -> AriaFamily {
        self.family
    }

    /// Reconcile `items` with `states`
    pub fn sync<D: DomAccess, S: ItemState>(
        &self,
        dom: &mut D,
        items: &[NodeId],
        states: &[S],
        scope: SyncScope,
    ) -> WidgetResult<SyncReport> {
        if items.len() != states.len() {
            return Err(WidgetError::ArityMismatch {
                items: items.len(),
                states: states.len(),
            });
        }
        if let SyncScope::Changed(index) = scope {
            check_index(index, items.len())?;
        }

        let mut report = SyncReport::default();
        if self.exclusive {
            self.sync_exclusive(dom, items, states, scope, &mut report)?;
        } else {
            let indices = match scope {
                SyncScope::Changed(index) => index..index + 1,
                SyncScope::All => 0..items.len(),
            };
            for i in indices {
                self.write_item(dom, items[i], &states[i], states[i].primary(), &mut report)?;
            }
        }

        tracing::trace!(family = self.family.name(), writes = report.writes, "aria sync");
        Ok(report)
    }

    fn sync_exclusive<D: DomAccess, S: ItemState>(
        &self,
        dom: &mut D,
        items: &[NodeId],
        states: &[S],
        scope: SyncScope,
        report: &mut SyncReport,
    ) -> WidgetResult<()> {
        let roving = self.family.uses_roving_tabindex();
        let active = match scope {
            SyncScope::Changed(index) if !states[index].primary() => {
                // Turning an item off forces nothing on the others
                return self.write_item(dom, items[index], &states[index], false, report);
            }
            SyncScope::Changed(index) => Some(index),
            SyncScope::All => states.iter().position(|state| state.primary()),
        };
        let focusable = active.unwrap_or(0);

        // Clear every other item before the active one is set
        for (i, (&node, state)) in items.iter().zip(states).enumerate() {
            if Some(i) == active {
                continue;
            }
            self.write_item(dom, node, state, false, report)?;
            if roving {
                report.record(write_if_changed(dom, node, TABINDEX, roving_tabindex(i == focusable))?);
            }
        }

        if let Some(index) = active {
            self.write_item(dom, items[index], &states[index], true, report)?;
            if roving {
                report.record(write_if_changed(dom, items[index], TABINDEX, roving_tabindex(true))?);
            }
        }
        Ok(())
    }

    fn write_item<D: DomAccess, S: ItemState>(
        &self,
        dom: &mut D,
        node: NodeId,
        state: &S,
        on: bool,
        report: &mut SyncReport,
    ) -> WidgetResult<()> {
        report.record(write_if_changed(dom, node, self.family.primary_attribute(), bool_token(on))?);
        if let Some(label) = state.label_for(on) {
            report.record(write_if_changed(dom, node, ARIA_LABEL, label)?);
        }
        Ok(())
    }
}

/// Reconcile a menu trigger's `aria-expanded` and optional `aria-label`
pub fn sync_trigger<D: DomAccess>(
    dom: &mut D,
    trigger: NodeId,
    open: bool,
    labels: Option<&TriggerLabels>,
) -> WidgetResult<SyncReport> {
    let mut report = SyncReport::default();
    report.record(write_if_changed(dom, trigger, ARIA_EXPANDED, bool_token(open))?);
    if let Some(labels) = labels {
        report.record(write_if_changed(dom, trigger, ARIA_LABEL, labels.for_state(open))?);
    }
    Ok(report)
}

fn resolve_and_sync<D: DomAccess, S: ItemState>(
    dom: &mut D,
    synchronizer: AriaSynchronizer,
    container_id: &str,
    items_class: &str,
    states: &[S],
    changed_index: usize,
) -> WidgetResult<SyncReport> {
    let resolved = resolve(dom, container_id, items_class)?;
    synchronizer.sync(dom, &resolved.items, states, SyncScope::Changed(changed_index))
}

/// Single pass over an accordion's triggers after `changed_index` toggled
pub fn update_accordion_aria<D: DomAccess>(
    dom: &mut D,
    container_id: &str,
    items_class: &str,
    states: &[AccordionState],
    changed_index: usize,
) -> WidgetResult<SyncReport> {
    let synchronizer = AriaSynchronizer::new(AriaFamily::Accordion);
    reported(
        "accordion",
        resolve_and_sync(dom, synchronizer, container_id, items_class, states, changed_index),
    )
}

/// Single pass over a radio group after `changed_index` was chosen
pub fn update_radio_aria<D: DomAccess>(
    dom: &mut D,
    container_id: &str,
    items_class: &str,
    states: &[RadioState],
    changed_index: usize,
) -> WidgetResult<SyncReport> {
    let synchronizer = AriaSynchronizer::new(AriaFamily::Radio);
    reported(
        "radio",
        resolve_and_sync(dom, synchronizer, container_id, items_class, states, changed_index),
    )
}

/// Single pass over a checkbox group after `changed_index` toggled
pub fn update_checkbox_aria<D: DomAccess>(
    dom: &mut D,
    container_id: &str,
    items_class: &str,
    states: &[CheckboxState],
    changed_index: usize,
) -> WidgetResult<SyncReport> {
    let synchronizer = AriaSynchronizer::new(AriaFamily::Checkbox);
    reported(
        "checkbox",
        resolve_and_sync(dom, synchronizer, container_id, items_class, states, changed_index),
    )
}

/// Single pass over toggle buttons after `changed_index` toggled
pub fn update_toggle_aria<D: DomAccess>(
    dom: &mut D,
    container_id: &str,
    items_class: &str,
    states: &[ToggleState],
    changed_index: usize,
) -> WidgetResult<SyncReport> {
    let synchronizer = AriaSynchronizer::new(AriaFamily::Toggle);
    reported(
        "toggle",
        resolve_and_sync(dom, synchronizer, container_id, items_class, states, changed_index),
    )
}

/// Single pass over a menu trigger
pub fn update_menu_trigger_aria<D: DomAccess>(
    dom: &mut D,
    trigger_id: &str,
    open: bool,
    labels: Option<&TriggerLabels>,
) -> WidgetResult<SyncReport> {
    let result = resolve_element(dom, trigger_id)
        .map_err(WidgetError::from)
        .and_then(|trigger| sync_trigger(dom, trigger, open, labels));
    reported("menu", result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ariaease_dom::HeadlessDocument;

    fn group(tag: &str, n: usize) -> (HeadlessDocument, Vec<NodeId>) {
        let mut doc = HeadlessDocument::new();
        let root = doc.root();
        let group = doc.append_element(root, "div", &[("id", "group")]).unwrap();
        let items = (0..n)
            .map(|_| doc.append_element(group, tag, &[("class", "item")]).unwrap())
            .collect();
        (doc, items)
    }

    #[test]
    fn test_arity_mismatch_writes_nothing() {
        let (mut doc, items) = group("div", 3);
        let states = vec![CheckboxState::new(true); 2];
        let sync = AriaSynchronizer::new(AriaFamily::Checkbox);

        assert_eq!(
            sync.sync(&mut doc, &items, &states, SyncScope::All),
            Err(WidgetError::ArityMismatch { items: 3, states: 2 })
        );
        assert!(doc.mutations().is_empty());
    }

    #[test]
    fn test_changed_index_out_of_range_writes_nothing() {
        let (mut doc, items) = group("div", 2);
        let states = vec![ToggleState::new(true); 2];
        let sync = AriaSynchronizer::new(AriaFamily::Toggle);

        assert!(matches!(
            sync.sync(&mut doc, &items, &states, SyncScope::Changed(2)),
            Err(WidgetError::IndexOutOfRange { index: 2, len: 2 })
        ));
        assert!(doc.mutations().is_empty());
    }

    #[test]
    fn test_second_pass_is_noop() {
        let (mut doc, items) = group("div", 3);
        let states = vec![ToggleState::new(true), ToggleState::new(false), ToggleState::new(true)];
        let sync = AriaSynchronizer::new(AriaFamily::Toggle);

        assert_eq!(sync.sync(&mut doc, &items, &states, SyncScope::All).unwrap().writes, 3);
        doc.take_mutations();
        assert!(sync.sync(&mut doc, &items, &states, SyncScope::All).unwrap().is_noop());
        assert!(doc.mutations().is_empty());
    }

    #[test]
    fn test_labels_follow_state() {
        let (mut doc, items) = group("div", 1);
        let sync = AriaSynchronizer::new(AriaFamily::Checkbox);

        let on = [CheckboxState::new(true).with_labels("Subscribed", "Not subscribed")];
        sync.sync(&mut doc, &items, &on, SyncScope::Changed(0)).unwrap();
        assert_eq!(doc.get_attribute(items[0], "aria-label").as_deref(), Some("Subscribed"));

        let off = [CheckboxState::new(false).with_labels("Subscribed", "Not subscribed")];
        let report = sync.sync(&mut doc, &items, &off, SyncScope::Changed(0)).unwrap();
        assert_eq!(report.writes, 2);
        assert_eq!(doc.get_attribute(items[0], "aria-checked").as_deref(), Some("false"));
        assert_eq!(doc.get_attribute(items[0], "aria-label").as_deref(), Some("Not subscribed"));
    }

    #[test]
    fn test_exclusive_moves_roving_tabindex() {
        let (mut doc, items) = group("div", 3);
        let sync = AriaSynchronizer::new(AriaFamily::Radio);
        let states = |active: usize| -> Vec<RadioState> {
            (0..3).map(|i| RadioState::new(i == active)).collect()
        };

        sync.sync(&mut doc, &items, &states(0), SyncScope::All).unwrap();
        sync.sync(&mut doc, &items, &states(2), SyncScope::Changed(2)).unwrap();

        let attr = |doc: &HeadlessDocument, i: usize, name: &str| doc.get_attribute(items[i], name);
        assert_eq!(attr(&doc, 0, "aria-checked").as_deref(), Some("false"));
        assert_eq!(attr(&doc, 0, "tabindex").as_deref(), Some("-1"));
        assert_eq!(attr(&doc, 2, "aria-checked").as_deref(), Some("true"));
        assert_eq!(attr(&doc, 2, "tabindex").as_deref(), Some("0"));
        assert_eq!(attr(&doc, 1, "tabindex").as_deref(), Some("-1"));
    }

    #[test]
    fn test_exclusive_all_without_active_keeps_first_tabbable() {
        let (mut doc, items) = group("div", 2);
        let sync = AriaSynchronizer::new(AriaFamily::Radio);
        let states = vec![RadioState::new(false); 2];

        sync.sync(&mut doc, &items, &states, SyncScope::All).unwrap();
        assert_eq!(doc.get_attribute(items[0], "tabindex").as_deref(), Some("0"));
        assert_eq!(doc.get_attribute(items[1], "tabindex").as_deref(), Some("-1"));
    }

    #[test]
    fn test_single_open_accordion_forces_others_closed() {
        let (mut doc, items) = group("button", 3);
        let sync = AriaSynchronizer::new(AriaFamily::Accordion).exclusive(true);

        let all_open = vec![AccordionState::new(true); 3];
        sync.sync(&mut doc, &items, &all_open, SyncScope::Changed(1)).unwrap();

        assert_eq!(doc.get_attribute(items[0], "aria-expanded").as_deref(), Some("false"));
        assert_eq!(doc.get_attribute(items[1], "aria-expanded").as_deref(), Some("true"));
        assert_eq!(doc.get_attribute(items[2], "aria-expanded").as_deref(), Some("false"));
        assert_eq!(doc.get_attribute(items[0], "tabindex"), None);
    }

    #[test]
    fn test_standalone_update_reports_resolution_errors() {
        let (mut doc, _) = group("div", 2);
        let states = vec![ToggleState::new(true); 2];
        assert!(matches!(
            update_toggle_aria(&mut doc, "missing", "item", &states, 0),
            Err(WidgetError::Resolution(_))
        ));
        assert_eq!(update_toggle_aria(&mut doc, "group", "item", &states, 1).unwrap().writes, 1);
    }

    #[test]
    fn test_checkbox_update_from_json_states() {
        let (mut doc, items) = group("div", 2);
        let states: Vec<CheckboxState> = serde_json::from_str(
            r#"[{"checked": false}, {"checked": true, "labelOn": "Subscribed", "labelOff": "Not subscribed"}]"#,
        )
        .unwrap();

        let report = update_checkbox_aria(&mut doc, "#group", ".item", &states, 1).unwrap();
        assert_eq!(report.writes, 2);
        assert_eq!(doc.get_attribute(items[1], "aria-checked").as_deref(), Some("true"));
        assert_eq!(doc.get_attribute(items[1], "aria-label").as_deref(), Some("Subscribed"));
        // Only the changed index is touched
        assert_eq!(doc.get_attribute(items[0], "aria-checked"), None);
    }

    #[test]
    fn test_menu_trigger_update() {
        let mut doc = HeadlessDocument::new();
        let root = doc.root();
        let trigger = doc.append_element(root, "button", &[("id", "menu-btn")]).unwrap();
        let labels = TriggerLabels::new("Close menu", "Open menu");

        let report = update_menu_trigger_aria(&mut doc, "#menu-btn", true, Some(&labels)).unwrap();
        assert_eq!(report.writes, 2);
        assert_eq!(doc.get_attribute(trigger, "aria-expanded").as_deref(), Some("true"));
        assert_eq!(doc.get_attribute(trigger, "aria-label").as_deref(), Some("Close menu"));
        assert!(update_menu_trigger_aria(&mut doc, "menu-btn", true, Some(&labels)).unwrap().is_noop());
    }
}
