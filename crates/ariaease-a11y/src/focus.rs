//! Focus Management
//!
//! Roving selection state, roving tabindex values and menu focus traps.

use ariaease_dom::{Display, DomAccess, NodeId};

use crate::sync::sync_trigger;
use crate::{TriggerLabels, WidgetResult, check_index};

/// Index after `index`, wrapping to 0
#[inline]
pub fn wrap_next(index: usize, len: usize) -> usize {
    if len == 0 { 0 } else { (index + 1) % len }
}

/// Index before `index`, wrapping to `len - 1`
#[inline]
pub fn wrap_prev(index: usize, len: usize) -> usize {
    if len == 0 { 0 } else { (index + len - 1) % len }
}

/// Single active index over `len` items ("roving focus")
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RovingFocus {
    index: usize,
    len: usize,
}

impl RovingFocus {
    pub fn new(len: usize, index: usize) -> WidgetResult<Self> {
        check_index(index, len)?;
        Ok(Self { index, len })
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Move the active index, returning the previous one. Out-of-range
    /// indices leave the state untouched.
    pub fn select(&mut self, index: usize) -> WidgetResult<usize> {
        check_index(index, self.len)?;
        Ok(std::mem::replace(&mut self.index, index))
    }

    pub fn next(&self) -> usize {
        wrap_next(self.index, self.len)
    }

    pub fn prev(&self) -> usize {
        wrap_prev(self.index, self.len)
    }

    /// Track a new item count, clamping the active index
    pub fn resize(&mut self, len: usize) {
        self.len = len;
        if self.index >= len {
            self.index = len.saturating_sub(1);
        }
    }
}

/// Roving tabindex value for an item
#[inline]
pub fn roving_tabindex(active: bool) -> &'static str {
    if active { "0" } else { "-1" }
}

/// Container that holds focus until dismissed, returning focus to its trigger
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FocusTrap {
    pub container: NodeId,
    pub trigger: NodeId,
    pub labels: Option<TriggerLabels>,
}

impl FocusTrap {
    pub fn new(container: NodeId, trigger: NodeId) -> Self {
        Self {
            container,
            trigger,
            labels: None,
        }
    }

    pub fn with_labels(mut self, labels: Option<TriggerLabels>) -> Self {
        self.labels = labels;
        self
    }

    /// The trapping container is currently rendered
    pub fn is_active<D: DomAccess>(&self, dom: &D) -> bool {
        dom.computed_display(self.container)
            .is_some_and(|display| display.is_visible())
    }

    /// Collapse the container, mark the trigger closed and focus it
    pub fn release<D: DomAccess>(&self, dom: &mut D) -> WidgetResult<()> {
        dom.set_display(self.container, Display::None)?;
        sync_trigger(dom, self.trigger, false, self.labels.as_ref())?;
        self.restore_focus(dom)
    }

    pub fn restore_focus<D: DomAccess>(&self, dom: &mut D) -> WidgetResult<()> {
        dom.focus(self.trigger)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::WidgetError;
    use ariaease_dom::HeadlessDocument;

    #[test]
    fn test_wrap_around() {
        assert_eq!(wrap_next(2, 3), 0);
        assert_eq!(wrap_prev(0, 3), 2);
        assert_eq!(wrap_next(0, 1), 0);
        assert_eq!(wrap_prev(0, 0), 0);
    }

    #[test]
    fn test_roving_focus_select() {
        let mut roving = RovingFocus::new(3, 0).unwrap();
        assert_eq!(roving.prev(), 2);
        assert_eq!(roving.select(2).unwrap(), 0);
        assert_eq!(roving.next(), 0);

        assert_eq!(
            roving.select(3),
            Err(WidgetError::IndexOutOfRange { index: 3, len: 3 })
        );
        assert_eq!(roving.index(), 2);
    }

    #[test]
    fn test_roving_focus_resize() {
        let mut roving = RovingFocus::new(4, 3).unwrap();
        roving.resize(2);
        assert_eq!(roving.index(), 1);
        assert!(RovingFocus::new(0, 0).is_err());
    }

    #[test]
    fn test_roving_tabindex() {
        assert_eq!(roving_tabindex(true), "0");
        assert_eq!(roving_tabindex(false), "-1");
    }

    #[test]
    fn test_focus_trap_release() {
        let mut doc = HeadlessDocument::new();
        let root = doc.root();
        let trigger = doc.append_element(root, "button", &[("id", "t")]).unwrap();
        let menu = doc.append_element(root, "ul", &[("id", "m")]).unwrap();

        let trap = FocusTrap::new(menu, trigger)
            .with_labels(Some(TriggerLabels::new("Close menu", "Open menu")));
        assert!(trap.is_active(&doc));

        trap.release(&mut doc).unwrap();
        assert!(!trap.is_active(&doc));
        assert_eq!(doc.active_element(), Some(trigger));
        assert_eq!(doc.get_attribute(trigger, "aria-expanded").as_deref(), Some("false"));
        assert_eq!(doc.get_attribute(trigger, "aria-label").as_deref(), Some("Open menu"));
    }
}
