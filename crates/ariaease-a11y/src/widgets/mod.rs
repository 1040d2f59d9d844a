//! Widget Controllers
//!
//! Attach/interact/cleanup lifecycle shared by every widget family. A
//! controller handle is cheap to clone; clones share state, and the
//! listeners it installs hold a clone so they keep working without it.

mod accordion;
mod block;
mod checkbox;
mod menu;
mod radio;
mod toggle;

pub use accordion::Accordion;
pub use block::Block;
pub use checkbox::CheckboxGroup;
pub use menu::Menu;
pub use radio::RadioGroup;
pub use toggle::ToggleGroup;

use ariaease_dom::{DomAccess, DomEvent, EventKind, NodeId, listener};

use crate::aria::{AriaFamily, AriaRole, ROLE};
use crate::query::Resolved;
use crate::{ListenerRegistry, WidgetError, WidgetResult};

/// Controller lifecycle state
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum WidgetStatus {
    #[default]
    Unattached,
    Attached,
    /// Attach failed; operations return [`WidgetError::NotAttached`]
    Inert(WidgetError),
    /// `cleanup()` ran
    Detached,
}

impl WidgetStatus {
    pub fn is_attached(&self) -> bool {
        matches!(self, Self::Attached)
    }

    pub fn is_inert(&self) -> bool {
        matches!(self, Self::Inert(_))
    }
}

/// Status plus the listeners owned by one controller instance
#[derive(Debug, Default)]
pub(crate) struct Lifecycle {
    status: WidgetStatus,
    pub(crate) listeners: ListenerRegistry,
}

impl Lifecycle {
    pub(crate) fn status(&self) -> WidgetStatus {
        self.status.clone()
    }

    pub(crate) fn ensure_attached(&self) -> WidgetResult<()> {
        if self.status.is_attached() {
            Ok(())
        } else {
            Err(WidgetError::NotAttached)
        }
    }

    /// Record the outcome of an attach pass. A failed pass leaves no
    /// listeners behind.
    pub(crate) fn settle<D: DomAccess>(
        &mut self,
        dom: &mut D,
        widget: &'static str,
        result: &WidgetResult<()>,
    ) {
        match result {
            Ok(()) => {
                self.status = WidgetStatus::Attached;
                tracing::debug!(widget, listeners = self.listeners.len(), "attached");
            }
            Err(error) => {
                self.listeners.clear(dom);
                self.status = WidgetStatus::Inert(error.clone());
            }
        }
    }

    pub(crate) fn cleanup<D: DomAccess>(&mut self, dom: &mut D, widget: &'static str) -> usize {
        let removed = self.listeners.clear(dom);
        if self.status.is_attached() {
            self.status = WidgetStatus::Detached;
        }
        tracing::debug!(widget, removed, "cleanup");
        removed
    }
}

/// Event handler bound to one item: `(handle, dom, event, item)`
pub(crate) type Handler<H, D> = fn(&H, &mut D, &mut DomEvent, NodeId);

/// Bind `handler` on `node` unless the registry already holds a listener
/// for `(node, kind)`
pub(crate) fn bind_handler<H, D>(
    handle: &H,
    registry: &mut ListenerRegistry,
    dom: &mut D,
    node: NodeId,
    kind: EventKind,
    handler: Handler<H, D>,
) -> WidgetResult<bool>
where
    H: Clone + 'static,
    D: DomAccess,
{
    registry.bind(dom, node, kind, || {
        let handle = handle.clone();
        listener(move |dom: &mut D, event: &mut DomEvent| handler(&handle, dom, event, node))
    })
}

/// Set `name` only when the element has no value for it yet
pub(crate) fn ensure_attr<D: DomAccess>(
    dom: &mut D,
    node: NodeId,
    name: &str,
    value: &str,
) -> WidgetResult<bool> {
    if dom.has_attribute(node, name) {
        return Ok(false);
    }
    dom.set_attribute(node, name, value)?;
    Ok(true)
}

pub(crate) fn ensure_role<D: DomAccess>(dom: &mut D, node: NodeId, role: AriaRole) -> WidgetResult<bool> {
    ensure_attr(dom, node, ROLE, role.as_str())
}

/// Give the container and items their family roles where the markup has none
pub(crate) fn ensure_family_roles<D: DomAccess>(
    dom: &mut D,
    family: AriaFamily,
    resolved: &Resolved,
) -> WidgetResult<()> {
    if let Some(role) = family.container_role() {
        ensure_role(dom, resolved.container, role)?;
    }
    if let Some(role) = family.item_role() {
        for &item in &resolved.items {
            ensure_role(dom, item, role)?;
        }
    }
    Ok(())
}

/// Native `<button>` or button-typed `<input>`
pub(crate) fn is_native_button<D: DomAccess>(dom: &D, node: NodeId) -> bool {
    let tag_name = dom.tag_name(node).unwrap_or_default();
    let input_type = dom.get_attribute(node, "type");
    crate::ElementKind::classify(&tag_name, input_type.as_deref()) == crate::ElementKind::NativeButton
}
