//! AriaEase Accessibility
//!
//! Accessible widget controllers over an injected DOM.
//!
//! Features:
//! - Container/item query resolution
//! - Caret-aware roving keyboard navigation with wrap-around
//! - Diff-before-write ARIA state synchronization
//! - Instance-owned listener registries with idempotent attach
//! - Accordion, menu, radio group, checkbox group, toggle and block widgets

pub mod aria;
pub mod config;
pub mod focus;
pub mod keyboard_nav;
pub mod listeners;
pub mod query;
pub mod state;
pub mod sync;
pub mod widgets;

pub use ariaease_dom::{DomAccess, DomError, NodeId};

// Core exports
pub use aria::{AriaFamily, AriaRole};
pub use config::{
    AccordionConfig, BlockConfig, CheckboxConfig, MenuConfig, RadioConfig, ToggleConfig,
};
pub use focus::{FocusTrap, RovingFocus};
pub use keyboard_nav::{
    CLICKABLE_ATTR, ElementKind, FocusTarget, Key, KeyboardNavigator, NavOptions, NavigationAction,
};
pub use listeners::ListenerRegistry;
pub use query::{Resolved, WidgetQuery, resolve};
pub use state::{AccordionState, CheckboxState, ItemState, RadioState, ToggleState, TriggerLabels};
pub use sync::{
    AriaSynchronizer, SyncReport, SyncScope, update_accordion_aria, update_checkbox_aria,
    update_menu_trigger_aria, update_radio_aria, update_toggle_aria,
};
pub use widgets::{Accordion, Block, CheckboxGroup, Menu, RadioGroup, ToggleGroup, WidgetStatus};

/// Structural lookup failures
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ResolutionError {
    #[error("Container not found: #{0}")]
    ContainerNotFound(String),

    #[error("No items with class .{class} in #{container}")]
    NoItemsFound { container: String, class: String },

    #[error("Element not found: #{0}")]
    ElementNotFound(String),
}

/// Widget error
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WidgetError {
    #[error(transparent)]
    Resolution(#[from] ResolutionError),

    #[error("State count {states} does not match item count {items}")]
    ArityMismatch { items: usize, states: usize },

    #[error("Index {index} out of range for {len} items")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("Widget is not attached")]
    NotAttached,

    #[error("DOM error: {0}")]
    Dom(#[from] DomError),
}

pub type WidgetResult<T> = Result<T, WidgetError>;

/// Report an error through `tracing` and hand the result back unchanged.
/// Callers decide whether to propagate or swallow it.
pub(crate) fn reported<T>(widget: &'static str, result: WidgetResult<T>) -> WidgetResult<T> {
    if let Err(error) = &result {
        tracing::warn!(widget, %error, "accessibility operation skipped");
    }
    result
}

/// Bounds check shared by every index-taking operation
pub(crate) fn check_index(index: usize, len: usize) -> WidgetResult<()> {
    if index < len {
        Ok(())
    } else {
        Err(WidgetError::IndexOutOfRange { index, len })
    }
}
