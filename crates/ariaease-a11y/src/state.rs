//! State Records
//!
//! Caller-owned per-item state snapshots. Controllers and the synchronizer
//! only read them.

use serde::{Deserialize, Serialize};

/// Per-item state read by the synchronizer
pub trait ItemState {
    /// Primary flag (`display` / `checked` / `pressed`)
    fn primary(&self) -> bool;

    /// Label announced while the flag is on
    fn label_on(&self) -> Option<&str> {
        None
    }

    /// Label announced while the flag is off
    fn label_off(&self) -> Option<&str> {
        None
    }

    /// Label matching a given flag value
    fn label_for(&self, on: bool) -> Option<&str> {
        if on { self.label_on() } else { self.label_off() }
    }
}

macro_rules! item_state {
    ($(#[$doc:meta])* $name:ident, $flag:ident) => {
        $(#[$doc])*
        #[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
        #[serde(rename_all = "camelCase")]
        pub struct $name {
            pub $flag: bool,
            #[serde(default, skip_serializing_if = "Option::is_none")]
            pub label_on: Option<String>,
            #[serde(default, skip_serializing_if = "Option::is_none")]
            pub label_off: Option<String>,
        }

        impl $name {
            pub fn new($flag: bool) -> Self {
                Self { $flag, ..Self::default() }
            }

            pub fn with_labels(mut self, on: &str, off: &str) -> Self {
                self.label_on = Some(on.to_string());
                self.label_off = Some(off.to_string());
                self
            }
        }

        impl ItemState for $name {
            fn primary(&self) -> bool {
                self.$flag
            }
            fn label_on(&self) -> Option<&str> {
                self.label_on.as_deref()
            }
            fn label_off(&self) -> Option<&str> {
                self.label_off.as_deref()
            }
        }
    };
}

item_state!(
    /// Accordion trigger state
    AccordionState,
    display
);
item_state!(
    /// Radio state
    RadioState,
    checked
);
item_state!(
    /// Checkbox state
    CheckboxState,
    checked
);
item_state!(
    /// Toggle button state
    ToggleState,
    pressed
);

/// `aria-label` values for a menu trigger
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TriggerLabels {
    /// Label while the menu is open (e.g. "Close menu")
    pub open: String,
    /// Label while the menu is closed (e.g. "Open menu")
    pub closed: String,
}

impl TriggerLabels {
    pub fn new(open: &str, closed: &str) -> Self {
        Self {
            open: open.to_string(),
            closed: closed.to_string(),
        }
    }

    pub fn for_state(&self, open: bool) -> &str {
        if open { &self.open } else { &self.closed }
    }
}
