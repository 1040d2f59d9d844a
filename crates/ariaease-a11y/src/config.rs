//! Widget Configuration
//!
//! Attach options for each widget family. Field names deserialize from the
//! camelCase option objects host pages already pass around.

use serde::{Deserialize, Serialize};

use crate::TriggerLabels;

/// Accordion options
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AccordionConfig {
    #[serde(alias = "containerId")]
    pub accordion_id: String,
    #[serde(alias = "itemsClass")]
    pub triggers_class: String,
    /// Panels paired with triggers by position
    pub panels_class: Option<String>,
    pub allow_multiple_open: bool,
}

impl AccordionConfig {
    pub fn new(accordion_id: &str, triggers_class: &str) -> Self {
        Self {
            accordion_id: accordion_id.to_string(),
            triggers_class: triggers_class.to_string(),
            ..Self::default()
        }
    }

    pub fn panels(mut self, panels_class: &str) -> Self {
        self.panels_class = Some(panels_class.to_string());
        self
    }

    pub fn allow_multiple_open(mut self, allow: bool) -> Self {
        self.allow_multiple_open = allow;
        self
    }
}

/// Menu options
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MenuConfig {
    #[serde(alias = "containerId")]
    pub menu_id: String,
    pub items_class: String,
    pub trigger_id: String,
    pub labels: Option<TriggerLabels>,
}

impl MenuConfig {
    pub fn new(menu_id: &str, items_class: &str, trigger_id: &str) -> Self {
        Self {
            menu_id: menu_id.to_string(),
            items_class: items_class.to_string(),
            trigger_id: trigger_id.to_string(),
            labels: None,
        }
    }

    pub fn labels(mut self, open: &str, closed: &str) -> Self {
        self.labels = Some(TriggerLabels::new(open, closed));
        self
    }
}

/// Radio group options
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RadioConfig {
    #[serde(alias = "containerId")]
    pub group_id: String,
    #[serde(alias = "itemsClass")]
    pub radios_class: String,
    pub default_selected_index: usize,
}

impl RadioConfig {
    pub fn new(group_id: &str, radios_class: &str) -> Self {
        Self {
            group_id: group_id.to_string(),
            radios_class: radios_class.to_string(),
            default_selected_index: 0,
        }
    }

    pub fn selected(mut self, index: usize) -> Self {
        self.default_selected_index = index;
        self
    }
}

/// Checkbox group options
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CheckboxConfig {
    #[serde(alias = "containerId")]
    pub group_id: String,
    #[serde(alias = "itemsClass")]
    pub checkboxes_class: String,
}

impl CheckboxConfig {
    pub fn new(group_id: &str, checkboxes_class: &str) -> Self {
        Self {
            group_id: group_id.to_string(),
            checkboxes_class: checkboxes_class.to_string(),
        }
    }
}

/// Toggle options. With `is_single_toggle` only `toggle_id` is used.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ToggleConfig {
    pub container_id: String,
    #[serde(alias = "itemsClass")]
    pub toggles_class: String,
    pub is_single_toggle: bool,
    pub toggle_id: String,
}

impl ToggleConfig {
    pub fn group(container_id: &str, toggles_class: &str) -> Self {
        Self {
            container_id: container_id.to_string(),
            toggles_class: toggles_class.to_string(),
            ..Self::default()
        }
    }

    pub fn single(toggle_id: &str) -> Self {
        Self {
            is_single_toggle: true,
            toggle_id: toggle_id.to_string(),
            ..Self::default()
        }
    }
}

/// Block options
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BlockConfig {
    #[serde(alias = "containerId")]
    pub block_id: String,
    pub items_class: String,
}

impl BlockConfig {
    pub fn new(block_id: &str, items_class: &str) -> Self {
        Self {
            block_id: block_id.to_string(),
            items_class: items_class.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_radio_config_from_json() {
        let config: RadioConfig = serde_json::from_str(
            r#"{"groupId": "plans", "radiosClass": "plan", "defaultSelectedIndex": 2}"#,
        )
        .unwrap();
        assert_eq!(config, RadioConfig::new("plans", "plan").selected(2));
    }

    #[test]
    fn test_aliases_and_defaults() {
        let config: AccordionConfig =
            serde_json::from_str(r#"{"containerId": "faq", "itemsClass": "q"}"#).unwrap();
        assert_eq!(config.accordion_id, "faq");
        assert_eq!(config.triggers_class, "q");
        assert!(!config.allow_multiple_open);
        assert_eq!(config.panels_class, None);
    }

    #[test]
    fn test_menu_config_labels() {
        let config: MenuConfig = serde_json::from_str(
            r#"{"menuId": "m", "itemsClass": "mi", "triggerId": "t",
                "labels": {"open": "Close menu", "closed": "Open menu"}}"#,
        )
        .unwrap();
        assert_eq!(config, MenuConfig::new("m", "mi", "t").labels("Close menu", "Open menu"));
    }

    #[test]
    fn test_single_toggle() {
        let config: ToggleConfig =
            serde_json::from_str(r#"{"isSingleToggle": true, "toggleId": "mute"}"#).unwrap();
        assert_eq!(config, ToggleConfig::single("mute"));
    }
}
