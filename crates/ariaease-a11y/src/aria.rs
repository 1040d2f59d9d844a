//! ARIA Support
//!
//! Roles the widgets assign and the per-family attribute vocabulary.

/// `aria-expanded`
pub const ARIA_EXPANDED: &str = "aria-expanded";
/// `aria-checked`
pub const ARIA_CHECKED: &str = "aria-checked";
/// `aria-pressed`
pub const ARIA_PRESSED: &str = "aria-pressed";
/// `aria-label`
pub const ARIA_LABEL: &str = "aria-label";
pub const ARIA_CONTROLS: &str = "aria-controls";
pub const ARIA_HASPOPUP: &str = "aria-haspopup";
pub const ARIA_LABELLEDBY: &str = "aria-labelledby";
pub const ROLE: &str = "role";
pub const TABINDEX: &str = "tabindex";

/// ARIA role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AriaRole {
    // Widget roles
    Button,
    Checkbox,
    Menu,
    MenuItem,
    Radio,
    RadioGroup,

    // Document structure
    Group,
    Region,
}

impl AriaRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Button => "button",
            Self::Checkbox => "checkbox",
            Self::Menu => "menu",
            Self::MenuItem => "menuitem",
            Self::Radio => "radio",
            Self::RadioGroup => "radiogroup",
            Self::Group => "group",
            Self::Region => "region",
        }
    }
}

impl std::fmt::Display for AriaRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Widget family attribute vocabulary
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AriaFamily {
    Accordion,
    Radio,
    Checkbox,
    Toggle,
}

impl AriaFamily {
    /// Attribute carrying the item's primary state
    pub fn primary_attribute(&self) -> &'static str {
        match self {
            Self::Accordion => ARIA_EXPANDED,
            Self::Radio | Self::Checkbox => ARIA_CHECKED,
            Self::Toggle => ARIA_PRESSED,
        }
    }

    /// Turning one item on turns every other item off
    pub fn is_exclusive(&self) -> bool {
        matches!(self, Self::Radio)
    }

    /// Exactly one item is in the tab sequence
    pub fn uses_roving_tabindex(&self) -> bool {
        matches!(self, Self::Radio)
    }

    /// Role given to the container when it has none
    pub fn container_role(&self) -> Option<AriaRole> {
        match self {
            Self::Radio => Some(AriaRole::RadioGroup),
            Self::Checkbox => Some(AriaRole::Group),
            Self::Accordion | Self::Toggle => None,
        }
    }

    /// Role given to items when they have none
    pub fn item_role(&self) -> Option<AriaRole> {
        match self {
            Self::Radio => Some(AriaRole::Radio),
            Self::Checkbox => Some(AriaRole::Checkbox),
            Self::Toggle => Some(AriaRole::Button),
            Self::Accordion => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Accordion => "accordion",
            Self::Radio => "radio",
            Self::Checkbox => "checkbox",
            Self::Toggle => "toggle",
        }
    }
}

/// ARIA boolean token
#[inline]
pub fn bool_token(value: bool) -> &'static str {
    if value { "true" } else { "false" }
}

/// Parse an ARIA boolean; `mixed` and garbage read as false
#[inline]
pub fn parse_bool_token(value: Option<&str>) -> bool {
    matches!(value.map(str::trim), Some("true"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_tokens() {
        assert_eq!(AriaRole::RadioGroup.as_str(), "radiogroup");
        assert_eq!(AriaRole::MenuItem.as_str(), "menuitem");
        assert_eq!(AriaRole::Checkbox.to_string(), "checkbox");
    }

    #[test]
    fn test_family_vocabulary() {
        assert_eq!(AriaFamily::Accordion.primary_attribute(), "aria-expanded");
        assert_eq!(AriaFamily::Radio.primary_attribute(), "aria-checked");
        assert_eq!(AriaFamily::Checkbox.primary_attribute(), "aria-checked");
        assert_eq!(AriaFamily::Toggle.primary_attribute(), "aria-pressed");

        assert!(AriaFamily::Radio.is_exclusive());
        assert!(!AriaFamily::Checkbox.is_exclusive());
        assert_eq!(AriaFamily::Radio.container_role(), Some(AriaRole::RadioGroup));
        assert_eq!(AriaFamily::Accordion.item_role(), None);
    }

    #[test]
    fn test_bool_tokens() {
        assert_eq!(bool_token(true), "true");
        assert!(parse_bool_token(Some("true")));
        assert!(!parse_bool_token(Some("mixed")));
        assert!(!parse_bool_token(None));
    }
}
