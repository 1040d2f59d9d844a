//! Keyboard Navigation
//!
//! Maps a key press on a widget item to a navigation action. Arrow keys rove
//! through the items with wrap-around, unless a focused text control can
//! still move its caret in that direction. Escape releases a focus trap,
//! Enter/Space activate clickable elements that lack native activation.

use ariaease_dom::{DomAccess, DomEvent, NodeId, TextSelection};

use crate::focus::{FocusTrap, wrap_next, wrap_prev};
use crate::{WidgetResult, check_index};

/// Marks a non-semantic element as clickable from the keyboard
pub const CLICKABLE_ATTR: &str = "data-custom-click";

/// Keys the engine distinguishes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,
    Escape,
    Enter,
    Space,
    Other,
}

impl Key {
    /// Parse a `KeyboardEvent.key` value, including legacy spellings
    pub fn parse(key: &str) -> Self {
        match key {
            "ArrowUp" | "Up" => Self::ArrowUp,
            "ArrowDown" | "Down" => Self::ArrowDown,
            "ArrowLeft" | "Left" => Self::ArrowLeft,
            "ArrowRight" | "Right" => Self::ArrowRight,
            "Escape" | "Esc" => Self::Escape,
            "Enter" => Self::Enter,
            " " | "Spacebar" => Self::Space,
            _ => Self::Other,
        }
    }

    pub fn is_backward(&self) -> bool {
        matches!(self, Self::ArrowUp | Self::ArrowLeft)
    }

    pub fn is_forward(&self) -> bool {
        matches!(self, Self::ArrowDown | Self::ArrowRight)
    }
}

/// Closed classification of the focused element
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementKind {
    TextInput,
    TextArea,
    NativeButton,
    Link,
    Other,
}

impl ElementKind {
    /// Classify from tag name and `type` attribute
    pub fn classify(tag_name: &str, input_type: Option<&str>) -> Self {
        match tag_name.to_ascii_lowercase().as_str() {
            "textarea" => Self::TextArea,
            "button" => Self::NativeButton,
            "a" => Self::Link,
            "input" => {
                let input_type = input_type.map(|t| t.trim().to_ascii_lowercase());
                match input_type.as_deref().unwrap_or("text") {
                    "text" | "search" | "email" | "password" | "tel" | "url" | "number" => {
                        Self::TextInput
                    }
                    "button" | "submit" | "reset" | "image" => Self::NativeButton,
                    _ => Self::Other,
                }
            }
            _ => Self::Other,
        }
    }

    /// Arrow keys move a caret inside this element
    pub fn is_free_text(&self) -> bool {
        matches!(self, Self::TextInput | Self::TextArea)
    }

    /// Enter/Space already activate this element natively
    pub fn has_native_activation(&self) -> bool {
        matches!(self, Self::NativeButton | Self::Link)
    }
}

/// Snapshot of the element a key event targets
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FocusTarget {
    pub kind: ElementKind,
    /// Selection of free-text controls; None when unknown
    pub caret: Option<TextSelection>,
    /// Carries [`CLICKABLE_ATTR`]
    pub clickable: bool,
}

impl FocusTarget {
    pub fn new(kind: ElementKind) -> Self {
        Self {
            kind,
            caret: None,
            clickable: false,
        }
    }

    pub fn with_caret(mut self, caret: TextSelection) -> Self {
        self.caret = Some(caret);
        self
    }

    pub fn clickable(mut self) -> Self {
        self.clickable = true;
        self
    }

    /// Read the target's kind, caret and clickable marker from the DOM
    pub fn inspect<D: DomAccess>(dom: &D, node: NodeId) -> Self {
        let tag_name = dom.tag_name(node).unwrap_or_default();
        let input_type = dom.get_attribute(node, "type");
        let kind = ElementKind::classify(&tag_name, input_type.as_deref());
        Self {
            kind,
            caret: kind.is_free_text().then(|| dom.text_selection(node)).flatten(),
            clickable: dom.has_attribute(node, CLICKABLE_ATTR),
        }
    }

    // An unknown caret counts as movable so native editing wins
    fn caret_at_start(&self) -> bool {
        self.caret.as_ref().is_some_and(TextSelection::at_start)
    }

    fn caret_at_end(&self) -> bool {
        self.caret.as_ref().is_some_and(TextSelection::at_end)
    }
}

/// Engine options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NavOptions {
    /// Enter/Space synthesize a click on clickable non-native elements
    pub activate_clickables: bool,
    /// Treat every widget item as clickable, marked or not
    pub items_clickable: bool,
}

impl Default for NavOptions {
    fn default() -> Self {
        Self {
            activate_clickables: true,
            items_clickable: false,
        }
    }
}

/// Outcome of one key press
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigationAction {
    /// Key is not handled; native behavior unaffected
    Ignore,
    /// A text control keeps the key for caret movement
    NativeCaret,
    /// Move focus between items
    MoveFocus { from: usize, to: usize },
    /// Synthesize a click on the focused element
    Activate,
    /// Release the focus trap
    Dismiss,
    /// Trap configured but already closed: focus goes back to the trigger
    RestoreFocus,
    /// Default suppressed, nothing else
    Suppress,
}

impl NavigationAction {
    pub fn prevents_default(&self) -> bool {
        !matches!(self, Self::Ignore | Self::NativeCaret)
    }
}

/// Keyboard navigation engine
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct KeyboardNavigator {
    options: NavOptions,
}

impl KeyboardNavigator {
    pub fn new(options: NavOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> NavOptions {
        self.options
    }

    /// Decide the action for `key` on item `active_index` of `item_count`.
    /// `trap_visible` is None when no dismissal path is configured.
    pub fn on_key(
        &self,
        key: Key,
        target: &FocusTarget,
        item_count: usize,
        active_index: usize,
        trap_visible: Option<bool>,
    ) -> WidgetResult<NavigationAction> {
        check_index(active_index, item_count)?;

        let action = match key {
            Key::ArrowUp | Key::ArrowLeft => {
                if target.kind.is_free_text() && !target.caret_at_start() {
                    NavigationAction::NativeCaret
                } else {
                    NavigationAction::MoveFocus {
                        from: active_index,
                        to: wrap_prev(active_index, item_count),
                    }
                }
            }
            Key::ArrowDown | Key::ArrowRight => {
                if target.kind.is_free_text() && !target.caret_at_end() {
                    NavigationAction::NativeCaret
                } else {
                    NavigationAction::MoveFocus {
                        from: active_index,
                        to: wrap_next(active_index, item_count),
                    }
                }
            }
            Key::Escape => match trap_visible {
                Some(true) => NavigationAction::Dismiss,
                Some(false) => NavigationAction::RestoreFocus,
                None => NavigationAction::Suppress,
            },
            Key::Enter | Key::Space => {
                let marked = target.clickable || self.options.items_clickable;
                if self.options.activate_clickables && marked && !target.kind.has_native_activation() {
                    NavigationAction::Activate
                } else {
                    NavigationAction::Ignore
                }
            }
            Key::Other => NavigationAction::Ignore,
        };

        Ok(action)
    }
}

/// Run the engine for a keydown delivered to `item`'s listener and apply
/// the resulting focus movement, activation or trap release. Returns the
/// action so controllers can layer selection on top of it.
pub fn dispatch_key<D: DomAccess>(
    dom: &mut D,
    event: &mut DomEvent,
    item: NodeId,
    items: &[NodeId],
    navigator: &KeyboardNavigator,
    trap: Option<&FocusTrap>,
) -> WidgetResult<NavigationAction> {
    let Some(key) = event.key().map(Key::parse) else {
        return Ok(NavigationAction::Ignore);
    };
    let Some(active) = items.iter().position(|&n| n == item) else {
        tracing::debug!(item = %item, "keydown on an element that is no longer a widget item");
        return Ok(NavigationAction::Ignore);
    };

    let target = FocusTarget::inspect(dom, event.target);
    let trap_visible = trap.map(|t| t.is_active(dom));
    let action = navigator.on_key(key, &target, items.len(), active, trap_visible)?;

    if action.prevents_default() {
        event.prevent_default();
    }

    match action {
        NavigationAction::MoveFocus { to, .. } => dom.focus(items[to])?,
        NavigationAction::Activate => {
            dom.click(event.target)?;
        }
        NavigationAction::Dismiss => {
            if let Some(trap) = trap {
                trap.release(dom)?;
            }
        }
        NavigationAction::RestoreFocus => {
            if let Some(trap) = trap {
                trap.restore_focus(dom)?;
            }
        }
        NavigationAction::Ignore | NavigationAction::NativeCaret | NavigationAction::Suppress => {}
    }

    Ok(action)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::WidgetError;

    fn other() -> FocusTarget {
        FocusTarget::new(ElementKind::Other)
    }

    fn input_with_caret(value: &str, caret: usize) -> FocusTarget {
        let mut sel = TextSelection::with_value(value);
        sel.select(caret, caret);
        FocusTarget::new(ElementKind::TextInput).with_caret(sel)
    }

    #[test]
    fn test_key_parse() {
        assert_eq!(Key::parse("ArrowUp"), Key::ArrowUp);
        assert_eq!(Key::parse("Esc"), Key::Escape);
        assert_eq!(Key::parse(" "), Key::Space);
        assert_eq!(Key::parse("Spacebar"), Key::Space);
        assert_eq!(Key::parse("Tab"), Key::Other);
        assert!(Key::ArrowLeft.is_backward());
        assert!(Key::ArrowRight.is_forward());
    }

    #[test]
    fn test_classify() {
        assert_eq!(ElementKind::classify("INPUT", None), ElementKind::TextInput);
        assert_eq!(ElementKind::classify("input", Some("Email")), ElementKind::TextInput);
        assert_eq!(ElementKind::classify("input", Some("submit")), ElementKind::NativeButton);
        assert_eq!(ElementKind::classify("input", Some("checkbox")), ElementKind::Other);
        assert_eq!(ElementKind::classify("textarea", None), ElementKind::TextArea);
        assert_eq!(ElementKind::classify("a", None), ElementKind::Link);
        assert_eq!(ElementKind::classify("li", None), ElementKind::Other);
    }

    #[test]
    fn test_wrap_around() {
        let nav = KeyboardNavigator::default();
        assert_eq!(
            nav.on_key(Key::ArrowUp, &other(), 4, 0, None).unwrap(),
            NavigationAction::MoveFocus { from: 0, to: 3 }
        );
        assert_eq!(
            nav.on_key(Key::ArrowDown, &other(), 4, 3, None).unwrap(),
            NavigationAction::MoveFocus { from: 3, to: 0 }
        );
        assert_eq!(
            nav.on_key(Key::ArrowRight, &other(), 4, 1, None).unwrap(),
            NavigationAction::MoveFocus { from: 1, to: 2 }
        );
    }

    #[test]
    fn test_caret_keeps_arrow_inside_text() {
        let nav = KeyboardNavigator::default();

        // caret mid-value: both directions stay in the input
        let mid = input_with_caret("hello", 2);
        assert_eq!(nav.on_key(Key::ArrowLeft, &mid, 3, 1, None).unwrap(), NavigationAction::NativeCaret);
        assert_eq!(nav.on_key(Key::ArrowRight, &mid, 3, 1, None).unwrap(), NavigationAction::NativeCaret);

        // caret at 0: left leaves, right stays
        let start = input_with_caret("hello", 0);
        assert_eq!(
            nav.on_key(Key::ArrowLeft, &start, 3, 1, None).unwrap(),
            NavigationAction::MoveFocus { from: 1, to: 0 }
        );
        assert_eq!(nav.on_key(Key::ArrowRight, &start, 3, 1, None).unwrap(), NavigationAction::NativeCaret);

        // caret at end: right leaves, left stays
        let end = input_with_caret("hello", 5);
        assert_eq!(nav.on_key(Key::ArrowLeft, &end, 3, 1, None).unwrap(), NavigationAction::NativeCaret);
        assert_eq!(
            nav.on_key(Key::ArrowRight, &end, 3, 1, None).unwrap(),
            NavigationAction::MoveFocus { from: 1, to: 2 }
        );
    }

    #[test]
    fn test_unknown_caret_defers_to_native() {
        let nav = KeyboardNavigator::default();
        let target = FocusTarget::new(ElementKind::TextArea);
        assert_eq!(nav.on_key(Key::ArrowUp, &target, 2, 0, None).unwrap(), NavigationAction::NativeCaret);
    }

    #[test]
    fn test_escape() {
        let nav = KeyboardNavigator::default();
        assert_eq!(nav.on_key(Key::Escape, &other(), 2, 0, Some(true)).unwrap(), NavigationAction::Dismiss);
        assert_eq!(nav.on_key(Key::Escape, &other(), 2, 0, Some(false)).unwrap(), NavigationAction::RestoreFocus);
        assert_eq!(nav.on_key(Key::Escape, &other(), 2, 0, None).unwrap(), NavigationAction::Suppress);
        assert!(NavigationAction::Suppress.prevents_default());
    }

    #[test]
    fn test_activation() {
        let nav = KeyboardNavigator::default();
        assert_eq!(nav.on_key(Key::Enter, &other().clickable(), 2, 0, None).unwrap(), NavigationAction::Activate);
        assert_eq!(nav.on_key(Key::Space, &other(), 2, 0, None).unwrap(), NavigationAction::Ignore);

        let button = FocusTarget::new(ElementKind::NativeButton).clickable();
        assert_eq!(nav.on_key(Key::Enter, &button, 2, 0, None).unwrap(), NavigationAction::Ignore);

        let link = FocusTarget::new(ElementKind::Link).clickable();
        assert_eq!(nav.on_key(Key::Space, &link, 2, 0, None).unwrap(), NavigationAction::Ignore);

        let input = FocusTarget::new(ElementKind::TextInput).clickable();
        assert_eq!(nav.on_key(Key::Enter, &input, 2, 0, None).unwrap(), NavigationAction::Activate);

        let items = KeyboardNavigator::new(NavOptions { items_clickable: true, ..NavOptions::default() });
        assert_eq!(items.on_key(Key::Space, &other(), 2, 0, None).unwrap(), NavigationAction::Activate);

        let off = KeyboardNavigator::new(NavOptions { activate_clickables: false, items_clickable: true });
        assert_eq!(off.on_key(Key::Enter, &other().clickable(), 2, 0, None).unwrap(), NavigationAction::Ignore);
    }

    #[test]
    fn test_other_keys_ignored() {
        let nav = KeyboardNavigator::default();
        let action = nav.on_key(Key::Other, &other(), 2, 0, Some(true)).unwrap();
        assert_eq!(action, NavigationAction::Ignore);
        assert!(!action.prevents_default());
    }

    #[test]
    fn test_out_of_range_index() {
        let nav = KeyboardNavigator::default();
        assert_eq!(
            nav.on_key(Key::ArrowDown, &other(), 3, 3, None),
            Err(WidgetError::IndexOutOfRange { index: 3, len: 3 })
        );
        assert!(nav.on_key(Key::ArrowDown, &other(), 0, 0, None).is_err());
    }
}
