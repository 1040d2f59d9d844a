//! DOM Node
//!
//! Element-only arena nodes. Text content is irrelevant to widget behavior,
//! so the only character data tracked is the value of text controls.

use crate::{DOMTokenList, NamedNodeMap, NodeId};

/// Arena node
#[derive(Debug)]
pub struct Node {
    /// Parent node (None if detached or root)
    pub parent: Option<NodeId>,
    /// Children in document order
    pub children: Vec<NodeId>,
    /// Element payload
    pub element: ElementData,
}

impl Node {
    pub fn new(tag_name: &str) -> Self {
        Self {
            parent: None,
            children: Vec::new(),
            element: ElementData::new(tag_name),
        }
    }
}

/// Element-specific data
#[derive(Debug)]
pub struct ElementData {
    /// Lowercase tag name
    pub tag_name: String,
    /// Attributes
    pub attrs: NamedNodeMap,
    /// Cached class list, mirrors the `class` attribute
    pub classes: DOMTokenList,
    /// Display value as the style engine would compute it
    pub display: Display,
    /// Value and selection of `<input>`/`<textarea>` controls
    pub text: Option<TextSelection>,
}

impl ElementData {
    pub fn new(tag_name: &str) -> Self {
        let tag_name = tag_name.to_ascii_lowercase();
        let display = Display::initial_for(&tag_name);
        let text = matches!(tag_name.as_str(), "input" | "textarea").then(TextSelection::default);
        Self {
            tag_name,
            attrs: NamedNodeMap::new(),
            classes: DOMTokenList::new(),
            display,
            text,
        }
    }

    /// Get an attribute value
    pub fn get_attr(&self, name: &str) -> Option<&str> {
        self.attrs.get_attribute(name)
    }

    /// Set an attribute, returning the previous value
    pub fn set_attr(&mut self, name: &str, value: &str) -> Option<String> {
        if name == "class" {
            self.classes = DOMTokenList::from_string(value);
        }
        self.attrs.set_attribute(name, value)
    }

    /// Remove an attribute, returning the previous value
    pub fn remove_attr(&mut self, name: &str) -> Option<String> {
        if name == "class" {
            self.classes = DOMTokenList::new();
        }
        self.attrs.remove_attribute(name).map(|a| a.value)
    }

    /// Cached id attribute
    pub fn id(&self) -> Option<&str> {
        self.get_attr("id")
    }

    /// Effective display: the `hidden` attribute wins over the style value
    pub fn computed_display(&self) -> Display {
        if self.attrs.has_attribute("hidden") {
            Display::None
        } else {
            self.display
        }
    }
}

/// Computed `display` value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Display {
    #[default]
    Block,
    Inline,
    InlineBlock,
    Flex,
    Grid,
    None,
}

impl Display {
    /// Anything but `none` renders a box
    pub fn is_visible(&self) -> bool {
        !matches!(self, Self::None)
    }

    fn initial_for(tag_name: &str) -> Self {
        match tag_name {
            "a" | "span" | "label" | "button" | "input" | "textarea" | "select" => Self::InlineBlock,
            _ => Self::Block,
        }
    }
}

/// Text control value with its selection, offsets in characters
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextSelection {
    pub value: String,
    pub selection_start: usize,
    pub selection_end: usize,
}

impl TextSelection {
    /// Value with a collapsed caret at the end
    pub fn with_value(value: &str) -> Self {
        let len = value.chars().count();
        Self {
            value: value.to_string(),
            selection_start: len,
            selection_end: len,
        }
    }

    /// Value length in characters
    pub fn len(&self) -> usize {
        self.value.chars().count()
    }

    pub fn is_empty(&self) -> bool {
        self.value.is_empty()
    }

    /// Selection start sits at offset 0
    pub fn at_start(&self) -> bool {
        self.selection_start == 0
    }

    /// Selection end sits at end-of-value
    pub fn at_end(&self) -> bool {
        self.selection_end >= self.len()
    }

    /// Move the selection, clamped to the value
    pub fn select(&mut self, start: usize, end: usize) {
        let len = self.len();
        self.selection_start = start.min(len);
        self.selection_end = end.clamp(self.selection_start, len);
    }
}
