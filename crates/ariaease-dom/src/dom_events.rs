//! DOM Events
//!
//! Keyboard and click events delivered to widget listeners.

use std::rc::Rc;

use crate::NodeId;

/// Event types widget controllers listen for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    KeyDown,
    Click,
}

impl EventKind {
    /// DOM event type name
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::KeyDown => "keydown",
            Self::Click => "click",
        }
    }
}

/// Registered listener handle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(pub u64);

/// Event listener. Receives the document mutably at dispatch time, so a
/// listener may itself dispatch (e.g. a synthesized click).
pub type EventListener<D> = Rc<dyn Fn(&mut D, &mut DomEvent)>;

/// Box a closure as an [`EventListener`]
pub fn listener<D, F>(f: F) -> EventListener<D>
where
    F: Fn(&mut D, &mut DomEvent) + 'static,
{
    Rc::new(f)
}

/// DOM event
#[derive(Debug, Clone)]
pub struct DomEvent {
    pub kind: EventKind,
    pub target: NodeId,
    /// `KeyboardEvent.key` for keydown events
    pub key: Option<String>,
    pub cancelable: bool,
    default_prevented: bool,
    propagation_stopped: bool,
}

impl DomEvent {
    /// Create keydown event
    pub fn key_down(target: NodeId, key: &str) -> Self {
        Self {
            kind: EventKind::KeyDown,
            target,
            key: Some(key.to_string()),
            cancelable: true,
            default_prevented: false,
            propagation_stopped: false,
        }
    }

    /// Create click event
    pub fn click(target: NodeId) -> Self {
        Self {
            kind: EventKind::Click,
            target,
            key: None,
            cancelable: true,
            default_prevented: false,
            propagation_stopped: false,
        }
    }

    /// Pressed key, if any
    pub fn key(&self) -> Option<&str> {
        self.key.as_deref()
    }

    /// Prevent default action
    pub fn prevent_default(&mut self) {
        if self.cancelable {
            self.default_prevented = true;
        }
    }

    /// Stop remaining listeners on this target from running
    pub fn stop_propagation(&mut self) {
        self.propagation_stopped = true;
    }

    pub fn is_default_prevented(&self) -> bool {
        self.default_prevented
    }

    pub fn is_propagation_stopped(&self) -> bool {
        self.propagation_stopped
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_down_event() {
        let mut event = DomEvent::key_down(NodeId(3), "ArrowDown");
        assert_eq!(event.kind, EventKind::KeyDown);
        assert_eq!(event.key(), Some("ArrowDown"));
        assert!(!event.is_default_prevented());

        event.prevent_default();
        assert!(event.is_default_prevented());
    }

    #[test]
    fn test_non_cancelable_ignores_prevent_default() {
        let mut event = DomEvent::click(NodeId(1));
        event.cancelable = false;
        event.prevent_default();
        assert!(!event.is_default_prevented());
        assert_eq!(EventKind::Click.as_str(), "click");
    }
}
