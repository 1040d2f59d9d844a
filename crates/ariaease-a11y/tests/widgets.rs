//! Integration tests - widget controllers end to end
//!
//! Markup is built in a headless document, controllers are attached from
//! JSON configs shaped like the host page's options, and events are
//! dispatched the way a browser would deliver them.

use ariaease_a11y::{
    Accordion, AccordionConfig, AccordionState, Block, BlockConfig, CheckboxConfig, CheckboxGroup,
    Menu, MenuConfig, RadioConfig, RadioGroup, RadioState, ResolutionError, ToggleConfig,
    ToggleGroup, WidgetError, WidgetStatus, update_accordion_aria, update_radio_aria,
};
use ariaease_dom::{DomAccess, HeadlessDocument, NodeId};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn container_with(doc: &mut HeadlessDocument, id: &str, tag: &str, class: &str, n: usize) -> Vec<NodeId> {
    let root = doc.root();
    let container = doc.append_element(root, "div", &[("id", id)]).unwrap();
    (0..n)
        .map(|_| doc.append_element(container, tag, &[("class", class)]).unwrap())
        .collect()
}

// ============================================================================
// SCENARIOS
// ============================================================================

#[test]
fn test_accordion_toggle_scenario() {
    init_tracing();
    let mut doc = HeadlessDocument::new();
    let root = doc.root();
    let acc = doc.append_element(root, "div", &[("id", "acc")]).unwrap();
    let triggers = vec![
        doc.append_element(acc, "button", &[("class", "trig"), ("aria-expanded", "true")]).unwrap(),
        doc.append_element(acc, "button", &[("class", "trig"), ("aria-expanded", "true")]).unwrap(),
        doc.append_element(acc, "button", &[("class", "trig"), ("aria-expanded", "false")]).unwrap(),
    ];
    let states: Vec<AccordionState> = serde_json::from_str(
        r#"[{"display": false}, {"display": true}, {"display": false}]"#,
    )
    .unwrap();

    let report = update_accordion_aria(&mut doc, "acc", "trig", &states, 0).unwrap();

    assert_eq!(report.writes, 1);
    assert_eq!(doc.get_attribute(triggers[0], "aria-expanded").as_deref(), Some("false"));
    let mutations = doc.take_mutations();
    assert!(mutations.iter().all(|m| m.target == triggers[0]));
}

#[test]
fn test_exclusive_radio_scenario() {
    init_tracing();
    let mut doc = HeadlessDocument::new();
    let radios = container_with(&mut doc, "plans", "div", "plan", 3);
    let config: RadioConfig =
        serde_json::from_str(r#"{"groupId": "plans", "radiosClass": "plan", "defaultSelectedIndex": 0}"#)
            .unwrap();
    let group = RadioGroup::attach(&mut doc, config);

    group.select_radio(&mut doc, 2).unwrap();

    let attr = |name: &str, i: usize| doc.get_attribute(radios[i], name);
    assert_eq!(attr("aria-checked", 2).as_deref(), Some("true"));
    assert_eq!(attr("tabindex", 2).as_deref(), Some("0"));
    assert_eq!(attr("aria-checked", 0).as_deref(), Some("false"));
    assert_eq!(attr("tabindex", 0).as_deref(), Some("-1"));
    assert_eq!(group.selected_index(), Some(2));
}

#[test]
fn test_standalone_radio_update() {
    let mut doc = HeadlessDocument::new();
    let radios = container_with(&mut doc, "sizes", "div", "size", 2);
    let states = vec![RadioState::new(false), RadioState::new(true)];

    update_radio_aria(&mut doc, "#sizes", ".size", &states, 1).unwrap();
    assert_eq!(doc.get_attribute(radios[1], "tabindex").as_deref(), Some("0"));
    assert_eq!(doc.get_attribute(radios[0], "tabindex").as_deref(), Some("-1"));

    assert_eq!(
        update_radio_aria(&mut doc, "sizes", "size", &states[..1], 0),
        Err(WidgetError::ArityMismatch { items: 2, states: 1 })
    );
}

#[test]
fn test_radio_selection_follows_node_across_removal() {
    init_tracing();
    let mut doc = HeadlessDocument::new();
    let radios = container_with(&mut doc, "plans", "div", "plan", 3);
    let group = RadioGroup::attach(&mut doc, RadioConfig::new("plans", "plan"));
    group.select_radio(&mut doc, 1).unwrap();

    let container = doc.get_element_by_id("plans").unwrap();
    doc.remove_child(container, radios[0]).unwrap();
    group.reattach(&mut doc).unwrap();

    assert_eq!(group.selected_index(), Some(0));
    assert_eq!(doc.get_attribute(radios[1], "aria-checked").as_deref(), Some("true"));
    assert_eq!(doc.get_attribute(radios[1], "tabindex").as_deref(), Some("0"));
    assert_eq!(doc.get_attribute(radios[2], "aria-checked").as_deref(), Some("false"));
    assert_eq!(doc.get_attribute(radios[2], "tabindex").as_deref(), Some("-1"));
}

// ============================================================================
// KEYBOARD
// ============================================================================

#[test]
fn test_escape_without_dismiss_target_changes_nothing() {
    init_tracing();
    let mut doc = HeadlessDocument::new();
    let triggers = container_with(&mut doc, "faq", "button", "q", 2);
    let checkboxes = container_with(&mut doc, "extras", "div", "extra", 2);
    let radios = container_with(&mut doc, "sizes", "div", "size", 2);
    let accordion = Accordion::attach(&mut doc, AccordionConfig::new("faq", "q"));
    let group = CheckboxGroup::attach(&mut doc, CheckboxConfig::new("extras", "extra"));
    let radio = RadioGroup::attach(&mut doc, RadioConfig::new("sizes", "size"));
    assert!(accordion.status().is_attached());

    for item in [triggers[1], checkboxes[1], radios[1]] {
        doc.focus(item).unwrap();
        doc.take_mutations();

        assert!(!doc.key_down(item, "Escape"));
        assert_eq!(doc.active_element(), Some(item));
        assert!(doc.mutations().is_empty());
    }
    assert_eq!(group.checked_indices(&doc).unwrap(), Vec::<usize>::new());
    assert_eq!(radio.selected_index(), Some(0));
}

#[test]
fn test_custom_click_radio_activates_on_enter() {
    let mut doc = HeadlessDocument::new();
    let root = doc.root();
    let container = doc.append_element(root, "div", &[("id", "speed")]).unwrap();
    let plain = doc.append_element(container, "div", &[("class", "opt")]).unwrap();
    let marked = doc
        .append_element(container, "div", &[("class", "opt"), ("data-custom-click", "")])
        .unwrap();
    let group = RadioGroup::attach(&mut doc, RadioConfig::new("speed", "opt"));

    // Enter on an unmarked radio is not an activation key
    assert!(doc.key_down(plain, "Enter"));
    assert_eq!(group.selected_index(), Some(0));

    assert!(!doc.key_down(marked, "Enter"));
    assert_eq!(group.selected_index(), Some(1));
    assert_eq!(doc.get_attribute(marked, "aria-checked").as_deref(), Some("true"));
    assert_eq!(doc.get_attribute(plain, "aria-checked").as_deref(), Some("false"));
}

#[test]
fn test_custom_click_checkbox_toggles_once_per_key() {
    let mut doc = HeadlessDocument::new();
    let root = doc.root();
    let container = doc.append_element(root, "div", &[("id", "alerts")]).unwrap();
    let marked = doc
        .append_element(container, "div", &[("class", "alert"), ("data-custom-click", "")])
        .unwrap();
    let field = doc
        .append_element(container, "input", &[("class", "alert"), ("data-custom-click", "")])
        .unwrap();
    let group = CheckboxGroup::attach(&mut doc, CheckboxConfig::new("alerts", "alert"));

    assert!(!doc.key_down(marked, "Enter"));
    assert!(group.is_checked(&doc, 0).unwrap());
    assert!(!doc.key_down(marked, " "));
    assert!(!group.is_checked(&doc, 0).unwrap());

    // A marked text input still gets its synthesized click
    assert!(!doc.key_down(field, "Enter"));
    assert_eq!(group.checked_indices(&doc).unwrap(), vec![1]);
}

// ============================================================================
// MENU
// ============================================================================

#[test]
fn test_menu_escape_from_item_returns_to_trigger() {
    init_tracing();
    let mut doc = HeadlessDocument::new();
    let root = doc.root();
    let trigger = doc.append_element(root, "button", &[("id", "nav-toggle")]).unwrap();
    let items = container_with(&mut doc, "nav", "a", "nav-link", 3);
    let config: MenuConfig = serde_json::from_str(
        r#"{"menuId": "nav", "itemsClass": "nav-link", "triggerId": "nav-toggle",
            "labels": {"open": "Close navigation", "closed": "Open navigation"}}"#,
    )
    .unwrap();
    let menu = Menu::attach(&mut doc, config);

    doc.click(trigger).unwrap();
    assert_eq!(doc.active_element(), Some(items[0]));
    doc.key_down_focused("ArrowUp");
    assert_eq!(doc.active_element(), Some(items[2]));

    assert_eq!(doc.key_down_focused("Escape"), Some(false));
    assert_eq!(menu.is_open(&doc), Ok(false));
    assert_eq!(doc.active_element(), Some(trigger));
    assert_eq!(doc.get_attribute(trigger, "aria-label").as_deref(), Some("Open navigation"));

    // Escape with the menu already closed still hands focus back
    doc.focus(items[1]).unwrap();
    doc.key_down(items[1], "Escape");
    assert_eq!(doc.active_element(), Some(trigger));
}

// ============================================================================
// LIFECYCLE
// ============================================================================

#[test]
fn test_inert_handles_have_no_side_effects() {
    init_tracing();
    let mut doc = HeadlessDocument::new();
    container_with(&mut doc, "present", "div", "other", 2);
    doc.take_mutations();

    let accordion = Accordion::attach(&mut doc, AccordionConfig::new("absent", "t"));
    let radios = RadioGroup::attach(&mut doc, RadioConfig::new("present", "missing"));
    let checkboxes = CheckboxGroup::attach(&mut doc, CheckboxConfig::new("absent", "c"));
    let toggles = ToggleGroup::attach(&mut doc, ToggleConfig::single("absent"));
    let menu = Menu::attach(&mut doc, MenuConfig::new("absent", "i", "t"));
    let block = Block::attach(&mut doc, BlockConfig::new("absent", "b"));

    assert_eq!(
        radios.status(),
        WidgetStatus::Inert(WidgetError::Resolution(ResolutionError::NoItemsFound {
            container: "present".into(),
            class: "missing".into(),
        }))
    );
    assert!(accordion.status().is_inert());
    assert!(checkboxes.status().is_inert());
    assert!(toggles.status().is_inert());
    assert!(menu.status().is_inert());
    assert!(block.status().is_inert());

    assert_eq!(accordion.expand_item(&mut doc, 0), Err(WidgetError::NotAttached));
    assert_eq!(radios.select_radio(&mut doc, 0), Err(WidgetError::NotAttached));
    assert_eq!(checkboxes.set_checked(&mut doc, 0, true), Err(WidgetError::NotAttached));
    assert_eq!(toggles.toggle(&mut doc, 0), Err(WidgetError::NotAttached));
    assert_eq!(menu.toggle_menu(&mut doc), Err(WidgetError::NotAttached));
    assert_eq!(block.refresh(&mut doc), Err(WidgetError::NotAttached));

    accordion.cleanup(&mut doc);
    menu.cleanup(&mut doc);
    assert!(doc.mutations().is_empty());
    assert_eq!(doc.listener_count(), 0);
    assert_eq!(doc.active_element(), None);
}

#[test]
fn test_inert_handle_recovers_on_reattach() {
    let mut doc = HeadlessDocument::new();
    let checkboxes = CheckboxGroup::attach(&mut doc, CheckboxConfig::new("late", "opt"));
    assert!(checkboxes.status().is_inert());

    let items = container_with(&mut doc, "late", "div", "opt", 2);
    checkboxes.reattach(&mut doc).unwrap();
    doc.click(items[1]).unwrap();
    assert_eq!(checkboxes.checked_indices(&doc).unwrap(), vec![1]);
}

#[test]
fn test_cleanup_leaves_aria_untouched() {
    let mut doc = HeadlessDocument::new();
    let toggles = container_with(&mut doc, "tools", "div", "tool", 2);
    let group = ToggleGroup::attach(&mut doc, ToggleConfig::group("tools", "tool"));
    group.toggle(&mut doc, 1).unwrap();

    group.cleanup(&mut doc);
    assert_eq!(group.status(), WidgetStatus::Detached);
    assert_eq!(doc.get_attribute(toggles[1], "aria-pressed").as_deref(), Some("true"));
    assert_eq!(doc.get_attribute(toggles[0], "role").as_deref(), Some("button"));

    doc.click(toggles[1]).unwrap();
    assert_eq!(doc.get_attribute(toggles[1], "aria-pressed").as_deref(), Some("true"));
}

#[test]
fn test_instances_do_not_share_listeners() {
    let mut doc = HeadlessDocument::new();
    let items = container_with(&mut doc, "opts", "div", "opt", 2);
    let first = CheckboxGroup::attach(&mut doc, CheckboxConfig::new("opts", "opt"));
    let second = CheckboxGroup::attach(&mut doc, CheckboxConfig::new("opts", "opt"));
    assert_eq!(doc.listeners_on(items[0]), 4);

    first.cleanup(&mut doc);
    assert_eq!(doc.listeners_on(items[0]), 2);

    doc.click(items[0]).unwrap();
    assert!(second.is_checked(&doc, 0).unwrap());
    assert_eq!(first.is_checked(&doc, 0), Err(WidgetError::NotAttached));
}
