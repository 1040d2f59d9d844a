//! Radio group walkthrough
//!
//! Run with `RUST_LOG=debug` to see attach and sync logging.

use ariaease_a11y::{RadioConfig, RadioGroup};
use ariaease_dom::{DomAccess, HeadlessDocument};

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let mut doc = HeadlessDocument::new();
    let root = doc.root();
    let Ok(group) = doc.append_element(root, "div", &[("id", "shipping")]) else {
        return;
    };
    let radios: Vec<_> = ["Standard", "Express", "Overnight"]
        .iter()
        .filter_map(|label| {
            doc.append_element(group, "div", &[("class", "option"), ("aria-label", *label)])
                .ok()
        })
        .collect();

    let config: RadioConfig = match serde_json::from_str(
        r#"{"groupId": "shipping", "radiosClass": "option", "defaultSelectedIndex": 1}"#,
    ) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("bad config: {e}");
            return;
        }
    };
    let shipping = RadioGroup::attach(&mut doc, config);

    let print = |doc: &HeadlessDocument, step: &str| {
        println!("{step}");
        for &radio in &radios {
            println!(
                "  {:<10} aria-checked={:<5} tabindex={}",
                doc.get_attribute(radio, "aria-label").unwrap_or_default(),
                doc.get_attribute(radio, "aria-checked").unwrap_or_default(),
                doc.get_attribute(radio, "tabindex").unwrap_or_default(),
            );
        }
    };

    print(&doc, "after attach");
    doc.key_down(radios[1], "ArrowDown");
    print(&doc, "after ArrowDown");
    doc.key_down(radios[2], "ArrowDown");
    print(&doc, "after ArrowDown (wraps)");
    let _ = shipping.select_radio(&mut doc, 1);
    print(&doc, "after select_radio(1)");

    shipping.cleanup(&mut doc);
    println!("listeners after cleanup: {}", doc.listener_count());
}
