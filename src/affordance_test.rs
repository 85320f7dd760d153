use pretty_assertions::assert_eq;
use umbra_detect::PageView;

use super::*;
use crate::memory::MemoryDocument;

#[test]
fn creates_one_button_under_body() {
    let doc = MemoryDocument::new("example.com");
    let first = ensure_affordance(&doc, false).expect("first");
    let second = ensure_affordance(&doc, false).expect("second");

    assert!(first.created);
    assert!(!second.created);
    assert_eq!(first.element, second.element);
    assert_eq!(doc.count_with_id(TOGGLE_ID), 1);
    assert_eq!(doc.tag_name(&first.element), "button");
    assert_eq!(doc.attribute(&first.element, "title").as_deref(), Some(TOGGLE_TITLE));
    assert_eq!(doc.inline_style(&first.element, "position").as_deref(), Some("fixed"));
    assert_eq!(doc.inline_style(&first.element, "border-radius").as_deref(), Some("50%"));
}

#[test]
fn presentation_reflects_state() {
    let doc = MemoryDocument::new("example.com");
    let button = ensure_affordance(&doc, true).expect("button").element;
    assert_eq!(doc.text(&button), "☀️");
    assert_eq!(doc.inline_style(&button, "background").as_deref(), Some("#1a1a1a"));
    assert_eq!(doc.inline_style(&button, "border-color").as_deref(), Some("#666"));

    assert!(render_affordance(&doc, &button, false).is_ok());
    assert_eq!(doc.text(&button), "🌙");
    assert_eq!(doc.inline_style(&button, "background").as_deref(), Some("#fff"));
    assert_eq!(doc.inline_style(&button, "border-color").as_deref(), Some("#333"));
}

#[test]
fn existing_button_is_restyled_for_new_state() {
    let doc = MemoryDocument::new("example.com");
    let button = ensure_affordance(&doc, false).expect("button").element;
    assert!(ensure_affordance(&doc, true).is_ok());
    assert_eq!(doc.text(&button), "☀️");
}

#[test]
fn missing_body_is_reported() {
    let doc = MemoryDocument::without_body("example.com");
    assert_eq!(ensure_affordance(&doc, false), Err(DomError::MissingElement("body")));
    assert_eq!(doc.count_with_id(TOGGLE_ID), 0);
}
