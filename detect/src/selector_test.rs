use super::*;
use crate::snapshot::{ElementSnapshot, PageSnapshot, SnapshotPage};

const SWITCH: Selector = Selector::AttrEquals { tag: None, attr: "role", value: "switch" };
const THEME_LABEL: Selector = Selector::AttrContains { tag: None, attr: "aria-label", needle: "theme" };

fn page() -> SnapshotPage {
    let body = ElementSnapshot::new("body")
        .child(ElementSnapshot::new("button").attr("id", "ThemeSwitcher").attr("class", "btn primary"))
        .child(ElementSnapshot::new("div").attr("role", "SWITCH").attr("aria-label", "Toggle Theme"))
        .child(ElementSnapshot::new("canvas"));
    SnapshotPage::new(PageSnapshot::new("example.com", ElementSnapshot::new("html").child(body)))
}

#[test]
fn css_rendering_uses_case_insensitive_attribute_flag() {
    assert_eq!(Selector::Tag("canvas").to_css(), "canvas");
    assert_eq!(Selector::Class("chart-container").to_css(), ".chart-container");
    assert_eq!(
        Selector::AttrContains { tag: Some("button"), attr: "class", needle: "theme" }.to_css(),
        "button[class*=\"theme\" i]"
    );
    assert_eq!(Selector::Both(&SWITCH, &THEME_LABEL).to_css(), "[role=\"switch\" i][aria-label*=\"theme\" i]");
}

#[test]
fn attribute_matching_ignores_case() {
    let page = page();
    let hits = page
        .query_all(&Selector::AttrContains { tag: Some("button"), attr: "id", needle: "theme" })
        .unwrap_or_default();
    assert_eq!(hits.len(), 1);
    assert_eq!(page.tag_name(&hits[0]), "button");
}

#[test]
fn compound_selector_requires_both_parts() {
    let page = page();
    assert_eq!(page.query_all(&Selector::Both(&SWITCH, &THEME_LABEL)).unwrap_or_default().len(), 1);
    const DARK_LABEL: Selector = Selector::AttrContains { tag: None, attr: "aria-label", needle: "dark" };
    assert!(page.query_all(&Selector::Both(&SWITCH, &DARK_LABEL)).unwrap_or_default().is_empty());
}

#[test]
fn class_selector_matches_whole_tokens() {
    let page = page();
    assert_eq!(page.query_all(&Selector::Class("btn")).unwrap_or_default().len(), 1);
    assert!(page.query_all(&Selector::Class("bt")).unwrap_or_default().is_empty());
}

#[test]
fn tag_selector_matches_canvas() {
    let page = page();
    assert_eq!(page.query_all(&Selector::Tag("canvas")).unwrap_or_default().len(), 1);
}

#[test]
fn selector_list_matches_each_element_once() {
    const LIST: &[Selector] = &[Selector::Tag("canvas"), Selector::Tag("button"), Selector::Tag("canvas")];
    let page = page();
    assert_eq!(Selector::Any(LIST).to_css(), "canvas, button, canvas");
    assert_eq!(page.query_all(&Selector::Any(LIST)).unwrap_or_default().len(), 2);
}
