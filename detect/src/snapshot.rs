//! Captured page snapshots.
//!
//! A [`PageSnapshot`] is the serde form of what the detectors read from a live
//! page: the element tree with attributes and computed styles, stylesheet
//! media rules, and the hostname. [`SnapshotPage`] flattens it into document
//! order and implements [`PageView`], so detection can run headless.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::page::{PageError, PageView, StyleSheet};
use crate::selector::Selector;

#[cfg(test)]
#[path = "snapshot_test.rs"]
mod snapshot_test;

/// Serialized page state.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageSnapshot {
    #[serde(default)]
    pub hostname: String,
    /// The `<html>` element and its subtree.
    #[serde(default)]
    pub root: Option<ElementSnapshot>,
    #[serde(default)]
    pub stylesheets: Vec<SheetSnapshot>,
}

/// One element with its computed styles and children.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElementSnapshot {
    pub tag: String,
    #[serde(default)]
    pub attributes: BTreeMap<String, String>,
    /// Computed style values keyed by property name.
    #[serde(default)]
    pub styles: BTreeMap<String, String>,
    #[serde(default)]
    pub children: Vec<ElementSnapshot>,
}

/// One stylesheet as seen from the page's origin.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SheetSnapshot {
    #[serde(default)]
    pub href: Option<String>,
    /// Rules could not be read (cross-origin without CORS).
    #[serde(default)]
    pub cross_origin: bool,
    /// Condition text of each `@media` rule.
    #[serde(default)]
    pub media: Vec<String>,
}

impl PageSnapshot {
    #[must_use]
    pub fn new(hostname: impl Into<String>, root: ElementSnapshot) -> Self {
        Self { hostname: hostname.into(), root: Some(root), stylesheets: Vec::new() }
    }

    #[must_use]
    pub fn with_sheet(mut self, sheet: SheetSnapshot) -> Self {
        self.stylesheets.push(sheet);
        self
    }

    /// Parse a snapshot from JSON text.
    ///
    /// # Errors
    ///
    /// Returns the `serde_json` error for malformed input.
    pub fn from_json(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }
}

impl ElementSnapshot {
    #[must_use]
    pub fn new(tag: impl Into<String>) -> Self {
        Self { tag: tag.into().to_ascii_lowercase(), ..Self::default() }
    }

    #[must_use]
    pub fn attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    #[must_use]
    pub fn style(mut self, property: impl Into<String>, value: impl Into<String>) -> Self {
        self.styles.insert(property.into(), value.into());
        self
    }

    #[must_use]
    pub fn child(mut self, child: ElementSnapshot) -> Self {
        self.children.push(child);
        self
    }
}

impl SheetSnapshot {
    #[must_use]
    pub fn readable(media: &[&str]) -> Self {
        Self { href: None, cross_origin: false, media: media.iter().map(|m| (*m).to_owned()).collect() }
    }

    #[must_use]
    pub fn cross_origin(href: impl Into<String>) -> Self {
        Self { href: Some(href.into()), cross_origin: true, media: Vec::new() }
    }
}

#[derive(Clone, Debug)]
struct FlatElement {
    tag: String,
    attributes: BTreeMap<String, String>,
    styles: BTreeMap<String, String>,
}

/// A [`PageSnapshot`] flattened for querying. Element handles are indices in
/// document order.
#[derive(Clone, Debug)]
pub struct SnapshotPage {
    hostname: String,
    elements: Vec<FlatElement>,
    body: Option<usize>,
    sheets: Vec<SheetSnapshot>,
}

impl SnapshotPage {
    #[must_use]
    pub fn new(snapshot: PageSnapshot) -> Self {
        let mut elements = Vec::new();
        let mut body = None;
        if let Some(root) = snapshot.root {
            flatten(root, 0, &mut elements, &mut body);
        }
        Self { hostname: snapshot.hostname, elements, body, sheets: snapshot.stylesheets }
    }

    fn get(&self, element: usize) -> Option<&FlatElement> {
        self.elements.get(element)
    }
}

fn flatten(element: ElementSnapshot, depth: usize, out: &mut Vec<FlatElement>, body: &mut Option<usize>) {
    let tag = element.tag.to_ascii_lowercase();
    if depth == 1 && body.is_none() && tag == "body" {
        *body = Some(out.len());
    }
    out.push(FlatElement { tag, attributes: element.attributes, styles: element.styles });
    for child in element.children {
        flatten(child, depth + 1, out, body);
    }
}

impl PageView for SnapshotPage {
    type Element = usize;

    fn root(&self) -> Option<usize> {
        (!self.elements.is_empty()).then_some(0)
    }

    fn body(&self) -> Option<usize> {
        self.body
    }

    fn tag_name(&self, element: &usize) -> String {
        self.get(*element).map(|e| e.tag.clone()).unwrap_or_default()
    }

    fn attribute(&self, element: &usize, name: &str) -> Option<String> {
        self.get(*element)?.attributes.get(name).cloned()
    }

    fn computed_style(&self, element: &usize, property: &str) -> Result<String, PageError> {
        let element = self
            .get(*element)
            .ok_or_else(|| PageError::Unavailable(format!("no element at index {element}")))?;
        Ok(element.styles.get(property).cloned().unwrap_or_default())
    }

    fn query_all(&self, selector: &Selector) -> Result<Vec<usize>, PageError> {
        Ok((0..self.elements.len()).filter(|idx| selector.matches(self, idx)).collect())
    }

    fn stylesheets(&self) -> Vec<Result<StyleSheet, PageError>> {
        self.sheets
            .iter()
            .map(|sheet| {
                if sheet.cross_origin {
                    Err(PageError::CrossOrigin { href: sheet.href.clone().unwrap_or_default() })
                } else {
                    Ok(StyleSheet { href: sheet.href.clone(), media_conditions: sheet.media.clone() })
                }
            })
            .collect()
    }

    fn hostname(&self) -> String {
        self.hostname.clone()
    }
}
