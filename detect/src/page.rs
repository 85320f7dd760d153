//! Read-only page capability consumed by the detectors.
//!
//! SYSTEM CONTEXT
//! ==============
//! Detectors only ever read. The content script implements this trait over the
//! live DOM; [`crate::snapshot::SnapshotPage`] implements it over captured data.
//! Implementations report failures as [`PageError`] and the detectors fold
//! those into negative signals.

use crate::selector::Selector;

/// Failure while querying the page.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PageError {
    /// The selector was rejected by the query engine.
    #[error("invalid selector `{0}`")]
    InvalidSelector(String),
    /// A stylesheet's rules cannot be read from this origin.
    #[error("stylesheet is cross-origin: {href}")]
    CrossOrigin { href: String },
    /// The underlying document or style API is not available.
    #[error("page query unavailable: {0}")]
    Unavailable(String),
}

/// Summary of one readable stylesheet.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StyleSheet {
    pub href: Option<String>,
    /// Condition text of every `@media` rule in the sheet.
    pub media_conditions: Vec<String>,
}

/// Read-only queries against a rendered page.
pub trait PageView {
    /// Opaque element handle.
    type Element: Clone;

    /// The `<html>` element.
    fn root(&self) -> Option<Self::Element>;

    /// The `<body>` element, if the parser has reached it.
    fn body(&self) -> Option<Self::Element>;

    /// Lowercase tag name.
    fn tag_name(&self, element: &Self::Element) -> String;

    fn attribute(&self, element: &Self::Element, name: &str) -> Option<String>;

    /// Class tokens of `element`.
    fn class_list(&self, element: &Self::Element) -> Vec<String> {
        self.attribute(element, "class")
            .map(|raw| raw.split_whitespace().map(str::to_owned).collect())
            .unwrap_or_default()
    }

    /// Computed value of a CSS property (custom properties included).
    ///
    /// Unset properties resolve to an empty string, matching
    /// `getPropertyValue`.
    ///
    /// # Errors
    ///
    /// Returns [`PageError::Unavailable`] when styles cannot be computed.
    fn computed_style(&self, element: &Self::Element, property: &str) -> Result<String, PageError>;

    /// Every element matching `selector`, in document order.
    ///
    /// # Errors
    ///
    /// Returns [`PageError::InvalidSelector`] if the query engine rejects it.
    fn query_all(&self, selector: &Selector) -> Result<Vec<Self::Element>, PageError>;

    /// All stylesheets in document order; unreadable ones are `Err`.
    fn stylesheets(&self) -> Vec<Result<StyleSheet, PageError>>;

    /// Hostname of the page URL.
    fn hostname(&self) -> String;
}
