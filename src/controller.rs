//! Dark theme controller.
//!
//! Two states, Disabled (initial) and Enabled. Enabling marks `<html>` with
//! [`THEME_MARKER_ATTR`], injects the dark stylesheet, and keeps one mutation
//! subscription on `<body>` that re-runs the chart styling pass whenever nodes
//! are added. The controller owns that subscription; there is at most one.
//!
//! Failures abort the current step and are returned to the caller. Whatever
//! was committed before the failure (marker attribute, subscription) stays.

use umbra_detect::Selector;

use crate::consts::{
    CANVAS_FILTER, CHART_IFRAME_SELECTORS, CHART_MARKER_CLASS, CHART_SELECTORS, DARK_THEME_CSS, IFRAME_MARKER_CLASS,
    STYLED_CANVAS, STYLESHEET_ID, SVG_MARKER_CLASS, THEME_MARKER_ATTR,
};
use crate::dom::{Dom, MutationFilter, Subscription};
use crate::error::DomError;

#[cfg(test)]
#[path = "controller_test.rs"]
mod controller_test;

/// Controller state.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ThemeState {
    #[default]
    Disabled,
    Enabled,
}

/// Elements touched by one styling pass.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StylingReport {
    pub charts: usize,
    pub canvases: usize,
    pub svgs: usize,
    pub iframes: usize,
}

/// Owns the theme state and the page's single mutation subscription.
pub struct ThemeController<D: Dom> {
    doc: D,
    state: ThemeState,
    subscription: Option<D::Subscription>,
}

impl<D: Dom> ThemeController<D> {
    #[must_use]
    pub fn new(doc: D) -> Self {
        Self { doc, state: ThemeState::Disabled, subscription: None }
    }

    #[must_use]
    pub fn state(&self) -> ThemeState {
        self.state
    }

    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.state == ThemeState::Enabled
    }

    /// Whether a mutation subscription is held.
    #[must_use]
    pub fn is_observing(&self) -> bool {
        self.subscription.is_some()
    }

    /// Switch the dark theme on. Safe to call again while enabled: the
    /// previous subscription is cancelled before a new one is made.
    ///
    /// The state is Enabled exactly while a subscription is held.
    ///
    /// # Errors
    ///
    /// Returns the first [`DomError`] met. The marker attribute stays if it was
    /// already set; the state stays Disabled until the subscription exists.
    pub fn enable(&mut self) -> Result<StylingReport, DomError> {
        let root = self.doc.root().ok_or(DomError::MissingElement("html"))?;
        self.doc.set_attribute(&root, THEME_MARKER_ATTR, "true")?;

        if let Err(e) = ensure_stylesheet(&self.doc) {
            log::warn!("dark stylesheet injection failed: {e}");
        }

        if let Some(mut previous) = self.subscription.take() {
            previous.cancel();
            self.state = ThemeState::Disabled;
        }
        let body = self.doc.body().ok_or(DomError::MissingElement("body"))?;
        let observed = self.doc.clone();
        let subscription = self.doc.subscribe(
            &body,
            MutationFilter::AddedDescendants,
            Box::new(move || match apply_dark_theme_to_charts(&observed) {
                Ok(report) => log::debug!("restyled inserted charts: {report:?}"),
                Err(e) => log::warn!("chart styling pass failed: {e}"),
            }),
        )?;
        self.subscription = Some(subscription);
        self.state = ThemeState::Enabled;

        apply_dark_theme_to_charts(&self.doc)
    }

    /// Switch the dark theme off and drop the subscription.
    ///
    /// # Errors
    ///
    /// Returns the first [`DomError`] met while removing the marker or canvas
    /// filters. The subscription is always cancelled first.
    pub fn disable(&mut self) -> Result<(), DomError> {
        if let Some(mut subscription) = self.subscription.take() {
            subscription.cancel();
        }
        self.state = ThemeState::Disabled;

        let root = self.doc.root().ok_or(DomError::MissingElement("html"))?;
        self.doc.remove_attribute(&root, THEME_MARKER_ATTR)?;
        clear_canvas_filters(&self.doc)
    }

    /// [`enable`](Self::enable) or [`disable`](Self::disable), logging failures.
    pub fn set_enabled(&mut self, enabled: bool) {
        let outcome = if enabled { self.enable().map(|report| log::debug!("styled charts: {report:?}")) } else { self.disable() };
        if let Err(e) = outcome {
            log::warn!("theme {} incomplete: {e}", if enabled { "enable" } else { "disable" });
        }
    }
}

/// Mark chart-like elements so the dark stylesheet can reach them, and filter
/// canvases. Idempotent: classes are set-like and the filter value is fixed.
///
/// # Errors
///
/// Returns the first [`DomError`]; elements before it keep their markers.
pub fn apply_dark_theme_to_charts<D: Dom>(doc: &D) -> Result<StylingReport, DomError> {
    let mut report = StylingReport::default();

    for element in doc.query_all(&Selector::Any(CHART_SELECTORS))? {
        if doc.tag_name(&element) == "canvas" {
            doc.set_style(&element, "filter", CANVAS_FILTER)?;
            report.canvases += 1;
        }
        doc.add_class(&element, CHART_MARKER_CLASS)?;
        report.charts += 1;
    }

    for svg in doc.query_all(&Selector::Tag("svg"))? {
        doc.add_class(&svg, SVG_MARKER_CLASS)?;
        report.svgs += 1;
    }

    for iframe in doc.query_all(&Selector::Any(CHART_IFRAME_SELECTORS))? {
        doc.add_class(&iframe, IFRAME_MARKER_CLASS)?;
        report.iframes += 1;
    }

    Ok(report)
}

/// Drop the inline filter the styling pass put on canvases.
fn clear_canvas_filters<D: Dom>(doc: &D) -> Result<(), DomError> {
    for canvas in doc.query_all(&STYLED_CANVAS)? {
        if doc.inline_style(&canvas, "filter").as_deref() == Some(CANVAS_FILTER) {
            doc.remove_style(&canvas, "filter")?;
        }
    }
    Ok(())
}

/// Insert the dark stylesheet once. Returns whether it was inserted now.
fn ensure_stylesheet<D: Dom>(doc: &D) -> Result<bool, DomError> {
    if doc.element_by_id(STYLESHEET_ID).is_some() {
        return Ok(false);
    }
    let parent = doc.head().or_else(|| doc.root()).ok_or(DomError::MissingElement("head"))?;
    let style = doc.create_element("style")?;
    doc.set_attribute(&style, "id", STYLESHEET_ID)?;
    doc.set_text(&style, DARK_THEME_CSS)?;
    doc.append_child(&parent, &style)?;
    Ok(true)
}
