//! Floating toggle button.
//!
//! One fixed-position circular button per page, identified by [`TOGGLE_ID`].
//! Creation checks for an existing button first, so repeated calls never add
//! a second one.

use crate::consts::{TOGGLE_ID, TOGGLE_OFF, TOGGLE_ON, TOGGLE_STYLE, TOGGLE_TITLE, TogglePresentation};
use crate::dom::Dom;
use crate::error::DomError;

#[cfg(test)]
#[path = "affordance_test.rs"]
mod affordance_test;

/// The page's toggle button.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Affordance<E> {
    pub element: E,
    /// False when an existing button was reused.
    pub created: bool,
}

#[must_use]
pub fn presentation(enabled: bool) -> TogglePresentation {
    if enabled { TOGGLE_ON } else { TOGGLE_OFF }
}

/// Return the toggle button, creating it under `<body>` if absent, with its
/// presentation matching `enabled`.
///
/// # Errors
///
/// Returns [`DomError::MissingElement`] without a body, or the first failed
/// DOM write.
pub fn ensure_affordance<D: Dom>(doc: &D, enabled: bool) -> Result<Affordance<D::Element>, DomError> {
    if let Some(existing) = doc.element_by_id(TOGGLE_ID) {
        render_affordance(doc, &existing, enabled)?;
        return Ok(Affordance { element: existing, created: false });
    }

    let body = doc.body().ok_or(DomError::MissingElement("body"))?;
    let button = doc.create_element("button")?;
    doc.set_attribute(&button, "id", TOGGLE_ID)?;
    doc.set_attribute(&button, "title", TOGGLE_TITLE)?;
    doc.set_attribute(&button, "type", "button")?;
    for (property, value) in TOGGLE_STYLE {
        doc.set_style(&button, property, value)?;
    }
    render_affordance(doc, &button, enabled)?;
    doc.append_child(&body, &button)?;
    log::debug!("toggle button injected (enabled={enabled})");
    Ok(Affordance { element: button, created: true })
}

/// Update icon and colors for `enabled`.
///
/// # Errors
///
/// Returns the first failed DOM write.
pub fn render_affordance<D: Dom>(doc: &D, button: &D::Element, enabled: bool) -> Result<(), DomError> {
    let look = presentation(enabled);
    doc.set_text(button, look.icon)?;
    doc.set_style(button, "background", look.background)?;
    doc.set_style(button, "border-color", look.border_color)?;
    Ok(())
}
