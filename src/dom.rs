//! Mutable DOM capability.
//!
//! SYSTEM CONTEXT
//! ==============
//! [`Dom`] extends the read-only [`PageView`] used by detection with the few
//! writes the content script performs, plus mutation subscriptions. The live
//! page implements it in `browser::dom`; [`crate::memory::MemoryDocument`]
//! implements it headless.

use futures::future::LocalBoxFuture;
use umbra_detect::PageView;

use crate::error::DomError;

/// Which mutation records a subscription wants.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MutationFilter {
    /// Batches that add at least one node anywhere under the scope.
    AddedDescendants,
}

/// A live mutation subscription.
pub trait Subscription {
    /// Stop delivery. Idempotent.
    fn cancel(&mut self);
}

/// Writable document handle. Clones refer to the same document.
pub trait Dom: PageView<Element: 'static> + Clone + 'static {
    type Subscription: Subscription;

    /// The `<head>` element.
    fn head(&self) -> Option<Self::Element>;

    /// Resolve once the document has finished parsing (`DOMContentLoaded`),
    /// immediately if it already has.
    fn content_loaded(&self) -> LocalBoxFuture<'static, ()>;

    fn element_by_id(&self, id: &str) -> Option<Self::Element>;

    /// Create a detached element.
    ///
    /// # Errors
    ///
    /// Returns [`DomError::Operation`] if the tag is rejected.
    fn create_element(&self, tag: &str) -> Result<Self::Element, DomError>;

    /// # Errors
    ///
    /// Returns [`DomError::Operation`] if the insertion is rejected.
    fn append_child(&self, parent: &Self::Element, child: &Self::Element) -> Result<(), DomError>;

    /// # Errors
    ///
    /// Returns [`DomError::Operation`] if the attribute is rejected.
    fn set_attribute(&self, element: &Self::Element, name: &str, value: &str) -> Result<(), DomError>;

    /// # Errors
    ///
    /// Returns [`DomError::Operation`] if the removal is rejected.
    fn remove_attribute(&self, element: &Self::Element, name: &str) -> Result<(), DomError>;

    /// Add a class token. Adding a present token is a no-op.
    ///
    /// # Errors
    ///
    /// Returns [`DomError::Operation`] if the token is rejected.
    fn add_class(&self, element: &Self::Element, class: &str) -> Result<(), DomError>;

    /// Set an inline style property.
    ///
    /// # Errors
    ///
    /// Returns [`DomError::Operation`] if the element has no inline style.
    fn set_style(&self, element: &Self::Element, property: &str, value: &str) -> Result<(), DomError>;

    /// # Errors
    ///
    /// Returns [`DomError::Operation`] if the element has no inline style.
    fn remove_style(&self, element: &Self::Element, property: &str) -> Result<(), DomError>;

    /// Inline style value, if set.
    fn inline_style(&self, element: &Self::Element, property: &str) -> Option<String>;

    /// # Errors
    ///
    /// Returns [`DomError::Operation`] if the write is rejected.
    fn set_text(&self, element: &Self::Element, text: &str) -> Result<(), DomError>;

    /// Run `handler` on every click of `element`.
    ///
    /// # Errors
    ///
    /// Returns [`DomError::Operation`] if the listener cannot be attached.
    fn on_click(&self, element: &Self::Element, handler: Box<dyn FnMut()>) -> Result<(), DomError>;

    /// Deliver mutation batches under `scope` that pass `filter`, one
    /// `callback` call per batch, until the subscription is cancelled.
    ///
    /// # Errors
    ///
    /// Returns [`DomError::Operation`] if the observer cannot be created.
    fn subscribe(
        &self,
        scope: &Self::Element,
        filter: MutationFilter,
        callback: Box<dyn FnMut()>,
    ) -> Result<Self::Subscription, DomError>;
}
