//! [`Dom`] over the live page.

use futures::channel::oneshot;
use futures::future::{self, LocalBoxFuture};
use js_sys::Array;
use umbra_detect::{PageError, PageView, Selector, StyleSheet};
use wasm_bindgen::JsCast;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsValue;
use web_sys::{
    CssMediaRule, CssRule, CssStyleDeclaration, CssStyleSheet, Document, Element, Event, HtmlElement, MutationObserver,
    MutationObserverInit, MutationRecord, Window,
};

use crate::dom::{Dom, MutationFilter, Subscription};
use crate::error::DomError;

/// Describe a thrown JS value.
pub(crate) fn js_detail(value: &JsValue) -> String {
    value.as_string().unwrap_or_else(|| format!("{value:?}"))
}

/// The window's document. Clones share the page.
#[derive(Clone)]
pub struct WebDocument {
    window: Window,
    document: Document,
}

impl WebDocument {
    /// The document of the current window, if any.
    #[must_use]
    pub fn current() -> Option<Self> {
        let window = web_sys::window()?;
        let document = window.document()?;
        Some(Self { window, document })
    }

    fn inline(element: &Element, op: &'static str) -> Result<CssStyleDeclaration, DomError> {
        element
            .dyn_ref::<HtmlElement>()
            .map(HtmlElement::style)
            .ok_or_else(|| DomError::operation(op, format!("<{}> has no inline style", element.tag_name())))
    }
}

fn read_sheet(sheet: web_sys::StyleSheet) -> Result<StyleSheet, PageError> {
    let href = sheet.href().unwrap_or_else(|e| {
        log::debug!("stylesheet href unreadable: {}", js_detail(&e));
        None
    });
    let Ok(sheet) = sheet.dyn_into::<CssStyleSheet>() else {
        return Ok(StyleSheet { href, media_conditions: Vec::new() });
    };
    let rules = sheet
        .css_rules()
        .map_err(|_| PageError::CrossOrigin { href: href.clone().unwrap_or_default() })?;

    let mut media_conditions = Vec::new();
    for index in 0..rules.length() {
        let Some(rule) = rules.item(index) else { continue };
        if rule.type_() != CssRule::MEDIA_RULE {
            continue;
        }
        if let Ok(media) = rule.dyn_into::<CssMediaRule>() {
            media_conditions.push(media.media().media_text());
        }
    }
    Ok(StyleSheet { href, media_conditions })
}

impl PageView for WebDocument {
    type Element = Element;

    fn root(&self) -> Option<Element> {
        self.document.document_element()
    }

    fn body(&self) -> Option<Element> {
        self.document.body().map(Into::into)
    }

    fn tag_name(&self, element: &Element) -> String {
        element.tag_name().to_ascii_lowercase()
    }

    fn attribute(&self, element: &Element, name: &str) -> Option<String> {
        element.get_attribute(name)
    }

    fn computed_style(&self, element: &Element, property: &str) -> Result<String, PageError> {
        let declaration = self
            .window
            .get_computed_style(element)
            .map_err(|e| PageError::Unavailable(js_detail(&e)))?
            .ok_or_else(|| PageError::Unavailable("getComputedStyle returned null".to_owned()))?;
        declaration
            .get_property_value(property)
            .map_err(|e| PageError::Unavailable(js_detail(&e)))
    }

    fn query_all(&self, selector: &Selector) -> Result<Vec<Element>, PageError> {
        let css = selector.to_css();
        let list = self
            .document
            .query_selector_all(&css)
            .map_err(|_| PageError::InvalidSelector(css.clone()))?;
        Ok((0..list.length())
            .filter_map(|index| list.item(index))
            .filter_map(|node| node.dyn_ref::<Element>().cloned())
            .collect())
    }

    fn stylesheets(&self) -> Vec<Result<StyleSheet, PageError>> {
        let list = self.document.style_sheets();
        (0..list.length()).filter_map(|index| list.item(index)).map(read_sheet).collect()
    }

    fn hostname(&self) -> String {
        self.window.location().hostname().unwrap_or_default()
    }
}

/// A `MutationObserver` and the closure it calls. Disconnects on drop.
pub struct ObserverHandle {
    observer: MutationObserver,
    _callback: Closure<dyn FnMut(Array, MutationObserver)>,
}

impl Subscription for ObserverHandle {
    fn cancel(&mut self) {
        self.observer.disconnect();
    }
}

impl Drop for ObserverHandle {
    fn drop(&mut self) {
        self.cancel();
    }
}

impl Dom for WebDocument {
    type Subscription = ObserverHandle;

    fn head(&self) -> Option<Element> {
        self.document.head().map(Into::into)
    }

    fn content_loaded(&self) -> LocalBoxFuture<'static, ()> {
        if self.document.ready_state() != "loading" {
            return Box::pin(future::ready(()));
        }
        let (sender, receiver) = oneshot::channel();
        let closure = Closure::once(move |_event: Event| {
            if sender.send(()).is_err() {
                log::debug!("DOMContentLoaded fired after its waiter went away");
            }
        });
        if let Err(e) = self
            .document
            .add_event_listener_with_callback("DOMContentLoaded", closure.as_ref().unchecked_ref())
        {
            log::warn!("cannot wait for DOMContentLoaded: {}", js_detail(&e));
            return Box::pin(future::ready(()));
        }
        // Fires at most once per document.
        closure.forget();
        Box::pin(async move {
            if receiver.await.is_err() {
                log::debug!("DOMContentLoaded listener dropped");
            }
        })
    }

    fn element_by_id(&self, id: &str) -> Option<Element> {
        self.document.get_element_by_id(id)
    }

    fn create_element(&self, tag: &str) -> Result<Element, DomError> {
        self.document
            .create_element(tag)
            .map_err(|e| DomError::operation("createElement", js_detail(&e)))
    }

    fn append_child(&self, parent: &Element, child: &Element) -> Result<(), DomError> {
        parent
            .append_child(child)
            .map(drop)
            .map_err(|e| DomError::operation("appendChild", js_detail(&e)))
    }

    fn set_attribute(&self, element: &Element, name: &str, value: &str) -> Result<(), DomError> {
        element
            .set_attribute(name, value)
            .map_err(|e| DomError::operation("setAttribute", js_detail(&e)))
    }

    fn remove_attribute(&self, element: &Element, name: &str) -> Result<(), DomError> {
        element
            .remove_attribute(name)
            .map_err(|e| DomError::operation("removeAttribute", js_detail(&e)))
    }

    fn add_class(&self, element: &Element, class: &str) -> Result<(), DomError> {
        element
            .class_list()
            .add_1(class)
            .map_err(|e| DomError::operation("classList.add", js_detail(&e)))
    }

    fn set_style(&self, element: &Element, property: &str, value: &str) -> Result<(), DomError> {
        Self::inline(element, "style.setProperty")?
            .set_property(property, value)
            .map_err(|e| DomError::operation("style.setProperty", js_detail(&e)))
    }

    fn remove_style(&self, element: &Element, property: &str) -> Result<(), DomError> {
        Self::inline(element, "style.removeProperty")?
            .remove_property(property)
            .map(drop)
            .map_err(|e| DomError::operation("style.removeProperty", js_detail(&e)))
    }

    fn inline_style(&self, element: &Element, property: &str) -> Option<String> {
        match element.dyn_ref::<HtmlElement>()?.style().get_property_value(property) {
            Ok(value) => (!value.is_empty()).then_some(value),
            Err(e) => {
                log::debug!("inline {property} unreadable: {}", js_detail(&e));
                None
            }
        }
    }

    fn set_text(&self, element: &Element, text: &str) -> Result<(), DomError> {
        element.set_text_content(Some(text));
        Ok(())
    }

    fn on_click(&self, element: &Element, handler: Box<dyn FnMut()>) -> Result<(), DomError> {
        let mut handler = handler;
        let closure = Closure::wrap(Box::new(move |_event: Event| handler()) as Box<dyn FnMut(Event)>);
        element
            .add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())
            .map_err(|e| DomError::operation("addEventListener", js_detail(&e)))?;
        // The button lives as long as the page.
        closure.forget();
        Ok(())
    }

    fn subscribe(
        &self,
        scope: &Element,
        filter: MutationFilter,
        callback: Box<dyn FnMut()>,
    ) -> Result<ObserverHandle, DomError> {
        let mut callback = callback;
        let closure = Closure::wrap(Box::new(move |records: Array, _observer: MutationObserver| {
            let wanted = records.iter().any(|record| {
                record.dyn_ref::<MutationRecord>().is_some_and(|record| match filter {
                    MutationFilter::AddedDescendants => record.added_nodes().length() > 0,
                })
            });
            if wanted {
                callback();
            }
        }) as Box<dyn FnMut(Array, MutationObserver)>);

        let observer = MutationObserver::new(closure.as_ref().unchecked_ref())
            .map_err(|e| DomError::operation("MutationObserver", js_detail(&e)))?;
        let init = MutationObserverInit::new();
        init.set_child_list(true);
        init.set_subtree(true);
        observer
            .observe_with_options(scope, &init)
            .map_err(|e| DomError::operation("MutationObserver.observe", js_detail(&e)))?;
        Ok(ObserverHandle { observer, _callback: closure })
    }
}
