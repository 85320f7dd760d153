//! Browser bindings and `#[wasm_bindgen]` entry points.
//!
//! The extension's JS shims import the wasm module and call
//! [`start_content_script`] on every page and [`start_popup`] from the popup
//! document. Everything here is thin: behavior lives in the host-testable
//! modules and this layer only adapts `web-sys` to their traits.

pub mod dom;
pub mod messaging;
pub mod runtime;
pub mod storage;

use std::rc::Rc;

use wasm_bindgen::JsCast;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::wasm_bindgen;
use wasm_bindgen_futures::spawn_local;
use web_sys::{Element, Event, HtmlInputElement};

use self::dom::WebDocument;
use self::messaging::ActiveTabSender;
use self::runtime::BrowserRuntime;
use self::storage::SyncStorage;
use crate::lifecycle::{Activation, initialize};
use crate::popup::{self, PopupView};

pub const POPUP_TOGGLE_ID: &str = "themeToggle";
pub const POPUP_STATUS_ID: &str = "status";
const POPUP_ACTIVE_CLASS: &str = "active";

fn install_logging() {
    console_error_panic_hook::set_once();
    // Filtered later by `log::set_max_level` once config is known.
    if console_log::init_with_level(log::Level::Trace).is_err() {
        log::debug!("logger already installed");
    }
}

/// Content script entry point.
#[wasm_bindgen]
pub fn start_content_script() {
    install_logging();
    spawn_local(run_content_script());
}

async fn run_content_script() {
    let config = storage::load_config().await;
    log::set_max_level(config.level_filter());

    let Some(doc) = WebDocument::current() else {
        log::warn!("no document to theme");
        return;
    };
    match initialize(doc, Rc::new(SyncStorage), Rc::new(BrowserRuntime), &config).await {
        Ok(Activation::Active(session)) => messaging::listen(move |command| session.handle_command(&command)),
        Ok(Activation::Excluded(_)) => {}
        Err(e) => log::warn!("dark theme unavailable: {e}"),
    }
}

/// Popup entry point.
#[wasm_bindgen]
pub fn start_popup() {
    install_logging();
    spawn_local(run_popup());
}

fn render_popup(toggle: &HtmlInputElement, status: &Element, view: PopupView) {
    toggle.set_checked(view.checked);
    status.set_text_content(Some(view.status));
    if let Err(e) = status.class_list().toggle_with_force(POPUP_ACTIVE_CLASS, view.checked) {
        log::debug!("status class update failed: {}", dom::js_detail(&e));
    }
}

async fn run_popup() {
    let Some(document) = web_sys::window().and_then(|w| w.document()) else {
        return;
    };
    let toggle = document
        .get_element_by_id(POPUP_TOGGLE_ID)
        .and_then(|element| element.dyn_ref::<HtmlInputElement>().cloned());
    let status = document.get_element_by_id(POPUP_STATUS_ID);
    let (Some(toggle), Some(status)) = (toggle, status) else {
        log::warn!("popup is missing #{POPUP_TOGGLE_ID} or #{POPUP_STATUS_ID}");
        return;
    };

    render_popup(&toggle, &status, popup::load_state(&SyncStorage).await);

    let input = toggle.clone();
    let closure = Closure::wrap(Box::new(move |_event: Event| {
        let enabled = input.checked();
        let toggle = input.clone();
        let status = status.clone();
        spawn_local(async move {
            let outcome = popup::change_theme(&SyncStorage, &ActiveTabSender, enabled).await;
            render_popup(&toggle, &status, outcome.view);
        });
    }) as Box<dyn FnMut(Event)>);
    if let Err(e) = toggle.add_event_listener_with_callback("change", closure.as_ref().unchecked_ref()) {
        log::warn!("popup toggle not wired: {}", dom::js_detail(&e));
    }
    closure.forget();
}
