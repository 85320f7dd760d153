//! Popup-to-tab command delivery over `chrome.runtime` and `chrome.tabs`.

use async_trait::async_trait;
use js_sys::{Array, Function, JSON, Object, Promise, Reflect};
use wasm_bindgen::JsCast;
use wasm_bindgen::JsValue;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::wasm_bindgen;
use wasm_bindgen_futures::JsFuture;

use super::dom::js_detail;
use crate::error::MessageError;
use crate::messaging::{Command, CommandSender};

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_namespace = ["chrome", "runtime", "onMessage"], js_name = addListener)]
    fn add_message_listener(listener: &Function);

    #[wasm_bindgen(catch, js_namespace = ["chrome", "tabs"], js_name = query)]
    fn tabs_query(query: &JsValue) -> Result<Promise, JsValue>;

    #[wasm_bindgen(catch, js_namespace = ["chrome", "tabs"], js_name = sendMessage)]
    fn tabs_send_message(tab_id: f64, message: &JsValue) -> Result<Promise, JsValue>;
}

/// Feed every well-formed runtime message to `handler` for the page's
/// lifetime. Malformed envelopes are logged and dropped.
pub fn listen<F: FnMut(Command) + 'static>(handler: F) {
    let mut handler = handler;
    let closure = Closure::wrap(Box::new(move |message: JsValue, _sender: JsValue, respond: JsValue| {
        match JSON::stringify(&message).map(String::from) {
            Ok(raw) => match Command::from_json(&raw) {
                Ok(command) => handler(command),
                Err(e) => log::warn!("ignoring message: {e}"),
            },
            Err(e) => log::warn!("ignoring unserializable message: {}", js_detail(&e)),
        }
        if let Some(respond) = respond.dyn_ref::<Function>()
            && let Err(e) = respond.call1(&JsValue::NULL, &JsValue::from_bool(true))
        {
            log::debug!("sender went away before the reply: {}", js_detail(&e));
        }
    }) as Box<dyn FnMut(JsValue, JsValue, JsValue)>);
    add_message_listener(closure.as_ref().unchecked_ref());
    closure.forget();
}

/// Sends commands to the active tab of the current window.
#[derive(Clone, Copy, Debug, Default)]
pub struct ActiveTabSender;

impl ActiveTabSender {
    async fn active_tab_id() -> Result<f64, MessageError> {
        let query = Object::new();
        for flag in ["active", "currentWindow"] {
            Reflect::set(&query, &JsValue::from_str(flag), &JsValue::TRUE)
                .map_err(|e| MessageError::NoReceiver(js_detail(&e)))?;
        }
        let promise = tabs_query(&query).map_err(|e| MessageError::NoReceiver(js_detail(&e)))?;
        let tabs = JsFuture::from(promise).await.map_err(|e| MessageError::NoReceiver(js_detail(&e)))?;
        let first = Array::from(&tabs).get(0);
        let id = Reflect::get(&first, &JsValue::from_str("id")).map_err(|e| MessageError::NoReceiver(js_detail(&e)))?;
        id.as_f64().ok_or_else(|| MessageError::NoReceiver("no active tab".to_owned()))
    }
}

#[async_trait(?Send)]
impl CommandSender for ActiveTabSender {
    async fn send(&self, command: &Command) -> Result<(), MessageError> {
        let tab_id = Self::active_tab_id().await?;
        let message = JSON::parse(&command.to_json()?).map_err(|e| MessageError::NoReceiver(js_detail(&e)))?;
        let promise = tabs_send_message(tab_id, &message).map_err(|e| MessageError::NoReceiver(js_detail(&e)))?;
        JsFuture::from(promise)
            .await
            .map(drop)
            .map_err(|e| MessageError::NoReceiver(js_detail(&e)))
    }
}
