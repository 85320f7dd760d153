//! `chrome.storage.sync` as the preference store.

use async_trait::async_trait;
use js_sys::{JSON, Object, Promise, Reflect};
use wasm_bindgen::JsValue;
use wasm_bindgen::prelude::wasm_bindgen;
use wasm_bindgen_futures::JsFuture;

use super::dom::js_detail;
use crate::config::Config;
use crate::consts::CONFIG_KEY;
use crate::error::PreferenceError;
use crate::preference::PreferenceStore;

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(catch, js_namespace = ["chrome", "storage", "sync"], js_name = get)]
    fn sync_get(keys: &JsValue) -> Result<Promise, JsValue>;

    #[wasm_bindgen(catch, js_namespace = ["chrome", "storage", "sync"], js_name = set)]
    fn sync_set(items: &JsValue) -> Result<Promise, JsValue>;
}

fn unavailable(value: &JsValue) -> PreferenceError {
    PreferenceError::Unavailable(js_detail(value))
}

/// Raw stored value of `key`; `undefined` when unset.
async fn read_key(key: &str) -> Result<JsValue, PreferenceError> {
    let key = JsValue::from_str(key);
    let promise = sync_get(&key).map_err(|e| unavailable(&e))?;
    let items = JsFuture::from(promise).await.map_err(|e| unavailable(&e))?;
    Reflect::get(&items, &key).map_err(|e| unavailable(&e))
}

/// Extension-wide synced storage.
#[derive(Clone, Copy, Debug, Default)]
pub struct SyncStorage;

#[async_trait(?Send)]
impl PreferenceStore for SyncStorage {
    async fn get(&self, key: &str) -> Result<Option<bool>, PreferenceError> {
        Ok(read_key(key).await?.as_bool())
    }

    async fn set(&self, key: &str, value: bool) -> Result<(), PreferenceError> {
        let items = Object::new();
        Reflect::set(&items, &JsValue::from_str(key), &JsValue::from_bool(value)).map_err(|e| unavailable(&e))?;
        let promise = sync_set(&items).map_err(|e| unavailable(&e))?;
        JsFuture::from(promise).await.map_err(|e| unavailable(&e))?;
        Ok(())
    }
}

/// Load the stored [`Config`], falling back to defaults.
pub async fn load_config() -> Config {
    let raw = match read_key(CONFIG_KEY).await {
        Ok(value) if value.is_undefined() || value.is_null() => None,
        Ok(value) => match JSON::stringify(&value) {
            Ok(raw) => Some(String::from(raw)),
            Err(e) => {
                log::warn!("{CONFIG_KEY} is not serializable: {}", js_detail(&e));
                None
            }
        },
        Err(e) => {
            log::warn!("reading {CONFIG_KEY} failed: {e}");
            None
        }
    };
    Config::from_json_or_default(raw.as_deref())
}
