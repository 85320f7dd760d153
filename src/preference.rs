//! Persisted on/off preference.
//!
//! Storage itself belongs to the host (extension storage in a browser). This
//! module only defines the request/response seam and the read policy: an
//! unavailable store or a missing key both mean "off".

use async_trait::async_trait;

use crate::consts::PREFERENCE_KEY;
use crate::error::PreferenceError;

#[cfg(test)]
#[path = "preference_test.rs"]
mod preference_test;

/// Asynchronous boolean key-value store.
#[async_trait(?Send)]
pub trait PreferenceStore {
    /// # Errors
    ///
    /// Returns [`PreferenceError::Unavailable`] when the store cannot answer.
    async fn get(&self, key: &str) -> Result<Option<bool>, PreferenceError>;

    /// # Errors
    ///
    /// Returns [`PreferenceError::Unavailable`] when the write is not durable.
    async fn set(&self, key: &str, value: bool) -> Result<(), PreferenceError>;
}

/// Read the dark theme preference, treating failures as off.
pub async fn read_theme_preference<S: PreferenceStore + ?Sized>(store: &S) -> bool {
    match store.get(PREFERENCE_KEY).await {
        Ok(value) => value.unwrap_or(false),
        Err(e) => {
            log::warn!("reading {PREFERENCE_KEY} failed, assuming off: {e}");
            false
        }
    }
}

/// Persist the dark theme preference. Returns whether the write succeeded.
pub async fn write_theme_preference<S: PreferenceStore + ?Sized>(store: &S, enabled: bool) -> bool {
    match store.set(PREFERENCE_KEY, enabled).await {
        Ok(()) => true,
        Err(e) => {
            log::warn!("writing {PREFERENCE_KEY}={enabled} failed: {e}");
            false
        }
    }
}
