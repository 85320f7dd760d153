//! Command envelope between the popup and the page.
//!
//! The popup sends `{ "action": "toggleTheme", "enabled": bool }` to the
//! active tab. Delivery is at most once and a tab without the content script
//! is normal, so a missing receiver is logged and otherwise ignored.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::MessageError;

#[cfg(test)]
#[path = "messaging_test.rs"]
mod messaging_test;

/// Commands a control surface can send to a page.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action")]
pub enum Command {
    #[serde(rename = "toggleTheme")]
    ToggleTheme { enabled: bool },
}

impl Command {
    /// # Errors
    ///
    /// Returns [`MessageError::Malformed`] if serialization fails.
    pub fn to_json(&self) -> Result<String, MessageError> {
        Ok(serde_json::to_string(self)?)
    }

    /// # Errors
    ///
    /// Returns [`MessageError::Malformed`] for unknown actions or bad fields.
    pub fn from_json(raw: &str) -> Result<Self, MessageError> {
        Ok(serde_json::from_str(raw)?)
    }
}

/// Delivers a command to the active page.
#[async_trait(?Send)]
pub trait CommandSender {
    /// # Errors
    ///
    /// Returns [`MessageError::NoReceiver`] when nothing in the target context
    /// answered.
    async fn send(&self, command: &Command) -> Result<(), MessageError>;
}

/// Send `command` once. Returns whether a receiver took it.
pub async fn send_command<S: CommandSender + ?Sized>(sender: &S, command: &Command) -> bool {
    match sender.send(command).await {
        Ok(()) => true,
        Err(MessageError::NoReceiver(detail)) => {
            log::info!("content script not present: {detail}");
            false
        }
        Err(e) => {
            log::warn!("command not delivered: {e}");
            false
        }
    }
}
