use std::cell::RefCell;

use futures::executor::block_on;
use pretty_assertions::assert_eq;

use super::*;

#[test]
fn toggle_command_uses_action_envelope() {
    let json = Command::ToggleTheme { enabled: true }.to_json().unwrap_or_default();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap_or_default();
    assert_eq!(value, serde_json::json!({ "action": "toggleTheme", "enabled": true }));
}

#[test]
fn parses_popup_message() {
    let command = Command::from_json(r#"{"action":"toggleTheme","enabled":false}"#);
    assert_eq!(command.ok(), Some(Command::ToggleTheme { enabled: false }));
}

#[test]
fn unknown_action_is_malformed() {
    assert!(matches!(Command::from_json(r#"{"action":"reload"}"#), Err(MessageError::Malformed(_))));
    assert!(matches!(Command::from_json(r#"{"action":"toggleTheme"}"#), Err(MessageError::Malformed(_))));
    assert!(matches!(Command::from_json("[]"), Err(MessageError::Malformed(_))));
}

#[derive(Default)]
struct RecordingSender {
    sent: RefCell<Vec<Command>>,
}

#[async_trait(?Send)]
impl CommandSender for RecordingSender {
    async fn send(&self, command: &Command) -> Result<(), MessageError> {
        self.sent.borrow_mut().push(*command);
        Ok(())
    }
}

struct NobodyHome;

#[async_trait(?Send)]
impl CommandSender for NobodyHome {
    async fn send(&self, _command: &Command) -> Result<(), MessageError> {
        Err(MessageError::NoReceiver("chrome://extensions".to_owned()))
    }
}

#[test]
fn send_command_delivers_once() {
    let sender = RecordingSender::default();
    assert!(block_on(send_command(&sender, &Command::ToggleTheme { enabled: true })));
    assert_eq!(*sender.sent.borrow(), vec![Command::ToggleTheme { enabled: true }]);
}

#[test]
fn missing_receiver_is_not_an_error() {
    assert!(!block_on(send_command(&NobodyHome, &Command::ToggleTheme { enabled: true })));
}
