use std::cell::{Cell, RefCell};
use std::collections::HashMap;

use async_trait::async_trait;
use futures::executor::block_on;
use pretty_assertions::assert_eq;

use super::*;
use crate::consts::PREFERENCE_KEY;
use crate::error::{MessageError, PreferenceError};

#[derive(Default)]
struct MapStore {
    values: RefCell<HashMap<String, bool>>,
    broken: Cell<bool>,
}

#[async_trait(?Send)]
impl PreferenceStore for MapStore {
    async fn get(&self, key: &str) -> Result<Option<bool>, PreferenceError> {
        if self.broken.get() {
            return Err(PreferenceError::Unavailable("sync disabled".to_owned()));
        }
        Ok(self.values.borrow().get(key).copied())
    }

    async fn set(&self, key: &str, value: bool) -> Result<(), PreferenceError> {
        if self.broken.get() {
            return Err(PreferenceError::Unavailable("sync disabled".to_owned()));
        }
        self.values.borrow_mut().insert(key.to_owned(), value);
        Ok(())
    }
}

#[derive(Default)]
struct Tab {
    received: RefCell<Vec<Command>>,
    absent: bool,
}

#[async_trait(?Send)]
impl CommandSender for Tab {
    async fn send(&self, command: &Command) -> Result<(), MessageError> {
        if self.absent {
            return Err(MessageError::NoReceiver("Receiving end does not exist.".to_owned()));
        }
        self.received.borrow_mut().push(*command);
        Ok(())
    }
}

#[test]
fn status_line_matches_state() {
    assert_eq!(status_text(true), "✓ Dark theme is active");
    assert_eq!(status_text(false), "Dark theme is off");
}

#[test]
fn load_reflects_stored_preference() {
    let store = MapStore::default();
    assert_eq!(block_on(load_state(&store)), PopupView { checked: false, status: STATUS_INACTIVE });

    store.values.borrow_mut().insert(PREFERENCE_KEY.to_owned(), true);
    assert_eq!(block_on(load_state(&store)), PopupView { checked: true, status: STATUS_ACTIVE });
}

#[test]
fn change_persists_then_notifies_tab() {
    let store = MapStore::default();
    let tab = Tab::default();

    let outcome = block_on(change_theme(&store, &tab, true));

    assert_eq!(
        outcome,
        ChangeOutcome { view: PopupView::for_state(true), persisted: true, delivered: true }
    );
    assert_eq!(store.values.borrow().get(PREFERENCE_KEY), Some(&true));
    assert_eq!(*tab.received.borrow(), vec![Command::ToggleTheme { enabled: true }]);
}

#[test]
fn tab_without_content_script_is_tolerated() {
    let store = MapStore::default();
    let tab = Tab { absent: true, ..Tab::default() };

    let outcome = block_on(change_theme(&store, &tab, true));

    assert!(outcome.persisted);
    assert!(!outcome.delivered);
    assert_eq!(outcome.view.status, STATUS_ACTIVE);
}

#[test]
fn failed_persist_still_sends_command() {
    let store = MapStore::default();
    store.broken.set(true);
    let tab = Tab::default();

    let outcome = block_on(change_theme(&store, &tab, false));

    assert!(!outcome.persisted);
    assert!(outcome.delivered);
    assert_eq!(*tab.received.borrow(), vec![Command::ToggleTheme { enabled: false }]);
}
