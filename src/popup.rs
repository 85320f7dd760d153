//! Settings popup behavior.
//!
//! The popup shows the stored preference and, on change, persists it and
//! tells the active tab. The tab may have no content script (browser pages,
//! excluded sites); that is reported as not delivered and nothing more.

use crate::messaging::{Command, CommandSender, send_command};
use crate::preference::{PreferenceStore, read_theme_preference, write_theme_preference};

#[cfg(test)]
#[path = "popup_test.rs"]
mod popup_test;

pub const STATUS_ACTIVE: &str = "✓ Dark theme is active";
pub const STATUS_INACTIVE: &str = "Dark theme is off";

#[must_use]
pub fn status_text(enabled: bool) -> &'static str {
    if enabled { STATUS_ACTIVE } else { STATUS_INACTIVE }
}

/// What the popup shows for one state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PopupView {
    pub checked: bool,
    pub status: &'static str,
}

impl PopupView {
    #[must_use]
    pub fn for_state(enabled: bool) -> Self {
        Self { checked: enabled, status: status_text(enabled) }
    }
}

/// Initial view from the stored preference.
pub async fn load_state<S: PreferenceStore + ?Sized>(store: &S) -> PopupView {
    PopupView::for_state(read_theme_preference(store).await)
}

/// Outcome of a popup change.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ChangeOutcome {
    pub view: PopupView,
    pub persisted: bool,
    pub delivered: bool,
}

/// Persist `enabled`, then send it to the active tab. The command is sent
/// even when persisting fails so the open page still follows the switch.
pub async fn change_theme<S, C>(store: &S, sender: &C, enabled: bool) -> ChangeOutcome
where
    S: PreferenceStore + ?Sized,
    C: CommandSender + ?Sized,
{
    let persisted = write_theme_preference(store, enabled).await;
    let delivered = send_command(sender, &Command::ToggleTheme { enabled }).await;
    log::debug!("popup change enabled={enabled} persisted={persisted} delivered={delivered}");
    ChangeOutcome { view: PopupView::for_state(enabled), persisted, delivered }
}
