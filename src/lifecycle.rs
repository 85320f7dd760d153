//! Content script startup and the per-page session.
//!
//! SYSTEM CONTEXT
//! ==============
//! [`initialize`] runs once per page load:
//!
//! 1. wait for `<body>`, sleeping between bounded retries,
//! 2. run native dark theme detection once and stop if the page has one,
//! 3. read the stored preference and enable the theme if it is on,
//! 4. install the toggle button.
//!
//! An excluded page never touches storage and gets no button. An active page
//! yields a [`Session`], which the host keeps alive for the page's lifetime
//! and feeds popup commands into.

use std::cell::RefCell;
use std::rc::Rc;

use umbra_detect::DetectionResult;

use crate::affordance::{ensure_affordance, render_affordance};
use crate::config::Config;
use crate::controller::ThemeController;
use crate::dom::Dom;
use crate::error::{DomError, InitError};
use crate::messaging::Command;
use crate::preference::{PreferenceStore, read_theme_preference, write_theme_preference};
use crate::runtime::Runtime;

#[cfg(test)]
#[path = "lifecycle_test.rs"]
mod lifecycle_test;

/// Outcome of [`initialize`].
pub enum Activation<D: Dom, S> {
    /// The page already has a dark theme; nothing was changed.
    Excluded(DetectionResult),
    Active(Session<D, S>),
}

/// Run the startup sequence against `doc`.
///
/// # Errors
///
/// Returns [`InitError::BodyUnavailable`] when the document finished parsing
/// without a `<body>`.
pub async fn initialize<D, S, R>(
    doc: D,
    store: Rc<S>,
    runtime: Rc<R>,
    config: &Config,
) -> Result<Activation<D, S>, InitError>
where
    D: Dom,
    S: PreferenceStore + 'static,
    R: Runtime + 'static,
{
    wait_for_body(&doc, runtime.as_ref(), config).await?;

    let detection = if config.detection {
        let result = config.detector().run(&doc);
        log::info!("host={} {}", doc.hostname(), result.summary());
        if result.should_exclude {
            log::info!("leaving page alone: {}", result.reasons.join("; "));
            return Ok(Activation::Excluded(result));
        }
        Some(result)
    } else {
        log::debug!("native dark theme detection disabled");
        None
    };

    let enabled = read_theme_preference(store.as_ref()).await;
    let session = Session::new(doc, store, detection);
    if enabled {
        session.inner.controller.borrow_mut().set_enabled(true);
    }
    if let Err(e) = session.install_affordance(&runtime) {
        log::warn!("toggle button unavailable: {e}");
    }
    Ok(Activation::Active(session))
}

/// Resolve once `<body>` exists.
///
/// Polls every `body_retry_ms` up to `body_retry_limit` times, then waits for
/// the document to finish parsing, which covers slow streaming responses.
///
/// # Errors
///
/// Returns [`InitError::BodyUnavailable`] only when the document finished
/// parsing without a `<body>` (framesets, XML documents).
pub async fn wait_for_body<D, R>(doc: &D, runtime: &R, config: &Config) -> Result<D::Element, InitError>
where
    D: Dom,
    R: Runtime + ?Sized,
{
    let mut attempts = 0;
    while attempts < config.body_retry_limit {
        if let Some(body) = doc.body() {
            return Ok(body);
        }
        attempts += 1;
        runtime.sleep(config.body_retry_ms).await;
    }
    if let Some(body) = doc.body() {
        return Ok(body);
    }

    log::debug!("no <body> after {attempts} retries, waiting for DOMContentLoaded");
    doc.content_loaded().await;
    doc.body().ok_or_else(|| {
        log::warn!("document finished parsing without a <body>");
        InitError::BodyUnavailable { attempts }
    })
}

/// An activated page. Clones share the same state.
pub struct Session<D: Dom, S> {
    inner: Rc<SessionInner<D, S>>,
}

struct SessionInner<D: Dom, S> {
    doc: D,
    store: Rc<S>,
    controller: RefCell<ThemeController<D>>,
    button: RefCell<Option<D::Element>>,
    detection: Option<DetectionResult>,
}

impl<D: Dom, S> Clone for Session<D, S> {
    fn clone(&self) -> Self {
        Self { inner: Rc::clone(&self.inner) }
    }
}

impl<D: Dom, S: PreferenceStore + 'static> Session<D, S> {
    fn new(doc: D, store: Rc<S>, detection: Option<DetectionResult>) -> Self {
        let controller = RefCell::new(ThemeController::new(doc.clone()));
        Self { inner: Rc::new(SessionInner { doc, store, controller, button: RefCell::new(None), detection }) }
    }

    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.inner.controller.borrow().is_enabled()
    }

    #[must_use]
    pub fn is_observing(&self) -> bool {
        self.inner.controller.borrow().is_observing()
    }

    /// Detection verdict, absent when detection is switched off.
    #[must_use]
    pub fn detection(&self) -> Option<&DetectionResult> {
        self.inner.detection.as_ref()
    }

    #[must_use]
    pub fn button(&self) -> Option<D::Element> {
        self.inner.button.borrow().clone()
    }

    /// Drive the controller to `enabled` and refresh the button.
    pub fn apply(&self, enabled: bool) {
        self.inner.controller.borrow_mut().set_enabled(enabled);
        if let Some(button) = self.inner.button.borrow().as_ref()
            && let Err(e) = render_affordance(&self.inner.doc, button, enabled)
        {
            log::warn!("toggle button refresh failed: {e}");
        }
    }

    /// Flip the stored preference, persist it, and apply it. Returns the new
    /// state.
    pub async fn toggle(&self) -> bool {
        let enabled = !read_theme_preference(self.inner.store.as_ref()).await;
        write_theme_preference(self.inner.store.as_ref(), enabled).await;
        self.apply(enabled);
        log::info!("dark theme toggled enabled={enabled}");
        enabled
    }

    /// Handle a command from the popup. The sender already persisted it.
    pub fn handle_command(&self, command: &Command) {
        match *command {
            Command::ToggleTheme { enabled } => {
                log::debug!("command toggleTheme enabled={enabled}");
                self.apply(enabled);
            }
        }
    }

    /// Ensure the toggle button exists, wiring clicks to [`Session::toggle`]
    /// when this call created it.
    fn install_affordance<R: Runtime + 'static>(&self, runtime: &Rc<R>) -> Result<(), DomError> {
        let affordance = ensure_affordance(&self.inner.doc, self.is_enabled())?;
        if affordance.created {
            let weak = Rc::downgrade(&self.inner);
            let runtime = Rc::clone(runtime);
            self.inner.doc.on_click(
                &affordance.element,
                Box::new(move || {
                    if let Some(inner) = weak.upgrade() {
                        let session = Session { inner };
                        runtime.spawn(Box::pin(async move {
                            session.toggle().await;
                        }));
                    }
                }),
            )?;
        }
        *self.inner.button.borrow_mut() = Some(affordance.element);
        Ok(())
    }
}
