use std::cell::{Cell, RefCell};
use std::collections::HashMap;

use async_trait::async_trait;
use futures::executor::{LocalPool, LocalSpawner};
use futures::future::{self, LocalBoxFuture};
use futures::task::LocalSpawnExt;
use pretty_assertions::assert_eq;
use umbra_detect::PageView;

use super::*;
use crate::consts::{PREFERENCE_KEY, THEME_MARKER_ATTR, TOGGLE_ID};
use crate::error::PreferenceError;
use crate::memory::{MemoryDocument, NodeId};

// =============================================================
// Fakes
// =============================================================

#[derive(Default)]
struct FakeStore {
    values: RefCell<HashMap<String, bool>>,
    reads: Cell<u32>,
    writes: Cell<u32>,
    broken: Cell<bool>,
}

impl FakeStore {
    fn with(enabled: bool) -> Rc<Self> {
        let store = Self::default();
        store.values.borrow_mut().insert(PREFERENCE_KEY.to_owned(), enabled);
        Rc::new(store)
    }

    fn stored(&self) -> Option<bool> {
        self.values.borrow().get(PREFERENCE_KEY).copied()
    }
}

#[async_trait(?Send)]
impl PreferenceStore for FakeStore {
    async fn get(&self, key: &str) -> Result<Option<bool>, PreferenceError> {
        self.reads.set(self.reads.get() + 1);
        if self.broken.get() {
            return Err(PreferenceError::Unavailable("offline".to_owned()));
        }
        Ok(self.values.borrow().get(key).copied())
    }

    async fn set(&self, key: &str, value: bool) -> Result<(), PreferenceError> {
        self.writes.set(self.writes.get() + 1);
        if self.broken.get() {
            return Err(PreferenceError::Unavailable("offline".to_owned()));
        }
        self.values.borrow_mut().insert(key.to_owned(), value);
        Ok(())
    }
}

/// Sleeps resolve immediately. Optionally parses `<body>` after N sleeps.
struct FakeRuntime {
    spawner: LocalSpawner,
    sleeps: Cell<u32>,
    body_after: Option<(MemoryDocument, u32)>,
}

impl FakeRuntime {
    fn new(pool: &LocalPool) -> Rc<Self> {
        Rc::new(Self { spawner: pool.spawner(), sleeps: Cell::new(0), body_after: None })
    }
}

impl Runtime for FakeRuntime {
    fn sleep(&self, _ms: u32) -> LocalBoxFuture<'static, ()> {
        self.sleeps.set(self.sleeps.get() + 1);
        if let Some((doc, after)) = &self.body_after
            && self.sleeps.get() >= *after
        {
            doc.ensure_body();
        }
        Box::pin(future::ready(()))
    }

    fn spawn(&self, task: LocalBoxFuture<'static, ()>) {
        self.spawner.spawn_local(task).expect("spawn");
    }
}

// =============================================================
// Helpers
// =============================================================

fn dark_github() -> MemoryDocument {
    let doc = MemoryDocument::new("github.com");
    for element in [doc.root(), doc.body()].into_iter().flatten() {
        doc.set_style(&element, "background-color", "rgb(0, 0, 0)").expect("style");
        doc.set_style(&element, "color", "rgb(255, 255, 255)").expect("style");
    }
    doc
}

fn marker(doc: &MemoryDocument) -> Option<String> {
    doc.attribute(&doc.root().expect("root"), THEME_MARKER_ATTR)
}

fn start(
    pool: &mut LocalPool,
    doc: &MemoryDocument,
    store: &Rc<FakeStore>,
    runtime: &Rc<FakeRuntime>,
    config: &Config,
) -> Result<Activation<MemoryDocument, FakeStore>, InitError> {
    pool.run_until(initialize(doc.clone(), Rc::clone(store), Rc::clone(runtime), config))
}

fn active(activation: Result<Activation<MemoryDocument, FakeStore>, InitError>) -> Session<MemoryDocument, FakeStore> {
    match activation.expect("initialize") {
        Activation::Active(session) => session,
        Activation::Excluded(result) => panic!("unexpectedly excluded: {}", result.summary()),
    }
}

fn button(doc: &MemoryDocument) -> NodeId {
    doc.element_by_id(TOGGLE_ID).expect("toggle button")
}

// =============================================================
// Exclusion
// =============================================================

#[test]
fn native_dark_page_is_left_untouched() {
    let mut pool = LocalPool::new();
    let doc = dark_github();
    let store = FakeStore::with(true);
    let runtime = FakeRuntime::new(&pool);

    let activation = start(&mut pool, &doc, &store, &runtime, &Config::default()).expect("initialize");

    let Activation::Excluded(result) = activation else { panic!("expected exclusion") };
    assert!(result.should_exclude);
    assert_eq!(store.reads.get(), 0);
    assert_eq!(doc.count_with_id(TOGGLE_ID), 0);
    assert_eq!(marker(&doc), None);
    assert_eq!(doc.live_subscriptions(), 0);
}

#[test]
fn detection_can_be_switched_off() {
    let mut pool = LocalPool::new();
    let doc = dark_github();
    let store = FakeStore::with(false);
    let runtime = FakeRuntime::new(&pool);
    let config = Config { detection: false, ..Config::default() };
    let session = active(start(&mut pool, &doc, &store, &runtime, &config));
    assert!(session.detection().is_none());
    assert_eq!(doc.count_with_id(TOGGLE_ID), 1);
}

// =============================================================
// Activation
// =============================================================

#[test]
fn stored_preference_enables_theme() {
    let mut pool = LocalPool::new();
    let doc = MemoryDocument::new("example.com");
    let store = FakeStore::with(true);
    let runtime = FakeRuntime::new(&pool);

    let session = active(start(&mut pool, &doc, &store, &runtime, &Config::default()));

    assert!(session.is_enabled());
    assert!(session.is_observing());
    assert_eq!(marker(&doc).as_deref(), Some("true"));
    assert_eq!(doc.text(&button(&doc)), "☀️");
    assert!(session.detection().is_some_and(|d| !d.should_exclude));
}

#[test]
fn missing_preference_leaves_theme_off_with_button() {
    let mut pool = LocalPool::new();
    let doc = MemoryDocument::new("example.com");
    let store = Rc::new(FakeStore::default());
    let runtime = FakeRuntime::new(&pool);

    let session = active(start(&mut pool, &doc, &store, &runtime, &Config::default()));

    assert!(!session.is_enabled());
    assert_eq!(marker(&doc), None);
    assert_eq!(doc.count_with_id(TOGGLE_ID), 1);
    assert_eq!(doc.text(&button(&doc)), "🌙");
    assert_eq!(session.button(), Some(button(&doc)));
}

#[test]
fn second_initialization_reuses_button() {
    let mut pool = LocalPool::new();
    let doc = MemoryDocument::new("example.com");
    let store = FakeStore::with(false);
    let runtime = FakeRuntime::new(&pool);

    let _first = active(start(&mut pool, &doc, &store, &runtime, &Config::default()));
    let _second = active(start(&mut pool, &doc, &store, &runtime, &Config::default()));

    assert_eq!(doc.count_with_id(TOGGLE_ID), 1);
}

// =============================================================
// Body readiness
// =============================================================

#[test]
fn waits_for_late_body() {
    let mut pool = LocalPool::new();
    let doc = MemoryDocument::without_body("example.com");
    let store = FakeStore::with(false);
    let runtime = Rc::new(FakeRuntime {
        spawner: pool.spawner(),
        sleeps: Cell::new(0),
        body_after: Some((doc.clone(), 3)),
    });

    let _session = active(start(&mut pool, &doc, &store, &runtime, &Config::default()));

    assert_eq!(runtime.sleeps.get(), 3);
    assert_eq!(doc.count_with_id(TOGGLE_ID), 1);
}

#[test]
fn slow_body_waits_for_content_loaded() {
    let mut pool = LocalPool::new();
    let doc = MemoryDocument::without_body("example.com");
    let store = FakeStore::with(true);
    let runtime = FakeRuntime::new(&pool);
    let outcome = Rc::new(RefCell::new(None));

    let task = {
        let (doc, store, runtime, outcome) = (doc.clone(), Rc::clone(&store), Rc::clone(&runtime), Rc::clone(&outcome));
        async move {
            let activation = initialize(doc, store, runtime, &Config::default()).await;
            *outcome.borrow_mut() = Some(activation);
        }
    };
    pool.spawner().spawn_local(task).expect("spawn");
    pool.run_until_stalled();

    // Polling is exhausted but startup is still pending, not failed.
    assert_eq!(runtime.sleeps.get(), Config::default().body_retry_limit);
    assert!(outcome.borrow().is_none());

    doc.ensure_body();
    doc.finish_loading();
    pool.run_until_stalled();

    let session = active(outcome.borrow_mut().take().expect("finished"));
    assert!(session.is_enabled());
    assert_eq!(marker(&doc).as_deref(), Some("true"));
    assert_eq!(doc.count_with_id(TOGGLE_ID), 1);
}

#[test]
fn parsed_document_without_body_is_reported() {
    let mut pool = LocalPool::new();
    let doc = MemoryDocument::without_body("example.com");
    doc.finish_loading();
    let store = FakeStore::with(true);
    let runtime = FakeRuntime::new(&pool);
    let config = Config { body_retry_limit: 4, ..Config::default() };

    let outcome = start(&mut pool, &doc, &store, &runtime, &config);

    assert!(matches!(outcome, Err(InitError::BodyUnavailable { attempts: 4 })));
    assert_eq!(runtime.sleeps.get(), 4);
    assert_eq!(store.reads.get(), 0);
    assert_eq!(doc.count_with_id(TOGGLE_ID), 0);
}

// =============================================================
// Toggling
// =============================================================

#[test]
fn click_flips_and_persists_preference() {
    let mut pool = LocalPool::new();
    let doc = MemoryDocument::new("example.com");
    let store = FakeStore::with(false);
    let runtime = FakeRuntime::new(&pool);
    let session = active(start(&mut pool, &doc, &store, &runtime, &Config::default()));

    doc.click(&button(&doc));
    pool.run_until_stalled();

    assert_eq!(store.stored(), Some(true));
    assert!(session.is_enabled());
    assert_eq!(marker(&doc).as_deref(), Some("true"));
    assert_eq!(doc.text(&button(&doc)), "☀️");

    doc.click(&button(&doc));
    pool.run_until_stalled();

    assert_eq!(store.stored(), Some(false));
    assert!(!session.is_enabled());
    assert!(!session.is_observing());
    assert_eq!(marker(&doc), None);
    assert_eq!(doc.text(&button(&doc)), "🌙");
}

#[test]
fn click_with_unavailable_storage_still_enables() {
    let mut pool = LocalPool::new();
    let doc = MemoryDocument::new("example.com");
    let store = FakeStore::with(true);
    let runtime = FakeRuntime::new(&pool);
    let session = active(start(&mut pool, &doc, &store, &runtime, &Config::default()));
    assert!(session.is_enabled());

    store.broken.set(true);
    let enabled = pool.run_until(session.toggle());

    // A failed read counts as off, so the flip turns the theme on.
    assert!(enabled);
    assert!(session.is_enabled());
    assert_eq!(store.writes.get(), 1);
}

#[test]
fn command_applies_without_writing() {
    let mut pool = LocalPool::new();
    let doc = MemoryDocument::new("example.com");
    let store = FakeStore::with(false);
    let runtime = FakeRuntime::new(&pool);
    let session = active(start(&mut pool, &doc, &store, &runtime, &Config::default()));

    session.handle_command(&Command::ToggleTheme { enabled: true });

    assert!(session.is_enabled());
    assert_eq!(doc.text(&button(&doc)), "☀️");
    assert_eq!(store.writes.get(), 0);

    session.handle_command(&Command::ToggleTheme { enabled: false });
    assert!(!session.is_enabled());
}

#[test]
fn dropped_session_ignores_clicks() {
    let mut pool = LocalPool::new();
    let doc = MemoryDocument::new("example.com");
    let store = FakeStore::with(false);
    let runtime = FakeRuntime::new(&pool);
    drop(active(start(&mut pool, &doc, &store, &runtime, &Config::default())));

    doc.click(&button(&doc));
    pool.run_until_stalled();

    assert_eq!(store.writes.get(), 0);
}

#[test]
fn inserted_charts_are_styled_while_enabled() {
    let mut pool = LocalPool::new();
    let doc = MemoryDocument::new("example.com");
    let store = FakeStore::with(true);
    let runtime = FakeRuntime::new(&pool);
    let _session = active(start(&mut pool, &doc, &store, &runtime, &Config::default()));
    doc.flush_mutations();

    let body = doc.body().expect("body");
    let canvas = doc.append_new(&body, "canvas").expect("canvas");
    assert_eq!(doc.flush_mutations(), 1);

    assert!(doc.class_list(&canvas).contains(&crate::consts::CHART_MARKER_CLASS.to_owned()));
}
