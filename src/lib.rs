//! # umbra
//!
//! Content script that applies a site-wide dark theme, unless the page already
//! ships a native one.
//!
//! The crate is split the same way as the detection core: everything that can
//! be decided without a browser is plain Rust over the [`dom::Dom`] capability,
//! and the `browser` feature adds the `web-sys` implementation plus the
//! `#[wasm_bindgen]` entry points.
//!
//! | Module | Role |
//! |--------|------|
//! | [`lifecycle`] | Startup sequencing and the per-page [`lifecycle::Session`] |
//! | [`controller`] | Enabled/disabled state machine and the chart styling pass |
//! | [`affordance`] | The floating toggle button |
//! | [`dom`] | Mutable DOM capability and mutation subscriptions |
//! | [`memory`] | Headless [`dom::Dom`] implementation |
//! | [`preference`] | Persisted on/off preference collaborator |
//! | [`messaging`] | Popup-to-page command envelope |
//! | [`popup`] | Settings popup behavior |
//! | [`runtime`] | Timers and task spawning |
//! | [`config`] | Tunable settings |
//! | [`consts`] | Marker names, styles, and chart vocabulary |

pub mod affordance;
pub mod config;
pub mod consts;
pub mod controller;
pub mod dom;
pub mod error;
pub mod lifecycle;
pub mod memory;
pub mod messaging;
pub mod popup;
pub mod preference;
pub mod runtime;

#[cfg(feature = "browser")]
pub mod browser;

pub use umbra_detect as detect;
