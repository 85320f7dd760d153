//! Native dark theme detection for arbitrary web pages.
//!
//! This crate decides whether a page already ships its own dark presentation so
//! the content script can stay out of the way. It never touches a browser API
//! directly: every query goes through the read-only [`page::PageView`]
//! capability, which the content script implements over `web-sys` and which
//! [`snapshot::SnapshotPage`] implements over a captured JSON snapshot.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`color`] | Relative luminance and dark/light classification |
//! | [`selector`] | Declarative element selectors, CSS rendering and matching |
//! | [`vocab`] | Constant detection vocabulary (selectors, classes, allowlist) |
//! | [`page`] | Read-only page capability and its error type |
//! | [`signals`] | The five independent signal detectors |
//! | [`aggregate`] | Combines signals into a [`aggregate::DetectionResult`] |
//! | [`snapshot`] | Serde page snapshot implementing [`page::PageView`] |

pub mod aggregate;
pub mod color;
pub mod page;
pub mod selector;
pub mod signals;
pub mod snapshot;
pub mod vocab;

pub use aggregate::{DetectionResult, Detector, detect_native_dark_theme};
pub use page::{PageError, PageView, StyleSheet};
pub use selector::Selector;
pub use signals::{DetectionSignal, DetectorKind};
