//! Combines detector signals into a single verdict.

use serde::{Deserialize, Serialize};

use crate::page::PageView;
use crate::signals::{DetectionSignal, DetectorKind};

#[cfg(test)]
#[path = "aggregate_test.rs"]
mod aggregate_test;

/// Mean positive confidence at or above which a page is left alone.
pub const DEFAULT_EXCLUDE_THRESHOLD: f64 = 0.6;

/// Verdict for one page load.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetectionResult {
    pub has_native_dark_theme: bool,
    /// Mean confidence of the positive signals, 0 when there are none.
    pub confidence: f64,
    /// Indicator text of every evaluated signal, in evaluation order.
    pub reasons: Vec<String>,
    pub should_exclude: bool,
}

impl DetectionResult {
    /// Aggregate already-evaluated signals.
    #[must_use]
    pub fn from_signals(signals: &[DetectionSignal], exclude_threshold: f64) -> Self {
        let positive: Vec<f64> = signals.iter().filter(|s| s.positive).map(|s| s.confidence).collect();
        let has_native_dark_theme = !positive.is_empty();
        #[allow(clippy::cast_precision_loss)]
        let confidence = if has_native_dark_theme { positive.iter().sum::<f64>() / positive.len() as f64 } else { 0.0 };
        Self {
            has_native_dark_theme,
            confidence,
            reasons: signals.iter().map(|s| s.indicator.clone()).collect(),
            should_exclude: has_native_dark_theme && confidence >= exclude_threshold,
        }
    }

    /// One-line description for logs.
    #[must_use]
    pub fn summary(&self) -> String {
        let verdict = match (self.has_native_dark_theme, self.should_exclude) {
            (true, true) => "native dark theme, skipping",
            (true, false) => "weak native dark theme evidence",
            (false, _) => "no native dark theme",
        };
        format!("{verdict} (confidence {:.2})", self.confidence)
    }
}

/// Configured detection pass.
#[derive(Clone, Debug, PartialEq)]
pub struct Detector {
    pub exclude_threshold: f64,
    /// Appended to the built-in known-site allowlist.
    pub extra_known_sites: Vec<String>,
}

impl Default for Detector {
    fn default() -> Self {
        Self { exclude_threshold: DEFAULT_EXCLUDE_THRESHOLD, extra_known_sites: Vec::new() }
    }
}

impl Detector {
    /// Evaluate every detector in order.
    pub fn signals<P: PageView>(&self, page: &P) -> Vec<(DetectorKind, DetectionSignal)> {
        DetectorKind::ALL
            .iter()
            .map(|kind| (*kind, kind.evaluate(page, &self.extra_known_sites)))
            .collect()
    }

    /// Evaluate every detector and aggregate.
    pub fn run<P: PageView>(&self, page: &P) -> DetectionResult {
        let signals: Vec<DetectionSignal> = self
            .signals(page)
            .into_iter()
            .map(|(kind, signal)| {
                log::debug!(
                    "detector={} positive={} confidence={:.2} indicator={}",
                    kind.label(),
                    signal.positive,
                    signal.confidence,
                    signal.indicator
                );
                signal
            })
            .collect();
        DetectionResult::from_signals(&signals, self.exclude_threshold)
    }
}

/// Run the default detector against `page`.
pub fn detect_native_dark_theme<P: PageView>(page: &P) -> DetectionResult {
    Detector::default().run(page)
}
