//! Plain-text rendering of probe results.

use umbra_detect::color::{Tone, background_tone, relative_luminance};
use umbra_detect::{DetectionResult, Detector, PageView};

#[cfg(test)]
#[path = "report_test.rs"]
mod report_test;

/// One line per detector followed by the verdict.
pub fn render_detection<P: PageView>(detector: &Detector, page: &P) -> String {
    let signals = detector.signals(page);
    let mut lines: Vec<String> = signals
        .iter()
        .map(|(kind, signal)| {
            let mark = if signal.positive { '+' } else { '-' };
            format!("{mark} {:<21} {:.2}  {}", kind.label(), signal.confidence, signal.indicator)
        })
        .collect();

    let plain: Vec<_> = signals.into_iter().map(|(_, signal)| signal).collect();
    let result = DetectionResult::from_signals(&plain, detector.exclude_threshold);
    lines.push(format!("host {}: {}", page.hostname(), result.summary()));
    lines.join("\n")
}

/// `color  luminance  tone` per input.
pub fn render_luminance(colors: &[String]) -> String {
    colors
        .iter()
        .map(|color| {
            let luminance = relative_luminance(color);
            let tone = match background_tone(luminance) {
                Tone::Dark => "dark",
                Tone::Light => "light",
                Tone::Unknown => "unknown",
            };
            format!("{color}\t{luminance:.4}\t{tone}")
        })
        .collect::<Vec<_>>()
        .join("\n")
}
