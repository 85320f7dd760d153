//! Independent native-dark-theme signal detectors.
//!
//! Every detector is a read-only function of the page and never fails: any
//! [`PageError`](crate::page::PageError) it meets becomes part of a negative
//! signal's indicator text.

use serde::{Deserialize, Serialize};

use crate::color::{DARK_BACKGROUND_MAX, relative_luminance, text_is_light};
use crate::page::PageView;
use crate::vocab;

#[cfg(test)]
#[path = "signals_test.rs"]
mod signals_test;

/// Evidence produced by one detector.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DetectionSignal {
    /// Human-readable description of what was (or was not) found.
    pub indicator: String,
    /// Confidence in `[0, 1]`.
    pub confidence: f64,
    pub positive: bool,
}

impl DetectionSignal {
    #[must_use]
    pub fn positive(indicator: impl Into<String>, confidence: f64) -> Self {
        Self { indicator: indicator.into(), confidence: confidence.clamp(0.0, 1.0), positive: true }
    }

    #[must_use]
    pub fn negative(indicator: impl Into<String>) -> Self {
        Self { indicator: indicator.into(), confidence: 0.0, positive: false }
    }
}

/// The detectors, in evaluation order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DetectorKind {
    PageDarkness,
    ThemeToggle,
    DarkIndicators,
    ColorSchemeSupport,
    KnownSite,
}

impl DetectorKind {
    pub const ALL: [Self; 5] =
        [Self::PageDarkness, Self::ThemeToggle, Self::DarkIndicators, Self::ColorSchemeSupport, Self::KnownSite];

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::PageDarkness => "page darkness",
            Self::ThemeToggle => "theme toggle",
            Self::DarkIndicators => "dark indicators",
            Self::ColorSchemeSupport => "color scheme support",
            Self::KnownSite => "known site",
        }
    }

    /// Run this detector. `extra_sites` extends the known-site allowlist.
    pub fn evaluate<P: PageView>(self, page: &P, extra_sites: &[String]) -> DetectionSignal {
        match self {
            Self::PageDarkness => page_darkness(page),
            Self::ThemeToggle => theme_toggle(page),
            Self::DarkIndicators => dark_indicators(page),
            Self::ColorSchemeSupport => color_scheme_support(page),
            Self::KnownSite => known_site(&page.hostname(), extra_sites),
        }
    }
}

/// Weighted darkness of `<html>` and `<body>` colors.
///
/// Each checked element adds 1.0 for a dark background and another 0.5 when
/// its text is light on that background. The page is dark when the weight per
/// checked element exceeds 0.5.
pub fn page_darkness<P: PageView>(page: &P) -> DetectionSignal {
    let mut weight = 0.0;
    let mut checked = 0_u32;
    for element in [page.root(), page.body()].into_iter().flatten() {
        checked += 1;
        let background = relative_luminance(&page.computed_style(&element, "background-color").unwrap_or_default());
        let text = relative_luminance(&page.computed_style(&element, "color").unwrap_or_default());
        if background < DARK_BACKGROUND_MAX {
            weight += vocab::DARK_BACKGROUND_WEIGHT;
            if text_is_light(text) {
                weight += vocab::LIGHT_ON_DARK_WEIGHT;
            }
        }
    }

    let ratio = if checked == 0 { 0.0 } else { weight / f64::from(checked) };
    let confidence = (ratio * vocab::DARK_RATIO_CONFIDENCE_SCALE).min(1.0);
    if ratio > vocab::DARK_RATIO_THRESHOLD {
        DetectionSignal::positive(format!("page background is dark (dark ratio {ratio:.2})"), confidence)
    } else {
        DetectionSignal {
            indicator: format!("page background is light (dark ratio {ratio:.2})"),
            confidence,
            positive: false,
        }
    }
}

/// A theme switch control somewhere on the page.
pub fn theme_toggle<P: PageView>(page: &P) -> DetectionSignal {
    for selector in vocab::THEME_TOGGLE_SELECTORS {
        match page.query_all(selector) {
            Ok(found) if !found.is_empty() => {
                return DetectionSignal::positive(
                    format!("theme toggle control found ({})", selector.to_css()),
                    vocab::THEME_TOGGLE_CONFIDENCE,
                );
            }
            Ok(_) => {}
            Err(e) => log::debug!("theme toggle query skipped: {e}"),
        }
    }
    DetectionSignal::negative("no theme toggle control")
}

/// Dark theme classes, theme attributes, and dark palette custom properties.
pub fn dark_indicators<P: PageView>(page: &P) -> DetectionSignal {
    let mut found = Vec::new();
    let root = page.root();
    let scanned = [("html", root.clone()), ("body", page.body())];

    for (label, element) in &scanned {
        let Some(element) = element else {
            continue;
        };
        let classes = page.class_list(element);
        for class in vocab::DARK_CLASSES {
            if classes.iter().any(|c| c == class) {
                found.push(format!("class {class} on <{label}>"));
            }
        }
        for attr in vocab::THEME_ATTRIBUTES {
            if let Some(value) = page.attribute(element, attr) {
                if value.to_ascii_lowercase().contains(vocab::DARK_ATTRIBUTE_VALUE) {
                    found.push(format!("{attr}={value} on <{label}>"));
                }
            }
        }
    }

    if let Some(root) = &root {
        for property in vocab::DARK_CUSTOM_PROPERTIES {
            match page.computed_style(root, property) {
                Ok(value) if !value.trim().is_empty() => found.push(format!("custom property {property}")),
                Ok(_) => {}
                Err(e) => log::debug!("custom property {property} unreadable: {e}"),
            }
        }
    }

    if found.is_empty() {
        DetectionSignal::negative("no dark theme indicators")
    } else {
        DetectionSignal::positive(
            format!("dark theme indicators: {}", found.join(", ")),
            vocab::DARK_INDICATOR_CONFIDENCE,
        )
    }
}

/// `prefers-color-scheme` media rules or a `color-scheme` meta tag.
///
/// Cross-origin stylesheets are skipped.
pub fn color_scheme_support<P: PageView>(page: &P) -> DetectionSignal {
    for sheet in page.stylesheets() {
        match sheet {
            Ok(sheet) => {
                if sheet
                    .media_conditions
                    .iter()
                    .any(|condition| condition.contains(vocab::COLOR_SCHEME_MEDIA_FEATURE))
                {
                    return DetectionSignal::positive(
                        format!("stylesheet media rule uses {}", vocab::COLOR_SCHEME_MEDIA_FEATURE),
                        vocab::COLOR_SCHEME_CONFIDENCE,
                    );
                }
            }
            Err(e) => log::debug!("stylesheet skipped: {e}"),
        }
    }

    match page.query_all(&vocab::COLOR_SCHEME_META) {
        Ok(meta) if !meta.is_empty() => {
            DetectionSignal::positive("color-scheme meta tag present", vocab::COLOR_SCHEME_CONFIDENCE)
        }
        Ok(_) => DetectionSignal::negative("no color-scheme support"),
        Err(e) => DetectionSignal::negative(format!("no color-scheme support ({e})")),
    }
}

/// Hostname contains an allowlisted domain.
#[must_use]
pub fn known_site(hostname: &str, extra_sites: &[String]) -> DetectionSignal {
    let host = hostname.to_ascii_lowercase();
    let listed = |site: &str| !site.is_empty() && host.contains(&site.to_ascii_lowercase());
    let matched = vocab::KNOWN_DARK_SITES
        .iter()
        .find(|site| listed(**site))
        .map(|site| (*site).to_owned())
        .or_else(|| extra_sites.iter().find(|site| listed(site.as_str())).cloned());
    match matched {
        Some(site) => DetectionSignal::positive(format!("known dark theme site ({site})"), vocab::KNOWN_SITE_CONFIDENCE),
        None => DetectionSignal::negative("hostname not on known dark theme list"),
    }
}
