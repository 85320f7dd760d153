//! Shared names and vocabulary for the content script.

use umbra_detect::Selector;

// ── Markers ─────────────────────────────────────────────────────

/// Attribute on `<html>` that switches the injected stylesheet on.
pub const THEME_MARKER_ATTR: &str = "data-umbra-dark-theme";

/// Class added to every element the chart styling pass touched.
pub const CHART_MARKER_CLASS: &str = "umbra-dark-chart";

/// Class added to every `<svg>`.
pub const SVG_MARKER_CLASS: &str = "umbra-dark-svg";

/// Class added to chart-embedding `<iframe>`s.
pub const IFRAME_MARKER_CLASS: &str = "umbra-dark-iframe";

/// Inline filter for `<canvas>`, whose pixels ignore stylesheet overrides.
pub const CANVAS_FILTER: &str = "invert(0.9) hue-rotate(180deg)";

/// Id of the injected `<style>` element.
pub const STYLESHEET_ID: &str = "umbra-dark-theme-style";

/// Dark theme rules, inert unless [`THEME_MARKER_ATTR`] is set.
pub const DARK_THEME_CSS: &str = include_str!("../assets/dark-theme.css");

// ── Chart vocabulary ────────────────────────────────────────────

/// Chart-like elements: chart classes, canvases, SVGs, and library containers.
pub const CHART_SELECTORS: &[Selector] = &[
    Selector::Class("chart-container"),
    Selector::Class("highcharts-container"),
    Selector::Class("apexcharts-canvas"),
    Selector::Class("recharts-wrapper"),
    Selector::Class("js-plotly-plot"),
    Selector::Class("vega-embed"),
    Selector::AttrContains { tag: None, attr: "class", needle: "chart" },
    Selector::Tag("canvas"),
    Selector::Tag("svg"),
];

/// Iframes that embed a chart (TradingView widgets and the like).
pub const CHART_IFRAME_SELECTORS: &[Selector] = &[
    Selector::AttrContains { tag: Some("iframe"), attr: "src", needle: "chart" },
    Selector::AttrContains { tag: Some("iframe"), attr: "class", needle: "chart" },
];

const CANVAS: Selector = Selector::Tag("canvas");
const CHART_MARKER: Selector = Selector::Class(CHART_MARKER_CLASS);

/// Canvases the styling pass already filtered.
pub const STYLED_CANVAS: Selector = Selector::Both(&CANVAS, &CHART_MARKER);

// ── Toggle affordance ───────────────────────────────────────────

pub const TOGGLE_ID: &str = "umbra-dark-theme-toggle";
pub const TOGGLE_TITLE: &str = "Toggle Dark Theme";

/// Fixed presentation of the toggle button.
pub const TOGGLE_STYLE: &[(&str, &str)] = &[
    ("position", "fixed"),
    ("bottom", "20px"),
    ("right", "20px"),
    ("z-index", "10000"),
    ("width", "50px"),
    ("height", "50px"),
    ("border-radius", "50%"),
    ("border", "2px solid #333"),
    ("background", "#fff"),
    ("cursor", "pointer"),
    ("font-size", "24px"),
    ("box-shadow", "0 2px 10px rgba(0,0,0,0.2)"),
    ("transition", "all 0.3s ease"),
];

/// Icon, background, and border color for one toggle state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TogglePresentation {
    pub icon: &'static str,
    pub background: &'static str,
    pub border_color: &'static str,
}

pub const TOGGLE_OFF: TogglePresentation = TogglePresentation { icon: "🌙", background: "#fff", border_color: "#333" };
pub const TOGGLE_ON: TogglePresentation = TogglePresentation { icon: "☀️", background: "#1a1a1a", border_color: "#666" };

// ── Storage ─────────────────────────────────────────────────────

/// Storage key of the persisted on/off preference.
pub const PREFERENCE_KEY: &str = "darkThemeEnabled";

/// Storage key of the optional JSON configuration.
pub const CONFIG_KEY: &str = "umbraConfig";
