//! Detection vocabulary.
//!
//! Editing these tables changes what the detectors look for without touching
//! detector logic.

use crate::selector::Selector;

// ── Theme toggle controls ───────────────────────────────────────

const ROLE_SWITCH: Selector = Selector::AttrEquals { tag: None, attr: "role", value: "switch" };
const LABEL_THEME: Selector = Selector::AttrContains { tag: None, attr: "aria-label", needle: "theme" };
const LABEL_DARK: Selector = Selector::AttrContains { tag: None, attr: "aria-label", needle: "dark" };

/// Elements that look like a site's own light/dark switch.
pub const THEME_TOGGLE_SELECTORS: &[Selector] = &[
    LABEL_THEME,
    Selector::AttrContains { tag: None, attr: "aria-label", needle: "dark mode" },
    Selector::AttrContains { tag: None, attr: "aria-label", needle: "light mode" },
    Selector::AttrContains { tag: None, attr: "title", needle: "theme" },
    Selector::AttrContains { tag: None, attr: "title", needle: "dark mode" },
    Selector::AttrContains { tag: Some("button"), attr: "class", needle: "theme" },
    Selector::AttrContains { tag: Some("button"), attr: "id", needle: "theme" },
    Selector::Both(&ROLE_SWITCH, &LABEL_THEME),
    Selector::Both(&ROLE_SWITCH, &LABEL_DARK),
];

// ── Dark theme indicators on <html>/<body> ──────────────────────

/// Class tokens sites use to switch their own dark theme on.
pub const DARK_CLASSES: &[&str] = &["dark-mode", "dark-theme", "theme-dark", "darkmode", "dark", "__dark", "dark-ui"];

/// Attributes whose value names the active theme.
pub const THEME_ATTRIBUTES: &[&str] = &["theme", "data-theme", "data-color-mode", "data-color-scheme"];

/// Value fragment an attribute from [`THEME_ATTRIBUTES`] must contain.
pub const DARK_ATTRIBUTE_VALUE: &str = "dark";

/// Custom properties that only exist on pages defining a dark palette.
pub const DARK_CUSTOM_PROPERTIES: &[&str] =
    &["--dark-mode", "--dark-theme", "--dark-bg", "--dark-background", "--color-scheme-dark"];

// ── Color scheme support ────────────────────────────────────────

/// Media feature that marks theme-aware stylesheets.
pub const COLOR_SCHEME_MEDIA_FEATURE: &str = "prefers-color-scheme";

/// `<meta name="color-scheme">`.
pub const COLOR_SCHEME_META: Selector = Selector::AttrEquals { tag: Some("meta"), attr: "name", value: "color-scheme" };

// ── Known sites ─────────────────────────────────────────────────

/// Domains known to ship a native dark theme. Matched as hostname substrings.
pub const KNOWN_DARK_SITES: &[&str] = &[
    "github.com",
    "gitlab.com",
    "youtube.com",
    "twitter.com",
    "reddit.com",
    "discord.com",
    "slack.com",
    "stackoverflow.com",
    "developer.mozilla.org",
    "docs.rs",
    "twitch.tv",
    "spotify.com",
    "netflix.com",
    "notion.so",
    "figma.com",
    "linear.app",
    "vercel.com",
    "tradingview.com",
];

// ── Confidence per detector ─────────────────────────────────────

pub const THEME_TOGGLE_CONFIDENCE: f64 = 0.8;
pub const DARK_INDICATOR_CONFIDENCE: f64 = 0.7;
pub const COLOR_SCHEME_CONFIDENCE: f64 = 0.9;
pub const KNOWN_SITE_CONFIDENCE: f64 = 1.0;

/// Weight added for a dark background.
pub const DARK_BACKGROUND_WEIGHT: f64 = 1.0;
/// Extra weight when light text sits on that dark background.
pub const LIGHT_ON_DARK_WEIGHT: f64 = 0.5;
/// A page is dark when its weighted ratio exceeds this.
pub const DARK_RATIO_THRESHOLD: f64 = 0.5;
/// Dark ratio to confidence scale factor.
pub const DARK_RATIO_CONFIDENCE_SCALE: f64 = 1.5;
