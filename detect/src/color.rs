//! Color parsing and relative luminance.
//!
//! Inputs are computed-style strings (`rgb(…)`, `rgba(…)`) or hex colors.
//! Other color functions, and anything that cannot be read as an opaque
//! color, map to [`NEUTRAL_LUMINANCE`], which is neither dark nor light.

#[cfg(test)]
#[path = "color_test.rs"]
mod color_test;

/// Luminance reported for transparent, missing, or unparseable colors.
pub const NEUTRAL_LUMINANCE: f64 = 0.5;

/// Backgrounds strictly below this luminance count as dark.
pub const DARK_BACKGROUND_MAX: f64 = 0.3;

/// Text strictly above this luminance counts as light.
pub const LIGHT_TEXT_MIN: f64 = 0.5;

const LINEAR_THRESHOLD: f64 = 0.039_28;
const WEIGHTS: [f64; 3] = [0.2126, 0.7152, 0.0722];

/// Coarse tone of a luminance value.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Tone {
    Dark,
    Light,
    Unknown,
}

/// Relative luminance in `[0, 1]` of a color string.
///
/// Returns [`NEUTRAL_LUMINANCE`] for `transparent`, for colors whose alpha
/// channel is zero, and for anything with fewer than three channels.
#[must_use]
pub fn relative_luminance(color: &str) -> f64 {
    let Some([r, g, b]) = parse_rgb(color) else {
        return NEUTRAL_LUMINANCE;
    };
    let lum = WEIGHTS[0] * linearize(r) + WEIGHTS[1] * linearize(g) + WEIGHTS[2] * linearize(b);
    if lum.is_finite() { lum.clamp(0.0, 1.0) } else { NEUTRAL_LUMINANCE }
}

/// Parse an opaque color into `[r, g, b]` channels in `0..=255`.
#[must_use]
pub fn parse_rgb(color: &str) -> Option<[f64; 3]> {
    let trimmed = color.trim();
    if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("transparent") {
        return None;
    }
    if let Some((r, g, b)) = parse_hex_rgb(trimmed) {
        return Some([f64::from(r), f64::from(g), f64::from(b)]);
    }

    // Only sRGB channel syntax; `oklch()`, `lab()`, `color()` and the like use
    // other scales and stay neutral.
    let lower = trimmed.to_ascii_lowercase();
    let args = lower.strip_prefix("rgba(").or_else(|| lower.strip_prefix("rgb("))?;
    let values = numeric_tokens(args);
    if values.len() < 3 {
        return None;
    }
    if values.get(3).is_some_and(|alpha| *alpha <= 0.0) {
        return None;
    }
    let mut channels = [0.0; 3];
    for (slot, value) in channels.iter_mut().zip(&values) {
        if !value.is_finite() {
            return None;
        }
        *slot = value.clamp(0.0, 255.0);
    }
    Some(channels)
}

/// Parse `#RGB` or `#RRGGBB` values into RGB channels.
#[must_use]
pub fn parse_hex_rgb(raw: &str) -> Option<(u8, u8, u8)> {
    let hex = raw.trim().strip_prefix('#')?;
    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    let full = match hex.len() {
        3 => hex.chars().flat_map(|c| [c, c]).collect::<String>(),
        6 => hex.to_owned(),
        _ => return None,
    };
    // Six validated hex digits always fit.
    let [_, r, g, b] = u32::from_str_radix(&full, 16).ok()?.to_be_bytes();
    Some((r, g, b))
}

/// Tone of a background luminance.
#[must_use]
pub fn background_tone(luminance: f64) -> Tone {
    if (luminance - NEUTRAL_LUMINANCE).abs() < f64::EPSILON {
        Tone::Unknown
    } else if luminance < DARK_BACKGROUND_MAX {
        Tone::Dark
    } else {
        Tone::Light
    }
}

/// Whether text of this luminance reads as light.
#[must_use]
pub fn text_is_light(luminance: f64) -> bool {
    luminance > LIGHT_TEXT_MIN
}

fn linearize(channel: f64) -> f64 {
    let c = channel / 255.0;
    if c <= LINEAR_THRESHOLD { c / 12.92 } else { ((c + 0.055) / 1.055).powf(2.4) }
}

/// Every signed decimal number in `raw`, in order of appearance.
fn numeric_tokens(raw: &str) -> Vec<f64> {
    raw.split(|c: char| !(c.is_ascii_digit() || c == '.' || c == '-' || c == '+'))
        .filter(|token| !token.is_empty() && token.chars().any(|c| c.is_ascii_digit()))
        .filter_map(|token| token.parse::<f64>().ok())
        .collect()
}
