#![allow(clippy::float_cmp)]

use super::*;

fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

#[test]
fn black_and_white_span_the_range() {
    assert!(approx(relative_luminance("rgb(0,0,0)"), 0.0));
    assert!(approx(relative_luminance("rgb(255,255,255)"), 1.0));
    assert!(approx(relative_luminance("rgb(255, 255, 255)"), 1.0));
}

#[test]
fn primaries_use_channel_weights() {
    assert!(approx(relative_luminance("rgb(255, 0, 0)"), 0.2126));
    assert!(approx(relative_luminance("rgb(0, 255, 0)"), 0.7152));
    assert!(approx(relative_luminance("rgb(0, 0, 255)"), 0.0722));
}

#[test]
fn low_channels_use_linear_segment() {
    // 10 / 255 = 0.0392 sits just under the gamma knee.
    let expected = (10.0 / 255.0) / 12.92;
    assert!(approx(relative_luminance("rgb(10, 10, 10)"), expected));
}

#[test]
fn fewer_than_three_channels_is_neutral() {
    for input in ["", "rgb()", "rgb(12)", "rgb(12, 40)", "red", "none", "inherit"] {
        assert_eq!(relative_luminance(input), NEUTRAL_LUMINANCE, "input {input:?}");
    }
}

#[test]
fn transparent_inputs_are_neutral() {
    assert_eq!(relative_luminance("transparent"), NEUTRAL_LUMINANCE);
    assert_eq!(relative_luminance("TRANSPARENT"), NEUTRAL_LUMINANCE);
    assert_eq!(relative_luminance("rgba(0, 0, 0, 0)"), NEUTRAL_LUMINANCE);
    assert_eq!(relative_luminance("rgba(255, 255, 255, 0)"), NEUTRAL_LUMINANCE);
}

#[test]
fn translucent_colors_still_count() {
    assert!(approx(relative_luminance("rgba(0, 0, 0, 0.5)"), 0.0));
}

#[test]
fn hex_colors_are_supported() {
    assert!(approx(relative_luminance("#000"), 0.0));
    assert!(approx(relative_luminance("#ffffff"), 1.0));
    assert_eq!(parse_hex_rgb("#ABC"), Some((170, 187, 204)));
    assert_eq!(parse_hex_rgb("#12GG34"), None);
    assert_eq!(parse_hex_rgb("#abcd"), None);
}

#[test]
fn out_of_range_channels_are_clamped() {
    assert!(approx(relative_luminance("rgb(999, 999, 999)"), 1.0));
    assert!(approx(relative_luminance("rgb(-255, -255, -255)"), 0.0));
    assert!(approx(relative_luminance("RGBA(-10, 300, -1, 1)"), 0.7152));
}

#[test]
fn non_srgb_color_functions_are_neutral() {
    for input in ["oklch(1 0 0)", "oklch(0.145 0 0)", "lab(100 0 0)", "color(srgb 1 1 1)", "hsl(0 0% 100%)"] {
        assert_eq!(relative_luminance(input), NEUTRAL_LUMINANCE, "input {input:?}");
        assert_eq!(parse_rgb(input), None, "input {input:?}");
    }
}

#[test]
fn tones_follow_thresholds() {
    assert_eq!(background_tone(0.0), Tone::Dark);
    assert_eq!(background_tone(0.29), Tone::Dark);
    assert_eq!(background_tone(0.3), Tone::Light);
    assert_eq!(background_tone(NEUTRAL_LUMINANCE), Tone::Unknown);
    assert!(text_is_light(0.9));
    assert!(!text_is_light(0.5));
}
