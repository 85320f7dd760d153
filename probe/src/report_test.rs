use pretty_assertions::assert_eq;
use umbra_detect::snapshot::{ElementSnapshot, PageSnapshot, SnapshotPage};

use super::*;

fn dark_page(host: &str) -> SnapshotPage {
    let body = ElementSnapshot::new("body").style("background-color", "rgb(0, 0, 0)").style("color", "rgb(255, 255, 255)");
    let root = ElementSnapshot::new("html")
        .style("background-color", "rgb(0, 0, 0)")
        .style("color", "rgb(255, 255, 255)")
        .child(body);
    SnapshotPage::new(PageSnapshot::new(host, root))
}

#[test]
fn detection_report_lists_every_detector() {
    let report = render_detection(&Detector::default(), &dark_page("docs.example.org"));
    let lines: Vec<&str> = report.lines().collect();

    assert_eq!(lines.len(), 6);
    assert!(lines[0].starts_with("+ page darkness"));
    assert!(lines[4].starts_with("- known site"));
    assert_eq!(lines[5], "host docs.example.org: native dark theme, skipping (confidence 1.00)");
}

#[test]
fn extra_known_site_is_reported() {
    let detector = Detector { extra_known_sites: vec!["example.org".to_owned()], ..Detector::default() };
    let report = render_detection(&detector, &dark_page("docs.example.org"));
    assert!(report.lines().nth(4).is_some_and(|line| line.starts_with("+ known site")));
}

#[test]
fn luminance_report_classifies_tone() {
    let colors = ["#000".to_owned(), "rgb(255, 255, 255)".to_owned(), "transparent".to_owned()];
    assert_eq!(
        render_luminance(&colors),
        "#000\t0.0000\tdark\nrgb(255, 255, 255)\t1.0000\tlight\ntransparent\t0.5000\tunknown"
    );
}
