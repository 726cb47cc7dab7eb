//! Computed-style tests over whole sheets.

use crate::compute::{PropertyBag, RenderDevice};
use crate::sheet::StyleSheet;
use vellum_dom::Element;

fn styled_rect() -> Element {
    Element::new("rect")
        .with_attr("id", "main")
        .with_attr("class", "note")
}

fn compute(sheet: &StyleSheet, device: &RenderDevice, element: &Element) -> PropertyBag {
    let mut style = PropertyBag::new();
    sheet.compute_style(&mut style, device, element);
    style
}

#[test]
fn test_later_rules_win_in_document_order() {
    let sheet = StyleSheet::parse(
        "rect { fill: red; stroke: black } .note { fill: blue } #main { fill: green }",
    )
    .unwrap();

    let style = compute(&sheet, &RenderDevice::screen(800, 600), &styled_rect());
    assert_eq!(style.get("fill"), Some("green"));
    assert_eq!(style.get("stroke"), Some("black"));
    assert_eq!(style.len(), 2);
}

#[test]
fn test_non_matching_selectors_contribute_nothing() {
    let sheet = StyleSheet::parse("circle { fill: red } .other { fill: blue }").unwrap();

    let style = compute(&sheet, &RenderDevice::screen(800, 600), &styled_rect());
    assert!(style.is_empty());
}

#[test]
fn test_media_rules_gate_their_children() {
    let sheet = StyleSheet::parse(
        "rect { fill: red } @media print { rect { fill: gray } } @media screen { rect { stroke: blue } }",
    )
    .unwrap();

    let on_screen = compute(&sheet, &RenderDevice::screen(800, 600), &styled_rect());
    assert_eq!(on_screen.get("fill"), Some("red"));
    assert_eq!(on_screen.get("stroke"), Some("blue"));

    let on_paper = compute(&sheet, &RenderDevice::printer(800, 600), &styled_rect());
    assert_eq!(on_paper.get("fill"), Some("gray"));
    assert_eq!(on_paper.get("stroke"), None);
}

#[test]
fn test_viewport_features_are_honored() {
    let sheet =
        StyleSheet::parse("@media screen and (max-width: 500px) { rect { fill: small } }").unwrap();

    let narrow = compute(&sheet, &RenderDevice::screen(400, 600), &styled_rect());
    assert_eq!(narrow.get("fill"), Some("small"));

    let wide = compute(&sheet, &RenderDevice::screen(800, 600), &styled_rect());
    assert!(wide.is_empty());
}

#[test]
fn test_non_style_kinds_contribute_nothing() {
    let sheet = StyleSheet::parse(
        "@charset \"utf-8\"; @import url(\"base.css\"); @font-face { font-family: Vellum } rect { fill: red }",
    )
    .unwrap();

    let style = compute(&sheet, &RenderDevice::screen(800, 600), &styled_rect());
    assert_eq!(style.len(), 1);
    assert_eq!(style.get("fill"), Some("red"));
}

#[test]
fn test_removed_rules_stop_contributing() {
    let mut sheet = StyleSheet::parse("rect { fill: red } rect { stroke: black }").unwrap();
    let first = sheet.rules()[0];
    sheet.remove_rule(first);

    let style = compute(&sheet, &RenderDevice::screen(800, 600), &styled_rect());
    assert_eq!(style.get("fill"), None);
    assert_eq!(style.get("stroke"), Some("black"));
}
