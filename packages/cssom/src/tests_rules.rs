//! Rule object and mutation protocol tests.

use crate::error::RuleError;
use crate::sheet::StyleSheet;
use vellum_parser::{parse_rule, RuleKind};

#[test]
fn test_insert_sets_owner_and_kind() {
    let mut sheet = StyleSheet::new();
    let id = sheet.insert_rule_text(".a { color: red }").unwrap();

    let rule = sheet.rule(id).unwrap();
    assert_eq!(rule.kind(), RuleKind::Style);
    assert_eq!(rule.owner(), Some(sheet.id()));
    assert_eq!(rule.parent(), None);
}

#[test]
fn test_media_children_point_back_at_their_container() {
    let mut sheet = StyleSheet::new();
    let media = sheet
        .insert_rule_text("@media screen { .a { color: red } .b { color: blue } }")
        .unwrap();

    let children = sheet.rule(media).unwrap().children().to_vec();
    assert_eq!(children.len(), 2);

    for child in children {
        let rule = sheet.rule(child).unwrap();
        assert_eq!(rule.parent(), Some(media));
        assert_eq!(rule.owner(), Some(sheet.id()));
        assert_eq!(rule.kind(), RuleKind::Style);
    }
}

#[test]
fn test_rule_text_round_trips_as_the_same_kind() {
    let sources = [
        ".a { color: red }",
        "@media screen { .a { color: red } }",
        "@import url(\"base.css\");",
        "@font-face { font-family: Vellum }",
        "@namespace svg \"http://www.w3.org/2000/svg\";",
        "@charset \"utf-8\";",
    ];

    let mut sheet = StyleSheet::new();
    for source in sources {
        let id = sheet.insert_rule_text(source).unwrap();
        let kind = sheet.rule(id).unwrap().kind();

        let text = sheet.rule_text(id).unwrap();
        let reparsed = parse_rule(&text).unwrap();
        assert_eq!(reparsed.kind(), kind, "round trip drifted for {}", source);
    }
}

#[test]
fn test_set_rule_text_replaces_content_in_place() {
    let mut sheet = StyleSheet::new();
    let id = sheet.insert_rule_text(".a { color: red }").unwrap();

    sheet.set_rule_text(id, ".a { color: blue }").unwrap();

    let rule = sheet.rule(id).unwrap();
    assert_eq!(rule.kind(), RuleKind::Style);
    let text = sheet.rule_text(id).unwrap();
    assert!(text.contains("color: blue"));
    assert!(!text.contains("color: red"));
}

#[test]
fn test_set_rule_text_syntax_error_is_a_no_op() {
    let mut sheet = StyleSheet::new();
    let id = sheet.insert_rule_text(".a { color: red }").unwrap();
    let before = sheet.rule_text(id).unwrap();

    let err = sheet.set_rule_text(id, "not a rule at all {").unwrap_err();
    assert!(matches!(err, RuleError::Syntax { .. }));

    assert_eq!(sheet.rule_text(id).unwrap(), before);
    let rule = sheet.rule(id).unwrap();
    assert_eq!(rule.parent(), None);
    assert_eq!(rule.owner(), Some(sheet.id()));
}

#[test]
fn test_set_rule_text_wrong_kind_is_rejected_without_mutation() {
    let mut sheet = StyleSheet::new();
    let id = sheet.insert_rule_text(".a { color: red }").unwrap();
    let before = sheet.rule_text(id).unwrap();

    let err = sheet.set_rule_text(id, "@media screen { }").unwrap_err();
    assert_eq!(
        err,
        RuleError::InvalidModification {
            expected: RuleKind::Style,
            found: RuleKind::Media,
        }
    );

    assert_eq!(sheet.rule_text(id).unwrap(), before);
}

#[test]
fn test_kind_never_changes_across_successful_replacements() {
    let mut sheet = StyleSheet::new();
    let id = sheet.insert_rule_text(".a { color: red }").unwrap();

    for text in [".b { margin: 0 }", "#c { padding: 1px }", "* { top: 0 }"] {
        sheet.set_rule_text(id, text).unwrap();
        assert_eq!(sheet.rule(id).unwrap().kind(), RuleKind::Style);
    }
}

#[test]
fn test_style_rule_scenario() {
    let mut sheet = StyleSheet::new();
    let id = sheet.insert_rule_text(".a { color: red }").unwrap();
    assert_eq!(sheet.rule(id).unwrap().kind(), RuleKind::Style);

    sheet.set_rule_text(id, ".a { color: blue }").unwrap();
    assert_eq!(sheet.rule(id).unwrap().kind(), RuleKind::Style);
    assert!(sheet.rule_text(id).unwrap().contains("color: blue"));

    let err = sheet.set_rule_text(id, "@media screen {}").unwrap_err();
    assert!(matches!(err, RuleError::InvalidModification { .. }));
    assert!(sheet.rule_text(id).unwrap().contains("color: blue"));
}

#[test]
fn test_replacing_media_text_rebuilds_its_children() {
    let mut sheet = StyleSheet::new();
    let media = sheet
        .insert_rule_text("@media screen { .a { color: red } }")
        .unwrap();
    let old_child = sheet.rule(media).unwrap().children()[0];

    sheet
        .set_rule_text(media, "@media print { .b { margin: 0 } .c { padding: 0 } }")
        .unwrap();

    // old child slot is dead, new children are attached to the same rule
    assert!(sheet.rule(old_child).is_none());
    let children = sheet.rule(media).unwrap().children().to_vec();
    assert_eq!(children.len(), 2);
    for child in children {
        assert_eq!(sheet.rule(child).unwrap().parent(), Some(media));
    }
    assert!(sheet.rule_text(media).unwrap().contains("@media print"));
}

#[test]
fn test_remove_rule_tombstones_the_subtree() {
    let mut sheet = StyleSheet::new();
    let media = sheet
        .insert_rule_text("@media screen { .a { color: red } }")
        .unwrap();
    let child = sheet.rule(media).unwrap().children()[0];
    let keeper = sheet.insert_rule_text(".z { color: green }").unwrap();

    assert!(sheet.remove_rule(media));

    assert!(sheet.rule(media).is_none());
    assert!(sheet.rule(child).is_none());
    assert_eq!(sheet.rules(), &[keeper]);
    // the surviving handle still resolves to the same rule
    assert!(sheet.rule_text(keeper).unwrap().contains(".z"));
}

#[test]
fn test_removing_a_media_child_detaches_it_from_its_parent() {
    let mut sheet = StyleSheet::new();
    let media = sheet
        .insert_rule_text("@media screen { .a { color: red } .b { color: blue } }")
        .unwrap();
    let first = sheet.rule(media).unwrap().children()[0];

    assert!(sheet.remove_rule(first));

    assert!(sheet.rule(first).is_none());
    assert_eq!(sheet.rule(media).unwrap().children().len(), 1);
    assert!(!sheet.rule_text(media).unwrap().contains(".a"));
}

#[test]
fn test_stale_handle_is_reported() {
    let mut sheet = StyleSheet::new();
    let id = sheet.insert_rule_text(".a { color: red }").unwrap();
    sheet.remove_rule(id);

    assert_eq!(
        sheet.set_rule_text(id, ".a { color: blue }").unwrap_err(),
        RuleError::StaleHandle
    );
    assert!(sheet.rule_text(id).is_none());
    assert!(!sheet.remove_rule(id));
}

#[test]
fn test_cloned_sheet_gets_its_own_identity() {
    let mut sheet = StyleSheet::new();
    let id = sheet
        .insert_rule_text("@media screen { .a { color: red } }")
        .unwrap();

    let mut clone = sheet.clone();
    assert_ne!(clone.id(), sheet.id());

    // every cloned rule, nested ones included, points at the clone
    let child = clone.rule(id).unwrap().children()[0];
    assert_eq!(clone.rule(id).unwrap().owner(), Some(clone.id()));
    assert_eq!(clone.rule(child).unwrap().owner(), Some(clone.id()));
    assert_eq!(sheet.rule(id).unwrap().owner(), Some(sheet.id()));

    // and mutating the clone leaves the original alone
    clone.set_rule_text(child, ".b { color: blue }").unwrap();
    assert!(sheet.rule_text(id).unwrap().contains(".a"));
    assert!(clone.rule_text(id).unwrap().contains(".b"));
}

#[test]
fn test_parse_whole_sheet_and_serialize() {
    let sheet = StyleSheet::parse(
        "@charset \"utf-8\"; .a { color: red } @media screen { .b { margin: 0 } }",
    )
    .unwrap();

    assert_eq!(sheet.len(), 3);
    let css = sheet.to_css();
    assert!(css.starts_with("@charset \"utf-8\";"));
    assert!(css.contains("@media screen"));
    assert!(css.contains("margin: 0;"));
}

#[test]
fn test_sheet_parse_error_surfaces() {
    assert!(matches!(
        StyleSheet::parse(".a { color }"),
        Err(RuleError::Syntax { .. })
    ));
}
