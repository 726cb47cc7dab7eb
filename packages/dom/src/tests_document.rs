//! Document derivation tests: root element, title, cloning.
//!
//! `root_element` and `title` are pure queries over the tree, so every test
//! here builds the tree directly and asserts on what the accessors derive.

use crate::context::DetachedContext;
use crate::document::Document;
use crate::error::DomError;
use crate::node::{Element, Node};
use std::sync::Arc;
use vellum_common::TextSource;

fn empty_document() -> Document {
    Document::svg(Arc::new(DetachedContext), TextSource::empty())
}

fn document_with_root() -> Document {
    let mut document = empty_document();
    document.push_node(Node::Element(Element::new("svg")));
    document
}

#[test]
fn test_content_type_is_fixed_at_construction() {
    let document = empty_document();
    assert_eq!(document.content_type(), "image/svg+xml");
}

#[test]
fn test_root_element_is_none_before_population() {
    assert!(empty_document().root_element().is_none());
}

#[test]
fn test_root_element_is_first_matching_structural_child() {
    let mut document = empty_document();
    document.push_node(Node::comment("prolog leftovers"));
    document.push_node(Node::Element(Element::new("rect")));
    document.push_node(Node::Element(Element::new("svg").with_attr("id", "a")));
    document.push_node(Node::Element(Element::new("svg").with_attr("id", "b")));

    let root = document.root_element().unwrap();
    assert_eq!(root.id(), Some("a"));
}

#[test]
fn test_title_is_empty_without_root() {
    assert_eq!(empty_document().title(), "");
}

#[test]
fn test_title_default_is_empty_and_idempotent() {
    let document = document_with_root();

    assert_eq!(document.title(), "");
    assert_eq!(document.title(), "");
    // no title node was synthesized by reading
    assert!(document.root_element().unwrap().children.is_empty());
}

#[test]
fn test_title_ignores_title_outside_root() {
    let mut document = document_with_root();
    document.push_node(Node::Element(
        Element::new("title").with_child(Node::text("sibling")),
    ));

    assert_eq!(document.title(), "");
}

#[test]
fn test_title_is_collapsed_and_stripped() {
    let mut document = empty_document();
    document.push_node(Node::Element(Element::new("svg").with_child(Node::Element(
        Element::new("title").with_child(Node::text("  Hello \n\t world  ")),
    ))));

    assert_eq!(document.title(), "Hello world");
}

#[test]
fn test_set_title_synthesizes_exactly_one_title() {
    let mut document = document_with_root();

    document.set_title("Example").unwrap();

    assert_eq!(document.title(), "Example");
    let root = document.root_element().unwrap();
    let titles = root
        .children
        .iter()
        .filter_map(Node::as_element)
        .filter(|e| e.name == "title")
        .count();
    assert_eq!(titles, 1);
}

#[test]
fn test_set_title_replaces_existing_text() {
    let mut document = empty_document();
    document.push_node(Node::Element(Element::new("svg").with_child(Node::Element(
        Element::new("title").with_child(Node::text("old")),
    ))));

    document.set_title("new").unwrap();

    assert_eq!(document.title(), "new");
    let root = document.root_element().unwrap();
    assert_eq!(root.children.len(), 1);
}

#[test]
fn test_set_title_without_root_is_a_precondition_error() {
    let mut document = empty_document();
    let err = document.set_title("Example").unwrap_err();
    assert_eq!(err, DomError::NoRootElement);
    assert!(document.children().is_empty());
}

#[test]
fn test_deep_clone_is_independent_both_ways() {
    let mut original = document_with_root();
    original.set_title("original").unwrap();

    let mut clone = original.clone_document(true);
    assert_eq!(clone.title(), "original");
    assert_eq!(clone.source(), original.source());

    original.set_title("changed").unwrap();
    assert_eq!(clone.title(), "original");

    clone.set_title("clone-side").unwrap();
    assert_eq!(original.title(), "changed");
}

#[test]
fn test_shallow_clone_copies_source_but_not_tree() {
    let mut original = Document::svg(Arc::new(DetachedContext), TextSource::new("<svg/>"));
    original.push_node(Node::Element(Element::new("svg")));

    let clone = original.clone_document(false);

    assert!(clone.root_element().is_none());
    assert_eq!(clone.source().text(), "<svg/>");
    assert_eq!(clone.content_type(), original.content_type());
}
