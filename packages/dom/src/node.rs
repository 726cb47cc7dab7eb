use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A node in a document tree.
///
/// Ownership runs downward: an element owns its children, the document owns
/// its top-level nodes. Derived document properties are computed from this
/// tree on demand rather than cached next to it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Node {
    /// Markup element
    Element(Element),

    /// Text node
    Text { content: String },

    /// Comment node
    Comment { content: String },
}

/// An element with a tag name, attributes and child nodes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Element {
    pub name: String,
    pub attributes: HashMap<String, String>,
    pub children: Vec<Node>,
}

impl Node {
    pub fn element(name: impl Into<String>) -> Self {
        Node::Element(Element::new(name))
    }

    pub fn text(content: impl Into<String>) -> Self {
        Node::Text {
            content: content.into(),
        }
    }

    pub fn comment(content: impl Into<String>) -> Self {
        Node::Comment {
            content: content.into(),
        }
    }

    pub fn as_element(&self) -> Option<&Element> {
        match self {
            Node::Element(element) => Some(element),
            _ => None,
        }
    }

    pub fn as_element_mut(&mut self) -> Option<&mut Element> {
        match self {
            Node::Element(element) => Some(element),
            _ => None,
        }
    }
}

impl Element {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: HashMap::new(),
            children: Vec::new(),
        }
    }

    pub fn with_attributes(name: impl Into<String>, attributes: Vec<(String, String)>) -> Self {
        Self {
            name: name.into(),
            attributes: attributes.into_iter().collect(),
            children: Vec::new(),
        }
    }

    pub fn with_attr(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    pub fn with_child(mut self, child: Node) -> Self {
        self.children.push(child);
        self
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    pub fn id(&self) -> Option<&str> {
        self.attribute("id")
    }

    pub fn classes(&self) -> impl Iterator<Item = &str> {
        self.attribute("class")
            .unwrap_or_default()
            .split_whitespace()
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes().any(|c| c == class)
    }

    pub fn append_child(&mut self, child: Node) {
        self.children.push(child);
    }

    /// Concatenated text of every descendant text node, in tree order.
    pub fn text_content(&self) -> String {
        let mut output = String::new();
        self.collect_text(&mut output);
        output
    }

    fn collect_text(&self, output: &mut String) {
        for child in &self.children {
            match child {
                Node::Text { content } => output.push_str(content),
                Node::Element(element) => element.collect_text(output),
                Node::Comment { .. } => {}
            }
        }
    }

    /// Replaces all children with a single text node.
    pub fn set_text_content(&mut self, content: impl Into<String>) {
        self.children.clear();
        self.children.push(Node::text(content));
    }

    /// First direct child element with the given tag name.
    pub fn first_child_element(&self, name: &str) -> Option<&Element> {
        self.children
            .iter()
            .filter_map(Node::as_element)
            .find(|element| element.name == name)
    }

    /// First descendant element with the given tag name, in tree order.
    pub fn find_descendant(&self, name: &str) -> Option<&Element> {
        for child in &self.children {
            if let Node::Element(element) = child {
                if element.name == name {
                    return Some(element);
                }
                if let Some(found) = element.find_descendant(name) {
                    return Some(found);
                }
            }
        }
        None
    }

    pub fn find_descendant_mut(&mut self, name: &str) -> Option<&mut Element> {
        for child in &mut self.children {
            if let Node::Element(element) = child {
                if element.name == name {
                    return Some(element);
                }
                if element.find_descendant(name).is_some() {
                    return element.find_descendant_mut(name);
                }
            }
        }
        None
    }
}
