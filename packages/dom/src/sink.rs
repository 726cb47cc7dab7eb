use crate::document::Document;
use crate::node::{Element, Node};
use vellum_parser::TreeSink;

/// Builds the document's node tree from parser callbacks.
///
/// Completed top-level nodes are appended to the document as they close, so
/// a cancelled parse leaves whatever finished in place; the load pipeline
/// discards the document in that case instead of returning it.
pub(crate) struct DocumentSink<'a> {
    document: &'a mut Document,
    stack: Vec<Element>,
}

impl<'a> DocumentSink<'a> {
    pub(crate) fn new(document: &'a mut Document) -> Self {
        Self {
            document,
            stack: Vec::new(),
        }
    }

    fn append(&mut self, node: Node) {
        match self.stack.last_mut() {
            Some(parent) => parent.children.push(node),
            None => self.document.push_node(node),
        }
    }
}

impl TreeSink for DocumentSink<'_> {
    fn open_element(&mut self, name: String, attributes: Vec<(String, String)>) {
        self.stack.push(Element::with_attributes(name, attributes));
    }

    fn close_element(&mut self) {
        // the parser guarantees balance; an empty stack means nothing to do
        if let Some(element) = self.stack.pop() {
            self.append(Node::Element(element));
        }
    }

    fn text(&mut self, content: String) {
        self.append(Node::Text { content });
    }

    fn comment(&mut self, content: String) {
        self.append(Node::Comment { content });
    }
}
