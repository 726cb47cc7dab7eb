use crate::context::BrowsingContext;
use crate::error::{DomError, DomResult};
use crate::loader::CreateDocumentOptions;
use crate::node::{Element, Node};
use std::fmt;
use std::sync::Arc;
use vellum_common::{collapse_and_strip, TextSource};

/// What a document variant expects of its tree: its MIME identity, which
/// element counts as the root, which as the title.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DocumentSchema {
    pub content_type: &'static str,
    pub root_element: &'static str,
    pub title_element: &'static str,
}

impl DocumentSchema {
    pub const SVG: DocumentSchema = DocumentSchema {
        content_type: "image/svg+xml",
        root_element: "svg",
        title_element: "title",
    };
}

/// The root of a parsed tree representing one resource.
///
/// Construction is cheap and synchronous; the tree is populated afterwards
/// by the load pipeline. `root_element` and `title` are derived from the
/// tree on every call — the tree is the single source of truth, so external
/// mutation is always reflected and there is no cache to invalidate.
pub struct Document {
    context: Arc<dyn BrowsingContext>,
    source: TextSource,
    schema: DocumentSchema,
    base_url: Option<String>,
    encoding: Option<String>,
    children: Vec<Node>,
}

impl Document {
    pub fn new(
        context: Arc<dyn BrowsingContext>,
        source: TextSource,
        schema: DocumentSchema,
    ) -> Self {
        Self {
            context,
            source,
            schema,
            base_url: None,
            encoding: None,
            children: Vec::new(),
        }
    }

    /// An SVG document (`image/svg+xml`).
    pub fn svg(context: Arc<dyn BrowsingContext>, source: TextSource) -> Self {
        Self::new(context, source, DocumentSchema::SVG)
    }

    pub fn content_type(&self) -> &'static str {
        self.schema.content_type
    }

    pub fn schema(&self) -> &DocumentSchema {
        &self.schema
    }

    pub fn context(&self) -> &Arc<dyn BrowsingContext> {
        &self.context
    }

    pub fn source(&self) -> &TextSource {
        &self.source
    }

    pub fn base_url(&self) -> Option<&str> {
        self.base_url.as_deref()
    }

    pub fn encoding(&self) -> Option<&str> {
        self.encoding.as_deref()
    }

    pub fn children(&self) -> &[Node] {
        &self.children
    }

    /// Records the opaque creation options on the document.
    pub fn apply_options(&mut self, options: &CreateDocumentOptions) {
        self.base_url = options.base_url.clone();
        self.encoding = options.encoding.clone();
    }

    pub(crate) fn push_node(&mut self, node: Node) {
        self.children.push(node);
    }

    /// First direct child element that is root-capable for this variant.
    /// `None` until the tree is populated.
    pub fn root_element(&self) -> Option<&Element> {
        self.children
            .iter()
            .filter_map(Node::as_element)
            .find(|element| element.name == self.schema.root_element)
    }

    pub(crate) fn root_element_mut(&mut self) -> Option<&mut Element> {
        let root_name = self.schema.root_element;
        self.children
            .iter_mut()
            .filter_map(Node::as_element_mut)
            .find(|element| element.name == root_name)
    }

    /// Normalized text of the first title-capable descendant under the
    /// root; empty when there is no title node or no root at all.
    pub fn title(&self) -> String {
        self.root_element()
            .and_then(|root| root.find_descendant(self.schema.title_element))
            .map(|title| collapse_and_strip(&title.text_content()))
            .unwrap_or_default()
    }

    /// Sets the document title, synthesizing and appending a title element
    /// under the root when none exists.
    ///
    /// Requires a populated root element; calling this on a rootless
    /// document is a precondition violation and fails without mutating the
    /// tree.
    pub fn set_title(&mut self, value: impl Into<String>) -> DomResult<()> {
        let title_name = self.schema.title_element;
        let root = self.root_element_mut().ok_or(DomError::NoRootElement)?;

        if root.find_descendant(title_name).is_none() {
            root.append_child(Node::Element(Element::new(title_name)));
        }

        // the lookup now always succeeds
        if let Some(title) = root.find_descendant_mut(title_name) {
            title.set_text_content(value);
        }
        Ok(())
    }

    /// Constructs a new document over a fresh copy of the source text,
    /// sharing the context. When `deep`, the whole node tree is duplicated
    /// with no shared state between original and clone.
    pub fn clone_document(&self, deep: bool) -> Document {
        Self {
            context: Arc::clone(&self.context),
            source: self.source.clone(),
            schema: self.schema,
            base_url: self.base_url.clone(),
            encoding: self.encoding.clone(),
            children: if deep {
                self.children.clone()
            } else {
                Vec::new()
            },
        }
    }
}

impl fmt::Debug for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Document")
            .field("content_type", &self.schema.content_type)
            .field("base_url", &self.base_url)
            .field("children", &self.children)
            .finish_non_exhaustive()
    }
}
