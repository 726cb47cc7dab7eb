use crate::document::Document;
use std::fmt;

/// Lifecycle events fired on the browsing context around a parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventName {
    ParseStart,
    ParseEnd,
}

impl EventName {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventName::ParseStart => "parsestart",
            EventName::ParseEnd => "parseend",
        }
    }
}

impl fmt::Display for EventName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The external object representing where a document is loaded and shown.
///
/// The core only calls into it; it never owns it and does not define what
/// navigation or event dispatch mean.
pub trait BrowsingContext: Send + Sync {
    /// Registers the document as this context's active document.
    fn navigate_to(&self, document: &Document);

    /// Emits a simple lifecycle event.
    fn fire_simple_event(&self, name: EventName);
}

/// A context that ignores every signal, for detached documents.
#[derive(Debug, Default, Clone, Copy)]
pub struct DetachedContext;

impl BrowsingContext for DetachedContext {
    fn navigate_to(&self, _document: &Document) {}

    fn fire_simple_event(&self, _name: EventName) {}
}
