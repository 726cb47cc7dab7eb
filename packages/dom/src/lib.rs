pub mod context;
pub mod document;
pub mod error;
pub mod loader;
pub mod node;
mod sink;

#[cfg(test)]
mod tests_document;


pub use context::{BrowsingContext, DetachedContext, EventName};
pub use document::{Document, DocumentSchema};
pub use error::{DomError, DomResult, LoadError, LoadResult};
pub use loader::{load_async, CreateDocumentOptions};
pub use node::{Element, Node};
