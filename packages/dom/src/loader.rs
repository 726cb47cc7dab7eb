use crate::context::{BrowsingContext, EventName};
use crate::document::Document;
use crate::error::LoadResult;
use crate::sink::DocumentSink;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, instrument};
use vellum_common::TextSource;
use vellum_parser::{parse_async, XmlParserOptions};

/// Configuration for one document load. Opaque to the pipeline: values are
/// recorded on the document and otherwise passed through untouched.
#[derive(Debug, Clone, Default)]
pub struct CreateDocumentOptions {
    pub source: TextSource,
    pub base_url: Option<String>,
    pub encoding: Option<String>,
    pub parser_options: XmlParserOptions,
}

impl CreateDocumentOptions {
    pub fn from_source(source: impl Into<TextSource>) -> Self {
        Self {
            source: source.into(),
            ..Self::default()
        }
    }
}

/// Loads a document in the provided context from the given source.
///
/// Steps 1–4 (allocate, apply options, navigate, fire `parsestart`) run
/// without suspension; the parser drive is the sole await and the only
/// place cancellation is observed; `parseend` fires on success only. On
/// cancellation or parse failure the partially built document is dropped
/// with the error — callers must treat both as a failed load.
#[instrument(skip_all, fields(content_type))]
pub async fn load_async(
    context: Arc<dyn BrowsingContext>,
    options: CreateDocumentOptions,
    cancel: CancellationToken,
) -> LoadResult<Document> {
    let mut document = Document::svg(Arc::clone(&context), options.source.clone());
    document.apply_options(&options);
    tracing::Span::current().record("content_type", document.content_type());

    context.navigate_to(&document);
    context.fire_simple_event(EventName::ParseStart);

    let source = document.source().text().to_string();
    let mut sink = DocumentSink::new(&mut document);
    parse_async(&mut sink, &source, options.parser_options.clone(), cancel).await?;

    context.fire_simple_event(EventName::ParseEnd);
    debug!(nodes = document.children().len(), "document load completed");

    Ok(document)
}
