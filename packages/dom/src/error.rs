use thiserror::Error;
use vellum_parser::ParseError;

pub type DomResult<T> = Result<T, DomError>;

/// Errors from synchronous document operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DomError {
    /// The operation requires a root element and the document has none.
    /// Setting a title never invents a root; the caller must populate the
    /// tree first.
    #[error("Document has no root element")]
    NoRootElement,
}

pub type LoadResult<T> = Result<T, LoadError>;

/// Errors from the asynchronous load pipeline.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LoadError {
    /// The load was cancelled mid-parse. The partially built document is
    /// discarded; callers treat this like a failed load.
    #[error("Document load was cancelled")]
    Cancelled,

    /// The parser reported a hard failure it could not recover from.
    #[error("Document parse failed: {0}")]
    ParseFailed(ParseError),
}

impl From<ParseError> for LoadError {
    fn from(error: ParseError) -> Self {
        if error.is_cancelled() {
            LoadError::Cancelled
        } else {
            LoadError::ParseFailed(error)
        }
    }
}
