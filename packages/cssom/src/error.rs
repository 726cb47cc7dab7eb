use thiserror::Error;
use vellum_parser::{ParseError, RuleKind};

pub type RuleResult<T> = Result<T, RuleError>;

/// Errors from the rule mutation protocol.
///
/// Both failure modes are recoverable and leave the rule completely
/// unchanged: the caller can retry with corrected text.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RuleError {
    /// The text does not parse as any rule.
    #[error("Syntax error: {message}")]
    Syntax { message: String },

    /// The text parses, but as a different kind of rule. Replacing a
    /// rule's text never changes its kind.
    #[error("Invalid modification: rule is {expected}, text parsed as {found}")]
    InvalidModification { expected: RuleKind, found: RuleKind },

    /// The handle refers to a slot whose rule has been removed.
    #[error("Rule handle does not refer to a live rule")]
    StaleHandle,
}

impl From<ParseError> for RuleError {
    fn from(error: ParseError) -> Self {
        RuleError::Syntax {
            message: error.to_string(),
        }
    }
}
