pub mod compute;
pub mod error;
pub mod rule;
pub mod sheet;

#[cfg(test)]
mod tests_compute;

#[cfg(test)]
mod tests_rules;

pub use compute::{PropertyBag, RenderDevice};
pub use error::{RuleError, RuleResult};
pub use rule::{CssRule, RuleId, SheetId};
pub use sheet::StyleSheet;

// the kind tag is shared with the parser's AST
pub use vellum_parser::RuleKind;
