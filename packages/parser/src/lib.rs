pub mod ast;
pub mod css;
pub mod error;
pub mod serializer;
pub mod tokenizer;
pub mod xml;

pub use ast::{Declaration, Rule, RuleKind};
pub use css::{parse_rule, parse_rule_list, RuleParser};
pub use error::{ParseError, ParseResult};
pub use serializer::{serialize_rule, serialize_rule_list, Serializer};
pub use tokenizer::{tokenize, Token};
pub use xml::{parse_async, TreeSink, XmlParserOptions};
