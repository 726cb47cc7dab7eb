use serde::{Deserialize, Serialize};
use std::fmt;

/// The immutable tag identifying which variant of rule an object represents.
///
/// The set is closed: a rule's kind is fixed at construction and replacing a
/// rule's text never changes it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RuleKind {
    Style,
    Media,
    Import,
    FontFace,
    Namespace,
    Charset,
}

impl RuleKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            RuleKind::Style => "style",
            RuleKind::Media => "media",
            RuleKind::Import => "import",
            RuleKind::FontFace => "font-face",
            RuleKind::Namespace => "namespace",
            RuleKind::Charset => "charset",
        }
    }
}

impl fmt::Display for RuleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single `name: value` declaration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Declaration {
    pub name: String,
    pub value: String,
}

impl Declaration {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// A parsed stylesheet rule.
///
/// This is the parser-level representation: nested rules (inside `Media`)
/// are held inline. The CSSOM lowers them into its arena and rewires the
/// containment as ids.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Rule {
    /// Selector plus declaration block (`.a { color: red }`)
    Style {
        selector: String,
        declarations: Vec<Declaration>,
    },

    /// Conditional group rule (`@media screen { ... }`)
    Media { condition: String, rules: Vec<Rule> },

    /// External sheet reference (`@import url("a.css") print;`)
    Import { href: String, media: Option<String> },

    /// Font description block (`@font-face { ... }`)
    FontFace { declarations: Vec<Declaration> },

    /// Namespace binding (`@namespace svg "...";`)
    Namespace {
        prefix: Option<String>,
        namespace: String,
    },

    /// Encoding marker (`@charset "utf-8";`)
    Charset { encoding: String },
}

impl Rule {
    pub fn kind(&self) -> RuleKind {
        match self {
            Rule::Style { .. } => RuleKind::Style,
            Rule::Media { .. } => RuleKind::Media,
            Rule::Import { .. } => RuleKind::Import,
            Rule::FontFace { .. } => RuleKind::FontFace,
            Rule::Namespace { .. } => RuleKind::Namespace,
            Rule::Charset { .. } => RuleKind::Charset,
        }
    }
}
