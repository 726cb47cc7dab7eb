use serde::{Deserialize, Serialize};

/// The textual content backing a document.
///
/// Immutable once constructed: the core reads from it and clones it, never
/// mutates it. Cloning produces an independent copy, so a cloned document
/// never shares mutable state with the original.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TextSource {
    text: String,
}

impl TextSource {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn len(&self) -> usize {
        self.text.len()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

impl From<&str> for TextSource {
    fn from(text: &str) -> Self {
        Self::new(text)
    }
}

impl From<String> for TextSource {
    fn from(text: String) -> Self {
        Self::new(text)
    }
}

/// Collapses every whitespace run to a single space and strips the ends.
///
/// This is the normalization applied to derived text such as a document
/// title.
pub fn collapse_and_strip(text: &str) -> String {
    let mut output = String::with_capacity(text.len());
    let mut in_run = false;

    for c in text.chars() {
        if c.is_whitespace() {
            in_run = true;
            continue;
        }
        if in_run && !output.is_empty() {
            output.push(' ');
        }
        in_run = false;
        output.push(c);
    }

    output
}
