use crate::ast::{Declaration, Rule};

/// Serializer converts rules back to stylesheet text.
///
/// The output is the canonical form: reparsing it yields a rule of the same
/// kind with the same content. Whitespace from the original text is not
/// preserved.
pub struct Serializer {
    indent_level: usize,
    indent_string: String,
}

/// Serialize a single rule with the default indentation.
pub fn serialize_rule(rule: &Rule) -> String {
    Serializer::new().serialize_rule(rule)
}

/// Serialize a rule list with the default indentation.
pub fn serialize_rule_list(rules: &[Rule]) -> String {
    Serializer::new().serialize_rule_list(rules)
}

impl Serializer {
    pub fn new() -> Self {
        Self {
            indent_level: 0,
            indent_string: "  ".to_string(), // 2 spaces
        }
    }

    pub fn with_indent(indent: &str) -> Self {
        Self {
            indent_level: 0,
            indent_string: indent.to_string(),
        }
    }

    pub fn serialize_rule(&mut self, rule: &Rule) -> String {
        let mut output = String::new();
        self.write_rule(rule, &mut output);
        output
    }

    pub fn serialize_rule_list(&mut self, rules: &[Rule]) -> String {
        let mut output = String::new();
        for (i, rule) in rules.iter().enumerate() {
            if i > 0 {
                output.push('\n');
            }
            self.write_rule(rule, &mut output);
        }
        output
    }

    fn write_rule(&mut self, rule: &Rule, output: &mut String) {
        match rule {
            Rule::Style {
                selector,
                declarations,
            } => {
                self.write_indent(output);
                output.push_str(selector);
                output.push_str(" {\n");
                self.write_declarations(declarations, output);
                self.write_indent(output);
                output.push_str("}\n");
            }

            Rule::Media { condition, rules } => {
                self.write_indent(output);
                output.push_str("@media");
                if !condition.is_empty() {
                    output.push(' ');
                    output.push_str(condition);
                }
                output.push_str(" {\n");
                self.indent_level += 1;
                for rule in rules {
                    self.write_rule(rule, output);
                }
                self.indent_level -= 1;
                self.write_indent(output);
                output.push_str("}\n");
            }

            Rule::Import { href, media } => {
                self.write_indent(output);
                output.push_str("@import url(\"");
                output.push_str(href);
                output.push_str("\")");
                if let Some(media) = media {
                    output.push(' ');
                    output.push_str(media);
                }
                output.push_str(";\n");
            }

            Rule::FontFace { declarations } => {
                self.write_indent(output);
                output.push_str("@font-face {\n");
                self.write_declarations(declarations, output);
                self.write_indent(output);
                output.push_str("}\n");
            }

            Rule::Namespace { prefix, namespace } => {
                self.write_indent(output);
                output.push_str("@namespace ");
                if let Some(prefix) = prefix {
                    output.push_str(prefix);
                    output.push(' ');
                }
                output.push('"');
                output.push_str(namespace);
                output.push_str("\";\n");
            }

            Rule::Charset { encoding } => {
                self.write_indent(output);
                output.push_str("@charset \"");
                output.push_str(encoding);
                output.push_str("\";\n");
            }
        }
    }

    fn write_declarations(&mut self, declarations: &[Declaration], output: &mut String) {
        self.indent_level += 1;
        for declaration in declarations {
            self.write_indent(output);
            output.push_str(&declaration.name);
            output.push_str(": ");
            output.push_str(&declaration.value);
            output.push_str(";\n");
        }
        self.indent_level -= 1;
    }

    fn write_indent(&self, output: &mut String) {
        for _ in 0..self.indent_level {
            output.push_str(&self.indent_string);
        }
    }
}

impl Default for Serializer {
    fn default() -> Self {
        Self::new()
    }
}
