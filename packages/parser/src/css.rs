use crate::ast::{Declaration, Rule};
use crate::error::{ParseError, ParseResult};
use crate::tokenizer::{tokenize, Token};

/// Parser for stylesheet rule text.
///
/// Works over the coarse token stream from the tokenizer: rule structure is
/// driven by braces, semicolons, at-keywords and strings; selector text,
/// media conditions and declarations are reassembled from `Chunk` runs.
pub struct RuleParser<'src> {
    tokens: Vec<(Token<'src>, std::ops::Range<usize>)>,
    pos: usize,
}

/// Parse exactly one rule. Trailing input after the rule is an error.
pub fn parse_rule(source: &str) -> ParseResult<Rule> {
    let mut parser = RuleParser::new(source);
    let rule = parser.parse_one()?;

    if let Some((tok, span)) = parser.peek() {
        return Err(ParseError::invalid_syntax(
            span.start,
            format!("Expected a single rule, found trailing {}", tok),
        ));
    }

    Ok(rule)
}

/// Parse a whole rule list (the body of a stylesheet).
pub fn parse_rule_list(source: &str) -> ParseResult<Vec<Rule>> {
    let mut parser = RuleParser::new(source);
    let mut rules = Vec::new();

    while parser.peek().is_some() {
        rules.push(parser.parse_one()?);
    }

    Ok(rules)
}

impl<'src> RuleParser<'src> {
    pub fn new(source: &'src str) -> Self {
        let tokens = tokenize(source);
        Self { tokens, pos: 0 }
    }

    fn parse_one(&mut self) -> ParseResult<Rule> {
        match self.peek() {
            Some((Token::AtKeyword(kw), span)) => {
                let kw = *kw;
                let pos = span.start;
                match kw {
                    "@media" => self.parse_media(),
                    "@import" => self.parse_import(),
                    "@font-face" => self.parse_font_face(),
                    "@namespace" => self.parse_namespace(),
                    "@charset" => self.parse_charset(),
                    other => Err(ParseError::invalid_syntax(
                        pos,
                        format!("Unsupported at-rule '{}'", other),
                    )),
                }
            }
            Some((Token::Chunk(_), _)) | Some((Token::String(_), _)) => self.parse_style(),
            Some((tok, span)) => Err(ParseError::unexpected_token(
                span.start,
                "a rule",
                tok.to_string(),
            )),
            None => Err(ParseError::unexpected_eof(self.end_pos())),
        }
    }

    /// `selector { declarations }`
    fn parse_style(&mut self) -> ParseResult<Rule> {
        let selector = self.collect_prelude()?;
        self.expect_lbrace()?;
        let declarations = self.parse_declaration_block()?;

        Ok(Rule::Style {
            selector,
            declarations,
        })
    }

    /// `@media condition { rules }`
    fn parse_media(&mut self) -> ParseResult<Rule> {
        self.advance(); // @media
        let condition = self.collect_prelude()?;
        self.expect_lbrace()?;

        let mut rules = Vec::new();
        loop {
            match self.peek() {
                Some((Token::RBrace, _)) => {
                    self.advance();
                    break;
                }
                None => return Err(ParseError::unexpected_eof(self.end_pos())),
                _ => rules.push(self.parse_one()?),
            }
        }

        Ok(Rule::Media { condition, rules })
    }

    /// `@import url("a.css") media;` or `@import "a.css" media;`
    fn parse_import(&mut self) -> ParseResult<Rule> {
        self.advance(); // @import
        let pos = self.current_pos();
        let raw = self.collect_until_semicolon()?;
        let (href, media) = split_target(&raw, pos)?;

        Ok(Rule::Import { href, media })
    }

    /// `@font-face { declarations }`
    fn parse_font_face(&mut self) -> ParseResult<Rule> {
        self.advance(); // @font-face
        self.expect_lbrace()?;
        let declarations = self.parse_declaration_block()?;

        Ok(Rule::FontFace { declarations })
    }

    /// `@namespace "uri";` or `@namespace prefix "uri";` (url() form too)
    fn parse_namespace(&mut self) -> ParseResult<Rule> {
        self.advance(); // @namespace
        let pos = self.current_pos();
        let raw = self.collect_until_semicolon()?;
        let trimmed = raw.trim();

        let (prefix, target) = if trimmed.starts_with('"')
            || trimmed.starts_with('\'')
            || trimmed.starts_with("url(")
        {
            (None, trimmed.to_string())
        } else {
            match trimmed.find(char::is_whitespace) {
                Some(split) => (
                    Some(trimmed[..split].to_string()),
                    trimmed[split..].trim_start().to_string(),
                ),
                None => {
                    return Err(ParseError::invalid_syntax(
                        pos,
                        "Expected a namespace URI after the prefix",
                    ))
                }
            }
        };

        let (namespace, rest) = split_target(&target, pos)?;
        if rest.is_some() {
            return Err(ParseError::invalid_syntax(
                pos,
                "Unexpected trailing text after namespace URI",
            ));
        }

        Ok(Rule::Namespace { prefix, namespace })
    }

    /// `@charset "utf-8";`
    fn parse_charset(&mut self) -> ParseResult<Rule> {
        self.advance(); // @charset
        match self.peek() {
            Some((Token::String(s), _)) => {
                let encoding = unquote(s);
                self.advance();
                self.expect_semicolon()?;
                Ok(Rule::Charset { encoding })
            }
            Some((tok, span)) => Err(ParseError::unexpected_token(
                span.start,
                "a string",
                tok.to_string(),
            )),
            None => Err(ParseError::unexpected_eof(self.end_pos())),
        }
    }

    /// Collects selector / condition text up to (not including) the `{`.
    fn collect_prelude(&mut self) -> ParseResult<String> {
        let mut prelude = String::new();
        loop {
            match self.peek() {
                Some((Token::LBrace, _)) => break,
                Some((Token::Chunk(_), _))
                | Some((Token::String(_), _))
                | Some((Token::AtKeyword(_), _)) => {
                    let raw = self.tokens[self.pos].0.raw();
                    prelude.push_str(raw);
                    self.advance();
                }
                Some((tok, span)) => {
                    return Err(ParseError::unexpected_token(
                        span.start,
                        "{",
                        tok.to_string(),
                    ))
                }
                None => return Err(ParseError::unexpected_eof(self.end_pos())),
            }
        }
        Ok(prelude.trim().to_string())
    }

    /// Parses `name: value` pairs up to and including the closing `}`.
    fn parse_declaration_block(&mut self) -> ParseResult<Vec<Declaration>> {
        let mut declarations = Vec::new();

        loop {
            // skip empty declarations
            while matches!(self.peek(), Some((Token::Semicolon, _))) {
                self.advance();
            }

            if matches!(self.peek(), Some((Token::RBrace, _))) {
                self.advance();
                return Ok(declarations);
            }
            if self.peek().is_none() {
                return Err(ParseError::unexpected_eof(self.end_pos()));
            }

            let pos = self.current_pos();
            let mut raw = String::new();
            loop {
                match self.peek() {
                    Some((Token::Semicolon, _)) => {
                        self.advance();
                        break;
                    }
                    Some((Token::RBrace, _)) => break,
                    Some((Token::LBrace, span)) => {
                        return Err(ParseError::invalid_syntax(
                            span.start,
                            "Unexpected '{' in declaration block",
                        ))
                    }
                    Some(_) => {
                        raw.push_str(self.tokens[self.pos].0.raw());
                        self.advance();
                    }
                    None => return Err(ParseError::unexpected_eof(self.end_pos())),
                }
            }

            let raw = raw.trim();
            if raw.is_empty() {
                continue;
            }

            match raw.split_once(':') {
                Some((name, value)) if !name.trim().is_empty() => {
                    declarations.push(Declaration::new(
                        name.trim().to_ascii_lowercase(),
                        value.trim(),
                    ));
                }
                _ => {
                    return Err(ParseError::invalid_syntax(
                        pos,
                        format!("Declaration '{}' is missing a name or ':'", raw),
                    ))
                }
            }
        }
    }

    /// Collects raw text up to and including the `;` that ends a statement
    /// at-rule.
    fn collect_until_semicolon(&mut self) -> ParseResult<String> {
        let mut raw = String::new();
        loop {
            match self.peek() {
                Some((Token::Semicolon, _)) => {
                    self.advance();
                    return Ok(raw);
                }
                Some((Token::LBrace, span)) | Some((Token::RBrace, span)) => {
                    return Err(ParseError::unexpected_token(
                        span.start,
                        ";",
                        self.tokens[self.pos].0.to_string(),
                    ))
                }
                Some(_) => {
                    raw.push_str(self.tokens[self.pos].0.raw());
                    self.advance();
                }
                None => return Err(ParseError::unexpected_eof(self.end_pos())),
            }
        }
    }

    fn expect_lbrace(&mut self) -> ParseResult<()> {
        match self.peek() {
            Some((Token::LBrace, _)) => {
                self.advance();
                Ok(())
            }
            Some((tok, span)) => Err(ParseError::unexpected_token(
                span.start,
                "{",
                tok.to_string(),
            )),
            None => Err(ParseError::unexpected_eof(self.end_pos())),
        }
    }

    fn expect_semicolon(&mut self) -> ParseResult<()> {
        match self.peek() {
            Some((Token::Semicolon, _)) => {
                self.advance();
                Ok(())
            }
            Some((tok, span)) => Err(ParseError::unexpected_token(
                span.start,
                ";",
                tok.to_string(),
            )),
            None => Err(ParseError::unexpected_eof(self.end_pos())),
        }
    }

    fn peek(&self) -> Option<&(Token<'src>, std::ops::Range<usize>)> {
        self.tokens.get(self.pos)
    }

    fn advance(&mut self) {
        self.pos += 1;
    }

    fn current_pos(&self) -> usize {
        self.tokens
            .get(self.pos)
            .map(|(_, span)| span.start)
            .unwrap_or_else(|| self.end_pos())
    }

    fn end_pos(&self) -> usize {
        self.tokens.last().map(|(_, span)| span.end).unwrap_or(0)
    }
}

/// Splits `url("a.css") print` or `"a.css" print` into target and trailing
/// text.
fn split_target(raw: &str, pos: usize) -> ParseResult<(String, Option<String>)> {
    let raw = raw.trim();

    if let Some(rest) = raw.strip_prefix("url(") {
        let end = rest
            .find(')')
            .ok_or_else(|| ParseError::invalid_syntax(pos, "Unterminated url()"))?;
        let href = unquote(rest[..end].trim());
        let tail = rest[end + 1..].trim();
        return Ok((href, (!tail.is_empty()).then(|| tail.to_string())));
    }

    if raw.starts_with('"') || raw.starts_with('\'') {
        let end = find_string_end(raw)
            .ok_or_else(|| ParseError::invalid_syntax(pos, "Unterminated string"))?;
        let href = unquote(&raw[..=end]);
        let tail = raw[end + 1..].trim();
        return Ok((href, (!tail.is_empty()).then(|| tail.to_string())));
    }

    Err(ParseError::invalid_syntax(
        pos,
        "Expected url(...) or a quoted string",
    ))
}

/// Index of the closing quote, honoring backslash escapes. `raw` must start
/// with the quote character.
fn find_string_end(raw: &str) -> Option<usize> {
    let mut chars = raw.char_indices();
    let (_, quote) = chars.next()?;
    let mut escaped = false;
    for (i, c) in chars {
        if escaped {
            escaped = false;
        } else if c == '\\' {
            escaped = true;
        } else if c == quote {
            return Some(i);
        }
    }
    None
}

/// Strips matching quotes and resolves the basic escapes.
fn unquote(raw: &str) -> String {
    let raw = raw.trim();
    let bytes = raw.as_bytes();
    if raw.len() >= 2 && (bytes[0] == b'"' || bytes[0] == b'\'') && bytes[raw.len() - 1] == bytes[0]
    {
        raw[1..raw.len() - 1]
            .replace("\\\"", "\"")
            .replace("\\'", "'")
            .replace("\\\\", "\\")
    } else {
        raw.to_string()
    }
}
