use logos::Logos;
use std::fmt;

/// Token types for stylesheet rule text.
///
/// The lexer is deliberately coarse: selectors, media conditions and
/// declaration bodies all surface as `Chunk` runs and are split further by
/// the rule parser. Only the characters that delimit rule structure get
/// their own tokens.
#[derive(Logos, Debug, Clone, PartialEq)]
#[logos(skip r"[ \t\n\r\f]+")]
pub enum Token<'src> {
    // At-keywords introduce every non-style rule (@media, @import, ...)
    #[regex(r"@[a-zA-Z-]+", |lex| lex.slice())]
    AtKeyword(&'src str),

    // String literals, both quote styles
    #[regex(r#""([^"\\]|\\.)*""#, |lex| lex.slice())]
    #[regex(r"'([^'\\]|\\.)*'", |lex| lex.slice())]
    String(&'src str),

    // Everything between structural delimiters: selector text, media
    // conditions, `name: value` declaration runs. Internal whitespace is
    // preserved; the parser trims.
    #[regex(r#"[^@\{\};"' \t\n\r\f][^\{\};"']*"#, |lex| lex.slice())]
    Chunk(&'src str),

    #[token("{")]
    LBrace,

    #[token("}")]
    RBrace,

    #[token(";")]
    Semicolon,
}

impl fmt::Display for Token<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::AtKeyword(s) => write!(f, "at-keyword '{}'", s),
            Token::String(s) => write!(f, "string {}", s),
            Token::Chunk(s) => write!(f, "'{}'", s.trim()),
            Token::LBrace => write!(f, "{{"),
            Token::RBrace => write!(f, "}}"),
            Token::Semicolon => write!(f, ";"),
        }
    }
}

impl Token<'_> {
    /// Raw source text of the token, used when reassembling declaration
    /// values that the lexer split around string literals.
    pub fn raw(&self) -> &str {
        match self {
            Token::AtKeyword(s) | Token::String(s) | Token::Chunk(s) => s,
            Token::LBrace => "{",
            Token::RBrace => "}",
            Token::Semicolon => ";",
        }
    }
}

/// Tokenize rule text
pub fn tokenize(source: &str) -> Vec<(Token, std::ops::Range<usize>)> {
    let lexer = Token::lexer(source);
    lexer
        .spanned()
        .filter_map(|(result, span)| result.ok().map(|token| (token, span)))
        .collect()
}
