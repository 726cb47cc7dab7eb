use crate::error::{ParseError, ParseResult};
use tokio_util::sync::CancellationToken;

/// Receives the tree as the markup parser produces it. The document acts as
/// the sink during a load.
pub trait TreeSink {
    fn open_element(&mut self, name: String, attributes: Vec<(String, String)>);
    fn close_element(&mut self);
    fn text(&mut self, content: String);
    fn comment(&mut self, content: String);
}

/// Opaque parser configuration, passed through by the load pipeline.
#[derive(Debug, Clone, Default)]
pub struct XmlParserOptions {
    /// Drop comment nodes instead of forwarding them to the sink.
    pub ignore_comments: bool,
}

/// One step of markup structure.
#[derive(Debug, Clone, PartialEq)]
enum XmlEvent {
    Open {
        name: String,
        attributes: Vec<(String, String)>,
        self_closing: bool,
    },
    Close,
    Text(String),
    Comment(String),
    /// `<?...?>` and `<!...>` markers; carried so the driver can skip them.
    Marker,
    Eof,
}

/// Drives the markup parser over `source`, populating `sink` in place.
///
/// Cancellation is cooperative: the token is checked before every structural
/// step, and the parser yields between steps so a pre-cancelled or
/// mid-parse-cancelled load stops promptly with `ParseError::Cancelled`.
/// Nodes already handed to the sink stay there; the caller decides what to
/// do with the partial tree.
pub async fn parse_async<S: TreeSink>(
    sink: &mut S,
    source: &str,
    options: XmlParserOptions,
    cancel: CancellationToken,
) -> ParseResult<()> {
    let mut parser = XmlParser::new(source);

    loop {
        if cancel.is_cancelled() {
            return Err(ParseError::cancelled());
        }

        match parser.next_event()? {
            XmlEvent::Open {
                name,
                attributes,
                self_closing,
            } => {
                sink.open_element(name, attributes);
                if self_closing {
                    sink.close_element();
                }
            }
            XmlEvent::Close => sink.close_element(),
            XmlEvent::Text(content) => sink.text(content),
            XmlEvent::Comment(content) => {
                if !options.ignore_comments {
                    sink.comment(content);
                }
            }
            XmlEvent::Marker => {}
            XmlEvent::Eof => break,
        }

        tokio::task::yield_now().await;
    }

    Ok(())
}

/// Hand-rolled markup scanner. Tracks the open-element stack so mismatched
/// or unclosed tags surface as parse errors rather than a skewed tree.
struct XmlParser<'src> {
    source: &'src str,
    pos: usize,
    open: Vec<String>,
}

impl<'src> XmlParser<'src> {
    fn new(source: &'src str) -> Self {
        Self {
            source,
            pos: 0,
            open: Vec::new(),
        }
    }

    fn next_event(&mut self) -> ParseResult<XmlEvent> {
        let rest = &self.source[self.pos..];

        if rest.is_empty() {
            if let Some(unclosed) = self.open.last() {
                return Err(ParseError::invalid_syntax(
                    self.pos,
                    format!("Unclosed element <{}>", unclosed),
                ));
            }
            return Ok(XmlEvent::Eof);
        }

        if let Some(body) = rest.strip_prefix("<!--") {
            let end = body
                .find("-->")
                .ok_or_else(|| ParseError::unexpected_eof(self.source.len()))?;
            self.pos += 4 + end + 3;
            return Ok(XmlEvent::Comment(body[..end].to_string()));
        }

        if rest.starts_with("<?") || rest.starts_with("<!") {
            // prolog / doctype; no tree contribution
            let end = rest
                .find('>')
                .ok_or_else(|| ParseError::unexpected_eof(self.source.len()))?;
            self.pos += end + 1;
            return Ok(XmlEvent::Marker);
        }

        if let Some(body) = rest.strip_prefix("</") {
            let end = body
                .find('>')
                .ok_or_else(|| ParseError::unexpected_eof(self.source.len()))?;
            let name = body[..end].trim();
            let tag_pos = self.pos;
            self.pos += 2 + end + 1;

            match self.open.pop() {
                Some(open) if open == name => Ok(XmlEvent::Close),
                Some(open) => Err(ParseError::invalid_syntax(
                    tag_pos,
                    format!("Mismatched closing tag </{}>, expected </{}>", name, open),
                )),
                None => Err(ParseError::invalid_syntax(
                    tag_pos,
                    format!("Closing tag </{}> without an open element", name),
                )),
            }
        } else if rest.starts_with('<') {
            self.scan_open_tag()
        } else {
            let end = rest.find('<').unwrap_or(rest.len());
            let text = decode_entities(&rest[..end]);
            self.pos += end;

            if self.open.is_empty() && text.trim().is_empty() {
                // inter-element whitespace at the document level
                return Ok(XmlEvent::Marker);
            }
            Ok(XmlEvent::Text(text))
        }
    }

    fn scan_open_tag(&mut self) -> ParseResult<XmlEvent> {
        let tag_pos = self.pos;
        self.pos += 1; // '<'

        let name = self.scan_name()?;
        if name.is_empty() {
            return Err(ParseError::invalid_syntax(tag_pos, "Expected element name"));
        }

        let mut attributes = Vec::new();
        loop {
            self.skip_whitespace();
            let rest = &self.source[self.pos..];

            if rest.starts_with("/>") {
                self.pos += 2;
                return Ok(XmlEvent::Open {
                    name,
                    attributes,
                    self_closing: true,
                });
            }
            if rest.starts_with('>') {
                self.pos += 1;
                self.open.push(name.clone());
                return Ok(XmlEvent::Open {
                    name,
                    attributes,
                    self_closing: false,
                });
            }
            if rest.is_empty() {
                return Err(ParseError::unexpected_eof(self.source.len()));
            }

            attributes.push(self.scan_attribute()?);
        }
    }

    fn scan_attribute(&mut self) -> ParseResult<(String, String)> {
        let attr_pos = self.pos;
        let name = self.scan_name()?;
        if name.is_empty() {
            return Err(ParseError::invalid_syntax(
                attr_pos,
                "Expected attribute name",
            ));
        }

        self.skip_whitespace();
        if !self.source[self.pos..].starts_with('=') {
            return Err(ParseError::invalid_syntax(
                self.pos,
                format!("Attribute '{}' is missing a value", name),
            ));
        }
        self.pos += 1;
        self.skip_whitespace();

        let rest = &self.source[self.pos..];
        let quote = match rest.chars().next() {
            Some(c @ ('"' | '\'')) => c,
            _ => {
                return Err(ParseError::invalid_syntax(
                    self.pos,
                    format!("Attribute '{}' value must be quoted", name),
                ))
            }
        };

        let body = &rest[1..];
        let end = body
            .find(quote)
            .ok_or_else(|| ParseError::unexpected_eof(self.source.len()))?;
        let value = decode_entities(&body[..end]);
        self.pos += 1 + end + 1;

        Ok((name, value))
    }

    fn scan_name(&mut self) -> ParseResult<String> {
        let rest = &self.source[self.pos..];
        let end = rest
            .find(|c: char| c.is_whitespace() || c == '>' || c == '/' || c == '=')
            .unwrap_or(rest.len());
        let name = rest[..end].to_string();
        self.pos += end;
        Ok(name)
    }

    fn skip_whitespace(&mut self) {
        let rest = &self.source[self.pos..];
        let skipped = rest.len() - rest.trim_start().len();
        self.pos += skipped;
    }
}

/// Resolves the five predefined entities; anything else passes through.
fn decode_entities(text: &str) -> String {
    if !text.contains('&') {
        return text.to_string();
    }
    text.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&apos;", "'")
        .replace("&amp;", "&")
}
