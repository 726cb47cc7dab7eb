use crate::rule::{RuleId, RulePayload};
use crate::sheet::StyleSheet;
use vellum_dom::Element;

/// Output container for computed declarations.
///
/// Insertion-ordered: `iter` yields properties in the order they were first
/// set. Setting an existing property overwrites the value in place, so the
/// last writer wins without disturbing the order — document-order cascade
/// across the rules of one sheet. Bags stay small, so a linear scan beats a
/// map here.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PropertyBag {
    properties: Vec<(String, String)>,
}

impl PropertyBag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        match self.properties.iter_mut().find(|(n, _)| *n == name) {
            Some((_, slot)) => *slot = value.into(),
            None => self.properties.push((name, value.into())),
        }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.properties
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn len(&self) -> usize {
        self.properties.len()
    }

    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.properties
            .iter()
            .map(|(name, value)| (name.as_str(), value.as_str()))
    }
}

/// The rendering environment rules are evaluated against.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderDevice {
    pub media_type: String,
    pub viewport_width: u32,
    pub viewport_height: u32,
}

impl RenderDevice {
    pub fn new(media_type: impl Into<String>, viewport_width: u32, viewport_height: u32) -> Self {
        Self {
            media_type: media_type.into(),
            viewport_width,
            viewport_height,
        }
    }

    pub fn screen(viewport_width: u32, viewport_height: u32) -> Self {
        Self::new("screen", viewport_width, viewport_height)
    }

    pub fn printer(viewport_width: u32, viewport_height: u32) -> Self {
        Self::new("print", viewport_width, viewport_height)
    }
}

impl StyleSheet {
    /// Merges the declarations of every rule matching `element` under
    /// `device` into `style`, in document order.
    pub fn compute_style(&self, style: &mut PropertyBag, device: &RenderDevice, element: &Element) {
        for &id in self.rules() {
            self.compute_rule_style(id, style, device, element);
        }
    }

    /// Contribution of one rule. Style rules merge their declarations when
    /// the selector matches; media rules recurse into their children when
    /// the condition matches the device; every other kind contributes
    /// nothing. Non-matching elements are simply skipped — this never
    /// fails.
    pub fn compute_rule_style(
        &self,
        id: RuleId,
        style: &mut PropertyBag,
        device: &RenderDevice,
        element: &Element,
    ) {
        let Some(rule) = self.rule(id) else { return };

        match rule.payload() {
            RulePayload::Style {
                selector,
                declarations,
            } => {
                if selector_matches(selector, element) {
                    for declaration in declarations {
                        style.set(declaration.name.clone(), declaration.value.clone());
                    }
                }
            }
            RulePayload::Media {
                condition,
                children,
            } => {
                if media_matches(condition, device) {
                    for &child in children {
                        self.compute_rule_style(child, style, device, element);
                    }
                }
            }
            _ => {}
        }
    }
}

/// A selector list matches when any comma-separated part does.
fn selector_matches(selector: &str, element: &Element) -> bool {
    selector
        .split(',')
        .any(|part| compound_matches(part.trim(), element))
}

/// Matches a compound of simple selectors (`rect.note#main`, `*`).
/// Combinators, attribute selectors and pseudo-classes are outside this
/// engine's selector profile and never match.
fn compound_matches(part: &str, element: &Element) -> bool {
    if part.is_empty()
        || part.contains(char::is_whitespace)
        || part.contains(':')
        || part.contains('[')
        || part.contains('>')
    {
        return false;
    }

    split_simple_selectors(part).iter().all(|simple| {
        match simple.as_bytes()[0] {
            b'.' => element.has_class(&simple[1..]),
            b'#' => element.id() == Some(&simple[1..]),
            _ => *simple == "*" || element.name.eq_ignore_ascii_case(simple),
        }
    })
}

fn split_simple_selectors(part: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut start = 0;
    for (i, c) in part.char_indices() {
        if i > 0 && (c == '.' || c == '#') {
            parts.push(&part[start..i]);
            start = i;
        }
    }
    parts.push(&part[start..]);
    parts.retain(|s| !s.is_empty());
    parts
}

/// Evaluates a media condition against the device. An empty condition
/// matches everything; unknown terms never match.
fn media_matches(condition: &str, device: &RenderDevice) -> bool {
    let condition = condition.trim().to_ascii_lowercase();
    if condition.is_empty() {
        return true;
    }
    condition
        .split(" and ")
        .all(|term| media_term_matches(term.trim(), device))
}

fn media_term_matches(term: &str, device: &RenderDevice) -> bool {
    match term {
        "all" => true,
        "screen" | "print" | "speech" => device.media_type == term,
        _ => match parse_media_feature(term) {
            Some(("min-width", px)) => device.viewport_width >= px,
            Some(("max-width", px)) => device.viewport_width <= px,
            Some(("min-height", px)) => device.viewport_height >= px,
            Some(("max-height", px)) => device.viewport_height <= px,
            _ => false,
        },
    }
}

/// Parses a `(name: <n>px)` feature term.
fn parse_media_feature(term: &str) -> Option<(&str, u32)> {
    let inner = term.strip_prefix('(')?.strip_suffix(')')?;
    let (name, value) = inner.split_once(':')?;
    let px = value.trim().strip_suffix("px")?.trim().parse().ok()?;
    Some((name.trim(), px))
}
