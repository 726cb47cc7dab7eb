use vellum_parser::{Declaration, RuleKind};

/// Stable handle to a rule inside its stylesheet's arena.
///
/// Handles survive in-place text replacement: external holders keep
/// observing the same rule object with its new content. Removing a rule
/// tombstones its slot, so a stale handle resolves to nothing rather than
/// to some other rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RuleId(pub(crate) usize);

/// Identifies a stylesheet, for owner back-references.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SheetId(pub(crate) u64);

/// Per-kind rule content. Nested rules (media children) are held in the
/// arena and referenced by id, which is what gives them a containing rule
/// to point back at.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum RulePayload {
    Style {
        selector: String,
        declarations: Vec<Declaration>,
    },
    Media {
        condition: String,
        children: Vec<RuleId>,
    },
    Import {
        href: String,
        media: Option<String>,
    },
    FontFace {
        declarations: Vec<Declaration>,
    },
    Namespace {
        prefix: Option<String>,
        namespace: String,
    },
    Charset {
        encoding: String,
    },
}

impl RulePayload {
    pub(crate) fn kind(&self) -> RuleKind {
        match self {
            RulePayload::Style { .. } => RuleKind::Style,
            RulePayload::Media { .. } => RuleKind::Media,
            RulePayload::Import { .. } => RuleKind::Import,
            RulePayload::FontFace { .. } => RuleKind::FontFace,
            RulePayload::Namespace { .. } => RuleKind::Namespace,
            RulePayload::Charset { .. } => RuleKind::Charset,
        }
    }
}

/// A single entry in a stylesheet.
///
/// `kind` is fixed at construction. `parent` and `owner` are observational
/// back-references set exclusively by the containing stylesheet when the
/// rule is inserted or removed — never by the rule itself, and never by
/// callers.
#[derive(Debug, Clone, PartialEq)]
pub struct CssRule {
    kind: RuleKind,
    payload: RulePayload,
    parent: Option<RuleId>,
    owner: Option<SheetId>,
}

impl CssRule {
    pub(crate) fn new(payload: RulePayload, parent: Option<RuleId>, owner: SheetId) -> Self {
        Self {
            kind: payload.kind(),
            payload,
            parent,
            owner: Some(owner),
        }
    }

    /// The type constant indicating the kind of rule. Never changes.
    pub fn kind(&self) -> RuleKind {
        self.kind
    }

    /// The containing rule, if this rule is nested.
    pub fn parent(&self) -> Option<RuleId> {
        self.parent
    }

    /// The stylesheet that contains this rule.
    pub fn owner(&self) -> Option<SheetId> {
        self.owner
    }

    /// Child rule ids for container kinds; empty for everything else.
    pub fn children(&self) -> &[RuleId] {
        match &self.payload {
            RulePayload::Media { children, .. } => children,
            _ => &[],
        }
    }

    pub(crate) fn payload(&self) -> &RulePayload {
        &self.payload
    }

    /// Swaps in new content of the same kind. The rule's identity — its
    /// slot, parent and owner — is untouched.
    pub(crate) fn replace_payload(&mut self, payload: RulePayload) {
        debug_assert_eq!(payload.kind(), self.kind);
        self.payload = payload;
    }

    pub(crate) fn set_media_children(&mut self, ids: Vec<RuleId>) {
        if let RulePayload::Media { children, .. } = &mut self.payload {
            *children = ids;
        }
    }

    pub(crate) fn set_owner(&mut self, owner: SheetId) {
        self.owner = Some(owner);
    }

    pub(crate) fn remove_child(&mut self, id: RuleId) {
        if let RulePayload::Media { children, .. } = &mut self.payload {
            children.retain(|&child| child != id);
        }
    }
}
