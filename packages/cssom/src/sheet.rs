use crate::error::{RuleError, RuleResult};
use crate::rule::{CssRule, RuleId, RulePayload, SheetId};
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::debug;
use vellum_parser::{ast, parse_rule, parse_rule_list, serializer};

static NEXT_SHEET_ID: AtomicU64 = AtomicU64::new(1);

/// The ordered container owning a list of rules.
///
/// Rules live in an arena: the sheet owns them, hands out stable `RuleId`
/// handles, and is the only code that sets the rules' `parent`/`owner`
/// back-references. Removing a rule tombstones its slot instead of reusing
/// it, so outstanding handles never alias a different rule.
#[derive(Debug)]
pub struct StyleSheet {
    id: SheetId,
    entries: Vec<Option<CssRule>>,
    rules: Vec<RuleId>,
}

impl StyleSheet {
    pub fn new() -> Self {
        Self {
            id: Self::next_id(),
            entries: Vec::new(),
            rules: Vec::new(),
        }
    }

    fn next_id() -> SheetId {
        SheetId(NEXT_SHEET_ID.fetch_add(1, Ordering::Relaxed))
    }

    /// Parses a whole rule list into a fresh sheet.
    pub fn parse(text: &str) -> RuleResult<Self> {
        let parsed = parse_rule_list(text)?;
        let mut sheet = Self::new();
        for rule in parsed {
            sheet.insert_rule(rule);
        }
        Ok(sheet)
    }

    pub fn id(&self) -> SheetId {
        self.id
    }

    /// Top-level rule handles, in document order.
    pub fn rules(&self) -> &[RuleId] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Resolves a handle. `None` for removed rules.
    pub fn rule(&self, id: RuleId) -> Option<&CssRule> {
        self.entries.get(id.0).and_then(Option::as_ref)
    }

    /// Lowers a parsed rule into the arena and appends it to the rule
    /// list. Media children are attached with this rule as their parent.
    pub fn insert_rule(&mut self, rule: ast::Rule) -> RuleId {
        let id = self.lower(rule, None);
        self.rules.push(id);
        id
    }

    /// Parses `text` as a single rule and inserts it.
    pub fn insert_rule_text(&mut self, text: &str) -> RuleResult<RuleId> {
        let rule = parse_rule(text)?;
        Ok(self.insert_rule(rule))
    }

    /// Detaches and destroys a rule together with its subtree. Returns
    /// false for handles that are already dead.
    pub fn remove_rule(&mut self, id: RuleId) -> bool {
        let Some(rule) = self.rule(id) else {
            return false;
        };

        match rule.parent() {
            Some(parent_id) => {
                if let Some(parent) = self.entries[parent_id.0].as_mut() {
                    parent.remove_child(id);
                }
            }
            None => self.rules.retain(|&top| top != id),
        }

        self.destroy_subtree(id);
        true
    }

    /// The canonical textual serialization of a rule: a pure function of
    /// its current state.
    pub fn rule_text(&self, id: RuleId) -> Option<String> {
        self.to_ast(id)
            .map(|rule| serializer::serialize_rule(&rule))
    }

    /// Replaces a rule's content from text, in place.
    ///
    /// Fails with `Syntax` when the text does not parse as a rule and with
    /// `InvalidModification` when it parses as a different kind. Both
    /// checks run before any mutation, so a failed call leaves the rule —
    /// text, parent, owner — exactly as it was. On success the rule keeps
    /// its identity: its handle, its place in the tree and its
    /// back-references are untouched, only the content changes.
    pub fn set_rule_text(&mut self, id: RuleId, text: &str) -> RuleResult<()> {
        let kind = self.rule(id).ok_or(RuleError::StaleHandle)?.kind();
        let parsed = parse_rule(text)?;

        if parsed.kind() != kind {
            return Err(RuleError::InvalidModification {
                expected: kind,
                found: parsed.kind(),
            });
        }

        debug!(kind = %kind, "replacing rule text in place");

        // all fallible work is done; swap content, keep identity
        match parsed {
            ast::Rule::Media { condition, rules } => {
                let old_children = self.rule(id).map(|r| r.children().to_vec()).unwrap_or_default();
                for child in old_children {
                    self.destroy_subtree(child);
                }
                if let Some(rule) = self.entries[id.0].as_mut() {
                    rule.replace_payload(RulePayload::Media {
                        condition,
                        children: Vec::new(),
                    });
                }
                let children: Vec<RuleId> = rules
                    .into_iter()
                    .map(|rule| self.lower(rule, Some(id)))
                    .collect();
                if let Some(rule) = self.entries[id.0].as_mut() {
                    rule.set_media_children(children);
                }
            }
            other => {
                let payload = Self::flat_payload(other);
                if let Some(rule) = self.entries[id.0].as_mut() {
                    rule.replace_payload(payload);
                }
            }
        }

        Ok(())
    }

    /// Serializes the whole sheet in document order.
    pub fn to_css(&self) -> String {
        let rules: Vec<ast::Rule> = self
            .rules
            .iter()
            .filter_map(|&id| self.to_ast(id))
            .collect();
        serializer::serialize_rule_list(&rules)
    }

    fn lower(&mut self, rule: ast::Rule, parent: Option<RuleId>) -> RuleId {
        match rule {
            ast::Rule::Media { condition, rules } => {
                let id = self.alloc(
                    RulePayload::Media {
                        condition,
                        children: Vec::new(),
                    },
                    parent,
                );
                let children: Vec<RuleId> = rules
                    .into_iter()
                    .map(|rule| self.lower(rule, Some(id)))
                    .collect();
                if let Some(entry) = self.entries[id.0].as_mut() {
                    entry.set_media_children(children);
                }
                id
            }
            other => {
                let payload = Self::flat_payload(other);
                self.alloc(payload, parent)
            }
        }
    }

    /// Payload for rules without arena children. Media goes through
    /// `lower` instead so its children land in the arena.
    fn flat_payload(rule: ast::Rule) -> RulePayload {
        match rule {
            ast::Rule::Style {
                selector,
                declarations,
            } => RulePayload::Style {
                selector,
                declarations,
            },
            ast::Rule::Media { condition, .. } => RulePayload::Media {
                condition,
                children: Vec::new(),
            },
            ast::Rule::Import { href, media } => RulePayload::Import { href, media },
            ast::Rule::FontFace { declarations } => RulePayload::FontFace { declarations },
            ast::Rule::Namespace { prefix, namespace } => {
                RulePayload::Namespace { prefix, namespace }
            }
            ast::Rule::Charset { encoding } => RulePayload::Charset { encoding },
        }
    }

    fn alloc(&mut self, payload: RulePayload, parent: Option<RuleId>) -> RuleId {
        let id = RuleId(self.entries.len());
        self.entries.push(Some(CssRule::new(payload, parent, self.id)));
        id
    }

    fn destroy_subtree(&mut self, id: RuleId) {
        if let Some(slot) = self.entries.get_mut(id.0) {
            if let Some(rule) = slot.take() {
                for &child in rule.children() {
                    self.destroy_subtree(child);
                }
            }
        }
    }

    fn to_ast(&self, id: RuleId) -> Option<ast::Rule> {
        let rule = self.rule(id)?;
        Some(match rule.payload() {
            RulePayload::Style {
                selector,
                declarations,
            } => ast::Rule::Style {
                selector: selector.clone(),
                declarations: declarations.clone(),
            },
            RulePayload::Media {
                condition,
                children,
            } => ast::Rule::Media {
                condition: condition.clone(),
                rules: children.iter().filter_map(|&c| self.to_ast(c)).collect(),
            },
            RulePayload::Import { href, media } => ast::Rule::Import {
                href: href.clone(),
                media: media.clone(),
            },
            RulePayload::FontFace { declarations } => ast::Rule::FontFace {
                declarations: declarations.clone(),
            },
            RulePayload::Namespace { prefix, namespace } => ast::Rule::Namespace {
                prefix: prefix.clone(),
                namespace: namespace.clone(),
            },
            RulePayload::Charset { encoding } => ast::Rule::Charset {
                encoding: encoding.clone(),
            },
        })
    }
}

impl Default for StyleSheet {
    fn default() -> Self {
        Self::new()
    }
}

/// Cloning copies the arena under a fresh sheet id; every cloned rule's
/// owner is rewritten so the two sheets stay distinguishable through their
/// rules' back-references. Handles from one sheet are meaningful in the
/// other only by coincidence of layout, never by identity.
impl Clone for StyleSheet {
    fn clone(&self) -> Self {
        let id = Self::next_id();
        let mut entries = self.entries.clone();
        for entry in entries.iter_mut().flatten() {
            entry.set_owner(id);
        }
        Self {
            id,
            entries,
            rules: self.rules.clone(),
        }
    }
}
