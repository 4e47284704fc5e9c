//! Rule primitives and rule sets
//!
//! A `Rule` is an immutable constraint definition. Rules are declared as
//! `static` items and rule sets hold `&'static Rule` references, so a shared
//! primitive such as `validators::REQUIRED` is one object referenced by every
//! type shape that needs it.

use std::collections::BTreeMap;

/// Whether an attribute governed by a rule must be present
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Presence {
    Required,
    Optional,
}

/// The constraint a rule applies to its own value.
///
/// Variants carrying a sibling name are cross-field: they read the sibling
/// attribute from the full descriptor when applied, never when constructed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleKind {
    /// String naming a registered attribute type
    TypeTag,
    /// true or false
    Boolean,
    /// Non-negative whole number used as a length bound
    LengthBound,
    /// String; when bounded, its length must lie within sibling `min`/`max`
    Text { bounded: bool },
    /// Email address; when bounded, its length must lie within sibling `min`/`max`
    Email { bounded: bool },
    /// Whole number
    Integer,
    /// Any real number
    Number,
    /// Date value
    Date,
    /// String satisfying `is_valid_name`
    Identifier,
    /// Non-empty ordered list of identifiers
    EnumValues,
    /// String that must appear in the sibling list
    EnumMember { sibling: &'static str },
}

/// A named, immutable constraint definition
#[derive(Debug, PartialEq, Eq)]
pub struct Rule {
    name: &'static str,
    kind: RuleKind,
    presence: Presence,
}

impl Rule {
    /// Rule whose attribute may be omitted
    pub const fn optional(name: &'static str, kind: RuleKind) -> Self {
        Self {
            name,
            kind,
            presence: Presence::Optional,
        }
    }

    /// Rule whose attribute must be present
    pub const fn required(name: &'static str, kind: RuleKind) -> Self {
        Self {
            name,
            kind,
            presence: Presence::Required,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn kind(&self) -> RuleKind {
        self.kind
    }

    pub fn is_required(&self) -> bool {
        self.presence == Presence::Required
    }
}

/// Validator primitives shared by many type shapes.
///
/// Their semantics never vary by type.
pub mod validators {
    use super::{Rule, RuleKind};

    pub static REQUIRED: Rule = Rule::optional("required", RuleKind::Boolean);
    pub static UNIQUE: Rule = Rule::optional("unique", RuleKind::Boolean);
    pub static MIN_LENGTH: Rule = Rule::optional("minLength", RuleKind::LengthBound);
    pub static MAX_LENGTH: Rule = Rule::optional("maxLength", RuleKind::LengthBound);
}

/// Ordered mapping from descriptor attribute to the rule governing it
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuleSet {
    rules: BTreeMap<&'static str, &'static Rule>,
}

impl RuleSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a rule for `key`, replacing any previous one
    pub fn insert(&mut self, key: &'static str, rule: &'static Rule) {
        self.rules.insert(key, rule);
    }

    /// Adds every `(key, rule)` pair of a shape
    pub fn extend(&mut self, shape: &[(&'static str, &'static Rule)]) {
        for &(key, rule) in shape {
            self.insert(key, rule);
        }
    }

    pub fn get(&self, key: &str) -> Option<&'static Rule> {
        self.rules.get(key).copied()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.rules.contains_key(key)
    }

    /// Attribute keys in sorted order
    pub fn keys(&self) -> Vec<&'static str> {
        self.rules.keys().copied().collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &'static Rule)> + '_ {
        self.rules.iter().map(|(k, r)| (*k, *r))
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}
