//! Field-type rule resolution
//!
//! Maps a field descriptor's `type` tag to the closed set of rules governing
//! how that field's configuration may be authored. Resolution is pure and
//! total: unknown tags resolve to the universal `type` rule alone.

use serde_json::Value;

use super::rules::{validators, Rule, RuleKind, RuleSet};
use super::types::AttributeType;

/// A type shape: attribute key and the rule governing it
type Shape = &'static [(&'static str, &'static Rule)];

static TYPE: Rule = Rule::required("type", RuleKind::TypeTag);

static MULTIPLE: Rule = Rule::optional("multiple", RuleKind::Boolean);
static TEXT_DEFAULT: Rule = Rule::optional("textDefault", RuleKind::Text { bounded: true });
static EMAIL_DEFAULT: Rule = Rule::optional("emailDefault", RuleKind::Email { bounded: true });
static ENUM_VALUES: Rule = Rule::required("enumValues", RuleKind::EnumValues);
static ENUM_DEFAULT: Rule = Rule::optional(
    "enumDefault",
    RuleKind::EnumMember { sibling: "enum" },
);
static ENUM_NAME: Rule = Rule::optional("enumName", RuleKind::Identifier);
static INTEGER: Rule = Rule::optional("integer", RuleKind::Integer);
static NUMBER: Rule = Rule::optional("number", RuleKind::Number);
static DATE: Rule = Rule::optional("date", RuleKind::Date);
static BOOLEAN: Rule = Rule::optional("boolean", RuleKind::Boolean);

static NO_SHAPE: Shape = &[];

static MEDIA_SHAPE: Shape = &[
    ("multiple", &MULTIPLE),
    ("required", &validators::REQUIRED),
    ("unique", &validators::UNIQUE),
];

static TEXT_SHAPE: Shape = &[
    ("default", &TEXT_DEFAULT),
    ("required", &validators::REQUIRED),
    ("unique", &validators::UNIQUE),
    ("min", &validators::MIN_LENGTH),
    ("max", &validators::MAX_LENGTH),
];

static JSON_SHAPE: Shape = &[
    ("required", &validators::REQUIRED),
    ("unique", &validators::UNIQUE),
];

static ENUMERATION_SHAPE: Shape = &[
    ("enum", &ENUM_VALUES),
    ("default", &ENUM_DEFAULT),
    ("enumName", &ENUM_NAME),
    ("required", &validators::REQUIRED),
    ("unique", &validators::UNIQUE),
];

static PASSWORD_SHAPE: Shape = &[
    ("required", &validators::REQUIRED),
    ("min", &validators::MIN_LENGTH),
    ("max", &validators::MAX_LENGTH),
];

static EMAIL_SHAPE: Shape = &[
    ("default", &EMAIL_DEFAULT),
    ("required", &validators::REQUIRED),
    ("unique", &validators::UNIQUE),
    ("min", &validators::MIN_LENGTH),
    ("max", &validators::MAX_LENGTH),
];

static INTEGER_SHAPE: Shape = &[
    ("default", &INTEGER),
    ("required", &validators::REQUIRED),
    ("unique", &validators::UNIQUE),
    ("min", &INTEGER),
    ("max", &INTEGER),
];

static NUMBER_SHAPE: Shape = &[
    ("default", &NUMBER),
    ("required", &validators::REQUIRED),
    ("unique", &validators::UNIQUE),
    ("min", &NUMBER),
    ("max", &NUMBER),
];

static DATE_SHAPE: Shape = &[
    ("default", &DATE),
    ("required", &validators::REQUIRED),
    ("unique", &validators::UNIQUE),
];

static BOOLEAN_SHAPE: Shape = &[
    ("default", &BOOLEAN),
    ("required", &validators::REQUIRED),
    ("unique", &validators::UNIQUE),
];

/// Resolves field descriptors to their rule sets.
///
/// Stateless; safe to call from any number of threads.
pub struct TypeRuleResolver;

impl TypeRuleResolver {
    /// Resolves the rule set for a descriptor from its `type` attribute.
    ///
    /// A missing or non-string `type` resolves like an unknown tag.
    pub fn resolve(descriptor: &Value) -> RuleSet {
        Self::resolve_tag(descriptor.get("type").and_then(Value::as_str))
    }

    /// Resolves the rule set for a raw type tag.
    pub fn resolve_tag(tag: Option<&str>) -> RuleSet {
        let mut rules = RuleSet::new();
        rules.insert("type", &TYPE);

        if let Some(ty) = tag.and_then(AttributeType::parse) {
            rules.extend(Self::shape(ty));
        }

        rules
    }

    /// Type-specific shape, without the universal `type` rule
    fn shape(ty: AttributeType) -> Shape {
        match ty {
            AttributeType::Media => MEDIA_SHAPE,
            AttributeType::String | AttributeType::Text | AttributeType::RichText => TEXT_SHAPE,
            AttributeType::Json => JSON_SHAPE,
            AttributeType::Enumeration => ENUMERATION_SHAPE,
            AttributeType::Password => PASSWORD_SHAPE,
            AttributeType::Email => EMAIL_SHAPE,
            AttributeType::Integer => INTEGER_SHAPE,
            AttributeType::Float | AttributeType::Decimal => NUMBER_SHAPE,
            AttributeType::Date => DATE_SHAPE,
            AttributeType::Boolean => BOOLEAN_SHAPE,
            AttributeType::BigInteger
            | AttributeType::Time
            | AttributeType::DateTime
            | AttributeType::Timestamp => NO_SHAPE,
        }
    }
}
