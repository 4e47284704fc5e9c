//! Field Rule Tests
//!
//! Resolution and application of field-type rule sets:
//! - Every descriptor carries the universal `type` rule
//! - Unknown or missing tags resolve to `type` alone
//! - Aliased tags resolve to identical shapes
//! - Shared primitives are the same rule, not copies
//! - Cross-field rules read siblings at validation time
//! - Resolution and validation are deterministic

use aerocms::schema::{
    validate_attributes, validators, AttributeType, SchemaErrorCode, TypeRuleResolver,
};
use serde_json::{json, Value};
use std::ptr;

fn rejected_field(descriptor: &Value) -> String {
    let rules = TypeRuleResolver::resolve(descriptor);
    let err = rules.validate(descriptor).unwrap_err();
    assert_eq!(err.code(), SchemaErrorCode::AeroSchemaValidationFailed);
    err.details().unwrap().field.clone()
}

// =============================================================================
// Resolution
// =============================================================================

/// Every known tag includes `type`.
#[test]
fn test_every_tag_has_type_rule() {
    for ty in AttributeType::ALL {
        let rules = TypeRuleResolver::resolve_tag(Some(ty.as_str()));
        assert!(rules.contains("type"), "{} lacks type", ty.as_str());
        assert!(rules.get("type").unwrap().is_required());
    }
}

/// Unknown, missing and non-string tags resolve to `type` alone.
#[test]
fn test_unknown_tags_resolve_to_type_only() {
    for descriptor in [
        json!({ "type": "geo" }),
        json!({}),
        json!({ "type": 5 }),
        json!({ "type": "String" }),
    ] {
        let rules = TypeRuleResolver::resolve(&descriptor);
        assert_eq!(rules.keys(), vec!["type"]);
    }
}

/// string, text and richtext share one shape; float and decimal share another.
#[test]
fn test_aliased_tags_share_shapes() {
    let string = TypeRuleResolver::resolve_tag(Some("string"));
    let text = TypeRuleResolver::resolve_tag(Some("text"));
    let richtext = TypeRuleResolver::resolve_tag(Some("richtext"));
    assert_eq!(string, text);
    assert_eq!(text, richtext);

    assert_eq!(
        TypeRuleResolver::resolve_tag(Some("float")),
        TypeRuleResolver::resolve_tag(Some("decimal"))
    );
}

/// Tags with no type-specific configuration resolve to `type` alone.
#[test]
fn test_shapeless_tags() {
    for tag in ["biginteger", "time", "datetime", "timestamp"] {
        assert_eq!(TypeRuleResolver::resolve_tag(Some(tag)).keys(), vec!["type"]);
    }
}

/// `required` and `unique` are the shared primitives in every shape using them.
#[test]
fn test_shared_primitives_are_referenced() {
    for tag in ["media", "string", "json", "enumeration", "email", "integer", "float", "date", "boolean"] {
        let rules = TypeRuleResolver::resolve_tag(Some(tag));
        assert!(ptr::eq(rules.get("required").unwrap(), &validators::REQUIRED), "{}", tag);
        assert!(ptr::eq(rules.get("unique").unwrap(), &validators::UNIQUE), "{}", tag);
    }

    let password = TypeRuleResolver::resolve_tag(Some("password"));
    assert!(!password.contains("unique"));
    assert!(ptr::eq(password.get("min").unwrap(), &validators::MIN_LENGTH));
}

/// Resolution is a pure function of the tag.
#[test]
fn test_resolution_is_deterministic() {
    let descriptor = json!({ "type": "enumeration", "enum": ["a"] });
    let first = TypeRuleResolver::resolve(&descriptor);
    for _ in 0..100 {
        assert_eq!(TypeRuleResolver::resolve(&descriptor), first);
    }
}

// =============================================================================
// Application
// =============================================================================

/// Attributes outside the resolved shape are rejected.
#[test]
fn test_extraneous_keys_rejected() {
    assert_eq!(rejected_field(&json!({ "type": "boolean", "min": 1 })), "min");
    assert_eq!(rejected_field(&json!({ "type": "json", "default": {} })), "default");
}

/// The enumeration default must be one of the sibling `enum` values.
#[test]
fn test_enum_default_reads_sibling_values() {
    let ok = json!({ "type": "enumeration", "enum": ["draft", "published"], "default": "draft" });
    assert!(TypeRuleResolver::resolve(&ok).validate(&ok).is_ok());

    let bad = json!({ "type": "enumeration", "enum": ["draft"], "default": "archived" });
    assert_eq!(rejected_field(&bad), "default");
}

/// Enumeration values must be a non-empty list of identifiers.
#[test]
fn test_enum_values_must_be_identifiers() {
    assert_eq!(rejected_field(&json!({ "type": "enumeration" })), "enum");
    assert_eq!(rejected_field(&json!({ "type": "enumeration", "enum": [] })), "enum");
    assert_eq!(
        rejected_field(&json!({ "type": "enumeration", "enum": ["ok", "not ok"] })),
        "enum[1]"
    );
    assert_eq!(
        rejected_field(&json!({ "type": "enumeration", "enum": ["a"], "enumName": "1bad" })),
        "enumName"
    );
}

/// Integer defaults must be whole numbers.
#[test]
fn test_integer_default() {
    let ok = json!({ "type": "integer", "default": 3, "min": 0, "max": 10 });
    assert!(TypeRuleResolver::resolve(&ok).validate(&ok).is_ok());
    assert_eq!(rejected_field(&json!({ "type": "integer", "default": 1.5 })), "default");
}

/// Email defaults must be addresses and respect sibling length bounds.
#[test]
fn test_email_default() {
    let ok = json!({ "type": "email", "default": "a@b.co" });
    assert!(TypeRuleResolver::resolve(&ok).validate(&ok).is_ok());

    assert_eq!(rejected_field(&json!({ "type": "email", "default": "nope" })), "default");
    assert_eq!(
        rejected_field(&json!({ "type": "email", "default": "a@b.co", "max": 3 })),
        "default"
    );
}

/// String defaults respect sibling min/max.
#[test]
fn test_text_default_bounded_by_siblings() {
    let ok = json!({ "type": "string", "default": "abc", "min": 1, "max": 3 });
    assert!(TypeRuleResolver::resolve(&ok).validate(&ok).is_ok());

    let short = json!({ "type": "text", "default": "ab", "min": 3 });
    assert_eq!(rejected_field(&short), "default");
}

/// Null values are rejected even for optional rules.
#[test]
fn test_null_rejected() {
    assert_eq!(rejected_field(&json!({ "type": "media", "multiple": null })), "multiple");
}

/// Non-object descriptors are malformed.
#[test]
fn test_non_object_descriptor() {
    let err = TypeRuleResolver::resolve_tag(None).validate(&json!("string")).unwrap_err();
    assert_eq!(err.code(), SchemaErrorCode::AeroMalformedDescriptor);
}

// =============================================================================
// Content types
// =============================================================================

/// A full attributes map validates each field against its own type.
#[test]
fn test_validate_attributes() {
    let attributes = json!({
        "title": { "type": "string", "required": true, "max": 80 },
        "status": { "type": "enumeration", "enum": ["draft", "live"], "default": "draft" },
        "cover": { "type": "media", "multiple": false },
        "views": { "type": "integer", "default": 0 },
    });
    assert!(validate_attributes(attributes.as_object().unwrap()).is_ok());
}

/// Violation paths name the offending attribute.
#[test]
fn test_validate_attributes_reports_path() {
    let attributes = json!({
        "status": { "type": "enumeration", "enum": ["draft"], "default": "gone" },
    });
    let err = validate_attributes(attributes.as_object().unwrap()).unwrap_err();
    assert_eq!(err.details().unwrap().field, "attributes.status.default");

    let attributes = json!({ "bad name": { "type": "string" } });
    let err = validate_attributes(attributes.as_object().unwrap()).unwrap_err();
    assert_eq!(err.details().unwrap().field, "attributes.bad name");
}
