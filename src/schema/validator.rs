//! Rule-set application
//!
//! Validation semantics:
//! - Descriptor must be a JSON object
//! - No attribute outside the resolved rule set may be present
//! - Required rules must find their attribute
//! - Null values are rejected
//! - Every rule sees its own value and the full descriptor, so cross-field
//!   rules read their siblings at validation time
//!
//! Validation is deterministic and never mutates the descriptor.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde_json::{Map, Value};

use super::errors::{SchemaError, SchemaResult, ValidationDetails};
use super::names::{is_valid_email, is_valid_name};
use super::resolver::TypeRuleResolver;
use super::rules::{Rule, RuleKind, RuleSet};
use super::types::AttributeType;

impl RuleSet {
    /// Validates a descriptor, returning the first violation.
    ///
    /// # Errors
    ///
    /// - AERO_MALFORMED_DESCRIPTOR if the descriptor is not an object
    /// - AERO_SCHEMA_VALIDATION_FAILED if any rule is violated
    pub fn validate(&self, descriptor: &Value) -> SchemaResult<()> {
        let obj = descriptor
            .as_object()
            .ok_or_else(|| SchemaError::malformed_descriptor(json_type_name(descriptor)))?;

        match self.object_violations(obj).into_iter().next() {
            Some(details) => Err(SchemaError::validation_failed(details)),
            None => Ok(()),
        }
    }

    /// Collects every violation of this rule set by `descriptor`.
    ///
    /// Undeclared attributes are reported first, then rules in key order.
    pub fn violations(&self, descriptor: &Value) -> Vec<ValidationDetails> {
        match descriptor.as_object() {
            Some(obj) => self.object_violations(obj),
            None => vec![ValidationDetails::new(
                "$root",
                "object",
                json_type_name(descriptor),
            )],
        }
    }

    fn object_violations(&self, obj: &Map<String, Value>) -> Vec<ValidationDetails> {
        let mut violations: Vec<ValidationDetails> = obj
            .keys()
            .filter(|key| !self.contains(key))
            .map(|key| ValidationDetails::extra_field(key.as_str()))
            .collect();

        for (key, rule) in self.iter() {
            match obj.get(key) {
                None if rule.is_required() => {
                    violations.push(ValidationDetails::missing_field(key));
                }
                None => {}
                Some(Value::Null) => violations.push(ValidationDetails::null_value(key)),
                Some(value) => {
                    if let Err(details) = check_rule(key, rule, value, obj) {
                        violations.push(details);
                    }
                }
            }
        }

        violations
    }
}

/// Validates every attribute of a content type.
///
/// Attribute names must be valid identifiers and each descriptor must satisfy
/// the rule set resolved from its own `type`. Violation paths are prefixed
/// with `attributes.<name>`.
pub fn validate_attributes(attributes: &Map<String, Value>) -> SchemaResult<()> {
    for (name, descriptor) in attributes {
        let path = format!("attributes.{}", name);

        if !is_valid_name(name) {
            return Err(SchemaError::validation_failed(ValidationDetails::new(
                path,
                "a valid identifier name",
                format!("{:?}", name),
            )));
        }

        let rules = TypeRuleResolver::resolve(descriptor);
        if let Some(details) = rules.violations(descriptor).into_iter().next() {
            return Err(SchemaError::validation_failed(details.nested_under(&path)));
        }
    }

    Ok(())
}

/// Applies one rule to the value found under `key`.
fn check_rule(
    key: &str,
    rule: &Rule,
    value: &Value,
    descriptor: &Map<String, Value>,
) -> Result<(), ValidationDetails> {
    match rule.kind() {
        RuleKind::TypeTag => {
            let tag = expect_str(key, value)?;
            if AttributeType::parse(tag).is_none() {
                return Err(ValidationDetails::new(
                    key,
                    format!("one of [{}]", AttributeType::valid_tags()),
                    format!("{:?}", tag),
                ));
            }
        }
        RuleKind::Boolean => {
            if !value.is_boolean() {
                return Err(mismatch(key, "bool", value));
            }
        }
        RuleKind::LengthBound => {
            if value.as_u64().is_none() {
                return Err(mismatch(key, "non-negative integer", value));
            }
        }
        RuleKind::Text { bounded } => {
            let text = expect_str(key, value)?;
            if bounded {
                check_length(key, text, descriptor)?;
            }
        }
        RuleKind::Email { bounded } => {
            let text = expect_str(key, value)?;
            if !is_valid_email(text) {
                return Err(ValidationDetails::new(key, "a valid email", format!("{:?}", text)));
            }
            if bounded {
                check_length(key, text, descriptor)?;
            }
        }
        RuleKind::Integer => {
            if !is_whole_number(value) {
                return Err(mismatch(key, "integer", value));
            }
        }
        RuleKind::Number => {
            if !value.is_number() {
                return Err(mismatch(key, "number", value));
            }
        }
        RuleKind::Date => {
            if !is_date(value) {
                return Err(mismatch(key, "date", value));
            }
        }
        RuleKind::Identifier => {
            let text = expect_str(key, value)?;
            if !is_valid_name(text) {
                return Err(ValidationDetails::new(
                    key,
                    "a valid identifier name",
                    format!("{:?}", text),
                ));
            }
        }
        RuleKind::EnumValues => {
            let values = value.as_array().ok_or_else(|| mismatch(key, "array", value))?;
            if values.is_empty() {
                return Err(ValidationDetails::new(key, "at least 1 value", "empty array"));
            }
            for (i, entry) in values.iter().enumerate() {
                let entry_path = format!("{}[{}]", key, i);
                match entry.as_str() {
                    Some(name) if is_valid_name(name) => {}
                    Some(name) => {
                        return Err(ValidationDetails::new(
                            entry_path,
                            "a valid identifier name",
                            format!("{:?}", name),
                        ))
                    }
                    None => return Err(mismatch(&entry_path, "string", entry)),
                }
            }
        }
        RuleKind::EnumMember { sibling } => {
            let text = expect_str(key, value)?;
            let allowed: Vec<&str> = descriptor
                .get(sibling)
                .and_then(Value::as_array)
                .map(|values| values.iter().filter_map(Value::as_str).collect())
                .unwrap_or_default();

            if !allowed.contains(&text) {
                return Err(ValidationDetails::new(
                    key,
                    format!("one of [{}] from '{}'", allowed.join(", "), sibling),
                    format!("{:?}", text),
                ));
            }
        }
    }

    Ok(())
}

fn expect_str<'v>(key: &str, value: &'v Value) -> Result<&'v str, ValidationDetails> {
    value.as_str().ok_or_else(|| mismatch(key, "string", value))
}

/// Checks a string's length against sibling `min`/`max` bounds.
fn check_length(key: &str, text: &str, descriptor: &Map<String, Value>) -> Result<(), ValidationDetails> {
    let len = text.chars().count() as u64;

    if let Some(min) = descriptor.get("min").and_then(Value::as_u64) {
        if len < min {
            return Err(ValidationDetails::new(
                key,
                format!("at least {} characters", min),
                format!("{} characters", len),
            ));
        }
    }

    if let Some(max) = descriptor.get("max").and_then(Value::as_u64) {
        if len > max {
            return Err(ValidationDetails::new(
                key,
                format!("at most {} characters", max),
                format!("{} characters", len),
            ));
        }
    }

    Ok(())
}

fn is_whole_number(value: &Value) -> bool {
    if value.is_i64() || value.is_u64() {
        return true;
    }
    value
        .as_f64()
        .map(|f| f.is_finite() && f.fract() == 0.0)
        .unwrap_or(false)
}

/// Accepts RFC 3339 timestamps, calendar dates, naive date-times and epoch milliseconds.
fn is_date(value: &Value) -> bool {
    match value {
        Value::String(s) => {
            DateTime::parse_from_rfc3339(s).is_ok()
                || NaiveDate::parse_from_str(s, "%Y-%m-%d").is_ok()
                || NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f").is_ok()
        }
        Value::Number(n) => n.is_i64() || n.is_u64(),
        _ => false,
    }
}

fn mismatch(key: &str, expected: &str, actual: &Value) -> ValidationDetails {
    ValidationDetails::new(key, expected, json_type_name(actual))
}

/// Returns the JSON type name for error messages.
fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(n) => {
            if n.is_i64() || n.is_u64() {
                "int"
            } else {
                "float"
            }
        }
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
