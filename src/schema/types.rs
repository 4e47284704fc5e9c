//! Attribute type tags accepted by the content-type builder
//!
//! Tags with a type-specific rule shape:
//! - media, string, text, richtext, json, enumeration, password, email
//! - integer, float, decimal, date, boolean
//!
//! Tags accepted without extra shape:
//! - biginteger, time, datetime, timestamp

use serde::{Deserialize, Serialize};
use std::fmt;

/// Primitive kind declared by a field descriptor's `type` attribute
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttributeType {
    /// Uploaded asset reference
    Media,
    /// Short string
    String,
    /// Long plain text
    Text,
    /// Long formatted text
    RichText,
    /// Arbitrary JSON
    Json,
    /// One of a declared list of identifiers
    Enumeration,
    /// Hashed secret
    Password,
    /// Email address
    Email,
    /// Whole number
    Integer,
    /// Whole number stored as 64-bit
    BigInteger,
    /// Floating point number
    Float,
    /// Fixed precision number
    Decimal,
    /// Calendar date
    Date,
    /// Time of day
    Time,
    /// Date and time
    DateTime,
    /// Epoch timestamp
    Timestamp,
    /// True or false
    Boolean,
}

impl AttributeType {
    /// Every registered type tag, in declaration order
    pub const ALL: [AttributeType; 17] = [
        AttributeType::Media,
        AttributeType::String,
        AttributeType::Text,
        AttributeType::RichText,
        AttributeType::Json,
        AttributeType::Enumeration,
        AttributeType::Password,
        AttributeType::Email,
        AttributeType::Integer,
        AttributeType::BigInteger,
        AttributeType::Float,
        AttributeType::Decimal,
        AttributeType::Date,
        AttributeType::Time,
        AttributeType::DateTime,
        AttributeType::Timestamp,
        AttributeType::Boolean,
    ];

    /// Returns the wire tag
    pub fn as_str(&self) -> &'static str {
        match self {
            AttributeType::Media => "media",
            AttributeType::String => "string",
            AttributeType::Text => "text",
            AttributeType::RichText => "richtext",
            AttributeType::Json => "json",
            AttributeType::Enumeration => "enumeration",
            AttributeType::Password => "password",
            AttributeType::Email => "email",
            AttributeType::Integer => "integer",
            AttributeType::BigInteger => "biginteger",
            AttributeType::Float => "float",
            AttributeType::Decimal => "decimal",
            AttributeType::Date => "date",
            AttributeType::Time => "time",
            AttributeType::DateTime => "datetime",
            AttributeType::Timestamp => "timestamp",
            AttributeType::Boolean => "boolean",
        }
    }

    /// Parses a wire tag. Matching is exact; unknown tags yield `None`.
    pub fn parse(tag: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|t| t.as_str() == tag)
    }

    /// Comma separated list of registered tags, for error messages
    pub fn valid_tags() -> String {
        Self::ALL
            .iter()
            .map(|t| t.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl fmt::Display for AttributeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
