//! Schema error types
//!
//! Error codes:
//! - AERO_SCHEMA_VALIDATION_FAILED (REJECT)
//! - AERO_MALFORMED_DESCRIPTOR (REJECT)
//!
//! Both are raised while applying a resolved rule set to descriptor data.
//! Rule resolution itself never fails.

use std::fmt;

/// Schema-specific error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaErrorCode {
    /// Descriptor violates a resolved rule
    AeroSchemaValidationFailed,
    /// Descriptor is not a JSON object
    AeroMalformedDescriptor,
}

impl SchemaErrorCode {
    /// Returns the string code
    pub fn code(&self) -> &'static str {
        match self {
            SchemaErrorCode::AeroSchemaValidationFailed => "AERO_SCHEMA_VALIDATION_FAILED",
            SchemaErrorCode::AeroMalformedDescriptor => "AERO_MALFORMED_DESCRIPTOR",
        }
    }
}

impl fmt::Display for SchemaErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Validation failure details
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationDetails {
    /// Attribute path (e.g., "default" or "attributes.title.max")
    pub field: String,
    /// Expected type or condition
    pub expected: String,
    /// Actual value or type found
    pub actual: String,
}

impl ValidationDetails {
    pub fn new(field: impl Into<String>, expected: impl Into<String>, actual: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            expected: expected.into(),
            actual: actual.into(),
        }
    }

    pub fn missing_field(field: impl Into<String>) -> Self {
        Self::new(field, "field to be present", "missing")
    }

    pub fn extra_field(field: impl Into<String>) -> Self {
        Self::new(field, "no attribute outside the type's rule set", "extra field present")
    }

    pub fn null_value(field: impl Into<String>) -> Self {
        Self::new(field, "non-null value", "null")
    }

    /// Prefixes the field path, used when a descriptor is nested in a content type
    pub fn nested_under(mut self, prefix: &str) -> Self {
        self.field = format!("{}.{}", prefix, self.field);
        self
    }
}

impl fmt::Display for ValidationDetails {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "field '{}': expected {}, got {}", self.field, self.expected, self.actual)
    }
}

/// Schema error type with full context
#[derive(Debug, Clone)]
pub struct SchemaError {
    code: SchemaErrorCode,
    message: String,
    details: Option<ValidationDetails>,
}

impl SchemaError {
    /// Create a validation failed error
    pub fn validation_failed(details: ValidationDetails) -> Self {
        Self {
            code: SchemaErrorCode::AeroSchemaValidationFailed,
            message: format!("Field descriptor validation failed: {}", details),
            details: Some(details),
        }
    }

    /// Create an error for a descriptor that is not an object
    pub fn malformed_descriptor(actual: impl Into<String>) -> Self {
        Self {
            code: SchemaErrorCode::AeroMalformedDescriptor,
            message: format!("Field descriptor must be an object, got {}", actual.into()),
            details: None,
        }
    }

    /// Returns the error code
    pub fn code(&self) -> SchemaErrorCode {
        self.code
    }

    /// Returns the error message
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns validation details if applicable
    pub fn details(&self) -> Option<&ValidationDetails> {
        self.details.as_ref()
    }

    /// Schema errors are user-correctable
    pub fn status_code(&self) -> u16 {
        400
    }
}

impl fmt::Display for SchemaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[REJECT] {}: {}", self.code.code(), self.message)
    }
}

impl std::error::Error for SchemaError {}

/// Result type for schema operations
pub type SchemaResult<T> = Result<T, SchemaError>;
