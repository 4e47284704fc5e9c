//! Field descriptor rules for the content-type builder
//!
//! Given a field descriptor, `TypeRuleResolver` produces the closed set of
//! rules governing how that field's configuration may be authored. The rule
//! set is then applied to the descriptor with `RuleSet::validate`.
//!
//! # Design Principles
//!
//! - Closed dispatch over `AttributeType`, checked exhaustively
//! - Resolution is pure and total; unknown tags get the universal `type` rule only
//! - Shared validator primitives are immutable statics, referenced not copied
//! - Cross-field rules read sibling attributes at validation time
//! - One identifier grammar (`is_valid_name`) for every call site

mod errors;
mod names;
mod resolver;
mod rules;
mod types;
mod validator;

pub use errors::{SchemaError, SchemaErrorCode, SchemaResult, ValidationDetails};
pub use names::{is_valid_email, is_valid_name};
pub use resolver::TypeRuleResolver;
pub use rules::{validators, Presence, Rule, RuleKind, RuleSet};
pub use types::AttributeType;
pub use validator::validate_attributes;
