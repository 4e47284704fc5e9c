//! aerocms - content-type field rules and upload ingestion
//!
//! Two independent subsystems:
//! - `schema`: resolves the rule set governing a field descriptor from its type tag
//! - `upload`: admits, annotates and persists uploaded files through injected collaborators

pub mod cli;
pub mod config;
pub mod observability;
pub mod schema;
pub mod upload;
