//! CLI module for aerocms
//!
//! Provides command-line access to:
//! - init: Create the data directory and default settings
//! - resolve / validate-field / validate-attributes: Field rules
//! - upload / files: Upload ingestion and file queries
//! - environments / settings: Provider settings per environment

mod args;
mod commands;
mod errors;
mod io;

pub use args::{Cli, Command, FilesAction, SettingsAction, UploadArgs};
pub use commands::{execute, init, resolve, run, run_command, validate_content_type, validate_field};
pub use errors::{CliError, CliErrorCode, CliResult};
pub use io::{error_envelope, read_input, write_error, write_response};
