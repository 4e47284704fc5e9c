//! CLI argument definitions using clap
//!
//! Commands:
//! - aerocms init
//! - aerocms resolve --type <tag>
//! - aerocms validate-field [--file <path>]
//! - aerocms validate-attributes [--file <path>]
//! - aerocms upload <files..> [--ref-id --ref --source --field --path]
//! - aerocms files list|get|count|delete|search
//! - aerocms environments
//! - aerocms settings get|set

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use uuid::Uuid;

/// aerocms - field rules and upload ingestion
#[derive(Parser, Debug)]
#[command(name = "aerocms")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(long, global = true, default_value = "./aerocms.json")]
    pub config: PathBuf,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create the data directory and seed default upload settings
    Init,

    /// Print the rule set resolved for a type tag
    Resolve {
        /// Attribute type tag, e.g. "enumeration"
        #[arg(long = "type")]
        type_tag: String,
    },

    /// Validate one field descriptor (JSON object) from a file or stdin
    ValidateField {
        /// Descriptor file; reads one line of stdin when omitted
        #[arg(long)]
        file: Option<PathBuf>,
    },

    /// Validate a content type's attributes map from a file or stdin
    ValidateAttributes {
        /// Attributes file; reads one line of stdin when omitted
        #[arg(long)]
        file: Option<PathBuf>,
    },

    /// Upload files from disk
    Upload(UploadArgs),

    /// Query and manage uploaded files
    Files {
        #[command(subcommand)]
        action: FilesAction,
    },

    /// List environments
    Environments,

    /// Read or replace upload provider settings
    Settings {
        #[command(subcommand)]
        action: SettingsAction,
    },
}

#[derive(Args, Debug)]
pub struct UploadArgs {
    /// Files to upload
    #[arg(required = true)]
    pub files: Vec<PathBuf>,

    /// MIME type applied to every file
    #[arg(long)]
    pub mime: Option<String>,

    /// Owning record id
    #[arg(long)]
    pub ref_id: Option<String>,

    /// Owning model name
    #[arg(long = "ref")]
    pub reference: Option<String>,

    /// Plugin owning the model
    #[arg(long)]
    pub source: Option<String>,

    /// Attribute on the owning model
    #[arg(long)]
    pub field: Option<String>,

    /// Destination folder
    #[arg(long)]
    pub path: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum FilesAction {
    /// List files
    List {
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        mime: Option<String>,
        #[arg(long)]
        ref_id: Option<String>,
        #[arg(long = "ref")]
        reference: Option<String>,
        #[arg(long, default_value_t = 0)]
        start: usize,
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Show one file
    Get { id: Uuid },
    /// Count files
    Count,
    /// Delete a file and its content
    Delete { id: Uuid },
    /// Case-insensitive search over names and hashes
    Search { term: String },
}

#[derive(Subcommand, Debug)]
pub enum SettingsAction {
    /// Show settings of an environment (default: active)
    Get {
        #[arg(long)]
        env: Option<String>,
    },
    /// Replace settings of an environment with a JSON object
    Set {
        #[arg(long)]
        env: Option<String>,
        /// JSON object, e.g. '{"enabled":true,"sizeLimit":5000000}'
        value: String,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
