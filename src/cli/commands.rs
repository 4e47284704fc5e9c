//! CLI command implementations
//!
//! Every command loads the configuration file, performs one operation and
//! produces one JSON value. `run` writes that value (or the error) to stdout.

use std::fs;
use std::path::Path;
use std::sync::Arc;

use serde_json::{json, Map, Value};

use super::args::{Cli, Command, FilesAction, SettingsAction, UploadArgs};
use super::errors::{CliError, CliResult};
use super::io::{read_input, write_error, write_response};
use crate::config::AppConfig;
use crate::observability::{log_event_with_fields, Event};
use crate::schema::{validate_attributes, AttributeType, TypeRuleResolver};
use crate::upload::{
    ConfigStore, FileQuery, IncomingFile, JsonFileConfigStore, LocalProvider, MemoryBufferizer, StoreScope,
    UploadConfig, UploadError, UploadMeta, UploadResult, UploadService,
};
use crate::upload::service::PROVIDER_KEY;

/// Parse arguments, execute, and report the outcome on stdout
pub fn run() -> CliResult<()> {
    let cli = Cli::parse_args();
    match execute(&cli) {
        Ok(data) => write_response(data),
        Err(e) => {
            write_error(&e)?;
            Err(e)
        }
    }
}

/// Execute a parsed command and return its response payload
pub fn execute(cli: &Cli) -> CliResult<Value> {
    let config = load_config(&cli.config)?;
    run_command(&cli.command, &config)
}

/// Dispatch a command against a loaded configuration
pub fn run_command(command: &Command, config: &AppConfig) -> CliResult<Value> {
    match command {
        Command::Init => init(config),
        Command::Resolve { type_tag } => Ok(resolve(type_tag)),
        Command::ValidateField { file } => validate_field(&read_input(file.as_deref())?),
        Command::ValidateAttributes { file } => validate_content_type(&read_input(file.as_deref())?),
        Command::Upload(args) => upload(config, args),
        Command::Files { action } => files(config, action),
        Command::Environments => {
            let service = open_service(config)?;
            Ok(serde_json::to_value(service.environments())?)
        }
        Command::Settings { action } => settings(config, action),
    }
}

fn load_config(path: &Path) -> CliResult<AppConfig> {
    let config = AppConfig::load(path).map_err(CliError::config_error)?;
    let path = path.display().to_string();
    log_event_with_fields(Event::ConfigLoaded, &[("path", path.as_str())]);
    Ok(config)
}

/// Create the data directory and seed default upload settings for every
/// environment that has none yet
pub fn init(config: &AppConfig) -> CliResult<Value> {
    let data_path = config.data_path();
    fs::create_dir_all(&data_path)?;

    let store = JsonFileConfigStore::open(&config.store_path())?;
    let defaults = UploadConfig::default().to_value()?;
    let mut seeded = Vec::new();

    for environment in &config.environments {
        let scope = StoreScope::upload_plugin(environment.as_str());
        if store.get(&scope, PROVIDER_KEY)?.is_none() {
            store.set(&scope, PROVIDER_KEY, defaults.clone())?;
            seeded.push(environment.clone());
        }
    }

    let dir = data_path.display().to_string();
    log_event_with_fields(Event::DataDirInitialized, &[("data_dir", dir.as_str())]);

    Ok(json!({
        "dataDir": dir,
        "seeded": seeded,
    }))
}

/// Rule set of a type tag, keyed by descriptor key
pub fn resolve(type_tag: &str) -> Value {
    let rules = TypeRuleResolver::resolve_tag(Some(type_tag));

    let mut entries = Map::new();
    for (key, rule) in rules.iter() {
        entries.insert(
            key.to_string(),
            json!({ "rule": rule.name(), "required": rule.is_required() }),
        );
    }

    json!({
        "type": type_tag,
        "known": AttributeType::parse(type_tag).is_some(),
        "rules": entries,
    })
}

/// Validate one field descriptor against the rules of its type
pub fn validate_field(descriptor: &Value) -> CliResult<Value> {
    let tag = descriptor.get("type").and_then(Value::as_str).unwrap_or_default();
    let rules = TypeRuleResolver::resolve(descriptor);

    if let Err(e) = rules.validate(descriptor) {
        let reason = e.to_string();
        log_event_with_fields(Event::FieldRejected, &[("type", tag), ("reason", reason.as_str())]);
        return Err(e.into());
    }

    log_event_with_fields(Event::FieldAccepted, &[("type", tag)]);
    Ok(json!({ "type": tag, "valid": true }))
}

/// Validate a content type's `attributes` map
pub fn validate_content_type(input: &Value) -> CliResult<Value> {
    let attributes = input
        .as_object()
        .ok_or_else(|| CliError::invalid_input("Attributes must be a JSON object"))?;

    let count = attributes.len().to_string();
    if let Err(e) = validate_attributes(attributes) {
        let reason = e.to_string();
        log_event_with_fields(Event::FieldRejected, &[("reason", reason.as_str())]);
        return Err(e.into());
    }

    log_event_with_fields(Event::FieldAccepted, &[("attributes", count.as_str())]);
    Ok(json!({ "attributes": attributes.len(), "valid": true }))
}

fn upload(config: &AppConfig, args: &UploadArgs) -> CliResult<Value> {
    let service = open_service(config)?;

    // Disabled uploads are rejected before any path is opened
    if !service.upload_config(&config.environment)?.enabled {
        let err = UploadError::UploadDisabled;
        let reason = err.to_string();
        log_event_with_fields(Event::UploadRejected, &[("reason", reason.as_str())]);
        return Err(err.into());
    }

    let files = args
        .files
        .iter()
        .map(|path| IncomingFile::open(path, args.mime.clone()))
        .collect::<UploadResult<Vec<_>>>()?;

    let meta = UploadMeta {
        ref_id: args.ref_id.clone(),
        reference: args.reference.clone(),
        source: args.source.clone(),
        field: args.field.clone(),
        path: args.path.clone(),
    };

    let uploaded = service.upload(files, &meta)?;
    Ok(serde_json::to_value(uploaded)?)
}

fn files(config: &AppConfig, action: &FilesAction) -> CliResult<Value> {
    let service = open_service(config)?;

    let value = match action {
        FilesAction::List {
            name,
            mime,
            ref_id,
            reference,
            start,
            limit,
        } => {
            let query = FileQuery {
                id: None,
                name: name.clone(),
                mime: mime.clone(),
                ref_id: ref_id.clone(),
                reference: reference.clone(),
                start: *start,
                limit: *limit,
            };
            serde_json::to_value(service.find(&query)?)?
        }
        FilesAction::Get { id } => serde_json::to_value(service.find_one(*id)?)?,
        FilesAction::Count => json!({ "count": service.count(&FileQuery::default())? }),
        FilesAction::Delete { id } => serde_json::to_value(service.destroy(*id)?)?,
        FilesAction::Search { term } => serde_json::to_value(service.search(term)?)?,
    };

    Ok(value)
}

fn settings(config: &AppConfig, action: &SettingsAction) -> CliResult<Value> {
    let service = open_service(config)?;

    match action {
        SettingsAction::Get { env } => {
            let environment = env.as_deref().unwrap_or(&config.environment);
            Ok(serde_json::to_value(service.get_settings(environment)?)?)
        }
        SettingsAction::Set { env, value } => {
            let environment = env.as_deref().unwrap_or(&config.environment);
            let value: Value = serde_json::from_str(value)?;
            service.update_settings(environment, value)?;
            Ok(serde_json::to_value(service.get_settings(environment)?)?)
        }
    }
}

/// Build the upload service over the data directory
fn open_service(config: &AppConfig) -> CliResult<UploadService> {
    let data_path = config.data_path();
    fs::create_dir_all(&data_path)?;

    let store = JsonFileConfigStore::open(&config.store_path())?;
    let provider = LocalProvider::open(&data_path)?;

    Ok(UploadService::new(
        Arc::new(store),
        Arc::new(MemoryBufferizer::new()),
        Arc::new(provider),
        config.service_settings(),
    ))
}
