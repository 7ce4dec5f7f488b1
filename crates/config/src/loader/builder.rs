//! Configuration snapshot builder.
//!
//! Responsibilities:
//! - Resolve caller options against defaults, the working directory, and `APP_ENV`.
//! - Plan, read, and parse the production, environment, and local config files.
//! - Merge the parsed files in plan order and apply the environment-variable overlay.
//! - Stamp `env = {id, level}` when nothing else claimed the `env` key.
//!
//! Does NOT handle:
//! - Caching or sharing the result (see `registry`).
//! - Coercing environment-variable strings (delegated to env.rs).
//!
//! Invariants / Assumptions:
//! - Construction is all-or-nothing: any read or parse failure returns an error
//!   and no partially merged snapshot is observable.
//! - Later files win over earlier ones; the overlay wins over every file.
//! - Only local files (unless `require_local_config`) and, under
//!   `MissingFilePolicy::Skip`, a missing environment file may be absent.
//! - Accessors hand out copies; builder state cannot be mutated through them.

use std::path::{Path, PathBuf};

use chrono::Utc;
use serde_json::{Value, json};

use super::env::{apply_env_mapping, env_var_or_none};
use super::error::ConfigError;
use super::merge::merge_layers;
use crate::constants::{
    CONFIG_FILE_EXTENSION, CONFIG_FILENAME_INFIX, DEFAULT_CONFIG_DIR, DEFAULT_ENVIRONMENT,
    ENV_STAMP_KEY, ENVIRONMENT_VAR, LEVEL_NOT_SET, PRODUCTION_ENVIRONMENT,
};
use crate::types::{
    ConfigOptions, FileKind, Meta, MissingFilePolicy, PlannedFile, RawFiles, ResolvedOptions,
};

/// One immutable, fully merged configuration snapshot.
#[derive(Debug, Clone)]
pub struct ConfigBuilder {
    config_id: String,
    options: ResolvedOptions,
    meta: Meta,
    raw_files: RawFiles,
    values: Value,
}

/// The owned parts of a finished build.
#[derive(Debug)]
pub(crate) struct Snapshot {
    pub(crate) values: Value,
    pub(crate) options: ResolvedOptions,
    pub(crate) meta: Meta,
    pub(crate) raw_files: RawFiles,
}

impl ConfigBuilder {
    /// Load, merge, and overlay the configuration for `config_id`.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - `config_id` is empty (`ConfigError::MissingConfigId`)
    /// - a required file cannot be read (`ConfigError::FileRead`)
    /// - any file that was read is not valid JSON (`ConfigError::FileParse`)
    /// - a requested dotenv preload fails (`ConfigError::Dotenv*`)
    pub fn new(config_id: &str, options: ConfigOptions) -> Result<Self, ConfigError> {
        if config_id.is_empty() {
            return Err(ConfigError::MissingConfigId);
        }

        let options = resolve_options(options)?;
        let plan = file_plan(&options);

        let mut raw_files = RawFiles::default();
        let mut layers = Vec::with_capacity(plan.len());
        for file in &plan {
            let Some(json) = read_config_file(&options, file)? else {
                continue;
            };
            let value = parse_config_json(file, &json)?;
            raw_files.insert(file.filename.clone(), value.clone());
            layers.push(value);
        }

        let mut values = merge_layers(&layers);
        apply_env_mapping(&mut values, &options.environment_variables)?;
        stamp_environment(&mut values, &options);

        tracing::debug!(
            config_id = %config_id,
            environment = %options.environment,
            directory = %options.directory.display(),
            files = raw_files.len(),
            "config built"
        );

        Ok(Self {
            config_id: config_id.to_string(),
            options,
            meta: Meta {
                loaded_at: Utc::now(),
                loaded_files: plan,
            },
            raw_files,
            values,
        })
    }

    pub fn config_id(&self) -> &str {
        &self.config_id
    }

    /// Returns a copy of the merged config.
    pub fn values(&self) -> Value {
        self.values.clone()
    }

    /// Returns a copy of the options this snapshot was built from.
    pub fn options(&self) -> ResolvedOptions {
        self.options.clone()
    }

    /// Returns a copy of the build metadata.
    pub fn meta(&self) -> Meta {
        self.meta.clone()
    }

    /// Returns a copy of every raw file as it was parsed.
    pub fn raw_files(&self) -> RawFiles {
        self.raw_files.clone()
    }

    pub(crate) fn into_snapshot(self) -> Snapshot {
        Snapshot {
            values: self.values,
            options: self.options,
            meta: self.meta,
            raw_files: self.raw_files,
        }
    }
}

/// Fill in defaults and make every option concrete.
fn resolve_options(options: ConfigOptions) -> Result<ResolvedOptions, ConfigError> {
    let directory = options
        .directory
        .filter(|dir| !dir.as_os_str().is_empty())
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_DIR));
    let directory = std::path::absolute(&directory)?;

    let environment = options
        .environment
        .filter(|env| !env.is_empty())
        .or_else(|| env_var_or_none(ENVIRONMENT_VAR))
        .unwrap_or_else(|| DEFAULT_ENVIRONMENT.to_string());

    let mut local_config_files: Vec<String> = Vec::with_capacity(options.local_config_files.len());
    for file in options.local_config_files {
        if !local_config_files.contains(&file) {
            local_config_files.push(file);
        }
    }

    Ok(ResolvedOptions {
        directory,
        environment,
        short_filenames: options.short_filenames,
        environment_levels: options.environment_levels,
        local_config_files,
        require_local_config: options.require_local_config,
        environment_variables: options.environment_variables,
        immutable: options.immutable,
        plain: options.plain,
        single_file: options.single_file,
        missing_environment_file: options.missing_environment_file,
    })
}

/// The ordered list of files to load.
fn file_plan(options: &ResolvedOptions) -> Vec<PlannedFile> {
    if let Some(single) = &options.single_file {
        return vec![PlannedFile::new(FileKind::Single, single.clone())];
    }

    let mut files = vec![PlannedFile::new(
        FileKind::Production,
        PRODUCTION_ENVIRONMENT,
    )];

    if options.environment != PRODUCTION_ENVIRONMENT {
        files.push(PlannedFile::new(
            FileKind::Environment(options.environment.clone()),
            options.environment.clone(),
        ));
    }

    files.extend(
        options
            .local_config_files
            .iter()
            .map(|filename| PlannedFile::new(FileKind::Local, filename.clone())),
    );

    files
}

/// `{directory}/{filename}[.config].json`
pub(crate) fn config_file_path(directory: &Path, filename: &str, short_filenames: bool) -> PathBuf {
    let infix = if short_filenames {
        ""
    } else {
        CONFIG_FILENAME_INFIX
    };
    directory.join(format!("{filename}{infix}.{CONFIG_FILE_EXTENSION}"))
}

/// Read one planned file, returning `None` when its absence is tolerated.
fn read_config_file(
    options: &ResolvedOptions,
    file: &PlannedFile,
) -> Result<Option<String>, ConfigError> {
    let path = config_file_path(&options.directory, &file.filename, options.short_filenames);

    match std::fs::read_to_string(&path) {
        Ok(json) => {
            tracing::debug!(kind = %file.kind, path = %path.display(), "read config file");
            Ok(Some(json))
        }
        Err(source) if may_skip(options, file, &source) => {
            if source.kind() == std::io::ErrorKind::NotFound {
                tracing::debug!(kind = %file.kind, path = %path.display(), "optional config file absent");
            } else {
                tracing::warn!(
                    kind = %file.kind,
                    path = %path.display(),
                    error = %source,
                    "skipping unreadable optional config file"
                );
            }
            Ok(None)
        }
        Err(source) => Err(ConfigError::FileRead {
            kind: file.kind.label().to_string(),
            name: file.filename.clone(),
            path,
            source,
        }),
    }
}

fn may_skip(options: &ResolvedOptions, file: &PlannedFile, err: &std::io::Error) -> bool {
    match file.kind {
        FileKind::Local => !options.require_local_config,
        FileKind::Environment(_) => {
            options.missing_environment_file == MissingFilePolicy::Skip
                && err.kind() == std::io::ErrorKind::NotFound
        }
        FileKind::Production | FileKind::Single => false,
    }
}

fn parse_config_json(file: &PlannedFile, json: &str) -> Result<Value, ConfigError> {
    serde_json::from_str(json).map_err(|source| ConfigError::FileParse {
        kind: file.kind.label().to_string(),
        name: file.filename.clone(),
        source,
    })
}

/// Add `env = {id, level}` unless the merged config already has an `env` key.
fn stamp_environment(values: &mut Value, options: &ResolvedOptions) {
    let Some(levels) = &options.environment_levels else {
        return;
    };
    let Value::Object(map) = values else {
        return;
    };
    if map.contains_key(ENV_STAMP_KEY) {
        return;
    }

    let level = levels
        .get(&options.environment)
        .map(|level| json!(level))
        .unwrap_or_else(|| json!(LEVEL_NOT_SET));

    map.insert(
        ENV_STAMP_KEY.to_string(),
        json!({ "id": options.environment, "level": level }),
    );
}
