//! Consumer views over cached configuration.
//!
//! A view carries the merged values plus, unless it is plain, a handle back to
//! its registry. Utility operations look the entry up by id on every call, so
//! they act on whatever the registry holds now rather than on a snapshot taken
//! when the view was created.

use std::fmt;
use std::sync::Arc;

use serde::{Serialize, Serializer};
use serde_json::Value;

use super::{Inspection, Registry, SharedValues, SharingMode};
use crate::loader::ConfigError;
use crate::loader::merge::{get_path, set_path, split_path};

/// A merged configuration handed to a consumer.
#[derive(Clone)]
pub struct ConfigView {
    config_id: String,
    values: SharedValues,
    sharing: SharingMode,
    registry: Option<Registry>,
}

impl ConfigView {
    pub(crate) fn new(
        config_id: String,
        values: SharedValues,
        sharing: SharingMode,
        registry: Option<Registry>,
    ) -> Self {
        Self {
            config_id,
            values,
            sharing,
            registry,
        }
    }

    pub fn config_id(&self) -> &str {
        &self.config_id
    }

    /// Whether this view aliases the cache or owns a copy.
    pub fn sharing(&self) -> SharingMode {
        self.sharing
    }

    /// Plain views expose values only; every utility operation fails.
    pub fn is_plain(&self) -> bool {
        self.registry.is_none()
    }

    /// The current merged values.
    ///
    /// The returned handle is a snapshot: it never blocks a reload, and it
    /// keeps showing the values it was taken from after the entry is rebuilt.
    pub fn read(&self) -> Arc<Value> {
        Arc::clone(&*self.values.read())
    }

    /// Deep copy of the current values.
    pub fn snapshot(&self) -> Value {
        Value::clone(&self.read())
    }

    /// Value at a dotted path such as `server.port`.
    pub fn get(&self, path: &str) -> Option<Value> {
        let segments = split_path(path)?;
        get_path(&self.read(), &segments).cloned()
    }

    /// Write a value at a dotted path, creating intermediate objects.
    ///
    /// Shared views write into the cache. Handles returned by [`read`](Self::read)
    /// earlier keep their old contents.
    pub fn set(&self, path: &str, value: Value) -> Result<(), ConfigError> {
        let segments = split_path(path).ok_or_else(|| ConfigError::InvalidPath(path.to_string()))?;
        let mut values = self.values.write();
        set_path(Arc::make_mut(&mut *values), &segments, value);
        Ok(())
    }

    /// True when both views are backed by the same object.
    pub fn shares_values_with(&self, other: &ConfigView) -> bool {
        Arc::ptr_eq(&self.values, &other.values)
    }

    fn registry(&self) -> Result<&Registry, ConfigError> {
        self.registry
            .as_ref()
            .ok_or_else(|| ConfigError::PlainView(self.config_id.clone()))
    }

    /// Options and build metadata of the live entry.
    pub fn inspect(&self) -> Result<Inspection, ConfigError> {
        self.registry()?.inspect(&self.config_id)
    }

    /// Re-read every file with the entry's current options.
    #[track_caller]
    pub fn reload(&self) -> Result<ConfigView, ConfigError> {
        self.registry()?.rebuild(&self.config_id, |_| {})
    }

    /// Rebuild the entry for another environment.
    #[track_caller]
    pub fn switch_environment(&self, environment: &str) -> Result<ConfigView, ConfigError> {
        let registry = self.registry()?;
        if environment.is_empty() {
            return Err(ConfigError::MissingTargetEnvironment {
                operation: "switch_environment",
            });
        }
        registry.rebuild(&self.config_id, |options| {
            options.environment = Some(environment.to_string());
        })
    }

    /// Append one local file and rebuild.
    #[track_caller]
    pub fn add_local_file(&self, filename: &str) -> Result<ConfigView, ConfigError> {
        self.add_local_files([filename])
    }

    /// Append local files and rebuild.
    #[track_caller]
    pub fn add_local_files<I, S>(&self, filenames: I) -> Result<ConfigView, ConfigError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let registry = self.registry()?;
        let filenames: Vec<String> = filenames.into_iter().map(Into::into).collect();
        if let Some(invalid) = filenames.iter().find(|name| name.trim().is_empty()) {
            return Err(ConfigError::InvalidLocalFile(invalid.clone()));
        }
        registry.rebuild(&self.config_id, |options| {
            options.local_config_files.extend(filenames);
        })
    }

    /// Merged values for another environment. The cache is left untouched.
    pub fn get_for_environment(&self, environment: &str) -> Result<Value, ConfigError> {
        let registry = self.registry()?;
        if environment.is_empty() {
            return Err(ConfigError::MissingTargetEnvironment {
                operation: "get_for_environment",
            });
        }
        registry.peek(&self.config_id, |options| {
            options.environment = Some(environment.to_string());
        })
    }

    /// Raw parsed files: all of them keyed by filename, or just `filename`.
    pub fn raw_files(&self, filename: Option<&str>) -> Result<Value, ConfigError> {
        let raw_files = self.registry()?.raw_files(&self.config_id)?;
        match filename {
            None => Ok(raw_files.into_value()),
            Some(name) => raw_files
                .get(name)
                .cloned()
                .ok_or_else(|| ConfigError::RawFileNotFound(name.to_string())),
        }
    }

    /// A fresh view of the same entry with utility operations stripped.
    pub fn plain_copy(&self) -> Result<ConfigView, ConfigError> {
        self.registry()?
            .use_config(&self.config_id, None, Some(true))
    }

    /// The call stack recorded when the live entry was installed.
    ///
    /// The first element is the location that called `init` or the utility
    /// operation. The frames after it come from the backtrace and render as
    /// `<unknown>` in builds without debug symbols (the release profile strips them).
    pub fn construction_trace(&self) -> Result<Vec<String>, ConfigError> {
        self.registry()?.construction_trace(&self.config_id)
    }
}

impl fmt::Debug for ConfigView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConfigView")
            .field("config_id", &self.config_id)
            .field("sharing", &self.sharing)
            .field("plain", &self.is_plain())
            .field("values", &*self.read())
            .finish()
    }
}

impl Serialize for ConfigView {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.read().serialize(serializer)
    }
}
