//! Build metadata and raw file records.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Serialize, Serializer};
use serde_json::{Map, Value};

/// The role a file plays in the merge order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileKind {
    /// The only file loaded in single-file mode.
    Single,
    /// The base production file.
    Production,
    /// The overlay for a non-production environment, carrying its name.
    Environment(String),
    /// A local/additional file merged after the environment file.
    Local,
}

impl FileKind {
    /// Label used in log fields and error messages.
    pub fn label(&self) -> &str {
        match self {
            FileKind::Single => "single",
            FileKind::Production => "production",
            FileKind::Environment(name) => name,
            FileKind::Local => "local",
        }
    }
}

impl fmt::Display for FileKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl Serialize for FileKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

/// One entry of the file plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlannedFile {
    #[serde(rename = "type")]
    pub kind: FileKind,
    pub filename: String,
}

impl PlannedFile {
    pub fn new(kind: FileKind, filename: impl Into<String>) -> Self {
        Self {
            kind,
            filename: filename.into(),
        }
    }
}

/// Diagnostic record of the last build.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Meta {
    pub loaded_at: DateTime<Utc>,
    /// The file plan in merge order, including files that were skipped.
    pub loaded_files: Vec<PlannedFile>,
}

/// Parsed content of every file that was found, keyed by logical filename in
/// processing order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct RawFiles(Map<String, Value>);

impl RawFiles {
    pub(crate) fn insert(&mut self, filename: String, value: Value) {
        self.0.insert(filename, value);
    }

    pub fn get(&self, filename: &str) -> Option<&Value> {
        self.0.get(filename)
    }

    pub fn contains(&self, filename: &str) -> bool {
        self.0.contains_key(filename)
    }

    /// Logical filenames in processing order.
    pub fn filenames(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Convert into a JSON object keyed by filename.
    pub fn into_value(self) -> Value {
        Value::Object(self.0)
    }
}
