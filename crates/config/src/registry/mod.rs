//! Process-wide registry of live configuration entries.
//!
//! Responsibilities:
//! - Map config ids to cache entries built by `ConfigBuilder`.
//! - Hand out consumer views that either alias the cached values or own a deep copy.
//! - Re-run builds for reload, environment switches, and added local files.
//!
//! Does NOT handle:
//! - Reading or merging files (see `loader`).
//!
//! Invariants:
//! - At most one entry exists per id; `init` on an existing id fails before any file is read.
//! - A failed build never touches the cache.
//! - Whether a rebuild updates in place or replaces the entry is decided by the
//!   *current* entry's sharing mode, not by the new options.
//! - In-place updates keep the `Arc` behind shared views, so holders observe new values.
//! - Builds run without holding the registry lock; the lock is taken only to
//!   check for the id and to install a finished snapshot.
//! - No lock is held across calls into consumer code, so reading a view and
//!   then calling a utility operation on it never blocks.

mod trace;
mod view;

use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::panic::Location;
use std::sync::Arc;

use parking_lot::RwLock;
use serde::Serialize;
use serde_json::Value;

use crate::loader::{ConfigBuilder, ConfigError, Snapshot};
use crate::types::{ConfigOptions, Meta, RawFiles, ResolvedOptions};

pub use view::ConfigView;

/// Backing storage for config values, shared by every non-immutable view.
///
/// The outer lock guards a pointer swap only. Readers take a clone of the
/// inner `Arc` and writers go through `Arc::make_mut`, so a rebuild never waits
/// on a consumer still holding values it read earlier.
pub(crate) type SharedValues = Arc<RwLock<Arc<Value>>>;

/// How consumer views relate to the cached values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SharingMode {
    /// Views alias the cached values; writes are visible to every holder.
    Shared,
    /// Views own an independent deep copy.
    Cloned,
}

impl SharingMode {
    pub(crate) fn from_immutable(immutable: bool) -> Self {
        if immutable {
            SharingMode::Cloned
        } else {
            SharingMode::Shared
        }
    }
}

/// Snapshot of an entry's options and build metadata.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Inspection {
    pub options: ResolvedOptions,
    pub meta: Meta,
}

/// Cached state for one config id.
#[derive(Debug)]
struct CacheEntry {
    id: String,
    values: SharedValues,
    options: ResolvedOptions,
    meta: Meta,
    raw_files: RawFiles,
    construction_trace: Vec<String>,
}

impl CacheEntry {
    fn new(id: &str, snapshot: Snapshot, construction_trace: Vec<String>) -> Self {
        Self {
            id: id.to_string(),
            values: Arc::new(RwLock::new(Arc::new(snapshot.values))),
            options: snapshot.options,
            meta: snapshot.meta,
            raw_files: snapshot.raw_files,
            construction_trace,
        }
    }

    fn sharing(&self) -> SharingMode {
        SharingMode::from_immutable(self.options.immutable)
    }

    /// Swap in a new snapshot while keeping the values handle stable.
    fn refresh(&mut self, snapshot: Snapshot) {
        *self.values.write() = Arc::new(snapshot.values);
        self.options = snapshot.options;
        self.meta = snapshot.meta;
        self.raw_files = snapshot.raw_files;
    }
}

/// Registry of live configuration entries keyed by config id.
///
/// Cloning a `Registry` yields another handle onto the same entries.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    entries: Arc<RwLock<HashMap<String, CacheEntry>>>,
}

impl Registry {
    /// Create an empty registry, independent of the process-wide default.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the config for `config_id` and cache it.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::AlreadyExists` if the id is cached already, or
    /// any error raised while building the config.
    #[track_caller]
    pub fn init(&self, config_id: &str, options: ConfigOptions) -> Result<ConfigView, ConfigError> {
        let caller = Location::caller();
        if self.contains(config_id) {
            return Err(ConfigError::AlreadyExists(config_id.to_string()));
        }
        let snapshot = ConfigBuilder::new(config_id, options)?.into_snapshot();

        let mut entries = self.entries.write();
        if entries.contains_key(config_id) {
            return Err(ConfigError::AlreadyExists(config_id.to_string()));
        }
        Ok(self.store(&mut entries, config_id, snapshot, caller))
    }

    /// Fetch a view of an existing entry without rebuilding it.
    ///
    /// `immutable` and `plain` override the entry's own options for this view only.
    pub fn use_config(
        &self,
        config_id: &str,
        immutable: Option<bool>,
        plain: Option<bool>,
    ) -> Result<ConfigView, ConfigError> {
        let entries = self.entries.read();
        let entry = lookup(&entries, config_id)?;
        Ok(self.view_of(entry, immutable, plain))
    }

    /// Remove an entry. Views already handed out stay readable.
    pub fn wipe(&self, config_id: &str) -> Result<(), ConfigError> {
        match self.entries.write().remove(config_id) {
            Some(_) => {
                tracing::info!(config_id = %config_id, "config wiped");
                Ok(())
            }
            None => Err(ConfigError::NotInitialised(config_id.to_string())),
        }
    }

    pub fn contains(&self, config_id: &str) -> bool {
        self.entries.read().contains_key(config_id)
    }

    /// Ids of every cached entry, sorted.
    pub fn ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.entries.read().keys().cloned().collect();
        ids.sort();
        ids
    }

    pub(crate) fn inspect(&self, config_id: &str) -> Result<Inspection, ConfigError> {
        let entries = self.entries.read();
        let entry = lookup(&entries, config_id)?;
        Ok(Inspection {
            options: entry.options.clone(),
            meta: entry.meta.clone(),
        })
    }

    /// Rebuild with the entry's current options, optionally adjusted first.
    #[track_caller]
    pub(crate) fn rebuild(
        &self,
        config_id: &str,
        adjust: impl FnOnce(&mut ConfigOptions),
    ) -> Result<ConfigView, ConfigError> {
        let caller = Location::caller();
        let mut options = self.current_options(config_id)?;
        adjust(&mut options);
        let snapshot = ConfigBuilder::new(config_id, options)?.into_snapshot();

        let mut entries = self.entries.write();
        lookup(&entries, config_id)?;
        Ok(self.store(&mut entries, config_id, snapshot, caller))
    }

    /// Build with adjusted options and return the values without caching them.
    pub(crate) fn peek(
        &self,
        config_id: &str,
        adjust: impl FnOnce(&mut ConfigOptions),
    ) -> Result<Value, ConfigError> {
        let mut options = self.current_options(config_id)?;
        adjust(&mut options);
        Ok(ConfigBuilder::new(config_id, options)?.values())
    }

    /// The entry's resolved options, ready to be adjusted and rebuilt.
    fn current_options(&self, config_id: &str) -> Result<ConfigOptions, ConfigError> {
        let entries = self.entries.read();
        Ok(ConfigOptions::from(lookup(&entries, config_id)?.options.clone()))
    }

    pub(crate) fn raw_files(&self, config_id: &str) -> Result<RawFiles, ConfigError> {
        let entries = self.entries.read();
        Ok(lookup(&entries, config_id)?.raw_files.clone())
    }

    pub(crate) fn construction_trace(&self, config_id: &str) -> Result<Vec<String>, ConfigError> {
        let entries = self.entries.read();
        Ok(lookup(&entries, config_id)?.construction_trace.clone())
    }

    /// Refresh a shared entry in place, otherwise install a new one.
    fn store(
        &self,
        entries: &mut HashMap<String, CacheEntry>,
        config_id: &str,
        snapshot: Snapshot,
        caller: &Location<'_>,
    ) -> ConfigView {
        let entry = match entries.entry(config_id.to_string()) {
            Entry::Occupied(occupied) if occupied.get().sharing() == SharingMode::Shared => {
                let entry = occupied.into_mut();
                entry.refresh(snapshot);
                tracing::info!(config_id = %config_id, "config refreshed in place");
                entry
            }
            Entry::Occupied(occupied) => {
                let entry = occupied.into_mut();
                *entry = CacheEntry::new(config_id, snapshot, trace::capture(caller));
                tracing::info!(config_id = %config_id, "config replaced");
                entry
            }
            Entry::Vacant(vacant) => {
                let entry = vacant.insert(CacheEntry::new(
                    config_id,
                    snapshot,
                    trace::capture(caller),
                ));
                tracing::info!(config_id = %config_id, "config installed");
                entry
            }
        };

        self.view_of(entry, None, None)
    }

    fn view_of(
        &self,
        entry: &CacheEntry,
        immutable: Option<bool>,
        plain: Option<bool>,
    ) -> ConfigView {
        let sharing = SharingMode::from_immutable(immutable.unwrap_or(entry.options.immutable));
        let values = match sharing {
            SharingMode::Shared => Arc::clone(&entry.values),
            SharingMode::Cloned => Arc::new(RwLock::new(Arc::clone(&*entry.values.read()))),
        };
        let registry = if plain.unwrap_or(entry.options.plain) {
            None
        } else {
            Some(self.clone())
        };
        ConfigView::new(entry.id.clone(), values, sharing, registry)
    }
}

fn lookup<'a>(
    entries: &'a HashMap<String, CacheEntry>,
    config_id: &str,
) -> Result<&'a CacheEntry, ConfigError> {
    entries
        .get(config_id)
        .ok_or_else(|| ConfigError::NotInitialised(config_id.to_string()))
}
