//! Binding persistence.
//!
//! The table is stored as one JSON record under a fixed key:
//! `{ "<channel>": ["<widget identity>", ...], ... }`. Identities are the
//! widget's explicit id, or its generated id when it has none.

use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::Mutex;

use crate::registry::WidgetRegistry;
use crate::table::{BindingTable, Channel};
use crate::{Error, Result};

/// Serialized form of a [`BindingTable`].
pub type PersistedBindings = BTreeMap<String, Vec<String>>;

/// Durable string-keyed store.
pub trait BindingStore: Send + Sync {
    /// `Ok(None)` when nothing is stored under `key`.
    fn read(&self, key: &str) -> Result<Option<String>>;
    fn write(&self, key: &str, value: &str) -> Result<()>;
}

/// In-process store. Clones share contents, which lets a test stand in for
/// "the next session".
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    values: Arc<Mutex<HashMap<String, String>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl BindingStore for MemoryStore {
    fn read(&self, key: &str) -> Result<Option<String>> {
        Ok(self.values.lock().get(key).cloned())
    }

    fn write(&self, key: &str, value: &str) -> Result<()> {
        self.values.lock().insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// One `<key>.json` file per key inside a directory.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// `<platform config dir>/bindery`.
    pub fn default_location() -> Result<Self> {
        dirs::config_dir()
            .map(|dir| Self::new(dir.join("bindery")))
            .ok_or_else(|| Error::Store("could not determine config directory".into()))
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }
}

impl BindingStore for FileStore {
    fn read(&self, key: &str) -> Result<Option<String>> {
        match fs::read_to_string(self.path(key)) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn write(&self, key: &str, value: &str) -> Result<()> {
        fs::create_dir_all(&self.dir)?;
        fs::write(self.path(key), value)?;
        Ok(())
    }
}

/// Bindings restored by [`PersistenceAdapter::load`].
#[derive(Debug, Clone, Default)]
pub struct LoadedBindings {
    pub table: BindingTable,
    /// Identities with no live widget. They stay in the store until the next
    /// save overwrites the record.
    pub dropped: Vec<String>,
}

/// Converts between the live table and its stored record.
#[derive(Debug, Clone)]
pub struct PersistenceAdapter {
    key: String,
}

impl PersistenceAdapter {
    pub fn new(key: impl Into<String>) -> Self {
        Self { key: key.into() }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Identities are listed once per channel; widgets sharing an explicit
    /// id are all rebound by [`decode`](Self::decode).
    pub fn encode(&self, table: &BindingTable, registry: &WidgetRegistry) -> PersistedBindings {
        table
            .iter()
            .filter_map(|(channel, widgets)| {
                let mut identities: Vec<String> = Vec::new();
                for identity in widgets.iter().filter_map(|id| registry.identity(*id)) {
                    if !identities.contains(&identity) {
                        identities.push(identity);
                    }
                }
                (!identities.is_empty()).then(|| (channel.to_string(), identities))
            })
            .collect()
    }

    /// The record as pretty-printed JSON.
    pub fn export(&self, table: &BindingTable, registry: &WidgetRegistry) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.encode(table, registry))?)
    }

    pub fn save(
        &self,
        store: &dyn BindingStore,
        table: &BindingTable,
        registry: &WidgetRegistry,
    ) -> Result<()> {
        let json = self.export(table, registry)?;
        store.write(&self.key, &json)?;
        tracing::trace!("Saved {} bindings under '{}'", table.len(), self.key);
        Ok(())
    }

    /// Read the record and resolve identities against the live registry.
    ///
    /// Returns `Ok(None)` when nothing is stored.
    pub fn load(
        &self,
        store: &dyn BindingStore,
        registry: &WidgetRegistry,
    ) -> Result<Option<LoadedBindings>> {
        let Some(json) = store.read(&self.key)? else {
            tracing::debug!("No stored bindings under '{}'", self.key);
            return Ok(None);
        };
        let record: PersistedBindings = serde_json::from_str(&json)?;
        Ok(Some(self.decode(record, registry)))
    }

    pub fn decode(&self, record: PersistedBindings, registry: &WidgetRegistry) -> LoadedBindings {
        let mut loaded = LoadedBindings::default();
        for (channel, identities) in record {
            let channel: Channel = match channel.trim().parse() {
                Ok(channel) => channel,
                Err(_) => {
                    tracing::warn!("Skipping stored bindings for invalid channel '{}'", channel);
                    continue;
                }
            };
            for identity in identities {
                let widgets = registry.resolve(&identity);
                if widgets.is_empty() {
                    tracing::debug!("Dropping binding for missing widget '{}'", identity);
                    loaded.dropped.push(identity);
                    continue;
                }
                for widget in widgets {
                    loaded.table.assign(channel, widget);
                }
            }
        }
        loaded
    }
}
