use std::collections::HashMap;
use std::path::Path;

use log::{info, warn};
use redb::{Database, ReadableTable, TableDefinition};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value as JsonValue;

use crate::app_error::AppError;

const ENTRIES: TableDefinition<&str, &str> = TableDefinition::new("entries");

/// Key-value store mapping string keys to JSON values.
///
/// Reads are served from an in-memory cache that mirrors the durable redb
/// table; every write replaces the cached value and is persisted in its own
/// committed transaction. When the durable side is unavailable the store
/// keeps working from memory alone; persistence failures are logged and
/// never surfaced to callers.
pub struct StoreState {
    db: Option<Database>,
    cache: HashMap<String, JsonValue>,
}

impl StoreState {
    /// Opens (or creates) the store at `path` and loads every entry into the
    /// cache. Falls back to a memory-only store if the database cannot be
    /// opened.
    pub fn open(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match Self::open_durable(path) {
            Ok(state) => state,
            Err(e) => {
                warn!("Could not open store at {}: {e}; continuing in memory only", path.display());
                Self::in_memory()
            }
        }
    }

    /// A store with no durable backing. Used by tests and as the degraded
    /// mode when the database cannot be opened.
    pub fn in_memory() -> Self {
        Self {
            db: None,
            cache: HashMap::new(),
        }
    }

    fn open_durable(path: &Path) -> Result<Self, AppError> {
        let db = Database::create(path)?;

        // Make sure the table exists so later reads never miss it.
        let txn = db.begin_write()?;
        txn.open_table(ENTRIES)?;
        txn.commit()?;

        let mut cache = HashMap::new();
        let read = db.begin_read()?;
        let table = read.open_table(ENTRIES)?;
        for entry in table.iter()? {
            let (key, value) = entry?;
            match serde_json::from_str(value.value()) {
                Ok(json) => {
                    cache.insert(key.value().to_string(), json);
                }
                Err(e) => {
                    warn!("Discarding unreadable entry '{}': {e}", key.value());
                }
            }
        }
        drop(table);
        drop(read);

        info!("Opened store at {} ({} entries)", path.display(), cache.len());
        Ok(Self {
            db: Some(db),
            cache,
        })
    }

    /// Whether writes reach a durable database or live only in memory.
    pub fn is_durable(&self) -> bool {
        self.db.is_some()
    }

    /// Whether a value has ever been stored under `key`.
    pub fn contains(&self, key: &str) -> bool {
        self.cache.contains_key(key)
    }

    /// Returns the value under `key`. On the first access for a key with no
    /// stored value, `default` is written through and returned.
    pub fn get(&mut self, key: &str, default: JsonValue) -> JsonValue {
        if let Some(value) = self.cache.get(key) {
            return value.clone();
        }
        self.set(key, default.clone());
        default
    }

    /// Replaces the value under `key`. The cache is always updated; the
    /// durable write is best effort.
    pub fn set(&mut self, key: &str, value: JsonValue) {
        if let Err(e) = self.persist(key, &value) {
            warn!("Failed to persist '{key}': {e}");
        }
        self.cache.insert(key.to_string(), value);
    }

    fn persist(&self, key: &str, value: &JsonValue) -> Result<(), AppError> {
        let Some(db) = &self.db else {
            return Ok(());
        };
        let json = serde_json::to_string(value)?;
        let txn = db.begin_write()?;
        {
            let mut table = txn.open_table(ENTRIES)?;
            table.insert(key, json.as_str())?;
        }
        txn.commit()?;
        Ok(())
    }

    /// Typed [`StoreState::get`]. A stored value that no longer matches `T`
    /// is logged and replaced by the default rather than propagated.
    pub fn get_record<T>(&mut self, key: &str, default: T) -> T
    where
        T: Serialize + DeserializeOwned,
    {
        let fallback = match serde_json::to_value(&default) {
            Ok(value) => value,
            Err(e) => {
                warn!("Default for '{key}' is not representable as JSON: {e}");
                return default;
            }
        };
        match serde_json::from_value(self.get(key, fallback)) {
            Ok(value) => value,
            Err(e) => {
                warn!("Stored value under '{key}' has an unexpected shape: {e}");
                default
            }
        }
    }

    /// Typed [`StoreState::set`].
    pub fn set_record<T: Serialize>(&mut self, key: &str, value: &T) {
        match serde_json::to_value(value) {
            Ok(json) => self.set(key, json),
            Err(e) => warn!("Value for '{key}' is not representable as JSON: {e}"),
        }
    }
}
