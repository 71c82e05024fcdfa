//! Persisted key-value blobs
//!
//! The converter keeps its state as a few named string blobs (history,
//! theme). `RedbStore` persists them in an embedded database; `InMemoryStore`
//! stands in when the database cannot be opened, and in tests.

use std::collections::HashMap;
use std::path::Path;
use std::sync::{Arc, Mutex};

use redb::{Database, TableDefinition};

use crate::shared::error::{AppError, AppResult};

/// Key: blob name, Value: serialized blob
const STORAGE_TABLE: TableDefinition<&str, &str> = TableDefinition::new("local_storage");

/// Storage trait for named blobs
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> AppResult<Option<String>>;
    fn set(&self, key: &str, value: &str) -> AppResult<()>;
    fn remove(&self, key: &str) -> AppResult<()>;
}

/// Redb-based storage implementation
pub struct RedbStore {
    db: Database,
}

impl RedbStore {
    pub fn open(path: &Path) -> AppResult<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| AppError::Io(format!("Failed to create data directory: {}", e)))?;
        }

        let db = Database::create(path)
            .map_err(|e| AppError::Io(format!("Failed to create database: {}", e)))?;

        // Initialize table
        {
            let write_txn = db.begin_write()
                .map_err(|e| AppError::Io(format!("Failed to begin write transaction: {}", e)))?;
            {
                let _table = write_txn.open_table(STORAGE_TABLE)
                    .map_err(|e| AppError::Io(format!("Failed to open table: {}", e)))?;
            }
            write_txn.commit()
                .map_err(|e| AppError::Io(format!("Failed to commit transaction: {}", e)))?;
        }

        Ok(Self { db })
    }
}

impl KeyValueStore for RedbStore {
    fn get(&self, key: &str) -> AppResult<Option<String>> {
        let read_txn = self.db.begin_read()
            .map_err(|e| AppError::Io(format!("Failed to begin read: {}", e)))?;

        let table = read_txn.open_table(STORAGE_TABLE)
            .map_err(|e| AppError::Io(format!("Failed to open table: {}", e)))?;

        let value = table.get(key)
            .map_err(|e| AppError::Io(format!("Failed to read {}: {}", key, e)))?;

        Ok(value.map(|guard| guard.value().to_string()))
    }

    fn set(&self, key: &str, value: &str) -> AppResult<()> {
        let write_txn = self.db.begin_write()
            .map_err(|e| AppError::Io(format!("Failed to begin write: {}", e)))?;

        {
            let mut table = write_txn.open_table(STORAGE_TABLE)
                .map_err(|e| AppError::Io(format!("Failed to open table: {}", e)))?;

            table.insert(key, value)
                .map_err(|e| AppError::Io(format!("Failed to insert {}: {}", key, e)))?;
        }

        write_txn.commit()
            .map_err(|e| AppError::Io(format!("Failed to commit: {}", e)))
    }

    fn remove(&self, key: &str) -> AppResult<()> {
        let write_txn = self.db.begin_write()
            .map_err(|e| AppError::Io(format!("Failed to begin write: {}", e)))?;

        {
            let mut table = write_txn.open_table(STORAGE_TABLE)
                .map_err(|e| AppError::Io(format!("Failed to open table: {}", e)))?;

            table.remove(key)
                .map_err(|e| AppError::Io(format!("Failed to remove {}: {}", key, e)))?;
        }

        write_txn.commit()
            .map_err(|e| AppError::Io(format!("Failed to commit: {}", e)))
    }
}

/// In-memory storage (fallback when the database is unavailable)
#[derive(Default)]
pub struct InMemoryStore {
    items: Mutex<HashMap<String, String>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for InMemoryStore {
    fn get(&self, key: &str) -> AppResult<Option<String>> {
        let items = self.items.lock()
            .map_err(|e| AppError::System(format!("Mutex poisoned: {}", e)))?;
        Ok(items.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> AppResult<()> {
        let mut items = self.items.lock()
            .map_err(|e| AppError::System(format!("Mutex poisoned: {}", e)))?;
        items.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> AppResult<()> {
        let mut items = self.items.lock()
            .map_err(|e| AppError::System(format!("Mutex poisoned: {}", e)))?;
        items.remove(key);
        Ok(())
    }
}

/// Open the database at `path`, falling back to memory if that fails
pub fn open_store(path: &Path) -> Arc<dyn KeyValueStore> {
    match RedbStore::open(path) {
        Ok(store) => Arc::new(store),
        Err(e) => {
            eprintln!("[Storage] Failed to initialize database: {}, using in-memory fallback", e);
            Arc::new(InMemoryStore::new())
        }
    }
}
