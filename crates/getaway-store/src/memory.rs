//! In-process storage backend.
//!
//! The per-device fallback when neither database URL is configured, and
//! the backend every unit test runs against. State lives in two
//! [`RwLock`]-guarded maps and dies with the process.

use std::collections::HashMap;

use serde_json::Value;
use tokio::sync::RwLock;

use crate::error::StoreError;

/// In-memory key-value store with separate document and log spaces.
#[derive(Debug, Default)]
pub struct MemoryStore {
    documents: RwLock<HashMap<String, Value>>,
    logs: RwLock<HashMap<String, Vec<Value>>>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Read the document at `key`, or `None` if absent.
    pub async fn get(&self, key: &str) -> Result<Option<Value>, StoreError> {
        Ok(self.documents.read().await.get(key).cloned())
    }

    /// Write the document at `key` (last write wins).
    pub async fn set(&self, key: &str, value: Value) -> Result<(), StoreError> {
        self.documents.write().await.insert(key.to_owned(), value);
        Ok(())
    }

    /// Append an entry to the log at `key`.
    pub async fn append(&self, key: &str, value: Value) -> Result<(), StoreError> {
        self.logs
            .write()
            .await
            .entry(key.to_owned())
            .or_default()
            .push(value);
        Ok(())
    }

    /// Read the log at `key` in insertion order (empty if absent).
    pub async fn read_log(&self, key: &str) -> Result<Vec<Value>, StoreError> {
        Ok(self.logs.read().await.get(key).cloned().unwrap_or_default())
    }

    /// Drop all state. Test helper.
    pub async fn clear(&self) {
        self.documents.write().await.clear();
        self.logs.write().await.clear();
    }
}
