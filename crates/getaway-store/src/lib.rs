//! Key-value persistence for the Getaway destination game.
//!
//! One logical contract -- `get`, `set`, `append`, `read_log` over JSON
//! values -- realized by three interchangeable backends. The engine never
//! assumes guarantees stronger than last-write-wins on `set`; append-only
//! logs are the only shared mutable history.
//!
//! # Backends
//!
//! - [`postgres`] -- `PostgreSQL` document + log tables (`sqlx`)
//! - [`redis`] -- Redis-compatible cache, JSON strings + lists (`fred`)
//! - [`memory`] -- in-process maps; the per-device fallback and the unit
//!   test backend
//!
//! Backend selection is an external configuration decision injected at
//! startup ([`Store::from_env`]); nothing branches on it inside the
//! engine.
//!
//! # Modules
//!
//! - [`namespace`] -- live/demo/preview key prefixes and the key layout
//! - [`error`] -- shared error types

pub mod error;
pub mod memory;
pub mod namespace;
pub mod postgres;
pub mod redis;

// Re-export primary types for convenience.
pub use error::StoreError;
pub use memory::MemoryStore;
pub use namespace::Namespace;
pub use postgres::{PostgresConfig, PostgresStore};
pub use redis::RedisStore;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

/// A configured storage backend.
///
/// The variants share one contract; every engine operation goes through
/// this enum so the choice of backend stays a startup concern.
pub enum Store {
    /// `PostgreSQL` document store.
    Postgres(PostgresStore),
    /// Redis-compatible cache.
    Redis(RedisStore),
    /// In-process memory store.
    Memory(MemoryStore),
}

impl Store {
    /// Select a backend from the environment.
    ///
    /// Preference order: `DATABASE_URL` (`PostgreSQL`, migrations run
    /// eagerly), then `REDIS_URL`, then the in-process memory store.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the configured backend cannot be
    /// reached or migrated.
    pub async fn from_env() -> Result<Self, StoreError> {
        if let Ok(url) = std::env::var("DATABASE_URL") {
            let store = PostgresStore::connect_url(&url).await?;
            store.run_migrations().await?;
            return Ok(Self::Postgres(store));
        }
        if let Ok(url) = std::env::var("REDIS_URL") {
            return Ok(Self::Redis(RedisStore::connect(&url).await?));
        }
        tracing::warn!("no DATABASE_URL or REDIS_URL configured, using in-process storage");
        Ok(Self::Memory(MemoryStore::new()))
    }

    /// Human-readable backend label for status displays.
    pub const fn backend_label(&self) -> &'static str {
        match self {
            Self::Postgres(_) => "postgres",
            Self::Redis(_) => "redis",
            Self::Memory(_) => "memory",
        }
    }

    /// Read the document at `key`, or `None` if absent.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the backend read fails.
    pub async fn get(&self, key: &str) -> Result<Option<Value>, StoreError> {
        match self {
            Self::Postgres(s) => s.get(key).await,
            Self::Redis(s) => s.get(key).await,
            Self::Memory(s) => s.get(key).await,
        }
    }

    /// Write the document at `key` (last write wins).
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the backend write fails.
    pub async fn set(&self, key: &str, value: Value) -> Result<(), StoreError> {
        match self {
            Self::Postgres(s) => s.set(key, value).await,
            Self::Redis(s) => s.set(key, value).await,
            Self::Memory(s) => s.set(key, value).await,
        }
    }

    /// Append an entry to the log at `key`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the backend write fails.
    pub async fn append(&self, key: &str, value: Value) -> Result<(), StoreError> {
        match self {
            Self::Postgres(s) => s.append(key, value).await,
            Self::Redis(s) => s.append(key, value).await,
            Self::Memory(s) => s.append(key, value).await,
        }
    }

    /// Read the log at `key` in insertion order.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the backend read fails.
    pub async fn read_log(&self, key: &str) -> Result<Vec<Value>, StoreError> {
        match self {
            Self::Postgres(s) => s.read_log(key).await,
            Self::Redis(s) => s.read_log(key).await,
            Self::Memory(s) => s.read_log(key).await,
        }
    }

    /// Read and deserialize the document at `key`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Serialization`] on shape mismatch.
    pub async fn get_json<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, StoreError> {
        self.get(key)
            .await?
            .map(|v| serde_json::from_value(v).map_err(StoreError::Serialization))
            .transpose()
    }

    /// Serialize and write the document at `key`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if serialization or the write fails.
    pub async fn set_json<T: Serialize>(&self, key: &str, value: &T) -> Result<(), StoreError> {
        self.set(key, serde_json::to_value(value)?).await
    }

    /// Serialize and append an entry to the log at `key`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if serialization or the write fails.
    pub async fn append_json<T: Serialize>(&self, key: &str, value: &T) -> Result<(), StoreError> {
        self.append(key, serde_json::to_value(value)?).await
    }

    /// Read and deserialize the log at `key`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Serialization`] on shape mismatch.
    pub async fn read_log_json<T: DeserializeOwned>(&self, key: &str) -> Result<Vec<T>, StoreError> {
        let values = self.read_log(key).await?;
        let mut entries = Vec::with_capacity(values.len());
        for v in values {
            entries.push(serde_json::from_value(v)?);
        }
        Ok(entries)
    }
}
