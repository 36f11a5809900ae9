//! Redis-compatible cache backend.
//!
//! Documents are stored as JSON strings under plain keys; append-only
//! logs use native lists, because `RPUSH` is the only atomic append
//! available without transactions -- two clients appending concurrently
//! must never lose an entry.

use fred::prelude::*;
use serde_json::Value;

use crate::error::StoreError;

/// Connection handle to a Redis-compatible instance.
#[derive(Clone)]
pub struct RedisStore {
    client: Client,
}

impl RedisStore {
    /// Connect to Redis at the given URL.
    ///
    /// The URL should follow the Redis URL scheme:
    /// `redis://host:port` or `redis://host:port/db`
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Config`] if the URL cannot be parsed.
    /// Returns [`StoreError::Redis`] if the connection fails.
    pub async fn connect(url: &str) -> Result<Self, StoreError> {
        let config =
            Config::from_url(url).map_err(|e| StoreError::Config(format!("Invalid Redis URL: {e}")))?;

        let client = Builder::from_config(config).build()?;
        client.init().await?;

        tracing::info!("Connected to Redis");
        Ok(Self { client })
    }

    /// Read the document at `key`, or `None` if absent.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Serialization`] if the stored string is not
    /// valid JSON. Returns [`StoreError::Redis`] if the read fails.
    pub async fn get(&self, key: &str) -> Result<Option<Value>, StoreError> {
        let value: Option<String> = self.client.get(key).await?;
        value
            .map(|s| serde_json::from_str(&s).map_err(StoreError::Serialization))
            .transpose()
    }

    /// Write the document at `key` (last write wins).
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Redis`] if the write fails.
    pub async fn set(&self, key: &str, value: Value) -> Result<(), StoreError> {
        let json = serde_json::to_string(&value)?;
        let _: () = self.client.set(key, json.as_str(), None, None, false).await?;
        Ok(())
    }

    /// Append an entry to the log at `key` (RPUSH).
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Redis`] if the write fails.
    pub async fn append(&self, key: &str, value: Value) -> Result<(), StoreError> {
        let json = serde_json::to_string(&value)?;
        let _: u64 = self.client.rpush(key, json.as_str()).await?;
        Ok(())
    }

    /// Read the log at `key` in insertion order (oldest first).
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Serialization`] if an entry is not valid
    /// JSON. Returns [`StoreError::Redis`] if the read fails.
    pub async fn read_log(&self, key: &str) -> Result<Vec<Value>, StoreError> {
        let values: Vec<String> = self.client.lrange(key, 0, -1).await?;
        let mut entries = Vec::with_capacity(values.len());
        for v in &values {
            let parsed: Value = serde_json::from_str(v)?;
            entries.push(parsed);
        }
        Ok(entries)
    }

    /// Flush all keys from the instance.
    ///
    /// **WARNING:** This deletes all data. Only use for testing.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Redis`] if the flush fails.
    pub async fn flush_all(&self) -> Result<(), StoreError> {
        let _: () = self.client.flushall(false).await?;
        Ok(())
    }

    /// Return a reference to the underlying [`Client`].
    pub const fn client(&self) -> &Client {
        &self.client
    }
}
