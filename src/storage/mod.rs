//! Key-value storage collaborators.
//!
//! # Data Flow
//! ```text
//! wallet::store (encrypted blob under one fixed key)
//!     → KeyValueStore trait (get / set JSON values)
//!     → file.rs (single JSON document on disk, atomic replace)
//!     → memory.rs (DashMap, tests and ephemeral runs)
//! ```

pub mod file;
pub mod memory;

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

pub use file::FileStore;
pub use memory::MemoryStore;

/// Errors raised by storage backends.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Storage IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Storage document is corrupt: {0}")]
    Corrupt(String),

    #[error("Storage serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type StorageResult<T> = Result<T, StorageError>;

/// Async key-value store holding JSON values.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Read the value under `key`, if any.
    async fn get(&self, key: &str) -> StorageResult<Option<Value>>;

    /// Write `value` under `key`, replacing what was there.
    async fn set(&self, key: &str, value: Value) -> StorageResult<()>;
}
