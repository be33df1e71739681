//! Durable string-keyed storage for the serialized cart.
//!
//! The cart store writes its whole cart as one JSON blob under a fixed key
//! after every successful mutation, and reads it back once on startup.
//!
//! # Backends
//!
//! - [`MemoryStore`] - process-local map, for tests and throwaway sessions
//! - [`FileStore`] - one file per key in a directory, survives restarts

mod file;
mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

use async_trait::async_trait;
use thiserror::Error;

/// Errors that can occur when reading or writing persisted values.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Filesystem operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The backend rejected the operation.
    #[error("Storage backend error: {0}")]
    Backend(String),
}

/// A durable string-keyed store.
#[async_trait]
pub trait PersistentStore: Send + Sync {
    /// Read the value stored under `key`, or `None` if nothing is stored.
    async fn read(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Store `value` under `key`, replacing any previous value.
    async fn write(&self, key: &str, value: &str) -> Result<(), StorageError>;
}
