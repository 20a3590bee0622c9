//! # platter-storage: Durable State Storage for Platter
//!
//! Persisted store snapshots (the signed-in user, the cart) are written as
//! JSON strings under a fixed store name. This crate provides the storage
//! seam and its backends.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  platter-client stores                                                  │
//! │    mutate in memory ──► save-after-mutate hook ──► PersistSlot          │
//! │                                                        │                │
//! │  ┌─────────────────────────────────────────────────────▼─────────────┐  │
//! │  │             ★ platter-storage (THIS CRATE) ★                      │  │
//! │  │                                                                   │  │
//! │  │   StateStorage::get_item / set_item / remove_item                 │  │
//! │  │        │                  │                    │                  │  │
//! │  │   MemoryStorage      FileStorage         SqliteStorage            │  │
//! │  │   (HashMap)          (<dir>/<key>.json)  (state_entries table)    │  │
//! │  └───────────────────────────────────────────────────────────────────┘  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`memory`] - In-process storage
//! - [`file`] - JSON file per key
//! - [`pool`] - SQLite connection pool and storage
//! - [`migrations`] - Embedded SQLite migrations
//! - [`error`] - Storage error types
//!
//! ## Usage
//!
//! ```rust,ignore
//! use platter_storage::{MemoryStorage, StateStorage};
//!
//! let storage = MemoryStorage::new();
//! storage.set_item("cart-store", r#"{"state":{"cart":[]},"version":0}"#).await?;
//! let raw = storage.get_item("cart-store").await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod file;
pub mod memory;
pub mod migrations;
pub mod pool;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{StorageError, StorageResult};
pub use file::FileStorage;
pub use memory::MemoryStorage;
pub use pool::{SqliteConfig, SqliteStorage};

use async_trait::async_trait;

/// Key/value storage for serialized store state.
///
/// Values are opaque strings; callers own the serialization format.
#[async_trait]
pub trait StateStorage: Send + Sync {
    /// Reads the value stored under `key`, if any.
    async fn get_item(&self, key: &str) -> StorageResult<Option<String>>;

    /// Stores `value` under `key`, replacing any previous value.
    async fn set_item(&self, key: &str, value: &str) -> StorageResult<()>;

    /// Deletes `key`. Deleting a missing key is not an error.
    async fn remove_item(&self, key: &str) -> StorageResult<()>;
}

/// Checks that a storage key is usable as a file name and a row key.
///
/// ## Rules
/// - Not empty, at most 128 bytes
/// - ASCII letters, digits, `-`, `_` and `.` only, not starting with `.`
pub fn validate_key(key: &str) -> StorageResult<()> {
    let ok = !key.is_empty()
        && key.len() <= 128
        && !key.starts_with('.')
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == '.');

    if ok {
        Ok(())
    } else {
        Err(StorageError::InvalidKey(key.to_string()))
    }
}
