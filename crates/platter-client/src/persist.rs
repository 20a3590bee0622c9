//! # Persisted Store Snapshots
//!
//! The save-after-mutate hook: a store mutates its in-memory state first,
//! then hands the part worth keeping to its [`PersistSlot`].
//!
//! ## Stored Shape
//! ```json
//! { "state": { "cart": [ ... ] }, "version": 0 }
//! ```
//!
//! A snapshot written by a different `version` is ignored on load and the
//! store starts fresh. So is a snapshot that no longer parses.

use std::sync::Arc;

use platter_storage::StateStorage;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::ClientResult;

#[derive(Serialize)]
struct Outgoing<'a, T: ?Sized> {
    state: &'a T,
    version: u32,
}

#[derive(Deserialize)]
struct Incoming<T> {
    state: T,
    #[serde(default)]
    version: u32,
}

/// One named snapshot in a [`StateStorage`].
#[derive(Clone)]
pub struct PersistSlot {
    storage: Arc<dyn StateStorage>,
    key: &'static str,
    version: u32,
}

impl std::fmt::Debug for PersistSlot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PersistSlot")
            .field("key", &self.key)
            .field("version", &self.version)
            .finish_non_exhaustive()
    }
}

impl PersistSlot {
    pub fn new(storage: Arc<dyn StateStorage>, key: &'static str, version: u32) -> Self {
        PersistSlot {
            storage,
            key,
            version,
        }
    }

    /// Reads the snapshot.
    ///
    /// ## Returns
    /// * `Ok(Some(state))` - Snapshot present and current
    /// * `Ok(None)` - Nothing stored, wrong version, or unreadable
    /// * `Err(_)` - Storage itself failed
    pub async fn load<T: DeserializeOwned>(&self) -> ClientResult<Option<T>> {
        let Some(raw) = self.storage.get_item(self.key).await? else {
            debug!(key = self.key, "No persisted state");
            return Ok(None);
        };

        match serde_json::from_str::<Incoming<T>>(&raw) {
            Ok(stored) if stored.version == self.version => Ok(Some(stored.state)),
            Ok(stored) => {
                warn!(
                    key = self.key,
                    stored = stored.version,
                    current = self.version,
                    "Ignoring persisted state from another version"
                );
                Ok(None)
            }
            Err(e) => {
                warn!(key = self.key, error = %e, "Ignoring unreadable persisted state");
                Ok(None)
            }
        }
    }

    /// Writes the snapshot.
    pub async fn save<T: Serialize + ?Sized>(&self, state: &T) -> ClientResult<()> {
        let raw = serde_json::to_string(&Outgoing {
            state,
            version: self.version,
        })?;
        self.storage.set_item(self.key, &raw).await?;
        debug!(key = self.key, "Persisted state saved");
        Ok(())
    }

    /// Saves, logging a warning instead of returning the error.
    pub async fn save_or_warn<T: Serialize + ?Sized>(&self, state: &T) {
        if let Err(e) = self.save(state).await {
            warn!(key = self.key, error = %e, "Failed to persist state");
        }
    }

    /// Deletes the snapshot.
    pub async fn clear(&self) -> ClientResult<()> {
        self.storage.remove_item(self.key).await?;
        Ok(())
    }
}
