use std::sync::Arc;

use tracing::{error, info};

use super::{file_store::FileStore, memory_store::MemoryStore};
use crate::config::{StorageBackend, StorageConfig};
use crate::models::TokenPair;

/// Well-known key the session record is persisted under.
pub const PERSIST_KEY: &str = "authTokens";

/// The SessionStore trait abstracts the single durable slot holding the
/// persisted TokenPair: read once at startup, overwritten on every
/// successful login/refresh, deleted on logout.
///
/// Deliberately synchronous: the record is a local slot, and keeping the
/// trait sync is what lets `logout` complete synchronously.
pub trait SessionStore: Send + Sync {
    /// Returns the persisted pair, or `Ok(None)` when no record exists.
    /// A record that is present but unreadable is an `Err`.
    fn load(&self) -> Result<Option<TokenPair>, String>;
    fn save(&self, tokens: &TokenPair) -> Result<(), String>;
    fn clear(&self) -> Result<(), String>;
    fn is_enabled(&self) -> bool {
        // Default implementation should return always True for durable stores.
        // The in-memory store returns false so we can write better debug messages.
        true
    }
}

/// Creates a concrete store implementation based on the StorageConfig.
/// If `storage.enabled = false`, sessions live only in memory and do not
/// survive a restart.
pub fn create_store(config: &StorageConfig) -> Arc<dyn SessionStore> {
    if !config.enabled {
        info!("Session storage is disabled. Sessions will not survive a restart.");
        return Arc::new(MemoryStore::new());
    }

    match &config.backend {
        Some(StorageBackend::File(file_config)) => match FileStore::new(file_config) {
            Ok(store) => {
                info!("Using file session store at {:?}", store.record_path());
                Arc::new(store)
            }
            Err(e) => {
                error!("Failed to create file session store: {}", e);
                std::process::exit(1);
            }
        },
        None => {
            error!("Storage is enabled, but no backend config is provided!");
            std::process::exit(1);
        }
    }
}
