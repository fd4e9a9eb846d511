use std::sync::Mutex;

use super::base::SessionStore;
use crate::models::TokenPair;

/// An in-process session slot used when durable storage is disabled, and by
/// tests. Same lifecycle as the file store, minus surviving a restart.
#[derive(Default)]
pub struct MemoryStore {
    slot: Mutex<Option<TokenPair>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        MemoryStore::default()
    }

    /// Pre-seed the slot, simulating a record left behind by a previous run.
    pub fn seeded(tokens: TokenPair) -> Self {
        MemoryStore {
            slot: Mutex::new(Some(tokens)),
        }
    }
}

impl SessionStore for MemoryStore {
    fn load(&self) -> Result<Option<TokenPair>, String> {
        let slot = self.slot.lock().map_err(|_| "session slot poisoned")?;
        Ok(slot.clone())
    }

    fn save(&self, tokens: &TokenPair) -> Result<(), String> {
        let mut slot = self.slot.lock().map_err(|_| "session slot poisoned")?;
        *slot = Some(tokens.clone());
        Ok(())
    }

    fn clear(&self) -> Result<(), String> {
        let mut slot = self.slot.lock().map_err(|_| "session slot poisoned")?;
        *slot = None;
        Ok(())
    }

    fn is_enabled(&self) -> bool {
        false
    }
}
