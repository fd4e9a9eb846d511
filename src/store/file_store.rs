use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::base::{SessionStore, PERSIST_KEY};
use crate::models::TokenPair;

/// Config for the file-backed session store.
#[derive(Deserialize, Serialize, Debug, JsonSchema, Clone)]
pub struct FileStoreConfig {
    /// Directory holding the session record. Created if missing.
    pub directory: PathBuf,
}

/// Durable session record backed by a single JSON file named after
/// [`PERSIST_KEY`] in the configured directory.
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(config: &FileStoreConfig) -> Result<Self, String> {
        fs::create_dir_all(&config.directory)
            .map_err(|e| format!("Failed to create storage directory: {}", e))?;
        Ok(FileStore {
            path: config.directory.join(format!("{}.json", PERSIST_KEY)),
        })
    }

    pub fn record_path(&self) -> &Path {
        &self.path
    }
}

impl SessionStore for FileStore {
    fn load(&self) -> Result<Option<TokenPair>, String> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(format!("Failed to read session record: {}", e)),
        };
        let pair: TokenPair = serde_json::from_str(&raw)
            .map_err(|e| format!("Failed to parse session record: {}", e))?;
        debug!("Loaded persisted session record from {:?}", self.path);
        Ok(Some(pair))
    }

    fn save(&self, tokens: &TokenPair) -> Result<(), String> {
        let raw = serde_json::to_string(tokens)
            .map_err(|e| format!("Failed to serialize session record: {}", e))?;
        fs::write(&self.path, raw).map_err(|e| format!("Failed to write session record: {}", e))
    }

    fn clear(&self) -> Result<(), String> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            // Clearing an absent record is a no-op.
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(format!("Failed to delete session record: {}", e)),
        }
    }
}
