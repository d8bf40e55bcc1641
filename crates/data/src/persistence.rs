use crickpacks_core::StoreState;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use std::sync::Mutex;

/// Single fixed key the whole store state lives under.
pub const STATE_KEY: &str = "cricket-packs-state-v2";

const SAVE_SCHEMA_VERSION: u32 = 2;

/// Durable key-value collaborator. Values are opaque strings; callers treat
/// writes as fire-and-forget.
pub trait Storage {
    fn put(&self, key: &str, value: &str) -> Result<(), String>;
    fn get(&self, key: &str) -> Result<Option<String>, String>;
}

/// One file per key under a root directory.
#[derive(Debug, Clone)]
pub struct FileStorage {
    root: PathBuf,
}

impl FileStorage {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn key_path(&self, key: &str) -> PathBuf {
        self.root.join(format!("{key}.json"))
    }
}

impl Storage for FileStorage {
    fn put(&self, key: &str, value: &str) -> Result<(), String> {
        fs::create_dir_all(&self.root).map_err(|err| err.to_string())?;
        fs::write(self.key_path(key), value).map_err(|err| err.to_string())
    }

    fn get(&self, key: &str) -> Result<Option<String>, String> {
        let path = self.key_path(key);
        if !path.exists() {
            return Ok(None);
        }
        fs::read_to_string(path).map(Some).map_err(|err| err.to_string())
    }
}

#[derive(Debug, Default)]
pub struct MemoryStorage {
    values: Mutex<HashMap<String, String>>,
}

impl Storage for MemoryStorage {
    fn put(&self, key: &str, value: &str) -> Result<(), String> {
        let mut values = self.values.lock().map_err(|err| err.to_string())?;
        values.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn get(&self, key: &str) -> Result<Option<String>, String> {
        let values = self.values.lock().map_err(|err| err.to_string())?;
        Ok(values.get(key).cloned())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SavedState {
    pub version: u32,
    pub roster_seed: u64,
    pub state: StoreState,
}

pub fn default_data_dir() -> Option<PathBuf> {
    if let Some(path) = std::env::var_os("CRICKPACKS_DATA") {
        return Some(PathBuf::from(path));
    }
    std::env::var_os("HOME").map(|home| PathBuf::from(home).join(".crickpacks"))
}

/// Serializes the whole store state under the fixed key.
pub fn save_state(
    storage: &dyn Storage,
    state: &StoreState,
    roster_seed: u64,
) -> Result<(), String> {
    let payload = SavedState {
        version: SAVE_SCHEMA_VERSION,
        roster_seed,
        state: state.clone(),
    };
    let body = serde_json::to_string_pretty(&payload).map_err(|err| err.to_string())?;
    storage.put(STATE_KEY, &body)
}

/// Loads the saved state and its roster seed. A missing, unreadable,
/// corrupt, or wrong-version value falls back to the default state with
/// `fallback_seed`; nothing is surfaced to the user.
pub fn load_state(storage: &dyn Storage, fallback_seed: u64) -> (StoreState, u64) {
    let raw = match storage.get(STATE_KEY) {
        Ok(Some(raw)) => raw,
        _ => return (StoreState::default(), fallback_seed),
    };
    match serde_json::from_str::<SavedState>(&raw) {
        Ok(saved) if saved.version == SAVE_SCHEMA_VERSION => (saved.state, saved.roster_seed),
        _ => (StoreState::default(), fallback_seed),
    }
}

/// Convenience used by the front ends after every committed transition.
/// Write failures are ignored; in-memory state stays the source of truth.
pub fn persist(storage: &dyn Storage, state: &StoreState, roster_seed: u64) {
    let _ = save_state(storage, state, roster_seed);
}
