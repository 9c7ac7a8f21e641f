//! Settings - Persisted player preferences and high score
//!
//! The simulation never touches storage directly; it reads and writes
//! through an injected key-value store. Persistence failures are not
//! safety-critical, so the store surface stays infallible and the file
//! implementation logs and keeps going.

use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

/// Selected difficulty level, one of `Difficulty::as_str`.
pub const KEY_DIFFICULTY: &str = "Difficulty";
/// Selected car color, one of `CarColor::as_str`.
pub const KEY_CAR_COLOR: &str = "CarColor";
/// Best score across sessions; only ever increases.
pub const KEY_HIGH_SCORE: &str = "HighScore";

/// Injected key-value settings provider.
pub trait SettingsStore: Send {
    fn get_string(&self, key: &str, default: &str) -> String;
    fn set_string(&mut self, key: &str, value: &str);
    fn get_int(&self, key: &str, default: i32) -> i32;
    fn set_int(&mut self, key: &str, value: i32);
}

/// Volatile in-memory store for tests and headless runs.
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: HashMap<String, serde_json::Value>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SettingsStore for MemoryStore {
    fn get_string(&self, key: &str, default: &str) -> String {
        self.values
            .get(key)
            .and_then(|value| value.as_str())
            .unwrap_or(default)
            .to_string()
    }

    fn set_string(&mut self, key: &str, value: &str) {
        self.values.insert(key.to_string(), value.into());
    }

    fn get_int(&self, key: &str, default: i32) -> i32 {
        self.values
            .get(key)
            .and_then(|value| value.as_i64())
            .map(|value| value as i32)
            .unwrap_or(default)
    }

    fn set_int(&mut self, key: &str, value: i32) {
        self.values.insert(key.to_string(), value.into());
    }
}

/// Store backed by a JSON file, written through on every set.
///
/// A missing file is the first-run case; a corrupt one is discarded with
/// a warning. Both start the store from defaults.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    values: HashMap<String, serde_json::Value>,
}

impl JsonFileStore {
    /// Open the store at `path`, loading whatever is already there.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let values = match fs::read_to_string(&path) {
            Ok(text) => match serde_json::from_str(&text) {
                Ok(values) => values,
                Err(e) => {
                    log::warn!(
                        "settings file {} is corrupt, starting fresh: {}",
                        path.display(),
                        e
                    );
                    HashMap::new()
                }
            },
            Err(_) => HashMap::new(),
        };

        Self { path, values }
    }

    /// Path the store writes to.
    pub fn path(&self) -> &std::path::Path {
        &self.path
    }

    fn persist(&self) {
        let text = match serde_json::to_string_pretty(&self.values) {
            Ok(text) => text,
            Err(e) => {
                log::warn!("failed to serialize settings: {}", e);
                return;
            }
        };

        if let Err(e) = fs::write(&self.path, text) {
            log::warn!("failed to write settings to {}: {}", self.path.display(), e);
        }
    }
}

impl SettingsStore for JsonFileStore {
    fn get_string(&self, key: &str, default: &str) -> String {
        self.values
            .get(key)
            .and_then(|value| value.as_str())
            .unwrap_or(default)
            .to_string()
    }

    fn set_string(&mut self, key: &str, value: &str) {
        self.values.insert(key.to_string(), value.into());
        self.persist();
    }

    fn get_int(&self, key: &str, default: i32) -> i32 {
        self.values
            .get(key)
            .and_then(|value| value.as_i64())
            .map(|value| value as i32)
            .unwrap_or(default)
    }

    fn set_int(&mut self, key: &str, value: i32) {
        self.values.insert(key.to_string(), value.into());
        self.persist();
    }
}
