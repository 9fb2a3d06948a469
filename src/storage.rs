use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::Mutex;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, instrument, warn};

use crate::error::{GuideError, Result};

const LANGUAGE_KEY: &str = "language";
const THEME_KEY: &str = "theme";

/// Persistent key-value store holding JSON values.
///
/// The whole document lives in one file and is rewritten atomically on every
/// change (temp file, then rename). Without a path it is memory only.
/// Clones share the same document.
#[derive(Debug, Clone)]
pub struct LocalStorage {
    path: Option<PathBuf>,
    entries: Arc<Mutex<Map<String, Value>>>,
}

impl LocalStorage {
    /// Open the storage file, starting empty if it does not exist yet.
    ///
    /// A file that exists but is not a JSON object is treated as empty and
    /// will be overwritten by the next write.
    #[instrument]
    pub fn open(path: impl AsRef<Path> + std::fmt::Debug) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let entries = match fs::read_to_string(&path) {
            Ok(contents) => serde_json::from_str::<Map<String, Value>>(&contents).unwrap_or_else(|e| {
                warn!(path = %path.display(), error = %e, "storage file is not a json object, starting empty");
                Map::new()
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Map::new(),
            Err(source) => return Err(GuideError::Storage { path, source }),
        };
        debug!(keys = entries.len(), "opened local storage");
        Ok(Self {
            path: Some(path),
            entries: Arc::new(Mutex::new(entries)),
        })
    }

    pub fn in_memory() -> Self {
        Self {
            path: None,
            entries: Arc::new(Mutex::new(Map::new())),
        }
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Read a value. Missing keys and values of the wrong shape both read as `None`.
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let value = self.entries.lock().get(key).cloned()?;
        serde_json::from_value(value)
            .inspect_err(|e| warn!(key, error = %e, "ignoring unreadable stored value"))
            .ok()
    }

    /// Store a value and rewrite the file. Blocks on file I/O; from async code
    /// call it through `spawn_blocking`.
    pub fn set<T: Serialize>(&self, key: &str, value: &T) -> Result<()> {
        let value = serde_json::to_value(value)?;
        let mut entries = self.entries.lock();
        entries.insert(key.to_string(), value);
        self.persist(&entries)
    }

    pub fn remove(&self, key: &str) -> Result<bool> {
        let mut entries = self.entries.lock();
        if entries.remove(key).is_none() {
            return Ok(false);
        }
        self.persist(&entries).map(|_| true)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.lock().contains_key(key)
    }

    fn persist(&self, entries: &Map<String, Value>) -> Result<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        let io_err = |source| GuideError::Storage {
            path: path.clone(),
            source,
        };
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(io_err)?;
        }
        let body = serde_json::to_vec_pretty(entries)?;
        let temp_path = path.with_extension("tmp");
        let mut file = fs::File::create(&temp_path).map_err(io_err)?;
        file.write_all(&body).map_err(io_err)?;
        file.sync_all().map_err(io_err)?;
        fs::rename(&temp_path, path).map_err(io_err)?;
        Ok(())
    }
}

/// Interface language.
#[derive(
    Debug,
    Default,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    strum_macros::Display,
    strum_macros::EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Language {
    #[default]
    Fr,
    En,
    Ar,
}

#[derive(
    Debug,
    Default,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    strum_macros::Display,
    strum_macros::EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

/// User interface preferences kept across sessions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Preferences {
    pub language: Language,
    pub theme: Theme,
}

impl Preferences {
    /// Load preferences, falling back to defaults for anything missing.
    pub fn load(storage: &LocalStorage) -> Self {
        Self {
            language: storage.get(LANGUAGE_KEY).unwrap_or_default(),
            theme: storage.get(THEME_KEY).unwrap_or_default(),
        }
    }

    pub fn save(&self, storage: &LocalStorage) -> Result<()> {
        storage.set(LANGUAGE_KEY, &self.language)?;
        storage.set(THEME_KEY, &self.theme)
    }
}
