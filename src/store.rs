//! Local key-value persistence.
//!
//! This module provides:
//! - `KeyValueStore`, the raw string store (file-backed on native, browser
//!   `localStorage` on wasm)
//! - `LocalStore`, the typed adapter for conversations and the theme flag

use crate::types::{Conversation, ThemeMode};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;
use std::{fs, io};
use thiserror::Error;
use tracing::{debug, warn};

pub const THEME_KEY: &str = "theme";
pub const CONVERSATIONS_KEY: &str = "dlp_conversations";
pub const LEGACY_HISTORY_KEY: &str = "dlp_history";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("storage I/O failed: {0}")]
    Io(#[from] io::Error),

    #[error("failed to encode stored value: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("browser storage failed: {0}")]
    Browser(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str) -> StoreResult<()>;
    fn delete(&mut self, key: &str) -> StoreResult<()>;
    fn keys(&self) -> Vec<String>;
    fn clear(&mut self) -> StoreResult<()>;
}

// ============================================
// Backends
// ============================================

/// In-process storage. Used in tests.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> StoreResult<()> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn delete(&mut self, key: &str) -> StoreResult<()> {
        self.entries.remove(key);
        Ok(())
    }

    fn keys(&self) -> Vec<String> {
        self.entries.keys().cloned().collect()
    }

    fn clear(&mut self) -> StoreResult<()> {
        self.entries.clear();
        Ok(())
    }
}

/// One JSON file per key inside a namespace directory.
#[derive(Clone, Debug)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Store under the platform data dir, e.g. `~/.local/share/dlpchat/<namespace>`.
    pub fn for_namespace(namespace: &str) -> Self {
        let safe = sanitize_segment(namespace);
        let dir = match dirs::data_local_dir() {
            Some(data_dir) => data_dir.join("dlpchat").join(safe),
            None => PathBuf::from("cache").join(safe),
        };
        Self { dir }
    }

    pub fn at(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", sanitize_key(key)))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        fs::read_to_string(self.path_for(key)).ok()
    }

    fn set(&mut self, key: &str, value: &str) -> StoreResult<()> {
        fs::create_dir_all(&self.dir)?;
        fs::write(self.path_for(key), value)?;
        Ok(())
    }

    fn delete(&mut self, key: &str) -> StoreResult<()> {
        let path = self.path_for(key);
        if path.exists() {
            fs::remove_file(path)?;
        }
        Ok(())
    }

    fn keys(&self) -> Vec<String> {
        fs::read_dir(&self.dir)
            .map(|entries| {
                entries
                    .flatten()
                    .filter_map(|entry| {
                        let path = entry.path();
                        if path.extension().and_then(|e| e.to_str()) != Some("json") {
                            return None;
                        }
                        path.file_stem()
                            .and_then(|s| s.to_str())
                            .map(|s| s.to_string())
                    })
                    .collect()
            })
            .unwrap_or_default()
    }

    fn clear(&mut self) -> StoreResult<()> {
        if self.dir.exists() {
            fs::remove_dir_all(&self.dir)?;
        }
        Ok(())
    }
}

/// Keys of the default namespace are stored bare so data written by the
/// plain web page under the same origin stays readable.
#[cfg_attr(not(target_arch = "wasm32"), allow(dead_code))]
fn namespace_prefix(namespace: &str) -> String {
    let safe = sanitize_segment(namespace);
    if safe.is_empty() || safe == "default" {
        String::new()
    } else {
        format!("{safe}:")
    }
}

#[cfg_attr(not(target_arch = "wasm32"), allow(dead_code))]
fn strip_namespace<'a>(prefix: &str, raw_key: &'a str) -> Option<&'a str> {
    let key = raw_key.strip_prefix(prefix)?;
    // Other namespaces share the bare key space; skip their entries.
    if prefix.is_empty() && key.contains(':') {
        None
    } else {
        Some(key)
    }
}

#[cfg(target_arch = "wasm32")]
mod web {
    use super::{KeyValueStore, StoreError, StoreResult, namespace_prefix, strip_namespace};

    /// Browser `localStorage`, one entry per key.
    #[derive(Clone, Debug)]
    pub struct WebStore {
        prefix: String,
    }

    impl WebStore {
        pub fn for_namespace(namespace: &str) -> Self {
            Self {
                prefix: namespace_prefix(namespace),
            }
        }

        fn storage() -> StoreResult<web_sys::Storage> {
            let window =
                web_sys::window().ok_or_else(|| StoreError::Browser("no window".to_string()))?;
            window
                .local_storage()
                .map_err(|_| StoreError::Browser("failed to access local storage".to_string()))?
                .ok_or_else(|| StoreError::Browser("local storage disabled".to_string()))
        }

        fn full_key(&self, key: &str) -> String {
            format!("{}{}", self.prefix, key)
        }
    }

    impl KeyValueStore for WebStore {
        fn get(&self, key: &str) -> Option<String> {
            Self::storage()
                .ok()?
                .get_item(&self.full_key(key))
                .ok()
                .flatten()
        }

        fn set(&mut self, key: &str, value: &str) -> StoreResult<()> {
            Self::storage()?
                .set_item(&self.full_key(key), value)
                .map_err(|_| StoreError::Browser(format!("failed to write {key}")))
        }

        fn delete(&mut self, key: &str) -> StoreResult<()> {
            Self::storage()?
                .remove_item(&self.full_key(key))
                .map_err(|_| StoreError::Browser(format!("failed to remove {key}")))
        }

        fn keys(&self) -> Vec<String> {
            let Ok(storage) = Self::storage() else {
                return Vec::new();
            };
            let len = storage.length().unwrap_or(0);
            (0..len)
                .filter_map(|i| storage.key(i).ok().flatten())
                .filter_map(|raw| strip_namespace(&self.prefix, &raw).map(str::to_string))
                .collect()
        }

        fn clear(&mut self) -> StoreResult<()> {
            for key in self.keys() {
                self.delete(&key)?;
            }
            Ok(())
        }
    }
}

#[cfg(target_arch = "wasm32")]
pub use web::WebStore;

#[cfg(not(target_arch = "wasm32"))]
pub type PlatformStore = FileStore;

#[cfg(target_arch = "wasm32")]
pub type PlatformStore = WebStore;

#[cfg(not(target_arch = "wasm32"))]
pub fn platform_store(namespace: &str) -> PlatformStore {
    FileStore::for_namespace(namespace)
}

#[cfg(target_arch = "wasm32")]
pub fn platform_store(namespace: &str) -> PlatformStore {
    WebStore::for_namespace(namespace)
}

fn sanitize_segment(raw: &str) -> String {
    raw.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

fn sanitize_key(key: &str) -> String {
    sanitize_segment(key).chars().take(64).collect()
}

// ============================================
// Typed adapter
// ============================================

/// One exchange from the flat history list kept by older builds.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LegacyExchange {
    pub user: String,
    pub bot: String,
    /// ISO-8601 string as written by the browser.
    #[serde(default)]
    pub timestamp: Option<String>,
}

#[derive(Clone, Debug, Default)]
pub struct LocalStore<S> {
    inner: S,
}

impl<S: KeyValueStore> LocalStore<S> {
    pub fn new(inner: S) -> Self {
        Self { inner }
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }

    pub fn load_theme(&self) -> ThemeMode {
        ThemeMode::from_flag(self.inner.get(THEME_KEY).as_deref())
    }

    pub fn save_theme(&mut self, mode: ThemeMode) -> StoreResult<()> {
        self.inner.set(THEME_KEY, mode.as_str())
    }

    pub fn load_conversations(&self) -> Vec<Conversation> {
        let Some(raw) = self.inner.get(CONVERSATIONS_KEY) else {
            return Vec::new();
        };
        match serde_json::from_str(&raw) {
            Ok(list) => list,
            Err(err) => {
                warn!("discarding unreadable conversation list: {}", err);
                Vec::new()
            }
        }
    }

    pub fn save_conversations(&mut self, conversations: &[Conversation]) -> StoreResult<()> {
        let json = serde_json::to_string(conversations)?;
        self.inner.set(CONVERSATIONS_KEY, &json)?;
        debug!("persisted {} conversations", conversations.len());
        Ok(())
    }

    /// Read and remove the legacy flat history, if any.
    pub fn take_legacy_history(&mut self) -> Vec<LegacyExchange> {
        let Some(raw) = self.inner.get(LEGACY_HISTORY_KEY) else {
            return Vec::new();
        };
        let history = serde_json::from_str(&raw).unwrap_or_else(|err| {
            warn!("could not load saved history: {}", err);
            Vec::new()
        });
        if let Err(err) = self.inner.delete(LEGACY_HISTORY_KEY) {
            warn!("failed to drop legacy history key: {}", err);
        }
        history
    }
}
