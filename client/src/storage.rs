//! File-backed local store.
//!
//! Plays the role browser local storage plays for the web shell: a small
//! JSON key/value map holding the session token pair, the UI language, and
//! the capped search history. Reads and writes go through an in-memory map
//! guarded by an `RwLock`; every mutation is flushed to disk via a sibling
//! temp file and rename so a crash never leaves a half-written store.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use serde_json::Value;
use thiserror::Error;
use tracing::warn;
use zeroize::Zeroize;

use crate::domain::language::Language;

/// Store key for the short-lived bearer token.
pub const KEY_ACCESS_TOKEN: &str = "access_token";
/// Store key for the long-lived refresh token.
pub const KEY_REFRESH_TOKEN: &str = "refresh_token";
/// Store key for the UI language preference.
pub const KEY_APP_LANGUAGE: &str = "appLanguage";
/// Store key for the search history list.
pub const KEY_SEARCH_HISTORY: &str = "polyglot_history";

/// Most recent searches kept in history.
pub const MAX_HISTORY_ITEMS: usize = 10;

/// Failures writing the store to disk. Reads never fail; an unreadable
/// store degrades to empty with a logged warning.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Filesystem write or rename failed.
    #[error("failed to persist local store at {path}: {source}")]
    Persist {
        /// Store file path.
        path: PathBuf,
        /// Underlying I/O failure.
        source: std::io::Error,
    },
    /// The in-memory map could not be serialised.
    #[error("failed to serialise local store: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Access/refresh token pair as kept in the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredTokens {
    /// Short-lived bearer token.
    pub access_token: String,
    /// Long-lived refresh token.
    pub refresh_token: String,
}

impl Drop for StoredTokens {
    fn drop(&mut self) {
        self.access_token.zeroize();
        self.refresh_token.zeroize();
    }
}

/// JSON-file-backed key/value store.
#[derive(Debug)]
pub struct LocalStore {
    path: PathBuf,
    values: RwLock<BTreeMap<String, Value>>,
}

impl LocalStore {
    /// Open the store at `path`, loading existing contents when present.
    ///
    /// Missing and malformed files both start the store empty; the latter
    /// logs a warning, matching the degrade-and-continue error policy.
    #[must_use]
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let values = match fs::read(&path) {
            Ok(bytes) => serde_json::from_slice(&bytes).unwrap_or_else(|error| {
                warn!(path = %path.display(), error = %error,
                    "local store is malformed, starting empty");
                BTreeMap::new()
            }),
            Err(_) => BTreeMap::new(),
        };
        Self {
            path,
            values: RwLock::new(values),
        }
    }

    /// Read one raw value.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<Value> {
        self.read_map().get(key).cloned()
    }

    /// Write one raw value and flush.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the flush fails; the in-memory value is
    /// kept either way.
    pub fn set(&self, key: &str, value: Value) -> Result<(), StoreError> {
        self.write_map().insert(key.to_owned(), value);
        self.flush()
    }

    /// Remove one value and flush.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the flush fails.
    pub fn remove(&self, key: &str) -> Result<(), StoreError> {
        self.write_map().remove(key);
        self.flush()
    }

    /// The persisted token pair, when both halves are present.
    #[must_use]
    pub fn tokens(&self) -> Option<StoredTokens> {
        let map = self.read_map();
        let access_token = map.get(KEY_ACCESS_TOKEN)?.as_str()?.to_owned();
        let refresh_token = map.get(KEY_REFRESH_TOKEN)?.as_str()?.to_owned();
        Some(StoredTokens {
            access_token,
            refresh_token,
        })
    }

    /// Persist a fresh token pair.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the flush fails.
    pub fn set_tokens(&self, access_token: &str, refresh_token: &str) -> Result<(), StoreError> {
        {
            let mut map = self.write_map();
            map.insert(KEY_ACCESS_TOKEN.to_owned(), Value::from(access_token));
            map.insert(KEY_REFRESH_TOKEN.to_owned(), Value::from(refresh_token));
        }
        self.flush()
    }

    /// Drop both tokens, wiping the removed values in place.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the flush fails; the tokens are gone from
    /// memory regardless.
    pub fn clear_tokens(&self) -> Result<(), StoreError> {
        {
            let mut map = self.write_map();
            for key in [KEY_ACCESS_TOKEN, KEY_REFRESH_TOKEN] {
                if let Some(Value::String(mut secret)) = map.remove(key) {
                    secret.zeroize();
                }
            }
        }
        self.flush()
    }

    /// The stored UI language, when valid.
    #[must_use]
    pub fn language(&self) -> Option<Language> {
        self.get(KEY_APP_LANGUAGE)?.as_str()?.parse().ok()
    }

    /// Persist the UI language preference.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the flush fails.
    pub fn set_language(&self, language: Language) -> Result<(), StoreError> {
        self.set(KEY_APP_LANGUAGE, Value::from(language.code()))
    }

    /// Search history, most recent first.
    #[must_use]
    pub fn history(&self) -> Vec<String> {
        self.get(KEY_SEARCH_HISTORY)
            .and_then(|value| serde_json::from_value(value).ok())
            .unwrap_or_default()
    }

    /// Push a search onto the history: deduplicated, most recent first,
    /// capped at [`MAX_HISTORY_ITEMS`]. Blank words are ignored.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the flush fails.
    pub fn push_history(&self, word: &str) -> Result<(), StoreError> {
        let word = word.trim();
        if word.is_empty() {
            return Ok(());
        }
        let mut history = self.history();
        history.retain(|entry| entry != word);
        history.insert(0, word.to_owned());
        history.truncate(MAX_HISTORY_ITEMS);
        self.set(KEY_SEARCH_HISTORY, serde_json::to_value(history)?)
    }

    fn flush(&self) -> Result<(), StoreError> {
        let bytes = serde_json::to_vec_pretty(&*self.read_map())?;
        let tmp_path = self.path.with_extension("tmp");
        let persist = |path: &Path| -> std::io::Result<()> {
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::write(&tmp_path, &bytes)?;
            fs::rename(&tmp_path, path)
        };
        persist(&self.path).map_err(|source| StoreError::Persist {
            path: self.path.clone(),
            source,
        })
    }

    fn read_map(&self) -> std::sync::RwLockReadGuard<'_, BTreeMap<String, Value>> {
        // Lock poisoning only happens if a writer panicked; recover the map.
        self.values.read().unwrap_or_else(|poison| poison.into_inner())
    }

    fn write_map(&self) -> std::sync::RwLockWriteGuard<'_, BTreeMap<String, Value>> {
        self.values
            .write()
            .unwrap_or_else(|poison| poison.into_inner())
    }
}
