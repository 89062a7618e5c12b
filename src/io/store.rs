use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::Utc;

use crate::io::lock::{FileLock, LockError};
use crate::io::recovery::{self, RecoveryCategory, RecoveryEntry};
use crate::model::task::Task;

/// Key holding the serialized task list
pub const TASKS_KEY: &str = "todos";
/// Key holding the serialized theme flag
pub const THEME_KEY: &str = "darkMode";

/// Error type for store writes
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("could not write {path}: {source}")]
    WriteError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error(transparent)]
    Lock(#[from] LockError),
}

/// Local key-value persistence for serialized state.
///
/// Reads never fail: a missing or unreadable entry is simply absent.
/// Writes are best-effort; callers may ignore the result.
pub trait KeyValueStore {
    fn load(&self, key: &str) -> Option<String>;

    fn save(&mut self, key: &str, blob: &str) -> Result<(), StoreError>;

    /// Called when a loaded blob could not be decoded, before it is replaced
    /// by defaults. The default does nothing.
    fn report_unreadable(&self, _key: &str, _blob: &str, _reason: &str) {}

    /// Called when a task is deleted. The default does nothing.
    fn report_deleted(&self, _task: &Task) {}
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for Box<S> {
    fn load(&self, key: &str) -> Option<String> {
        (**self).load(key)
    }

    fn save(&mut self, key: &str, blob: &str) -> Result<(), StoreError> {
        (**self).save(key, blob)
    }

    fn report_unreadable(&self, key: &str, blob: &str, reason: &str) {
        (**self).report_unreadable(key, blob, reason)
    }

    fn report_deleted(&self, task: &Task) {
        (**self).report_deleted(task)
    }
}

// ---------------------------------------------------------------------------
// File store
// ---------------------------------------------------------------------------

/// One `<key>.json` file per key inside a data directory.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Open (creating if needed) a store rooted at `dir`
    pub fn open(dir: &Path) -> std::io::Result<Self> {
        fs::create_dir_all(dir)?;
        Ok(FileStore {
            dir: dir.to_path_buf(),
        })
    }

    /// File backing `key`
    pub fn key_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }
}

impl KeyValueStore for FileStore {
    fn load(&self, key: &str) -> Option<String> {
        let bytes = match fs::read(self.key_path(key)) {
            Ok(b) => b,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return None,
            Err(e) => {
                self.report_unreadable(key, "", &e.to_string());
                return None;
            }
        };
        match String::from_utf8(bytes) {
            Ok(text) => Some(text),
            Err(e) => {
                let lossy = String::from_utf8_lossy(e.as_bytes()).into_owned();
                self.report_unreadable(key, &lossy, "invalid UTF-8");
                None
            }
        }
    }

    fn save(&mut self, key: &str, blob: &str) -> Result<(), StoreError> {
        let path = self.key_path(key);
        let result = FileLock::acquire_default(&self.dir)
            .map_err(StoreError::from)
            .and_then(|_lock| {
                recovery::atomic_write(&path, blob.as_bytes()).map_err(|e| {
                    StoreError::WriteError {
                        path: path.clone(),
                        source: e,
                    }
                })
            });

        if let Err(ref e) = result {
            recovery::log_recovery(
                &self.dir,
                RecoveryEntry {
                    timestamp: Utc::now(),
                    category: RecoveryCategory::Write,
                    description: format!("could not save {}", key),
                    fields: vec![("Error".to_string(), e.to_string())],
                    body: blob.to_string(),
                },
            );
        }
        result
    }

    fn report_unreadable(&self, key: &str, blob: &str, reason: &str) {
        recovery::log_recovery_once(
            &self.dir,
            RecoveryEntry {
                timestamp: Utc::now(),
                category: RecoveryCategory::Parser,
                description: format!("unreadable {}", key),
                fields: vec![
                    ("Source".to_string(), format!("{}.json", key)),
                    ("Reason".to_string(), reason.to_string()),
                ],
                body: blob.to_string(),
            },
        );
    }

    fn report_deleted(&self, task: &Task) {
        recovery::log_task_deletion(&self.dir, task);
    }
}

// ---------------------------------------------------------------------------
// Memory store
// ---------------------------------------------------------------------------

/// In-process store, used for tests and for embedding without a disk.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a store with existing blobs
    pub fn with_entries<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        MemoryStore {
            entries: entries
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// Raw blob currently stored under `key`
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(|s| s.as_str())
    }
}

impl KeyValueStore for MemoryStore {
    fn load(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn save(&mut self, key: &str, blob: &str) -> Result<(), StoreError> {
        self.entries.insert(key.to_string(), blob.to_string());
        Ok(())
    }
}
