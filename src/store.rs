//! Persistence of the task list in a key-value slot.
//!
//! The whole collection is one JSON array stored under [`TASKS_KEY`]. Two
//! backends are provided: [`FileStore`] keeps one file per key in a data
//! directory, [`MemoryStore`] keeps values in memory.

use std::collections::HashMap;
use std::fs::{self, File};
use std::io::Write;
use std::path::PathBuf;

use tracing::{debug, warn};

use crate::error::StoreError;
use crate::task::Task;

/// Key the task list is stored under.
pub const TASKS_KEY: &str = "tasks";

/// A durable string slot per key.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError>;
}

/// Stores each key as `<dir>/<key>.json`.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        FileStore { dir: dir.into() }
    }

    pub fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(s) => Ok(Some(s)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Atomic-ish write via temp file + rename. The temp file is removed if any step fails.
    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        fs::create_dir_all(&self.dir)?;
        let path = self.path_for(key);
        let tmp = path.with_extension("json.tmp");
        let write = || -> std::io::Result<()> {
            let mut f = File::create(&tmp)?;
            f.write_all(value.as_bytes())?;
            f.flush()?;
            fs::rename(&tmp, &path)
        };
        if let Err(e) = write() {
            let _ = fs::remove_file(&tmp);
            return Err(e.into());
        }
        Ok(())
    }
}

/// In-memory slots, optionally capped at a total byte size.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    values: HashMap<String, String>,
    quota: Option<usize>,
}

impl MemoryStore {
    pub fn new() -> Self {
        MemoryStore::default()
    }

    /// A store that rejects writes once the stored values would exceed `bytes`.
    pub fn with_quota(bytes: usize) -> Self {
        MemoryStore { values: HashMap::new(), quota: Some(bytes) }
    }

    fn used_except(&self, key: &str) -> usize {
        self.values.iter().filter(|(k, _)| k.as_str() != key).map(|(_, v)| v.len()).sum()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.values.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        if let Some(quota) = self.quota {
            let needed = self.used_except(key) + value.len();
            if needed > quota {
                return Err(StoreError::QuotaExceeded { needed, quota });
            }
        }
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Reads and writes the task list through a [`KeyValueStore`].
#[derive(Debug, Clone)]
pub struct TaskStore<S> {
    backend: S,
}

impl<S: KeyValueStore> TaskStore<S> {
    pub fn new(backend: S) -> Self {
        TaskStore { backend }
    }

    pub fn backend(&self) -> &S {
        &self.backend
    }

    /// `Ok(None)` when nothing has been stored yet.
    pub fn try_load(&self) -> Result<Option<Vec<Task>>, StoreError> {
        let Some(raw) = self.backend.get(TASKS_KEY)? else {
            return Ok(None);
        };
        let tasks: Vec<Task> = serde_json::from_str(&raw).map_err(StoreError::Corrupt)?;
        debug!(count = tasks.len(), "loaded tasks");
        Ok(Some(tasks))
    }

    /// Like [`try_load`](Self::try_load), but a read or decode failure is logged and treated as absent.
    pub fn load(&self) -> Option<Vec<Task>> {
        match self.try_load() {
            Ok(tasks) => tasks,
            Err(e) => {
                warn!(error = %e, "error loading tasks");
                None
            }
        }
    }

    /// Overwrite the stored list with `tasks`.
    pub fn save(&mut self, tasks: &[Task]) -> Result<(), StoreError> {
        let data = serde_json::to_string_pretty(tasks).map_err(StoreError::Serialize)?;
        self.backend.set(TASKS_KEY, &data)?;
        debug!(count = tasks.len(), "saved tasks");
        Ok(())
    }
}
