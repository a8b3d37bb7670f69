//! Keyed string storage the board persists into.
//!
//! Entries mirror a browser's local storage: every value is a string, and the
//! task list is one JSON blob under a single key. The file backend keeps all
//! entries in one JSON object on disk.

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::error::Result;

pub const TASKS_KEY: &str = "tasks";
pub const ACTIVE_BOARD_KEY: &str = "activeBoard";
pub const SHOW_SIDEBAR_KEY: &str = "showSideBar";
pub const LIGHT_THEME_KEY: &str = "light-theme";

pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Replace the value under `key`. On error the previous value is kept.
    fn set(&mut self, key: &str, value: &str) -> Result<()>;
}

/// All entries in a single JSON file.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load_entries(&self) -> Result<BTreeMap<String, String>> {
        match fs::read_to_string(&self.path) {
            Ok(content) if content.trim().is_empty() => Ok(BTreeMap::new()),
            Ok(content) => Ok(serde_json::from_str(&content)?),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(e) => Err(e.into()),
        }
    }

    /// Write to a sibling file, then rename over the document.
    fn save_entries(&self, entries: &BTreeMap<String, String>) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let content = serde_json::to_string_pretty(entries)?;
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, content)?;
        if let Err(e) = fs::rename(&tmp, &self.path) {
            let _ = fs::remove_file(&tmp);
            return Err(e.into());
        }
        Ok(())
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.load_entries()?.remove(key))
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let mut entries = self.load_entries()?;
        entries.insert(key.to_string(), value.to_string());
        self.save_entries(&entries)?;
        tracing::debug!(key, path = %self.path.display(), "storage entry written");
        Ok(())
    }
}

#[cfg(test)]
pub use memory::MemoryStore;

#[cfg(test)]
mod memory {
    use super::*;

    /// In-memory store for tests. `fail_writes` simulates a full disk;
    /// `fail_after_writes` lets that many writes through first.
    #[derive(Debug, Default)]
    pub struct MemoryStore {
        pub entries: BTreeMap<String, String>,
        pub fail_writes: bool,
        pub fail_after_writes: Option<usize>,
    }

    impl KeyValueStore for MemoryStore {
        fn get(&self, key: &str) -> Result<Option<String>> {
            Ok(self.entries.get(key).cloned())
        }

        fn set(&mut self, key: &str, value: &str) -> Result<()> {
            if let Some(left) = self.fail_after_writes {
                if left == 0 {
                    self.fail_writes = true;
                } else {
                    self.fail_after_writes = Some(left - 1);
                }
            }
            if self.fail_writes {
                return Err(io::Error::new(io::ErrorKind::Other, "quota exceeded").into());
            }
            self.entries.insert(key.to_string(), value.to_string());
            Ok(())
        }
    }
}
