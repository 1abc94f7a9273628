//! Durable storage for named lists of strings.
//!
//! History and bookmarks are persisted through [`KeyValueStore`]; the local
//! backend keeps its favorite set in one as well.

use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("failed to serialize state: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// Named string lists that survive restarts.
pub trait KeyValueStore {
    /// Read the list stored under `key`. A key never written reads as empty.
    fn load_list(&self, key: &str) -> Result<Vec<String>, StoreError>;
    /// Overwrite the list stored under `key`.
    fn save_list(&self, key: &str, values: &[String]) -> Result<(), StoreError>;
}

/// A TOML file holding one array per key.
#[derive(Debug, Clone)]
pub struct TomlFileStore {
    path: PathBuf,
}

impl TomlFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> Result<BTreeMap<String, Vec<String>>, StoreError> {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(BTreeMap::new()),
            Err(source) => {
                return Err(StoreError::Io {
                    path: self.path.clone(),
                    source,
                });
            }
        };
        toml::from_str(&text).map_err(|source| StoreError::Parse {
            path: self.path.clone(),
            source,
        })
    }

    fn write_all(&self, lists: &BTreeMap<String, Vec<String>>) -> Result<(), StoreError> {
        let io_err = |source| StoreError::Io {
            path: self.path.clone(),
            source,
        };

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(io_err)?;
        }
        let text = toml::to_string(lists)?;

        // Write next to the target and swap, so a crash never leaves half a file.
        let tmp = self.path.with_extension("toml.tmp");
        fs::write(&tmp, text).map_err(io_err)?;
        fs::rename(&tmp, &self.path).map_err(io_err)
    }
}

impl KeyValueStore for TomlFileStore {
    fn load_list(&self, key: &str) -> Result<Vec<String>, StoreError> {
        Ok(self.read_all()?.remove(key).unwrap_or_default())
    }

    fn save_list(&self, key: &str, values: &[String]) -> Result<(), StoreError> {
        let mut lists = self.read_all()?;
        lists.insert(key.to_string(), values.to_vec());
        self.write_all(&lists)
    }
}

/// In-memory store for tests.
#[cfg(test)]
#[derive(Debug, Default)]
pub struct MemoryStore {
    lists: std::cell::RefCell<BTreeMap<String, Vec<String>>>,
}

#[cfg(test)]
impl KeyValueStore for MemoryStore {
    fn load_list(&self, key: &str) -> Result<Vec<String>, StoreError> {
        Ok(self.lists.borrow().get(key).cloned().unwrap_or_default())
    }

    fn save_list(&self, key: &str, values: &[String]) -> Result<(), StoreError> {
        self.lists
            .borrow_mut()
            .insert(key.to_string(), values.to_vec());
        Ok(())
    }
}
