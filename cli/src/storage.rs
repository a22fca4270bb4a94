use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use pairup_protocol::StorageKey;
use serde::Serialize;
use serde::de::DeserializeOwned;

/// Key-value store keeping one JSON file per key in a directory.
#[derive(Clone, Debug)]
pub(crate) struct Store {
    dir: PathBuf,
}

impl Store {
    pub(crate) fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// `<local data dir>/pairup`, or `./pairup` when the platform has none.
    pub(crate) fn default_dir() -> PathBuf {
        dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("pairup")
    }

    pub(crate) fn dir(&self) -> &Path {
        &self.dir
    }

    fn path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }

    /// `Ok(None)` when nothing is stored yet.
    pub(crate) fn load<T: StorageKey + DeserializeOwned>(&self) -> Result<Option<T>> {
        let path = self.path(T::KEY);
        let json = match fs::read_to_string(&path) {
            Ok(json) => json,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
            Err(err) => {
                return Err(err).with_context(|| format!("reading {}", path.display()));
            }
        };
        let value = serde_json::from_str(&json)
            .with_context(|| format!("decoding {}", path.display()))?;
        Ok(Some(value))
    }

    /// Like [`load`](Self::load), falling back to the default on any failure.
    pub(crate) fn load_or_default<T: StorageKey + DeserializeOwned + Default>(&self) -> T {
        match self.load() {
            Ok(value) => value.unwrap_or_default(),
            Err(err) => {
                log::error!("Could not load {}: {err:#}", T::KEY);
                T::default()
            }
        }
    }

    pub(crate) fn save<T: StorageKey + Serialize>(&self, value: &T) -> Result<()> {
        fs::create_dir_all(&self.dir)
            .with_context(|| format!("creating {}", self.dir.display()))?;
        let path = self.path(T::KEY);
        let json = serde_json::to_string_pretty(value)?;
        fs::write(&path, json).with_context(|| format!("writing {}", path.display()))?;
        log::trace!("Stored {}", T::KEY);
        Ok(())
    }

    /// Returns whether anything was removed.
    pub(crate) fn delete<T: StorageKey>(&self) -> Result<bool> {
        let path = self.path(T::KEY);
        match fs::remove_file(&path) {
            Ok(()) => Ok(true),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(false),
            Err(err) => Err(err).with_context(|| format!("removing {}", path.display())),
        }
    }
}
