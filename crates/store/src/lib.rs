//! File-backed key-value store
//!
//! Each key is one `<key>.json` file inside a data directory. Writes go to a
//! temporary file in the same directory first and are then renamed over the
//! target, so a crash mid-write leaves the previous value intact.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use blockfall_core::{KeyValueStore, StoreError};

/// Directory name used under the platform data directory
pub const APP_DIR: &str = "blockfall";

/// Fallback used when the platform has no data directory
pub const FALLBACK_DIR: &str = ".blockfall";

#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Store rooted at `dir`. The directory is created on first write.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// `<platform data dir>/blockfall`, or `.blockfall` in the working
    /// directory when there is none
    pub fn default_dir() -> PathBuf {
        dirs::data_dir()
            .map(|d| d.join(APP_DIR))
            .unwrap_or_else(|| PathBuf::from(FALLBACK_DIR))
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// File that holds `key`
    pub fn path_for(&self, key: &str) -> Result<PathBuf, StoreError> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !valid {
            return Err(StoreError::Unavailable(format!("invalid key {key:?}")));
        }
        Ok(self.dir.join(format!("{key}.json")))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let path = self.path_for(key)?;
        match fs::read_to_string(&path) {
            Ok(text) => {
                tracing::debug!(?path, bytes = text.len(), "read");
                Ok(Some(text))
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        let path = self.path_for(key)?;
        fs::create_dir_all(&self.dir)?;

        let temp_path = path.with_extension("json.tmp");
        fs::write(&temp_path, value)?;
        if let Err(e) = fs::rename(&temp_path, &path) {
            let _ = fs::remove_file(&temp_path);
            return Err(e.into());
        }

        tracing::debug!(?path, bytes = value.len(), "written atomically");
        Ok(())
    }
}
