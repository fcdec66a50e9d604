//! Key/value preference storage.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use nsconf_core::config::PrefsConfig;

use crate::error::{PrefsError, PrefsResult};

pub trait PreferenceStorage: Send + Sync {
    fn get(&self, key: &str) -> PrefsResult<Option<String>>;
    fn set(&self, key: &str, value: &str) -> PrefsResult<()>;
}

/// Flat JSON object of string values on disk. A missing file reads as empty.
#[derive(Debug, Clone)]
pub struct JsonFileStorage {
    path: PathBuf,
}

impl JsonFileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn from_config(config: &PrefsConfig) -> Self {
        Self::new(config.resolved_path())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: std::io::Error) -> PrefsError {
        PrefsError::Io {
            path: self.path.clone(),
            source,
        }
    }

    fn read_all(&self) -> PrefsResult<BTreeMap<String, String>> {
        match std::fs::read_to_string(&self.path) {
            Ok(contents) => Ok(serde_json::from_str(&contents)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(e) => Err(self.io_error(e)),
        }
    }
}

impl PreferenceStorage for JsonFileStorage {
    fn get(&self, key: &str) -> PrefsResult<Option<String>> {
        Ok(self.read_all()?.remove(key))
    }

    fn set(&self, key: &str, value: &str) -> PrefsResult<()> {
        let mut values = self.read_all()?;
        values.insert(key.to_string(), value.to_string());
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| self.io_error(e))?;
        }
        let json = serde_json::to_string_pretty(&values)?;
        std::fs::write(&self.path, json).map_err(|e| self.io_error(e))
    }
}

#[derive(Debug, Default)]
pub struct MemoryStorage {
    values: Mutex<BTreeMap<String, String>>,
}

impl PreferenceStorage for MemoryStorage {
    fn get(&self, key: &str) -> PrefsResult<Option<String>> {
        let values = self.values.lock().unwrap_or_else(|e| e.into_inner());
        Ok(values.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> PrefsResult<()> {
        let mut values = self.values.lock().unwrap_or_else(|e| e.into_inner());
        values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_reads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let storage = JsonFileStorage::new(dir.path().join("prefs.json"));
        assert_eq!(storage.get("theme").unwrap(), None);
    }

    #[test]
    fn test_set_creates_parent_and_keeps_other_keys() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("prefs.json");
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, r#"{"other":"x"}"#).unwrap();

        let storage = JsonFileStorage::new(&path);
        storage.set("theme", "dark").unwrap();
        assert_eq!(storage.get("theme").unwrap().as_deref(), Some("dark"));
        assert_eq!(storage.get("other").unwrap().as_deref(), Some("x"));
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prefs.json");
        std::fs::write(&path, "not json").unwrap();
        assert!(matches!(
            JsonFileStorage::new(&path).get("theme"),
            Err(PrefsError::Malformed(_))
        ));
    }
}
