//! The persisted `store` table as a JSON file.

use std::path::{Path, PathBuf};

use scaflo_core::{
    application::{ApplicationError, ports::StoreRepository},
    domain::VariableTable,
    error::{ScafloError, ScafloResult},
};
use serde_json::Value;
use tracing::{debug, info};

/// Store backed by a pretty-printed JSON object on disk.
#[derive(Debug, Clone)]
pub struct JsonStoreFile {
    path: PathBuf,
}

impl JsonStoreFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn failed(&self, reason: impl ToString) -> ScafloError {
        ApplicationError::StoreFailed {
            path: self.path.clone(),
            reason: reason.to_string(),
        }
        .into()
    }
}

impl StoreRepository for JsonStoreFile {
    fn load(&self) -> ScafloResult<VariableTable> {
        if !self.path.exists() {
            debug!(path = %self.path.display(), "No store file yet");
            return Ok(VariableTable::new());
        }
        let text = std::fs::read_to_string(&self.path).map_err(|e| self.failed(e))?;
        if text.trim().is_empty() {
            return Ok(VariableTable::new());
        }
        let value: Value = serde_json::from_str(&text).map_err(|e| self.failed(e))?;
        VariableTable::from_json(value).ok_or_else(|| self.failed("expected a JSON object"))
    }

    fn save(&self, table: &VariableTable) -> ScafloResult<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| self.failed(e))?;
            }
        }
        let text = serde_json::to_string_pretty(table).map_err(|e| self.failed(e))?;
        std::fs::write(&self.path, text).map_err(|e| self.failed(e))?;
        info!(path = %self.path.display(), keys = table.len(), "Store saved");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn missing_file_is_an_empty_store() {
        let temp = TempDir::new().unwrap();
        let store = JsonStoreFile::new(temp.path().join("store.json"));
        assert!(store.load().unwrap().is_empty());
    }

    #[test]
    fn save_then_load() {
        let temp = TempDir::new().unwrap();
        let store = JsonStoreFile::new(temp.path().join("nested/dir/store.json"));

        let mut table = VariableTable::new();
        table.set("user.email", "ada@example.com");
        store.save(&table).unwrap();

        let loaded = store.load().unwrap();
        assert_eq!(loaded.get("user.email").as_deref(), Some("ada@example.com"));
    }

    #[test]
    fn non_object_store_is_rejected() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("store.json");
        std::fs::write(&path, "[1, 2]").unwrap();

        let err = JsonStoreFile::new(&path).load().unwrap_err();
        assert!(matches!(
            err,
            ScafloError::Application(ApplicationError::StoreFailed { .. })
        ));
    }
}
