//! In-memory filesystem adapter for testing.

use std::{
    collections::{BTreeMap, BTreeSet},
    path::{Component, Path, PathBuf},
    sync::{Arc, RwLock},
};

use scaflo_core::{
    application::{ApplicationError, ports::Filesystem},
    error::{ScafloError, ScafloResult},
};

/// In-memory filesystem for testing.
///
/// Clones share the same contents, so a test can hand one clone to the
/// service and inspect the other.
#[derive(Debug, Clone, Default)]
pub struct MemoryFilesystem {
    inner: Arc<RwLock<MemoryFilesystemInner>>,
}

#[derive(Debug, Default)]
struct MemoryFilesystemInner {
    files: BTreeMap<PathBuf, String>,
    directories: BTreeSet<PathBuf>,
}

impl MemoryFilesystemInner {
    fn add_parents(&mut self, path: &Path) {
        let mut current = PathBuf::new();
        if let Some(parent) = path.parent() {
            for component in parent.components() {
                current.push(component);
                self.directories.insert(current.clone());
            }
        }
    }
}

impl MemoryFilesystem {
    /// Create a new empty memory filesystem.
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a file (and its parent directories).
    pub fn with_file(self, path: impl AsRef<Path>, content: impl Into<String>) -> Self {
        if let Ok(mut inner) = self.inner.write() {
            let path = normalize(path.as_ref());
            inner.add_parents(&path);
            inner.files.insert(path, content.into());
        }
        self
    }

    /// Seed a directory.
    pub fn with_dir(self, path: impl AsRef<Path>) -> Self {
        if let Ok(mut inner) = self.inner.write() {
            let path = normalize(path.as_ref());
            inner.add_parents(&path.join("_"));
        }
        self
    }

    /// Read a file's content (testing helper).
    pub fn read_file(&self, path: impl AsRef<Path>) -> Option<String> {
        let inner = self.inner.read().ok()?;
        inner.files.get(&normalize(path.as_ref())).cloned()
    }

    /// List all files, sorted.
    pub fn list_files(&self) -> Vec<PathBuf> {
        self.inner
            .read()
            .map(|inner| inner.files.keys().cloned().collect())
            .unwrap_or_default()
    }

    fn write(&self) -> ScafloResult<std::sync::RwLockWriteGuard<'_, MemoryFilesystemInner>> {
        self.inner.write().map_err(|_| ScafloError::Internal {
            message: "memory filesystem lock poisoned".into(),
        })
    }
}

impl Filesystem for MemoryFilesystem {
    fn exists(&self, path: &Path) -> bool {
        let path = normalize(path);
        self.inner
            .read()
            .map(|inner| inner.files.contains_key(&path) || inner.directories.contains(&path))
            .unwrap_or(false)
    }

    fn is_dir(&self, path: &Path) -> bool {
        let path = normalize(path);
        self.inner
            .read()
            .map(|inner| inner.directories.contains(&path))
            .unwrap_or(false)
    }

    fn read_to_string(&self, path: &Path) -> ScafloResult<String> {
        self.read_file(path).ok_or_else(|| {
            ApplicationError::FilesystemError {
                path: path.to_path_buf(),
                reason: "Failed to read file: not found".into(),
            }
            .into()
        })
    }

    fn write_file(&self, path: &Path, content: &str) -> ScafloResult<()> {
        let path = normalize(path);
        let mut inner = self.write()?;
        inner.add_parents(&path);
        inner.files.insert(path, content.to_string());
        Ok(())
    }

    fn append_file(&self, path: &Path, content: &str) -> ScafloResult<()> {
        let path = normalize(path);
        let mut inner = self.write()?;
        inner.add_parents(&path);
        inner.files.entry(path).or_default().push_str(content);
        Ok(())
    }
}

/// Drop `.` components so `./a` and `a` are the same entry.
fn normalize(path: &Path) -> PathBuf {
    path.components()
        .filter(|c| !matches!(c, Component::CurDir))
        .collect()
}
