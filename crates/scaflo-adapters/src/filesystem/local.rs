//! Local filesystem adapter using std::fs.

use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use scaflo_core::{
    application::{ApplicationError, ports::Filesystem},
    error::{ScafloError, ScafloResult},
};
use tracing::trace;

/// Production filesystem rooted at a working directory.
///
/// Relative paths are joined onto the root; absolute paths are used as-is.
#[derive(Debug, Clone)]
pub struct LocalFilesystem {
    root: PathBuf,
}

impl LocalFilesystem {
    /// Create a local filesystem adapter rooted at `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Rooted at the process's current directory.
    pub fn current_dir() -> ScafloResult<Self> {
        let root = std::env::current_dir().map_err(|e| map_io_error(Path::new("."), e, "read current directory"))?;
        Ok(Self::new(root))
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.root.join(path)
        }
    }

    fn ensure_parent(&self, full: &Path) -> ScafloResult<()> {
        match full.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => std::fs::create_dir_all(parent)
                .map_err(|e| map_io_error(parent, e, "create directory")),
            _ => Ok(()),
        }
    }
}

impl Default for LocalFilesystem {
    fn default() -> Self {
        Self::new(".")
    }
}

impl Filesystem for LocalFilesystem {
    fn exists(&self, path: &Path) -> bool {
        self.resolve(path).exists()
    }

    fn is_dir(&self, path: &Path) -> bool {
        self.resolve(path).is_dir()
    }

    fn read_to_string(&self, path: &Path) -> ScafloResult<String> {
        let full = self.resolve(path);
        std::fs::read_to_string(&full).map_err(|e| map_io_error(&full, e, "read file"))
    }

    fn write_file(&self, path: &Path, content: &str) -> ScafloResult<()> {
        let full = self.resolve(path);
        self.ensure_parent(&full)?;
        trace!(path = %full.display(), bytes = content.len(), "write");
        std::fs::write(&full, content).map_err(|e| map_io_error(&full, e, "write file"))
    }

    fn append_file(&self, path: &Path, content: &str) -> ScafloResult<()> {
        let full = self.resolve(path);
        self.ensure_parent(&full)?;
        trace!(path = %full.display(), bytes = content.len(), "append");
        OpenOptions::new()
            .create(true)
            .append(true)
            .open(&full)
            .and_then(|mut file| file.write_all(content.as_bytes()))
            .map_err(|e| map_io_error(&full, e, "append to file"))
    }
}

fn map_io_error(path: &Path, e: io::Error, operation: &str) -> ScafloError {
    ApplicationError::FilesystemError {
        path: path.to_path_buf(),
        reason: format!("Failed to {}: {}", operation, e),
    }
    .into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn writes_are_rooted_and_create_parents() {
        let temp = TempDir::new().unwrap();
        let fs = LocalFilesystem::new(temp.path());

        fs.write_file(Path::new("src/components/Button.tsx"), "x").unwrap();

        assert!(temp.path().join("src/components/Button.tsx").is_file());
        assert!(fs.is_dir(Path::new("src")));
        assert!(fs.exists(Path::new("src/components/Button.tsx")));
    }

    #[test]
    fn append_creates_then_extends() {
        let temp = TempDir::new().unwrap();
        let fs = LocalFilesystem::new(temp.path());

        fs.append_file(Path::new("notes/log.txt"), "a").unwrap();
        fs.append_file(Path::new("notes/log.txt"), "b").unwrap();

        assert_eq!(fs.read_to_string(Path::new("notes/log.txt")).unwrap(), "ab");
    }

    #[test]
    fn absolute_paths_bypass_the_root() {
        let root = TempDir::new().unwrap();
        let elsewhere = TempDir::new().unwrap();
        let target = elsewhere.path().join("out.txt");
        let fs = LocalFilesystem::new(root.path());

        fs.write_file(&target, "abs").unwrap();
        assert_eq!(std::fs::read_to_string(&target).unwrap(), "abs");
    }

    #[test]
    fn missing_files_are_filesystem_errors() {
        let temp = TempDir::new().unwrap();
        let fs = LocalFilesystem::new(temp.path());

        let err = fs.read_to_string(Path::new("nope.txt")).unwrap_err();
        assert!(matches!(
            err,
            ScafloError::Application(ApplicationError::FilesystemError { .. })
        ));
    }
}
