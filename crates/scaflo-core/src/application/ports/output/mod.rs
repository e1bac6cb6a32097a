//! Driven (output) ports - implemented by infrastructure.
//!
//! These traits define what a run needs from the outside world. The
//! `scaflo-adapters` crate provides implementations; the CLI adds the
//! terminal-facing ones (dialoguer prompter, styled reporter, installer).

use std::path::Path;

use serde_json::Value;

use crate::application::ApplicationError;
use crate::domain::{DependencySpec, LogLevel, VariableTable};
use crate::error::ScafloResult;

/// Port for filesystem operations.
///
/// Implemented by:
/// - `scaflo_adapters::filesystem::LocalFilesystem` (production)
/// - `scaflo_adapters::filesystem::MemoryFilesystem` (testing)
///
/// Relative paths are resolved against the working root the adapter was
/// created with; absolute paths are used as-is.
#[cfg_attr(test, mockall::automock)]
pub trait Filesystem: Send + Sync {
    fn exists(&self, path: &Path) -> bool;

    fn is_dir(&self, path: &Path) -> bool;

    fn read_to_string(&self, path: &Path) -> ScafloResult<String>;

    /// Write (truncate) a file, creating parent directories.
    fn write_file(&self, path: &Path, content: &str) -> ScafloResult<()>;

    /// Append to a file, creating it and its parent directories.
    fn append_file(&self, path: &Path, content: &str) -> ScafloResult<()>;
}

/// Port for remote documents and content.
#[cfg_attr(test, mockall::automock)]
pub trait Fetcher: Send + Sync {
    /// GET `url` and return the body. Non-success statuses are errors.
    fn fetch_text(&self, url: &str) -> ScafloResult<String>;

    /// GET `url` and parse the body as JSON.
    fn fetch_json(&self, url: &str) -> ScafloResult<Value> {
        let body = self.fetch_text(url)?;
        serde_json::from_str(&body).map_err(|e| {
            ApplicationError::FetchFailed {
                url: url.to_string(),
                reason: format!("invalid JSON: {e}"),
            }
            .into()
        })
    }
}

/// A free-text question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextPrompt {
    pub message: String,
    pub default: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfirmPrompt {
    pub message: String,
    pub default: bool,
}

/// A single choice among `(value, label)` pairs, in display order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectPrompt {
    pub message: String,
    pub options: Vec<(String, String)>,
    /// Value preselected in the list.
    pub default: Option<String>,
}

/// Port for interactive questions.
///
/// Every method blocks until answered; a user abort is
/// `ApplicationError::Cancelled`.
#[cfg_attr(test, mockall::automock)]
pub trait Prompter: Send + Sync {
    /// Raw answer; the caller trims and applies defaults.
    fn text(&self, prompt: &TextPrompt) -> ScafloResult<String>;

    fn confirm(&self, prompt: &ConfirmPrompt) -> ScafloResult<bool>;

    /// Returns the chosen value.
    fn select(&self, prompt: &SelectPrompt) -> ScafloResult<String>;
}

/// Port for user-facing messages (`log` jobs, warnings, progress).
#[cfg_attr(test, mockall::automock)]
pub trait Reporter: Send + Sync {
    fn report(&self, level: LogLevel, message: &str);
}

/// Port for the persisted `store` table.
#[cfg_attr(test, mockall::automock)]
pub trait StoreRepository: Send + Sync {
    /// A missing store is an empty table.
    fn load(&self) -> ScafloResult<VariableTable>;

    fn save(&self, table: &VariableTable) -> ScafloResult<()>;
}

/// Port for the package manager.
#[cfg_attr(test, mockall::automock)]
pub trait DependencyInstaller: Send + Sync {
    fn install_packages(&self, packages: &[DependencySpec]) -> ScafloResult<()>;

    /// Registry components (shadcn-style `add`).
    fn install_registry(&self, components: &[String]) -> ScafloResult<()>;
}
