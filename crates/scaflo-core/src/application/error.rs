//! Application layer errors.
//!
//! These are failures of the outside world as seen through the ports.
//! Problems with a document itself are `DomainError`s from `crate::domain`.

use std::path::PathBuf;
use thiserror::Error;

use crate::error::ErrorCategory;

/// Errors that occur while a run talks to its adapters.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ApplicationError {
    /// A remote document or content URL could not be fetched.
    #[error("Failed to fetch {url}: {reason}")]
    FetchFailed { url: String, reason: String },

    /// The user aborted a prompt.
    #[error("Cancelled by user")]
    Cancelled,

    /// Filesystem operation failed.
    #[error("Filesystem error at {path}: {reason}")]
    FilesystemError { path: PathBuf, reason: String },

    /// The persisted store could not be read or written.
    #[error("Store error at {path}: {reason}")]
    StoreFailed { path: PathBuf, reason: String },

    /// The package manager reported a failure.
    #[error("Dependency installation failed: {reason}")]
    InstallFailed { reason: String },
}

impl ApplicationError {
    pub fn filesystem(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        Self::FilesystemError {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    /// Get user-actionable suggestions.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::FetchFailed { url, .. } => vec![
                format!("Could not download: {}", url),
                "Check the URL and your network connection".into(),
                "Private GitHub files need `github_token` in the config".into(),
            ],
            Self::Cancelled => vec!["Nothing after the cancelled prompt was run".into()],
            Self::FilesystemError { path, .. } => vec![
                format!("Failed to access: {}", path.display()),
                "Check that you have write permissions".into(),
            ],
            Self::StoreFailed { path, .. } => vec![
                format!("Store file: {}", path.display()),
                "Fix or delete the file; it must hold a JSON object".into(),
            ],
            Self::InstallFailed { .. } => vec![
                "Files were written; install the dependencies manually".into(),
                "Or set `package_manager` in the config".into(),
            ],
        }
    }

    /// Get error category.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::FetchFailed { .. } => ErrorCategory::NotFound,
            Self::Cancelled => ErrorCategory::Cancelled,
            Self::FilesystemError { .. } | Self::InstallFailed { .. } => ErrorCategory::Internal,
            Self::StoreFailed { .. } => ErrorCategory::Configuration,
        }
    }
}
