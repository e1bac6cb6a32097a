//! Unified error handling for Scaflo Core.
//!
//! This module provides a unified error type that wraps domain and application
//! errors, with user-actionable suggestions.

use thiserror::Error;

use crate::application::ApplicationError;
use crate::domain::DomainError;

/// Root error type for Scaflo Core operations.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ScafloError {
    /// The document is malformed or a guard cannot be evaluated.
    #[error("{0}")]
    Domain(#[from] DomainError),

    /// An adapter failed (fetch, prompt, filesystem, store, install).
    #[error("{0}")]
    Application(#[from] ApplicationError),

    /// Configuration or setup errors.
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// Unexpected internal errors (bugs).
    #[error("Internal error: {message}. This is a bug, please report it.")]
    Internal { message: String },
}

impl ScafloError {
    /// Get user-actionable suggestions for fixing this error.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::Domain(e) => e.suggestions(),
            Self::Application(e) => e.suggestions(),
            Self::Configuration { message } => vec![
                format!("Configuration issue: {}", message),
                "Run `scaflo config list` to inspect the active settings".into(),
            ],
            Self::Internal { .. } => vec!["This appears to be a bug in Scaflo".into()],
        }
    }

    /// Get error category for display/styling purposes.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Domain(e) => match e.category() {
                crate::domain::ErrorCategory::Structural => ErrorCategory::Document,
                crate::domain::ErrorCategory::Expression => ErrorCategory::Document,
                crate::domain::ErrorCategory::NotFound => ErrorCategory::NotFound,
            },
            Self::Application(e) => e.category(),
            Self::Configuration { .. } => ErrorCategory::Configuration,
            Self::Internal { .. } => ErrorCategory::Internal,
        }
    }

    /// `true` when the user aborted a prompt.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Application(ApplicationError::Cancelled))
    }
}

/// Error categories for UI display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Document,
    NotFound,
    Cancelled,
    Configuration,
    Internal,
}

/// Convenient result type alias.
pub type ScafloResult<T> = Result<T, ScafloError>;
