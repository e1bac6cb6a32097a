//! Application layer for Scaflo.
//!
//! This layer contains:
//! - **Services**: the run itself (ScaffoldService) and its building blocks
//! - **Ports**: Interface definitions (traits) for external dependencies
//! - **Errors**: Application-specific error types
//!
//! The application layer drives the domain layer through the ports; the
//! rules of jobs, guards and paths live in `crate::domain`.

pub mod error;
pub mod ports;
pub mod services;

// Re-export main services
pub use services::{
    DocumentLoader, JobExecutor, PathResolver, ResolvedPath, RunSummary, ScaffoldService,
};

// Re-export port traits (for adapter implementation)
pub use ports::{
    ConfirmPrompt, DependencyInstaller, Fetcher, Filesystem, Prompter, Reporter, SelectPrompt,
    StoreRepository, TextPrompt,
};

pub use error::ApplicationError;
