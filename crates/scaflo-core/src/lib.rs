//! Scaflo Core - Hexagonal Architecture Implementation
//!
//! This crate provides the domain and application layers of the Scaflo
//! scaffold job interpreter, following hexagonal (ports and adapters)
//! architecture.
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │           scaflo-cli (CLI)              │
//! │  (clap, dialoguer prompter, installer)  │
//! └──────────────────┬──────────────────────┘
//!                    │ calls
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │         Application Services            │
//! │  ScaffoldService → DocumentLoader →     │
//! │  JobExecutor → PathResolver             │
//! └──────────────────┬──────────────────────┘
//!                    │ uses
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │      Application Ports (Traits)         │
//! │  Filesystem, Fetcher, Prompter,         │
//! │  Reporter, StoreRepository, Installer   │
//! └──────────────────┬──────────────────────┘
//!                    │ implemented by
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │     scaflo-adapters (Infrastructure)    │
//! │  LocalFilesystem, HttpFetcher,          │
//! │  JsonStoreFile, in-memory doubles       │
//! └─────────────────────────────────────────┘
//!                    │
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │         Domain Layer (Pure Logic)       │
//! │  Document, Job, Variables, Condition,   │
//! │  PathTemplate, ExecutionContext         │
//! └─────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,no_run
//! use scaflo_core::prelude::*;
//!
//! # fn demo(service: ScaffoldService, installer: &dyn DependencyInstaller) -> ScafloResult<()> {
//! let summary = service.run("https://example.com/button.json", RunOptions::default())?;
//! service.install(installer, &summary.pending)?;
//! # Ok(())
//! # }
//! ```

pub mod domain;

pub mod application;

pub mod error;

// Public API - what external crates should use
pub mod prelude {
    pub use crate::application::{
        ApplicationError, RunSummary, ScaffoldService,
        ports::{
            ConfirmPrompt, DependencyInstaller, Fetcher, Filesystem, Prompter, Reporter,
            SelectPrompt, StoreRepository, TextPrompt,
        },
    };
    pub use crate::domain::{
        DependencySpec, Document, DomainError, LogLevel, PendingDependencies, RunOptions,
        VariableTable,
    };
    pub use crate::error::{ScafloError, ScafloResult};
}

// Version info
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
