//! Infrastructure adapters for Scaflo.
//!
//! This crate implements the ports defined in `scaflo-core::application::ports`.
//! It contains the I/O: the local filesystem, HTTP fetching and the store
//! file, plus in-memory and scripted doubles used by tests across the
//! workspace.

pub mod fetch;
pub mod filesystem;
pub mod prompt;
pub mod report;
pub mod store;

// Re-export commonly used adapters
pub use fetch::{HttpFetcher, StaticFetcher};
pub use filesystem::{LocalFilesystem, MemoryFilesystem};
pub use prompt::{Answer, ScriptedPrompter};
pub use report::{RecordingReporter, TracingReporter};
pub use store::{JsonStoreFile, MemoryStoreRepository};
