//! Application services - orchestrate use cases.
//!
//! `ScaffoldService` drives a run; the loader, executor and path resolver
//! are the layers it delegates to, each borrowing the same ports.

pub mod executor;
pub mod loader;
pub mod path_resolver;
pub mod scaffold_service;

pub use executor::JobExecutor;
pub use loader::DocumentLoader;
pub use path_resolver::{PathResolver, ResolvedPath};
pub use scaffold_service::{RunSummary, ScaffoldService};
