//! Application ports (traits) for external dependencies.
//!
//! In hexagonal architecture, ports define interfaces that the application
//! needs from the outside world. Adapters in `scaflo-adapters` and the CLI
//! implement these.
//!
//! ## Port Types
//!
//! - **Driven (Output) Ports**: Called by application, implemented by infrastructure
//!   - `Filesystem`: file reads and writes under the working root
//!   - `Fetcher`: remote documents and content
//!   - `Prompter`: interactive questions
//!   - `Reporter`: user-facing messages
//!   - `StoreRepository`: the persisted `store` table
//!   - `DependencyInstaller`: the package manager
//!
//! - **Driving (Input) Ports**: Called by external world, implemented by application
//!   - `ScaffoldService::run`

pub mod output;

pub use output::{
    ConfirmPrompt, DependencyInstaller, Fetcher, Filesystem, Prompter, Reporter, SelectPrompt,
    StoreRepository, TextPrompt,
};

#[cfg(test)]
pub use output::{
    MockDependencyInstaller, MockFetcher, MockFilesystem, MockPrompter, MockReporter,
    MockStoreRepository,
};
