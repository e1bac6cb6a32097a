//! Core domain layer for Scaflo.
//!
//! Pure logic only: documents and jobs, variable tables, `when` guards and
//! path templates. Prompting, fetching, file access and installation are
//! reached through the ports in [`crate::application::ports`].
//!
//! ## Hexagonal Architecture Compliance
//!
//! - **No async**: jobs run strictly one after another
//! - **No I/O**: no filesystem, network or terminal access
//! - **Parse, don't validate twice**: documents are checked once, when parsed

pub mod condition;
pub mod context;
pub mod document;
pub mod error;
pub mod path_template;
pub mod source;
pub mod variables;

pub use condition::{Condition, Literal, evaluate_when};
pub use context::{ExecutionContext, Frame, PendingDependencies, RunOptions};
pub use document::{
    Definitions, DependencySpec, Document, FileJob, FileWrite, GroupJob, Job, JobKind, LogLevel,
    QuestionJob, QuestionKind,
};
pub use error::{DomainError, ErrorCategory};
pub use path_template::{AskDirective, PathTemplate, Placeholder, Segment};
pub use source::{DocumentSource, is_url};
pub use variables::{Scope, VariableRef, VariableTable, Variables};
