//! Run-wide state threaded through every job.

use std::collections::HashSet;
use std::path::PathBuf;

use crate::domain::document::{Definitions, DependencySpec};
use crate::domain::error::DomainError;
use crate::domain::variables::{VariableTable, Variables};

/// Flags supplied by the caller for one run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunOptions {
    /// Overwrite colliding files without asking.
    pub force: bool,
    /// Extra base directory (a path template) for the root document's jobs.
    pub extend_path: Option<String>,
}

/// Dependencies collected during a run, installed after it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PendingDependencies {
    pub packages: Vec<DependencySpec>,
    pub registry: Vec<String>,
}

impl PendingDependencies {
    pub fn is_empty(&self) -> bool {
        self.packages.is_empty() && self.registry.is_empty()
    }

    pub fn add_packages(&mut self, names: impl IntoIterator<Item = String>) {
        self.packages
            .extend(names.into_iter().map(DependencySpec::Package));
    }

    pub fn add_registry(&mut self, names: impl IntoIterator<Item = String>) {
        self.registry.extend(names);
    }
}

#[derive(Debug, Clone, Default)]
pub struct ExecutionContext {
    pub variables: Variables,
    pub pending: PendingDependencies,
    pub options: RunOptions,
    visited: HashSet<String>,
    completed: HashSet<String>,
}

impl ExecutionContext {
    pub fn new(store: VariableTable, options: RunOptions) -> Self {
        Self {
            variables: Variables::with_store(store),
            options,
            ..Self::default()
        }
    }

    /// Record a document reference. Returns `false` if it was already seen.
    pub fn mark_visited(&mut self, reference: &str) -> bool {
        self.visited.insert(reference.to_string())
    }

    pub fn is_visited(&self, reference: &str) -> bool {
        self.visited.contains(reference)
    }

    pub fn mark_completed(&mut self, id: &str) {
        self.completed.insert(id.to_string());
    }

    pub fn is_completed(&self, id: &str) -> bool {
        self.completed.contains(id)
    }

    /// What outlives the run: the store and the pending dependencies.
    pub fn finish(self) -> (VariableTable, PendingDependencies) {
        (self.variables.store, self.pending)
    }
}

/// Per-call view: where jobs write and which definitions `run` may reach.
#[derive(Debug, Clone)]
pub struct Frame<'a> {
    pub base: Option<PathBuf>,
    pub definitions: &'a Definitions,
    chain: Vec<String>,
}

impl<'a> Frame<'a> {
    pub fn new(base: Option<PathBuf>, definitions: &'a Definitions) -> Self {
        Self {
            base,
            definitions,
            chain: Vec::new(),
        }
    }

    /// Same definitions and chain, new base path.
    pub fn with_base(&self, base: Option<PathBuf>) -> Self {
        Self {
            base,
            definitions: self.definitions,
            chain: self.chain.clone(),
        }
    }

    /// Enter definition `target`, failing if it is already on the chain.
    pub fn enter(&self, target: &str) -> Result<Self, DomainError> {
        if self.chain.iter().any(|name| name == target) {
            let mut chain = self.chain.clone();
            chain.push(target.to_string());
            return Err(DomainError::DefinitionCycle { chain });
        }
        let mut chain = self.chain.clone();
        chain.push(target.to_string());
        Ok(Self {
            base: self.base.clone(),
            definitions: self.definitions,
            chain,
        })
    }
}
