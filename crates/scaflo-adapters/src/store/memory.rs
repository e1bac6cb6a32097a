//! In-memory store repository.

use std::sync::{Arc, RwLock};

use scaflo_core::{
    application::ports::StoreRepository,
    domain::VariableTable,
    error::{ScafloError, ScafloResult},
};

/// Thread-safe in-memory store; clones share the table.
#[derive(Debug, Clone, Default)]
pub struct MemoryStoreRepository {
    inner: Arc<RwLock<VariableTable>>,
    saves: Arc<RwLock<usize>>,
}

impl MemoryStoreRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_table(table: VariableTable) -> Self {
        Self {
            inner: Arc::new(RwLock::new(table)),
            ..Self::default()
        }
    }

    /// Current table contents.
    pub fn snapshot(&self) -> VariableTable {
        self.inner.read().map(|t| t.clone()).unwrap_or_default()
    }

    /// How many times `save` was called.
    pub fn save_count(&self) -> usize {
        self.saves.read().map(|n| *n).unwrap_or_default()
    }
}

fn poisoned() -> ScafloError {
    ScafloError::Internal {
        message: "memory store lock poisoned".into(),
    }
}

impl StoreRepository for MemoryStoreRepository {
    fn load(&self) -> ScafloResult<VariableTable> {
        self.inner.read().map(|t| t.clone()).map_err(|_| poisoned())
    }

    fn save(&self, table: &VariableTable) -> ScafloResult<()> {
        *self.inner.write().map_err(|_| poisoned())? = table.clone();
        *self.saves.write().map_err(|_| poisoned())? += 1;
        Ok(())
    }
}
