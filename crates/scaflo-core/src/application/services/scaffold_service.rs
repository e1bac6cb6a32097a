//! Scaffold Service - main application orchestrator.
//!
//! One run end to end:
//! 1. Load the persisted store
//! 2. Load the root document and everything it depends on
//! 3. Persist the store (only if non-empty)
//! 4. Hand back the dependencies collected on the way
//!
//! Installing them is a separate step so the caller can ask first.

use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::{
    application::{
        ports::{DependencyInstaller, Fetcher, Filesystem, Prompter, Reporter, StoreRepository},
        services::{executor::JobExecutor, loader::DocumentLoader},
    },
    domain::{ExecutionContext, PendingDependencies, RunOptions},
    error::ScafloResult,
};

/// What a finished run leaves behind.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub pending: PendingDependencies,
    /// `true` if the store file was written.
    pub store_saved: bool,
}

/// Main scaffolding service.
pub struct ScaffoldService {
    filesystem: Box<dyn Filesystem>,
    fetcher: Box<dyn Fetcher>,
    prompter: Box<dyn Prompter>,
    reporter: Box<dyn Reporter>,
    store: Box<dyn StoreRepository>,
}

impl ScaffoldService {
    /// Create a new scaffold service with the given adapters.
    ///
    /// # Example
    ///
    /// ```rust,no_run
    /// use scaflo_core::application::ScaffoldService;
    /// use scaflo_core::domain::RunOptions;
    ///
    /// # fn demo(
    /// #     filesystem: Box<dyn scaflo_core::application::ports::Filesystem>,
    /// #     fetcher: Box<dyn scaflo_core::application::ports::Fetcher>,
    /// #     prompter: Box<dyn scaflo_core::application::ports::Prompter>,
    /// #     reporter: Box<dyn scaflo_core::application::ports::Reporter>,
    /// #     store: Box<dyn scaflo_core::application::ports::StoreRepository>,
    /// # ) -> scaflo_core::error::ScafloResult<()> {
    /// let service = ScaffoldService::new(filesystem, fetcher, prompter, reporter, store);
    /// let summary = service.run("scaffold.json", RunOptions::default())?;
    /// println!("{} packages to install", summary.pending.packages.len());
    /// # Ok(())
    /// # }
    /// ```
    pub fn new(
        filesystem: Box<dyn Filesystem>,
        fetcher: Box<dyn Fetcher>,
        prompter: Box<dyn Prompter>,
        reporter: Box<dyn Reporter>,
        store: Box<dyn StoreRepository>,
    ) -> Self {
        Self {
            filesystem,
            fetcher,
            prompter,
            reporter,
            store,
        }
    }

    /// Run the document at `source` (a path or URL).
    ///
    /// The store is persisted only after a successful run; answers given
    /// before a failure or cancellation are dropped.
    #[instrument(skip_all, fields(run_id = %Uuid::new_v4(), source = %source))]
    pub fn run(&self, source: &str, options: RunOptions) -> ScafloResult<RunSummary> {
        let store = self.store.load()?;
        info!(keys = store.len(), "Store loaded");

        let mut ctx = ExecutionContext::new(store, options);
        let executor = JobExecutor::new(
            self.filesystem.as_ref(),
            self.fetcher.as_ref(),
            self.prompter.as_ref(),
            self.reporter.as_ref(),
        );
        let loader = DocumentLoader::new(executor, self.filesystem.as_ref(), self.fetcher.as_ref());
        if let Err(e) = loader.load_root(&mut ctx, source) {
            warn!(error = %e, "Run failed, store not persisted");
            return Err(e);
        }

        let (store, pending) = ctx.finish();
        let store_saved = !store.is_empty();
        if store_saved {
            self.store.save(&store)?;
        }

        info!(
            packages = pending.packages.len(),
            registry = pending.registry.len(),
            "Scaffold completed successfully"
        );
        Ok(RunSummary {
            pending,
            store_saved,
        })
    }

    /// Install what a run collected. Nothing is called for empty lists.
    #[instrument(skip_all)]
    pub fn install(
        &self,
        installer: &dyn DependencyInstaller,
        pending: &PendingDependencies,
    ) -> ScafloResult<()> {
        if !pending.packages.is_empty() {
            installer.install_packages(&pending.packages)?;
        }
        if !pending.registry.is_empty() {
            installer.install_registry(&pending.registry)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ApplicationError;
    use crate::application::ports::{
        MockDependencyInstaller, MockFetcher, MockFilesystem, MockPrompter, MockReporter,
        MockStoreRepository,
    };
    use crate::domain::{DependencySpec, VariableTable};
    use serde_json::json;

    fn service(fs: MockFilesystem, prompter: MockPrompter, store: MockStoreRepository) -> ScaffoldService {
        let mut reporter = MockReporter::new();
        reporter.expect_report().return_const(());
        ScaffoldService::new(
            Box::new(fs),
            Box::new(MockFetcher::new()),
            Box::new(prompter),
            Box::new(reporter),
            Box::new(store),
        )
    }

    fn question_doc() -> String {
        json!({ "jobs": [
            { "type": "question", "id": "@author", "question": "Author?", "questionType": "ask" },
            { "type": "dependencies", "when": "@author", "dependencies": ["clsx"] }
        ]})
        .to_string()
    }

    #[test]
    fn store_answers_are_persisted() {
        let mut fs = MockFilesystem::new();
        let doc = question_doc();
        fs.expect_read_to_string().returning(move |_| Ok(doc.clone()));

        let mut prompter = MockPrompter::new();
        prompter.expect_text().returning(|_| Ok("Ada".into()));

        let mut store = MockStoreRepository::new();
        store.expect_load().returning(|| Ok(VariableTable::new()));
        store
            .expect_save()
            .withf(|table| table.get("author").as_deref() == Some("Ada"))
            .times(1)
            .returning(|_| Ok(()));

        let summary = service(fs, prompter, store)
            .run("doc.json", RunOptions::default())
            .unwrap();
        assert!(summary.store_saved);
        assert_eq!(summary.pending.packages, vec![DependencySpec::Package("clsx".into())]);
    }

    #[test]
    fn empty_store_is_not_written() {
        let mut fs = MockFilesystem::new();
        fs.expect_read_to_string()
            .returning(|_| Ok(json!({ "jobs": [{ "type": "log", "message": "hi" }] }).to_string()));

        let mut store = MockStoreRepository::new();
        store.expect_load().returning(|| Ok(VariableTable::new()));
        store.expect_save().times(0);

        let summary = service(fs, MockPrompter::new(), store)
            .run("doc.json", RunOptions::default())
            .unwrap();
        assert!(!summary.store_saved);
    }

    #[test]
    fn cancelled_run_does_not_persist_answers() {
        let mut fs = MockFilesystem::new();
        fs.expect_read_to_string().returning(|_| {
            Ok(json!({ "jobs": [
                { "type": "question", "id": "@name", "question": "Name?", "questionType": "ask" },
                { "type": "log", "message": "x", "confirm": "Continue?" }
            ]})
            .to_string())
        });

        let mut prompter = MockPrompter::new();
        prompter.expect_text().returning(|_| Ok("Ada".into()));
        prompter
            .expect_confirm()
            .returning(|_| Err(ApplicationError::Cancelled.into()));

        let mut store = MockStoreRepository::new();
        store.expect_load().returning(|| Ok(VariableTable::new()));
        store.expect_save().times(0);

        let err = service(fs, prompter, store)
            .run("doc.json", RunOptions::default())
            .unwrap_err();
        assert!(err.is_cancelled());
    }

    #[test]
    fn install_skips_empty_lists() {
        let store = MockStoreRepository::new();
        let svc = service(MockFilesystem::new(), MockPrompter::new(), store);

        let mut installer = MockDependencyInstaller::new();
        installer.expect_install_packages().times(0);
        installer
            .expect_install_registry()
            .withf(|components| components == ["button".to_string()])
            .times(1)
            .returning(|_| Ok(()));

        let pending = PendingDependencies {
            packages: vec![],
            registry: vec!["button".into()],
        };
        svc.install(&installer, &pending).unwrap();
    }
}
