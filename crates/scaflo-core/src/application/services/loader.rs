//! Loads documents and follows their nested document dependencies.

use std::path::PathBuf;

use tracing::{debug, info, instrument};

use crate::application::ports::{Fetcher, Filesystem};
use crate::application::services::executor::JobExecutor;
use crate::application::services::path_resolver::ResolvedPath;
use crate::domain::{DependencySpec, Document, DocumentSource, ExecutionContext, Frame};
use crate::error::ScafloResult;

pub struct DocumentLoader<'a> {
    executor: JobExecutor<'a>,
    filesystem: &'a dyn Filesystem,
    fetcher: &'a dyn Fetcher,
}

impl<'a> DocumentLoader<'a> {
    pub fn new(
        executor: JobExecutor<'a>,
        filesystem: &'a dyn Filesystem,
        fetcher: &'a dyn Fetcher,
    ) -> Self {
        Self {
            executor,
            filesystem,
            fetcher,
        }
    }

    /// Run the root document and everything it depends on.
    ///
    /// The `extend_path` option is resolved once and used as the base path of
    /// every document in the run.
    pub fn load_root(&self, ctx: &mut ExecutionContext, source: &str) -> ScafloResult<()> {
        let source = DocumentSource::parse(source);
        ctx.mark_visited(&source.key());

        let base = match ctx.options.extend_path.clone() {
            Some(extend) => {
                match self
                    .executor
                    .paths()
                    .resolve(&ctx.variables, None, &extend, true)?
                {
                    ResolvedPath::Path(path) => Some(path),
                    ResolvedPath::Skip => None,
                }
            }
            None => None,
        };

        self.load(ctx, &source, base.as_ref())
    }

    #[instrument(skip_all, fields(source = %source))]
    fn load(
        &self,
        ctx: &mut ExecutionContext,
        source: &DocumentSource,
        base: Option<&PathBuf>,
    ) -> ScafloResult<()> {
        let document = self.read(source)?;
        info!(document = document.label(), jobs = document.jobs.len(), "Processing document");

        let frame = Frame::new(base.cloned(), &document.definitions);
        self.executor.run_jobs(ctx, &frame, &document.jobs)?;

        for dependency in &document.dependencies {
            let nested = match dependency {
                DependencySpec::Package(entry) => DocumentSource::from_dependency(entry),
                DependencySpec::Versioned(_) => None,
            };
            match nested {
                Some(nested) => {
                    if ctx.mark_visited(&nested.key()) {
                        self.load(ctx, &nested, base)?;
                    } else {
                        debug!(source = %nested, "Already loaded, skipping");
                    }
                }
                None => ctx.pending.packages.push(dependency.clone()),
            }
        }
        ctx.pending
            .add_registry(document.registry_dependencies.iter().cloned());
        Ok(())
    }

    fn read(&self, source: &DocumentSource) -> ScafloResult<Document> {
        match source {
            DocumentSource::Remote(url) => {
                let value = self.fetcher.fetch_json(url)?;
                Ok(Document::from_value(value)?)
            }
            DocumentSource::Local(path) => {
                let text = self.filesystem.read_to_string(path)?;
                Ok(Document::from_json_str(&text)?)
            }
        }
    }
}
