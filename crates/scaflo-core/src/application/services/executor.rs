//! Job dispatch.
//!
//! Every job passes the same gate before it runs: it is skipped if its `id`
//! already completed in this run, if its `when` guard is false, or if its
//! `confirm` prompt is answered the wrong way. After running, the `id` is
//! recorded so `#id` and `@id` guards can observe that the job ran.

use std::path::Path;

use regex::{NoExpand, Regex};
use tracing::{debug, info, warn};

use crate::application::ports::{
    ConfirmPrompt, Fetcher, Filesystem, Prompter, Reporter, SelectPrompt, TextPrompt,
};
use crate::application::services::path_resolver::{PathResolver, ResolvedPath};
use crate::domain::{
    DomainError, ExecutionContext, FileJob, FileWrite, Frame, GroupJob, Job, JobKind, LogLevel,
    QuestionJob, QuestionKind, VariableRef, Variables, evaluate_when, is_url,
};
use crate::error::ScafloResult;

pub struct JobExecutor<'a> {
    filesystem: &'a dyn Filesystem,
    fetcher: &'a dyn Fetcher,
    prompter: &'a dyn Prompter,
    reporter: &'a dyn Reporter,
}

impl<'a> JobExecutor<'a> {
    pub fn new(
        filesystem: &'a dyn Filesystem,
        fetcher: &'a dyn Fetcher,
        prompter: &'a dyn Prompter,
        reporter: &'a dyn Reporter,
    ) -> Self {
        Self {
            filesystem,
            fetcher,
            prompter,
            reporter,
        }
    }

    pub fn paths(&self) -> PathResolver<'a> {
        PathResolver::new(self.filesystem, self.prompter, self.reporter)
    }

    /// Run `jobs` in order. The first error aborts the rest.
    pub fn run_jobs(
        &self,
        ctx: &mut ExecutionContext,
        frame: &Frame<'_>,
        jobs: &[Job],
    ) -> ScafloResult<()> {
        for job in jobs {
            self.run_job(ctx, frame, job)?;
        }
        Ok(())
    }

    pub fn run_job(&self, ctx: &mut ExecutionContext, frame: &Frame<'_>, job: &Job) -> ScafloResult<()> {
        if !self.should_run(ctx, job)? {
            return Ok(());
        }
        debug!(kind = job.kind.type_name(), id = ?job.id, "Running job");

        match &job.kind {
            JobKind::File(file) => self.write_file(ctx, frame, file)?,
            JobKind::Question(question) => {
                let id = job.id.as_deref().ok_or_else(|| DomainError::InvalidJob {
                    job: None,
                    reason: "question jobs require an `id`".into(),
                })?;
                self.ask_question(ctx, id, question)?;
            }
            JobKind::Group(group) => self.run_group(ctx, frame, group)?,
            JobKind::RegistryDependencies(names) => ctx.pending.add_registry(names.iter().cloned()),
            JobKind::Dependencies(names) => ctx.pending.add_packages(names.iter().cloned()),
            JobKind::Run { target } => {
                let definition =
                    frame
                        .definitions
                        .get(target)
                        .ok_or_else(|| DomainError::UnknownDefinition {
                            target: target.clone(),
                        })?;
                let inner = frame.enter(target)?;
                self.run_job(ctx, &inner, definition)?;
            }
            JobKind::Log { level, message } => self.reporter.report(*level, message),
        }

        if let Some(id) = &job.id {
            ctx.mark_completed(id);
            let reference = VariableRef::from_job_id(id);
            if !ctx.variables.is_defined(reference.scope, &reference.name) {
                ctx.variables.set(reference.scope, &reference.name, "");
            }
        }
        Ok(())
    }

    fn should_run(&self, ctx: &ExecutionContext, job: &Job) -> ScafloResult<bool> {
        if let Some(id) = &job.id {
            if ctx.is_completed(id) {
                debug!(id, "Already ran, skipping");
                return Ok(false);
            }
        }
        if let Some(when) = &job.when {
            if !evaluate_when(when, &ctx.variables)? {
                debug!(when, "Guard is false, skipping");
                return Ok(false);
            }
        }
        if let Some(confirm) = &job.confirm {
            // `!question` runs the job only on "no".
            let (message, required) = match confirm.strip_prefix('!') {
                Some(rest) => (rest, false),
                None => (confirm.as_str(), true),
            };
            let answer = self.prompter.confirm(&ConfirmPrompt {
                message: message.trim().to_string(),
                default: required,
            })?;
            if answer != required {
                debug!(confirm, "Not confirmed, skipping");
                return Ok(false);
            }
        }
        Ok(true)
    }

    fn write_file(&self, ctx: &mut ExecutionContext, frame: &Frame<'_>, file: &FileJob) -> ScafloResult<()> {
        let ignore_existing = ctx.options.force || file.write.expects_existing();
        let resolved = self.paths().resolve(
            &ctx.variables,
            frame.base.as_deref(),
            &file.name,
            ignore_existing,
        )?;
        let path = match resolved {
            ResolvedPath::Path(path) => path,
            ResolvedPath::Skip => {
                warn!(name = %file.name, "File skipped");
                self.reporter
                    .report(LogLevel::Warn, &format!("✖ Skipped file: {}", file.name));
                return Ok(());
            }
        };

        match &file.write {
            FileWrite::Overwrite(content) => {
                let content = self.load_content(content)?;
                self.filesystem.write_file(&path, &content)?;
            }
            FileWrite::Append(content) => {
                let content = self.load_content(content)?;
                self.filesystem.append_file(&path, &content)?;
            }
            FileWrite::Replace(pairs) => {
                let mut text = self.filesystem.read_to_string(&path)?;
                for (pattern, replacement) in pairs {
                    let value = resolve_replacement(&ctx.variables, replacement);
                    let regex = Regex::new(pattern).map_err(|e| DomainError::InvalidPattern {
                        pattern: pattern.clone(),
                        reason: e.to_string(),
                    })?;
                    text = regex.replace_all(&text, NoExpand(&value)).into_owned();
                }
                self.filesystem.write_file(&path, &text)?;
            }
        }

        info!(path = %path.display(), "File written");
        self.reporter.report(
            LogLevel::Success,
            &format!("✔ File processed: {}", path.display()),
        );
        Ok(())
    }

    /// Single-line content naming a URL or an existing absolute file is
    /// replaced by what it points at.
    fn load_content(&self, content: &str) -> ScafloResult<String> {
        if content.contains('\n') {
            return Ok(content.to_string());
        }
        if is_url(content) {
            debug!(url = content, "Fetching file content");
            return self.fetcher.fetch_text(content);
        }
        let path = Path::new(content);
        if path.is_absolute() && self.filesystem.exists(path) {
            return self.filesystem.read_to_string(path);
        }
        Ok(content.to_string())
    }

    fn ask_question(&self, ctx: &mut ExecutionContext, id: &str, question: &QuestionJob) -> ScafloResult<()> {
        let reference = VariableRef::from_job_id(id);
        if ctx.variables.is_defined(reference.scope, &reference.name) {
            debug!(%reference, "Already answered");
            return Ok(());
        }

        let answer = match &question.kind {
            QuestionKind::Ask => {
                let raw = self.prompter.text(&TextPrompt {
                    message: question.question.clone(),
                    default: question.default_value.clone(),
                })?;
                match raw.trim() {
                    "" => question.default_value.clone().unwrap_or_default(),
                    answer => answer.to_string(),
                }
            }
            QuestionKind::Confirm => self
                .prompter
                .confirm(&ConfirmPrompt {
                    message: question.question.clone(),
                    default: question.default_value.as_deref() == Some("true"),
                })?
                .to_string(),
            QuestionKind::Options(options) => self.prompter.select(&SelectPrompt {
                message: question.question.clone(),
                options: options
                    .iter()
                    .map(|(value, label)| (value.clone(), label.clone()))
                    .collect(),
                default: question.default_value.clone(),
            })?,
        };

        ctx.variables.set(reference.scope, &reference.name, answer);
        Ok(())
    }

    fn run_group(&self, ctx: &mut ExecutionContext, frame: &Frame<'_>, group: &GroupJob) -> ScafloResult<()> {
        let base = match &group.base {
            Some(base) => {
                match self
                    .paths()
                    .resolve(&ctx.variables, frame.base.as_deref(), base, true)?
                {
                    ResolvedPath::Path(path) => Some(path),
                    ResolvedPath::Skip => frame.base.clone(),
                }
            }
            None => frame.base.clone(),
        };
        self.run_jobs(ctx, &frame.with_base(base), &group.jobs)
    }
}

/// A replacement that is exactly a variable reference takes its value; an
/// undefined reference stays as written.
fn resolve_replacement(vars: &Variables, replacement: &str) -> String {
    match VariableRef::parse(replacement) {
        Some(reference) => vars
            .resolve(&reference, Some(replacement))
            .unwrap_or_else(|| replacement.to_string()),
        None => replacement.to_string(),
    }
}
