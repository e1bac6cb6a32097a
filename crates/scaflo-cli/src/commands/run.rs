//! Implementation of the `scaflo run` command.
//!
//! Responsibility: build the adapters, call the core scaffold service, and
//! offer to install what the run collected. No job semantics live here.

use std::path::PathBuf;

use tracing::{info, instrument};

use scaflo_adapters::{HttpFetcher, JsonStoreFile, LocalFilesystem, TracingReporter};
use scaflo_core::{
    application::{
        ScaffoldService,
        ports::{ConfirmPrompt, Prompter, Reporter},
    },
    domain::{PendingDependencies, RunOptions, is_url},
};

use crate::{
    cli::{GlobalArgs, RunArgs},
    config::AppConfig,
    error::{CliError, CliResult},
    install::{CommandInstaller, PackageManager},
    output::{OutputManager, TerminalReporter},
};

/// Execute the `scaflo run` command.
///
/// 1. Resolve the working directory (`--dir`) and store file (`--store`)
/// 2. Run the document through `ScaffoldService`
/// 3. List collected dependencies and, unless `--no-install`, install them
#[instrument(skip_all, fields(source = %args.source))]
pub fn execute(
    args: RunArgs,
    global: &GlobalArgs,
    config: &AppConfig,
    output: &OutputManager,
) -> CliResult<()> {
    let root = working_dir(args.dir.as_ref())?;
    let store_path = args.store.clone().unwrap_or_else(|| config.store_path.clone());
    info!(root = %root.display(), store = %store_path.display(), "Working directory resolved");

    if args.dir.is_some() {
        output.info(&format!("Working directory: {}", root.display()))?;
    }
    if is_url(&args.source) {
        output.info(&format!("Fetching {}", args.source))?;
    }

    let service = ScaffoldService::new(
        Box::new(LocalFilesystem::new(&root)),
        Box::new(HttpFetcher::new(config.github_token.clone())?),
        prompter(output),
        reporter(global, output),
        Box::new(JsonStoreFile::new(store_path)),
    );

    let options = RunOptions {
        force: args.force,
        extend_path: args.extend_path.clone(),
    };
    let summary = service.run(&args.source, options)?;

    output.success("Files added successfully!")?;
    if summary.pending.is_empty() {
        return Ok(());
    }

    show_pending(&summary.pending, output)?;
    if args.no_install {
        output.info("Skipping installation (--no-install)")?;
        return Ok(());
    }

    let confirmed = prompter(output).confirm(&ConfirmPrompt {
        message: "Install these dependencies now?".into(),
        default: true,
    })?;
    if !confirmed {
        output.info("Installation skipped")?;
        return Ok(());
    }

    let user_agent = std::env::var("npm_config_user_agent").ok();
    let manager = PackageManager::detect(
        config.package_manager.as_deref(),
        user_agent.as_deref(),
        &root,
    );
    info!(%manager, "Package manager selected");

    let installer = CommandInstaller::new(&root, manager, output.clone());
    service.install(&installer, &summary.pending)?;
    Ok(())
}

/// `--dir` or the current directory; it must already exist.
fn working_dir(dir: Option<&PathBuf>) -> CliResult<PathBuf> {
    let cwd = std::env::current_dir()?;
    let Some(dir) = dir else {
        return Ok(cwd);
    };
    let root = cwd.join(dir);
    if !root.is_dir() {
        return Err(CliError::InvalidInput {
            message: format!("working directory '{}' does not exist", dir.display()),
            source: None,
        });
    }
    Ok(root)
}

fn show_pending(pending: &PendingDependencies, output: &OutputManager) -> CliResult<()> {
    output.header("Dependencies collected:")?;
    for spec in &pending.packages {
        for arg in spec.install_args() {
            output.print(&format!("  • {arg}"))?;
        }
    }
    for component in &pending.registry {
        output.print(&format!("  • {component} (registry)"))?;
    }
    Ok(())
}

/// Quiet runs route `log` jobs to tracing instead of the terminal.
fn reporter(global: &GlobalArgs, output: &OutputManager) -> Box<dyn Reporter> {
    if global.quiet {
        Box::new(TracingReporter)
    } else {
        Box::new(TerminalReporter::new(output.clone()))
    }
}

#[cfg(feature = "interactive")]
fn prompter(output: &OutputManager) -> Box<dyn Prompter> {
    Box::new(crate::prompter::DialoguerPrompter::new(output.supports_color()))
}

/// Without the `interactive` feature every prompt cancels the run.
#[cfg(not(feature = "interactive"))]
fn prompter(_output: &OutputManager) -> Box<dyn Prompter> {
    Box::new(scaflo_adapters::ScriptedPrompter::default())
}
