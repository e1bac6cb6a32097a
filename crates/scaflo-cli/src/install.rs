//! Installing the dependencies a run collected.
//!
//! The package manager is picked once per run (config override, then the
//! `npm_config_user_agent` of the invoking runner, then lockfiles, then npm)
//! and driven through `std::process::Command` behind an indicatif spinner.

use std::collections::HashSet;
use std::fmt;
use std::io;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::str::FromStr;
use std::time::Duration;

use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use tracing::{debug, info, instrument, warn};

use scaflo_core::{
    application::{ApplicationError, ports::DependencyInstaller},
    domain::DependencySpec,
    error::ScafloResult,
};

use crate::error::CliError;
use crate::output::OutputManager;

/// Registry CLI run for `registryDependencies`.
const REGISTRY_PACKAGE: &str = "shadcn@latest";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PackageManager {
    Npm,
    Pnpm,
    Yarn,
    Bun,
}

impl PackageManager {
    /// Pick the manager for a project rooted at `root`.
    pub fn detect(config_override: Option<&str>, user_agent: Option<&str>, root: &Path) -> Self {
        if let Some(manager) = config_override.and_then(|name| name.parse().ok()) {
            return manager;
        }
        if let Some(manager) = user_agent.and_then(Self::from_user_agent) {
            return manager;
        }
        Self::from_lockfiles(root).unwrap_or(Self::Npm)
    }

    /// `pnpm/9.1.0 npm/? node/v20.11.0 linux x64` → `Pnpm`.
    fn from_user_agent(agent: &str) -> Option<Self> {
        let name = agent.split('/').next()?;
        name.parse().ok()
    }

    fn from_lockfiles(root: &Path) -> Option<Self> {
        const LOCKFILES: [(&str, PackageManager); 4] = [
            ("pnpm-lock.yaml", PackageManager::Pnpm),
            ("yarn.lock", PackageManager::Yarn),
            ("bun.lockb", PackageManager::Bun),
            ("bun.lock", PackageManager::Bun),
        ];
        LOCKFILES
            .iter()
            .find(|(file, _)| root.join(file).exists())
            .map(|(_, manager)| *manager)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Npm => "npm",
            Self::Pnpm => "pnpm",
            Self::Yarn => "yarn",
            Self::Bun => "bun",
        }
    }

    /// Program and arguments adding `packages`.
    pub fn add_command(&self, packages: &[String]) -> (&'static str, Vec<String>) {
        let verb = match self {
            Self::Npm => "install",
            Self::Pnpm | Self::Yarn | Self::Bun => "add",
        };
        let mut args = vec![verb.to_string()];
        args.extend(packages.iter().cloned());
        (self.as_str(), args)
    }

    /// Program and arguments adding registry `components`.
    pub fn registry_command(&self, components: &[String]) -> (&'static str, Vec<String>) {
        let (program, prefix): (&'static str, &[&str]) = match self {
            Self::Npm => ("npx", &[]),
            Self::Pnpm => ("pnpm", &["dlx"]),
            Self::Yarn => ("yarn", &["dlx"]),
            Self::Bun => ("bunx", &["--bun"]),
        };
        let mut args: Vec<String> = prefix.iter().map(|s| s.to_string()).collect();
        args.push(REGISTRY_PACKAGE.to_string());
        args.push("add".to_string());
        args.extend(components.iter().cloned());
        (program, args)
    }
}

impl fmt::Display for PackageManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PackageManager {
    type Err = CliError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "npm" => Ok(Self::Npm),
            "pnpm" => Ok(Self::Pnpm),
            "yarn" => Ok(Self::Yarn),
            "bun" => Ok(Self::Bun),
            other => Err(CliError::InvalidInput {
                message: format!("unknown package manager '{other}' (expected npm, pnpm, yarn or bun)"),
                source: None,
            }),
        }
    }
}

/// Installs through the detected package manager inside the working directory.
pub struct CommandInstaller {
    root: PathBuf,
    manager: PackageManager,
    output: OutputManager,
}

impl CommandInstaller {
    pub fn new(root: impl Into<PathBuf>, manager: PackageManager, output: OutputManager) -> Self {
        Self {
            root: root.into(),
            manager,
            output,
        }
    }

    fn spinner(&self, message: String) -> ProgressBar {
        let spinner = ProgressBar::new_spinner();
        if self.output.is_quiet() {
            spinner.set_draw_target(ProgressDrawTarget::hidden());
        }
        if let Ok(style) = ProgressStyle::with_template("{spinner:.cyan} {msg}") {
            spinner.set_style(style);
        }
        spinner.set_message(message);
        spinner.enable_steady_tick(Duration::from_millis(100));
        spinner
    }

    /// Install args for everything not already in `package.json`.
    fn filter_installed(&self, packages: &[DependencySpec]) -> Vec<String> {
        let listed = listed_packages(&self.root.join("package.json"));
        let (skipped, wanted): (Vec<String>, Vec<String>) = packages
            .iter()
            .flat_map(DependencySpec::install_args)
            .partition(|arg| listed.contains(package_name(arg)));

        if !skipped.is_empty() {
            warn!(?skipped, "Packages already in package.json");
            notify(self.output.warning(&format!(
                "Already listed in package.json, skipping: {}",
                skipped.join(", ")
            )));
        }
        wanted
    }

    fn command(&self, program: &str, args: &[String]) -> Command {
        let mut command = Command::new(program);
        command.args(args).current_dir(&self.root);
        command
    }
}

impl DependencyInstaller for CommandInstaller {
    #[instrument(skip_all, fields(manager = %self.manager))]
    fn install_packages(&self, packages: &[DependencySpec]) -> ScafloResult<()> {
        let wanted = self.filter_installed(packages);
        if wanted.is_empty() {
            return Ok(());
        }

        let (program, args) = self.manager.add_command(&wanted);
        debug!(program, ?args, "Running package manager");

        let spinner = self.spinner(format!("Installing {} with {}...", wanted.join(" "), self.manager));
        let result = self
            .command(program, &args)
            .stdin(Stdio::null())
            .output();
        spinner.finish_and_clear();

        let output = result.map_err(|e| failed(program, e))?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(failed(program, format!("{} {}", output.status, stderr.trim())));
        }

        info!(count = wanted.len(), "Dependencies installed");
        notify(self.output.success("Dependencies installed"));
        Ok(())
    }

    #[instrument(skip_all, fields(manager = %self.manager))]
    fn install_registry(&self, components: &[String]) -> ScafloResult<()> {
        if !self.root.join("components.json").exists() {
            warn!(?components, "components.json not found; registry install skipped");
            notify(self.output.error(&format!(
                "components.json not found. Initialise the registry first, then add manually: {}",
                components.join(", ")
            )));
            return Ok(());
        }

        let (program, args) = self.manager.registry_command(components);
        debug!(program, ?args, "Running registry installer");
        let _ = self
            .output
            .warning("Registry components are not verified; check them after installation.");

        // The registry CLI may prompt, so it gets the terminal.
        let spinner = self.spinner(format!("Adding components: {}", components.join(", ")));
        let status = spinner.suspend(|| self.command(program, &args).status());
        spinner.finish_and_clear();

        let status = status.map_err(|e| failed(program, e))?;
        if !status.success() {
            return Err(failed(program, status));
        }

        info!(count = components.len(), "Registry components added");
        notify(self.output.success("Components added"));
        Ok(())
    }
}

fn failed(program: &str, reason: impl fmt::Display) -> scaflo_core::error::ScafloError {
    ApplicationError::InstallFailed {
        reason: format!("{program}: {reason}"),
    }
    .into()
}

/// `react@18` → `react`; `@scope/pkg@1` → `@scope/pkg`.
fn package_name(arg: &str) -> &str {
    match arg.rfind('@') {
        Some(at) if at > 0 => &arg[..at],
        _ => arg,
    }
}

/// Names in `dependencies` and `devDependencies`; empty if unreadable.
fn listed_packages(manifest: &Path) -> HashSet<String> {
    let Ok(text) = std::fs::read_to_string(manifest) else {
        return HashSet::new();
    };
    let Ok(json) = serde_json::from_str::<serde_json::Value>(&text) else {
        warn!(path = %manifest.display(), "package.json is not valid JSON");
        return HashSet::new();
    };
    ["dependencies", "devDependencies"]
        .iter()
        .filter_map(|section| json.get(section).and_then(|s| s.as_object()))
        .flat_map(|deps| deps.keys().cloned())
        .collect()
}

/// Terminal write failures don't fail the install; they are logged.
fn notify(written: io::Result<()>) -> bool {
    match written {
        Ok(()) => true,
        Err(e) => {
            warn!(error = %e, "Failed to write install status");
            false
        }
    }
}
