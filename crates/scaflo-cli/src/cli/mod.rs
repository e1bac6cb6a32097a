//! CLI argument definitions using the clap derive API.
//!
//! This module is the *only* place that knows about argument names, aliases,
//! help text, and value enums.  No business logic lives here.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

pub mod global;
pub use global::GlobalArgs;

// ── Top-level CLI ─────────────────────────────────────────────────────────────

/// Main CLI entry-point.
#[derive(Debug, Parser)]
#[command(
    name    = "scaflo",
    bin_name = "scaflo",
    version  = env!("CARGO_PKG_VERSION"),
    author   = env!("CARGO_PKG_AUTHORS"),
    about    = "\u{26a1} Scaffold files from JSON job documents",
    long_about = "Scaflo runs a JSON document of jobs (files, questions, \
                  groups, logs, dependencies) against the working directory.",
    after_help = "EXAMPLES:\n\
        \x20 scaflo run ./button.json\n\
        \x20 scaflo run https://example.com/auth.json --dir ./app --force\n\
        \x20 scaflo config set github_token ghp_xxx\n\
        \x20 scaflo completions bash > /usr/share/bash-completion/completions/scaflo",
    arg_required_else_help = true,
    subcommand_required    = true,
)]
pub struct Cli {
    /// Flags available on every subcommand.
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

// ── Subcommands ───────────────────────────────────────────────────────────────

/// All available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Run a job document.
    #[command(
        visible_alias = "r",
        about = "Run a job document from a path or URL",
        after_help = "EXAMPLES:\n\
            \x20 scaflo run ./scaffold.json\n\
            \x20 scaflo run ./scaffold.json -e packages/web --no-install\n\
            \x20 scaflo run https://raw.githubusercontent.com/acme/kit/main/form.json -f"
    )]
    Run(RunArgs),

    /// Initialise a Scaflo configuration file.
    #[command(
        about = "Initialise configuration",
        after_help = "EXAMPLES:\n\
            \x20 scaflo init\n\
            \x20 scaflo init --force"
    )]
    Init(InitArgs),

    /// Generate shell completion scripts.
    #[command(
        about = "Generate shell completions",
        after_help = "EXAMPLES:\n\
            \x20 scaflo completions bash > ~/.local/share/bash-completion/completions/scaflo\n\
            \x20 scaflo completions zsh  > ~/.zfunc/_scaflo\n\
            \x20 scaflo completions fish > ~/.config/fish/completions/scaflo.fish"
    )]
    Completions(CompletionsArgs),

    /// Manage the Scaflo configuration.
    #[command(
        about = "Configuration management",
        subcommand,
        after_help = "EXAMPLES:\n\
            \x20 scaflo config get store_path\n\
            \x20 scaflo config set package_manager pnpm\n\
            \x20 scaflo config list"
    )]
    Config(ConfigCommands),
}

// ── run ───────────────────────────────────────────────────────────────────────

/// Arguments for `scaflo run`.
#[derive(Debug, Args)]
pub struct RunArgs {
    /// Local path or http(s) URL of the root document.
    #[arg(value_name = "SOURCE", help = "Path or URL of the JSON document")]
    pub source: String,

    /// Working directory; every relative path in the document lands here.
    #[arg(
        short = 'd',
        long = "dir",
        value_name = "DIR",
        help = "Working directory (default: current directory)"
    )]
    pub dir: Option<PathBuf>,

    /// Overwrite colliding files without asking.
    #[arg(short = 'f', long = "force", help = "Overwrite existing files")]
    pub force: bool,

    /// Extra base directory prepended to every job path.
    #[arg(
        short = 'e',
        long = "extend-path",
        value_name = "PATH",
        help = "Extend every file path from the working directory"
    )]
    pub extend_path: Option<String>,

    /// Print collected dependencies without installing them.
    #[arg(long = "no-install", help = "Do not install collected dependencies")]
    pub no_install: bool,

    /// Store file override.
    #[arg(
        long = "store",
        value_name = "FILE",
        help = "Store file for persisted answers (default from config)"
    )]
    pub store: Option<PathBuf>,
}

// ── init ──────────────────────────────────────────────────────────────────────

/// Arguments for `scaflo init`.
#[derive(Debug, Args)]
pub struct InitArgs {
    /// Overwrite an existing config file.
    #[arg(short = 'f', long = "force", help = "Overwrite existing configuration")]
    pub force: bool,
}

// ── completions ───────────────────────────────────────────────────────────────

/// Arguments for `scaflo completions`.
#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Target shell.
    #[arg(value_enum, help = "Shell to generate completions for")]
    pub shell: Shell,
}

/// Supported shells for completion generation.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
    Elvish,
}

// ── config subcommands ────────────────────────────────────────────────────────

/// Subcommands for `scaflo config`.
#[derive(Debug, Subcommand)]
pub enum ConfigCommands {
    /// Print the value of a configuration key.
    Get {
        /// Key name, e.g. `store_path`.
        key: String,
    },
    /// Set a configuration key to a value.
    Set {
        key: String,
        /// New value.
        value: String,
    },
    /// Print all configuration values.
    List,
    /// Print the path to the active configuration file.
    Path,
}

// ── tests ─────────────────────────────────────────────────────────────────────
