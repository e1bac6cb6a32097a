//! Application configuration.
//!
//! [`AppConfig`] is loaded once at startup and passed down by value.  The
//! CLI layer owns config; the core crate never sees it.
//!
//! # Resolution order (highest priority first)
//!
//! 1. CLI flags (handled at the call-site, not here)
//! 2. `SCAFLO_*` environment variables (`.env` is loaded first)
//! 3. Config file (`--config FILE` or the platform config dir)
//! 4. Built-in defaults (always present)

use std::path::{Path, PathBuf};

use anyhow::Context;
use config::{Config, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{CliError, CliResult, IntoCli};
use crate::install::PackageManager;

/// Every key `scaflo config get|set` accepts.
pub const KEYS: [&str; 4] = ["github_token", "store_path", "no_color", "package_manager"];

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Sent as a bearer token to raw.githubusercontent.com.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub github_token: Option<String>,
    /// Where persisted (`@`) answers live.
    pub store_path: PathBuf,
    pub no_color: bool,
    /// Overrides package manager detection.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub package_manager: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            github_token: None,
            store_path: default_store_path(),
            no_color: false,
            package_manager: None,
        }
    }
}

impl AppConfig {
    /// Load configuration, starting from defaults.
    ///
    /// A missing file, default or `--config`, leaves the defaults in place
    /// so `init` and `config set` can create it.
    pub fn load(config_file: Option<&PathBuf>) -> anyhow::Result<Self> {
        let path = config_file.cloned().unwrap_or_else(Self::config_path);
        debug!(path = %path.display(), "Loading configuration");

        let defaults = Self::default();
        let config = Config::builder()
            .set_default("store_path", defaults.store_path.display().to_string())?
            .set_default("no_color", defaults.no_color)?
            .add_source(
                File::from(path.as_path())
                    .format(FileFormat::Toml)
                    .required(false),
            )
            .add_source(Environment::with_prefix("SCAFLO"))
            .build()
            .with_context(|| format!("reading {}", path.display()))?;

        config
            .try_deserialize()
            .with_context(|| format!("invalid configuration in {}", path.display()))
    }

    /// Path to the default configuration file.
    ///
    /// Uses `directories::ProjectDirs` for cross-platform correctness,
    /// falling back to `.scaflo.toml` in the current directory.
    pub fn config_path() -> PathBuf {
        directories::ProjectDirs::from("com", "scaflo", "scaflo")
            .map(|d| d.config_dir().join("config.toml"))
            .unwrap_or_else(|| PathBuf::from(".scaflo.toml"))
    }

    /// The file `config set` writes and `config path` prints.
    pub fn active_path(config_file: Option<&PathBuf>) -> PathBuf {
        config_file.cloned().unwrap_or_else(Self::config_path)
    }

    /// Value of `key` as shown by `config get`; unset keys are empty.
    pub fn get(&self, key: &str) -> CliResult<String> {
        match key {
            "github_token" => Ok(self.github_token.as_deref().map(mask).unwrap_or_default()),
            "store_path" => Ok(self.store_path.display().to_string()),
            "no_color" => Ok(self.no_color.to_string()),
            "package_manager" => Ok(self.package_manager.clone().unwrap_or_default()),
            _ => Err(CliError::UnknownConfigKey { key: key.into() }),
        }
    }

    /// Set `key` from its string form, validating the value.
    pub fn set(&mut self, key: &str, value: &str) -> CliResult<()> {
        match key {
            "github_token" => self.github_token = non_empty(value),
            "store_path" => self.store_path = PathBuf::from(value),
            "no_color" => {
                self.no_color = value.parse().map_err(|_| CliError::InvalidInput {
                    message: format!("no_color must be true or false, got '{value}'"),
                    source: None,
                })?
            }
            "package_manager" => {
                if !value.is_empty() {
                    value.parse::<PackageManager>()?;
                }
                self.package_manager = non_empty(value);
            }
            _ => return Err(CliError::UnknownConfigKey { key: key.into() }),
        }
        Ok(())
    }

    /// Serialise to TOML.
    pub fn to_toml(&self) -> CliResult<String> {
        toml::to_string_pretty(self).map_err(|e| CliError::ConfigError {
            message: format!("Failed to serialise config: {e}"),
            source: Some(Box::new(e)),
        })
    }

    /// Read only what the file itself holds (no env, no defaults).
    pub fn read_file(path: &Path) -> CliResult<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let text = std::fs::read_to_string(path)
            .with_cli_context(|| format!("Failed to read config '{}'", path.display()))?;
        toml::from_str(&text).map_err(|e| CliError::ConfigError {
            message: format!("Failed to parse '{}': {e}", path.display()),
            source: Some(Box::new(e)),
        })
    }

    /// Write to `path`, creating the parent directory.
    pub fn write_file(&self, path: &Path) -> CliResult<()> {
        let toml = self.to_toml()?;
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).with_cli_context(|| {
                format!("Failed to create config directory '{}'", parent.display())
            })?;
        }
        std::fs::write(path, toml)
            .with_cli_context(|| format!("Failed to write config to '{}'", path.display()))
    }
}

/// `~/.scaflo/store.json`, or relative to the working directory when there
/// is no home directory.
fn default_store_path() -> PathBuf {
    directories::BaseDirs::new()
        .map(|d| d.home_dir().join(".scaflo"))
        .unwrap_or_else(|| PathBuf::from(".scaflo"))
        .join("store.json")
}

fn non_empty(value: &str) -> Option<String> {
    (!value.is_empty()).then(|| value.to_string())
}

fn mask(token: &str) -> String {
    let visible: String = token.chars().take(4).collect();
    format!("{visible}****")
}
