//! `scaflo config`: read and write configuration values.

use tracing::info;

use crate::{
    cli::{ConfigCommands, GlobalArgs},
    config::AppConfig,
    error::CliResult,
    output::OutputManager,
};

/// Dispatch to the correct config subcommand.
///
/// `get` and `list` show the effective configuration (file, env and
/// defaults merged); `set` edits only the file.
pub fn execute(
    cmd: ConfigCommands,
    global: &GlobalArgs,
    config: &AppConfig,
    output: &OutputManager,
) -> CliResult<()> {
    match cmd {
        ConfigCommands::Get { key } => {
            output.data(&config.get(&key)?)?;
        }

        ConfigCommands::Set { key, value } => {
            let path = AppConfig::active_path(global.config.as_ref());
            let mut file = AppConfig::read_file(&path)?;
            file.set(&key, &value)?;
            file.write_file(&path)?;
            info!(key, path = %path.display(), "Configuration updated");
            output.success(&format!("Set {key} = {}", file.get(&key)?))?;
        }

        ConfigCommands::List => {
            output.header("Current Configuration:")?;
            output.data(&masked(config).to_toml()?)?;
        }

        ConfigCommands::Path => {
            output.data(&AppConfig::active_path(global.config.as_ref()).display().to_string())?;
        }
    }

    Ok(())
}

fn masked(config: &AppConfig) -> AppConfig {
    let mut shown = config.clone();
    if shown.github_token.is_some() {
        shown.github_token = config.get("github_token").ok();
    }
    shown
}
