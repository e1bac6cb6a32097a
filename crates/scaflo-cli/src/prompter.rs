//! Terminal prompts backed by dialoguer.

use std::io;

use dialoguer::{
    Confirm, Input, Select,
    theme::{ColorfulTheme, SimpleTheme, Theme},
};
use tracing::debug;

use scaflo_core::{
    application::{
        ApplicationError,
        ports::{ConfirmPrompt, Prompter, SelectPrompt, TextPrompt},
    },
    error::{ScafloError, ScafloResult},
};

/// Asks on stderr; `Esc` and `Ctrl-C` cancel the run.
#[derive(Debug, Clone, Copy)]
pub struct DialoguerPrompter {
    colorful: bool,
}

impl DialoguerPrompter {
    pub fn new(colorful: bool) -> Self {
        Self { colorful }
    }

    fn theme(&self) -> Box<dyn Theme> {
        if self.colorful {
            Box::new(ColorfulTheme::default())
        } else {
            Box::new(SimpleTheme)
        }
    }
}

impl Prompter for DialoguerPrompter {
    fn text(&self, prompt: &TextPrompt) -> ScafloResult<String> {
        let theme = self.theme();
        let mut input = Input::<String>::with_theme(theme.as_ref())
            .with_prompt(&prompt.message)
            .allow_empty(true);
        if let Some(default) = &prompt.default {
            input = input.default(default.clone());
        }
        input.interact_text().map_err(map_error)
    }

    fn confirm(&self, prompt: &ConfirmPrompt) -> ScafloResult<bool> {
        let theme = self.theme();
        Confirm::with_theme(theme.as_ref())
            .with_prompt(&prompt.message)
            .default(prompt.default)
            .interact_opt()
            .map_err(map_error)?
            .ok_or_else(|| ApplicationError::Cancelled.into())
    }

    fn select(&self, prompt: &SelectPrompt) -> ScafloResult<String> {
        let labels: Vec<&str> = prompt.options.iter().map(|(_, label)| label.as_str()).collect();
        let default = prompt
            .default
            .as_ref()
            .and_then(|value| prompt.options.iter().position(|(v, _)| v == value))
            .unwrap_or(0);

        let theme = self.theme();
        let chosen = Select::with_theme(theme.as_ref())
            .with_prompt(&prompt.message)
            .items(&labels)
            .default(default)
            .interact_opt()
            .map_err(map_error)?
            .ok_or(ApplicationError::Cancelled)?;

        let (value, _) = prompt
            .options
            .get(chosen)
            .ok_or_else(|| ScafloError::Internal {
                message: format!("selection {chosen} out of range"),
            })?;
        debug!(value, "Option selected");
        Ok(value.clone())
    }
}

fn map_error(err: dialoguer::Error) -> ScafloError {
    match err {
        dialoguer::Error::IO(e) if e.kind() == io::ErrorKind::Interrupted => {
            ApplicationError::Cancelled.into()
        }
        dialoguer::Error::IO(e) => ScafloError::Internal {
            message: format!("terminal prompt failed: {e}"),
        },
    }
}
