//! Scripted prompter for tests and non-interactive runs.

use std::{
    collections::VecDeque,
    sync::{Arc, Mutex},
};

use scaflo_core::{
    application::{
        ApplicationError,
        ports::{ConfirmPrompt, Prompter, SelectPrompt, TextPrompt},
    },
    error::{ScafloError, ScafloResult},
};
use tracing::debug;

/// One queued answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Answer {
    Text(String),
    Confirm(bool),
    /// The value (not the label) of the chosen option.
    Select(String),
    /// Accept whatever the prompt offers by default.
    Default,
}

/// Replays queued answers in order.
///
/// An exhausted queue, or an answer of the wrong kind, is treated as the
/// user cancelling. Clones share the queue and the transcript.
#[derive(Debug, Clone, Default)]
pub struct ScriptedPrompter {
    answers: Arc<Mutex<VecDeque<Answer>>>,
    asked: Arc<Mutex<Vec<String>>>,
}

impl ScriptedPrompter {
    pub fn new(answers: impl IntoIterator<Item = Answer>) -> Self {
        Self {
            answers: Arc::new(Mutex::new(answers.into_iter().collect())),
            asked: Arc::default(),
        }
    }

    /// Messages of every prompt shown so far.
    pub fn asked(&self) -> Vec<String> {
        self.asked.lock().map(|a| a.clone()).unwrap_or_default()
    }

    /// Answers not consumed yet.
    pub fn remaining(&self) -> usize {
        self.answers.lock().map(|a| a.len()).unwrap_or_default()
    }

    fn next(&self, message: &str) -> ScafloResult<Answer> {
        if let Ok(mut asked) = self.asked.lock() {
            asked.push(message.to_string());
        }
        let answer = self
            .answers
            .lock()
            .map_err(|_| ScafloError::Internal {
                message: "scripted prompter lock poisoned".into(),
            })?
            .pop_front();
        debug!(message, ?answer, "Scripted prompt");
        answer.ok_or_else(|| ApplicationError::Cancelled.into())
    }
}

impl Prompter for ScriptedPrompter {
    fn text(&self, prompt: &TextPrompt) -> ScafloResult<String> {
        match self.next(&prompt.message)? {
            Answer::Text(text) => Ok(text),
            Answer::Default => Ok(prompt.default.clone().unwrap_or_default()),
            _ => Err(ApplicationError::Cancelled.into()),
        }
    }

    fn confirm(&self, prompt: &ConfirmPrompt) -> ScafloResult<bool> {
        match self.next(&prompt.message)? {
            Answer::Confirm(yes) => Ok(yes),
            Answer::Default => Ok(prompt.default),
            _ => Err(ApplicationError::Cancelled.into()),
        }
    }

    fn select(&self, prompt: &SelectPrompt) -> ScafloResult<String> {
        match self.next(&prompt.message)? {
            Answer::Select(value) if prompt.options.iter().any(|(v, _)| *v == value) => Ok(value),
            Answer::Default => prompt
                .default
                .clone()
                .or_else(|| prompt.options.first().map(|(v, _)| v.clone()))
                .ok_or_else(|| ApplicationError::Cancelled.into()),
            _ => Err(ApplicationError::Cancelled.into()),
        }
    }
}
