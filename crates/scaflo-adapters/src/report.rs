//! Reporters that do not touch the terminal.

use std::sync::{Arc, Mutex};

use scaflo_core::{application::ports::Reporter, domain::LogLevel};
use tracing::{error, info, warn};

/// Records every message; clones share the log.
#[derive(Debug, Clone, Default)]
pub struct RecordingReporter {
    entries: Arc<Mutex<Vec<(LogLevel, String)>>>,
}

impl RecordingReporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> Vec<(LogLevel, String)> {
        self.entries.lock().map(|e| e.clone()).unwrap_or_default()
    }

    /// Messages at `level`, in order.
    pub fn messages(&self, level: LogLevel) -> Vec<String> {
        self.entries()
            .into_iter()
            .filter(|(l, _)| *l == level)
            .map(|(_, m)| m)
            .collect()
    }
}

impl Reporter for RecordingReporter {
    fn report(&self, level: LogLevel, message: &str) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.push((level, message.to_string()));
        }
    }
}

/// Forwards messages to `tracing` events.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingReporter;

impl Reporter for TracingReporter {
    fn report(&self, level: LogLevel, message: &str) {
        match level {
            LogLevel::Error => error!(target: "scaflo::report", "{message}"),
            LogLevel::Warn => warn!(target: "scaflo::report", "{message}"),
            LogLevel::Info | LogLevel::Success | LogLevel::Log => {
                info!(target: "scaflo::report", level = %level, "{message}")
            }
        }
    }
}
