//! Fetcher serving canned responses, for tests.

use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};

use scaflo_core::{
    application::{ApplicationError, ports::Fetcher},
    error::ScafloResult,
};

/// Serves registered bodies by exact URL; anything else is a 404.
#[derive(Debug, Clone, Default)]
pub struct StaticFetcher {
    responses: HashMap<String, String>,
    requests: Arc<Mutex<Vec<String>>>,
}

impl StaticFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, url: impl Into<String>, body: impl Into<String>) -> Self {
        self.responses.insert(url.into(), body.into());
        self
    }

    /// URLs requested so far, in order.
    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().map(|r| r.clone()).unwrap_or_default()
    }
}

impl Fetcher for StaticFetcher {
    fn fetch_text(&self, url: &str) -> ScafloResult<String> {
        if let Ok(mut requests) = self.requests.lock() {
            requests.push(url.to_string());
        }
        self.responses.get(url).cloned().ok_or_else(|| {
            ApplicationError::FetchFailed {
                url: url.to_string(),
                reason: "404 Not Found".into(),
            }
            .into()
        })
    }
}
