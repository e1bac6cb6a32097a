//! HTTP fetcher backed by a blocking reqwest client.

use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::header;
use scaflo_core::{
    application::{ApplicationError, ports::Fetcher},
    error::{ScafloError, ScafloResult},
};
use tracing::debug;

const GITHUB_RAW: &str = "https://raw.githubusercontent.com";
const CONNECT_TIMEOUT: Duration = Duration::from_secs(30);

/// Production fetcher.
///
/// Requests to `raw.githubusercontent.com` carry the configured GitHub token
/// so private repositories can host documents.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    http: Client,
    github_token: Option<String>,
}

impl HttpFetcher {
    pub fn new(github_token: Option<String>) -> ScafloResult<Self> {
        let http = Client::builder()
            .connect_timeout(CONNECT_TIMEOUT)
            .user_agent(concat!("scaflo/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ScafloError::Configuration {
                message: format!("could not build HTTP client: {e}"),
            })?;
        Ok(Self {
            http,
            github_token: github_token.filter(|t| !t.trim().is_empty()),
        })
    }

    /// The bearer token to send with a request to `url`, if any.
    fn token_for(&self, url: &str) -> Option<&str> {
        if url.starts_with(GITHUB_RAW) {
            self.github_token.as_deref()
        } else {
            None
        }
    }
}

impl Fetcher for HttpFetcher {
    fn fetch_text(&self, url: &str) -> ScafloResult<String> {
        let failed = |reason: String| -> ScafloError {
            ApplicationError::FetchFailed {
                url: url.to_string(),
                reason,
            }
            .into()
        };

        let mut request = self.http.get(url);
        if let Some(token) = self.token_for(url) {
            debug!(url, "Fetching with GitHub token");
            request = request.header(header::AUTHORIZATION, format!("Bearer {token}"));
        } else {
            debug!(url, "Fetching");
        }

        let response = request.send().map_err(|e| failed(e.to_string()))?;
        let status = response.status();
        if !status.is_success() {
            return Err(failed(status.to_string()));
        }
        response.text().map_err(|e| failed(e.to_string()))
    }
}
