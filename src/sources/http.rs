//! Blocking HTTP fetcher with a bounded timeout and retry budget

use std::thread;
use std::time::Duration;

use reqwest::StatusCode;
use tracing::{debug, warn};

use super::Fetcher;
use crate::types::{CovidashError, Result};

/// Delay before retry `n` is `n * RETRY_BACKOFF`
const RETRY_BACKOFF: Duration = Duration::from_millis(500);

/// Outcome of a single failed attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttemptError {
    /// Transport failure or 5xx, worth another try
    Retryable(String),
    /// 4xx or anything another try won't fix
    Fatal(String),
}

/// Classify a response status. `None` means success.
pub fn classify_status(status: StatusCode) -> Option<AttemptError> {
    if status.is_success() {
        None
    } else if status.is_server_error() || status == StatusCode::TOO_MANY_REQUESTS {
        Some(AttemptError::Retryable(format!("HTTP {}", status)))
    } else {
        Some(AttemptError::Fatal(format!("HTTP {}", status)))
    }
}

/// Run `op` up to `retries + 1` times, sleeping `attempt * backoff` between tries
pub fn with_retries<T>(
    retries: u32,
    backoff: Duration,
    mut op: impl FnMut() -> std::result::Result<T, AttemptError>,
) -> std::result::Result<T, String> {
    let mut attempt: u32 = 0;
    loop {
        match op() {
            Ok(value) => return Ok(value),
            Err(AttemptError::Fatal(reason)) => return Err(reason),
            Err(AttemptError::Retryable(reason)) if attempt < retries => {
                attempt += 1;
                warn!(attempt, retries, reason = %reason, "fetch failed, retrying");
                thread::sleep(backoff * attempt);
            }
            Err(AttemptError::Retryable(reason)) => {
                return Err(format!("{} (gave up after {} attempts)", reason, attempt + 1))
            }
        }
    }
}

/// reqwest-backed fetcher
pub struct HttpFetcher {
    client: reqwest::blocking::Client,
    retries: u32,
}

impl HttpFetcher {
    pub fn new(timeout: Duration, retries: u32) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("covidash/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| CovidashError::Config(format!("HTTP client error: {}", e)))?;
        Ok(Self { client, retries })
    }

    fn attempt(&self, url: &str) -> std::result::Result<String, AttemptError> {
        let response = self
            .client
            .get(url)
            .send()
            .map_err(|e| AttemptError::Retryable(format!("HTTP request failed: {}", e)))?;

        if let Some(err) = classify_status(response.status()) {
            return Err(err);
        }

        response
            .text()
            .map_err(|e| AttemptError::Retryable(format!("reading body failed: {}", e)))
    }
}

impl Fetcher for HttpFetcher {
    fn get_text(&self, url: &str) -> std::result::Result<String, String> {
        debug!(url, "fetching");
        with_retries(self.retries, RETRY_BACKOFF, || self.attempt(url))
    }
}
