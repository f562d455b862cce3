//! HTTP fetcher with per-attempt timeout and bounded retry
//!
//! Every request to the provider goes through [`ResilientFetcher`]. Rate
//! limiting (429), server errors (5xx), timeouts and connectivity failures
//! are retried with a linear backoff; everything else fails immediately.

use std::time::Duration;

use reqwest::StatusCode;
use reqwest::header::{ACCEPT, HeaderMap, HeaderValue};
use serde::de::DeserializeOwned;
use tokio::time::{sleep, timeout};

use crate::error::{Result, VidsearchError};
use crate::url::DEFAULT_BASE_URL;

const USER_AGENT: &str = concat!("vidsearch/", env!("CARGO_PKG_VERSION"));

/// Configuration for the fetcher
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetcherConfig {
    /// Provider API root (default: [`DEFAULT_BASE_URL`])
    pub base_url: String,
    /// Maximum network attempts per logical request (default: 3)
    pub max_attempts: u32,
    /// Per-attempt timeout in milliseconds (default: 10000)
    pub timeout_ms: u64,
    /// Backoff unit in milliseconds; attempt `n` waits `n` units (default: 1000)
    pub base_backoff_ms: u64,
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            max_attempts: 3,
            timeout_ms: 10_000,
            base_backoff_ms: 1_000,
        }
    }
}

impl FetcherConfig {
    /// Default configuration overlaid with `VIDSEARCH_*` environment variables
    ///
    /// Recognized: `VIDSEARCH_BASE_URL`, `VIDSEARCH_MAX_ATTEMPTS`,
    /// `VIDSEARCH_TIMEOUT_MS`, `VIDSEARCH_BACKOFF_MS`. Unparseable values
    /// are logged and ignored.
    pub fn from_env() -> Self {
        Self::default().with_overrides(|key| std::env::var(key).ok())
    }

    fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(url) = lookup("VIDSEARCH_BASE_URL").filter(|u| !u.trim().is_empty()) {
            self.base_url = url.trim().to_string();
        }
        if let Some(value) = parse_override(&lookup, "VIDSEARCH_MAX_ATTEMPTS") {
            self.max_attempts = value;
        }
        if let Some(value) = parse_override(&lookup, "VIDSEARCH_TIMEOUT_MS") {
            self.timeout_ms = value;
        }
        if let Some(value) = parse_override(&lookup, "VIDSEARCH_BACKOFF_MS") {
            self.base_backoff_ms = value;
        }
        self
    }

    /// Retry policy described by this configuration
    pub fn options(&self) -> FetchOptions {
        FetchOptions {
            max_attempts: self.max_attempts,
            attempt_timeout: Duration::from_millis(self.timeout_ms),
            base_backoff: Duration::from_millis(self.base_backoff_ms),
        }
    }
}

fn parse_override<T: std::str::FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
) -> Option<T> {
    let raw = lookup(key)?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(_) => {
            tracing::warn!(key, value = %raw, "ignoring unparseable override");
            None
        }
    }
}

/// Retry policy for a single logical request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchOptions {
    /// Attempt cap; 0 is treated as 1
    pub max_attempts: u32,
    pub attempt_timeout: Duration,
    pub base_backoff: Duration,
}

impl Default for FetchOptions {
    fn default() -> Self {
        FetcherConfig::default().options()
    }
}

/// Delay inserted after failed attempt number `attempt` (1-based)
///
/// Linear: `base * attempt`.
///
/// # Example
/// ```
/// use std::time::Duration;
/// use vidsearch_core::backoff_delay;
///
/// assert_eq!(backoff_delay(1, Duration::from_millis(1000)), Duration::from_millis(1000));
/// assert_eq!(backoff_delay(2, Duration::from_millis(1000)), Duration::from_millis(2000));
/// ```
pub fn backoff_delay(attempt: u32, base: Duration) -> Duration {
    base.saturating_mul(attempt)
}

/// Retryable outcome of one attempt
#[derive(Debug)]
enum Transient {
    Timeout,
    RateLimited,
    Server(StatusCode),
    Network(reqwest::Error),
}

impl Transient {
    fn into_error(self, attempts: u32) -> VidsearchError {
        match self {
            Transient::Timeout => VidsearchError::Timeout { attempts },
            Transient::RateLimited => VidsearchError::RateLimited { attempts },
            Transient::Server(status) => VidsearchError::ServerError {
                status: status.as_u16(),
                attempts,
            },
            Transient::Network(e) => VidsearchError::NetworkError(e),
        }
    }
}

impl std::fmt::Display for Transient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Transient::Timeout => write!(f, "timed out"),
            Transient::RateLimited => write!(f, "rate limited"),
            Transient::Server(status) => write!(f, "server error {}", status),
            Transient::Network(e) => write!(f, "network error: {}", e),
        }
    }
}

enum AttemptError {
    Transient(Transient),
    Fatal(VidsearchError),
}

/// HTTP client wrapper with timeout and retry logic
///
/// Cheap to share behind an `Arc`; the inner `reqwest::Client` pools
/// connections across all sessions using it.
#[derive(Debug, Clone)]
pub struct ResilientFetcher {
    client: reqwest::Client,
    base_url: String,
    options: FetchOptions,
}

impl ResilientFetcher {
    /// Create a new fetcher with default configuration
    pub fn new() -> Result<Self> {
        Self::with_config(FetcherConfig::default())
    }

    /// Create a new fetcher with custom configuration
    pub fn with_config(config: FetcherConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .default_headers(headers)
            .build()
            .map_err(VidsearchError::ClientInit)?;

        Ok(Self {
            client,
            options: config.options(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Provider API root this fetcher was configured with
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Default retry policy
    pub fn options(&self) -> &FetchOptions {
        &self.options
    }

    /// Fetch `url` and deserialize the JSON body using the default policy
    ///
    /// # Errors
    /// - `Timeout`, `RateLimited`, `ServerError`, `NetworkError` once every attempt failed
    /// - `ClientError` on the first 4xx other than 429
    /// - `ParseError` if a 2xx body does not match `T`
    pub async fn fetch_json<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
        self.fetch_json_with(url, &self.options).await
    }

    /// Fetch `url` and deserialize the JSON body using an explicit policy
    pub async fn fetch_json_with<T: DeserializeOwned>(
        &self,
        url: &str,
        options: &FetchOptions,
    ) -> Result<T> {
        let body = self.fetch_text_with(url, options).await?;
        serde_json::from_str(&body).map_err(|e| VidsearchError::ParseError(e.to_string()))
    }

    /// Fetch the raw body of `url` using the default policy
    pub async fn fetch_text(&self, url: &str) -> Result<String> {
        self.fetch_text_with(url, &self.options).await
    }

    /// Fetch the raw body of `url` using an explicit policy
    ///
    /// Makes at most `options.max_attempts` requests. After failed attempt
    /// `n` it sleeps `base_backoff * n`; there is no sleep after the last one.
    pub async fn fetch_text_with(&self, url: &str, options: &FetchOptions) -> Result<String> {
        let max_attempts = options.max_attempts.max(1);
        let mut attempt = 1;

        loop {
            tracing::debug!(url, attempt, max_attempts, "sending request");

            let outcome = match timeout(options.attempt_timeout, self.do_fetch(url)).await {
                Ok(outcome) => outcome,
                Err(_) => Err(AttemptError::Transient(Transient::Timeout)),
            };

            match outcome {
                Ok(body) => return Ok(body),
                Err(AttemptError::Fatal(e)) => {
                    tracing::debug!(url, attempt, error = %e, "request failed, not retrying");
                    return Err(e);
                }
                Err(AttemptError::Transient(failure)) => {
                    if attempt >= max_attempts {
                        tracing::warn!(url, attempt, %failure, "giving up");
                        return Err(failure.into_error(attempt));
                    }

                    let backoff = backoff_delay(attempt, options.base_backoff);
                    tracing::warn!(
                        url,
                        attempt,
                        %failure,
                        backoff_ms = backoff.as_millis() as u64,
                        "attempt failed, retrying"
                    );
                    sleep(backoff).await;
                    attempt += 1;
                }
            }
        }
    }

    /// Perform a single attempt and classify the outcome
    async fn do_fetch(&self, url: &str) -> std::result::Result<String, AttemptError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| AttemptError::Transient(Transient::Network(e)))?;

        let status = response.status();

        if status.is_success() {
            return response
                .text()
                .await
                .map_err(|e| AttemptError::Transient(Transient::Network(e)));
        }

        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(AttemptError::Transient(Transient::RateLimited));
        }

        if status.is_server_error() {
            return Err(AttemptError::Transient(Transient::Server(status)));
        }

        Err(AttemptError::Fatal(VidsearchError::ClientError {
            status: status.as_u16(),
            status_text: status.canonical_reason().unwrap_or_default().to_string(),
        }))
    }
}
