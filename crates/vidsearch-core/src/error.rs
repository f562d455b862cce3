//! Error types for the video-search client
//!
//! Provides a single error enum covering input validation, transport
//! failures and provider responses, with human-readable messages
//! and Tauri-compatible serialization.

use serde::{Serialize, Serializer};
use thiserror::Error;

/// Error type for all vidsearch operations
///
/// Implements Display for human-readable messages and Serialize
/// for Tauri command compatibility.
#[derive(Error, Debug)]
pub enum VidsearchError {
    /// Caller supplied an unusable value (empty query, empty id, bad page size)
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Every attempt exceeded the per-attempt timeout
    #[error("Request timed out after {attempts} attempt(s)")]
    Timeout { attempts: u32 },

    /// Provider kept answering HTTP 429
    #[error("Rate limited - gave up after {attempts} attempt(s)")]
    RateLimited { attempts: u32 },

    /// Provider kept answering with a 5xx status
    #[error("Server error {status} after {attempts} attempt(s)")]
    ServerError { status: u16, attempts: u32 },

    /// Provider rejected the request (4xx other than 429), never retried
    #[error("Request rejected: {status} {status_text}")]
    ClientError { status: u16, status_text: String },

    /// Connectivity failure that persisted through every attempt
    #[error("Network error: {0}")]
    NetworkError(#[source] reqwest::Error),

    /// A 2xx body did not have the expected structure
    #[error("Failed to parse response: {0}")]
    ParseError(String),

    /// Detail lookup returned an empty payload
    #[error("Video not found: {0}")]
    NotFound(String),

    /// The underlying HTTP client could not be built
    #[error("Failed to initialize HTTP client: {0}")]
    ClientInit(#[source] reqwest::Error),
}

impl VidsearchError {
    /// Whether the fetcher retries this kind of failure
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            VidsearchError::Timeout { .. }
                | VidsearchError::RateLimited { .. }
                | VidsearchError::ServerError { .. }
                | VidsearchError::NetworkError(_)
        )
    }
}

impl Serialize for VidsearchError {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

/// Result type alias for vidsearch operations
pub type Result<T> = std::result::Result<T, VidsearchError>;
