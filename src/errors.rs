/*!
 * Error types for the tabtrans application.
 *
 * This module contains custom error types for different parts of the application,
 * using the thiserror crate for ergonomic error definitions.
 */

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur when calling the external translation service
#[derive(Error, Debug)]
pub enum ProviderError {
    /// Error when making the HTTP request fails
    #[error("API request failed: {0}")]
    RequestFailed(String),

    /// Error when parsing the service response fails
    #[error("Failed to parse API response: {0}")]
    ParseError(String),

    /// Error returned by the service itself
    #[error("API responded with error: {status_code} - {message}")]
    ApiError {
        /// HTTP status code
        status_code: u16,
        /// Error message from the API
        message: String,
    },

    /// Error establishing or maintaining a connection
    #[error("Connection error: {0}")]
    ConnectionError(String),
}

impl ProviderError {
    /// Whether this error carries the provider's quota-exhausted signature.
    ///
    /// The signature is configuration-supplied rather than hardcoded because
    /// the provider reports quota exhaustion as free text inside an otherwise
    /// ordinary error message.
    pub fn is_quota_exhausted(&self, signature: &str) -> bool {
        !signature.is_empty() && self.to_string().contains(signature)
    }
}

/// Errors that can occur loading or flushing the persistent translation cache
#[derive(Error, Debug)]
pub enum CacheError {
    /// The persisted cache file exists but cannot be read
    #[error("Failed to read cache file {path}: {source}")]
    Unreadable {
        /// Cache file location
        path: PathBuf,
        /// Underlying IO error
        source: std::io::Error,
    },

    /// The persisted cache file exists but is not a valid string→string mapping
    #[error("Cache file {path} is corrupt: {source}")]
    Corrupt {
        /// Cache file location
        path: PathBuf,
        /// Underlying JSON error
        source: serde_json::Error,
    },

    /// Writing the cache snapshot to disk failed
    #[error("Failed to persist cache to {path}: {message}")]
    FlushFailed {
        /// Cache file location
        path: PathBuf,
        /// What went wrong
        message: String,
    },
}

/// Terminal outcomes of a translation job.
///
/// Quota exhaustion and interruption are modeled as explicit variants rather
/// than unwinds so the controller can checkpoint and pick a distinct exit code
/// for each.
#[derive(Error, Debug)]
pub enum JobError {
    /// The external service signaled its quota is exhausted; no further calls
    /// should be attempted and the whole job must stop.
    #[error("Translation quota exhausted: {0}")]
    FatalQuota(String),

    /// The job received an interrupt signal and checkpointed its progress.
    #[error("Job interrupted; progress checkpointed")]
    Interrupted,

    /// Error from the persistent cache
    #[error("Cache error: {0}")]
    Cache(#[from] CacheError),

    /// Error from a document adapter
    #[error("Document error: {0}")]
    Document(String),
}

impl From<std::io::Error> for JobError {
    fn from(error: std::io::Error) -> Self {
        Self::Document(error.to_string())
    }
}
