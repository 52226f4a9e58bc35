//! GitHub Client Error Types
//!
//! This module defines the errors the REST client can return.

/// Error types for GitHub API operations
#[derive(Debug, thiserror::Error)]
pub enum GithubError {
    /// Transport-level failure (connection refused, timeout, TLS)
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The API answered with a non-success status
    #[error("GitHub API returned {status}: {message}")]
    Api { status: u16, message: String },

    /// Response body could not be decoded
    #[error("Failed to decode GitHub response: {0}")]
    Decode(#[from] serde_json::Error),

    /// GitHub App JWT could not be signed
    #[error("Failed to sign GitHub App JWT: {0}")]
    Jwt(#[from] jsonwebtoken::errors::Error),

    /// Base URL or path could not be turned into a request
    #[error("Invalid request URL: {0}")]
    InvalidUrl(String),
}

impl GithubError {
    /// HTTP status for API errors
    pub fn status(&self) -> Option<u16> {
        match self {
            GithubError::Api { status, .. } => Some(*status),
            GithubError::Http(err) => err.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, GithubError>;
