use thiserror::Error;

use crate::utils::is_retryable_error;

/// Failure of a single explorer query. Distinct from a well-formed "no results" answer.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("[Explorer] Request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("[Explorer] Invalid request url: {0}")]
    InvalidUrl(#[from] url::ParseError),
    #[error("[Explorer] Unexpected HTTP status: {0}")]
    Status(u16),
    #[error("[Explorer] Malformed response: {0}")]
    Malformed(String),
    #[error("[Explorer] Provider error: {message}: {detail}")]
    Provider { message: String, detail: String },
}

impl SourceError {
    pub fn is_retryable(&self) -> bool {
        match self {
            SourceError::Transport(e) => e.is_timeout() || e.is_connect() || is_retryable_error(&e.to_string()),
            SourceError::Status(code) => *code == 429 || *code >= 500,
            SourceError::Provider { message, detail } => is_retryable_error(message) || is_retryable_error(detail),
            SourceError::InvalidUrl(_) | SourceError::Malformed(_) => false,
        }
    }
}
