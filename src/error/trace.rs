use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

/// Fatal trace failures. Per-address provider failures never surface here.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TraceError {
    #[error("Invalid wallet address: {0}")]
    InvalidWallet(String),
    #[error("Invalid token address: {0}")]
    InvalidToken(String),
    #[error("Trace exceeded deadline of {0}s")]
    DeadlineExceeded(u64),
    #[error("Trace failed: {0}")]
    Unexpected(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraceFailure {
    pub kind: String,
    pub message: String,
}

impl TraceError {
    pub fn kind(&self) -> &'static str {
        match self {
            TraceError::InvalidWallet(_) => "invalid_wallet",
            TraceError::InvalidToken(_) => "invalid_token",
            TraceError::DeadlineExceeded(_) => "deadline_exceeded",
            TraceError::Unexpected(_) => "trace_failed",
        }
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, TraceError::InvalidWallet(_) | TraceError::InvalidToken(_))
    }

    pub fn to_failure(&self) -> TraceFailure {
        TraceFailure {
            kind: self.kind().to_string(),
            message: self.to_string(),
        }
    }
}
