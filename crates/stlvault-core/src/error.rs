/// Error types for the STLVault core.
use thiserror::Error;

/// Failure of a single backend request.
///
/// Not-found is its own variant because views render it differently from
/// other failures (retry with cooldown plus a way home).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// No response: connection refused, DNS, timeout, TLS.
    #[error("no response from server: {0}")]
    Transport(String),

    #[error("not found: {path}")]
    NotFound { path: String },

    #[error("unauthorized, check the API key")]
    Unauthorized,

    #[error("server returned {code}: {message}")]
    Status { code: u16, message: String },

    #[error("could not decode response: {0}")]
    Decode(String),
}

impl ApiError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Transport failures and 5xx responses may succeed on a later attempt.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Transport(_) => true,
            Self::Status { code, .. } => *code >= 500,
            _ => false,
        }
    }
}

/// Failure of a session store operation.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("session store I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("could not serialise session value: {0}")]
    Serialize(#[from] serde_json::Error),
}
