//! Backend call failures.

use thiserror::Error;

/// A failed backend call, reduced to a message and an optional HTTP status.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ApiError {
    #[error("failed to connect to the server: {0}")]
    Transport(String),

    #[error("request timed out")]
    Timeout,

    #[error("{detail}")]
    Status { status: u16, detail: String },

    #[error("malformed response: {0}")]
    Decode(String),
}

impl ApiError {
    pub fn status_code(&self) -> Option<u16> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// The server asked for credentials.
    pub fn is_unauthorized(&self) -> bool {
        self.status_code() == Some(401)
    }

    pub fn status(status: u16, detail: impl Into<String>) -> Self {
        ApiError::Status {
            status,
            detail: detail.into(),
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ApiError::Timeout
        } else if err.is_decode() {
            ApiError::Decode(err.to_string())
        } else {
            ApiError::Transport(err.to_string())
        }
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::Decode(err.to_string())
    }
}
