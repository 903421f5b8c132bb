use thiserror::Error;

/// Failure of a single backend call. Every variant is local to the action
/// that triggered it; nothing here is fatal to the process.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ApiError {
    #[error("HTTP {status}: {message}")]
    Http { status: u16, message: String },

    #[error("Network error: {0}")]
    Network(String),

    #[error("Request timed out after {0}s")]
    Timeout(u64),

    #[error("Could not decode response: {0}")]
    Decode(String),

    #[error("Not signed in. Run `doula-admin login <email>` first")]
    NotAuthenticated,

    #[error("{0}")]
    Validation(String),
}

impl From<serde_json::Error> for ApiError {
    fn from(e: serde_json::Error) -> Self {
        ApiError::Decode(e.to_string())
    }
}

impl ApiError {
    /// Short text suitable for a one-line notice.
    pub fn summary(&self) -> String {
        match self {
            ApiError::Http { status, message } if message.is_empty() => format!("HTTP {}", status),
            ApiError::Http { message, .. } => message.clone(),
            other => other.to_string(),
        }
    }
}
