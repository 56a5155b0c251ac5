use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Not logged in")]
    AuthRequired,

    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Server returned {status}: {message}")]
    Status { status: u16, message: String },

    #[error("Unexpected response shape: {0}")]
    Decode(String),

    #[error("AI session start did not return a session id")]
    MissingSessionId,

    #[error("Token storage error: {0}")]
    TokenStore(#[from] std::io::Error),
}

impl ApiError {
    /// HTTP status code of the failure, if this error came from a response.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}
