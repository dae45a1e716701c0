//! Error types for the Runscope API client.

use thiserror::Error;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Base error type for Runscope operations.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Authentication failed: {0}")]
    Auth(#[from] AuthError),

    #[error("API error: {0}")]
    Api(#[from] ApiError),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Request rejected locally before anything was sent.
    #[error("Invalid request: {0}")]
    Validation(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("{0}")]
    Other(String),
}

impl Error {
    /// HTTP or envelope status code, when the service reported one.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Error::Api(e) => e.status_code,
            Error::Auth(_) => Some(401),
            Error::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

/// Raised when the service rejects the bearer token.
#[derive(Error, Debug)]
#[error("{message}")]
pub struct AuthError {
    pub message: String,
}

/// Raised when the service answers with a non-2xx status or an envelope
/// whose `error.message` is set.
#[derive(Error, Debug)]
#[error("{message}")]
pub struct ApiError {
    pub message: String,
    pub status_code: Option<u16>,
    /// `meta.status` from the envelope, e.g. `"error"`.
    pub meta_status: Option<String>,
    pub response_data: Option<serde_json::Value>,
}

impl ApiError {
    pub fn new(
        message: impl Into<String>,
        status_code: Option<u16>,
        response_data: Option<serde_json::Value>,
    ) -> Self {
        Self {
            message: message.into(),
            status_code,
            meta_status: None,
            response_data,
        }
    }

    pub fn with_meta_status(mut self, meta_status: Option<String>) -> Self {
        self.meta_status = meta_status;
        self
    }
}
