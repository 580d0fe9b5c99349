//! Shared error and result types

/// Errors raised by the plumbing around the signing workflow.
///
/// None of these reach the workflow controller: the signing surface folds
/// every failure into a single `false` outcome.
#[derive(Debug, thiserror::Error)]
pub enum SigningError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API returned {status} for {method} {uri}")]
    Status {
        method: &'static str,
        uri: String,
        status: u16,
    },

    #[error("Failed to decode response: {0}")]
    Decode(String),

    #[error("Certificate unavailable: {0}")]
    Certificate(String),

    #[error("Invalid signing window: {0}")]
    InvalidWindow(String),

    #[error("Missing path parameter: {0}")]
    MissingPathParam(String),
}

pub type Result<T> = std::result::Result<T, SigningError>;
