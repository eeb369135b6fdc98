use thiserror::Error;

/// Errors raised by a query executor.
#[derive(Debug, Error)]
pub enum ExecutorError {
    #[error("Missing API token. Set DISCOURSE_API_TOKEN or executor.api_token.")]
    MissingToken,

    #[error("Missing configuration: {0}")]
    MissingConfig(String),

    #[error("API returned error: {status} - {message}")]
    ApiError { status: u16, message: String },

    #[error("Failed to parse response: {0}")]
    ParseError(String),

    #[error("Rate limited. Try again later.")]
    RateLimited,

    #[error("Network error: {0}")]
    Network(String),

    #[error("Query rejected: {0}")]
    Rejected(String),
}

impl From<reqwest::Error> for ExecutorError {
    fn from(err: reqwest::Error) -> Self {
        ExecutorError::Network(err.to_string())
    }
}
