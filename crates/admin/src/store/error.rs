//! Store API errors.

use thiserror::Error;

/// Errors that can occur when talking to the store API.
///
/// Any non-2xx answer is a [`ApiError::Status`]; callers treat every variant
/// uniformly as "operation failed".
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request could not be built or sent.
    #[error("store API request failed: {0}")]
    Request(String),

    /// The API answered with a non-success status.
    #[error("store API returned {status}: {body}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Response body (truncated).
        body: String,
    },

    /// The response body could not be decoded.
    #[error("store API response error: {0}")]
    Decode(String),

    /// An endpoint URL could not be built.
    #[error("invalid store API URL: {0}")]
    Url(String),
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Self::Decode(err.to_string())
        } else {
            Self::Request(err.to_string())
        }
    }
}
