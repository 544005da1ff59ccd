//! Authentication provider error types.

use thiserror::Error;

/// Errors that can occur while talking to the authentication provider.
#[derive(Debug, Error)]
pub enum AuthProviderError {
    /// The request could not be sent or the response not read.
    #[error("auth provider request failed: {0}")]
    Request(String),

    /// The provider answered with a non-success status.
    #[error("auth provider returned status {0}")]
    Status(u16),

    /// The session document could not be decoded.
    #[error("invalid session response: {0}")]
    Decode(String),

    /// A provider URL could not be built.
    #[error("invalid auth provider url: {0}")]
    Url(#[from] url::ParseError),
}

impl From<reqwest::Error> for AuthProviderError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Self::Decode(err.to_string())
        } else {
            Self::Request(err.to_string())
        }
    }
}
