use thiserror::Error;

/// Token acquisition failures.
///
/// All variants abort the authenticated call being made; none are retried
/// locally. The next request simply tries again.
#[derive(Debug, Error)]
pub enum TokenError {
    #[error("token endpoint request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("token endpoint returned no token")]
    EndpointRejected,

    #[error("access token cannot be null")]
    NullToken,

    #[error("malformed token response: {0}")]
    MalformedResponse(#[source] reqwest::Error),
}
