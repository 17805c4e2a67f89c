//! Error types for the Echo client core.

use thiserror::Error;

/// Errors produced by request translation, dispatch, mode coordination and
/// traffic queries.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EchoError {
    /// Blank target URL, or a target URL setting that is not absolute.
    #[error("Invalid target URL: {0}")]
    InvalidTargetUrl(String),

    /// Configured proxy or query API base is not an absolute URL.
    #[error("Invalid base URL: {0}")]
    InvalidProxyBaseUrl(String),

    /// Method outside GET, POST, PUT, DELETE and PATCH.
    #[error("Unsupported HTTP method: {0}")]
    UnsupportedMethod(String),

    /// Header name or value that cannot be sent over HTTP.
    #[error("Invalid header {name:?}: {reason}")]
    InvalidHeader { name: String, reason: String },

    /// Blank session identifier.
    #[error("Invalid session id: {0:?}")]
    InvalidSessionId(String),

    /// Another mode switch has not completed yet.
    #[error("A mode transition is already in progress")]
    TransitionInProgress,

    /// Remote answered a control or query call with a non-success status.
    #[error("Remote rejected request ({status}): {message}")]
    RemoteRejected { status: u16, message: String },

    /// No response was received (connect error, timeout, broken body).
    #[error("Transport failure: {0}")]
    TransportFailure(String),

    /// Remote answered with a success status but an unusable body.
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

impl EchoError {
    /// True for errors detected before anything was sent.
    pub fn is_local(&self) -> bool {
        matches!(
            self,
            EchoError::InvalidTargetUrl(_)
                | EchoError::InvalidProxyBaseUrl(_)
                | EchoError::UnsupportedMethod(_)
                | EchoError::InvalidHeader { .. }
                | EchoError::InvalidSessionId(_)
                | EchoError::TransitionInProgress
        )
    }
}

impl From<reqwest::Error> for EchoError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            EchoError::InvalidResponse(e.to_string())
        } else {
            EchoError::TransportFailure(e.to_string())
        }
    }
}
