//! Client error types
//!
//! Every failure a page controller can observe collapses into [`ApiError`].
//! Only the unauthorized variants carry a side effect (forced logout), the
//! rest end up as a single banner message.

use thiserror::Error;

/// Banner text used when the request never produced a response.
pub const GENERIC_ERROR_MESSAGE: &str = "An unexpected error occurred";

/// Banner text used when a successful response had an unexpected body.
pub const MALFORMED_RESPONSE_MESSAGE: &str = "Invalid response format";

/// Errors that can occur while talking to the backend
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ApiError {
    /// The request could not be sent or no response arrived
    #[error("Network error: {0}")]
    Network(String),

    /// The backend rejected the credential (HTTP 401)
    #[error("Unauthorized: {}", .message.as_deref().unwrap_or("session expired"))]
    Unauthorized { message: Option<String> },

    /// No credential is held, so an authenticated call was not attempted
    #[error("Not signed in")]
    NotSignedIn,

    /// Non-OK status with an optional message extracted from the body
    #[error("HTTP {status}: {}", .message.as_deref().unwrap_or("request failed"))]
    Status {
        status: u16,
        message: Option<String>,
    },

    /// OK status but the body did not match the expected shape
    #[error("Malformed response: {0}")]
    Malformed(String),

    /// The request body could not be encoded
    #[error("Request encoding error: {0}")]
    Encoding(String),

    /// The credential could not be persisted
    #[error("Session storage error: {0}")]
    Storage(String),
}

impl ApiError {
    /// Whether this error ends the session.
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ApiError::Unauthorized { .. } | ApiError::NotSignedIn)
    }

    /// Human-readable banner text.
    ///
    /// Server-provided messages win; otherwise the operation-specific
    /// `fallback` is used for application errors and a generic message for
    /// transport failures.
    pub fn banner(&self, fallback: &str) -> String {
        match self {
            ApiError::Network(_) | ApiError::Encoding(_) | ApiError::Storage(_) => {
                GENERIC_ERROR_MESSAGE.to_string()
            }
            ApiError::Unauthorized { message } | ApiError::Status { message, .. } => {
                message.clone().unwrap_or_else(|| fallback.to_string())
            }
            ApiError::NotSignedIn => "Authentication required".to_string(),
            ApiError::Malformed(_) => MALFORMED_RESPONSE_MESSAGE.to_string(),
        }
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::Malformed(err.to_string())
    }
}

impl From<SessionError> for ApiError {
    fn from(err: SessionError) -> Self {
        ApiError::Storage(err.to_string())
    }
}

/// Result type alias for API operations
pub type ApiResult<T> = Result<T, ApiError>;

/// Errors raised by token persistence
#[derive(Error, Debug)]
pub enum SessionError {
    /// Reading or writing the backing file failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The backing storage refused the operation
    #[error("Storage unavailable: {0}")]
    Unavailable(String),
}
