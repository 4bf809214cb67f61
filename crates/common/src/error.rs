//! Common error types shared across crates.

use thiserror::Error;

/// Top-level service error type.
///
/// Variants map to HTTP status codes returned to callers:
/// - [`ServiceError::BadRequest`] → 400
/// - [`ServiceError::Unauthenticated`] → 401
/// - [`ServiceError::NotFound`] → 404
/// - [`ServiceError::ValueUnreadable`] → 500
/// - [`ServiceError::Internal`] → 500
#[derive(Debug, Error)]
pub enum ServiceError {
    /// The request was malformed — missing header, unknown item kind, or invalid JSON.
    #[error("bad request: {0}")]
    BadRequest(String),

    /// No verified user identity accompanied the request.
    #[error("unauthenticated: {0}")]
    Unauthenticated(String),

    /// The requested item does not exist for this user.
    #[error("not found: {0}")]
    NotFound(String),

    /// A stored value exists but can no longer be read back.
    ///
    /// This is distinct from "no value was ever stored" (a null field): it
    /// signals tampering, corruption, or a master-secret mismatch and must
    /// never be collapsed into an empty value.
    #[error("value unreadable: {0}")]
    ValueUnreadable(String),

    /// An unexpected internal error occurred.
    #[error("internal error: {0}")]
    Internal(String),
}

impl ServiceError {
    /// Returns the HTTP status code that should be sent for this error.
    pub fn http_status(&self) -> u16 {
        match self {
            ServiceError::BadRequest(_) => 400,
            ServiceError::Unauthenticated(_) => 401,
            ServiceError::NotFound(_) => 404,
            ServiceError::ValueUnreadable(_) => 500,
            ServiceError::Internal(_) => 500,
        }
    }

    /// Short machine-readable code used in error response bodies.
    pub fn code(&self) -> &'static str {
        match self {
            ServiceError::BadRequest(_) => "bad_request",
            ServiceError::Unauthenticated(_) => "unauthenticated",
            ServiceError::NotFound(_) => "not_found",
            ServiceError::ValueUnreadable(_) => "value_unreadable",
            ServiceError::Internal(_) => "internal_error",
        }
    }
}
