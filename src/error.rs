//! Broker error types.
//!
//! [`AdmissionError`] and [`PairingError`] belong to the core and are never
//! fatal: admission failures become a `joinError` event, pairing failures are
//! logged and leave state untouched. [`BrokerError`] is the HTTP-facing error
//! with status code mapping and a structured JSON body.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::ConnectionId;

/// Structured JSON error response body.
///
/// All error responses follow this shape:
/// ```json
/// {
///   "error": {
///     "code": 1001,
///     "message": "invalid email: a@gmail.com"
///   }
/// }
/// ```
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    /// Structured error payload.
    pub error: ErrorBody,
}

/// Inner error body with numeric code and human-readable message.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorBody {
    /// Numeric error code.
    pub code: u32,
    /// Human-readable error message.
    pub message: String,
    /// Optional additional details.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

/// Why a connection could not be admitted.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AdmissionError {
    /// The email does not belong to the admission domain.
    #[error("invalid email domain: {email}")]
    InvalidDomain {
        /// The rejected address.
        email: String,
    },

    /// The connection has already been admitted.
    #[error("connection {0} has already joined")]
    AlreadyAdmitted(ConnectionId),

    /// The connection is not (or no longer) live.
    #[error("unknown connection {0}")]
    UnknownConnection(ConnectionId),
}

/// A pairing that would break a pairing invariant.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PairingError {
    /// Both members are the same connection.
    #[error("cannot pair connection {0} with itself")]
    SameConnection(ConnectionId),

    /// Both members share an email.
    #[error("cannot pair two sessions of {0}")]
    SameEmail(String),

    /// A member already has an active pairing.
    #[error("connection {0} is already paired")]
    AlreadyPaired(ConnectionId),
}

/// HTTP-facing error enum.
///
/// # Error Code Ranges
///
/// | Range     | Category   | HTTP Status               |
/// |-----------|------------|---------------------------|
/// | 1000–1999 | Validation | 400 Bad Request           |
#[derive(Debug, thiserror::Error)]
pub enum BrokerError {
    /// Email does not match the admission domain.
    #[error("invalid email: {0}")]
    InvalidEmail(String),

    /// Unsupported matchmaking action.
    #[error("invalid action: {0}")]
    InvalidAction(String),

    /// Request validation failed.
    #[error("invalid request: {0}")]
    InvalidRequest(String),
}

impl BrokerError {
    /// Returns the numeric error code for this variant.
    #[must_use]
    pub const fn error_code(&self) -> u32 {
        match self {
            Self::InvalidEmail(_) => 1001,
            Self::InvalidAction(_) => 1002,
            Self::InvalidRequest(_) => 1003,
        }
    }

    /// Returns the HTTP status code for this variant.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidEmail(_) | Self::InvalidAction(_) | Self::InvalidRequest(_) => {
                StatusCode::BAD_REQUEST
            }
        }
    }
}

impl IntoResponse for BrokerError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = ErrorResponse {
            error: ErrorBody {
                code: self.error_code(),
                message: self.to_string(),
                details: None,
            },
        };
        let mut response = axum::Json(body).into_response();
        *response.status_mut() = status;
        response
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_errors_are_bad_request() {
        assert_eq!(
            BrokerError::InvalidEmail("x".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            BrokerError::InvalidAction("x".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(BrokerError::InvalidAction("x".into()).error_code(), 1002);
    }

    #[test]
    fn into_response_sets_status() {
        let response = BrokerError::InvalidRequest("bad json".into()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
