//! Application error type shared by every stage of the request pipeline.
//!
//! Every failure that can reach a client is an [`AppError`]: an HTTP status,
//! an [`ErrorKind`] naming the failure class, and the underlying error whose
//! top-level message becomes the response body. The response shape is always
//!
//! ```text
//! { "status": 400, "message": "Malformed request body" }
//! ```
//!
//! Internal failures (storage, hashing, signing, mail) are answered with a
//! generic message; their detail only reaches the logs.

use anyhow::{Error, anyhow};
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Failure classes a request can end in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// A required request field is missing or the body is not decodable.
    MalformedRequest,
    /// The endpoint needs a credential and none (or an undecodable one) was sent.
    AuthenticationRequired,
    /// The caller's account has not completed email verification.
    UserNotVerified,
    /// The endpoint's user-eligibility check rejected the caller.
    InvalidUser,
    /// The endpoint's precondition rejected the request.
    AccessDenied,
    NotFound,
    /// A business rule raised by a domain action.
    DomainValidation,
    /// Duplicate registration.
    Conflict,
    /// No specific class was assigned by the producer of the error.
    Unspecified,
    Internal,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::MalformedRequest => "malformed_request",
            ErrorKind::AuthenticationRequired => "authentication_required",
            ErrorKind::UserNotVerified => "user_not_verified",
            ErrorKind::InvalidUser => "invalid_user",
            ErrorKind::AccessDenied => "access_denied",
            ErrorKind::NotFound => "not_found",
            ErrorKind::DomainValidation => "domain_validation",
            ErrorKind::Conflict => "conflict",
            ErrorKind::Unspecified => "unspecified",
            ErrorKind::Internal => "internal",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// JSON body of every error response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub status: u16,
    pub message: String,
}

#[derive(Debug)]
pub struct AppError {
    pub status: StatusCode,
    pub kind: ErrorKind,
    pub error: Error,
}

impl AppError {
    pub fn new<E>(status: StatusCode, kind: ErrorKind, err: E) -> Self
    where
        E: Into<Error>,
    {
        Self {
            status,
            kind,
            error: err.into(),
        }
    }

    pub fn malformed_request() -> Self {
        Self::new(
            StatusCode::BAD_REQUEST,
            ErrorKind::MalformedRequest,
            anyhow!("Malformed request body"),
        )
    }

    pub fn authentication_required() -> Self {
        Self::new(
            StatusCode::FORBIDDEN,
            ErrorKind::AuthenticationRequired,
            anyhow!("Authentication is required"),
        )
    }

    pub fn user_not_verified() -> Self {
        Self::new(
            StatusCode::BAD_REQUEST,
            ErrorKind::UserNotVerified,
            anyhow!("User is not verified"),
        )
    }

    pub fn invalid_user() -> Self {
        Self::new(
            StatusCode::BAD_REQUEST,
            ErrorKind::InvalidUser,
            anyhow!("Invalid user passed"),
        )
    }

    pub fn access_denied() -> Self {
        Self::new(
            StatusCode::BAD_REQUEST,
            ErrorKind::AccessDenied,
            anyhow!("Invalid request, access denied"),
        )
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(
            StatusCode::NOT_FOUND,
            ErrorKind::NotFound,
            anyhow!(message.into()),
        )
    }

    pub fn domain(message: impl Into<String>) -> Self {
        Self::new(
            StatusCode::BAD_REQUEST,
            ErrorKind::DomainValidation,
            anyhow!(message.into()),
        )
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(
            StatusCode::BAD_REQUEST,
            ErrorKind::Conflict,
            anyhow!(message.into()),
        )
    }

    pub fn internal<E>(err: E) -> Self
    where
        E: Into<Error>,
    {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, ErrorKind::Internal, err)
    }

    pub fn internal_error(message: impl Into<String>) -> Self {
        Self::internal(anyhow!(message.into()))
    }

    /// Message sent to the client. Internal detail never leaves the process.
    pub fn message(&self) -> String {
        match self.kind {
            ErrorKind::Internal => "Internal server error".to_string(),
            _ => self.error.to_string(),
        }
    }

    pub fn body(&self) -> ErrorBody {
        ErrorBody {
            status: self.status.as_u16(),
            message: self.message(),
        }
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}): {}", self.status.as_u16(), self.kind, self.error)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        (self.status, Json(self.body())).into_response()
    }
}

// Errors raised without a class fall back to 400, the chain-wide default.
impl<E> From<E> for AppError
where
    E: Into<Error>,
{
    fn from(err: E) -> Self {
        AppError::new(StatusCode::BAD_REQUEST, ErrorKind::Unspecified, err)
    }
}
