//! Auth Error Types
//!
//! Auth-specific error variants that integrate with the unified
//! `kernel::error::AppError` system. Every credential and token failure
//! renders the same 401 body; the distinct variants exist for logging.

use std::time::Duration;

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use kernel::error::{
    app_error::{AppError, FieldViolation},
    kind::ErrorKind,
};
use platform::password::PasswordHashError;
use thiserror::Error;

use crate::application::token_issuer::TokenError;

/// Auth-specific result type alias
pub type AuthResult<T> = Result<T, AuthError>;

/// Client-facing message for every 401
pub const UNAUTHORIZED_MESSAGE: &str = "Invalid credentials.";

pub const RATE_LIMIT_MESSAGE: &str = "Too many requests from this IP, please try again later.";

const MALFORMED_BODY_MESSAGE: &str = "Malformed JSON body.";
const VALIDATION_MESSAGE: &str = "Validation failed.";
const EMAIL_TAKEN_MESSAGE: &str = "Email already in use.";
const UNAVAILABLE_MESSAGE: &str = "Service temporarily unavailable.";
const INTERNAL_MESSAGE: &str = "Internal server error.";

/// Auth-specific error variants
#[derive(Debug, Error)]
pub enum AuthError {
    /// Request body failed field validation
    #[error("Validation failed: {} field(s)", .0.len())]
    Validation(Vec<FieldViolation>),

    /// Body is not valid JSON for the endpoint
    #[error("Malformed request body: {0}")]
    MalformedBody(#[from] JsonRejection),

    /// Email already registered
    #[error("Email already in use")]
    EmailTaken,

    /// Unknown email or wrong password
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// No bearer header or refresh cookie presented
    #[error("Missing or malformed credentials")]
    MissingToken,

    /// Token failed verification
    #[error("Token rejected: {0}")]
    Token(#[from] TokenError),

    /// Token subject no longer exists
    #[error("Token subject not found")]
    AccountNotFound,

    /// Token minted under a revoked version
    #[error("Token version is stale")]
    TokenVersionMismatch,

    /// Per-address request cap exceeded
    #[error("Rate limit exceeded")]
    RateLimited,

    /// Store call exceeded the configured timeout
    #[error("Store call timed out after {0:?}")]
    StoreTimeout(Duration),

    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Hashing failure (invalid input or Argon2 error)
    #[error("Password hashing failed: {0}")]
    Hashing(#[from] PasswordHashError),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AuthError {
    pub fn validation(violation: FieldViolation) -> Self {
        AuthError::Validation(vec![violation])
    }

    /// True for every variant that renders as the uniform 401.
    pub fn is_unauthorized(&self) -> bool {
        self.kind() == ErrorKind::Unauthorized
    }

    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        StatusCode::from_u16(self.kind().status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }

    /// Get the ErrorKind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            AuthError::Validation(_) => ErrorKind::UnprocessableEntity,
            AuthError::MalformedBody(_) => ErrorKind::BadRequest,
            AuthError::EmailTaken => ErrorKind::Conflict,
            AuthError::InvalidCredentials
            | AuthError::MissingToken
            | AuthError::Token(_)
            | AuthError::AccountNotFound
            | AuthError::TokenVersionMismatch => ErrorKind::Unauthorized,
            AuthError::RateLimited => ErrorKind::TooManyRequests,
            AuthError::StoreTimeout(_) => ErrorKind::ServiceUnavailable,
            AuthError::Database(e) => match e {
                sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_) => {
                    ErrorKind::ServiceUnavailable
                }
                _ => ErrorKind::InternalServerError,
            },
            AuthError::Hashing(_) | AuthError::Internal(_) => ErrorKind::InternalServerError,
        }
    }

    /// Convert to AppError; internal details never reach the message.
    pub fn to_app_error(&self) -> AppError {
        let kind = self.kind();
        match self {
            AuthError::Validation(violations) => AppError::new(kind, VALIDATION_MESSAGE)
                .with_violations(violations.iter().cloned()),
            AuthError::MalformedBody(_) => AppError::new(kind, MALFORMED_BODY_MESSAGE),
            AuthError::EmailTaken => AppError::new(kind, EMAIL_TAKEN_MESSAGE),
            AuthError::RateLimited => AppError::new(kind, RATE_LIMIT_MESSAGE),
            _ => match kind {
                ErrorKind::Unauthorized => AppError::new(kind, UNAUTHORIZED_MESSAGE),
                ErrorKind::ServiceUnavailable => AppError::new(kind, UNAVAILABLE_MESSAGE),
                _ => AppError::new(kind, INTERNAL_MESSAGE),
            },
        }
    }

    /// Log the error with appropriate level
    fn log(&self) {
        match self {
            AuthError::Database(e) => {
                tracing::error!(error = %e, "Auth database error");
            }
            AuthError::StoreTimeout(after) => {
                tracing::error!(timeout = ?after, "Account store timed out");
            }
            AuthError::Hashing(e) => {
                tracing::error!(error = %e, "Password hashing failed");
            }
            AuthError::Internal(msg) => {
                tracing::error!(message = %msg, "Auth internal error");
            }
            AuthError::InvalidCredentials => {
                tracing::warn!("Invalid login attempt");
            }
            AuthError::RateLimited => {
                tracing::warn!("Auth rate limit exceeded");
            }
            AuthError::Token(reason) => {
                tracing::debug!(reason = %reason, "Token rejected");
            }
            _ => {
                tracing::debug!(error = %self, "Auth error");
            }
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        self.log();
        self.to_app_error().into_response()
    }
}
