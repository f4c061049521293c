//! Auth Error Types
//!
//! This module provides auth-specific error variants that integrate
//! with the unified `kernel::error::AppError` system. Engine failures
//! pass through as [`AuthError::Otp`] so their status mapping (429 for
//! throttling, 410 for expiry, ...) survives to the HTTP surface.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use kernel::error::{app_error::AppError, kind::ErrorKind};
use otp::OtpError;
use thiserror::Error;

/// Auth-specific result type alias
pub type AuthResult<T> = Result<T, AuthError>;

/// Auth-specific error variants
#[derive(Debug, Error)]
pub enum AuthError {
    /// Email belongs to a verified account
    #[error("Email already in use")]
    EmailTaken,

    /// Email belongs to an account still awaiting verification
    #[error("Account already registered but not verified; request a new verification code")]
    RegistrationPending,

    /// User not found
    #[error("User not found")]
    UserNotFound,

    /// Account already verified
    #[error("Account is already verified")]
    AlreadyVerified,

    /// Invalid credentials (unknown email or wrong password)
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// Login attempted before the email was verified
    #[error("Account is not verified")]
    AccountNotVerified,

    /// Access token missing, malformed, tampered with or expired
    #[error("Invalid or expired token")]
    InvalidToken,

    /// Request payload failed validation
    #[error("Validation failed: {0}")]
    Validation(String),

    /// Verification code failure, passed through from the engine
    #[error(transparent)]
    Otp(#[from] OtpError),

    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AuthError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            AuthError::EmailTaken | AuthError::RegistrationPending => StatusCode::CONFLICT,
            AuthError::UserNotFound => StatusCode::NOT_FOUND,
            AuthError::AlreadyVerified => StatusCode::CONFLICT,
            AuthError::InvalidCredentials | AuthError::InvalidToken => StatusCode::UNAUTHORIZED,
            AuthError::AccountNotVerified => StatusCode::FORBIDDEN,
            AuthError::Validation(_) => StatusCode::BAD_REQUEST,
            AuthError::Otp(e) => StatusCode::from_u16(e.kind().status_code())
                .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
            AuthError::Database(_) | AuthError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the ErrorKind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            AuthError::EmailTaken
            | AuthError::RegistrationPending
            | AuthError::AlreadyVerified => ErrorKind::Conflict,
            AuthError::UserNotFound => ErrorKind::NotFound,
            AuthError::InvalidCredentials | AuthError::InvalidToken => ErrorKind::Unauthorized,
            AuthError::AccountNotVerified => ErrorKind::Forbidden,
            AuthError::Validation(_) => ErrorKind::BadRequest,
            AuthError::Otp(e) => e.kind(),
            AuthError::Database(_) | AuthError::Internal(_) => ErrorKind::InternalServerError,
        }
    }

    /// Convert to AppError
    pub fn to_app_error(&self) -> AppError {
        AppError::new(self.kind(), self.to_string())
    }

    /// Log the error with appropriate level
    fn log(&self) {
        match self {
            AuthError::Database(e) => {
                tracing::error!(error = %e, "Auth database error");
            }
            AuthError::Internal(msg) => {
                tracing::error!(message = %msg, "Auth internal error");
            }
            AuthError::InvalidCredentials => {
                tracing::warn!("Invalid login attempt");
            }
            AuthError::InvalidToken => {
                tracing::debug!("Rejected access token");
            }
            AuthError::Otp(e) => e.log(),
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

impl From<AppError> for AuthError {
    fn from(err: AppError) -> Self {
        AuthError::Internal(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(AuthError::EmailTaken.status_code(), StatusCode::CONFLICT);
        assert_eq!(
            AuthError::RegistrationPending.status_code(),
            StatusCode::CONFLICT
        );
        assert_eq!(AuthError::UserNotFound.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(
            AuthError::InvalidCredentials.status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            AuthError::AccountNotVerified.status_code(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            AuthError::Validation("bad".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn test_otp_errors_keep_their_status() {
        let err = AuthError::from(OtpError::ResendTooSoon { wait_seconds: 30 });
        assert_eq!(err.status_code(), StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(err.kind(), ErrorKind::TooManyRequests);

        let err = AuthError::from(OtpError::Expired);
        assert_eq!(err.status_code(), StatusCode::GONE);

        let err = AuthError::from(OtpError::MaxRetryExceeded);
        assert_eq!(err.status_code(), StatusCode::FORBIDDEN);
    }

    #[test]
    fn test_otp_error_message_passes_through() {
        let err = AuthError::from(OtpError::InvalidCode {
            attempt: 2,
            max_retry: 3,
        });
        assert_eq!(err.to_string(), "Invalid verification code (attempt 2 of 3)");
    }

    #[test]
    fn test_to_app_error_keeps_kind() {
        let app = AuthError::EmailTaken.to_app_error();
        assert_eq!(app.kind(), ErrorKind::Conflict);
        assert_eq!(app.message(), "Email already in use");
    }
}
