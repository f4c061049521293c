//! OTP engine error types
//!
//! Transport-free: this crate maps failures to [`ErrorKind`] and
//! leaves HTTP (or any other surface) to the caller.

use kernel::error::{app_error::AppError, kind::ErrorKind};
use platform::secret::SecretHashError;
use thiserror::Error;

pub type OtpResult<T> = Result<T, OtpError>;

/// Everything the OTP lifecycle can refuse to do
#[derive(Debug, Error)]
pub enum OtpError {
    /// Resend requested inside the cooldown window
    #[error("Please wait {wait_seconds} seconds before requesting a new code")]
    ResendTooSoon { wait_seconds: i64 },

    /// No PENDING record for the key
    #[error("No pending verification code")]
    NoPendingOtp,

    /// Retry budget spent; the record is blocked
    #[error("Too many wrong attempts; request a new code")]
    MaxRetryExceeded,

    /// Record past its expiry instant
    #[error("Verification code expired; request a new code")]
    Expired,

    /// Submitted code did not match
    #[error("Invalid verification code (attempt {attempt} of {max_retry})")]
    InvalidCode { attempt: i16, max_retry: i16 },

    /// Argon2id hashing failed
    #[error("Code hashing failed: {0}")]
    CodeHashing(#[from] SecretHashError),

    /// Persistence failure
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Corrupt stored state (unknown enum id, bad PHC string)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl OtpError {
    /// Classification for the error envelope
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::ResendTooSoon { .. } => ErrorKind::TooManyRequests,
            Self::NoPendingOtp => ErrorKind::NotFound,
            Self::MaxRetryExceeded => ErrorKind::Forbidden,
            Self::Expired => ErrorKind::Gone,
            Self::InvalidCode { .. } => ErrorKind::Unauthorized,
            Self::CodeHashing(_) | Self::Database(_) | Self::Internal(_) => {
                ErrorKind::InternalServerError
            }
        }
    }

    /// Log with a level matching severity
    ///
    /// Expected user mistakes stay at debug/warn; only infrastructure
    /// failures are errors.
    pub fn log(&self) {
        match self {
            Self::ResendTooSoon { wait_seconds } => {
                tracing::debug!(wait_seconds, "OTP resend throttled")
            }
            Self::NoPendingOtp => tracing::debug!("No pending OTP for verification"),
            Self::MaxRetryExceeded => tracing::warn!("OTP retry budget exhausted"),
            Self::Expired => tracing::debug!("OTP expired"),
            Self::InvalidCode { attempt, max_retry } => {
                tracing::warn!(attempt, max_retry, "Wrong OTP submitted")
            }
            Self::CodeHashing(e) => tracing::error!(error = %e, "OTP code hashing failed"),
            Self::Database(e) => tracing::error!(error = %e, "OTP database error"),
            Self::Internal(message) => tracing::error!(message, "OTP internal error"),
        }
    }
}

impl From<OtpError> for AppError {
    fn from(err: OtpError) -> Self {
        AppError::new(err.kind(), err.to_string())
    }
}
