//! OTP Lifecycle Engine
//!
//! Issues, throttles, verifies and retires short-lived numeric
//! verification codes keyed by `(user, purpose, channel)`.
//!
//! Clean Architecture structure:
//! - `domain/` - Record entity, value objects, repository trait
//! - `application/` - Use cases (generate / verify) and configuration
//! - `infra/` - PostgreSQL record store
//!
//! ## Security Model
//! - Codes come from the OS CSPRNG and leave the engine exactly once,
//!   in the issue result handed to the notification dispatcher
//! - At rest a code exists only as a salted Argon2id hash
//! - Resend throttling, the retry budget and expiry are enforced
//!   server-side; no client input can widen them
//! - Consumption is an atomic conditional transition, so a code is
//!   accepted at most once even under concurrent verification

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;

// Re-export kernel error types for unified error handling
pub use kernel::error::{
    app_error::{AppError, AppResult},
    kind::ErrorKind,
};

// Re-exports for convenience
pub use application::config::{OtpConfig, OtpPolicy};
pub use application::generate_otp::{GenerateOtpInput, GenerateOtpUseCase, IssuedOtp};
pub use application::verify_otp::{VerifyOtpInput, VerifyOtpUseCase};
pub use domain::repository::OtpRecordRepository;
pub use error::{OtpError, OtpResult};
pub use infra::postgres::PgOtpRepository;

pub mod config {
    pub use crate::application::config::*;
}

pub mod models {
    pub use crate::domain::entities::*;
    pub use crate::domain::value_objects::*;
}

pub mod store {
    pub use crate::infra::postgres::PgOtpRepository as OtpStore;
}

#[cfg(test)]
mod tests;
