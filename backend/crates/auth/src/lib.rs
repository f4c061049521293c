//! Auth (Account Flows) Backend Module
//!
//! Clean Architecture structure:
//! - `domain/` - User entity, value objects, repository and notifier traits
//! - `application/` - Use cases and application services
//! - `infra/` - Database implementations, notification dispatch
//! - `presentation/` - HTTP handlers, DTOs, router
//!
//! ## Features
//! - Registration with email verification codes
//! - Two-step login for accounts with 2FA enabled
//! - Password reset via one-time codes
//! - Stateless bearer tokens for API access
//!
//! ## Security Model
//! - Passwords hashed with Argon2id (NIST SP 800-63B compliant)
//! - Verification codes run through the `otp` engine (hashed at rest,
//!   expiring, retry-limited, resend-throttled)
//! - Access tokens carry an HMAC-SHA-256 tag; verification is
//!   constant-time
//! - Login failures are indistinguishable between unknown address and
//!   wrong password

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;

// Re-exports for convenience
pub use application::config::AuthConfig;
pub use error::{AuthError, AuthResult};
pub use infra::notify::LogNotifier;
pub use infra::postgres::PgAuthRepository;
pub use presentation::router::auth_router;

// Re-export kernel error types for unified error handling
pub use kernel::error::{
    app_error::{AppError, AppResult},
    kind::ErrorKind,
};

// Convenience re-exports
pub mod config {
    pub use crate::application::config::*;
}

pub mod models {
    pub use crate::domain::entity::*;
    pub use crate::domain::value_object::*;
    pub use crate::presentation::dto::*;
}

pub mod handlers {
    pub use crate::presentation::handlers::*;
}

pub mod store {
    pub use crate::infra::postgres::PgAuthRepository as AuthStore;
}

pub mod router {
    pub use crate::presentation::router::*;
}
