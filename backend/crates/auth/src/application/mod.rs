//! Application Layer
//!
//! Use cases and application services.

pub mod auth_status;
pub mod config;
pub mod login;
pub mod password_reset;
pub mod register;
pub mod resend_otp;
pub mod token;
pub mod verify_registration;

// Re-exports
pub use auth_status::{AuthStatusOutput, AuthStatusUseCase};
pub use config::AuthConfig;
pub use login::{LoginInput, LoginOutput, LoginUseCase, VerifyLoginInput};
pub use password_reset::{
    ConfirmPasswordResetInput, PasswordResetUseCase, RequestPasswordResetInput,
};
pub use register::{RegisterInput, RegisterOutput, RegisterUseCase};
pub use resend_otp::{ResendOtpInput, ResendOtpUseCase};
pub use token::{issue_access_token, verify_access_token, TokenClaims};
pub use verify_registration::{VerifyRegistrationInput, VerifyRegistrationUseCase};
