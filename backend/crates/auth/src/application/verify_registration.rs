//! Verify Registration Use Case
//!
//! Consumes a REGISTER code and flips the account to verified. Account
//! state is checked before the engine runs, so an already-verified
//! user gets a clear conflict instead of burning a retry.

use std::sync::Arc;

use otp::models::{OtpChannel, OtpCode, OtpPurpose};
use otp::{OtpConfig, OtpRecordRepository, VerifyOtpInput, VerifyOtpUseCase};

use crate::domain::repository::UserRepository;
use crate::domain::value_object::email::Email;
use crate::error::{AuthError, AuthResult};

/// Verify registration input
pub struct VerifyRegistrationInput {
    pub email: String,
    pub channel: OtpChannel,
    pub code: String,
}

/// Verify registration output
#[derive(Debug)]
pub struct VerifyRegistrationOutput {
    pub message: String,
}

/// Verify registration use case
pub struct VerifyRegistrationUseCase<U, O>
where
    U: UserRepository,
    O: OtpRecordRepository,
{
    user_repo: Arc<U>,
    otp_repo: Arc<O>,
    otp_config: Arc<OtpConfig>,
}

impl<U, O> VerifyRegistrationUseCase<U, O>
where
    U: UserRepository,
    O: OtpRecordRepository,
{
    pub fn new(user_repo: Arc<U>, otp_repo: Arc<O>, otp_config: Arc<OtpConfig>) -> Self {
        Self {
            user_repo,
            otp_repo,
            otp_config,
        }
    }

    pub async fn execute(
        &self,
        input: VerifyRegistrationInput,
    ) -> AuthResult<VerifyRegistrationOutput> {
        let email = Email::new(input.email).map_err(|e| AuthError::Validation(e.to_string()))?;
        let code =
            OtpCode::new(&input.code).map_err(|e| AuthError::Validation(e.to_string()))?;

        let user = self
            .user_repo
            .find_by_email(&email)
            .await?
            .ok_or(AuthError::UserNotFound)?;

        if user.is_verified() {
            return Err(AuthError::AlreadyVerified);
        }

        VerifyOtpUseCase::new(self.otp_repo.clone(), self.otp_config.clone())
            .execute(VerifyOtpInput {
                user_id: user.user_id,
                purpose: OtpPurpose::Register,
                channel: input.channel,
                code,
            })
            .await?;

        self.user_repo.mark_verified(user.user_id).await?;

        tracing::info!(
            public_id = %user.public_id,
            user_id = %user.user_id,
            "Account verified"
        );

        Ok(VerifyRegistrationOutput {
            message: "Account verified successfully".to_string(),
        })
    }
}
