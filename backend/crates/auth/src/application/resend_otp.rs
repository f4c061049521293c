//! Resend OTP Use Case
//!
//! Issues a replacement code for any purpose. The engine enforces the
//! cooldown and supersedes the previous code; this flow only adds the
//! account checks and the dispatch.

use std::sync::Arc;

use otp::models::{OtpChannel, OtpPurpose};
use otp::{GenerateOtpInput, GenerateOtpUseCase, OtpConfig, OtpRecordRepository};

use crate::domain::notification::{OtpDelivery, OtpNotifier};
use crate::domain::repository::UserRepository;
use crate::domain::value_object::email::Email;
use crate::error::{AuthError, AuthResult};

/// Resend input
pub struct ResendOtpInput {
    pub email: String,
    pub purpose: OtpPurpose,
    pub channel: OtpChannel,
}

/// Resend output
#[derive(Debug)]
pub struct ResendOtpOutput {
    pub message: String,
}

/// Resend use case
pub struct ResendOtpUseCase<U, O, N>
where
    U: UserRepository,
    O: OtpRecordRepository,
    N: OtpNotifier,
{
    user_repo: Arc<U>,
    otp_repo: Arc<O>,
    notifier: Arc<N>,
    otp_config: Arc<OtpConfig>,
}

impl<U, O, N> ResendOtpUseCase<U, O, N>
where
    U: UserRepository,
    O: OtpRecordRepository,
    N: OtpNotifier,
{
    pub fn new(
        user_repo: Arc<U>,
        otp_repo: Arc<O>,
        notifier: Arc<N>,
        otp_config: Arc<OtpConfig>,
    ) -> Self {
        Self {
            user_repo,
            otp_repo,
            notifier,
            otp_config,
        }
    }

    pub async fn execute(&self, input: ResendOtpInput) -> AuthResult<ResendOtpOutput> {
        let email = Email::new(input.email).map_err(|e| AuthError::Validation(e.to_string()))?;

        let user = self
            .user_repo
            .find_by_email(&email)
            .await?
            .ok_or(AuthError::UserNotFound)?;

        // A registration code is pointless once the account is verified
        if input.purpose == OtpPurpose::Register && user.is_verified() {
            return Err(AuthError::AlreadyVerified);
        }

        let issued = GenerateOtpUseCase::new(self.otp_repo.clone(), self.otp_config.clone())
            .execute(GenerateOtpInput {
                user_id: user.user_id,
                purpose: input.purpose,
                channel: input.channel,
            })
            .await?;

        let delivery = OtpDelivery {
            channel: input.channel,
            recipient: user.email.as_str().to_string(),
            display_name: user.display_name.as_str().to_string(),
            purpose: input.purpose,
            code: issued.code,
            expires_in_minutes: self.otp_config.expiry_ms(input.purpose) / 60_000,
        };
        if let Err(e) = self.notifier.deliver(delivery).await {
            tracing::warn!(
                user_id = %user.user_id,
                error = %e,
                "Verification code dispatch failed; user can request a resend"
            );
        }

        Ok(ResendOtpOutput {
            message: "A new verification code has been sent".to_string(),
        })
    }
}
