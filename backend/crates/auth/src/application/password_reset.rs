//! Password Reset Use Case
//!
//! Request and confirm. The request step answers the same success
//! message whether or not the email is registered, so it cannot be
//! used to enumerate accounts. The confirm step validates the new
//! password before consuming the code, so a rejected password does
//! not cost the user their code.

use std::sync::Arc;

use otp::models::{OtpChannel, OtpCode, OtpPurpose};
use otp::{
    GenerateOtpInput, GenerateOtpUseCase, OtpConfig, OtpRecordRepository, VerifyOtpInput,
    VerifyOtpUseCase,
};

use crate::application::config::AuthConfig;
use crate::domain::notification::{OtpDelivery, OtpNotifier};
use crate::domain::repository::UserRepository;
use crate::domain::value_object::{
    email::Email,
    user_password::{RawPassword, UserPassword},
};
use crate::error::{AuthError, AuthResult};

/// Reset request input
pub struct RequestPasswordResetInput {
    pub email: String,
    pub channel: OtpChannel,
}

/// Reset confirm input
pub struct ConfirmPasswordResetInput {
    pub email: String,
    pub channel: OtpChannel,
    pub code: String,
    pub new_password: String,
}

/// Output for both steps
#[derive(Debug)]
pub struct PasswordResetOutput {
    pub message: String,
}

/// Password reset use case
pub struct PasswordResetUseCase<U, O, N>
where
    U: UserRepository,
    O: OtpRecordRepository,
    N: OtpNotifier,
{
    user_repo: Arc<U>,
    otp_repo: Arc<O>,
    notifier: Arc<N>,
    config: Arc<AuthConfig>,
    otp_config: Arc<OtpConfig>,
}

impl<U, O, N> PasswordResetUseCase<U, O, N>
where
    U: UserRepository,
    O: OtpRecordRepository,
    N: OtpNotifier,
{
    pub fn new(
        user_repo: Arc<U>,
        otp_repo: Arc<O>,
        notifier: Arc<N>,
        config: Arc<AuthConfig>,
        otp_config: Arc<OtpConfig>,
    ) -> Self {
        Self {
            user_repo,
            otp_repo,
            notifier,
            config,
            otp_config,
        }
    }

    /// Issue and dispatch a reset code
    ///
    /// Succeeds with the same message for unknown addresses.
    pub async fn request(
        &self,
        input: RequestPasswordResetInput,
    ) -> AuthResult<PasswordResetOutput> {
        let message =
            "If an account exists for this address, a reset code has been sent".to_string();

        let email = Email::new(input.email).map_err(|e| AuthError::Validation(e.to_string()))?;

        let Some(user) = self.user_repo.find_by_email(&email).await? else {
            tracing::debug!("Password reset requested for unknown email");
            return Ok(PasswordResetOutput { message });
        };

        let issued = GenerateOtpUseCase::new(self.otp_repo.clone(), self.otp_config.clone())
            .execute(GenerateOtpInput {
                user_id: user.user_id,
                purpose: OtpPurpose::ResetPassword,
                channel: input.channel,
            })
            .await?;

        let delivery = OtpDelivery {
            channel: input.channel,
            recipient: user.email.as_str().to_string(),
            display_name: user.display_name.as_str().to_string(),
            purpose: OtpPurpose::ResetPassword,
            code: issued.code,
            expires_in_minutes: self.otp_config.expiry_ms(OtpPurpose::ResetPassword) / 60_000,
        };
        if let Err(e) = self.notifier.deliver(delivery).await {
            tracing::warn!(
                user_id = %user.user_id,
                error = %e,
                "Reset code dispatch failed; user can request a resend"
            );
        }

        Ok(PasswordResetOutput { message })
    }

    /// Consume a reset code and store the new password hash
    pub async fn confirm(
        &self,
        input: ConfirmPasswordResetInput,
    ) -> AuthResult<PasswordResetOutput> {
        let email = Email::new(input.email).map_err(|e| AuthError::Validation(e.to_string()))?;
        let code =
            OtpCode::new(&input.code).map_err(|e| AuthError::Validation(e.to_string()))?;

        // Validate the replacement before the code is spent
        let raw_password = RawPassword::new(input.new_password)
            .map_err(|e| AuthError::Validation(e.to_string()))?;

        let user = self
            .user_repo
            .find_by_email(&email)
            .await?
            .ok_or(AuthError::UserNotFound)?;

        VerifyOtpUseCase::new(self.otp_repo.clone(), self.otp_config.clone())
            .execute(VerifyOtpInput {
                user_id: user.user_id,
                purpose: OtpPurpose::ResetPassword,
                channel: input.channel,
                code,
            })
            .await?;

        let password =
            UserPassword::from_raw(&raw_password, self.config.pepper(), self.config.hash_params)
                .map_err(|e| AuthError::Internal(e.to_string()))?;
        self.user_repo
            .update_password(user.user_id, &password)
            .await?;

        tracing::info!(
            public_id = %user.public_id,
            user_id = %user.user_id,
            "Password reset"
        );

        Ok(PasswordResetOutput {
            message: "Password reset successfully".to_string(),
        })
    }
}
