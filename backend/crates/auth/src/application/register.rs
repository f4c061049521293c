//! Register Use Case
//!
//! Creates an unverified account and issues its first verification
//! code. The account cannot log in until that code (or a resent one)
//! is consumed.

use std::sync::Arc;

use otp::models::{OtpChannel, OtpPurpose};
use otp::{GenerateOtpInput, GenerateOtpUseCase, OtpConfig, OtpRecordRepository};

use crate::application::config::AuthConfig;
use crate::domain::entity::user::User;
use crate::domain::notification::{OtpDelivery, OtpNotifier};
use crate::domain::repository::UserRepository;
use crate::domain::value_object::{
    display_name::DisplayName,
    email::Email,
    user_password::{RawPassword, UserPassword},
};
use crate::error::{AuthError, AuthResult};

/// Register input
pub struct RegisterInput {
    pub display_name: String,
    pub email: String,
    pub password: String,
}

/// Register output
#[derive(Debug)]
pub struct RegisterOutput {
    pub public_id: String,
    pub message: String,
}

/// Register use case
pub struct RegisterUseCase<U, O, N>
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

impl<U, O, N> RegisterUseCase<U, O, N>
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

    pub async fn execute(&self, input: RegisterInput) -> AuthResult<RegisterOutput> {
        let email = Email::new(input.email).map_err(|e| AuthError::Validation(e.to_string()))?;
        let display_name = DisplayName::new(&input.display_name)
            .map_err(|e| AuthError::Validation(e.to_string()))?;

        // A verified holder owns the address outright; an unverified
        // one should resend their code instead of re-registering.
        if let Some(existing) = self.user_repo.find_by_email(&email).await? {
            if existing.is_verified() {
                return Err(AuthError::EmailTaken);
            }
            return Err(AuthError::RegistrationPending);
        }

        let raw_password =
            RawPassword::new(input.password).map_err(|e| AuthError::Validation(e.to_string()))?;
        let password =
            UserPassword::from_raw(&raw_password, self.config.pepper(), self.config.hash_params)
                .map_err(|e| AuthError::Internal(e.to_string()))?;

        let user = User::new(email, display_name, password);
        self.user_repo.create(&user).await?;

        // First verification code; failures past this point must not
        // roll the account back, the user can always request a resend
        let issued = GenerateOtpUseCase::new(self.otp_repo.clone(), self.otp_config.clone())
            .execute(GenerateOtpInput {
                user_id: user.user_id,
                purpose: OtpPurpose::Register,
                channel: OtpChannel::Email,
            })
            .await?;

        let delivery = OtpDelivery {
            channel: OtpChannel::Email,
            recipient: user.email.as_str().to_string(),
            display_name: user.display_name.as_str().to_string(),
            purpose: OtpPurpose::Register,
            code: issued.code,
            expires_in_minutes: self.otp_config.expiry_ms(OtpPurpose::Register) / 60_000,
        };
        if let Err(e) = self.notifier.deliver(delivery).await {
            tracing::warn!(
                user_id = %user.user_id,
                error = %e,
                "Verification code dispatch failed; user can request a resend"
            );
        }

        tracing::info!(
            public_id = %user.public_id,
            user_id = %user.user_id,
            "User registered, verification pending"
        );

        Ok(RegisterOutput {
            public_id: user.public_id.to_string(),
            message: "Registration successful. Check your email for the verification code."
                .to_string(),
        })
    }
}
