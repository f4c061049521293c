//! Login Use Case
//!
//! Password step plus the optional verification-code step for
//! accounts with the second factor enabled. Unknown email and wrong
//! password both answer `InvalidCredentials`, so a caller cannot probe
//! which addresses are registered.

use std::sync::Arc;

use chrono::Utc;

use otp::models::{OtpChannel, OtpCode, OtpPurpose};
use otp::{
    GenerateOtpInput, GenerateOtpUseCase, OtpConfig, OtpRecordRepository, VerifyOtpInput,
    VerifyOtpUseCase,
};

use crate::application::config::AuthConfig;
use crate::application::token::issue_access_token;
use crate::domain::entity::user::User;
use crate::domain::notification::{OtpDelivery, OtpNotifier};
use crate::domain::repository::UserRepository;
use crate::domain::value_object::{email::Email, user_password::RawPassword};
use crate::error::{AuthError, AuthResult};

/// Login (password step) input
pub struct LoginInput {
    pub email: String,
    pub password: String,
}

/// Login (code step) input
pub struct VerifyLoginInput {
    pub email: String,
    pub channel: OtpChannel,
    pub code: String,
}

/// Login output, shared by both steps
#[derive(Debug)]
pub struct LoginOutput {
    pub public_id: String,
    /// True when the caller must follow up with the code step;
    /// `access_token` is None in that case
    pub requires_otp: bool,
    pub access_token: Option<String>,
    pub expires_at_ms: Option<i64>,
}

/// Login use case
pub struct LoginUseCase<U, O, N>
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

impl<U, O, N> LoginUseCase<U, O, N>
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

    /// Password step
    pub async fn execute(&self, input: LoginInput) -> AuthResult<LoginOutput> {
        let email = Email::new(input.email).map_err(|_| AuthError::InvalidCredentials)?;
        let raw_password =
            RawPassword::new(input.password).map_err(|_| AuthError::InvalidCredentials)?;

        let user = self
            .user_repo
            .find_by_email(&email)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        if !user.password.verify(&raw_password, self.config.pepper()) {
            return Err(AuthError::InvalidCredentials);
        }

        // Only after the password checks out: a wrong guess must not
        // learn whether the account is verified
        if !user.is_verified() {
            return Err(AuthError::AccountNotVerified);
        }

        if user.two_factor_enabled {
            let issued = GenerateOtpUseCase::new(self.otp_repo.clone(), self.otp_config.clone())
                .execute(GenerateOtpInput {
                    user_id: user.user_id,
                    purpose: OtpPurpose::LoginVerification,
                    channel: OtpChannel::Email,
                })
                .await?;

            let delivery = OtpDelivery {
                channel: OtpChannel::Email,
                recipient: user.email.as_str().to_string(),
                display_name: user.display_name.as_str().to_string(),
                purpose: OtpPurpose::LoginVerification,
                code: issued.code,
                expires_in_minutes: self.otp_config.expiry_ms(OtpPurpose::LoginVerification)
                    / 60_000,
            };
            if let Err(e) = self.notifier.deliver(delivery).await {
                tracing::warn!(
                    user_id = %user.user_id,
                    error = %e,
                    "Login code dispatch failed; user can request a resend"
                );
            }

            tracing::info!(
                public_id = %user.public_id,
                "Password accepted, awaiting login code"
            );

            return Ok(LoginOutput {
                public_id: user.public_id.to_string(),
                requires_otp: true,
                access_token: None,
                expires_at_ms: None,
            });
        }

        Ok(self.issue_token(&user))
    }

    /// Code step, for accounts with the second factor enabled
    pub async fn verify_otp(&self, input: VerifyLoginInput) -> AuthResult<LoginOutput> {
        let email = Email::new(input.email).map_err(|_| AuthError::InvalidCredentials)?;
        let code =
            OtpCode::new(&input.code).map_err(|e| AuthError::Validation(e.to_string()))?;

        let user = self
            .user_repo
            .find_by_email(&email)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        VerifyOtpUseCase::new(self.otp_repo.clone(), self.otp_config.clone())
            .execute(VerifyOtpInput {
                user_id: user.user_id,
                purpose: OtpPurpose::LoginVerification,
                channel: input.channel,
                code,
            })
            .await?;

        Ok(self.issue_token(&user))
    }

    fn issue_token(&self, user: &User) -> LoginOutput {
        let expires_at_ms = Utc::now().timestamp_millis() + self.config.access_token_ttl_ms();
        let token = issue_access_token(user.user_id, expires_at_ms, &self.config.token_secret);

        tracing::info!(
            public_id = %user.public_id,
            expires_at_ms,
            "User logged in"
        );

        LoginOutput {
            public_id: user.public_id.to_string(),
            requires_otp: false,
            access_token: Some(token),
            expires_at_ms: Some(expires_at_ms),
        }
    }
}
