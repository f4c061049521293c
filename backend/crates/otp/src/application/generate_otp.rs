//! Generate OTP Use Case
//!
//! Issues a fresh code for a `(user, purpose, channel)` key, enforcing
//! the resend cooldown and superseding any previous PENDING code. The
//! plaintext appears exactly once, in the returned [`IssuedOtp`].

use std::sync::Arc;

use chrono::{DateTime, Utc};

use kernel::id::{OtpRecordId, UserId};
use platform::crypto::numeric_code;
use platform::secret::ClearSecret;

use crate::application::config::OtpConfig;
use crate::domain::entities::OtpRecord;
use crate::domain::repository::OtpRecordRepository;
use crate::domain::value_objects::{OtpChannel, OtpCodeHash, OtpPurpose, OtpStatus};
use crate::error::{OtpError, OtpResult};

/// Request to issue a code
#[derive(Debug, Clone, Copy)]
pub struct GenerateOtpInput {
    pub user_id: UserId,
    pub purpose: OtpPurpose,
    pub channel: OtpChannel,
}

/// A freshly issued code
///
/// `code` is the plaintext the caller must deliver to the user. It is
/// never persisted and never logged; drop it as soon as it is sent.
#[derive(Clone)]
pub struct IssuedOtp {
    pub record_id: OtpRecordId,
    pub code: String,
    pub expires_at: DateTime<Utc>,
}

impl std::fmt::Debug for IssuedOtp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IssuedOtp")
            .field("record_id", &self.record_id)
            .field("code", &"[REDACTED]")
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

/// Use case: issue a verification code
pub struct GenerateOtpUseCase<R>
where
    R: OtpRecordRepository,
{
    repository: Arc<R>,
    config: Arc<OtpConfig>,
}

impl<R> GenerateOtpUseCase<R>
where
    R: OtpRecordRepository,
{
    pub fn new(repository: Arc<R>, config: Arc<OtpConfig>) -> Self {
        Self { repository, config }
    }

    pub async fn execute(&self, input: GenerateOtpInput) -> OtpResult<IssuedOtp> {
        let GenerateOtpInput {
            user_id,
            purpose,
            channel,
        } = input;

        // Throttle against the latest pending code, then supersede it.
        if let Some(prior) = self
            .repository
            .find_latest_pending(user_id, purpose, channel)
            .await?
        {
            let wait_seconds = prior.resend_wait_seconds(self.config.resend_interval_ms(purpose));
            if wait_seconds > 0 {
                tracing::debug!(
                    user_id = %user_id,
                    purpose = %purpose,
                    channel = %channel,
                    wait_seconds,
                    "Resend throttled"
                );
                return Err(OtpError::ResendTooSoon { wait_seconds });
            }
            self.repository
                .update_status(prior.id, OtpStatus::Expired)
                .await?;
        }

        let code = numeric_code(self.config.code_length);
        let code_hash = OtpCodeHash::hash(
            &ClearSecret::new(code.as_str()),
            self.config.pepper(),
            self.config.hash_params,
        )?;

        let record = OtpRecord::new(
            user_id,
            purpose,
            channel,
            code_hash,
            self.config.expiry_ms(purpose),
        );
        self.repository.insert(&record).await?;

        tracing::info!(
            record_id = %record.id,
            user_id = %user_id,
            purpose = %purpose,
            channel = %channel,
            expires_at = %record.expires_at,
            "Verification code issued"
        );

        Ok(IssuedOtp {
            record_id: record.id,
            code,
            expires_at: record.expires_at,
        })
    }
}
