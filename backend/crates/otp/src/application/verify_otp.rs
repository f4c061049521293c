//! Verify OTP Use Case
//!
//! Checks a submitted code against the latest PENDING record for the
//! key. The check order is load-bearing and must not be shuffled:
//! retry budget, then expiry, then the hash comparison. A correct code
//! cannot rescue a record whose budget or lifetime is already spent.

use std::sync::Arc;

use kernel::id::UserId;

use crate::application::config::OtpConfig;
use crate::domain::repository::OtpRecordRepository;
use crate::domain::value_objects::{OtpChannel, OtpCode, OtpPurpose, OtpStatus};
use crate::error::{OtpError, OtpResult};

/// Request to verify a submitted code
#[derive(Debug)]
pub struct VerifyOtpInput {
    pub user_id: UserId,
    pub purpose: OtpPurpose,
    pub channel: OtpChannel,
    pub code: OtpCode,
}

/// Use case: verify and consume a code
pub struct VerifyOtpUseCase<R>
where
    R: OtpRecordRepository,
{
    repository: Arc<R>,
    config: Arc<OtpConfig>,
}

impl<R> VerifyOtpUseCase<R>
where
    R: OtpRecordRepository,
{
    pub fn new(repository: Arc<R>, config: Arc<OtpConfig>) -> Self {
        Self { repository, config }
    }

    pub async fn execute(&self, input: VerifyOtpInput) -> OtpResult<()> {
        let VerifyOtpInput {
            user_id,
            purpose,
            channel,
            code,
        } = input;

        let record = self
            .repository
            .find_latest_pending(user_id, purpose, channel)
            .await?
            .ok_or(OtpError::NoPendingOtp)?;

        // Budget first: once it is spent, even a correct code blocks
        // the record instead of consuming it.
        if record.retries_exhausted(self.config.max_retry) {
            self.repository
                .update_status(record.id, OtpStatus::Blocked)
                .await?;
            tracing::warn!(
                record_id = %record.id,
                user_id = %user_id,
                purpose = %purpose,
                "Record blocked after too many wrong attempts"
            );
            return Err(OtpError::MaxRetryExceeded);
        }

        if record.is_expired() {
            self.repository
                .update_status(record.id, OtpStatus::Expired)
                .await?;
            tracing::debug!(record_id = %record.id, user_id = %user_id, "Verification code expired");
            return Err(OtpError::Expired);
        }

        if !record.code_hash.verify(code.as_secret(), self.config.pepper()) {
            // The persisted counter is the source of the attempt
            // number; a racing consume leaves it at the fetched value.
            let attempt = self
                .repository
                .increment_retry(record.id)
                .await?
                .unwrap_or(record.retry_count + 1);
            tracing::warn!(
                record_id = %record.id,
                user_id = %user_id,
                attempt,
                max_retry = self.config.max_retry,
                "Wrong verification code"
            );
            return Err(OtpError::InvalidCode {
                attempt,
                max_retry: self.config.max_retry,
            });
        }

        // Conditional transition: losing this race means another call
        // already consumed the record.
        let consumed = self
            .repository
            .update_status(record.id, OtpStatus::Used)
            .await?;
        if !consumed {
            return Err(OtpError::NoPendingOtp);
        }

        tracing::info!(
            record_id = %record.id,
            user_id = %user_id,
            purpose = %purpose,
            channel = %channel,
            "Verification code accepted"
        );
        Ok(())
    }
}
