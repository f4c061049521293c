//! OTP record entity

use chrono::{DateTime, Duration, Utc};

use kernel::id::{OtpRecordId, UserId};

use crate::domain::value_objects::{OtpChannel, OtpCodeHash, OtpPurpose, OtpStatus};

/// One issued verification code
///
/// Born PENDING with a zero retry count; ends in exactly one of the
/// terminal states. The plaintext code is not part of the entity, only
/// its hash is.
#[derive(Debug, Clone)]
pub struct OtpRecord {
    pub id: OtpRecordId,
    pub user_id: UserId,
    pub purpose: OtpPurpose,
    pub channel: OtpChannel,
    pub code_hash: OtpCodeHash,
    pub status: OtpStatus,
    pub retry_count: i16,
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl OtpRecord {
    /// Create a fresh PENDING record expiring `ttl_ms` from now
    pub fn new(
        user_id: UserId,
        purpose: OtpPurpose,
        channel: OtpChannel,
        code_hash: OtpCodeHash,
        ttl_ms: i64,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: OtpRecordId::new(),
            user_id,
            purpose,
            channel,
            code_hash,
            status: OtpStatus::Pending,
            retry_count: 0,
            expires_at: now + Duration::milliseconds(ttl_ms),
            created_at: now,
            updated_at: now,
        }
    }

    /// Past its expiry instant?
    pub fn is_expired(&self) -> bool {
        Utc::now() > self.expires_at
    }

    /// Wrong-code budget already spent?
    pub fn retries_exhausted(&self, max_retry: i16) -> bool {
        self.retry_count >= max_retry
    }

    /// Whole seconds (rounded up) until a resend is allowed
    ///
    /// Zero once `min_interval_ms` has elapsed since issuance. Rounding
    /// up keeps the reported wait honest: 1ms of cooldown left is still
    /// "wait 1 second", never "wait 0".
    pub fn resend_wait_seconds(&self, min_interval_ms: i64) -> i64 {
        let elapsed_ms = Utc::now()
            .signed_duration_since(self.created_at)
            .num_milliseconds();
        let remaining_ms = min_interval_ms - elapsed_ms;
        if remaining_ms <= 0 {
            0
        } else {
            (remaining_ms + 999) / 1000
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use platform::secret::{ClearSecret, HashParams};

    fn sample_hash() -> OtpCodeHash {
        OtpCodeHash::hash(
            &ClearSecret::new("482913"),
            None,
            HashParams::fast_insecure(),
        )
        .unwrap()
    }

    fn sample_record(ttl_ms: i64) -> OtpRecord {
        OtpRecord::new(
            UserId::new(),
            OtpPurpose::Register,
            OtpChannel::Email,
            sample_hash(),
            ttl_ms,
        )
    }

    #[test]
    fn test_new_record_is_pending_with_zero_retries() {
        let record = sample_record(900_000);
        assert_eq!(record.status, OtpStatus::Pending);
        assert_eq!(record.retry_count, 0);
        assert_eq!(record.created_at, record.updated_at);
        assert!(record.expires_at > record.created_at);
    }

    #[test]
    fn test_new_records_get_distinct_ids() {
        let a = sample_record(900_000);
        let b = sample_record(900_000);
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_is_expired() {
        let fresh = sample_record(900_000);
        assert!(!fresh.is_expired());

        let mut stale = sample_record(900_000);
        stale.expires_at = Utc::now() - Duration::seconds(1);
        assert!(stale.is_expired());
    }

    #[test]
    fn test_retries_exhausted() {
        let mut record = sample_record(900_000);
        assert!(!record.retries_exhausted(3));
        record.retry_count = 2;
        assert!(!record.retries_exhausted(3));
        record.retry_count = 3;
        assert!(record.retries_exhausted(3));
        record.retry_count = 4;
        assert!(record.retries_exhausted(3));
    }

    #[test]
    fn test_resend_wait_rounds_up() {
        let mut record = sample_record(900_000);

        // 59.5s of a 60s cooldown elapsed: 500ms left reports 1s.
        record.created_at = Utc::now() - Duration::milliseconds(59_500);
        assert_eq!(record.resend_wait_seconds(60_000), 1);

        // Cooldown fully elapsed.
        record.created_at = Utc::now() - Duration::milliseconds(61_000);
        assert_eq!(record.resend_wait_seconds(60_000), 0);

        // Fresh record waits the full interval.
        record.created_at = Utc::now();
        let wait = record.resend_wait_seconds(60_000);
        assert!((59..=60).contains(&wait), "wait was {wait}");
    }
}
