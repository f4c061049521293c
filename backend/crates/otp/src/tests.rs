//! Unit tests for the OTP lifecycle engine
//!
//! The use cases run end-to-end against an in-memory record store
//! that mirrors the conditional-update semantics of the PostgreSQL
//! implementation (only PENDING rows transition or count retries).

mod support {
    use std::sync::{Arc, Mutex};

    use chrono::{Duration, Utc};

    use kernel::id::{OtpRecordId, UserId};

    use crate::application::config::OtpConfig;
    use crate::application::generate_otp::GenerateOtpUseCase;
    use crate::application::verify_otp::{VerifyOtpInput, VerifyOtpUseCase};
    use crate::domain::entities::OtpRecord;
    use crate::domain::repository::OtpRecordRepository;
    use crate::domain::value_objects::{OtpChannel, OtpCode, OtpPurpose, OtpStatus};
    use crate::error::OtpResult;

    /// In-memory record store with the same conditional semantics as
    /// the PostgreSQL implementation
    #[derive(Default)]
    pub struct InMemoryOtpRepository {
        pub records: Mutex<Vec<OtpRecord>>,
    }

    impl InMemoryOtpRepository {
        pub fn status_of(&self, record_id: OtpRecordId) -> OtpStatus {
            self.records
                .lock()
                .unwrap()
                .iter()
                .find(|r| r.id == record_id)
                .unwrap()
                .status
        }

        pub fn retry_count_of(&self, record_id: OtpRecordId) -> i16 {
            self.records
                .lock()
                .unwrap()
                .iter()
                .find(|r| r.id == record_id)
                .unwrap()
                .retry_count
        }

        pub fn pending_count(
            &self,
            user_id: UserId,
            purpose: OtpPurpose,
            channel: OtpChannel,
        ) -> usize {
            self.records
                .lock()
                .unwrap()
                .iter()
                .filter(|r| {
                    r.user_id == user_id
                        && r.purpose == purpose
                        && r.channel == channel
                        && r.status.is_pending()
                })
                .count()
        }

        /// Shift a record's issue instant into the past
        pub fn backdate_created(&self, record_id: OtpRecordId, by_ms: i64) {
            let mut records = self.records.lock().unwrap();
            let record = records.iter_mut().find(|r| r.id == record_id).unwrap();
            record.created_at = record.created_at - Duration::milliseconds(by_ms);
        }

        /// Force a record past its expiry instant
        pub fn force_expired(&self, record_id: OtpRecordId) {
            let mut records = self.records.lock().unwrap();
            let record = records.iter_mut().find(|r| r.id == record_id).unwrap();
            record.expires_at = Utc::now() - Duration::seconds(1);
        }
    }

    impl OtpRecordRepository for InMemoryOtpRepository {
        async fn insert(&self, record: &OtpRecord) -> OtpResult<()> {
            self.records.lock().unwrap().push(record.clone());
            Ok(())
        }

        async fn find_latest_pending(
            &self,
            user_id: UserId,
            purpose: OtpPurpose,
            channel: OtpChannel,
        ) -> OtpResult<Option<OtpRecord>> {
            let records = self.records.lock().unwrap();
            Ok(records
                .iter()
                .filter(|r| {
                    r.user_id == user_id
                        && r.purpose == purpose
                        && r.channel == channel
                        && r.status.is_pending()
                })
                .max_by_key(|r| r.created_at)
                .cloned())
        }

        async fn update_status(
            &self,
            record_id: OtpRecordId,
            status: OtpStatus,
        ) -> OtpResult<bool> {
            let mut records = self.records.lock().unwrap();
            match records
                .iter_mut()
                .find(|r| r.id == record_id && r.status.is_pending())
            {
                Some(record) => {
                    record.status = status;
                    record.updated_at = Utc::now();
                    Ok(true)
                }
                None => Ok(false),
            }
        }

        async fn increment_retry(&self, record_id: OtpRecordId) -> OtpResult<Option<i16>> {
            let mut records = self.records.lock().unwrap();
            Ok(records
                .iter_mut()
                .find(|r| r.id == record_id && r.status.is_pending())
                .map(|record| {
                    record.retry_count += 1;
                    record.updated_at = Utc::now();
                    record.retry_count
                }))
        }
    }

    pub type TestEngine = (
        Arc<InMemoryOtpRepository>,
        GenerateOtpUseCase<InMemoryOtpRepository>,
        VerifyOtpUseCase<InMemoryOtpRepository>,
    );

    pub fn engine(config: OtpConfig) -> TestEngine {
        let repository = Arc::new(InMemoryOtpRepository::default());
        let config = Arc::new(config);
        let generate = GenerateOtpUseCase::new(repository.clone(), config.clone());
        let verify = VerifyOtpUseCase::new(repository.clone(), config);
        (repository, generate, verify)
    }

    pub fn verify_input(
        user_id: UserId,
        purpose: OtpPurpose,
        channel: OtpChannel,
        code: &str,
    ) -> VerifyOtpInput {
        VerifyOtpInput {
            user_id,
            purpose,
            channel,
            code: OtpCode::new(code).unwrap(),
        }
    }

    /// A syntactically valid code guaranteed to differ from `issued`
    pub fn wrong_code(issued: &str) -> String {
        let first = issued.as_bytes()[0];
        let flipped = if first == b'9' { '0' } else { (first + 1) as char };
        format!("{}{}", flipped, &issued[1..])
    }
}

#[cfg(test)]
mod generate_tests {
    use chrono::Utc;

    use kernel::id::UserId;

    use crate::application::config::OtpConfig;
    use crate::application::generate_otp::GenerateOtpInput;
    use crate::domain::value_objects::{OtpChannel, OtpPurpose, OtpStatus};
    use crate::error::OtpError;

    use super::support::{engine, verify_input};

    fn input(user_id: UserId) -> GenerateOtpInput {
        GenerateOtpInput {
            user_id,
            purpose: OtpPurpose::Register,
            channel: OtpChannel::Email,
        }
    }

    #[tokio::test]
    async fn test_generate_issues_pending_code() {
        let (repository, generate, _) = engine(OtpConfig::development());
        let user_id = UserId::new();

        let issued = generate.execute(input(user_id)).await.unwrap();

        assert_eq!(issued.code.len(), 6);
        assert!(issued.code.bytes().all(|b| b.is_ascii_digit()));
        assert_eq!(repository.status_of(issued.record_id), OtpStatus::Pending);
        assert_eq!(repository.retry_count_of(issued.record_id), 0);

        let ttl_seconds = (issued.expires_at - Utc::now()).num_seconds();
        assert!(
            (14 * 60..=15 * 60).contains(&ttl_seconds),
            "ttl was {ttl_seconds}s"
        );
    }

    #[tokio::test]
    async fn test_generate_respects_configured_length() {
        let config = OtpConfig {
            code_length: 8,
            ..OtpConfig::development()
        };
        let (_, generate, _) = engine(config);

        let issued = generate.execute(input(UserId::new())).await.unwrap();
        assert_eq!(issued.code.len(), 8);
    }

    #[tokio::test]
    async fn test_resend_inside_cooldown_rejected() {
        let (repository, generate, _) = engine(OtpConfig::development());
        let user_id = UserId::new();

        generate.execute(input(user_id)).await.unwrap();
        let err = generate.execute(input(user_id)).await.unwrap_err();

        match err {
            OtpError::ResendTooSoon { wait_seconds } => {
                assert!((1..=60).contains(&wait_seconds), "wait was {wait_seconds}")
            }
            other => panic!("expected ResendTooSoon, got {other:?}"),
        }
        assert_eq!(
            repository.pending_count(user_id, OtpPurpose::Register, OtpChannel::Email),
            1
        );
    }

    #[tokio::test]
    async fn test_resend_after_cooldown_supersedes_prior_code() {
        let (repository, generate, _) = engine(OtpConfig::development());
        let user_id = UserId::new();

        let first = generate.execute(input(user_id)).await.unwrap();
        repository.backdate_created(first.record_id, 61_000);

        let second = generate.execute(input(user_id)).await.unwrap();

        assert_ne!(first.record_id, second.record_id);
        assert_eq!(repository.status_of(first.record_id), OtpStatus::Expired);
        assert_eq!(repository.status_of(second.record_id), OtpStatus::Pending);
        assert_eq!(
            repository.pending_count(user_id, OtpPurpose::Register, OtpChannel::Email),
            1
        );
    }

    #[tokio::test]
    async fn test_reported_wait_rounds_up_to_whole_seconds() {
        let (repository, generate, _) = engine(OtpConfig::development());
        let user_id = UserId::new();

        let issued = generate.execute(input(user_id)).await.unwrap();
        // 900ms of cooldown left reports a 1 second wait, not 0.
        repository.backdate_created(issued.record_id, 59_100);

        let err = generate.execute(input(user_id)).await.unwrap_err();
        match err {
            OtpError::ResendTooSoon { wait_seconds } => assert_eq!(wait_seconds, 1),
            other => panic!("expected ResendTooSoon, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_purposes_and_channels_throttle_independently() {
        let (repository, generate, _) = engine(OtpConfig::development());
        let user_id = UserId::new();

        generate.execute(input(user_id)).await.unwrap();
        generate
            .execute(GenerateOtpInput {
                user_id,
                purpose: OtpPurpose::ResetPassword,
                channel: OtpChannel::Email,
            })
            .await
            .unwrap();
        generate
            .execute(GenerateOtpInput {
                user_id,
                purpose: OtpPurpose::Register,
                channel: OtpChannel::Sms,
            })
            .await
            .unwrap();

        assert_eq!(
            repository.pending_count(user_id, OtpPurpose::Register, OtpChannel::Email),
            1
        );
        assert_eq!(
            repository.pending_count(user_id, OtpPurpose::ResetPassword, OtpChannel::Email),
            1
        );
        assert_eq!(
            repository.pending_count(user_id, OtpPurpose::Register, OtpChannel::Sms),
            1
        );
    }

    #[tokio::test]
    async fn test_per_purpose_policy_overrides_cooldown() {
        let mut config = OtpConfig::development();
        config.purpose_policies.insert(
            OtpPurpose::LoginVerification,
            crate::application::config::OtpPolicy {
                expiry: std::time::Duration::from_secs(5 * 60),
                resend_interval: std::time::Duration::from_secs(10),
            },
        );
        let (repository, generate, _) = engine(config);
        let user_id = UserId::new();

        let issued = generate
            .execute(GenerateOtpInput {
                user_id,
                purpose: OtpPurpose::LoginVerification,
                channel: OtpChannel::Email,
            })
            .await
            .unwrap();

        let ttl_seconds = (issued.expires_at - Utc::now()).num_seconds();
        assert!(
            (4 * 60..=5 * 60).contains(&ttl_seconds),
            "ttl was {ttl_seconds}s"
        );

        // 11s elapsed beats the 10s override, regenerate succeeds.
        repository.backdate_created(issued.record_id, 11_000);
        generate
            .execute(GenerateOtpInput {
                user_id,
                purpose: OtpPurpose::LoginVerification,
                channel: OtpChannel::Email,
            })
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_generate_after_consumption_has_no_cooldown() {
        let (repository, generate, verify) = engine(OtpConfig::development());
        let user_id = UserId::new();

        let issued = generate.execute(input(user_id)).await.unwrap();
        verify
            .execute(verify_input(
                user_id,
                OtpPurpose::Register,
                OtpChannel::Email,
                &issued.code,
            ))
            .await
            .unwrap();

        // USED records do not throttle; only PENDING ones do.
        generate.execute(input(user_id)).await.unwrap();
        assert_eq!(repository.status_of(issued.record_id), OtpStatus::Used);
        assert_eq!(
            repository.pending_count(user_id, OtpPurpose::Register, OtpChannel::Email),
            1
        );
    }
}

#[cfg(test)]
mod verify_tests {
    use kernel::id::UserId;

    use crate::application::config::OtpConfig;
    use crate::application::generate_otp::GenerateOtpInput;
    use crate::domain::value_objects::{OtpChannel, OtpPurpose, OtpStatus};
    use crate::error::OtpError;

    use super::support::{engine, verify_input, wrong_code};

    const PURPOSE: OtpPurpose = OtpPurpose::Register;
    const CHANNEL: OtpChannel = OtpChannel::Email;

    fn generate_input(user_id: UserId) -> GenerateOtpInput {
        GenerateOtpInput {
            user_id,
            purpose: PURPOSE,
            channel: CHANNEL,
        }
    }

    #[tokio::test]
    async fn test_correct_code_consumes_record() {
        let (repository, generate, verify) = engine(OtpConfig::development());
        let user_id = UserId::new();

        let issued = generate.execute(generate_input(user_id)).await.unwrap();
        verify
            .execute(verify_input(user_id, PURPOSE, CHANNEL, &issued.code))
            .await
            .unwrap();

        assert_eq!(repository.status_of(issued.record_id), OtpStatus::Used);

        // The record is spent; replaying the same code finds nothing.
        let err = verify
            .execute(verify_input(user_id, PURPOSE, CHANNEL, &issued.code))
            .await
            .unwrap_err();
        assert!(matches!(err, OtpError::NoPendingOtp));
    }

    #[tokio::test]
    async fn test_no_pending_record() {
        let (_, _, verify) = engine(OtpConfig::development());

        let err = verify
            .execute(verify_input(UserId::new(), PURPOSE, CHANNEL, "123456"))
            .await
            .unwrap_err();
        assert!(matches!(err, OtpError::NoPendingOtp));
    }

    #[tokio::test]
    async fn test_wrong_code_increments_and_reports_attempt() {
        let (repository, generate, verify) = engine(OtpConfig::development());
        let user_id = UserId::new();

        let issued = generate.execute(generate_input(user_id)).await.unwrap();
        let bad = wrong_code(&issued.code);

        for expected_attempt in 1..=2i16 {
            let err = verify
                .execute(verify_input(user_id, PURPOSE, CHANNEL, &bad))
                .await
                .unwrap_err();
            match err {
                OtpError::InvalidCode { attempt, max_retry } => {
                    assert_eq!(attempt, expected_attempt);
                    assert_eq!(max_retry, 3);
                }
                other => panic!("expected InvalidCode, got {other:?}"),
            }
        }

        assert_eq!(repository.retry_count_of(issued.record_id), 2);
        assert_eq!(repository.status_of(issued.record_id), OtpStatus::Pending);

        // Budget not yet spent, the correct code still works.
        verify
            .execute(verify_input(user_id, PURPOSE, CHANNEL, &issued.code))
            .await
            .unwrap();
        assert_eq!(repository.status_of(issued.record_id), OtpStatus::Used);
    }

    #[tokio::test]
    async fn test_spent_budget_blocks_even_the_correct_code() {
        let (repository, generate, verify) = engine(OtpConfig::development());
        let user_id = UserId::new();

        let issued = generate.execute(generate_input(user_id)).await.unwrap();
        let bad = wrong_code(&issued.code);

        for _ in 0..3 {
            let err = verify
                .execute(verify_input(user_id, PURPOSE, CHANNEL, &bad))
                .await
                .unwrap_err();
            assert!(matches!(err, OtpError::InvalidCode { .. }));
        }

        // Third failure leaves the record PENDING; the block happens
        // on the next attempt, whatever code it carries.
        assert_eq!(repository.status_of(issued.record_id), OtpStatus::Pending);
        assert_eq!(repository.retry_count_of(issued.record_id), 3);

        let err = verify
            .execute(verify_input(user_id, PURPOSE, CHANNEL, &issued.code))
            .await
            .unwrap_err();
        assert!(matches!(err, OtpError::MaxRetryExceeded));
        assert_eq!(repository.status_of(issued.record_id), OtpStatus::Blocked);
        assert_eq!(repository.retry_count_of(issued.record_id), 3);

        // Blocked records are no longer pending.
        let err = verify
            .execute(verify_input(user_id, PURPOSE, CHANNEL, &issued.code))
            .await
            .unwrap_err();
        assert!(matches!(err, OtpError::NoPendingOtp));
    }

    #[tokio::test]
    async fn test_expired_code_rejected_and_marked() {
        let (repository, generate, verify) = engine(OtpConfig::development());
        let user_id = UserId::new();

        let issued = generate.execute(generate_input(user_id)).await.unwrap();
        repository.force_expired(issued.record_id);

        let err = verify
            .execute(verify_input(user_id, PURPOSE, CHANNEL, &issued.code))
            .await
            .unwrap_err();
        assert!(matches!(err, OtpError::Expired));
        assert_eq!(repository.status_of(issued.record_id), OtpStatus::Expired);
    }

    #[tokio::test]
    async fn test_retry_budget_checked_before_expiry() {
        let (repository, generate, verify) = engine(OtpConfig::development());
        let user_id = UserId::new();

        let issued = generate.execute(generate_input(user_id)).await.unwrap();
        let bad = wrong_code(&issued.code);
        for _ in 0..3 {
            let _ = verify
                .execute(verify_input(user_id, PURPOSE, CHANNEL, &bad))
                .await;
        }
        repository.force_expired(issued.record_id);

        // Both conditions hold; the budget check wins.
        let err = verify
            .execute(verify_input(user_id, PURPOSE, CHANNEL, &issued.code))
            .await
            .unwrap_err();
        assert!(matches!(err, OtpError::MaxRetryExceeded));
        assert_eq!(repository.status_of(issued.record_id), OtpStatus::Blocked);
    }

    #[tokio::test]
    async fn test_verification_is_scoped_to_purpose_and_channel() {
        let (_, generate, verify) = engine(OtpConfig::development());
        let user_id = UserId::new();

        let issued = generate.execute(generate_input(user_id)).await.unwrap();

        let err = verify
            .execute(verify_input(
                user_id,
                OtpPurpose::ResetPassword,
                CHANNEL,
                &issued.code,
            ))
            .await
            .unwrap_err();
        assert!(matches!(err, OtpError::NoPendingOtp));

        let err = verify
            .execute(verify_input(
                user_id,
                PURPOSE,
                OtpChannel::Sms,
                &issued.code,
            ))
            .await
            .unwrap_err();
        assert!(matches!(err, OtpError::NoPendingOtp));

        verify
            .execute(verify_input(user_id, PURPOSE, CHANNEL, &issued.code))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_code_accepted_at_most_once_under_races() {
        let (repository, generate, verify) = engine(OtpConfig::development());
        let user_id = UserId::new();

        let issued = generate.execute(generate_input(user_id)).await.unwrap();

        let (a, b) = tokio::join!(
            verify.execute(verify_input(user_id, PURPOSE, CHANNEL, &issued.code)),
            verify.execute(verify_input(user_id, PURPOSE, CHANNEL, &issued.code)),
        );

        let successes = [&a, &b].iter().filter(|r| r.is_ok()).count();
        assert_eq!(successes, 1, "exactly one verification may win");
        assert_eq!(repository.status_of(issued.record_id), OtpStatus::Used);
    }
}

#[cfg(test)]
mod config_tests {
    use std::time::Duration;

    use crate::application::config::{OtpConfig, OtpPolicy};
    use crate::domain::value_objects::OtpPurpose;

    #[test]
    fn test_default_values() {
        let config = OtpConfig::default();
        assert_eq!(config.code_length, 6);
        assert_eq!(config.max_retry, 3);
        assert_eq!(config.default_policy.expiry, Duration::from_secs(15 * 60));
        assert_eq!(config.default_policy.resend_interval, Duration::from_secs(60));
        assert!(config.purpose_policies.is_empty());
        assert!(config.pepper.is_none());
    }

    #[test]
    fn test_policy_fallback_and_override() {
        let mut config = OtpConfig::default();
        assert_eq!(
            config.policy_for(OtpPurpose::Register),
            config.default_policy
        );

        let fast = OtpPolicy {
            expiry: Duration::from_secs(5 * 60),
            resend_interval: Duration::from_secs(30),
        };
        config
            .purpose_policies
            .insert(OtpPurpose::LoginVerification, fast);

        assert_eq!(config.policy_for(OtpPurpose::LoginVerification), fast);
        assert_eq!(
            config.policy_for(OtpPurpose::Register),
            config.default_policy
        );
        assert_eq!(config.expiry_ms(OtpPurpose::LoginVerification), 300_000);
        assert_eq!(config.resend_interval_ms(OtpPurpose::LoginVerification), 30_000);
    }

    #[test]
    fn test_development_preset_keeps_semantics() {
        let config = OtpConfig::development();
        // Same lifecycle knobs as production, only the hashing is cheap.
        assert_eq!(config.code_length, 6);
        assert_eq!(config.max_retry, 3);
        assert_ne!(
            config.hash_params,
            platform::secret::HashParams::default()
        );
    }

    #[test]
    fn test_pepper_accessor() {
        let config = OtpConfig {
            pepper: Some(b"table-salt".to_vec()),
            ..OtpConfig::default()
        };
        assert_eq!(config.pepper(), Some(b"table-salt".as_slice()));
    }
}
