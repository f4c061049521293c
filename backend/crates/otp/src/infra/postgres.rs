//! PostgreSQL implementation of the OTP record store
//!
//! Status transitions and retry increments are single conditional
//! UPDATEs guarded by `status = PENDING`, so two racing verifications
//! cannot both consume a record and terminal rows are never rewritten.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use kernel::id::{OtpRecordId, UserId};

use crate::domain::entities::OtpRecord;
use crate::domain::repository::OtpRecordRepository;
use crate::domain::value_objects::{OtpChannel, OtpCodeHash, OtpPurpose, OtpStatus};
use crate::error::{OtpError, OtpResult};

/// PostgreSQL-backed OTP record store
#[derive(Clone)]
pub struct PgOtpRepository {
    pool: PgPool,
}

impl PgOtpRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Housekeeping: delete rows no live flow can reach again
    ///
    /// Removes terminal records last touched before `cutoff` and
    /// pending records whose expiry lies before `cutoff`. The
    /// lifecycle itself never deletes; this is for startup or a
    /// periodic sweep.
    pub async fn purge_stale(&self, cutoff: DateTime<Utc>) -> OtpResult<u64> {
        let deleted = sqlx::query(
            r#"
            DELETE FROM otp_records
            WHERE (status <> $1 AND updated_at < $2)
               OR (status = $1 AND expires_at < $2)
            "#,
        )
        .bind(OtpStatus::Pending.id())
        .bind(cutoff)
        .execute(&self.pool)
        .await?
        .rows_affected();

        if deleted > 0 {
            tracing::info!(deleted, "Purged stale OTP records");
        }
        Ok(deleted)
    }
}

impl OtpRecordRepository for PgOtpRepository {
    async fn insert(&self, record: &OtpRecord) -> OtpResult<()> {
        sqlx::query(
            r#"
            INSERT INTO otp_records (
                otp_record_id,
                user_id,
                purpose,
                channel,
                code_hash,
                status,
                retry_count,
                expires_at,
                created_at,
                updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            "#,
        )
        .bind(record.id.into_uuid())
        .bind(record.user_id.into_uuid())
        .bind(record.purpose.id())
        .bind(record.channel.id())
        .bind(record.code_hash.as_phc_string())
        .bind(record.status.id())
        .bind(record.retry_count)
        .bind(record.expires_at)
        .bind(record.created_at)
        .bind(record.updated_at)
        .execute(&self.pool)
        .await?;

        tracing::debug!(record_id = %record.id, user_id = %record.user_id, "OTP record stored");
        Ok(())
    }

    async fn find_latest_pending(
        &self,
        user_id: UserId,
        purpose: OtpPurpose,
        channel: OtpChannel,
    ) -> OtpResult<Option<OtpRecord>> {
        let row = sqlx::query_as::<_, OtpRecordRow>(
            r#"
            SELECT
                otp_record_id,
                user_id,
                purpose,
                channel,
                code_hash,
                status,
                retry_count,
                expires_at,
                created_at,
                updated_at
            FROM otp_records
            WHERE user_id = $1 AND purpose = $2 AND channel = $3 AND status = $4
            ORDER BY created_at DESC
            LIMIT 1
            "#,
        )
        .bind(user_id.into_uuid())
        .bind(purpose.id())
        .bind(channel.id())
        .bind(OtpStatus::Pending.id())
        .fetch_optional(&self.pool)
        .await?;

        row.map(OtpRecordRow::into_record).transpose()
    }

    async fn update_status(&self, record_id: OtpRecordId, status: OtpStatus) -> OtpResult<bool> {
        let rows_affected = sqlx::query(
            r#"
            UPDATE otp_records
            SET status = $2, updated_at = now()
            WHERE otp_record_id = $1 AND status = $3
            "#,
        )
        .bind(record_id.into_uuid())
        .bind(status.id())
        .bind(OtpStatus::Pending.id())
        .execute(&self.pool)
        .await?
        .rows_affected();

        Ok(rows_affected > 0)
    }

    async fn increment_retry(&self, record_id: OtpRecordId) -> OtpResult<Option<i16>> {
        let retry_count = sqlx::query_scalar::<_, i16>(
            r#"
            UPDATE otp_records
            SET retry_count = retry_count + 1, updated_at = now()
            WHERE otp_record_id = $1 AND status = $2
            RETURNING retry_count
            "#,
        )
        .bind(record_id.into_uuid())
        .bind(OtpStatus::Pending.id())
        .fetch_optional(&self.pool)
        .await?;

        Ok(retry_count)
    }
}

#[derive(sqlx::FromRow)]
struct OtpRecordRow {
    otp_record_id: Uuid,
    user_id: Uuid,
    purpose: i16,
    channel: i16,
    code_hash: String,
    status: i16,
    retry_count: i16,
    expires_at: DateTime<Utc>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl OtpRecordRow {
    fn into_record(self) -> OtpResult<OtpRecord> {
        let purpose = OtpPurpose::from_id(self.purpose)
            .ok_or_else(|| OtpError::Internal(format!("unknown otp purpose id: {}", self.purpose)))?;
        let channel = OtpChannel::from_id(self.channel)
            .ok_or_else(|| OtpError::Internal(format!("unknown otp channel id: {}", self.channel)))?;
        let status = OtpStatus::from_id(self.status)
            .ok_or_else(|| OtpError::Internal(format!("unknown otp status id: {}", self.status)))?;
        let code_hash = OtpCodeHash::from_phc_string(self.code_hash)
            .map_err(|_| OtpError::Internal("stored code hash is not a valid PHC string".into()))?;

        Ok(OtpRecord {
            id: self.otp_record_id.into(),
            user_id: self.user_id.into(),
            purpose,
            channel,
            code_hash,
            status,
            retry_count: self.retry_count,
            expires_at: self.expires_at,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}
