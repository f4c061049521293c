//! Repository trait for OTP record persistence

use kernel::id::{OtpRecordId, UserId};

use crate::domain::entities::OtpRecord;
use crate::domain::value_objects::{OtpChannel, OtpPurpose, OtpStatus};
use crate::error::OtpResult;

/// Persistence port for OTP records
///
/// Conditional semantics matter here: `update_status` and
/// `increment_retry` only touch PENDING rows, which is what makes
/// consumption exactly-once under concurrent verification.
#[trait_variant::make(OtpRecordRepository: Send)]
pub trait LocalOtpRecordRepository {
    /// Persist a freshly issued record
    async fn insert(&self, record: &OtpRecord) -> OtpResult<()>;

    /// Most recent PENDING record for the key, if any
    async fn find_latest_pending(
        &self,
        user_id: UserId,
        purpose: OtpPurpose,
        channel: OtpChannel,
    ) -> OtpResult<Option<OtpRecord>>;

    /// Move a PENDING record into `status`
    ///
    /// Returns `false` when the record was no longer PENDING (or does
    /// not exist); terminal rows are never rewritten.
    async fn update_status(&self, record_id: OtpRecordId, status: OtpStatus) -> OtpResult<bool>;

    /// Bump the retry counter of a PENDING record
    ///
    /// Returns the post-increment count, or `None` when the record was
    /// no longer PENDING.
    async fn increment_retry(&self, record_id: OtpRecordId) -> OtpResult<Option<i16>>;
}
