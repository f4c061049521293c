//! Value objects for the OTP lifecycle
//!
//! The three enums are persisted as SMALLINT ids and rendered on the
//! wire as snake_case codes. Ids are part of the storage format, so
//! existing variants must never be renumbered.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use platform::secret::{ClearSecret, HashParams, HashedSecret, SecretHashError};

/// Shortest submitted code accepted at the boundary
pub const MIN_CODE_LENGTH: usize = 4;
/// Longest submitted code accepted at the boundary
pub const MAX_CODE_LENGTH: usize = 10;

// ============================================================
// OtpPurpose
// ============================================================

/// What a verification code is for
///
/// Codes are scoped per purpose: a code issued for registration can
/// never satisfy a password reset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(i16)]
pub enum OtpPurpose {
    /// Account registration confirmation
    Register = 0,
    /// Password reset confirmation
    ResetPassword = 1,
    /// Standalone email ownership check
    EmailVerification = 2,
    /// Second step of a two-factor login
    LoginVerification = 3,
    /// Enabling / managing two-factor auth
    TwoFactorAuth = 4,
}

impl OtpPurpose {
    /// Storage id (SMALLINT)
    pub const fn id(&self) -> i16 {
        *self as i16
    }

    /// Wire code
    pub const fn code(&self) -> &'static str {
        match self {
            Self::Register => "register",
            Self::ResetPassword => "reset_password",
            Self::EmailVerification => "email_verification",
            Self::LoginVerification => "login_verification",
            Self::TwoFactorAuth => "two_factor_auth",
        }
    }

    /// Restore from a storage id
    pub const fn from_id(id: i16) -> Option<Self> {
        match id {
            0 => Some(Self::Register),
            1 => Some(Self::ResetPassword),
            2 => Some(Self::EmailVerification),
            3 => Some(Self::LoginVerification),
            4 => Some(Self::TwoFactorAuth),
            _ => None,
        }
    }

    /// Restore from a wire code
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "register" => Some(Self::Register),
            "reset_password" => Some(Self::ResetPassword),
            "email_verification" => Some(Self::EmailVerification),
            "login_verification" => Some(Self::LoginVerification),
            "two_factor_auth" => Some(Self::TwoFactorAuth),
            _ => None,
        }
    }
}

impl std::fmt::Display for OtpPurpose {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

// ============================================================
// OtpChannel
// ============================================================

/// Delivery channel for a verification code
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(i16)]
pub enum OtpChannel {
    /// Email delivery (the default)
    #[default]
    Email = 0,
    /// SMS delivery
    Sms = 1,
    /// WhatsApp delivery
    #[serde(rename = "whatsapp")]
    WhatsApp = 2,
}

impl OtpChannel {
    /// Storage id (SMALLINT)
    pub const fn id(&self) -> i16 {
        *self as i16
    }

    /// Wire code
    pub const fn code(&self) -> &'static str {
        match self {
            Self::Email => "email",
            Self::Sms => "sms",
            Self::WhatsApp => "whatsapp",
        }
    }

    /// Restore from a storage id
    pub const fn from_id(id: i16) -> Option<Self> {
        match id {
            0 => Some(Self::Email),
            1 => Some(Self::Sms),
            2 => Some(Self::WhatsApp),
            _ => None,
        }
    }

    /// Restore from a wire code
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "email" => Some(Self::Email),
            "sms" => Some(Self::Sms),
            "whatsapp" => Some(Self::WhatsApp),
            _ => None,
        }
    }
}

impl std::fmt::Display for OtpChannel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

// ============================================================
// OtpStatus
// ============================================================

/// Lifecycle state of an OTP record
///
/// PENDING is the only live state. The other three are terminal: a
/// record never leaves USED, EXPIRED or BLOCKED.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(i16)]
pub enum OtpStatus {
    /// Awaiting verification
    #[default]
    Pending = 0,
    /// Successfully consumed
    Used = 1,
    /// Timed out or superseded by a resend
    Expired = 2,
    /// Retry budget exhausted
    Blocked = 3,
}

impl OtpStatus {
    /// Storage id (SMALLINT)
    pub const fn id(&self) -> i16 {
        *self as i16
    }

    /// Wire code
    pub const fn code(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Used => "used",
            Self::Expired => "expired",
            Self::Blocked => "blocked",
        }
    }

    /// Restore from a storage id
    pub const fn from_id(id: i16) -> Option<Self> {
        match id {
            0 => Some(Self::Pending),
            1 => Some(Self::Used),
            2 => Some(Self::Expired),
            3 => Some(Self::Blocked),
            _ => None,
        }
    }

    /// Restore from a wire code
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "pending" => Some(Self::Pending),
            "used" => Some(Self::Used),
            "expired" => Some(Self::Expired),
            "blocked" => Some(Self::Blocked),
            _ => None,
        }
    }

    /// Still awaiting verification?
    pub const fn is_pending(&self) -> bool {
        matches!(self, Self::Pending)
    }

    /// Finished for good?
    pub const fn is_terminal(&self) -> bool {
        !self.is_pending()
    }
}

impl std::fmt::Display for OtpStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

// ============================================================
// OtpCode
// ============================================================

/// Why a submitted code was rejected at the boundary
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OtpCodeError {
    #[error("code must be {MIN_CODE_LENGTH} to {MAX_CODE_LENGTH} digits, got {0}")]
    BadLength(usize),
    #[error("code must contain ASCII digits only")]
    NotNumeric,
}

/// A code submitted for verification
///
/// Validated at construction (digits only, sane length) so the engine
/// never burns a retry on garbage input. Wraps [`ClearSecret`] so the
/// plaintext is zeroized on drop and redacted in debug output.
#[derive(Debug)]
pub struct OtpCode {
    secret: ClearSecret,
}

impl OtpCode {
    pub fn new(raw: &str) -> Result<Self, OtpCodeError> {
        if !(MIN_CODE_LENGTH..=MAX_CODE_LENGTH).contains(&raw.len()) {
            return Err(OtpCodeError::BadLength(raw.len()));
        }
        if !raw.bytes().all(|b| b.is_ascii_digit()) {
            return Err(OtpCodeError::NotNumeric);
        }
        Ok(Self {
            secret: ClearSecret::new(raw),
        })
    }

    pub fn as_secret(&self) -> &ClearSecret {
        &self.secret
    }

    pub fn len(&self) -> usize {
        self.secret.as_str().len()
    }

    pub fn is_empty(&self) -> bool {
        self.secret.as_str().is_empty()
    }
}

// ============================================================
// OtpCodeHash
// ============================================================

/// Salted Argon2id hash of an issued code
///
/// The only at-rest representation of a code. The PHC string embeds
/// the salt and cost parameters, so verification needs no out-of-band
/// state beyond the optional pepper.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OtpCodeHash {
    hash: HashedSecret,
}

impl OtpCodeHash {
    /// Hash a freshly generated code
    pub fn hash(
        code: &ClearSecret,
        pepper: Option<&[u8]>,
        params: HashParams,
    ) -> Result<Self, SecretHashError> {
        Ok(Self {
            hash: HashedSecret::hash(code, pepper, params)?,
        })
    }

    /// Restore from a stored PHC string
    pub fn from_phc_string(phc: impl Into<String>) -> Result<Self, SecretHashError> {
        Ok(Self {
            hash: HashedSecret::from_phc_string(phc)?,
        })
    }

    /// Constant-time comparison against a submitted code
    pub fn verify(&self, code: &ClearSecret, pepper: Option<&[u8]>) -> bool {
        self.hash.verify(code, pepper)
    }

    /// PHC string for persistence
    pub fn as_phc_string(&self) -> &str {
        self.hash.as_phc_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    mod otp_purpose {
        use super::*;

        #[test]
        fn test_id_roundtrip() {
            let all = [
                OtpPurpose::Register,
                OtpPurpose::ResetPassword,
                OtpPurpose::EmailVerification,
                OtpPurpose::LoginVerification,
                OtpPurpose::TwoFactorAuth,
            ];
            for purpose in all {
                assert_eq!(OtpPurpose::from_id(purpose.id()), Some(purpose));
                assert_eq!(OtpPurpose::from_code(purpose.code()), Some(purpose));
            }
        }

        #[test]
        fn test_unknown_id_and_code() {
            assert_eq!(OtpPurpose::from_id(99), None);
            assert_eq!(OtpPurpose::from_id(-1), None);
            assert_eq!(OtpPurpose::from_code("sign_in"), None);
        }

        #[test]
        fn test_display_matches_wire_code() {
            assert_eq!(OtpPurpose::ResetPassword.to_string(), "reset_password");
            assert_eq!(OtpPurpose::TwoFactorAuth.to_string(), "two_factor_auth");
        }

        #[test]
        fn test_serde_uses_wire_codes() {
            let json = serde_json::to_string(&OtpPurpose::LoginVerification).unwrap();
            assert_eq!(json, r#""login_verification""#);
            let back: OtpPurpose = serde_json::from_str(r#""register""#).unwrap();
            assert_eq!(back, OtpPurpose::Register);
        }
    }

    mod otp_channel {
        use super::*;

        #[test]
        fn test_id_roundtrip() {
            for channel in [OtpChannel::Email, OtpChannel::Sms, OtpChannel::WhatsApp] {
                assert_eq!(OtpChannel::from_id(channel.id()), Some(channel));
                assert_eq!(OtpChannel::from_code(channel.code()), Some(channel));
            }
        }

        #[test]
        fn test_default_is_email() {
            assert_eq!(OtpChannel::default(), OtpChannel::Email);
        }

        #[test]
        fn test_whatsapp_wire_code_has_no_underscore() {
            assert_eq!(OtpChannel::WhatsApp.code(), "whatsapp");
            let json = serde_json::to_string(&OtpChannel::WhatsApp).unwrap();
            assert_eq!(json, r#""whatsapp""#);
            let back: OtpChannel = serde_json::from_str(r#""whatsapp""#).unwrap();
            assert_eq!(back, OtpChannel::WhatsApp);
        }
    }

    mod otp_status {
        use super::*;

        #[test]
        fn test_id_roundtrip() {
            let all = [
                OtpStatus::Pending,
                OtpStatus::Used,
                OtpStatus::Expired,
                OtpStatus::Blocked,
            ];
            for status in all {
                assert_eq!(OtpStatus::from_id(status.id()), Some(status));
                assert_eq!(OtpStatus::from_code(status.code()), Some(status));
            }
        }

        #[test]
        fn test_only_pending_is_live() {
            assert!(OtpStatus::Pending.is_pending());
            assert!(!OtpStatus::Pending.is_terminal());
            for status in [OtpStatus::Used, OtpStatus::Expired, OtpStatus::Blocked] {
                assert!(status.is_terminal());
                assert!(!status.is_pending());
            }
        }

        #[test]
        fn test_ids_are_stable() {
            // Storage format; renumbering would corrupt existing rows.
            assert_eq!(OtpStatus::Pending.id(), 0);
            assert_eq!(OtpStatus::Used.id(), 1);
            assert_eq!(OtpStatus::Expired.id(), 2);
            assert_eq!(OtpStatus::Blocked.id(), 3);
        }
    }

    mod otp_code {
        use super::*;

        #[test]
        fn test_accepts_digit_codes_in_range() {
            for raw in ["1234", "482913", "0000000000"] {
                let code = OtpCode::new(raw).unwrap();
                assert_eq!(code.len(), raw.len());
                assert_eq!(code.as_secret().as_str(), raw);
            }
        }

        #[test]
        fn test_rejects_bad_length() {
            assert!(matches!(OtpCode::new("123"), Err(OtpCodeError::BadLength(3))));
            assert!(matches!(
                OtpCode::new("12345678901"),
                Err(OtpCodeError::BadLength(11))
            ));
            assert!(matches!(OtpCode::new(""), Err(OtpCodeError::BadLength(0))));
        }

        #[test]
        fn test_rejects_non_digits() {
            assert!(matches!(OtpCode::new("12a456"), Err(OtpCodeError::NotNumeric)));
            assert!(matches!(OtpCode::new("12 456"), Err(OtpCodeError::NotNumeric)));
            // Full-width digits are multi-byte, so they trip the length
            // check before the digit check.
            assert!(matches!(
                OtpCode::new("１２３４５６"),
                Err(OtpCodeError::BadLength(18))
            ));
        }

        #[test]
        fn test_debug_redacts_plaintext() {
            let code = OtpCode::new("482913").unwrap();
            let debug = format!("{code:?}");
            assert!(!debug.contains("482913"));
        }
    }

    mod otp_code_hash {
        use super::*;

        fn params() -> HashParams {
            HashParams::fast_insecure()
        }

        #[test]
        fn test_hash_and_verify() {
            let code = ClearSecret::new("482913");
            let hash = OtpCodeHash::hash(&code, None, params()).unwrap();
            assert!(hash.verify(&code, None));
            assert!(!hash.verify(&ClearSecret::new("482914"), None));
        }

        #[test]
        fn test_pepper_must_match() {
            let code = ClearSecret::new("482913");
            let hash = OtpCodeHash::hash(&code, Some(b"pepper"), params()).unwrap();
            assert!(hash.verify(&code, Some(b"pepper")));
            assert!(!hash.verify(&code, None));
            assert!(!hash.verify(&code, Some(b"other")));
        }

        #[test]
        fn test_phc_roundtrip() {
            let code = ClearSecret::new("482913");
            let hash = OtpCodeHash::hash(&code, None, params()).unwrap();
            let restored = OtpCodeHash::from_phc_string(hash.as_phc_string()).unwrap();
            assert!(restored.verify(&code, None));
        }

        #[test]
        fn test_rejects_invalid_phc() {
            assert!(OtpCodeHash::from_phc_string("not-a-phc-string").is_err());
        }
    }
}
