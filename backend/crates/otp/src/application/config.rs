//! OTP engine configuration

use std::collections::HashMap;
use std::time::Duration;

use kernel::error::app_error::{AppError, AppResult};
use platform::secret::HashParams;

use crate::domain::value_objects::{MAX_CODE_LENGTH, MIN_CODE_LENGTH, OtpPurpose};

/// Expiry / throttling knobs for one purpose
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OtpPolicy {
    /// How long an issued code stays verifiable
    pub expiry: Duration,
    /// Minimum gap between two issues for the same key
    pub resend_interval: Duration,
}

/// Engine configuration
///
/// The defaults match the production values; per-purpose overrides let
/// e.g. login codes expire faster than registration codes without a
/// second engine instance.
#[derive(Debug, Clone)]
pub struct OtpConfig {
    /// Digits per generated code
    pub code_length: usize,
    /// Wrong-code attempts before a record is blocked
    pub max_retry: i16,
    /// Policy applied when no per-purpose override exists
    pub default_policy: OtpPolicy,
    /// Per-purpose policy overrides
    pub purpose_policies: HashMap<OtpPurpose, OtpPolicy>,
    /// Argon2id cost parameters for code hashing
    pub hash_params: HashParams,
    /// Optional application-wide pepper mixed into every code hash
    pub pepper: Option<Vec<u8>>,
}

impl Default for OtpConfig {
    fn default() -> Self {
        Self {
            code_length: 6,
            max_retry: 3,
            default_policy: OtpPolicy {
                expiry: Duration::from_secs(15 * 60),
                resend_interval: Duration::from_secs(60),
            },
            purpose_policies: HashMap::new(),
            hash_params: HashParams::default(),
            pepper: None,
        }
    }
}

impl OtpConfig {
    /// Development preset: production semantics, cheap hashing
    pub fn development() -> Self {
        Self {
            hash_params: HashParams::fast_insecure(),
            ..Self::default()
        }
    }

    /// Read overrides from the environment
    ///
    /// Unset variables keep their defaults; set-but-invalid values are
    /// a startup error rather than a silent fallback.
    pub fn from_env() -> AppResult<Self> {
        let mut config = Self::default();

        if let Ok(raw) = std::env::var("OTP_LENGTH") {
            let length: usize = raw.parse()?;
            if !(MIN_CODE_LENGTH..=MAX_CODE_LENGTH).contains(&length) {
                return Err(AppError::internal(format!(
                    "OTP_LENGTH must be between {MIN_CODE_LENGTH} and {MAX_CODE_LENGTH}, got {length}"
                )));
            }
            config.code_length = length;
        }

        if let Ok(raw) = std::env::var("OTP_EXPIRY_MINUTES") {
            let minutes: u64 = raw.parse()?;
            if minutes == 0 {
                return Err(AppError::internal(
                    "OTP_EXPIRY_MINUTES must be at least 1",
                ));
            }
            config.default_policy.expiry = Duration::from_secs(minutes * 60);
        }

        if let Ok(raw) = std::env::var("MAX_OTP_RETRY") {
            let max_retry: i16 = raw.parse()?;
            if max_retry < 1 {
                return Err(AppError::internal(
                    "MAX_OTP_RETRY must be at least 1",
                ));
            }
            config.max_retry = max_retry;
        }

        if let Ok(raw) = std::env::var("MIN_RESEND_INTERVAL_SECONDS") {
            let seconds: u64 = raw.parse()?;
            config.default_policy.resend_interval = Duration::from_secs(seconds);
        }

        if let Ok(raw) = std::env::var("OTP_PEPPER") {
            if !raw.is_empty() {
                config.pepper = Some(raw.into_bytes());
            }
        }

        Ok(config)
    }

    /// Policy in effect for `purpose`
    pub fn policy_for(&self, purpose: OtpPurpose) -> OtpPolicy {
        self.purpose_policies
            .get(&purpose)
            .copied()
            .unwrap_or(self.default_policy)
    }

    /// Code lifetime for `purpose` in milliseconds
    pub fn expiry_ms(&self, purpose: OtpPurpose) -> i64 {
        self.policy_for(purpose).expiry.as_millis() as i64
    }

    /// Resend cooldown for `purpose` in milliseconds
    pub fn resend_interval_ms(&self, purpose: OtpPurpose) -> i64 {
        self.policy_for(purpose).resend_interval.as_millis() as i64
    }

    /// Pepper bytes, if configured
    pub fn pepper(&self) -> Option<&[u8]> {
        self.pepper.as_deref()
    }
}
