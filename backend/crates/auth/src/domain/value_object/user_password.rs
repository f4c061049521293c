//! User Password Value Object
//!
//! Password policy and hashing for account credentials. The
//! cryptography (Argon2id, zeroization, constant-time verify) lives in
//! `platform::secret`; this module owns the policy layer on top.
//!
//! ## Policy (NIST SP 800-63B)
//! - Length 8..=128 characters after NFKC normalization
//! - No control characters
//! - No composition rules (no forced symbol/digit classes)

use kernel::error::app_error::{AppError, AppResult};
use platform::secret::{ClearSecret, HashParams, HashedSecret};
use std::fmt;
use unicode_normalization::UnicodeNormalization;

/// Minimum password length (in characters)
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Maximum password length (in characters)
pub const MAX_PASSWORD_LENGTH: usize = 128;

// ============================================================================
// Raw Password (User Input)
// ============================================================================

/// Raw password from user input
///
/// NFKC-normalized and policy-checked. Memory is zeroized when
/// dropped; `Debug` output is redacted.
pub struct RawPassword(ClearSecret);

impl RawPassword {
    /// Create a new raw password with validation
    pub fn new(raw: impl Into<String>) -> AppResult<Self> {
        // NFKC so e.g. composed and decomposed forms of the same
        // character verify against the same hash
        let normalized: String = raw.into().nfkc().collect();

        if normalized.trim().is_empty() {
            return Err(AppError::bad_request("Password cannot be empty")
                .with_action("Please enter a password"));
        }

        let length = normalized.chars().count();
        if length < MIN_PASSWORD_LENGTH {
            return Err(AppError::bad_request(format!(
                "Password must be at least {} characters (got {})",
                MIN_PASSWORD_LENGTH, length
            ))
            .with_action("Please choose a longer password"));
        }
        if length > MAX_PASSWORD_LENGTH {
            return Err(AppError::bad_request(format!(
                "Password must be at most {} characters (got {})",
                MAX_PASSWORD_LENGTH, length
            ))
            .with_action("Please choose a shorter password"));
        }

        if normalized.chars().any(|c| c.is_control()) {
            return Err(AppError::bad_request("Password contains invalid characters")
                .with_action("Please remove any special control characters"));
        }

        Ok(Self(ClearSecret::new(normalized)))
    }

    /// Access the inner cleartext for hashing/verification
    pub(crate) fn secret(&self) -> &ClearSecret {
        &self.0
    }
}

impl fmt::Debug for RawPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("RawPassword").field(&"[REDACTED]").finish()
    }
}

// ============================================================================
// User Password (Hashed, for storage)
// ============================================================================

/// Hashed user password for database storage
///
/// Argon2id PHC string; safe to persist and to appear in logs.
#[derive(Clone, PartialEq, Eq)]
pub struct UserPassword(HashedSecret);

impl UserPassword {
    /// Hash a validated raw password for storage
    ///
    /// ## Arguments
    /// * `raw` - the validated raw password
    /// * `pepper` - optional application-wide secret
    /// * `params` - Argon2id cost parameters for the new hash
    pub fn from_raw(
        raw: &RawPassword,
        pepper: Option<&[u8]>,
        params: HashParams,
    ) -> AppResult<Self> {
        let hashed = HashedSecret::hash(raw.secret(), pepper, params)
            .map_err(|e| AppError::internal(format!("Password hashing failed: {}", e)))?;
        Ok(Self(hashed))
    }

    /// Create from a PHC string read back from the database
    pub fn from_phc_string(phc_string: impl Into<String>) -> AppResult<Self> {
        let hashed = HashedSecret::from_phc_string(phc_string)
            .map_err(|_| AppError::internal("Invalid password hash in database"))?;
        Ok(Self(hashed))
    }

    /// Get PHC string for database storage
    pub fn as_phc_string(&self) -> &str {
        self.0.as_phc_string()
    }

    /// Verify a raw password against this hash
    ///
    /// Cost parameters come from the stored PHC string. A mismatch is
    /// `false`, never an error.
    pub fn verify(&self, raw: &RawPassword, pepper: Option<&[u8]>) -> bool {
        self.0.verify(raw.secret(), pepper)
    }

    /// Whether the stored hash lags behind the configured cost
    pub fn needs_rehash(&self, params: HashParams) -> bool {
        self.0.needs_rehash(params)
    }
}

impl fmt::Debug for UserPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UserPassword")
            .field("hash", &"[HASH]")
            .finish()
    }
}

// ============================================================================
// Tests
// ============================================================================
