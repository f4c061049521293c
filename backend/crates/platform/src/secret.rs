//! Short-Secret Hashing and Verification
//!
//! Argon2id at-rest protection for secrets that are later compared:
//! account passwords and one-time verification codes. One-time codes are
//! low-entropy (a 6-digit code has under 20 bits), which is exactly why a
//! memory-hard KDF is used instead of a fast digest: offline guessing of a
//! leaked hash must stay expensive.
//!
//! ## Security Features
//! - Memory-hard hashing (Argon2id, OWASP parameters by default)
//! - Zeroization of cleartext material
//! - Constant-time verification (inside the argon2 crate)
//! - Optional pepper mixed into the hashed input
//!
//! Policy checks (lengths, character classes) belong to the owning domain;
//! this module hashes whatever it is handed.

use std::fmt;

use argon2::{
    Algorithm, Argon2, Params, PasswordHash, PasswordHasher, PasswordVerifier, Version,
    password_hash::SaltString,
};
use rand::rngs::OsRng;
use thiserror::Error;
use zeroize::{Zeroize, ZeroizeOnDrop};

// ============================================================================
// Error Types
// ============================================================================

/// Hashing/verification errors
#[derive(Debug, Error)]
pub enum SecretHashError {
    /// Hashing operation failed
    #[error("Secret hashing failed: {0}")]
    HashingFailed(String),

    /// Invalid PHC string
    #[error("Invalid secret hash format")]
    InvalidHashFormat,

    /// Cost parameters rejected by the argon2 crate
    #[error("Invalid Argon2 parameters: {0}")]
    InvalidParams(String),
}

// ============================================================================
// Cost parameters
// ============================================================================

/// Argon2id cost surface
///
/// The work factor applied when creating new hashes. Verification reads
/// the parameters embedded in the stored PHC string, so existing hashes
/// stay verifiable after these are raised.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HashParams {
    /// Memory cost in KiB
    pub memory_kib: u32,
    /// Number of iterations
    pub iterations: u32,
    /// Lanes / threads
    pub parallelism: u32,
}

impl Default for HashParams {
    /// OWASP recommended Argon2id parameters: m=19456 (19 MiB), t=2, p=1
    fn default() -> Self {
        Self {
            memory_kib: 19_456,
            iterations: 2,
            parallelism: 1,
        }
    }
}

impl HashParams {
    /// Minimal-cost parameters for tests. Never use for real data.
    pub fn fast_insecure() -> Self {
        Self {
            memory_kib: 8,
            iterations: 1,
            parallelism: 1,
        }
    }

    fn hasher(&self) -> Result<Argon2<'static>, SecretHashError> {
        let params = Params::new(self.memory_kib, self.iterations, self.parallelism, None)
            .map_err(|e| SecretHashError::InvalidParams(e.to_string()))?;
        Ok(Argon2::new(Algorithm::Argon2id, Version::V0x13, params))
    }
}

// ============================================================================
// Clear Secret (Zeroized on drop)
// ============================================================================

/// Cleartext secret with automatic memory zeroization
///
/// Wraps password or code material so it is erased from memory on drop.
/// Does not implement `Clone`; `Debug` output is redacted.
///
/// ## Examples
/// ```rust
/// use platform::secret::ClearSecret;
///
/// let secret = ClearSecret::new("482913");
/// assert_eq!(format!("{:?}", secret), "ClearSecret(\"[REDACTED]\")");
/// ```
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct ClearSecret(String);

impl ClearSecret {
    /// Wrap raw secret material
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// The secret as UTF-8 text
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The secret as bytes for hashing
    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }
}

impl fmt::Debug for ClearSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ClearSecret").field(&"[REDACTED]").finish()
    }
}

// ============================================================================
// Hashed Secret (Safe to store)
// ============================================================================

/// Hashed secret in PHC string format
///
/// The PHC string embeds algorithm, version, cost parameters, salt and
/// digest, so a row read back from storage verifies without any extra
/// context.
///
/// ## Examples
/// ```rust
/// use platform::secret::{ClearSecret, HashParams, HashedSecret};
///
/// let code = ClearSecret::new("482913");
/// let hashed = HashedSecret::hash(&code, None, HashParams::fast_insecure()).unwrap();
/// assert!(hashed.verify(&code, None));
/// assert!(!hashed.verify(&ClearSecret::new("000000"), None));
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct HashedSecret {
    phc: String,
}

impl HashedSecret {
    /// Hash a secret with a fresh random salt
    ///
    /// ## Arguments
    /// * `secret` - cleartext to protect
    /// * `pepper` - optional application-wide secret appended before hashing
    /// * `params` - cost parameters for this new hash
    pub fn hash(
        secret: &ClearSecret,
        pepper: Option<&[u8]>,
        params: HashParams,
    ) -> Result<Self, SecretHashError> {
        let input = peppered(secret, pepper);

        // 128-bit random salt
        let salt = SaltString::generate(OsRng);

        let hash = params
            .hasher()?
            .hash_password(&input, &salt)
            .map_err(|e| SecretHashError::HashingFailed(e.to_string()))?;

        Ok(Self {
            phc: hash.to_string(),
        })
    }

    /// Create from a PHC string (e.g. read from the database)
    pub fn from_phc_string(s: impl Into<String>) -> Result<Self, SecretHashError> {
        let phc = s.into();
        PasswordHash::new(&phc).map_err(|_| SecretHashError::InvalidHashFormat)?;
        Ok(Self { phc })
    }

    /// The PHC string for storage
    pub fn as_phc_string(&self) -> &str {
        &self.phc
    }

    /// Verify a secret against this hash
    ///
    /// Cost parameters come from the PHC string itself. The argon2 crate
    /// compares digests in constant time; a mismatch is `false`, never an
    /// error.
    ///
    /// ## Arguments
    /// * `secret` - the cleartext to check
    /// * `pepper` - must match the pepper used when hashing
    pub fn verify(&self, secret: &ClearSecret, pepper: Option<&[u8]>) -> bool {
        let input = peppered(secret, pepper);

        let parsed = match PasswordHash::new(&self.phc) {
            Ok(h) => h,
            Err(_) => return false,
        };

        Argon2::default().verify_password(&input, &parsed).is_ok()
    }

    /// Whether the stored hash lags behind the configured cost
    ///
    /// True when the algorithm is not Argon2id or any cost parameter
    /// differs from `params`. Callers rehash on the next successful
    /// verification.
    pub fn needs_rehash(&self, params: HashParams) -> bool {
        let parsed = match PasswordHash::new(&self.phc) {
            Ok(h) => h,
            Err(_) => return true,
        };

        if parsed.algorithm != Algorithm::Argon2id.ident() {
            return true;
        }

        match Params::try_from(&parsed) {
            Ok(current) => {
                current.m_cost() != params.memory_kib
                    || current.t_cost() != params.iterations
                    || current.p_cost() != params.parallelism
            }
            Err(_) => true,
        }
    }
}

impl fmt::Debug for HashedSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HashedSecret")
            .field("phc", &"[HASH]")
            .finish()
    }
}

/// Append the pepper to the secret bytes when one is configured
fn peppered(secret: &ClearSecret, pepper: Option<&[u8]>) -> Vec<u8> {
    match pepper {
        Some(p) => {
            let mut combined = secret.as_bytes().to_vec();
            combined.extend_from_slice(p);
            combined
        }
        None => secret.as_bytes().to_vec(),
    }
}

// ============================================================================
// Tests
// ============================================================================
