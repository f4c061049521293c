//! Application Configuration
//!
//! Configuration for the Auth application layer.

use std::time::Duration;

use kernel::error::app_error::{AppError, AppResult};
use platform::crypto;
use platform::secret::HashParams;

/// Auth application configuration
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// HMAC key for signing access tokens (32 bytes)
    pub token_secret: [u8; 32],
    /// Access token lifetime (default 12 hours)
    pub access_token_ttl: Duration,
    /// Argon2id cost parameters for password hashing
    pub hash_params: HashParams,
    /// Password pepper (optional, application-wide secret)
    pub password_pepper: Option<Vec<u8>>,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            token_secret: [0u8; 32],
            access_token_ttl: Duration::from_secs(12 * 3600),
            hash_params: HashParams::default(),
            password_pepper: None,
        }
    }
}

impl AuthConfig {
    /// Create config with a random token secret
    ///
    /// Tokens stop verifying across restarts; use a configured secret
    /// in production.
    pub fn with_random_secret() -> Self {
        let bytes = crypto::random_bytes(32);
        let mut secret = [0u8; 32];
        secret.copy_from_slice(&bytes);
        Self {
            token_secret: secret,
            ..Default::default()
        }
    }

    /// Create config for development: random secret, cheap hashing
    pub fn development() -> Self {
        Self {
            hash_params: HashParams::fast_insecure(),
            ..Self::with_random_secret()
        }
    }

    /// Read the configuration from the environment
    ///
    /// `AUTH_TOKEN_SECRET` is required and must be 32 base64-encoded
    /// bytes. `ACCESS_TOKEN_TTL_MINUTES` and `PASSWORD_PEPPER` are
    /// optional.
    pub fn from_env() -> AppResult<Self> {
        let mut config = Self::default();

        let secret_b64 = std::env::var("AUTH_TOKEN_SECRET")
            .map_err(|_| AppError::internal("AUTH_TOKEN_SECRET must be set"))?;
        let secret_bytes = crypto::from_base64(secret_b64.trim())
            .map_err(|_| AppError::internal("AUTH_TOKEN_SECRET is not valid base64"))?;
        if secret_bytes.len() != 32 {
            return Err(AppError::internal(format!(
                "AUTH_TOKEN_SECRET must decode to 32 bytes, got {}",
                secret_bytes.len()
            )));
        }
        config.token_secret.copy_from_slice(&secret_bytes);

        if let Ok(raw) = std::env::var("ACCESS_TOKEN_TTL_MINUTES") {
            let minutes: u64 = raw.parse()?;
            if minutes == 0 {
                return Err(AppError::internal(
                    "ACCESS_TOKEN_TTL_MINUTES must be at least 1",
                ));
            }
            config.access_token_ttl = Duration::from_secs(minutes * 60);
        }

        if let Ok(raw) = std::env::var("PASSWORD_PEPPER") {
            if !raw.is_empty() {
                config.password_pepper = Some(raw.into_bytes());
            }
        }

        Ok(config)
    }

    /// Access token lifetime in milliseconds
    pub fn access_token_ttl_ms(&self) -> i64 {
        self.access_token_ttl.as_millis() as i64
    }

    /// Get password pepper as slice
    pub fn pepper(&self) -> Option<&[u8]> {
        self.password_pepper.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_ttl_is_twelve_hours() {
        let config = AuthConfig::default();
        assert_eq!(config.access_token_ttl_ms(), 12 * 60 * 60 * 1000);
        assert!(config.pepper().is_none());
    }

    #[test]
    fn test_with_random_secret_is_nonzero() {
        let config = AuthConfig::with_random_secret();
        assert_ne!(config.token_secret, [0u8; 32]);
    }

    #[test]
    fn test_development_uses_cheap_hashing() {
        let config = AuthConfig::development();
        assert_eq!(config.hash_params, HashParams::fast_insecure());
        assert_ne!(config.token_secret, [0u8; 32]);
    }
}
