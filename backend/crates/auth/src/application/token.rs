//! Opaque Access Tokens
//!
//! Stateless bearer tokens: base64 of `user_id (16 bytes) ||
//! expires_at_ms (8 bytes, big-endian) || HMAC-SHA-256 tag`. The tag
//! covers id and expiry, so neither can be altered without the
//! server-side secret, and verification needs no session storage.

use chrono::Utc;
use uuid::Uuid;

use kernel::id::UserId;

/// Byte length of a decoded token: 16 (UUID) + 8 (expiry) + 32 (HMAC)
const TOKEN_LEN: usize = 56;

/// Claims recovered from a valid token
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenClaims {
    pub user_id: UserId,
    pub expires_at_ms: i64,
}

/// Create a signed access token
pub fn issue_access_token(user_id: UserId, expires_at_ms: i64, secret: &[u8; 32]) -> String {
    let mut payload = Vec::with_capacity(TOKEN_LEN);
    payload.extend_from_slice(user_id.as_uuid().as_bytes());
    payload.extend_from_slice(&expires_at_ms.to_be_bytes());

    let tag = platform::crypto::hmac_sha256(secret, &payload);
    payload.extend_from_slice(&tag);

    platform::crypto::to_base64(&payload)
}

/// Verify a token's signature and expiry
///
/// Returns `None` for anything that does not check out: wrong length,
/// bad base64, tampered payload, wrong secret, or past expiry. The
/// tag comparison is constant-time.
pub fn verify_access_token(token: &str, secret: &[u8; 32]) -> Option<TokenClaims> {
    let data = platform::crypto::from_base64(token).ok()?;
    if data.len() != TOKEN_LEN {
        return None;
    }

    let payload = &data[0..24];
    let provided_tag = &data[24..TOKEN_LEN];

    let expected_tag = platform::crypto::hmac_sha256(secret, payload);
    if !platform::crypto::constant_time_eq(provided_tag, &expected_tag) {
        return None;
    }

    let id_bytes: [u8; 16] = data[0..16].try_into().ok()?;
    let expiry_bytes: [u8; 8] = data[16..24].try_into().ok()?;
    let expires_at_ms = i64::from_be_bytes(expiry_bytes);

    if Utc::now().timestamp_millis() >= expires_at_ms {
        return None;
    }

    Some(TokenClaims {
        user_id: UserId::from_uuid(Uuid::from_bytes(id_bytes)),
        expires_at_ms,
    })
}
