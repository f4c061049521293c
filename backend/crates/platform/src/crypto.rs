//! Cryptographic Utilities

use base64::{Engine, engine::general_purpose};
use rand::{Rng, RngCore, rngs::OsRng};
use sha2::{Digest, Sha256};

/// Longest numeric code that fits a `u64` without overflow
pub const MAX_NUMERIC_CODE_LENGTH: usize = 18;

/// Generate cryptographically secure random bytes
pub fn random_bytes(len: usize) -> Vec<u8> {
    let mut bytes = vec![0u8; len];
    OsRng.fill_bytes(&mut bytes);
    bytes
}

/// Generate a numeric code of exactly `length` decimal digits
///
/// Drawn uniformly from `[0, 10^length)` using the OS CSPRNG and
/// zero-padded, so leading zeros are as likely as any other digit.
///
/// ## Panics
/// Panics when `length` is 0 or exceeds [`MAX_NUMERIC_CODE_LENGTH`];
/// both are programmer errors, not runtime conditions.
pub fn numeric_code(length: usize) -> String {
    assert!(
        (1..=MAX_NUMERIC_CODE_LENGTH).contains(&length),
        "numeric code length must be in 1..={}",
        MAX_NUMERIC_CODE_LENGTH
    );
    let bound = 10u64.pow(length as u32);
    let value = OsRng.gen_range(0..bound);
    format!("{:0width$}", value, width = length)
}

/// Encode bytes as base64
pub fn to_base64(bytes: &[u8]) -> String {
    general_purpose::STANDARD.encode(bytes)
}

/// Decode base64 to bytes
pub fn from_base64(s: &str) -> Result<Vec<u8>, base64::DecodeError> {
    general_purpose::STANDARD.decode(s)
}

/// Compute HMAC-SHA256
pub fn hmac_sha256(key: &[u8; 32], data: &[u8]) -> [u8; 32] {
    // HMAC: H((K XOR opad) || H((K XOR ipad) || message))
    let mut o_key_pad = [0x5cu8; 64];
    let mut i_key_pad = [0x36u8; 64];

    for i in 0..32 {
        o_key_pad[i] ^= key[i];
        i_key_pad[i] ^= key[i];
    }

    let mut inner_hash = Sha256::new();
    inner_hash.update(i_key_pad);
    inner_hash.update(data);
    let inner_result = inner_hash.finalize();

    let mut outer_hash = Sha256::new();
    outer_hash.update(o_key_pad);
    outer_hash.update(inner_result);
    outer_hash.finalize().into()
}

/// Constant-time comparison to prevent timing attacks
pub fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let mut result = 0u8;
    for (x, y) in a.iter().zip(b.iter()) {
        result |= x ^ y;
    }
    result == 0
}
