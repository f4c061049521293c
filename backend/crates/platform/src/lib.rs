//! Platform Crate - Technical Infrastructure
//!
//! This crate provides shared technical foundations with no domain
//! knowledge:
//! - Cryptographic utilities (CSPRNG, numeric codes, HMAC, Base64)
//! - Short-secret hashing (Argon2id, for passwords and one-time codes)

pub mod crypto;
pub mod secret;
