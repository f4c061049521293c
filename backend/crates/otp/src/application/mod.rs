//! Application Layer - Use Cases
//!
//! Orchestrates the record store, the code generator and the hashing
//! primitives. Transport concerns stay out; callers map [`crate::error::OtpError`]
//! to whatever surface they expose.

pub mod config;
pub mod generate_otp;
pub mod verify_otp;
