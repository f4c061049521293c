//! Domain Layer - Business logic and entities
//!
//! - Record entity ([`entities::OtpRecord`])
//! - Value objects (purpose, channel, status, code, code hash)
//! - Repository trait (interface only; the implementation lives in
//!   the infrastructure layer)

pub mod entities;
pub mod repository;
pub mod value_objects;
