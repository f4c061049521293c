//! Infrastructure Layer
//!
//! Database implementations and external service integrations.

pub mod notify;
pub mod postgres;

pub use notify::LogNotifier;
pub use postgres::PgAuthRepository;
