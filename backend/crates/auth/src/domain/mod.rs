//! Domain Layer
//!
//! Contains entities, value objects, repository traits and the
//! notification port.

pub mod entity;
pub mod notification;
pub mod repository;
pub mod value_object;

// Re-exports
pub use entity::user::User;
pub use notification::{OtpDelivery, OtpNotifier};
pub use repository::UserRepository;
