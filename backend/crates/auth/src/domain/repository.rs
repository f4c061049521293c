//! Repository Traits
//!
//! Interfaces for data persistence. Implementation is in infrastructure layer.

use kernel::id::UserId;

use crate::domain::entity::user::User;
use crate::domain::value_object::{email::Email, user_password::UserPassword};
use crate::error::AuthResult;

/// User repository trait
#[trait_variant::make(UserRepository: Send)]
pub trait LocalUserRepository {
    /// Create a new user
    async fn create(&self, user: &User) -> AuthResult<()>;

    /// Find user by ID
    async fn find_by_id(&self, user_id: UserId) -> AuthResult<Option<User>>;

    /// Find user by email
    async fn find_by_email(&self, email: &Email) -> AuthResult<Option<User>>;

    /// Set the verification timestamp on a not-yet-verified user
    ///
    /// Returns whether a row changed; false means the user was
    /// already verified (or does not exist).
    async fn mark_verified(&self, user_id: UserId) -> AuthResult<bool>;

    /// Replace the stored password hash
    async fn update_password(&self, user_id: UserId, password: &UserPassword) -> AuthResult<()>;
}
