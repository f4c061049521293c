//! User Entity
//!
//! One row per account. An account starts unverified; it becomes
//! verified exactly once, by consuming a registration code, and never
//! goes back.

use chrono::{DateTime, Utc};

use kernel::id::UserId;

use crate::domain::value_object::{
    display_name::DisplayName, email::Email, public_id::PublicId, user_password::UserPassword,
    user_role::UserRole,
};

/// User entity
#[derive(Debug, Clone)]
pub struct User {
    /// Internal UUID identifier
    pub user_id: UserId,
    /// Public-facing nanoid identifier (URL-safe)
    pub public_id: PublicId,
    /// Email address (unique, the login identifier)
    pub email: Email,
    /// Display name (not unique)
    pub display_name: DisplayName,
    /// Argon2id password hash
    pub password: UserPassword,
    /// Role (User, Admin)
    pub user_role: UserRole,
    /// Whether login requires a second verification-code step
    pub two_factor_enabled: bool,
    /// When the account's email was verified; None until then
    pub verified_at: Option<DateTime<Utc>>,
    /// Created timestamp
    pub created_at: DateTime<Utc>,
    /// Updated timestamp
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Create a new, unverified user
    pub fn new(email: Email, display_name: DisplayName, password: UserPassword) -> Self {
        let now = Utc::now();

        Self {
            user_id: UserId::new(),
            public_id: PublicId::new(),
            email,
            display_name,
            password,
            user_role: UserRole::default(),
            two_factor_enabled: false,
            verified_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Whether the account's email has been verified
    pub fn is_verified(&self) -> bool {
        self.verified_at.is_some()
    }

    /// Record a successful email verification
    pub fn record_verification(&mut self) {
        let now = Utc::now();
        self.verified_at = Some(now);
        self.updated_at = now;
    }

    /// Replace the stored password hash
    pub fn set_password(&mut self, password: UserPassword) {
        self.password = password;
        self.updated_at = Utc::now();
    }

    /// Enable or disable the second login step
    pub fn set_two_factor(&mut self, enabled: bool) {
        self.two_factor_enabled = enabled;
        self.updated_at = Utc::now();
    }
}
