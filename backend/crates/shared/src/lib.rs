//! Shared Kernel - Domain-crossing minimal core
//!
//! The smallest vocabulary shared by every domain crate:
//! - Unified error type and result alias
//! - Typed entity IDs
//!
//! **Design Principle**: only things that are "hard to change" and mean
//! the same thing in every domain belong here. Anything with a single
//! owner lives in that owner's crate.

pub mod error {
    pub mod app_error;
    pub mod conversions;
    pub mod kind;
}
pub mod id;
