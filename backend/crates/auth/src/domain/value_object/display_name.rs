//! Display Name Value Object
//!
//! ユーザーの表示名。ログイン識別子は [`Email`](super::email::Email) が
//! 担うため、表示名は一意性を持たず、画面表示と通知の宛名にのみ使う。
//!
//! ## 不変条件
//! - NFKC正規化・前後トリム済み
//! - 長さ: 2〜100文字（正規化後）
//! - 制御文字を含まない

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;
use unicode_normalization::UnicodeNormalization;

/// Minimum length for a display name (in characters)
pub const DISPLAY_NAME_MIN_LENGTH: usize = 2;

/// Maximum length for a display name (in characters)
pub const DISPLAY_NAME_MAX_LENGTH: usize = 100;

/// Error returned when display name validation fails
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DisplayNameError {
    #[error("Display name cannot be empty")]
    Empty,

    #[error("Display name is too short ({length} chars, minimum {min})")]
    TooShort { length: usize, min: usize },

    #[error("Display name is too long ({length} chars, maximum {max})")]
    TooLong { length: usize, max: usize },

    #[error("Display name contains a control character")]
    ControlCharacter,
}

/// Validated, normalized display name
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DisplayName(String);

impl DisplayName {
    /// Create a new DisplayName from raw input
    ///
    /// Applies NFKC normalization and trims surrounding whitespace
    /// before validating.
    pub fn new(input: impl AsRef<str>) -> Result<Self, DisplayNameError> {
        let normalized = input.as_ref().nfkc().collect::<String>().trim().to_string();

        if normalized.is_empty() {
            return Err(DisplayNameError::Empty);
        }

        let length = normalized.chars().count();
        if length < DISPLAY_NAME_MIN_LENGTH {
            return Err(DisplayNameError::TooShort {
                length,
                min: DISPLAY_NAME_MIN_LENGTH,
            });
        }
        if length > DISPLAY_NAME_MAX_LENGTH {
            return Err(DisplayNameError::TooLong {
                length,
                max: DISPLAY_NAME_MAX_LENGTH,
            });
        }

        if normalized.chars().any(|c| c.is_control()) {
            return Err(DisplayNameError::ControlCharacter);
        }

        Ok(Self(normalized))
    }

    /// Create from database value (assumed already validated)
    pub fn from_db(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Get the display name as a string slice
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Convert to owned String
    #[inline]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Debug for DisplayName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("DisplayName").field(&self.0).finish()
    }
}

impl fmt::Display for DisplayName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for DisplayName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for DisplayName {
    type Error = DisplayNameError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<DisplayName> for String {
    fn from(name: DisplayName) -> Self {
        name.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_names() {
        assert!(DisplayName::new("Alice").is_ok());
        assert!(DisplayName::new("山田 太郎").is_ok());
        assert!(DisplayName::new("Jean-Luc Picard").is_ok());
    }

    #[test]
    fn test_trims_and_normalizes() {
        let name = DisplayName::new("  Alice  ").unwrap();
        assert_eq!(name.as_str(), "Alice");

        // Full-width characters become ASCII after NFKC
        let name = DisplayName::new("Ａｌｉｃｅ").unwrap();
        assert_eq!(name.as_str(), "Alice");
    }

    #[test]
    fn test_empty_fails() {
        assert!(matches!(DisplayName::new(""), Err(DisplayNameError::Empty)));
        assert!(matches!(
            DisplayName::new("   "),
            Err(DisplayNameError::Empty)
        ));
    }

    #[test]
    fn test_too_short() {
        assert!(matches!(
            DisplayName::new("a"),
            Err(DisplayNameError::TooShort { length: 1, min: 2 })
        ));
    }

    #[test]
    fn test_too_long() {
        let input = "a".repeat(DISPLAY_NAME_MAX_LENGTH + 1);
        assert!(matches!(
            DisplayName::new(&input),
            Err(DisplayNameError::TooLong { .. })
        ));
    }

    #[test]
    fn test_control_characters_rejected() {
        assert!(matches!(
            DisplayName::new("Ali\u{0007}ce"),
            Err(DisplayNameError::ControlCharacter)
        ));
    }

    #[test]
    fn test_serde_roundtrip() {
        let name = DisplayName::new("Alice").unwrap();
        let json = serde_json::to_string(&name).unwrap();
        assert_eq!(json, "\"Alice\"");

        let back: DisplayName = serde_json::from_str(&json).unwrap();
        assert_eq!(back, name);
    }

    #[test]
    fn test_deserialize_invalid() {
        let result: Result<DisplayName, _> = serde_json::from_str("\"x\"");
        assert!(result.is_err());
    }
}
