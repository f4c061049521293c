//! Notification Dispatch Port
//!
//! Boundary between the account flows and whatever actually delivers
//! verification codes (email, SMS, WhatsApp). Delivery is best-effort:
//! callers log a failure and continue, because the user can always
//! request a resend.

use thiserror::Error;

use otp::models::{OtpChannel, OtpPurpose};

/// Delivery failure
#[derive(Debug, Error)]
pub enum NotifyError {
    /// No provider configured for the requested channel
    #[error("No provider for channel '{channel}'")]
    ChannelUnavailable { channel: OtpChannel },

    /// Provider accepted the request but could not deliver
    #[error("Delivery failed: {0}")]
    Failed(String),
}

/// One verification code on its way to a user
///
/// Carries the plaintext code; exists only between issue and dispatch.
/// `Debug` output redacts the code.
#[derive(Clone)]
pub struct OtpDelivery {
    pub channel: OtpChannel,
    /// Channel address: an email address for EMAIL, a phone number
    /// for SMS / WHATSAPP
    pub recipient: String,
    /// Name to address the user by in the message
    pub display_name: String,
    pub purpose: OtpPurpose,
    /// Plaintext code; never persisted, never logged above DEBUG
    pub code: String,
    /// How long the code stays valid, for the message body
    pub expires_in_minutes: i64,
}

impl std::fmt::Debug for OtpDelivery {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OtpDelivery")
            .field("channel", &self.channel)
            .field("recipient", &self.recipient)
            .field("purpose", &self.purpose)
            .field("code", &"[REDACTED]")
            .field("expires_in_minutes", &self.expires_in_minutes)
            .finish()
    }
}

/// Verification code dispatcher
#[trait_variant::make(OtpNotifier: Send)]
pub trait LocalOtpNotifier {
    /// Hand a freshly issued code to the delivery channel
    async fn deliver(&self, delivery: OtpDelivery) -> Result<(), NotifyError>;
}
