//! Log-Backed Notifier
//!
//! Stand-in delivery channel until a real mail provider is wired up.
//! Writes the would-be message to the log instead of sending it; the
//! plaintext code appears only at DEBUG level.

use otp::models::OtpChannel;

use crate::domain::notification::{NotifyError, OtpDelivery, OtpNotifier};

/// Notifier that logs instead of sending
///
/// Only the EMAIL channel is routed; SMS and WhatsApp have no
/// provider yet and report [`NotifyError::ChannelUnavailable`].
#[derive(Debug, Clone, Default)]
pub struct LogNotifier;

impl LogNotifier {
    pub fn new() -> Self {
        Self
    }
}

impl OtpNotifier for LogNotifier {
    async fn deliver(&self, delivery: OtpDelivery) -> Result<(), NotifyError> {
        match delivery.channel {
            OtpChannel::Email => {
                tracing::info!(
                    recipient = %delivery.recipient,
                    purpose = %delivery.purpose,
                    expires_in_minutes = delivery.expires_in_minutes,
                    "Dispatching verification code"
                );
                tracing::debug!(
                    recipient = %delivery.recipient,
                    code = %delivery.code,
                    "Verification code issued"
                );
                Ok(())
            }
            channel => Err(NotifyError::ChannelUnavailable { channel }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use otp::models::OtpPurpose;

    fn delivery(channel: OtpChannel) -> OtpDelivery {
        OtpDelivery {
            channel,
            recipient: "alice@example.com".to_string(),
            display_name: "Alice".to_string(),
            purpose: OtpPurpose::Register,
            code: "482913".to_string(),
            expires_in_minutes: 15,
        }
    }

    #[tokio::test]
    async fn test_email_channel_is_routed() {
        let notifier = LogNotifier::new();
        assert!(notifier.deliver(delivery(OtpChannel::Email)).await.is_ok());
    }

    #[tokio::test]
    async fn test_unrouted_channels_are_reported() {
        let notifier = LogNotifier::new();
        let err = notifier
            .deliver(delivery(OtpChannel::Sms))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            NotifyError::ChannelUnavailable {
                channel: OtpChannel::Sms
            }
        ));
    }
}
