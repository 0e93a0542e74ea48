//! Reportwire Messaging Gateway
//!
//! Sends a message, optionally carrying a media link, to a routing
//! address and returns the provider-assigned delivery identifier.
//! Backed by the Twilio Messages API (WhatsApp channel) in production
//! and an in-memory mock for testing and development.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub mod mock;
pub mod twilio;

#[derive(Error, Debug)]
pub enum MessagingError {
    #[error("Messaging configuration error: {0}")]
    Configuration(String),

    #[error("Messaging authorization rejected by provider")]
    Unauthorized,

    #[error("Provider rejected the message ({code}): {message}")]
    Provider { code: u16, message: String },

    #[error("Messaging transport error: {0}")]
    Transport(String),
}

/// Outbound message addressed to a single recipient
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutboundMessage {
    /// Routing address (E.164 phone number, without channel prefix)
    pub to: String,
    pub body: String,
    /// Public link attached as provider media, when present
    pub media_url: Option<String>,
}

impl OutboundMessage {
    /// Plain text message
    pub fn text(to: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            to: to.into(),
            body: body.into(),
            media_url: None,
        }
    }

    /// Message carrying a media link
    pub fn with_media(to: impl Into<String>, body: impl Into<String>, media_url: impl Into<String>) -> Self {
        Self {
            to: to.into(),
            body: body.into(),
            media_url: Some(media_url.into()),
        }
    }
}

/// Delivery receipt returned by the provider on a successful send
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SendReceipt {
    /// Provider-assigned delivery identifier
    pub sid: String,
    pub provider: String,
    pub sent_at: DateTime<Utc>,
}

/// Messaging gateway collaborator contract.
///
/// One attempt per call, no queuing and no retry; a returned error is a
/// transmission failure the caller is expected to handle as data.
#[async_trait::async_trait]
pub trait MessagingGateway: Send + Sync {
    async fn send(&self, message: OutboundMessage) -> Result<SendReceipt, MessagingError>;
}

/// Messaging gateway configuration
#[derive(Debug, Clone)]
pub struct MessagingConfig {
    /// Messaging provider (twilio, mock)
    pub provider: String,
    pub twilio_account_sid: Option<String>,
    pub twilio_auth_token: Option<String>,
    /// Sender number for the WhatsApp channel
    pub twilio_whatsapp_number: Option<String>,
    /// Twilio API base URL (overridable for testing)
    pub api_base: String,
}

impl MessagingConfig {
    /// Create messaging config from environment variables
    pub fn from_env() -> Result<Self, MessagingError> {
        dotenvy::dotenv().ok();

        let provider = std::env::var("MESSAGING_PROVIDER").unwrap_or_else(|_| "mock".to_string());

        Ok(Self {
            provider,
            twilio_account_sid: std::env::var("TWILIO_ACCOUNT_SID").ok(),
            twilio_auth_token: std::env::var("TWILIO_AUTH_TOKEN").ok(),
            twilio_whatsapp_number: std::env::var("TWILIO_WHATSAPP_NUMBER").ok(),
            api_base: std::env::var("TWILIO_API_BASE")
                .unwrap_or_else(|_| "https://api.twilio.com".to_string()),
        })
    }
}

/// Create a messaging gateway based on configuration
pub fn create(config: MessagingConfig) -> Result<Box<dyn MessagingGateway>, MessagingError> {
    match config.provider.as_str() {
        "twilio" => {
            tracing::info!("Creating Twilio messaging gateway");
            Ok(Box::new(twilio::TwilioGateway::new(config)?))
        }
        "mock" => {
            tracing::info!("Creating mock messaging gateway");
            Ok(Box::new(mock::MockMessagingGateway::new()))
        }
        provider => Err(MessagingError::Configuration(format!(
            "Unknown messaging provider: {}. Supported providers: twilio, mock",
            provider
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outbound_message_constructors() {
        let text = OutboundMessage::text("+15550001111", "hello");
        assert_eq!(text.to, "+15550001111");
        assert!(text.media_url.is_none());

        let media = OutboundMessage::with_media("+15550001111", "report", "https://example.com/r.pdf");
        assert_eq!(media.media_url.as_deref(), Some("https://example.com/r.pdf"));
    }

    #[test]
    fn test_create_rejects_unknown_provider() {
        let config = MessagingConfig {
            provider: "smtp".to_string(),
            twilio_account_sid: None,
            twilio_auth_token: None,
            twilio_whatsapp_number: None,
            api_base: String::new(),
        };
        assert!(matches!(
            create(config),
            Err(MessagingError::Configuration(_))
        ));
    }
}
