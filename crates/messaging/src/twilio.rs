//! Twilio Messaging Gateway Implementation
//!
//! Posts form-encoded requests to the Twilio Messages API with WhatsApp
//! channel addressing. Provider rejections (invalid number, throttling,
//! outage) come back as `MessagingError::Provider` carrying Twilio's
//! error payload; they are expected occurrences, not faults.

use chrono::Utc;
use serde::Deserialize;

use crate::{MessagingConfig, MessagingError, MessagingGateway, OutboundMessage, SendReceipt};

const PROVIDER: &str = "twilio";

pub struct TwilioGateway {
    http: reqwest::Client,
    messages_url: String,
    account_sid: String,
    auth_token: String,
    from_number: String,
}

#[derive(Debug, Deserialize)]
struct TwilioMessage {
    sid: String,
}

#[derive(Debug, Deserialize)]
struct TwilioErrorBody {
    #[serde(default)]
    code: Option<u32>,
    #[serde(default)]
    message: Option<String>,
}

impl TwilioGateway {
    /// Create a new Twilio gateway from configuration.
    pub fn new(config: MessagingConfig) -> Result<Self, MessagingError> {
        let account_sid = config.twilio_account_sid.ok_or_else(|| {
            MessagingError::Configuration("TWILIO_ACCOUNT_SID is required for the twilio provider".to_string())
        })?;
        let auth_token = config.twilio_auth_token.ok_or_else(|| {
            MessagingError::Configuration("TWILIO_AUTH_TOKEN is required for the twilio provider".to_string())
        })?;
        let from_number = config.twilio_whatsapp_number.ok_or_else(|| {
            MessagingError::Configuration("TWILIO_WHATSAPP_NUMBER is required for the twilio provider".to_string())
        })?;

        let messages_url = format!(
            "{}/2010-04-01/Accounts/{}/Messages.json",
            config.api_base.trim_end_matches('/'),
            account_sid
        );

        Ok(Self {
            http: reqwest::Client::new(),
            messages_url,
            account_sid,
            auth_token,
            from_number,
        })
    }
}

#[async_trait::async_trait]
impl MessagingGateway for TwilioGateway {
    async fn send(&self, message: OutboundMessage) -> Result<SendReceipt, MessagingError> {
        let mut form: Vec<(&str, String)> = vec![
            ("To", format!("whatsapp:{}", message.to)),
            ("From", format!("whatsapp:{}", self.from_number)),
            ("Body", message.body),
        ];
        if let Some(media_url) = message.media_url {
            form.push(("MediaUrl", media_url));
        }

        let response = self
            .http
            .post(&self.messages_url)
            .basic_auth(&self.account_sid, Some(&self.auth_token))
            .form(&form)
            .send()
            .await
            .map_err(|e| MessagingError::Transport(e.to_string()))?;

        let status = response.status();
        if status == reqwest::StatusCode::UNAUTHORIZED {
            return Err(MessagingError::Unauthorized);
        }
        if !status.is_success() {
            let body = response
                .json::<TwilioErrorBody>()
                .await
                .unwrap_or(TwilioErrorBody {
                    code: None,
                    message: None,
                });
            return Err(MessagingError::Provider {
                code: status.as_u16(),
                message: format!(
                    "Twilio error {}: {}",
                    body.code.map_or_else(|| "-".to_string(), |c| c.to_string()),
                    body.message.unwrap_or_else(|| "no detail".to_string())
                ),
            });
        }

        let created = response
            .json::<TwilioMessage>()
            .await
            .map_err(|e| MessagingError::Transport(format!("invalid Twilio response: {}", e)))?;

        tracing::debug!(sid = %created.sid, "Twilio message accepted");
        Ok(SendReceipt {
            sid: created.sid,
            provider: PROVIDER.to_string(),
            sent_at: Utc::now(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(sid: Option<&str>, token: Option<&str>, from: Option<&str>) -> MessagingConfig {
        MessagingConfig {
            provider: "twilio".to_string(),
            twilio_account_sid: sid.map(str::to_string),
            twilio_auth_token: token.map(str::to_string),
            twilio_whatsapp_number: from.map(str::to_string),
            api_base: "https://api.twilio.com".to_string(),
        }
    }

    #[test]
    fn test_gateway_requires_credentials() {
        assert!(TwilioGateway::new(config(None, Some("t"), Some("+1"))).is_err());
        assert!(TwilioGateway::new(config(Some("AC1"), None, Some("+1"))).is_err());
        assert!(TwilioGateway::new(config(Some("AC1"), Some("t"), None)).is_err());
    }

    #[test]
    fn test_gateway_builds_messages_url() {
        let gateway = TwilioGateway::new(config(Some("AC123"), Some("t"), Some("+1555"))).unwrap();
        assert_eq!(
            gateway.messages_url,
            "https://api.twilio.com/2010-04-01/Accounts/AC123/Messages.json"
        );
    }
}
