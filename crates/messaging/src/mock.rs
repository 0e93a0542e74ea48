//! Mock Messaging Gateway Implementation
//!
//! Captures outbound messages in memory and supports scripted provider
//! failures so delivery bookkeeping can be tested without Twilio.

use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::{MessagingError, MessagingGateway, OutboundMessage, SendReceipt};

/// Message captured by the mock gateway
#[derive(Debug, Clone)]
pub struct CapturedMessage {
    pub message: OutboundMessage,
    pub receipt: SendReceipt,
    pub captured_at: DateTime<Utc>,
}

/// Mock messaging gateway for testing
#[derive(Debug, Clone, Default)]
pub struct MockMessagingGateway {
    sent: Arc<Mutex<Vec<CapturedMessage>>>,
    failure: Arc<Mutex<Option<String>>>,
}

impl MockMessagingGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// Script all subsequent sends to fail with a provider error.
    pub fn fail_with(&self, reason: impl Into<String>) {
        *self.failure.lock().unwrap() = Some(reason.into());
    }

    /// Clear a scripted failure.
    pub fn recover(&self) {
        *self.failure.lock().unwrap() = None;
    }

    /// All messages accepted by the mock.
    pub fn sent(&self) -> Vec<CapturedMessage> {
        self.sent.lock().unwrap().clone()
    }

    /// Number of messages accepted by the mock.
    pub fn sent_count(&self) -> usize {
        self.sent.lock().unwrap().len()
    }
}

#[async_trait::async_trait]
impl MessagingGateway for MockMessagingGateway {
    async fn send(&self, message: OutboundMessage) -> Result<SendReceipt, MessagingError> {
        if let Some(reason) = self.failure.lock().unwrap().clone() {
            return Err(MessagingError::Provider {
                code: 400,
                message: reason,
            });
        }

        let receipt = SendReceipt {
            sid: format!("SM{}", Uuid::new_v4().simple()),
            provider: "mock".to_string(),
            sent_at: Utc::now(),
        };

        self.sent.lock().unwrap().push(CapturedMessage {
            message,
            receipt: receipt.clone(),
            captured_at: Utc::now(),
        });

        tracing::debug!(sid = %receipt.sid, "Mock message captured");
        Ok(receipt)
    }
}
