//! Report delivery orchestrator
//!
//! Resolve → transmit → record. The central contract: once a transmit has
//! been attempted for a report delivery, exactly one ledger entry is
//! written, whether or not the provider accepted the message. Plain-text
//! sends skip the ledger entirely — there is no report to anchor the
//! record to.

use std::sync::Arc;

use serde::Serialize;
use thiserror::Error;

use reportwire_db::{ContactDirectory, DeliveryLedger, DeliveryOutcome, NewDelivery};
use reportwire_messaging::{MessagingGateway, OutboundMessage};

/// Message body accompanying a report link.
const REPORT_BODY: &str = "Please find the requested report attached.";

/// Delivery failures. Transmission failure is NOT among these: a rejected
/// send is an expected outcome reported through [`DeliveryReport`].
#[derive(Error, Debug)]
pub enum DispatchError {
    /// Usage error; surfaced before any send, no ledger entry written.
    #[error("contact {0} not found")]
    RecipientNotFound(i64),

    /// The directory itself failed (as opposed to a missing contact).
    #[error("contact lookup failed: {0}")]
    Directory(#[source] reportwire_common::Error),

    /// The ledger write after a transmit attempt failed. Carries the
    /// transmit outcome so callers can tell "sent but unrecorded" from
    /// "not sent".
    #[error("ledger write failed after transmit ({}): {source}", .transmit.describe())]
    LedgerWrite {
        transmit: DeliveryReport,
        #[source]
        source: reportwire_common::Error,
    },
}

/// Structured outcome of a delivery attempt, returned as data — a failed
/// transmit is a result, not an error.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "outcome", rename_all = "lowercase")]
pub enum DeliveryReport {
    Sent { provider_sid: String },
    Failed { reason: String },
}

impl DeliveryReport {
    pub fn is_sent(&self) -> bool {
        matches!(self, DeliveryReport::Sent { .. })
    }

    fn describe(&self) -> String {
        match self {
            DeliveryReport::Sent { provider_sid } => format!("sent, sid {}", provider_sid),
            DeliveryReport::Failed { reason } => format!("failed: {}", reason),
        }
    }

    fn outcome(&self) -> DeliveryOutcome {
        match self {
            DeliveryReport::Sent { .. } => DeliveryOutcome::Sent,
            DeliveryReport::Failed { .. } => DeliveryOutcome::Failed,
        }
    }

    fn provider_sid(&self) -> Option<String> {
        match self {
            DeliveryReport::Sent { provider_sid } => Some(provider_sid.clone()),
            DeliveryReport::Failed { .. } => None,
        }
    }
}

/// Delivery orchestrator
pub struct ReportDispatcher {
    contacts: Arc<dyn ContactDirectory>,
    gateway: Arc<dyn MessagingGateway>,
    ledger: Arc<dyn DeliveryLedger>,
}

impl ReportDispatcher {
    pub fn new(
        contacts: Arc<dyn ContactDirectory>,
        gateway: Arc<dyn MessagingGateway>,
        ledger: Arc<dyn DeliveryLedger>,
    ) -> Self {
        Self {
            contacts,
            gateway,
            ledger,
        }
    }

    async fn resolve(&self, contact_id: i64) -> Result<reportwire_db::Contact, DispatchError> {
        self.contacts
            .resolve(contact_id)
            .await
            .map_err(DispatchError::Directory)?
            .ok_or(DispatchError::RecipientNotFound(contact_id))
    }

    /// Transmit and fold the gateway result into a report. Every gateway
    /// error kind counts as a transmission failure here.
    async fn transmit(&self, message: OutboundMessage) -> DeliveryReport {
        match self.gateway.send(message).await {
            Ok(receipt) => DeliveryReport::Sent {
                provider_sid: receipt.sid,
            },
            Err(e) => {
                tracing::warn!(error = %e, "Message transmission failed");
                DeliveryReport::Failed {
                    reason: e.to_string(),
                }
            }
        }
    }

    /// Deliver a published report link to a contact, recording the attempt.
    pub async fn send_report(
        &self,
        contact_id: i64,
        report_url: &str,
    ) -> Result<DeliveryReport, DispatchError> {
        let contact = self.resolve(contact_id).await?;

        let report = self
            .transmit(OutboundMessage::with_media(
                contact.phone.as_str(),
                REPORT_BODY,
                report_url,
            ))
            .await;

        // The ledger reflects every attempted transmit, failed ones included.
        self.ledger
            .append(NewDelivery {
                contact_id,
                report_url: Some(report_url.to_string()),
                outcome: report.outcome(),
                provider_sid: report.provider_sid(),
            })
            .await
            .map_err(|source| DispatchError::LedgerWrite {
                transmit: report.clone(),
                source,
            })?;

        tracing::info!(
            contact_id,
            sent = report.is_sent(),
            "Report delivery recorded"
        );
        Ok(report)
    }

    /// Send a plain text message to a contact. Not recorded in the ledger.
    pub async fn send_text(
        &self,
        contact_id: i64,
        body: &str,
    ) -> Result<DeliveryReport, DispatchError> {
        let contact = self.resolve(contact_id).await?;
        Ok(self
            .transmit(OutboundMessage::text(contact.phone.as_str(), body))
            .await)
    }
}
