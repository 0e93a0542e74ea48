//! Persistent entities for Reportwire
//!
//! Contacts are owned and mutated here; published report files and
//! delivery records are append-oriented (files gain a canonical name at
//! registration and never change; deliveries are never updated).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A contact capable of receiving report deliveries
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Contact {
    pub id: i64,
    pub name: String,
    /// Routing address used by the messaging gateway (E.164)
    pub phone: String,
    pub email: Option<String>,
    /// Logical-delete flag; deactivated contacts stay queryable
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

/// A published report file with its registry-assigned canonical name
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct ReportFile {
    pub id: i64,
    /// Canonical name, assigned exactly once by the registry
    pub file_name: String,
    pub public_url: String,
    pub uploaded_at: DateTime<Utc>,
}

/// Outcome of one delivery attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "delivery_outcome", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum DeliveryOutcome {
    Sent,
    Failed,
}

impl std::fmt::Display for DeliveryOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DeliveryOutcome::Sent => write!(f, "sent"),
            DeliveryOutcome::Failed => write!(f, "failed"),
        }
    }
}

/// One immutable ledger entry for a delivery attempt
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Delivery {
    pub id: i64,
    pub contact_id: i64,
    /// Public link of the delivered report; absent for entries recorded
    /// before a registration existed
    pub report_url: Option<String>,
    pub outcome: DeliveryOutcome,
    /// Provider delivery identifier, present only on `Sent`
    pub provider_sid: Option<String>,
    pub sent_at: DateTime<Utc>,
}

/// Data for a new contact
#[derive(Debug, Clone)]
pub struct NewContact {
    pub name: String,
    pub phone: String,
    pub email: Option<String>,
}

/// Registry result for a freshly registered file
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct RegisteredFile {
    pub id: i64,
    pub file_name: String,
}

/// Data for a new ledger entry
#[derive(Debug, Clone)]
pub struct NewDelivery {
    pub contact_id: i64,
    pub report_url: Option<String>,
    pub outcome: DeliveryOutcome,
    pub provider_sid: Option<String>,
}

/// Activity filter for contact listings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContactFilter {
    #[default]
    Active,
    Inactive,
    All,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_delivery_outcome_display() {
        assert_eq!(DeliveryOutcome::Sent.to_string(), "sent");
        assert_eq!(DeliveryOutcome::Failed.to_string(), "failed");
    }

    #[test]
    fn test_delivery_outcome_serde_is_lowercase() {
        assert_eq!(
            serde_json::to_string(&DeliveryOutcome::Failed).unwrap(),
            "\"failed\""
        );
    }

    #[test]
    fn test_contact_filter_default_is_active() {
        assert_eq!(ContactFilter::default(), ContactFilter::Active);
    }
}
