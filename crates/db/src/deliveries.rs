//! Delivery ledger repository
//!
//! Append-only: entries are written once per attempt and never updated
//! or deleted.

use reportwire_common::Result;
use sqlx::PgPool;

use crate::entities::{Delivery, NewDelivery};
use crate::DeliveryLedger;

/// All columns in the deliveries table, used for SELECT and RETURNING clauses.
const DELIVERY_COLUMNS: &str = "id, contact_id, report_url, outcome, provider_sid, sent_at";

#[derive(Clone)]
pub struct DeliveryRepository {
    pool: PgPool,
}

impl DeliveryRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Delivery history for one contact, newest first
    pub async fn list_by_contact(&self, contact_id: i64) -> Result<Vec<Delivery>> {
        let query = format!(
            "SELECT {DELIVERY_COLUMNS} FROM deliveries \
             WHERE contact_id = $1 ORDER BY sent_at DESC"
        );
        let deliveries = sqlx::query_as::<_, Delivery>(&query)
            .bind(contact_id)
            .fetch_all(&self.pool)
            .await?;

        Ok(deliveries)
    }
}

#[async_trait::async_trait]
impl DeliveryLedger for DeliveryRepository {
    async fn append(&self, entry: NewDelivery) -> Result<Delivery> {
        let query = format!(
            "INSERT INTO deliveries (contact_id, report_url, outcome, provider_sid) \
             VALUES ($1, $2, $3, $4) RETURNING {DELIVERY_COLUMNS}"
        );
        let created = sqlx::query_as::<_, Delivery>(&query)
            .bind(entry.contact_id)
            .bind(&entry.report_url)
            .bind(entry.outcome)
            .bind(&entry.provider_sid)
            .fetch_one(&self.pool)
            .await?;

        Ok(created)
    }
}
