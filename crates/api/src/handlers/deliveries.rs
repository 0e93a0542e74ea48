//! Delivery API handlers
//!
//! The two dispatch endpoints (report link, plain text) and the manual
//! ledger pass-through. A failed transmit is a 200 with a structured
//! `failed` outcome — provider rejections are expected data, not server
//! faults.

use axum::{extract::State, http::StatusCode, Json};
use reportwire_common::{Error, Result, ValidatedJson};
use serde::Deserialize;
use validator::Validate;

use crate::AppState;
use reportwire_db::{Delivery, DeliveryLedger, DeliveryOutcome, NewDelivery};
use reportwire_pipeline::{DeliveryReport, DispatchError};

/// Request for delivering a published report to a contact
#[derive(Debug, Deserialize, Validate)]
pub struct SendReportRequest {
    pub contact_id: i64,

    #[validate(url)]
    pub report_url: String,
}

/// Request for sending a plain text message to a contact
#[derive(Debug, Deserialize, Validate)]
pub struct SendTextRequest {
    pub contact_id: i64,

    /// WhatsApp caps message bodies at 1600 characters
    #[validate(length(min = 1, max = 1600))]
    pub message: String,
}

/// Request for manually appending a ledger entry
#[derive(Debug, Deserialize, Validate)]
pub struct CreateDeliveryRequest {
    pub contact_id: i64,

    #[validate(url)]
    pub report_url: Option<String>,

    pub outcome: DeliveryOutcome,

    pub provider_sid: Option<String>,
}

fn map_dispatch_error(err: DispatchError) -> Error {
    match err {
        DispatchError::RecipientNotFound(id) => {
            Error::NotFound(format!("Contact {} not found", id))
        }
        DispatchError::Directory(e) => e,
        DispatchError::LedgerWrite { .. } => Error::Internal(err.to_string()),
    }
}

/// Deliver a published report link to a contact
pub async fn send_report(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<SendReportRequest>,
) -> Result<Json<DeliveryReport>> {
    let report = state
        .dispatcher
        .send_report(req.contact_id, &req.report_url)
        .await
        .map_err(map_dispatch_error)?;

    Ok(Json(report))
}

/// Send a plain text message to a contact (not recorded in the ledger)
pub async fn send_text(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<SendTextRequest>,
) -> Result<Json<DeliveryReport>> {
    let report = state
        .dispatcher
        .send_text(req.contact_id, &req.message)
        .await
        .map_err(map_dispatch_error)?;

    Ok(Json(report))
}

/// Append a ledger entry directly (manual pass-through)
pub async fn create_delivery(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<CreateDeliveryRequest>,
) -> Result<(StatusCode, Json<Delivery>)> {
    let created = state
        .repos
        .deliveries
        .append(NewDelivery {
            contact_id: req.contact_id,
            report_url: req.report_url,
            outcome: req.outcome,
            provider_sid: req.provider_sid,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(created)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recipient_not_found_maps_to_404() {
        let err = map_dispatch_error(DispatchError::RecipientNotFound(999));
        assert!(matches!(err, Error::NotFound(_)));
    }

    #[test]
    fn test_ledger_write_maps_to_internal() {
        let err = map_dispatch_error(DispatchError::LedgerWrite {
            transmit: DeliveryReport::Sent {
                provider_sid: "SM1".to_string(),
            },
            source: Error::Internal("db down".to_string()),
        });
        assert!(matches!(err, Error::Internal(_)));
    }

    #[test]
    fn test_send_text_request_validation() {
        let valid = SendTextRequest {
            contact_id: 7,
            message: "hello".to_string(),
        };
        assert!(valid.validate().is_ok());

        let empty = SendTextRequest {
            contact_id: 7,
            message: String::new(),
        };
        assert!(empty.validate().is_err());
    }
}
