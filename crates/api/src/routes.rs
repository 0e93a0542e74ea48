//! Route definitions for the Reportwire API

use axum::{
    routing::{get, post},
    Router,
};

use crate::handlers::{contacts, deliveries, reports};
use crate::AppState;

/// Contact routes
fn contact_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/v1/contacts",
            get(contacts::list_contacts).post(contacts::create_contact),
        )
        .route(
            "/v1/contacts/{id}",
            get(contacts::get_contact)
                .put(contacts::update_contact)
                .delete(contacts::deactivate_contact),
        )
        .route(
            "/v1/contacts/{id}/deliveries",
            get(contacts::contact_deliveries),
        )
}

/// Report file routes
fn report_routes() -> Router<AppState> {
    Router::new()
        .route("/v1/reports", get(reports::list_reports))
        .route("/v1/reports/{id}", get(reports::get_report))
        .route("/v1/reports/publish", post(reports::publish_report))
}

/// Delivery routes
fn delivery_routes() -> Router<AppState> {
    Router::new()
        .route("/v1/deliveries", post(deliveries::create_delivery))
        .route("/v1/deliveries/report", post(deliveries::send_report))
        .route("/v1/deliveries/text", post(deliveries::send_text))
}

/// Create all Reportwire API routes
pub fn routes() -> Router<AppState> {
    Router::new()
        .merge(contact_routes())
        .merge(report_routes())
        .merge(delivery_routes())
}
