//! Reportwire application composition root
//!
//! Builds every collaborator exactly once at startup — repositories,
//! blob store, messaging gateway — hands them to the two orchestrators,
//! and composes the router. Nothing downstream constructs clients or
//! holds hidden global state.

use std::sync::Arc;

use axum::Router;
use sqlx::PgPool;

use reportwire_api::AppState;
use reportwire_db::Repositories;
use reportwire_drive::DriveConfig;
use reportwire_messaging::MessagingConfig;
use reportwire_pipeline::{ReportDispatcher, ReportPublisher};

/// Create the main application router with all routes and state
pub async fn create_app(pool: PgPool) -> Result<Router, anyhow::Error> {
    let repos = Repositories::new(pool);

    // External collaborators, selected by environment
    let drive_config = DriveConfig::from_env()?;
    let blob_store: Arc<dyn reportwire_drive::BlobStore> =
        Arc::from(reportwire_drive::create(drive_config)?);

    let messaging_config = MessagingConfig::from_env()?;
    let gateway: Arc<dyn reportwire_messaging::MessagingGateway> =
        Arc::from(reportwire_messaging::create(messaging_config)?);

    // Orchestrators share the repository-backed collaborator handles
    let publisher = Arc::new(ReportPublisher::new(
        blob_store,
        Arc::new(repos.report_files.clone()),
    ));
    let dispatcher = Arc::new(ReportDispatcher::new(
        Arc::new(repos.contacts.clone()),
        gateway,
        Arc::new(repos.deliveries.clone()),
    ));

    let state = AppState {
        repos,
        publisher,
        dispatcher,
    };

    let app = Router::new()
        .route("/health", axum::routing::get(health_check))
        .route(
            "/",
            axum::routing::get(|| async { "Reportwire API v0.1.0" }),
        )
        .merge(reportwire_api::routes().with_state(state));

    Ok(app)
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}
