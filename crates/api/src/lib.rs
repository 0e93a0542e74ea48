//! Reportwire HTTP surface
//!
//! Thin axum layer over the repositories and the publication/delivery
//! pipeline. All business sequencing lives in `reportwire-pipeline`;
//! handlers marshal parameters and map outcomes to HTTP responses.

use std::sync::Arc;

use reportwire_db::Repositories;
use reportwire_pipeline::{ReportDispatcher, ReportPublisher};

pub mod handlers;
pub mod routes;

pub use routes::routes;

/// Application state shared by all handlers
#[derive(Clone)]
pub struct AppState {
    pub repos: Repositories,
    pub publisher: Arc<ReportPublisher>,
    pub dispatcher: Arc<ReportDispatcher>,
}
