//! Shared infrastructure for Reportwire
//!
//! Error taxonomy with HTTP mapping, environment-driven configuration,
//! and the axum extractors used across the API surface.

pub mod config;
pub mod error;
pub mod extractors;

pub use config::Config;
pub use error::{Error, Result};
pub use extractors::{Pagination, ValidatedJson};
