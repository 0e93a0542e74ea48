//! Reportwire persistence layer
//!
//! Entities, Postgres repositories, and the persistence-side collaborator
//! contracts the publication/delivery pipeline runs against:
//!
//! - [`ContactDirectory`] resolves a contact id to routing attributes.
//! - [`RecordStore`] is the authoritative registry of published files and
//!   the only assigner of canonical names.
//! - [`DeliveryLedger`] is the append-only record of delivery attempts.
//!
//! The sqlx repositories implement these traits; `mock` provides in-memory
//! implementations for pipeline tests.

use reportwire_common::Result;
use sqlx::PgPool;

pub mod contacts;
pub mod deliveries;
pub mod entities;
pub mod mock;
pub mod reports;

pub use contacts::ContactRepository;
pub use deliveries::DeliveryRepository;
pub use entities::{
    Contact, ContactFilter, Delivery, DeliveryOutcome, NewContact, NewDelivery, RegisteredFile,
    ReportFile,
};
pub use reports::ReportFileRepository;

/// Resolves a recipient identifier to delivery-routing attributes.
#[async_trait::async_trait]
pub trait ContactDirectory: Send + Sync {
    async fn resolve(&self, contact_id: i64) -> Result<Option<Contact>>;
}

/// Authoritative registry of published files; assigns canonical names.
#[async_trait::async_trait]
pub trait RecordStore: Send + Sync {
    async fn register(&self, public_url: &str) -> Result<RegisteredFile>;
}

/// Append-only record of delivery attempts.
#[async_trait::async_trait]
pub trait DeliveryLedger: Send + Sync {
    async fn append(&self, entry: NewDelivery) -> Result<Delivery>;
}

/// Combined repository access for the application
#[derive(Clone)]
pub struct Repositories {
    pub contacts: ContactRepository,
    pub report_files: ReportFileRepository,
    pub deliveries: DeliveryRepository,
}

impl Repositories {
    pub fn new(pool: PgPool) -> Self {
        Self {
            contacts: ContactRepository::new(pool.clone()),
            report_files: ReportFileRepository::new(pool.clone()),
            deliveries: DeliveryRepository::new(pool),
        }
    }
}
