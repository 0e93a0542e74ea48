//! In-memory collaborator implementations
//!
//! Used by pipeline tests and mock-provider deployments. Failure
//! injection mirrors the blob store and gateway mocks so partial-failure
//! paths are reachable without a database.

use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::{Arc, Mutex};

use chrono::Utc;
use reportwire_common::{Error, Result};

use crate::entities::{Contact, Delivery, NewDelivery, RegisteredFile};
use crate::{ContactDirectory, DeliveryLedger, RecordStore};

/// Contact directory backed by a vector of preloaded contacts
#[derive(Debug, Clone, Default)]
pub struct MockContactDirectory {
    contacts: Arc<Mutex<Vec<Contact>>>,
}

impl MockContactDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Preload a contact and return it.
    pub fn add(&self, id: i64, name: &str, phone: &str) -> Contact {
        let contact = Contact {
            id,
            name: name.to_string(),
            phone: phone.to_string(),
            email: None,
            is_active: true,
            created_at: Utc::now(),
        };
        self.contacts.lock().unwrap().push(contact.clone());
        contact
    }
}

#[async_trait::async_trait]
impl ContactDirectory for MockContactDirectory {
    async fn resolve(&self, contact_id: i64) -> Result<Option<Contact>> {
        Ok(self
            .contacts
            .lock()
            .unwrap()
            .iter()
            .find(|c| c.id == contact_id)
            .cloned())
    }
}

/// Record store assigning sequential ids and `{id}_report.pdf` names
#[derive(Debug, Clone)]
pub struct MockRecordStore {
    next_id: Arc<AtomicI64>,
    registered: Arc<Mutex<Vec<RegisteredFile>>>,
    fail: Arc<Mutex<bool>>,
}

impl MockRecordStore {
    pub fn new() -> Self {
        Self {
            next_id: Arc::new(AtomicI64::new(1)),
            registered: Arc::default(),
            fail: Arc::default(),
        }
    }

    /// Start assigning ids from `id` (for scenario-shaped tests).
    pub fn starting_at(id: i64) -> Self {
        let store = Self::new();
        store.next_id.store(id, Ordering::SeqCst);
        store
    }

    /// Make all subsequent registrations fail.
    pub fn fail_registrations(&self) {
        *self.fail.lock().unwrap() = true;
    }

    pub fn registered(&self) -> Vec<RegisteredFile> {
        self.registered.lock().unwrap().clone()
    }
}

impl Default for MockRecordStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl RecordStore for MockRecordStore {
    async fn register(&self, _public_url: &str) -> Result<RegisteredFile> {
        if *self.fail.lock().unwrap() {
            return Err(Error::Internal("mock registration failure".to_string()));
        }
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let file = RegisteredFile {
            id,
            file_name: format!("{}_report.pdf", id),
        };
        self.registered.lock().unwrap().push(file.clone());
        Ok(file)
    }
}

/// Append-only in-memory ledger
#[derive(Debug, Clone, Default)]
pub struct MockDeliveryLedger {
    entries: Arc<Mutex<Vec<Delivery>>>,
    fail: Arc<Mutex<bool>>,
}

impl MockDeliveryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make all subsequent appends fail.
    pub fn fail_appends(&self) {
        *self.fail.lock().unwrap() = true;
    }

    pub fn entries(&self) -> Vec<Delivery> {
        self.entries.lock().unwrap().clone()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait::async_trait]
impl DeliveryLedger for MockDeliveryLedger {
    async fn append(&self, entry: NewDelivery) -> Result<Delivery> {
        if *self.fail.lock().unwrap() {
            return Err(Error::Internal("mock ledger append failure".to_string()));
        }
        let mut entries = self.entries.lock().unwrap();
        let delivery = Delivery {
            id: entries.len() as i64 + 1,
            contact_id: entry.contact_id,
            report_url: entry.report_url,
            outcome: entry.outcome,
            provider_sid: entry.provider_sid,
            sent_at: Utc::now(),
        };
        entries.push(delivery.clone());
        Ok(delivery)
    }
}
