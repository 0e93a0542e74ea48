//! Report publication orchestrator
//!
//! Upload → register → rename, one attempt per step. The partial-failure
//! states are deliberate and observable:
//!
//! - Register fails after upload: the blob is orphaned in the store;
//!   reported as `PublishError::Registration`, never cleaned up here.
//! - Rename fails after register: the blob keeps its working name while
//!   the registry holds the canonical one; the publication still succeeds
//!   because the public link is already valid, and the mismatch is
//!   reported through `PublishedReport::renamed`.

use std::sync::Arc;

use serde::Serialize;
use thiserror::Error;

use reportwire_db::RecordStore;
use reportwire_drive::{BlobStore, DriveError};

/// Publication failures, annotated with the step that failed.
#[derive(Error, Debug)]
pub enum PublishError {
    /// Upload never completed; nothing was stored or registered.
    #[error("upload failed: {0}")]
    Upload(#[source] DriveError),

    /// Upload succeeded but registration did not; the blob identified by
    /// `file_id` is orphaned in the store under its working name.
    #[error("registration failed, blob {file_id} orphaned under its working name: {source}")]
    Registration {
        file_id: String,
        #[source]
        source: reportwire_common::Error,
    },
}

/// A successfully published report.
#[derive(Debug, Clone, Serialize)]
pub struct PublishedReport {
    pub registry_id: i64,
    /// Canonical name assigned by the record store
    pub file_name: String,
    /// Public link; authoritative from the moment registration succeeds
    pub public_url: String,
    /// False when the blob-store rename failed and the stored blob still
    /// carries its working name
    pub renamed: bool,
}

/// Publication orchestrator
pub struct ReportPublisher {
    blob: Arc<dyn BlobStore>,
    records: Arc<dyn RecordStore>,
}

impl ReportPublisher {
    pub fn new(blob: Arc<dyn BlobStore>, records: Arc<dyn RecordStore>) -> Self {
        Self { blob, records }
    }

    /// Publish report bytes under a caller-supplied working name.
    ///
    /// On success the returned public link is valid and world-readable;
    /// the canonical name was assigned by the record store.
    pub async fn publish(
        &self,
        bytes: Vec<u8>,
        working_name: &str,
    ) -> Result<PublishedReport, PublishError> {
        let blob = self
            .blob
            .upload(bytes, working_name)
            .await
            .map_err(PublishError::Upload)?;

        let registered = self
            .records
            .register(&blob.public_url)
            .await
            .map_err(|source| PublishError::Registration {
                file_id: blob.file_id.clone(),
                source,
            })?;

        // Rename is cosmetic once registration holds: the public link does
        // not depend on the stored name. Failure downgrades to a warning.
        let renamed = match self.blob.rename(&blob.file_id, &registered.file_name).await {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(
                    file_id = %blob.file_id,
                    working_name,
                    canonical_name = %registered.file_name,
                    error = %e,
                    "Blob rename failed; report published under working name"
                );
                false
            }
        };

        tracing::info!(
            registry_id = registered.id,
            file_name = %registered.file_name,
            renamed,
            "Report published"
        );

        Ok(PublishedReport {
            registry_id: registered.id,
            file_name: registered.file_name,
            public_url: blob.public_url,
            renamed,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reportwire_db::mock::MockRecordStore;
    use reportwire_drive::mock::MockBlobStore;

    fn publisher(blob: &MockBlobStore, records: MockRecordStore) -> ReportPublisher {
        ReportPublisher::new(Arc::new(blob.clone()), Arc::new(records))
    }

    #[tokio::test]
    async fn test_publish_success_assigns_canonical_name() {
        let blob = MockBlobStore::new();
        let publisher = publisher(&blob, MockRecordStore::starting_at(42));

        let published = publisher
            .publish(b"%PDF-1.7".to_vec(), "tmp_report")
            .await
            .unwrap();

        assert_eq!(published.registry_id, 42);
        assert_eq!(published.file_name, "42_report.pdf");
        assert!(published.renamed);
        // Blob-side name was promoted to the canonical one
        let blobs = blob.blobs();
        let stored = &blobs[0];
        assert_eq!(stored.name, "42_report.pdf");
        assert_eq!(published.public_url, stored.public_url);
    }

    #[tokio::test]
    async fn test_upload_failure_is_terminal() {
        let blob = MockBlobStore::new();
        blob.fail_uploads();
        let records = MockRecordStore::new();
        let publisher = publisher(&blob, records.clone());

        let err = publisher
            .publish(b"%PDF-1.7".to_vec(), "tmp_report")
            .await
            .unwrap_err();

        assert!(matches!(err, PublishError::Upload(_)));
        // Nothing registered, nothing stored
        assert!(records.registered().is_empty());
        assert!(blob.blobs().is_empty());
    }

    #[tokio::test]
    async fn test_registration_failure_leaves_orphan() {
        let blob = MockBlobStore::new();
        let records = MockRecordStore::new();
        records.fail_registrations();
        let publisher = publisher(&blob, records);

        let err = publisher
            .publish(b"%PDF-1.7".to_vec(), "tmp_report")
            .await
            .unwrap_err();

        let PublishError::Registration { file_id, .. } = err else {
            panic!("expected registration failure");
        };
        // The orphan is still in the blob store under its working name
        assert_eq!(blob.name_of(&file_id).as_deref(), Some("tmp_report"));
    }

    #[tokio::test]
    async fn test_rename_failure_still_succeeds() {
        let blob = MockBlobStore::new();
        blob.fail_renames();
        let publisher = publisher(&blob, MockRecordStore::starting_at(42));

        let published = publisher
            .publish(b"%PDF-1.7".to_vec(), "tmp_report")
            .await
            .unwrap();

        // Same core fields as the fully successful path
        assert_eq!(published.registry_id, 42);
        assert_eq!(published.file_name, "42_report.pdf");
        assert!(!published.renamed);
        // Registered but misnamed: blob still carries the working name
        assert_eq!(blob.blobs()[0].name, "tmp_report");
    }

    #[tokio::test]
    async fn test_publish_is_not_idempotent() {
        let blob = MockBlobStore::new();
        let publisher = publisher(&blob, MockRecordStore::starting_at(1));

        let first = publisher.publish(b"same".to_vec(), "tmp").await.unwrap();
        let second = publisher.publish(b"same".to_vec(), "tmp").await.unwrap();

        // Identical bytes and working name still produce two artifacts
        assert_ne!(first.registry_id, second.registry_id);
        assert_ne!(first.file_name, second.file_name);
        assert_eq!(blob.blobs().len(), 2);
    }
}
