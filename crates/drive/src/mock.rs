//! Mock Blob Store Implementation
//!
//! In-memory blob capture for testing and development. Supports failure
//! injection on either operation so the publication pipeline's partial
//! failure states (orphaned, misnamed) can be exercised deterministically.

use std::sync::{Arc, Mutex};

use uuid::Uuid;

use crate::{BlobStore, DriveError, StoredBlob};

/// One blob held by the mock store.
#[derive(Debug, Clone)]
pub struct CapturedBlob {
    pub file_id: String,
    pub name: String,
    pub public_url: String,
    pub size_bytes: usize,
}

/// Mock blob store for testing
#[derive(Debug, Clone, Default)]
pub struct MockBlobStore {
    blobs: Arc<Mutex<Vec<CapturedBlob>>>,
    fail_upload: Arc<Mutex<bool>>,
    fail_rename: Arc<Mutex<bool>>,
}

impl MockBlobStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the next and all subsequent uploads fail.
    pub fn fail_uploads(&self) {
        *self.fail_upload.lock().unwrap() = true;
    }

    /// Make the next and all subsequent renames fail.
    pub fn fail_renames(&self) {
        *self.fail_rename.lock().unwrap() = true;
    }

    /// All blobs currently held.
    pub fn blobs(&self) -> Vec<CapturedBlob> {
        self.blobs.lock().unwrap().clone()
    }

    /// Current name of a blob, if stored.
    pub fn name_of(&self, file_id: &str) -> Option<String> {
        self.blobs
            .lock()
            .unwrap()
            .iter()
            .find(|b| b.file_id == file_id)
            .map(|b| b.name.clone())
    }
}

#[async_trait::async_trait]
impl BlobStore for MockBlobStore {
    async fn upload(&self, bytes: Vec<u8>, name: &str) -> Result<StoredBlob, DriveError> {
        if *self.fail_upload.lock().unwrap() {
            return Err(DriveError::Rejected {
                status: 503,
                message: "mock upload failure".to_string(),
            });
        }

        let file_id = format!("mock-{}", Uuid::new_v4());
        let public_url = format!("https://drive.mock/{}/view", file_id);

        self.blobs.lock().unwrap().push(CapturedBlob {
            file_id: file_id.clone(),
            name: name.to_string(),
            public_url: public_url.clone(),
            size_bytes: bytes.len(),
        });

        tracing::debug!(file_id = %file_id, name, "Mock blob stored");
        Ok(StoredBlob {
            file_id,
            public_url,
        })
    }

    async fn rename(&self, file_id: &str, new_name: &str) -> Result<(), DriveError> {
        if *self.fail_rename.lock().unwrap() {
            return Err(DriveError::Rejected {
                status: 503,
                message: "mock rename failure".to_string(),
            });
        }

        let mut blobs = self.blobs.lock().unwrap();
        let blob = blobs
            .iter_mut()
            .find(|b| b.file_id == file_id)
            .ok_or_else(|| DriveError::Rejected {
                status: 404,
                message: format!("no blob with id {}", file_id),
            })?;
        blob.name = new_name.to_string();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_upload_and_rename() {
        let store = MockBlobStore::new();
        let blob = store.upload(vec![1, 2, 3], "tmp_report").await.unwrap();
        assert_eq!(store.name_of(&blob.file_id).as_deref(), Some("tmp_report"));

        store.rename(&blob.file_id, "42_report.pdf").await.unwrap();
        assert_eq!(
            store.name_of(&blob.file_id).as_deref(),
            Some("42_report.pdf")
        );
    }

    #[tokio::test]
    async fn test_upload_failure_injection() {
        let store = MockBlobStore::new();
        store.fail_uploads();
        let err = store.upload(vec![0], "tmp").await.unwrap_err();
        assert!(matches!(err, DriveError::Rejected { status: 503, .. }));
        assert!(store.blobs().is_empty());
    }

    #[tokio::test]
    async fn test_rename_unknown_blob() {
        let store = MockBlobStore::new();
        let err = store.rename("missing", "x").await.unwrap_err();
        assert!(matches!(err, DriveError::Rejected { status: 404, .. }));
    }
}
