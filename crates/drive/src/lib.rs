//! Reportwire Blob Store
//!
//! Publishes report binaries to a shared blob store and exposes the two
//! operations the publication pipeline needs:
//! - upload with a public-read grant (resumable transfer)
//! - rename of an already-stored blob
//!
//! Backed by the Google Drive v3 REST API in production and an in-memory
//! mock for testing and development.

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub mod client;
pub mod mock;

/// Errors surfaced by blob store implementations.
///
/// `Unauthorized` is a first-class variant so callers can map it to a 401
/// without inspecting message text.
#[derive(Error, Debug)]
pub enum DriveError {
    #[error("Drive configuration error: {0}")]
    Configuration(String),

    #[error("Drive authorization required")]
    Unauthorized,

    #[error("Drive rejected the request ({status}): {message}")]
    Rejected { status: u16, message: String },

    #[error("Drive transport error: {0}")]
    Transport(String),
}

/// Handle to a stored blob: the store's opaque identifier plus the
/// publicly readable link granted at upload time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredBlob {
    pub file_id: String,
    pub public_url: String,
}

/// Blob store collaborator contract.
///
/// One attempt per call; retry policy belongs to the caller.
#[async_trait::async_trait]
pub trait BlobStore: Send + Sync {
    /// Upload `bytes` under `name`, granting public read access as part of
    /// the same operation. Returns the store identifier and public link.
    async fn upload(&self, bytes: Vec<u8>, name: &str) -> Result<StoredBlob, DriveError>;

    /// Rename an existing blob. The public link is unaffected.
    async fn rename(&self, file_id: &str, new_name: &str) -> Result<(), DriveError>;
}

/// Blob store configuration
#[derive(Debug, Clone)]
pub struct DriveConfig {
    /// Blob store provider (drive, mock)
    pub provider: String,
    /// OAuth bearer token for the Drive API (opaque to this crate;
    /// acquisition and refresh happen outside the process boundary)
    pub access_token: Option<String>,
    /// Drive folder that receives published reports
    pub folder_id: Option<String>,
    /// Metadata API base URL
    pub api_base: String,
    /// Upload API base URL
    pub upload_base: String,
}

impl DriveConfig {
    /// Create drive config from environment variables
    pub fn from_env() -> Result<Self, DriveError> {
        dotenvy::dotenv().ok();

        let provider = std::env::var("DRIVE_PROVIDER").unwrap_or_else(|_| "mock".to_string());
        let access_token = std::env::var("DRIVE_ACCESS_TOKEN").ok();
        let folder_id = std::env::var("DRIVE_FOLDER_ID").ok();

        let api_base = std::env::var("DRIVE_API_BASE")
            .unwrap_or_else(|_| "https://www.googleapis.com/drive/v3".to_string());
        let upload_base = std::env::var("DRIVE_UPLOAD_BASE")
            .unwrap_or_else(|_| "https://www.googleapis.com/upload/drive/v3".to_string());

        Ok(Self {
            provider,
            access_token,
            folder_id,
            api_base,
            upload_base,
        })
    }
}

/// Create a blob store based on configuration
pub fn create(config: DriveConfig) -> Result<Box<dyn BlobStore>, DriveError> {
    match config.provider.as_str() {
        "drive" => {
            tracing::info!("Creating Google Drive blob store");
            Ok(Box::new(client::DriveClient::new(config)?))
        }
        "mock" => {
            tracing::info!("Creating mock blob store");
            Ok(Box::new(mock::MockBlobStore::new()))
        }
        provider => Err(DriveError::Configuration(format!(
            "Unknown blob store provider: {}. Supported providers: drive, mock",
            provider
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_drive_config_defaults() {
        std::env::remove_var("DRIVE_PROVIDER");
        std::env::remove_var("DRIVE_API_BASE");

        let config = DriveConfig::from_env().unwrap();
        assert_eq!(config.provider, "mock");
        assert_eq!(config.api_base, "https://www.googleapis.com/drive/v3");
    }

    #[test]
    fn test_create_rejects_unknown_provider() {
        let config = DriveConfig {
            provider: "dropbox".to_string(),
            access_token: None,
            folder_id: None,
            api_base: String::new(),
            upload_base: String::new(),
        };
        assert!(matches!(
            create(config),
            Err(DriveError::Configuration(_))
        ));
    }
}
