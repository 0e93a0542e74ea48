//! Google Drive Client Implementation
//!
//! Real HTTP client against the Drive v3 REST API. Uploads go through a
//! resumable session (initiate, then transfer) and the public-read grant
//! is applied before the handle is returned, so a successful `upload`
//! always yields a link that resolves for anyone.

use reqwest::{header, StatusCode};
use serde::Deserialize;
use serde_json::json;

use crate::{BlobStore, DriveConfig, DriveError, StoredBlob};

const PDF_MIME: &str = "application/pdf";

/// Google Drive blob store backed by an externally provisioned bearer token.
#[derive(Debug)]
pub struct DriveClient {
    http: reqwest::Client,
    access_token: String,
    folder_id: String,
    api_base: String,
    upload_base: String,
}

#[derive(Debug, Deserialize)]
struct DriveFile {
    id: String,
    #[serde(rename = "webViewLink")]
    web_view_link: String,
}

impl DriveClient {
    /// Create a new Drive client from configuration.
    pub fn new(config: DriveConfig) -> Result<Self, DriveError> {
        let access_token = config.access_token.ok_or_else(|| {
            DriveError::Configuration("DRIVE_ACCESS_TOKEN is required for the drive provider".to_string())
        })?;
        let folder_id = config.folder_id.ok_or_else(|| {
            DriveError::Configuration("DRIVE_FOLDER_ID is required for the drive provider".to_string())
        })?;

        Ok(Self {
            http: reqwest::Client::new(),
            access_token,
            folder_id,
            api_base: config.api_base.trim_end_matches('/').to_string(),
            upload_base: config.upload_base.trim_end_matches('/').to_string(),
        })
    }

    fn bearer(&self) -> String {
        format!("Bearer {}", self.access_token)
    }

    /// Map a non-success response to the discriminated error taxonomy.
    async fn reject(response: reqwest::Response) -> DriveError {
        let status = response.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return DriveError::Unauthorized;
        }
        let message = response
            .text()
            .await
            .unwrap_or_else(|_| "Failed to read response body".to_string());
        DriveError::Rejected {
            status: status.as_u16(),
            message,
        }
    }

    /// Open a resumable upload session; returns the session URI.
    async fn start_session(&self, name: &str) -> Result<String, DriveError> {
        let metadata = json!({
            "name": name,
            "parents": [self.folder_id],
            "mimeType": PDF_MIME,
        });

        let response = self
            .http
            .post(format!(
                "{}/files?uploadType=resumable&fields=id,webViewLink",
                self.upload_base
            ))
            .header(header::AUTHORIZATION, self.bearer())
            .header("X-Upload-Content-Type", PDF_MIME)
            .json(&metadata)
            .send()
            .await
            .map_err(|e| DriveError::Transport(e.to_string()))?;

        if !response.status().is_success() {
            return Err(Self::reject(response).await);
        }

        response
            .headers()
            .get(header::LOCATION)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
            .ok_or_else(|| {
                DriveError::Transport("resumable session response carried no Location URI".to_string())
            })
    }

    /// Transfer the bytes over the session, yielding the stored file.
    async fn transfer(&self, session_uri: &str, bytes: Vec<u8>) -> Result<DriveFile, DriveError> {
        let response = self
            .http
            .put(session_uri)
            .header(header::AUTHORIZATION, self.bearer())
            .header(header::CONTENT_TYPE, PDF_MIME)
            .body(bytes)
            .send()
            .await
            .map_err(|e| DriveError::Transport(e.to_string()))?;

        if !response.status().is_success() {
            return Err(Self::reject(response).await);
        }

        response
            .json::<DriveFile>()
            .await
            .map_err(|e| DriveError::Transport(format!("invalid upload response: {}", e)))
    }

    /// Grant world-readable access to a stored file.
    async fn grant_public_read(&self, file_id: &str) -> Result<(), DriveError> {
        let response = self
            .http
            .post(format!("{}/files/{}/permissions", self.api_base, file_id))
            .header(header::AUTHORIZATION, self.bearer())
            .json(&json!({ "role": "reader", "type": "anyone" }))
            .send()
            .await
            .map_err(|e| DriveError::Transport(e.to_string()))?;

        if !response.status().is_success() {
            return Err(Self::reject(response).await);
        }
        Ok(())
    }
}

#[async_trait::async_trait]
impl BlobStore for DriveClient {
    async fn upload(&self, bytes: Vec<u8>, name: &str) -> Result<StoredBlob, DriveError> {
        let session_uri = self.start_session(name).await?;
        let file = self.transfer(&session_uri, bytes).await?;
        self.grant_public_read(&file.id).await?;

        tracing::debug!(file_id = %file.id, name, "Drive upload complete");
        Ok(StoredBlob {
            file_id: file.id,
            public_url: file.web_view_link,
        })
    }

    async fn rename(&self, file_id: &str, new_name: &str) -> Result<(), DriveError> {
        let response = self
            .http
            .patch(format!("{}/files/{}", self.api_base, file_id))
            .header(header::AUTHORIZATION, self.bearer())
            .json(&json!({ "name": new_name }))
            .send()
            .await
            .map_err(|e| DriveError::Transport(e.to_string()))?;

        if !response.status().is_success() {
            return Err(Self::reject(response).await);
        }

        tracing::debug!(file_id, new_name, "Drive file renamed");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(token: Option<&str>, folder: Option<&str>) -> DriveConfig {
        DriveConfig {
            provider: "drive".to_string(),
            access_token: token.map(str::to_string),
            folder_id: folder.map(str::to_string),
            api_base: "https://www.googleapis.com/drive/v3".to_string(),
            upload_base: "https://www.googleapis.com/upload/drive/v3".to_string(),
        }
    }

    #[test]
    fn test_client_requires_token() {
        let err = DriveClient::new(config(None, Some("folder"))).unwrap_err();
        assert!(matches!(err, DriveError::Configuration(_)));
    }

    #[test]
    fn test_client_requires_folder() {
        let err = DriveClient::new(config(Some("token"), None)).unwrap_err();
        assert!(matches!(err, DriveError::Configuration(_)));
    }

    #[test]
    fn test_client_builds_with_full_config() {
        let client = DriveClient::new(config(Some("token"), Some("folder"))).unwrap();
        assert_eq!(client.api_base, "https://www.googleapis.com/drive/v3");
    }
}
