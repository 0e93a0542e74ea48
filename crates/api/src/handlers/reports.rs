//! Report file API handlers
//!
//! Registry lookups plus the publication endpoint, which accepts raw PDF
//! bytes (base64) with a working name and runs the full publication
//! pipeline.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use base64::Engine;
use reportwire_common::{Error, Pagination, Result, ValidatedJson};
use serde::Deserialize;
use validator::Validate;

use crate::AppState;
use reportwire_db::ReportFile;
use reportwire_drive::DriveError;
use reportwire_pipeline::{PublishError, PublishedReport};

/// Request for publishing a report
#[derive(Debug, Deserialize, Validate)]
pub struct PublishReportRequest {
    /// Working name for the upload; superseded by the canonical name
    #[validate(length(min = 1, max = 100))]
    pub file_name: String,

    /// PDF bytes, base64-encoded
    #[validate(length(min = 1))]
    pub pdf_base64: String,
}

/// Query parameters for listing report files
#[derive(Debug, Default, Deserialize)]
pub struct ReportQuery {
    pub name: Option<String>,
}

/// Map pipeline failures onto the HTTP error taxonomy.
///
/// A blob-store authorization failure is the caller's problem to fix
/// (refresh the token), so it surfaces as 401 instead of a generic 500.
fn map_publish_error(err: PublishError) -> Error {
    match &err {
        PublishError::Upload(DriveError::Unauthorized) => {
            Error::Authentication("Blob store authorization required".to_string())
        }
        _ => Error::Internal(err.to_string()),
    }
}

/// List report files, optionally filtered by canonical name
pub async fn list_reports(
    State(state): State<AppState>,
    Query(query): Query<ReportQuery>,
    Query(page): Query<Pagination>,
) -> Result<Json<Vec<ReportFile>>> {
    let files = if let Some(name) = query.name.as_deref() {
        state
            .repos
            .report_files
            .search_by_name(name, page.limit(), page.offset())
            .await?
    } else {
        state
            .repos
            .report_files
            .list(page.limit(), page.offset())
            .await?
    };

    Ok(Json(files))
}

/// Get a single report file by registry ID
pub async fn get_report(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<ReportFile>> {
    let file = state
        .repos
        .report_files
        .find(id)
        .await?
        .ok_or_else(|| Error::NotFound("Report file not found".to_string()))?;

    Ok(Json(file))
}

/// Publish a report: upload, register under a canonical name, rename
pub async fn publish_report(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<PublishReportRequest>,
) -> Result<(StatusCode, Json<PublishedReport>)> {
    let bytes = base64::engine::general_purpose::STANDARD
        .decode(&req.pdf_base64)
        .map_err(|e| Error::Validation(format!("pdf_base64 is not valid base64: {}", e)))?;

    let published = state
        .publisher
        .publish(bytes, &req.file_name)
        .await
        .map_err(map_publish_error)?;

    Ok((StatusCode::CREATED, Json(published)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unauthorized_upload_maps_to_authentication() {
        let err = map_publish_error(PublishError::Upload(DriveError::Unauthorized));
        assert!(matches!(err, Error::Authentication(_)));
    }

    #[test]
    fn test_other_upload_failures_map_to_internal() {
        let err = map_publish_error(PublishError::Upload(DriveError::Transport(
            "connection reset".to_string(),
        )));
        assert!(matches!(err, Error::Internal(_)));
    }

    #[test]
    fn test_publish_request_validation() {
        let valid = PublishReportRequest {
            file_name: "tmp_report".to_string(),
            pdf_base64: "JVBERi0xLjc=".to_string(),
        };
        assert!(valid.validate().is_ok());

        let empty = PublishReportRequest {
            file_name: String::new(),
            pdf_base64: "JVBERi0xLjc=".to_string(),
        };
        assert!(empty.validate().is_err());
    }
}
