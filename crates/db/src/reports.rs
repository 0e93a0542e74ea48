//! Report file repository
//!
//! The registry side of publication: canonical names are computed here,
//! atomically with the insert, and nowhere else.

use reportwire_common::Result;
use sqlx::PgPool;

use crate::entities::{RegisteredFile, ReportFile};
use crate::RecordStore;

/// All columns in the report_files table, used for SELECT and RETURNING clauses.
const REPORT_FILE_COLUMNS: &str = "id, file_name, public_url, uploaded_at";

#[derive(Clone)]
pub struct ReportFileRepository {
    pool: PgPool,
}

impl ReportFileRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find report file by ID
    pub async fn find(&self, id: i64) -> Result<Option<ReportFile>> {
        let query = format!("SELECT {REPORT_FILE_COLUMNS} FROM report_files WHERE id = $1");
        let file = sqlx::query_as::<_, ReportFile>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(file)
    }

    /// List report files, newest first
    pub async fn list(&self, limit: i64, offset: i64) -> Result<Vec<ReportFile>> {
        let query = format!(
            "SELECT {REPORT_FILE_COLUMNS} FROM report_files \
             ORDER BY uploaded_at DESC LIMIT $1 OFFSET $2"
        );
        let files = sqlx::query_as::<_, ReportFile>(&query)
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await?;

        Ok(files)
    }

    /// Search report files by canonical name (case-insensitive substring)
    pub async fn search_by_name(&self, name: &str, limit: i64, offset: i64) -> Result<Vec<ReportFile>> {
        let query = format!(
            "SELECT {REPORT_FILE_COLUMNS} FROM report_files \
             WHERE file_name ILIKE $1 ORDER BY uploaded_at DESC LIMIT $2 OFFSET $3"
        );
        let files = sqlx::query_as::<_, ReportFile>(&query)
            .bind(format!("%{}%", name))
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await?;

        Ok(files)
    }
}

#[async_trait::async_trait]
impl RecordStore for ReportFileRepository {
    /// Register a published file and assign its canonical name.
    ///
    /// The id is drawn from the table sequence inside the same statement
    /// that derives the name, so concurrent registrations can never be
    /// assigned the same canonical name.
    async fn register(&self, public_url: &str) -> Result<RegisteredFile> {
        let registered = sqlx::query_as::<_, RegisteredFile>(
            "WITH next_id AS (SELECT nextval('report_files_id_seq') AS id) \
             INSERT INTO report_files (id, file_name, public_url) \
             SELECT id, id::text || '_report.pdf', $1 FROM next_id \
             RETURNING id, file_name",
        )
        .bind(public_url)
        .fetch_one(&self.pool)
        .await?;

        tracing::debug!(
            registry_id = registered.id,
            file_name = %registered.file_name,
            "Report file registered"
        );
        Ok(registered)
    }
}
