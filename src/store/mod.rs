//! Persistence layer for inspection reports
//!
//! One async contract (`ReportStore`) with two backends: a local SQLite
//! key-value store and a hosted-table adapter. Create/update are aliases of
//! the same idempotent upsert; no creation-conflict error exists.

mod app_state;
mod database;
mod local;
mod migrations;
mod remote;

pub use app_state::{PreferenceStore, THEME_KEY};
pub use database::{Database, DatabaseError};
pub use local::LocalReportStore;
pub use remote::RemoteReportStore;

use async_trait::async_trait;
use thiserror::Error;

use crate::report::{InspectionReport, ReportStatus};

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Datenbank nicht bereit: {0}")]
    Unavailable(String),
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("record (de)serialization failed: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("remote store request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("remote store rejected the request: {0}")]
    Remote(String),
    #[error("Lock poisoned")]
    LockPoisoned,
}

/// Storage contract for inspection reports.
///
/// All operations are asynchronous and may fail with a store-unavailable or
/// I/O error; UI callers surface a generic message and, for reads, degrade
/// to an empty result.
#[async_trait]
pub trait ReportStore: Send + Sync {
    /// Idempotent upsert keyed by report id
    async fn save(&self, report: &InspectionReport) -> Result<(), StoreError>;

    /// Fetch a single report, None when the id is unknown
    async fn get(&self, id: &str) -> Result<Option<InspectionReport>, StoreError>;

    /// All reports sorted by creation time descending
    async fn get_all(&self) -> Result<Vec<InspectionReport>, StoreError>;

    /// Reports filtered by status, newest first
    async fn get_by_status(&self, status: ReportStatus)
        -> Result<Vec<InspectionReport>, StoreError>;

    /// Remove a report by id; unknown ids are a no-op
    async fn delete(&self, id: &str) -> Result<(), StoreError>;

    /// Number of stored reports
    async fn count(&self) -> Result<usize, StoreError>;

    /// Remove every stored report
    async fn clear_all(&self) -> Result<(), StoreError>;

    /// Alias of the upsert, kept for callers that think in create terms
    async fn create(&self, report: &InspectionReport) -> Result<(), StoreError> {
        self.save(report).await
    }

    /// Alias of the upsert, kept for callers that think in update terms
    async fn update(&self, report: &InspectionReport) -> Result<(), StoreError> {
        self.save(report).await
    }

    /// Dump every report as a pretty-printed JSON array
    async fn export_json(&self) -> Result<String, StoreError> {
        let reports = self.get_all().await?;
        Ok(serde_json::to_string_pretty(&reports)?)
    }

    /// Import reports from a JSON array, returns the number imported
    async fn import_json(&self, json: &str) -> Result<usize, StoreError> {
        let reports: Vec<InspectionReport> = serde_json::from_str(json)?;
        let mut imported = 0;
        for report in &reports {
            self.save(report).await?;
            imported += 1;
        }
        Ok(imported)
    }
}
