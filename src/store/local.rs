//! Local record store: one JSON-serialized report per id in SQLite

use async_trait::async_trait;
use rusqlite::{params, Connection};
use std::sync::{Arc, Mutex};

use super::{ReportStore, StoreError};
use crate::report::{InspectionReport, ReportStatus};

/// Data access object for inspection reports backed by the local database.
///
/// The table is a key-value namespace: the full record is stored as JSON,
/// with creation time and status mirrored into columns for sorting and
/// filtering.
#[derive(Clone)]
pub struct LocalReportStore {
    conn: Arc<Mutex<Connection>>,
}

impl LocalReportStore {
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Connection>, StoreError> {
        self.conn.lock().map_err(|_| StoreError::LockPoisoned)
    }

    fn row_to_report(row: &rusqlite::Row) -> rusqlite::Result<String> {
        row.get(0)
    }
}

#[async_trait]
impl ReportStore for LocalReportStore {
    async fn save(&self, report: &InspectionReport) -> Result<(), StoreError> {
        let record = serde_json::to_string(report)?;
        let conn = self.lock()?;
        conn.execute(
            "INSERT INTO inspection_reports (id, record, created_at, status)
             VALUES (?1, ?2, ?3, ?4)
             ON CONFLICT(id) DO UPDATE SET record = ?2, created_at = ?3, status = ?4",
            params![report.id, record, report.created_at, report.status.as_str()],
        )?;
        tracing::debug!(id = %report.id, "Report saved");
        Ok(())
    }

    async fn get(&self, id: &str) -> Result<Option<InspectionReport>, StoreError> {
        let record: Option<String> = {
            let conn = self.lock()?;
            let mut stmt = conn.prepare("SELECT record FROM inspection_reports WHERE id = ?1")?;
            let mut rows = stmt.query(params![id])?;
            match rows.next()? {
                Some(row) => Some(Self::row_to_report(row)?),
                None => None,
            }
        };
        match record {
            Some(json) => Ok(Some(serde_json::from_str(&json)?)),
            None => Ok(None),
        }
    }

    async fn get_all(&self) -> Result<Vec<InspectionReport>, StoreError> {
        let records: Vec<String> = {
            let conn = self.lock()?;
            let mut stmt = conn
                .prepare("SELECT record FROM inspection_reports ORDER BY created_at DESC")?;
            let rows = stmt
                .query_map([], Self::row_to_report)?
                .collect::<rusqlite::Result<Vec<String>>>()?;
            rows
        };
        records
            .iter()
            .map(|json| serde_json::from_str(json).map_err(StoreError::from))
            .collect()
    }

    async fn get_by_status(
        &self,
        status: ReportStatus,
    ) -> Result<Vec<InspectionReport>, StoreError> {
        let records: Vec<String> = {
            let conn = self.lock()?;
            let mut stmt = conn.prepare(
                "SELECT record FROM inspection_reports
                 WHERE status = ?1 ORDER BY created_at DESC",
            )?;
            let rows = stmt
                .query_map(params![status.as_str()], Self::row_to_report)?
                .collect::<rusqlite::Result<Vec<String>>>()?;
            rows
        };
        records
            .iter()
            .map(|json| serde_json::from_str(json).map_err(StoreError::from))
            .collect()
    }

    async fn delete(&self, id: &str) -> Result<(), StoreError> {
        let conn = self.lock()?;
        conn.execute("DELETE FROM inspection_reports WHERE id = ?1", params![id])?;
        tracing::debug!(id = %id, "Report deleted");
        Ok(())
    }

    async fn count(&self) -> Result<usize, StoreError> {
        let conn = self.lock()?;
        let count: i64 =
            conn.query_row("SELECT COUNT(*) FROM inspection_reports", [], |row| {
                row.get(0)
            })?;
        Ok(count as usize)
    }

    async fn clear_all(&self) -> Result<(), StoreError> {
        let conn = self.lock()?;
        conn.execute("DELETE FROM inspection_reports", [])?;
        Ok(())
    }
}
