//! Remote record store: hosted relational table over a PostgREST-style API
//!
//! The camelCase↔snake_case field translation lives entirely in this
//! adapter; core report types never see the wire format. Nested objects
//! (document, damages, driver) pass through unchanged.

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use serde::{Deserialize, Serialize};

use super::{ReportStore, StoreError};
use crate::report::{DamageRecord, DocumentData, DriverData, InspectionReport, ReportStatus};

/// Table row as the hosted database sees it (snake_case columns)
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ReportRow {
    id: String,
    created_at: i64,
    employee_name: String,
    document: Option<DocumentData>,
    damages: Vec<DamageRecord>,
    driver: Option<DriverData>,
    status: ReportStatus,
}

impl From<&InspectionReport> for ReportRow {
    fn from(report: &InspectionReport) -> Self {
        Self {
            id: report.id.clone(),
            created_at: report.created_at,
            employee_name: report.employee_name.clone(),
            document: report.document.clone(),
            damages: report.damages.clone(),
            driver: report.driver.clone(),
            status: report.status,
        }
    }
}

impl From<ReportRow> for InspectionReport {
    fn from(row: ReportRow) -> Self {
        Self {
            id: row.id,
            created_at: row.created_at,
            employee_name: row.employee_name,
            document: row.document,
            damages: row.damages,
            driver: row.driver,
            status: row.status,
        }
    }
}

/// Report store backed by a hosted table.
///
/// Last write wins: no optimistic concurrency or conflict detection, the
/// store is accessed by one logical client at a time under normal use.
#[derive(Clone)]
pub struct RemoteReportStore {
    client: reqwest::Client,
    endpoint: String,
}

impl RemoteReportStore {
    pub fn new(base_url: &str, api_key: &str, table: &str) -> Result<Self, StoreError> {
        let mut headers = HeaderMap::new();
        let key = HeaderValue::from_str(api_key)
            .map_err(|e| StoreError::Unavailable(format!("invalid api key: {e}")))?;
        headers.insert("apikey", key);
        let bearer = HeaderValue::from_str(&format!("Bearer {api_key}"))
            .map_err(|e| StoreError::Unavailable(format!("invalid api key: {e}")))?;
        headers.insert(AUTHORIZATION, bearer);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()?;

        Ok(Self {
            client,
            endpoint: format!("{}/rest/v1/{}", base_url.trim_end_matches('/'), table),
        })
    }

    async fn fetch_rows(&self, query: &str) -> Result<Vec<ReportRow>, StoreError> {
        let url = format!("{}?{}", self.endpoint, query);
        let response = self.client.get(&url).send().await?;
        if !response.status().is_success() {
            return Err(StoreError::Remote(format!(
                "GET {query} returned {}",
                response.status()
            )));
        }
        Ok(response.json().await?)
    }
}

#[async_trait]
impl ReportStore for RemoteReportStore {
    async fn save(&self, report: &InspectionReport) -> Result<(), StoreError> {
        let row = ReportRow::from(report);

        // Probe for an existing row, then insert or update accordingly
        let existing = self
            .fetch_rows(&format!("select=id&id=eq.{}", report.id))
            .await
            .map(|rows| !rows.is_empty())?;

        let response = if existing {
            self.client
                .patch(format!("{}?id=eq.{}", self.endpoint, report.id))
                .json(&row)
                .send()
                .await?
        } else {
            self.client
                .post(&self.endpoint)
                .header("Prefer", "return=minimal")
                .json(&vec![row])
                .send()
                .await?
        };

        if !response.status().is_success() {
            return Err(StoreError::Remote(format!(
                "save of {} returned {}",
                report.id,
                response.status()
            )));
        }
        tracing::debug!(id = %report.id, updated = existing, "Report saved remotely");
        Ok(())
    }

    async fn get(&self, id: &str) -> Result<Option<InspectionReport>, StoreError> {
        let rows = self.fetch_rows(&format!("select=*&id=eq.{id}")).await?;
        Ok(rows.into_iter().next().map(InspectionReport::from))
    }

    async fn get_all(&self) -> Result<Vec<InspectionReport>, StoreError> {
        let rows = self
            .fetch_rows("select=*&order=created_at.desc")
            .await?;
        Ok(rows.into_iter().map(InspectionReport::from).collect())
    }

    async fn get_by_status(
        &self,
        status: ReportStatus,
    ) -> Result<Vec<InspectionReport>, StoreError> {
        let rows = self
            .fetch_rows(&format!(
                "select=*&status=eq.{}&order=created_at.desc",
                status.as_str()
            ))
            .await?;
        Ok(rows.into_iter().map(InspectionReport::from).collect())
    }

    async fn delete(&self, id: &str) -> Result<(), StoreError> {
        let response = self
            .client
            .delete(format!("{}?id=eq.{id}", self.endpoint))
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(StoreError::Remote(format!(
                "delete of {id} returned {}",
                response.status()
            )));
        }
        Ok(())
    }

    async fn count(&self) -> Result<usize, StoreError> {
        Ok(self.fetch_rows("select=id").await?.len())
    }

    async fn clear_all(&self) -> Result<(), StoreError> {
        let response = self
            .client
            .delete(format!("{}?id=like.*", self.endpoint))
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(StoreError::Remote(format!(
                "clear returned {}",
                response.status()
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_uses_snake_case_top_level_fields() {
        let mut report = InspectionReport::blank();
        report.id = "REP-42".to_string();
        report.created_at = 1_700_000_000_000;
        report.employee_name = "Max Muster".to_string();
        report.driver = Some(DriverData {
            name: "Fahrer".to_string(),
            license_plate: "K-ZZ 123".to_string(),
            signature_data_url: "data:image/png;base64,AA==".to_string(),
            company: String::new(),
            under_reserve: true,
        });

        let row = ReportRow::from(&report);
        let json = serde_json::to_value(&row).unwrap();

        // Top-level columns are translated
        assert!(json.get("created_at").is_some());
        assert!(json.get("employee_name").is_some());
        assert!(json.get("createdAt").is_none());

        // Nested objects keep the app's camelCase format
        assert!(json["driver"].get("licensePlate").is_some());
        assert!(json["driver"].get("underReserve").is_some());
    }

    #[test]
    fn test_row_round_trip_preserves_report() {
        let mut report = InspectionReport::new_session();
        report.employee_name = "Anna".to_string();
        report
            .damages
            .push(DamageRecord::from_capture("data:image/jpeg;base64,AA=="));

        let row = ReportRow::from(&report);
        let wire = serde_json::to_string(&row).unwrap();
        let parsed: ReportRow = serde_json::from_str(&wire).unwrap();
        let back = InspectionReport::from(parsed);

        assert_eq!(back, report);
    }
}
