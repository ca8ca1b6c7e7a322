//! Data model for inspection reports

use chrono::Utc;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Lifecycle state of a report
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ReportStatus {
    /// Editable, auto-saved while the wizard is open
    Draft,
    /// Finalized; the wizard offers no further edit path
    Submitted,
}

impl ReportStatus {
    /// Stable lowercase form used in storage filters
    pub fn as_str(&self) -> &'static str {
        match self {
            ReportStatus::Draft => "draft",
            ReportStatus::Submitted => "submitted",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ReportStatus::Draft => "Entwurf",
            ReportStatus::Submitted => "Abgeschlossen",
        }
    }
}

/// Severity of a single damage observation
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Severity {
    #[serde(rename = "Gering")]
    Low,
    #[serde(rename = "Mittel")]
    Medium,
    #[serde(rename = "Schwer")]
    Severe,
}

impl Severity {
    pub fn label(&self) -> &'static str {
        match self {
            Severity::Low => "Gering",
            Severity::Medium => "Mittel",
            Severity::Severe => "Schwer",
        }
    }

    /// Cycle through severities in display order
    pub fn next(&self) -> Self {
        match self {
            Severity::Low => Severity::Medium,
            Severity::Medium => Severity::Severe,
            Severity::Severe => Severity::Low,
        }
    }
}

/// Fixed catalogue of damage categories offered by the wizard.
/// Categories remain free-text tags on the record itself.
pub const DAMAGE_TYPES: &[&str] = &[
    "Verpackung beschädigt",
    "Kratzer",
    "Delle / Beule",
    "Riss / Bruch",
    "Nässe / Feuchtigkeit",
    "Verschmutzung",
    "Aufgerissen",
    "Gekippt / Umgefallen",
    "Fehlmenge",
    "Korrosion / Rost",
];

/// Captured delivery document with the manually entered key fields
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DocumentData {
    /// Delivery note number
    pub delivery_number: String,
    /// Delivery date (ISO yyyy-mm-dd)
    pub date: String,
    /// Sending company / location
    pub sender: String,
    /// Receiving company / location
    pub recipient: String,
    /// Unused placeholder kept for record compatibility
    pub raw_text: String,
    /// Captured document photo as a data URL
    pub image_url: String,
}

impl DocumentData {
    /// Create document data from a freshly captured photo.
    /// The date defaults to today; the other fields are filled in by hand.
    pub fn from_capture(image_url: impl Into<String>) -> Self {
        Self {
            delivery_number: String::new(),
            date: Utc::now().format("%Y-%m-%d").to_string(),
            sender: String::new(),
            recipient: String::new(),
            raw_text: String::new(),
            image_url: image_url.into(),
        }
    }
}

/// One observed defect with photos, severity, categories, description
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DamageRecord {
    /// Identifier derived from the capture timestamp
    pub id: String,
    /// Ordered photos of the damage (at least one)
    pub image_urls: Vec<String>,
    /// Free-text description
    pub description: String,
    /// Severity, defaults to Mittel
    pub severity: Severity,
    /// Toggled set of category tags
    pub categories: Vec<String>,
    /// Capture time in milliseconds since the epoch
    pub timestamp: i64,
}

impl DamageRecord {
    /// Create a new damage record from its first photo.
    /// This is the only creation path; a damage without photos cannot exist.
    pub fn from_capture(image_url: impl Into<String>) -> Self {
        let now = Utc::now().timestamp_millis();
        Self {
            id: now.to_string(),
            image_urls: vec![image_url.into()],
            description: String::new(),
            severity: Severity::Medium,
            categories: Vec::new(),
            timestamp: now,
        }
    }

    /// Toggle a category tag: present -> removed, absent -> appended
    pub fn toggle_category(&mut self, category: &str) {
        if let Some(pos) = self.categories.iter().position(|c| c == category) {
            self.categories.remove(pos);
        } else {
            self.categories.push(category.to_string());
        }
    }
}

/// Driver identity, vehicle, and acceptance signature
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DriverData {
    /// Driver name
    pub name: String,
    /// Vehicle license plate
    pub license_plate: String,
    /// Signature image as a data URL
    pub signature_data_url: String,
    /// Freight company
    pub company: String,
    /// Blanket reservation-of-rights flag recorded at acceptance
    pub under_reserve: bool,
}

/// One inspection session's complete record
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct InspectionReport {
    /// Identifier, REP-<random numeric suffix>; empty until a session starts
    pub id: String,
    /// Creation time in milliseconds since the epoch
    pub created_at: i64,
    /// Warehouse employee handling the inspection
    pub employee_name: String,
    /// Captured delivery document, if any
    pub document: Option<DocumentData>,
    /// Ordered damage observations
    pub damages: Vec<DamageRecord>,
    /// Driver data, filled incrementally during signing
    pub driver: Option<DriverData>,
    /// Draft or submitted
    pub status: ReportStatus,
}

impl InspectionReport {
    /// Blank working state (no id, nothing captured)
    pub fn blank() -> Self {
        Self {
            id: String::new(),
            created_at: Utc::now().timestamp_millis(),
            employee_name: String::new(),
            document: None,
            damages: Vec::new(),
            driver: None,
            status: ReportStatus::Draft,
        }
    }

    /// Start a fresh report with a generated id
    pub fn new_session() -> Self {
        let mut report = Self::blank();
        report.id = format!("REP-{}", rand::rng().random_range(0..100_000));
        report
    }

    /// Driver data, created on first access so signature and fields
    /// can arrive in any order
    pub fn driver_mut(&mut self) -> &mut DriverData {
        self.driver.get_or_insert_with(DriverData::default)
    }

    pub fn is_draft(&self) -> bool {
        self.status == ReportStatus::Draft
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_session_has_generated_id() {
        let report = InspectionReport::new_session();
        assert!(report.id.starts_with("REP-"));
        assert_eq!(report.status, ReportStatus::Draft);
        assert!(report.document.is_none());
        assert!(report.damages.is_empty());
    }

    #[test]
    fn test_json_field_names_are_camel_case() {
        let mut report = InspectionReport::new_session();
        report.employee_name = "Max".to_string();
        report.damages.push(DamageRecord::from_capture("data:image/png;base64,AA=="));
        report.driver_mut().license_plate = "K-ZZ 123".to_string();

        let json = serde_json::to_value(&report).unwrap();
        assert!(json.get("createdAt").is_some());
        assert!(json.get("employeeName").is_some());
        assert!(json["damages"][0].get("imageUrls").is_some());
        assert!(json["driver"].get("licensePlate").is_some());
        assert!(json["driver"].get("signatureDataUrl").is_some());
        assert!(json["driver"].get("underReserve").is_some());
    }

    #[test]
    fn test_severity_serializes_to_german_labels() {
        assert_eq!(serde_json::to_string(&Severity::Severe).unwrap(), "\"Schwer\"");
        assert_eq!(serde_json::to_string(&Severity::Low).unwrap(), "\"Gering\"");
        let parsed: Severity = serde_json::from_str("\"Mittel\"").unwrap();
        assert_eq!(parsed, Severity::Medium);
    }

    #[test]
    fn test_toggle_category_pair_is_identity() {
        let mut damage = DamageRecord::from_capture("data:image/png;base64,AA==");
        damage.categories = vec!["Kratzer".to_string()];

        damage.toggle_category("Fehlmenge");
        damage.toggle_category("Fehlmenge");
        assert_eq!(damage.categories, vec!["Kratzer".to_string()]);
    }
}
