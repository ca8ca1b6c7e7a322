//! Wizard state: the working report and the current step
//!
//! The wizard exclusively owns the in-progress report during an editing
//! session. Step transitions are explicit user actions with guard
//! conditions; there is no automatic skipping.

use thiserror::Error;

use super::model::{DamageRecord, DocumentData, InspectionReport, ReportStatus, Severity};

/// Screens of the report wizard, in forward order where applicable
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WizardStep {
    Dashboard,
    ScanDocument,
    DamageLog,
    DriverSignature,
    Summary,
    /// Read-only view of a stored report
    ViewReport,
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum WizardError {
    #[error("Bitte zuerst den Lieferschein fotografieren")]
    DocumentMissing,
    #[error("Mitarbeiter, Fahrername und Unterschrift sind erforderlich")]
    SignatureIncomplete,
    #[error("Abgeschlossene Berichte können nicht bearbeitet werden")]
    ReportSubmitted,
    #[error("Kein Schritt-Wechsel möglich")]
    NoTransition,
}

/// Owned wizard state, threaded through the application explicitly
pub struct Wizard {
    pub report: InspectionReport,
    pub step: WizardStep,
}

impl Default for Wizard {
    fn default() -> Self {
        Self::new()
    }
}

impl Wizard {
    pub fn new() -> Self {
        Self {
            report: InspectionReport::blank(),
            step: WizardStep::Dashboard,
        }
    }

    /// Whether the working report qualifies for debounced auto-saving:
    /// it has an id and the user is past the dashboard.
    pub fn autosave_eligible(&self) -> bool {
        !self.report.id.is_empty()
            && self.step != WizardStep::Dashboard
            && self.report.is_draft()
    }

    /// Begin a fresh session and move to the document scan
    pub fn start_new(&mut self) {
        self.report = InspectionReport::new_session();
        self.step = WizardStep::ScanDocument;
    }

    /// Load a stored report read-only
    pub fn load_for_view(&mut self, report: InspectionReport) {
        self.report = report;
        self.step = WizardStep::ViewReport;
    }

    /// Resume editing a draft from the document scan step
    pub fn load_for_edit(&mut self, report: InspectionReport) -> Result<(), WizardError> {
        if report.status == ReportStatus::Submitted {
            return Err(WizardError::ReportSubmitted);
        }
        self.report = report;
        self.step = WizardStep::ScanDocument;
        Ok(())
    }

    /// Advance to the next step, enforcing the guard conditions
    pub fn advance(&mut self) -> Result<WizardStep, WizardError> {
        let next = match self.step {
            WizardStep::ScanDocument => {
                if self.report.document.is_none() {
                    return Err(WizardError::DocumentMissing);
                }
                WizardStep::DamageLog
            }
            WizardStep::DamageLog => WizardStep::DriverSignature,
            WizardStep::DriverSignature => {
                let signed = self
                    .report
                    .driver
                    .as_ref()
                    .is_some_and(|d| !d.signature_data_url.is_empty() && !d.name.is_empty());
                if !signed || self.report.employee_name.is_empty() {
                    return Err(WizardError::SignatureIncomplete);
                }
                WizardStep::Summary
            }
            _ => return Err(WizardError::NoTransition),
        };
        self.step = next;
        Ok(next)
    }

    /// Go back one step (or cancel to the dashboard)
    pub fn back(&mut self) -> WizardStep {
        self.step = match self.step {
            WizardStep::ScanDocument => WizardStep::Dashboard,
            WizardStep::DamageLog => WizardStep::ScanDocument,
            WizardStep::DriverSignature => WizardStep::DamageLog,
            WizardStep::Summary => WizardStep::DriverSignature,
            WizardStep::ViewReport => WizardStep::Dashboard,
            WizardStep::Dashboard => WizardStep::Dashboard,
        };
        self.step
    }

    /// Finalize the working report. Returns the submitted record for
    /// persistence; the caller resets the wizard once the save succeeded.
    pub fn finalize(&self) -> InspectionReport {
        let mut submitted = self.report.clone();
        submitted.status = ReportStatus::Submitted;
        submitted
    }

    /// Reset to a blank report on the dashboard
    pub fn reset(&mut self) {
        self.report = InspectionReport::blank();
        self.step = WizardStep::Dashboard;
    }

    // --- Document mutations ---

    /// Store a captured document photo, replacing any previous document
    pub fn capture_document(&mut self, data_url: String) {
        self.report.document = Some(DocumentData::from_capture(data_url));
    }

    /// Delete the document so it can be retaken
    pub fn clear_document(&mut self) {
        self.report.document = None;
    }

    // --- Damage mutations ---

    /// Record a damage photo. With a damage id the photo appends to that
    /// record's gallery; without one a new damage with defaults is created.
    pub fn capture_damage_photo(&mut self, data_url: String, damage_id: Option<&str>) {
        match damage_id {
            Some(id) => {
                if let Some(damage) = self.damage_mut(id) {
                    damage.image_urls.push(data_url);
                }
            }
            None => self.report.damages.push(DamageRecord::from_capture(data_url)),
        }
    }

    pub fn remove_damage(&mut self, damage_id: &str) {
        self.report.damages.retain(|d| d.id != damage_id);
    }

    pub fn set_damage_severity(&mut self, damage_id: &str, severity: Severity) {
        if let Some(damage) = self.damage_mut(damage_id) {
            damage.severity = severity;
        }
    }

    pub fn toggle_damage_category(&mut self, damage_id: &str, category: &str) {
        if let Some(damage) = self.damage_mut(damage_id) {
            damage.toggle_category(category);
        }
    }

    pub fn set_damage_description(&mut self, damage_id: &str, description: String) {
        if let Some(damage) = self.damage_mut(damage_id) {
            damage.description = description;
        }
    }

    fn damage_mut(&mut self, damage_id: &str) -> Option<&mut DamageRecord> {
        self.report.damages.iter_mut().find(|d| d.id == damage_id)
    }

    // --- Driver / signature mutations ---

    /// Store the exported signature image, creating driver data as needed
    pub fn set_signature(&mut self, data_url: String) {
        self.report.driver_mut().signature_data_url = data_url;
    }

    pub fn clear_signature(&mut self) {
        if let Some(driver) = self.report.driver.as_mut() {
            driver.signature_data_url.clear();
        }
    }

    pub fn set_under_reserve(&mut self, under_reserve: bool) {
        self.report.driver_mut().under_reserve = under_reserve;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn wizard_at_signature() -> Wizard {
        let mut wizard = Wizard::new();
        wizard.start_new();
        wizard.capture_document("data:image/jpeg;base64,AA==".to_string());
        wizard.advance().unwrap();
        wizard.advance().unwrap();
        wizard
    }

    #[test]
    fn test_cannot_leave_scan_without_document() {
        let mut wizard = Wizard::new();
        wizard.start_new();
        assert_eq!(wizard.step, WizardStep::ScanDocument);

        assert_eq!(wizard.advance(), Err(WizardError::DocumentMissing));
        assert_eq!(wizard.step, WizardStep::ScanDocument);

        wizard.capture_document("data:image/jpeg;base64,AA==".to_string());
        assert_eq!(wizard.advance(), Ok(WizardStep::DamageLog));
    }

    #[test]
    fn test_signature_guard_requires_all_three_fields() {
        let mut wizard = wizard_at_signature();
        assert_eq!(wizard.step, WizardStep::DriverSignature);

        // Nothing filled in
        assert_eq!(wizard.advance(), Err(WizardError::SignatureIncomplete));

        wizard.set_signature("data:image/png;base64,AA==".to_string());
        assert_eq!(wizard.advance(), Err(WizardError::SignatureIncomplete));

        wizard.report.driver_mut().name = "Max Muster".to_string();
        assert_eq!(wizard.advance(), Err(WizardError::SignatureIncomplete));

        wizard.report.employee_name = "Anna".to_string();
        assert_eq!(wizard.advance(), Ok(WizardStep::Summary));
    }

    #[test]
    fn test_cleared_signature_blocks_again() {
        let mut wizard = wizard_at_signature();
        wizard.set_signature("data:image/png;base64,AA==".to_string());
        wizard.report.driver_mut().name = "Max".to_string();
        wizard.report.employee_name = "Anna".to_string();

        wizard.clear_signature();
        assert_eq!(wizard.advance(), Err(WizardError::SignatureIncomplete));
    }

    #[test]
    fn test_damage_photo_appends_without_disturbing_order() {
        let mut wizard = Wizard::new();
        wizard.start_new();

        wizard.capture_damage_photo("one".to_string(), None);
        let id = wizard.report.damages[0].id.clone();
        wizard.capture_damage_photo("two".to_string(), Some(&id));
        wizard.capture_damage_photo("three".to_string(), Some(&id));

        assert_eq!(wizard.report.damages.len(), 1);
        assert_eq!(wizard.report.damages[0].image_urls, vec!["one", "two", "three"]);
    }

    #[test]
    fn test_new_damage_has_defaults_and_a_photo() {
        let mut wizard = Wizard::new();
        wizard.start_new();
        wizard.capture_damage_photo("img".to_string(), None);

        let damage = &wizard.report.damages[0];
        assert_eq!(damage.severity, Severity::Medium);
        assert!(damage.categories.is_empty());
        assert_eq!(damage.image_urls.len(), 1);
    }

    #[test]
    fn test_remove_damage() {
        let mut wizard = Wizard::new();
        wizard.start_new();
        wizard.capture_damage_photo("a".to_string(), None);
        let id = wizard.report.damages[0].id.clone();

        wizard.remove_damage(&id);
        assert!(wizard.report.damages.is_empty());
    }

    #[test]
    fn test_submitted_report_cannot_be_edited() {
        let mut report = InspectionReport::new_session();
        report.status = ReportStatus::Submitted;

        let mut wizard = Wizard::new();
        assert_eq!(wizard.load_for_edit(report.clone()), Err(WizardError::ReportSubmitted));

        // Viewing is always allowed
        wizard.load_for_view(report);
        assert_eq!(wizard.step, WizardStep::ViewReport);
    }

    #[test]
    fn test_finalize_and_reset() {
        let mut wizard = Wizard::new();
        wizard.start_new();
        let id = wizard.report.id.clone();

        let submitted = wizard.finalize();
        assert_eq!(submitted.status, ReportStatus::Submitted);
        assert_eq!(submitted.id, id);

        wizard.reset();
        assert_eq!(wizard.step, WizardStep::Dashboard);
        assert!(wizard.report.id.is_empty());
    }

    #[test]
    fn test_autosave_eligibility() {
        let mut wizard = Wizard::new();
        assert!(!wizard.autosave_eligible());

        wizard.start_new();
        assert!(wizard.autosave_eligible());

        wizard.step = WizardStep::Dashboard;
        assert!(!wizard.autosave_eligible());
    }

    proptest! {
        #[test]
        fn prop_toggle_pair_restores_categories(
            base in proptest::collection::vec("[a-zA-Z ]{1,20}", 0..5),
            tag in "[a-zA-Z ]{1,20}",
        ) {
            let mut wizard = Wizard::new();
            wizard.start_new();
            wizard.capture_damage_photo("img".to_string(), None);
            let id = wizard.report.damages[0].id.clone();

            // Deduplicate the base set and keep the toggled tag out of it
            let mut seen = std::collections::HashSet::new();
            for category in base.iter().filter(|c| **c != tag) {
                if seen.insert(category.clone()) {
                    wizard.toggle_damage_category(&id, category);
                }
            }
            let before = wizard.report.damages[0].categories.clone();

            wizard.toggle_damage_category(&id, &tag);
            wizard.toggle_damage_category(&id, &tag);

            prop_assert_eq!(&wizard.report.damages[0].categories, &before);
        }
    }
}
