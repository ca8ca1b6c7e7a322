//! End-to-end tests for the report wizard against the SQLite-backed store
//!
//! Drives a full inspection session the way the UI does: scan the delivery
//! note, log a damage, collect the driver signature, submit, then check
//! what the archive holds.

use std::sync::Arc;

use cargoguard::capture::SignaturePad;
use cargoguard::pdf::generate_report_pdf;
use cargoguard::report::{ReportStatus, Severity, Wizard, WizardError, WizardStep};
use cargoguard::store::{Database, LocalReportStore, ReportStore};
use tempfile::TempDir;

/// Create a report store backed by a database in a temporary directory
fn create_test_store() -> (Arc<dyn ReportStore>, TempDir) {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let db = Database::open(dir.path().join("test.db")).expect("Failed to open database");
    (Arc::new(LocalReportStore::new(db.connection())), dir)
}

/// Draw a short stroke and export it, as the signature step does
fn signature_data_url() -> String {
    let mut pad = SignaturePad::new();
    pad.pointer_down(20.0, 80.0);
    pad.pointer_move(320.0, 120.0);
    pad.pointer_up()
        .expect("signature export failed")
        .expect("stroke should produce a signature")
}

/// A decodable captured photo, stand-in for the camera result
fn photo_data_url() -> String {
    SignaturePad::new()
        .export_data_url()
        .expect("photo encoding failed")
}

/// Run the wizard through every step and return the submitted record
fn complete_session(wizard: &mut Wizard) -> cargoguard::InspectionReport {
    wizard.start_new();
    assert_eq!(wizard.step, WizardStep::ScanDocument);

    wizard.capture_document(photo_data_url());
    if let Some(document) = wizard.report.document.as_mut() {
        document.delivery_number = "LS-1001".to_string();
        document.sender = "Spedition Nord GmbH".to_string();
        document.recipient = "Lager Süd".to_string();
    }
    wizard.advance().expect("document captured, scan step must pass");

    wizard.capture_damage_photo(photo_data_url(), None);
    let damage_id = wizard.report.damages[0].id.clone();
    wizard.set_damage_severity(&damage_id, Severity::Severe);
    wizard.toggle_damage_category(&damage_id, "Kratzer");
    wizard.set_damage_description(&damage_id, "Kratzer an der Seitenwand".to_string());
    wizard.advance().expect("damage step has no guard");

    wizard.set_signature(signature_data_url());
    let driver = wizard.report.driver_mut();
    driver.name = "Max Muster".to_string();
    driver.license_plate = "K-ZZ 123".to_string();
    driver.company = "Muster Logistik".to_string();
    driver.under_reserve = true;
    wizard.report.employee_name = "Anna Schmidt".to_string();
    wizard.advance().expect("signature step complete");
    assert_eq!(wizard.step, WizardStep::Summary);

    wizard.finalize()
}

#[tokio::test]
async fn test_full_session_ends_as_submitted_record() {
    let (store, _dir) = create_test_store();
    let mut wizard = Wizard::new();

    let submitted = complete_session(&mut wizard);
    store.save(&submitted).await.expect("save failed");
    wizard.reset();

    let archived = store
        .get(&submitted.id)
        .await
        .expect("get failed")
        .expect("record must exist");
    assert_eq!(archived.status, ReportStatus::Submitted);
    assert_eq!(archived.damages.len(), 1);
    assert_eq!(archived.damages[0].severity, Severity::Severe);
    assert_eq!(archived.damages[0].categories, vec!["Kratzer".to_string()]);
    assert_eq!(
        archived.document.as_ref().map(|d| d.delivery_number.as_str()),
        Some("LS-1001")
    );
    assert!(archived
        .driver
        .as_ref()
        .is_some_and(|d| d.under_reserve && !d.signature_data_url.is_empty()));

    let submitted_list = store
        .get_by_status(ReportStatus::Submitted)
        .await
        .expect("status query failed");
    assert_eq!(submitted_list.len(), 1);
    assert!(store
        .get_by_status(ReportStatus::Draft)
        .await
        .expect("status query failed")
        .is_empty());
}

#[tokio::test]
async fn test_autosaved_draft_is_replaced_by_the_submitted_record() {
    let (store, _dir) = create_test_store();
    let mut wizard = Wizard::new();
    wizard.start_new();
    wizard.capture_document(photo_data_url());

    // Mid-session snapshot, as the debounced auto-save would write it
    store.save(&wizard.report).await.expect("draft save failed");
    let drafts = store
        .get_by_status(ReportStatus::Draft)
        .await
        .expect("status query failed");
    assert_eq!(drafts.len(), 1);

    wizard.capture_damage_photo(photo_data_url(), None);
    wizard.set_signature(signature_data_url());
    wizard.report.driver_mut().name = "Max Muster".to_string();
    wizard.report.employee_name = "Anna Schmidt".to_string();

    let submitted = wizard.finalize();
    store.save(&submitted).await.expect("submit save failed");

    // Same id, so the upsert replaces the draft instead of adding a row
    assert_eq!(store.count().await.expect("count failed"), 1);
    let archived = store
        .get(&submitted.id)
        .await
        .expect("get failed")
        .expect("record must exist");
    assert_eq!(archived.status, ReportStatus::Submitted);
    assert_eq!(archived.damages.len(), 1);
}

#[tokio::test]
async fn test_submitted_report_rejects_editing_but_allows_viewing() {
    let (store, _dir) = create_test_store();
    let mut wizard = Wizard::new();

    let submitted = complete_session(&mut wizard);
    store.save(&submitted).await.expect("save failed");

    let archived = store
        .get(&submitted.id)
        .await
        .expect("get failed")
        .expect("record must exist");

    let mut wizard = Wizard::new();
    assert_eq!(
        wizard.load_for_edit(archived.clone()),
        Err(WizardError::ReportSubmitted)
    );

    wizard.load_for_view(archived);
    assert_eq!(wizard.step, WizardStep::ViewReport);
}

#[tokio::test]
async fn test_delete_removes_the_record() {
    let (store, _dir) = create_test_store();
    let mut wizard = Wizard::new();

    let submitted = complete_session(&mut wizard);
    store.save(&submitted).await.expect("save failed");
    assert_eq!(store.count().await.expect("count failed"), 1);

    store.delete(&submitted.id).await.expect("delete failed");
    assert_eq!(store.count().await.expect("count failed"), 0);
    assert!(store
        .get(&submitted.id)
        .await
        .expect("get failed")
        .is_none());
}

#[tokio::test]
async fn test_export_import_moves_reports_between_stores() {
    let (source, _src_dir) = create_test_store();
    let mut wizard = Wizard::new();
    let submitted = complete_session(&mut wizard);
    source.save(&submitted).await.expect("save failed");

    let json = source.export_json().await.expect("export failed");

    let (target, _dst_dir) = create_test_store();
    let imported = target.import_json(&json).await.expect("import failed");
    assert_eq!(imported, 1);

    let copy = target
        .get(&submitted.id)
        .await
        .expect("get failed")
        .expect("record must exist");
    assert_eq!(copy, submitted);
}

#[tokio::test]
async fn test_submitted_report_exports_as_pdf() {
    let mut wizard = Wizard::new();
    let submitted = complete_session(&mut wizard);

    let dir = TempDir::new().expect("Failed to create temp dir");
    let path = tokio::task::spawn_blocking({
        let report = submitted.clone();
        let out = dir.path().to_path_buf();
        move || generate_report_pdf(&report, &out)
    })
    .await
    .expect("task panicked")
    .expect("PDF generation failed");

    let name = path.file_name().and_then(|n| n.to_str()).unwrap_or("");
    assert!(name.starts_with(&format!("Bericht_{}_", submitted.id)));
    let bytes = std::fs::read(&path).expect("PDF not written");
    assert!(bytes.starts_with(b"%PDF-"));
}
