pub mod capture;
pub mod config;
pub mod pdf;
pub mod report;
pub mod store;
pub mod ui;
pub mod util;

pub use capture::{CameraCapture, CaptureError, SignaturePad};
pub use config::{Config, StorageBackend};
pub use pdf::{generate_report_pdf, PdfError};
pub use report::{
    DamageRecord, DocumentData, DriverData, InspectionReport, ReportStatus, Severity, Wizard,
    WizardStep,
};
pub use store::{
    Database, LocalReportStore, PreferenceStore, RemoteReportStore, ReportStore, StoreError,
};
pub use ui::App;
