use std::path::PathBuf;

use crate::report::InspectionReport;

/// Application-level events delivered to the main loop from spawned tasks
#[derive(Debug)]
pub enum AppEvent {
    /// Dashboard report list finished loading
    ReportsLoaded(Vec<InspectionReport>),

    /// Dashboard report list could not be loaded
    ReportsLoadFailed(String),

    /// A report was deleted from the store
    ReportDeleted(String),

    /// Report deletion failed
    DeleteFailed(String),

    /// Final submit save completed for the given report id
    SubmitCompleted(String),

    /// Final submit save failed; the wizard stays on the summary
    SubmitFailed(String),

    /// PDF export finished
    PdfExported(PathBuf),

    /// PDF export failed
    PdfFailed(String),

    /// Generic error to surface in the error dialog
    Error(String),

    /// Request to quit the application
    Quit,
}
