mod damage_log;
mod dashboard;
mod dialogs;
mod driver_signature;
mod report_view;
mod scan_document;
mod status_bar;
mod text_input;

pub use damage_log::{DamageFocus, DamageLogState, PhotoTarget};
pub use dashboard::DashboardState;
pub use dialogs::{centered_rect, ConfirmContext, ConfirmDialogState, ErrorDialogState};
pub use driver_signature::{DriverFocus, DriverSignatureState};
pub use report_view::ReportViewState;
pub use scan_document::{ScanDocumentState, ScanFocus};
pub use status_bar::{render_key_hints, step_label, StatusBar};
pub use text_input::TextInputState;
