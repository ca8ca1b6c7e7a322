//! Working report: data model, wizard state machine, draft auto-save

mod autosave;
mod model;
mod wizard;

pub use autosave::{AutosaveScheduler, AUTOSAVE_DELAY};
pub use model::{
    DamageRecord, DocumentData, DriverData, InspectionReport, ReportStatus, Severity, DAMAGE_TYPES,
};
pub use wizard::{Wizard, WizardError, WizardStep};
