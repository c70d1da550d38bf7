//! File formats for model snapshots, run reports, and previews

pub mod json;
pub mod report;
pub mod vtu;

pub use json::{read_model_snapshot, write_model_snapshot};
pub use report::{RunReport, StepDetail, StepReport, StepStatus};
pub use vtu::write_selection_preview;
