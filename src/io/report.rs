//! Run report export and console summary
//!
//! A report records what each pipeline step did, in order, with enough
//! counts to audit a run without opening the host. Exports to pretty
//! JSON; `print_summary` gives the console rendition.

use serde::Serialize;
use std::path::Path;

use crate::contact::ContactOutcome;
use crate::error::{Result, SetupError};
use crate::selection::SelectionOutcome;
use crate::setup::{BoundaryOutcome, MeshOutcome, PostOutcome, SolverOutcome};

/// Terminal state of one pipeline step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StepStatus {
    /// Ran to completion
    Succeeded,
    /// Prerequisite missing; later steps still ran
    Skipped,
    /// Host fault; the run stopped here
    Failed,
    /// Never reached because an earlier step failed
    NotRun,
}

impl StepStatus {
    fn label(&self) -> &'static str {
        match self {
            StepStatus::Succeeded => "ok",
            StepStatus::Skipped => "skipped",
            StepStatus::Failed => "FAILED",
            StepStatus::NotRun => "not run",
        }
    }
}

/// Step-specific counts carried by a succeeded step
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StepDetail {
    Selection(SelectionOutcome),
    Contact(ContactOutcome),
    Mesh(MeshOutcome),
    Boundary(BoundaryOutcome),
    Solver(SolverOutcome),
    Post(PostOutcome),
}

impl StepDetail {
    /// One-line rendition for the console summary
    fn summary_line(&self) -> String {
        match self {
            StepDetail::Selection(s) => format!(
                "top {} face(s), bottom {} face(s)",
                s.top.face_count, s.bottom.face_count
            ),
            StepDetail::Contact(c) => format!(
                "{} group(s), {} pair(s), {} skipped",
                c.groups_created,
                c.pairs_created,
                c.skipped.len()
            ),
            StepDetail::Mesh(m) => format!(
                "{} mm over {} body(ies), {} refined face(s)",
                m.element_size_mm, m.method_bodies, m.refined_faces
            ),
            StepDetail::Boundary(b) => format!(
                "{} fixed, {} displacement(s) at {} mm {}",
                b.fixed_created, b.displacements_created, b.applied_mm, b.axis
            ),
            StepDetail::Solver(s) => format!(
                "{} step(s), {} core(s){}",
                s.number_of_steps,
                s.cores,
                if s.cores_applied { "" } else { " (refused)" }
            ),
            StepDetail::Post(p) => format!(
                "{} result(s){}",
                p.results_created.len(),
                if p.evaluated { ", evaluated" } else { "" }
            ),
        }
    }
}

/// Record of one pipeline step
#[derive(Debug, Clone, Serialize)]
pub struct StepReport {
    /// Step name
    pub step: String,

    /// Terminal state
    pub status: StepStatus,

    /// Reason for a skip or failure
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,

    /// Counts from a completed step
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<StepDetail>,
}

impl StepReport {
    pub fn succeeded(step: &str, detail: StepDetail) -> Self {
        Self {
            step: step.to_string(),
            status: StepStatus::Succeeded,
            message: None,
            detail: Some(detail),
        }
    }

    pub fn skipped(step: &str, message: String) -> Self {
        Self {
            step: step.to_string(),
            status: StepStatus::Skipped,
            message: Some(message),
            detail: None,
        }
    }

    pub fn failed(step: &str, message: String) -> Self {
        Self {
            step: step.to_string(),
            status: StepStatus::Failed,
            message: Some(message),
            detail: None,
        }
    }

    pub fn not_run(step: &str) -> Self {
        Self {
            step: step.to_string(),
            status: StepStatus::NotRun,
            message: None,
            detail: None,
        }
    }
}

/// Full record of one pipeline run
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    /// When the run started, RFC 3339
    pub timestamp: String,

    /// Step records, in execution order
    pub steps: Vec<StepReport>,
}

impl RunReport {
    /// Start an empty report stamped with the current time
    pub fn new() -> Self {
        Self {
            timestamp: chrono::Utc::now().to_rfc3339(),
            steps: Vec::new(),
        }
    }

    /// Append a step record
    pub fn push(&mut self, step: StepReport) {
        self.steps.push(step);
    }

    /// Whether any step failed
    pub fn failed(&self) -> bool {
        self.steps.iter().any(|s| s.status == StepStatus::Failed)
    }

    /// Export the report to a pretty JSON file
    pub fn export<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let file = std::fs::File::create(path.as_ref())?;
        serde_json::to_writer_pretty(file, self).map_err(|e| {
            SetupError::ConfigError(format!("Failed to write run report: {}", e))
        })?;
        Ok(())
    }

    /// Print the console summary
    pub fn print_summary(&self) {
        println!("\n{}", "=".repeat(60));
        println!("MODEL SETUP RUN");
        println!("{}", "=".repeat(60));
        println!();
        println!("  Started: {}", self.timestamp);
        println!();

        for step in &self.steps {
            let line = match (&step.detail, &step.message) {
                (Some(detail), _) => detail.summary_line(),
                (None, Some(message)) => message.clone(),
                (None, None) => String::new(),
            };
            println!("  {:<10} {:<8} {}", step.step, step.status.label(), line);
        }

        println!();
        if self.failed() {
            println!("  Run stopped on a host fault; see log for details.");
        } else {
            println!("  Run completed.");
        }
        println!("{}", "=".repeat(60));
    }
}

impl Default for RunReport {
    fn default() -> Self {
        Self::new()
    }
}
