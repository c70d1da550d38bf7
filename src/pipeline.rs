//! End-to-end setup pipeline
//!
//! Runs the individual setup tools in a fixed order against one host
//! session and collects a per-step report. A step that reports a
//! missing prerequisite is skipped and the run continues; a host fault
//! halts the run and the remaining steps are recorded as not run.

use crate::config::SetupConfig;
use crate::contact::build_contact_groups;
use crate::error::{Result, SetupError};
use crate::host::HostSession;
use crate::io::report::{RunReport, StepDetail, StepReport};
use crate::selection::select_extremum_faces;
use crate::setup::{
    apply_boundary_conditions, configure_mesh, configure_solver, create_result_objects,
};

/// Pipeline step names in execution order
pub const STEP_NAMES: [&str; 6] = ["selection", "contact", "mesh", "boundary", "solver", "post"];

/// Which pipeline steps to run
///
/// All steps are enabled by default; the CLI maps its `--skip-*` flags
/// onto this.
#[derive(Debug, Clone, Copy)]
pub struct StepSet {
    pub selection: bool,
    pub contact: bool,
    pub mesh: bool,
    pub boundary: bool,
    pub solver: bool,
    pub post: bool,
}

impl Default for StepSet {
    fn default() -> Self {
        Self {
            selection: true,
            contact: true,
            mesh: true,
            boundary: true,
            solver: true,
            post: true,
        }
    }
}

impl StepSet {
    /// All steps enabled
    pub fn all() -> Self {
        Self::default()
    }

    fn enabled(&self, step: &str) -> bool {
        match step {
            "selection" => self.selection,
            "contact" => self.contact,
            "mesh" => self.mesh,
            "boundary" => self.boundary,
            "solver" => self.solver,
            "post" => self.post,
            _ => false,
        }
    }
}

/// Run the full setup pipeline against a host session
///
/// Always returns a report with one entry per step, even when the run
/// halts early. Callers decide how to surface a failed run; see
/// [`RunReport::failed`].
pub fn run_setup<H>(host: &mut H, config: &SetupConfig, steps: &StepSet) -> RunReport
where
    H: HostSession,
{
    let axis = config.selection.axis;

    let mut stages: Vec<(&'static str, Box<dyn FnOnce(&mut H) -> Result<StepDetail> + '_>)> = vec![
        (
            "selection",
            Box::new(|h: &mut H| {
                select_extremum_faces(h, &config.selection).map(StepDetail::Selection)
            }),
        ),
        (
            "contact",
            Box::new(|h: &mut H| {
                build_contact_groups(h, &config.contact).map(StepDetail::Contact)
            }),
        ),
        (
            "mesh",
            Box::new(|h: &mut H| configure_mesh(h, &config.mesh).map(StepDetail::Mesh)),
        ),
        (
            "boundary",
            Box::new(move |h: &mut H| {
                apply_boundary_conditions(h, &config.boundary, axis).map(StepDetail::Boundary)
            }),
        ),
        (
            "solver",
            Box::new(|h: &mut H| configure_solver(h, &config.solver).map(StepDetail::Solver)),
        ),
        (
            "post",
            Box::new(move |h: &mut H| {
                create_result_objects(h, &config.post, axis).map(StepDetail::Post)
            }),
        ),
    ];

    let mut report = RunReport::new();
    let mut halted = false;

    for (name, stage) in stages.drain(..) {
        if halted {
            report.push(StepReport::not_run(name));
            continue;
        }
        if !steps.enabled(name) {
            log::info!("Step '{}' is disabled, skipping", name);
            report.push(StepReport::skipped(name, "step disabled".to_string()));
            continue;
        }
        match stage(host) {
            Ok(detail) => {
                report.push(StepReport::succeeded(name, detail));
            }
            Err(SetupError::MissingPrerequisite(msg)) => {
                log::warn!("Skipping step '{}': {}", name, msg);
                report.push(StepReport::skipped(name, msg));
            }
            Err(e) => {
                log::error!("Step '{}' failed: {}", name, e);
                report.push(StepReport::failed(name, e.to_string()));
                halted = true;
            }
        }
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::InMemoryHost;
    use crate::io::report::StepStatus;

    fn make_host() -> InMemoryHost {
        let mut host = InMemoryHost::with_analysis("Static Structural");
        host.add_face(1, 0.0, 0.0, 0.0);
        host.add_face(2, 10.0, 0.0, 0.0);
        host.add_face(3, 0.0, 0.0, 40.0);
        host.add_face(4, 10.0, 0.0, 40.0);
        host.add_body(1, "Housing", false);
        host.add_selection("[Cont]_[Target]_[7]", &[1, 2]);
        host.add_selection("[Cont]_[Contact]_[7]", &[3, 4]);
        host
    }

    fn statuses(report: &RunReport) -> Vec<StepStatus> {
        report.steps.iter().map(|s| s.status).collect()
    }

    #[test]
    fn test_full_run_succeeds() {
        let mut host = make_host();
        let config = SetupConfig::default();
        let report = run_setup(&mut host, &config, &StepSet::all());

        assert_eq!(report.steps.len(), STEP_NAMES.len());
        assert!(!report.failed());
        assert!(report
            .steps
            .iter()
            .all(|s| s.status == StepStatus::Succeeded));
    }

    #[test]
    fn test_steps_appear_in_order() {
        let mut host = make_host();
        let config = SetupConfig::default();
        let report = run_setup(&mut host, &config, &StepSet::all());

        let names: Vec<&str> = report.steps.iter().map(|s| s.step.as_str()).collect();
        assert_eq!(names, STEP_NAMES.to_vec());
    }

    #[test]
    fn test_disabled_step_is_skipped() {
        let mut host = make_host();
        let config = SetupConfig::default();
        let steps = StepSet {
            mesh: false,
            ..StepSet::all()
        };
        let report = run_setup(&mut host, &config, &steps);

        assert_eq!(report.steps[2].step, "mesh");
        assert_eq!(report.steps[2].status, StepStatus::Skipped);
        assert_eq!(report.steps[5].status, StepStatus::Succeeded);
        assert!(host.mesh().controls.is_empty());
    }

    #[test]
    fn test_missing_analysis_skips_analysis_steps() {
        let mut host = InMemoryHost::new();
        host.add_face(1, 0.0, 0.0, 0.0);
        host.add_face(2, 0.0, 0.0, 40.0);
        host.add_body(1, "Housing", false);
        host.add_selection("[Cont]_[Target]_[7]", &[1]);
        host.add_selection("[Cont]_[Contact]_[7]", &[2]);

        let config = SetupConfig::default();
        let report = run_setup(&mut host, &config, &StepSet::all());

        assert!(!report.failed());
        assert_eq!(
            statuses(&report),
            vec![
                StepStatus::Succeeded,
                StepStatus::Succeeded,
                StepStatus::Succeeded,
                StepStatus::Skipped,
                StepStatus::Skipped,
                StepStatus::Skipped,
            ]
        );
    }

    #[test]
    fn test_host_fault_halts_run() {
        let mut host = make_host();
        host.fail_on("add_contact_group");
        let config = SetupConfig::default();
        let report = run_setup(&mut host, &config, &StepSet::all());

        assert!(report.failed());
        assert_eq!(
            statuses(&report),
            vec![
                StepStatus::Succeeded,
                StepStatus::Failed,
                StepStatus::NotRun,
                StepStatus::NotRun,
                StepStatus::NotRun,
                StepStatus::NotRun,
            ]
        );
        // batch scope is closed even though the step failed mid-batch
        assert_eq!(host.batch_depth(), 0);
    }

    #[test]
    fn test_failed_step_records_message() {
        let mut host = make_host();
        host.fail_on("generate_mesh");
        let config = SetupConfig::default();
        let report = run_setup(&mut host, &config, &StepSet::all());

        let mesh = &report.steps[2];
        assert_eq!(mesh.status, StepStatus::Failed);
        assert!(mesh
            .message
            .as_deref()
            .unwrap()
            .contains("generate_mesh"));
    }
}
