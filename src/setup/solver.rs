//! Solver step and resource configuration
//!
//! Pushes the step controls onto the analysis and requests a
//! distributed-solve core count. The core count lives in the
//! application-level solve settings and is applied first, outside any
//! batch; hosts routinely refuse it (version or permission differences),
//! so a refusal there downgrades to a warning and the step continues.
//!
//! Triggering the solve itself is out of scope here.

use log::{info, warn};
use serde::Serialize;

use crate::config::SolverConfig;
use crate::error::{Result, SetupError};
use crate::host::{with_batch, AnalysisInfo, BatchScope, SolverSettings};

/// Summary of one solver configuration pass
#[derive(Debug, Clone, Serialize)]
pub struct SolverOutcome {
    /// Analysis the controls were applied to
    pub analysis: String,

    /// Core count requested
    pub cores: u32,

    /// False when the host refused the core count
    pub cores_applied: bool,

    /// Number of load steps configured
    pub number_of_steps: u32,

    /// Whether large deflection was enabled
    pub large_deflection: bool,
}

/// Apply the solver settings to the first analysis system
pub fn configure_solver<H>(host: &mut H, config: &SolverConfig) -> Result<SolverOutcome>
where
    H: AnalysisInfo + SolverSettings + BatchScope,
{
    let analysis = host.analysis_name().ok_or_else(|| {
        SetupError::MissingPrerequisite("no analysis system in the project".to_string())
    })?;

    info!("Requesting {} solver cores", config.cores);
    let cores_applied = match host.set_solver_cores(config.cores) {
        Ok(()) => true,
        Err(e) => {
            warn!("Host refused solver core count: {}", e);
            false
        }
    };

    let controls = config.step_controls();
    info!(
        "Configuring analysis '{}': {} step(s), large deflection {}, auto time stepping {}",
        analysis, controls.number_of_steps, controls.large_deflection, controls.auto_time_stepping
    );
    with_batch(host, |h| h.apply_step_controls(&controls))?;

    Ok(SolverOutcome {
        analysis,
        cores: config.cores,
        cores_applied,
        number_of_steps: config.number_of_steps,
        large_deflection: config.large_deflection,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::InMemoryHost;

    #[test]
    fn test_applies_controls_and_cores() {
        let mut host = InMemoryHost::with_analysis("Static Structural");
        let outcome = configure_solver(&mut host, &SolverConfig::default()).unwrap();

        assert_eq!(outcome.analysis, "Static Structural");
        assert!(outcome.cores_applied);
        assert_eq!(host.solver_cores(), Some(6));

        let controls = host.analysis().unwrap().step_controls.clone().unwrap();
        assert!(controls.large_deflection);
        assert_eq!(controls.number_of_steps, 1);
        assert_eq!(controls.step_end_times, vec![1.0]);
        assert!(controls.auto_time_stepping);
        assert_eq!(controls.initial_time_step, 0.05);
        assert_eq!(controls.minimum_time_step, 1.0e-4);
        assert_eq!(controls.maximum_time_step, 0.1);
    }

    #[test]
    fn test_requires_analysis() {
        let mut host = InMemoryHost::new();
        let err = configure_solver(&mut host, &SolverConfig::default()).unwrap_err();
        assert!(matches!(err, SetupError::MissingPrerequisite(_)));
    }

    #[test]
    fn test_core_refusal_is_not_fatal() {
        let mut host = InMemoryHost::with_analysis("Static Structural");
        host.fail_on("set_solver_cores");

        let outcome = configure_solver(&mut host, &SolverConfig::default()).unwrap();
        assert!(!outcome.cores_applied);
        assert_eq!(host.solver_cores(), None);
        // Step controls still landed
        assert!(host.analysis().unwrap().step_controls.is_some());
    }

    #[test]
    fn test_multi_step_end_times() {
        let mut host = InMemoryHost::with_analysis("Static Structural");
        let config = SolverConfig {
            number_of_steps: 2,
            step_end_times: vec![0.5, 1.0],
            ..SolverConfig::default()
        };
        configure_solver(&mut host, &config).unwrap();

        let controls = host.analysis().unwrap().step_controls.clone().unwrap();
        assert_eq!(controls.number_of_steps, 2);
        assert_eq!(controls.step_end_times, vec![0.5, 1.0]);
    }
}
