//! Result object creation
//!
//! Adds the standard result set to the solution: deformations, von Mises
//! stress, a contact tool with pressure and sliding distance, and a
//! force reaction probe bound to one of the auto-created supports. No
//! batch scope here: result objects must initialize immediately so the
//! final evaluation sees all of them.

use log::{info, warn};
use serde::Serialize;

use crate::config::PostConfig;
use crate::error::{Result, SetupError};
use crate::host::{AnalysisInfo, Axis, BoundaryConditions, ContactToolResult, ResultObjects};

/// Summary of one result creation pass
#[derive(Debug, Clone, Serialize)]
pub struct PostOutcome {
    /// Result object names created, in creation order
    pub results_created: Vec<String>,

    /// Boundary condition the force probe was bound to, if any
    pub probe_bound_to: Option<String>,

    /// Whether all results were evaluated
    pub evaluated: bool,
}

/// First boundary condition whose name contains the needle, any case
fn find_bc(names: &[String], needle: &str) -> Option<String> {
    names
        .iter()
        .find(|name| name.to_lowercase().contains(needle))
        .cloned()
}

/// Create the configured result objects on the first analysis system
pub fn create_result_objects<H>(
    host: &mut H,
    config: &PostConfig,
    axis: Axis,
) -> Result<PostOutcome>
where
    H: AnalysisInfo + BoundaryConditions + ResultObjects,
{
    let analysis = host.analysis_name().ok_or_else(|| {
        SetupError::MissingPrerequisite("no analysis system in the project".to_string())
    })?;
    info!("Creating result objects on analysis '{}'", analysis);

    let mut created = Vec::new();

    if config.basic_results {
        host.add_total_deformation("Total Deformation")?;
        created.push("Total Deformation".to_string());

        let directional = format!("Directional Deformation ({})", axis);
        host.add_directional_deformation(&directional, axis)?;
        created.push(directional);

        host.add_equivalent_stress("Equivalent Stress (Von-Mises)")?;
        created.push("Equivalent Stress (Von-Mises)".to_string());
    }

    if config.contact_results {
        host.add_contact_tool(
            "Connector Contact Status",
            &[ContactToolResult::Pressure, ContactToolResult::SlidingDistance],
        )?;
        created.push("Connector Contact Status".to_string());
    }

    let mut probe_bound_to = None;
    if config.force_probe {
        let names = host.boundary_conditions()?;
        // The fixed end reads the full reaction; fall back to the driven end.
        let target = find_bc(&names, "autofixed").or_else(|| find_bc(&names, "autodisp"));
        match target {
            Some(bc) => {
                host.add_force_reaction("Insertion Force Probe", &bc, axis)?;
                created.push("Insertion Force Probe".to_string());
                info!("Bound force probe to: {}", bc);
                probe_bound_to = Some(bc);
            }
            None => {
                warn!("No AutoFixed or AutoDisp support found; skipping force probe");
            }
        }
    }

    let evaluated = if config.evaluate {
        info!("Evaluating all results");
        host.evaluate_all_results()?;
        true
    } else {
        false
    };

    Ok(PostOutcome {
        results_created: created,
        probe_bound_to,
        evaluated,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::{FaceId, InMemoryHost};

    fn make_host() -> InMemoryHost {
        let mut host = InMemoryHost::with_analysis("Static Structural");
        host.add_fixed_support("AutoFixed_[BC]_[Fixed]_Bottom Face", &[FaceId(1)])
            .unwrap();
        host.add_displacement("AutoDisp_[BC]_[Disp]_Top Face", &[FaceId(2)])
            .unwrap();
        host
    }

    #[test]
    fn test_creates_full_result_set() {
        let mut host = make_host();
        let outcome = create_result_objects(&mut host, &PostConfig::default(), Axis::Z).unwrap();

        assert_eq!(
            outcome.results_created,
            vec![
                "Total Deformation",
                "Directional Deformation (Z)",
                "Equivalent Stress (Von-Mises)",
                "Connector Contact Status",
                "Insertion Force Probe",
            ]
        );
        assert_eq!(
            outcome.probe_bound_to.as_deref(),
            Some("AutoFixed_[BC]_[Fixed]_Bottom Face")
        );
        assert!(outcome.evaluated);
        assert_eq!(host.analysis().unwrap().evaluate_count, 1);
        assert_eq!(host.analysis().unwrap().results.len(), 5);
    }

    #[test]
    fn test_probe_falls_back_to_displacement() {
        let mut host = InMemoryHost::with_analysis("Static Structural");
        host.add_displacement("AutoDisp_Top", &[FaceId(1)]).unwrap();

        let outcome = create_result_objects(&mut host, &PostConfig::default(), Axis::Z).unwrap();
        assert_eq!(outcome.probe_bound_to.as_deref(), Some("AutoDisp_Top"));
    }

    #[test]
    fn test_probe_skipped_without_auto_supports() {
        let mut host = InMemoryHost::with_analysis("Static Structural");
        host.add_fixed_support("UserClamp", &[FaceId(1)]).unwrap();

        let outcome = create_result_objects(&mut host, &PostConfig::default(), Axis::Z).unwrap();
        assert!(outcome.probe_bound_to.is_none());
        assert!(!outcome
            .results_created
            .contains(&"Insertion Force Probe".to_string()));
        // Everything else still lands, and evaluation still runs
        assert_eq!(outcome.results_created.len(), 4);
        assert!(outcome.evaluated);
    }

    #[test]
    fn test_directional_name_follows_axis() {
        let mut host = make_host();
        let outcome = create_result_objects(&mut host, &PostConfig::default(), Axis::X).unwrap();
        assert!(outcome
            .results_created
            .contains(&"Directional Deformation (X)".to_string()));
    }

    #[test]
    fn test_toggles_disable_everything() {
        let mut host = make_host();
        let config = PostConfig {
            basic_results: false,
            contact_results: false,
            force_probe: false,
            evaluate: false,
        };
        let outcome = create_result_objects(&mut host, &config, Axis::Z).unwrap();

        assert!(outcome.results_created.is_empty());
        assert!(!outcome.evaluated);
        assert_eq!(host.analysis().unwrap().evaluate_count, 0);
    }

    #[test]
    fn test_requires_analysis() {
        let mut host = InMemoryHost::new();
        let err = create_result_objects(&mut host, &PostConfig::default(), Axis::Z).unwrap_err();
        assert!(matches!(err, SetupError::MissingPrerequisite(_)));
    }
}
