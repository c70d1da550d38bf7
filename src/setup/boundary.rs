//! Automatic boundary conditions
//!
//! Scans the named selections and turns every `Fixed`-named selection
//! into a fixed support and every `Disp`-named one into a prescribed
//! displacement along the scan axis. Supports created here carry the
//! `AutoFixed_`/`AutoDisp_` prefixes so a rerun can clear exactly its
//! own objects and leave hand-made ones alone.
//!
//! The clear pass runs inside a batch scope. The create pass must not:
//! writing displacement components inside a batch faults on the host, so
//! creation and component writes happen unbatched.

use log::{info, warn};
use serde::Serialize;

use crate::config::BoundaryConfig;
use crate::error::{Result, SetupError};
use crate::host::{
    with_batch, AnalysisInfo, Axis, BatchScope, BoundaryConditions, SelectionStore,
};

/// Prefix of auto-created fixed supports
pub const FIXED_PREFIX: &str = "AutoFixed_";

/// Prefix of auto-created displacements
pub const DISP_PREFIX: &str = "AutoDisp_";

/// Summary of one boundary condition pass
#[derive(Debug, Clone, Serialize)]
pub struct BoundaryOutcome {
    /// Axis the displacement acts along
    pub axis: Axis,

    /// Signed displacement value pushed to the host, in mm
    pub applied_mm: f64,

    /// Previously auto-created supports removed
    pub cleared: usize,

    /// Fixed supports created
    pub fixed_created: usize,

    /// Displacements created
    pub displacements_created: usize,
}

fn axis_components(axis: Axis, value: f64) -> [f64; 3] {
    match axis {
        Axis::X => [value, 0.0, 0.0],
        Axis::Y => [0.0, value, 0.0],
        Axis::Z => [0.0, 0.0, value],
    }
}

/// Replace the auto-created supports from the current named selections
///
/// A selection whose name contains `Fixed` (any case) becomes a fixed
/// support; otherwise one containing `Disp` becomes a displacement with
/// the signed magnitude prescribed along `axis` and the other two
/// components pinned to zero. Selections without faces are passed over.
pub fn apply_boundary_conditions<H>(
    host: &mut H,
    config: &BoundaryConfig,
    axis: Axis,
) -> Result<BoundaryOutcome>
where
    H: AnalysisInfo + SelectionStore + BoundaryConditions + BatchScope,
{
    let analysis = host.analysis_name().ok_or_else(|| {
        SetupError::MissingPrerequisite("no analysis system in the project".to_string())
    })?;
    info!("Applying boundary conditions to analysis '{}'", analysis);

    let existing = host.boundary_conditions()?;
    let stale: Vec<_> = existing
        .into_iter()
        .filter(|name| name.starts_with(FIXED_PREFIX) || name.starts_with(DISP_PREFIX))
        .collect();
    with_batch(host, |h| {
        for name in &stale {
            h.delete_boundary_condition(name)?;
        }
        Ok(())
    })?;
    if !stale.is_empty() {
        info!("Cleared {} previously auto-created supports", stale.len());
    }

    let applied_mm = config.signed_displacement();
    let components = axis_components(axis, applied_mm);
    info!("Target {} displacement: {} mm", axis, applied_mm);

    let mut fixed_created = 0;
    let mut displacements_created = 0;

    for ns in host.named_selections()? {
        if ns.faces.is_empty() {
            continue;
        }
        let lower = ns.name.to_lowercase();
        if lower.contains("fixed") {
            let name = format!("{}{}", FIXED_PREFIX, ns.name);
            host.add_fixed_support(&name, &ns.faces)?;
            fixed_created += 1;
            info!("Created fixed support: {}", name);
        } else if lower.contains("disp") {
            let name = format!("{}{}", DISP_PREFIX, ns.name);
            let support = host.add_displacement(&name, &ns.faces)?;
            host.set_displacement_components(support, components)?;
            displacements_created += 1;
            info!("Created displacement: {}", name);
        }
    }

    if fixed_created == 0 && displacements_created == 0 {
        warn!("No selection names matched Fixed or Disp; nothing created");
    } else {
        info!(
            "Created {} fixed support(s), {} displacement(s)",
            fixed_created, displacements_created
        );
    }

    Ok(BoundaryOutcome {
        axis,
        applied_mm,
        cleared: stale.len(),
        fixed_created,
        displacements_created,
    })
}
