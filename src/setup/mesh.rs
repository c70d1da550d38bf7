//! Global mesh configuration
//!
//! Sets the global size and element order, scopes a tetrahedrons method
//! to every unsuppressed body, and optionally refines the tagged contact
//! faces with a local sizing. Control setup runs inside one batch scope;
//! mesh generation runs after it so the host can track progress live.

use log::{info, warn};
use serde::Serialize;

use crate::config::MeshConfig;
use crate::contact::naming;
use crate::error::Result;
use crate::host::{
    with_batch, BatchScope, ElementOrder, FaceId, GeometryModel, MeshMethodKind, MeshSettings,
    SelectionStore,
};

/// Name of the body method this tool owns
pub const BODY_METHOD_NAME: &str = "Global_Tetrahedrons";

/// Summary of one mesh configuration pass
#[derive(Debug, Clone, Serialize)]
pub struct MeshOutcome {
    /// Global element size pushed to the host, in mm
    pub element_size_mm: f64,

    /// Whether quadratic elements were requested
    pub quadratic: bool,

    /// Bodies the tetrahedrons method was scoped to
    pub method_bodies: usize,

    /// Faces covered by the contact refinement sizing
    pub refined_faces: usize,

    /// Whether mesh generation ran
    pub generated: bool,
}

/// Name of the refinement sizing for a given factor
fn sizing_name(refinement_factor: f64) -> String {
    format!("Contact_Refinement_x{}", refinement_factor)
}

/// Union of face ids from contact-tagged selections, first-seen order
///
/// Accepts every known role spelling, target side included, so the
/// refinement covers both halves of each pairing.
fn tagged_contact_faces(selections: &[crate::host::NamedSelection]) -> Vec<FaceId> {
    let mut faces = Vec::new();
    for ns in selections {
        let tagged = naming::parse_contact_tag(&ns.name)
            .map(|tag| naming::is_known_role(&tag.role))
            .unwrap_or(false);
        if !tagged {
            continue;
        }
        for &face in &ns.faces {
            if !faces.contains(&face) {
                faces.push(face);
            }
        }
    }
    faces
}

/// Configure the global mesh and optionally generate it
pub fn configure_mesh<H>(host: &mut H, config: &MeshConfig) -> Result<MeshOutcome>
where
    H: GeometryModel + SelectionStore + MeshSettings + BatchScope,
{
    let bodies = host.bodies()?;
    let selections = host.named_selections()?;

    let body_ids: Vec<_> = bodies
        .iter()
        .filter(|b| !b.suppressed)
        .map(|b| b.id)
        .collect();

    let refine_faces = if config.refine_contacts {
        tagged_contact_faces(&selections)
    } else {
        Vec::new()
    };

    with_batch(host, |h| {
        info!("Setting global element size: {} mm", config.element_size_mm);
        h.set_element_size(config.element_size_mm)?;
        h.set_element_order(if config.quadratic {
            ElementOrder::Quadratic
        } else {
            ElementOrder::Linear
        })?;

        if body_ids.is_empty() {
            warn!("No unsuppressed bodies found; skipping body method");
        } else {
            h.delete_mesh_control(BODY_METHOD_NAME)?;
            h.add_mesh_method(BODY_METHOD_NAME, &body_ids, MeshMethodKind::Tetrahedrons)?;
            info!("Applied {} to {} bodies", BODY_METHOD_NAME, body_ids.len());
        }

        if config.refine_contacts {
            if refine_faces.is_empty() {
                warn!("No contact-tagged selections found; skipping refinement sizing");
            } else {
                let name = sizing_name(config.refinement_factor);
                let size = config.element_size_mm * config.refinement_factor;
                h.delete_mesh_control(&name)?;
                h.add_mesh_sizing(&name, &refine_faces, size)?;
                info!(
                    "Applied {} ({} mm) to {} faces",
                    name,
                    size,
                    refine_faces.len()
                );
            }
        }
        Ok(())
    })?;

    let generated = if config.generate {
        info!("Generating mesh");
        host.generate_mesh()?;
        true
    } else {
        false
    };

    Ok(MeshOutcome {
        element_size_mm: config.element_size_mm,
        quadratic: config.quadratic,
        method_bodies: body_ids.len(),
        refined_faces: refine_faces.len(),
        generated,
    })
}
