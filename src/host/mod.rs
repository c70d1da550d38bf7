//! Host session adapter
//!
//! All communication with the simulation host goes through the narrow
//! capability traits in this module. Each trait maps to one store of the
//! host session (geometry, selections, connections, mesh, analysis) and
//! exposes only the calls the setup tools actually make.
//!
//! Two rules shape the surface:
//!
//! - Enumeration methods return owned snapshots (`Vec` of plain values),
//!   never live handles. A tool that wants to mutate first takes a
//!   snapshot, plans against it, then issues creates and deletes. This
//!   makes iterate-while-deleting bugs unrepresentable.
//! - Deletion by name removes every object carrying that name and is a
//!   no-op when there is none. Deletion by id is strict and faults on an
//!   unknown handle.

pub mod memory;
pub mod types;

pub use memory::InMemoryHost;
pub use types::{
    Axis, BodyId, BodyInfo, ContactBehavior, ContactGroupId, ContactGroupInfo, ContactPairSpec,
    ContactToolResult, ElementOrder, FaceId, FaceInfo, MeshMethodKind, NamedSelection, Point,
    StepControls, SupportId,
};

use crate::error::Result;

/// Read access to the geometry of the active model
pub trait GeometryModel {
    /// Snapshot of every face with its centroid, in host traversal order
    fn faces(&self) -> Result<Vec<FaceInfo>>;

    /// Snapshot of every body in the model tree
    fn bodies(&self) -> Result<Vec<BodyInfo>>;
}

/// The named selection store of the model
pub trait SelectionStore {
    /// Snapshot of all named selections, in outline order
    fn named_selections(&self) -> Result<Vec<NamedSelection>>;

    /// Create a named selection scoped to the given faces
    fn create_named_selection(&mut self, name: &str, faces: &[FaceId]) -> Result<()>;

    /// Delete every named selection carrying this name; no-op when absent
    fn delete_named_selection(&mut self, name: &str) -> Result<()>;
}

/// The connections store holding contact groups and their pairs
pub trait ConnectionStore {
    /// Snapshot of all contact groups, in outline order
    fn contact_groups(&self) -> Result<Vec<ContactGroupInfo>>;

    /// Create an empty contact group and return its handle
    fn add_contact_group(&mut self, name: &str) -> Result<ContactGroupId>;

    /// Delete a group and every pair inside it; faults on an unknown handle
    fn delete_contact_group(&mut self, group: ContactGroupId) -> Result<()>;

    /// Create one contact pair inside an existing group
    fn add_contact_pair(&mut self, group: ContactGroupId, pair: &ContactPairSpec) -> Result<()>;
}

/// Global mesh controls of the model
pub trait MeshSettings {
    /// Set the global element size in millimeters
    fn set_element_size(&mut self, size_mm: f64) -> Result<()>;

    /// Set the global element order
    fn set_element_order(&mut self, order: ElementOrder) -> Result<()>;

    /// Names of all mesh child controls (methods, sizings), in outline order
    fn mesh_controls(&self) -> Result<Vec<String>>;

    /// Delete every mesh control carrying this name; no-op when absent
    fn delete_mesh_control(&mut self, name: &str) -> Result<()>;

    /// Add a mesh method scoped to the given bodies
    fn add_mesh_method(
        &mut self,
        name: &str,
        bodies: &[BodyId],
        kind: MeshMethodKind,
    ) -> Result<()>;

    /// Add a local face sizing control
    fn add_mesh_sizing(&mut self, name: &str, faces: &[FaceId], size_mm: f64) -> Result<()>;

    /// Generate the mesh with the current controls
    ///
    /// Must be issued outside any batch scope; the host defers regeneration
    /// queued inside a batch until an unspecified later flush.
    fn generate_mesh(&mut self) -> Result<()>;
}

/// Presence of an analysis system in the project
pub trait AnalysisInfo {
    /// Name of the first analysis system, or `None` when the project has none
    fn analysis_name(&self) -> Option<String>;
}

/// Solution settings of the first analysis system
pub trait SolverSettings {
    /// Push the full set of step controls onto the analysis
    fn apply_step_controls(&mut self, controls: &StepControls) -> Result<()>;

    /// Request a distributed-solve core count; applies to the whole session
    fn set_solver_cores(&mut self, cores: u32) -> Result<()>;
}

/// Supports and loads attached to the first analysis system
pub trait BoundaryConditions {
    /// Names of all boundary condition objects, in outline order
    fn boundary_conditions(&self) -> Result<Vec<String>>;

    /// Delete every boundary condition carrying this name; no-op when absent
    fn delete_boundary_condition(&mut self, name: &str) -> Result<()>;

    /// Add a fixed support over the given faces
    fn add_fixed_support(&mut self, name: &str, faces: &[FaceId]) -> Result<()>;

    /// Add a displacement support over the given faces and return its handle
    ///
    /// Components start out free; use [`set_displacement_components`] to
    /// prescribe them.
    ///
    /// [`set_displacement_components`]: BoundaryConditions::set_displacement_components
    fn add_displacement(&mut self, name: &str, faces: &[FaceId]) -> Result<SupportId>;

    /// Prescribe the X/Y/Z components of a displacement support, in mm
    ///
    /// Must be issued outside any batch scope. The host does not materialize
    /// the component fields of a freshly created displacement until the
    /// enclosing batch ends, so a write from inside the batch dereferences a
    /// null field and faults.
    fn set_displacement_components(
        &mut self,
        support: SupportId,
        components_mm: [f64; 3],
    ) -> Result<()>;
}

/// Result objects under the solution of the first analysis system
pub trait ResultObjects {
    /// Add a total deformation result
    fn add_total_deformation(&mut self, name: &str) -> Result<()>;

    /// Add a directional deformation result along one axis
    fn add_directional_deformation(&mut self, name: &str, axis: Axis) -> Result<()>;

    /// Add an equivalent (von Mises) stress result
    fn add_equivalent_stress(&mut self, name: &str) -> Result<()>;

    /// Add a contact tool carrying the given sub-results
    fn add_contact_tool(&mut self, name: &str, results: &[ContactToolResult]) -> Result<()>;

    /// Add a force reaction probe bound to a boundary condition by name
    fn add_force_reaction(
        &mut self,
        name: &str,
        boundary_condition: &str,
        axis: Axis,
    ) -> Result<()>;

    /// Evaluate every result object currently present
    fn evaluate_all_results(&mut self) -> Result<()>;
}

/// Suspension of host-side recomputation while a tool issues bulk edits
///
/// Scopes nest; the host resumes recomputation when the outermost scope
/// ends. Prefer [`with_batch`], which guarantees the scope is closed even
/// when the closure fails.
pub trait BatchScope {
    /// Enter a batch scope, suspending tree updates and solver checks
    fn begin_batch(&mut self);

    /// Leave the innermost batch scope
    fn end_batch(&mut self);
}

/// The full capability set of a live host session
///
/// Blanket-implemented for any type providing all capabilities, so an
/// adapter never implements this trait directly. Tools that only need a
/// slice of the surface should bound on the individual traits instead.
pub trait HostSession:
    GeometryModel
    + SelectionStore
    + ConnectionStore
    + MeshSettings
    + AnalysisInfo
    + SolverSettings
    + BoundaryConditions
    + ResultObjects
    + BatchScope
{
}

impl<T> HostSession for T where
    T: GeometryModel
        + SelectionStore
        + ConnectionStore
        + MeshSettings
        + AnalysisInfo
        + SolverSettings
        + BoundaryConditions
        + ResultObjects
        + BatchScope
{
}

/// Run a closure inside a batch scope
///
/// The scope is closed whether the closure succeeds or fails, so a failed
/// bulk edit never leaves the host with recomputation suspended.
pub fn with_batch<H, T, F>(host: &mut H, f: F) -> Result<T>
where
    H: BatchScope + ?Sized,
    F: FnOnce(&mut H) -> Result<T>,
{
    host.begin_batch();
    let result = f(host);
    host.end_batch();
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SetupError;

    #[test]
    fn test_with_batch_closes_scope_on_error() {
        let mut host = InMemoryHost::new();
        let result: Result<()> = with_batch(&mut host, |_| {
            Err(SetupError::HostFault("simulated".to_string()))
        });
        assert!(result.is_err());
        assert_eq!(host.batch_depth(), 0);
    }

    #[test]
    fn test_with_batch_nests() {
        let mut host = InMemoryHost::new();
        let depth = with_batch(&mut host, |h| {
            with_batch(h, |h2| Ok(h2.batch_depth()))
        })
        .unwrap();
        assert_eq!(depth, 2);
        assert_eq!(host.batch_depth(), 0);
    }
}
