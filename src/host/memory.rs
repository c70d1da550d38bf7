//! In-memory host session
//!
//! A complete stand-in for a live host: every capability trait is backed
//! by plain vectors, so tools can be exercised end to end without a
//! running session. Doubles as the model behind offline dry runs.
//!
//! The double is deliberately strict where the real host is strict:
//! id-based deletes fault on unknown handles, result objects require an
//! analysis system, and writing displacement components inside a batch
//! scope faults the same way the host nulls the component field there.

use log::debug;

use crate::error::{Result, SetupError};
use crate::host::types::{
    Axis, BodyId, BodyInfo, ContactGroupId, ContactGroupInfo, ContactPairSpec, ContactToolResult,
    ElementOrder, FaceId, FaceInfo, MeshMethodKind, NamedSelection, StepControls, SupportId,
};
use crate::host::{
    AnalysisInfo, BatchScope, BoundaryConditions, ConnectionStore, GeometryModel, MeshSettings,
    ResultObjects, SelectionStore, SolverSettings,
};

/// A contact group with its pairs, as stored by the host
#[derive(Debug, Clone)]
pub struct StoredGroup {
    pub id: ContactGroupId,
    pub name: String,
    pub pairs: Vec<ContactPairSpec>,
}

/// Kinds of mesh child controls
#[derive(Debug, Clone, PartialEq)]
pub enum MeshControlKind {
    Method {
        bodies: Vec<BodyId>,
        kind: MeshMethodKind,
    },
    Sizing {
        faces: Vec<FaceId>,
        size_mm: f64,
    },
}

/// One mesh child control (method or sizing)
#[derive(Debug, Clone)]
pub struct MeshControl {
    pub name: String,
    pub kind: MeshControlKind,
}

/// Global mesh state of the session
#[derive(Debug, Clone, Default)]
pub struct MeshState {
    pub element_size_mm: Option<f64>,
    pub element_order: Option<ElementOrder>,
    pub controls: Vec<MeshControl>,
    /// Number of completed mesh generations
    pub generate_count: u32,
}

/// Support kinds attached to the analysis
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SupportKind {
    Fixed,
    Displacement,
}

/// A boundary condition object as stored by the host
#[derive(Debug, Clone)]
pub struct StoredSupport {
    pub id: SupportId,
    pub name: String,
    pub kind: SupportKind,
    pub faces: Vec<FaceId>,
    /// Prescribed X/Y/Z components in mm; `None` while still free
    pub components_mm: Option<[f64; 3]>,
}

/// A result object under the solution
#[derive(Debug, Clone)]
pub enum ResultRecord {
    TotalDeformation {
        name: String,
    },
    DirectionalDeformation {
        name: String,
        axis: Axis,
    },
    EquivalentStress {
        name: String,
    },
    ContactTool {
        name: String,
        results: Vec<ContactToolResult>,
    },
    ForceReaction {
        name: String,
        boundary_condition: String,
        axis: Axis,
    },
}

impl ResultRecord {
    /// Outline name of the result object
    pub fn name(&self) -> &str {
        match self {
            ResultRecord::TotalDeformation { name }
            | ResultRecord::DirectionalDeformation { name, .. }
            | ResultRecord::EquivalentStress { name }
            | ResultRecord::ContactTool { name, .. }
            | ResultRecord::ForceReaction { name, .. } => name,
        }
    }
}

/// State of the single analysis system
#[derive(Debug, Clone)]
pub struct AnalysisState {
    pub name: String,
    pub supports: Vec<StoredSupport>,
    pub step_controls: Option<StepControls>,
    pub results: Vec<ResultRecord>,
    /// Number of completed result evaluations
    pub evaluate_count: u32,
}

impl AnalysisState {
    fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            supports: Vec::new(),
            step_controls: None,
            results: Vec::new(),
            evaluate_count: 0,
        }
    }
}

/// In-memory implementation of the full host capability set
#[derive(Debug, Clone, Default)]
pub struct InMemoryHost {
    faces: Vec<FaceInfo>,
    bodies: Vec<BodyInfo>,
    selections: Vec<NamedSelection>,
    groups: Vec<StoredGroup>,
    mesh: MeshState,
    analysis: Option<AnalysisState>,
    solver_cores: Option<u32>,
    batch_depth: u32,
    next_id: u64,
    /// Operation names that fail with a host fault when invoked
    fail_ops: Vec<String>,
}

impl InMemoryHost {
    /// Empty session: no geometry, no analysis system
    pub fn new() -> Self {
        Self::default()
    }

    /// Empty session with one analysis system already present
    pub fn with_analysis(name: &str) -> Self {
        let mut host = Self::new();
        host.set_analysis(name);
        host
    }

    /// Seed a face with its centroid coordinates
    pub fn add_face(&mut self, id: u64, x: f64, y: f64, z: f64) {
        self.faces.push(FaceInfo::new(id, x, y, z));
    }

    /// Seed a body
    pub fn add_body(&mut self, id: u64, name: &str, suppressed: bool) {
        self.bodies.push(BodyInfo {
            id: BodyId(id),
            name: name.to_string(),
            suppressed,
        });
    }

    /// Seed a named selection over the given face ids
    pub fn add_selection(&mut self, name: &str, face_ids: &[u64]) {
        self.selections.push(NamedSelection::new(
            name,
            face_ids.iter().map(|&id| FaceId(id)).collect(),
        ));
    }

    /// Attach an analysis system to the session
    pub fn set_analysis(&mut self, name: &str) {
        self.analysis = Some(AnalysisState::new(name));
    }

    /// Make the named operation fail with a host fault on every call
    pub fn fail_on(&mut self, op: &str) {
        self.fail_ops.push(op.to_string());
    }

    /// Current batch nesting depth
    pub fn batch_depth(&self) -> u32 {
        self.batch_depth
    }

    /// First stored selection with this name
    pub fn selection(&self, name: &str) -> Option<&NamedSelection> {
        self.selections.iter().find(|s| s.name == name)
    }

    /// First stored contact group with this name
    pub fn group(&self, name: &str) -> Option<&StoredGroup> {
        self.groups.iter().find(|g| g.name == name)
    }

    /// Names of all contact groups, in store order
    pub fn group_names(&self) -> Vec<String> {
        self.groups.iter().map(|g| g.name.clone()).collect()
    }

    /// Global mesh state
    pub fn mesh(&self) -> &MeshState {
        &self.mesh
    }

    /// Analysis state, when an analysis system exists
    pub fn analysis(&self) -> Option<&AnalysisState> {
        self.analysis.as_ref()
    }

    /// First support with this name on the analysis
    pub fn support(&self, name: &str) -> Option<&StoredSupport> {
        self.analysis
            .as_ref()
            .and_then(|a| a.supports.iter().find(|s| s.name == name))
    }

    /// Requested distributed-solve core count, if one was set
    pub fn solver_cores(&self) -> Option<u32> {
        self.solver_cores
    }

    fn alloc_id(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }

    fn check_op(&self, op: &str) -> Result<()> {
        if self.fail_ops.iter().any(|f| f == op) {
            return Err(SetupError::HostFault(format!("injected fault in {}", op)));
        }
        Ok(())
    }

    fn analysis_ref(&self) -> Result<&AnalysisState> {
        self.analysis
            .as_ref()
            .ok_or_else(|| SetupError::HostFault("no analysis system in the project".to_string()))
    }

    fn analysis_mut(&mut self) -> Result<&mut AnalysisState> {
        self.analysis
            .as_mut()
            .ok_or_else(|| SetupError::HostFault("no analysis system in the project".to_string()))
    }
}

impl GeometryModel for InMemoryHost {
    fn faces(&self) -> Result<Vec<FaceInfo>> {
        self.check_op("faces")?;
        Ok(self.faces.clone())
    }

    fn bodies(&self) -> Result<Vec<BodyInfo>> {
        self.check_op("bodies")?;
        Ok(self.bodies.clone())
    }
}

impl SelectionStore for InMemoryHost {
    fn named_selections(&self) -> Result<Vec<NamedSelection>> {
        self.check_op("named_selections")?;
        Ok(self.selections.clone())
    }

    fn create_named_selection(&mut self, name: &str, faces: &[FaceId]) -> Result<()> {
        self.check_op("create_named_selection")?;
        debug!("create named selection '{}' ({} faces)", name, faces.len());
        self.selections
            .push(NamedSelection::new(name, faces.to_vec()));
        Ok(())
    }

    fn delete_named_selection(&mut self, name: &str) -> Result<()> {
        self.check_op("delete_named_selection")?;
        self.selections.retain(|s| s.name != name);
        Ok(())
    }
}

impl ConnectionStore for InMemoryHost {
    fn contact_groups(&self) -> Result<Vec<ContactGroupInfo>> {
        self.check_op("contact_groups")?;
        Ok(self
            .groups
            .iter()
            .map(|g| ContactGroupInfo {
                id: g.id,
                name: g.name.clone(),
            })
            .collect())
    }

    fn add_contact_group(&mut self, name: &str) -> Result<ContactGroupId> {
        self.check_op("add_contact_group")?;
        let id = ContactGroupId(self.alloc_id());
        debug!("create contact group '{}' -> {:?}", name, id);
        self.groups.push(StoredGroup {
            id,
            name: name.to_string(),
            pairs: Vec::new(),
        });
        Ok(id)
    }

    fn delete_contact_group(&mut self, group: ContactGroupId) -> Result<()> {
        self.check_op("delete_contact_group")?;
        let index = self.groups.iter().position(|g| g.id == group).ok_or_else(|| {
            SetupError::HostFault(format!("unknown contact group id {}", group.0))
        })?;
        self.groups.remove(index);
        Ok(())
    }

    fn add_contact_pair(&mut self, group: ContactGroupId, pair: &ContactPairSpec) -> Result<()> {
        self.check_op("add_contact_pair")?;
        let stored = self.groups.iter_mut().find(|g| g.id == group).ok_or_else(|| {
            SetupError::HostFault(format!("unknown contact group id {}", group.0))
        })?;
        stored.pairs.push(pair.clone());
        Ok(())
    }
}

impl MeshSettings for InMemoryHost {
    fn set_element_size(&mut self, size_mm: f64) -> Result<()> {
        self.check_op("set_element_size")?;
        self.mesh.element_size_mm = Some(size_mm);
        Ok(())
    }

    fn set_element_order(&mut self, order: ElementOrder) -> Result<()> {
        self.check_op("set_element_order")?;
        self.mesh.element_order = Some(order);
        Ok(())
    }

    fn mesh_controls(&self) -> Result<Vec<String>> {
        self.check_op("mesh_controls")?;
        Ok(self.mesh.controls.iter().map(|c| c.name.clone()).collect())
    }

    fn delete_mesh_control(&mut self, name: &str) -> Result<()> {
        self.check_op("delete_mesh_control")?;
        self.mesh.controls.retain(|c| c.name != name);
        Ok(())
    }

    fn add_mesh_method(
        &mut self,
        name: &str,
        bodies: &[BodyId],
        kind: MeshMethodKind,
    ) -> Result<()> {
        self.check_op("add_mesh_method")?;
        self.mesh.controls.push(MeshControl {
            name: name.to_string(),
            kind: MeshControlKind::Method {
                bodies: bodies.to_vec(),
                kind,
            },
        });
        Ok(())
    }

    fn add_mesh_sizing(&mut self, name: &str, faces: &[FaceId], size_mm: f64) -> Result<()> {
        self.check_op("add_mesh_sizing")?;
        self.mesh.controls.push(MeshControl {
            name: name.to_string(),
            kind: MeshControlKind::Sizing {
                faces: faces.to_vec(),
                size_mm,
            },
        });
        Ok(())
    }

    fn generate_mesh(&mut self) -> Result<()> {
        self.check_op("generate_mesh")?;
        if self.batch_depth > 0 {
            return Err(SetupError::HostFault(
                "mesh generation requested inside a batch scope".to_string(),
            ));
        }
        self.mesh.generate_count += 1;
        Ok(())
    }
}

impl AnalysisInfo for InMemoryHost {
    fn analysis_name(&self) -> Option<String> {
        self.analysis.as_ref().map(|a| a.name.clone())
    }
}

impl SolverSettings for InMemoryHost {
    fn apply_step_controls(&mut self, controls: &StepControls) -> Result<()> {
        self.check_op("apply_step_controls")?;
        self.analysis_mut()?.step_controls = Some(controls.clone());
        Ok(())
    }

    fn set_solver_cores(&mut self, cores: u32) -> Result<()> {
        self.check_op("set_solver_cores")?;
        self.solver_cores = Some(cores);
        Ok(())
    }
}

impl BoundaryConditions for InMemoryHost {
    fn boundary_conditions(&self) -> Result<Vec<String>> {
        self.check_op("boundary_conditions")?;
        Ok(self
            .analysis_ref()?
            .supports
            .iter()
            .map(|s| s.name.clone())
            .collect())
    }

    fn delete_boundary_condition(&mut self, name: &str) -> Result<()> {
        self.check_op("delete_boundary_condition")?;
        self.analysis_mut()?.supports.retain(|s| s.name != name);
        Ok(())
    }

    fn add_fixed_support(&mut self, name: &str, faces: &[FaceId]) -> Result<()> {
        self.check_op("add_fixed_support")?;
        let id = SupportId(self.alloc_id());
        self.analysis_mut()?.supports.push(StoredSupport {
            id,
            name: name.to_string(),
            kind: SupportKind::Fixed,
            faces: faces.to_vec(),
            components_mm: None,
        });
        Ok(())
    }

    fn add_displacement(&mut self, name: &str, faces: &[FaceId]) -> Result<SupportId> {
        self.check_op("add_displacement")?;
        let id = SupportId(self.alloc_id());
        self.analysis_mut()?.supports.push(StoredSupport {
            id,
            name: name.to_string(),
            kind: SupportKind::Displacement,
            faces: faces.to_vec(),
            components_mm: None,
        });
        Ok(id)
    }

    fn set_displacement_components(
        &mut self,
        support: SupportId,
        components_mm: [f64; 3],
    ) -> Result<()> {
        self.check_op("set_displacement_components")?;
        if self.batch_depth > 0 {
            // The live host nulls the component field until the batch ends.
            return Err(SetupError::HostFault(format!(
                "displacement {} has no component field inside a batch scope",
                support.0
            )));
        }
        let stored = self
            .analysis_mut()?
            .supports
            .iter_mut()
            .find(|s| s.id == support)
            .ok_or_else(|| SetupError::HostFault(format!("unknown support id {}", support.0)))?;
        if stored.kind != SupportKind::Displacement {
            return Err(SetupError::HostFault(format!(
                "support '{}' is not a displacement",
                stored.name
            )));
        }
        stored.components_mm = Some(components_mm);
        Ok(())
    }
}

impl ResultObjects for InMemoryHost {
    fn add_total_deformation(&mut self, name: &str) -> Result<()> {
        self.check_op("add_total_deformation")?;
        self.analysis_mut()?.results.push(ResultRecord::TotalDeformation {
            name: name.to_string(),
        });
        Ok(())
    }

    fn add_directional_deformation(&mut self, name: &str, axis: Axis) -> Result<()> {
        self.check_op("add_directional_deformation")?;
        self.analysis_mut()?
            .results
            .push(ResultRecord::DirectionalDeformation {
                name: name.to_string(),
                axis,
            });
        Ok(())
    }

    fn add_equivalent_stress(&mut self, name: &str) -> Result<()> {
        self.check_op("add_equivalent_stress")?;
        self.analysis_mut()?.results.push(ResultRecord::EquivalentStress {
            name: name.to_string(),
        });
        Ok(())
    }

    fn add_contact_tool(&mut self, name: &str, results: &[ContactToolResult]) -> Result<()> {
        self.check_op("add_contact_tool")?;
        self.analysis_mut()?.results.push(ResultRecord::ContactTool {
            name: name.to_string(),
            results: results.to_vec(),
        });
        Ok(())
    }

    fn add_force_reaction(
        &mut self,
        name: &str,
        boundary_condition: &str,
        axis: Axis,
    ) -> Result<()> {
        self.check_op("add_force_reaction")?;
        let analysis = self.analysis_mut()?;
        if !analysis.supports.iter().any(|s| s.name == boundary_condition) {
            return Err(SetupError::HostFault(format!(
                "no boundary condition named '{}'",
                boundary_condition
            )));
        }
        analysis.results.push(ResultRecord::ForceReaction {
            name: name.to_string(),
            boundary_condition: boundary_condition.to_string(),
            axis,
        });
        Ok(())
    }

    fn evaluate_all_results(&mut self) -> Result<()> {
        self.check_op("evaluate_all_results")?;
        self.analysis_mut()?.evaluate_count += 1;
        Ok(())
    }
}

impl BatchScope for InMemoryHost {
    fn begin_batch(&mut self) {
        self.batch_depth += 1;
    }

    fn end_batch(&mut self) {
        self.batch_depth = self.batch_depth.saturating_sub(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::with_batch;

    fn pair(name: &str, target: u64, source: u64) -> ContactPairSpec {
        ContactPairSpec {
            name: name.to_string(),
            target: FaceId(target),
            source: FaceId(source),
            behavior: crate::host::ContactBehavior::Frictional,
            friction: 0.2,
        }
    }

    #[test]
    fn test_snapshots_are_copies() {
        let mut host = InMemoryHost::new();
        host.add_face(1, 0.0, 0.0, 0.0);
        let before = host.faces().unwrap();
        host.add_face(2, 1.0, 1.0, 1.0);
        assert_eq!(before.len(), 1);
        assert_eq!(host.faces().unwrap().len(), 2);
    }

    #[test]
    fn test_delete_named_selection_removes_all_matches() {
        let mut host = InMemoryHost::new();
        host.add_selection("dup", &[1]);
        host.add_selection("dup", &[2]);
        host.add_selection("keep", &[3]);
        host.delete_named_selection("dup").unwrap();
        let names: Vec<String> = host
            .named_selections()
            .unwrap()
            .into_iter()
            .map(|s| s.name)
            .collect();
        assert_eq!(names, vec!["keep"]);
        // Deleting a missing name is a no-op
        host.delete_named_selection("dup").unwrap();
    }

    #[test]
    fn test_delete_unknown_group_faults() {
        let mut host = InMemoryHost::new();
        let err = host.delete_contact_group(ContactGroupId(99)).unwrap_err();
        assert!(err.to_string().contains("unknown contact group"));
    }

    #[test]
    fn test_group_delete_cascades_pairs() {
        let mut host = InMemoryHost::new();
        let id = host.add_contact_group("[ContGroup]_[7]").unwrap();
        host.add_contact_pair(id, &pair("Pair_7_Run_1", 10, 20)).unwrap();
        host.add_contact_pair(id, &pair("Pair_7_Run_2", 10, 21)).unwrap();
        assert_eq!(host.group("[ContGroup]_[7]").unwrap().pairs.len(), 2);
        host.delete_contact_group(id).unwrap();
        assert!(host.group("[ContGroup]_[7]").is_none());
        assert!(host.contact_groups().unwrap().is_empty());
    }

    #[test]
    fn test_displacement_components_fault_inside_batch() {
        let mut host = InMemoryHost::with_analysis("Static Structural");
        let id = host.add_displacement("AutoDisp_Top", &[FaceId(1)]).unwrap();
        let err = with_batch(&mut host, |h| {
            h.set_displacement_components(id, [0.0, 0.0, -5.0])
        })
        .unwrap_err();
        assert!(err.to_string().contains("batch scope"));
        // Outside the batch the same write succeeds
        host.set_displacement_components(id, [0.0, 0.0, -5.0]).unwrap();
        assert_eq!(
            host.support("AutoDisp_Top").unwrap().components_mm,
            Some([0.0, 0.0, -5.0])
        );
    }

    #[test]
    fn test_components_rejected_for_fixed_support() {
        let mut host = InMemoryHost::with_analysis("Static Structural");
        host.add_fixed_support("AutoFixed_Bottom", &[FaceId(1)]).unwrap();
        let id = host.support("AutoFixed_Bottom").unwrap().id;
        assert!(host.set_displacement_components(id, [0.0; 3]).is_err());
    }

    #[test]
    fn test_results_require_analysis() {
        let mut host = InMemoryHost::new();
        let err = host.add_total_deformation("Total Deformation").unwrap_err();
        assert!(err.to_string().contains("no analysis system"));
    }

    #[test]
    fn test_force_reaction_requires_boundary_condition() {
        let mut host = InMemoryHost::with_analysis("Static Structural");
        let err = host
            .add_force_reaction("Insertion Force Probe", "AutoDisp_Top", Axis::Z)
            .unwrap_err();
        assert!(err.to_string().contains("AutoDisp_Top"));

        host.add_displacement("AutoDisp_Top", &[FaceId(4)]).unwrap();
        host.add_force_reaction("Insertion Force Probe", "AutoDisp_Top", Axis::Z)
            .unwrap();
        let analysis = host.analysis().unwrap();
        assert_eq!(analysis.results.len(), 1);
        assert_eq!(analysis.results[0].name(), "Insertion Force Probe");
    }

    #[test]
    fn test_generate_mesh_rejected_inside_batch() {
        let mut host = InMemoryHost::new();
        let err = with_batch(&mut host, |h| h.generate_mesh()).unwrap_err();
        assert!(err.to_string().contains("batch scope"));
        host.generate_mesh().unwrap();
        assert_eq!(host.mesh().generate_count, 1);
    }

    #[test]
    fn test_injected_fault() {
        let mut host = InMemoryHost::new();
        host.fail_on("add_contact_group");
        assert!(host.add_contact_group("[ContGroup]_[1]").is_err());
        assert!(host.named_selections().is_ok());
    }
}
