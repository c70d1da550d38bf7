//! Data types exchanged with a host session
//!
//! Everything here is a plain snapshot value: the host owns the real
//! objects, the tools only ever see copies of identifiers and coordinates.

use nalgebra::Point3;
use serde::{Deserialize, Serialize};
use std::fmt;

/// 3D point type
pub type Point = Point3<f64>;

/// Stable identifier of a geometry face inside the host model
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FaceId(pub u64);

/// Stable identifier of a geometry body inside the host model
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BodyId(pub u64);

/// Handle to a contact group created in the connections store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ContactGroupId(pub u64);

/// Handle to a support (fixed or displacement) created on the analysis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SupportId(pub u64);

impl fmt::Display for FaceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for BodyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Model axis used for extremum scans and directional results
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    /// Component of a point along this axis
    pub fn component(&self, p: &Point) -> f64 {
        match self {
            Axis::X => p.x,
            Axis::Y => p.y,
            Axis::Z => p.z,
        }
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Axis::X => write!(f, "X"),
            Axis::Y => write!(f, "Y"),
            Axis::Z => write!(f, "Z"),
        }
    }
}

impl std::str::FromStr for Axis {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "x" => Ok(Axis::X),
            "y" => Ok(Axis::Y),
            "z" => Ok(Axis::Z),
            other => Err(format!("unknown axis '{}', expected x, y, or z", other)),
        }
    }
}

/// One face of the geometry snapshot: identifier plus centroid
#[derive(Debug, Clone, PartialEq)]
pub struct FaceInfo {
    /// Host-stable face identifier
    pub id: FaceId,

    /// Geometric center of the face
    pub centroid: Point,
}

impl FaceInfo {
    /// Create face info from raw coordinates
    pub fn new(id: u64, x: f64, y: f64, z: f64) -> Self {
        Self {
            id: FaceId(id),
            centroid: Point::new(x, y, z),
        }
    }
}

/// One body of the geometry snapshot
#[derive(Debug, Clone, PartialEq)]
pub struct BodyInfo {
    /// Host-stable body identifier
    pub id: BodyId,

    /// Body name as shown in the host outline
    pub name: String,

    /// Suppressed bodies are excluded from meshing
    pub suppressed: bool,
}

/// Snapshot of a named selection: name plus ordered face identifiers
///
/// Face order is the insertion order of the original selection and is
/// preserved end to end; contact pair emission depends on it.
#[derive(Debug, Clone, PartialEq)]
pub struct NamedSelection {
    pub name: String,
    pub faces: Vec<FaceId>,
}

impl NamedSelection {
    pub fn new(name: impl Into<String>, faces: Vec<FaceId>) -> Self {
        Self {
            name: name.into(),
            faces,
        }
    }
}

/// Snapshot of a contact group in the connections store
#[derive(Debug, Clone, PartialEq)]
pub struct ContactGroupInfo {
    pub id: ContactGroupId,
    pub name: String,
}

/// Contact behavior applied uniformly to every pair in a group
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContactBehavior {
    Frictional,
    Frictionless,
    Bonded,
    NoSeparation,
}

impl Default for ContactBehavior {
    fn default() -> Self {
        ContactBehavior::Frictional
    }
}

/// Everything needed to create one contact pair inside a group
#[derive(Debug, Clone, PartialEq)]
pub struct ContactPairSpec {
    /// Pair name shown in the host outline
    pub name: String,

    /// Target-side face
    pub target: FaceId,

    /// Source (contact) side face
    pub source: FaceId,

    /// Contact behavior kind
    pub behavior: ContactBehavior,

    /// Friction coefficient; only meaningful for frictional behavior
    pub friction: f64,
}

/// Element order for the global mesh
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementOrder {
    Linear,
    Quadratic,
}

/// Mesh method kinds the host understands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MeshMethodKind {
    /// Host picks per body
    Automatic,
    /// All-tet meshing (tri surface, tet volume)
    Tetrahedrons,
    HexDominant,
}

/// Sub-results available under a contact tool result object
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContactToolResult {
    Pressure,
    SlidingDistance,
}

/// Flat pass-through of the analysis step controls
///
/// Times are in seconds. When `auto_time_stepping` is off the three step
/// bounds are left untouched on the host, matching the original tooling.
#[derive(Debug, Clone, PartialEq)]
pub struct StepControls {
    /// Large-deflection (geometric nonlinearity) toggle
    pub large_deflection: bool,

    /// Total number of load steps
    pub number_of_steps: u32,

    /// End time per step, in order; steps beyond this list keep host defaults
    pub step_end_times: Vec<f64>,

    /// Automatic time stepping toggle
    pub auto_time_stepping: bool,

    /// Initial time step in seconds
    pub initial_time_step: f64,

    /// Minimum time step in seconds
    pub minimum_time_step: f64,

    /// Maximum time step in seconds
    pub maximum_time_step: f64,
}
