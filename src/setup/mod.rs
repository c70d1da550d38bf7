//! Model setup tools
//!
//! One module per setup concern: global mesh controls, boundary
//! conditions, solver step settings, and result objects. Each tool is
//! generic over the host capabilities it needs and returns an outcome
//! record for the run report.

pub mod boundary;
pub mod mesh;
pub mod post;
pub mod solver;

pub use boundary::{apply_boundary_conditions, BoundaryOutcome};
pub use mesh::{configure_mesh, MeshOutcome};
pub use post::{create_result_objects, PostOutcome};
pub use solver::{configure_solver, SolverOutcome};
