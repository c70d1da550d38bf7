//! Extremum face selection
//!
//! Finds the faces whose centroids sit at the extreme ends of a model
//! axis and publishes them as named selections for the downstream
//! boundary condition tooling.

pub mod extremum;

pub use extremum::{
    partition_extremum_faces, scan_axis_extremes, select_extremum_faces, AxisExtremes,
    BucketOutcome, FacePartition, SelectionOutcome,
};
