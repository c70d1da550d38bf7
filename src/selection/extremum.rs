//! Two-pass extremum face scan
//!
//! Pass one walks every face centroid once and tracks the running
//! maximum and minimum coordinate along the chosen axis. Pass two walks
//! the same snapshot again and buckets each face whose coordinate lies
//! within tolerance of an extreme. Both passes are pure; applying the
//! result to a host happens in [`select_extremum_faces`].

use log::{info, warn};
use serde::Serialize;

use crate::config::SelectionConfig;
use crate::error::Result;
use crate::host::{with_batch, Axis, BatchScope, FaceId, FaceInfo, GeometryModel, SelectionStore};

/// Running-maximum start value; any real coordinate beats it
pub const RUNNING_MAX_START: f64 = -1.0e20;

/// Running-minimum start value; any real coordinate beats it
pub const RUNNING_MIN_START: f64 = 1.0e20;

/// Extreme coordinates found along one axis
///
/// When the face snapshot is empty both fields keep their start values,
/// which [`found_any`] reports.
///
/// [`found_any`]: AxisExtremes::found_any
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AxisExtremes {
    pub max: f64,
    pub min: f64,
}

impl AxisExtremes {
    /// Whether the scan saw at least one face
    pub fn found_any(&self) -> bool {
        self.max != RUNNING_MAX_START
    }
}

/// Faces bucketed at the two extremes, in snapshot order
///
/// A face may land in both buckets when the model is thin enough that
/// the two extremes fall within tolerance of each other.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FacePartition {
    pub top: Vec<FaceId>,
    pub bottom: Vec<FaceId>,
}

/// What one bucket of the selection pass produced
#[derive(Debug, Clone, Serialize)]
pub struct BucketOutcome {
    /// Named selection this bucket publishes to
    pub name: String,

    /// Faces in the bucket
    pub face_count: usize,

    /// False when the bucket was empty and creation was skipped
    pub created: bool,
}

/// Summary of one full selection pass
#[derive(Debug, Clone, Serialize)]
pub struct SelectionOutcome {
    pub axis: Axis,
    pub extremes: AxisExtremes,
    pub top: BucketOutcome,
    pub bottom: BucketOutcome,
}

/// Pass one: running extremes of the centroid coordinate along `axis`
pub fn scan_axis_extremes(faces: &[FaceInfo], axis: Axis) -> AxisExtremes {
    let mut extremes = AxisExtremes {
        max: RUNNING_MAX_START,
        min: RUNNING_MIN_START,
    };
    for face in faces {
        let coord = axis.component(&face.centroid);
        if coord > extremes.max {
            extremes.max = coord;
        }
        if coord < extremes.min {
            extremes.min = coord;
        }
    }
    extremes
}

/// Pass two: bucket faces lying strictly within `tolerance` of an extreme
///
/// The comparison is strict, so a face sitting exactly `tolerance` away
/// stays out. The two checks are independent; neither excludes the other.
pub fn partition_extremum_faces(
    faces: &[FaceInfo],
    axis: Axis,
    extremes: &AxisExtremes,
    tolerance: f64,
) -> FacePartition {
    let mut partition = FacePartition::default();
    for face in faces {
        let coord = axis.component(&face.centroid);
        if (coord - extremes.max).abs() < tolerance {
            partition.top.push(face.id);
        }
        if (coord - extremes.min).abs() < tolerance {
            partition.bottom.push(face.id);
        }
    }
    partition
}

/// Run both passes against the host and publish the buckets
///
/// Existing selections carrying the configured names are deleted first,
/// so reruns replace rather than accumulate. All deletes and creates
/// happen inside one batch scope. An empty bucket skips creation with a
/// warning instead of publishing an empty selection.
pub fn select_extremum_faces<H>(host: &mut H, config: &SelectionConfig) -> Result<SelectionOutcome>
where
    H: GeometryModel + SelectionStore + BatchScope,
{
    let faces = host.faces()?;
    info!(
        "Scanning {} faces for extremes along {}",
        faces.len(),
        config.axis
    );

    let extremes = scan_axis_extremes(&faces, config.axis);
    if !extremes.found_any() {
        warn!("Model has no faces; extremum scan found nothing");
    } else {
        info!(
            "{} extremes: max = {:.4}, min = {:.4}",
            config.axis, extremes.max, extremes.min
        );
    }

    let partition = partition_extremum_faces(&faces, config.axis, &extremes, config.tolerance_mm);

    let (top, bottom) = with_batch(host, |h| {
        let top = replace_selection(h, &config.top_name, &partition.top)?;
        let bottom = replace_selection(h, &config.bottom_name, &partition.bottom)?;
        Ok((top, bottom))
    })?;

    Ok(SelectionOutcome {
        axis: config.axis,
        extremes,
        top,
        bottom,
    })
}

fn replace_selection<H>(host: &mut H, name: &str, faces: &[FaceId]) -> Result<BucketOutcome>
where
    H: SelectionStore + ?Sized,
{
    host.delete_named_selection(name)?;
    if faces.is_empty() {
        warn!("Selection '{}' matched no faces; skipping creation", name);
        return Ok(BucketOutcome {
            name: name.to_string(),
            face_count: 0,
            created: false,
        });
    }
    host.create_named_selection(name, faces)?;
    info!("Created selection '{}' with {} faces", name, faces.len());
    Ok(BucketOutcome {
        name: name.to_string(),
        face_count: faces.len(),
        created: true,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::InMemoryHost;

    fn stacked_faces(coords: &[f64]) -> Vec<FaceInfo> {
        coords
            .iter()
            .enumerate()
            .map(|(i, &z)| FaceInfo::new(i as u64 + 1, 0.0, 0.0, z))
            .collect()
    }

    #[test]
    fn test_scan_finds_extremes() {
        let faces = stacked_faces(&[0.0, 0.0, 5.0, 10.0, 10.0]);
        let extremes = scan_axis_extremes(&faces, Axis::Z);
        assert_eq!(extremes.max, 10.0);
        assert_eq!(extremes.min, 0.0);
        assert!(extremes.found_any());
    }

    #[test]
    fn test_scan_empty_keeps_start_values() {
        let extremes = scan_axis_extremes(&[], Axis::Z);
        assert_eq!(extremes.max, RUNNING_MAX_START);
        assert_eq!(extremes.min, RUNNING_MIN_START);
        assert!(!extremes.found_any());
    }

    #[test]
    fn test_partition_buckets_both_ends() {
        let faces = stacked_faces(&[0.0, 0.0, 5.0, 10.0, 10.0]);
        let extremes = scan_axis_extremes(&faces, Axis::Z);
        let partition = partition_extremum_faces(&faces, Axis::Z, &extremes, 0.01);
        assert_eq!(partition.top, vec![FaceId(4), FaceId(5)]);
        assert_eq!(partition.bottom, vec![FaceId(1), FaceId(2)]);
    }

    #[test]
    fn test_partition_tolerance_is_strict() {
        // One face exactly `tolerance` below the max must stay out.
        let faces = stacked_faces(&[0.0, 9.0, 10.0]);
        let extremes = scan_axis_extremes(&faces, Axis::Z);
        let partition = partition_extremum_faces(&faces, Axis::Z, &extremes, 1.0);
        assert_eq!(partition.top, vec![FaceId(3)]);

        let wider = partition_extremum_faces(&faces, Axis::Z, &extremes, 1.5);
        assert_eq!(wider.top, vec![FaceId(2), FaceId(3)]);
    }

    #[test]
    fn test_single_face_lands_in_both_buckets() {
        let faces = stacked_faces(&[3.0]);
        let extremes = scan_axis_extremes(&faces, Axis::Z);
        let partition = partition_extremum_faces(&faces, Axis::Z, &extremes, 0.001);
        assert_eq!(partition.top, vec![FaceId(1)]);
        assert_eq!(partition.bottom, vec![FaceId(1)]);
    }

    #[test]
    fn test_partition_respects_axis_choice() {
        let faces = vec![
            FaceInfo::new(1, -4.0, 0.0, 0.0),
            FaceInfo::new(2, 4.0, 0.0, 0.0),
            FaceInfo::new(3, 0.0, 0.0, 100.0),
        ];
        let extremes = scan_axis_extremes(&faces, Axis::X);
        let partition = partition_extremum_faces(&faces, Axis::X, &extremes, 0.001);
        assert_eq!(partition.top, vec![FaceId(2)]);
        assert_eq!(partition.bottom, vec![FaceId(1)]);
    }

    #[test]
    fn test_select_creates_both_selections() {
        let mut host = InMemoryHost::new();
        for (i, z) in [0.0, 0.0, 12.0, 12.0].iter().enumerate() {
            host.add_face(i as u64 + 1, 0.0, 0.0, *z);
        }
        let config = SelectionConfig::default();
        let outcome = select_extremum_faces(&mut host, &config).unwrap();

        assert!(outcome.top.created);
        assert!(outcome.bottom.created);
        assert_eq!(outcome.top.face_count, 2);
        assert_eq!(outcome.bottom.face_count, 2);

        let top = host.selection(&config.top_name).unwrap();
        assert_eq!(top.faces, vec![FaceId(3), FaceId(4)]);
        let bottom = host.selection(&config.bottom_name).unwrap();
        assert_eq!(bottom.faces, vec![FaceId(1), FaceId(2)]);
        assert_eq!(host.batch_depth(), 0);
    }

    #[test]
    fn test_select_rerun_replaces() {
        let mut host = InMemoryHost::new();
        host.add_face(1, 0.0, 0.0, 0.0);
        host.add_face(2, 0.0, 0.0, 8.0);
        let config = SelectionConfig::default();

        select_extremum_faces(&mut host, &config).unwrap();
        select_extremum_faces(&mut host, &config).unwrap();

        let matches = host
            .named_selections()
            .unwrap()
            .into_iter()
            .filter(|s| s.name == config.top_name)
            .count();
        assert_eq!(matches, 1);
    }

    #[test]
    fn test_select_empty_model_creates_nothing() {
        let mut host = InMemoryHost::new();
        let config = SelectionConfig::default();
        let outcome = select_extremum_faces(&mut host, &config).unwrap();

        assert!(!outcome.top.created);
        assert!(!outcome.bottom.created);
        assert_eq!(outcome.extremes.max, RUNNING_MAX_START);
        assert_eq!(outcome.extremes.min, RUNNING_MIN_START);
        assert!(host.named_selections().unwrap().is_empty());
    }
}
