//! VTU preview writer for selection buckets
//!
//! Writes face centroids as a vertex-cell point cloud with a `bucket`
//! cell attribute, so a selection pass can be eyeballed in ParaView
//! before anything is pushed to a live host.

use std::path::Path;
use vtkio::model::*;

use crate::error::{Result, SetupError};
use crate::host::FaceInfo;
use crate::selection::FacePartition;

/// Default VTK file format version (2.2 for broad compatibility)
pub const DEFAULT_VTK_VERSION: (u8, u8) = (2, 2);

/// Bucket attribute value for one face
///
/// 0 = unbucketed, 1 = top, 2 = bottom, 3 = both (degenerate thin model
/// where the two extremes fall within tolerance of each other).
fn bucket_code(top: bool, bottom: bool) -> i32 {
    match (top, bottom) {
        (false, false) => 0,
        (true, false) => 1,
        (false, true) => 2,
        (true, true) => 3,
    }
}

/// Write all face centroids with their bucket assignment to a VTU file
pub fn write_selection_preview(
    faces: &[FaceInfo],
    partition: &FacePartition,
    output_path: &Path,
    vtk_version: Option<(u8, u8)>,
) -> Result<()> {
    let version = vtk_version.unwrap_or(DEFAULT_VTK_VERSION);
    log::info!(
        "Writing selection preview with {} faces to {:?} (VTK version {}.{})",
        faces.len(),
        output_path,
        version.0,
        version.1
    );

    // Create point array from face centroids
    let points: Vec<f64> = faces
        .iter()
        .flat_map(|f| vec![f.centroid.x, f.centroid.y, f.centroid.z])
        .collect();

    // One vertex cell per centroid
    let connectivity: Vec<u64> = (0..faces.len() as u64).collect();
    let cell_types = vec![CellType::Vertex; faces.len()];

    let cells = Cells {
        cell_verts: VertexNumbers::XML {
            connectivity,
            offsets: (0..faces.len()).map(|i| (i + 1) as u64).collect(),
        },
        types: cell_types,
    };

    let mut ugrid = UnstructuredGridPiece {
        points: IOBuffer::F64(points),
        cells,
        data: Attributes::new(),
    };

    // Bucket assignment as cell data
    let buckets: Vec<i32> = faces
        .iter()
        .map(|f| {
            bucket_code(
                partition.top.contains(&f.id),
                partition.bottom.contains(&f.id),
            )
        })
        .collect();

    ugrid.data.cell.push(Attribute::DataArray(DataArray {
        name: "bucket".into(),
        elem: ElementType::Scalars {
            num_comp: 1,
            lookup_table: None,
        },
        data: IOBuffer::I32(buckets),
    }));

    // Host face ids as cell data, for cross-referencing
    let face_ids: Vec<u64> = faces.iter().map(|f| f.id.0).collect();

    ugrid.data.cell.push(Attribute::DataArray(DataArray {
        name: "face_id".into(),
        elem: ElementType::Scalars {
            num_comp: 1,
            lookup_table: None,
        },
        data: IOBuffer::U64(face_ids),
    }));

    let vtk = Vtk {
        version: Version::new(version),
        title: "Selection bucket preview".to_string(),
        byte_order: ByteOrder::LittleEndian,
        data: DataSet::UnstructuredGrid {
            pieces: vec![Piece::Inline(Box::new(ugrid))],
            meta: None,
        },
        file_path: None,
    };

    vtk.export(output_path)
        .map_err(|e| SetupError::VtkError(format!("Failed to write VTU file: {}", e)))?;

    log::info!("Successfully wrote VTU preview to {:?}", output_path);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::FaceId;

    #[test]
    fn test_bucket_codes() {
        assert_eq!(bucket_code(false, false), 0);
        assert_eq!(bucket_code(true, false), 1);
        assert_eq!(bucket_code(false, true), 2);
        assert_eq!(bucket_code(true, true), 3);
    }

    #[test]
    fn test_write_selection_preview() {
        let faces = vec![
            FaceInfo::new(1, 0.0, 0.0, 0.0),
            FaceInfo::new(2, 0.0, 0.0, 5.0),
            FaceInfo::new(3, 0.0, 0.0, 10.0),
        ];
        let partition = FacePartition {
            top: vec![FaceId(3)],
            bottom: vec![FaceId(1)],
        };

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("preview.vtu");
        write_selection_preview(&faces, &partition, &path, None).unwrap();
        assert!(path.exists());
    }

    #[test]
    fn test_write_empty_preview() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.vtu");
        write_selection_preview(&[], &FacePartition::default(), &path, None).unwrap();
        assert!(path.exists());
    }
}
