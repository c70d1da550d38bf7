//! JSON model snapshots for offline runs
//!
//! A snapshot captures the model-side inputs of a run: faces with
//! centroids, bodies, named selections, and whether an analysis system
//! exists. Reading one seeds an [`InMemoryHost`]; writing one back after
//! a run persists the selections the run created. Objects the run adds
//! below the model (contact groups, supports, results) are recorded in
//! the run report, not the snapshot.

use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use crate::error::{Result, SetupError};
use crate::host::{AnalysisInfo, GeometryModel, InMemoryHost, SelectionStore};

#[derive(Debug, Serialize, Deserialize)]
struct JsonFace {
    id: u64,
    centroid: [f64; 3],
}

#[derive(Debug, Serialize, Deserialize)]
struct JsonBody {
    id: u64,
    name: String,
    #[serde(default)]
    suppressed: bool,
}

#[derive(Debug, Serialize, Deserialize)]
struct JsonSelection {
    name: String,
    faces: Vec<u64>,
}

#[derive(Debug, Serialize, Deserialize)]
struct JsonModel {
    faces: Vec<JsonFace>,
    #[serde(default)]
    bodies: Vec<JsonBody>,
    #[serde(default)]
    named_selections: Vec<JsonSelection>,
    #[serde(default)]
    analysis: Option<String>,
}

/// Read a snapshot file into a fresh in-memory host
pub fn read_model_snapshot<P: AsRef<Path>>(path: P) -> Result<InMemoryHost> {
    let file = File::open(path.as_ref()).map_err(SetupError::IoError)?;
    let reader = BufReader::new(file);
    let model: JsonModel = serde_json::from_reader(reader).map_err(|e| {
        SetupError::ConfigError(format!("Failed to parse model snapshot: {}", e))
    })?;

    let mut host = InMemoryHost::new();
    for face in model.faces {
        host.add_face(face.id, face.centroid[0], face.centroid[1], face.centroid[2]);
    }
    for body in model.bodies {
        host.add_body(body.id, &body.name, body.suppressed);
    }
    for selection in model.named_selections {
        host.add_selection(&selection.name, &selection.faces);
    }
    if let Some(name) = model.analysis {
        host.set_analysis(&name);
    }

    Ok(host)
}

/// Write the host's model state to a snapshot file
pub fn write_model_snapshot<P: AsRef<Path>>(host: &InMemoryHost, path: P) -> Result<()> {
    let model = JsonModel {
        faces: host
            .faces()?
            .into_iter()
            .map(|f| JsonFace {
                id: f.id.0,
                centroid: [f.centroid.x, f.centroid.y, f.centroid.z],
            })
            .collect(),
        bodies: host
            .bodies()?
            .into_iter()
            .map(|b| JsonBody {
                id: b.id.0,
                name: b.name,
                suppressed: b.suppressed,
            })
            .collect(),
        named_selections: host
            .named_selections()?
            .into_iter()
            .map(|ns| JsonSelection {
                name: ns.name,
                faces: ns.faces.iter().map(|f| f.0).collect(),
            })
            .collect(),
        analysis: host.analysis_name(),
    };

    let file = File::create(path.as_ref())?;
    serde_json::to_writer_pretty(file, &model).map_err(|e| {
        SetupError::ConfigError(format!("Failed to write model snapshot: {}", e))
    })?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::FaceId;

    #[test]
    fn test_snapshot_round_trip() {
        let mut host = InMemoryHost::with_analysis("Static Structural");
        host.add_face(1, 0.0, 0.0, 0.0);
        host.add_face(2, 1.0, 2.0, 12.5);
        host.add_body(10, "Pin", false);
        host.add_body(11, "Stock", true);
        host.add_selection("[Cont]_[Target]_[7]", &[1, 2]);

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model.json");
        write_model_snapshot(&host, &path).unwrap();

        let loaded = read_model_snapshot(&path).unwrap();
        assert_eq!(loaded.faces().unwrap().len(), 2);
        assert_eq!(loaded.faces().unwrap()[1].centroid.z, 12.5);
        assert_eq!(loaded.bodies().unwrap().len(), 2);
        assert!(loaded.bodies().unwrap()[1].suppressed);
        assert_eq!(
            loaded.named_selections().unwrap()[0].faces,
            vec![FaceId(1), FaceId(2)]
        );
        assert_eq!(loaded.analysis_name().as_deref(), Some("Static Structural"));
    }

    #[test]
    fn test_minimal_snapshot_parses() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("minimal.json");
        std::fs::write(&path, r#"{"faces": [{"id": 1, "centroid": [0, 0, 1]}]}"#).unwrap();

        let host = read_model_snapshot(&path).unwrap();
        assert_eq!(host.faces().unwrap().len(), 1);
        assert!(host.bodies().unwrap().is_empty());
        assert!(host.analysis_name().is_none());
    }

    #[test]
    fn test_malformed_snapshot_is_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.json");
        std::fs::write(&path, "{not json").unwrap();

        let err = read_model_snapshot(&path).unwrap_err();
        assert!(matches!(err, SetupError::ConfigError(_)));
    }
}
