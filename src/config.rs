//! Configuration file support for the setup pipeline
//!
//! One JSON file with a section per tool. Every section and every field
//! is optional; missing values take the defaults the interactive tooling
//! historically shipped with. `validate()` runs before any host call and
//! rejects out-of-range values up front.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::contact::naming::TOLERATED_MISSPELLINGS;
use crate::error::{Result, SetupError};
use crate::host::{Axis, ContactBehavior, StepControls};

/// Sign of the prescribed displacement along the selection axis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Positive,
    Negative,
}

impl Direction {
    /// Multiplier applied to the displacement magnitude
    pub fn sign(&self) -> f64 {
        match self {
            Direction::Positive => 1.0,
            Direction::Negative => -1.0,
        }
    }
}

/// Extremum face selector settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectionConfig {
    /// Model axis to scan
    pub axis: Axis,

    /// Centroid-to-extreme tolerance in mm (strict comparison)
    pub tolerance_mm: f64,

    /// Named selection for the faces at the axis maximum
    pub top_name: String,

    /// Named selection for the faces at the axis minimum
    pub bottom_name: String,
}

impl Default for SelectionConfig {
    fn default() -> Self {
        Self {
            axis: Axis::Z,
            tolerance_mm: 0.001,
            top_name: "[BC]_[Disp]_Top Face".to_string(),
            bottom_name: "[BC]_[Fixed]_Bottom Face".to_string(),
        }
    }
}

impl SelectionConfig {
    fn validate(&self) -> Result<()> {
        if self.tolerance_mm < 0.0 {
            return Err(SetupError::ConfigError(format!(
                "selection tolerance must be >= 0, got {}",
                self.tolerance_mm
            )));
        }
        if self.top_name.is_empty() || self.bottom_name.is_empty() {
            return Err(SetupError::ConfigError(
                "selection output names must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

/// Tagged-pair contact matcher settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ContactConfig {
    /// Friction coefficient applied to every created pair
    pub friction: f64,

    /// Contact behavior applied to every created pair
    pub behavior: ContactBehavior,

    /// Accepted spellings for the contact-side role token, tried in order
    pub contact_spellings: Vec<String>,

    /// Delete every existing contact group before emitting new ones
    pub clear_existing: bool,
}

impl Default for ContactConfig {
    fn default() -> Self {
        Self {
            friction: 0.2,
            behavior: ContactBehavior::Frictional,
            contact_spellings: vec!["Contact".to_string()],
            clear_existing: true,
        }
    }
}

impl ContactConfig {
    /// Append the misspellings found in legacy models to the accepted list
    pub fn tolerate_typos(&mut self) {
        for typo in TOLERATED_MISSPELLINGS {
            if !self.contact_spellings.iter().any(|s| s == typo) {
                self.contact_spellings.push(typo.to_string());
            }
        }
    }

    fn validate(&self) -> Result<()> {
        if self.friction < 0.0 {
            return Err(SetupError::ConfigError(format!(
                "friction coefficient must be >= 0, got {}",
                self.friction
            )));
        }
        if self.contact_spellings.is_empty() {
            return Err(SetupError::ConfigError(
                "contact spelling list must not be empty".to_string(),
            ));
        }
        for spelling in &self.contact_spellings {
            // The tag grammar only ever captures alphabetic role tokens.
            if spelling.is_empty() || !spelling.chars().all(|c| c.is_ascii_alphabetic()) {
                return Err(SetupError::ConfigError(format!(
                    "contact spelling '{}' must be purely alphabetic",
                    spelling
                )));
            }
        }
        Ok(())
    }
}

/// Global mesh settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MeshConfig {
    /// Global element size in mm
    pub element_size_mm: f64,

    /// Quadratic (true) or linear (false) element order
    pub quadratic: bool,

    /// Add a local sizing over tagged contact faces
    pub refine_contacts: bool,

    /// Contact sizing as a fraction of the global element size
    pub refinement_factor: f64,

    /// Generate the mesh after controls are in place
    pub generate: bool,
}

impl Default for MeshConfig {
    fn default() -> Self {
        Self {
            element_size_mm: 5.0,
            quadratic: true,
            refine_contacts: true,
            refinement_factor: 0.5,
            generate: true,
        }
    }
}

impl MeshConfig {
    fn validate(&self) -> Result<()> {
        if self.element_size_mm <= 0.0 {
            return Err(SetupError::ConfigError(format!(
                "element size must be > 0 mm, got {}",
                self.element_size_mm
            )));
        }
        if self.refinement_factor <= 0.0 {
            return Err(SetupError::ConfigError(format!(
                "refinement factor must be > 0, got {}",
                self.refinement_factor
            )));
        }
        Ok(())
    }
}

/// Boundary condition settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BoundaryConfig {
    /// Displacement magnitude in mm
    pub displacement_mm: f64,

    /// Direction of the displacement along the selection axis
    pub direction: Direction,
}

impl Default for BoundaryConfig {
    fn default() -> Self {
        Self {
            displacement_mm: 5.0,
            direction: Direction::Negative,
        }
    }
}

impl BoundaryConfig {
    /// Signed displacement value pushed to the host
    pub fn signed_displacement(&self) -> f64 {
        self.displacement_mm * self.direction.sign()
    }

    fn validate(&self) -> Result<()> {
        if self.displacement_mm < 0.0 {
            return Err(SetupError::ConfigError(format!(
                "displacement magnitude must be >= 0 mm, got {} (use direction for sign)",
                self.displacement_mm
            )));
        }
        Ok(())
    }
}

/// Solver step and resource settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverConfig {
    /// Distributed-solve core count
    pub cores: u32,

    /// Large-deflection toggle
    pub large_deflection: bool,

    /// Number of load steps
    pub number_of_steps: u32,

    /// End time per step in seconds
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

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            cores: 6,
            large_deflection: true,
            number_of_steps: 1,
            step_end_times: vec![1.0],
            auto_time_stepping: true,
            initial_time_step: 0.05,
            minimum_time_step: 1.0e-4,
            maximum_time_step: 0.1,
        }
    }
}

impl SolverConfig {
    /// Step controls in the shape the host adapter takes
    pub fn step_controls(&self) -> StepControls {
        StepControls {
            large_deflection: self.large_deflection,
            number_of_steps: self.number_of_steps,
            step_end_times: self.step_end_times.clone(),
            auto_time_stepping: self.auto_time_stepping,
            initial_time_step: self.initial_time_step,
            minimum_time_step: self.minimum_time_step,
            maximum_time_step: self.maximum_time_step,
        }
    }

    fn validate(&self) -> Result<()> {
        if self.cores == 0 {
            return Err(SetupError::ConfigError(
                "solver core count must be > 0".to_string(),
            ));
        }
        if self.number_of_steps == 0 {
            return Err(SetupError::ConfigError(
                "number of steps must be > 0".to_string(),
            ));
        }
        if self.auto_time_stepping {
            if self.initial_time_step <= 0.0
                || self.minimum_time_step <= 0.0
                || self.maximum_time_step <= 0.0
            {
                return Err(SetupError::ConfigError(
                    "time step bounds must be > 0 seconds".to_string(),
                ));
            }
            if self.minimum_time_step > self.maximum_time_step {
                return Err(SetupError::ConfigError(format!(
                    "minimum time step {} exceeds maximum {}",
                    self.minimum_time_step, self.maximum_time_step
                )));
            }
        }
        Ok(())
    }
}

/// Result object settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PostConfig {
    /// Total/directional deformation and equivalent stress
    pub basic_results: bool,

    /// Contact tool with pressure and sliding distance
    pub contact_results: bool,

    /// Force reaction probe on the auto-created supports
    pub force_probe: bool,

    /// Evaluate all results after creation
    pub evaluate: bool,
}

impl Default for PostConfig {
    fn default() -> Self {
        Self {
            basic_results: true,
            contact_results: true,
            force_probe: true,
            evaluate: true,
        }
    }
}

/// Top-level configuration for a setup run
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SetupConfig {
    pub selection: SelectionConfig,
    pub contact: ContactConfig,
    pub mesh: MeshConfig,
    pub boundary: BoundaryConfig,
    pub solver: SolverConfig,
    pub post: PostConfig,
}

impl SetupConfig {
    /// Load configuration from a JSON file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            SetupError::ConfigError(format!("Failed to read config file: {}", e))
        })?;

        serde_json::from_str(&content).map_err(|e| {
            SetupError::ConfigError(format!("Failed to parse config file: {}", e))
        })
    }

    /// Save configuration to a JSON file
    pub fn to_file(&self, path: &Path) -> Result<()> {
        let content = serde_json::to_string_pretty(self).map_err(|e| {
            SetupError::ConfigError(format!("Failed to serialize config: {}", e))
        })?;

        std::fs::write(path, content).map_err(|e| {
            SetupError::ConfigError(format!("Failed to write config file: {}", e))
        })?;

        Ok(())
    }

    /// Reject out-of-range values before anything touches the host
    pub fn validate(&self) -> Result<()> {
        self.selection.validate()?;
        self.contact.validate()?;
        self.mesh.validate()?;
        self.boundary.validate()?;
        self.solver.validate()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_historic_tooling() {
        let config = SetupConfig::default();
        assert_eq!(config.selection.axis, Axis::Z);
        assert_eq!(config.selection.tolerance_mm, 0.001);
        assert_eq!(config.selection.top_name, "[BC]_[Disp]_Top Face");
        assert_eq!(config.selection.bottom_name, "[BC]_[Fixed]_Bottom Face");
        assert_eq!(config.contact.friction, 0.2);
        assert_eq!(config.contact.contact_spellings, vec!["Contact"]);
        assert_eq!(config.mesh.element_size_mm, 5.0);
        assert!(config.mesh.quadratic);
        assert_eq!(config.mesh.refinement_factor, 0.5);
        assert_eq!(config.boundary.signed_displacement(), -5.0);
        assert_eq!(config.solver.cores, 6);
        assert_eq!(config.solver.step_end_times, vec![1.0]);
        assert!(config.post.evaluate);
    }

    #[test]
    fn test_default_config_validates() {
        assert!(SetupConfig::default().validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_negative_tolerance() {
        let mut config = SetupConfig::default();
        config.selection.tolerance_mm = -0.001;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_zero_element_size() {
        let mut config = SetupConfig::default();
        config.mesh.element_size_mm = 0.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_zero_cores() {
        let mut config = SetupConfig::default();
        config.solver.cores = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_inverted_step_bounds() {
        let mut config = SetupConfig::default();
        config.solver.minimum_time_step = 0.5;
        config.solver.maximum_time_step = 0.1;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_empty_output_name() {
        let mut config = SetupConfig::default();
        config.selection.top_name.clear();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_non_alphabetic_spelling() {
        let mut config = SetupConfig::default();
        config.contact.contact_spellings.push("Cont4ct".to_string());
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_tolerate_typos_appends_once() {
        let mut config = ContactConfig::default();
        config.tolerate_typos();
        config.tolerate_typos();
        assert_eq!(config.contact_spellings.len(), 1 + TOLERATED_MISSPELLINGS.len());
        assert_eq!(config.contact_spellings[0], "Contact");
    }

    #[test]
    fn test_partial_section_uses_defaults() {
        let config: SetupConfig =
            serde_json::from_str(r#"{"contact": {"friction": 0.35}}"#).unwrap();
        assert_eq!(config.contact.friction, 0.35);
        assert_eq!(config.contact.contact_spellings, vec!["Contact"]);
        assert_eq!(config.mesh.element_size_mm, 5.0);
    }

    #[test]
    fn test_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("setup.json");

        let mut config = SetupConfig::default();
        config.contact.friction = 0.15;
        config.solver.cores = 12;
        config.to_file(&path).unwrap();

        let loaded = SetupConfig::from_file(&path).unwrap();
        assert_eq!(loaded.contact.friction, 0.15);
        assert_eq!(loaded.solver.cores, 12);
        assert_eq!(loaded.selection.top_name, config.selection.top_name);
    }
}
