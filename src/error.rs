//! Error types for the setup automation
//!
//! This module defines all error types that can occur while driving a host
//! session: prerequisite checks, configuration validation, and faults raised
//! by the host adapter itself.

use thiserror::Error;

/// Error types for setup automation operations
///
/// The taxonomy follows the run policy: missing prerequisites make a step
/// skippable, configuration errors are rejected before any host call, and
/// host faults terminate the run at the point they occur (mutations already
/// committed to the host are not rolled back).
#[derive(Error, Debug)]
pub enum SetupError {
    /// The host adapter raised an unexpected fault
    ///
    /// Anything the concrete host reports that the tools did not anticipate:
    /// a failed object creation, a stale reference, a refused property
    /// write. The full diagnostic string from the adapter is preserved.
    #[error("Host fault: {0}")]
    HostFault(String),

    /// A step's prerequisite is missing from the model
    ///
    /// Raised when a tool needs something the project does not have, such as
    /// an analysis system for boundary or solver setup. The pipeline treats
    /// this as "skip the step with a warning", never as a fatal error.
    #[error("Missing prerequisite: {0}")]
    MissingPrerequisite(String),

    /// Configuration error
    ///
    /// Invalid configuration file format, missing required fields, or
    /// parameter values outside their accepted range. Checked at the input
    /// boundary before any host mutation is attempted.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// File I/O error
    ///
    /// Wraps standard I/O errors from snapshot, config and report files.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// VTK preview writing error
    #[error("VTK error: {0}")]
    VtkError(String),
}

/// Convenience type alias for Results with [`SetupError`]
///
/// # Example
/// ```
/// use cae_setup::Result;
///
/// fn my_function() -> Result<()> {
///     Ok(())
/// }
/// ```
pub type Result<T> = std::result::Result<T, SetupError>;
