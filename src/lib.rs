//! CAE Setup Library
//!
//! Typed automation for simulation model setup: extremum face selection,
//! tagged contact pair matching, mesh, boundary, solver, and result
//! configuration against a pluggable host session.

pub mod config;
pub mod contact;
pub mod error;
pub mod host;
pub mod io;
pub mod pipeline;
pub mod selection;
pub mod setup;

pub use error::{Result, SetupError};
