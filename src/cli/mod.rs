//! CLI commands and interface

use cae_setup::host::Axis;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "cae-setup")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub debug: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Display information about a model snapshot
    Info {
        /// Path to the model snapshot (JSON)
        #[arg(value_name = "FILE")]
        model: PathBuf,
    },

    /// Create top/bottom extremum face selections
    Select {
        /// Path to the model snapshot (JSON)
        #[arg(value_name = "FILE")]
        model: PathBuf,

        /// Centroid matching tolerance in mm
        #[arg(long, default_value = "0.001")]
        tolerance: f64,

        /// Model axis to scan (x, y, or z)
        #[arg(long, default_value = "z")]
        axis: Axis,

        /// Write the updated snapshot to this path
        #[arg(short, long, value_name = "FILE")]
        save: Option<PathBuf>,

        /// Write a VTU preview of the face buckets
        #[arg(long, value_name = "FILE")]
        preview: Option<PathBuf>,
    },

    /// Match tagged selections into contact groups
    Contact {
        /// Path to the model snapshot (JSON)
        #[arg(value_name = "FILE")]
        model: PathBuf,

        /// Friction coefficient for frictional pairs
        #[arg(long, default_value = "0.2")]
        friction: f64,

        /// Also accept known misspellings of the contact tag
        #[arg(long)]
        tolerate_typos: bool,

        /// Write the updated snapshot to this path
        #[arg(short, long, value_name = "FILE")]
        save: Option<PathBuf>,
    },

    /// Run the full setup pipeline
    Run {
        /// Path to the model snapshot (JSON)
        #[arg(value_name = "FILE")]
        model: PathBuf,

        /// Configuration file (JSON)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Write the run report to this path
        #[arg(short, long, value_name = "FILE")]
        report: Option<PathBuf>,

        /// Write the updated snapshot to this path
        #[arg(short, long, value_name = "FILE")]
        save: Option<PathBuf>,

        /// Skip the face selection step
        #[arg(long)]
        skip_selection: bool,

        /// Skip the contact matching step
        #[arg(long)]
        skip_contact: bool,

        /// Skip the mesh setup step
        #[arg(long)]
        skip_mesh: bool,

        /// Skip the boundary condition step
        #[arg(long)]
        skip_boundary: bool,

        /// Skip the solver setup step
        #[arg(long)]
        skip_solver: bool,

        /// Skip the result object step
        #[arg(long)]
        skip_post: bool,
    },
}
