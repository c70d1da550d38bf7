//! CAE Setup CLI Application

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;

use cae_setup::config::SetupConfig;
use cae_setup::contact::{build_contact_groups, parse_contact_tag, scan_target_ids};
use cae_setup::host::{AnalysisInfo, Axis, GeometryModel, SelectionStore};
use cae_setup::io::{
    read_model_snapshot, write_model_snapshot, write_selection_preview, RunReport,
};
use cae_setup::pipeline::{run_setup, StepSet};
use cae_setup::selection::{partition_extremum_faces, scan_axis_extremes, select_extremum_faces};

mod cli;
use cli::{Cli, Commands};

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    let log_level = if cli.debug {
        "debug"
    } else if cli.verbose {
        "info"
    } else {
        "warn"
    };

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    // Dispatch to command handlers
    match cli.command {
        Commands::Info { model } => cmd_info(model),
        Commands::Select {
            model,
            tolerance,
            axis,
            save,
            preview,
        } => cmd_select(model, tolerance, axis, save, preview),
        Commands::Contact {
            model,
            friction,
            tolerate_typos,
            save,
        } => cmd_contact(model, friction, tolerate_typos, save),
        Commands::Run {
            model,
            config,
            report,
            save,
            skip_selection,
            skip_contact,
            skip_mesh,
            skip_boundary,
            skip_solver,
            skip_post,
        } => {
            let steps = StepSet {
                selection: !skip_selection,
                contact: !skip_contact,
                mesh: !skip_mesh,
                boundary: !skip_boundary,
                solver: !skip_solver,
                post: !skip_post,
            };
            cmd_run(model, config, report, save, steps)
        }
    }
}

fn cmd_info(model: PathBuf) -> Result<()> {
    println!("Reading model snapshot: {}", model.display());

    let host = read_model_snapshot(&model)
        .with_context(|| format!("failed to load model snapshot {}", model.display()))?;
    let faces = host.faces()?;
    let bodies = host.bodies()?;
    let selections = host.named_selections()?;

    println!("\n{}", "=".repeat(60));
    println!("MODEL INFORMATION");
    println!("{}", "=".repeat(60));
    println!();
    println!("  Faces:             {}", faces.len());
    println!("  Bodies:            {}", bodies.len());
    println!("  Named Selections:  {}", selections.len());
    println!(
        "  Analysis:          {}",
        host.analysis_name().unwrap_or_else(|| "none".to_string())
    );
    println!();

    if !bodies.is_empty() {
        println!("Bodies:");
        for body in &bodies {
            let state = if body.suppressed { " (suppressed)" } else { "" };
            println!("  - {}{}", body.name, state);
        }
        println!();
    }

    if !selections.is_empty() {
        println!("Named Selections:");
        for ns in &selections {
            match parse_contact_tag(&ns.name) {
                Some(tag) => println!(
                    "  - {}: {} faces ({} side of pair {})",
                    ns.name,
                    ns.faces.len(),
                    tag.role,
                    tag.id
                ),
                None => println!("  - {}: {} faces", ns.name, ns.faces.len()),
            }
        }
        println!();
    }

    let target_ids = scan_target_ids(&selections);
    if !target_ids.is_empty() {
        println!("Contact target ids: {}", target_ids.join(", "));
        println!();
    }

    println!("{}", "=".repeat(60));

    Ok(())
}

fn cmd_select(
    model: PathBuf,
    tolerance: f64,
    axis: Axis,
    save: Option<PathBuf>,
    preview: Option<PathBuf>,
) -> Result<()> {
    let mut config = SetupConfig::default();
    config.selection.axis = axis;
    config.selection.tolerance_mm = tolerance;
    config.validate()?;

    let mut host = read_model_snapshot(&model)
        .with_context(|| format!("failed to load model snapshot {}", model.display()))?;
    let faces = host.faces()?;
    let outcome = select_extremum_faces(&mut host, &config.selection)?;

    println!("\n{}", "=".repeat(60));
    println!("EXTREMUM FACE SELECTION");
    println!("{}", "=".repeat(60));
    println!();
    println!("  Axis:        {}", outcome.axis);
    println!("  Tolerance:   {} mm", tolerance);
    println!("  Max:         {:.4} mm", outcome.extremes.max);
    println!("  Min:         {:.4} mm", outcome.extremes.min);
    println!();
    for bucket in [&outcome.top, &outcome.bottom] {
        let state = if bucket.created { "created" } else { "skipped" };
        println!(
            "  {}: {} faces ({})",
            bucket.name, bucket.face_count, state
        );
    }
    println!();
    println!("{}", "=".repeat(60));

    if let Some(path) = preview {
        let extremes = scan_axis_extremes(&faces, axis);
        let partition = partition_extremum_faces(&faces, axis, &extremes, tolerance);
        write_selection_preview(&faces, &partition, &path, None)?;
        println!("Preview written to {}", path.display());
    }

    if let Some(path) = save {
        write_model_snapshot(&host, &path)?;
        println!("Snapshot written to {}", path.display());
    }

    Ok(())
}

fn cmd_contact(
    model: PathBuf,
    friction: f64,
    tolerate_typos: bool,
    save: Option<PathBuf>,
) -> Result<()> {
    let mut config = SetupConfig::default();
    config.contact.friction = friction;
    if tolerate_typos {
        config.contact.tolerate_typos();
    }
    config.validate()?;

    let mut host = read_model_snapshot(&model)
        .with_context(|| format!("failed to load model snapshot {}", model.display()))?;
    let outcome = build_contact_groups(&mut host, &config.contact)?;

    println!("\n{}", "=".repeat(60));
    println!("CONTACT GROUP MATCHING");
    println!("{}", "=".repeat(60));
    println!();
    println!("  Groups cleared:  {}", outcome.groups_cleared);
    println!("  Groups created:  {}", outcome.groups_created);
    println!("  Pairs created:   {}", outcome.pairs_created);
    println!();

    if !outcome.skipped.is_empty() {
        println!("Skipped target ids:");
        for skip in &outcome.skipped {
            println!("  - {}: {}", skip.id, skip.reason);
        }
        println!();
    }

    println!("{}", "=".repeat(60));

    if let Some(path) = save {
        write_model_snapshot(&host, &path)?;
        println!("Snapshot written to {}", path.display());
    }

    Ok(())
}

fn cmd_run(
    model: PathBuf,
    config_path: Option<PathBuf>,
    report_path: Option<PathBuf>,
    save: Option<PathBuf>,
    steps: StepSet,
) -> Result<()> {
    let config = match config_path {
        Some(path) => SetupConfig::from_file(&path)
            .with_context(|| format!("failed to load configuration {}", path.display()))?,
        None => SetupConfig::default(),
    };
    config.validate()?;

    let mut host = read_model_snapshot(&model)
        .with_context(|| format!("failed to load model snapshot {}", model.display()))?;

    let spinner = indicatif::ProgressBar::new_spinner();
    spinner.set_message("Running setup pipeline...");
    spinner.enable_steady_tick(std::time::Duration::from_millis(100));

    let report: RunReport = run_setup(&mut host, &config, &steps);

    spinner.finish_and_clear();
    report.print_summary();

    if let Some(path) = report_path {
        report.export(&path)?;
        println!("Report written to {}", path.display());
    }

    // Steps that completed before a fault are still live in the host,
    // so the snapshot is written even for a failed run.
    if let Some(path) = save {
        write_model_snapshot(&host, &path)?;
        println!("Snapshot written to {}", path.display());
    }

    if report.failed() {
        std::process::exit(1);
    }

    Ok(())
}
