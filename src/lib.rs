// src/lib.rs

pub mod cli;
pub mod clock;
pub mod config;
pub mod dag;
pub mod errors;
pub mod logging;
pub mod project;
pub mod types;

use std::path::Path;

use anyhow::{Context, Result};
use tracing::{debug, info, warn};

use crate::cli::{CliArgs, Command};
use crate::clock::SystemClock;
use crate::config::{ConfigFile, default_config_path, load_or_default};
use crate::dag::{DateMode, Schedule, StatusEngine, compute_schedule, derive_project_status};
use crate::errors::PertrackError;
use crate::project::{
    Activity, Project, ProjectDetails, Timestamp, delete_activity, load_and_validate,
    load_from_path, new_project, next_activity_id, save_to_path, upsert_activity,
};
use crate::types::{ActivityId, ActivityStatus};

/// High-level entry point used by `main.rs`.
///
/// Loads config, then dispatches one subcommand. Every mutating command
/// reads the project file, runs the engine on the snapshot, and writes the
/// resulting snapshot back whole.
pub fn run(args: CliArgs) -> Result<()> {
    let explicit = args.config.is_some();
    let config_path = args.config.clone().unwrap_or_else(default_config_path);
    let cfg = load_or_default(&config_path, explicit)
        .with_context(|| format!("loading config from {}", config_path.display()))?;

    match args.command {
        Command::New {
            project,
            name,
            work_order,
            start,
        } => cmd_new(&project, name, work_order, start),
        Command::Dates { project } => cmd_dates(&project, &cfg),
        Command::Status { project } => cmd_status(&project),
        Command::SetStatus {
            project,
            activity,
            status,
            write,
        } => cmd_set_status(&project, activity, status, write),
        Command::AddActivity {
            project,
            name,
            hours,
            after,
            on_error,
            activity_type,
            description,
        } => {
            let snapshot = read_project(&project)?;
            let mut activity = Activity::new(
                next_activity_id(&snapshot, &SystemClock),
                name,
                hours.unwrap_or(cfg.config.default_duration_hours),
            );
            activity.dependencies = after;
            activity.error_go_to = on_error;
            activity.activity_type = activity_type;
            activity.description = description;
            if cfg.activity_type(activity_type).is_none() {
                warn!(activity_type, "activity type is not in the configured catalog");
            }
            let id = activity.id;
            let next = upsert_activity(&snapshot, activity).map_err(PertrackError::from)?;
            save_to_path(&next, &project)?;
            println!("added activity {id}");
            Ok(())
        }
        Command::RemoveActivity { project, activity } => {
            let snapshot = read_project(&project)?;
            let next = delete_activity(&snapshot, activity).map_err(PertrackError::from)?;
            save_to_path(&next, &project)?;
            println!("removed activity {activity}");
            Ok(())
        }
        Command::Check { project } => cmd_check(&project, &cfg),
    }
}

fn read_project(path: &Path) -> Result<Project> {
    load_from_path(path).with_context(|| format!("reading project {}", path.display()))
}

fn cmd_new(path: &Path, name: String, work_order: String, start: Option<String>) -> Result<()> {
    if path.exists() {
        anyhow::bail!("{} already exists", path.display());
    }
    let project = new_project(
        ProjectDetails {
            name,
            work_order,
            editable: true,
            start_planned: start.map(Timestamp::new),
            ..Default::default()
        },
        &SystemClock,
    );
    if project.start_planned.parse().is_none() {
        warn!(start = %project.start_planned, "planned start is not a valid timestamp");
    }
    save_to_path(&project, path)?;
    info!(path = %path.display(), "created project");
    Ok(())
}

fn cmd_dates(path: &Path, cfg: &ConfigFile) -> Result<()> {
    let project = read_project(path)?;
    let headline: DateMode = cfg.config.headline_date.into();

    let estimated = compute_schedule(&project, DateMode::Estimated).map_err(PertrackError::from)?;
    let planned = compute_schedule(&project, DateMode::Planned).map_err(PertrackError::from)?;

    let fmt_end = |s: &Option<Schedule>| {
        s.as_ref()
            .map(|s| s.end_date().to_rfc3339())
            .unwrap_or_else(|| "-".to_string())
    };

    let (first, second) = match headline {
        DateMode::Estimated => (("estimated", &estimated), ("planned", &planned)),
        DateMode::Planned => (("planned", &planned), ("estimated", &estimated)),
    };
    println!("{}", project.name);
    println!("  {} end: {}", first.0, fmt_end(first.1));
    println!("  {} end: {}", second.0, fmt_end(second.1));

    if let Some(schedule) = first.1 {
        println!();
        for (id, dates) in schedule.iter() {
            let start = dates
                .start
                .map(|s| s.to_rfc3339())
                .unwrap_or_else(|| "(actual)".to_string());
            println!(
                "  [{id}] {:<30} {start} -> {}",
                project.activity_name(id),
                dates.finish.to_rfc3339()
            );
        }
    }
    Ok(())
}

fn cmd_status(path: &Path) -> Result<()> {
    let project = read_project(path)?;
    println!("{}: {}", project.name, derive_project_status(&project));
    for activity in project.activities.iter() {
        println!("  [{}] {:<30} {}", activity.id, activity.name, activity.status);
    }
    Ok(())
}

fn cmd_set_status(path: &Path, id: ActivityId, status: ActivityStatus, write: bool) -> Result<()> {
    let project = read_project(path)?;
    let engine = StatusEngine::new(SystemClock);

    let transition = engine
        .apply(&project, id, status)
        .map_err(PertrackError::from)?;

    if transition.is_noop() {
        println!("activity {id} is already {status}");
        return Ok(());
    }

    println!("activity {id}: {} -> {}", transition.from, transition.to);
    if transition.project_started {
        println!("project started");
    }

    if write {
        save_to_path(&transition.project, path)?;
        debug!(path = %path.display(), "wrote updated project");
    }
    Ok(())
}

fn cmd_check(path: &Path, cfg: &ConfigFile) -> Result<()> {
    let (project, warnings) = load_and_validate(path, cfg)
        .with_context(|| format!("checking project {}", path.display()))?;
    for w in warnings.iter() {
        println!("warning: {w}");
    }
    println!(
        "{}: {} activities, {} warning(s)",
        project.name,
        project.activities.len(),
        warnings.len()
    );
    Ok(())
}
