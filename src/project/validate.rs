// src/project/validate.rs

//! Structural checks for a loaded project.
//!
//! Hard errors are things the engines cannot work around (duplicate ids,
//! empty names, non-positive durations). Dangling references and unknown
//! activity types are tolerated by the engines and only reported as
//! warnings. Cycles are not looked for here; the date engine reports them
//! when it meets one.

use std::collections::HashSet;

use tracing::warn;

use crate::config::ConfigFile;
use crate::dag::ActivityGraph;
use crate::errors::{PertrackError, Result};
use crate::project::model::{Project, Timestamp};
use crate::types::ActivityId;

/// Something odd about a project that does not stop it from being used.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProjectWarning {
    DanglingReference { activity: ActivityId, reference: ActivityId },
    UnknownActivityType { activity: ActivityId, activity_type: u32 },
    FinishWithoutFinishedStatus { activity: ActivityId },
    UnparseableTimestamp { field: String, value: String },
}

impl std::fmt::Display for ProjectWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProjectWarning::DanglingReference {
                activity,
                reference,
            } => write!(f, "activity {activity} references unknown activity {reference}"),
            ProjectWarning::UnknownActivityType {
                activity,
                activity_type,
            } => write!(f, "activity {activity} has unknown activity type {activity_type}"),
            ProjectWarning::FinishWithoutFinishedStatus { activity } => write!(
                f,
                "activity {activity} has an actual finish but is not finished"
            ),
            ProjectWarning::UnparseableTimestamp { field, value } => {
                write!(f, "{field} is not a valid timestamp: {value:?}")
            }
        }
    }
}

/// Validate a project, returning the non-fatal findings.
pub fn validate_project(project: &Project, cfg: &ConfigFile) -> Result<Vec<ProjectWarning>> {
    ensure_unique_ids(project)?;
    ensure_activity_fields(project)?;

    let mut warnings = Vec::new();
    collect_timestamp_warnings(project, &mut warnings);
    collect_reference_warnings(project, cfg, &mut warnings);

    for w in warnings.iter() {
        warn!(project = %project.name, "{w}");
    }
    Ok(warnings)
}

fn ensure_unique_ids(project: &Project) -> Result<()> {
    let mut seen = HashSet::new();
    for activity in project.activities.iter() {
        if !seen.insert(activity.id) {
            return Err(PertrackError::ProjectError(format!(
                "activity id {} is used more than once",
                activity.id
            )));
        }
    }
    Ok(())
}

fn ensure_activity_fields(project: &Project) -> Result<()> {
    for activity in project.activities.iter() {
        if activity.name.trim().is_empty() {
            return Err(PertrackError::ProjectError(format!(
                "activity {} has an empty name",
                activity.id
            )));
        }
        if !activity.duration_hours.is_finite() || activity.duration_hours <= 0.0 {
            return Err(PertrackError::ProjectError(format!(
                "activity '{}' must have a positive duration (got {})",
                activity.name, activity.duration_hours
            )));
        }
    }
    Ok(())
}

fn collect_timestamp_warnings(project: &Project, warnings: &mut Vec<ProjectWarning>) {
    let mut check = |field: String, value: &Timestamp| {
        if value.parse().is_none() {
            warnings.push(ProjectWarning::UnparseableTimestamp {
                field,
                value: value.to_string(),
            });
        }
    };

    check("start_planned".to_string(), &project.start_planned);
    if let Some(ts) = project.start_actual.as_ref() {
        check("start_actual".to_string(), ts);
    }
    for activity in project.activities.iter() {
        if let Some(ts) = activity.finish_actual.as_ref() {
            check(format!("activity {} finish_actual", activity.id), ts);
        }
    }
}

fn collect_reference_warnings(
    project: &Project,
    cfg: &ConfigFile,
    warnings: &mut Vec<ProjectWarning>,
) {
    let graph = ActivityGraph::from_project(project);
    for (activity, reference) in graph.dangling_references() {
        warnings.push(ProjectWarning::DanglingReference {
            activity,
            reference,
        });
    }

    for activity in project.activities.iter() {
        if cfg.activity_type(activity.activity_type).is_none() {
            warnings.push(ProjectWarning::UnknownActivityType {
                activity: activity.id,
                activity_type: activity.activity_type,
            });
        }
        if activity.finish_actual.is_some() && !activity.status.is_finished() {
            warnings.push(ProjectWarning::FinishWithoutFinishedStatus {
                activity: activity.id,
            });
        }
    }
}
