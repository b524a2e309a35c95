// src/dag/progress.rs

//! Project-level status, derived from the activities on every read.
//!
//! The projection looks only at the activities with the lowest and highest
//! ids, taken as stand-ins for the start and the end of the network. It does
//! not consult the dependency graph, so it can misreport projects whose id
//! order differs from their topological order.

use crate::project::Project;
use crate::types::{ActivityStatus, ProjectStatus};

pub fn derive_project_status(project: &Project) -> ProjectStatus {
    let (Some(first), Some(last)) = (project.lowest_id_activity(), project.highest_id_activity())
    else {
        return ProjectStatus::Planning;
    };

    if first.status == ActivityStatus::Pending {
        return ProjectStatus::Planning;
    }

    match last.status {
        ActivityStatus::Pending => ProjectStatus::InProgress,
        other => other.into(),
    }
}
