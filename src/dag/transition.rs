// src/dag/transition.rs

use std::fmt;

use thiserror::Error;
use tracing::{debug, info};

use crate::clock::{Clock, SystemClock};
use crate::dag::graph::ActivityGraph;
use crate::dag::readiness::Readiness;
use crate::project::{Activity, Project, Timestamp};
use crate::types::{ActivityId, ActivityStatus};

/// An activity named in a rejection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Blocker {
    pub id: ActivityId,
    pub name: String,
}

impl From<&Activity> for Blocker {
    fn from(activity: &Activity) -> Self {
        Self {
            id: activity.id,
            name: activity.name.clone(),
        }
    }
}

impl fmt::Display for Blocker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

fn names(blockers: &[Blocker]) -> String {
    blockers
        .iter()
        .map(|b| b.name.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Why a status change was refused. The project is left as it was.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Rejection {
    #[error("project is not editable")]
    NotEditable,

    #[error("activity {0} does not exist in this project")]
    UnknownActivity(ActivityId),

    /// Un-finishing an activity whose successors already relied on it.
    #[error(
        "cannot revert '{activity}': these activities have already started: {}",
        names(.blocking)
    )]
    SuccessorsStarted {
        activity: Blocker,
        blocking: Vec<Blocker>,
    },

    /// Starting or completing an activity before its dependencies are done.
    #[error(
        "cannot move '{activity}' to {target}: finish these dependencies first: {}",
        names(.pending)
    )]
    DependenciesPending {
        activity: Blocker,
        target: ActivityStatus,
        pending: Vec<Blocker>,
    },
}

impl Rejection {
    /// Activities the caller should point the user at.
    pub fn blockers(&self) -> &[Blocker] {
        match self {
            Rejection::SuccessorsStarted { blocking, .. } => blocking,
            Rejection::DependenciesPending { pending, .. } => pending,
            Rejection::NotEditable | Rejection::UnknownActivity(_) => &[],
        }
    }
}

/// Result of an accepted status change.
#[derive(Debug, Clone)]
pub struct Transition {
    /// The new snapshot. Equal to the input when `from == to`.
    pub project: Project,
    pub activity: ActivityId,
    pub from: ActivityStatus,
    pub to: ActivityStatus,
    /// The activity's `finish_actual` was stamped by this change.
    pub finish_stamped: bool,
    /// The project's `start_actual` was stamped by this change.
    pub project_started: bool,
}

impl Transition {
    pub fn is_noop(&self) -> bool {
        self.from == self.to
    }

    pub fn into_project(self) -> Project {
        self.project
    }
}

/// The only sanctioned way to change an activity's status.
///
/// Rules, in order:
/// 1. the project must be editable and the activity must exist;
/// 2. a change to the current status is a no-op;
/// 3. un-finishing is refused while a direct successor is in progress or
///    finished;
/// 4. moving to `InProgress` or `Completed` requires every dependency to be
///    finished, missing, or bypassed by a sibling's contingency path.
///
/// An accepted change keeps `finish_actual` in step with the status and
/// stamps the project's actual start on the first activity to begin.
#[derive(Debug, Clone, Default)]
pub struct StatusEngine<C: Clock = SystemClock> {
    clock: C,
}

impl<C: Clock> StatusEngine<C> {
    pub fn new(clock: C) -> Self {
        Self { clock }
    }

    pub fn apply(
        &self,
        project: &Project,
        id: ActivityId,
        to: ActivityStatus,
    ) -> Result<Transition, Rejection> {
        if !project.editable {
            return Err(Rejection::NotEditable);
        }

        let graph = ActivityGraph::from_project(project);
        let activity = graph.activity(id).ok_or(Rejection::UnknownActivity(id))?;
        let from = activity.status;

        if from == to {
            debug!(activity = id, status = %to, "status unchanged; no-op");
            return Ok(Transition {
                project: project.clone(),
                activity: id,
                from,
                to,
                finish_stamped: false,
                project_started: false,
            });
        }

        let rules = Readiness::new(&graph);

        if from.is_finished() && !to.is_finished() {
            let started = rules.started_successors(id);
            if !started.is_empty() {
                return Err(Rejection::SuccessorsStarted {
                    activity: activity.into(),
                    blocking: started.into_iter().map(Blocker::from).collect(),
                });
            }
        }

        if to.requires_ready_dependencies() {
            let pending = rules.unsatisfied_dependencies(id);
            if !pending.is_empty() {
                return Err(Rejection::DependenciesPending {
                    activity: activity.into(),
                    target: to,
                    pending: pending.into_iter().map(Blocker::from).collect(),
                });
            }
        }

        let first_to_start = to == ActivityStatus::InProgress
            && project.start_actual.is_none()
            && !graph.activities().any(|a| a.status.has_started());

        let now = Timestamp::from(self.clock.now());
        let mut next = project.clone();
        let mut finish_stamped = false;

        if first_to_start {
            next.start_actual = Some(now.clone());
        }

        if let Some(target) = next.activities.iter_mut().rev().find(|a| a.id == id) {
            target.status = to;
            if to.is_finished() {
                if target.finish_actual.is_none() {
                    target.finish_actual = Some(now);
                    finish_stamped = true;
                }
            } else {
                target.finish_actual = None;
            }
        }

        info!(
            activity = id,
            from = %from,
            to = %to,
            project_started = first_to_start,
            "activity status changed"
        );

        Ok(Transition {
            project: next,
            activity: id,
            from,
            to,
            finish_stamped,
            project_started: first_to_start,
        })
    }
}

/// Apply a status change using the system clock.
pub fn apply_status_change(
    project: &Project,
    id: ActivityId,
    to: ActivityStatus,
) -> Result<Project, Rejection> {
    StatusEngine::new(SystemClock)
        .apply(project, id, to)
        .map(Transition::into_project)
}
