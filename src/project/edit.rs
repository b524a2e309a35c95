// src/project/edit.rs

//! Copy-on-write edit operations on a project snapshot.
//!
//! These never change an activity's status: an upserted activity keeps the
//! status and actual finish it already had, or starts `Pending`. Status
//! changes go through [`crate::dag::StatusEngine`].

use thiserror::Error;
use tracing::{debug, warn};

use crate::clock::Clock;
use crate::project::model::{Activity, Project, Responsible, Timestamp};
use crate::types::{ActivityId, ActivityStatus};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EditError {
    #[error("project is not editable")]
    NotEditable,

    #[error("activity {0} does not exist in this project")]
    ActivityNotFound(ActivityId),

    #[error("invalid activity {id}: {reason}")]
    InvalidActivity { id: ActivityId, reason: String },
}

/// Header fields of a project, as entered when creating or editing it.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ProjectDetails {
    pub name: String,
    pub work_order: String,
    pub summary: String,
    pub responsible: Vec<Responsible>,
    pub editable: bool,
    /// Only honoured by [`new_project`]; defaults to "now".
    pub start_planned: Option<Timestamp>,
}

/// Start an empty project.
pub fn new_project(details: ProjectDetails, clock: &impl Clock) -> Project {
    let start = details
        .start_planned
        .unwrap_or_else(|| Timestamp::from(clock.now()));
    let mut project = Project::new(details.name, start);
    project.work_order = details.work_order;
    project.summary = details.summary;
    project.responsible = details.responsible;
    project.editable = details.editable;
    project
}

/// Replace the header fields. The planned start is fixed at creation and is
/// left untouched.
pub fn update_details(project: &Project, details: ProjectDetails) -> Result<Project, EditError> {
    ensure_editable(project)?;

    if details
        .start_planned
        .as_ref()
        .is_some_and(|s| *s != project.start_planned)
    {
        warn!("planned start cannot change after creation; ignoring new value");
    }

    let mut next = project.clone();
    next.name = details.name;
    next.work_order = details.work_order;
    next.summary = details.summary;
    next.responsible = details.responsible;
    next.editable = details.editable;
    Ok(next)
}

/// Insert a new activity at the end, or replace the one with the same id in
/// place.
pub fn upsert_activity(project: &Project, activity: Activity) -> Result<Project, EditError> {
    ensure_editable(project)?;
    check_activity(&activity)?;

    for &other in activity.dependencies.iter().chain(activity.error_go_to.iter()) {
        if project.activity(other).is_none() {
            warn!(activity = activity.id, reference = other, "reference to unknown activity");
        }
    }

    let mut next = project.clone();
    match next.activities.iter().position(|a| a.id == activity.id) {
        Some(pos) => {
            debug!(activity = activity.id, "replacing activity");
            let existing = &mut next.activities[pos];
            let status = existing.status;
            let finish_actual = existing.finish_actual.take();
            *existing = Activity {
                status,
                finish_actual,
                ..activity
            };
        }
        None => {
            debug!(activity = activity.id, "appending activity");
            next.activities.push(Activity {
                status: ActivityStatus::Pending,
                finish_actual: None,
                ..activity
            });
        }
    }
    Ok(next)
}

/// Remove an activity and every reference to it.
pub fn delete_activity(project: &Project, id: ActivityId) -> Result<Project, EditError> {
    ensure_editable(project)?;
    if project.activity(id).is_none() {
        return Err(EditError::ActivityNotFound(id));
    }

    let mut next = project.clone();
    next.activities.retain(|a| a.id != id);
    for activity in next.activities.iter_mut() {
        activity.dependencies.retain(|&d| d != id);
        activity.error_go_to.retain(|&t| t != id);
    }
    debug!(activity = id, "deleted activity");
    Ok(next)
}

/// Id for a new activity: later than every existing one and, like the ids
/// produced by the editing front-end, derived from the creation time.
pub fn next_activity_id(project: &Project, clock: &impl Clock) -> ActivityId {
    let after_existing = project
        .activities
        .iter()
        .map(|a| a.id)
        .max()
        .map_or(1, |max| max.saturating_add(1));
    clock.now().timestamp_millis().max(after_existing)
}

fn ensure_editable(project: &Project) -> Result<(), EditError> {
    if project.editable {
        Ok(())
    } else {
        Err(EditError::NotEditable)
    }
}

fn check_activity(activity: &Activity) -> Result<(), EditError> {
    let invalid = |reason: &str| EditError::InvalidActivity {
        id: activity.id,
        reason: reason.to_string(),
    };

    if activity.name.trim().is_empty() {
        return Err(invalid("name must not be empty"));
    }
    if !activity.duration_hours.is_finite() || activity.duration_hours <= 0.0 {
        return Err(invalid("duration must be a positive number of hours"));
    }
    if activity.dependencies.contains(&activity.id) {
        return Err(invalid("an activity cannot depend on itself"));
    }
    if activity.error_go_to.contains(&activity.id) {
        return Err(invalid("an activity cannot redirect errors to itself"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use chrono::{TimeZone, Utc};

    fn clock() -> FixedClock {
        FixedClock(Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap())
    }

    fn base() -> Project {
        let mut p = Project::new("p", "2024-01-01T00:00");
        let mut second = Activity::new(2, "second", 2.0);
        second.dependencies = vec![1];
        let mut third = Activity::new(3, "third", 2.0);
        third.dependencies = vec![1, 2];
        third.error_go_to = vec![1];
        p.activities = vec![Activity::new(1, "first", 1.0), second, third];
        p
    }

    #[test]
    fn new_project_defaults_start_to_now() {
        let p = new_project(
            ProjectDetails {
                name: "Turnaround".into(),
                editable: true,
                ..Default::default()
            },
            &clock(),
        );
        assert_eq!(p.start_planned, Timestamp::new("2024-05-01T12:00:00Z"));
        assert!(p.activities.is_empty());
        assert!(p.start_actual.is_none());
    }

    #[test]
    fn update_details_keeps_planned_start() {
        let p = base();
        let next = update_details(
            &p,
            ProjectDetails {
                name: "renamed".into(),
                work_order: "WO-17".into(),
                editable: true,
                start_planned: Some(Timestamp::new("2030-01-01T00:00")),
                ..Default::default()
            },
        )
        .unwrap();
        assert_eq!(next.name, "renamed");
        assert_eq!(next.work_order, "WO-17");
        assert_eq!(next.start_planned, p.start_planned);
    }

    #[test]
    fn upsert_replaces_in_place_and_keeps_status() {
        let mut p = base();
        p.activities[0].status = ActivityStatus::Completed;
        p.activities[0].finish_actual = Some(Timestamp::new("2024-01-01T01:00:00Z"));

        let mut edited = Activity::new(1, "first (renamed)", 3.0);
        edited.status = ActivityStatus::Pending;
        let next = upsert_activity(&p, edited).unwrap();

        assert_eq!(next.activities[0].name, "first (renamed)");
        assert_eq!(next.activities[0].duration_hours, 3.0);
        assert_eq!(next.activities[0].status, ActivityStatus::Completed);
        assert!(next.activities[0].finish_actual.is_some());
    }

    #[test]
    fn upsert_appends_new_activity_as_pending() {
        let mut fresh = Activity::new(10, "fourth", 1.0);
        fresh.status = ActivityStatus::Completed;
        let next = upsert_activity(&base(), fresh).unwrap();
        let last = next.activities.last().unwrap();
        assert_eq!(last.id, 10);
        assert_eq!(last.status, ActivityStatus::Pending);
    }

    #[test]
    fn upsert_rejects_bad_activities() {
        let p = base();
        assert!(upsert_activity(&p, Activity::new(9, "  ", 1.0)).is_err());
        assert!(upsert_activity(&p, Activity::new(9, "x", 0.0)).is_err());
        let mut selfish = Activity::new(9, "x", 1.0);
        selfish.dependencies = vec![9];
        assert!(matches!(
            upsert_activity(&p, selfish),
            Err(EditError::InvalidActivity { id: 9, .. })
        ));
    }

    #[test]
    fn delete_strips_references() {
        let next = delete_activity(&base(), 1).unwrap();
        assert_eq!(next.activities.len(), 2);
        assert_eq!(next.activities[0].dependencies, Vec::<ActivityId>::new());
        assert_eq!(next.activities[1].dependencies, vec![2]);
        assert!(next.activities[1].error_go_to.is_empty());
    }

    #[test]
    fn delete_unknown_activity_fails() {
        assert_eq!(
            delete_activity(&base(), 42).unwrap_err(),
            EditError::ActivityNotFound(42)
        );
    }

    #[test]
    fn locked_project_refuses_edits() {
        let mut p = base();
        p.editable = false;
        assert_eq!(delete_activity(&p, 1).unwrap_err(), EditError::NotEditable);
        assert_eq!(
            upsert_activity(&p, Activity::new(4, "x", 1.0)).unwrap_err(),
            EditError::NotEditable
        );
        assert_eq!(
            update_details(&p, ProjectDetails::default()).unwrap_err(),
            EditError::NotEditable
        );
    }

    #[test]
    fn next_id_is_monotonic() {
        let p = base();
        let id = next_activity_id(&p, &clock());
        assert_eq!(id, clock().0.timestamp_millis());

        let mut far_future = base();
        far_future.activities[0].id = i64::MAX - 1;
        assert_eq!(next_activity_id(&far_future, &clock()), i64::MAX);
    }
}
