// src/dag/dates.rs

//! Forward propagation of finish dates over the normal-flow graph.
//!
//! Each activity starts at the latest finish among its dependencies (or at
//! the project's base start when it has none) and finishes `duration_hours`
//! later. In [`DateMode::Estimated`] a recorded actual finish overrides the
//! projection for that activity, and the project's actual start, when known,
//! replaces the planned one as the base.
//!
//! Traversal is iterative with an explicit visitation tag per activity, so a
//! cyclic dependency list yields [`ScheduleError::Cycle`] instead of
//! unbounded recursion.

use std::collections::HashMap;

use chrono::{DateTime, TimeDelta, Utc};
use thiserror::Error;
use tracing::{debug, warn};

use crate::dag::graph::ActivityGraph;
use crate::project::{Activity, Project};
use crate::types::ActivityId;

const MILLIS_PER_HOUR: f64 = 3_600_000.0;

/// Which dates are treated as ground truth.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateMode {
    /// Blend recorded progress (actual start, actual finishes) into the
    /// forecast.
    Estimated,
    /// Pure planned baseline; recorded dates are ignored.
    Planned,
}

impl DateMode {
    pub fn uses_actual_dates(self) -> bool {
        matches!(self, DateMode::Estimated)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScheduleError {
    #[error("cycle detected in activity dependencies involving activity {0}")]
    Cycle(ActivityId),
}

/// Where an activity's finish date came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateSource {
    Projected,
    Actual,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActivityDates {
    /// `None` when the finish was taken from the recorded actual finish.
    pub start: Option<DateTime<Utc>>,
    pub finish: DateTime<Utc>,
    pub source: DateSource,
}

/// Computed dates for every activity of one snapshot.
#[derive(Debug, Clone)]
pub struct Schedule {
    pub mode: DateMode,
    pub base_start: DateTime<Utc>,
    order: Vec<ActivityId>,
    dates: HashMap<ActivityId, ActivityDates>,
}

impl Schedule {
    pub fn get(&self, id: ActivityId) -> Option<&ActivityDates> {
        self.dates.get(&id)
    }

    pub fn finish_of(&self, id: ActivityId) -> Option<DateTime<Utc>> {
        self.get(id).map(|d| d.finish)
    }

    pub fn start_of(&self, id: ActivityId) -> Option<DateTime<Utc>> {
        self.get(id).and_then(|d| d.start)
    }

    /// Entries in project order.
    pub fn iter(&self) -> impl Iterator<Item = (ActivityId, &ActivityDates)> {
        self.order
            .iter()
            .filter_map(|id| self.dates.get(id).map(|d| (*id, d)))
    }

    /// Latest finish over all activities, or the base start if none resolved.
    pub fn end_date(&self) -> DateTime<Utc> {
        self.dates
            .values()
            .map(|d| d.finish)
            .max()
            .unwrap_or(self.base_start)
    }
}

/// Project completion date.
///
/// `Ok(None)` when the project has no activities or its base start cannot be
/// parsed; these are routine states of a project being edited, not errors.
pub fn compute_project_end_date(
    project: &Project,
    mode: DateMode,
) -> Result<Option<DateTime<Utc>>, ScheduleError> {
    Ok(compute_schedule(project, mode)?.map(|s| s.end_date()))
}

/// Per-activity dates. See [`compute_project_end_date`] for the `None` cases.
pub fn compute_schedule(
    project: &Project,
    mode: DateMode,
) -> Result<Option<Schedule>, ScheduleError> {
    if project.activities.is_empty() {
        return Ok(None);
    }

    let Some(base_start) = base_start(project, mode) else {
        warn!(
            start_planned = %project.start_planned,
            "project start date is not a valid timestamp; no dates computed"
        );
        return Ok(None);
    };

    let graph = ActivityGraph::from_project(project);
    let mut propagation = Propagation::new(&graph, mode, base_start);

    for activity in project.activities.iter() {
        propagation.resolve(activity.id)?;
    }

    let order = project.activities.iter().map(|a| a.id).collect();
    Ok(Some(Schedule {
        mode,
        base_start,
        order,
        dates: propagation.finish(),
    }))
}

fn base_start(project: &Project, mode: DateMode) -> Option<DateTime<Utc>> {
    let actual = project
        .start_actual
        .as_ref()
        .filter(|_| mode.uses_actual_dates());
    match actual {
        Some(ts) => ts.parse(),
        None => project.start_planned.parse(),
    }
}

fn duration_of(activity: &Activity) -> TimeDelta {
    let hours = activity.duration_hours;
    if !hours.is_finite() || hours <= 0.0 {
        return TimeDelta::zero();
    }
    let millis = (hours * MILLIS_PER_HOUR).round();
    TimeDelta::try_milliseconds(millis as i64).unwrap_or(TimeDelta::MAX)
}

#[derive(Debug, Clone, Copy)]
enum Visit {
    InProgress,
    Done(ActivityDates),
}

struct Propagation<'g, 'a> {
    graph: &'g ActivityGraph<'a>,
    mode: DateMode,
    base_start: DateTime<Utc>,
    visits: HashMap<ActivityId, Visit>,
}

impl<'g, 'a> Propagation<'g, 'a> {
    fn new(graph: &'g ActivityGraph<'a>, mode: DateMode, base_start: DateTime<Utc>) -> Self {
        Self {
            graph,
            mode,
            base_start,
            visits: HashMap::new(),
        }
    }

    fn finish(self) -> HashMap<ActivityId, ActivityDates> {
        self.visits
            .into_iter()
            .filter_map(|(id, v)| match v {
                Visit::Done(dates) => Some((id, dates)),
                Visit::InProgress => None,
            })
            .collect()
    }

    fn finish_date(&self, id: ActivityId) -> Option<DateTime<Utc>> {
        match self.visits.get(&id) {
            Some(Visit::Done(d)) => Some(d.finish),
            _ => None,
        }
    }

    /// Resolve `root` and everything it depends on.
    ///
    /// Stack entries are `(id, expanded)`: an unexpanded entry pushes its
    /// dependencies, the expanded entry computes once they are done.
    fn resolve(&mut self, root: ActivityId) -> Result<(), ScheduleError> {
        let mut stack: Vec<(ActivityId, bool)> = vec![(root, false)];

        while let Some((id, expanded)) = stack.pop() {
            if expanded {
                let dates = self.project_dates(id);
                self.visits.insert(id, Visit::Done(dates));
                continue;
            }

            match self.visits.get(&id) {
                Some(Visit::Done(_)) => continue,
                Some(Visit::InProgress) => return Err(ScheduleError::Cycle(id)),
                None => {}
            }

            let Some(activity) = self.graph.activity(id) else {
                // Dangling reference: no finish date, ignored by dependents.
                continue;
            };

            if let Some(finish) = self.actual_finish(activity) {
                self.visits.insert(
                    id,
                    Visit::Done(ActivityDates {
                        start: None,
                        finish,
                        source: DateSource::Actual,
                    }),
                );
                continue;
            }

            self.visits.insert(id, Visit::InProgress);
            stack.push((id, true));

            for dep in self.graph.dependencies_of(id) {
                match self.visits.get(&dep) {
                    Some(Visit::Done(_)) => {}
                    Some(Visit::InProgress) => return Err(ScheduleError::Cycle(dep)),
                    None => stack.push((dep, false)),
                }
            }
        }

        Ok(())
    }

    fn actual_finish(&self, activity: &Activity) -> Option<DateTime<Utc>> {
        if !self.mode.uses_actual_dates() {
            return None;
        }
        let raw = activity.finish_actual.as_ref()?;
        let parsed = raw.parse();
        if parsed.is_none() {
            warn!(
                activity = activity.id,
                finish_actual = %raw,
                "unparseable actual finish; falling back to projection"
            );
        }
        parsed
    }

    /// Dates for an activity whose dependencies are all resolved.
    fn project_dates(&self, id: ActivityId) -> ActivityDates {
        let start = self
            .graph
            .dependencies_of(id)
            .into_iter()
            .filter_map(|dep| self.finish_date(dep))
            .max()
            .unwrap_or(self.base_start);

        let duration = self
            .graph
            .activity(id)
            .map(duration_of)
            .unwrap_or_else(TimeDelta::zero);

        let finish = start.checked_add_signed(duration).unwrap_or_else(|| {
            warn!(activity = id, "finish date out of range; saturating");
            DateTime::<Utc>::MAX_UTC
        });

        debug!(activity = id, %start, %finish, "projected activity dates");

        ActivityDates {
            start: Some(start),
            finish,
            source: DateSource::Projected,
        }
    }
}
