// src/dag/mod.rs

//! Scheduling and status-consistency engine over the activity network.
//!
//! - [`graph`] indexes one project snapshot as normal-flow and
//!   contingency-flow adjacency.
//! - [`dates`] propagates durations forward to compute completion dates.
//! - [`readiness`] holds the dependency-satisfaction and reversal rules.
//! - [`transition`] validates and applies a single status change.
//! - [`progress`] derives the project-level status.

pub mod dates;
pub mod graph;
pub mod progress;
pub mod readiness;
pub mod transition;

pub use dates::{
    ActivityDates, DateMode, DateSource, Schedule, ScheduleError, compute_project_end_date,
    compute_schedule,
};
pub use graph::ActivityGraph;
pub use progress::derive_project_status;
pub use readiness::Readiness;
pub use transition::{Blocker, Rejection, StatusEngine, Transition, apply_status_change};
