// src/types.rs

//! Shared vocabulary: activity ids and the closed status enumerations.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Activity identifier, unique within a project and never reused.
pub type ActivityId = i64;

/// Execution status of a single activity.
///
/// There is no designated initial or terminal variant: whether a change is
/// legal depends on the surrounding graph, see [`crate::dag::transition`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityStatus {
    #[serde(alias = "Pendente")]
    Pending,
    #[serde(alias = "Em Andamento")]
    InProgress,
    #[serde(alias = "Concluído")]
    Completed,
    #[serde(alias = "Concluído com erros")]
    CompletedWithErrors,
    #[serde(alias = "Interrompido")]
    Interrupted,
}

impl ActivityStatus {
    pub const ALL: [ActivityStatus; 5] = [
        ActivityStatus::Pending,
        ActivityStatus::InProgress,
        ActivityStatus::Completed,
        ActivityStatus::CompletedWithErrors,
        ActivityStatus::Interrupted,
    ];

    /// Whether the activity is done, successfully or not.
    pub fn is_finished(self) -> bool {
        match self {
            ActivityStatus::Completed
            | ActivityStatus::CompletedWithErrors
            | ActivityStatus::Interrupted => true,
            ActivityStatus::Pending | ActivityStatus::InProgress => false,
        }
    }

    /// `InProgress` or finished: the activity has been started at some point.
    pub fn has_started(self) -> bool {
        match self {
            ActivityStatus::Pending => false,
            ActivityStatus::InProgress => true,
            other => other.is_finished(),
        }
    }

    /// Statuses that require every dependency to be satisfied first.
    pub fn requires_ready_dependencies(self) -> bool {
        matches!(self, ActivityStatus::InProgress | ActivityStatus::Completed)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ActivityStatus::Pending => "pending",
            ActivityStatus::InProgress => "in_progress",
            ActivityStatus::Completed => "completed",
            ActivityStatus::CompletedWithErrors => "completed_with_errors",
            ActivityStatus::Interrupted => "interrupted",
        }
    }
}

impl Default for ActivityStatus {
    fn default() -> Self {
        ActivityStatus::Pending
    }
}

impl fmt::Display for ActivityStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ActivityStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "pending" => Ok(ActivityStatus::Pending),
            "in_progress" => Ok(ActivityStatus::InProgress),
            "completed" => Ok(ActivityStatus::Completed),
            "completed_with_errors" => Ok(ActivityStatus::CompletedWithErrors),
            "interrupted" => Ok(ActivityStatus::Interrupted),
            other => Err(format!(
                "invalid activity status: {other} (expected one of pending, in_progress, \
                 completed, completed_with_errors, interrupted)"
            )),
        }
    }
}

/// Project-level status. Never stored; see [`crate::dag::progress`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectStatus {
    Planning,
    InProgress,
    Completed,
    CompletedWithErrors,
    Interrupted,
}

impl From<ActivityStatus> for ProjectStatus {
    fn from(status: ActivityStatus) -> Self {
        match status {
            ActivityStatus::Pending => ProjectStatus::Planning,
            ActivityStatus::InProgress => ProjectStatus::InProgress,
            ActivityStatus::Completed => ProjectStatus::Completed,
            ActivityStatus::CompletedWithErrors => ProjectStatus::CompletedWithErrors,
            ActivityStatus::Interrupted => ProjectStatus::Interrupted,
        }
    }
}

impl fmt::Display for ProjectStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ProjectStatus::Planning => "planning",
            ProjectStatus::InProgress => "in_progress",
            ProjectStatus::Completed => "completed",
            ProjectStatus::CompletedWithErrors => "completed_with_errors",
            ProjectStatus::Interrupted => "interrupted",
        };
        f.write_str(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finished_set_is_exactly_three_statuses() {
        let finished: Vec<_> = ActivityStatus::ALL
            .into_iter()
            .filter(|s| s.is_finished())
            .collect();
        assert_eq!(
            finished,
            vec![
                ActivityStatus::Completed,
                ActivityStatus::CompletedWithErrors,
                ActivityStatus::Interrupted
            ]
        );
    }

    #[test]
    fn parses_status_strings_leniently() {
        assert_eq!("In-Progress".parse(), Ok(ActivityStatus::InProgress));
        assert_eq!(" completed_with_errors ".parse(), Ok(ActivityStatus::CompletedWithErrors));
        assert!("done".parse::<ActivityStatus>().is_err());
    }

    #[test]
    fn display_round_trips_through_from_str() {
        for status in ActivityStatus::ALL {
            assert_eq!(status.to_string().parse(), Ok(status));
        }
    }

    #[test]
    fn exported_status_labels_deserialize() {
        let parsed: Vec<ActivityStatus> = serde_json::from_str(
            r#"["Pendente", "Em Andamento", "Concluído", "Concluído com erros", "Interrompido"]"#,
        )
        .unwrap();
        assert_eq!(parsed, ActivityStatus::ALL.to_vec());

        // Saving always writes the snake_case form.
        assert_eq!(
            serde_json::to_string(&ActivityStatus::CompletedWithErrors).unwrap(),
            r#""completed_with_errors""#
        );
    }
}
