#![allow(dead_code)]

use pertrack::project::{Activity, Project, Timestamp};
use pertrack::types::{ActivityId, ActivityStatus};

/// Builder for `Project` to simplify test setup.
pub struct ProjectBuilder {
    project: Project,
}

impl ProjectBuilder {
    /// Project named "test" with the given planned start.
    pub fn new(start_planned: &str) -> Self {
        Self {
            project: Project::new("test", start_planned),
        }
    }

    pub fn name(mut self, name: &str) -> Self {
        self.project.name = name.to_string();
        self
    }

    pub fn started_at(mut self, start_actual: &str) -> Self {
        self.project.start_actual = Some(Timestamp::new(start_actual));
        self
    }

    pub fn locked(mut self) -> Self {
        self.project.editable = false;
        self
    }

    pub fn with_activity(mut self, activity: Activity) -> Self {
        self.project.activities.push(activity);
        self
    }

    pub fn build(self) -> Project {
        self.project
    }
}

/// Builder for `Activity`.
///
/// Finished statuses get a placeholder `finish_actual` unless one is set
/// explicitly, so built activities respect the finish/status invariant.
pub struct ActivityBuilder {
    activity: Activity,
    explicit_finish: bool,
}

impl ActivityBuilder {
    pub fn new(id: ActivityId, hours: f64) -> Self {
        Self {
            activity: Activity::new(id, format!("activity {id}"), hours),
            explicit_finish: false,
        }
    }

    pub fn name(mut self, name: &str) -> Self {
        self.activity.name = name.to_string();
        self
    }

    pub fn after(mut self, dep: ActivityId) -> Self {
        self.activity.dependencies.push(dep);
        self
    }

    pub fn on_error(mut self, target: ActivityId) -> Self {
        self.activity.error_go_to.push(target);
        self
    }

    pub fn status(mut self, status: ActivityStatus) -> Self {
        self.activity.status = status;
        self
    }

    pub fn finished_at(mut self, finish: &str) -> Self {
        self.activity.finish_actual = Some(Timestamp::new(finish));
        self.explicit_finish = true;
        self
    }

    pub fn build(mut self) -> Activity {
        if self.activity.status.is_finished() && !self.explicit_finish {
            self.activity.finish_actual = Some(Timestamp::new("2024-01-01T00:00:00Z"));
        }
        self.activity
    }
}
