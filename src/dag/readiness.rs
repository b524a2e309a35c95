// src/dag/readiness.rs

//! Dependency-satisfaction rules evaluated against one snapshot.

use tracing::{debug, warn};

use crate::dag::graph::ActivityGraph;
use crate::project::Activity;
use crate::types::{ActivityId, ActivityStatus};

/// Read-only rule evaluator over an [`ActivityGraph`].
pub struct Readiness<'g, 'a> {
    graph: &'g ActivityGraph<'a>,
}

impl<'g, 'a> Readiness<'g, 'a> {
    pub fn new(graph: &'g ActivityGraph<'a>) -> Self {
        Self { graph }
    }

    /// Direct normal-flow successors of `id` that are in progress or
    /// finished. Un-finishing `id` would invalidate their work.
    pub fn started_successors(&self, id: ActivityId) -> Vec<&'a Activity> {
        self.graph
            .dependents_of(id)
            .into_iter()
            .filter_map(|succ| self.graph.activity(succ))
            .filter(|succ| succ.status.has_started())
            .collect()
    }

    /// A dependency is bypassed when one of its direct successors finished
    /// with errors and has somewhere to redirect the flow.
    pub fn is_bypassed(&self, dep: ActivityId) -> bool {
        self.graph
            .dependents_of(dep)
            .into_iter()
            .any(|succ| {
                let took = self.graph.took_error_path(succ);
                if took {
                    debug!(
                        dependency = dep,
                        via = succ,
                        "dependency bypassed by contingency path"
                    );
                }
                took
            })
    }

    /// Whether `dep` no longer holds up its successors.
    pub fn is_satisfied(&self, dep: ActivityId) -> bool {
        let Some(activity) = self.graph.activity(dep) else {
            warn!(dependency = dep, "dependency missing from project; treating as satisfied");
            return true;
        };

        match activity.status {
            ActivityStatus::Completed
            | ActivityStatus::CompletedWithErrors
            | ActivityStatus::Interrupted => true,
            ActivityStatus::Pending | ActivityStatus::InProgress => self.is_bypassed(dep),
        }
    }

    /// Dependencies of `id` that are neither finished nor bypassed, in the
    /// order they were listed.
    pub fn unsatisfied_dependencies(&self, id: ActivityId) -> Vec<&'a Activity> {
        self.graph
            .dependencies_of(id)
            .into_iter()
            .filter(|&dep| !self.is_satisfied(dep))
            .filter_map(|dep| self.graph.activity(dep))
            .collect()
    }
}
