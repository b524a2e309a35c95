// src/dag/graph.rs

use std::collections::HashMap;

use petgraph::Direction;
use petgraph::graphmap::DiGraphMap;
use tracing::warn;

use crate::project::{Activity, Project};
use crate::types::{ActivityId, ActivityStatus};

/// Adjacency view of one project snapshot.
///
/// Two edge sets are overlaid on the same nodes:
/// - normal flow, edge `dep -> activity` for every id in `dependencies`;
/// - contingency flow, edge `activity -> target` for every id in
///   `error_go_to`.
///
/// Built once per snapshot so that rule evaluation can ask for successors and
/// predecessors in either direction without rescanning the activity list.
/// Ids referenced by an edge but absent from the project still appear as
/// graph nodes; use [`ActivityGraph::contains`] to tell them apart.
#[derive(Debug, Clone)]
pub struct ActivityGraph<'a> {
    project: &'a Project,
    /// Position of each activity in `project.activities`.
    index: HashMap<ActivityId, usize>,
    normal: DiGraphMap<ActivityId, ()>,
    contingency: DiGraphMap<ActivityId, ()>,
}

impl<'a> ActivityGraph<'a> {
    pub fn from_project(project: &'a Project) -> Self {
        let mut index = HashMap::with_capacity(project.activities.len());
        let mut normal = DiGraphMap::new();
        let mut contingency = DiGraphMap::new();

        for (pos, activity) in project.activities.iter().enumerate() {
            if index.insert(activity.id, pos).is_some() {
                warn!(activity = activity.id, "duplicate activity id; later entry wins");
            }
            normal.add_node(activity.id);
            contingency.add_node(activity.id);
        }

        for activity in project.activities.iter() {
            for &dep in activity.dependencies.iter() {
                normal.add_edge(dep, activity.id, ());
            }
            for &target in activity.error_go_to.iter() {
                contingency.add_edge(activity.id, target, ());
            }
        }

        Self {
            project,
            index,
            normal,
            contingency,
        }
    }

    /// Whether `id` names an activity of the project (as opposed to a
    /// dangling reference).
    pub fn contains(&self, id: ActivityId) -> bool {
        self.index.contains_key(&id)
    }

    pub fn activity(&self, id: ActivityId) -> Option<&'a Activity> {
        let project = self.project;
        self.index.get(&id).map(|&pos| &project.activities[pos])
    }

    pub fn activities(&self) -> std::slice::Iter<'a, Activity> {
        let project = self.project;
        project.activities.iter()
    }

    /// Normal-flow predecessors.
    pub fn dependencies_of(&self, id: ActivityId) -> Vec<ActivityId> {
        self.neighbors(&self.normal, id, Direction::Incoming)
    }

    /// Normal-flow successors: activities listing `id` in their dependencies.
    pub fn dependents_of(&self, id: ActivityId) -> Vec<ActivityId> {
        self.neighbors(&self.normal, id, Direction::Outgoing)
    }

    /// Contingency successors of `id` (its `error_go_to`).
    pub fn error_targets_of(&self, id: ActivityId) -> Vec<ActivityId> {
        self.neighbors(&self.contingency, id, Direction::Outgoing)
    }

    /// Whether `id` ended with errors and has contingency targets to
    /// redirect the flow to.
    pub fn took_error_path(&self, id: ActivityId) -> bool {
        self.activity(id)
            .is_some_and(|a| a.status == ActivityStatus::CompletedWithErrors)
            && !self.error_targets_of(id).is_empty()
    }

    /// Ids referenced by some edge but missing from the project, with the
    /// activity that references them.
    pub fn dangling_references(&self) -> Vec<(ActivityId, ActivityId)> {
        let mut out = Vec::new();
        for activity in self.project.activities.iter() {
            for &other in activity.dependencies.iter().chain(activity.error_go_to.iter()) {
                if !self.contains(other) {
                    out.push((activity.id, other));
                }
            }
        }
        out
    }

    fn neighbors(
        &self,
        graph: &DiGraphMap<ActivityId, ()>,
        id: ActivityId,
        dir: Direction,
    ) -> Vec<ActivityId> {
        if !graph.contains_node(id) {
            return Vec::new();
        }
        graph.neighbors_directed(id, dir).collect()
    }
}
