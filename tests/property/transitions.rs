use std::collections::HashSet;

use pertrack::dag::StatusEngine;
use pertrack::project::Project;
use pertrack::types::{ActivityId, ActivityStatus};
use pertrack_test_utils::builders::{ActivityBuilder, ProjectBuilder};
use pertrack_test_utils::{clock_at, jan1};
use proptest::prelude::*;

// Acyclic network where activity i+1 depends only on lower ids, and some
// activities carry contingency targets.
fn network_strategy(max_activities: usize) -> impl Strategy<Value = Project> {
    (2..=max_activities).prop_flat_map(|n| {
        let deps = proptest::collection::vec(proptest::collection::vec(any::<usize>(), 0..3), n);
        let errors = proptest::collection::vec(proptest::option::of(any::<usize>()), n);

        (deps, errors).prop_map(move |(raw_deps, raw_errors)| {
            let mut builder = ProjectBuilder::new("2024-01-01T00:00:00Z");
            for (i, (potential, on_error)) in raw_deps.into_iter().zip(raw_errors).enumerate() {
                let mut activity = ActivityBuilder::new(i as i64 + 1, 1.0);
                if i > 0 {
                    let unique: HashSet<usize> = potential.into_iter().map(|d| d % i).collect();
                    for dep in unique {
                        activity = activity.after(dep as i64 + 1);
                    }
                }
                if let Some(target) = on_error {
                    activity = activity.on_error((target % n) as i64 + 1);
                }
                builder = builder.with_activity(activity.build());
            }
            builder.build()
        })
    })
}

fn status_strategy() -> impl Strategy<Value = ActivityStatus> {
    proptest::sample::select(ActivityStatus::ALL.to_vec())
}

fn status_of(project: &Project, id: ActivityId) -> ActivityStatus {
    project.activity(id).map(|a| a.status).unwrap()
}

fn dependency_cleared(project: &Project, dep: ActivityId) -> bool {
    match project.activity(dep) {
        None => true,
        Some(a) if a.status.is_finished() => true,
        Some(_) => project
            .activities
            .iter()
            .any(|s| {
                s.depends_on(dep)
                    && s.status == ActivityStatus::CompletedWithErrors
                    && !s.error_go_to.is_empty()
            }),
    }
}

proptest! {
    #[test]
    fn random_change_sequences_keep_snapshot_consistent(
        project in network_strategy(8),
        ops in proptest::collection::vec((0..8usize, status_strategy()), 1..40)
    ) {
        let engine = StatusEngine::new(clock_at(jan1(9)));
        let n = project.activities.len();
        let mut current = project;
        let mut first_start = None;

        for (idx, to) in ops {
            let id = (idx % n) as i64 + 1;
            let before = current.clone();
            let from = status_of(&before, id);

            let Ok(t) = engine.apply(&before, id, to) else {
                continue;
            };

            if from.is_finished() && !to.is_finished() {
                let started_successor = before
                    .activities
                    .iter()
                    .any(|s| s.depends_on(id) && s.status.has_started());
                prop_assert!(!started_successor, "revert of {} accepted with a started successor", id);
            }

            if from != to && to.requires_ready_dependencies() {
                let target = before.activity(id).unwrap();
                for dep in target.dependencies.iter() {
                    prop_assert!(
                        dependency_cleared(&before, *dep),
                        "{} moved to {} with dependency {} outstanding", id, to, dep
                    );
                }
            }

            for a in t.project.activities.iter() {
                prop_assert_eq!(a.finish_actual.is_some(), a.status.is_finished());
            }

            match (&first_start, &t.project.start_actual) {
                (Some(old), new) => prop_assert_eq!(Some(old), new.as_ref()),
                (None, Some(new)) => first_start = Some(new.clone()),
                (None, None) => {}
            }

            let again = engine.apply(&t.project, id, to).unwrap();
            prop_assert!(again.is_noop());
            prop_assert_eq!(&again.project, &t.project);

            current = t.project;
        }
    }
}
