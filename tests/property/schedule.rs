use std::collections::HashSet;

use chrono::TimeDelta;
use pertrack::dag::{DateMode, compute_project_end_date, compute_schedule};
use pertrack::project::Project;
use pertrack_test_utils::builders::{ActivityBuilder, ProjectBuilder};
use pertrack_test_utils::jan1;
use proptest::prelude::*;

// Strategy to generate an acyclic project.
// Activity i+1 may only depend on activities 1..=i, so there is no cycle.
fn acyclic_project_strategy(max_activities: usize) -> impl Strategy<Value = Project> {
    (1..=max_activities).prop_flat_map(|n| {
        let deps = proptest::collection::vec(proptest::collection::vec(any::<usize>(), 0..4), n);
        let hours = proptest::collection::vec(1u32..=24, n);

        (deps, hours).prop_map(move |(raw_deps, hours)| {
            let mut builder = ProjectBuilder::new("2024-01-01T00:00:00Z");
            for (i, (potential, h)) in raw_deps.into_iter().zip(hours).enumerate() {
                let mut activity = ActivityBuilder::new(i as i64 + 1, f64::from(h));
                if i > 0 {
                    let unique: HashSet<usize> = potential.into_iter().map(|d| d % i).collect();
                    for dep in unique {
                        activity = activity.after(dep as i64 + 1);
                    }
                }
                builder = builder.with_activity(activity.build());
            }
            builder.build()
        })
    })
}

proptest! {
    #[test]
    fn every_activity_starts_when_its_latest_dependency_finishes(
        project in acyclic_project_strategy(12)
    ) {
        let schedule = compute_schedule(&project, DateMode::Planned).unwrap().unwrap();

        for activity in project.activities.iter() {
            let start = schedule.start_of(activity.id).unwrap();
            let finish = schedule.finish_of(activity.id).unwrap();

            let expected_start = activity
                .dependencies
                .iter()
                .filter_map(|d| schedule.finish_of(*d))
                .max()
                .unwrap_or(jan1(0));
            prop_assert_eq!(start, expected_start);

            let hours = activity.duration_hours as i64;
            prop_assert_eq!(finish, start + TimeDelta::hours(hours));
        }
    }

    #[test]
    fn end_date_is_latest_finish_and_stable(project in acyclic_project_strategy(12)) {
        let schedule = compute_schedule(&project, DateMode::Planned).unwrap().unwrap();
        let latest = project
            .activities
            .iter()
            .filter_map(|a| schedule.finish_of(a.id))
            .max()
            .unwrap();
        prop_assert_eq!(schedule.end_date(), latest);

        let again = compute_project_end_date(&project, DateMode::Planned).unwrap();
        prop_assert_eq!(again, Some(latest));
    }

    #[test]
    fn estimated_matches_planned_without_recorded_progress(
        project in acyclic_project_strategy(12)
    ) {
        prop_assert_eq!(
            compute_project_end_date(&project, DateMode::Estimated).unwrap(),
            compute_project_end_date(&project, DateMode::Planned).unwrap()
        );
    }
}
