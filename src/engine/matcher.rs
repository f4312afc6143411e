//! Informational matching of resources to open tasks
//!
//! A resource qualifies for a task when it holds the task's required skill
//! (exact, case-sensitive) and at least one of its availability windows
//! overlaps the task's schedule, bounds inclusive. Unlike allocation,
//! matching looks at availability windows.

use std::collections::HashMap;

use log::debug;
use serde::Serialize;

use crate::domain::{DateWindow, Resource};
use crate::storage::queries;
use crate::storage::{Store, StoreResult};

/// A resource listed against a task
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MatchedResource {
    pub id: i64,
    pub name: String,
}

impl From<&Resource> for MatchedResource {
    fn from(resource: &Resource) -> Self {
        Self {
            id: resource.id,
            name: resource.name.clone(),
        }
    }
}

/// An open task and every resource qualified to work on it
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaskMatch {
    pub task_name: String,
    pub required_skill: String,
    /// `"<from> to <to>"`
    pub schedule: String,
    pub matched_resources: Vec<MatchedResource>,
}

/// Lists the project's pending and assigned tasks with their qualified resources.
///
/// An unknown project id yields an empty list. Tasks come back in id order,
/// resources in id order, and a resource appears at most once per task even
/// when several of its windows overlap.
pub fn find_matches(store: &Store, project_id: i64) -> StoreResult<Vec<TaskMatch>> {
    let conn = store.conn();
    let tasks = queries::tasks_for_project(conn, project_id)?;

    // Skill holders are shared between tasks requiring the same skill
    let mut holders: HashMap<&str, Vec<(Resource, DateWindow)>> = HashMap::new();
    let mut matches = Vec::new();

    for task in tasks.iter().filter(|task| task.status.is_open()) {
        let skill = task.required_skill.as_str();
        if !holders.contains_key(skill) {
            let loaded = queries::skill_holder_windows(conn, skill)?;
            holders.insert(skill, loaded);
        }

        let matched_resources = qualified(&holders[skill], &task.schedule);
        debug!(
            "event=match_task module=engine task_id={} skill={:?} matched={}",
            task.id,
            task.required_skill,
            matched_resources.len()
        );

        matches.push(TaskMatch {
            task_name: task.name.clone(),
            required_skill: task.required_skill.clone(),
            schedule: task.schedule.display(),
            matched_resources,
        });
    }

    Ok(matches)
}

/// Resources with at least one window overlapping `schedule`.
///
/// `windows` must be ordered by resource id.
fn qualified(windows: &[(Resource, DateWindow)], schedule: &DateWindow) -> Vec<MatchedResource> {
    let mut matched: Vec<MatchedResource> = Vec::new();

    for (resource, window) in windows {
        if !schedule.overlaps(window) {
            continue;
        }
        if matched.last().is_some_and(|m| m.id == resource.id) {
            continue;
        }
        matched.push(resource.into());
    }

    matched
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{parse_date, NewTask, TaskStatus};
    use crate::storage::initialize;
    use crate::storage::queries::{
        insert_availability, insert_project, insert_resource, insert_skill, insert_task,
        mark_task_completed,
    };

    fn window(from: &str, to: &str) -> DateWindow {
        DateWindow::parse(from, to).unwrap()
    }

    fn seeded() -> Store {
        let mut store = Store::open_in_memory().unwrap();
        initialize(&mut store).unwrap();
        store
    }

    fn names(task: &TaskMatch) -> Vec<&str> {
        task.matched_resources.iter().map(|r| r.name.as_str()).collect()
    }

    #[test]
    fn seeded_project_one() {
        let store = seeded();
        let matches = find_matches(&store, 1).unwrap();

        let task_names: Vec<_> = matches.iter().map(|m| m.task_name.as_str()).collect();
        assert_eq!(
            task_names,
            vec!["Setup Database", "Develop Backend API", "Create UI Components"]
        );

        // SQL, 08-01..08-05: Ram (08-01..08-10) and Dhina (08-01..08-15)
        assert_eq!(names(&matches[0]), vec!["Ram", "Dhina"]);
        assert_eq!(matches[0].schedule, "2025-08-01 to 2025-08-05");

        // C#, 08-06..08-15: Ram overlaps, Shyam (08-10..08-25) overlaps
        assert_eq!(names(&matches[1]), vec!["Ram", "Shyam"]);

        // Web Services, 08-10..08-20: only Shyam holds the skill
        assert_eq!(names(&matches[2]), vec!["Shyam"]);
    }

    #[test]
    fn seeded_project_two() {
        let store = seeded();
        let matches = find_matches(&store, 2).unwrap();

        // Mongo DB in September: Kiran
        assert_eq!(names(&matches[0]), vec!["Kiran"]);
        // Node.JS 09-06..09-20: Kiran yes, Dhina's window ended 08-15
        assert_eq!(names(&matches[1]), vec!["Kiran"]);
    }

    #[test]
    fn unknown_project_is_empty() {
        let store = seeded();
        assert!(find_matches(&store, 999).unwrap().is_empty());
    }

    #[test]
    fn completed_tasks_are_skipped() {
        let store = seeded();
        mark_task_completed(store.conn(), 1, 101, parse_date("2025-08-05").unwrap()).unwrap();

        let matches = find_matches(&store, 1).unwrap();
        assert!(matches.iter().all(|m| m.task_name != "Setup Database"));
        assert_eq!(matches.len(), 2);
    }

    #[test]
    fn multiple_overlapping_windows_collapse() {
        let store = Store::open_in_memory().unwrap();
        let conn = store.conn();
        let project = insert_project(conn, "P").unwrap();
        let ana = insert_resource(conn, "Ana").unwrap();
        insert_skill(conn, ana, "Go").unwrap();
        insert_skill(conn, ana, "Go").unwrap();
        insert_availability(conn, ana, &window("2025-01-01", "2025-01-10")).unwrap();
        insert_availability(conn, ana, &window("2025-01-05", "2025-01-20")).unwrap();
        insert_task(
            conn,
            &NewTask {
                project_id: project,
                name: "Build".to_string(),
                required_skill: "Go".to_string(),
                duration_hours: 8,
                schedule: window("2025-01-06", "2025-01-07"),
                status: TaskStatus::Pending,
            },
        )
        .unwrap();

        let matches = find_matches(&store, project).unwrap();
        assert_eq!(matches[0].matched_resources.len(), 1);
    }

    #[test]
    fn skill_match_is_case_sensitive() {
        let store = seeded();
        let conn = store.conn();
        insert_task(
            conn,
            &NewTask {
                project_id: 1,
                name: "Lowercase".to_string(),
                required_skill: "sql".to_string(),
                duration_hours: 8,
                schedule: window("2025-08-01", "2025-08-05"),
                status: TaskStatus::Pending,
            },
        )
        .unwrap();

        let matches = find_matches(&store, 1).unwrap();
        let lowercase = matches.iter().find(|m| m.task_name == "Lowercase").unwrap();
        assert!(lowercase.matched_resources.is_empty());
    }

    #[test]
    fn every_match_holds_skill_and_overlapping_window() {
        let store = seeded();
        for project in [1, 2] {
            for task in find_matches(&store, project).unwrap() {
                let (from, to) = task.schedule.split_once(" to ").unwrap();
                let schedule = window(from, to);
                for resource in &task.matched_resources {
                    let skills =
                        crate::storage::queries::skills_for_resource(store.conn(), resource.id)
                            .unwrap();
                    assert!(skills.contains(&task.required_skill));
                    let windows =
                        crate::storage::queries::availability_for_resource(store.conn(), resource.id)
                            .unwrap();
                    assert!(windows.iter().any(|w| schedule.overlaps(w)));
                }
            }
        }
    }

    #[test]
    fn qualified_keeps_id_order_and_dedupes() {
        let ana = Resource { id: 1, name: "Ana".to_string() };
        let bo = Resource { id: 2, name: "Bo".to_string() };
        let windows = vec![
            (ana.clone(), window("2025-01-01", "2025-01-31")),
            (ana, window("2025-01-15", "2025-02-15")),
            (bo, window("2025-03-01", "2025-03-31")),
        ];

        let matched = qualified(&windows, &window("2025-01-20", "2025-01-25"));
        assert_eq!(matched, vec![MatchedResource { id: 1, name: "Ana".to_string() }]);
    }
}
