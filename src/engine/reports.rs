//! Read-only listings: projects, resources, skills, workloads and completion history

use serde::Serialize;

use crate::domain::Project;
use crate::storage::queries::{self, CompletionRow};
use crate::storage::{Store, StoreError, StoreResult};

/// A resource with its skill grants and availability windows
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResourceProfile {
    pub id: i64,
    pub name: String,
    pub skills: Vec<String>,
    /// `"<from> to <to>"` per window
    pub availability: Vec<String>,
}

/// A task counted in a resource's workload
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AssignedTask {
    pub task_id: i64,
    pub task_name: String,
    pub project_name: String,
    pub schedule: String,
    pub duration_hours: u32,
}

/// A resource with its live assignments
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResourceWorkload {
    pub resource_id: i64,
    pub resource_name: String,
    pub total_hours: i64,
    pub tasks: Vec<AssignedTask>,
}

/// All projects in id order
pub fn list_projects(store: &Store) -> StoreResult<Vec<Project>> {
    queries::list_projects(store.conn())
}

/// Every resource in id order, with skills in grant order and windows in id order
pub fn list_resources(store: &Store) -> StoreResult<Vec<ResourceProfile>> {
    let conn = store.conn();
    queries::list_resources(conn)?
        .into_iter()
        .map(|resource| {
            let skills = queries::skills_for_resource(conn, resource.id)?;
            let availability = queries::availability_for_resource(conn, resource.id)?
                .iter()
                .map(|window| window.display())
                .collect();
            Ok::<_, StoreError>(ResourceProfile {
                id: resource.id,
                name: resource.name,
                skills,
                availability,
            })
        })
        .collect()
}

/// Every distinct skill label, sorted
pub fn list_skills(store: &Store) -> StoreResult<Vec<String>> {
    queries::distinct_skills(store.conn())
}

/// Resources that currently hold at least one assignment, by id.
///
/// `total_hours` is recomputed from the assignment rows on every call.
pub fn resource_assignments(store: &Store) -> StoreResult<Vec<ResourceWorkload>> {
    let rows = queries::active_assignments(store.conn())?;
    let mut workloads: Vec<ResourceWorkload> = Vec::new();

    for row in rows {
        let task = AssignedTask {
            task_id: row.task_id,
            task_name: row.task_name,
            project_name: row.project_name,
            schedule: format!("{} to {}", row.schedule_from, row.schedule_to),
            duration_hours: row.duration_hours,
        };

        match workloads.last_mut() {
            Some(current) if current.resource_id == row.resource_id => {
                current.total_hours += i64::from(task.duration_hours);
                current.tasks.push(task);
            }
            _ => workloads.push(ResourceWorkload {
                resource_id: row.resource_id,
                resource_name: row.resource_name,
                total_hours: i64::from(task.duration_hours),
                tasks: vec![task],
            }),
        }
    }

    Ok(workloads)
}

/// Completed tasks, most recent first
pub fn completed_tasks(store: &Store) -> StoreResult<Vec<CompletionRow>> {
    queries::completed_tasks(store.conn())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::parse_date;
    use crate::engine::{allocate_task_at, complete_task_on, AllocationRequest};
    use crate::engine::add_resource_on;
    use crate::storage::initialize;

    fn seeded() -> Store {
        let mut store = Store::open_in_memory().unwrap();
        initialize(&mut store).unwrap();
        store
    }

    #[test]
    fn seeded_projects_and_skills() {
        let store = seeded();

        let projects: Vec<_> = list_projects(&store).unwrap().into_iter().map(|p| p.id).collect();
        assert_eq!(projects, vec![1, 2]);

        assert_eq!(
            list_skills(&store).unwrap(),
            vec!["C#", "Mongo DB", "Node.JS", "SQL", "Web Services/Rest API"]
        );
    }

    #[test]
    fn seeded_workloads() {
        let store = seeded();
        let workloads = resource_assignments(&store).unwrap();

        let summary: Vec<_> = workloads
            .iter()
            .map(|w| (w.resource_name.as_str(), w.total_hours, w.tasks.len()))
            .collect();
        assert_eq!(summary, vec![("Ram", 40, 1), ("Kiran", 40, 1)]);
        assert_eq!(workloads[0].tasks[0].schedule, "2025-08-01 to 2025-08-05");
        assert_eq!(workloads[0].tasks[0].project_name, "E-commerce Website");
    }

    fn assigned_hours(store: &Store, resource_id: i64) -> i64 {
        store
            .conn()
            .query_row(
                "SELECT COALESCE(SUM(t.duration_hours), 0)
                 FROM Assignments a JOIN Tasks t ON t.task_id = a.task_id
                 WHERE a.resource_id = ?1",
                [resource_id],
                |row| row.get(0),
            )
            .unwrap()
    }

    #[test]
    fn seeded_resources() {
        let store = seeded();
        let resources = list_resources(&store).unwrap();

        let names: Vec<_> = resources.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["Ram", "Shyam", "Kiran", "Dhina"]);
        assert_eq!(resources[0].skills, vec!["SQL", "C#"]);
        assert_eq!(resources[0].availability, vec!["2025-08-01 to 2025-08-10"]);
    }

    #[test]
    fn onboarded_resource_is_listed() {
        let mut store = seeded();
        let skills = vec!["Rust".to_string()];
        add_resource_on(&mut store, "Priya", &skills, parse_date("2026-10-16").unwrap()).unwrap();

        let resources = list_resources(&store).unwrap();
        let priya = resources.last().unwrap();
        assert_eq!(priya.id, 105);
        assert_eq!(priya.skills, vec!["Rust"]);
        assert_eq!(priya.availability, vec!["2026-10-16 to 2027-10-16"]);
    }

    #[test]
    fn workload_totals_match_store_sum() {
        let mut store = seeded();
        let now = parse_date("2026-10-16").unwrap().and_hms_opt(9, 0, 0).unwrap();
        for (task, hours) in [("A", 8), ("B", 16)] {
            let request = AllocationRequest {
                project_name: "Extra".to_string(),
                task_name: task.to_string(),
                skill: "C#".to_string(),
                duration_hours: hours,
            };
            allocate_task_at(&mut store, &request, now).unwrap();
        }

        for workload in resource_assignments(&store).unwrap() {
            assert_eq!(
                workload.total_hours,
                assigned_hours(&store, workload.resource_id)
            );
        }
    }

    #[test]
    fn history_lists_completed_tasks() {
        let mut store = seeded();
        assert!(completed_tasks(&store).unwrap().is_empty());

        complete_task_on(&mut store, 1, parse_date("2026-10-15").unwrap()).unwrap();
        complete_task_on(&mut store, 4, parse_date("2026-10-16").unwrap()).unwrap();

        let history = completed_tasks(&store).unwrap();
        let names: Vec<_> = history.iter().map(|h| h.task_name.as_str()).collect();
        assert_eq!(names, vec!["Design Database Schema", "Setup Database"]);
        assert_eq!(history[0].completed_by.as_deref(), Some("Kiran"));
        assert_eq!(history[1].completion_date.as_deref(), Some("2026-10-15"));
    }
}
