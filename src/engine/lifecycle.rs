//! Task completion and resource onboarding

use chrono::{Local, NaiveDate};
use log::{info, warn};
use serde::Serialize;

use crate::domain::DateWindow;
use crate::storage::queries;
use crate::storage::{is_constraint_violation, Store, StoreError, StoreResult};

/// Outcome of [`complete_task`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CompletionResult {
    pub success: bool,
    pub message: String,
}

/// Outcome of [`add_resource`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AddResourceResult {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource_id: Option<i64>,
}

/// Completes a task today, releasing its assignment
pub fn complete_task(store: &mut Store, task_id: i64) -> StoreResult<CompletionResult> {
    complete_task_on(store, task_id, Local::now().date_naive())
}

/// Completes a task as of `today`.
///
/// An unknown id, or a task without a live assignment, leaves the store
/// untouched.
pub fn complete_task_on(
    store: &mut Store,
    task_id: i64,
    today: NaiveDate,
) -> StoreResult<CompletionResult> {
    let tx = store.transaction()?;

    if queries::task_by_id(&tx, task_id)?.is_none() {
        info!("event=complete module=engine status=not_found task_id={task_id}");
        return Ok(CompletionResult {
            success: false,
            message: format!("Task {task_id} not found"),
        });
    }

    let Some(resource_id) = queries::assignment_for_task(&tx, task_id)? else {
        info!("event=complete module=engine status=no_assignment task_id={task_id}");
        return Ok(CompletionResult {
            success: false,
            message: format!("Task {task_id} has no active assignment"),
        });
    };

    queries::mark_task_completed(&tx, task_id, resource_id, today)?;
    queries::delete_assignment(&tx, task_id)?;
    tx.commit()?;

    info!("event=complete module=engine status=ok task_id={task_id} resource_id={resource_id}");
    Ok(CompletionResult {
        success: true,
        message: format!("Task {task_id} marked as completed"),
    })
}

/// Onboards a resource with a one-year availability window from today
pub fn add_resource(store: &mut Store, name: &str, skills: &[String]) -> StoreResult<AddResourceResult> {
    add_resource_on(store, name, skills, Local::now().date_naive())
}

/// Onboards a resource as of `today`.
///
/// The resource row, one skill row per entry in `skills` (possibly none)
/// and one availability window are written in one transaction. A duplicate
/// name rolls the whole unit back and is reported as `success: false`.
pub fn add_resource_on(
    store: &mut Store,
    name: &str,
    skills: &[String],
    today: NaiveDate,
) -> StoreResult<AddResourceResult> {
    let tx = store.transaction()?;

    let resource_id = match queries::insert_resource(&tx, name) {
        Ok(id) => id,
        Err(StoreError::Sqlite(err)) if is_constraint_violation(&err) => {
            warn!("event=add_resource module=engine status=duplicate name={name:?}");
            return Ok(AddResourceResult {
                success: false,
                message: format!("Resource '{name}' already exists"),
                resource_id: None,
            });
        }
        Err(err) => return Err(err),
    };

    for skill in skills {
        queries::insert_skill(&tx, resource_id, skill)?;
    }
    let window = DateWindow::one_year_from(today)?;
    queries::insert_availability(&tx, resource_id, &window)?;
    tx.commit()?;

    info!(
        "event=add_resource module=engine status=ok resource_id={} skills={} window={:?}",
        resource_id,
        skills.len(),
        window.display()
    );
    Ok(AddResourceResult {
        success: true,
        message: format!("Resource '{name}' added with {} skill(s)", skills.len()),
        resource_id: Some(resource_id),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{parse_date, TaskStatus};
    use crate::engine::allocator::{allocate_task_at, AllocationRequest};
    use crate::storage::initialize;
    use crate::storage::queries::{
        assignment_for_task, availability_for_resource, count_rows, skills_for_resource,
        task_by_id,
    };

    fn date(s: &str) -> NaiveDate {
        parse_date(s).unwrap()
    }

    fn seeded() -> Store {
        let mut store = Store::open_in_memory().unwrap();
        initialize(&mut store).unwrap();
        store
    }

    fn skills(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn completing_assigned_task() {
        let mut store = seeded();

        let result = complete_task_on(&mut store, 1, date("2026-10-16")).unwrap();
        assert!(result.success);

        let task = task_by_id(store.conn(), 1).unwrap().unwrap();
        assert_eq!(task.status, TaskStatus::Completed);
        assert_eq!(task.completed_by, Some(101));
        assert_eq!(task.completion_date.as_deref(), Some("2026-10-16"));
        assert_eq!(assignment_for_task(store.conn(), 1).unwrap(), None);
    }

    #[test]
    fn completing_unassigned_task_is_a_no_op() {
        let mut store = seeded();
        let before = task_by_id(store.conn(), 2).unwrap().unwrap();

        let result = complete_task_on(&mut store, 2, date("2026-10-16")).unwrap();

        assert!(!result.success);
        assert_eq!(result.message, "Task 2 has no active assignment");
        assert_eq!(task_by_id(store.conn(), 2).unwrap().unwrap(), before);
    }

    #[test]
    fn completing_twice_fails_the_second_time() {
        let mut store = seeded();
        assert!(complete_task_on(&mut store, 4, date("2026-10-16")).unwrap().success);
        assert!(!complete_task_on(&mut store, 4, date("2026-10-17")).unwrap().success);

        let task = task_by_id(store.conn(), 4).unwrap().unwrap();
        assert_eq!(task.completion_date.as_deref(), Some("2026-10-16"));
    }

    #[test]
    fn completing_missing_task_fails() {
        let mut store = seeded();
        let result = complete_task_on(&mut store, 999, date("2026-10-16")).unwrap();
        assert!(!result.success);
        assert_eq!(result.message, "Task 999 not found");
    }

    #[test]
    fn completed_resource_is_free_again() {
        let mut store = seeded();
        let now = date("2026-10-16").and_hms_opt(9, 0, 0).unwrap();
        let request = AllocationRequest {
            project_name: "NewProj".to_string(),
            task_name: "Schema".to_string(),
            skill: "Mongo DB".to_string(),
            duration_hours: 8,
        };

        // Kiran is the only Mongo DB holder and has task 4: tier 2 queues after it
        let queued = allocate_task_at(&mut store, &request, now).unwrap();
        let task = task_by_id(store.conn(), queued.task_id.unwrap()).unwrap().unwrap();
        assert_eq!(task.schedule.from, date("2025-09-05"));

        complete_task_on(&mut store, 4, date("2026-10-16")).unwrap();
        complete_task_on(&mut store, queued.task_id.unwrap(), date("2026-10-16")).unwrap();

        // With no assignments left Kiran is tier 1 and starts now
        let fresh = allocate_task_at(&mut store, &request, now).unwrap();
        assert_eq!(fresh.allocated_to.as_deref(), Some("Kiran"));
        let task = task_by_id(store.conn(), fresh.task_id.unwrap()).unwrap().unwrap();
        assert_eq!(task.schedule.from, date("2026-10-16"));
    }

    #[test]
    fn add_resource_writes_skills_and_window() {
        let mut store = seeded();

        let result =
            add_resource_on(&mut store, "Priya", &skills(&["Rust", "SQL", "Go"]), date("2026-10-16"))
                .unwrap();
        assert!(result.success);

        let id = result.resource_id.unwrap();
        assert_eq!(skills_for_resource(store.conn(), id).unwrap(), vec!["Rust", "SQL", "Go"]);
        assert_eq!(
            availability_for_resource(store.conn(), id).unwrap(),
            vec![DateWindow::new(date("2026-10-16"), date("2027-10-16")).unwrap()]
        );
    }

    #[test]
    fn add_resource_without_skills() {
        let mut store = seeded();

        let result = add_resource_on(&mut store, "Nobody", &[], date("2026-10-16")).unwrap();
        assert!(result.success);

        let id = result.resource_id.unwrap();
        assert!(skills_for_resource(store.conn(), id).unwrap().is_empty());
        assert_eq!(availability_for_resource(store.conn(), id).unwrap().len(), 1);
    }

    #[test]
    fn duplicate_resource_name_is_rejected_and_rolled_back() {
        let mut store = seeded();
        let skills_before = count_rows(store.conn(), "Resource_Skills").unwrap();
        let windows_before = count_rows(store.conn(), "Resource_Availability").unwrap();

        let result =
            add_resource_on(&mut store, "Ram", &skills(&["Rust"]), date("2026-10-16")).unwrap();

        assert!(!result.success);
        assert_eq!(result.message, "Resource 'Ram' already exists");
        assert_eq!(count_rows(store.conn(), "Resources").unwrap(), 4);
        assert_eq!(count_rows(store.conn(), "Resource_Skills").unwrap(), skills_before);
        assert_eq!(
            count_rows(store.conn(), "Resource_Availability").unwrap(),
            windows_before
        );
    }

    #[test]
    fn failed_skill_insert_rolls_back_resource() {
        let mut store = seeded();
        store
            .conn()
            .execute_batch(
                "CREATE TRIGGER reject_go BEFORE INSERT ON Resource_Skills
                 WHEN NEW.skill = 'Go'
                 BEGIN SELECT RAISE(ABORT, 'skill not allowed'); END;",
            )
            .unwrap();

        let err = add_resource_on(&mut store, "Priya", &skills(&["Rust", "Go"]), date("2026-10-16"))
            .unwrap_err();

        assert!(matches!(err, StoreError::Sqlite(_)));
        assert_eq!(count_rows(store.conn(), "Resources").unwrap(), 4);
        assert_eq!(count_rows(store.conn(), "Resource_Skills").unwrap(), 8);
        assert_eq!(count_rows(store.conn(), "Resource_Availability").unwrap(), 4);
    }

    #[test]
    fn window_past_last_storable_year_rolls_back() {
        let mut store = seeded();

        let err = add_resource_on(&mut store, "Priya", &skills(&["Rust"]), date("9999-06-01"))
            .unwrap_err();

        assert!(matches!(err, StoreError::Schedule(_)));
        assert_eq!(count_rows(store.conn(), "Resources").unwrap(), 4);
        assert_eq!(count_rows(store.conn(), "Resource_Skills").unwrap(), 8);
    }

    #[test]
    fn new_resource_is_eligible_for_allocation() {
        let mut store = seeded();
        add_resource_on(&mut store, "Priya", &skills(&["Rust"]), date("2026-10-16")).unwrap();

        let request = AllocationRequest {
            project_name: "E-commerce Website".to_string(),
            task_name: "Port to Rust".to_string(),
            skill: "Rust".to_string(),
            duration_hours: 16,
        };
        let result =
            allocate_task_at(&mut store, &request, date("2026-10-16").and_hms_opt(9, 0, 0).unwrap())
                .unwrap();
        assert_eq!(result.allocated_to.as_deref(), Some("Priya"));
    }
}
