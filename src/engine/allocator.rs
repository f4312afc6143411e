//! Greedy two-tier task allocation
//!
//! Selection looks only at skills and current workload:
//!
//! 1. **Free**: the lowest-id holder of the skill with no live assignment.
//!    The task starts at the moment of allocation.
//! 2. **Least loaded**: the holder with the smallest sum of assigned
//!    `duration_hours` (lowest id on ties). The task queues after the
//!    latest `schedule_to` among that resource's assigned tasks.
//!
//! Availability windows are not consulted here, although the matcher
//! honors them. The end date is the start plus `duration_hours` wall-clock
//! hours.

use chrono::{Local, NaiveDate, NaiveDateTime};
use log::info;
use rusqlite::Connection;
use serde::Serialize;

use crate::domain::{
    add_hours, check_duration, start_of_day, DateWindow, NewTask, Resource, TaskStatus,
};
use crate::storage::queries;
use crate::storage::{Store, StoreResult};

/// Input for [`allocate_task`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AllocationRequest {
    /// Existing project name, or a new one to create
    pub project_name: String,
    pub task_name: String,
    pub skill: String,
    pub duration_hours: u32,
}

/// Outcome of an allocation attempt
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AllocationResult {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allocated_to: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub task_id: Option<i64>,
}

impl AllocationResult {
    fn no_resource(skill: &str) -> Self {
        Self {
            success: false,
            message: format!("No resource found with skill '{skill}'"),
            allocated_to: None,
            task_id: None,
        }
    }
}

/// The resource chosen for a new task, and by which tier
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    /// Holder of the skill with no live assignment
    Free(Resource),

    /// Holder of the skill with the lightest assigned workload
    LeastLoaded {
        resource: Resource,
        load_hours: i64,
        /// Latest `schedule_to` among the resource's assigned tasks
        queue_after: Option<NaiveDate>,
    },
}

impl Selection {
    pub fn resource(&self) -> &Resource {
        match self {
            Selection::Free(resource) => resource,
            Selection::LeastLoaded { resource, .. } => resource,
        }
    }

    /// When the new task starts, given the allocation instant
    pub fn start(&self, now: NaiveDateTime) -> NaiveDateTime {
        match self {
            Selection::Free(_) => now,
            Selection::LeastLoaded {
                queue_after: Some(date),
                ..
            } => start_of_day(*date),
            Selection::LeastLoaded {
                queue_after: None, ..
            } => now,
        }
    }

    fn describe(&self) -> String {
        match self {
            Selection::Free(_) => "free resource".to_string(),
            Selection::LeastLoaded { load_hours, .. } => {
                format!("least loaded, {load_hours}h already assigned")
            }
        }
    }
}

/// Picks a resource for `skill`, or `None` if nobody holds it
pub fn select_resource(conn: &Connection, skill: &str) -> StoreResult<Option<Selection>> {
    if let Some(resource) = queries::free_resource_with_skill(conn, skill)? {
        return Ok(Some(Selection::Free(resource)));
    }

    let Some(loaded) = queries::least_loaded_resource_with_skill(conn, skill)? else {
        return Ok(None);
    };
    let queue_after = queries::latest_assigned_end(conn, loaded.resource.id)?;

    Ok(Some(Selection::LeastLoaded {
        resource: loaded.resource,
        load_hours: loaded.load_hours,
        queue_after,
    }))
}

/// Allocates a new task using the current local time
pub fn allocate_task(store: &mut Store, request: &AllocationRequest) -> StoreResult<AllocationResult> {
    allocate_task_at(store, request, Local::now().naive_local())
}

/// Allocates a new task as of `now`.
///
/// Project lookup/creation, selection and both inserts share one
/// transaction: when no resource holds the skill nothing is written,
/// not even a newly named project. A duration outside
/// `1..=MAX_DURATION_HOURS`, or a schedule ending past the last storable
/// year, is an `Err` and likewise writes nothing.
pub fn allocate_task_at(
    store: &mut Store,
    request: &AllocationRequest,
    now: NaiveDateTime,
) -> StoreResult<AllocationResult> {
    check_duration(request.duration_hours)?;
    let tx = store.transaction()?;

    let (project, created) = queries::find_or_create_project(&tx, &request.project_name)?;

    let Some(selection) = select_resource(&tx, &request.skill)? else {
        info!(
            "event=allocate module=engine status=no_candidate skill={:?}",
            request.skill
        );
        return Ok(AllocationResult::no_resource(&request.skill));
    };

    let start = selection.start(now);
    let end = add_hours(start, request.duration_hours)?;
    let schedule = DateWindow::new(start.date(), end.date())?;
    let resource = selection.resource().clone();

    let task_id = queries::insert_task(
        &tx,
        &NewTask {
            project_id: project.id,
            name: request.task_name.clone(),
            required_skill: request.skill.clone(),
            duration_hours: request.duration_hours,
            schedule,
            status: TaskStatus::Assigned,
        },
    )?;
    queries::insert_assignment(&tx, task_id, resource.id)?;
    tx.commit()?;

    info!(
        "event=allocate module=engine status=ok task_id={} project_id={} project_created={} resource_id={} tier={:?} schedule={:?}",
        task_id,
        project.id,
        created,
        resource.id,
        selection.describe(),
        schedule.display()
    );

    Ok(AllocationResult {
        success: true,
        message: format!(
            "Task '{}' allocated to {} ({}), scheduled {}.",
            request.task_name,
            resource.name,
            selection.describe(),
            schedule.display()
        ),
        allocated_to: Some(resource.name),
        task_id: Some(task_id),
    })
}
