//! Queries against the resource-matching schema
//!
//! Every function takes a `&Connection`; a `Transaction` derefs to one, so
//! callers choose whether a sequence of calls is atomic.

use chrono::NaiveDate;
use rusqlite::{params, Connection, OptionalExtension, Row};
use serde::Serialize;

use super::store::{StoreError, StoreResult};
use crate::domain::{
    format_date, parse_date, DateWindow, LoadedResource, NewTask, Project, Resource, Task,
    TaskStatus,
};

const TASK_COLUMNS: &str = "task_id, project_id, task_name, required_skill, duration_hours,
     schedule_from, schedule_to, status, completed_by_resource_id, completion_date";

/// Task row before date and status parsing
struct RawTask {
    id: i64,
    project_id: i64,
    name: String,
    required_skill: String,
    duration_hours: u32,
    schedule_from: String,
    schedule_to: String,
    status: String,
    completed_by: Option<i64>,
    completion_date: Option<String>,
}

impl RawTask {
    fn read(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            project_id: row.get(1)?,
            name: row.get(2)?,
            required_skill: row.get(3)?,
            duration_hours: row.get(4)?,
            schedule_from: row.get(5)?,
            schedule_to: row.get(6)?,
            status: row.get(7)?,
            completed_by: row.get(8)?,
            completion_date: row.get(9)?,
        })
    }

    fn into_task(self) -> StoreResult<Task> {
        Ok(Task {
            id: self.id,
            project_id: self.project_id,
            name: self.name,
            required_skill: self.required_skill,
            duration_hours: self.duration_hours,
            schedule: DateWindow::parse(&self.schedule_from, &self.schedule_to)?,
            status: self.status.parse::<TaskStatus>()?,
            completed_by: self.completed_by,
            completion_date: self.completion_date,
        })
    }
}

fn read_resource(row: &Row) -> rusqlite::Result<Resource> {
    Ok(Resource {
        id: row.get(0)?,
        name: row.get(1)?,
    })
}

// -----------------------------------------------------------------------------
// Projects
// -----------------------------------------------------------------------------

/// Query: Look up a project by exact name
pub fn project_by_name(conn: &Connection, name: &str) -> StoreResult<Option<Project>> {
    let project = conn
        .query_row(
            "SELECT project_id, project_name FROM Projects WHERE project_name = ?1",
            params![name],
            |row| {
                Ok(Project {
                    id: row.get(0)?,
                    name: row.get(1)?,
                })
            },
        )
        .optional()?;
    Ok(project)
}

/// Inserts a project and returns its id
pub fn insert_project(conn: &Connection, name: &str) -> StoreResult<i64> {
    conn.execute(
        "INSERT INTO Projects (project_name) VALUES (?1)",
        params![name],
    )?;
    Ok(conn.last_insert_rowid())
}

/// Finds a project by name, creating it when absent.
///
/// Returns the project and whether it was created by this call.
pub fn find_or_create_project(conn: &Connection, name: &str) -> StoreResult<(Project, bool)> {
    if let Some(project) = project_by_name(conn, name)? {
        return Ok((project, false));
    }

    let id = insert_project(conn, name)?;
    Ok((
        Project {
            id,
            name: name.to_string(),
        },
        true,
    ))
}

/// Query: All projects in id order
pub fn list_projects(conn: &Connection) -> StoreResult<Vec<Project>> {
    let mut stmt = conn.prepare("SELECT project_id, project_name FROM Projects ORDER BY project_id")?;
    let projects = stmt
        .query_map([], |row| {
            Ok(Project {
                id: row.get(0)?,
                name: row.get(1)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(projects)
}

// -----------------------------------------------------------------------------
// Tasks
// -----------------------------------------------------------------------------

/// Query: Look up a task by id
pub fn task_by_id(conn: &Connection, task_id: i64) -> StoreResult<Option<Task>> {
    let raw = conn
        .query_row(
            &format!("SELECT {TASK_COLUMNS} FROM Tasks WHERE task_id = ?1"),
            params![task_id],
            RawTask::read,
        )
        .optional()?;
    raw.map(RawTask::into_task).transpose()
}

/// Query: Every task of a project, in id order
pub fn tasks_for_project(conn: &Connection, project_id: i64) -> StoreResult<Vec<Task>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {TASK_COLUMNS} FROM Tasks WHERE project_id = ?1 ORDER BY task_id"
    ))?;
    let raws = stmt
        .query_map(params![project_id], RawTask::read)?
        .collect::<Result<Vec<_>, _>>()?;
    raws.into_iter().map(RawTask::into_task).collect()
}

/// Inserts a task and returns its id
pub fn insert_task(conn: &Connection, task: &NewTask) -> StoreResult<i64> {
    conn.execute(
        "INSERT INTO Tasks (project_id, task_name, required_skill, duration_hours,
                            schedule_from, schedule_to, status)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![
            task.project_id,
            task.name,
            task.required_skill,
            task.duration_hours,
            task.schedule.start_text(),
            task.schedule.end_text(),
            task.status.as_str(),
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

/// Marks a task completed by `resource_id` on `date`
pub fn mark_task_completed(
    conn: &Connection,
    task_id: i64,
    resource_id: i64,
    date: NaiveDate,
) -> StoreResult<usize> {
    let updated = conn.execute(
        "UPDATE Tasks
         SET status = 'Completed', completed_by_resource_id = ?2, completion_date = ?3
         WHERE task_id = ?1",
        params![task_id, resource_id, format_date(date)],
    )?;
    Ok(updated)
}

// -----------------------------------------------------------------------------
// Assignments
// -----------------------------------------------------------------------------

/// Query: Resource currently assigned to a task
pub fn assignment_for_task(conn: &Connection, task_id: i64) -> StoreResult<Option<i64>> {
    let resource_id = conn
        .query_row(
            "SELECT resource_id FROM Assignments WHERE task_id = ?1",
            params![task_id],
            |row| row.get(0),
        )
        .optional()?;
    Ok(resource_id)
}

/// Links a task to a resource
pub fn insert_assignment(conn: &Connection, task_id: i64, resource_id: i64) -> StoreResult<()> {
    conn.execute(
        "INSERT INTO Assignments (task_id, resource_id) VALUES (?1, ?2)",
        params![task_id, resource_id],
    )?;
    Ok(())
}

/// Releases a task's assignment
pub fn delete_assignment(conn: &Connection, task_id: i64) -> StoreResult<usize> {
    let deleted = conn.execute("DELETE FROM Assignments WHERE task_id = ?1", params![task_id])?;
    Ok(deleted)
}

/// One live assignment with display details
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AssignmentRow {
    pub resource_id: i64,
    pub resource_name: String,
    pub task_id: i64,
    pub task_name: String,
    pub project_name: String,
    pub schedule_from: String,
    pub schedule_to: String,
    pub duration_hours: u32,
}

/// Query: Every live assignment, by resource then task
pub fn active_assignments(conn: &Connection) -> StoreResult<Vec<AssignmentRow>> {
    let mut stmt = conn.prepare(
        "SELECT r.resource_id, r.resource_name, t.task_id, t.task_name, p.project_name,
                t.schedule_from, t.schedule_to, t.duration_hours
         FROM Assignments a
         JOIN Resources r ON r.resource_id = a.resource_id
         JOIN Tasks t ON t.task_id = a.task_id
         JOIN Projects p ON p.project_id = t.project_id
         ORDER BY r.resource_id, t.task_id",
    )?;
    let rows = stmt
        .query_map([], |row| {
            Ok(AssignmentRow {
                resource_id: row.get(0)?,
                resource_name: row.get(1)?,
                task_id: row.get(2)?,
                task_name: row.get(3)?,
                project_name: row.get(4)?,
                schedule_from: row.get(5)?,
                schedule_to: row.get(6)?,
                duration_hours: row.get(7)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(rows)
}

/// One completed task
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CompletionRow {
    pub project_name: String,
    pub task_name: String,
    pub completed_by: Option<String>,
    pub completion_date: Option<String>,
}

/// Query: Completed tasks, most recent first
pub fn completed_tasks(conn: &Connection) -> StoreResult<Vec<CompletionRow>> {
    let mut stmt = conn.prepare(
        "SELECT p.project_name, t.task_name, r.resource_name, t.completion_date
         FROM Tasks t
         JOIN Projects p ON p.project_id = t.project_id
         LEFT JOIN Resources r ON r.resource_id = t.completed_by_resource_id
         WHERE t.status = 'Completed'
         ORDER BY t.completion_date DESC, t.task_id",
    )?;
    let rows = stmt
        .query_map([], |row| {
            Ok(CompletionRow {
                project_name: row.get(0)?,
                task_name: row.get(1)?,
                completed_by: row.get(2)?,
                completion_date: row.get(3)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(rows)
}

// -----------------------------------------------------------------------------
// Resources, skills, availability
// -----------------------------------------------------------------------------

/// Query: All resources in id order
pub fn list_resources(conn: &Connection) -> StoreResult<Vec<Resource>> {
    let mut stmt =
        conn.prepare("SELECT resource_id, resource_name FROM Resources ORDER BY resource_id")?;
    let resources = stmt
        .query_map([], read_resource)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(resources)
}

/// Inserts a resource and returns its id; duplicate names violate UNIQUE
pub fn insert_resource(conn: &Connection, name: &str) -> StoreResult<i64> {
    conn.execute(
        "INSERT INTO Resources (resource_name) VALUES (?1)",
        params![name],
    )?;
    Ok(conn.last_insert_rowid())
}

/// Grants a skill to a resource
pub fn insert_skill(conn: &Connection, resource_id: i64, skill: &str) -> StoreResult<()> {
    conn.execute(
        "INSERT INTO Resource_Skills (resource_id, skill) VALUES (?1, ?2)",
        params![resource_id, skill],
    )?;
    Ok(())
}

/// Adds an availability window and returns its id
pub fn insert_availability(
    conn: &Connection,
    resource_id: i64,
    window: &DateWindow,
) -> StoreResult<i64> {
    conn.execute(
        "INSERT INTO Resource_Availability (resource_id, available_from, available_to)
         VALUES (?1, ?2, ?3)",
        params![resource_id, window.start_text(), window.end_text()],
    )?;
    Ok(conn.last_insert_rowid())
}

/// Query: Skill rows of a resource, in insertion order
pub fn skills_for_resource(conn: &Connection, resource_id: i64) -> StoreResult<Vec<String>> {
    let mut stmt = conn.prepare(
        "SELECT skill FROM Resource_Skills WHERE resource_id = ?1 ORDER BY rowid",
    )?;
    let skills = stmt
        .query_map(params![resource_id], |row| row.get(0))?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(skills)
}

/// Query: Availability windows of a resource, in id order
pub fn availability_for_resource(
    conn: &Connection,
    resource_id: i64,
) -> StoreResult<Vec<DateWindow>> {
    let mut stmt = conn.prepare(
        "SELECT available_from, available_to FROM Resource_Availability
         WHERE resource_id = ?1 ORDER BY availability_id",
    )?;
    let raw: Vec<(String, String)> = stmt
        .query_map(params![resource_id], |row| Ok((row.get(0)?, row.get(1)?)))?
        .collect::<Result<Vec<_>, _>>()?;
    raw.iter()
        .map(|(from, to)| DateWindow::parse(from, to).map_err(StoreError::from))
        .collect()
}

/// Query: Every (resource, window) pair for holders of `skill`.
///
/// Ordered by resource id, so a caller can collapse consecutive rows
/// for the same resource. Resources holding the skill but without any
/// window do not appear.
pub fn skill_holder_windows(
    conn: &Connection,
    skill: &str,
) -> StoreResult<Vec<(Resource, DateWindow)>> {
    let mut stmt = conn.prepare(
        "SELECT r.resource_id, r.resource_name, ra.available_from, ra.available_to
         FROM Resources r
         JOIN Resource_Availability ra ON ra.resource_id = r.resource_id
         WHERE EXISTS (
             SELECT 1 FROM Resource_Skills rs
             WHERE rs.resource_id = r.resource_id AND rs.skill = ?1
         )
         ORDER BY r.resource_id, ra.availability_id",
    )?;
    let raw: Vec<(Resource, String, String)> = stmt
        .query_map(params![skill], |row| {
            Ok((read_resource(row)?, row.get(2)?, row.get(3)?))
        })?
        .collect::<Result<Vec<_>, _>>()?;
    raw.into_iter()
        .map(|(resource, from, to)| {
            let window = DateWindow::parse(&from, &to)?;
            Ok::<_, StoreError>((resource, window))
        })
        .collect()
}

/// Query: Lowest-id holder of `skill` with no live assignment
pub fn free_resource_with_skill(conn: &Connection, skill: &str) -> StoreResult<Option<Resource>> {
    let resource = conn
        .query_row(
            "SELECT r.resource_id, r.resource_name
             FROM Resources r
             WHERE EXISTS (
                 SELECT 1 FROM Resource_Skills rs
                 WHERE rs.resource_id = r.resource_id AND rs.skill = ?1
             )
             AND NOT EXISTS (
                 SELECT 1 FROM Assignments a WHERE a.resource_id = r.resource_id
             )
             ORDER BY r.resource_id
             LIMIT 1",
            params![skill],
            read_resource,
        )
        .optional()?;
    Ok(resource)
}

/// Query: Holder of `skill` with the smallest assigned workload.
///
/// Ties go to the lowest resource id.
pub fn least_loaded_resource_with_skill(
    conn: &Connection,
    skill: &str,
) -> StoreResult<Option<LoadedResource>> {
    let loaded = conn
        .query_row(
            "SELECT r.resource_id, r.resource_name, COALESCE(SUM(t.duration_hours), 0) AS load
             FROM Resources r
             LEFT JOIN Assignments a ON a.resource_id = r.resource_id
             LEFT JOIN Tasks t ON t.task_id = a.task_id
             WHERE EXISTS (
                 SELECT 1 FROM Resource_Skills rs
                 WHERE rs.resource_id = r.resource_id AND rs.skill = ?1
             )
             GROUP BY r.resource_id, r.resource_name
             ORDER BY load ASC, r.resource_id ASC
             LIMIT 1",
            params![skill],
            |row| {
                Ok(LoadedResource {
                    resource: read_resource(row)?,
                    load_hours: row.get(2)?,
                })
            },
        )
        .optional()?;
    Ok(loaded)
}

/// Query: Latest `schedule_to` among a resource's assigned tasks
pub fn latest_assigned_end(conn: &Connection, resource_id: i64) -> StoreResult<Option<NaiveDate>> {
    let latest: Option<String> = conn.query_row(
        "SELECT MAX(t.schedule_to)
         FROM Assignments a JOIN Tasks t ON t.task_id = a.task_id
         WHERE a.resource_id = ?1",
        params![resource_id],
        |row| row.get(0),
    )?;
    Ok(latest.as_deref().map(parse_date).transpose()?)
}

/// Query: Distinct skill labels, sorted
pub fn distinct_skills(conn: &Connection) -> StoreResult<Vec<String>> {
    let mut stmt = conn.prepare("SELECT DISTINCT skill FROM Resource_Skills ORDER BY skill")?;
    let skills = stmt
        .query_map([], |row| row.get(0))?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(skills)
}

/// Query: Row count of a table, for tests and diagnostics
pub fn count_rows(conn: &Connection, table: &str) -> StoreResult<i64> {
    let count: i64 = conn.query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |row| row.get(0))?;
    Ok(count)
}
