//! Task CLI commands: match, allocate, complete, history

use anyhow::{Context, Result};

use super::output::Output;
use crate::engine::{self, AllocationRequest};
use crate::storage::Store;

/// Prints each open task of a project with its qualified resources
pub fn match_resources(store: &Store, output: &Output, project_id: i64) -> Result<()> {
    let matches = engine::find_matches(store, project_id)
        .with_context(|| format!("Failed to match resources for project {}", project_id))?;

    if output.is_json() {
        output.data(&matches)?;
        return Ok(());
    }

    if matches.is_empty() {
        println!("No open tasks for project {}", project_id);
        return Ok(());
    }

    for task in &matches {
        println!("Task: {}", task.task_name);
        println!("  Skill:    {}", task.required_skill);
        println!("  Schedule: {}", task.schedule);
        if task.matched_resources.is_empty() {
            println!("  Matched:  (none)");
        } else {
            let names: Vec<_> = task
                .matched_resources
                .iter()
                .map(|r| format!("{} ({})", r.name, r.id))
                .collect();
            println!("  Matched:  {}", names.join(", "));
        }
    }

    Ok(())
}

/// Allocates a new task and reports who got it
pub fn allocate(
    store: &mut Store,
    output: &Output,
    project_name: String,
    task_name: String,
    skill: String,
    duration_hours: u32,
) -> Result<()> {
    let request = AllocationRequest {
        project_name,
        task_name,
        skill,
        duration_hours,
    };

    let result = engine::allocate_task(store, &request).context("Failed to allocate task")?;
    if let Some(task_id) = result.task_id {
        output.verbose_ctx("allocate", &format!("Created task {}", task_id));
    }

    output.outcome(result.success, &result.message, &result)
}

/// Completes a task and frees its resource
pub fn complete(store: &mut Store, output: &Output, task_id: i64) -> Result<()> {
    let result = engine::complete_task(store, task_id)
        .with_context(|| format!("Failed to complete task {}", task_id))?;

    output.outcome(result.success, &result.message, &result)
}

/// Lists completed tasks, newest first
pub fn history(store: &Store, output: &Output) -> Result<()> {
    let rows = engine::completed_tasks(store).context("Failed to read task history")?;

    if output.is_json() {
        output.data(&rows)?;
        return Ok(());
    }

    if rows.is_empty() {
        println!("No completed tasks");
        return Ok(());
    }

    println!(
        "{:<12} {:<12} {:<24} PROJECT",
        "COMPLETED", "BY", "TASK"
    );
    println!("{}", "-".repeat(72));
    for row in &rows {
        println!(
            "{:<12} {:<12} {:<24} {}",
            row.completion_date.as_deref().unwrap_or("-"),
            row.completed_by.as_deref().unwrap_or("-"),
            row.task_name,
            row.project_name
        );
    }

    Ok(())
}
