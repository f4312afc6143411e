//! Resource CLI commands

use anyhow::{Context, Result};

use super::output::Output;
use crate::engine;
use crate::storage::Store;

/// Onboards a resource with its skills
pub fn add(store: &mut Store, output: &Output, name: &str, skills: &[String]) -> Result<()> {
    if skills.is_empty() {
        output.verbose_ctx("add-resource", "No skills given; resource will never match");
    }

    let result = engine::add_resource(store, name, skills)
        .with_context(|| format!("Failed to add resource '{}'", name))?;

    output.outcome(result.success, &result.message, &result)
}

/// Lists resources with their skills and availability windows
pub fn list(store: &Store, output: &Output) -> Result<()> {
    let resources = engine::list_resources(store).context("Failed to list resources")?;

    if output.is_json() {
        output.data(&resources)?;
        return Ok(());
    }

    if resources.is_empty() {
        println!("No resources");
        return Ok(());
    }

    println!("{:<6} {:<12} {:<36} AVAILABLE", "ID", "NAME", "SKILLS");
    println!("{}", "-".repeat(84));
    for resource in &resources {
        let skills = if resource.skills.is_empty() {
            "-".to_string()
        } else {
            resource.skills.join(", ")
        };
        println!(
            "{:<6} {:<12} {:<36} {}",
            resource.id,
            resource.name,
            skills,
            resource.availability.join("; ")
        );
    }

    Ok(())
}

/// Lists every distinct skill
pub fn skills(store: &Store, output: &Output) -> Result<()> {
    let skills = engine::list_skills(store).context("Failed to list skills")?;

    if output.is_json() {
        output.data(&skills)?;
    } else if skills.is_empty() {
        println!("No skills recorded");
    } else {
        for skill in &skills {
            println!("{}", skill);
        }
    }

    Ok(())
}

/// Shows assigned tasks and total hours per resource
pub fn assignments(store: &Store, output: &Output) -> Result<()> {
    let workloads = engine::resource_assignments(store).context("Failed to list assignments")?;

    if output.is_json() {
        output.data(&workloads)?;
        return Ok(());
    }

    if workloads.is_empty() {
        println!("No active assignments");
        return Ok(());
    }

    for workload in &workloads {
        println!(
            "{} ({}) - {}h",
            workload.resource_name, workload.resource_id, workload.total_hours
        );
        for task in &workload.tasks {
            println!(
                "  {:<6} {:<28} {:>5}h  {}  [{}]",
                task.task_id, task.task_name, task.duration_hours, task.schedule, task.project_name
            );
        }
    }

    Ok(())
}
