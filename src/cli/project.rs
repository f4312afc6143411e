//! Project CLI commands

use anyhow::{Context, Result};

use super::output::Output;
use crate::engine;
use crate::storage::Store;

pub fn list(store: &Store, output: &Output) -> Result<()> {
    let projects = engine::list_projects(store).context("Failed to list projects")?;

    if output.is_json() {
        output.data(&projects)?;
        return Ok(());
    }

    if projects.is_empty() {
        println!("No projects");
        return Ok(());
    }

    println!("{:<6} NAME", "ID");
    println!("{}", "-".repeat(40));
    for project in &projects {
        println!("{:<6} {}", project.id, project.name);
    }

    Ok(())
}
