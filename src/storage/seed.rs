//! Sample data for `resmatch init`
//!
//! Initialization always drops and recreates every table before seeding,
//! so running it twice leaves byte-identical data.

use log::info;
use serde::Serialize;

use super::queries::count_rows;
use super::store::{Store, StoreResult};

const SEED_DATA: &str = "
    INSERT INTO Projects (project_id, project_name) VALUES
        (1, 'E-commerce Website'),
        (2, 'Mobile Banking App');

    INSERT INTO Resources (resource_id, resource_name) VALUES
        (101, 'Ram'),
        (102, 'Shyam'),
        (103, 'Kiran'),
        (104, 'Dhina');

    INSERT INTO Tasks (task_id, project_id, task_name, required_skill, duration_hours,
                       schedule_from, schedule_to, status) VALUES
        (1, 1, 'Setup Database', 'SQL', 40, '2025-08-01', '2025-08-05', 'Assigned'),
        (2, 1, 'Develop Backend API', 'C#', 80, '2025-08-06', '2025-08-15', 'Pending'),
        (3, 1, 'Create UI Components', 'Web Services/Rest API', 88, '2025-08-10', '2025-08-20', 'Pending'),
        (4, 2, 'Design Database Schema', 'Mongo DB', 40, '2025-09-01', '2025-09-05', 'Assigned'),
        (5, 2, 'Implement Core Logic', 'Node.JS', 120, '2025-09-06', '2025-09-20', 'Pending');

    INSERT INTO Resource_Skills (resource_id, skill) VALUES
        (101, 'SQL'),
        (101, 'C#'),
        (102, 'C#'),
        (102, 'Web Services/Rest API'),
        (103, 'Mongo DB'),
        (103, 'Node.JS'),
        (104, 'SQL'),
        (104, 'Node.JS');

    INSERT INTO Resource_Availability (availability_id, resource_id, available_from, available_to) VALUES
        (1, 101, '2025-08-01', '2025-08-10'),
        (2, 102, '2025-08-10', '2025-08-25'),
        (3, 103, '2025-09-01', '2025-09-30'),
        (4, 104, '2025-08-01', '2025-08-15');

    INSERT INTO Assignments (task_id, resource_id) VALUES
        (1, 101),
        (4, 103);
";

/// Row counts after seeding
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SeedSummary {
    pub projects: i64,
    pub tasks: i64,
    pub resources: i64,
    pub skills: i64,
    pub availability_windows: i64,
    pub assignments: i64,
}

/// Drops every table, recreates the schema, and loads the sample data
pub fn initialize(store: &mut Store) -> StoreResult<SeedSummary> {
    let tx = store.transaction()?;
    Store::recreate_schema(&tx)?;
    tx.execute_batch(SEED_DATA)?;

    let summary = SeedSummary {
        projects: count_rows(&tx, "Projects")?,
        tasks: count_rows(&tx, "Tasks")?,
        resources: count_rows(&tx, "Resources")?,
        skills: count_rows(&tx, "Resource_Skills")?,
        availability_windows: count_rows(&tx, "Resource_Availability")?,
        assignments: count_rows(&tx, "Assignments")?,
    };
    tx.commit()?;

    info!(
        "event=store_init module=storage status=ok projects={} tasks={} resources={} assignments={}",
        summary.projects, summary.tasks, summary.resources, summary.assignments
    );
    Ok(summary)
}
