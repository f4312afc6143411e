//! # Matching and Allocation Engine
//!
//! Every operation takes the [`Store`](crate::storage::Store) explicitly
//! and runs to completion synchronously.
//!
//! | Operation | Writes | Module |
//! |-----------|--------|--------|
//! | [`find_matches`] | none | `matcher` |
//! | [`allocate_task`] | project (if new), task, assignment | `allocator` |
//! | [`complete_task`] | task status, assignment removal | `lifecycle` |
//! | [`add_resource`] | resource, skills, availability | `lifecycle` |
//!
//! Business outcomes ("no resource holds this skill", "task has no active
//! assignment", "name already taken") come back as result values with
//! `success: false`. Only storage faults are `Err`.

mod allocator;
mod lifecycle;
mod matcher;
mod reports;

pub use allocator::{
    allocate_task, allocate_task_at, select_resource, AllocationRequest, AllocationResult,
    Selection,
};
pub use lifecycle::{
    add_resource, add_resource_on, complete_task, complete_task_on, AddResourceResult,
    CompletionResult,
};
pub use matcher::{find_matches, MatchedResource, TaskMatch};
pub use reports::{
    completed_tasks, list_projects, list_resources, list_skills, resource_assignments,
    AssignedTask, ResourceProfile, ResourceWorkload,
};
