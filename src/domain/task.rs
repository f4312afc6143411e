//! Task domain model
//!
//! A task is a unit of project work requiring one skill over a scheduled
//! date window. Tasks are created by allocation (or seeding), move to
//! `Completed` when their assignment is released, and are never deleted.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::schedule::DateWindow;

#[derive(Debug, Error)]
#[error("Unknown task status: {0}")]
pub struct UnknownStatus(pub String);

/// Status of a task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum TaskStatus {
    Pending,
    /// Column default: an allocated task has a live assignment
    #[default]
    Assigned,
    Completed,
}

impl TaskStatus {
    /// Stored representation
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Pending => "Pending",
            TaskStatus::Assigned => "Assigned",
            TaskStatus::Completed => "Completed",
        }
    }

    /// Returns true for work that still needs attention (pending or assigned)
    pub fn is_open(&self) -> bool {
        !matches!(self, TaskStatus::Completed)
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Pending" => Ok(TaskStatus::Pending),
            "Assigned" => Ok(TaskStatus::Assigned),
            "Completed" => Ok(TaskStatus::Completed),
            other => Err(UnknownStatus(other.to_string())),
        }
    }
}

/// A task as stored
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: i64,
    pub project_id: i64,
    pub name: String,
    pub required_skill: String,
    pub duration_hours: u32,
    pub schedule: DateWindow,
    pub status: TaskStatus,
    pub completed_by: Option<i64>,
    pub completion_date: Option<String>,
}

/// Fields for inserting a task; the store assigns the id
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTask {
    pub project_id: i64,
    pub name: String,
    pub required_skill: String,
    pub duration_hours: u32,
    pub schedule: DateWindow,
    pub status: TaskStatus,
}

/// A project groups tasks by name
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    pub id: i64,
    pub name: String,
}
