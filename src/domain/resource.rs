//! Resource domain model
//!
//! Resources are people. Skills are free-text labels matched exactly and
//! case-sensitively; "sql" and "SQL" are different skills.

use serde::{Deserialize, Serialize};

/// A person who can be assigned tasks
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Resource {
    pub id: i64,
    pub name: String,
}

/// A resource together with its current workload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedResource {
    pub resource: Resource,
    /// Sum of `duration_hours` over the resource's live assignments
    pub load_hours: i64,
}
