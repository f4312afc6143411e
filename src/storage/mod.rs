//! # Storage Layer
//!
//! SQLite persistence for projects, tasks, resources and their links.
//!
//! ## Tables
//!
//! | Table | Key | Holds |
//! |-------|-----|-------|
//! | `Projects` | `project_id` | unique project names |
//! | `Tasks` | `task_id` | skill, duration, schedule window, status, completion stamp |
//! | `Resources` | `resource_id` | unique resource names |
//! | `Resource_Skills` | (none) | free-text skill grants, many per resource |
//! | `Resource_Availability` | `availability_id` | date windows, many per resource |
//! | `Assignments` | `task_id` | the one live resource of an unfinished task |
//!
//! ## Atomicity
//!
//! Query functions in [`queries`] take a `&Connection`. Operations that
//! write more than one row open a transaction with [`Store::transaction`]
//! and run the queries on it; dropping the transaction rolls back.
//!
//! ## Key Types
//!
//! - [`Store`] - connection handle, passed explicitly to every operation
//! - [`Config`] - layered file configuration
//! - [`initialize`] - drop, recreate and seed the sample data

mod config;
pub mod queries;
mod seed;
mod store;

pub use config::{
    Config, ConfigError, ConfigFile, OutputFormat, DEFAULT_DATABASE, LOCAL_CONFIG_FILE,
};
pub use seed::{initialize, SeedSummary};
pub use store::{is_constraint_violation, Store, StoreError, StoreResult};
