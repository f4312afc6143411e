//! Resource Matcher - skill-based task matching and greedy allocation
//!
//! Projects contain tasks that each require one skill and a date window.
//! Resources hold skills and availability windows. The engine lists the
//! qualified resources for a project's open tasks and assigns new work to
//! a free skill holder, or else to the least loaded one. Everything is
//! persisted in a single SQLite file.

pub mod cli;
pub mod domain;
pub mod engine;
pub mod logging;
pub mod storage;

pub use domain::{DateWindow, Project, Resource, Task, TaskStatus};
pub use storage::{Store, StoreError};
