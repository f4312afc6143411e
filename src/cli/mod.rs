//! # Command-Line Interface
//!
//! User-facing CLI commands and output formatting.
//!
//! ## Commands
//!
//! | Group | Purpose | Examples |
//! |-------|---------|----------|
//! | Setup | Reset and seed the database | `init` |
//! | Matching | Qualified resources per open task | `match 1` |
//! | Allocation | Greedy assignment of new work | `allocate --project P --task T --skill SQL --hours 40` |
//! | Lifecycle | Completion and onboarding | `complete 3`, `add-resource Asha SQL Rust` |
//! | Reports | Read-only listings | `projects`, `skills`, `assignments`, `history` |
//!
//! ## Output Formats
//!
//! All commands support `--format` flag:
//! - `text` (default) - Human-readable output
//! - `json` - Machine-parseable JSON
//!
//! ## Verbose Mode
//!
//! Use `--verbose` (or `-v`) for debug output and `debug` level logging:
//! ```bash
//! resmatch --verbose match 1
//! ```
//!
//! ## Entry Point
//!
//! Call [`run()`] to parse arguments and execute the appropriate command.

mod app;
mod output;
mod project;
mod resource;
mod task;

pub use app::{Cli, Commands, run};
pub use output::{Output, OutputFormat};
