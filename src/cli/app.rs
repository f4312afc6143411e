//! Main CLI application structure

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use super::output::{Output, OutputFormat};
use super::{project, resource, task};
use crate::domain::MAX_DURATION_HOURS;
use crate::logging::init_logging;
use crate::storage::{initialize, Config, Store};

#[derive(Parser)]
#[command(name = "resmatch")]
#[command(author, version, about = "Match tasks to skilled resources and allocate work greedily")]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output format (defaults to the configured format, else text)
    #[arg(long, short = 'f', global = true)]
    pub format: Option<OutputFormat>,

    /// Enable verbose output for debugging
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    /// Path to the SQLite database
    #[arg(long, global = true, env = "RESMATCH_DB")]
    pub db: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Drop, recreate and seed the database with sample data
    Init,

    /// List a project's open tasks with every qualified, available resource
    Match {
        /// Project ID
        project_id: i64,
    },

    /// Allocate a new task to a free or the least loaded skilled resource
    Allocate {
        /// Project name (created if it does not exist)
        #[arg(long)]
        project: String,

        /// Task name
        #[arg(long)]
        task: String,

        /// Required skill (exact, case-sensitive)
        #[arg(long)]
        skill: String,

        /// Duration in hours (at most ten years' worth)
        #[arg(long, value_parser = clap::value_parser!(u32).range(1..=i64::from(MAX_DURATION_HOURS)))]
        hours: u32,
    },

    /// Mark a task as completed and release its resource
    Complete {
        /// Task ID
        task_id: i64,
    },

    /// Add a resource with skills and a one-year availability window
    AddResource {
        /// Resource name (must be unique)
        name: String,

        /// Skills held by the resource
        skills: Vec<String>,
    },

    /// List projects
    Projects,

    /// List resources with their skills and availability
    Resources,

    /// List all distinct skills
    Skills,

    /// Show active assignments and workload per resource
    Assignments,

    /// Show completed task history
    History,
}

/// Main entry point for the CLI
pub fn run() -> Result<()> {
    let cli = Cli::parse();

    let mut config = Config::load()?;
    if let Some(db) = cli.db {
        config.database = db;
    }

    let format = cli.format.unwrap_or_else(|| config.default_format.into());
    let output = Output::new(format, cli.verbose);
    let level = if output.is_verbose() {
        "debug"
    } else {
        config.log_level.as_str()
    };
    let _logger = init_logging(level).map_err(anyhow::Error::msg)?;

    output.verbose_ctx(
        "config",
        &format!("Using database: {}", config.database.display()),
    );

    let mut store = Store::open(&config.database)
        .with_context(|| format!("Failed to open database: {}", config.database.display()))?;
    if let Some(path) = store.path() {
        output.verbose_ctx("store", &format!("Opened {}", path.display()));
    }

    match cli.command {
        Commands::Init => init(&mut store, &output)?,

        Commands::Match { project_id } => {
            output.verbose_ctx("match", &format!("Matching project {}", project_id));
            task::match_resources(&store, &output, project_id)?
        }
        Commands::Allocate {
            project,
            task: task_name,
            skill,
            hours,
        } => {
            output.verbose_ctx(
                "allocate",
                &format!(
                    "project={:?} task={:?} skill={:?} hours={}",
                    project, task_name, skill, hours
                ),
            );
            task::allocate(&mut store, &output, project, task_name, skill, hours)?
        }
        Commands::Complete { task_id } => task::complete(&mut store, &output, task_id)?,
        Commands::History => task::history(&store, &output)?,

        Commands::AddResource { name, skills } => {
            resource::add(&mut store, &output, &name, &skills)?
        }
        Commands::Resources => resource::list(&store, &output)?,
        Commands::Skills => resource::skills(&store, &output)?,
        Commands::Assignments => resource::assignments(&store, &output)?,

        Commands::Projects => project::list(&store, &output)?,
    }

    output.verbose("Command completed successfully");
    Ok(())
}

/// Recreates and seeds the database
fn init(store: &mut Store, output: &Output) -> Result<()> {
    let summary = initialize(store).context("Failed to initialize database")?;

    if output.is_json() {
        output.data(&serde_json::json!({
            "success": true,
            "message": "Database initialized successfully.",
            "seeded": summary,
        }))?;
    } else {
        output.success("Database initialized successfully.");
        println!(
            "  {} projects, {} tasks, {} resources, {} assignments",
            summary.projects, summary.tasks, summary.resources, summary.assignments
        );
    }

    Ok(())
}
