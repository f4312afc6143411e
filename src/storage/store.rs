//! SQLite store
//!
//! Owns the connection and the schema. Query functions live in
//! [`super::queries`] and take a `&Connection`, so they run the same way
//! on the store's connection or inside a [`Transaction`].

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use log::{debug, error, info};
use rusqlite::{Connection, ErrorCode, OptionalExtension, Transaction};
use thiserror::Error;

use crate::domain::{ScheduleError, UnknownStatus};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Failed to open database at {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Schedule error: {0}")]
    Schedule(#[from] ScheduleError),

    #[error("Corrupt task status: {0}")]
    Status(#[from] UnknownStatus),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Returns true when `err` is a UNIQUE/CHECK/FK constraint failure
pub fn is_constraint_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(e, _) if e.code == ErrorCode::ConstraintViolation
    )
}

/// Table names in dependency order (parents first)
pub(crate) const TABLES: &[&str] = &[
    "Projects",
    "Resources",
    "Tasks",
    "Resource_Skills",
    "Resource_Availability",
    "Assignments",
];

const SCHEMA: &str = "
    CREATE TABLE IF NOT EXISTS Projects (
        project_id INTEGER PRIMARY KEY,
        project_name TEXT NOT NULL UNIQUE
    );

    CREATE TABLE IF NOT EXISTS Resources (
        resource_id INTEGER PRIMARY KEY,
        resource_name TEXT NOT NULL UNIQUE
    );

    CREATE TABLE IF NOT EXISTS Tasks (
        task_id INTEGER PRIMARY KEY,
        project_id INTEGER NOT NULL REFERENCES Projects(project_id),
        task_name TEXT NOT NULL,
        required_skill TEXT NOT NULL,
        duration_hours INTEGER NOT NULL DEFAULT 0,
        schedule_from TEXT NOT NULL,
        schedule_to TEXT NOT NULL,
        status TEXT NOT NULL DEFAULT 'Assigned'
            CHECK (status IN ('Pending', 'Assigned', 'Completed')),
        completed_by_resource_id INTEGER REFERENCES Resources(resource_id),
        completion_date TEXT,
        CHECK (schedule_from <= schedule_to)
    );

    CREATE TABLE IF NOT EXISTS Resource_Skills (
        resource_id INTEGER NOT NULL REFERENCES Resources(resource_id),
        skill TEXT NOT NULL
    );

    CREATE TABLE IF NOT EXISTS Resource_Availability (
        availability_id INTEGER PRIMARY KEY,
        resource_id INTEGER NOT NULL REFERENCES Resources(resource_id),
        available_from TEXT NOT NULL,
        available_to TEXT NOT NULL,
        CHECK (available_from <= available_to)
    );

    -- task_id as primary key: at most one live assignment per task
    CREATE TABLE IF NOT EXISTS Assignments (
        task_id INTEGER PRIMARY KEY REFERENCES Tasks(task_id),
        resource_id INTEGER NOT NULL REFERENCES Resources(resource_id)
    );

    CREATE INDEX IF NOT EXISTS idx_tasks_project ON Tasks(project_id);
    CREATE INDEX IF NOT EXISTS idx_skills_skill ON Resource_Skills(skill);
    CREATE INDEX IF NOT EXISTS idx_availability_resource ON Resource_Availability(resource_id);
    CREATE INDEX IF NOT EXISTS idx_assignments_resource ON Assignments(resource_id);
";

/// Handle to the resource-matching database
pub struct Store {
    /// Backing file, `None` for in-memory stores
    path: Option<PathBuf>,

    conn: Connection,
}

impl Store {
    /// Schema version - bump when the schema changes
    pub const SCHEMA_VERSION: i32 = 1;

    /// Opens (or creates) the database file and ensures the schema exists
    pub fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        let path = path.as_ref().to_path_buf();
        let started_at = Instant::now();

        let conn = Connection::open(&path).map_err(|source| {
            error!(
                "event=store_open module=storage status=error path={} error={}",
                path.display(),
                source
            );
            StoreError::Open {
                path: path.clone(),
                source,
            }
        })?;

        let store = Self::bootstrap(Some(path), conn)?;
        info!(
            "event=store_open module=storage status=ok mode=file duration_ms={}",
            started_at.elapsed().as_millis()
        );
        Ok(store)
    }

    /// Opens a private in-memory database with the schema applied
    pub fn open_in_memory() -> StoreResult<Self> {
        let conn = Connection::open_in_memory()?;
        let store = Self::bootstrap(None, conn)?;
        debug!("event=store_open module=storage status=ok mode=memory");
        Ok(store)
    }

    fn bootstrap(path: Option<PathBuf>, conn: Connection) -> StoreResult<Self> {
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        conn.busy_timeout(Duration::from_secs(5))?;

        let store = Self { path, conn };
        store.ensure_schema()?;
        Ok(store)
    }

    /// Creates any missing tables without touching existing data
    fn ensure_schema(&self) -> StoreResult<()> {
        self.conn.execute_batch(SCHEMA)?;
        if self.schema_version()? != Self::SCHEMA_VERSION {
            self.conn
                .execute_batch(&format!("PRAGMA user_version = {};", Self::SCHEMA_VERSION))?;
        }
        Ok(())
    }

    /// Drops and recreates every table inside `tx`
    pub(crate) fn recreate_schema(tx: &Transaction<'_>) -> StoreResult<()> {
        for table in TABLES.iter().rev() {
            tx.execute_batch(&format!("DROP TABLE IF EXISTS {table};"))?;
        }
        tx.execute_batch(SCHEMA)?;
        Ok(())
    }

    /// Gets the current schema version
    pub fn schema_version(&self) -> StoreResult<i32> {
        let version: Option<i32> = self
            .conn
            .query_row("PRAGMA user_version", [], |row| row.get(0))
            .optional()?;
        Ok(version.unwrap_or(0))
    }

    /// Read access for query functions
    pub fn conn(&self) -> &Connection {
        &self.conn
    }

    /// Starts a transaction; dropping it without `commit` rolls back
    pub fn transaction(&mut self) -> StoreResult<Transaction<'_>> {
        Ok(self.conn.transaction()?)
    }

    /// Returns the path to the database file, if any
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }
}
