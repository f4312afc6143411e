//! Domain models for resource matching
//!
//! Plain data types and calendar rules, without any I/O concerns.

mod resource;
mod schedule;
mod task;

pub use resource::{LoadedResource, Resource};
pub use schedule::{
    add_hours, check_duration, format_date, one_year_after, parse_date, start_of_day, DateWindow,
    ScheduleError, DATE_FORMAT, MAX_DURATION_HOURS, MAX_YEAR, MIN_YEAR,
};
pub use task::{NewTask, Project, Task, TaskStatus, UnknownStatus};
