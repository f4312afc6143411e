//! Calendar helpers for task schedules and availability windows
//!
//! Dates are persisted as fixed-width `YYYY-MM-DD` strings. Because the
//! format is zero-padded, lexicographic order on the stored text matches
//! chronological order, which lets SQL compare dates as plain strings.
//! That only holds for four-digit years, so windows are confined to
//! [`MIN_YEAR`]..=[`MAX_YEAR`].

use chrono::{Datelike, Months, NaiveDate, NaiveDateTime, NaiveTime, TimeDelta};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Storage format for calendar dates
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Earliest year a stored date may carry
pub const MIN_YEAR: i32 = 1;

/// Latest year a stored date may carry
pub const MAX_YEAR: i32 = 9999;

/// Longest task duration accepted: ten years of wall-clock hours
pub const MAX_DURATION_HOURS: u32 = 87_600;

#[derive(Debug, Error)]
pub enum ScheduleError {
    #[error("Invalid date '{value}': {source}")]
    InvalidDate {
        value: String,
        #[source]
        source: chrono::ParseError,
    },

    #[error("Window starts after it ends: {from} > {to}")]
    Inverted { from: NaiveDate, to: NaiveDate },

    #[error("Date {date} is outside years {min}..={max}", min = MIN_YEAR, max = MAX_YEAR)]
    OutOfRange { date: NaiveDate },

    #[error("Adding {hours}h to {start} overflows the calendar")]
    Overflow { start: NaiveDateTime, hours: u32 },

    #[error("Duration of {hours}h is outside 1..={max} hours", max = MAX_DURATION_HOURS)]
    InvalidDuration { hours: u32 },
}

/// Parses a stored `YYYY-MM-DD` date
pub fn parse_date(value: &str) -> Result<NaiveDate, ScheduleError> {
    NaiveDate::parse_from_str(value, DATE_FORMAT).map_err(|source| ScheduleError::InvalidDate {
        value: value.to_string(),
        source,
    })
}

/// Formats a date for storage
pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Rejects durations of zero or above [`MAX_DURATION_HOURS`]
pub fn check_duration(hours: u32) -> Result<u32, ScheduleError> {
    if hours == 0 || hours > MAX_DURATION_HOURS {
        return Err(ScheduleError::InvalidDuration { hours });
    }
    Ok(hours)
}

/// Adds a duration as raw wall-clock hours.
///
/// No business-hours or weekend handling: 40 hours from Friday 09:00 is
/// Sunday 01:00.
pub fn add_hours(start: NaiveDateTime, hours: u32) -> Result<NaiveDateTime, ScheduleError> {
    start
        .checked_add_signed(TimeDelta::hours(i64::from(hours)))
        .ok_or(ScheduleError::Overflow { start, hours })
}

/// Midnight at the start of `date`
pub fn start_of_day(date: NaiveDate) -> NaiveDateTime {
    date.and_time(NaiveTime::MIN)
}

/// Same calendar day one year later (Feb 29 clamps to Feb 28)
pub fn one_year_after(date: NaiveDate) -> NaiveDate {
    date.checked_add_months(Months::new(12)).unwrap_or(NaiveDate::MAX)
}

fn check_storable(date: NaiveDate) -> Result<NaiveDate, ScheduleError> {
    if (MIN_YEAR..=MAX_YEAR).contains(&date.year()) {
        Ok(date)
    } else {
        Err(ScheduleError::OutOfRange { date })
    }
}

/// An inclusive calendar date range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DateWindow {
    pub from: NaiveDate,
    pub to: NaiveDate,
}

impl DateWindow {
    /// Creates a window, rejecting `from > to` and years that do not store
    /// as four digits
    pub fn new(from: NaiveDate, to: NaiveDate) -> Result<Self, ScheduleError> {
        let from = check_storable(from)?;
        let to = check_storable(to)?;
        if from > to {
            return Err(ScheduleError::Inverted { from, to });
        }
        Ok(Self { from, to })
    }

    /// Parses a window from stored date strings
    pub fn parse(from: &str, to: &str) -> Result<Self, ScheduleError> {
        Self::new(parse_date(from)?, parse_date(to)?)
    }

    /// Default onboarding window: `start` through the same day next year
    pub fn one_year_from(start: NaiveDate) -> Result<Self, ScheduleError> {
        Self::new(start, one_year_after(start))
    }

    /// Inclusive interval overlap: `other.to >= self.from && other.from <= self.to`
    pub fn overlaps(&self, other: &DateWindow) -> bool {
        other.to >= self.from && other.from <= self.to
    }

    /// Stored form of the start date
    pub fn start_text(&self) -> String {
        format_date(self.from)
    }

    /// Stored form of the end date
    pub fn end_text(&self) -> String {
        format_date(self.to)
    }

    /// Human-readable form, e.g. `2025-08-01 to 2025-08-05`
    pub fn display(&self) -> String {
        format!("{} to {}", self.start_text(), self.end_text())
    }
}
