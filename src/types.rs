//! Core types for cycle projection
//!
//! `CycleInput` is what the user reports; `CycleProjection` is what the
//! projector derives from it for a given calendar day.

use chrono::{DateTime, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::ProjectionError;

/// Cycle length assumed by the dashboard when the user gives none
pub const DEFAULT_CYCLE_LENGTH_DAYS: u32 = 28;

/// Reported menstrual cycle facts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CycleInput {
    /// First day of the most recent period (may lie in the future)
    pub last_period: NaiveDate,
    /// Days between consecutive period starts, must be > 0
    pub cycle_length_days: u32,
}

impl CycleInput {
    /// Build an input, rejecting a zero-day cycle
    pub fn new(last_period: NaiveDate, cycle_length_days: u32) -> Result<Self, ProjectionError> {
        if cycle_length_days == 0 {
            return Err(ProjectionError::InvalidCycleLength(cycle_length_days.to_string()));
        }
        Ok(Self {
            last_period,
            cycle_length_days,
        })
    }

    /// Build an input from the raw strings collected by the onboarding form
    pub fn parse(last_period: &str, cycle_length_days: &str) -> Result<Self, ProjectionError> {
        let last_period = parse_calendar_date(last_period)?;
        let trimmed = cycle_length_days.trim();
        let length = trimmed
            .parse::<u32>()
            .map_err(|_| ProjectionError::InvalidCycleLength(trimmed.to_string()))?;
        Self::new(last_period, length)
    }
}

/// Parse a calendar date from `YYYY-MM-DD` or an RFC 3339 timestamp.
///
/// Timestamps are truncated to their own calendar date; no timezone shift.
pub fn parse_calendar_date(raw: &str) -> Result<NaiveDate, ProjectionError> {
    let trimmed = raw.trim();
    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return Ok(date);
    }
    DateTime::parse_from_rfc3339(trimmed)
        .map(|dt| dt.date_naive())
        .map_err(|_| ProjectionError::InvalidDate(trimmed.to_string()))
}

/// How a calendar day relates to the projected cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DayKind {
    Period,
    Fertile,
    Regular,
}

/// A single classified day of a month calendar
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarDay {
    pub date: NaiveDate,
    pub kind: DayKind,
    /// Whether this is the projection's reference day
    pub is_today: bool,
}

/// Projection derived from a [`CycleInput`] as of a calendar day.
///
/// Recomputed on every call to the projector; nothing here is cached.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CycleProjection {
    /// Input the projection was derived from
    pub input: CycleInput,
    /// Reference day ("today")
    pub as_of: NaiveDate,
    /// Predicted first day of the next period
    pub next_period_start: NaiveDate,
    /// Last day highlighted as period on the calendar (inclusive)
    pub next_period_end: NaiveDate,
    /// Assumed period duration (days)
    pub period_duration_days: u32,
    /// First day of the fertile window (inclusive)
    pub fertile_window_start: NaiveDate,
    /// Last day of the fertile window (inclusive)
    pub fertile_window_end: NaiveDate,
    /// Whole calendar days between the last period and `as_of`
    pub days_since_last_period: i64,
    /// Remaining share of the cycle in percent.
    ///
    /// Not clamped: negative once the cycle has elapsed, above 100 when the
    /// last period lies in the future.
    pub cycle_progress_percent: f64,
}
