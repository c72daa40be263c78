//! Cycle projection
//!
//! Pure calendar arithmetic: next period, fertile window and progress through
//! the current cycle, all derived from the last period date and cycle length.

use chrono::{Datelike, Days, Local, NaiveDate};

use crate::error::ProjectionError;
use crate::types::{CalendarDay, CycleInput, CycleProjection, DayKind};

/// Assumed period duration in days
pub const PERIOD_DURATION_DAYS: u32 = 5;

/// Fertile window opens this many days before the next period
pub const FERTILE_WINDOW_START_OFFSET_DAYS: u64 = 14;

/// Fertile window closes this many days before the next period
pub const FERTILE_WINDOW_END_OFFSET_DAYS: u64 = 10;

/// Stateless projector for cycle dates
pub struct CycleProjector;

impl CycleProjector {
    /// Project the cycle as seen on `as_of`.
    ///
    /// Deterministic: identical inputs always yield identical projections.
    /// Once `as_of` passes the predicted period the progress keeps falling
    /// below zero; the projection is never re-anchored to a later cycle.
    pub fn project(
        input: &CycleInput,
        as_of: NaiveDate,
    ) -> Result<CycleProjection, ProjectionError> {
        if input.cycle_length_days == 0 {
            return Err(ProjectionError::InvalidCycleLength(
                input.cycle_length_days.to_string(),
            ));
        }

        let next_period_start = add_days(input.last_period, u64::from(input.cycle_length_days))?;
        let next_period_end = add_days(next_period_start, u64::from(PERIOD_DURATION_DAYS))?;
        let fertile_window_start = sub_days(next_period_start, FERTILE_WINDOW_START_OFFSET_DAYS)?;
        let fertile_window_end = sub_days(next_period_start, FERTILE_WINDOW_END_OFFSET_DAYS)?;

        let days_since_last_period = (as_of - input.last_period).num_days();
        let cycle_length = f64::from(input.cycle_length_days);
        let cycle_progress_percent =
            ((cycle_length - days_since_last_period as f64) / cycle_length) * 100.0;

        Ok(CycleProjection {
            input: *input,
            as_of,
            next_period_start,
            next_period_end,
            period_duration_days: PERIOD_DURATION_DAYS,
            fertile_window_start,
            fertile_window_end,
            days_since_last_period,
            cycle_progress_percent,
        })
    }

    /// Project the cycle as seen on the local calendar date
    pub fn project_today(input: &CycleInput) -> Result<CycleProjection, ProjectionError> {
        Self::project(input, Local::now().date_naive())
    }
}

fn add_days(date: NaiveDate, days: u64) -> Result<NaiveDate, ProjectionError> {
    date.checked_add_days(Days::new(days))
        .ok_or(ProjectionError::OutOfRange)
}

fn sub_days(date: NaiveDate, days: u64) -> Result<NaiveDate, ProjectionError> {
    date.checked_sub_days(Days::new(days))
        .ok_or(ProjectionError::OutOfRange)
}

impl CycleProjection {
    /// Classify a calendar day against the projected windows.
    ///
    /// Both windows are inclusive at each end. A day inside both is a period day.
    pub fn classify(&self, date: NaiveDate) -> DayKind {
        if date >= self.next_period_start && date <= self.next_period_end {
            DayKind::Period
        } else if date >= self.fertile_window_start && date <= self.fertile_window_end {
            DayKind::Fertile
        } else {
            DayKind::Regular
        }
    }

    /// Calendar days from `as_of` to the predicted period (negative once overdue)
    pub fn days_until_next_period(&self) -> i64 {
        (self.next_period_start - self.as_of).num_days()
    }

    /// Progress rounded for display, halves rounding toward positive infinity
    pub fn cycle_progress_display(&self) -> i64 {
        (self.cycle_progress_percent + 0.5).floor() as i64
    }

    /// Whether the reference day falls inside the fertile window
    pub fn is_fertile_today(&self) -> bool {
        self.classify(self.as_of) == DayKind::Fertile
    }

    /// Classify every day of a month, e.g. for a period calendar view
    pub fn month_calendar(&self, year: i32, month: u32) -> Result<Vec<CalendarDay>, ProjectionError> {
        let first = NaiveDate::from_ymd_opt(year, month, 1).ok_or_else(|| {
            ProjectionError::InvalidDate(format!("{year:04}-{month:02}"))
        })?;

        let mut days = Vec::with_capacity(31);
        let mut current = first;
        while current.month() == month {
            days.push(CalendarDay {
                date: current,
                kind: self.classify(current),
                is_today: current == self.as_of,
            });
            current = match current.succ_opt() {
                Some(next) => next,
                None => break,
            };
        }
        Ok(days)
    }
}
