//! Reference calendar for period predicates and timeline buckets.
//!
//! # Invariants
//! - All date comparisons use local dates in `offset`.
//! - A week is the seven days starting at the most recent `week_start`
//!   on or before `today`.

use crate::config::ViewConfig;
use crate::model::task::Task;
use chrono::{DateTime, Datelike, Days, FixedOffset, Local, NaiveDate, Utc, Weekday};

/// Snapshot of "now" used to evaluate relative periods.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Calendar {
    today: NaiveDate,
    offset: FixedOffset,
    week_start: Weekday,
}

impl Calendar {
    /// Builds a calendar anchored at `now` in `now`'s own offset.
    pub fn new(now: DateTime<FixedOffset>, week_start: Weekday) -> Self {
        Self {
            today: now.date_naive(),
            offset: *now.offset(),
            week_start,
        }
    }

    /// Builds a calendar anchored at the current local time.
    pub fn now_local(config: &ViewConfig) -> Self {
        Self::new(Local::now().fixed_offset(), config.week_start)
    }

    pub fn today(&self) -> NaiveDate {
        self.today
    }

    pub fn week_start(&self) -> Weekday {
        self.week_start
    }

    /// Converts a UTC timestamp to the calendar's local date.
    pub fn local_date(&self, at: DateTime<Utc>) -> NaiveDate {
        at.with_timezone(&self.offset).date_naive()
    }

    /// Inclusive first and last day of the current week.
    pub fn week_bounds(&self) -> (NaiveDate, NaiveDate) {
        let back = (7 + self.today.weekday().num_days_from_monday()
            - self.week_start.num_days_from_monday())
            % 7;
        let start = self.today - Days::new(u64::from(back));
        (start, start + Days::new(6))
    }

    pub fn is_today(&self, date: NaiveDate) -> bool {
        date == self.today
    }

    pub fn is_this_week(&self, date: NaiveDate) -> bool {
        let (start, end) = self.week_bounds();
        (start..=end).contains(&date)
    }

    pub fn is_this_month(&self, date: NaiveDate) -> bool {
        date.year() == self.today.year() && date.month() == self.today.month()
    }

    pub fn is_this_year(&self, date: NaiveDate) -> bool {
        date.year() == self.today.year()
    }

    /// Date a task is tested on by period filters.
    ///
    /// Completion date first, then the ideal date, then the creation date.
    pub fn reference_date(&self, task: &Task) -> Option<NaiveDate> {
        task.completed_at()
            .map(|at| self.local_date(at))
            .or(task.ideal_date)
            .or_else(|| task.created_at.map(|at| self.local_date(at)))
    }
}
