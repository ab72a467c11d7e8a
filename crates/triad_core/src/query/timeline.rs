//! Chronological partition of completed tasks.
//!
//! # Invariants
//! - Every task with `completed_at` lands in exactly one bucket.
//! - Tasks without `completed_at` land in none.
//! - Buckets are emitted `Today, ThisWeek, ThisMonth, ThisYear, Older`,
//!   and empty buckets are omitted.

use crate::model::task::Task;
use crate::query::calendar::Calendar;
use chrono::NaiveDate;
use serde::Serialize;

/// Timeline bucket label, most recent first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TimelinePeriod {
    Today,
    /// This week excluding today.
    ThisWeek,
    /// This month excluding this week.
    ThisMonth,
    /// This year excluding this month.
    ThisYear,
    Older,
}

impl TimelinePeriod {
    /// Emission order.
    pub const ORDER: [TimelinePeriod; 5] = [
        TimelinePeriod::Today,
        TimelinePeriod::ThisWeek,
        TimelinePeriod::ThisMonth,
        TimelinePeriod::ThisYear,
        TimelinePeriod::Older,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Today => "today",
            Self::ThisWeek => "this_week",
            Self::ThisMonth => "this_month",
            Self::ThisYear => "this_year",
            Self::Older => "older",
        }
    }

    /// Resolves the bucket of one completion date.
    ///
    /// Each arm is only reached when every more recent arm rejected the date,
    /// which is what keeps buckets disjoint when a week straddles a month or
    /// year boundary.
    pub fn classify(date: NaiveDate, calendar: &Calendar) -> Self {
        if calendar.is_today(date) {
            Self::Today
        } else if calendar.is_this_week(date) {
            Self::ThisWeek
        } else if calendar.is_this_month(date) {
            Self::ThisMonth
        } else if calendar.is_this_year(date) {
            Self::ThisYear
        } else {
            Self::Older
        }
    }
}

/// One non-empty timeline bucket.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimelineBucket<'a> {
    pub period: TimelinePeriod,
    /// Members in input order.
    pub tasks: Vec<&'a Task>,
}

/// Partitions completed tasks into ordered, non-empty buckets.
pub fn group_by_timeline<'a, I>(tasks: I, calendar: &Calendar) -> Vec<TimelineBucket<'a>>
where
    I: IntoIterator<Item = &'a Task>,
{
    let mut slots: [Vec<&'a Task>; 5] = Default::default();
    for task in tasks {
        let Some(at) = task.completed_at() else {
            continue;
        };
        let period = TimelinePeriod::classify(calendar.local_date(at), calendar);
        slots[period as usize].push(task);
    }

    TimelinePeriod::ORDER
        .into_iter()
        .zip(slots)
        .filter(|(_, tasks)| !tasks.is_empty())
        .map(|(period, tasks)| TimelineBucket { period, tasks })
        .collect()
}
