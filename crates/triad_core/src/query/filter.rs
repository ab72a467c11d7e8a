//! Conjunctive task filtering.
//!
//! # Responsibility
//! - Compose independent predicates (search, period, score band, feedback,
//!   dominant pillar, visibility) into one pass over a task collection.
//!
//! # Invariants
//! - An unset criterion matches every task.
//! - Predicates are combined with logical AND.
//! - A custom period missing either bound matches every task (fail-open).
//! - Input order is preserved and the input is never mutated.

use crate::model::task::{Feedback, Task};
use crate::query::calendar::Calendar;
use crate::score::{Pillar, Zone};
use chrono::NaiveDate;
use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};

/// Time window a task's reference date must fall into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Period {
    #[default]
    All,
    Today,
    ThisWeek,
    ThisMonth,
    /// Inclusive on both ends.
    Custom {
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    },
}

/// Hidden-flag predicate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Visibility {
    #[default]
    All,
    VisibleOnly,
    HiddenOnly,
}

/// Filter criteria; `Default` matches everything.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterCriteria {
    /// Case-insensitive title substring.
    pub search: Option<String>,
    pub period: Period,
    pub score_band: Option<Zone>,
    pub feedback: Option<Feedback>,
    pub pillar: Option<Pillar>,
    pub visibility: Visibility,
}

/// Returns the tasks matching every criterion, in input order.
pub fn apply_filters<'a, I>(
    tasks: I,
    criteria: &FilterCriteria,
    calendar: &Calendar,
) -> Vec<&'a Task>
where
    I: IntoIterator<Item = &'a Task>,
{
    let search = SearchMatcher::new(criteria.search.as_deref());
    tasks
        .into_iter()
        .filter(|task| {
            search.matches(&task.title)
                && matches_period(task, criteria.period, calendar)
                && criteria
                    .score_band
                    .map_or(true, |zone| task.zone() == zone)
                && criteria
                    .feedback
                    .map_or(true, |feedback| task.feedback == Some(feedback))
                && criteria
                    .pillar
                    .map_or(true, |pillar| task.dominant_pillar() == pillar)
                && matches_visibility(task, criteria.visibility)
        })
        .collect()
}

fn matches_period(task: &Task, period: Period, calendar: &Calendar) -> bool {
    if period_is_open(period) {
        return true;
    }
    let Some(date) = calendar.reference_date(task) else {
        return false;
    };
    match period {
        Period::Today => calendar.is_today(date),
        Period::ThisWeek => calendar.is_this_week(date),
        Period::ThisMonth => calendar.is_this_month(date),
        Period::Custom {
            start: Some(start),
            end: Some(end),
        } => start <= date && date <= end,
        Period::All | Period::Custom { .. } => true,
    }
}

/// Periods that accept every task without looking at dates.
fn period_is_open(period: Period) -> bool {
    match period {
        Period::All => true,
        Period::Custom { start, end } => start.is_none() || end.is_none(),
        Period::Today | Period::ThisWeek | Period::ThisMonth => false,
    }
}

fn matches_visibility(task: &Task, visibility: Visibility) -> bool {
    match visibility {
        Visibility::All => true,
        Visibility::VisibleOnly => !task.hidden,
        Visibility::HiddenOnly => task.hidden,
    }
}

/// Title matcher compiled once per filter pass.
enum SearchMatcher {
    Any,
    Pattern(Regex),
    /// Lowercased, space-joined needle, used only if the pattern exceeds
    /// regex limits.
    Literal(String),
}

impl SearchMatcher {
    fn new(search: Option<&str>) -> Self {
        let words: Vec<&str> = search.unwrap_or_default().split_whitespace().collect();
        if words.is_empty() {
            return Self::Any;
        }
        // Any run of whitespace in the needle matches any run in the title.
        let pattern = words
            .iter()
            .map(|word| regex::escape(word))
            .collect::<Vec<_>>()
            .join(r"\s+");
        match RegexBuilder::new(&pattern).case_insensitive(true).build() {
            Ok(pattern) => Self::Pattern(pattern),
            Err(_) => Self::Literal(words.join(" ").to_lowercase()),
        }
    }

    fn matches(&self, title: &str) -> bool {
        match self {
            Self::Any => true,
            Self::Pattern(pattern) => pattern.is_match(title),
            Self::Literal(needle) => title.to_lowercase().contains(needle.as_str()),
        }
    }
}
