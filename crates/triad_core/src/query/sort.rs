//! Stable task ordering.
//!
//! # Invariants
//! - Sorting is stable: equal keys keep their input order.
//! - The input collection is never mutated.
//! - Missing completion timestamps sort as the Unix epoch.

use crate::model::task::Task;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::cmp::Reverse;

/// Ordering applied to a task view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    /// Most recently completed first.
    #[default]
    Recent,
    /// Least recently completed first.
    Oldest,
    HighScore,
    LowScore,
    /// Case-insensitive title order.
    Alphabetical,
}

/// Returns a sorted view over `tasks`.
pub fn apply_sort<'a, I>(tasks: I, key: SortKey) -> Vec<&'a Task>
where
    I: IntoIterator<Item = &'a Task>,
{
    let mut sorted: Vec<&'a Task> = tasks.into_iter().collect();
    match key {
        SortKey::Recent => sorted.sort_by_key(|task| Reverse(completion_key(task))),
        SortKey::Oldest => sorted.sort_by_key(|task| completion_key(task)),
        SortKey::HighScore => sorted.sort_by_key(|task| Reverse(task.total_score())),
        SortKey::LowScore => sorted.sort_by_key(|task| task.total_score()),
        SortKey::Alphabetical => {
            sorted.sort_by_cached_key(|task| (task.title.to_lowercase(), task.title.clone()))
        }
    }
    sorted
}

fn completion_key(task: &Task) -> DateTime<Utc> {
    task.completed_at().unwrap_or(DateTime::UNIX_EPOCH)
}
