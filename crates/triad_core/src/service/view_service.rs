//! Task view composition over the session cache.
//!
//! # Responsibility
//! - Compose filter, sort, pagination and timeline grouping over the latest
//!   cached snapshot of one scope.
//! - Reuse the filtered and sorted order while nothing it depends on changed.
//!
//! # Invariants
//! - A memoized order is reused only for the same cache stamp, criteria,
//!   sort key and calendar.
//! - Requested page numbers are clamped here, before `paginate` sees them.
//! - A page's items and stale flag come from the same cache read.

use crate::cache::task_cache::{CacheEntry, CacheKey, TaskCache};
use crate::config::ViewConfig;
use crate::model::task::Task;
use crate::query::calendar::Calendar;
use crate::query::filter::{apply_filters, FilterCriteria};
use crate::query::paginate::{clamp_page, page_index_sequence, paginate, total_pages, PageIndex};
use crate::query::sort::{apply_sort, SortKey};
use crate::query::timeline::{group_by_timeline, TimelinePeriod};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;

/// One rendered page of a task view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskPage {
    pub items: Vec<Task>,
    /// Effective page after clamping.
    pub page_number: usize,
    pub total_pages: usize,
    /// Matching tasks across all pages.
    pub total_items: usize,
    pub indices: Vec<PageIndex>,
    /// Source entry awaits a refetch.
    pub stale: bool,
}

/// Owned timeline bucket of a task view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimelineSection {
    pub period: TimelinePeriod,
    pub tasks: Vec<Task>,
}

struct ViewMemo {
    version: u64,
    criteria: FilterCriteria,
    sort: SortKey,
    calendar: Calendar,
    ordered: Arc<[Task]>,
}

impl ViewMemo {
    fn is_valid_for(
        &self,
        version: u64,
        criteria: &FilterCriteria,
        sort: SortKey,
        calendar: &Calendar,
    ) -> bool {
        self.version == version
            && self.sort == sort
            && &self.calendar == calendar
            && &self.criteria == criteria
    }
}

/// Builds task views for UI collaborators.
pub struct TaskViewService {
    cache: Arc<TaskCache>,
    config: ViewConfig,
    memos: Mutex<HashMap<CacheKey, ViewMemo>>,
}

impl TaskViewService {
    pub fn new(cache: Arc<TaskCache>, config: ViewConfig) -> Self {
        Self {
            cache,
            config,
            memos: Mutex::new(HashMap::new()),
        }
    }

    pub fn config(&self) -> &ViewConfig {
        &self.config
    }

    /// Filtered and sorted tasks of one scope, or `None` when not cached.
    ///
    /// Returns the memoized slice when the cache stamp and inputs match the
    /// previous call for this scope.
    pub fn sorted_view(
        &self,
        key: &CacheKey,
        criteria: &FilterCriteria,
        sort: SortKey,
        calendar: &Calendar,
    ) -> Option<Arc<[Task]>> {
        let entry = self.cache.read(key)?;
        Some(self.ordered_view(key, &entry, criteria, sort, calendar))
    }

    fn ordered_view(
        &self,
        key: &CacheKey,
        entry: &CacheEntry,
        criteria: &FilterCriteria,
        sort: SortKey,
        calendar: &Calendar,
    ) -> Arc<[Task]> {
        let mut memos = self.memos.lock();
        if let Some(memo) = memos.get(key) {
            if memo.is_valid_for(entry.version(), criteria, sort, calendar) {
                return Arc::clone(&memo.ordered);
            }
        }

        let filtered = apply_filters(entry.tasks(), criteria, calendar);
        let ordered: Arc<[Task]> = apply_sort(filtered, sort).into_iter().cloned().collect();
        memos.insert(
            key.clone(),
            ViewMemo {
                version: entry.version(),
                criteria: criteria.clone(),
                sort,
                calendar: *calendar,
                ordered: Arc::clone(&ordered),
            },
        );
        ordered
    }

    /// One page of a scope's view, with the requested page clamped into range.
    pub fn page(
        &self,
        key: &CacheKey,
        criteria: &FilterCriteria,
        sort: SortKey,
        requested_page: usize,
        calendar: &Calendar,
    ) -> Option<TaskPage> {
        let entry = self.cache.read(key)?;
        let ordered = self.ordered_view(key, &entry, criteria, sort, calendar);
        let page_size = self.config.page_size;
        let total_pages = total_pages(ordered.len(), page_size);
        let page_number = clamp_page(requested_page, total_pages);

        Some(TaskPage {
            items: paginate(&ordered[..], page_size, page_number).to_vec(),
            page_number,
            total_pages,
            total_items: ordered.len(),
            indices: page_index_sequence(page_number, total_pages),
            stale: entry.is_stale(),
        })
    }

    /// Timeline sections of a scope's filtered view, sorted within buckets.
    pub fn timeline(
        &self,
        key: &CacheKey,
        criteria: &FilterCriteria,
        sort: SortKey,
        calendar: &Calendar,
    ) -> Option<Vec<TimelineSection>> {
        let ordered = self.sorted_view(key, criteria, sort, calendar)?;
        let sections = group_by_timeline(ordered.iter(), calendar)
            .into_iter()
            .map(|bucket| TimelineSection {
                period: bucket.period,
                tasks: bucket.tasks.into_iter().cloned().collect(),
            })
            .collect();
        Some(sections)
    }

    /// Drops memoized orders, e.g. when the session ends.
    pub fn clear(&self) {
        self.memos.lock().clear();
    }
}
