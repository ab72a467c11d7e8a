//! Core task lifecycle and scoring engine for Triad.
//! This crate is the single source of truth for scoring and mutation invariants.

pub mod analysis;
pub mod cache;
pub mod config;
pub mod logging;
pub mod model;
pub mod query;
pub mod score;
pub mod service;
pub mod sync;

pub use analysis::{analyze, FeedbackCounts, PillarAverages, PillarCounts, ZoneAnalysis, ZoneCounts};
pub use cache::task_cache::{
    CacheEntry, CacheError, CacheKey, CacheSnapshot, RestoreOutcome, TaskCache,
};
pub use config::{ConfigError, ViewConfig};
pub use logging::{
    default_log_level, init_logging, logging_status, LogLevel, LoggingConfig, LoggingError,
};
pub use model::task::{Feedback, Task, TaskId, TaskValidationError};
pub use query::calendar::Calendar;
pub use query::filter::{apply_filters, FilterCriteria, Period, Visibility};
pub use query::paginate::{clamp_page, page_index_sequence, paginate, total_pages, PageIndex};
pub use query::sort::{apply_sort, SortKey};
pub use query::timeline::{group_by_timeline, TimelineBucket, TimelinePeriod};
pub use score::{
    classify_zone, compute_total, dominant_pillar, Pillar, PillarRatings, ScoreError, Zone,
};
pub use service::mutation_service::{
    DiscardNotices, FetchError, MutationCoordinator, MutationError, MutationNotice,
    MutationPhase, NoticeKind, NoticeSink, Operation,
};
pub use service::view_service::{TaskPage, TaskViewService, TimelineSection};
pub use sync::task_store::{RemoteTaskStore, StoreError, StoreResult};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::{core_version, ping};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
