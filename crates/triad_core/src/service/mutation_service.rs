//! Optimistic task mutations with rollback.
//!
//! # Responsibility
//! - Apply complete/restore/hide/feedback changes to the cache before the
//!   remote store confirms them.
//! - Commit (invalidate) or roll back (restore snapshot) once the store
//!   answers, and decide when the owner must be notified.
//! - Load cache entries from the remote store with version-checked writes.
//!
//! # Invariants
//! - At most one mutation per `(task, operation)` is pending; duplicates are
//!   rejected before touching the cache.
//! - The loading flag of a mutation is cleared on every exit path.
//! - Completion-crossing commits invalidate both completion scopes.
//! - Fetch results never overwrite an entry that changed during the fetch.

use crate::cache::task_cache::{CacheError, CacheKey, CacheSnapshot, RestoreOutcome, TaskCache};
use crate::model::task::{Feedback, Task, TaskId};
use crate::sync::task_store::{RemoteTaskStore, StoreError, StoreResult};
use chrono::{DateTime, Utc};
use log::{debug, info, warn};
use parking_lot::Mutex;
use std::collections::HashSet;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::Arc;

/// State-changing operation kinds tracked for loading and exclusivity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    ToggleCompleted,
    SetFeedback,
    Restore,
    ToggleHidden,
}

impl Operation {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::ToggleCompleted => "toggle_completed",
            Self::SetFeedback => "set_feedback",
            Self::Restore => "restore",
            Self::ToggleHidden => "toggle_hidden",
        }
    }

    /// Undoes this operation's change on `task`, leaving fields owned by
    /// other operations as they currently are.
    pub fn revert(self, task: &mut Task, prior: &Task) {
        match self {
            Self::ToggleCompleted | Self::Restore => match prior.completed_at() {
                Some(at) => task.mark_completed(at),
                None => task.mark_incomplete(),
            },
            Self::SetFeedback => task.feedback = prior.feedback,
            Self::ToggleHidden => task.hidden = prior.hidden,
        }
    }

    /// Whether a commit can move the task between completion scopes.
    pub fn crosses_completion(self) -> bool {
        matches!(self, Self::ToggleCompleted | Self::Restore)
    }
}

impl Display for Operation {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lifecycle of one `(task, operation)` mutation.
///
/// `Idle -> Pending -> Committed | RolledBack -> Idle`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationPhase {
    Idle,
    Pending,
    Committed,
    RolledBack,
}

impl MutationPhase {
    fn as_str(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Pending => "pending",
            Self::Committed => "committed",
            Self::RolledBack => "rolled_back",
        }
    }
}

/// Outcome the owner may need to hear about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NoticeKind {
    Committed,
    RolledBack { message: String },
}

/// Notification decision emitted after a mutation settles.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MutationNotice {
    pub task_id: TaskId,
    pub operation: Operation,
    pub kind: NoticeKind,
}

/// Receiver of notification decisions; presentation is up to the caller.
pub trait NoticeSink: Send + Sync {
    fn notify(&self, notice: MutationNotice);
}

/// Sink that drops every notice.
#[derive(Debug, Default, Clone, Copy)]
pub struct DiscardNotices;

impl NoticeSink for DiscardNotices {
    fn notify(&self, _notice: MutationNotice) {}
}

/// Remote read failure. Callers render an empty/error view state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchError {
    pub key: CacheKey,
    pub source: StoreError,
}

impl Display for FetchError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "failed to fetch tasks for {}: {}", self.key, self.source)
    }
}

impl Error for FetchError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        Some(&self.source)
    }
}

/// Mutation failure. The cache already holds its previous consistent state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MutationError {
    /// Same `(task, operation)` is still pending.
    AlreadyPending {
        task_id: TaskId,
        operation: Operation,
    },
    /// Task is not present in any cached scope.
    UnknownTask(TaskId),
    /// The cache changed between lookup and patch.
    Cache(CacheError),
    /// Remote write failed and the optimistic change was rolled back.
    Remote {
        task_id: TaskId,
        operation: Operation,
        source: StoreError,
    },
}

impl Display for MutationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AlreadyPending { task_id, operation } => {
                write!(f, "{operation} already pending for task {task_id}")
            }
            Self::UnknownTask(task_id) => write!(f, "task not cached: {task_id}"),
            Self::Cache(err) => write!(f, "{err}"),
            Self::Remote {
                task_id,
                operation,
                source,
            } => write!(f, "{operation} failed for task {task_id}: {source}"),
        }
    }
}

impl Error for MutationError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Cache(err) => Some(err),
            Self::Remote { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<CacheError> for MutationError {
    fn from(value: CacheError) -> Self {
        Self::Cache(value)
    }
}

type FlagKey = (TaskId, Operation);
type Clock = Box<dyn Fn() -> DateTime<Utc> + Send + Sync>;

/// Holds one loading flag; dropping it clears the flag.
struct LoadingFlag<'c> {
    flags: &'c Mutex<HashSet<FlagKey>>,
    key: FlagKey,
}

impl<'c> LoadingFlag<'c> {
    fn acquire(flags: &'c Mutex<HashSet<FlagKey>>, key: FlagKey) -> Option<Self> {
        if flags.lock().insert(key.clone()) {
            Some(Self { flags, key })
        } else {
            None
        }
    }
}

impl Drop for LoadingFlag<'_> {
    fn drop(&mut self) {
        self.flags.lock().remove(&self.key);
    }
}

/// Mutation that has been optimistically applied and awaits the store.
struct PendingMutation<'c> {
    _flag: LoadingFlag<'c>,
    task_id: TaskId,
    operation: Operation,
    /// Task value before the optimistic change.
    previous: Task,
    snapshot: CacheSnapshot,
}

/// Coordinates optimistic mutations and cache loading for one session.
pub struct MutationCoordinator<S: RemoteTaskStore> {
    store: S,
    cache: Arc<TaskCache>,
    in_flight: Mutex<HashSet<FlagKey>>,
    notices: Arc<dyn NoticeSink>,
    clock: Clock,
}

impl<S: RemoteTaskStore> MutationCoordinator<S> {
    /// Creates a coordinator over `store` and the session cache.
    pub fn new(store: S, cache: Arc<TaskCache>) -> Self {
        Self {
            store,
            cache,
            in_flight: Mutex::new(HashSet::new()),
            notices: Arc::new(DiscardNotices),
            clock: Box::new(Utc::now),
        }
    }

    /// Routes notification decisions to `sink`.
    pub fn with_notice_sink(mut self, sink: Arc<dyn NoticeSink>) -> Self {
        self.notices = sink;
        self
    }

    /// Overrides the clock used for optimistic completion stamps.
    pub fn with_clock<F>(mut self, clock: F) -> Self
    where
        F: Fn() -> DateTime<Utc> + Send + Sync + 'static,
    {
        self.clock = Box::new(clock);
        self
    }

    pub fn cache(&self) -> &Arc<TaskCache> {
        &self.cache
    }

    /// Returns whether `operation` is pending for `task_id`.
    pub fn is_operation_loading(&self, task_id: &TaskId, operation: Operation) -> bool {
        self.in_flight
            .lock()
            .contains(&(task_id.clone(), operation))
    }

    /// Returns one scope's tasks, fetching when the entry is missing or stale.
    ///
    /// The fetched list is written only if the entry's stamp is unchanged
    /// since the fetch started; otherwise it is returned but not cached.
    ///
    /// # Errors
    /// - `FetchError` when the remote read fails; the cache is untouched.
    pub async fn load_tasks(
        &self,
        owner_id: &str,
        completed: bool,
    ) -> Result<Arc<[Task]>, FetchError> {
        let key = CacheKey::new(owner_id, completed);
        if let Some(entry) = self.cache.read_fresh(&key) {
            debug!(
                "event=task_fetch module=mutation status=cache_hit completed={} version={}",
                completed,
                entry.version()
            );
            return Ok(entry.shared_tasks());
        }

        let observed = self.cache.version(&key);
        info!(
            "event=task_fetch module=mutation status=start completed={}",
            completed
        );
        let tasks: Arc<[Task]> = match self.store.fetch_tasks(owner_id, completed).await {
            Ok(tasks) => tasks.into(),
            Err(source) => {
                warn!(
                    "event=task_fetch module=mutation status=error completed={} error_code={}",
                    completed, source.code
                );
                return Err(FetchError { key, source });
            }
        };

        match self
            .cache
            .write_if_current(key, Arc::clone(&tasks), observed)
        {
            Ok(version) => info!(
                "event=task_fetch module=mutation status=ok completed={} count={} version={}",
                completed,
                tasks.len(),
                version
            ),
            Err(err) => warn!(
                "event=task_fetch module=mutation status=discarded completed={} reason={}",
                completed, err
            ),
        }
        Ok(tasks)
    }

    /// Flips completion of a cached task.
    ///
    /// Optimistically stamps `completed_at` with the coordinator clock and
    /// returns the store's authoritative task on commit.
    pub async fn toggle_task_completed(&self, task_id: &TaskId) -> Result<Task, MutationError> {
        let now = (self.clock)();
        let pending = self.begin(task_id, Operation::ToggleCompleted, |task| {
            task.toggle_completed(now)
        })?;
        let previous_completed = pending.previous.is_completed();
        let result = self
            .store
            .toggle_completion(task_id, previous_completed)
            .await;
        self.settle(pending, result)
    }

    /// Records (or clears) post-completion feedback.
    pub async fn set_task_feedback(
        &self,
        task_id: &TaskId,
        feedback: Option<Feedback>,
    ) -> Result<(), MutationError> {
        let pending = self.begin(task_id, Operation::SetFeedback, |task| {
            task.feedback = feedback
        })?;
        let result = self.store.set_feedback(task_id, feedback).await;
        self.settle(pending, result)
    }

    /// Reopens a completed task.
    pub async fn restore_task(&self, task_id: &TaskId) -> Result<(), MutationError> {
        let pending = self.begin(task_id, Operation::Restore, Task::mark_incomplete)?;
        let result = self.store.restore_task(task_id).await;
        self.settle(pending, result)
    }

    /// Flips the hidden flag; completion state is untouched.
    pub async fn toggle_task_hidden(&self, task_id: &TaskId) -> Result<bool, MutationError> {
        let pending = self.begin(task_id, Operation::ToggleHidden, |task| {
            task.hidden = !task.hidden
        })?;
        let hidden = !pending.previous.hidden;
        let result = self.store.set_hidden(task_id, hidden).await;
        self.settle(pending, result).map(|()| hidden)
    }

    /// `Idle -> Pending`: claims the loading flag and patches the cache.
    fn begin<F>(
        &self,
        task_id: &TaskId,
        operation: Operation,
        mutator: F,
    ) -> Result<PendingMutation<'_>, MutationError>
    where
        F: FnOnce(&mut Task),
    {
        let Some(flag) = LoadingFlag::acquire(&self.in_flight, (task_id.clone(), operation)) else {
            warn!(
                "event=mutation module=mutation status=rejected op={} task_id={} reason=already_pending",
                operation, task_id
            );
            return Err(MutationError::AlreadyPending {
                task_id: task_id.clone(),
                operation,
            });
        };

        let (key, previous) = self
            .cache
            .locate(task_id)
            .ok_or_else(|| MutationError::UnknownTask(task_id.clone()))?;
        let snapshot = self.cache.patch(&key, task_id, mutator)?;
        log_transition(task_id, operation, MutationPhase::Idle, MutationPhase::Pending);

        Ok(PendingMutation {
            _flag: flag,
            task_id: task_id.clone(),
            operation,
            previous,
            snapshot,
        })
    }

    /// `Pending -> Committed | RolledBack -> Idle`.
    ///
    /// Consumes the pending mutation, so its loading flag is released when
    /// this returns regardless of the outcome.
    fn settle<T>(
        &self,
        pending: PendingMutation<'_>,
        result: StoreResult<T>,
    ) -> Result<T, MutationError> {
        let PendingMutation {
            _flag,
            task_id,
            operation,
            snapshot,
            ..
        } = pending;

        match result {
            Ok(value) => {
                if operation.crosses_completion() {
                    let key = snapshot.key();
                    self.cache.invalidate([key, &key.sibling()]);
                }
                log_transition(
                    &task_id,
                    operation,
                    MutationPhase::Pending,
                    MutationPhase::Committed,
                );
                self.notices.notify(MutationNotice {
                    task_id,
                    operation,
                    kind: NoticeKind::Committed,
                });
                Ok(value)
            }
            Err(source) => {
                let outcome = self
                    .cache
                    .restore_with(&snapshot, |task, prior| operation.revert(task, prior));
                warn!(
                    "event=mutation module=mutation status={} op={} task_id={} restore={} error_code={}",
                    MutationPhase::RolledBack.as_str(),
                    operation,
                    task_id,
                    restore_label(outcome),
                    source.code
                );
                self.notices.notify(MutationNotice {
                    task_id: task_id.clone(),
                    operation,
                    kind: NoticeKind::RolledBack {
                        message: source.message.clone(),
                    },
                });
                Err(MutationError::Remote {
                    task_id,
                    operation,
                    source,
                })
            }
        }
    }
}

fn log_transition(task_id: &TaskId, operation: Operation, from: MutationPhase, to: MutationPhase) {
    info!(
        "event=mutation module=mutation status={} from={} op={} task_id={}",
        to.as_str(),
        from.as_str(),
        operation,
        task_id
    );
}

fn restore_label(outcome: RestoreOutcome) -> &'static str {
    match outcome {
        RestoreOutcome::Wholesale => "wholesale",
        RestoreOutcome::TaskOnly => "task_only",
        RestoreOutcome::Skipped => "skipped",
    }
}
