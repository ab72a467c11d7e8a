//! Versioned in-memory task cache keyed by owner and completion state.
//!
//! # Responsibility
//! - Hold the latest locally applied task collection per cache key.
//! - Support optimistic single-task patches with snapshot-based rollback.
//! - Reject stale loader writes through version checks.
//!
//! # Invariants
//! - Versions are stamps from one cache-wide counter that only increases;
//!   a stamp is never assigned twice.
//! - Every write, patch, invalidation and partial restore takes a new stamp.
//! - A wholesale restore reinstates the snapshot exactly, stamp included.
//! - Locks are never held across `.await` points by callers.

use crate::model::task::{Task, TaskId};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::Arc;

/// Identifies one cached collection.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CacheKey {
    pub owner_id: String,
    pub completed: bool,
}

impl CacheKey {
    pub fn new(owner_id: impl Into<String>, completed: bool) -> Self {
        Self {
            owner_id: owner_id.into(),
            completed,
        }
    }

    /// Key of the same owner's opposite completion scope.
    pub fn sibling(&self) -> Self {
        Self {
            owner_id: self.owner_id.clone(),
            completed: !self.completed,
        }
    }
}

impl Display for CacheKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/completed={}", self.owner_id, self.completed)
    }
}

/// Immutable view of one cached collection.
///
/// Cloning shares the task slice, so reads and snapshots are cheap.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheEntry {
    tasks: Arc<[Task]>,
    version: u64,
    stale: bool,
}

impl CacheEntry {
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    /// Shared handle to the task slice.
    pub fn shared_tasks(&self) -> Arc<[Task]> {
        Arc::clone(&self.tasks)
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    /// Stale entries must be refetched before they are trusted.
    pub fn is_stale(&self) -> bool {
        self.stale
    }
}

/// Pre-patch state retained by a pending mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheSnapshot {
    key: CacheKey,
    task_id: TaskId,
    prior: CacheEntry,
    patched_version: u64,
}

impl CacheSnapshot {
    pub fn key(&self) -> &CacheKey {
        &self.key
    }

    pub fn task_id(&self) -> &TaskId {
        &self.task_id
    }

    /// Entry exactly as it was before the patch.
    pub fn prior(&self) -> &CacheEntry {
        &self.prior
    }

    /// Prior value of the patched task.
    pub fn prior_task(&self) -> Option<&Task> {
        self.prior.tasks.iter().find(|task| task.id == self.task_id)
    }

    /// Stamp the patch produced.
    pub fn patched_version(&self) -> u64 {
        self.patched_version
    }
}

/// How a snapshot was reapplied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RestoreOutcome {
    /// Nothing touched the entry since the patch; snapshot reinstated as-is.
    Wholesale,
    /// The entry moved on; only the patched task was reverted in place.
    TaskOnly,
    /// The entry or task no longer exists; newer state wins.
    Skipped,
}

/// Cache operation error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CacheError {
    EntryMissing(CacheKey),
    TaskMissing { key: CacheKey, task_id: TaskId },
    /// Version-checked write lost against a newer change.
    VersionConflict {
        key: CacheKey,
        expected: Option<u64>,
        actual: Option<u64>,
    },
}

impl Display for CacheError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EntryMissing(key) => write!(f, "cache entry not found: {key}"),
            Self::TaskMissing { key, task_id } => {
                write!(f, "task {task_id} not found in cache entry {key}")
            }
            Self::VersionConflict {
                key,
                expected,
                actual,
            } => write!(
                f,
                "cache entry {key} changed: expected version {expected:?}, found {actual:?}"
            ),
        }
    }
}

impl Error for CacheError {}

#[derive(Default)]
struct CacheState {
    entries: HashMap<CacheKey, CacheEntry>,
    clock: u64,
}

impl CacheState {
    fn next_version(&mut self) -> u64 {
        self.clock += 1;
        self.clock
    }

    fn insert(&mut self, key: CacheKey, tasks: Arc<[Task]>) -> u64 {
        let version = self.next_version();
        self.entries.insert(
            key,
            CacheEntry {
                tasks,
                version,
                stale: false,
            },
        );
        version
    }
}

/// Session-scoped task cache.
#[derive(Default)]
pub struct TaskCache {
    state: Mutex<CacheState>,
}

impl TaskCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the entry for `key`, stale or not.
    pub fn read(&self, key: &CacheKey) -> Option<CacheEntry> {
        self.state.lock().entries.get(key).cloned()
    }

    /// Returns the entry for `key` only when it can be trusted.
    pub fn read_fresh(&self, key: &CacheKey) -> Option<CacheEntry> {
        self.read(key).filter(|entry| !entry.stale)
    }

    /// Current stamp of `key`, if cached.
    pub fn version(&self, key: &CacheKey) -> Option<u64> {
        self.state.lock().entries.get(key).map(CacheEntry::version)
    }

    /// Replaces the entry unconditionally and returns its new stamp.
    pub fn write(&self, key: CacheKey, tasks: impl Into<Arc<[Task]>>) -> u64 {
        self.state.lock().insert(key, tasks.into())
    }

    /// Replaces the entry only if its stamp still equals `expected`.
    ///
    /// `expected = None` requires the entry to still be absent.
    ///
    /// # Errors
    /// - `CacheError::VersionConflict` when the entry changed meanwhile.
    pub fn write_if_current(
        &self,
        key: CacheKey,
        tasks: impl Into<Arc<[Task]>>,
        expected: Option<u64>,
    ) -> Result<u64, CacheError> {
        let mut state = self.state.lock();
        let actual = state.entries.get(&key).map(CacheEntry::version);
        if actual != expected {
            return Err(CacheError::VersionConflict {
                key,
                expected,
                actual,
            });
        }
        Ok(state.insert(key, tasks.into()))
    }

    /// Applies `mutator` to exactly one task and returns the prior entry.
    ///
    /// The mutator runs on a copy; the entry is swapped only after it returns.
    ///
    /// # Errors
    /// - `CacheError::EntryMissing` when `key` is not cached.
    /// - `CacheError::TaskMissing` when the entry has no task `task_id`.
    pub fn patch<F>(
        &self,
        key: &CacheKey,
        task_id: &TaskId,
        mutator: F,
    ) -> Result<CacheSnapshot, CacheError>
    where
        F: FnOnce(&mut Task),
    {
        let mut state = self.state.lock();
        let prior = state
            .entries
            .get(key)
            .cloned()
            .ok_or_else(|| CacheError::EntryMissing(key.clone()))?;
        let position = prior
            .tasks
            .iter()
            .position(|task| &task.id == task_id)
            .ok_or_else(|| CacheError::TaskMissing {
                key: key.clone(),
                task_id: task_id.clone(),
            })?;

        let mut tasks = prior.tasks.to_vec();
        mutator(&mut tasks[position]);
        let patched_version = state.next_version();
        state.entries.insert(
            key.clone(),
            CacheEntry {
                tasks: tasks.into(),
                version: patched_version,
                stale: prior.stale,
            },
        );

        Ok(CacheSnapshot {
            key: key.clone(),
            task_id: task_id.clone(),
            prior,
            patched_version,
        })
    }

    /// Reverts a patch by reinstating the whole prior task when the entry
    /// moved on. See `restore_with` for field-scoped reverts.
    pub fn restore(&self, snapshot: &CacheSnapshot) -> RestoreOutcome {
        self.restore_with(snapshot, |task, prior| *task = prior.clone())
    }

    /// Reverts a patch using its snapshot.
    ///
    /// If the entry still carries the patch stamp, the prior entry is
    /// reinstated as-is and `revert` is not called. Otherwise `revert`
    /// receives the current task and its pre-patch value, and must undo only
    /// what the patch changed so later patches to the same task survive.
    pub fn restore_with<F>(&self, snapshot: &CacheSnapshot, revert: F) -> RestoreOutcome
    where
        F: FnOnce(&mut Task, &Task),
    {
        let mut state = self.state.lock();
        let Some(current) = state.entries.get(&snapshot.key) else {
            return RestoreOutcome::Skipped;
        };
        if current.version == snapshot.patched_version {
            state
                .entries
                .insert(snapshot.key.clone(), snapshot.prior.clone());
            return RestoreOutcome::Wholesale;
        }

        let Some(prior_task) = snapshot.prior_task() else {
            return RestoreOutcome::Skipped;
        };
        let Some(position) = current
            .tasks
            .iter()
            .position(|task| task.id == snapshot.task_id)
        else {
            return RestoreOutcome::Skipped;
        };

        let mut tasks = current.tasks.to_vec();
        revert(&mut tasks[position], prior_task);
        let stale = current.stale;
        let version = state.next_version();
        state.entries.insert(
            snapshot.key.clone(),
            CacheEntry {
                tasks: tasks.into(),
                version,
                stale,
            },
        );
        RestoreOutcome::TaskOnly
    }

    /// Marks entries stale so the next reader refetches them.
    pub fn invalidate<'k, I>(&self, keys: I)
    where
        I: IntoIterator<Item = &'k CacheKey>,
    {
        let mut state = self.state.lock();
        for key in keys {
            if !state.entries.contains_key(key) {
                continue;
            }
            let version = state.next_version();
            if let Some(entry) = state.entries.get_mut(key) {
                entry.stale = true;
                entry.version = version;
            }
        }
    }

    /// Finds a task's key and current value, preferring fresh entries and
    /// then the most recently stamped one.
    pub fn locate(&self, task_id: &TaskId) -> Option<(CacheKey, Task)> {
        let state = self.state.lock();
        state
            .entries
            .iter()
            .filter_map(|(key, entry)| {
                entry
                    .tasks
                    .iter()
                    .find(|task| &task.id == task_id)
                    .map(|task| (key, entry, task))
            })
            .max_by_key(|(_, entry, _)| (!entry.stale, entry.version))
            .map(|(key, _, task)| (key.clone(), task.clone()))
    }

    /// Drops every entry; used when the owning session ends.
    pub fn clear(&self) {
        self.state.lock().entries.clear();
    }

    pub fn len(&self) -> usize {
        self.state.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.lock().entries.is_empty()
    }
}
