//! Remote task store contract.
//!
//! # Responsibility
//! - Define the narrow async CRUD surface the core consumes.
//! - Carry transport/auth failures as one typed error envelope.
//!
//! # Invariants
//! - Implementations own timeouts and retries; the core enforces none.
//! - `toggle_completion` returns the authoritative post-mutation task.

use crate::model::task::{Feedback, Task, TaskId};
use async_trait::async_trait;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type StoreResult<T> = Result<T, StoreError>;

/// Failure reported by a remote store implementation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreError {
    /// Stable machine-readable code, e.g. `unauthorized` or `network`.
    pub code: String,
    /// Human-readable detail safe to show to the owner.
    pub message: String,
}

impl StoreError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)
    }
}

impl Error for StoreError {}

/// Async contract implemented by the remote persistence collaborator.
#[async_trait]
pub trait RemoteTaskStore: Send + Sync {
    /// Lists one owner's tasks in one completion scope.
    async fn fetch_tasks(&self, owner_id: &str, completed: bool) -> StoreResult<Vec<Task>>;

    /// Flips completion; the server assigns `completed_at`.
    async fn toggle_completion(
        &self,
        task_id: &TaskId,
        previous_completed: bool,
    ) -> StoreResult<Task>;

    async fn set_feedback(&self, task_id: &TaskId, feedback: Option<Feedback>)
        -> StoreResult<()>;

    async fn set_hidden(&self, task_id: &TaskId, hidden: bool) -> StoreResult<()>;

    /// Clears completion state of a completed task.
    async fn restore_task(&self, task_id: &TaskId) -> StoreResult<()>;
}
