//! Task domain model.
//!
//! # Responsibility
//! - Define the canonical task record exchanged with the remote store.
//! - Provide lifecycle helpers for completion, visibility and feedback.
//!
//! # Invariants
//! - `total_score()` is derived from the pillar ratings, never stored apart.
//! - A task is completed iff `completed_at` is set.
//! - Wire records breaking either rule are rejected on deserialize.

use crate::score::{self, Pillar, PillarRatings, ScoreError, Zone};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Opaque stable task identifier assigned by the remote store.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(String);

impl TaskId {
    /// Wraps an externally assigned id.
    ///
    /// # Errors
    /// - `TaskValidationError::BlankId` when `value` is blank after trim.
    pub fn new(value: impl Into<String>) -> Result<Self, TaskValidationError> {
        let value = value.into();
        if value.trim().is_empty() {
            return Err(TaskValidationError::BlankId);
        }
        Ok(Self(value))
    }

    /// Generates a fresh random id for locally created tasks.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for TaskId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Post-completion reflection recorded by the owner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Feedback {
    Transformed,
    Relief,
    Obligation,
}

impl Feedback {
    pub const ALL: [Feedback; 3] = [Feedback::Transformed, Feedback::Relief, Feedback::Obligation];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Transformed => "transformed",
            Self::Relief => "relief",
            Self::Obligation => "obligation",
        }
    }
}

/// Validation error for task construction and wire decoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskValidationError {
    BlankId,
    InvalidRating(ScoreError),
    TotalScoreMismatch { expected: u8, actual: i64 },
    /// `completed` and `completed_at` disagree.
    CompletionMismatch { completed: bool },
}

impl Display for TaskValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BlankId => write!(f, "task id must not be blank"),
            Self::InvalidRating(err) => write!(f, "{err}"),
            Self::TotalScoreMismatch { expected, actual } => write!(
                f,
                "total_score ({actual}) must equal the pillar sum ({expected})"
            ),
            Self::CompletionMismatch { completed: true } => {
                write!(f, "completed task must carry completed_at")
            }
            Self::CompletionMismatch { completed: false } => {
                write!(f, "incomplete task must not carry completed_at")
            }
        }
    }
}

impl Error for TaskValidationError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidRating(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ScoreError> for TaskValidationError {
    fn from(value: ScoreError) -> Self {
        Self::InvalidRating(value)
    }
}

/// Canonical task record.
///
/// Ratings and completion are private so the score and completion invariants
/// hold for every value; everything else is plain data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "TaskRecord", into = "TaskRecord")]
pub struct Task {
    pub id: TaskId,
    pub owner_id: String,
    pub title: String,
    /// Day the owner intends to do the task.
    pub ideal_date: Option<NaiveDate>,
    pub created_at: Option<DateTime<Utc>>,
    ratings: PillarRatings,
    completed_at: Option<DateTime<Utc>>,
    /// Independent of completion.
    pub hidden: bool,
    pub feedback: Option<Feedback>,
}

impl Task {
    /// Creates an open task with a generated id, stamped as created now.
    pub fn new(
        owner_id: impl Into<String>,
        title: impl Into<String>,
        ratings: PillarRatings,
    ) -> Self {
        let mut task = Self::build(TaskId::generate(), owner_id, title, ratings);
        task.created_at = Some(Utc::now());
        task
    }

    /// Creates an open task with a caller-provided id.
    ///
    /// Used by import paths and tests where identity already exists.
    ///
    /// # Errors
    /// - `TaskValidationError::BlankId` when `id` is blank.
    pub fn with_id(
        id: impl Into<String>,
        owner_id: impl Into<String>,
        title: impl Into<String>,
        ratings: PillarRatings,
    ) -> Result<Self, TaskValidationError> {
        Ok(Self::build(TaskId::new(id)?, owner_id, title, ratings))
    }

    fn build(
        id: TaskId,
        owner_id: impl Into<String>,
        title: impl Into<String>,
        ratings: PillarRatings,
    ) -> Self {
        Self {
            id,
            owner_id: owner_id.into(),
            title: title.into(),
            ideal_date: None,
            created_at: None,
            ratings,
            completed_at: None,
            hidden: false,
            feedback: None,
        }
    }

    pub fn ratings(&self) -> PillarRatings {
        self.ratings
    }

    /// Replaces all three ratings; the total follows automatically.
    pub fn set_ratings(&mut self, ratings: PillarRatings) {
        self.ratings = ratings;
    }

    pub fn total_score(&self) -> u8 {
        self.ratings.total()
    }

    pub fn zone(&self) -> Zone {
        score::classify_zone(self.total_score())
    }

    pub fn dominant_pillar(&self) -> Pillar {
        self.ratings.dominant()
    }

    pub fn is_completed(&self) -> bool {
        self.completed_at.is_some()
    }

    pub fn completed_at(&self) -> Option<DateTime<Utc>> {
        self.completed_at
    }

    /// Marks the task completed at `at`, replacing any earlier stamp.
    pub fn mark_completed(&mut self, at: DateTime<Utc>) {
        self.completed_at = Some(at);
    }

    /// Clears completion state.
    pub fn mark_incomplete(&mut self) {
        self.completed_at = None;
    }

    /// Flips completion: open tasks complete at `at`, completed tasks reopen.
    pub fn toggle_completed(&mut self, at: DateTime<Utc>) {
        if self.is_completed() {
            self.mark_incomplete();
        } else {
            self.mark_completed(at);
        }
    }
}

/// Wire shape of a task as stored by the remote collaborator.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct TaskRecord {
    id: TaskId,
    owner_id: String,
    title: String,
    #[serde(default)]
    ideal_date: Option<NaiveDate>,
    #[serde(default)]
    created_at: Option<DateTime<Utc>>,
    consequence: i64,
    pride: i64,
    construction: i64,
    total_score: i64,
    completed: bool,
    #[serde(default)]
    completed_at: Option<DateTime<Utc>>,
    #[serde(default)]
    hidden: bool,
    #[serde(default)]
    feedback: Option<Feedback>,
}

impl TryFrom<TaskRecord> for Task {
    type Error = TaskValidationError;

    fn try_from(record: TaskRecord) -> Result<Self, Self::Error> {
        let id = TaskId::new(record.id.0)?;
        let ratings = PillarRatings::new(record.consequence, record.pride, record.construction)?;
        if i64::from(ratings.total()) != record.total_score {
            return Err(TaskValidationError::TotalScoreMismatch {
                expected: ratings.total(),
                actual: record.total_score,
            });
        }
        if record.completed != record.completed_at.is_some() {
            return Err(TaskValidationError::CompletionMismatch {
                completed: record.completed,
            });
        }

        Ok(Self {
            id,
            owner_id: record.owner_id,
            title: record.title,
            ideal_date: record.ideal_date,
            created_at: record.created_at,
            ratings,
            completed_at: record.completed_at,
            hidden: record.hidden,
            feedback: record.feedback,
        })
    }
}

impl From<Task> for TaskRecord {
    fn from(task: Task) -> Self {
        Self {
            consequence: i64::from(task.ratings.consequence()),
            pride: i64::from(task.ratings.pride()),
            construction: i64::from(task.ratings.construction()),
            total_score: i64::from(task.ratings.total()),
            completed: task.completed_at.is_some(),
            id: task.id,
            owner_id: task.owner_id,
            title: task.title,
            ideal_date: task.ideal_date,
            created_at: task.created_at,
            completed_at: task.completed_at,
            hidden: task.hidden,
            feedback: task.feedback,
        }
    }
}
