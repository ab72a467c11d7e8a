//! Task domain model shared by every core layer.
//!
//! # Responsibility
//! - Define the canonical task shape used by cache, query and mutation code.
//! - Keep wire-level validation at the model boundary.
//!
//! # Invariants
//! - Every task is identified by a stable `TaskId`.
//! - Score and completion invariants hold for every constructed value.

pub mod task;
