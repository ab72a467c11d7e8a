//! Session-local task caching.
//!
//! # Responsibility
//! - Keep one task collection per `(owner, completed)` scope.
//! - Provide the snapshot/restore primitives the mutation layer builds on.
//!
//! # Invariants
//! - Entries change only through `TaskCache` methods.
//! - There is exactly one cache instance per session.

pub mod task_cache;
