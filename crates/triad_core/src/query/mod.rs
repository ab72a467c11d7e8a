//! Read-only query surface over task collections.
//!
//! # Responsibility
//! - Filter, sort, bucket and paginate tasks without mutating inputs.
//! - Keep every operation pure so views can recompose them freely.
//!
//! # Invariants
//! - Query functions borrow tasks and return borrowed views.
//! - Relative periods are evaluated against an explicit `Calendar`.

pub mod calendar;
pub mod filter;
pub mod paginate;
pub mod sort;
pub mod timeline;
