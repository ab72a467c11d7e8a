//! Remote store boundary.
//!
//! # Responsibility
//! - Define the contract between the core and the remote task store.
//! - Keep transport details out of cache and mutation code.

pub mod task_store;
