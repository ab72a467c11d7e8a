//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate cache, query and remote-store calls into use-case APIs.
//! - Keep UI collaborators decoupled from cache and transport details.

pub mod mutation_service;
pub mod view_service;
