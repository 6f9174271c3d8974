//! Employee domain model.
//!
//! # Responsibility
//! - Define the canonical record persisted by the store.
//! - Define the filter/update shapes accepted by the repository.
//!
//! # Invariants
//! - Every persisted record is identified by a store-assigned `EmployeeId`.
//! - Deletion is a hard delete; there are no tombstones.

pub mod employee;
pub mod query;
