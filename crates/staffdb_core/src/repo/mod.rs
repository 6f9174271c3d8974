//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define the employee record store contract.
//! - Isolate SQLite query details from service orchestration.
//!
//! # Invariants
//! - Repository writes validate records before persistence.
//! - Repository APIs return semantic errors (`NotFound`, `Unsaved`) in
//!   addition to DB transport errors.

pub mod employee_repo;
