//! Directory domain model.
//!
//! # Responsibility
//! - Define the persisted record shapes for departments and employees.
//! - Keep validation as plain functions over records and untyped candidates.
//!
//! # Invariants
//! - Every record is identified by a stable, non-nil UUID.
//! - Nothing is persisted without passing its entity's `validate`.

pub mod department;
pub mod employee;
pub mod validation;
