//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define per-entity CRUD contracts over the directory store.
//! - Isolate SQLite query details from service orchestration.
//!
//! # Invariants
//! - Repository writes must run entity validation before persistence.
//! - Repositories refuse connections whose schema is not fully migrated.

pub mod department_repo;
pub mod employee_repo;
mod error;
mod query;

pub use error::{RepoError, RepoResult};

use crate::db::migrations::{current_user_version, latest_version};
use rusqlite::Connection;

/// Verifies that `conn` is migrated and exposes `table` with `columns`.
pub(crate) fn ensure_schema_ready(
    conn: &Connection,
    table: &'static str,
    columns: &[&'static str],
) -> RepoResult<()> {
    let expected_version = latest_version();
    let actual_version = current_user_version(conn)?;
    if actual_version < expected_version {
        return Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version,
        });
    }

    let table_exists: bool = conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = ?1);",
        [table],
        |row| row.get(0),
    )?;
    if !table_exists {
        return Err(RepoError::MissingRequiredTable(table));
    }

    let mut stmt = conn.prepare("SELECT name FROM pragma_table_info(?1);")?;
    let present = stmt
        .query_map([table], |row| row.get::<_, String>(0))?
        .collect::<Result<Vec<_>, _>>()?;
    if let Some(&column) = columns
        .iter()
        .find(|column| !present.iter().any(|name| name == *column))
    {
        return Err(RepoError::MissingRequiredColumn { table, column });
    }

    Ok(())
}
