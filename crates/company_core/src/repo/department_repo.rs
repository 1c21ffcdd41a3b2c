//! Department repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Provide the CRUD surface over the `departments` collection.
//! - Keep SQL details inside the persistence boundary.
//!
//! # Invariants
//! - Write paths validate the record or patch before any SQL mutation.
//! - Read paths reject invalid persisted rows instead of masking them.
//! - Single-record operations act on the first match in insertion order.

use crate::model::department::{check_department_name, Department, DepartmentId};
use crate::model::validation::{ValidationErrors, ValidationResult};
use crate::repo::query::{Assignments, Predicates, Scope};
use crate::repo::{ensure_schema_ready, RepoError, RepoResult};
use rusqlite::{params, params_from_iter, Connection, Row};
use uuid::Uuid;

const TABLE: &str = "departments";
const REQUIRED_COLUMNS: &[&str] = &["id", "name", "created_at", "updated_at"];
const DEPARTMENT_SELECT_SQL: &str = "SELECT id, name FROM departments";

/// Equality filter; unset fields match anything.
///
/// Values are trimmed before matching, the same way writes store them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DepartmentFilter {
    pub id: Option<DepartmentId>,
    pub name: Option<String>,
}

impl DepartmentFilter {
    /// Matches every department.
    pub fn all() -> Self {
        Self::default()
    }

    pub fn by_id(id: DepartmentId) -> Self {
        Self {
            id: Some(id),
            ..Self::default()
        }
    }

    pub fn by_name(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    fn predicates(&self) -> Predicates {
        Predicates::default()
            .equals("id", self.id.map(|id| id.to_string()))
            .equals("name", self.name.as_deref().map(|v| v.trim().to_string()))
    }
}

/// `$set` patch; unset fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DepartmentUpdate {
    pub name: Option<String>,
}

impl DepartmentUpdate {
    pub fn set_name(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
        }
    }

    /// Applies department field rules to every field present in the patch.
    pub fn validate(&self) -> ValidationResult {
        let mut errors = ValidationErrors::new();
        if let Some(name) = &self.name {
            check_department_name(name, &mut errors);
        }
        errors.into_result()
    }

    fn assignments(&self) -> Assignments {
        Assignments::default().set("name", self.name.as_deref().map(|v| v.trim().to_string()))
    }
}

/// Repository interface for department CRUD operations.
pub trait DepartmentRepository {
    fn insert_department(&self, department: &Department) -> RepoResult<DepartmentId>;
    /// Replaces the stored record with the same id.
    fn save_department(&self, department: &Department) -> RepoResult<()>;
    fn get_department(&self, id: DepartmentId) -> RepoResult<Option<Department>>;
    fn find_departments(&self, filter: &DepartmentFilter) -> RepoResult<Vec<Department>>;
    fn find_department(&self, filter: &DepartmentFilter) -> RepoResult<Option<Department>>;
    fn count_departments(&self, filter: &DepartmentFilter) -> RepoResult<u64>;
    /// Updates the first match; returns the number of rows changed (0 or 1).
    fn update_department(
        &self,
        filter: &DepartmentFilter,
        update: &DepartmentUpdate,
    ) -> RepoResult<usize>;
    fn update_departments(
        &self,
        filter: &DepartmentFilter,
        update: &DepartmentUpdate,
    ) -> RepoResult<usize>;
    /// Deletes the first match; returns the number of rows removed (0 or 1).
    fn delete_department(&self, filter: &DepartmentFilter) -> RepoResult<usize>;
    fn delete_department_by_id(&self, id: DepartmentId) -> RepoResult<()>;
    fn delete_departments(&self, filter: &DepartmentFilter) -> RepoResult<usize>;
}

/// SQLite-backed department repository.
pub struct SqliteDepartmentRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteDepartmentRepository<'conn> {
    /// Wraps a connection after checking its schema is ready.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_schema_ready(conn, TABLE, REQUIRED_COLUMNS)?;
        Ok(Self { conn })
    }

    fn query(&self, filter: &DepartmentFilter, scope: Scope) -> RepoResult<Vec<Department>> {
        let predicates = filter.predicates();
        let sql = predicates.select_sql(DEPARTMENT_SELECT_SQL, scope);
        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(predicates.into_values()))?;
        let mut departments = Vec::new();

        while let Some(row) = rows.next()? {
            departments.push(parse_department_row(row)?);
        }

        Ok(departments)
    }

    fn update(
        &self,
        filter: &DepartmentFilter,
        update: &DepartmentUpdate,
        scope: Scope,
    ) -> RepoResult<usize> {
        update.validate()?;

        let assignments = update.assignments();
        if assignments.is_empty() {
            return Ok(0);
        }

        let (sql, values) = assignments.update_statement(TABLE, filter.predicates(), scope);
        Ok(self.conn.execute(&sql, params_from_iter(values))?)
    }

    fn delete(&self, filter: &DepartmentFilter, scope: Scope) -> RepoResult<usize> {
        let predicates = filter.predicates();
        let sql = predicates.delete_sql(TABLE, scope);
        Ok(self
            .conn
            .execute(&sql, params_from_iter(predicates.into_values()))?)
    }
}

impl DepartmentRepository for SqliteDepartmentRepository<'_> {
    fn insert_department(&self, department: &Department) -> RepoResult<DepartmentId> {
        department.validate()?;

        self.conn.execute(
            "INSERT INTO departments (id, name) VALUES (?1, ?2);",
            params![department.id.to_string(), department.name.trim()],
        )?;

        Ok(department.id)
    }

    fn save_department(&self, department: &Department) -> RepoResult<()> {
        department.validate()?;

        let changed = self.conn.execute(
            "UPDATE departments
             SET
                name = ?1,
                updated_at = (strftime('%s', 'now') * 1000)
             WHERE id = ?2;",
            params![department.name.trim(), department.id.to_string()],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound {
                entity: "department",
                id: department.id,
            });
        }

        Ok(())
    }

    fn get_department(&self, id: DepartmentId) -> RepoResult<Option<Department>> {
        self.find_department(&DepartmentFilter::by_id(id))
    }

    fn find_departments(&self, filter: &DepartmentFilter) -> RepoResult<Vec<Department>> {
        self.query(filter, Scope::All)
    }

    fn find_department(&self, filter: &DepartmentFilter) -> RepoResult<Option<Department>> {
        Ok(self.query(filter, Scope::One)?.into_iter().next())
    }

    fn count_departments(&self, filter: &DepartmentFilter) -> RepoResult<u64> {
        let predicates = filter.predicates();
        let sql = predicates.count_sql(TABLE);
        let count: i64 = self.conn.query_row(
            &sql,
            params_from_iter(predicates.into_values()),
            |row| row.get(0),
        )?;
        u64::try_from(count)
            .map_err(|_| RepoError::InvalidData(format!("negative department count `{count}`")))
    }

    fn update_department(
        &self,
        filter: &DepartmentFilter,
        update: &DepartmentUpdate,
    ) -> RepoResult<usize> {
        self.update(filter, update, Scope::One)
    }

    fn update_departments(
        &self,
        filter: &DepartmentFilter,
        update: &DepartmentUpdate,
    ) -> RepoResult<usize> {
        self.update(filter, update, Scope::All)
    }

    fn delete_department(&self, filter: &DepartmentFilter) -> RepoResult<usize> {
        self.delete(filter, Scope::One)
    }

    fn delete_department_by_id(&self, id: DepartmentId) -> RepoResult<()> {
        if self.delete(&DepartmentFilter::by_id(id), Scope::All)? == 0 {
            return Err(RepoError::NotFound {
                entity: "department",
                id,
            });
        }
        Ok(())
    }

    fn delete_departments(&self, filter: &DepartmentFilter) -> RepoResult<usize> {
        self.delete(filter, Scope::All)
    }
}

fn parse_department_row(row: &Row<'_>) -> RepoResult<Department> {
    let id_text: String = row.get("id")?;
    let id = Uuid::parse_str(&id_text).map_err(|_| {
        RepoError::InvalidData(format!("invalid uuid value `{id_text}` in departments.id"))
    })?;

    let department = Department {
        id,
        name: row.get("name")?,
    };
    department.validate().map_err(|err| {
        RepoError::InvalidData(format!("department `{id_text}` failed validation: {err}"))
    })?;
    Ok(department)
}
