//! Employee repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Provide the CRUD surface over the `employees` collection.
//! - Persist the department reference as text without resolving it.
//!
//! # Invariants
//! - Write paths validate the record or patch before any SQL mutation.
//! - Reference resolution is not performed here; see `EmployeeService::populate`.

use crate::model::employee::{check_employee_fields, DepartmentRef, Employee, EmployeeId};
use crate::model::validation::{ValidationErrors, ValidationResult};
use crate::repo::query::{Assignments, Predicates, Scope};
use crate::repo::{ensure_schema_ready, RepoError, RepoResult};
use rusqlite::{params, params_from_iter, Connection, Row};
use uuid::Uuid;

const TABLE: &str = "employees";
const REQUIRED_COLUMNS: &[&str] = &[
    "id",
    "first_name",
    "last_name",
    "department",
    "created_at",
    "updated_at",
];
const EMPLOYEE_SELECT_SQL: &str = "SELECT
    id,
    first_name,
    last_name,
    department
FROM employees";

/// Equality filter; unset fields match anything.
///
/// Values are trimmed before matching, the same way writes store them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EmployeeFilter {
    pub id: Option<EmployeeId>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub department: Option<DepartmentRef>,
}

impl EmployeeFilter {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn by_id(id: EmployeeId) -> Self {
        Self {
            id: Some(id),
            ..Self::default()
        }
    }

    pub fn by_first_name(first_name: impl Into<String>) -> Self {
        Self {
            first_name: Some(first_name.into()),
            ..Self::default()
        }
    }

    /// Exact match on all three name/department fields.
    pub fn by_record(
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        department: impl Into<DepartmentRef>,
    ) -> Self {
        Self {
            id: None,
            first_name: Some(first_name.into()),
            last_name: Some(last_name.into()),
            department: Some(department.into()),
        }
    }

    fn predicates(&self) -> Predicates {
        Predicates::default()
            .equals("id", self.id.map(|id| id.to_string()))
            .equals("first_name", trimmed(&self.first_name))
            .equals("last_name", trimmed(&self.last_name))
            .equals("department", self.department.as_ref().map(DepartmentRef::stored_text))
    }
}

/// `$set` patch; unset fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EmployeeUpdate {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub department: Option<DepartmentRef>,
}

impl EmployeeUpdate {
    pub fn set_first_name(first_name: impl Into<String>) -> Self {
        Self {
            first_name: Some(first_name.into()),
            ..Self::default()
        }
    }

    pub fn validate(&self) -> ValidationResult {
        let mut errors = ValidationErrors::new();
        check_employee_fields(
            self.first_name.as_deref(),
            self.last_name.as_deref(),
            self.department.as_ref(),
            &mut errors,
        );
        errors.into_result()
    }

    fn assignments(&self) -> Assignments {
        Assignments::default()
            .set("first_name", trimmed(&self.first_name))
            .set("last_name", trimmed(&self.last_name))
            .set("department", self.department.as_ref().map(DepartmentRef::stored_text))
    }
}

/// Repository interface for employee CRUD operations.
pub trait EmployeeRepository {
    fn insert_employee(&self, employee: &Employee) -> RepoResult<EmployeeId>;
    /// Replaces the stored record with the same id.
    fn save_employee(&self, employee: &Employee) -> RepoResult<()>;
    fn get_employee(&self, id: EmployeeId) -> RepoResult<Option<Employee>>;
    fn find_employees(&self, filter: &EmployeeFilter) -> RepoResult<Vec<Employee>>;
    fn find_employee(&self, filter: &EmployeeFilter) -> RepoResult<Option<Employee>>;
    fn count_employees(&self, filter: &EmployeeFilter) -> RepoResult<u64>;
    fn update_employee(
        &self,
        filter: &EmployeeFilter,
        update: &EmployeeUpdate,
    ) -> RepoResult<usize>;
    fn update_employees(
        &self,
        filter: &EmployeeFilter,
        update: &EmployeeUpdate,
    ) -> RepoResult<usize>;
    fn delete_employee(&self, filter: &EmployeeFilter) -> RepoResult<usize>;
    fn delete_employee_by_id(&self, id: EmployeeId) -> RepoResult<()>;
    fn delete_employees(&self, filter: &EmployeeFilter) -> RepoResult<usize>;
}

/// SQLite-backed employee repository.
pub struct SqliteEmployeeRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteEmployeeRepository<'conn> {
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_schema_ready(conn, TABLE, REQUIRED_COLUMNS)?;
        Ok(Self { conn })
    }

    fn query(&self, filter: &EmployeeFilter, scope: Scope) -> RepoResult<Vec<Employee>> {
        let predicates = filter.predicates();
        let sql = predicates.select_sql(EMPLOYEE_SELECT_SQL, scope);
        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(predicates.into_values()))?;
        let mut employees = Vec::new();

        while let Some(row) = rows.next()? {
            employees.push(parse_employee_row(row)?);
        }

        Ok(employees)
    }

    fn update(
        &self,
        filter: &EmployeeFilter,
        update: &EmployeeUpdate,
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

    fn delete(&self, filter: &EmployeeFilter, scope: Scope) -> RepoResult<usize> {
        let predicates = filter.predicates();
        let sql = predicates.delete_sql(TABLE, scope);
        Ok(self
            .conn
            .execute(&sql, params_from_iter(predicates.into_values()))?)
    }
}

impl EmployeeRepository for SqliteEmployeeRepository<'_> {
    fn insert_employee(&self, employee: &Employee) -> RepoResult<EmployeeId> {
        employee.validate()?;

        self.conn.execute(
            "INSERT INTO employees (
                id,
                first_name,
                last_name,
                department
            ) VALUES (?1, ?2, ?3, ?4);",
            params![
                employee.id.to_string(),
                employee.first_name.trim(),
                employee.last_name.trim(),
                employee.department.stored_text(),
            ],
        )?;

        Ok(employee.id)
    }

    fn save_employee(&self, employee: &Employee) -> RepoResult<()> {
        employee.validate()?;

        let changed = self.conn.execute(
            "UPDATE employees
             SET
                first_name = ?1,
                last_name = ?2,
                department = ?3,
                updated_at = (strftime('%s', 'now') * 1000)
             WHERE id = ?4;",
            params![
                employee.first_name.trim(),
                employee.last_name.trim(),
                employee.department.stored_text(),
                employee.id.to_string(),
            ],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound {
                entity: "employee",
                id: employee.id,
            });
        }

        Ok(())
    }

    fn get_employee(&self, id: EmployeeId) -> RepoResult<Option<Employee>> {
        self.find_employee(&EmployeeFilter::by_id(id))
    }

    fn find_employees(&self, filter: &EmployeeFilter) -> RepoResult<Vec<Employee>> {
        self.query(filter, Scope::All)
    }

    fn find_employee(&self, filter: &EmployeeFilter) -> RepoResult<Option<Employee>> {
        Ok(self.query(filter, Scope::One)?.into_iter().next())
    }

    fn count_employees(&self, filter: &EmployeeFilter) -> RepoResult<u64> {
        let predicates = filter.predicates();
        let sql = predicates.count_sql(TABLE);
        let count: i64 = self.conn.query_row(
            &sql,
            params_from_iter(predicates.into_values()),
            |row| row.get(0),
        )?;
        u64::try_from(count)
            .map_err(|_| RepoError::InvalidData(format!("negative employee count `{count}`")))
    }

    fn update_employee(
        &self,
        filter: &EmployeeFilter,
        update: &EmployeeUpdate,
    ) -> RepoResult<usize> {
        self.update(filter, update, Scope::One)
    }

    fn update_employees(
        &self,
        filter: &EmployeeFilter,
        update: &EmployeeUpdate,
    ) -> RepoResult<usize> {
        self.update(filter, update, Scope::All)
    }

    fn delete_employee(&self, filter: &EmployeeFilter) -> RepoResult<usize> {
        self.delete(filter, Scope::One)
    }

    fn delete_employee_by_id(&self, id: EmployeeId) -> RepoResult<()> {
        if self.delete(&EmployeeFilter::by_id(id), Scope::All)? == 0 {
            return Err(RepoError::NotFound {
                entity: "employee",
                id,
            });
        }
        Ok(())
    }

    fn delete_employees(&self, filter: &EmployeeFilter) -> RepoResult<usize> {
        self.delete(filter, Scope::All)
    }
}

fn trimmed(value: &Option<String>) -> Option<String> {
    value.as_deref().map(|v| v.trim().to_string())
}

fn parse_employee_row(row: &Row<'_>) -> RepoResult<Employee> {
    let id_text: String = row.get("id")?;
    let id = Uuid::parse_str(&id_text).map_err(|_| {
        RepoError::InvalidData(format!("invalid uuid value `{id_text}` in employees.id"))
    })?;

    let department: String = row.get("department")?;
    let employee = Employee {
        id,
        first_name: row.get("first_name")?,
        last_name: row.get("last_name")?,
        department: DepartmentRef::parse(&department),
    };
    employee.validate().map_err(|err| {
        RepoError::InvalidData(format!("employee `{id_text}` failed validation: {err}"))
    })?;
    Ok(employee)
}
