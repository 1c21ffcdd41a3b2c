//! Employee use-case service.
//!
//! # Responsibility
//! - Provide stable employee CRUD entry points.
//! - Populate `department` by fetching the employee first and then looking
//!   the reference up in the department repository.
//!
//! # Invariants
//! - An id reference that does not resolve is `RepoError::NotFound`.
//! - A label reference populates to `None`; it is not an error.

use crate::model::department::Department;
use crate::model::employee::{DepartmentRef, Employee, EmployeeId, PopulatedEmployee};
use crate::model::validation::ValidationErrors;
use crate::repo::department_repo::DepartmentRepository;
use crate::repo::employee_repo::{EmployeeFilter, EmployeeRepository, EmployeeUpdate};
use crate::repo::{RepoError, RepoResult};
use crate::service::log_failure;
use log::debug;
use serde_json::Value;

/// Use-case service for employees and their department references.
pub struct EmployeeService<E: EmployeeRepository, D: DepartmentRepository> {
    employees: E,
    departments: D,
}

impl<E: EmployeeRepository, D: DepartmentRepository> EmployeeService<E, D> {
    pub fn new(employees: E, departments: D) -> Self {
        Self {
            employees,
            departments,
        }
    }

    /// Creates an employee from its three required fields.
    pub fn create_employee(
        &self,
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        department: impl Into<DepartmentRef>,
    ) -> RepoResult<Employee> {
        self.store(Employee::new(first_name, last_name, department))
            .inspect_err(|err| log_failure("employee_create", err))
    }

    /// Validates and stores an untyped document candidate.
    pub fn create_from_document(&self, candidate: &Value) -> RepoResult<Employee> {
        self.store(Employee::from_document(candidate))
            .inspect_err(|err| log_failure("employee_create", err))
    }

    pub fn insert(&self, employee: &Employee) -> RepoResult<EmployeeId> {
        self.employees
            .insert_employee(employee)
            .inspect_err(|err| log_failure("employee_insert", err))
    }

    pub fn save(&self, employee: &Employee) -> RepoResult<()> {
        self.employees
            .save_employee(employee)
            .inspect_err(|err| log_failure("employee_save", err))
    }

    pub fn get(&self, id: EmployeeId) -> RepoResult<Option<Employee>> {
        self.employees
            .get_employee(id)
            .inspect_err(|err| log_failure("employee_get", err))
    }

    pub fn find(&self, filter: &EmployeeFilter) -> RepoResult<Vec<Employee>> {
        self.employees
            .find_employees(filter)
            .inspect_err(|err| log_failure("employee_find", err))
    }

    pub fn find_one(&self, filter: &EmployeeFilter) -> RepoResult<Option<Employee>> {
        self.employees
            .find_employee(filter)
            .inspect_err(|err| log_failure("employee_find_one", err))
    }

    pub fn count(&self, filter: &EmployeeFilter) -> RepoResult<u64> {
        self.employees
            .count_employees(filter)
            .inspect_err(|err| log_failure("employee_count", err))
    }

    pub fn update_one(
        &self,
        filter: &EmployeeFilter,
        update: &EmployeeUpdate,
    ) -> RepoResult<usize> {
        self.employees
            .update_employee(filter, update)
            .inspect_err(|err| log_failure("employee_update_one", err))
    }

    pub fn update_many(
        &self,
        filter: &EmployeeFilter,
        update: &EmployeeUpdate,
    ) -> RepoResult<usize> {
        self.employees
            .update_employees(filter, update)
            .inspect_err(|err| log_failure("employee_update_many", err))
    }

    pub fn delete_one(&self, filter: &EmployeeFilter) -> RepoResult<usize> {
        self.employees
            .delete_employee(filter)
            .inspect_err(|err| log_failure("employee_delete_one", err))
    }

    /// Removes a previously loaded employee by its id.
    pub fn remove(&self, employee: &Employee) -> RepoResult<()> {
        self.employees
            .delete_employee_by_id(employee.id)
            .inspect_err(|err| log_failure("employee_remove", err))
    }

    pub fn delete_many(&self, filter: &EmployeeFilter) -> RepoResult<usize> {
        self.employees
            .delete_employees(filter)
            .inspect_err(|err| log_failure("employee_delete_many", err))
    }

    /// Resolves the department reference of an already loaded employee.
    pub fn populate(&self, employee: Employee) -> RepoResult<PopulatedEmployee> {
        let department = self
            .resolve_department(&employee.department)
            .inspect_err(|err| log_failure("employee_populate", err))?;
        debug!(
            "event=employee_populate module=service status=ok resolved={}",
            department.is_some()
        );
        Ok(PopulatedEmployee::new(employee, department))
    }

    /// `find_one` followed by `populate`.
    pub fn find_one_populated(
        &self,
        filter: &EmployeeFilter,
    ) -> RepoResult<Option<PopulatedEmployee>> {
        self.find_one(filter)?
            .map(|employee| self.populate(employee))
            .transpose()
    }

    /// `find` followed by `populate` for every match.
    pub fn find_populated(&self, filter: &EmployeeFilter) -> RepoResult<Vec<PopulatedEmployee>> {
        self.find(filter)?
            .into_iter()
            .map(|employee| self.populate(employee))
            .collect()
    }

    fn store(&self, candidate: Result<Employee, ValidationErrors>) -> RepoResult<Employee> {
        let employee = candidate?;
        self.employees.insert_employee(&employee)?;
        Ok(employee)
    }

    fn resolve_department(&self, reference: &DepartmentRef) -> RepoResult<Option<Department>> {
        let Some(id) = reference.as_id() else {
            return Ok(None);
        };

        match self.departments.get_department(id)? {
            Some(department) => Ok(Some(department)),
            None => Err(RepoError::NotFound {
                entity: "department",
                id,
            }),
        }
    }
}
