//! Department use-case service.
//!
//! # Responsibility
//! - Provide stable department CRUD entry points, including creation from
//!   untyped document candidates.
//!
//! # Invariants
//! - Every error is logged once and returned unchanged.

use crate::model::department::{Department, DepartmentId};
use crate::model::validation::ValidationErrors;
use crate::repo::department_repo::{DepartmentFilter, DepartmentRepository, DepartmentUpdate};
use crate::repo::RepoResult;
use crate::service::log_failure;
use serde_json::Value;

/// Use-case service wrapper for department operations.
pub struct DepartmentService<R: DepartmentRepository> {
    repo: R,
}

impl<R: DepartmentRepository> DepartmentService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Creates a department from a display name.
    pub fn create_department(&self, name: impl Into<String>) -> RepoResult<Department> {
        self.store(Department::new(name))
            .inspect_err(|err| log_failure("department_create", err))
    }

    /// Validates and stores an untyped document candidate.
    pub fn create_from_document(&self, candidate: &Value) -> RepoResult<Department> {
        self.store(Department::from_document(candidate))
            .inspect_err(|err| log_failure("department_create", err))
    }

    pub fn insert(&self, department: &Department) -> RepoResult<DepartmentId> {
        self.repo
            .insert_department(department)
            .inspect_err(|err| log_failure("department_insert", err))
    }

    pub fn save(&self, department: &Department) -> RepoResult<()> {
        self.repo
            .save_department(department)
            .inspect_err(|err| log_failure("department_save", err))
    }

    pub fn get(&self, id: DepartmentId) -> RepoResult<Option<Department>> {
        self.repo
            .get_department(id)
            .inspect_err(|err| log_failure("department_get", err))
    }

    pub fn find(&self, filter: &DepartmentFilter) -> RepoResult<Vec<Department>> {
        self.repo
            .find_departments(filter)
            .inspect_err(|err| log_failure("department_find", err))
    }

    pub fn find_one(&self, filter: &DepartmentFilter) -> RepoResult<Option<Department>> {
        self.repo
            .find_department(filter)
            .inspect_err(|err| log_failure("department_find_one", err))
    }

    pub fn count(&self, filter: &DepartmentFilter) -> RepoResult<u64> {
        self.repo
            .count_departments(filter)
            .inspect_err(|err| log_failure("department_count", err))
    }

    pub fn update_one(
        &self,
        filter: &DepartmentFilter,
        update: &DepartmentUpdate,
    ) -> RepoResult<usize> {
        self.repo
            .update_department(filter, update)
            .inspect_err(|err| log_failure("department_update_one", err))
    }

    pub fn update_many(
        &self,
        filter: &DepartmentFilter,
        update: &DepartmentUpdate,
    ) -> RepoResult<usize> {
        self.repo
            .update_departments(filter, update)
            .inspect_err(|err| log_failure("department_update_many", err))
    }

    pub fn delete_one(&self, filter: &DepartmentFilter) -> RepoResult<usize> {
        self.repo
            .delete_department(filter)
            .inspect_err(|err| log_failure("department_delete_one", err))
    }

    /// Removes a previously loaded department by its id.
    pub fn remove(&self, department: &Department) -> RepoResult<()> {
        self.repo
            .delete_department_by_id(department.id)
            .inspect_err(|err| log_failure("department_remove", err))
    }

    pub fn delete_many(&self, filter: &DepartmentFilter) -> RepoResult<usize> {
        self.repo
            .delete_departments(filter)
            .inspect_err(|err| log_failure("department_delete_many", err))
    }

    fn store(&self, candidate: Result<Department, ValidationErrors>) -> RepoResult<Department> {
        let department = candidate?;
        self.repo.insert_department(&department)?;
        Ok(department)
    }
}
