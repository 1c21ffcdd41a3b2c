//! Data-access core for the company directory.
//! Departments and employees are validated here before they reach storage.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use config::{DbConfig, DbTarget, Environment};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::department::{validate_department, Department, DepartmentId};
pub use model::employee::{
    validate_employee, DepartmentRef, Employee, EmployeeId, PopulatedEmployee,
};
pub use model::validation::{FieldError, ValidationErrors, ValidationResult};
pub use repo::department_repo::{
    DepartmentFilter, DepartmentRepository, DepartmentUpdate, SqliteDepartmentRepository,
};
pub use repo::employee_repo::{
    EmployeeFilter, EmployeeRepository, EmployeeUpdate, SqliteEmployeeRepository,
};
pub use repo::{RepoError, RepoResult};
pub use service::department_service::DepartmentService;
pub use service::employee_service::EmployeeService;

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
