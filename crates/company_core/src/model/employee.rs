//! Employee domain model.
//!
//! # Responsibility
//! - Define the persisted employee record `{ _id, firstName, lastName, department }`.
//! - Model the weak department reference and its populated projection.
//!
//! # Invariants
//! - `firstName`, `lastName` and `department` are required, non-blank text.
//! - All three fields are validated independently and reported together.
//! - An employee never owns its department; the reference is resolved on demand.

use crate::model::department::{Department, DepartmentId};
use crate::model::validation::{
    as_document, check_text, optional_id, required_text, FieldError, ValidationErrors,
    ValidationResult,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::borrow::Cow;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Store-assigned employee identifier.
pub type EmployeeId = Uuid;

pub const FIELD_ID: &str = "_id";
pub const FIELD_FIRST_NAME: &str = "firstName";
pub const FIELD_LAST_NAME: &str = "lastName";
pub const FIELD_DEPARTMENT: &str = "department";

/// Value of `Employee::department`: a department id or a free-form label.
///
/// Persisted as text. Text that parses as a UUID is read back as `Id`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum DepartmentRef {
    Id(DepartmentId),
    Label(String),
}

impl DepartmentRef {
    pub fn parse(value: &str) -> Self {
        let trimmed = value.trim();
        match Uuid::parse_str(trimmed) {
            Ok(id) if !id.is_nil() => Self::Id(id),
            _ => Self::Label(trimmed.to_string()),
        }
    }

    /// Returns the referenced id when this is a resolvable reference.
    pub fn as_id(&self) -> Option<DepartmentId> {
        match self {
            Self::Id(id) => Some(*id),
            Self::Label(_) => None,
        }
    }

    /// Text written to storage and used in equality filters.
    pub(crate) fn stored_text(&self) -> String {
        match self {
            Self::Id(id) => id.to_string(),
            Self::Label(label) => label.trim().to_string(),
        }
    }
}

impl Display for DepartmentRef {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Id(id) => write!(f, "{id}"),
            Self::Label(label) => f.write_str(label),
        }
    }
}

impl From<String> for DepartmentRef {
    fn from(value: String) -> Self {
        Self::parse(&value)
    }
}

impl From<&str> for DepartmentRef {
    fn from(value: &str) -> Self {
        Self::parse(value)
    }
}

impl From<DepartmentId> for DepartmentRef {
    fn from(value: DepartmentId) -> Self {
        Self::Id(value)
    }
}

impl From<&Department> for DepartmentRef {
    fn from(value: &Department) -> Self {
        Self::Id(value.id)
    }
}

impl From<DepartmentRef> for String {
    fn from(value: DepartmentRef) -> Self {
        value.to_string()
    }
}

/// Person record belonging to a department.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Employee {
    #[serde(rename = "_id")]
    pub id: EmployeeId,
    #[serde(rename = "firstName")]
    pub first_name: String,
    #[serde(rename = "lastName")]
    pub last_name: String,
    pub department: DepartmentRef,
}

impl Employee {
    /// Creates an employee with a generated identifier.
    pub fn new(
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        department: impl Into<DepartmentRef>,
    ) -> Result<Self, ValidationErrors> {
        Self::with_id(Uuid::new_v4(), first_name, last_name, department)
    }

    pub fn with_id(
        id: EmployeeId,
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        department: impl Into<DepartmentRef>,
    ) -> Result<Self, ValidationErrors> {
        let first_name: String = first_name.into();
        let last_name: String = last_name.into();
        let employee = Self {
            id,
            first_name: first_name.trim().to_string(),
            last_name: last_name.trim().to_string(),
            department: normalize_ref(department.into()),
        };
        employee.validate()?;
        Ok(employee)
    }

    /// Builds an employee from an untyped document candidate.
    pub fn from_document(candidate: &Value) -> Result<Self, ValidationErrors> {
        let document = as_document(candidate);
        let mut errors = ValidationErrors::new();
        let id = optional_id(document, FIELD_ID, &mut errors);
        let first_name = required_text(document, FIELD_FIRST_NAME, &mut errors);
        let last_name = required_text(document, FIELD_LAST_NAME, &mut errors);
        let department = required_text(document, FIELD_DEPARTMENT, &mut errors);
        errors.into_result()?;

        Ok(Self {
            id: id.unwrap_or_else(Uuid::new_v4),
            first_name: trimmed(first_name),
            last_name: trimmed(last_name),
            department: DepartmentRef::parse(&trimmed(department)),
        })
    }

    /// Re-checks every field of a typed employee.
    pub fn validate(&self) -> ValidationResult {
        let mut errors = ValidationErrors::new();
        if self.id.is_nil() {
            errors.insert(FIELD_ID, FieldError::RequiredFieldMissing);
        }
        check_employee_fields(
            Some(self.first_name.as_str()),
            Some(self.last_name.as_str()),
            Some(&self.department),
            &mut errors,
        );
        errors.into_result()
    }
}

/// Validates an untyped employee candidate without building a record.
pub fn validate_employee(candidate: &Value) -> ValidationResult {
    Employee::from_document(candidate).map(|_| ())
}

/// Checks whichever employee fields are present; `None` skips a field.
pub(crate) fn check_employee_fields(
    first_name: Option<&str>,
    last_name: Option<&str>,
    department: Option<&DepartmentRef>,
    errors: &mut ValidationErrors,
) {
    if let Some(value) = first_name {
        check_text(FIELD_FIRST_NAME, value, None, errors);
    }
    if let Some(value) = last_name {
        check_text(FIELD_LAST_NAME, value, None, errors);
    }
    match department {
        Some(DepartmentRef::Label(label)) => check_text(FIELD_DEPARTMENT, label, None, errors),
        Some(DepartmentRef::Id(id)) if id.is_nil() => {
            errors.insert(FIELD_DEPARTMENT, FieldError::RequiredFieldMissing);
        }
        _ => {}
    }
}

fn trimmed(value: Option<Cow<'_, str>>) -> String {
    value.map(|text| text.trim().to_string()).unwrap_or_default()
}

fn normalize_ref(value: DepartmentRef) -> DepartmentRef {
    match value {
        DepartmentRef::Label(label) => DepartmentRef::parse(&label),
        id => id,
    }
}

/// Employee with its department reference resolved.
///
/// `department` is `None` when the stored reference is a plain label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PopulatedEmployee {
    #[serde(rename = "_id")]
    pub id: EmployeeId,
    #[serde(rename = "firstName")]
    pub first_name: String,
    #[serde(rename = "lastName")]
    pub last_name: String,
    pub department: Option<Department>,
    /// Reference as stored, kept for label references that do not resolve.
    #[serde(skip)]
    pub department_ref: DepartmentRef,
}

impl PopulatedEmployee {
    pub fn new(employee: Employee, department: Option<Department>) -> Self {
        Self {
            id: employee.id,
            first_name: employee.first_name,
            last_name: employee.last_name,
            department,
            department_ref: employee.department,
        }
    }
}
