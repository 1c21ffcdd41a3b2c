//! Department domain model.
//!
//! # Responsibility
//! - Define the persisted department record `{ _id, name }`.
//! - Validate department candidates before they reach storage.
//!
//! # Invariants
//! - `id` is never nil.
//! - `name` is stored trimmed and its character count is within
//!   `DEPARTMENT_NAME_LENGTH` (inclusive).

use crate::model::validation::{
    as_document, check_text, optional_id, required_text, FieldError, LengthBounds,
    ValidationErrors, ValidationResult,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

/// Store-assigned department identifier.
pub type DepartmentId = Uuid;

/// Inclusive bounds for the trimmed department name.
pub const DEPARTMENT_NAME_LENGTH: LengthBounds = LengthBounds { min: 4, max: 20 };

pub const FIELD_ID: &str = "_id";
pub const FIELD_NAME: &str = "name";

/// Named organizational unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Department {
    #[serde(rename = "_id")]
    pub id: DepartmentId,
    pub name: String,
}

impl Department {
    /// Creates a department with a generated identifier.
    pub fn new(name: impl Into<String>) -> Result<Self, ValidationErrors> {
        Self::with_id(Uuid::new_v4(), name)
    }

    /// Creates a department with a caller-provided identifier.
    ///
    /// Used when identity already exists externally (fixtures, imports).
    pub fn with_id(id: DepartmentId, name: impl Into<String>) -> Result<Self, ValidationErrors> {
        let name: String = name.into();
        let department = Self {
            id,
            name: name.trim().to_string(),
        };
        department.validate()?;
        Ok(department)
    }

    /// Builds a department from an untyped document candidate.
    ///
    /// An optional `_id` string is honoured; otherwise an id is generated.
    pub fn from_document(candidate: &Value) -> Result<Self, ValidationErrors> {
        let document = as_document(candidate);
        let mut errors = ValidationErrors::new();
        let id = optional_id(document, FIELD_ID, &mut errors);
        let name = required_text(document, FIELD_NAME, &mut errors);
        if let Some(name) = name.as_deref() {
            check_department_name(name, &mut errors);
        }
        errors.into_result()?;

        let name = name.map(|value| value.trim().to_string()).unwrap_or_default();
        Ok(Self {
            id: id.unwrap_or_else(Uuid::new_v4),
            name,
        })
    }

    /// Re-checks every field of a typed department.
    pub fn validate(&self) -> ValidationResult {
        let mut errors = ValidationErrors::new();
        if self.id.is_nil() {
            errors.insert(FIELD_ID, FieldError::RequiredFieldMissing);
        }
        check_department_name(&self.name, &mut errors);
        errors.into_result()
    }
}

/// Validates an untyped department candidate without building a record.
pub fn validate_department(candidate: &Value) -> ValidationResult {
    Department::from_document(candidate).map(|_| ())
}

pub(crate) fn check_department_name(name: &str, errors: &mut ValidationErrors) {
    check_text(FIELD_NAME, name, Some(DEPARTMENT_NAME_LENGTH), errors);
}
