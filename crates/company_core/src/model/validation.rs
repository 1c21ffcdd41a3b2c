//! Field-level validation shared by directory entities.
//!
//! # Responsibility
//! - Define the structured validation result (field name -> error kind).
//! - Provide reusable checks for untyped document candidates and typed values.
//!
//! # Invariants
//! - Every field is checked independently; one failing field never hides
//!   another field's error.
//! - Type is checked before length; a wrong-typed value gets no length error.

use serde_json::{Map, Value};
use std::borrow::Cow;
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type ValidationResult = Result<(), ValidationErrors>;

/// Why a single field was rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldError {
    /// Field is absent, `null`, or blank.
    RequiredFieldMissing,
    /// Field holds a value that cannot be read as `expected`.
    TypeMismatch {
        expected: &'static str,
        found: &'static str,
    },
    /// Trimmed character count falls outside `min..=max`.
    LengthOutOfRange {
        min: usize,
        max: usize,
        actual: usize,
    },
}

impl Display for FieldError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::RequiredFieldMissing => f.write_str("required field missing"),
            Self::TypeMismatch { expected, found } => {
                write!(f, "expected {expected}, found {found}")
            }
            Self::LengthOutOfRange { min, max, actual } => write!(
                f,
                "length {actual} is outside the allowed range {min}..={max}"
            ),
        }
    }
}

/// Per-field validation failures for one candidate record.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    fields: BTreeMap<&'static str, FieldError>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns the error recorded for `field`, keyed by its wire name.
    pub fn get(&self, field: &str) -> Option<&FieldError> {
        self.fields.get(field)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &FieldError)> + '_ {
        self.fields.iter().map(|(field, error)| (*field, error))
    }

    /// Records an error for `field`; the first error recorded for a field wins.
    pub fn insert(&mut self, field: &'static str, error: FieldError) {
        self.fields.entry(field).or_insert(error);
    }

    /// Converts accumulated errors into a `ValidationResult`.
    pub fn into_result(self) -> ValidationResult {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl Display for ValidationErrors {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str("validation failed")?;
        let mut separator = ": ";
        for (field, error) in &self.fields {
            write!(f, "{separator}{field} ({error})")?;
            separator = ", ";
        }
        Ok(())
    }
}

impl Error for ValidationErrors {}

/// Inclusive character-count bounds for a text field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LengthBounds {
    pub min: usize,
    pub max: usize,
}

/// Views a candidate as a document; non-object candidates have no fields.
pub(crate) fn as_document(candidate: &Value) -> Option<&Map<String, Value>> {
    candidate.as_object()
}

/// Reads a required string-compatible field from an untyped candidate.
///
/// Numbers and booleans are cast to text. `null` counts as missing.
pub(crate) fn required_text<'a>(
    document: Option<&'a Map<String, Value>>,
    field: &'static str,
    errors: &mut ValidationErrors,
) -> Option<Cow<'a, str>> {
    let text = match document.and_then(|fields| fields.get(field)) {
        None | Some(Value::Null) => None,
        Some(Value::String(value)) => Some(Cow::Borrowed(value.as_str())),
        Some(Value::Number(value)) => Some(Cow::Owned(value.to_string())),
        Some(Value::Bool(value)) => Some(Cow::Owned(value.to_string())),
        Some(other) => {
            errors.insert(
                field,
                FieldError::TypeMismatch {
                    expected: "string",
                    found: json_type_name(other),
                },
            );
            return None;
        }
    };

    match text {
        Some(value) if !value.trim().is_empty() => Some(value),
        _ => {
            errors.insert(field, FieldError::RequiredFieldMissing);
            None
        }
    }
}

/// Checks a typed text value: required, then optional length bounds.
pub(crate) fn check_text(
    field: &'static str,
    value: &str,
    bounds: Option<LengthBounds>,
    errors: &mut ValidationErrors,
) {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        errors.insert(field, FieldError::RequiredFieldMissing);
        return;
    }

    if let Some(LengthBounds { min, max }) = bounds {
        let actual = trimmed.chars().count();
        if actual < min || actual > max {
            errors.insert(field, FieldError::LengthOutOfRange { min, max, actual });
        }
    }
}

/// Reads an optional `_id` field holding a UUID string.
///
/// Returns `Ok(None)` when absent; a nil UUID counts as absent.
pub(crate) fn optional_id(
    document: Option<&Map<String, Value>>,
    field: &'static str,
    errors: &mut ValidationErrors,
) -> Option<uuid::Uuid> {
    match document.and_then(|fields| fields.get(field)) {
        None | Some(Value::Null) => None,
        Some(Value::String(text)) => match uuid::Uuid::parse_str(text.trim()) {
            Ok(id) if !id.is_nil() => Some(id),
            Ok(_) => None,
            Err(_) => {
                errors.insert(
                    field,
                    FieldError::TypeMismatch {
                        expected: "uuid",
                        found: "string",
                    },
                );
                None
            }
        },
        Some(other) => {
            errors.insert(
                field,
                FieldError::TypeMismatch {
                    expected: "uuid",
                    found: json_type_name(other),
                },
            );
            None
        }
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::{check_text, required_text, FieldError, LengthBounds, ValidationErrors};
    use serde_json::json;

    #[test]
    fn required_text_casts_scalars_and_rejects_collections() {
        let candidate = json!({ "a": 42, "b": true, "c": [], "d": {}, "e": null, "f": "  " });
        let document = candidate.as_object();
        let mut errors = ValidationErrors::new();

        assert_eq!(required_text(document, "a", &mut errors).as_deref(), Some("42"));
        assert_eq!(required_text(document, "b", &mut errors).as_deref(), Some("true"));
        assert!(required_text(document, "c", &mut errors).is_none());
        assert!(required_text(document, "d", &mut errors).is_none());
        assert!(required_text(document, "e", &mut errors).is_none());
        assert!(required_text(document, "f", &mut errors).is_none());
        assert!(required_text(document, "missing", &mut errors).is_none());

        assert_eq!(
            errors.get("c"),
            Some(&FieldError::TypeMismatch {
                expected: "string",
                found: "array"
            })
        );
        assert_eq!(
            errors.get("d"),
            Some(&FieldError::TypeMismatch {
                expected: "string",
                found: "object"
            })
        );
        assert_eq!(errors.get("e"), Some(&FieldError::RequiredFieldMissing));
        assert_eq!(errors.get("f"), Some(&FieldError::RequiredFieldMissing));
        assert_eq!(errors.get("missing"), Some(&FieldError::RequiredFieldMissing));
        assert_eq!(errors.len(), 5);
    }

    #[test]
    fn check_text_counts_trimmed_characters() {
        let bounds = Some(LengthBounds { min: 4, max: 5 });
        let mut errors = ValidationErrors::new();

        check_text("ok", "  ąbcd  ", bounds, &mut errors);
        check_text("short", " abc ", bounds, &mut errors);

        assert!(!errors.contains("ok"));
        assert_eq!(
            errors.get("short"),
            Some(&FieldError::LengthOutOfRange {
                min: 4,
                max: 5,
                actual: 3
            })
        );
    }

    #[test]
    fn display_lists_every_failing_field() {
        let mut errors = ValidationErrors::new();
        errors.insert("lastName", FieldError::RequiredFieldMissing);
        errors.insert("firstName", FieldError::RequiredFieldMissing);

        assert_eq!(
            errors.to_string(),
            "validation failed: firstName (required field missing), lastName (required field missing)"
        );
        assert!(errors.into_result().is_err());
        assert!(ValidationErrors::new().into_result().is_ok());
    }
}
