//! Request-body validation for the two form kinds.
//!
//! Every problem in a body is collected before failing, so one response lists all missing or
//! malformed fields.

use std::fmt;

use serde::Serialize;
use serde_json::Value;

use super::domain::{ContactSubmissionInput, LeadMagnetSubmissionInput};
use super::schema::{FieldValues, SchemaRecord, TableSpec};

/// One problem found in a request body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationIssue {
    pub path: String,
    pub message: String,
}

/// Rejected request body. `Display` renders every issue as one readable sentence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    issues: Vec<ValidationIssue>,
}

impl ValidationError {
    pub fn issues(&self) -> &[ValidationIssue] {
        &self.issues
    }

    pub fn message(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Validation error: ")?;
        for (index, issue) in self.issues.iter().enumerate() {
            if index > 0 {
                write!(f, "; ")?;
            }
            if issue.path.is_empty() {
                write!(f, "{}", issue.message)?;
            } else {
                write!(f, "{} at \"{}\"", issue.message, issue.path)?;
            }
        }
        Ok(())
    }
}

impl std::error::Error for ValidationError {}

pub fn validate_contact_submission(
    input: &Value,
) -> Result<ContactSubmissionInput, ValidationError> {
    validate_record(input)
}

pub fn validate_lead_magnet_submission(
    input: &Value,
) -> Result<LeadMagnetSubmissionInput, ValidationError> {
    validate_record(input)
}

fn validate_record<T: SchemaRecord>(input: &Value) -> Result<T, ValidationError> {
    validate_fields(&T::TABLE, input).map(T::from_fields)
}

/// Checks every field of `table` and collects all issues before failing.
pub fn validate_fields(table: &TableSpec, input: &Value) -> Result<FieldValues, ValidationError> {
    let Some(object) = input.as_object() else {
        return Err(ValidationError {
            issues: vec![ValidationIssue {
                path: String::new(),
                message: format!("Expected object, received {}", json_type(input)),
            }],
        });
    };

    let mut values = FieldValues::default();
    let mut issues = Vec::new();

    for field in table.fields {
        let problem = match object.get(field.name) {
            None | Some(Value::Null) if field.is_required() => Some("Required".to_string()),
            None | Some(Value::Null) => None,
            Some(Value::String(text)) if text.is_empty() && field.is_required() => {
                Some("String must contain at least 1 character(s)".to_string())
            }
            Some(Value::String(text)) => {
                values.insert(field.name, text.clone());
                None
            }
            Some(other) => Some(format!("Expected string, received {}", json_type(other))),
        };

        if let Some(message) = problem {
            issues.push(ValidationIssue {
                path: field.name.to_string(),
                message,
            });
        }
    }

    if issues.is_empty() {
        Ok(values)
    } else {
        Err(ValidationError { issues })
    }
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
