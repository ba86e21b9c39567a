//! Error types for the shared crate

use thiserror::Error;

/// A single rejected field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldViolation {
    pub field: String,
    /// Rule code, e.g. `required`, `range`, `negative`
    pub code: String,
}

/// Input rejected before any request was sent
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid input: {}", describe(.violations))]
pub struct ValidationError {
    /// Sorted by field name
    violations: Vec<FieldViolation>,
}

impl ValidationError {
    pub fn new(violations: Vec<FieldViolation>) -> Self {
        let mut violations = violations;
        violations.sort_by(|a, b| a.field.cmp(&b.field).then_with(|| a.code.cmp(&b.code)));
        Self { violations }
    }

    /// Shortcut for a single-field failure
    pub fn field(field: impl Into<String>, code: impl Into<String>) -> Self {
        Self::new(vec![FieldViolation {
            field: field.into(),
            code: code.into(),
        }])
    }

    pub fn violations(&self) -> &[FieldViolation] {
        &self.violations
    }

    /// Distinct field names, sorted
    pub fn fields(&self) -> Vec<&str> {
        let mut fields: Vec<&str> = self.violations.iter().map(|v| v.field.as_str()).collect();
        fields.dedup();
        fields
    }
}

impl From<validator::ValidationErrors> for ValidationError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let violations = errors
            .field_errors()
            .into_iter()
            .flat_map(|(field, errs)| {
                errs.iter().map(move |e| FieldViolation {
                    field: field.to_string(),
                    code: e.code.to_string(),
                })
            })
            .collect();
        Self::new(violations)
    }
}

fn describe(violations: &[FieldViolation]) -> String {
    violations
        .iter()
        .map(|v| format!("{} ({})", v.field, v.code))
        .collect::<Vec<_>>()
        .join(", ")
}
