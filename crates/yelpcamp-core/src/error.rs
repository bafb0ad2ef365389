//! # Validation Errors
//!
//! A rejected payload produces one [`FieldViolation`] per offending field.
//! All violations are collected before the payload is rejected, so the
//! client sees every problem at once rather than the first one only.

use thiserror::Error;

/// Separator used when the field-level messages are joined into the single
/// message carried by the 400 response.
pub const MESSAGE_DELIMITER: &str = ",";

/// A single field-level rule violation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldViolation {
    /// Dotted path of the field from the payload root, e.g. `campground.title`.
    pub path: String,
    /// What rule the field broke, e.g. `is required`.
    pub reason: String,
}

impl FieldViolation {
    /// Create a violation for the field at `path`.
    pub fn new(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            reason: reason.into(),
        }
    }
}

impl std::fmt::Display for FieldViolation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "\"{}\" {}", self.path, self.reason)
    }
}

/// A payload failed its shape check.
///
/// `Display` yields the joined message, which is exactly what the failure
/// page shows.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{}", join_violations(.violations))]
pub struct ValidationError {
    violations: Vec<FieldViolation>,
}

impl ValidationError {
    /// Build an error from the collected violations.
    pub fn new(violations: Vec<FieldViolation>) -> Self {
        Self { violations }
    }

    /// Build an error carrying a single violation.
    pub fn single(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::new(vec![FieldViolation::new(path, reason)])
    }

    /// The individual violations, in the order they were found.
    pub fn violations(&self) -> &[FieldViolation] {
        &self.violations
    }

    /// The individual messages, in the order they were found.
    pub fn messages(&self) -> Vec<String> {
        self.violations.iter().map(ToString::to_string).collect()
    }
}

fn join_violations(violations: &[FieldViolation]) -> String {
    violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(MESSAGE_DELIMITER)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn violation_display_quotes_path() {
        let v = FieldViolation::new("campground.title", "is required");
        assert_eq!(v.to_string(), "\"campground.title\" is required");
    }

    #[test]
    fn error_display_joins_all_messages() {
        let err = ValidationError::new(vec![
            FieldViolation::new("campground.title", "is required"),
            FieldViolation::new("campground.price", "must be a number"),
        ]);
        assert_eq!(
            err.to_string(),
            "\"campground.title\" is required,\"campground.price\" must be a number"
        );
        assert_eq!(err.messages().len(), 2);
    }

    #[test]
    fn single_violation_error() {
        let err = ValidationError::single("review", "is required");
        assert_eq!(err.violations().len(), 1);
        assert_eq!(err.to_string(), "\"review\" is required");
    }
}
