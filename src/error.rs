//! Error types for seqtask.

use axum::{
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};

/// Configuration-related errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to bind {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },
}

/// Why a single request field was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldReason {
    Missing,
    NotAnInteger,
    NotANumber,
    NotFinite,
    Negative,
    OutOfRange,
}

impl std::fmt::Display for FieldReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Missing => write!(f, "field required"),
            Self::NotAnInteger => write!(f, "value is not a valid integer"),
            Self::NotANumber => write!(f, "value is not a valid float"),
            Self::NotFinite => write!(f, "value must be a finite number"),
            Self::Negative => write!(f, "value must not be negative"),
            Self::OutOfRange => write!(f, "value is too large"),
        }
    }
}

/// A rejected request field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub reason: FieldReason,
}

impl FieldError {
    pub fn new(field: &'static str, reason: FieldReason) -> Self {
        Self { field, reason }
    }
}

impl std::fmt::Display for FieldError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.reason)
    }
}

/// Task-creation parameters failed validation. Lists every offending field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub fields: Vec<FieldError>,
}

impl ValidationError {
    pub fn new(fields: Vec<FieldError>) -> Self {
        Self { fields }
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let n = self.fields.len();
        write!(
            f,
            "{n} validation error{} for task",
            if n == 1 { "" } else { "s" }
        )?;
        for field in &self.fields {
            write!(f, "\n{field}")?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationError {}

impl IntoResponse for ValidationError {
    fn into_response(self) -> Response {
        (
            StatusCode::BAD_REQUEST,
            [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
            self.to_string(),
        )
            .into_response()
    }
}

/// Task lifecycle errors.
#[derive(Debug, thiserror::Error)]
pub enum TaskError {
    /// The record for an expected id is gone from the store.
    #[error("Task {id} not found")]
    NotFound { id: u64 },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_error_names_fields() {
        let err = ValidationError::new(vec![
            FieldError::new("count", FieldReason::Missing),
            FieldError::new("delta", FieldReason::NotANumber),
        ]);
        let text = err.to_string();
        assert!(text.starts_with("2 validation errors for task"));
        assert!(text.contains("count: field required"));
        assert!(text.contains("delta: value is not a valid float"));
    }

    #[test]
    fn single_error_is_singular() {
        let err = ValidationError::new(vec![FieldError::new("start", FieldReason::Missing)]);
        assert!(err.to_string().starts_with("1 validation error for task"));
    }

    #[test]
    fn validation_error_is_bad_request() {
        let err = ValidationError::new(vec![FieldError::new("count", FieldReason::Missing)]);
        let resp = err.into_response();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            resp.headers()[header::CONTENT_TYPE],
            "text/plain; charset=utf-8"
        );
    }

    #[test]
    fn task_error_names_id() {
        let err = TaskError::NotFound { id: 4 };
        assert_eq!(err.to_string(), "Task 4 not found");
    }
}
