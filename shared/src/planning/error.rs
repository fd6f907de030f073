//! Errors raised by the planning engine

use thiserror::Error;

/// Planning engine errors
///
/// Missing identifiers and empty history are not errors: they degrade to zero
/// outputs. Only a collaborator failure aborts an item's computation.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PlanningError {
    #[error("{source_name} unavailable: {message}")]
    CollaboratorUnavailable {
        source_name: &'static str,
        message: String,
    },

    #[error("Invalid planning configuration: {0}")]
    InvalidConfig(String),

    #[error("Validation error on {field}: {message}")]
    Validation { field: String, message: String },
}

impl PlanningError {
    pub fn unavailable(source_name: &'static str, message: impl Into<String>) -> Self {
        PlanningError::CollaboratorUnavailable {
            source_name,
            message: message.into(),
        }
    }

    pub fn validation(field: &str, message: impl Into<String>) -> Self {
        PlanningError::Validation {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

pub type PlanningResult<T> = Result<T, PlanningError>;
