//! Error types for scope expression handling

use thiserror::Error;

/// Scope expression errors
#[derive(Error, Debug)]
pub enum LogicError {
    #[error("Failed to parse JsonLogic node: {0}")]
    ParseError(String),

    #[error("JsonLogic node has no rule object")]
    MissingRule,

    #[error("JsonLogic evaluation failed: {0}")]
    EvaluationError(String),
}

/// Result type for scope expression operations
pub type Result<T> = std::result::Result<T, LogicError>;
