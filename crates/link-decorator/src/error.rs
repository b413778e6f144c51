//! Error types for the decoration engine.

use thiserror::Error;

/// Result type for decorator operations.
pub type Result<T> = std::result::Result<T, DecoratorError>;

/// Why a user expression could not produce a value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EvaluationFailure {
    /// The source did not parse.
    #[error("Failed to compile expression: {0}")]
    Compile(String),

    /// The program parsed but raised an error while running.
    #[error("Expression raised an error: {0}")]
    Runtime(String),
}

impl EvaluationFailure {
    /// The underlying message, without the category prefix.
    pub fn message(&self) -> &str {
        match self {
            EvaluationFailure::Compile(msg) | EvaluationFailure::Runtime(msg) => msg,
        }
    }
}

/// Errors that can occur while loading settings or evaluating expressions.
#[derive(Debug, Error)]
pub enum DecoratorError {
    /// Settings document could not be parsed.
    #[error("Failed to parse settings: {0}")]
    ParseError(String),

    /// Serialization/deserialization error.
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// A user expression failed to compile or run.
    #[error(transparent)]
    Expression(#[from] EvaluationFailure),
}

impl From<serde_json::Error> for DecoratorError {
    fn from(err: serde_json::Error) -> Self {
        DecoratorError::SerializationError(err.to_string())
    }
}

impl From<serde_yaml::Error> for DecoratorError {
    fn from(err: serde_yaml::Error) -> Self {
        DecoratorError::ParseError(err.to_string())
    }
}
