use thiserror::Error;

/// Errors raised by the catalog, the classifier and the session layer.
///
/// Only `NotFound` and `MissingLandmarks` can come out of per-frame work;
/// the remaining variants are configuration errors caught before a session
/// starts.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CoachError {
    #[error("exercise '{0}' is not registered")]
    NotFound(String),
    #[error("frame is missing landmark {index} (frame has {available} landmarks)")]
    MissingLandmarks { index: usize, available: usize },
    #[error("invalid exercise definition '{name}': {reason}")]
    InvalidDefinition { name: String, reason: String },
    #[error("exercise '{0}' is already registered")]
    DuplicateExercise(String),
    #[error("no exercise is active")]
    NoActiveExercise,
}

pub type CoachResult<T> = std::result::Result<T, CoachError>;
