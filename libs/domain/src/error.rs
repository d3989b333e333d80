//! Failure kinds raised by the engines

use thiserror::Error;

/// Error returned by every engine operation
#[derive(Error, Debug)]
pub enum EngineError {
    /// Caller-supplied value out of contract
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Referenced entity does not exist
    #[error("{entity} not found with ID: {id}")]
    NotFound { entity: &'static str, id: i32 },

    /// Actor is not the owner of the resource
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Operation would break a uniqueness invariant
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Operation is not valid in the entity's current state
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// The store accepted the request but did not persist it
    #[error("Internal error: {0}")]
    Internal(String),

    /// The store itself failed
    #[error("Storage error: {0}")]
    Storage(#[from] anyhow::Error),
}

/// Coarse classification used by transports to pick a status code
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    InvalidInput,
    NotFound,
    Forbidden,
    Conflict,
    InvalidState,
    Internal,
}

impl EngineError {
    pub fn not_found(entity: &'static str, id: i32) -> Self {
        EngineError::NotFound { entity, id }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            EngineError::InvalidInput(_) => ErrorKind::InvalidInput,
            EngineError::NotFound { .. } => ErrorKind::NotFound,
            EngineError::Forbidden(_) => ErrorKind::Forbidden,
            EngineError::Conflict(_) => ErrorKind::Conflict,
            EngineError::InvalidState(_) => ErrorKind::InvalidState,
            EngineError::Internal(_) | EngineError::Storage(_) => ErrorKind::Internal,
        }
    }
}

/// Type alias for engine results
pub type EngineResult<T> = Result<T, EngineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storage_errors_are_internal() {
        let err: EngineError = anyhow::anyhow!("connection reset").into();
        assert_eq!(err.kind(), ErrorKind::Internal);
    }

    #[test]
    fn test_not_found_message() {
        let err = EngineError::not_found("Media", 42);
        assert_eq!(err.to_string(), "Media not found with ID: 42");
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }
}
