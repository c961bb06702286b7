// ==========================================
// Panitia Engine - API layer error types
// ==========================================
// Responsibility: translate repository/engine errors into the caller-facing
// taxonomy. Every error carries a stable machine kind plus a human message;
// feasibility failures keep their specific reason.
// ==========================================

use crate::engine::generator::GeneratorError;
use crate::engine::workload::WorkloadError;
use crate::repository::error::RepositoryError;
use thiserror::Error;

/// API-layer error type
#[derive(Error, Debug)]
pub enum ApiError {
    /// Generation could not form a committee; nothing was written
    #[error("generation infeasible [{kind}]: {message}")]
    Infeasible { kind: &'static str, message: String },

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("business rule violated: {0}")]
    BusinessRuleViolation(String),

    /// Transactional write failed; the store rolled back unchanged
    #[error("storage error: {0}")]
    StorageError(String),

    #[error("internal error: {0}")]
    InternalError(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ApiError {
    /// Stable machine-readable kind string
    pub fn kind(&self) -> &str {
        match self {
            ApiError::Infeasible { kind, .. } => kind,
            ApiError::InvalidInput(_) => "INVALID_INPUT",
            ApiError::NotFound(_) => "NOT_FOUND",
            ApiError::BusinessRuleViolation(_) => "BUSINESS_RULE_VIOLATION",
            ApiError::StorageError(_) => "STORAGE_ERROR",
            ApiError::InternalError(_) | ApiError::Other(_) => "INTERNAL_ERROR",
        }
    }
}

impl From<RepositoryError> for ApiError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound { entity, id } => {
                ApiError::NotFound(format!("{} (id={}) does not exist", entity, id))
            }
            RepositoryError::UniqueConstraintViolation(msg) => {
                ApiError::BusinessRuleViolation(format!("unique constraint violated: {}", msg))
            }
            RepositoryError::ForeignKeyViolation(msg) => {
                ApiError::BusinessRuleViolation(format!("foreign key constraint violated: {}", msg))
            }
            RepositoryError::DatabaseConnectionError(msg)
            | RepositoryError::LockError(msg)
            | RepositoryError::DatabaseTransactionError(msg)
            | RepositoryError::DatabaseQueryError(msg) => ApiError::StorageError(msg),
            RepositoryError::ValidationError(msg) => ApiError::InvalidInput(msg),
            RepositoryError::InternalError(msg) => ApiError::InternalError(msg),
            RepositoryError::Other(err) => ApiError::Other(err),
        }
    }
}

impl From<GeneratorError> for ApiError {
    fn from(err: GeneratorError) -> Self {
        if let Some(kind) = err.feasibility_kind() {
            return ApiError::Infeasible {
                kind,
                message: err.to_string(),
            };
        }

        let message = err.to_string();
        match err {
            GeneratorError::InvalidWindow { .. } => ApiError::InvalidInput(message),
            GeneratorError::Config(msg) => ApiError::InternalError(msg),
            GeneratorError::Repository(repo_err) => repo_err.into(),
            // feasibility variants are handled above
            _ => ApiError::InternalError(message),
        }
    }
}

impl From<WorkloadError> for ApiError {
    fn from(err: WorkloadError) -> Self {
        match err {
            WorkloadError::Config(msg) => ApiError::InternalError(msg),
            WorkloadError::Repository(repo_err) => repo_err.into(),
        }
    }
}

/// Result alias for the API layer
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_feasibility_error_keeps_kind() {
        let err: ApiError = GeneratorError::InsufficientMembers {
            available: 2,
            required: 3,
        }
        .into();

        assert_eq!(err.kind(), "INSUFFICIENT_MEMBERS");
        assert!(err.to_string().contains("2 available"));
    }

    #[test]
    fn test_repository_not_found_conversion() {
        let err: ApiError = RepositoryError::NotFound {
            entity: "Program".to_string(),
            id: "P001".to_string(),
        }
        .into();

        match err {
            ApiError::NotFound(msg) => {
                assert!(msg.contains("Program"));
                assert!(msg.contains("P001"));
            }
            other => panic!("expected NotFound, got {:?}", other),
        }
    }

    #[test]
    fn test_transaction_failure_is_storage_error() {
        let err: ApiError =
            RepositoryError::DatabaseTransactionError("rollback".to_string()).into();
        assert_eq!(err.kind(), "STORAGE_ERROR");
    }
}
