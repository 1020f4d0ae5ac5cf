/// Error types for timeline-service
///
/// Errors are converted to appropriate HTTP responses for API clients.
use actix_web::{error::ResponseError, http::StatusCode, HttpResponse};
use thiserror::Error;

/// Result type alias for service operations
pub type Result<T> = std::result::Result<T, AppError>;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    Validation(String),

    /// Optimistic update affected zero rows and the retry budget is spent.
    /// Retryable from the caller's point of view.
    #[error("Version conflict on post {post_id} after {attempts} attempts")]
    VersionConflict { post_id: i64, attempts: u32 },

    /// Bulk timeline delivery failed partway. The post itself stays
    /// committed; the orchestrator logs this for reconciliation.
    #[error("Timeline fan-out delivered {delivered} of {expected} entries: {reason}")]
    FanoutPartialFailure {
        delivered: u64,
        expected: u64,
        reason: String,
    },

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::VersionConflict { .. } => StatusCode::CONFLICT,
            AppError::Database(_)
            | AppError::FanoutPartialFailure { .. }
            | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();

        HttpResponse::build(status).json(serde_json::json!({
            "error": self.to_string(),
            "status": status.as_u16(),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn conflict_maps_to_409() {
        let err = AppError::VersionConflict {
            post_id: 1,
            attempts: 3,
        };
        assert_eq!(err.status_code(), StatusCode::CONFLICT);
    }

    #[test]
    fn validation_maps_to_400() {
        let err = AppError::Validation("size must be >= 1".into());
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn not_found_maps_to_404() {
        assert_eq!(
            AppError::NotFound("post 9".into()).status_code(),
            StatusCode::NOT_FOUND
        );
    }
}
