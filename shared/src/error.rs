use axum::{http::StatusCode, response::IntoResponse, Json};
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    UnprocessableEntity(String),
    #[error("{0}")]
    EntityNotFound(String),
    #[error("{0}")]
    ResourceConflict(String),
    #[error("Validation failed")]
    ValidationError(#[from] garde::Report),
    #[error("transaction failed")]
    TransactionError(#[source] sqlx::Error),
    #[error("database operation failed")]
    SpecificOperationError(#[source] sqlx::Error),
    #[error("no rows affected: {0}")]
    NoRowsAffectedError(String),
    #[error("key value store operation failed")]
    KeyValueStoreError(#[from] redis::RedisError),
    #[error("password hashing failed")]
    BcryptError(#[from] bcrypt::BcryptError),
    #[error("{0}")]
    ConvertToUuidError(#[from] uuid::Error),
    #[error("{0}")]
    ConversionEntityError(String),
    #[error("Authentication required")]
    UnauthenticatedError,
    #[error("Login failed")]
    UnauthorizedError,
    #[error("Forbidden operation")]
    ForbiddenOperation,
}

impl AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::UnprocessableEntity(_) | AppError::ValidationError(_) => {
                StatusCode::BAD_REQUEST
            }
            AppError::EntityNotFound(_) => StatusCode::NOT_FOUND,
            AppError::ResourceConflict(_) => StatusCode::CONFLICT,
            AppError::UnauthenticatedError | AppError::UnauthorizedError => {
                StatusCode::UNAUTHORIZED
            }
            AppError::ForbiddenOperation => StatusCode::FORBIDDEN,
            AppError::TransactionError(_)
            | AppError::SpecificOperationError(_)
            | AppError::NoRowsAffectedError(_)
            | AppError::KeyValueStoreError(_)
            | AppError::BcryptError(_)
            | AppError::ConvertToUuidError(_)
            | AppError::ConversionEntityError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let status_code = self.status_code();

        if status_code == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!(
                error.cause_chain = ?self,
                error.message = %self,
                "Unexpected error happened"
            );
            // internals are never leaked to the caller
            return (
                status_code,
                Json(json!({ "message": "Something went wrong" })),
            )
                .into_response();
        }

        if let AppError::ValidationError(report) = &self {
            let errors = report
                .iter()
                .map(|(path, error)| {
                    json!({
                        "field": path.to_string(),
                        "message": error.to_string(),
                    })
                })
                .collect::<Vec<_>>();
            return (
                status_code,
                Json(json!({ "message": "Validation failed", "errors": errors })),
            )
                .into_response();
        }

        (status_code, Json(json!({ "message": self.to_string() }))).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;
