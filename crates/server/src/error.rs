use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use services::services::hierarchy::HierarchyError;
use thiserror::Error;
use utils::response::ApiResponse;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("record not found")]
    NotFound,
    #[error("{0}")]
    BadRequest(String),
    #[error(transparent)]
    Database(#[from] sqlx::Error),
    #[error(transparent)]
    Hierarchy(#[from] HierarchyError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::NotFound | ApiError::Database(sqlx::Error::RowNotFound) => {
                StatusCode::NOT_FOUND
            }
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            // A request referencing a missing client/project/task trips the
            // foreign key, which is the caller's fault, not ours.
            ApiError::Database(sqlx::Error::Database(db_err))
                if matches!(db_err.kind(), sqlx::error::ErrorKind::ForeignKeyViolation) =>
            {
                StatusCode::BAD_REQUEST
            }
            ApiError::Hierarchy(HierarchyError::CycleDetected { .. }) => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            ApiError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!("api error: {self}");
        } else {
            tracing::debug!("api error ({status}): {self}");
        }

        (status, Json(ApiResponse::<()>::error(self.to_string()))).into_response()
    }
}
