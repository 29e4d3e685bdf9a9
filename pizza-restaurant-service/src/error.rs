use axum::{http::StatusCode, response::Json};
use serde::Serialize;
use serde_json::json;
use utoipa::ToSchema;

use crate::store::StoreError;
use crate::validation::RESTAURANT_NOT_FOUND;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    NotFound(String),
    #[error("Validation failed: {}", .0.join(", "))]
    ValidationFailed(Vec<String>),
    /// Insertion failed after validation passed. The cause is only logged.
    #[error("Validation errors")]
    PersistenceFailure,
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl ApiError {
    pub fn restaurant_not_found() -> Self {
        ApiError::NotFound(RESTAURANT_NOT_FOUND.to_string())
    }
}

impl axum::response::IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        match self {
            ApiError::NotFound(message) => {
                (StatusCode::NOT_FOUND, Json(json!({ "error": message }))).into_response()
            }
            ApiError::ValidationFailed(errors) => {
                (StatusCode::BAD_REQUEST, Json(json!({ "errors": errors }))).into_response()
            }
            ApiError::PersistenceFailure => (
                StatusCode::BAD_REQUEST,
                Json(json!({ "errors": ["Validation errors"] })),
            )
                .into_response(),
            ApiError::Store(e) => {
                tracing::error!(error = %e, "Store operation failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "error": "Internal server error" })),
                )
                    .into_response()
            }
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ApiErrorResponse {
    /// Error message
    pub error: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ApiErrorsResponse {
    /// Every problem found with the request
    pub errors: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::response::IntoResponse;

    async fn body_json(error: ApiError) -> (StatusCode, serde_json::Value) {
        let response = error.into_response();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_not_found_response() {
        let (status, body) = body_json(ApiError::restaurant_not_found()).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, json!({"error": "Restaurant not found"}));
    }

    #[tokio::test]
    async fn test_validation_failed_lists_every_error() {
        let errors = vec!["Pizza not found".to_string(), "Restaurant not found".to_string()];
        let (status, body) = body_json(ApiError::ValidationFailed(errors)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            body,
            json!({"errors": ["Pizza not found", "Restaurant not found"]})
        );
    }

    #[tokio::test]
    async fn test_store_errors_are_not_leaked() {
        let error = ApiError::Store(StoreError::Constraint("secret detail".to_string()));
        let (status, body) = body_json(error).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, json!({"error": "Internal server error"}));

        let (status, body) = body_json(ApiError::PersistenceFailure).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({"errors": ["Validation errors"]}));
    }
}
