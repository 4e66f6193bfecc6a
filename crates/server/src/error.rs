use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use db::DbErr;
use serde_json::json;
use tasks_protocol::{
    FieldError, INTERNAL_ERROR_MESSAGE, TASK_NOT_FOUND_MESSAGE, ValidationErrors,
    validation::FIELD_BODY,
};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Validation(#[from] ValidationErrors),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Bad request: {0}")]
    BadRequest(String),
    #[error(transparent)]
    Database(#[from] DbErr),
}

impl ApiError {
    pub fn task_not_found() -> Self {
        ApiError::NotFound(TASK_NOT_FOUND_MESSAGE.to_string())
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status_code, error_type) = match &self {
            ApiError::Validation(_) => (StatusCode::BAD_REQUEST, "ValidationError"),
            ApiError::NotFound(_) => (StatusCode::NOT_FOUND, "NotFound"),
            ApiError::BadRequest(_) => (StatusCode::BAD_REQUEST, "BadRequest"),
            ApiError::Database(db_err) => match db_err {
                DbErr::RecordNotFound(_) => (StatusCode::NOT_FOUND, "DatabaseError"),
                _ => (StatusCode::INTERNAL_SERVER_ERROR, "DatabaseError"),
            },
        };

        if status_code.is_server_error() {
            tracing::error!(
                status = %status_code,
                error_type,
                error = %self,
                "API request failed"
            );
        }

        let body = match self {
            ApiError::Validation(errors) => json!({ "errors": errors.errors }),
            ApiError::BadRequest(message) => json!({
                "errors": [FieldError::new(FIELD_BODY, message)]
            }),
            ApiError::NotFound(message) => json!({ "message": message }),
            ApiError::Database(DbErr::RecordNotFound(_)) => {
                json!({ "message": TASK_NOT_FOUND_MESSAGE })
            }
            ApiError::Database(_) => json!({ "message": INTERNAL_ERROR_MESSAGE }),
        };
        (status_code, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use axum::body::to_bytes;
    use serde_json::Value;

    use super::*;

    async fn into_parts(error: ApiError) -> (StatusCode, Value) {
        let response = error.into_response();
        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&body).unwrap())
    }

    #[tokio::test]
    async fn validation_errors_list_every_field() {
        let mut errors = ValidationErrors::default();
        errors.push("title", "Title is required");
        errors.push("dueDate", "Due date must be a valid date");

        let (status, body) = into_parts(ApiError::from(errors)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["errors"].as_array().unwrap().len(), 2);
        assert_eq!(body["errors"][0]["field"], "title");
        assert_eq!(body["errors"][1]["field"], "dueDate");
    }

    #[tokio::test]
    async fn not_found_carries_message() {
        let (status, body) = into_parts(ApiError::task_not_found()).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, json!({ "message": "Task not found" }));
    }

    #[tokio::test]
    async fn record_not_found_maps_to_404() {
        let (status, body) =
            into_parts(ApiError::from(DbErr::RecordNotFound("tasks".into()))).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["message"], "Task not found");
    }

    #[tokio::test]
    async fn database_failures_are_opaque() {
        let (status, body) = into_parts(ApiError::from(DbErr::Custom(
            "connection reset by peer".into(),
        )))
        .await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, json!({ "message": "Internal server error" }));
    }

    #[tokio::test]
    async fn bad_request_is_reported_on_body_field() {
        let (status, body) = into_parts(ApiError::BadRequest("expected value".into())).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["errors"][0]["field"], "body");
        assert_eq!(body["errors"][0]["message"], "expected value");
    }
}
