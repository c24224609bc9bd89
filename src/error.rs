use axum::{
    Json,
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::{Value, json};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(Value),

    #[error("Habit not found")]
    NotFound,

    #[error("Internal server error")]
    Internal(String),
}

impl AppError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        AppError::Validation(Value::String(message.into()))
    }
}

impl From<habitrack_shared::Error> for AppError {
    fn from(err: habitrack_shared::Error) -> Self {
        match err {
            habitrack_shared::Error::Validate(errors) => AppError::Validation(
                serde_json::to_value(&errors).unwrap_or_else(|_| json!(errors.to_string())),
            ),
            habitrack_shared::Error::NotFound(_) => AppError::NotFound,
            habitrack_shared::Error::Server(msg) => AppError::Internal(msg),
            habitrack_shared::Error::Unknown(err) => AppError::Internal(format!("{err:?}")),
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::bad_request(rejection.body_text())
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::bad_request(rejection.body_text())
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        AppError::bad_request(rejection.body_text())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            AppError::Validation(details) => (
                StatusCode::BAD_REQUEST,
                json!({ "error": "Validation error", "details": details }),
            ),
            AppError::NotFound => (
                StatusCode::NOT_FOUND,
                json!({ "error": "Habit not found" }),
            ),
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "error": "Internal server error" }),
                )
            }
        };

        (status, Json(body)).into_response()
    }
}
