use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Unauthorized")]
    Unauthorized,

    #[error("Student not found")]
    StudentNotFound,

    #[error("{message}: {details}")]
    Internal {
        message: &'static str,
        details: String,
    },
}

impl AppError {
    pub fn internal(message: &'static str, cause: impl std::error::Error) -> Self {
        AppError::Internal {
            message,
            details: cause.to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            AppError::Unauthorized => {
                (StatusCode::UNAUTHORIZED, json!({ "error": "Unauthorized" }))
            }
            AppError::StudentNotFound => (
                StatusCode::NOT_FOUND,
                json!({ "error": "Student not found" }),
            ),
            AppError::Internal { message, details } => {
                error!("{message}: {details}");

                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "error": message, "details": details }),
                )
            }
        };

        (status, Json(body)).into_response()
    }
}
