use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use confab_db::DbError;
use serde_json::json;
use thiserror::Error;
use tracing::error;

/// Request-level errors. Every variant names the failing field or entity;
/// nothing is silently recovered.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{message}")]
    Validation { field: String, message: String },

    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    Referential(String),

    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("invalid credentials")]
    Unauthorized,

    #[error("not allowed")]
    Forbidden,

    #[error("internal error")]
    Internal(String),
}

impl ApiError {
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    fn status(&self) -> StatusCode {
        match self {
            Self::Validation { .. } => StatusCode::BAD_REQUEST,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::Referential(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::Forbidden => StatusCode::FORBIDDEN,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<DbError> for ApiError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::Unique(detail) => Self::Conflict(detail),
            DbError::ForeignKey(detail) => Self::Referential(detail),
            DbError::Validation(detail) => Self::Validation {
                field: "constraint".into(),
                message: detail,
            },
            DbError::NotFound(entity) => Self::NotFound(entity),
            other => Self::Internal(other.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if let Self::Internal(detail) = &self {
            error!("internal error: {detail}");
        }

        let body = match &self {
            Self::Validation { field, message } => {
                json!({ "error": message, "field": field })
            }
            other => json!({ "error": other.to_string() }),
        };

        (self.status(), Json(body)).into_response()
    }
}
