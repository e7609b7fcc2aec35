use axum::{Json, http::StatusCode, response::IntoResponse};
use serde::Serialize;
use sqlx::Error as SqlxError;
use thiserror::Error as ThisError;

#[derive(Debug, ThisError)]
pub enum CafeError {
    #[error("configuration error: {0}")]
    Configuration(String),

    #[error("content store unreachable: {0}")]
    Connectivity(String),

    #[error("validation failed for `{field}`: {message}")]
    Validation { field: String, message: String },

    #[error("resource not found")]
    NotFound,

    #[error("database handle requested before connect() completed")]
    NotInitialized,

    #[error("unauthorized")]
    Unauthorized,

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Database error: {0}")]
    Database(#[from] SqlxError),

    #[error("host adapter error: {0}")]
    Adapter(String),
}

impl CafeError {
    /// Field-level validation failure, for the boundary shape checks.
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        CafeError::Validation {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl IntoResponse for CafeError {
    fn into_response(self) -> axum::response::Response {
        let (status, error_body) = match self {
            CafeError::Validation { field, message } => {
                let body = ApiErrorBody {
                    code: "VALIDATION".to_string(),
                    message,
                    field: Some(field),
                };
                (StatusCode::BAD_REQUEST, body)
            }
            CafeError::Json(_) => {
                let body = ApiErrorBody {
                    code: "VALIDATION".to_string(),
                    message: "Request body is not valid JSON.".to_string(),
                    field: None,
                };
                (StatusCode::BAD_REQUEST, body)
            }
            CafeError::NotFound => {
                let body = ApiErrorBody {
                    code: "NOT_FOUND".to_string(),
                    message: "The requested resource does not exist.".to_string(),
                    field: None,
                };
                (StatusCode::NOT_FOUND, body)
            }
            CafeError::Unauthorized => {
                let body = ApiErrorBody {
                    code: "UNAUTHORIZED".to_string(),
                    message: "Authentication required.".to_string(),
                    field: None,
                };
                (StatusCode::UNAUTHORIZED, body)
            }
            CafeError::Connectivity(_) => {
                let body = ApiErrorBody {
                    code: "UNAVAILABLE".to_string(),
                    message: "The content store is unavailable.".to_string(),
                    field: None,
                };
                (StatusCode::SERVICE_UNAVAILABLE, body)
            }
            CafeError::Configuration(_) => {
                let body = ApiErrorBody {
                    code: "CONFIGURATION".to_string(),
                    message: "The server is misconfigured.".to_string(),
                    field: None,
                };
                (StatusCode::INTERNAL_SERVER_ERROR, body)
            }
            // Internal failures never leak driver detail to the caller.
            CafeError::Database(_) | CafeError::NotInitialized | CafeError::Adapter(_) => {
                let body = ApiErrorBody {
                    code: "INTERNAL_ERROR".to_string(),
                    message: "An internal server error occurred.".to_string(),
                    field: None,
                };
                (StatusCode::INTERNAL_SERVER_ERROR, body)
            }
        };
        (status, Json(ApiErrorResponse { error: error_body })).into_response()
    }
}

/// Standardized API error response body
#[derive(Serialize)]
pub struct ApiErrorBody {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

#[derive(Serialize)]
pub struct ApiErrorResponse {
    pub error: ApiErrorBody,
}
