use axum::{
    Json,
    extract::multipart::MultipartError,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use sea_orm::DbErr;
use serde::Serialize;

use crate::registry::RegistryError;
use crate::services::ServiceError;

/// Structured error response returned by all endpoints on failure.
#[derive(Serialize, utoipa::ToSchema)]
pub struct ErrorBody {
    /// Machine-readable error code. One of: `VALIDATION_ERROR`,
    /// `INVALID_VIN_LENGTH`, `EMPTY_PAYLOAD`, `PAYLOAD_TOO_LARGE`, `TOKEN_MISSING`, `TOKEN_INVALID`,
    /// `NOT_FOUND`, `REGISTRY_UNAVAILABLE`, `REGISTRY_TIMEOUT`, `INTERNAL_ERROR`.
    #[schema(example = "INVALID_VIN_LENGTH")]
    pub code: &'static str,
    /// Human-readable error description.
    #[schema(example = "VIN must be 17 characters, got 3")]
    pub message: String,
}

/// Application-level error type.
#[derive(Debug)]
pub enum AppError {
    Validation(String),
    InvalidVin(String),
    EmptyPayload,
    /// Upload body exceeded `images.max_upload_size`.
    PayloadTooLarge(String),
    TokenMissing,
    TokenInvalid,
    NotFound(String),
    /// The registry answered with an error or could not be reached.
    RegistryUnavailable(String),
    RegistryTimeout,
    Internal(String),
}

impl AppError {
    fn status_and_body(self) -> (StatusCode, ErrorBody) {
        match self {
            AppError::Validation(msg) => (
                StatusCode::BAD_REQUEST,
                ErrorBody {
                    code: "VALIDATION_ERROR",
                    message: msg,
                },
            ),
            AppError::InvalidVin(msg) => (
                StatusCode::BAD_REQUEST,
                ErrorBody {
                    code: "INVALID_VIN_LENGTH",
                    message: msg,
                },
            ),
            AppError::EmptyPayload => (
                StatusCode::BAD_REQUEST,
                ErrorBody {
                    code: "EMPTY_PAYLOAD",
                    message: "Empty image payload".into(),
                },
            ),
            AppError::PayloadTooLarge(msg) => (
                StatusCode::PAYLOAD_TOO_LARGE,
                ErrorBody {
                    code: "PAYLOAD_TOO_LARGE",
                    message: msg,
                },
            ),
            AppError::TokenMissing => (
                StatusCode::UNAUTHORIZED,
                ErrorBody {
                    code: "TOKEN_MISSING",
                    message: "Authentication required".into(),
                },
            ),
            AppError::TokenInvalid => (
                StatusCode::UNAUTHORIZED,
                ErrorBody {
                    code: "TOKEN_INVALID",
                    message: "Invalid API token".into(),
                },
            ),
            AppError::NotFound(msg) => (
                StatusCode::NOT_FOUND,
                ErrorBody {
                    code: "NOT_FOUND",
                    message: msg,
                },
            ),
            AppError::RegistryUnavailable(detail) => {
                tracing::warn!("Registry unavailable: {}", detail);
                (
                    StatusCode::BAD_GATEWAY,
                    ErrorBody {
                        code: "REGISTRY_UNAVAILABLE",
                        message: format!("Vehicle registry unavailable: {detail}"),
                    },
                )
            }
            AppError::RegistryTimeout => (
                StatusCode::GATEWAY_TIMEOUT,
                ErrorBody {
                    code: "REGISTRY_TIMEOUT",
                    message: "Vehicle registry did not respond in time".into(),
                },
            ),
            AppError::Internal(detail) => {
                tracing::error!("Internal error: {}", detail);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorBody {
                        code: "INTERNAL_ERROR",
                        message: "An unexpected error occurred".into(),
                    },
                )
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = self.status_and_body();
        (status, Json(body)).into_response()
    }
}

impl From<DbErr> for AppError {
    fn from(err: DbErr) -> Self {
        AppError::Internal(err.to_string())
    }
}

impl From<MultipartError> for AppError {
    fn from(err: MultipartError) -> Self {
        multipart_rejection(err.status(), err.body_text())
    }
}

fn multipart_rejection(status: StatusCode, detail: String) -> AppError {
    if status == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge(format!("Upload too large: {detail}"))
    } else {
        AppError::Validation(format!("Multipart error: {detail}"))
    }
}

impl From<RegistryError> for AppError {
    fn from(err: RegistryError) -> Self {
        match err {
            RegistryError::Timeout => AppError::RegistryTimeout,
            other => AppError::RegistryUnavailable(other.to_string()),
        }
    }
}

impl From<ServiceError> for AppError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::InvalidVin(e) => AppError::InvalidVin(e.to_string()),
            ServiceError::RegistryUnavailable(e) => e.into(),
            ServiceError::EmptyPayload => AppError::EmptyPayload,
            ServiceError::NotFound(msg) => AppError::NotFound(msg),
            ServiceError::Database(e) => e.into(),
        }
    }
}
