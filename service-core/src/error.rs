use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::middleware::tracing::current_correlation_id;

/// A single field-level validation failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {message}")]
    ValidationError {
        message: String,
        details: Vec<FieldError>,
    },

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Bad request ({code}): {message}")]
    BadRequest { code: &'static str, message: String },

    #[error("Unauthorized ({code}): {message}")]
    Unauthorized { code: &'static str, message: String },

    #[error("Not found ({code}): {message}")]
    NotFound { code: &'static str, message: String },

    #[error("Unprocessable ({code}): {message}")]
    Unprocessable { code: &'static str, message: String },

    #[error("Internal server error: {0}")]
    InternalError(#[from] anyhow::Error),

    #[error("Configuration error: {0}")]
    ConfigError(anyhow::Error),
}

impl AppError {
    pub fn validation(details: Vec<FieldError>) -> Self {
        AppError::ValidationError {
            message: "Request validation failed".to_string(),
            details,
        }
    }

    pub fn invalid_parameter(message: impl Into<String>) -> Self {
        AppError::InvalidParameter(message.into())
    }

    pub fn bad_request(code: &'static str, message: impl Into<String>) -> Self {
        AppError::BadRequest {
            code,
            message: message.into(),
        }
    }

    pub fn unauthorized(code: &'static str, message: impl Into<String>) -> Self {
        AppError::Unauthorized {
            code,
            message: message.into(),
        }
    }

    pub fn not_found(code: &'static str, message: impl Into<String>) -> Self {
        AppError::NotFound {
            code,
            message: message.into(),
        }
    }

    pub fn unprocessable(code: &'static str, message: impl Into<String>) -> Self {
        AppError::Unprocessable {
            code,
            message: message.into(),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::ValidationError { .. }
            | AppError::InvalidParameter(_)
            | AppError::BadRequest { .. } => StatusCode::BAD_REQUEST,
            AppError::Unauthorized { .. } => StatusCode::UNAUTHORIZED,
            AppError::NotFound { .. } => StatusCode::NOT_FOUND,
            AppError::Unprocessable { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::InternalError(_) | AppError::ConfigError(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Machine-readable error code carried in the response envelope.
    pub fn code(&self) -> &'static str {
        match self {
            AppError::ValidationError { .. } => "VALIDATION_ERROR",
            AppError::InvalidParameter(_) => "INVALID_PARAMETER",
            AppError::BadRequest { code, .. }
            | AppError::Unauthorized { code, .. }
            | AppError::NotFound { code, .. }
            | AppError::Unprocessable { code, .. } => code,
            AppError::InternalError(_) | AppError::ConfigError(_) => "INTERNAL_SERVER_ERROR",
        }
    }
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        AppError::ConfigError(anyhow::Error::new(err))
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::InternalError(anyhow::Error::new(err))
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        #[derive(Serialize)]
        #[serde(rename_all = "camelCase")]
        struct ErrorBody {
            code: &'static str,
            message: String,
            timestamp: String,
            correlation_id: String,
            #[serde(skip_serializing_if = "Option::is_none")]
            details: Option<Vec<FieldError>>,
        }

        #[derive(Serialize)]
        struct ErrorEnvelope {
            error: ErrorBody,
        }

        let status = self.status();
        let code = self.code();

        let (message, details) = match self {
            AppError::ValidationError { message, details } => (message, Some(details)),
            AppError::InvalidParameter(message)
            | AppError::BadRequest { message, .. }
            | AppError::Unauthorized { message, .. }
            | AppError::NotFound { message, .. }
            | AppError::Unprocessable { message, .. } => (message, None),
            AppError::InternalError(err) | AppError::ConfigError(err) => {
                tracing::error!(error = ?err, "Unhandled error while serving request");
                ("An unexpected error occurred".to_string(), None)
            }
        };

        if status.is_client_error() {
            tracing::debug!(code, %message, "Request rejected");
        }

        let body = ErrorEnvelope {
            error: ErrorBody {
                code,
                message,
                timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
                correlation_id: current_correlation_id()
                    .unwrap_or_else(|| uuid::Uuid::new_v4().to_string()),
                details,
            },
        };

        (status, Json(body)).into_response()
    }
}
