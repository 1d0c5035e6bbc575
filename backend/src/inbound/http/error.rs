//! HTTP error envelope.
//!
//! Domain errors carry a transport-agnostic code; this module maps them to
//! status codes and a JSON body. Internal and infrastructure failures are
//! logged with their full message and redacted in the response.

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use serde::Serialize;
use serde_json::Value;
use tracing::error;
use utoipa::ToSchema;

use crate::domain::{DomainError, ErrorCode};

/// JSON error body returned by every failing endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ApiError {
    code: ErrorCode,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<Value>,
}

impl ApiError {
    /// The 401 response for requests without an authenticated session.
    pub fn unauthorized() -> Self {
        Self {
            code: ErrorCode::Unauthorized,
            message: "authentication required".to_owned(),
            details: None,
        }
    }

    /// Stable machine-readable error code.
    pub fn code(&self) -> ErrorCode {
        self.code
    }

    /// Message carried in the response body.
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl From<DomainError> for ApiError {
    fn from(error: DomainError) -> Self {
        match error.code() {
            // Redact anything the caller cannot act on; the full message
            // goes to the log only.
            ErrorCode::InternalError => {
                error!(message = %error.message(), "internal error");
                Self {
                    code: ErrorCode::InternalError,
                    message: "an internal error occurred".to_owned(),
                    details: None,
                }
            }
            ErrorCode::ServiceUnavailable => {
                error!(message = %error.message(), "dependency unavailable");
                Self {
                    code: ErrorCode::ServiceUnavailable,
                    message: "service temporarily unavailable".to_owned(),
                    details: None,
                }
            }
            code => Self {
                code,
                message: error.message().to_owned(),
                details: error.details().cloned(),
            },
        }
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self.code {
            ErrorCode::InvalidRequest => StatusCode::BAD_REQUEST,
            ErrorCode::Unauthorized => StatusCode::UNAUTHORIZED,
            ErrorCode::NotFound => StatusCode::NOT_FOUND,
            ErrorCode::Conflict => StatusCode::CONFLICT,
            ErrorCode::ServiceUnavailable => StatusCode::SERVICE_UNAVAILABLE,
            ErrorCode::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(self)
    }
}
