//! Mapping from domain errors to HTTP responses
//!
//! Client errors carry the core's [`ErrorResponse`] body. Anything that maps
//! to a 5xx is logged and answered with a fixed generic body so internal
//! details never reach the client.

use std::collections::HashMap;

use actix_web::{
    error::{InternalError, JsonPayloadError, QueryPayloadError},
    http::{header, StatusCode},
    HttpRequest, HttpResponse, ResponseError,
};
use serde_json::json;
use tracing::error;
use validator::ValidationErrors;

use tg_core::errors::{AuthError, DomainError, ErrorResponse, TokenError};

pub const INTERNAL_ERROR_MESSAGE: &str = "Internal Server Error. Please try again later.";

/// Error type returned by handlers
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error("Invalid request data")]
    Validation(#[from] ValidationErrors),

    /// Malformed body or query string
    #[error("{0}")]
    BadRequest(String),
}

pub type ApiResult<T> = Result<T, ApiError>;

impl ApiError {
    /// Field error raised by a handler-level check
    pub fn field(field: &str, message: &str) -> Self {
        Self::Domain(tg_core::errors::ValidationError::field(field, message).into())
    }
}

/// HTTP status for a domain error
pub fn status_for(error: &DomainError) -> StatusCode {
    match error {
        DomainError::Validation { .. } | DomainError::ValidationErr(_) => StatusCode::BAD_REQUEST,
        DomainError::NotFound { .. } => StatusCode::NOT_FOUND,
        DomainError::Unauthorized => StatusCode::UNAUTHORIZED,
        DomainError::Forbidden => StatusCode::FORBIDDEN,
        DomainError::Auth(AuthError::TooManyAttempts { .. }) => StatusCode::FORBIDDEN,
        DomainError::Auth(_) => StatusCode::BAD_REQUEST,
        DomainError::Token(TokenError::TokenGenerationFailed) => StatusCode::INTERNAL_SERVER_ERROR,
        DomainError::Token(_) => StatusCode::UNAUTHORIZED,
        DomainError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

pub fn domain_error_response(error: &DomainError) -> HttpResponse {
    let status = status_for(error);
    if status.is_server_error() {
        error!(error = %error, event = "request_failed", "Unhandled error while serving request");
        return internal_error_response();
    }

    let mut builder = HttpResponse::build(status);
    if let DomainError::Auth(AuthError::TooManyAttempts {
        retry_after_seconds,
    }) = error
    {
        builder.insert_header((header::RETRY_AFTER, retry_after_seconds.to_string()));
    }
    builder.json(ErrorResponse::from(error))
}

/// The generic 500 body
pub fn internal_error_response() -> HttpResponse {
    HttpResponse::InternalServerError().json(json!({
        "error": INTERNAL_ERROR_MESSAGE,
        "status_code": 500,
    }))
}

fn validation_error_response(errors: &ValidationErrors) -> HttpResponse {
    let details: HashMap<String, serde_json::Value> = errors
        .field_errors()
        .into_iter()
        .map(|(field, errors)| {
            let messages: Vec<String> = errors
                .iter()
                .map(|e| {
                    e.message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| e.code.to_string())
                })
                .collect();
            (field.to_string(), json!(messages))
        })
        .collect();

    HttpResponse::BadRequest().json(
        ErrorResponse::new("VALIDATION_ERROR", "Invalid request data").with_details(details),
    )
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::Domain(error) => status_for(error),
            Self::Validation(_) | Self::BadRequest(_) => StatusCode::BAD_REQUEST,
        }
    }

    fn error_response(&self) -> HttpResponse {
        match self {
            Self::Domain(error) => domain_error_response(error),
            Self::Validation(errors) => validation_error_response(errors),
            Self::BadRequest(message) => HttpResponse::BadRequest()
                .json(ErrorResponse::new("VALIDATION_ERROR", message.as_str())),
        }
    }
}

/// `JsonConfig` error handler: malformed bodies become 400 validation errors
pub fn json_error_handler(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    let response = ApiError::BadRequest(format!("Invalid JSON body: {}", err)).error_response();
    InternalError::from_response(err, response).into()
}

/// `QueryConfig` error handler
pub fn query_error_handler(err: QueryPayloadError, _req: &HttpRequest) -> actix_web::Error {
    let response = ApiError::BadRequest(format!("Invalid query string: {}", err)).error_response();
    InternalError::from_response(err, response).into()
}
