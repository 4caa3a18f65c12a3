//! Error types for authentication, tokens and field validation

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::DomainError;

/// Authentication and verification-flow errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// Identifier or client address is inside its block cooldown
    #[error("There have been many unsuccessful attempts. Try again in {retry_after_seconds} seconds.")]
    TooManyAttempts { retry_after_seconds: i64 },

    /// Shared by "unknown user" and "wrong password" so accounts cannot be enumerated
    #[error("Invalid Email or Password.")]
    InvalidCredentials,

    #[error("User with this {field} already exists")]
    DuplicateIdentity { field: String },

    /// No pending action for this session; the start step must be repeated
    #[error("Session expired")]
    SessionExpired,

    #[error("Code is expired or invalid")]
    InvalidOrExpiredCode,

    #[error("You are not logged in")]
    NotLoggedIn,
}

impl AuthError {
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::TooManyAttempts { .. } => "TOO_MANY_ATTEMPTS",
            Self::InvalidCredentials => "INVALID_CREDENTIALS",
            Self::DuplicateIdentity { .. } => "DUPLICATE_IDENTITY",
            Self::SessionExpired => "SESSION_EXPIRED",
            Self::InvalidOrExpiredCode => "INVALID_OR_EXPIRED_CODE",
            Self::NotLoggedIn => "NOT_LOGGED_IN",
        }
    }
}

/// JWT errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TokenError {
    #[error("Token expired")]
    TokenExpired,

    #[error("Invalid token format")]
    InvalidTokenFormat,

    #[error("Token not yet valid")]
    TokenNotYetValid,

    #[error("Invalid token claims")]
    InvalidClaims,

    #[error("Unexpected token type: expected {expected}")]
    WrongTokenType { expected: String },

    #[error("Token generation failed")]
    TokenGenerationFailed,
}

impl TokenError {
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::TokenExpired => "TOKEN_EXPIRED",
            Self::InvalidTokenFormat => "INVALID_TOKEN",
            Self::TokenNotYetValid => "TOKEN_NOT_YET_VALID",
            Self::InvalidClaims => "INVALID_CLAIMS",
            Self::WrongTokenType { .. } => "WRONG_TOKEN_TYPE",
            Self::TokenGenerationFailed => "TOKEN_GENERATION_FAILED",
        }
    }
}

/// Field-level validation failures raised by the core
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("{field}: {message}")]
    InvalidField { field: String, message: String },

    #[error("{field}: This field is required.")]
    RequiredField { field: String },
}

impl ValidationError {
    pub fn field(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidField {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Name of the offending field
    pub fn field_name(&self) -> &str {
        match self {
            Self::InvalidField { field, .. } | Self::RequiredField { field } => field,
        }
    }

    /// Human readable message without the field prefix
    pub fn message(&self) -> String {
        match self {
            Self::InvalidField { message, .. } => message.clone(),
            Self::RequiredField { .. } => "This field is required.".to_string(),
        }
    }
}

/// Serializable error body
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ErrorResponse {
    /// Machine-readable error code
    pub error: String,
    /// Human readable message
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<HashMap<String, serde_json::Value>>,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            message: message.into(),
            details: None,
        }
    }

    pub fn with_details(mut self, details: HashMap<String, serde_json::Value>) -> Self {
        self.details = Some(details);
        self
    }

    pub fn with_detail(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.details
            .get_or_insert_with(HashMap::new)
            .insert(key.into(), value);
        self
    }
}

impl From<&DomainError> for ErrorResponse {
    fn from(error: &DomainError) -> Self {
        let response = ErrorResponse::new(error.error_code(), error.to_string());
        match error {
            DomainError::Auth(AuthError::TooManyAttempts {
                retry_after_seconds,
            }) => response.with_detail("retry_after_seconds", serde_json::json!(retry_after_seconds)),
            DomainError::Auth(AuthError::DuplicateIdentity { field }) => {
                response.with_detail(field.clone(), serde_json::json!([error.to_string()]))
            }
            DomainError::ValidationErr(err) => response
                .with_detail(err.field_name().to_string(), serde_json::json!([err.message()])),
            _ => response,
        }
    }
}

impl From<AuthError> for ErrorResponse {
    fn from(error: AuthError) -> Self {
        ErrorResponse::from(&DomainError::Auth(error))
    }
}

impl From<TokenError> for ErrorResponse {
    fn from(error: TokenError) -> Self {
        ErrorResponse::from(&DomainError::Token(error))
    }
}
