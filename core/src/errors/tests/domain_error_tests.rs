//! Unit tests for domain error types

use crate::errors::{AuthError, DomainError, ErrorResponse, TokenError, ValidationError};

#[test]
fn test_invalid_credentials_message_is_generic() {
    let error = AuthError::InvalidCredentials;
    assert_eq!(error.to_string(), "Invalid Email or Password.");
    assert!(!error.to_string().to_lowercase().contains("not found"));
}

#[test]
fn test_too_many_attempts_carries_cooldown() {
    let error = DomainError::from(AuthError::TooManyAttempts {
        retry_after_seconds: 3599,
    });
    let response = ErrorResponse::from(&error);

    assert_eq!(response.error, "TOO_MANY_ATTEMPTS");
    assert!(response.message.contains("3599"));
    assert_eq!(response.details.unwrap()["retry_after_seconds"], 3599);
}

#[test]
fn test_duplicate_identity_is_field_level() {
    let error = DomainError::from(AuthError::DuplicateIdentity {
        field: "email".to_string(),
    });
    let response = ErrorResponse::from(&error);

    assert_eq!(response.error, "DUPLICATE_IDENTITY");
    assert_eq!(
        response.details.unwrap()["email"][0],
        "User with this email already exists"
    );
}

#[test]
fn test_token_error_conversion() {
    let response: ErrorResponse = TokenError::TokenExpired.into();
    assert_eq!(response.error, "TOKEN_EXPIRED");
    assert_eq!(response.message, "Token expired");
}

#[test]
fn test_validation_error_fields() {
    let error = ValidationError::field("new_password2", "Passwords do not match.");
    assert_eq!(error.field_name(), "new_password2");
    assert_eq!(error.message(), "Passwords do not match.");

    let required = ValidationError::RequiredField {
        field: "code".to_string(),
    };
    assert_eq!(required.message(), "This field is required.");
}

#[test]
fn test_internal_error_code() {
    let error = DomainError::internal("redis down");
    assert_eq!(error.error_code(), "INTERNAL_ERROR");
}
