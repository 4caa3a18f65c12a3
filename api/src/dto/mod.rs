//! Request and response bodies

pub mod auth;
pub mod users;

use std::borrow::Cow;

use validator::ValidationError;

use tg_shared::utils::{is_valid_phone_number, validation};

fn invalid(code: &'static str, message: &'static str) -> ValidationError {
    let mut error = ValidationError::new(code);
    error.message = Some(Cow::Borrowed(message));
    error
}

pub(crate) fn validate_username(username: &str) -> Result<(), ValidationError> {
    if validation::is_valid_username(username) {
        Ok(())
    } else {
        Err(invalid(
            "username",
            "Username must be 3-150 characters: letters, digits and _ . + - only.",
        ))
    }
}

/// Syntax only; the allowed-domain list is applied by the handlers
pub(crate) fn validate_email_syntax(email: &str) -> Result<(), ValidationError> {
    if validation::is_valid_email(email, &[]) {
        Ok(())
    } else {
        Err(invalid("email", "Enter a valid email address."))
    }
}

pub(crate) fn validate_phone_number(phone_number: &str) -> Result<(), ValidationError> {
    if is_valid_phone_number(phone_number) {
        Ok(())
    } else {
        Err(invalid("phone_number", "Enter a valid mobile number."))
    }
}

pub(crate) fn validate_password(password: &str) -> Result<(), ValidationError> {
    match validation::password_violations(password).first() {
        None => Ok(()),
        Some(message) => Err(invalid("password", *message)),
    }
}

pub(crate) fn validate_code(code: &str) -> Result<(), ValidationError> {
    if validation::is_valid_code(code) {
        Ok(())
    } else {
        Err(invalid("code", "Code must be exactly 6 digits."))
    }
}
