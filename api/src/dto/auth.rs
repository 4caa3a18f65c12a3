use serde::{Deserialize, Serialize};
use validator::Validate;

use tg_core::{RegistrationRequest, TokenPair, UserProfile};

use super::{
    validate_code, validate_email_syntax, validate_password, validate_phone_number,
    validate_username,
};

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(custom = "validate_email_syntax")]
    pub email: String,
    #[validate(length(min = 1, message = "This field may not be blank."))]
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(custom = "validate_username")]
    pub username: String,
    #[validate(custom = "validate_email_syntax")]
    pub email: String,
    #[validate(custom = "validate_phone_number")]
    pub phone_number: String,
    #[validate(custom = "validate_password")]
    pub password: String,
    #[validate(must_match(other = "password", message = "Passwords don't match."))]
    pub password2: String,
}

impl RegisterRequest {
    pub fn into_registration(self) -> RegistrationRequest {
        RegistrationRequest {
            username: self.username,
            email: self.email,
            phone_number: self.phone_number,
            password: self.password,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct VerifyCodeRequest {
    #[validate(custom = "validate_code")]
    pub code: String,
}

/// Body returned once a code is verified
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerifyCodeResponse {
    pub message: String,
    pub tokens: TokenPair,
    pub user: UserProfile,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn register_request() -> RegisterRequest {
        RegisterRequest {
            username: "alice".to_string(),
            email: "alice@gmail.com".to_string(),
            phone_number: "09121234567".to_string(),
            password: "Str0ng!Pass".to_string(),
            password2: "Str0ng!Pass".to_string(),
        }
    }

    #[test]
    fn test_register_request_valid() {
        assert!(register_request().validate().is_ok());
    }

    #[test]
    fn test_register_request_field_errors() {
        let request = RegisterRequest {
            username: "a b".to_string(),
            phone_number: "12345".to_string(),
            password2: "Other!Pass1".to_string(),
            ..register_request()
        };

        let errors = request.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("username"));
        assert!(fields.contains_key("phone_number"));
        assert!(fields.contains_key("password2"));
        assert!(!fields.contains_key("email"));
    }

    #[test]
    fn test_weak_password_reports_rule() {
        let request = RegisterRequest {
            password: "weakpass".to_string(),
            password2: "weakpass".to_string(),
            ..register_request()
        };

        let errors = request.validate().unwrap_err();
        let message = errors.field_errors()["password"][0].message.clone().unwrap();
        assert_eq!(message, "Password must contain at least one uppercase letter.");
    }

    #[test]
    fn test_verify_code_shape() {
        assert!(VerifyCodeRequest { code: "012345".into() }.validate().is_ok());
        assert!(VerifyCodeRequest { code: "12345".into() }.validate().is_err());
        assert!(VerifyCodeRequest { code: "12345a".into() }.validate().is_err());
    }
}
