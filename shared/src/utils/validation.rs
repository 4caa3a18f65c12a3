//! Field validation rules for account data

use once_cell::sync::Lazy;
use regex::Regex;

/// Special characters accepted (and one required) in passwords
pub const PASSWORD_SPECIAL_CHARS: &str = "!@#$%^&*()_+";

/// Minimum password length
pub const PASSWORD_MIN_LENGTH: usize = 8;

/// Number of digits in a verification code
pub const CODE_LENGTH: usize = 6;

static USERNAME_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-zA-Z0-9_.+-]+$").expect("valid username regex"));

static EMAIL_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$").expect("valid email regex")
});

/// Usernames are 3-150 characters of letters, digits and `_ . + -`
pub fn is_valid_username(username: &str) -> bool {
    (3..=150).contains(&username.chars().count()) && USERNAME_REGEX.is_match(username)
}

/// Check email syntax and, when `allowed_domains` is not empty, the domain
pub fn is_valid_email(email: &str, allowed_domains: &[String]) -> bool {
    if !EMAIL_REGEX.is_match(email) {
        return false;
    }
    if allowed_domains.is_empty() {
        return true;
    }
    match email.rsplit_once('@') {
        Some((_, domain)) => allowed_domains
            .iter()
            .any(|allowed| allowed.eq_ignore_ascii_case(domain)),
        None => false,
    }
}

/// Return the password rules `password` breaks, empty when it is acceptable
pub fn password_violations(password: &str) -> Vec<&'static str> {
    let mut violations = Vec::new();
    if password.chars().count() < PASSWORD_MIN_LENGTH {
        violations.push("Password must be at least 8 characters long.");
    }
    if !password.chars().any(|c| c.is_ascii_lowercase()) {
        violations.push("Password must contain at least one lowercase letter.");
    }
    if !password.chars().any(|c| c.is_ascii_uppercase()) {
        violations.push("Password must contain at least one uppercase letter.");
    }
    if !password.chars().any(|c| c.is_ascii_digit()) {
        violations.push("Password must contain at least one digit.");
    }
    if !password.chars().any(|c| PASSWORD_SPECIAL_CHARS.contains(c)) {
        violations.push("Password must contain at least one special character (!@#$%^&*()_+).");
    }
    violations
}

pub fn is_strong_password(password: &str) -> bool {
    password_violations(password).is_empty()
}

/// Verification codes are exactly six ASCII digits
pub fn is_valid_code(code: &str) -> bool {
    code.len() == CODE_LENGTH && code.bytes().all(|b| b.is_ascii_digit())
}

/// Mask an email for logs: `alice@gmail.com` becomes `a***@gmail.com`
pub fn mask_email(email: &str) -> String {
    match email.split_once('@') {
        Some((local, domain)) => {
            let first = local.chars().next().map(String::from).unwrap_or_default();
            format!("{}***@{}", first, domain)
        }
        None => "***".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn default_domains() -> Vec<String> {
        vec!["gmail.com".to_string(), "yahoo.com".to_string()]
    }

    #[test]
    fn test_username_rules() {
        assert!(is_valid_username("alice_01"));
        assert!(is_valid_username("a.b+c-d"));
        assert!(!is_valid_username("al"));
        assert!(!is_valid_username("alice smith"));
        assert!(!is_valid_username("alice!"));
    }

    #[test]
    fn test_email_domain_restriction() {
        let domains = default_domains();
        assert!(is_valid_email("a@gmail.com", &domains));
        assert!(is_valid_email("bob.smith@YAHOO.com", &domains));
        assert!(!is_valid_email("bob@x.com", &domains));
        assert!(!is_valid_email("not-an-email", &domains));
    }

    #[test]
    fn test_email_without_restriction() {
        assert!(is_valid_email("bob@x.com", &[]));
        assert!(!is_valid_email("bob@", &[]));
    }

    #[test]
    fn test_password_rules() {
        assert!(is_strong_password("Secret#123"));
        assert!(!is_strong_password("secret#123"));
        assert!(!is_strong_password("SECRET#123"));
        assert!(!is_strong_password("Secret1234"));
        assert!(!is_strong_password("Sec#1"));
        assert_eq!(password_violations("abc").len(), 4);
    }

    #[test]
    fn test_code_format() {
        assert!(is_valid_code("012345"));
        assert!(!is_valid_code("12345"));
        assert!(!is_valid_code("1234567"));
        assert!(!is_valid_code("12a456"));
    }

    #[test]
    fn test_mask_email() {
        assert_eq!(mask_email("alice@gmail.com"), "a***@gmail.com");
        assert_eq!(mask_email("broken"), "***");
    }
}
