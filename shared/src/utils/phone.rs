//! Phone number utilities

use once_cell::sync::Lazy;
use regex::Regex;

// Mobile numbers in local format: 09 + operator prefix + 7 digits
static MOBILE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^09(1[0-9]|3[0-9]|2[0-9]|0[1-9]|9[0-9])[0-9]{7}$").expect("valid mobile regex")
});

/// Check if a phone number is a valid mobile number
pub fn is_valid_phone_number(phone: &str) -> bool {
    MOBILE_REGEX.is_match(phone)
}

/// Mask a phone number for logs, keeping the operator prefix and last 2 digits
pub fn mask_phone_number(phone: &str) -> String {
    let digits: Vec<char> = phone.chars().collect();
    if digits.len() < 7 {
        return "*".repeat(digits.len());
    }
    let head: String = digits[..4].iter().collect();
    let tail: String = digits[digits.len() - 2..].iter().collect();
    format!("{}{}{}", head, "*".repeat(digits.len() - 6), tail)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_mobile_numbers() {
        assert!(is_valid_phone_number("09123456789"));
        assert!(is_valid_phone_number("09351234567"));
        assert!(is_valid_phone_number("09011234567"));
        assert!(is_valid_phone_number("09901234567"));
    }

    #[test]
    fn test_invalid_mobile_numbers() {
        assert!(!is_valid_phone_number("0912345678"));
        assert!(!is_valid_phone_number("091234567890"));
        assert!(!is_valid_phone_number("09001234567"));
        assert!(!is_valid_phone_number("08123456789"));
        assert!(!is_valid_phone_number("+989123456789"));
    }

    #[test]
    fn test_mask() {
        assert_eq!(mask_phone_number("09123456789"), "0912*****89");
        assert_eq!(mask_phone_number("123"), "***");
    }
}
