//! One-time verification codes.

use chrono::{DateTime, Duration, Utc};
use constant_time_eq::constant_time_eq;
use rand::rngs::OsRng;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Length of the verification code
pub const CODE_LENGTH: usize = 6;

/// Lifetime of an issued code in seconds
pub const CODE_TTL_SECONDS: u64 = 120;

/// A code as it is held in the ephemeral store
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssuedCode {
    pub code: String,
    pub issued_at: DateTime<Utc>,
}

impl IssuedCode {
    /// Creates a fresh random code stamped with the current time
    pub fn generate() -> Self {
        Self {
            code: Self::generate_code(),
            issued_at: Utc::now(),
        }
    }

    /// Six decimal digits from the OS RNG, leading zeros allowed
    pub fn generate_code() -> String {
        let value: u32 = OsRng.gen_range(0..1_000_000);
        format!("{:06}", value)
    }

    /// Constant-time comparison against user input
    pub fn matches(&self, entered: &str) -> bool {
        constant_time_eq(self.code.as_bytes(), entered.as_bytes())
    }

    /// Whether the code is younger than `ttl_seconds` at `now`
    pub fn is_fresh_at(&self, now: DateTime<Utc>, ttl_seconds: u64) -> bool {
        now - self.issued_at < Duration::seconds(ttl_seconds as i64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_code_format() {
        for _ in 0..200 {
            let code = IssuedCode::generate_code();
            assert_eq!(code.len(), CODE_LENGTH);
            assert!(code.chars().all(|c| c.is_ascii_digit()));
        }
    }

    #[test]
    fn test_matches() {
        let issued = IssuedCode {
            code: "482913".to_string(),
            issued_at: Utc::now(),
        };
        assert!(issued.matches("482913"));
        assert!(!issued.matches("482914"));
        assert!(!issued.matches("48291"));
    }

    #[test]
    fn test_freshness_window() {
        let issued_at = Utc::now();
        let issued = IssuedCode {
            code: "000001".to_string(),
            issued_at,
        };
        assert!(issued.is_fresh_at(issued_at + Duration::seconds(119), CODE_TTL_SECONDS));
        assert!(!issued.is_fresh_at(issued_at + Duration::seconds(120), CODE_TTL_SECONDS));
        assert!(!issued.is_fresh_at(issued_at + Duration::seconds(121), CODE_TTL_SECONDS));
    }
}
