//! Verification code, abuse guard and transport throttle limits

use serde::{Deserialize, Serialize};

use super::env_or;

/// OTP and abuse-guard limits
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct VerificationConfig {
    /// Lifetime of an issued code
    pub code_ttl_seconds: u64,

    /// Lifetime of a parked login/registration between start and verify
    pub pending_ttl_seconds: u64,

    /// Attempts tolerated per identifier/address before a block is set
    pub max_attempts: i64,

    /// Block cooldown in seconds
    pub block_seconds: u64,
}

impl Default for VerificationConfig {
    fn default() -> Self {
        Self {
            code_ttl_seconds: 120,
            pending_ttl_seconds: 300,
            max_attempts: 3,
            block_seconds: 3600,
        }
    }
}

impl VerificationConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            code_ttl_seconds: env_or("OTP_CODE_TTL_SECONDS", defaults.code_ttl_seconds),
            pending_ttl_seconds: env_or("OTP_PENDING_TTL_SECONDS", defaults.pending_ttl_seconds),
            max_attempts: env_or("OTP_MAX_ATTEMPTS", defaults.max_attempts),
            block_seconds: env_or("OTP_BLOCK_SECONDS", defaults.block_seconds),
        }
    }
}

/// Per-scope request throttle applied to the start endpoints
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ThrottleConfig {
    /// Requests allowed per window for each scope and client address
    pub requests: u32,

    /// Window length in seconds
    pub window_seconds: u64,
}

impl Default for ThrottleConfig {
    fn default() -> Self {
        Self {
            requests: 3,
            window_seconds: 3600,
        }
    }
}

impl ThrottleConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            requests: env_or("THROTTLE_REQUESTS", defaults.requests),
            window_seconds: env_or("THROTTLE_WINDOW_SECONDS", defaults.window_seconds),
        }
    }
}
