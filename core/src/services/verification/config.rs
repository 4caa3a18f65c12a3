//! Configuration for codes, the abuse guard and pending actions

use crate::domain::entities::verification_code::CODE_TTL_SECONDS;

/// Configuration shared by the verification components
#[derive(Debug, Clone)]
pub struct VerificationServiceConfig {
    /// Lifetime of an issued code
    pub code_ttl_seconds: u64,
    /// Lifetime of a pending action; outlives the code so a late verify
    /// reports the expired code rather than a lost session
    pub pending_ttl_seconds: u64,
    /// Attempts tolerated per key; the next one sets the block
    pub max_attempts: i64,
    /// Block cooldown, also the lifetime of an attempt counter
    pub block_seconds: u64,
    /// Prefix for code keys in the store
    pub code_key_prefix: String,
    /// Prefix for attempt counter keys in the store
    pub attempts_key_prefix: String,
    /// Prefix for block marker keys in the store
    pub block_key_prefix: String,
    /// Prefix for pending action keys in the store
    pub pending_key_prefix: String,
}

impl Default for VerificationServiceConfig {
    fn default() -> Self {
        Self {
            code_ttl_seconds: CODE_TTL_SECONDS,
            pending_ttl_seconds: 300,
            max_attempts: 3,
            block_seconds: 3600, // 1 hour
            code_key_prefix: "otp:".to_string(),
            attempts_key_prefix: "attempts:".to_string(),
            block_key_prefix: "block:".to_string(),
            pending_key_prefix: "pending:".to_string(),
        }
    }
}
