//! Configuration for the authentication flows

use crate::services::verification::VerificationServiceConfig;

/// Configuration for the authentication service
#[derive(Debug, Clone)]
pub struct AuthServiceConfig {
    /// Code lifetime, attempt threshold and block cooldown
    pub verification: VerificationServiceConfig,
    /// Subject line of the verification mail
    pub mail_subject: String,
}

impl Default for AuthServiceConfig {
    fn default() -> Self {
        Self {
            verification: VerificationServiceConfig::default(),
            mail_subject: "Verification Code".to_string(),
        }
    }
}
