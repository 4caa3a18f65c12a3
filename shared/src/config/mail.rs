//! Outbound mail configuration

use serde::{Deserialize, Serialize};

/// Mail delivery configuration
///
/// `provider` selects the transport: `http` posts to a transactional mail
/// API, `log` only writes the message to the log (development).
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MailConfig {
    pub provider: String,
    pub api_url: String,
    pub api_key: String,
    pub from_address: String,
    #[serde(default)]
    pub from_name: Option<String>,
    /// Domains accepted for account emails; empty accepts any domain
    #[serde(default)]
    pub allowed_domains: Vec<String>,
}

impl Default for MailConfig {
    fn default() -> Self {
        Self {
            provider: String::from("log"),
            api_url: String::from("https://api.brevo.com/v3/smtp/email"),
            api_key: String::new(),
            from_address: String::from("no-reply@tollgate.local"),
            from_name: None,
            allowed_domains: vec![String::from("gmail.com"), String::from("yahoo.com")],
        }
    }
}

impl MailConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let allowed_domains = match std::env::var("ALLOWED_EMAIL_DOMAINS") {
            Ok(raw) => raw
                .split(',')
                .map(|domain| domain.trim().to_lowercase())
                .filter(|domain| !domain.is_empty())
                .collect(),
            Err(_) => defaults.allowed_domains,
        };

        Self {
            provider: std::env::var("MAIL_PROVIDER").unwrap_or(defaults.provider),
            api_url: std::env::var("MAIL_API_URL").unwrap_or(defaults.api_url),
            api_key: std::env::var("MAIL_API_KEY").unwrap_or(defaults.api_key),
            from_address: std::env::var("MAIL_FROM_ADDRESS").unwrap_or(defaults.from_address),
            from_name: std::env::var("MAIL_FROM_NAME").ok(),
            allowed_domains,
        }
    }
}
