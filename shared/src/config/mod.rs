//! Configuration module with business-specific sub-modules
//!
//! - `auth` - JWT signing and session cookie configuration
//! - `bootstrap` - Superuser created at startup
//! - `cache` - Redis connection configuration
//! - `database` - MySQL connection pool configuration
//! - `mail` - Outbound mail provider configuration
//! - `server` - HTTP server configuration
//! - `verification` - OTP lifetime, abuse guard and transport throttle limits

pub mod auth;
pub mod bootstrap;
pub mod cache;
pub mod database;
pub mod mail;
pub mod server;
pub mod verification;

use std::str::FromStr;

use serde::{Deserialize, Serialize};

pub use auth::{AuthConfig, JwtConfig, SessionConfig};
pub use bootstrap::SuperuserConfig;
pub use cache::CacheConfig;
pub use database::DatabaseConfig;
pub use mail::MailConfig;
pub use server::ServerConfig;
pub use verification::{ThrottleConfig, VerificationConfig};

/// Complete application configuration combining all sub-configurations
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub cache: CacheConfig,
    pub auth: AuthConfig,
    pub verification: VerificationConfig,
    pub throttle: ThrottleConfig,
    pub mail: MailConfig,
    #[serde(default)]
    pub superuser: Option<SuperuserConfig>,
}

impl AppConfig {
    /// Load every section from environment variables, falling back to defaults
    pub fn from_env() -> Self {
        Self {
            server: ServerConfig::from_env(),
            database: DatabaseConfig::from_env(),
            cache: CacheConfig::from_env(),
            auth: AuthConfig::from_env(),
            verification: VerificationConfig::from_env(),
            throttle: ThrottleConfig::from_env(),
            mail: MailConfig::from_env(),
            superuser: SuperuserConfig::from_env(),
        }
    }
}

/// Read and parse an environment variable, using `default` when it is unset or unparsable
pub(crate) fn env_or<T: FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|value| value.trim().parse().ok())
        .unwrap_or(default)
}
