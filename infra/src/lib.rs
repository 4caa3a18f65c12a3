//! # Infrastructure Layer
//!
//! Concrete collaborators for the Tollgate core:
//!
//! - **Cache**: Redis-backed [`EphemeralStore`](tg_core::EphemeralStore) for
//!   codes, attempt counters, block markers, pending actions and sessions
//! - **Database**: MySQL user directory using SQLx
//! - **Mail**: transactional mail API client and a logging transport
//!
//! ## Features
//!
//! - `mysql`: Enable MySQL database support (default)
//! - `redis-cache`: Enable Redis support (default)

use tg_core::errors::DomainError;

/// Cache module - Redis client and the ephemeral store built on it
#[cfg(feature = "redis-cache")]
pub mod cache;

/// Database module - MySQL implementations using SQLx
#[cfg(feature = "mysql")]
pub mod database;

/// Mail module - verification code delivery
pub mod mail;

/// Infrastructure-specific error types
#[derive(Debug, thiserror::Error)]
pub enum InfrastructureError {
    /// Database connection or query error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Redis error
    #[error("Cache error: {0}")]
    Cache(#[from] redis::RedisError),

    /// HTTP request error for external services
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Mail provider rejected a message
    #[error("Mail delivery error: {0}")]
    Mail(String),
}

impl From<InfrastructureError> for DomainError {
    fn from(err: InfrastructureError) -> Self {
        DomainError::internal(err.to_string())
    }
}
