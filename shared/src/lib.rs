//! Shared utilities and common types for the Tollgate server
//!
//! This crate provides common functionality used across all server modules:
//! - Configuration types loaded from the environment
//! - Field validators shared by the API layer and the core
//! - Pagination and response wrappers

pub mod config;
pub mod types;
pub mod utils;

// Re-export commonly used items at crate root
pub use config::{
    AppConfig, AuthConfig, CacheConfig, DatabaseConfig, MailConfig, ServerConfig,
    ThrottleConfig, VerificationConfig,
};
pub use types::{MessageResponse, PaginatedResponse, Pagination};
pub use utils::validation;
