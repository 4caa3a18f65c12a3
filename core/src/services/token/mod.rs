//! Token service module for JWT management
//!
//! Mints HS256 access/refresh pairs for an authenticated account and
//! verifies bearer tokens presented on later requests.

mod config;
mod service;


pub use config::TokenServiceConfig;
pub use service::TokenService;
