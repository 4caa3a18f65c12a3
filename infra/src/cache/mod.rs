//! Cache module for Redis-based ephemeral state
//!
//! [`RedisClient`] owns the multiplexed connection and exposes the handful of
//! commands the core needs; [`RedisStore`] adapts it to the core's
//! `EphemeralStore` trait.

pub mod redis_client;
pub mod redis_store;

#[cfg(test)]
mod tests;

pub use redis_client::RedisClient;
pub use redis_store::RedisStore;

// Re-export commonly used types
pub use tg_shared::config::CacheConfig;
