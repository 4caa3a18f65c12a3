//! Collaborator traits consumed by the verification flows

use async_trait::async_trait;

use crate::errors::DomainResult;

/// Short-lived key-value store holding codes, counters, blocks and pending actions
///
/// Every mutation the core relies on for correctness under concurrency is a
/// single atomic store primitive (`set_if_absent`, `increment`), never a
/// read followed by a write.
#[async_trait]
pub trait EphemeralStore: Send + Sync {
    /// Store `value` only if `key` holds no live value. Returns whether it was stored.
    async fn set_if_absent(&self, key: &str, value: &str, ttl_seconds: u64) -> DomainResult<bool>;

    /// Store `value`, replacing any previous value and expiry
    async fn set_with_expiry(&self, key: &str, value: &str, ttl_seconds: u64) -> DomainResult<()>;

    async fn get(&self, key: &str) -> DomainResult<Option<String>>;

    /// Atomically add one and return the new value; a counter created by this
    /// call expires after `ttl_on_create` seconds
    async fn increment(&self, key: &str, ttl_on_create: u64) -> DomainResult<i64>;

    async fn exists(&self, key: &str) -> DomainResult<bool>;

    /// Remaining lifetime in seconds; `None` when the key is missing or never expires
    async fn ttl(&self, key: &str) -> DomainResult<Option<i64>>;

    /// Remove keys, returning how many existed
    async fn delete(&self, keys: &[String]) -> DomainResult<u64>;
}

/// Outbound mail delivery
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, to: &str, subject: &str, body: &str) -> DomainResult<()>;
}
