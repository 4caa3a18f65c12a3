//! Redis-backed ephemeral store

use async_trait::async_trait;

use tg_core::errors::DomainResult;
use tg_core::services::verification::EphemeralStore;

use super::RedisClient;

/// [`EphemeralStore`] over Redis, optionally namespacing every key
#[derive(Clone)]
pub struct RedisStore {
    client: RedisClient,
    key_prefix: Option<String>,
}

impl RedisStore {
    pub fn new(client: RedisClient, key_prefix: Option<String>) -> Self {
        Self { client, key_prefix }
    }

    pub fn client(&self) -> &RedisClient {
        &self.client
    }

    fn key(&self, key: &str) -> String {
        namespaced(self.key_prefix.as_deref(), key)
    }
}

pub(crate) fn namespaced(prefix: Option<&str>, key: &str) -> String {
    match prefix {
        Some(prefix) => format!("{}:{}", prefix.trim_end_matches(':'), key),
        None => key.to_string(),
    }
}

#[async_trait]
impl EphemeralStore for RedisStore {
    async fn set_if_absent(&self, key: &str, value: &str, ttl_seconds: u64) -> DomainResult<bool> {
        Ok(self.client.set_nx_ex(&self.key(key), value, ttl_seconds).await?)
    }

    async fn set_with_expiry(&self, key: &str, value: &str, ttl_seconds: u64) -> DomainResult<()> {
        Ok(self
            .client
            .set_with_expiry(&self.key(key), value, ttl_seconds)
            .await?)
    }

    async fn get(&self, key: &str) -> DomainResult<Option<String>> {
        Ok(self.client.get(&self.key(key)).await?)
    }

    async fn increment(&self, key: &str, ttl_on_create: u64) -> DomainResult<i64> {
        Ok(self.client.increment(&self.key(key), ttl_on_create).await?)
    }

    async fn exists(&self, key: &str) -> DomainResult<bool> {
        Ok(self.client.exists(&self.key(key)).await?)
    }

    async fn ttl(&self, key: &str) -> DomainResult<Option<i64>> {
        Ok(self.client.ttl(&self.key(key)).await?)
    }

    async fn delete(&self, keys: &[String]) -> DomainResult<u64> {
        let keys: Vec<String> = keys.iter().map(|key| self.key(key)).collect();
        Ok(self.client.delete(&keys).await?)
    }
}
