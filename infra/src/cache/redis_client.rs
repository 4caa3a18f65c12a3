//! Redis client implementation
//!
//! Wraps a multiplexed connection and exposes the commands the ephemeral
//! store needs: conditional and unconditional set with expiry, counters,
//! existence, TTL and delete. Connecting is retried with exponential backoff
//! at startup; individual commands are not retried, since `INCR` is not
//! idempotent and a failed command must surface to the caller.

use redis::{aio::MultiplexedConnection, AsyncCommands, Client};
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, error, info, warn};

use crate::cache::CacheConfig;
use crate::InfrastructureError;

/// Upper bound for the backoff between connection attempts
const MAX_RETRY_DELAY_MS: u64 = 5000;

/// Redis client over one multiplexed connection
///
/// Cloning is cheap; clones share the underlying connection.
#[derive(Clone)]
pub struct RedisClient {
    connection: MultiplexedConnection,
}

impl RedisClient {
    /// Connect to Redis, retrying per `config.max_retries` / `config.retry_delay_ms`
    ///
    /// # Example
    /// ```no_run
    /// use tg_infra::cache::{CacheConfig, RedisClient};
    ///
    /// async fn connect() -> Result<RedisClient, tg_infra::InfrastructureError> {
    ///     RedisClient::new(&CacheConfig::new("redis://localhost:6379")).await
    /// }
    /// ```
    pub async fn new(config: &CacheConfig) -> Result<Self, InfrastructureError> {
        info!(url = %mask_url(&config.url), "Creating Redis client");

        let client = Client::open(config.url.as_str()).map_err(|e| {
            error!("Failed to parse Redis URL: {}", e);
            InfrastructureError::Config(format!("Invalid Redis URL: {}", e))
        })?;

        let connection =
            Self::connect_with_retry(&client, config.max_retries.max(1), config.retry_delay_ms)
                .await?;

        info!("Redis client created successfully");
        Ok(Self { connection })
    }

    async fn connect_with_retry(
        client: &Client,
        max_retries: u32,
        retry_delay_ms: u64,
    ) -> Result<MultiplexedConnection, InfrastructureError> {
        let mut attempts = 0;
        let mut delay = retry_delay_ms;

        loop {
            attempts += 1;
            debug!("Attempting to connect to Redis (attempt {})", attempts);

            match client.get_multiplexed_async_connection().await {
                Ok(connection) => {
                    info!("Successfully connected to Redis");
                    return Ok(connection);
                }
                Err(e) if attempts < max_retries => {
                    warn!(
                        "Failed to connect to Redis (attempt {}/{}): {}. Retrying in {}ms...",
                        attempts, max_retries, e, delay
                    );
                    sleep(Duration::from_millis(delay)).await;
                    delay = (delay * 2).min(MAX_RETRY_DELAY_MS);
                }
                Err(e) => {
                    error!("Failed to connect to Redis after {} attempts: {}", attempts, e);
                    return Err(InfrastructureError::Cache(e));
                }
            }
        }
    }

    /// `SET key value NX EX ttl`; true when the value was stored
    pub async fn set_nx_ex(
        &self,
        key: &str,
        value: &str,
        ttl_seconds: u64,
    ) -> Result<bool, InfrastructureError> {
        let mut conn = self.connection.clone();
        let reply: Option<String> = redis::cmd("SET")
            .arg(key)
            .arg(value)
            .arg("NX")
            .arg("EX")
            .arg(ttl_seconds.max(1))
            .query_async(&mut conn)
            .await?;

        let stored = reply.is_some();
        debug!(key, stored, "SET NX EX");
        Ok(stored)
    }

    /// Set a value with expiration time
    pub async fn set_with_expiry(
        &self,
        key: &str,
        value: &str,
        expiry_seconds: u64,
    ) -> Result<(), InfrastructureError> {
        let mut conn = self.connection.clone();
        conn.set_ex::<_, _, ()>(key, value, expiry_seconds.max(1))
            .await?;
        debug!(key, expiry_seconds, "SET EX");
        Ok(())
    }

    pub async fn get(&self, key: &str) -> Result<Option<String>, InfrastructureError> {
        let mut conn = self.connection.clone();
        Ok(conn.get::<_, Option<String>>(key).await?)
    }

    /// `INCR`, attaching `expiry_seconds` when the counter has no expiry yet
    ///
    /// Both commands run in one `MULTI`/`EXEC`, so a counter is never left
    /// without a TTL.
    pub async fn increment(
        &self,
        key: &str,
        expiry_seconds: u64,
    ) -> Result<i64, InfrastructureError> {
        let mut conn = self.connection.clone();
        let (count,): (i64,) = increment_pipeline(key, expiry_seconds)
            .query_async(&mut conn)
            .await?;

        debug!(key, count, "Counter incremented");
        Ok(count)
    }

    pub async fn exists(&self, key: &str) -> Result<bool, InfrastructureError> {
        let mut conn = self.connection.clone();
        Ok(conn.exists::<_, bool>(key).await?)
    }

    /// Remaining TTL; `None` when the key is missing or has no expiry
    pub async fn ttl(&self, key: &str) -> Result<Option<i64>, InfrastructureError> {
        let mut conn = self.connection.clone();
        let ttl: i64 = conn.ttl(key).await?;
        Ok(ttl_from_reply(ttl))
    }

    /// Delete keys, returning how many existed
    pub async fn delete(&self, keys: &[String]) -> Result<u64, InfrastructureError> {
        if keys.is_empty() {
            return Ok(0);
        }
        let mut conn = self.connection.clone();
        let removed: u64 = conn.del(keys).await?;
        debug!(requested = keys.len(), removed, "Keys deleted");
        Ok(removed)
    }

    /// Check connectivity with `PING`
    pub async fn health_check(&self) -> Result<bool, InfrastructureError> {
        let mut conn = self.connection.clone();
        let response: String = redis::cmd("PING").query_async(&mut conn).await?;

        if response == "PONG" {
            Ok(true)
        } else {
            warn!("Redis health check returned unexpected response: {}", response);
            Ok(false)
        }
    }
}

/// `INCR key` followed by `EXPIRE key ttl NX` in an atomic pipeline
pub(crate) fn increment_pipeline(key: &str, expiry_seconds: u64) -> redis::Pipeline {
    let mut pipe = redis::pipe();
    pipe.atomic()
        .incr(key, 1)
        .cmd("EXPIRE")
        .arg(key)
        .arg(expiry_seconds.max(1))
        .arg("NX")
        .ignore();
    pipe
}

/// Interpret a `TTL` reply: -2 means missing, -1 means no expiry
pub(crate) fn ttl_from_reply(ttl: i64) -> Option<i64> {
    (ttl >= 0).then_some(ttl)
}

/// Mask credentials in a Redis URL for logging
pub(crate) fn mask_url(url: &str) -> String {
    if let (Some(at_pos), Some(proto_end)) = (url.rfind('@'), url.find("://")) {
        if at_pos > proto_end {
            return format!("{}****{}", &url[..proto_end + 3], &url[at_pos..]);
        }
    }
    url.to_string()
}
