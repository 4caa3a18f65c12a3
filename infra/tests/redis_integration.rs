//! Integration tests for the Redis-backed ephemeral store
//!
//! These tests require a running Redis instance.
//! Run with: cargo test -p tg_infra --test redis_integration -- --ignored

use std::time::Duration;

use tg_core::services::verification::{
    AbuseGuard, CodeGenerator, EphemeralStore, VerificationServiceConfig,
};
use tg_infra::cache::{CacheConfig, RedisClient, RedisStore};

async fn store(namespace: &str) -> RedisStore {
    let config = CacheConfig::new(
        std::env::var("REDIS_URL").unwrap_or_else(|_| "redis://localhost:6379".to_string()),
    );
    let client = RedisClient::new(&config).await.expect("Redis must be running");
    RedisStore::new(client, Some(format!("tg-test:{}:{}", namespace, uuid::Uuid::new_v4())))
}

#[tokio::test]
#[ignore] // Requires Redis server
async fn test_set_if_absent_and_expiry() {
    let store = store("set").await;

    assert!(store.set_if_absent("otp:a@gmail.com", "one", 1).await.unwrap());
    assert!(!store.set_if_absent("otp:a@gmail.com", "two", 1).await.unwrap());
    assert_eq!(store.get("otp:a@gmail.com").await.unwrap().as_deref(), Some("one"));

    tokio::time::sleep(Duration::from_millis(1100)).await;
    assert_eq!(store.get("otp:a@gmail.com").await.unwrap(), None);
}

#[tokio::test]
#[ignore] // Requires Redis server
async fn test_counter_gets_expiry_on_creation() {
    let store = store("incr").await;

    assert_eq!(store.increment("attempts:1.2.3.4", 3600).await.unwrap(), 1);
    assert_eq!(store.increment("attempts:1.2.3.4", 3600).await.unwrap(), 2);

    let ttl = store.ttl("attempts:1.2.3.4").await.unwrap().unwrap();
    assert!(ttl > 3590 && ttl <= 3600);

    let removed = store
        .delete(&["attempts:1.2.3.4".to_string(), "attempts:missing".to_string()])
        .await
        .unwrap();
    assert_eq!(removed, 1);
    assert!(!store.exists("attempts:1.2.3.4").await.unwrap());
}

#[tokio::test]
#[ignore] // Requires Redis server
async fn test_concurrent_issue_yields_one_code() {
    let store = std::sync::Arc::new(store("issue").await);
    let generator = std::sync::Arc::new(CodeGenerator::new(
        store.clone(),
        VerificationServiceConfig::default(),
    ));

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let generator = generator.clone();
            tokio::spawn(async move { generator.issue("race@gmail.com").await.unwrap().code })
        })
        .collect();

    let mut codes = Vec::new();
    for handle in handles {
        codes.push(handle.await.unwrap());
    }
    codes.dedup();
    assert_eq!(codes.len(), 1);
}

#[tokio::test]
#[ignore] // Requires Redis server
async fn test_guard_blocks_after_threshold() {
    let store = std::sync::Arc::new(store("guard").await);
    let guard = AbuseGuard::new(store, VerificationServiceConfig::default());

    for _ in 0..3 {
        assert!(guard.record_failure(&["bob@x.com"], "1.2.3.4").await.unwrap().is_empty());
    }
    assert!(!guard.record_failure(&["bob@x.com"], "1.2.3.4").await.unwrap().is_empty());
    assert!(guard.is_blocked(&["bob@x.com"], "5.6.7.8").await.unwrap());
}
