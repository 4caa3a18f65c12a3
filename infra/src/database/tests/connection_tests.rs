use crate::database::{DatabaseConfig, DatabasePool, PoolStatistics};

#[tokio::test]
async fn test_pool_creation_with_invalid_url() {
    let config = DatabaseConfig {
        url: "invalid://url".to_string(),
        max_connections: 10,
        connect_timeout: 5,
    };

    let result = DatabasePool::new(&config).await;
    assert!(result.is_err());
}

#[test]
fn test_pool_statistics_display() {
    let stats = PoolStatistics {
        connections: 5,
        idle_connections: 3,
        max_connections: 10,
    };

    let display = format!("{}", stats);
    assert!(display.contains("5/10"));
    assert!(display.contains("3 idle"));
}
