// Redis cache manager

use redis::aio::ConnectionManager;
use redis::AsyncCommands;
use thiserror::Error;
use tracing::{debug, error};

/// Error types for cache connection and operations
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("Cache connection error: {0}")]
    ConnectionError(String),

    #[error("Cache operation error: {0}")]
    OperationError(String),
}

/// Cache connection manager backed by a multiplexed redis connection.
///
/// The underlying connection reconnects automatically; it is released when
/// the manager drops.
#[derive(Clone)]
pub struct CacheManager {
    manager: ConnectionManager,
}

impl CacheManager {
    /// Connects to redis and prepares the shared connection
    pub async fn connect(url: &str) -> Result<Self, CacheError> {
        let client = redis::Client::open(url)
            .map_err(|e| CacheError::ConnectionError(e.to_string()))?;
        let manager = ConnectionManager::new(client)
            .await
            .map_err(|e| CacheError::ConnectionError(e.to_string()))?;

        debug!("Cache connection established");
        Ok(Self { manager })
    }

    /// Reads a value from the cache
    pub async fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        let mut conn = self.manager.clone();
        conn.get(key)
            .await
            .map_err(|e| CacheError::OperationError(e.to_string()))
    }

    /// Stores a value with a time-to-live in seconds
    pub async fn set(&self, key: &str, value: &str, ttl_secs: u64) -> Result<(), CacheError> {
        let mut conn = self.manager.clone();
        conn.set_ex::<_, _, ()>(key, value, ttl_secs)
            .await
            .map_err(|e| CacheError::OperationError(e.to_string()))
    }

    /// Removes a key, returning whether it existed
    pub async fn delete(&self, key: &str) -> Result<bool, CacheError> {
        let mut conn = self.manager.clone();
        let removed: u64 = conn
            .del(key)
            .await
            .map_err(|e| CacheError::OperationError(e.to_string()))?;
        Ok(removed > 0)
    }

    /// Verifies the cache still answers a PING
    pub async fn health_check(&self) -> bool {
        let mut conn = self.manager.clone();
        match redis::cmd("PING").query_async::<String>(&mut conn).await {
            Ok(_) => true,
            Err(e) => {
                error!("Cache health check failed: {}", e);
                false
            }
        }
    }
}
