//! Redis adapter for the ephemeral session store

use async_trait::async_trait;
use redis::AsyncCommands;
use tracing::debug;

use crate::store::EphemeralStore;
use crate::types::{Result, WicketError};

/// Redis client wrapper for session-token bindings
///
/// Holds only the cheap `redis::Client` handle; a multiplexed connection is
/// acquired per operation. Construction therefore never touches the network,
/// and a Redis that is down at process start only fails the requests that
/// need it.
#[derive(Clone, Debug)]
pub struct RedisStore {
    client: redis::Client,
}

impl RedisStore {
    /// Create the store from a `redis://` URL without connecting
    pub fn new(url: &str) -> Result<Self> {
        let client = redis::Client::open(url)
            .map_err(|e| WicketError::Config(format!("Invalid Redis URL: {}", e)))?;
        Ok(Self { client })
    }

    async fn connection(&self) -> Result<redis::aio::MultiplexedConnection> {
        self.client
            .get_multiplexed_async_connection()
            .await
            .map_err(|e| WicketError::StoreUnavailable(format!("Redis connect failed: {}", e)))
    }
}

#[async_trait]
impl EphemeralStore for RedisStore {
    async fn is_alive(&self) -> bool {
        let mut con = match self.connection().await {
            Ok(con) => con,
            Err(e) => {
                debug!("Redis liveness check failed: {}", e);
                return false;
            }
        };

        let pong: redis::RedisResult<String> = redis::cmd("PING").query_async(&mut con).await;
        pong.is_ok()
    }

    async fn get(&self, key: &str) -> Result<Option<String>> {
        let mut con = self.connection().await?;
        let value: Option<String> = con
            .get(key)
            .await
            .map_err(|e| WicketError::StoreUnavailable(format!("Redis GET failed: {}", e)))?;
        Ok(value)
    }

    async fn set_ex(&self, key: &str, value: &str, ttl_secs: u64) -> Result<()> {
        let mut con = self.connection().await?;
        con.set_ex::<_, _, ()>(key, value, ttl_secs)
            .await
            .map_err(|e| WicketError::StoreUnavailable(format!("Redis SETEX failed: {}", e)))?;
        Ok(())
    }

    async fn del(&self, key: &str) -> Result<()> {
        let mut con = self.connection().await?;
        con.del::<_, ()>(key)
            .await
            .map_err(|e| WicketError::StoreUnavailable(format!("Redis DEL failed: {}", e)))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_url_is_a_config_error() {
        let err = RedisStore::new("not-a-redis-url").unwrap_err();
        assert!(matches!(err, WicketError::Config(_)));
    }

    #[tokio::test]
    async fn unreachable_redis_reports_not_alive() {
        // Port 1 on loopback refuses immediately
        let store = RedisStore::new("redis://127.0.0.1:1/").unwrap();
        assert!(!store.is_alive().await);
    }
}
