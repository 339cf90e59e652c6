use redis::aio::ConnectionManager;
use redis::AsyncCommands;
use redis::Client;

use crate::{db::cache::MetadataCache, error::AppResult, models::CatalogId};

/// Creates a Redis client for caching
pub fn create_redis_client(redis_url: &str) -> anyhow::Result<Client> {
    let client = Client::open(redis_url)?;
    Ok(client)
}

/// Metadata cache stored in Redis
///
/// Built once at startup. The connection manager multiplexes a single
/// connection across tasks and reconnects on failure, so clones are cheap and
/// safe to use concurrently.
#[derive(Clone)]
pub struct RedisCache {
    conn: ConnectionManager,
}

impl RedisCache {
    /// Connects to Redis and returns the shared cache handle
    pub async fn connect(client: Client) -> AppResult<Self> {
        let conn = ConnectionManager::new(client).await?;
        tracing::info!("Connected to Redis metadata cache");
        Ok(Self { conn })
    }
}

#[async_trait::async_trait]
impl MetadataCache for RedisCache {
    async fn get(&self, id: &CatalogId) -> AppResult<Option<String>> {
        let mut conn = self.conn.clone();
        let cached: Option<String> = conn.get(id.as_str()).await.map_err(|e| {
            tracing::warn!(error = %e, catalog_id = %id, "Redis get failed");
            e
        })?;
        Ok(cached)
    }

    async fn set(&self, id: &CatalogId, value: String) -> AppResult<()> {
        let mut conn = self.conn.clone();
        let _: () = conn.set(id.as_str(), value).await?;
        Ok(())
    }
}

// These tests need a running Redis at REDIS_URL (default redis://localhost:6379)

#[cfg(test)]
mod tests {
    use super::*;

    fn redis_url() -> String {
        std::env::var("REDIS_URL").unwrap_or_else(|_| "redis://localhost:6379".to_string())
    }

    #[test]
    fn test_create_redis_client_rejects_bad_url() {
        assert!(create_redis_client("not a url").is_err());
    }

    #[tokio::test]
    #[ignore = "requires a running Redis server"]
    async fn test_cache_miss() {
        let client = create_redis_client(&redis_url()).unwrap();
        let cache = RedisCache::connect(client).await.unwrap();

        let retrieved = cache.get(&CatalogId::new("tt_nonexistent_12345")).await.unwrap();
        assert_eq!(retrieved, None);
    }

    #[tokio::test]
    #[ignore = "requires a running Redis server"]
    async fn test_set_then_get() {
        let client = create_redis_client(&redis_url()).unwrap();
        let cache = RedisCache::connect(client.clone()).await.unwrap();
        let id = CatalogId::new("tt_cache_test_write");

        cache.set(&id, r#"{"Title":"Test"}"#.to_string()).await.unwrap();
        let retrieved = cache.get(&id).await.unwrap();
        assert_eq!(retrieved.as_deref(), Some(r#"{"Title":"Test"}"#));

        // Clean up
        let mut conn = client.get_multiplexed_async_connection().await.unwrap();
        let _: () = conn.del(id.as_str()).await.unwrap();
    }
}
