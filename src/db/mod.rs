pub mod cache;
pub mod redis;

pub use cache::{InMemoryCache, MetadataCache};
pub use redis::{create_redis_client, RedisCache};
