use std::collections::HashMap;

use tokio::sync::RwLock;

use crate::{error::AppResult, models::CatalogId};

/// Key/value store for serialized metadata records
///
/// Keys are catalog identifiers, values are the JSON form of a
/// `MetadataRecord`. Entries never expire. Implementations must be safe to
/// share across concurrently running fetch tasks.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait MetadataCache: Send + Sync {
    /// Returns the stored value, or `None` on a miss
    async fn get(&self, id: &CatalogId) -> AppResult<Option<String>>;

    /// Stores `value` under `id` without expiration
    async fn set(&self, id: &CatalogId, value: String) -> AppResult<()>;
}

/// Process-local cache backed by a map
#[derive(Default)]
pub struct InMemoryCache {
    entries: RwLock<HashMap<CatalogId, String>>,
}

impl InMemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

#[async_trait::async_trait]
impl MetadataCache for InMemoryCache {
    async fn get(&self, id: &CatalogId) -> AppResult<Option<String>> {
        Ok(self.entries.read().await.get(id).cloned())
    }

    async fn set(&self, id: &CatalogId, value: String) -> AppResult<()> {
        self.entries.write().await.insert(id.clone(), value);
        Ok(())
    }
}
