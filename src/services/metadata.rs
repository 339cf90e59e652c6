use std::sync::Arc;

use crate::{
    db::MetadataCache,
    models::{CatalogId, MetadataRecord},
    services::providers::CatalogProvider,
};

/// Cache-aside metadata fetcher
///
/// Reads the cache first and falls back to the catalog on a miss, writing the
/// fetched record back. Never fails: catalog errors produce an empty record,
/// cache errors degrade to a plain catalog fetch.
pub struct MetadataFetcher {
    catalog: Arc<dyn CatalogProvider>,
    cache: Option<Arc<dyn MetadataCache>>,
}

impl MetadataFetcher {
    /// Creates a fetcher; pass `None` as `cache` to always hit the catalog
    pub fn new(catalog: Arc<dyn CatalogProvider>, cache: Option<Arc<dyn MetadataCache>>) -> Self {
        Self { catalog, cache }
    }

    pub fn caching_enabled(&self) -> bool {
        self.cache.is_some()
    }

    /// Returns the metadata record for `id`
    pub async fn fetch(&self, id: &CatalogId) -> MetadataRecord {
        let Some(cache) = &self.cache else {
            return self.fetch_from_catalog(id).await;
        };

        if let Some(record) = Self::read_cached(cache.as_ref(), id).await {
            return record;
        }

        let record = self.fetch_from_catalog(id).await;
        if !record.is_empty() {
            Self::write_cached(cache.as_ref(), id, &record).await;
        }
        record
    }

    async fn fetch_from_catalog(&self, id: &CatalogId) -> MetadataRecord {
        match self.catalog.lookup(id).await {
            Ok(record) => record,
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    catalog_id = %id,
                    provider = self.catalog.name(),
                    "Metadata lookup failed, using empty record"
                );
                MetadataRecord::default()
            }
        }
    }

    async fn read_cached(cache: &dyn MetadataCache, id: &CatalogId) -> Option<MetadataRecord> {
        match cache.get(id).await {
            Ok(Some(json)) => match serde_json::from_str(&json) {
                Ok(record) => {
                    tracing::debug!(catalog_id = %id, "Cache hit");
                    Some(record)
                }
                Err(e) => {
                    tracing::warn!(error = %e, catalog_id = %id, "Cache deserialization error");
                    None
                }
            },
            Ok(None) => {
                tracing::debug!(catalog_id = %id, "Cache miss");
                None
            }
            Err(e) => {
                tracing::warn!(error = %e, catalog_id = %id, "Cache read failed");
                None
            }
        }
    }

    async fn write_cached(cache: &dyn MetadataCache, id: &CatalogId, record: &MetadataRecord) {
        let json = match serde_json::to_string(record) {
            Ok(json) => json,
            Err(e) => {
                tracing::error!(error = %e, "Cache serialization error");
                return;
            }
        };

        if let Err(e) = cache.set(id, json).await {
            tracing::error!(error = %e, catalog_id = %id, "Failed to write to metadata cache");
        }
    }
}
