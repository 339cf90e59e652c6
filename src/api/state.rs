use std::sync::Arc;

use reqwest::Client as HttpClient;

use crate::{
    config::Config,
    db::{create_redis_client, MetadataCache, RedisCache},
    services::{
        Aggregator, CatalogProvider, MetadataFetcher, OmdbProvider, RelatedTitleExtractor,
        Recommender, StreamingCatalog,
    },
};

/// Shared application state
///
/// Built once at startup; handlers share it through cheap `Arc` clones.
#[derive(Clone)]
pub struct AppState {
    pub recommender: Arc<Recommender>,
    pub streaming: Arc<StreamingCatalog>,
}

impl AppState {
    pub fn new(recommender: Recommender, streaming: StreamingCatalog) -> Self {
        Self {
            recommender: Arc::new(recommender),
            streaming: Arc::new(streaming),
        }
    }

    /// Wires the recommendation pipeline from configuration
    ///
    /// A Redis connection failure disables caching instead of failing startup.
    pub async fn from_config(config: &Config) -> anyhow::Result<Self> {
        let cache = if config.cache_enabled {
            connect_cache(&config.redis_url).await
        } else {
            tracing::info!("Metadata cache disabled");
            None
        };

        Ok(Self::with_cache(config, cache))
    }

    /// Wires the recommendation pipeline around an already-built cache
    pub fn with_cache(config: &Config, cache: Option<Arc<dyn MetadataCache>>) -> Self {
        let http_client = HttpClient::new();

        let catalog: Arc<dyn CatalogProvider> = Arc::new(OmdbProvider::new(
            http_client.clone(),
            config.api_key.clone(),
            config.omdb_api_url.clone(),
        ));

        let extractor = RelatedTitleExtractor::new(
            http_client,
            config.title_page_url.clone(),
            config.related_section_marker.clone(),
            config.related_titles_limit,
        );

        let fetcher = Arc::new(MetadataFetcher::new(Arc::clone(&catalog), cache));
        let aggregator = Aggregator::new(fetcher, config.fetch_timeout());

        Self::new(
            Recommender::new(catalog, extractor, aggregator),
            StreamingCatalog::new(config.streaming_list_path.clone()),
        )
    }
}

async fn connect_cache(redis_url: &str) -> Option<Arc<dyn MetadataCache>> {
    let client = match create_redis_client(redis_url) {
        Ok(client) => client,
        Err(e) => {
            tracing::warn!(error = %e, "Invalid Redis URL, metadata cache disabled");
            return None;
        }
    };

    match RedisCache::connect(client).await {
        Ok(cache) => Some(Arc::new(cache)),
        Err(e) => {
            tracing::warn!(error = %e, "Redis unavailable, metadata cache disabled");
            None
        }
    }
}
