use std::sync::Arc;

use crate::{
    error::{AppError, AppResult},
    models::{CatalogId, MetadataRecord, RelatedTitles},
    services::{
        aggregator::Aggregator,
        assembler::{assemble, recommendation_intro},
        providers::CatalogProvider,
        related_titles::RelatedTitleExtractor,
        resolver::resolve_identifier,
    },
};

/// Result of one recommendation lookup
#[derive(Debug, Clone)]
pub struct Recommendation {
    /// Title as supplied by the caller
    pub query: String,
    /// Catalog identifier the query resolved to
    pub source_id: CatalogId,
    /// Related identifiers found on the source title's page
    pub related: RelatedTitles,
    /// Metadata aligned with `related.slots()`
    pub records: Vec<Option<MetadataRecord>>,
}

impl Recommendation {
    /// Fetched records in related-title order
    pub fn records(&self) -> impl Iterator<Item = &MetadataRecord> {
        self.records.iter().flatten()
    }

    /// Spoken form: intro followed by one title/rating segment per record
    pub fn speech(&self) -> String {
        assemble(&recommendation_intro(&self.query), self.records())
    }
}

/// Recommendation pipeline
///
/// Resolve the title, scan its page for related titles, then fetch their
/// metadata concurrently.
pub struct Recommender {
    catalog: Arc<dyn CatalogProvider>,
    extractor: RelatedTitleExtractor,
    aggregator: Aggregator,
}

impl Recommender {
    pub fn new(
        catalog: Arc<dyn CatalogProvider>,
        extractor: RelatedTitleExtractor,
        aggregator: Aggregator,
    ) -> Self {
        Self {
            catalog,
            extractor,
            aggregator,
        }
    }

    /// Recommends titles similar to `query`
    ///
    /// Fails only when the query is empty or does not resolve; page and
    /// metadata failures shrink or blank the result instead.
    pub async fn recommend(&self, query: &str) -> AppResult<Recommendation> {
        let query = query.trim();
        if query.is_empty() {
            return Err(AppError::InvalidInput(
                "Title query cannot be empty".to_string(),
            ));
        }

        let source_id = resolve_identifier(self.catalog.as_ref(), query)
            .await
            .ok_or_else(|| AppError::NotFound(format!("No title found for '{}'", query)))?;

        tracing::info!(query = %query, catalog_id = %source_id, "Title resolved");

        let related = self.extractor.related_titles(&source_id).await;
        let records = self.aggregator.fetch_all(&related).await;

        Ok(Recommendation {
            query: query.to_string(),
            source_id,
            related,
            records,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::metadata::MetadataFetcher;
    use crate::services::providers::MockCatalogProvider;
    use reqwest::Client as HttpClient;

    fn recommender(catalog: MockCatalogProvider) -> Recommender {
        let catalog: Arc<dyn CatalogProvider> = Arc::new(catalog);
        let fetcher = Arc::new(MetadataFetcher::new(Arc::clone(&catalog), None));
        Recommender::new(
            catalog,
            RelatedTitleExtractor::new(
                HttpClient::new(),
                "http://127.0.0.1:1/title".to_string(),
                "discover-watch".to_string(),
                5,
            ),
            Aggregator::new(fetcher, None),
        )
    }

    #[tokio::test]
    async fn test_empty_query_is_rejected_without_lookup() {
        let mut catalog = MockCatalogProvider::new();
        catalog.expect_search_title().times(0);

        let result = recommender(catalog).recommend("   ").await;
        assert!(matches!(result, Err(AppError::InvalidInput(_))));
    }

    #[tokio::test]
    async fn test_unresolved_title_is_not_found() {
        let mut catalog = MockCatalogProvider::new();
        catalog
            .expect_search_title()
            .times(1)
            .returning(|_| Err(AppError::NotFound("Movie not found!".to_string())));
        catalog.expect_name().return_const("mock");

        let result = recommender(catalog).recommend("zzzz").await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_unreachable_page_yields_empty_recommendation() {
        let mut catalog = MockCatalogProvider::new();
        catalog.expect_search_title().returning(|_| {
            Ok(MetadataRecord {
                title: "The Mist".to_string(),
                catalog_id: "tt0884328".to_string(),
                ..Default::default()
            })
        });
        catalog.expect_lookup().times(0);

        let recommendation = recommender(catalog).recommend("the mist").await.unwrap();

        assert_eq!(recommendation.source_id, CatalogId::new("tt0884328"));
        assert!(recommendation.related.is_empty());
        assert_eq!(recommendation.records().count(), 0);
        assert_eq!(
            recommendation.speech(),
            "If you enjoyed the mist you might also enjoy watching "
        );
    }
}
