use crate::{models::CatalogId, services::providers::CatalogProvider};

/// Resolves a free-text title to its catalog identifier
///
/// Returns `None` when the catalog has no match or the lookup fails; failures
/// are logged, never propagated.
pub async fn resolve_identifier(catalog: &dyn CatalogProvider, query: &str) -> Option<CatalogId> {
    match catalog.search_title(query).await {
        Ok(record) => {
            let id = record.id();
            if id.is_none() {
                tracing::info!(query = %query, "Catalog match carried no identifier");
            }
            id
        }
        Err(e) => {
            tracing::warn!(
                error = %e,
                query = %query,
                provider = catalog.name(),
                "Title resolution failed"
            );
            None
        }
    }
}
