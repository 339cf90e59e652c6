/// Catalog provider abstraction
///
/// The catalog is the external metadata source: it resolves free-text titles
/// and returns the full metadata record for a catalog identifier.
use crate::{
    error::AppResult,
    models::{CatalogId, MetadataRecord},
};

pub mod omdb;

pub use omdb::OmdbProvider;

/// Trait for metadata catalogs
///
/// Both operations return the catalog's own record shape so the result of a
/// title search carries the identifier needed for the follow-up lookups.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait CatalogProvider: Send + Sync {
    /// Finds the best match for a free-text title
    ///
    /// Returns `AppError::NotFound` when the catalog has no match.
    async fn search_title(&self, query: &str) -> AppResult<MetadataRecord>;

    /// Fetches the full metadata record for a catalog identifier
    async fn lookup(&self, id: &CatalogId) -> AppResult<MetadataRecord>;

    /// Provider name for logging and debugging
    fn name(&self) -> &'static str;
}
