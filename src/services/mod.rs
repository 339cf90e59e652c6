pub mod aggregator;
pub mod assembler;
pub mod intents;
pub mod metadata;
pub mod providers;
pub mod recommendations;
pub mod related_titles;
pub mod resolver;
pub mod streaming;

pub use aggregator::Aggregator;
pub use metadata::MetadataFetcher;
pub use providers::{CatalogProvider, OmdbProvider};
pub use recommendations::{Recommendation, Recommender};
pub use related_titles::RelatedTitleExtractor;
pub use streaming::StreamingCatalog;
