use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// Catalog identifier of a single work (e.g., "tt0120586")
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CatalogId(String);

impl CatalogId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for CatalogId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ============================================================================
// Catalog Types
// ============================================================================

/// Descriptive metadata for one work, in the catalog's wire format
///
/// The same JSON shape is used for catalog responses and cache entries, so a
/// record read back from the cache is identical to the one that was fetched.
/// Every field defaults to empty; a failed lookup yields `MetadataRecord::default()`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetadataRecord {
    #[serde(rename = "Title", default)]
    pub title: String,
    #[serde(rename = "imdbID", default)]
    pub catalog_id: String,
    #[serde(rename = "Type", default)]
    pub work_type: String,
    #[serde(rename = "Year", default)]
    pub year: String,
    #[serde(rename = "Plot", default)]
    pub plot: String,
    #[serde(rename = "Metascore", default)]
    pub critic_score: String,
    #[serde(rename = "imdbRating", default)]
    pub audience_rating: String,
}

impl MetadataRecord {
    /// True for the zero-valued record substituted on fetch failures
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Catalog identifier of this record, if the catalog supplied one
    pub fn id(&self) -> Option<CatalogId> {
        if self.catalog_id.is_empty() {
            None
        } else {
            Some(CatalogId::new(self.catalog_id.clone()))
        }
    }
}

// ============================================================================
// Related Titles
// ============================================================================

/// Bounded, document-ordered list of related catalog identifiers
///
/// Holds exactly `capacity` slots; slots past the last discovered identifier
/// stay `None`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelatedTitles {
    slots: Vec<Option<CatalogId>>,
    filled: usize,
}

impl RelatedTitles {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: vec![None; capacity],
            filled: 0,
        }
    }

    /// Stores `id` in the next free slot. Returns `false` when the list is full.
    pub fn push(&mut self, id: CatalogId) -> bool {
        match self.slots.get_mut(self.filled) {
            Some(slot) => {
                *slot = Some(id);
                self.filled += 1;
                true
            }
            None => false,
        }
    }

    pub fn is_full(&self) -> bool {
        self.filled == self.slots.len()
    }

    /// Number of present identifiers
    pub fn len(&self) -> usize {
        self.filled
    }

    pub fn is_empty(&self) -> bool {
        self.filled == 0
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    pub fn slots(&self) -> &[Option<CatalogId>] {
        &self.slots
    }

    /// Present identifiers in discovery order
    pub fn ids(&self) -> impl Iterator<Item = &CatalogId> {
        self.slots.iter().flatten()
    }
}

// ============================================================================
// Streaming List
// ============================================================================

/// Entry of the currently-streaming titles list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StreamingTitle {
    #[serde(rename = "Id", default)]
    pub id: i64,
    #[serde(rename = "Title")]
    pub title: String,
    #[serde(rename = "Url", default)]
    pub url: String,
    #[serde(rename = "TomatoScore", default)]
    pub tomato_score: i32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metadata_record_from_catalog_json() {
        let json = r#"{
            "Title": "The Mist",
            "Year": "2007",
            "imdbID": "tt0884328",
            "Type": "movie",
            "Plot": "A freak storm unleashes a species of bloodthirsty creatures.",
            "Metascore": "58",
            "imdbRating": "7.1",
            "Response": "True"
        }"#;

        let record: MetadataRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.title, "The Mist");
        assert_eq!(record.id(), Some(CatalogId::new("tt0884328")));
        assert_eq!(record.critic_score, "58");
        assert_eq!(record.audience_rating, "7.1");
        assert!(!record.is_empty());
    }

    #[test]
    fn test_metadata_record_missing_fields_default_to_empty() {
        let record: MetadataRecord = serde_json::from_str(r#"{"Title": "Shrek"}"#).unwrap();
        assert_eq!(record.title, "Shrek");
        assert_eq!(record.audience_rating, "");
        assert_eq!(record.id(), None);
    }

    #[test]
    fn test_metadata_record_cache_form_matches_fetched_form() {
        let record = MetadataRecord {
            title: "Alien".to_string(),
            catalog_id: "tt0078748".to_string(),
            work_type: "movie".to_string(),
            year: "1979".to_string(),
            plot: "In space no one can hear you scream.".to_string(),
            critic_score: "89".to_string(),
            audience_rating: "8.5".to_string(),
        };

        let serialized = serde_json::to_string(&record).unwrap();
        let restored: MetadataRecord = serde_json::from_str(&serialized).unwrap();
        assert_eq!(restored, record);
    }

    #[test]
    fn test_related_titles_fills_slots_in_order() {
        let mut related = RelatedTitles::with_capacity(3);
        assert!(related.is_empty());

        assert!(related.push(CatalogId::new("tt1")));
        assert!(related.push(CatalogId::new("tt2")));

        assert_eq!(related.len(), 2);
        assert!(!related.is_full());
        assert_eq!(
            related.slots(),
            &[
                Some(CatalogId::new("tt1")),
                Some(CatalogId::new("tt2")),
                None
            ]
        );
    }

    #[test]
    fn test_related_titles_rejects_push_when_full() {
        let mut related = RelatedTitles::with_capacity(1);
        assert!(related.push(CatalogId::new("tt1")));
        assert!(related.is_full());
        assert!(!related.push(CatalogId::new("tt2")));
        assert_eq!(related.ids().count(), 1);
    }

    #[test]
    fn test_streaming_title_deserialization() {
        let json = r#"{"Id": 7, "Title": "Roma", "Url": "/m/roma", "TomatoScore": 96}"#;
        let title: StreamingTitle = serde_json::from_str(json).unwrap();
        assert_eq!(title.title, "Roma");
        assert_eq!(title.tomato_score, 96);
    }
}
