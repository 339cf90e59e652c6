use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;

use crate::{
    models::{MetadataRecord, RelatedTitles},
    services::metadata::MetadataFetcher,
};

/// Fans metadata fetches out over one task per related title
pub struct Aggregator {
    fetcher: Arc<MetadataFetcher>,
    timeout: Option<Duration>,
}

impl Aggregator {
    /// `timeout` bounds each fetch; an expired fetch yields an empty record
    pub fn new(fetcher: Arc<MetadataFetcher>, timeout: Option<Duration>) -> Self {
        Self { fetcher, timeout }
    }

    /// Fetches metadata for every present slot in `titles`
    ///
    /// Tasks report `(slot, record)` over a shared channel in completion
    /// order; each record is placed back into its input slot, so the result is
    /// aligned with `titles.slots()`. Every present identifier yields a
    /// record, empty if its task failed.
    pub async fn fetch_all(&self, titles: &RelatedTitles) -> Vec<Option<MetadataRecord>> {
        let (result_tx, mut result_rx) = mpsc::unbounded_channel();
        let mut expected = 0;

        for (slot, id) in titles.slots().iter().enumerate() {
            let Some(id) = id.clone() else {
                continue;
            };
            expected += 1;

            let fetcher = Arc::clone(&self.fetcher);
            let result_tx = result_tx.clone();
            let timeout = self.timeout;

            tokio::spawn(async move {
                let record = match timeout {
                    Some(budget) => match tokio::time::timeout(budget, fetcher.fetch(&id)).await {
                        Ok(record) => record,
                        Err(_) => {
                            tracing::warn!(
                                catalog_id = %id,
                                budget_ms = budget.as_millis() as u64,
                                "Metadata fetch timed out"
                            );
                            MetadataRecord::default()
                        }
                    },
                    None => fetcher.fetch(&id).await,
                };

                if result_tx.send((slot, record)).is_err() {
                    tracing::debug!(catalog_id = %id, "Result receiver dropped");
                }
            });
        }

        // Only the task clones keep the channel open from here on.
        drop(result_tx);

        let mut records: Vec<Option<MetadataRecord>> = vec![None; titles.capacity()];
        for _ in 0..expected {
            match result_rx.recv().await {
                Some((slot, record)) => records[slot] = Some(record),
                None => {
                    tracing::error!("Metadata task ended without reporting a result");
                    break;
                }
            }
        }

        for (slot, id) in titles.slots().iter().enumerate() {
            if id.is_some() && records[slot].is_none() {
                records[slot] = Some(MetadataRecord::default());
            }
        }

        tracing::info!(
            requested = expected,
            fetched = records.iter().flatten().filter(|r| !r.is_empty()).count(),
            "Metadata aggregation completed"
        );

        records
    }
}
