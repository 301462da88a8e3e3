//! The authoritative record store.
//!
//! [`RecordStore`] holds every admitted record in ingestion order. It is the
//! ground truth for whole-dataset scans: top-k ranking and untagged price
//! aggregation read it directly, so a record carrying many tags is still
//! counted once.

use std::sync::Arc;

use crate::query::{DateRange, PriceAverage, SortAttribute};
use crate::record::GameRecord;

/// Append-only, ingestion-ordered sequence of records.
#[derive(Debug, Default, Clone)]
pub struct RecordStore {
    records: Vec<Arc<GameRecord>>,
}

impl RecordStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a record and returns the shared handle the index should hold.
    pub fn push(&mut self, record: GameRecord) -> Arc<GameRecord> {
        let record = Arc::new(record);
        self.records.push(Arc::clone(&record));
        record
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the store holds no records.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Iterates records in ingestion order.
    pub fn iter(&self) -> impl Iterator<Item = &Arc<GameRecord>> {
        self.records.iter()
    }

    /// Returns the first `k` records under `attribute`'s ordering.
    ///
    /// The sort is stable, so records that compare equal keep their
    /// ingestion order. The result has `min(k, len)` entries.
    pub fn top_k(&self, attribute: SortAttribute, k: usize) -> Vec<Arc<GameRecord>> {
        if attribute == SortAttribute::AllReviews {
            return self.top_k_by_review_score(k);
        }

        let mut ranked = self.records.clone();
        ranked.sort_by(|a, b| attribute.compare(a, b));
        ranked.truncate(k);
        ranked
    }

    /// Scores each review summary once before sorting.
    fn top_k_by_review_score(&self, k: usize) -> Vec<Arc<GameRecord>> {
        let mut scored: Vec<(f64, &Arc<GameRecord>)> = self
            .records
            .iter()
            .map(|r| (r.review_score(), r))
            .collect();
        scored.sort_by(|(a, _), (b, _)| b.total_cmp(a));
        scored
            .into_iter()
            .take(k)
            .map(|(_, r)| Arc::clone(r))
            .collect()
    }

    /// Averages the price of every record released within `range`.
    pub fn average_price(&self, range: DateRange) -> Option<PriceAverage> {
        PriceAverage::from_prices(
            self.records
                .iter()
                .filter(|r| range.contains(r.release_date()))
                .map(|r| r.original_price()),
        )
    }
}
