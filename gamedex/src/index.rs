//! Tag index over release dates.
//!
//! The [`TagIndex`] maps each normalized tag to a date-ordered map of
//! buckets, where a bucket is the list of records sharing that tag and
//! release date:
//!
//! ```text
//! "survival" ─┬─ 2017-07-07 → [Unturned]
//!             └─ 2017-12-21 → [PLAYERUNKNOWN'S BATTLEGROUNDS]
//! "moba"     ─── 2013-07-09 → [Dota 2]
//! ```
//!
//! Both levels are `BTreeMap`s, so tag lookup and date lookup are
//! `O(log n)` and range scans visit only the buckets they return. Exact-year
//! matching is a range scan over the year's first and last day; there is no
//! second, unordered index to keep in step.
//!
//! Scans yield dates in ascending order and, within a bucket, records in
//! insertion order.

use std::collections::BTreeMap;
use std::ops::RangeBounds;
use std::sync::Arc;

use chrono::NaiveDate;

use crate::parse::normalize_tag;
use crate::query::{DateRange, PriceAverage};
use crate::record::GameRecord;

/// Records sharing one (tag, release date) pair, in insertion order.
type Bucket = Vec<Arc<GameRecord>>;

/// Date-ordered buckets for one tag.
type DateMap = BTreeMap<NaiveDate, Bucket>;

/// Secondary index from normalized tag to date-ordered record buckets.
#[derive(Debug, Default, Clone)]
pub struct TagIndex {
    tags: BTreeMap<String, DateMap>,
    dedupe: bool,
}

impl TagIndex {
    /// Creates an empty index.
    ///
    /// With `dedupe` set, a record is inserted into a tag's bucket once even
    /// if several of its raw tags normalize to that tag.
    pub fn new(dedupe: bool) -> Self {
        Self {
            tags: BTreeMap::new(),
            dedupe,
        }
    }

    /// Fans a record out into one bucket per normalized tag.
    ///
    /// Returns the number of bucket insertions made.
    pub fn insert(&mut self, record: &Arc<GameRecord>) -> usize {
        let keys = record.index_keys(self.dedupe);
        let date = record.release_date();

        for key in &keys {
            self.tags
                .entry(key.clone())
                .or_default()
                .entry(date)
                .or_default()
                .push(Arc::clone(record));
        }

        keys.len()
    }

    /// Number of distinct tags.
    pub fn tag_count(&self) -> usize {
        self.tags.len()
    }

    /// Number of (tag, date) buckets across all tags.
    pub fn bucket_count(&self) -> usize {
        self.tags.values().map(BTreeMap::len).sum()
    }

    /// Distinct normalized tags in sorted order.
    pub fn tags(&self) -> impl Iterator<Item = &str> {
        self.tags.keys().map(String::as_str)
    }

    /// Whether a bucket exists for `tag` after normalization.
    pub fn contains_tag(&self, tag: &str) -> bool {
        self.date_map(tag).is_some()
    }

    /// Names of records with `tag` released in calendar year `year`.
    pub fn by_exact_year(&self, tag: &str, year: i32) -> Vec<String> {
        match DateRange::year(year) {
            Some(range) => self.by_date_range(tag, range),
            None => Vec::new(),
        }
    }

    /// Names of records with `tag` released within `range`, bounds included.
    pub fn by_date_range(&self, tag: &str, range: DateRange) -> Vec<String> {
        self.names_in(tag, range.start()..=range.end())
    }

    /// Names of records with `tag` released on or before `upper`.
    pub fn up_to_date(&self, tag: &str, upper: NaiveDate) -> Vec<String> {
        self.names_in(tag, ..=upper)
    }

    /// Records with `tag` released within `range`, in scan order.
    pub fn records_in(&self, tag: &str, range: DateRange) -> Vec<Arc<GameRecord>> {
        self.scan(tag, range.start()..=range.end())
            .map(Arc::clone)
            .collect()
    }

    /// Averages the price of records with `tag` released within `range`.
    ///
    /// Each bucket entry counts once, so with deduplication disabled a record
    /// listing the same tag twice is averaged twice.
    pub fn average_price(&self, tag: &str, range: DateRange) -> Option<PriceAverage> {
        PriceAverage::from_prices(
            self.scan(tag, range.start()..=range.end())
                .map(|r| r.original_price()),
        )
    }

    fn date_map(&self, tag: &str) -> Option<&DateMap> {
        let key = normalize_tag(tag);
        if key.is_empty() {
            return None;
        }
        self.tags.get(&key)
    }

    fn names_in<R: RangeBounds<NaiveDate>>(&self, tag: &str, bounds: R) -> Vec<String> {
        self.scan(tag, bounds).map(|r| r.name().to_string()).collect()
    }

    /// Flattens the buckets of `tag` whose dates fall within `bounds`.
    fn scan<R: RangeBounds<NaiveDate>>(
        &self,
        tag: &str,
        bounds: R,
    ) -> impl Iterator<Item = &Arc<GameRecord>> {
        let bounds = (bounds.start_bound().cloned(), bounds.end_bound().cloned());
        self.date_map(tag)
            .into_iter()
            .flat_map(move |dates| dates.range(bounds))
            .flat_map(|(_, bucket)| bucket.iter())
    }
}
