//! Top-level query engine.
//!
//! The [`Engine`] owns one [`RecordStore`] and one [`TagIndex`] built from it.
//! It is populated once, either in bulk from prepared records or row by row
//! from a delimited dataset, and is read-only afterwards.
//!
//! # Error tiers
//!
//! The tag queries follow a benign-empty contract: an absent or blank tag,
//! an absent date, an unknown tag, or an inverted range all yield an empty
//! result. The price aggregations instead treat an absent start, end, or
//! tag as a caller bug and return [`AggregateError`]; an inverted range or
//! zero matches still yields `Ok(None)`.
//!
//! # Example Usage
//!
//! ```rust
//! use chrono::NaiveDate;
//! use gamedex::{Engine, GameRecord, SortAttribute};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let released = NaiveDate::from_ymd_opt(2013, 7, 9).unwrap();
//! let engine = Engine::from_records(vec![GameRecord::with_tag_list(
//!     "Dota 2", released, "", 0.0, "MOBA,Strategy", ',',
//! )]);
//!
//! assert_eq!(engine.by_exact_year(Some("mObA"), Some(2013)), vec!["Dota 2"]);
//! assert_eq!(engine.top_k(SortAttribute::Name, 1)[0].name(), "Dota 2");
//!
//! let avg = engine.average_price(Some(released), Some(released))?;
//! assert_eq!(avg.map(|a| a.formatted()), Some("0.00".to_string()));
//! # Ok(())
//! # }
//! ```

use std::borrow::Cow;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::sync::Arc;

use chrono::NaiveDate;
use serde::Serialize;
use tracing::{debug, warn};

use crate::config::DatasetConfig;
use crate::error::{AggregateError, IngestError, LoadError, Result};
use crate::index::TagIndex;
use crate::ingest::build_record;
use crate::query::{DateRange, PriceAverage, SortAttribute};
use crate::record::GameRecord;
use crate::row::decode_row;
use crate::store::RecordStore;

/// In-memory catalog with a tag/date index.
///
/// # Thread Safety
///
/// Queries take `&self` and never mutate, so a fully loaded engine can be
/// shared across threads for reading. Ingestion takes `&mut self`.
#[derive(Debug, Clone)]
pub struct Engine {
    config: DatasetConfig,
    store: RecordStore,
    index: TagIndex,
}

/// Summary of a dataset load.
///
/// Blank lines are not rows: they are counted in `blank_lines` rather than
/// listed in `skipped`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoadReport {
    /// Number of records admitted.
    pub loaded: usize,
    /// One-based line number and reason for every skipped row.
    pub skipped: Vec<(usize, IngestError)>,
    /// Number of admitted records whose price defaulted to zero.
    pub price_fallbacks: usize,
    /// Number of empty or whitespace-only lines passed over.
    pub blank_lines: usize,
    /// Number of lines holding invalid UTF-8, decoded with U+FFFD replacements.
    pub lossy_lines: usize,
}

/// Shape of a loaded engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct EngineStats {
    /// Records in the store.
    pub records: usize,
    /// Distinct normalized tags.
    pub tags: usize,
    /// (tag, date) buckets in the index.
    pub buckets: usize,
    /// Earliest release date, if any records exist.
    pub earliest: Option<NaiveDate>,
    /// Latest release date, if any records exist.
    pub latest: Option<NaiveDate>,
}

impl Default for Engine {
    fn default() -> Self {
        Self::with_config(DatasetConfig::default())
    }
}

impl Engine {
    /// Creates an empty engine with the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty engine using `config` for ingestion.
    pub fn with_config(config: DatasetConfig) -> Self {
        let index = TagIndex::new(config.dedupe_tags);
        Self {
            config,
            store: RecordStore::new(),
            index,
        }
    }

    /// Builds an engine from prepared records, in order.
    pub fn from_records<I: IntoIterator<Item = GameRecord>>(records: I) -> Self {
        let mut engine = Self::new();
        engine.extend(records);
        engine
    }

    /// Loads a delimited dataset file.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError::Open`] if the file cannot be opened,
    /// [`LoadError::Read`] if reading fails, or a config error if `config`
    /// does not validate. Malformed rows are not errors; they are listed in
    /// the returned [`LoadReport`].
    pub fn load_csv<P: AsRef<Path>>(path: P, config: DatasetConfig) -> Result<(Self, LoadReport)> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| LoadError::Open {
            path: path.to_path_buf(),
            source: e,
        })?;

        let (engine, report) = Self::load_reader(BufReader::new(file), config)?;
        debug!(
            path = %path.display(),
            loaded = report.loaded,
            skipped = report.skipped.len(),
            "dataset loaded"
        );
        Ok((engine, report))
    }

    /// Loads a delimited dataset from any buffered reader.
    ///
    /// Lines end in `\n` or `\r\n`. Bytes that are not valid UTF-8 are
    /// replaced rather than failing the load.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`](crate::error::ConfigError) if `config` is
    /// invalid, or [`LoadError::Read`] if the reader fails.
    pub fn load_reader<R: BufRead>(mut reader: R, config: DatasetConfig) -> Result<(Self, LoadReport)> {
        config.validate()?;

        let mut engine = Self::with_config(config);
        let mut report = LoadReport::default();
        let skip_header = engine.config.has_header;
        let mut buf = Vec::new();
        let mut line_no = 0;

        loop {
            buf.clear();
            let read = reader.read_until(b'\n', &mut buf).map_err(|e| LoadError::Read {
                line: line_no + 1,
                source: e,
            })?;
            if read == 0 {
                break;
            }
            line_no += 1;

            if skip_header && line_no == 1 {
                continue;
            }

            let line = decode_line(&buf);
            if line.trim().is_empty() {
                debug!(line = line_no, "skipping blank line");
                report.blank_lines += 1;
                continue;
            }
            if matches!(line, Cow::Owned(_)) {
                warn!(line = line_no, "invalid UTF-8 replaced");
                report.lossy_lines += 1;
            }

            let fields = decode_row(&line, engine.config.field_separator);
            match engine.ingest_fields(&fields) {
                Ok(fell_back) => {
                    report.loaded += 1;
                    if fell_back {
                        report.price_fallbacks += 1;
                    }
                }
                Err(reason) => {
                    warn!(line = line_no, %reason, "skipping row");
                    report.skipped.push((line_no, reason));
                }
            }
        }

        Ok((engine, report))
    }

    /// Appends prepared records to the store and the index.
    pub fn extend<I: IntoIterator<Item = GameRecord>>(&mut self, records: I) {
        for record in records {
            self.admit(record);
        }
    }

    /// Ingests one decoded row.
    ///
    /// # Errors
    ///
    /// Returns [`IngestError`] when the row is skipped.
    pub fn ingest_row<S: AsRef<str>>(&mut self, row: &[S]) -> Result<Arc<GameRecord>> {
        let ingested = build_record(row, &self.config)?;
        Ok(self.admit(ingested.record))
    }

    fn ingest_fields(&mut self, row: &[String]) -> std::result::Result<bool, IngestError> {
        let ingested = build_record(row, &self.config)?;
        let fell_back = ingested.price_fell_back();
        self.admit(ingested.record);
        Ok(fell_back)
    }

    fn admit(&mut self, record: GameRecord) -> Arc<GameRecord> {
        let record = self.store.push(record);
        self.index.insert(&record);
        record
    }

    /// The configuration used for ingestion.
    pub fn config(&self) -> &DatasetConfig {
        &self.config
    }

    /// The underlying record store.
    pub fn store(&self) -> &RecordStore {
        &self.store
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.store.len()
    }

    /// Whether the engine holds no records.
    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    /// Distinct normalized tags in sorted order.
    pub fn tags(&self) -> Vec<String> {
        self.index.tags().map(str::to_string).collect()
    }

    /// Summarizes the loaded data.
    pub fn stats(&self) -> EngineStats {
        EngineStats {
            records: self.store.len(),
            tags: self.index.tag_count(),
            buckets: self.index.bucket_count(),
            earliest: self.store.iter().map(|r| r.release_date()).min(),
            latest: self.store.iter().map(|r| r.release_date()).max(),
        }
    }

    /// Names of records tagged `tag` and released in calendar year `year`.
    ///
    /// Returns an empty list for an absent or blank tag, an absent year, or
    /// an unknown tag.
    pub fn by_exact_year(&self, tag: Option<&str>, year: Option<i32>) -> Vec<String> {
        match (tag, year) {
            (Some(tag), Some(year)) => self.index.by_exact_year(tag, year),
            _ => Vec::new(),
        }
    }

    /// Names of records tagged `tag` and released in `[lower, upper]`.
    ///
    /// Returns an empty list for any absent argument, a blank or unknown
    /// tag, or `lower` after `upper`.
    pub fn by_date_range(
        &self,
        tag: Option<&str>,
        lower: Option<NaiveDate>,
        upper: Option<NaiveDate>,
    ) -> Vec<String> {
        let (Some(tag), Some(lower), Some(upper)) = (tag, lower, upper) else {
            return Vec::new();
        };
        match DateRange::new(lower, upper) {
            Some(range) => self.index.by_date_range(tag, range),
            None => Vec::new(),
        }
    }

    /// Names of records tagged `tag` and released on or before `upper`.
    ///
    /// Returns an empty list for any absent argument or a blank or unknown tag.
    pub fn up_to_date(&self, tag: Option<&str>, upper: Option<NaiveDate>) -> Vec<String> {
        match (tag, upper) {
            (Some(tag), Some(upper)) => self.index.up_to_date(tag, upper),
            _ => Vec::new(),
        }
    }

    /// The first `k` records ranked by `attribute`; ties keep ingestion order.
    pub fn top_k(&self, attribute: SortAttribute, k: usize) -> Vec<Arc<GameRecord>> {
        self.store.top_k(attribute, k)
    }

    /// Like [`Engine::top_k`], with the attribute given by name.
    ///
    /// # Errors
    ///
    /// Returns [`QueryError::UnsupportedAttribute`](crate::error::QueryError::UnsupportedAttribute)
    /// for a name outside `original_price`, `release_date`, `name`, `all_reviews`.
    pub fn top_k_by(&self, attribute: &str, k: usize) -> Result<Vec<Arc<GameRecord>>> {
        let attribute = attribute
            .parse::<SortAttribute>()
            .inspect_err(|e| warn!(%e, "top-k rejected"))?;
        Ok(self.top_k(attribute, k))
    }

    /// Mean price of every record released in `[start, end]`.
    ///
    /// Each record counts once regardless of how many tags it carries.
    /// Returns `Ok(None)` if `start` is after `end` or nothing matches.
    ///
    /// # Errors
    ///
    /// Returns [`AggregateError::MissingStart`] or [`AggregateError::MissingEnd`]
    /// when a bound is absent.
    pub fn average_price(
        &self,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    ) -> Result<Option<PriceAverage>> {
        let Some(range) = required_range(start, end)? else {
            return Ok(None);
        };
        Ok(self.store.average_price(range))
    }

    /// Mean price of records tagged `tag` and released in `[start, end]`.
    ///
    /// Returns `Ok(None)` if `start` is after `end`, the tag is unknown or
    /// blank, or nothing matches.
    ///
    /// # Errors
    ///
    /// Returns [`AggregateError`] when a bound or the tag is absent.
    pub fn average_price_for_tag(
        &self,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
        tag: Option<&str>,
    ) -> Result<Option<PriceAverage>> {
        let range = required_range(start, end)?;
        let tag = tag.ok_or(AggregateError::MissingTag)?;
        Ok(range.and_then(|range| self.index.average_price(tag, range)))
    }
}

/// Strips the line terminator and decodes, replacing invalid UTF-8.
fn decode_line(raw: &[u8]) -> Cow<'_, str> {
    let raw = raw.strip_suffix(b"\n").unwrap_or(raw);
    let raw = raw.strip_suffix(b"\r").unwrap_or(raw);
    String::from_utf8_lossy(raw)
}

/// Checks aggregation bounds; `Ok(None)` means the range is inverted.
fn required_range(
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
) -> std::result::Result<Option<DateRange>, AggregateError> {
    let start = start.ok_or(AggregateError::MissingStart)?;
    let end = end.ok_or(AggregateError::MissingEnd)?;
    Ok(DateRange::new(start, end))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ConfigError, GamedexError, QueryError};
    use std::io::Cursor;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    const DATASET: &str = "\
url,name,all_reviews,release_date,popular_tags,original_price
https://s/1,Dota 2,\"Very Positive,(1,015,621),- 85% of the 1,015,621 user reviews\",\"Jul 9, 2013\",\"MOBA,Strategy,FPS,fps\",Free
https://s/2,Upcoming,,NaN,Action,$19.99
https://s/3,Broken
https://s/4,PLAYERUNKNOWN'S BATTLEGROUNDS,\"Mixed,(836,608),- 49% of\",\"Dec 21, 2017\",\"Survival,Shooter\",$29.99

https://s/5,Odd Price,,\"Jan 01, 2018\",Survival,Call for price
";

    fn loaded() -> (Engine, LoadReport) {
        Engine::load_reader(Cursor::new(DATASET), DatasetConfig::default()).unwrap()
    }

    #[test]
    fn test_load_reader_report() {
        let (engine, report) = loaded();
        assert_eq!(report.loaded, 3);
        assert_eq!(engine.len(), 3);
        assert_eq!(report.price_fallbacks, 1);

        assert_eq!(report.blank_lines, 1);
        assert_eq!(report.lossy_lines, 0);

        let skipped_lines: Vec<_> = report.skipped.iter().map(|(line, _)| *line).collect();
        assert_eq!(skipped_lines, vec![3, 4]);
        assert!(matches!(report.skipped[0].1, IngestError::MissingDate { .. }));
        assert!(matches!(report.skipped[1].1, IngestError::TooFewFields { found: 2, .. }));
    }

    #[test]
    fn test_load_reader_replaces_invalid_utf8() {
        let mut data = b"url,name,all_reviews,release_date,popular_tags,original_price\n".to_vec();
        data.extend_from_slice(b"u,Dota 2,,\"Jul 9, 2013\",MOBA,Free\n");
        data.extend_from_slice(b"u,Caf\xe9 Game,,\"Jan 01, 2018\",Indie,$4.99\n");
        data.extend_from_slice(b"u,Unturned,,\"Jul 7, 2017\",Survival,Free\n");

        let (engine, report) = Engine::load_reader(Cursor::new(data), DatasetConfig::default()).unwrap();
        assert_eq!(report.loaded, 3);
        assert!(report.skipped.is_empty());
        assert_eq!(report.lossy_lines, 1);

        assert_eq!(engine.by_exact_year(Some("indie"), Some(2018)), vec!["Caf\u{FFFD} Game"]);
        assert_eq!(engine.by_exact_year(Some("survival"), Some(2017)), vec!["Unturned"]);
    }

    #[test]
    fn test_load_reader_crlf_lines() {
        let data = "url,name,all_reviews,release_date,popular_tags,original_price\r\n\
                    u,Dota 2,,\"Jul 9, 2013\",MOBA,Free\r\n\
                    \r\n\
                    u,PUBG,,\"Dec 21, 2017\",Survival,$29.99\r\n";

        let (engine, report) = Engine::load_reader(Cursor::new(data), DatasetConfig::default()).unwrap();
        assert_eq!(report.loaded, 2);
        assert_eq!(report.price_fallbacks, 0);
        assert_eq!(report.blank_lines, 1);
        assert_eq!(engine.top_k(SortAttribute::OriginalPrice, 1)[0].original_price(), 29.99);
    }

    #[test]
    fn test_load_reader_validates_config() {
        let config = DatasetConfig {
            field_separator: '"',
            ..DatasetConfig::default()
        };
        let result = Engine::load_reader(Cursor::new(DATASET), config);
        assert!(matches!(
            result,
            Err(GamedexError::Config(ConfigError::InvalidSeparator { separator: '"' }))
        ));

        let config = DatasetConfig {
            date_format: String::new(),
            ..DatasetConfig::default()
        };
        assert!(Engine::load_reader(Cursor::new(DATASET), config).is_err());
    }

    #[test]
    fn test_load_reader_dedupes_tags_by_default() {
        let (engine, _) = loaded();
        assert_eq!(engine.up_to_date(Some("fps"), Some(date(2020, 1, 1))), vec!["Dota 2"]);
    }

    #[test]
    fn test_load_reader_without_header() {
        let config = DatasetConfig {
            has_header: false,
            ..DatasetConfig::default()
        };
        let (engine, report) = Engine::load_reader(Cursor::new(DATASET), config).unwrap();
        assert_eq!(engine.len(), 3);
        assert_eq!(report.skipped.len(), 3);
        assert!(matches!(report.skipped[0].1, IngestError::InvalidDate { .. }));
    }

    #[test]
    fn test_ingest_row_fans_out() {
        let mut engine = Engine::new();
        let row = ["u", "Unturned", "", "Jul 07, 2017", "Survival,FPS", "Free to Play"];
        let record = engine.ingest_row(&row).unwrap();
        assert_eq!(record.name(), "Unturned");
        assert_eq!(engine.tags(), vec!["fps", "survival"]);
        assert_eq!(engine.by_exact_year(Some("Survival"), Some(2017)), vec!["Unturned"]);
    }

    #[test]
    fn test_ingest_row_rejects() {
        let mut engine = Engine::new();
        let result = engine.ingest_row(&["u", "Short"]);
        assert!(matches!(
            result,
            Err(GamedexError::Ingest(IngestError::TooFewFields { .. }))
        ));
        assert!(engine.is_empty());
    }

    #[test]
    fn test_benign_empty_queries() {
        let (engine, _) = loaded();
        let d = date(2017, 12, 21);
        assert!(engine.by_exact_year(None, Some(2017)).is_empty());
        assert!(engine.by_exact_year(Some("survival"), None).is_empty());
        assert!(engine.by_exact_year(Some(""), Some(2017)).is_empty());
        assert!(engine.by_date_range(None, Some(d), Some(d)).is_empty());
        assert!(engine.by_date_range(Some("  "), Some(d), Some(d)).is_empty());
        assert!(engine.by_date_range(Some("survival"), None, Some(d)).is_empty());
        assert!(engine.by_date_range(Some("survival"), Some(d), None).is_empty());
        assert!(engine.up_to_date(None, Some(d)).is_empty());
        assert!(engine.up_to_date(Some("survival"), None).is_empty());
    }

    #[test]
    fn test_inverted_range_is_empty() {
        let (engine, _) = loaded();
        let result = engine.by_date_range(Some("survival"), Some(date(2018, 1, 1)), Some(date(2017, 12, 31)));
        assert!(result.is_empty());
    }

    #[test]
    fn test_top_k_by_unsupported() {
        let (engine, _) = loaded();
        match engine.top_k_by("metacritic", 3) {
            Err(GamedexError::Query(QueryError::UnsupportedAttribute { attribute })) => {
                assert_eq!(attribute, "metacritic");
            }
            other => panic!("Expected UnsupportedAttribute error, got: {:?}", other),
        }
    }

    #[test]
    fn test_top_k_by_name() {
        let (engine, _) = loaded();
        let top = engine.top_k_by("all_reviews", 1).unwrap();
        assert_eq!(top[0].name(), "Dota 2");
    }

    #[test]
    fn test_average_price_preconditions() {
        let (engine, _) = loaded();
        let d = date(2017, 1, 1);
        assert!(matches!(
            engine.average_price(None, None),
            Err(GamedexError::Aggregate(AggregateError::MissingStart))
        ));
        assert!(matches!(
            engine.average_price(Some(d), None),
            Err(GamedexError::Aggregate(AggregateError::MissingEnd))
        ));
        assert!(matches!(
            engine.average_price_for_tag(Some(d), Some(d), None),
            Err(GamedexError::Aggregate(AggregateError::MissingTag))
        ));
    }

    #[test]
    fn test_average_price_inverted_range_is_none() {
        let (engine, _) = loaded();
        let later = Some(date(2025, 1, 1));
        let earlier = Some(date(2020, 1, 1));
        assert_eq!(engine.average_price(later, earlier).unwrap(), None);
        assert_eq!(engine.average_price_for_tag(later, earlier, Some("survival")).unwrap(), None);
    }

    #[test]
    fn test_average_price_counts_each_record_once() {
        let (engine, _) = loaded();
        let avg = engine
            .average_price(Some(date(2013, 1, 1)), Some(date(2018, 12, 31)))
            .unwrap()
            .unwrap();
        assert_eq!(avg.count, 3);
        assert_eq!(avg.formatted(), "10.00");
    }

    #[test]
    fn test_average_price_for_tag() {
        let (engine, _) = loaded();
        let avg = engine
            .average_price_for_tag(Some(date(2017, 1, 1)), Some(date(2018, 12, 31)), Some("SURVIVAL"))
            .unwrap()
            .unwrap();
        assert_eq!(avg.count, 2);
        assert!((avg.mean - 14.995).abs() < 1e-9);

        let unknown = engine
            .average_price_for_tag(Some(date(2017, 1, 1)), Some(date(2018, 12, 31)), Some("rpg"))
            .unwrap();
        assert!(unknown.is_none());
    }

    #[test]
    fn test_stats() {
        let (engine, _) = loaded();
        let stats = engine.stats();
        assert_eq!(stats.records, 3);
        assert_eq!(stats.tags, 5);
        assert_eq!(stats.earliest, Some(date(2013, 7, 9)));
        assert_eq!(stats.latest, Some(date(2018, 1, 1)));

        let empty = Engine::new().stats();
        assert_eq!(empty.records, 0);
        assert_eq!(empty.earliest, None);
    }

    #[test]
    fn test_load_csv_missing_file() {
        let result = Engine::load_csv("/nonexistent/gamedex/steam.csv", DatasetConfig::default());
        assert!(matches!(result, Err(GamedexError::Load(LoadError::Open { .. }))));
    }
}
