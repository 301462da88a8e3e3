//! # gamedex
//!
//! In-memory tag and release-date index over a game catalog.
//!
//! gamedex loads a tabular dataset of games once (name, release date,
//! price, review summary, tags), builds a secondary index keyed by
//! normalized tag and ordered by release date, and answers a fixed set of
//! read-only queries against it.
//!
//! ## Queries
//!
//! - Exact year + tag
//! - Inclusive date range + tag
//! - On or before a date + tag
//! - Top-k by price, release date, name, or review score
//! - Average price over a date range, optionally for one tag
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use gamedex::{DatasetConfig, Engine, SortAttribute};
//! use chrono::NaiveDate;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let (engine, report) = Engine::load_csv("data/steam_games.csv", DatasetConfig::default())?;
//! println!("loaded {} records, skipped {}", report.loaded, report.skipped.len());
//!
//! let start = NaiveDate::from_ymd_opt(2018, 12, 1);
//! let end = NaiveDate::from_ymd_opt(2018, 12, 31);
//!
//! for name in engine.by_date_range(Some("strategy"), start, end) {
//!     println!("{name}");
//! }
//!
//! if let Some(avg) = engine.average_price_for_tag(start, end, Some("indie"))? {
//!     println!("average indie price: {avg}");
//! }
//!
//! for game in engine.top_k(SortAttribute::AllReviews, 5) {
//!     println!("{game}");
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Architecture
//!
//! - [`Engine`]: Top-level handle; owns the store and the index
//! - [`RecordStore`]: Ingestion-ordered records; source for top-k and untagged averages
//! - [`TagIndex`]: Tag → release date → records, for all tag-scoped queries
//! - [`GameRecord`]: Immutable record shared by store and index
//!
//! ## Modules
//!
//! - [`engine`]: Loading, ingestion, and the query surface
//! - [`store`]: Record store
//! - [`index`]: Tag index
//! - [`query`]: Sort attributes, date ranges, price averages
//! - [`record`]: Record type
//! - [`ingest`]: Row validation
//! - [`parse`]: Price, date, tag, and review-score parsing
//! - [`row`]: Quote-aware row decoding
//! - [`config`]: Dataset configuration
//! - [`error`]: Error types

pub mod config;
pub mod engine;
pub mod error;
pub mod index;
pub mod ingest;
pub mod parse;
pub mod query;
pub mod record;
pub mod row;
pub mod store;

// Re-export primary API types at crate root for convenience.
pub use config::{ColumnLayout, DatasetConfig};
pub use engine::{Engine, EngineStats, LoadReport};
pub use error::{GamedexError, Result};
pub use index::TagIndex;
pub use query::{DateRange, PriceAverage, SortAttribute};
pub use record::GameRecord;
pub use store::RecordStore;
