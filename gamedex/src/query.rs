//! Query vocabulary shared by the store and the tag index.
//!
//! This module holds the pieces of the read path that do not own data:
//!
//! - [`SortAttribute`] - the closed set of top-k orderings and their comparators
//! - [`PriceAverage`] - the result of a price aggregation
//! - [`DateRange`] - an inclusive, validated pair of bounds

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::Serialize;

use crate::error::QueryError;
use crate::record::GameRecord;

/// Attributes a top-k query can rank by.
///
/// String names match the dataset column names, case-insensitively:
/// `original_price`, `release_date`, `name`, `all_reviews`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SortAttribute {
    /// Highest price first.
    OriginalPrice,
    /// Most recent release first.
    ReleaseDate,
    /// Lexicographically smallest name first.
    Name,
    /// Highest derived review score first.
    AllReviews,
}

impl SortAttribute {
    /// All supported attributes.
    pub const ALL: [SortAttribute; 4] = [
        SortAttribute::OriginalPrice,
        SortAttribute::ReleaseDate,
        SortAttribute::Name,
        SortAttribute::AllReviews,
    ];

    /// The column name this attribute is parsed from.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::OriginalPrice => "original_price",
            Self::ReleaseDate => "release_date",
            Self::Name => "name",
            Self::AllReviews => "all_reviews",
        }
    }

    /// Orders two records so that the preferred one sorts first.
    ///
    /// Equal records compare `Equal`; callers rely on a stable sort to keep
    /// ingestion order among ties.
    pub fn compare(self, a: &GameRecord, b: &GameRecord) -> Ordering {
        match self {
            Self::OriginalPrice => b.original_price().total_cmp(&a.original_price()),
            Self::ReleaseDate => b.release_date().cmp(&a.release_date()),
            Self::Name => a.name().cmp(b.name()),
            Self::AllReviews => b.review_score().total_cmp(&a.review_score()),
        }
    }
}

impl FromStr for SortAttribute {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|attr| attr.as_str() == wanted)
            .ok_or_else(|| QueryError::UnsupportedAttribute {
                attribute: s.to_string(),
            })
    }
}

impl fmt::Display for SortAttribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An inclusive date interval with `start <= end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateRange {
    /// Creates a range, or `None` when `start` is after `end`.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Option<Self> {
        (start <= end).then_some(Self { start, end })
    }

    /// The whole calendar year, or `None` if the year is out of chrono's range.
    pub fn year(year: i32) -> Option<Self> {
        let start = NaiveDate::from_ymd_opt(year, 1, 1)?;
        let end = NaiveDate::from_ymd_opt(year, 12, 31)?;
        Some(Self { start, end })
    }

    /// First day of the range.
    pub fn start(&self) -> NaiveDate {
        self.start
    }

    /// Last day of the range.
    pub fn end(&self) -> NaiveDate {
        self.end
    }

    /// Whether `date` lies within the range, bounds included.
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

/// Mean original price over a set of records.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PriceAverage {
    /// Arithmetic mean of the prices.
    pub mean: f64,
    /// Number of records averaged.
    pub count: usize,
}

impl PriceAverage {
    /// Averages the given prices, or returns `None` if there are none.
    #[allow(clippy::cast_precision_loss)] // record counts stay far below 2^52
    pub fn from_prices<I: IntoIterator<Item = f64>>(prices: I) -> Option<Self> {
        let (total, count) = prices
            .into_iter()
            .fold((0.0, 0usize), |(total, count), price| (total + price, count + 1));

        (count > 0).then(|| Self {
            mean: total / count as f64,
            count,
        })
    }

    /// The mean rendered with two fractional digits.
    pub fn formatted(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for PriceAverage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.mean)
    }
}
