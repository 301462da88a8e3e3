//! Dataset configuration for gamedex ingestion.
//!
//! A [`DatasetConfig`] describes how decoded rows map onto
//! [`GameRecord`](crate::record::GameRecord) fields: which column holds
//! which attribute, how tags are separated, and how release dates are
//! written. Every field has a default matching the reference Steam export,
//! so an empty JSON object is a valid configuration.
//!
//! # Example
//!
//! ```rust
//! use gamedex::config::DatasetConfig;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config: DatasetConfig = serde_json::from_str(r#"{ "tag_separator": ";" }"#)?;
//! config.validate()?;
//! assert_eq!(config.columns.name, 1);
//! assert_eq!(config.min_fields(), 6);
//! # Ok(())
//! # }
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Result};

/// Default chrono format for release dates, e.g. `Dec 21, 2017`.
pub const DEFAULT_DATE_FORMAT: &str = "%b %d, %Y";

/// Zero-based positions of each record attribute within a decoded row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnLayout {
    /// Position of the game name.
    pub name: usize,
    /// Position of the review summary text.
    pub all_reviews: usize,
    /// Position of the release date text.
    pub release_date: usize,
    /// Position of the separator-joined tag list.
    pub popular_tags: usize,
    /// Position of the original price text.
    pub original_price: usize,
}

impl Default for ColumnLayout {
    fn default() -> Self {
        Self {
            name: 1,
            all_reviews: 2,
            release_date: 3,
            popular_tags: 4,
            original_price: 5,
        }
    }
}

impl ColumnLayout {
    fn named(&self) -> [(&'static str, usize); 5] {
        [
            ("name", self.name),
            ("all_reviews", self.all_reviews),
            ("release_date", self.release_date),
            ("popular_tags", self.popular_tags),
            ("original_price", self.original_price),
        ]
    }

    /// Returns the highest column position referenced by the layout.
    pub fn max_position(&self) -> usize {
        self.named().iter().map(|(_, pos)| *pos).max().unwrap_or(0)
    }
}

/// Configuration for reading a tabular game dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatasetConfig {
    /// Column positions for each attribute.
    pub columns: ColumnLayout,

    /// Separator between fields in a row.
    pub field_separator: char,

    /// Separator between tags inside the tag column.
    pub tag_separator: char,

    /// chrono format string for the release date column.
    pub date_format: String,

    /// Insert a record into a tag bucket once, even if several raw tags
    /// normalize to the same key.
    pub dedupe_tags: bool,

    /// Whether the first line of a dataset file is a header.
    pub has_header: bool,
}

impl Default for DatasetConfig {
    fn default() -> Self {
        Self {
            columns: ColumnLayout::default(),
            field_separator: ',',
            tag_separator: ',',
            date_format: DEFAULT_DATE_FORMAT.to_string(),
            dedupe_tags: true,
            has_header: true,
        }
    }
}

impl DatasetConfig {
    /// Reads and validates a configuration from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Read`] if the file cannot be read,
    /// [`ConfigError::Parse`] if it is not valid JSON, or any validation
    /// error from [`DatasetConfig::validate`].
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.to_path_buf(),
            source: e,
        })?;

        let config: Self = serde_json::from_str(&text).map_err(ConfigError::Parse)?;
        config.validate()?;
        Ok(config)
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::EmptyDateFormat`] if the date format is blank,
    /// [`ConfigError::InvalidSeparator`] if the field separator is a quote or
    /// a line break, or [`ConfigError::DuplicateColumn`] if two attributes
    /// share a column.
    pub fn validate(&self) -> Result<()> {
        if self.date_format.trim().is_empty() {
            return Err(ConfigError::EmptyDateFormat.into());
        }
        if matches!(self.field_separator, '"' | '\n' | '\r') {
            return Err(ConfigError::InvalidSeparator {
                separator: self.field_separator,
            }
            .into());
        }

        let named = self.columns.named();
        for (i, (first, position)) in named.iter().enumerate() {
            if let Some((second, _)) = named[i + 1..].iter().find(|(_, p)| p == position) {
                return Err(ConfigError::DuplicateColumn {
                    first: *first,
                    second: *second,
                    position: *position,
                }
                .into());
            }
        }

        Ok(())
    }

    /// Minimum number of fields a row must have to be ingested.
    pub fn min_fields(&self) -> usize {
        self.columns.max_position() + 1
    }
}
