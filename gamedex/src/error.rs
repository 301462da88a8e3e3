//! Error types for the gamedex query engine.

use std::path::PathBuf;

use thiserror::Error;

/// The main error type for all gamedex operations.
///
/// Most query operations never produce an error: absent or malformed inputs
/// resolve to an empty result. Errors are reserved for skipped rows during
/// ingestion, unsupported sort attributes, aggregation precondition
/// violations, and dataset or configuration I/O.
#[derive(Error, Debug)]
pub enum GamedexError {
    /// A row was rejected during ingestion.
    #[error("ingest error: {0}")]
    Ingest(#[from] IngestError),

    /// A query could not be dispatched.
    #[error("query error: {0}")]
    Query(#[from] QueryError),

    /// An aggregation was called with a missing argument.
    #[error("aggregate error: {0}")]
    Aggregate(#[from] AggregateError),

    /// The dataset could not be read.
    #[error("load error: {0}")]
    Load(#[from] LoadError),

    /// The dataset configuration is invalid.
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
}

/// Reasons a row is skipped during ingestion.
///
/// None of these are fatal to a load; the row is dropped and the reason is
/// recorded in the [`LoadReport`](crate::engine::LoadReport).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IngestError {
    /// The row has fewer fields than the column layout requires.
    #[error("row has {found} fields, expected at least {required}")]
    TooFewFields {
        /// Number of fields present in the row.
        found: usize,
        /// Minimum number of fields required.
        required: usize,
    },

    /// The name field is empty.
    #[error("row has an empty name")]
    EmptyName,

    /// The release date is the `NaN` sentinel or empty.
    #[error("missing release date for '{name}'")]
    MissingDate {
        /// The record name.
        name: String,
    },

    /// The release date did not match the configured format.
    #[error("invalid release date '{text}' for '{name}': {reason}")]
    InvalidDate {
        /// The record name.
        name: String,
        /// The raw date text.
        text: String,
        /// The parser's description of the failure.
        reason: String,
    },
}

/// Errors that can occur while dispatching a query.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum QueryError {
    /// The requested top-k attribute is not one of the supported attributes.
    #[error("unsupported attribute: '{attribute}'")]
    UnsupportedAttribute {
        /// The attribute as supplied by the caller.
        attribute: String,
    },
}

/// Precondition violations for the price aggregations.
///
/// Unlike the tag queries, the aggregations treat an absent argument as a
/// caller bug rather than an empty result.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AggregateError {
    /// The start date was not provided.
    #[error("start date is required")]
    MissingStart,

    /// The end date was not provided.
    #[error("end date is required")]
    MissingEnd,

    /// The tag was not provided.
    #[error("tag is required")]
    MissingTag,
}

/// Errors that can occur while reading a dataset.
#[derive(Error, Debug)]
pub enum LoadError {
    /// The dataset file could not be opened.
    #[error("failed to open dataset '{}': {source}", path.display())]
    Open {
        /// The dataset path.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// A line could not be read.
    #[error("failed to read line {line}: {source}")]
    Read {
        /// One-based line number.
        line: usize,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },
}

/// Errors that can occur while loading or validating a configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("failed to read config '{}': {source}", path.display())]
    Read {
        /// The config path.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The configuration file is not valid JSON for [`DatasetConfig`](crate::config::DatasetConfig).
    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),

    /// The date format string is empty.
    #[error("date format must not be empty")]
    EmptyDateFormat,

    /// The field separator cannot delimit fields: a quote or a line break.
    #[error("invalid field separator {separator:?}")]
    InvalidSeparator {
        /// The rejected separator.
        separator: char,
    },

    /// Two columns were mapped to the same position.
    #[error("columns '{first}' and '{second}' share position {position}")]
    DuplicateColumn {
        /// The first column name.
        first: &'static str,
        /// The second column name.
        second: &'static str,
        /// The shared position.
        position: usize,
    },
}

/// Type alias for `Result<T, GamedexError>`.
pub type Result<T> = std::result::Result<T, GamedexError>;
