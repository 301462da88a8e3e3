//! Row-to-record conversion.
//!
//! [`build_record`] validates one decoded row against a [`DatasetConfig`]
//! and produces a [`GameRecord`]. A row is skipped when it is too short, has
//! no name, or has no usable release date. A bad price never skips a row: it
//! defaults to zero and is flagged in the returned [`Ingested`] value.

use tracing::warn;

use crate::config::DatasetConfig;
use crate::error::IngestError;
use crate::parse::{DateIssue, ParsedPrice, parse_price, parse_release_date};
use crate::record::GameRecord;

/// A record built from a row, plus what happened to its price.
#[derive(Debug, Clone, PartialEq)]
pub struct Ingested {
    /// The validated record.
    pub record: GameRecord,
    /// How the price token was interpreted.
    pub price: ParsedPrice,
}

impl Ingested {
    /// Whether the price token was unparsable and defaulted to zero.
    pub fn price_fell_back(&self) -> bool {
        self.price == ParsedPrice::Fallback
    }
}

/// Builds a record from a decoded row.
///
/// # Errors
///
/// - [`IngestError::TooFewFields`] if the row is shorter than the layout
/// - [`IngestError::EmptyName`] if the name field is blank
/// - [`IngestError::MissingDate`] if the date is blank or `NaN`
/// - [`IngestError::InvalidDate`] if the date does not match the format
pub fn build_record<S: AsRef<str>>(
    row: &[S],
    config: &DatasetConfig,
) -> Result<Ingested, IngestError> {
    let required = config.min_fields();
    if row.len() < required {
        return Err(IngestError::TooFewFields {
            found: row.len(),
            required,
        });
    }

    let columns = &config.columns;
    let field = |pos: usize| row[pos].as_ref();

    let name = field(columns.name).trim();
    if name.is_empty() {
        return Err(IngestError::EmptyName);
    }

    let release_date = parse_release_date(field(columns.release_date), &config.date_format)
        .map_err(|issue| match issue {
            DateIssue::Missing => IngestError::MissingDate {
                name: name.to_string(),
            },
            DateIssue::Invalid(reason) => IngestError::InvalidDate {
                name: name.to_string(),
                text: field(columns.release_date).to_string(),
                reason,
            },
        })?;

    let price_token = field(columns.original_price);
    let price = parse_price(price_token);
    if price == ParsedPrice::Fallback {
        warn!(game = name, token = price_token, "invalid price format, using 0.00");
    }

    let record = GameRecord::with_tag_list(
        name,
        release_date,
        field(columns.all_reviews),
        price.amount(),
        field(columns.popular_tags),
        config.tag_separator,
    );

    Ok(Ingested { record, price })
}
