//! Field-level text parsing for ingestion.
//!
//! Every function here is pure and total: malformed input maps to a
//! documented fallback instead of an error, except for release dates where
//! the caller needs to know why a row was dropped.

use chrono::NaiveDate;

/// Sentinel used by the source dataset for missing values.
pub const MISSING_SENTINEL: &str = "NaN";

/// Currency symbols stripped from the front of a price token.
const CURRENCY_SYMBOLS: [char; 4] = ['$', '€', '£', '¥'];

/// Normalizes a raw tag into its index key: trimmed and lowercased.
///
/// ```rust
/// assert_eq!(gamedex::parse::normalize_tag("  MOBA "), "moba");
/// ```
pub fn normalize_tag(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// Outcome of parsing a price token.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ParsedPrice {
    /// The token held a valid non-negative number.
    Value(f64),
    /// The token denotes a free or unpriced title (`Free`, `NaN`, blank).
    Free,
    /// The token could not be parsed and defaults to zero.
    Fallback,
}

impl ParsedPrice {
    /// The price in currency units, zero unless a value was parsed.
    pub fn amount(self) -> f64 {
        match self {
            Self::Value(v) => v,
            Self::Free | Self::Fallback => 0.0,
        }
    }
}

/// Parses a price token such as `$29.99`, `Free to Play`, or `NaN`.
///
/// Blank tokens, tokens containing "free" in any case, and the `NaN`
/// sentinel are free. A leading currency symbol is stripped before the
/// numeric parse. Anything that still fails to parse, or parses to a
/// negative or non-finite number, is a [`ParsedPrice::Fallback`].
pub fn parse_price(token: &str) -> ParsedPrice {
    let trimmed = token.trim();
    if trimmed.is_empty()
        || trimmed.to_lowercase().contains("free")
        || trimmed.eq_ignore_ascii_case(MISSING_SENTINEL)
    {
        return ParsedPrice::Free;
    }

    let numeric = trimmed
        .strip_prefix(|c: char| CURRENCY_SYMBOLS.contains(&c))
        .unwrap_or(trimmed)
        .trim();

    match numeric.parse::<f64>() {
        Ok(v) if v.is_finite() && v >= 0.0 => ParsedPrice::Value(v),
        _ => ParsedPrice::Fallback,
    }
}

/// Why a release date could not be read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DateIssue {
    /// Blank or the `NaN` sentinel.
    Missing,
    /// Present but not in the expected format.
    Invalid(String),
}

/// Parses release-date text using a chrono format string.
///
/// # Errors
///
/// Returns [`DateIssue::Missing`] for blank or `NaN` text and
/// [`DateIssue::Invalid`] when the text does not match `format`.
pub fn parse_release_date(text: &str, format: &str) -> Result<NaiveDate, DateIssue> {
    let trimmed = text.trim();
    if trimmed.is_empty() || trimmed.eq_ignore_ascii_case(MISSING_SENTINEL) {
        return Err(DateIssue::Missing);
    }

    NaiveDate::parse_from_str(trimmed, format).map_err(|e| DateIssue::Invalid(e.to_string()))
}

/// Derives a sortable score from a review summary.
///
/// The percentage is the integer token ending just before the first `%`.
/// If the text also holds a parenthesized review count, such as
/// `(3,094,223)`, the score is `percent + count / 1000.0`; otherwise it is the
/// percentage alone. Returns 0.0 when there is no `%`, or when the
/// percentage or the count is not an integer.
///
/// ```rust
/// use gamedex::parse::review_score;
///
/// let summary = "Very Positive,(1,015,621),- 85% of the 1,015,621 user reviews";
/// assert!((review_score(summary) - 1100.621).abs() < 1e-9);
/// assert_eq!(review_score("Mostly Positive"), 0.0);
/// ```
pub fn review_score(summary: &str) -> f64 {
    extract_review_score(summary).unwrap_or(0.0)
}

fn extract_review_score(summary: &str) -> Option<f64> {
    let percent_at = summary.find('%')?;
    let head = &summary[..percent_at];
    let start = head.rfind(' ').map_or(0, |i| i + 1);
    let percent: i32 = head[start..].trim().parse().ok()?;

    let (Some(open), Some(close)) = (summary.find('('), summary.find(')')) else {
        return Some(f64::from(percent));
    };
    if close <= open {
        return Some(f64::from(percent));
    }

    let count: i32 = summary[open + 1..close].replace(',', "").trim().parse().ok()?;
    Some(f64::from(percent) + f64::from(count) / 1000.0)
}
