//! The game record value type.

use std::collections::BTreeSet;
use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::parse::{normalize_tag, review_score};

/// One validated catalog entry.
///
/// Records are immutable once built. The store and the tag index share a
/// single copy of each record through `Arc`, so nothing is cloned on fan-out.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameRecord {
    name: String,
    release_date: NaiveDate,
    all_reviews: String,
    original_price: f64,
    tags: Vec<String>,
}

impl GameRecord {
    /// Creates a new record.
    ///
    /// # Arguments
    ///
    /// * `name` - Display name of the game
    /// * `release_date` - Calendar release date
    /// * `all_reviews` - Free-text review summary, possibly empty
    /// * `original_price` - Non-negative price, zero for free titles
    /// * `tags` - Raw tags in the order supplied
    pub fn new(
        name: impl Into<String>,
        release_date: NaiveDate,
        all_reviews: impl Into<String>,
        original_price: f64,
        tags: Vec<String>,
    ) -> Self {
        Self {
            name: name.into(),
            release_date,
            all_reviews: all_reviews.into(),
            original_price,
            tags,
        }
    }

    /// Creates a record from a separator-joined tag string.
    pub fn with_tag_list(
        name: impl Into<String>,
        release_date: NaiveDate,
        all_reviews: impl Into<String>,
        original_price: f64,
        tag_list: &str,
        separator: char,
    ) -> Self {
        let tags = tag_list.split(separator).map(str::to_string).collect();
        Self::new(name, release_date, all_reviews, original_price, tags)
    }

    /// The game name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The release date.
    pub fn release_date(&self) -> NaiveDate {
        self.release_date
    }

    /// The raw review summary.
    pub fn all_reviews(&self) -> &str {
        &self.all_reviews
    }

    /// The original price.
    pub fn original_price(&self) -> f64 {
        self.original_price
    }

    /// The raw tags as supplied.
    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    /// Score derived from the review summary; see [`review_score`].
    pub fn review_score(&self) -> f64 {
        review_score(&self.all_reviews)
    }

    /// Normalized index keys for this record's tags.
    ///
    /// Blank tags are dropped. With `dedupe` set, each key appears once in
    /// first-seen order; otherwise one key is returned per raw tag.
    pub fn index_keys(&self, dedupe: bool) -> Vec<String> {
        let mut seen = BTreeSet::new();
        self.tags
            .iter()
            .map(|raw| normalize_tag(raw))
            .filter(|tag| !tag.is_empty())
            .filter(|tag| !dedupe || seen.insert(tag.clone()))
            .collect()
    }

    /// Whether any of this record's tags normalizes to `tag`.
    pub fn has_tag(&self, tag: &str) -> bool {
        let wanted = normalize_tag(tag);
        self.tags.iter().any(|raw| normalize_tag(raw) == wanted)
    }
}

impl fmt::Display for GameRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} (released {}, ${:.2}, tags: {})",
            self.name,
            self.release_date,
            self.original_price,
            self.tags.join(", ")
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_with_tag_list_splits_raw_tags() {
        let record = GameRecord::with_tag_list(
            "Dota 2",
            date(2013, 7, 9),
            "",
            0.0,
            "Free to Play,MOBA, Strategy",
            ',',
        );
        assert_eq!(record.tags(), ["Free to Play", "MOBA", " Strategy"]);
    }

    #[test]
    fn test_index_keys_dedupe() {
        let record = GameRecord::new(
            "Shooter",
            date(2020, 1, 1),
            "",
            0.0,
            vec!["FPS".into(), " fps ".into(), "Action".into()],
        );
        assert_eq!(record.index_keys(true), vec!["fps", "action"]);
        assert_eq!(record.index_keys(false), vec!["fps", "fps", "action"]);
    }

    #[test]
    fn test_index_keys_skip_blank() {
        let record = GameRecord::with_tag_list("X", date(2020, 1, 1), "", 0.0, "Indie,, ,", ',');
        assert_eq!(record.index_keys(true), vec!["indie"]);
    }

    #[test]
    fn test_has_tag_is_normalized() {
        let record = GameRecord::with_tag_list("X", date(2020, 1, 1), "", 0.0, "Survival,FPS", ',');
        assert!(record.has_tag("  survival"));
        assert!(record.has_tag("fps"));
        assert!(!record.has_tag("rpg"));
    }

    #[test]
    fn test_display() {
        let record = GameRecord::with_tag_list("X", date(2017, 12, 21), "", 29.99, "A,B", ',');
        assert_eq!(record.to_string(), "X (released 2017-12-21, $29.99, tags: A, B)");
    }

    #[test]
    fn test_serialize_json() {
        let record = GameRecord::with_tag_list("X", date(2017, 12, 21), "Mixed", 29.99, "A", ',');
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["name"], "X");
        assert_eq!(json["release_date"], "2017-12-21");
        assert_eq!(json["original_price"], 29.99);
    }
}
