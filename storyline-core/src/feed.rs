//! Feed source descriptors and parsed feed entries

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A configured news feed
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedSource {
    /// Expected language of the feed ("en", "fr", ...)
    pub language: String,
    /// ISO country code, empty for international feeds
    pub country: String,
    /// Display name of the source
    pub name: String,
    /// RSS or Atom feed URL
    pub feed_url: String,
}

impl FeedSource {
    pub fn new(language: &str, country: &str, name: &str, feed_url: &str) -> Self {
        Self {
            language: language.to_string(),
            country: country.to_string(),
            name: name.to_string(),
            feed_url: feed_url.to_string(),
        }
    }
}

/// One entry parsed out of a feed, before the article body is fetched
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedEntry {
    /// Link to the full article
    pub url: String,
    /// Entry title
    pub title: String,
    /// Raw summary/description from the feed, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    /// Publication timestamp, when the feed carried a parseable one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub published: Option<DateTime<Utc>>,
}
