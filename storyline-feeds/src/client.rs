//! RSS/Atom feed client

use std::time::Duration;

use chrono::{DateTime, Utc};
use reqwest::Client;
use tracing::{debug, warn};

use storyline_core::{FeedEntry, FeedSource, StorylineError, StorylineResult};

/// Fetches and parses configured news feeds
pub struct FeedClient {
    client: Client,
}

impl FeedClient {
    pub fn new(timeout: Duration) -> Self {
        Self {
            client: Client::builder()
                .timeout(timeout)
                .user_agent("Storyline/0.1")
                .build()
                .unwrap_or_else(|_| Client::new()),
        }
    }

    /// Fetch a feed and return up to `limit` parsed entries
    pub async fn fetch_entries(
        &self,
        source: &FeedSource,
        limit: usize,
    ) -> StorylineResult<Vec<FeedEntry>> {
        let response = self.client.get(&source.feed_url).send().await?;

        if !response.status().is_success() {
            return Err(StorylineError::feed(format!(
                "{} returned status {}",
                source.feed_url,
                response.status()
            )));
        }

        let content = response.bytes().await?;

        // Try parsing as RSS first, then Atom
        if let Ok(channel) = rss::Channel::read_from(&content[..]) {
            let mut entries = parse_rss_channel(&channel);
            entries.truncate(limit);
            debug!(source = %source.name, count = entries.len(), "parsed RSS feed");
            return Ok(entries);
        }

        if let Ok(feed) = atom_syndication::Feed::read_from(&content[..]) {
            let mut entries = parse_atom_feed(&feed);
            entries.truncate(limit);
            debug!(source = %source.name, count = entries.len(), "parsed Atom feed");
            return Ok(entries);
        }

        Err(StorylineError::feed(format!(
            "Failed to parse feed: {}",
            source.feed_url
        )))
    }
}

impl Default for FeedClient {
    fn default() -> Self {
        Self::new(Duration::from_secs(10))
    }
}

fn parse_rss_channel(channel: &rss::Channel) -> Vec<FeedEntry> {
    channel
        .items()
        .iter()
        .filter_map(|item| {
            let title = item.title()?.to_string();
            let url = item.link()?.to_string();

            let published = item
                .pub_date()
                .and_then(|d| parse_feed_date(d));

            let summary = item
                .description()
                .map(strip_html)
                .filter(|s| !s.is_empty());

            Some(FeedEntry {
                url,
                title,
                summary,
                published,
            })
        })
        .collect()
}

fn parse_atom_feed(feed: &atom_syndication::Feed) -> Vec<FeedEntry> {
    feed.entries()
        .iter()
        .filter_map(|entry| {
            let title = entry.title().to_string();
            let url = entry.links().first().map(|l| l.href().to_string())?;

            let published = entry
                .published()
                .or_else(|| Some(entry.updated()))
                .map(|d| d.with_timezone(&Utc));

            let summary = entry
                .summary()
                .map(|s| strip_html(s.as_str()))
                .filter(|s| !s.is_empty());

            Some(FeedEntry {
                url,
                title,
                summary,
                published,
            })
        })
        .collect()
}

/// Parse the date formats feeds actually use: RFC 2822, then RFC 3339
fn parse_feed_date(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(parsed) = DateTime::parse_from_rfc2822(raw) {
        return Some(parsed.with_timezone(&Utc));
    }
    match DateTime::parse_from_rfc3339(raw) {
        Ok(parsed) => Some(parsed.with_timezone(&Utc)),
        Err(e) => {
            warn!("Unparseable feed date {:?}: {}", raw, e);
            None
        }
    }
}

/// Strip HTML tags and entities from feed descriptions
pub(crate) fn strip_html(html: &str) -> String {
    let mut result = String::new();
    let mut in_tag = false;

    for c in html.chars() {
        match c {
            '<' => in_tag = true,
            '>' => in_tag = false,
            _ if !in_tag => result.push(c),
            _ => {}
        }
    }

    result
        .replace("&nbsp;", " ")
        .replace("&amp;", "&")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}
