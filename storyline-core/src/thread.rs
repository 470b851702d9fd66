//! Story thread data structures

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Identifier of a story thread
///
/// Threads minted by the clustering engine carry opaque hex identifiers, but
/// one historical deployment supplied plain integer cluster ids instead.
/// Both shapes are plain strings here and every store lookup accepts either.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ThreadId(String);

impl ThreadId {
    pub fn new(id: impl Into<String>) -> Self {
        ThreadId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ThreadId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for ThreadId {
    fn from(id: String) -> Self {
        ThreadId(id)
    }
}

impl From<&str> for ThreadId {
    fn from(id: &str) -> Self {
        ThreadId(id.to_string())
    }
}

impl From<i64> for ThreadId {
    fn from(cluster_id: i64) -> Self {
        ThreadId(cluster_id.to_string())
    }
}

/// A cluster of articles believed to cover the same news event
///
/// Created lazily the instant its first article is assigned; membership only
/// grows, and `last_updated` is bumped on every membership change or title
/// regeneration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Thread {
    pub id: ThreadId,
    /// Short generated headline for the story
    pub title: String,
    /// Topic inherited from the article that created the thread; every
    /// member article shares it (clustering never merges across topics)
    pub topic: String,
    /// Processing language of the creating article
    pub language: String,
    /// Distinct languages observed across member articles
    pub languages: Vec<String>,
    /// Member article URLs in insertion order, no duplicates
    pub articles: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub last_updated: DateTime<Utc>,
}

impl Thread {
    /// Create an empty thread shell for a freshly assigned story
    pub fn new(id: ThreadId, title: String, topic: String, now: DateTime<Utc>) -> Self {
        Self {
            id,
            title,
            topic,
            language: "en".to_string(),
            languages: Vec::new(),
            articles: Vec::new(),
            created_at: now,
            last_updated: now,
        }
    }
}
