//! Article data structures

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::thread::ThreadId;

/// Credibility bucket derived from the 0-100 credibility score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CredibilityLabel {
    High,
    Medium,
    Low,
}

impl CredibilityLabel {
    /// Map a credibility score to its label bucket
    ///
    /// Boundary-inclusive on the high side: 80 is `High`, 50 is `Medium`.
    /// Downstream filters key on these exact boundaries.
    pub fn from_score(score: u8) -> Self {
        if score >= 80 {
            CredibilityLabel::High
        } else if score >= 50 {
            CredibilityLabel::Medium
        } else {
            CredibilityLabel::Low
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CredibilityLabel::High => "high",
            CredibilityLabel::Medium => "medium",
            CredibilityLabel::Low => "low",
        }
    }
}

impl std::fmt::Display for CredibilityLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for CredibilityLabel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "high" => Ok(CredibilityLabel::High),
            "medium" => Ok(CredibilityLabel::Medium),
            "low" => Ok(CredibilityLabel::Low),
            other => Err(format!("unknown credibility label: {}", other)),
        }
    }
}

/// A single fetched news item
///
/// Created exactly once at ingestion time and never mutated afterward.
/// `url` is the unique natural key across all stored articles.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Article {
    /// Canonical article URL (unique natural key, the dedup gate)
    pub url: String,
    /// Name of the feed source the article came from
    pub source: String,
    /// Article title as published
    pub title: String,
    /// Short summary, possibly empty when no description survived processing
    pub description: String,
    /// Publication timestamp from the feed, when one could be parsed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub published: Option<DateTime<Utc>>,
    /// First listed author, when the page exposes one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    /// ISO 639-1 two-letter language code, or `"unknown"`
    pub language: String,
    /// Cleaned article body
    pub content: String,
    /// English rendition of `content` (identical when already English)
    pub content_en: String,
    /// Lead image URL
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    /// One label from the closed topic set, or empty on normalizer fallback
    pub topic: String,
    /// Owning story thread
    pub thread_id: ThreadId,
    /// Heuristic trust estimate, always within 0-100
    pub credibility_score: u8,
    /// Deterministic function of `credibility_score`
    pub credibility_label: CredibilityLabel,
    pub is_clickbait: bool,
    pub is_ad: bool,
    /// When the pipeline ingested this article
    pub fetched_at: DateTime<Utc>,
}
