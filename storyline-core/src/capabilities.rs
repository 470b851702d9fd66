//! Capability traits for external collaborators
//!
//! The pipeline composes fetching, normalization, translation and headline
//! generation through these traits so the clustering/scoring core can be
//! exercised with deterministic fakes.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::StorylineResult;

/// A fetched and parsed article page
#[derive(Debug, Clone)]
pub struct FetchedPage {
    pub title: String,
    /// Extracted body text, pre-normalization
    pub text: String,
    pub author: Option<String>,
    pub image: Option<String>,
}

/// Output of the text normalization collaborator
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Normalized {
    /// Cleaned article body, free of boilerplate
    pub content: String,
    /// Concise one or two sentence summary
    pub description: String,
    /// One of the allowed topics, or empty on fallback
    pub topic: String,
}

/// Downloads an article URL and extracts its title, body and metadata
#[async_trait]
pub trait ArticleFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> StorylineResult<FetchedPage>;
}

/// Cleans raw article text and classifies it into one allowed topic
///
/// Implementations must fall back to the raw inputs with an empty topic when
/// the upstream answer cannot be decoded, rather than failing the article.
#[async_trait]
pub trait TextNormalizer: Send + Sync {
    async fn normalize(
        &self,
        raw_content: &str,
        raw_description: &str,
        allowed_topics: &[&str],
    ) -> StorylineResult<Normalized>;
}

/// Translates arbitrary text into English
#[async_trait]
pub trait Translator: Send + Sync {
    async fn translate_to_english(&self, text: &str) -> StorylineResult<String>;
}

/// Produces a short (3-6 word) headline from related text snippets
#[async_trait]
pub trait HeadlineGenerator: Send + Sync {
    async fn headline(&self, snippets: &[String]) -> StorylineResult<String>;
}
