//! Storage contracts for articles and threads

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::article::Article;
use crate::thread::{Thread, ThreadId};
use crate::StorylineResult;

/// Durable article records keyed by URL
#[async_trait]
pub trait ArticleStore: Send + Sync {
    /// Whether an article with this exact URL is already stored
    async fn contains(&self, url: &str) -> StorylineResult<bool>;

    /// Insert an article; returns false when the URL was already present
    ///
    /// The check and the insert must be atomic (unique-constraint enforced)
    /// so racing writers cannot double-insert the same URL.
    async fn insert_article(&self, article: &Article) -> StorylineResult<bool>;

    async fn get_article(&self, url: &str) -> StorylineResult<Option<Article>>;

    async fn count_articles(&self) -> StorylineResult<u64>;

    /// Backfill `credibility_label` on rows that carry a score without one
    ///
    /// Returns the number of rows updated.
    async fn relabel_missing(&self) -> StorylineResult<u64>;
}

/// Durable thread records with membership linkage
#[async_trait]
pub trait ThreadStore: Send + Sync {
    /// All stored threads, in creation order
    async fn list_threads(&self) -> StorylineResult<Vec<Thread>>;

    async fn get_thread(&self, id: &ThreadId) -> StorylineResult<Option<Thread>>;

    async fn create_thread(&self, thread: &Thread) -> StorylineResult<()>;

    /// Bump `last_updated`, keeping it monotonically non-decreasing
    async fn touch_thread(&self, id: &ThreadId, at: DateTime<Utc>) -> StorylineResult<()>;

    /// Replace the generated headline; bumps `last_updated`
    async fn set_thread_title(&self, id: &ThreadId, title: &str) -> StorylineResult<()>;

    /// Add an article to the thread's ordered membership set
    ///
    /// Idempotent: returns false (and leaves `last_updated` alone) when the
    /// article was already a member.
    async fn add_article_to_thread(&self, id: &ThreadId, url: &str) -> StorylineResult<bool>;

    /// Description-or-title of each member article, in insertion order
    ///
    /// Used to seed headline regeneration on merge.
    async fn member_snippets(&self, id: &ThreadId) -> StorylineResult<Vec<String>>;
}
