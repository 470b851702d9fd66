//! The ingestion orchestrator

use std::sync::Arc;

use chrono::Utc;
use tokio::time::{sleep, timeout};
use tracing::{debug, info, instrument, warn};

use storyline_cluster::ThreadClusterer;
use storyline_core::{
    topics, Article, ArticleFetcher, ArticleStore, FeedEntry, FeedSource, Normalized,
    StorylineError, StorylineResult, TextNormalizer, ThreadStore, Translator,
};
use storyline_feeds::FeedClient;
use storyline_scoring::{assess, AdDetector, ClickbaitDetector, GrammarCheck, ScoreInput, TrustTable};

use crate::config::PipelineConfig;
use crate::language::detect_language;

/// One sequential ingestion worker
///
/// Owns the clustering engine mutably: assignments are exclusive by
/// construction. Running two pipelines concurrently against the same store
/// is not safe without external coordination.
pub struct IngestionPipeline {
    feeds: FeedClient,
    sources: Vec<FeedSource>,
    fetcher: Arc<dyn ArticleFetcher>,
    normalizer: Arc<dyn TextNormalizer>,
    translator: Arc<dyn Translator>,
    articles: Arc<dyn ArticleStore>,
    threads: Arc<dyn ThreadStore>,
    clusterer: ThreadClusterer,
    trust: TrustTable,
    clickbait: ClickbaitDetector,
    ads: AdDetector,
    grammar: Box<dyn GrammarCheck>,
    config: PipelineConfig,
}

impl IngestionPipeline {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        sources: Vec<FeedSource>,
        fetcher: Arc<dyn ArticleFetcher>,
        normalizer: Arc<dyn TextNormalizer>,
        translator: Arc<dyn Translator>,
        articles: Arc<dyn ArticleStore>,
        threads: Arc<dyn ThreadStore>,
        clusterer: ThreadClusterer,
        grammar: Box<dyn GrammarCheck>,
        config: PipelineConfig,
    ) -> Self {
        Self {
            feeds: FeedClient::new(config.call_timeout),
            sources,
            fetcher,
            normalizer,
            translator,
            articles,
            threads,
            clusterer,
            trust: TrustTable::default(),
            clickbait: ClickbaitDetector::default(),
            ads: AdDetector::default(),
            grammar,
            config,
        }
    }

    /// Replace the default source reputation table
    pub fn with_trust_table(mut self, trust: TrustTable) -> Self {
        self.trust = trust;
        self
    }

    /// Crawl every configured source once
    ///
    /// Returns the number of newly inserted articles. A failing source is
    /// logged and skipped; the run itself never fails.
    pub async fn run(&mut self) -> usize {
        let mut total = 0;
        let sources = self.sources.clone();

        for source in &sources {
            let entries = match self
                .feeds
                .fetch_entries(source, self.config.max_articles_per_source)
                .await
            {
                Ok(entries) => entries,
                Err(e) => {
                    warn!(source = %source.name, "failed to fetch feed: {}", e);
                    continue;
                }
            };
            total += self.ingest_entries(source, entries).await;
        }

        info!(total, "crawl finished");
        total
    }

    /// Process feed entries for one source, returning how many were inserted
    ///
    /// Per-item failures are logged and skipped so the remaining entries
    /// still get processed.
    pub async fn ingest_entries(&mut self, source: &FeedSource, entries: Vec<FeedEntry>) -> usize {
        let mut inserted = 0;

        for entry in entries {
            match self.ingest_entry(source, &entry).await {
                Ok(true) => {
                    inserted += 1;
                    // Politeness delay between articles
                    sleep(self.config.item_delay).await;
                }
                Ok(false) => debug!(url = %entry.url, "skipped"),
                Err(e) => warn!(url = %entry.url, "failed to ingest article: {}", e),
            }
        }

        inserted
    }

    /// Ingest a single feed entry end to end
    ///
    /// Returns Ok(false) when the entry is skipped (already stored, or its
    /// page could not be fetched/parsed).
    #[instrument(skip(self, entry), fields(url = %entry.url))]
    async fn ingest_entry(
        &mut self,
        source: &FeedSource,
        entry: &FeedEntry,
    ) -> StorylineResult<bool> {
        // Dedup gate: re-runs over the same feed insert nothing
        if self.articles.contains(&entry.url).await? {
            return Ok(false);
        }

        // Fetch and parse the article page; failure skips this URL entirely
        let page = match timeout(self.config.call_timeout, self.fetcher.fetch(&entry.url)).await {
            Ok(Ok(page)) => page,
            Ok(Err(e)) => {
                warn!("fetch failed, skipping: {}", e);
                return Ok(false);
            }
            Err(_) => {
                warn!("fetch timed out, skipping");
                return Ok(false);
            }
        };

        let raw_content = page.text;
        let raw_description = entry.summary.clone().unwrap_or_default();

        let language = detect_language(&raw_content);

        // Normalization failure degrades to the raw inputs with an empty
        // topic instead of dropping the article
        let normalized = match timeout(
            self.config.call_timeout,
            self.normalizer
                .normalize(&raw_content, &raw_description, topics::ALLOWED_TOPICS),
        )
        .await
        {
            Ok(Ok(normalized)) => normalized,
            Ok(Err(e)) => {
                warn!("normalization failed, keeping raw content: {}", e);
                Normalized {
                    content: raw_content.clone(),
                    description: raw_description.clone(),
                    topic: String::new(),
                }
            }
            Err(_) => {
                warn!("normalization timed out, keeping raw content");
                Normalized {
                    content: raw_content.clone(),
                    description: raw_description.clone(),
                    topic: String::new(),
                }
            }
        };

        let content_en = if language == "en" {
            normalized.content.clone()
        } else {
            timeout(
                self.config.call_timeout,
                self.translator.translate_to_english(&normalized.content),
            )
            .await
            .map_err(|_| StorylineError::timeout(format!("translating {}", entry.url)))??
        };

        let title = if page.title.is_empty() {
            entry.title.clone()
        } else {
            page.title.clone()
        };

        let assessment = assess(
            &ScoreInput {
                url: &entry.url,
                title: &title,
                content: &normalized.content,
                description: &normalized.description,
                author: page.author.as_deref(),
                image: page.image.as_deref(),
            },
            &self.trust,
            &self.clickbait,
            &self.ads,
            self.grammar.as_ref(),
        );

        let thread_id = self.clusterer.assign(&content_en, &normalized.topic).await?;

        let article = Article {
            url: entry.url.clone(),
            source: source.name.clone(),
            title,
            description: normalized.description,
            published: entry.published,
            author: page.author,
            language,
            content: normalized.content,
            content_en,
            image: page.image,
            topic: normalized.topic,
            thread_id: thread_id.clone(),
            credibility_score: assessment.score,
            credibility_label: assessment.label,
            is_clickbait: assessment.is_clickbait,
            is_ad: assessment.is_ad,
            fetched_at: Utc::now(),
        };

        let inserted = self.articles.insert_article(&article).await?;
        if inserted {
            // Membership add is duplicate-safe; the store recomputes the
            // thread's language set from its members on read
            self.threads
                .add_article_to_thread(&thread_id, &article.url)
                .await?;
            info!(thread = %thread_id, topic = %article.topic, "ingested article");
        }

        Ok(inserted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::Mutex;
    use std::time::Duration;

    use storyline_cluster::ClustererConfig;
    use storyline_core::{FetchedPage, HeadlineGenerator};
    use storyline_scoring::HeuristicGrammarCheck;
    use storyline_store::SqliteStore;

    /// Serves canned pages; URLs outside the map fail like a dead link
    struct StaticFetcher {
        pages: HashMap<String, FetchedPage>,
    }

    #[async_trait]
    impl ArticleFetcher for StaticFetcher {
        async fn fetch(&self, url: &str) -> StorylineResult<FetchedPage> {
            self.pages
                .get(url)
                .cloned()
                .ok_or_else(|| StorylineError::fetch(format!("no page for {}", url)))
        }
    }

    /// Passes content through and answers with a preset topic queue
    struct ScriptedNormalizer {
        topics: Mutex<Vec<String>>,
    }

    impl ScriptedNormalizer {
        fn new(topics: &[&str]) -> Self {
            Self {
                topics: Mutex::new(topics.iter().rev().map(|t| t.to_string()).collect()),
            }
        }
    }

    #[async_trait]
    impl TextNormalizer for ScriptedNormalizer {
        async fn normalize(
            &self,
            raw_content: &str,
            raw_description: &str,
            _allowed_topics: &[&str],
        ) -> StorylineResult<Normalized> {
            let topic = self.topics.lock().unwrap().pop().unwrap_or_default();
            Ok(Normalized {
                content: raw_content.to_string(),
                description: raw_description.to_string(),
                topic,
            })
        }
    }

    /// Normalizer that always fails, to exercise the raw-content fallback
    struct BrokenNormalizer;

    #[async_trait]
    impl TextNormalizer for BrokenNormalizer {
        async fn normalize(
            &self,
            _raw_content: &str,
            _raw_description: &str,
            _allowed_topics: &[&str],
        ) -> StorylineResult<Normalized> {
            Err(StorylineError::llm("scripted failure"))
        }
    }

    struct MarkedTranslator;

    #[async_trait]
    impl Translator for MarkedTranslator {
        async fn translate_to_english(&self, text: &str) -> StorylineResult<String> {
            Ok(format!("[en] {}", text))
        }
    }

    struct EchoHeadlines;

    #[async_trait]
    impl HeadlineGenerator for EchoHeadlines {
        async fn headline(&self, snippets: &[String]) -> StorylineResult<String> {
            Ok(snippets.first().cloned().unwrap_or_default())
        }
    }

    const QUAKE_BODY: &str = "A strong earthquake struck region A early on Friday morning, \
        damaging buildings across the provincial capital and forcing thousands of residents \
        into the streets while emergency services assessed the scale of the destruction.";

    const AFTERSHOCK_BODY: &str = "Aftershocks from the strong earthquake continued to shake \
        region A on Saturday, and emergency services said thousands of residents remained \
        outside damaged buildings across the provincial capital.";

    fn page(title: &str, body: &str) -> FetchedPage {
        FetchedPage {
            title: title.to_string(),
            text: body.to_string(),
            author: Some("Wire Staff".to_string()),
            image: None,
        }
    }

    fn entry(url: &str) -> FeedEntry {
        FeedEntry {
            url: url.to_string(),
            title: "Feed entry title".to_string(),
            summary: Some("Feed summary.".to_string()),
            published: None,
        }
    }

    fn source() -> FeedSource {
        FeedSource::new("en", "", "Test Wire", "https://example.com/feed.xml")
    }

    fn pipeline(
        store: Arc<SqliteStore>,
        fetcher: StaticFetcher,
        normalizer: Arc<dyn TextNormalizer>,
    ) -> IngestionPipeline {
        let clusterer = ThreadClusterer::new(
            Arc::clone(&store) as Arc<dyn ThreadStore>,
            Arc::new(EchoHeadlines),
            ClustererConfig::default(),
        );
        IngestionPipeline::new(
            vec![source()],
            Arc::new(fetcher),
            normalizer,
            Arc::new(MarkedTranslator),
            Arc::clone(&store) as Arc<dyn ArticleStore>,
            Arc::clone(&store) as Arc<dyn ThreadStore>,
            clusterer,
            Box::new(HeuristicGrammarCheck),
            PipelineConfig {
                item_delay: Duration::ZERO,
                ..PipelineConfig::default()
            },
        )
    }

    #[tokio::test]
    async fn test_ingest_and_dedup_idempotence() {
        let store = Arc::new(SqliteStore::new_in_memory().unwrap());
        let fetcher = StaticFetcher {
            pages: HashMap::from([
                ("https://example.com/a".to_string(), page("Quake hits", QUAKE_BODY)),
                ("https://example.com/b".to_string(), page("Aftershocks", AFTERSHOCK_BODY)),
            ]),
        };
        let normalizer = Arc::new(ScriptedNormalizer::new(&["world", "world", "world", "world"]));
        let mut pipeline = pipeline(Arc::clone(&store), fetcher, normalizer);

        let entries = vec![entry("https://example.com/a"), entry("https://example.com/b")];
        let first = pipeline.ingest_entries(&source(), entries.clone()).await;
        assert_eq!(first, 2);
        assert_eq!(store.count_articles().await.unwrap(), 2);

        // Second run over identical feed content inserts nothing
        let second = pipeline.ingest_entries(&source(), entries).await;
        assert_eq!(second, 0);
        assert_eq!(store.count_articles().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_similar_articles_share_a_thread() {
        let store = Arc::new(SqliteStore::new_in_memory().unwrap());
        let fetcher = StaticFetcher {
            pages: HashMap::from([
                ("https://example.com/a".to_string(), page("Quake hits", QUAKE_BODY)),
                ("https://example.com/b".to_string(), page("Aftershocks", AFTERSHOCK_BODY)),
            ]),
        };
        let normalizer = Arc::new(ScriptedNormalizer::new(&["world", "world"]));
        let mut pipeline = pipeline(Arc::clone(&store), fetcher, normalizer);

        pipeline
            .ingest_entries(
                &source(),
                vec![entry("https://example.com/a"), entry("https://example.com/b")],
            )
            .await;

        let a = store.get_article("https://example.com/a").await.unwrap().unwrap();
        let b = store.get_article("https://example.com/b").await.unwrap().unwrap();
        assert_eq!(a.thread_id, b.thread_id);

        let thread = store.get_thread(&a.thread_id).await.unwrap().unwrap();
        assert_eq!(thread.articles.len(), 2);
        assert_eq!(thread.languages, vec!["en".to_string()]);
    }

    #[tokio::test]
    async fn test_topic_gate_splits_identical_content() {
        let store = Arc::new(SqliteStore::new_in_memory().unwrap());
        let fetcher = StaticFetcher {
            pages: HashMap::from([
                ("https://example.com/a".to_string(), page("Quake hits", QUAKE_BODY)),
                ("https://example.com/b".to_string(), page("Quake hits", QUAKE_BODY)),
            ]),
        };
        // Identical bodies, different topics: must land in different threads
        let normalizer = Arc::new(ScriptedNormalizer::new(&["world", "politics"]));
        let mut pipeline = pipeline(Arc::clone(&store), fetcher, normalizer);

        pipeline
            .ingest_entries(
                &source(),
                vec![entry("https://example.com/a"), entry("https://example.com/b")],
            )
            .await;

        let a = store.get_article("https://example.com/a").await.unwrap().unwrap();
        let b = store.get_article("https://example.com/b").await.unwrap().unwrap();
        assert_ne!(a.thread_id, b.thread_id);
    }

    #[tokio::test]
    async fn test_dead_link_skips_without_aborting_run() {
        let store = Arc::new(SqliteStore::new_in_memory().unwrap());
        let fetcher = StaticFetcher {
            pages: HashMap::from([(
                "https://example.com/ok".to_string(),
                page("Quake hits", QUAKE_BODY),
            )]),
        };
        let normalizer = Arc::new(ScriptedNormalizer::new(&["world"]));
        let mut pipeline = pipeline(Arc::clone(&store), fetcher, normalizer);

        let inserted = pipeline
            .ingest_entries(
                &source(),
                vec![entry("https://example.com/dead"), entry("https://example.com/ok")],
            )
            .await;

        assert_eq!(inserted, 1);
        assert!(store.get_article("https://example.com/ok").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_normalizer_failure_keeps_raw_content() {
        let store = Arc::new(SqliteStore::new_in_memory().unwrap());
        let fetcher = StaticFetcher {
            pages: HashMap::from([(
                "https://example.com/a".to_string(),
                page("Quake hits", QUAKE_BODY),
            )]),
        };
        let mut pipeline = pipeline(Arc::clone(&store), fetcher, Arc::new(BrokenNormalizer));

        let inserted = pipeline
            .ingest_entries(&source(), vec![entry("https://example.com/a")])
            .await;
        assert_eq!(inserted, 1);

        let article = store.get_article("https://example.com/a").await.unwrap().unwrap();
        assert_eq!(article.content, QUAKE_BODY);
        assert_eq!(article.description, "Feed summary.");
        assert_eq!(article.topic, "");
    }

    #[tokio::test]
    async fn test_non_english_content_is_translated() {
        let store = Arc::new(SqliteStore::new_in_memory().unwrap());
        let french = "Le gouvernement a annoncé vendredi de nouvelles mesures économiques pour \
                      soutenir les entreprises touchées par la crise de l'énergie, et les \
                      syndicats ont salué une décision attendue depuis plusieurs mois.";
        let fetcher = StaticFetcher {
            pages: HashMap::from([(
                "https://example.com/fr".to_string(),
                page("Mesures économiques", french),
            )]),
        };
        let normalizer = Arc::new(ScriptedNormalizer::new(&["economy"]));
        let mut pipeline = pipeline(Arc::clone(&store), fetcher, normalizer);

        pipeline
            .ingest_entries(&source(), vec![entry("https://example.com/fr")])
            .await;

        let article = store.get_article("https://example.com/fr").await.unwrap().unwrap();
        assert_eq!(article.language, "fr");
        assert!(article.content_en.starts_with("[en] "));
        assert_eq!(article.content, french);
    }

    #[tokio::test]
    async fn test_scored_fields_are_persisted() {
        let store = Arc::new(SqliteStore::new_in_memory().unwrap());
        let fetcher = StaticFetcher {
            pages: HashMap::from([(
                "https://example.com/a".to_string(),
                page("Quake hits", QUAKE_BODY),
            )]),
        };
        let normalizer = Arc::new(ScriptedNormalizer::new(&["world"]));
        let mut pipeline = pipeline(Arc::clone(&store), fetcher, normalizer);

        pipeline
            .ingest_entries(&source(), vec![entry("https://example.com/a")])
            .await;

        let article = store.get_article("https://example.com/a").await.unwrap().unwrap();
        assert!(article.credibility_score <= 100);
        assert_eq!(
            article.credibility_label,
            storyline_core::CredibilityLabel::from_score(article.credibility_score)
        );
        assert!(!article.is_clickbait);
        assert!(!article.is_ad);
    }
}
