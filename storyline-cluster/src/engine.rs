//! The thread clustering engine
//!
//! Owns one centroid per existing thread and decides, for each incoming
//! article, whether to merge into the nearest same-topic thread or create a
//! new one. State is explicit and per-engine (never ambient), so tests get
//! fresh engines and the pipeline holds the single mutable handle.

use std::sync::Arc;

use chrono::Utc;
use indexmap::IndexMap;
use sha2::{Digest, Sha256};
use tracing::{debug, info, instrument};

use storyline_core::{HeadlineGenerator, StorylineResult, Thread, ThreadId, ThreadStore};

use crate::similarity::cosine_similarity;
use crate::vectorizer::VectorSpaceModel;

/// Tunables for the clustering engine
#[derive(Debug, Clone)]
pub struct ClustererConfig {
    /// Minimum cosine similarity to fold an article into an existing thread
    /// (boundary inclusive)
    pub merge_threshold: f32,
    /// Vocabulary cap for the term-weighting model
    pub max_features: usize,
    /// How much of the new article's text seeds headline generation
    pub snippet_chars: usize,
}

impl Default for ClustererConfig {
    fn default() -> Self {
        Self {
            merge_threshold: 0.4,
            max_features: 1000,
            snippet_chars: 200,
        }
    }
}

/// A thread's semantic fingerprint plus the topic gate
#[derive(Debug, Clone)]
struct Centroid {
    topic: String,
    vector: Vec<f32>,
}

/// Online, single-pass clustering engine with incremental centroids
///
/// Cost per assignment is O(existing threads in topic); there is no global
/// re-clustering and no fixed cluster count.
pub struct ThreadClusterer {
    store: Arc<dyn ThreadStore>,
    headlines: Arc<dyn HeadlineGenerator>,
    config: ClustererConfig,
    model: VectorSpaceModel,
    /// Centroids in thread-creation order; the scan keeps a strictly-greater
    /// best, so equal similarities resolve to the earliest-created thread
    centroids: IndexMap<ThreadId, Centroid>,
    initialized: bool,
}

impl ThreadClusterer {
    pub fn new(
        store: Arc<dyn ThreadStore>,
        headlines: Arc<dyn HeadlineGenerator>,
        config: ClustererConfig,
    ) -> Self {
        let model = VectorSpaceModel::with_max_features(config.max_features);
        Self {
            store,
            headlines,
            config,
            model,
            centroids: IndexMap::new(),
            initialized: false,
        }
    }

    /// Assign text to a story thread, creating one when nothing matches
    ///
    /// Returns the id of the owning thread. The caller is responsible for
    /// adding the article to the thread's membership afterward.
    #[instrument(skip(self, text))]
    pub async fn assign(&mut self, text: &str, topic: &str) -> StorylineResult<ThreadId> {
        if !self.initialized {
            self.initialize().await?;
        }
        // Empty store at startup: no titles to fit on, so the first article
        // seeds the vocabulary instead
        if !self.model.is_fitted() {
            self.model.fit(std::slice::from_ref(&text.to_string()));
        }

        let query = self.model.embed(text);

        if self.centroids.is_empty() {
            return self.create_thread(text, topic, query).await;
        }

        let mut best: Option<(ThreadId, f32)> = None;
        for (tid, centroid) in &self.centroids {
            // Hard gate: threads of another topic are never candidates
            if centroid.topic != topic {
                continue;
            }
            let sim = cosine_similarity(&query, &centroid.vector);
            if best.as_ref().map_or(true, |(_, b)| sim > *b) {
                best = Some((tid.clone(), sim));
            }
        }

        match best {
            Some((tid, sim)) if sim >= self.config.merge_threshold => {
                debug!(thread = %tid, sim, "merging into existing thread");
                self.merge(tid, &query, text).await
            }
            _ => {
                debug!(topic, "no candidate above threshold, creating thread");
                self.create_thread(text, topic, query).await
            }
        }
    }

    /// Refit the vocabulary on the current thread titles and atomically
    /// reproject every centroid
    ///
    /// Administrative operation, invoked out-of-band. Each centroid is
    /// reprojected from its thread's title; the incremental averages
    /// accumulated under the old vocabulary are not recoverable.
    pub async fn rebuild_vocabulary(&mut self) -> StorylineResult<()> {
        let threads = self.store.list_threads().await?;
        let titles: Vec<String> = threads
            .iter()
            .map(|t| t.title.clone())
            .filter(|t| !t.is_empty())
            .collect();

        let mut model = VectorSpaceModel::with_max_features(self.config.max_features);
        model.fit(&titles);

        let centroids = threads
            .iter()
            .map(|t| {
                let centroid = Centroid {
                    topic: t.topic.clone(),
                    vector: model.embed(&t.title),
                };
                (t.id.clone(), centroid)
            })
            .collect();

        self.model = model;
        self.centroids = centroids;
        self.initialized = true;
        info!(threads = self.centroids.len(), "vocabulary rebuilt");
        Ok(())
    }

    /// Embed every existing thread's title once
    async fn initialize(&mut self) -> StorylineResult<()> {
        let threads = self.store.list_threads().await?;
        let titles: Vec<String> = threads
            .iter()
            .map(|t| t.title.clone())
            .filter(|t| !t.is_empty())
            .collect();
        if !titles.is_empty() {
            self.model.fit(&titles);
        }

        for thread in &threads {
            self.centroids.insert(
                thread.id.clone(),
                Centroid {
                    topic: thread.topic.clone(),
                    vector: self.model.embed(&thread.title),
                },
            );
        }

        self.initialized = true;
        info!(threads = self.centroids.len(), "clustering engine initialized");
        Ok(())
    }

    async fn merge(
        &mut self,
        tid: ThreadId,
        query: &[f32],
        text: &str,
    ) -> StorylineResult<ThreadId> {
        if let Some(centroid) = self.centroids.get_mut(&tid) {
            for (c, v) in centroid.vector.iter_mut().zip(query) {
                *c = (*c + *v) / 2.0;
            }
        }

        self.store.touch_thread(&tid, Utc::now()).await?;

        let mut snippets = self.store.member_snippets(&tid).await?;
        snippets.push(truncate_chars(text, self.config.snippet_chars));
        let title = self.headlines.headline(&snippets).await?;
        self.store.set_thread_title(&tid, &title).await?;

        Ok(tid)
    }

    async fn create_thread(
        &mut self,
        text: &str,
        topic: &str,
        vector: Vec<f32>,
    ) -> StorylineResult<ThreadId> {
        let snippet = truncate_chars(text, self.config.snippet_chars);
        let title = self.headlines.headline(std::slice::from_ref(&snippet)).await?;

        let id = mint_thread_id(text, topic, self.centroids.len());
        let thread = Thread::new(id.clone(), title, topic.to_string(), Utc::now());
        self.store.create_thread(&thread).await?;

        self.centroids.insert(
            id.clone(),
            Centroid {
                topic: topic.to_string(),
                vector,
            },
        );
        info!(thread = %id, topic, "created new thread");
        Ok(id)
    }
}

/// Mint an opaque thread id: 16 hex chars over the seeding text, topic,
/// creation instant and engine sequence number
fn mint_thread_id(text: &str, topic: &str, sequence: usize) -> ThreadId {
    let mut hasher = Sha256::new();
    hasher.update(text.as_bytes());
    hasher.update(topic.as_bytes());
    hasher.update(Utc::now().timestamp_nanos_opt().unwrap_or_default().to_le_bytes());
    hasher.update(sequence.to_le_bytes());
    ThreadId::new(hex::encode(&hasher.finalize()[..8]))
}

fn truncate_chars(text: &str, max_chars: usize) -> String {
    text.chars().take(max_chars).collect()
}
