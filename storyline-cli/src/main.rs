//! Storyline crawler
//!
//! Runs one sequential crawl over the curated feed sources: dedup, fetch,
//! normalize, score, cluster into story threads and persist.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use storyline_cluster::{ClustererConfig, ThreadClusterer};
use storyline_core::{ArticleStore, HeadlineGenerator, TextNormalizer, ThreadStore, Translator};
use storyline_feeds::{curated_sources, HttpArticleFetcher};
use storyline_llm::ChatClient;
use storyline_pipeline::{IngestionPipeline, PipelineConfig};
use storyline_scoring::HeuristicGrammarCheck;
use storyline_store::SqliteStore;

#[derive(Parser, Debug)]
#[command(name = "storyline", about = "Crawl news feeds into story threads")]
struct Args {
    /// SQLite database path
    #[arg(long, default_value = "data/storyline.db")]
    db_path: String,

    /// Politeness delay between articles, in milliseconds
    #[arg(long, default_value_t = 1000)]
    delay_ms: u64,

    /// Maximum feed entries consumed per source per run
    #[arg(long, default_value_t = 8)]
    max_per_source: usize,

    /// Minimum cosine similarity for merging into an existing thread
    #[arg(long, default_value_t = 0.4)]
    merge_threshold: f32,

    /// Backfill credibility labels on historical rows, then exit
    #[arg(long)]
    relabel: bool,

    /// Rebuild the clustering vocabulary from current thread titles, then
    /// exit (administrative; reprojects all centroids)
    #[arg(long)]
    rebuild_vocabulary: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    if let Err(e) = dotenvy::dotenv() {
        // Not an error if the file doesn't exist
        if !matches!(e, dotenvy::Error::Io(_)) {
            eprintln!("Warning: Failed to load .env: {}", e);
        }
    }

    // Initialize logging
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,storyline=debug")),
        )
        .init();

    let args = Args::parse();

    info!("Starting Storyline crawler");

    if let Some(parent) = std::path::Path::new(&args.db_path).parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("creating database directory {:?}", parent))?;
        }
    }
    let store = Arc::new(SqliteStore::new(&args.db_path)?);

    if args.relabel {
        let updated = store.relabel_missing().await?;
        info!("Backfilled credibility labels on {} articles", updated);
        return Ok(());
    }

    let chat = Arc::new(
        ChatClient::new(
            std::env::var("OPENAI_API_KEY").context("OPENAI_API_KEY is not set")?,
        ),
    );

    let clusterer_config = ClustererConfig {
        merge_threshold: args.merge_threshold,
        ..ClustererConfig::default()
    };
    let mut clusterer = ThreadClusterer::new(
        Arc::clone(&store) as Arc<dyn ThreadStore>,
        Arc::clone(&chat) as Arc<dyn HeadlineGenerator>,
        clusterer_config,
    );

    if args.rebuild_vocabulary {
        clusterer.rebuild_vocabulary().await?;
        info!("Vocabulary rebuilt and centroids reprojected");
        return Ok(());
    }

    let config = PipelineConfig {
        max_articles_per_source: args.max_per_source,
        item_delay: Duration::from_millis(args.delay_ms),
        ..PipelineConfig::default()
    };

    let mut pipeline = IngestionPipeline::new(
        curated_sources(),
        Arc::new(HttpArticleFetcher::default()),
        Arc::clone(&chat) as Arc<dyn TextNormalizer>,
        Arc::clone(&chat) as Arc<dyn Translator>,
        Arc::clone(&store) as Arc<dyn ArticleStore>,
        Arc::clone(&store) as Arc<dyn ThreadStore>,
        clusterer,
        Box::new(HeuristicGrammarCheck),
        config,
    );

    let inserted = pipeline.run().await;
    info!("Crawled and processed {} new articles", inserted);

    Ok(())
}
