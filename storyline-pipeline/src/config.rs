//! Pipeline configuration

use std::time::Duration;

/// Tunables for one crawl run
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Entries consumed per source per run
    pub max_articles_per_source: usize,
    /// Politeness delay between processed articles
    ///
    /// A deliberate throttle to respect source rate limits, not an accident
    /// of scheduling.
    pub item_delay: Duration,
    /// Upper bound on each external fetch/normalize/translate call, so one
    /// slow source cannot stall the whole run
    pub call_timeout: Duration,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            max_articles_per_source: 8,
            item_delay: Duration::from_secs(1),
            call_timeout: Duration::from_secs(20),
        }
    }
}
