//! Feed fetching and article extraction
//!
//! Pulls RSS/Atom feeds from the curated source list and downloads article
//! pages, extracting title, body text and metadata for the pipeline.

pub mod client;
pub mod extract;
pub mod sources;

pub use client::FeedClient;
pub use extract::HttpArticleFetcher;
pub use sources::curated_sources;
