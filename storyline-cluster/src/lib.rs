//! Online story-thread clustering
//!
//! A single-pass, streaming clustering engine: each incoming article is
//! embedded into a shared term-weighting model and either merged into the
//! nearest same-topic thread or made the seed of a new one. No fixed cluster
//! count, no global re-clustering; centroids are maintained incrementally.

pub mod engine;
pub mod similarity;
pub mod vectorizer;

pub use engine::{ClustererConfig, ThreadClusterer};
pub use similarity::cosine_similarity;
pub use vectorizer::VectorSpaceModel;
