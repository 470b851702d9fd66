//! Credibility scoring for ingested articles
//!
//! A pure, deterministic point system over article fields: source reputation,
//! grammar quality, clickbait/ad detection and content richness. The scorer
//! never fails the pipeline; a sub-check that cannot run contributes nothing.

pub mod grammar;
pub mod patterns;
pub mod scorer;
pub mod trust;

pub use grammar::{GrammarCheck, HeuristicGrammarCheck};
pub use patterns::{AdDetector, ClickbaitDetector};
pub use scorer::{assess, CredibilityAssessment, ScoreInput};
pub use trust::{TrustLevel, TrustTable};
