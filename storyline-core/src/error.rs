//! Error types shared across the Storyline crates

use thiserror::Error;

/// Service-wide error type
#[derive(Error, Debug)]
pub enum StorylineError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Feed error: {0}")]
    Feed(String),

    #[error("Fetch error: {0}")]
    Fetch(String),

    #[error("Language model error: {0}")]
    Llm(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Timed out: {0}")]
    Timeout(String),
}

impl StorylineError {
    pub fn feed(msg: impl Into<String>) -> Self {
        StorylineError::Feed(msg.into())
    }

    pub fn fetch(msg: impl Into<String>) -> Self {
        StorylineError::Fetch(msg.into())
    }

    pub fn llm(msg: impl Into<String>) -> Self {
        StorylineError::Llm(msg.into())
    }

    pub fn database(msg: impl Into<String>) -> Self {
        StorylineError::Database(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        StorylineError::NotFound(msg.into())
    }

    pub fn config(msg: impl Into<String>) -> Self {
        StorylineError::Config(msg.into())
    }

    pub fn timeout(msg: impl Into<String>) -> Self {
        StorylineError::Timeout(msg.into())
    }
}

/// Result type alias for storyline operations
pub type StorylineResult<T> = Result<T, StorylineError>;
