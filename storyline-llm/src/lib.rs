//! Chat-completion backed text collaborators
//!
//! One OpenAI-compatible client implements the three external text
//! capabilities the pipeline delegates: content normalization + topic
//! classification, translation to English, and thread headline generation.

pub mod client;

pub use client::ChatClient;
