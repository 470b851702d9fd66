//! OpenAI-compatible chat completions client

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn};

use storyline_core::{
    topics, HeadlineGenerator, Normalized, StorylineError, StorylineResult, TextNormalizer,
    Translator,
};

/// How much raw article text the normalizer prompt carries
const MAX_CONTENT_PROMPT_CHARS: usize = 3000;
/// How much raw description the normalizer prompt carries
const MAX_DESCRIPTION_PROMPT_CHARS: usize = 500;

/// Chat completions client for the text-processing collaborators
pub struct ChatClient {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
    model: String,
}

#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Serialize, Deserialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

impl ChatClient {
    /// Create a client against the OpenAI API
    pub fn new(api_key: String) -> Self {
        Self::with_base_url(api_key, "https://api.openai.com/v1".to_string())
    }

    /// Create a client against any OpenAI-compatible endpoint
    pub fn with_base_url(api_key: String, base_url: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key,
            base_url,
            model: "gpt-4o-mini".to_string(),
        }
    }

    async fn chat(&self, system: &str, user: &str, max_tokens: u32) -> StorylineResult<String> {
        let request = ChatRequest {
            model: self.model.clone(),
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: system.to_string(),
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: user.to_string(),
                },
            ],
            temperature: 0.0,
            max_tokens,
        };

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(StorylineError::llm(format!(
                "chat completion failed with status {}: {}",
                status, body
            )));
        }

        let parsed: ChatResponse = response
            .json()
            .await
            .map_err(|e| StorylineError::llm(format!("malformed chat response: {}", e)))?;

        let reply = parsed
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or_else(|| StorylineError::llm("chat response carried no choices"))?;

        Ok(reply.trim().to_string())
    }
}

#[async_trait]
impl TextNormalizer for ChatClient {
    #[instrument(skip_all)]
    async fn normalize(
        &self,
        raw_content: &str,
        raw_description: &str,
        allowed_topics: &[&str],
    ) -> StorylineResult<Normalized> {
        let system = "You are an assistant that takes raw news article text and a raw summary, \
                      then outputs a JSON object with exactly three keys: \
                      `content`, `description`, and `topic`. \
                      - `content`: cleaned article body, free of cookie banners, duplicates, ads, and boilerplate. \
                      - `description`: a concise 1-2 sentence summary. \
                      - `topic`: exactly one of the provided topics matching the main theme.";

        let user = format!(
            "Available topics: {:?}\n\n\
             Raw article text (first {} chars):\n```\n{}\n```\n\n\
             Raw description (if any):\n```\n{}\n```\n\n\
             Respond **only** with a valid JSON object.",
            allowed_topics,
            MAX_CONTENT_PROMPT_CHARS,
            truncate_chars(raw_content, MAX_CONTENT_PROMPT_CHARS),
            truncate_chars(raw_description, MAX_DESCRIPTION_PROMPT_CHARS),
        );

        let reply = self.chat(system, &user, 2000).await?;
        Ok(parse_normalized(&reply, raw_content, raw_description))
    }
}

#[async_trait]
impl Translator for ChatClient {
    #[instrument(skip_all)]
    async fn translate_to_english(&self, text: &str) -> StorylineResult<String> {
        let user = format!("Translate into English:\n\n{}", text);
        self.chat("You are a translator to English.", &user, 2000)
            .await
    }
}

#[async_trait]
impl HeadlineGenerator for ChatClient {
    #[instrument(skip_all)]
    async fn headline(&self, snippets: &[String]) -> StorylineResult<String> {
        let user = format!(
            "You are a headline-writing assistant. Given these related news snippets, \
             produce a 3-6 word title capturing their common theme like a news headline.\n\n{}\n\n\
             Reply with just the title.",
            snippets
                .iter()
                .map(|s| format!("- {}", s))
                .collect::<Vec<_>>()
                .join("\n")
        );

        let reply = self.chat("Write a 3-6 word news title.", &user, 20).await?;
        Ok(clean_title(&reply))
    }
}

/// Decode the normalizer's JSON reply, falling back to the raw inputs
///
/// A malformed reply must never drop the article: the raw content and
/// description are kept verbatim and the topic is left empty.
fn parse_normalized(reply: &str, raw_content: &str, raw_description: &str) -> Normalized {
    match serde_json::from_str::<Normalized>(reply) {
        Ok(normalized) => {
            if topics::is_allowed(&normalized.topic) {
                normalized
            } else {
                warn!(topic = %normalized.topic, "normalizer answered with unknown topic");
                Normalized {
                    topic: String::new(),
                    ..normalized
                }
            }
        }
        Err(e) => {
            debug!("normalizer reply did not decode as JSON: {}", e);
            Normalized {
                content: raw_content.to_string(),
                description: raw_description.to_string(),
                topic: String::new(),
            }
        }
    }
}

/// Strip wrapping quotes the model sometimes adds around titles
fn clean_title(title: &str) -> String {
    title.trim().trim_matches('"').trim().to_string()
}

fn truncate_chars(text: &str, max_chars: usize) -> String {
    text.chars().take(max_chars).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_normalized_valid_reply() {
        let reply = r#"{"content": "Cleaned body.", "description": "Short summary.", "topic": "world"}"#;
        let normalized = parse_normalized(reply, "raw", "raw desc");
        assert_eq!(normalized.content, "Cleaned body.");
        assert_eq!(normalized.description, "Short summary.");
        assert_eq!(normalized.topic, "world");
    }

    #[test]
    fn test_parse_normalized_falls_back_on_garbage() {
        let normalized = parse_normalized("Sorry, I cannot do that.", "raw body", "raw desc");
        assert_eq!(normalized.content, "raw body");
        assert_eq!(normalized.description, "raw desc");
        assert_eq!(normalized.topic, "");
    }

    #[test]
    fn test_parse_normalized_blanks_unknown_topic() {
        let reply = r#"{"content": "Body", "description": "Desc", "topic": "astrology"}"#;
        let normalized = parse_normalized(reply, "raw", "raw");
        assert_eq!(normalized.topic, "");
        assert_eq!(normalized.content, "Body");
    }

    #[test]
    fn test_clean_title() {
        assert_eq!(clean_title("\"Quake Rocks Region\""), "Quake Rocks Region");
        assert_eq!(clean_title("  Plain Title "), "Plain Title");
    }

    #[test]
    fn test_chat_response_decoding() {
        let body = r#"{"choices": [{"message": {"role": "assistant", "content": "hello"}}]}"#;
        let parsed: ChatResponse = serde_json::from_str(body).unwrap();
        assert_eq!(parsed.choices[0].message.content, "hello");
    }
}
