//! Text generation through a hosted language-model provider
//!
//! The `TextGenerator` trait is the seam the job runner depends on; the
//! concrete client speaks the OpenAI chat-completions wire format.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;
use tracing::debug;

use crate::config::OpenAiConfig;
use crate::error::{GenerationError, Result};

const OPENAI_API_BASE: &str = "https://api.openai.com/v1";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Capability for generating one short post about a topic.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Generate post text for `topic`, guaranteed not to exceed
    /// `max_length` characters.
    ///
    /// # Errors
    ///
    /// Returns `GenerationError::EmptyTopic` for a blank topic and
    /// `GenerationError::Provider` / `MalformedResponse` for provider
    /// failures. All generation errors are per-cycle and recoverable.
    async fn generate(&self, topic: &str, max_length: usize) -> Result<String>;

    /// Lowercase identifier for the backing provider
    fn name(&self) -> &str;
}

/// Cut `text` down to `max_length` characters, marking the cut with a
/// three-character ellipsis. Text already within the limit is returned
/// unchanged; truncated text has length exactly `max_length`.
pub fn truncate_post(text: &str, max_length: usize) -> String {
    if text.chars().count() <= max_length {
        return text.to_string();
    }
    if max_length <= 3 {
        return text.chars().take(max_length).collect();
    }
    let mut cut: String = text.chars().take(max_length - 3).collect();
    cut.push_str("...");
    cut
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Debug, Deserialize)]
struct ChatMessage {
    content: Option<String>,
}

/// Chat-completions client for post generation.
pub struct OpenAiGenerator {
    client: reqwest::Client,
    api_key: String,
    model: String,
    max_tokens: u32,
    base_url: String,
}

impl OpenAiGenerator {
    /// Create a new generator from configuration.
    ///
    /// # Errors
    ///
    /// Fails if the HTTP client cannot be constructed. An empty API key
    /// is caught earlier by `Config::validate`.
    pub fn new(config: &OpenAiConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| GenerationError::Provider(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            api_key: config.api_key.clone(),
            model: config.model.clone(),
            max_tokens: config.max_tokens,
            base_url: OPENAI_API_BASE.to_string(),
        })
    }

    /// Point the client at a different API base URL.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    fn build_prompt(topic: &str) -> String {
        format!("Create a creative and engaging tweet about {topic}.")
    }
}

#[async_trait]
impl TextGenerator for OpenAiGenerator {
    async fn generate(&self, topic: &str, max_length: usize) -> Result<String> {
        let topic = topic.trim();
        if topic.is_empty() {
            return Err(GenerationError::EmptyTopic.into());
        }

        let body = json!({
            "model": self.model,
            "messages": [{"role": "user", "content": Self::build_prompt(topic)}],
            "max_tokens": self.max_tokens,
            "temperature": 0.7,
        });

        debug!(model = %self.model, topic, "Requesting post generation");

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| GenerationError::Provider(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(GenerationError::Provider(format!(
                "Provider returned {status}: {detail}"
            ))
            .into());
        }

        let parsed: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| GenerationError::MalformedResponse(e.to_string()))?;

        let text = parsed
            .choices
            .first()
            .and_then(|choice| choice.message.content.as_deref())
            .map(str::trim)
            .unwrap_or_default();

        if text.is_empty() {
            return Err(
                GenerationError::MalformedResponse("Response contained no text".to_string()).into(),
            );
        }

        Ok(truncate_post(text, max_length))
    }

    fn name(&self) -> &str {
        "openai"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_short_text_unchanged() {
        assert_eq!(truncate_post("Hello", 280), "Hello");
    }

    #[test]
    fn test_truncate_exact_limit_unchanged() {
        let text = "a".repeat(280);
        assert_eq!(truncate_post(&text, 280), text);
    }

    #[test]
    fn test_truncate_over_limit_adds_ellipsis() {
        let text = "a".repeat(300);
        let result = truncate_post(&text, 280);
        assert_eq!(result.chars().count(), 280);
        assert!(result.ends_with("..."));
        assert_eq!(&result[..277], &text[..277]);
    }

    #[test]
    fn test_truncate_one_over_limit() {
        let text = "b".repeat(281);
        let result = truncate_post(&text, 280);
        assert_eq!(result.chars().count(), 280);
        assert!(result.ends_with("..."));
    }

    #[test]
    fn test_truncate_counts_chars_not_bytes() {
        // Multibyte characters must count as one each
        let text = "é".repeat(10);
        let result = truncate_post(&text, 8);
        assert_eq!(result.chars().count(), 8);
        assert!(result.ends_with("..."));
    }

    #[test]
    fn test_truncate_never_exceeds_limit() {
        for len in [0usize, 1, 5, 50, 279, 280, 281, 500] {
            let text = "x".repeat(len);
            for max in [10usize, 140, 280] {
                let result = truncate_post(&text, max);
                assert!(
                    result.chars().count() <= max,
                    "len={} max={} produced {}",
                    len,
                    max,
                    result.chars().count()
                );
            }
        }
    }

    #[test]
    fn test_truncate_tiny_limit_has_no_ellipsis() {
        assert_eq!(truncate_post("abcdef", 2), "ab");
        assert_eq!(truncate_post("abcdef", 3), "abc");
    }

    #[test]
    fn test_prompt_embeds_topic() {
        let prompt = OpenAiGenerator::build_prompt("space exploration");
        assert!(prompt.contains("space exploration"));
        assert!(prompt.starts_with("Create a creative"));
    }

    #[tokio::test]
    async fn test_empty_topic_rejected_without_network() {
        let config = OpenAiConfig {
            api_key: "sk-test".to_string(),
            model: "gpt-4o-mini".to_string(),
            max_tokens: 120,
        };
        // Unroutable base URL: an empty topic must fail before any request
        let generator = OpenAiGenerator::new(&config)
            .unwrap()
            .with_base_url("http://127.0.0.1:9");

        let result = generator.generate("   ", 280).await;
        assert!(matches!(
            result,
            Err(crate::MusecastError::Generation(GenerationError::EmptyTopic))
        ));
    }

    #[test]
    fn test_response_parsing() {
        let raw = r#"{
            "choices": [
                {"message": {"role": "assistant", "content": "  To the stars!  "}}
            ]
        }"#;
        let parsed: ChatCompletionResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(
            parsed.choices[0].message.content.as_deref().map(str::trim),
            Some("To the stars!")
        );
    }

    #[test]
    fn test_response_parsing_missing_content() {
        let raw = r#"{"choices": [{"message": {"role": "assistant"}}]}"#;
        let parsed: ChatCompletionResponse = serde_json::from_str(raw).unwrap();
        assert!(parsed.choices[0].message.content.is_none());
    }
}
