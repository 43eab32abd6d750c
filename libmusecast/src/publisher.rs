//! Post submission to the platform API
//!
//! The `Publisher` trait is the posting seam; the concrete client submits
//! to the X/Twitter v2 create-tweet endpoint with a user-context token.
//! A publisher that fails credential validation at construction stays
//! permanently disabled: every publish call returns `NotInitialized`
//! without touching the network.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;
use tracing::{debug, warn};

use crate::config::TwitterConfig;
use crate::error::{PublishError, Result};

/// Standard post length limit on the platform.
pub const POST_CHAR_LIMIT: usize = 280;

const TWITTER_API_BASE: &str = "https://api.x.com";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Capability for submitting one post and getting its identifier back.
#[async_trait]
pub trait Publisher: Send + Sync {
    /// Submit `text` to the platform exactly once.
    ///
    /// Returns the provider-assigned post ID on success.
    ///
    /// # Errors
    ///
    /// `PublishError::NotInitialized` if the client was never usable,
    /// `PublishError::SubmissionFailed` for per-call submission problems.
    /// Both are per-cycle and recoverable; neither is retried here.
    async fn publish(&self, text: &str) -> Result<String>;

    /// Lowercase identifier for the platform
    fn name(&self) -> &str;

    /// The platform's post character limit, if it has one
    fn character_limit(&self) -> Option<usize> {
        Some(POST_CHAR_LIMIT)
    }
}

#[derive(Debug, Deserialize)]
struct CreateTweetResponse {
    data: CreatedTweet,
}

#[derive(Debug, Deserialize)]
struct CreatedTweet {
    id: String,
}

/// X/Twitter v2 posting client.
pub struct TwitterPublisher {
    /// `None` when credential validation or client construction failed;
    /// the publisher is then disabled for the process lifetime.
    client: Option<reqwest::Client>,
    access_token: String,
    base_url: String,
}

impl TwitterPublisher {
    /// Create a publisher from the configured credential set.
    ///
    /// Construction never fails. Missing or empty credentials produce a
    /// disabled publisher whose `publish` always returns
    /// `PublishError::NotInitialized`.
    pub fn new(config: &TwitterConfig) -> Self {
        let credentials = [
            &config.api_key,
            &config.api_secret,
            &config.access_token,
            &config.access_token_secret,
        ];
        if credentials.iter().any(|c| c.trim().is_empty()) {
            warn!("Twitter credentials incomplete; posting is disabled");
            return Self::disabled();
        }

        let client = match reqwest::Client::builder().timeout(REQUEST_TIMEOUT).build() {
            Ok(client) => client,
            Err(e) => {
                warn!("Failed to build Twitter HTTP client: {e}; posting is disabled");
                return Self::disabled();
            }
        };

        Self {
            client: Some(client),
            access_token: config.access_token.clone(),
            base_url: TWITTER_API_BASE.to_string(),
        }
    }

    fn disabled() -> Self {
        Self {
            client: None,
            access_token: String::new(),
            base_url: TWITTER_API_BASE.to_string(),
        }
    }

    /// Point the client at a different API base URL.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Whether the client passed credential validation at construction
    pub fn is_initialized(&self) -> bool {
        self.client.is_some()
    }
}

#[async_trait]
impl Publisher for TwitterPublisher {
    async fn publish(&self, text: &str) -> Result<String> {
        let Some(client) = &self.client else {
            return Err(PublishError::NotInitialized.into());
        };

        if text.trim().is_empty() {
            return Err(
                PublishError::SubmissionFailed("Post text cannot be empty".to_string()).into(),
            );
        }

        debug!(chars = text.chars().count(), "Submitting post");

        let response = client
            .post(format!("{}/2/tweets", self.base_url))
            .bearer_auth(&self.access_token)
            .json(&json!({ "text": text }))
            .send()
            .await
            .map_err(|e| PublishError::SubmissionFailed(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(PublishError::SubmissionFailed(format!(
                "Platform returned {status}: {detail}"
            ))
            .into());
        }

        let parsed: CreateTweetResponse = response
            .json()
            .await
            .map_err(|e| PublishError::SubmissionFailed(format!("Unreadable response: {e}")))?;

        Ok(parsed.data.id)
    }

    fn name(&self) -> &str {
        "twitter"
    }

    fn character_limit(&self) -> Option<usize> {
        Some(POST_CHAR_LIMIT)
    }
}
