//! Mock generator and publisher for testing
//!
//! Both mocks record their calls behind shared state, so a cloned handle
//! can be inspected after the mock itself has been moved into a runner.
//! Delays use the tokio clock, which lets paused-time tests verify
//! scheduling cadence deterministically.

use async_trait::async_trait;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::time::Instant;
use uuid::Uuid;

use crate::error::{GenerationError, PublishError, Result};
use crate::generator::TextGenerator;
use crate::publisher::{Publisher, POST_CHAR_LIMIT};

#[derive(Debug, Clone)]
enum MockBehavior {
    Success,
    Failure(String),
    NotInitialized,
}

#[derive(Debug, Default)]
struct GeneratorState {
    call_count: u64,
    last_topic: Option<String>,
    last_max_length: Option<usize>,
}

/// Canned text generator.
#[derive(Clone)]
pub struct MockGenerator {
    response: String,
    behavior: MockBehavior,
    delay: Option<Duration>,
    state: Arc<Mutex<GeneratorState>>,
}

impl MockGenerator {
    /// A generator that always returns `response`.
    pub fn success(response: impl Into<String>) -> Self {
        Self {
            response: response.into(),
            behavior: MockBehavior::Success,
            delay: None,
            state: Arc::new(Mutex::new(GeneratorState::default())),
        }
    }

    /// A generator that always fails with a provider error.
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            response: String::new(),
            behavior: MockBehavior::Failure(message.into()),
            delay: None,
            state: Arc::new(Mutex::new(GeneratorState::default())),
        }
    }

    /// Sleep on the tokio clock before each response.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn generate_call_count(&self) -> u64 {
        self.state.lock().unwrap().call_count
    }

    pub fn last_topic(&self) -> Option<String> {
        self.state.lock().unwrap().last_topic.clone()
    }

    pub fn last_max_length(&self) -> Option<usize> {
        self.state.lock().unwrap().last_max_length
    }
}

#[async_trait]
impl TextGenerator for MockGenerator {
    async fn generate(&self, topic: &str, max_length: usize) -> Result<String> {
        {
            let mut state = self.state.lock().unwrap();
            state.call_count += 1;
            state.last_topic = Some(topic.to_string());
            state.last_max_length = Some(max_length);
        }

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        match &self.behavior {
            MockBehavior::Success | MockBehavior::NotInitialized => Ok(self.response.clone()),
            MockBehavior::Failure(message) => {
                Err(GenerationError::Provider(message.clone()).into())
            }
        }
    }

    fn name(&self) -> &str {
        "mock"
    }
}

#[derive(Debug, Default)]
struct PublisherState {
    call_count: u64,
    published: Vec<String>,
    instants: Vec<Instant>,
}

/// In-memory publisher that records what it is asked to post.
#[derive(Clone)]
pub struct MockPublisher {
    name: String,
    behavior: MockBehavior,
    delay: Option<Duration>,
    limit: Option<usize>,
    state: Arc<Mutex<PublisherState>>,
}

impl MockPublisher {
    fn new(name: impl Into<String>, behavior: MockBehavior) -> Self {
        Self {
            name: name.into(),
            behavior,
            delay: None,
            limit: Some(POST_CHAR_LIMIT),
            state: Arc::new(Mutex::new(PublisherState::default())),
        }
    }

    /// A publisher that accepts every post and returns a fresh ID.
    pub fn success(name: impl Into<String>) -> Self {
        Self::new(name, MockBehavior::Success)
    }

    /// A publisher that rejects every post with a submission error.
    pub fn failure(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(name, MockBehavior::Failure(message.into()))
    }

    /// A publisher that behaves like one whose credentials never validated.
    pub fn not_initialized(name: impl Into<String>) -> Self {
        Self::new(name, MockBehavior::NotInitialized)
    }

    /// Sleep on the tokio clock during each publish.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Advertise a different character limit.
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn publish_call_count(&self) -> u64 {
        self.state.lock().unwrap().call_count
    }

    /// Texts accepted so far, in publish order.
    pub fn published_content(&self) -> Vec<String> {
        self.state.lock().unwrap().published.clone()
    }

    /// Tokio-clock instants at which each publish call arrived.
    pub fn publish_instants(&self) -> Vec<Instant> {
        self.state.lock().unwrap().instants.clone()
    }
}

#[async_trait]
impl Publisher for MockPublisher {
    async fn publish(&self, text: &str) -> Result<String> {
        {
            let mut state = self.state.lock().unwrap();
            state.call_count += 1;
            state.instants.push(Instant::now());
        }

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        match &self.behavior {
            MockBehavior::Success => {
                let post_id = Uuid::new_v4().to_string();
                self.state.lock().unwrap().published.push(text.to_string());
                Ok(post_id)
            }
            MockBehavior::Failure(message) => {
                Err(PublishError::SubmissionFailed(message.clone()).into())
            }
            MockBehavior::NotInitialized => Err(PublishError::NotInitialized.into()),
        }
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn character_limit(&self) -> Option<usize> {
        self.limit
    }
}
