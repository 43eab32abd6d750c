//! Job orchestration: one generate-then-publish cycle, and the
//! recurring scheduler loop that repeats it on a fixed cadence.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::{interval_at, Instant};
use tracing::{error, info};

use crate::generator::TextGenerator;
use crate::publisher::{Publisher, POST_CHAR_LIMIT};
use crate::schedule::ScheduleSpec;

/// Which stage of a cycle failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureStage {
    Generation,
    Posting,
}

/// Outcome of one generate-then-publish cycle. Lives only long enough
/// to be logged and inspected; nothing is persisted.
#[derive(Debug, Clone)]
pub struct JobResult {
    pub generated_text: Option<String>,
    pub posted: bool,
    pub post_id: Option<String>,
    pub failure_stage: Option<FailureStage>,
}

impl JobResult {
    /// Generation failed; the publisher was never invoked.
    pub fn generation_failed() -> Self {
        Self {
            generated_text: None,
            posted: false,
            post_id: None,
            failure_stage: Some(FailureStage::Generation),
        }
    }

    /// Text was generated but submission failed.
    pub fn posting_failed(text: String) -> Self {
        Self {
            generated_text: Some(text),
            posted: false,
            post_id: None,
            failure_stage: Some(FailureStage::Posting),
        }
    }

    /// The full cycle succeeded.
    pub fn posted(text: String, post_id: String) -> Self {
        Self {
            generated_text: Some(text),
            posted: true,
            post_id: Some(post_id),
            failure_stage: None,
        }
    }

    pub fn succeeded(&self) -> bool {
        self.posted
    }
}

/// Runs generate-then-publish cycles against injected capabilities.
///
/// Both provider handles are constructed once at startup and passed in
/// explicitly; the runner holds no other state and never mutates them.
pub struct JobRunner {
    generator: Arc<dyn TextGenerator>,
    publisher: Arc<dyn Publisher>,
    topic: String,
}

impl JobRunner {
    pub fn new(
        generator: Arc<dyn TextGenerator>,
        publisher: Arc<dyn Publisher>,
        topic: impl Into<String>,
    ) -> Self {
        Self {
            generator,
            publisher,
            topic: topic.into(),
        }
    }

    /// Run one full cycle. Every failure is caught and logged here;
    /// this never returns an error, so the scheduler loop above it
    /// keeps running no matter what a cycle does.
    pub async fn run_cycle(&self) -> JobResult {
        let max_length = self.publisher.character_limit().unwrap_or(POST_CHAR_LIMIT);

        let text = match self.generator.generate(&self.topic, max_length).await {
            Ok(text) => {
                info!(
                    provider = self.generator.name(),
                    chars = text.chars().count(),
                    "Post generated successfully"
                );
                text
            }
            Err(e) => {
                error!(provider = self.generator.name(), "Failed to generate post: {e}");
                return JobResult::generation_failed();
            }
        };

        match self.publisher.publish(&text).await {
            Ok(post_id) => {
                info!(
                    platform = self.publisher.name(),
                    %post_id,
                    "Post published successfully"
                );
                JobResult::posted(text, post_id)
            }
            Err(e) => {
                error!(platform = self.publisher.name(), "Failed to publish post: {e}");
                JobResult::posting_failed(text)
            }
        }
    }

    /// Run cycles forever on a fixed wall-clock cadence.
    ///
    /// The first cycle fires only after one full `period` elapses. Ticks
    /// stay anchored to the start time: a cycle that overruns the
    /// interval delays its successor, but later ticks snap back to the
    /// original cadence rather than drifting by completion time.
    ///
    /// The `shutdown` flag is polled once a second while waiting on the
    /// tick, so a signal interrupts the sleep instead of being held
    /// until the next cycle. A cycle already in flight runs to
    /// completion. `max_cycles` bounds the loop (used by tests and the
    /// hidden CLI flag); `None` means run until shutdown. Returns the
    /// number of cycles executed.
    pub async fn run_recurring(
        &self,
        period: Duration,
        shutdown: Arc<AtomicBool>,
        max_cycles: Option<u64>,
    ) -> u64 {
        let mut ticker = interval_at(Instant::now() + period, period);
        let mut executed = 0u64;

        loop {
            tokio::select! {
                _ = ticker.tick() => {}
                _ = wait_for_shutdown(&shutdown) => {
                    info!("Shutdown requested, stopping schedule loop");
                    break;
                }
            }

            if shutdown.load(Ordering::Relaxed) {
                info!("Shutdown requested, stopping schedule loop");
                break;
            }

            self.run_cycle().await;
            executed += 1;

            if max_cycles.is_some_and(|max| executed >= max) {
                break;
            }
        }

        executed
    }

    /// Execute the given schedule: one cycle for `Immediate`, the
    /// recurring loop otherwise. Returns the number of cycles executed.
    pub async fn run(
        &self,
        spec: &ScheduleSpec,
        shutdown: Arc<AtomicBool>,
        max_cycles: Option<u64>,
    ) -> u64 {
        match spec.interval() {
            None => {
                self.run_cycle().await;
                1
            }
            Some(period) => {
                info!("Scheduled to post {}", spec);
                self.run_recurring(period, shutdown, max_cycles).await
            }
        }
    }
}

/// Completes once `flag` is set, checking it once a second.
async fn wait_for_shutdown(flag: &AtomicBool) {
    while !flag.load(Ordering::Relaxed) {
        tokio::time::sleep(Duration::from_secs(1)).await;
    }
}
