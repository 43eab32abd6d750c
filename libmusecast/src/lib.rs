//! Core library for Musecast, an automated social posting agent.
//!
//! The pipeline is deliberately small: a [`generator::TextGenerator`]
//! produces short post text about a configured topic, and a
//! [`publisher::Publisher`] submits it to the platform. The
//! [`runner::JobRunner`] wires the two together, either once or on a
//! fixed schedule parsed by [`schedule::ScheduleSpec`]. Nothing is
//! persisted between cycles.

pub mod config;
pub mod error;
pub mod generator;
pub mod logging;
pub mod mock;
pub mod publisher;
pub mod runner;
pub mod schedule;

pub use config::Config;
pub use error::{MusecastError, Result};
pub use generator::{truncate_post, OpenAiGenerator, TextGenerator};
pub use publisher::{Publisher, TwitterPublisher, POST_CHAR_LIMIT};
pub use runner::{FailureStage, JobResult, JobRunner};
pub use schedule::{IntervalUnit, ScheduleSpec};
