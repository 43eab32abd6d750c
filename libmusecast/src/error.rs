//! Error types for Musecast

use thiserror::Error;

pub type Result<T> = std::result::Result<T, MusecastError>;

#[derive(Error, Debug)]
pub enum MusecastError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Generation error: {0}")]
    Generation(#[from] GenerationError),

    #[error("Publish error: {0}")]
    Publish(#[from] PublishError),

    #[error("Schedule error: {0}")]
    Schedule(#[from] ScheduleError),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl MusecastError {
    /// Returns the appropriate exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            MusecastError::InvalidInput(_) => 3,
            MusecastError::Schedule(_) => 3,
            MusecastError::Publish(PublishError::NotInitialized) => 2,
            MusecastError::Publish(_) => 1,
            MusecastError::Generation(_) => 1,
            MusecastError::Config(_) => 1,
        }
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Failed to prepare log destination {path}: {source}")]
    LogDestination {
        path: String,
        source: std::io::Error,
    },
}

/// Failures while generating text through the language-model provider.
///
/// These are per-cycle errors: the current cycle is aborted and logged,
/// but the process and any scheduling loop keep running.
#[derive(Error, Debug)]
pub enum GenerationError {
    #[error("Topic cannot be empty")]
    EmptyTopic,

    #[error("Generation request failed: {0}")]
    Provider(String),

    #[error("Malformed generation response: {0}")]
    MalformedResponse(String),
}

/// Failures while submitting a post to the platform.
#[derive(Error, Debug)]
pub enum PublishError {
    /// The posting client could not be initialized at startup. Every
    /// publish call fails with this for the lifetime of the process.
    #[error("Posting client is not initialized")]
    NotInitialized,

    #[error("Post submission failed: {0}")]
    SubmissionFailed(String),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ScheduleError {
    #[error("Invalid schedule format: '{0}' (expected 'immediate' or 'every_<N>_<minutes|hours|days>')")]
    InvalidFormat(String),
}
