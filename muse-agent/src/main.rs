//! muse-agent - Automated social posting agent
//!
//! Generates short post text about a configured topic through a
//! language-model provider and publishes it, either once or on a
//! repeating schedule.

use clap::Parser;
use std::path::PathBuf;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use tracing::info;

use libmusecast::runner::JobRunner;
use libmusecast::schedule::ScheduleSpec;
use libmusecast::{logging, Config, MusecastError, OpenAiGenerator, Result, TwitterPublisher};

#[derive(Parser, Debug)]
#[command(name = "muse-agent")]
#[command(version)]
#[command(about = "Automated agent that generates and posts social media content")]
#[command(long_about = "\
muse-agent - Automated social posting agent

DESCRIPTION:
    muse-agent generates a short post about a topic using a language-model
    provider and publishes it to the configured platform. It either posts
    once and exits, or keeps running and posts on a fixed schedule.

    On a repeating schedule the first post happens only after one full
    interval has elapsed; nothing is posted at startup.

USAGE:
    # Post once, right now
    muse-agent \"space exploration\"

    # Post every two hours until stopped
    muse-agent \"space exploration\" --schedule every_2_hours

    # Use an alternate configuration file
    muse-agent \"rust programming\" --config ./musecast.toml

SCHEDULES:
    immediate             Post once and exit
    every_<N>_minutes     Post every N minutes (also: hours, days)

SIGNALS:
    SIGTERM, SIGINT - Graceful shutdown (finishes the current post)

CONFIGURATION:
    Configuration file: ~/.config/musecast/config.toml
    Override with MUSECAST_CONFIG or --config.

    [openai]
    api_key = \"sk-...\"

    [twitter]
    api_key = \"...\"
    api_secret = \"...\"
    access_token = \"...\"
    access_token_secret = \"...\"

    [settings]
    log_file = \"~/.local/share/musecast/musecast.log\"
    default_schedule = \"immediate\"

EXIT CODES:
    0 - Clean shutdown
    1 - Runtime error
    2 - Publisher never initialized
    3 - Invalid input or schedule

For more information, visit: https://github.com/musecast/musecast
")]
struct Cli {
    /// Topic to post about
    topic: String,

    /// Schedule descriptor (overrides the configured default)
    #[arg(short, long, value_name = "SCHEDULE")]
    #[arg(help = "When to post: 'immediate' or 'every_<N>_<minutes|hours|days>'")]
    schedule: Option<String>,

    /// Path to an alternate configuration file
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Stop after this many posting cycles (for testing)
    #[arg(long, hide = true, value_name = "N")]
    max_cycles: Option<u64>,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        eprintln!("Error: {}", e);
        std::process::exit(e.exit_code());
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config = match &cli.config {
        Some(path) => Config::load_from_path(path)?,
        None => Config::load()?,
    };
    config.validate()?;

    // Guard must outlive the run or buffered file output is dropped
    let _guard = logging::init(&config.settings.log_file, cli.verbose)?;

    let descriptor = cli
        .schedule
        .as_deref()
        .unwrap_or(&config.settings.default_schedule);
    let spec = ScheduleSpec::parse(descriptor)?;

    let topic = cli.topic.trim();
    if topic.is_empty() {
        return Err(MusecastError::InvalidInput(
            "Topic cannot be empty".to_string(),
        ));
    }

    info!(topic, schedule = %spec, "muse-agent starting");

    let generator = OpenAiGenerator::new(&config.openai)?;
    let publisher = TwitterPublisher::new(&config.twitter);
    if !publisher.is_initialized() {
        // Every cycle would fail the same way; abort now with exit code 2
        return Err(libmusecast::error::PublishError::NotInitialized.into());
    }
    let runner = JobRunner::new(Arc::new(generator), Arc::new(publisher), topic);

    let shutdown = Arc::new(AtomicBool::new(false));
    if spec != ScheduleSpec::Immediate {
        setup_signal_handlers(shutdown.clone())?;
    }

    let executed = runner.run(&spec, shutdown, cli.max_cycles).await;
    info!(cycles = executed, "muse-agent stopped");

    Ok(())
}

/// Set up signal handlers for graceful shutdown
#[cfg(unix)]
fn setup_signal_handlers(shutdown: Arc<AtomicBool>) -> Result<()> {
    use signal_hook::consts::{SIGINT, SIGTERM};
    use signal_hook::iterator::Signals;
    use std::sync::atomic::Ordering;

    let mut signals = Signals::new([SIGINT, SIGTERM])
        .map_err(|e| MusecastError::InvalidInput(format!("Signal setup failed: {}", e)))?;

    std::thread::spawn(move || {
        for sig in signals.forever() {
            match sig {
                SIGTERM | SIGINT => {
                    info!("Received shutdown signal, stopping gracefully...");
                    shutdown.store(true, Ordering::Relaxed);
                    break;
                }
                _ => {}
            }
        }
    });

    Ok(())
}

#[cfg(not(unix))]
fn setup_signal_handlers(_shutdown: Arc<AtomicBool>) -> Result<()> {
    Ok(())
}
