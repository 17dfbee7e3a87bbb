//! Typewriter CLI
//!
//! Animates typing and deleting phrases on the current terminal line.

use anyhow::{Context, Result};
use clap::Parser;
use std::io;
use std::path::PathBuf;
use std::thread;
use std::time::Duration;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};
use typewriter::{TimerService, Typewriter};

mod config;
mod term;

use config::load_options;
use term::TermSink;

#[derive(Parser)]
#[command(name = "typewriter")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Animate typing and deleting phrases on the terminal", long_about = None)]
struct Cli {
    /// Phrases to cycle through, in order
    phrases: Vec<String>,

    /// TOML file with timing overrides (unset fields keep their defaults)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the initial delay before typing starts (milliseconds)
    #[arg(long)]
    start_delay: Option<u64>,

    /// How long to run before stopping, in seconds (0 = until interrupted)
    #[arg(short, long, default_value = "0")]
    duration: u64,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging. Logs go to stderr; stdout is the animation line.
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(filter)
        .init();

    let options = load_options(cli.config.as_deref(), cli.start_delay)?;

    let mut timers = TimerService::new();
    timers.start_background();

    let tw = Typewriter::builder()
        .timer(timers.handle())
        .sink(TermSink::new())
        .sources(cli.phrases)
        .options(options)
        .build()
        .context("failed to construct the typewriter")?;

    info!(
        "typing {} phrase(s), start delay {}ms",
        tw.source_count(),
        options.type_start_delay
    );
    tw.start();

    if cli.duration == 0 {
        loop {
            thread::sleep(Duration::from_secs(3600));
        }
    }

    thread::sleep(Duration::from_secs(cli.duration));
    tw.stop();
    timers.stop_background();
    println!();
    Ok(())
}
