//! EEG Recognition Task - recognition memory for words, numbers and pairs
//!
//! Single-session, self-contained CLI application. Each block shows a
//! list of targets, then asks for every item whether it was in the list and
//! appends the answer and reaction time to a CSV file.

mod cli;
mod session;

use chrono::Local;
use clap::Parser;
use cli::display::Display;
use cli::Terminal;
use rand::rngs::StdRng;
use rand::SeedableRng;
use session::{ItemPools, Protocol, ProtocolConfig, ResultLog, Session};
use std::error::Error;
use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "EEG Recognition Task")]
#[command(about = "Recognition memory task for words, numbers and word-number pairs")]
struct Args {
    /// Task version
    #[arg(short, long, value_enum, default_value = "v2")]
    protocol: Protocol,

    /// Word list, one word per line
    #[arg(short, long, default_value = "data/fruits.txt")]
    words: PathBuf,

    /// Results file (appended to)
    #[arg(short, long, default_value = "results.csv")]
    output: PathBuf,

    /// JSON protocol overrides (created with the defaults if missing)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Seed for target and trial sampling
    #[arg(short, long)]
    seed: Option<u64>,

    /// Diagnostic log file
    #[arg(long, default_value = "recognition.log")]
    log_file: PathBuf,

    /// Enable debug logging (one line per trial)
    #[arg(short, long)]
    debug: bool,
}

/// Send tracing output to a file; the terminal belongs to the participant
fn init_logging(path: &Path, debug: bool) -> Result<(), Box<dyn Error>> {
    let file = OpenOptions::new().create(true).append(true).open(path)?;
    let default_level = if debug { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();
    init_logging(&args.log_file, args.debug)?;

    let config = match &args.config {
        Some(path) => ProtocolConfig::load_or_init(path, args.protocol)?,
        None => args.protocol.config(),
    };
    let pools = ItemPools::load(&args.words, config.exclude_round_numbers)?;
    let log = ResultLog::new(&args.output, config.write_header);

    let seed = args.seed.unwrap_or_else(rand::random);
    tracing::info!(
        seed,
        protocol = config.protocol.label(),
        words = pools.words.len(),
        numbers = pools.numbers.len(),
        pairs = pools.pairs.len(),
        "stimulus pools ready"
    );

    println!("[INITIATED] {}", Local::now().format("%Y-%m-%d %H:%M:%S%.6f"));

    let mut terminal = Terminal::open()?;
    let outcome = Session::new(
        config,
        pools,
        log,
        &mut terminal,
        StdRng::seed_from_u64(seed),
    )
    .and_then(Session::run);
    terminal.close()?;

    match outcome {
        Ok(tracker) => {
            Display::show_summary(&tracker)?;
            println!("Results appended to {}", args.output.display());
        }
        Err(e) => {
            tracing::error!(error = %e, "session ended early");
            return Err(e.into());
        }
    }

    println!("[CONCLUDED] {}", Local::now().format("%Y-%m-%d %H:%M:%S%.6f"));
    Ok(())
}
