//! train-app - Line-oriented shell for Leal Train records
//!
//! Drives the state engine against the in-memory document store. Each input
//! line becomes an intent; effects and state summaries are printed as they
//! are produced.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use libtrain::logging::{LogFormat, LoggingConfig};
use libtrain::store::memory::MemoryStore;
use libtrain::{Config, RemoteTrainRepository, TrainError};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, info};

use train_app::command::{self, ShellCommand, HELP};
use train_app::{view, AppError, Engine};

#[derive(Parser, Debug)]
#[command(name = "train-app")]
#[command(about = "Manage training records from the command line", long_about = None)]
struct Cli {
    /// Path to the configuration file
    #[arg(short, long, env = "TRAIN_CONFIG")]
    config: Option<PathBuf>,

    /// JSON file of records to seed the store with (overrides memory.seed_file)
    #[arg(short, long)]
    seed: Option<PathBuf>,

    /// Log output format (text, json or pretty)
    #[arg(long, env = "TRAIN_LOG_FORMAT", default_value = "text")]
    log_format: LogFormat,

    /// Log level filter when RUST_LOG is unset
    #[arg(long, env = "TRAIN_LOG_LEVEL", default_value = "warn")]
    log_level: String,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    LoggingConfig::new(cli.log_format, cli.log_level.clone(), cli.verbose).init();

    if let Err(e) = run(cli).await {
        eprintln!("Error: {:#}", e);
        std::process::exit(exit_code(&e));
    }
}

fn exit_code(error: &anyhow::Error) -> i32 {
    if let Some(e) = error.downcast_ref::<AppError>() {
        return e.exit_code();
    }
    if let Some(e) = error.downcast_ref::<TrainError>() {
        return e.exit_code();
    }
    1
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = match &cli.config {
        Some(path) => Config::load_from_path(path)
            .with_context(|| format!("failed to load config from {}", path.display()))?,
        None => Config::load_or_default()?,
    };

    let store = Arc::new(MemoryStore::new().with_latency(config.memory.latency()));
    let collection = config.repository.collection()?.to_string();

    if let Some(seed) = cli.seed.clone().or_else(|| config.memory.seed_path()) {
        let count = store
            .seed_from_file(&collection, &seed)
            .with_context(|| format!("failed to seed from {}", seed.display()))?;
        info!("Seeded {} records from {}", count, seed.display());
    }

    let repository = RemoteTrainRepository::from_config(store, &config.repository)?;
    debug!(
        "Repository on collection '{}' with {:?} timeout",
        repository.collection(),
        repository.timeout()
    );
    let engine = Engine::new(Arc::new(repository));

    if let Some(mut effects) = engine.take_effects() {
        tokio::spawn(async move {
            while let Some(effect) = effects.recv().await {
                println!("* {}", effect.message());
            }
        });
    }

    let mut states = engine.subscribe().await;
    tokio::spawn(async move {
        while let Some(state) = states.recv().await {
            println!("  {}", view::render_summary(&state));
        }
    });

    engine.start().await.context("initial load did not complete")?;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line.map_err(AppError::from)? else {
                    break;
                };
                if !handle_line(&engine, &line).await {
                    break;
                }
            }
            _ = tokio::signal::ctrl_c() => {
                info!("Interrupted");
                break;
            }
        }
    }

    Ok(())
}

/// Run one input line; returns `false` when the shell should exit
async fn handle_line(engine: &Engine, line: &str) -> bool {
    let command = match command::parse(line) {
        Ok(Some(command)) => command,
        Ok(None) => return true,
        Err(e) => {
            eprintln!("{}", AppError::from(e));
            return true;
        }
    };

    match command {
        ShellCommand::Quit => return false,
        ShellCommand::Help => println!("{}", HELP),
        ShellCommand::State => println!("{}", view::render_state(&engine.state().await)),
        command => match command.into_intent(&engine.state().await) {
            Ok(Some(intent)) => engine.dispatch(intent).await,
            Ok(None) => {}
            Err(e) => eprintln!("{}", AppError::from(e)),
        },
    }

    true
}
