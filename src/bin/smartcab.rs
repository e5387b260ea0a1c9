//! smartcab CLI - Train a Q-learning cab in a grid-world traffic simulation
//!
//! This CLI provides:
//! - Training the agent over a series of trials, with CSV/JSONL/JSON output
//! - Comparing the learned policy against a random driver

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "smartcab")]
#[command(version, about = "Q-learning agent for a simulated smartcab", long_about = None)]
struct Cli {
    /// Log every trial (repeat for every tick)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Train the agent over a series of trials
    Train(Box<smartcab::cli::commands::train::TrainArgs>),

    /// Compare Q-learning against the random baseline
    Compare(smartcab::cli::commands::compare::CompareArgs),
}

fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "smartcab=warn",
        1 => "smartcab=info",
        _ => "smartcab=debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Train(args) => smartcab::cli::commands::train::execute(*args),
        Commands::Compare(args) => smartcab::cli::commands::compare::execute(args),
    }
}
