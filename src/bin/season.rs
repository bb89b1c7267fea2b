//! Season CLI: run many independent knockouts over one field and report
//! how often each player wins the title.
//!
//! Usage:
//!   cargo run --release --bin season -- --players players.json --events 500
//!   cargo run --release --bin season -- --players players.json --format world_championship --top 32

use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use darts_sim::engine::arena::run_season;
use darts_sim::engine::config::{load_config, load_default_config};
use darts_sim::engine::providers::{JsonRoster, RatingProvider};

#[derive(Parser)]
#[command(name = "season", about = "Batch-simulate knockout events and tally titles")]
struct Cli {
    /// Roster JSON
    #[arg(long, default_value = "players.json", env = "DARTS_SIM_PLAYERS")]
    players: PathBuf,

    /// Path to darts_sim.toml (default: auto-discover)
    #[arg(long, env = "DARTS_SIM_CONFIG")]
    config: Option<PathBuf>,

    /// Named match format from the config
    #[arg(long)]
    format: Option<String>,

    /// Number of events to simulate
    #[arg(long, default_value = "100")]
    events: usize,

    /// Base seed; event i uses seed + i
    #[arg(long, default_value = "42", env = "DARTS_SIM_SEED")]
    seed: u64,

    /// Only enter the first N roster players
    #[arg(long)]
    top: Option<usize>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .init();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => load_config(path)?,
        None => load_default_config(),
    };
    let format = config.format(cli.format.as_deref())?;

    let mut players = JsonRoster::new(&cli.players).load_players()?;
    if let Some(n) = cli.top {
        players.truncate(n);
    }

    eprintln!(
        "Season: {} events, {} entrants, seed={}, format={:?}",
        cli.events,
        players.len(),
        cli.seed,
        format
    );

    let result = run_season(&players, &format, &config.rules(), cli.events, cli.seed)?;
    println!("{}", result.summary());
    Ok(())
}
