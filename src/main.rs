use std::path::PathBuf;

use clap::{Parser, Subcommand};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use darts_sim::engine::config::{load_config, load_default_config, SimConfig};
use darts_sim::engine::error::SimError;
use darts_sim::engine::models::{MatchResult, MatchStats, PlayerRating, TournamentResult};
use darts_sim::engine::providers::{
    JsonFileStore, JsonRoster, JsonTournaments, RatingProvider, SaveStore, TournamentProvider,
};
use darts_sim::engine::simulator::simulate_match;
use darts_sim::engine::tournament::simulate_knockout;

#[derive(Parser)]
#[command(name = "darts-sim", about = "Simulate darts matches and knockout tournaments")]
struct Cli {
    /// Roster JSON: an array of players or {"players": [...]}
    #[arg(long, default_value = "players.json", env = "DARTS_SIM_PLAYERS")]
    players: PathBuf,

    /// Path to darts_sim.toml (default: auto-discover)
    #[arg(long, env = "DARTS_SIM_CONFIG")]
    config: Option<PathBuf>,

    /// Named match format from the config
    #[arg(long)]
    format: Option<String>,

    /// Random seed (default: config seed, else entropy)
    #[arg(long, env = "DARTS_SIM_SEED")]
    seed: Option<u64>,

    /// Print the result as JSON
    #[arg(long)]
    json: bool,

    /// Save the result under this key
    #[arg(long, requires = "store")]
    save: Option<String>,

    /// Directory holding saved results
    #[arg(long)]
    store: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Play a single match between two roster players
    Match {
        #[arg(long)]
        p1: String,
        #[arg(long)]
        p2: String,
    },
    /// Run a knockout over the whole roster or a defined tournament's field
    Knockout {
        /// Tournament definitions JSON
        #[arg(long)]
        tournaments: Option<PathBuf>,

        /// Tournament to run from the definitions file
        #[arg(long, requires = "tournaments")]
        tournament: Option<String>,
    },
}

fn find_player<'a>(roster: &'a [PlayerRating], name: &str) -> Result<&'a PlayerRating, SimError> {
    roster
        .iter()
        .find(|p| p.name == name)
        .ok_or_else(|| SimError::UnknownPlayer(name.to_string()))
}

fn stats_line(name: &str, s: &MatchStats) -> String {
    format!(
        "  {:>20}: avg={:6.2}  co={:5.1}% ({}/{})  180s={}  140+={}  100+={}  high={}",
        name,
        s.average,
        s.checkout_pct,
        s.totals.checkout_hits,
        s.totals.checkout_attempts,
        s.totals.one_eighties,
        s.totals.ton_forties,
        s.totals.tons,
        s.totals.highest_checkout,
    )
}

fn print_match(p1: &PlayerRating, p2: &PlayerRating, result: &MatchResult) {
    println!("{} {} {}", p1.name, result.score_line(), p2.name);
    println!("{}", stats_line(&p1.name, &result.p1_stats));
    println!("{}", stats_line(&p2.name, &result.p2_stats));
    println!("Winner: {}", result.winner.name);
}

fn print_knockout(result: &TournamentResult) {
    for round in &result.rounds {
        println!("Round {}", round.round);
        for m in &round.matches {
            println!(
                "  {:>20} {:>5} {:<20}  ({:.2} / {:.2})",
                m.p1.name, m.score, m.p2.name, m.p1_stats.average, m.p2_stats.average
            );
        }
        for bye in &round.byes {
            println!("  {:>20}   bye", bye.name);
        }
    }
    println!("Champion: {}", result.winner.name);
}

fn emit<T: Serialize>(cli: &Cli, result: &T) -> Result<(), Box<dyn std::error::Error>> {
    if cli.json {
        println!("{}", serde_json::to_string_pretty(result)?);
    }
    if let (Some(key), Some(dir)) = (&cli.save, &cli.store) {
        let mut store = JsonFileStore::new(dir)?;
        store.save(key, &serde_json::to_value(result)?)?;
    }
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .init();

    let cli = Cli::parse();

    let config: SimConfig = match &cli.config {
        Some(path) => load_config(path)?,
        None => load_default_config(),
    };
    let rules = config.rules();

    let mut rng = match cli.seed.or(config.defaults.seed) {
        Some(seed) => {
            tracing::info!(seed, "seeded run");
            StdRng::seed_from_u64(seed)
        }
        None => StdRng::from_entropy(),
    };

    let roster = JsonRoster::new(&cli.players).load_players()?;

    match &cli.command {
        Command::Match { p1, p2 } => {
            let p1 = find_player(&roster, p1)?;
            let p2 = find_player(&roster, p2)?;
            let format = config.format(cli.format.as_deref())?;
            let result = simulate_match(&mut rng, p1, p2, &format, &rules)?;
            if !cli.json {
                print_match(p1, p2, &result);
            }
            emit(&cli, &result)?;
        }
        Command::Knockout { tournaments, tournament } => {
            let (entrants, format) = match (tournaments, tournament) {
                (Some(path), Some(name)) => {
                    let defs = JsonTournaments::new(path).load_tournaments()?;
                    let def = defs
                        .iter()
                        .find(|t| &t.name == name)
                        .ok_or_else(|| SimError::Config(format!("unknown tournament '{}'", name)))?;
                    let format = match cli.format.as_deref() {
                        Some(f) => config.format(Some(f))?,
                        None => def.format,
                    };
                    (def.entrants(&roster), format)
                }
                _ => (roster.clone(), config.format(cli.format.as_deref())?),
            };

            tracing::info!(entrants = entrants.len(), "starting knockout");
            let result = simulate_knockout(&mut rng, &entrants, &format, &rules)?;
            if !cli.json {
                print_knockout(&result);
            }
            emit(&cli, &result)?;
        }
    }

    Ok(())
}
