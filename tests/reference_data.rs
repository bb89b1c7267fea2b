//! Load the bundled roster, tournament definitions and config, and run
//! events from them.

use std::path::PathBuf;

use rand::rngs::StdRng;
use rand::SeedableRng;

use darts_sim::engine::config::load_config;
use darts_sim::engine::providers::{
    JsonFileStore, JsonRoster, JsonTournaments, RatingProvider, SaveStore, TournamentProvider,
};
use darts_sim::engine::tournament::simulate_knockout;

fn data(file: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join(file)
}

#[test]
fn test_bundled_roster_and_tournaments_load() {
    let roster = JsonRoster::new(data("data/players.json")).load_players().unwrap();
    assert_eq!(roster.len(), 17);

    let tournaments = JsonTournaments::new(data("data/tournaments.json")).load_tournaments().unwrap();
    let names: Vec<&str> = tournaments.iter().map(|t| t.name.as_str()).collect();
    assert!(names.contains(&"UK Open"));

    let worlds = tournaments.iter().find(|t| t.name == "World Championship").unwrap();
    assert_eq!(worlds.entrants(&roster).len(), 17);
    assert!(worlds.format.is_set_play());

    let premier = tournaments.iter().find(|t| t.name == "Premier League Night").unwrap();
    assert_eq!(premier.entrants(&roster).len(), 8);

    let europe = tournaments.iter().find(|t| t.name == "European Championship").unwrap();
    let entrants = europe.entrants(&roster);
    assert!(entrants.iter().all(|p| p.tour_card));
    assert!(entrants
        .iter()
        .all(|p| matches!(p.country.as_deref(), Some("NED") | Some("BEL") | Some("GER"))));
}

#[test]
fn test_run_uk_open_and_save_result() {
    let roster = JsonRoster::new(data("data/players.json")).load_players().unwrap();
    let tournaments = JsonTournaments::new(data("data/tournaments.json")).load_tournaments().unwrap();
    let uk_open = tournaments.iter().find(|t| t.name == "UK Open").unwrap();
    let config = load_config(&data("darts_sim.toml")).unwrap();

    let entrants = uk_open.entrants(&roster);
    assert!(entrants.len() > 1);

    let mut rng = StdRng::seed_from_u64(42);
    let result = simulate_knockout(&mut rng, &entrants, &uk_open.format, &config.rules()).unwrap();
    assert!(entrants.contains(&result.winner));

    let dir = tempfile::tempdir().unwrap();
    let mut store = JsonFileStore::new(dir.path()).unwrap();
    store.save("uk_open", &serde_json::to_value(&result).unwrap()).unwrap();
    let saved = store.load("uk_open").unwrap().unwrap();
    assert_eq!(saved["winner"]["name"], serde_json::json!(result.winner.name));
}
