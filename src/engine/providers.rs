//! Reference data and persistence seams. The simulator never calls these;
//! the binaries load rosters and tournaments through them and hand plain
//! values to the engine.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};

use crate::engine::error::SimError;
use crate::engine::models::{MatchFormat, PlayerRating};

/// Supplies player ratings.
pub trait RatingProvider {
    fn load_players(&self) -> Result<Vec<PlayerRating>, SimError>;
}

/// Supplies tournament definitions.
pub trait TournamentProvider {
    fn load_tournaments(&self) -> Result<Vec<TournamentDefinition>, SimError>;
}

/// Simple key-value persistence for results and saves.
pub trait SaveStore {
    fn save(&mut self, key: &str, value: &serde_json::Value) -> Result<(), SimError>;
    fn load(&self, key: &str) -> Result<Option<serde_json::Value>, SimError>;
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TournamentDefinition {
    pub name: String,
    #[serde(default)]
    pub format: MatchFormat,
    #[serde(default, rename = "cardRequired")]
    pub card_required: bool,
    /// Countries allowed to enter; empty means everyone.
    #[serde(default, rename = "eligibleRegions", deserialize_with = "regions_from_list_or_string")]
    pub eligible_regions: Vec<String>,
    /// Maximum bracket size; `None` takes every eligible player.
    #[serde(default, rename = "fieldSize")]
    pub field_size: Option<usize>,
}

/// Regions arrive either as a list or as a JSON-encoded list in a string.
fn regions_from_list_or_string<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Regions {
        List(Vec<String>),
        Encoded(String),
    }

    match Regions::deserialize(deserializer)? {
        Regions::List(list) => Ok(list),
        Regions::Encoded(s) if s.trim().is_empty() => Ok(Vec::new()),
        Regions::Encoded(s) => serde_json::from_str(&s).map_err(serde::de::Error::custom),
    }
}

impl TournamentDefinition {
    /// Eligible roster entries in roster order, cut to the field size.
    pub fn entrants(&self, roster: &[PlayerRating]) -> Vec<PlayerRating> {
        let eligible = roster
            .iter()
            .filter(|p| !self.card_required || p.tour_card)
            .filter(|p| {
                self.eligible_regions.is_empty()
                    || p.country
                        .as_ref()
                        .is_some_and(|c| self.eligible_regions.iter().any(|r| r == c))
            })
            .cloned();
        match self.field_size {
            Some(n) => eligible.take(n).collect(),
            None => eligible.collect(),
        }
    }
}

/// Accepts a bare array or an API-style `{ "players": [...] }` envelope.
#[derive(Deserialize)]
#[serde(untagged)]
enum Listing<T> {
    Bare(Vec<T>),
    Players { players: Vec<T> },
    Tournaments { tournaments: Vec<T> },
}

impl<T> Listing<T> {
    fn into_vec(self) -> Vec<T> {
        match self {
            Listing::Bare(v) => v,
            Listing::Players { players } => players,
            Listing::Tournaments { tournaments } => tournaments,
        }
    }
}

fn read_listing<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>, SimError> {
    let content = std::fs::read_to_string(path)?;
    let listing: Listing<T> = serde_json::from_str(&content)?;
    Ok(listing.into_vec())
}

/// Ratings read from a JSON file.
pub struct JsonRoster {
    pub path: PathBuf,
}

impl JsonRoster {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl RatingProvider for JsonRoster {
    fn load_players(&self) -> Result<Vec<PlayerRating>, SimError> {
        let players: Vec<PlayerRating> = read_listing(&self.path)?;
        for player in &players {
            player.validate()?;
        }
        tracing::info!(path = %self.path.display(), count = players.len(), "loaded roster");
        Ok(players)
    }
}

/// Tournament definitions read from a JSON file.
pub struct JsonTournaments {
    pub path: PathBuf,
}

impl JsonTournaments {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl TournamentProvider for JsonTournaments {
    fn load_tournaments(&self) -> Result<Vec<TournamentDefinition>, SimError> {
        let tournaments: Vec<TournamentDefinition> = read_listing(&self.path)?;
        for t in &tournaments {
            t.format.validate()?;
        }
        Ok(tournaments)
    }
}

/// One pretty-printed JSON file per key inside `dir`.
pub struct JsonFileStore {
    dir: PathBuf,
}

impl JsonFileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self, SimError> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, SimError> {
        let valid = !key.is_empty()
            && key.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !valid {
            return Err(SimError::Config(format!("invalid save key '{}'", key)));
        }
        Ok(self.dir.join(format!("{}.json", key)))
    }
}

impl SaveStore for JsonFileStore {
    fn save(&mut self, key: &str, value: &serde_json::Value) -> Result<(), SimError> {
        let path = self.path_for(key)?;
        std::fs::write(&path, serde_json::to_string_pretty(value)?)?;
        tracing::info!(path = %path.display(), "saved");
        Ok(())
    }

    fn load(&self, key: &str) -> Result<Option<serde_json::Value>, SimError> {
        let path = self.path_for(key)?;
        if !path.exists() {
            return Ok(None);
        }
        let content = std::fs::read_to_string(&path)?;
        Ok(Some(serde_json::from_str(&content)?))
    }
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: HashMap<String, serde_json::Value>,
}

impl SaveStore for MemoryStore {
    fn save(&mut self, key: &str, value: &serde_json::Value) -> Result<(), SimError> {
        self.entries.insert(key.to_string(), value.clone());
        Ok(())
    }

    fn load(&self, key: &str) -> Result<Option<serde_json::Value>, SimError> {
        Ok(self.entries.get(key).cloned())
    }
}
