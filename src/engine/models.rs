//! Core simulation data types: ratings, per-match player state, results.

use serde::{Deserialize, Deserializer, Serialize};

use crate::engine::error::SimError;

/// Score every leg starts from.
pub const LEG_START_SCORE: u32 = 501;

/// Lowest checkout percentage a rating may carry. Below this a leg can run
/// past any sensible visit bound.
pub const MIN_CHECKOUT_PCT: f64 = 1.0;

/// Double used when a roster row has none.
pub const DEFAULT_FAV: u32 = 20;

/// Player ratings as supplied by the roster. Immutable input to simulation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PlayerRating {
    pub name: String,
    #[serde(default)]
    pub country: Option<String>,
    /// Three-dart scoring average.
    pub avg: f64,
    /// Checkout percentage, 0-100.
    pub co: f64,
    /// Preferred double (1-20, or 25 for Bull). Missing, null and 0 mean 20.
    #[serde(default = "default_fav", deserialize_with = "fav_or_default")]
    pub fav: u32,
    #[serde(default)]
    pub money: f64,
    #[serde(default, rename = "tourCard")]
    pub tour_card: bool,
}

fn default_fav() -> u32 {
    DEFAULT_FAV
}

fn fav_or_default<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let fav = Option::<u32>::deserialize(deserializer)?;
    Ok(fav.filter(|&f| f != 0).unwrap_or(DEFAULT_FAV))
}

impl PlayerRating {
    pub fn new(name: impl Into<String>, avg: f64, co: f64, fav: u32) -> Self {
        Self {
            name: name.into(),
            country: None,
            avg,
            co,
            fav: if fav == 0 { DEFAULT_FAV } else { fav },
            money: 0.0,
            tour_card: false,
        }
    }

    /// Reject ratings that would turn into nonsense probabilities.
    pub fn validate(&self) -> Result<(), SimError> {
        let invalid = |reason: String| SimError::InvalidRating {
            name: self.name.clone(),
            reason,
        };
        if !self.avg.is_finite() || self.avg < 0.0 {
            return Err(invalid(format!("average {} must be a non-negative number", self.avg)));
        }
        if !self.co.is_finite() || !(MIN_CHECKOUT_PCT..=100.0).contains(&self.co) {
            return Err(invalid(format!(
                "checkout percentage {} must be within {}-100",
                self.co, MIN_CHECKOUT_PCT
            )));
        }
        if !((1..=20).contains(&self.fav) || self.fav == 25) {
            return Err(invalid(format!("favourite double {} is not a double on the board", self.fav)));
        }
        Ok(())
    }
}

/// Statistics accumulated over a whole match.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerStats {
    pub darts: u32,
    pub points: u32,
    pub checkout_attempts: u32,
    pub checkout_hits: u32,
    /// Visits of 100-139.
    pub tons: u32,
    /// Visits of 140-179.
    pub ton_forties: u32,
    pub one_eighties: u32,
    pub highest_checkout: u32,
}

impl PlayerStats {
    /// Fold one visit into the match totals. `score_before` is the score the
    /// visit started from, which is the checkout value when the leg ended.
    pub fn record_visit(&mut self, visit: &VisitResult, score_before: u32) {
        self.darts += visit.darts;
        self.points += visit.points;

        match visit.points {
            180 => self.one_eighties += 1,
            140..=179 => self.ton_forties += 1,
            100..=139 => self.tons += 1,
            _ => {}
        }

        if visit.end_leg && score_before > self.highest_checkout {
            self.highest_checkout = score_before;
        }
    }

    /// Three-dart average, 0 when nothing was thrown.
    pub fn average(&self) -> f64 {
        if self.darts == 0 {
            return 0.0;
        }
        self.points as f64 / self.darts as f64 * 3.0
    }

    pub fn checkout_pct(&self) -> f64 {
        if self.checkout_attempts == 0 {
            return 0.0;
        }
        self.checkout_hits as f64 / self.checkout_attempts as f64 * 100.0
    }
}

/// Mutable per-match simulation instance of a player.
#[derive(Debug, Clone)]
pub struct PlayerState {
    pub rating: PlayerRating,
    /// Remaining score in the current leg.
    pub score: u32,
    /// Darts thrown in the current leg.
    pub leg_darts: u32,
    pub stats: PlayerStats,
}

impl PlayerState {
    pub fn new(rating: &PlayerRating) -> Result<Self, SimError> {
        rating.validate()?;
        Ok(Self {
            rating: rating.clone(),
            score: LEG_START_SCORE,
            leg_darts: 0,
            stats: PlayerStats::default(),
        })
    }

    pub fn reset_leg(&mut self, start_score: u32) {
        self.score = start_score;
        self.leg_darts = 0;
    }
}

/// Outcome of one visit (up to three darts).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VisitResult {
    pub points: u32,
    pub end_leg: bool,
    pub darts: u32,
}

impl VisitResult {
    pub fn open(points: u32, darts: u32) -> Self {
        Self { points, end_leg: false, darts }
    }

    pub fn finished(points: u32, darts: u32) -> Self {
        Self { points, end_leg: true, darts }
    }

    /// A voided visit: nothing scores, all three darts are spent.
    pub fn bust() -> Self {
        Self::open(0, 3)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    P1,
    P2,
}

impl Side {
    pub fn other(self) -> Side {
        match self {
            Side::P1 => Side::P2,
            Side::P2 => Side::P1,
        }
    }
}

/// Match length. `sets == 0` means plain leg play.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchFormat {
    #[serde(default)]
    pub legs: u32,
    #[serde(default)]
    pub sets: u32,
    #[serde(default = "default_legs_per_set")]
    pub legs_per_set: u32,
}

fn default_legs_per_set() -> u32 {
    5
}

impl Default for MatchFormat {
    fn default() -> Self {
        Self::legs(6)
    }
}

impl MatchFormat {
    pub fn legs(legs: u32) -> Self {
        Self { legs, sets: 0, legs_per_set: default_legs_per_set() }
    }

    pub fn sets(sets: u32) -> Self {
        Self { legs: 0, sets, legs_per_set: default_legs_per_set() }
    }

    pub fn is_set_play(&self) -> bool {
        self.sets > 0
    }

    /// Legs needed to win the match (leg play) or a set (set play).
    pub fn target_legs(&self) -> u32 {
        if self.is_set_play() {
            self.legs_per_set.div_ceil(2)
        } else {
            self.legs.div_ceil(2)
        }
    }

    pub fn target_sets(&self) -> u32 {
        self.sets.div_ceil(2)
    }

    pub fn validate(&self) -> Result<(), SimError> {
        if self.is_set_play() {
            if self.legs_per_set == 0 {
                return Err(SimError::InvalidFormat("sets need at least one leg".into()));
            }
        } else if self.legs == 0 {
            return Err(SimError::InvalidFormat("match needs at least one leg".into()));
        }
        Ok(())
    }
}

/// Final per-player numbers for a match.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MatchStats {
    #[serde(flatten)]
    pub totals: PlayerStats,
    pub average: f64,
    pub checkout_pct: f64,
}

impl From<PlayerStats> for MatchStats {
    fn from(totals: PlayerStats) -> Self {
        Self {
            average: totals.average(),
            checkout_pct: totals.checkout_pct(),
            totals,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchResult {
    pub winner: PlayerRating,
    pub winner_side: Side,
    /// Sets under set play, legs otherwise.
    pub p1_score: u32,
    pub p2_score: u32,
    pub p1_legs_won: u32,
    pub p2_legs_won: u32,
    pub legs_played: u32,
    pub p1_stats: MatchStats,
    pub p2_stats: MatchStats,
}

impl MatchResult {
    pub fn score_line(&self) -> String {
        format!("{}-{}", self.p1_score, self.p2_score)
    }
}

/// A match played inside a bracket.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchRecord {
    pub p1: PlayerRating,
    pub p2: PlayerRating,
    pub winner: PlayerRating,
    pub score: String,
    pub p1_stats: MatchStats,
    pub p2_stats: MatchStats,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoundResult {
    /// 1-based.
    pub round: usize,
    pub matches: Vec<MatchRecord>,
    /// Entrants that advanced without playing.
    #[serde(default)]
    pub byes: Vec<PlayerRating>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TournamentResult {
    pub winner: PlayerRating,
    pub rounds: Vec<RoundResult>,
}
