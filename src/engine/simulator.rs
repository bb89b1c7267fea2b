//! Match simulation: repeated legs, optionally grouped into sets, with
//! alternating throw and final statistics.

use rand::Rng;

use crate::engine::error::SimError;
use crate::engine::leg::{simulate_leg, SimRules};
use crate::engine::models::*;

/// Running leg/set count for both sides.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct Scoreboard {
    /// Legs in the current set (or the whole match under leg play).
    legs: [u32; 2],
    sets: [u32; 2],
    legs_won: [u32; 2],
    legs_played: u32,
}

fn slot(side: Side) -> usize {
    match side {
        Side::P1 => 0,
        Side::P2 => 1,
    }
}

impl Scoreboard {
    fn finished(&self, format: &MatchFormat) -> Option<Side> {
        let (counts, target) = if format.is_set_play() {
            (self.sets, format.target_sets())
        } else {
            (self.legs, format.target_legs())
        };
        if counts[0] >= target {
            Some(Side::P1)
        } else if counts[1] >= target {
            Some(Side::P2)
        } else {
            None
        }
    }

    /// Both sides one leg (and under set play, one set) from the match.
    fn is_decider(&self, format: &MatchFormat) -> bool {
        let leg_point = format.target_legs().saturating_sub(1);
        let legs_level = self.legs == [leg_point, leg_point];
        if !format.is_set_play() {
            return legs_level;
        }
        let set_point = format.target_sets().saturating_sub(1);
        legs_level && self.sets == [set_point, set_point]
    }

    fn record_leg(&mut self, winner: Side, format: &MatchFormat) {
        self.legs[slot(winner)] += 1;
        self.legs_won[slot(winner)] += 1;
        self.legs_played += 1;

        if format.is_set_play() && self.legs[slot(winner)] >= format.target_legs() {
            self.sets[slot(winner)] += 1;
            self.legs = [0, 0];
        }
    }
}

/// Play a full match. `player1` throws first in the opening leg and the
/// throw alternates every leg, across set boundaries too.
pub fn simulate_match<R: Rng + ?Sized>(
    rng: &mut R,
    player1: &PlayerRating,
    player2: &PlayerRating,
    format: &MatchFormat,
    rules: &SimRules,
) -> Result<MatchResult, SimError> {
    format.validate()?;
    let mut p1 = PlayerState::new(player1)?;
    let mut p2 = PlayerState::new(player2)?;

    let mut board = Scoreboard::default();
    let mut first = Side::P1;

    let winner_side = loop {
        if let Some(side) = board.finished(format) {
            break side;
        }

        let is_decider = board.is_decider(format);
        let leg_winner = match first {
            Side::P1 => simulate_leg(rng, &mut p1, &mut p2, rules, is_decider)?,
            Side::P2 => simulate_leg(rng, &mut p2, &mut p1, rules, is_decider)?.other(),
        };
        board.record_leg(leg_winner, format);
        first = first.other();
    };

    let (p1_score, p2_score) = if format.is_set_play() {
        (board.sets[0], board.sets[1])
    } else {
        (board.legs[0], board.legs[1])
    };

    let winner = match winner_side {
        Side::P1 => player1.clone(),
        Side::P2 => player2.clone(),
    };
    tracing::debug!(
        p1 = %player1.name,
        p2 = %player2.name,
        winner = %winner.name,
        score = %format!("{}-{}", p1_score, p2_score),
        "match finished"
    );

    Ok(MatchResult {
        winner,
        winner_side,
        p1_score,
        p2_score,
        p1_legs_won: board.legs_won[0],
        p2_legs_won: board.legs_won[1],
        legs_played: board.legs_played,
        p1_stats: MatchStats::from(p1.stats),
        p2_stats: MatchStats::from(p2.stats),
    })
}
