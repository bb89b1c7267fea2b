//! Single-elimination bracket in seeding (input) order.

use rand::Rng;

use crate::engine::error::SimError;
use crate::engine::leg::SimRules;
use crate::engine::models::*;
use crate::engine::simulator::simulate_match;

/// Play one bracket round. Consecutive entrants meet; an odd entrant out
/// gets a bye. Returns the round record and the next round's entrants in
/// bracket order.
pub fn play_round<R: Rng + ?Sized>(
    rng: &mut R,
    round: usize,
    entrants: &[PlayerRating],
    format: &MatchFormat,
    rules: &SimRules,
) -> Result<(RoundResult, Vec<PlayerRating>), SimError> {
    let mut matches = Vec::with_capacity(entrants.len() / 2);
    let mut byes = Vec::new();
    let mut advancing = Vec::with_capacity(entrants.len().div_ceil(2));

    for pair in entrants.chunks(2) {
        match pair {
            [p1, p2] => {
                let result = simulate_match(rng, p1, p2, format, rules)?;
                advancing.push(result.winner.clone());
                matches.push(MatchRecord {
                    p1: p1.clone(),
                    p2: p2.clone(),
                    score: result.score_line(),
                    winner: result.winner,
                    p1_stats: result.p1_stats,
                    p2_stats: result.p2_stats,
                });
            }
            [solo] => {
                tracing::debug!(round, player = %solo.name, "bye");
                byes.push(solo.clone());
                advancing.push(solo.clone());
            }
            _ => unreachable!("chunks(2) yields one or two entrants"),
        }
    }

    Ok((RoundResult { round, matches, byes }, advancing))
}

/// Run the whole bracket to a single champion.
pub fn simulate_knockout<R: Rng + ?Sized>(
    rng: &mut R,
    players: &[PlayerRating],
    format: &MatchFormat,
    rules: &SimRules,
) -> Result<TournamentResult, SimError> {
    if players.is_empty() {
        return Err(SimError::EmptyField);
    }
    format.validate()?;
    for player in players {
        player.validate()?;
    }

    let mut bracket = players.to_vec();
    let mut rounds = Vec::new();

    while bracket.len() > 1 {
        let (round, next) = play_round(rng, rounds.len() + 1, &bracket, format, rules)?;
        tracing::debug!(
            round = round.round,
            matches = round.matches.len(),
            byes = round.byes.len(),
            "round complete"
        );
        rounds.push(round);
        bracket = next;
    }

    let winner = bracket.remove(0);
    tracing::info!(winner = %winner.name, rounds = rounds.len(), entrants = players.len(), "knockout finished");
    Ok(TournamentResult { winner, rounds })
}
