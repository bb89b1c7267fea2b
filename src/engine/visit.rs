//! Visit planning: picks what each of up to three darts is aimed at and
//! resolves them against the throw models.

use rand::Rng;

use crate::engine::checkouts::{attempt_high_checkout, is_bogey, MAX_CHECKOUT};
use crate::engine::models::{PlayerState, VisitResult};
use crate::engine::throws::{checkout_hit, is_valid_target, scoring_hit, setup_hit};

/// Leaves preferred when the favourite double can't be set up, best first.
const NICE_LEAVES: [u32; 7] = [40, 32, 24, 16, 8, 4, 2];

const BULL: u32 = 50;

/// What a single dart is thrown at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Aim {
    /// A double worth the whole remaining score.
    Double(u32),
    Bull,
    /// A setup dart at the given board value (0 = nothing worth throwing at).
    Setup(u32),
    /// Treble 20. `finish` marks scoring inside checkout range.
    Score { finish: bool },
}

/// Choose the aim for one dart at `score`, given the preferred double.
pub fn plan_dart(score: u32, fav: u32) -> Aim {
    if score > MAX_CHECKOUT || is_bogey(score) {
        return Aim::Score { finish: false };
    }
    if score <= 40 && score % 2 == 0 {
        return Aim::Double(score);
    }
    if score == BULL {
        return Aim::Bull;
    }
    if score > 70 {
        return Aim::Score { finish: true };
    }
    Aim::Setup(setup_target(score, fav))
}

/// Value to aim at so the remainder is a good double.
pub fn setup_target(score: u32, fav: u32) -> u32 {
    if let Some(required) = score.checked_sub(fav * 2) {
        if is_valid_target(required) {
            return required;
        }
    }

    for leave in NICE_LEAVES {
        if score > leave && is_valid_target(score - leave) {
            return score - leave;
        }
    }

    if score > 2 {
        if is_valid_target(score - 2) { score - 2 } else { 1 }
    } else {
        0
    }
}

/// A high-finish route that leaves 1 or less is voided like any other bust.
fn settle_high_finish(score: u32, res: VisitResult) -> VisitResult {
    if res.end_leg {
        return res;
    }
    match score.checked_sub(res.points) {
        Some(rest) if rest >= 2 => res,
        _ => VisitResult::bust(),
    }
}

fn high_finish_available(score: u32) -> bool {
    (100..=MAX_CHECKOUT).contains(&score) && !is_bogey(score)
}

/// Play one visit for `player`. Does not touch `player.score`; the caller
/// applies the returned points. Checkout counters are updated in place.
pub fn process_visit<R: Rng + ?Sized>(
    rng: &mut R,
    player: &mut PlayerState,
    is_decider: bool,
) -> VisitResult {
    let start = player.score;

    // Two perfect visits in: go straight for the nine-darter route.
    if player.leg_darts == 6 && high_finish_available(start) {
        if let Some(res) = attempt_high_checkout(rng, player, start, is_decider) {
            return settle_high_finish(start, res);
        }
    }

    let avg = player.rating.avg;
    let co = player.rating.co;
    let fav = player.rating.fav;

    let mut score = start;
    let mut total = 0;
    let mut rhythm = 0;

    for dart in 1..=3 {
        if score <= 1 {
            return VisitResult::open(0, dart);
        }

        if dart == 1 && high_finish_available(score) {
            if let Some(res) = attempt_high_checkout(rng, player, score, is_decider) {
                return settle_high_finish(score, res);
            }
        }

        let points = match plan_dart(score, fav) {
            Aim::Double(target) => {
                player.stats.checkout_attempts += 1;
                let throw = checkout_hit(rng, target, co, is_decider, target / 2 == fav);
                if throw.is_double {
                    player.stats.checkout_hits += 1;
                    return VisitResult::finished(total + throw.points, dart);
                }
                if score == 2 && throw.points == 1 {
                    return VisitResult::open(0, dart);
                }
                throw.points
            }
            Aim::Bull => {
                player.stats.checkout_attempts += 1;
                let throw = checkout_hit(rng, BULL, co, is_decider, false);
                if throw.is_double {
                    player.stats.checkout_hits += 1;
                    return VisitResult::finished(total + BULL, dart);
                }
                throw.points
            }
            Aim::Setup(0) => 0,
            Aim::Setup(target) => setup_hit(rng, target, avg),
            Aim::Score { finish: true } => scoring_hit(rng, avg, rhythm, true),
            Aim::Score { finish: false } => {
                let points = scoring_hit(rng, avg, rhythm, false);
                rhythm = u32::from(points >= 57);
                points
            }
        };

        match score.checked_sub(points) {
            Some(0) => return VisitResult::finished(total + points, dart),
            Some(1) | None => return VisitResult::bust(),
            Some(rest) => {
                score = rest;
                total += points;
            }
        }
    }

    VisitResult::open(total, 3)
}
