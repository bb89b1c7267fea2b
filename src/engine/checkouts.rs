//! Three-dart finishing routes for 101-170 and the opening high-finish attempt.

use std::collections::HashMap;

use once_cell::sync::Lazy;
use rand::Rng;

use crate::engine::models::{PlayerState, VisitResult};

/// Scores of 170 or less that no three darts can finish.
pub const BOGEY_SCORES: [u32; 7] = [159, 162, 163, 165, 166, 168, 169];

pub const MAX_CHECKOUT: u32 = 170;

pub fn is_bogey(score: u32) -> bool {
    BOGEY_SCORES.contains(&score)
}

/// One finishing route: two setup darts and the double (50 = Bull).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HighCheckoutRoute {
    pub first: u32,
    pub second: u32,
    pub double: u32,
}

#[rustfmt::skip]
const ROUTES: [(u32, u32, u32, u32); 63] = [
    (170, 60, 60, 50), (167, 60, 57, 50), (164, 60, 54, 50), (161, 60, 51, 50),
    (160, 60, 60, 40), (158, 60, 60, 38), (157, 60, 57, 40), (156, 60, 60, 36),
    (155, 60, 57, 38), (154, 60, 54, 40), (153, 60, 57, 36), (152, 60, 60, 32),
    (151, 60, 57, 34), (150, 60, 60, 30), (149, 60, 57, 32), (148, 60, 60, 28),
    (147, 60, 57, 30), (146, 60, 54, 32), (145, 60, 57, 28), (144, 60, 60, 24),
    (143, 60, 57, 26), (142, 60, 54, 28), (141, 60, 57, 24), (140, 60, 60, 20),
    (139, 60, 57, 22), (138, 60, 54, 24), (137, 60, 57, 20), (136, 60, 60, 16),
    (135, 60, 57, 18), (134, 60, 54, 20), (133, 60, 57, 16), (132, 60, 60, 12),
    (131, 60, 57, 14), (130, 60, 60, 10), (129, 60, 57, 12), (128, 60, 54, 14),
    (127, 60, 57, 10), (126, 60, 54, 12), (125, 60, 57,  8), (124, 60, 54, 10),
    (123, 60, 57,  6), (122, 60, 54,  8), (121, 60, 57,  4), (120, 60, 20, 40),
    (119, 60, 57,  2), (118, 60, 18, 40), (117, 60, 17, 40), (116, 60, 16, 40),
    (115, 60, 15, 40), (114, 60, 14, 40), (113, 60, 13, 40), (112, 60, 12, 40),
    (111, 60, 11, 40), (110, 60, 10, 40), (109, 60,  9, 40), (108, 60,  8, 40),
    (107, 60,  7, 40), (106, 60,  6, 40), (105, 60,  5, 40), (104, 60,  4, 40),
    (103, 60,  3, 40), (102, 60,  2, 40), (101, 60,  1, 40),
];

pub static HIGH_CHECKOUTS: Lazy<HashMap<u32, HighCheckoutRoute>> = Lazy::new(|| {
    ROUTES
        .iter()
        .map(|&(score, first, second, double)| (score, HighCheckoutRoute { first, second, double }))
        .collect()
});

pub fn route_for(score: u32) -> Option<HighCheckoutRoute> {
    HIGH_CHECKOUTS.get(&score).copied()
}

/// Throw the table route for `score` dart by dart, stopping at the first miss.
///
/// Returns `None` when the score has no route. The checkout attempt is
/// counted only once the double is actually thrown at.
pub fn attempt_high_checkout<R: Rng + ?Sized>(
    rng: &mut R,
    player: &mut PlayerState,
    score: u32,
    is_decider: bool,
) -> Option<VisitResult> {
    let route = route_for(score)?;
    let avg = player.rating.avg;
    let co = player.rating.co;

    // Dart 1, nearly always treble 20.
    let first_prob = 0.40 + (avg - 85.0) * 0.012;
    if rng.gen::<f64>() >= first_prob {
        let landed = if route.first == 60 {
            if rng.gen::<f64>() < 0.7 {
                20
            } else if rng.gen::<f64>() < 0.5 {
                1
            } else {
                5
            }
        } else {
            route.first / 3
        };
        return Some(VisitResult::open(landed, 1));
    }
    let mut total = route.first;

    // Dart 2.
    let mut second_prob = if route.second >= 51 {
        0.38 + (avg - 85.0) * 0.01
    } else {
        0.90
    };
    if route.second == 50 {
        second_prob = 0.25 + (co - 35.0) * 0.008;
    }
    if rng.gen::<f64>() >= second_prob {
        let landed = if route.second >= 51 {
            route.second / 3
        } else if route.second == 50 {
            if rng.gen::<f64>() < 0.6 {
                25
            } else if rng.gen::<f64>() < 0.5 {
                1
            } else {
                5
            }
        } else {
            route.second
        };
        return Some(VisitResult::open(total + landed, 2));
    }
    total += route.second;

    // Dart 3, the double.
    player.stats.checkout_attempts += 1;
    let mut double_prob = (co / 100.0) * 1.10;
    if is_decider {
        double_prob *= 0.92;
    }
    if route.double == 50 {
        double_prob *= 0.65;
    }
    if rng.gen::<f64>() < double_prob {
        player.stats.checkout_hits += 1;
        return Some(VisitResult::finished(total + route.double, 3));
    }

    let landed = if route.double == 50 {
        if rng.gen::<f64>() < 0.5 { 25 } else { 0 }
    } else if rng.gen::<f64>() < 0.65 {
        route.double / 2
    } else {
        0
    };
    Some(VisitResult::open(total + landed, 3))
}
