//! Season runner: many independent knockouts over the same field, run in
//! parallel, aggregated into title counts and scoring numbers.

use std::collections::HashMap;
use std::time::Instant;

use rand::rngs::StdRng;
use rand::SeedableRng;
use rayon::prelude::*;

use crate::engine::error::SimError;
use crate::engine::leg::SimRules;
use crate::engine::models::{MatchFormat, PlayerRating, TournamentResult};
use crate::engine::tournament::simulate_knockout;

/// Aggregated results from a season run.
pub struct SeasonResult {
    pub num_events: usize,
    /// Entrant names in seeding order.
    pub entrants: Vec<String>,
    pub titles: HashMap<String, usize>,
    /// Three-dart average of every match a player played.
    pub match_averages: HashMap<String, Vec<f64>>,
    pub event_durations_ms: Vec<f64>,
}

impl SeasonResult {
    pub fn title_rate(&self, name: &str) -> f64 {
        *self.titles.get(name).unwrap_or(&0) as f64 / self.num_events.max(1) as f64
    }

    pub fn avg_match_average(&self, name: &str) -> f64 {
        match self.match_averages.get(name) {
            Some(a) if !a.is_empty() => a.iter().sum::<f64>() / a.len() as f64,
            _ => 0.0,
        }
    }

    /// Wilson score interval for the title rate.
    pub fn confidence_interval_95(&self, name: &str) -> (f64, f64) {
        let n = self.num_events;
        if n == 0 {
            return (0.0, 0.0);
        }
        let p = self.title_rate(name);
        let z = 1.96_f64;
        let denom = 1.0 + z * z / n as f64;
        let center = (p + z * z / (2.0 * n as f64)) / denom;
        let margin = z * ((p * (1.0 - p) + z * z / (4.0 * n as f64)) / n as f64).sqrt() / denom;
        ((center - margin).max(0.0), (center + margin).min(1.0))
    }

    /// Entrants sorted by titles won, most first; seeding order breaks ties.
    pub fn standings(&self) -> Vec<(&str, usize)> {
        let mut rows: Vec<(&str, usize)> = self
            .entrants
            .iter()
            .map(|n| (n.as_str(), *self.titles.get(n).unwrap_or(&0)))
            .collect();
        rows.sort_by(|a, b| b.1.cmp(&a.1));
        rows
    }

    pub fn summary(&self) -> String {
        let mut lines = vec![format!("Season Results ({} events)", self.num_events)];
        lines.push("=".repeat(60));
        for (name, titles) in self.standings() {
            let (ci_lo, ci_hi) = self.confidence_interval_95(name);
            lines.push(format!(
                "  {:>20}: {:3} titles ({:5.1}%)  [95% CI: {:.1}%-{:.1}%]  avg={:5.1}",
                name,
                titles,
                self.title_rate(name) * 100.0,
                ci_lo * 100.0,
                ci_hi * 100.0,
                self.avg_match_average(name),
            ));
        }
        if !self.event_durations_ms.is_empty() {
            let total_ms = self.event_durations_ms.iter().sum::<f64>();
            lines.push(format!(
                "  Avg event: {:.1}ms  |  Total CPU: {:.1}s",
                total_ms / self.event_durations_ms.len() as f64,
                total_ms / 1000.0
            ));
        }
        lines.join("\n")
    }
}

/// Run `num_events` knockouts. Event `i` is seeded with `base_seed + i`, so
/// the outcome does not depend on how rayon schedules the work.
pub fn run_season(
    players: &[PlayerRating],
    format: &MatchFormat,
    rules: &SimRules,
    num_events: usize,
    base_seed: u64,
) -> Result<SeasonResult, SimError> {
    let events: Vec<(TournamentResult, f64)> = (0..num_events)
        .into_par_iter()
        .map(|event_idx| -> Result<(TournamentResult, f64), SimError> {
            let mut rng = StdRng::seed_from_u64(base_seed.wrapping_add(event_idx as u64));
            let t0 = Instant::now();
            let result = simulate_knockout(&mut rng, players, format, rules)?;
            Ok((result, t0.elapsed().as_secs_f64() * 1000.0))
        })
        .collect::<Result<_, _>>()?;

    let mut season = SeasonResult {
        num_events,
        entrants: players.iter().map(|p| p.name.clone()).collect(),
        titles: players.iter().map(|p| (p.name.clone(), 0)).collect(),
        match_averages: players.iter().map(|p| (p.name.clone(), Vec::new())).collect(),
        event_durations_ms: Vec::with_capacity(num_events),
    };

    for (result, elapsed_ms) in events {
        *season.titles.entry(result.winner.name.clone()).or_default() += 1;
        for round in &result.rounds {
            for m in &round.matches {
                season.match_averages.entry(m.p1.name.clone()).or_default().push(m.p1_stats.average);
                season.match_averages.entry(m.p2.name.clone()).or_default().push(m.p2_stats.average);
            }
        }
        season.event_durations_ms.push(elapsed_ms);
    }

    tracing::info!(events = num_events, entrants = players.len(), "season complete");
    Ok(season)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field() -> Vec<PlayerRating> {
        vec![
            PlayerRating::new("strong", 102.0, 48.0, 20),
            PlayerRating::new("steady", 94.0, 41.0, 16),
            PlayerRating::new("journeyman", 88.0, 37.0, 18),
            PlayerRating::new("qualifier", 84.0, 33.0, 8),
        ]
    }

    #[test]
    fn test_season_counts_one_title_per_event() {
        let result = run_season(&field(), &MatchFormat::legs(5), &SimRules::default(), 12, 42).unwrap();
        assert_eq!(result.num_events, 12);
        assert_eq!(result.titles.values().sum::<usize>(), 12);
        assert_eq!(result.event_durations_ms.len(), 12);
        // Every entrant plays at least its first-round match each event.
        assert!(result.match_averages.values().all(|a| a.len() >= 12));
        assert!(result.summary().contains("Season Results (12 events)"));
    }

    #[test]
    fn test_season_is_reproducible_for_a_seed() {
        let a = run_season(&field(), &MatchFormat::legs(3), &SimRules::default(), 8, 7).unwrap();
        let b = run_season(&field(), &MatchFormat::legs(3), &SimRules::default(), 8, 7).unwrap();
        assert_eq!(a.titles, b.titles);
        assert_eq!(a.match_averages, b.match_averages);
    }

    #[test]
    fn test_confidence_interval_bounds() {
        let result = run_season(&field(), &MatchFormat::legs(3), &SimRules::default(), 10, 1).unwrap();
        for name in &result.entrants {
            let (lo, hi) = result.confidence_interval_95(name);
            assert!(lo >= 0.0 && hi <= 1.0 && lo <= hi);
            let rate = result.title_rate(name);
            assert!(lo <= rate && rate <= hi);
        }
    }

    #[test]
    fn test_seeds_wrap_at_the_top_of_the_range() {
        let result = run_season(&field(), &MatchFormat::legs(3), &SimRules::default(), 3, u64::MAX).unwrap();
        assert_eq!(result.titles.values().sum::<usize>(), 3);

        // Event 1 from u64::MAX is event 0 from seed 0.
        let wrapped = run_season(&field(), &MatchFormat::legs(3), &SimRules::default(), 2, u64::MAX).unwrap();
        let from_zero = run_season(&field(), &MatchFormat::legs(3), &SimRules::default(), 1, 0).unwrap();
        let last = run_season(&field(), &MatchFormat::legs(3), &SimRules::default(), 1, u64::MAX).unwrap();
        for name in &wrapped.entrants {
            assert_eq!(wrapped.titles[name], from_zero.titles[name] + last.titles[name]);
        }
    }

    #[test]
    fn test_empty_season() {
        let result = run_season(&field(), &MatchFormat::legs(3), &SimRules::default(), 0, 1).unwrap();
        assert_eq!(result.confidence_interval_95("strong"), (0.0, 0.0));
        assert_eq!(result.title_rate("strong"), 0.0);
    }
}
