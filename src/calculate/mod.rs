//! Statistics calculation engine.
//!
//! Pure functions over already-normalized match data:
//! - Rounding helpers shared by every derived figure
//! - Window averages (kills, deaths, assists, MVPs, headshot %, K/D, K/R)
//! - Win rate from a win/loss tally
//! - Goal pace projection (see [`pace`])

pub mod pace;

pub use pace::{pace_message, project_goal_pace, PaceError};

use crate::config::DenominatorPolicy;
use crate::models::{AggregateStats, MatchStats};

/// Round to `decimals` places, halves away from zero.
///
/// Only equal to a round-half-up rule for non-negative values; `-2.5` gives
/// `-3.0`, not `-2.0`.
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

/// Round a non-negative average to the nearest whole number.
pub fn round_whole(value: f64) -> u32 {
    value.round().max(0.0) as u32
}

/// Win percentage rounded to a whole number, `None` when no games were played.
pub fn win_rate(wins: u32, losses: u32) -> Option<u32> {
    let total = wins + losses;
    if total == 0 {
        None
    } else {
        Some(round_whole(wins as f64 / total as f64 * 100.0))
    }
}

/// Running sums over a window of matches.
#[derive(Debug, Clone, Default)]
pub struct WindowSums {
    pub kills: u64,
    pub deaths: u64,
    pub assists: u64,
    pub mvps: u64,
    /// Sum of per-match headshots/kills; zero-kill matches add nothing
    pub headshot_ratio: f64,
    pub kd_ratio: f64,
    pub kr_ratio: f64,
    pub matches: u32,
}

impl WindowSums {
    pub fn add(&mut self, m: &MatchStats) {
        self.kills += u64::from(m.kills);
        self.deaths += u64::from(m.deaths);
        self.assists += u64::from(m.assists);
        self.mvps += u64::from(m.mvps);
        self.headshot_ratio += m.headshot_ratio().unwrap_or(0.0);
        self.kd_ratio += m.kd_ratio;
        self.kr_ratio += m.kr_ratio;
        self.matches += 1;
    }

    /// Divide and round. `None` if the chosen denominator is zero.
    pub fn finish(&self, window_size: u32, policy: DenominatorPolicy) -> Option<AggregateStats> {
        let n = match policy {
            DenominatorPolicy::RequestedSize => window_size,
            DenominatorPolicy::ActualCount => self.matches,
        };
        if n == 0 {
            return None;
        }
        let n = f64::from(n);

        Some(AggregateStats {
            avg_kills: round_whole(self.kills as f64 / n),
            avg_deaths: round_whole(self.deaths as f64 / n),
            avg_assists: round_whole(self.assists as f64 / n),
            avg_mvps: round_whole(self.mvps as f64 / n),
            headshot_percent: round_to(self.headshot_ratio / n * 100.0, 2),
            avg_kd_ratio: round_to(self.kd_ratio / n, 2),
            avg_kr_ratio: round_to(self.kr_ratio / n, 2),
            window_size,
            matches_counted: self.matches,
        })
    }
}

/// Average a window of matches.
pub fn aggregate_window(
    matches: &[MatchStats],
    window_size: u32,
    policy: DenominatorPolicy,
) -> Option<AggregateStats> {
    let mut sums = WindowSums::default();
    for m in matches {
        sums.add(m);
    }
    sums.finish(window_size, policy)
}
