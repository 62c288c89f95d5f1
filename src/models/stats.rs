//! Derived statistics models.
//!
//! Everything here is computed per request and never persisted.

use serde::{Deserialize, Serialize};

use super::{Classification, MatchStats};

/// Win or loss of a single match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchResult {
    #[serde(rename = "W")]
    Win,
    #[serde(rename = "L")]
    Loss,
}

impl MatchResult {
    /// FACEIT result code: zero is a loss, anything else a win.
    pub fn from_code(code: i64) -> Self {
        if code == 0 {
            MatchResult::Loss
        } else {
            MatchResult::Win
        }
    }
}

impl std::fmt::Display for MatchResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MatchResult::Win => write!(f, "W"),
            MatchResult::Loss => write!(f, "L"),
        }
    }
}

/// Rounded averages over a window of recent matches.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregateStats {
    pub avg_kills: u32,
    pub avg_deaths: u32,
    pub avg_assists: u32,
    pub avg_mvps: u32,

    /// Mean per-match headshot ratio, 0-100
    pub headshot_percent: f64,

    pub avg_kd_ratio: f64,
    pub avg_kr_ratio: f64,

    /// Window size the caller asked for
    pub window_size: u32,

    /// Matches the upstream actually returned
    pub matches_counted: u32,
}

/// Statistics for exactly one match, no averaging.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SingleMatchStats {
    pub kills: u32,
    pub deaths: u32,
    pub assists: u32,
    pub mvps: u32,

    /// `None` when the player had no kills
    pub headshot_percent: Option<f64>,

    pub kd_ratio: f64,
    pub kr_ratio: f64,
    pub result: MatchResult,
    pub match_id: String,
}

impl From<MatchStats> for SingleMatchStats {
    fn from(m: MatchStats) -> Self {
        Self {
            kills: m.kills,
            deaths: m.deaths,
            assists: m.assists,
            mvps: m.mvps,
            headshot_percent: m
                .headshot_ratio()
                .map(|r| crate::calculate::round_to(r * 100.0, 2)),
            kd_ratio: m.kd_ratio,
            kr_ratio: m.kr_ratio,
            result: m.result,
            match_id: m.match_id,
        }
    }
}

/// Running win/loss counters for the full-history scan.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryTally {
    pub wins: u32,
    pub losses: u32,

    /// Percentage of wins, absent when nothing was played
    pub win_rate: Option<u32>,

    /// Matches where the player was on neither roster (counted in `losses`)
    #[serde(default, skip_serializing_if = "is_zero")]
    pub unrostered: u32,
}

fn is_zero(n: &u32) -> bool {
    *n == 0
}

impl HistoryTally {
    pub fn record(&mut self, classification: Classification) {
        match classification {
            Classification::Win => self.wins += 1,
            Classification::Loss => self.losses += 1,
            Classification::Unrostered => {
                self.losses += 1;
                self.unrostered += 1;
            }
        }
        self.win_rate = crate::calculate::win_rate(self.wins, self.losses);
    }

    pub fn games(&self) -> u32 {
        self.wins + self.losses
    }
}

/// Progress toward a monthly wins goal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GoalPace {
    pub goal: u32,
    pub wins: u32,
    /// Negative once the goal has been passed
    pub wins_remaining: i64,
    /// Days left in the month, today included
    pub days_remaining: u32,
    pub daily_pace_required: f64,
}

impl GoalPace {
    pub fn goal_reached(&self) -> bool {
        self.wins_remaining <= 0
    }
}
