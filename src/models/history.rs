//! Match history summaries and player profiles.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// One entry on a team roster.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RosterEntry {
    pub player_id: String,

    #[serde(default)]
    pub nickname: String,
}

/// One side of a match.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Team {
    #[serde(default)]
    pub players: Vec<RosterEntry>,
}

impl Team {
    pub fn contains(&self, player_id: &str) -> bool {
        self.players.iter().any(|p| p.player_id == player_id)
    }
}

/// Final outcome block of a history entry.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MatchOutcome {
    /// Faction key of the winning side, e.g. `faction1`
    #[serde(default)]
    pub winner: String,
}

/// How a history entry counts for the tracked player.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    Win,
    Loss,
    /// The player is on neither roster. Tallied as a loss.
    Unrostered,
}

/// A match from the player's history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchSummary {
    pub match_id: String,

    #[serde(default)]
    pub results: MatchOutcome,

    /// Rosters keyed by faction
    #[serde(default)]
    pub teams: HashMap<String, Team>,
}

impl MatchSummary {
    /// Roster of the winning side, if the winner names a known faction.
    pub fn winning_team(&self) -> Option<&Team> {
        self.teams.get(&self.results.winner)
    }

    /// Classify this match from `player_id`'s point of view.
    pub fn classify(&self, player_id: &str) -> Classification {
        if self.winning_team().is_some_and(|t| t.contains(player_id)) {
            return Classification::Win;
        }
        if self.teams.values().any(|t| t.contains(player_id)) {
            Classification::Loss
        } else {
            Classification::Unrostered
        }
    }
}

/// Per-game section of a player profile.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GameProfile {
    #[serde(default)]
    pub faceit_elo: Option<u32>,

    #[serde(default)]
    pub skill_level: Option<u32>,
}

/// A FACEIT player as returned by the nickname lookup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerProfile {
    pub player_id: String,

    #[serde(default)]
    pub nickname: String,

    #[serde(default)]
    pub games: HashMap<String, GameProfile>,
}

impl PlayerProfile {
    pub fn elo(&self, game: &str) -> Option<u32> {
        self.games.get(game).and_then(|g| g.faceit_elo)
    }
}
