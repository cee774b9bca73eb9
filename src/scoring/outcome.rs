//! Result of a completed match.

use serde::{Deserialize, Serialize};

/// How a completed match was decided.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MatchOutcome {
    /// The chasing side passed the target.
    WonByWickets {
        /// Winning side.
        team: String,
        /// Wickets in hand.
        wickets: u32,
    },
    /// The side batting first defended its total.
    WonByRuns {
        /// Winning side.
        team: String,
        /// Margin in runs.
        runs: u32,
    },
    /// Scores finished level.
    Tied,
}

impl MatchOutcome {
    /// Returns the winning side if there is one.
    pub fn winner(&self) -> Option<&str> {
        match self {
            Self::WonByWickets { team, .. } | Self::WonByRuns { team, .. } => Some(team),
            Self::Tied => None,
        }
    }

    /// Returns true if the match was tied.
    pub fn is_tie(&self) -> bool {
        matches!(self, Self::Tied)
    }
}

impl std::fmt::Display for MatchOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::WonByWickets { team, wickets } => write!(f, "{} won by {} wickets", team, wickets),
            Self::WonByRuns { team, runs } => write!(f, "{} won by {} runs", team, runs),
            Self::Tied => write!(f, "Match Tied"),
        }
    }
}
