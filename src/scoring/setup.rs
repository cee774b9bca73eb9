//! Match setup: validation and the initial match state.

use super::types::{
    Inning, Match, MatchId, MatchStatus, MatchType, PlayerId, PlayerMatchStats, ScoringRules,
    TossDecision,
};
use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use tracing::{debug, info, instrument};

/// Default overs per inning.
pub const DEFAULT_OVERS: u32 = 20;

/// Default players per side.
pub const DEFAULT_PLAYER_COUNT: u32 = 11;

fn default_overs() -> u32 {
    DEFAULT_OVERS
}

fn default_player_count() -> u32 {
    DEFAULT_PLAYER_COUNT
}

/// Defaults applied to setups that leave a value out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchDefaults {
    /// Overs per inning.
    pub overs: u32,
    /// Players per side.
    pub player_count: u32,
    /// Rule toggles.
    pub rules: ScoringRules,
}

impl Default for MatchDefaults {
    fn default() -> Self {
        Self {
            overs: DEFAULT_OVERS,
            player_count: DEFAULT_PLAYER_COUNT,
            rules: ScoringRules::default(),
        }
    }
}

/// Everything needed to start a local match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchSetup {
    /// First named team.
    pub team_a: String,
    /// Second named team.
    pub team_b: String,
    /// Overs per inning.
    #[serde(default = "default_overs")]
    pub overs: u32,
    /// Players per side.
    #[serde(default = "default_player_count")]
    pub player_count: u32,
    /// Ground name.
    #[serde(default)]
    pub venue: String,
    /// Known names for team A, in batting order. Padded or truncated to `player_count`.
    #[serde(default)]
    pub squad_a: Vec<String>,
    /// Known names for team B, in batting order. Padded or truncated to `player_count`.
    #[serde(default)]
    pub squad_b: Vec<String>,
    /// Side that won the toss.
    #[serde(default)]
    pub toss_winner: Option<String>,
    /// What the toss winner chose.
    #[serde(default)]
    pub toss_decision: TossDecision,
    /// Rule toggles.
    #[serde(default)]
    pub rules: ScoringRules,
    /// Match date; today when absent.
    #[serde(default)]
    pub date: Option<NaiveDate>,
}

/// A single problem with a [`MatchSetup`].
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display)]
pub enum ValidationError {
    /// A team has no name.
    #[display("Team {} needs a name", _0)]
    MissingTeamName(char),

    /// Both teams have the same name.
    #[display("Teams must have different names")]
    DuplicateTeamNames,

    /// Overs must be at least one.
    #[display("Overs must be a positive number")]
    InvalidOvers,

    /// A side needs at least two players.
    #[display("Player count must be at least 2, got {}", _0)]
    TooFewPlayers(u32),

    /// The venue is blank.
    #[display("Venue is required")]
    MissingVenue,

    /// No toss winner was chosen.
    #[display("Toss winner is required")]
    MissingTossWinner,

    /// The toss winner is neither team.
    #[display("Toss winner '{}' is not one of the two teams", _0)]
    UnknownTossWinner(String),

    /// Two players on one side share a name, so scripts cannot tell them apart.
    #[display("{} has more than one player named '{}'", team, name)]
    DuplicatePlayerName {
        /// Side with the clash.
        team: String,
        /// The repeated name.
        name: String,
    },
}

impl std::error::Error for ValidationError {}

/// Every problem found while validating a setup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetupError {
    /// Problems in the order they were found.
    pub problems: Vec<ValidationError>,
}

impl std::fmt::Display for SetupError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let problems = self
            .problems
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("; ");
        write!(f, "Invalid match setup: {}", problems)
    }
}

impl std::error::Error for SetupError {}

impl MatchSetup {
    /// Creates a setup with default overs and squad size, team A winning the
    /// toss and choosing to bat.
    #[instrument]
    pub fn new(team_a: &str, team_b: &str, venue: &str) -> Self {
        Self {
            team_a: team_a.to_string(),
            team_b: team_b.to_string(),
            overs: DEFAULT_OVERS,
            player_count: DEFAULT_PLAYER_COUNT,
            venue: venue.to_string(),
            squad_a: Vec::new(),
            squad_b: Vec::new(),
            toss_winner: Some(team_a.to_string()),
            toss_decision: TossDecision::Bat,
            rules: ScoringRules::default(),
            date: None,
        }
    }

    /// Sets overs per inning.
    pub fn with_overs(mut self, overs: u32) -> Self {
        self.overs = overs;
        self
    }

    /// Sets players per side.
    pub fn with_player_count(mut self, player_count: u32) -> Self {
        self.player_count = player_count;
        self
    }

    /// Sets the known squad names.
    pub fn with_squads(mut self, squad_a: Vec<String>, squad_b: Vec<String>) -> Self {
        self.squad_a = squad_a;
        self.squad_b = squad_b;
        self
    }

    /// Sets the toss result.
    pub fn with_toss(mut self, winner: &str, decision: TossDecision) -> Self {
        self.toss_winner = Some(winner.to_string());
        self.toss_decision = decision;
        self
    }

    /// Sets the rule toggles.
    pub fn with_rules(mut self, rules: ScoringRules) -> Self {
        self.rules = rules;
        self
    }

    /// Sets the match date.
    pub fn with_date(mut self, date: NaiveDate) -> Self {
        self.date = Some(date);
        self
    }

    /// Returns every problem with this setup.
    #[instrument(skip(self))]
    pub fn validate(&self) -> Result<(), SetupError> {
        let mut problems = Vec::new();
        let team_a = self.team_a.trim();
        let team_b = self.team_b.trim();

        if team_a.is_empty() {
            problems.push(ValidationError::MissingTeamName('A'));
        }
        if team_b.is_empty() {
            problems.push(ValidationError::MissingTeamName('B'));
        }
        if !team_a.is_empty() && team_a == team_b {
            problems.push(ValidationError::DuplicateTeamNames);
        }
        if self.overs == 0 {
            problems.push(ValidationError::InvalidOvers);
        }
        if self.player_count < 2 {
            problems.push(ValidationError::TooFewPlayers(self.player_count));
        }
        if self.venue.trim().is_empty() {
            problems.push(ValidationError::MissingVenue);
        }
        match self.toss_winner.as_deref().map(str::trim) {
            None | Some("") => problems.push(ValidationError::MissingTossWinner),
            Some(winner) if winner != team_a && winner != team_b => {
                problems.push(ValidationError::UnknownTossWinner(winner.to_string()));
            }
            Some(_) => {}
        }
        if self.player_count >= 2 {
            for (team, names) in [(team_a, &self.squad_a), (team_b, &self.squad_b)] {
                if let Some(name) = repeated_name(&padded_squad(team, names, self.player_count)) {
                    problems.push(ValidationError::DuplicatePlayerName {
                        team: team.to_string(),
                        name,
                    });
                }
            }
        }

        if problems.is_empty() {
            Ok(())
        } else {
            debug!(count = problems.len(), "Setup rejected");
            Err(SetupError { problems })
        }
    }

    /// Returns `(batting_first, batting_second)` as decided by the toss.
    pub fn batting_order(&self) -> Option<(&str, &str)> {
        let winner = self.toss_winner.as_deref()?.trim();
        let team_a = self.team_a.trim();
        let team_b = self.team_b.trim();
        let loser = if winner == team_a { team_b } else { team_a };
        Some(match self.toss_decision {
            TossDecision::Bat => (winner, loser),
            TossDecision::Bowl => (loser, winner),
        })
    }

    /// Validates the setup and builds a live match ready for the first ball.
    #[instrument(skip(self), fields(team_a = %self.team_a, team_b = %self.team_b))]
    pub fn create_match(&self) -> Result<Match, SetupError> {
        self.validate()?;
        let (first, second) = self.batting_order().ok_or_else(|| SetupError {
            problems: vec![ValidationError::MissingTossWinner],
        })?;

        let team_a = self.team_a.trim();
        let squad_for = |team: &str| {
            if team == team_a {
                padded_squad(team, &self.squad_a, self.player_count)
            } else {
                padded_squad(team, &self.squad_b, self.player_count)
            }
        };
        let innings = [
            Inning::new(first, squad_stats(&squad_for(first))),
            Inning::new(second, squad_stats(&squad_for(second))),
        ];

        let game = Match {
            id: MatchId::generate(),
            match_type: MatchType::Local,
            title: format!("{} vs {}", team_a, self.team_b.trim()),
            team_a: team_a.to_string(),
            team_b: self.team_b.trim().to_string(),
            overs: self.overs,
            player_count: self.player_count,
            venue: self.venue.trim().to_string(),
            date: self.date.unwrap_or_else(|| Utc::now().date_naive()),
            status: MatchStatus::Live,
            status_text: "Match Started".to_string(),
            result: None,
            outcome: None,
            toss_winner: self.toss_winner.as_deref().unwrap_or_default().trim().to_string(),
            toss_decision: self.toss_decision,
            rules: self.rules,
            innings,
            current_inning: 0,
        };
        info!(match_id = %game.id, batting_first = first, "Match created");
        Ok(game)
    }
}

/// Keeps the non-blank names given, then pads with `"<Team> Player <n>"`.
pub fn padded_squad(team: &str, names: &[String], player_count: u32) -> Vec<String> {
    let mut squad: Vec<String> = names
        .iter()
        .map(|n| n.trim())
        .filter(|n| !n.is_empty())
        .take(player_count as usize)
        .map(str::to_string)
        .collect();
    while squad.len() < player_count as usize {
        squad.push(format!("{} Player {}", team, squad.len() + 1));
    }
    squad
}

fn repeated_name(squad: &[String]) -> Option<String> {
    let mut seen = BTreeSet::new();
    squad.iter().find(|name| !seen.insert(name.as_str())).cloned()
}

fn squad_stats(names: &[String]) -> BTreeMap<PlayerId, PlayerMatchStats> {
    names
        .iter()
        .enumerate()
        .map(|(index, name)| {
            let id = PlayerId::generate(index);
            (id.clone(), PlayerMatchStats::new(id, name, index as u32))
        })
        .collect()
}
