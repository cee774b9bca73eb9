//! Scoring scripts: a match setup plus the events to play, read from TOML.
//!
//! ```toml
//! [setup]
//! team_a = "Tech Titans"
//! team_b = "Code Warriors"
//! venue = "Silicon Valley Oval"
//! overs = 2
//!
//! [[events]]
//! type = "select"
//! player = "Tech Titans Player 1"
//! role = "striker"
//!
//! [[events]]
//! type = "delivery"
//! runs = 4
//! ```

use super::engine::{Replay, ReplayError, ScriptedEvent, replay};
use super::setup::{MatchDefaults, MatchSetup};
use super::types::{ScoringRules, TossDecision};
use chrono::NaiveDate;
use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info, instrument};

/// Setup section of a script. Absent values come from [`MatchDefaults`].
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ScriptSetup {
    /// First named team.
    pub team_a: String,
    /// Second named team.
    pub team_b: String,
    /// Ground name.
    pub venue: String,
    /// Overs per inning.
    pub overs: Option<u32>,
    /// Players per side.
    pub player_count: Option<u32>,
    /// Known names for team A.
    pub squad_a: Vec<String>,
    /// Known names for team B.
    pub squad_b: Vec<String>,
    /// Side that won the toss; team A when absent.
    pub toss_winner: Option<String>,
    /// What the toss winner chose.
    pub toss_decision: TossDecision,
    /// Rule toggles.
    pub rules: Option<ScoringRules>,
    /// Match date.
    pub date: Option<NaiveDate>,
}

impl ScriptSetup {
    /// Fills the gaps from `defaults`.
    pub fn resolve(&self, defaults: &MatchDefaults) -> MatchSetup {
        MatchSetup {
            team_a: self.team_a.clone(),
            team_b: self.team_b.clone(),
            overs: self.overs.unwrap_or(defaults.overs),
            player_count: self.player_count.unwrap_or(defaults.player_count),
            venue: self.venue.clone(),
            squad_a: self.squad_a.clone(),
            squad_b: self.squad_b.clone(),
            toss_winner: self
                .toss_winner
                .clone()
                .or_else(|| Some(self.team_a.clone())),
            toss_decision: self.toss_decision,
            rules: self.rules.unwrap_or(defaults.rules),
            date: self.date,
        }
    }
}

/// A match setup and the events to score against it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchScript {
    /// How the match starts.
    pub setup: ScriptSetup,
    /// Events in the order they happened.
    #[serde(default)]
    pub events: Vec<ScriptedEvent>,
}

impl MatchScript {
    /// Parses a script from TOML text.
    #[instrument(skip(content))]
    pub fn from_toml_str(content: &str) -> Result<Self, ScriptError> {
        let script: Self = toml::from_str(content)
            .map_err(|e| ScriptError::new(format!("Failed to parse script: {}", e)))?;
        debug!(events = script.events.len(), "Script parsed");
        Ok(script)
    }

    /// Loads a script from a TOML file.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ScriptError> {
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ScriptError::new(format!("Failed to read script file: {}", e)))?;
        let script = Self::from_toml_str(&content)?;
        info!(
            team_a = %script.setup.team_a,
            team_b = %script.setup.team_b,
            "Script loaded"
        );
        Ok(script)
    }

    /// Creates the match and plays every event.
    #[instrument(skip(self, defaults))]
    pub fn play(&self, defaults: &MatchDefaults) -> Result<Replay, ReplayError> {
        replay(&self.setup.resolve(defaults), &self.events)
    }
}

/// Script loading error.
#[derive(Debug, Clone, Display, Error)]
#[display("Script error: {} at {}:{}", message, file, line)]
pub struct ScriptError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl ScriptError {
    /// Creates a new script error.
    #[track_caller]
    pub fn new(message: String) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message,
            line: loc.line(),
            file: loc.file(),
        }
    }
}
