//! First-class scoring events.
//!
//! Every ball and every selection is a domain event. Events carry the
//! scorer's intent and are validated against the match before they are
//! applied, so they can be logged and replayed.

use super::types::{ExtraType, MAX_RUNS_PER_BALL, PlayerId};
use serde::{Deserialize, Serialize};
use tracing::instrument;

/// The slot a selected player fills.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum PlayerRole {
    /// Batter facing the bowling.
    Striker,
    /// Batter at the bowler's end.
    NonStriker,
    /// Bowler of the current over.
    Bowler,
}

/// A single scoring input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ScoringEvent {
    /// A ball that was not a wicket.
    Delivery {
        /// Runs taken off the ball (excluding the wide/no-ball penalty).
        runs: u32,
        /// Extra attached to the ball.
        #[serde(default)]
        extra: ExtraType,
    },
    /// The striker is dismissed on a legal ball.
    Wicket {
        /// Free-form dismissal description ("caught", "bowled", ...).
        #[serde(default)]
        dismissal: Option<String>,
    },
    /// A player is put into a role.
    Select {
        /// Player being selected.
        player: PlayerId,
        /// Slot the player fills.
        role: PlayerRole,
    },
}

impl ScoringEvent {
    /// A fair delivery off which `runs` were scored.
    #[instrument]
    pub fn runs(runs: u32) -> Self {
        Self::Delivery {
            runs,
            extra: ExtraType::None,
        }
    }

    /// A delivery carrying an extra.
    #[instrument]
    pub fn extra(runs: u32, extra: ExtraType) -> Self {
        Self::Delivery { runs, extra }
    }

    /// A wicket with no dismissal description.
    pub fn wicket() -> Self {
        Self::Wicket { dismissal: None }
    }

    /// A wicket with a dismissal description.
    pub fn dismissal(how: impl Into<String>) -> Self {
        Self::Wicket {
            dismissal: Some(how.into()),
        }
    }

    /// A player selection.
    pub fn select(player: PlayerId, role: PlayerRole) -> Self {
        Self::Select { player, role }
    }

    /// Whether the event puts a ball in the log.
    pub fn is_ball(&self) -> bool {
        !matches!(self, Self::Select { .. })
    }
}

impl std::fmt::Display for ScoringEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Delivery {
                runs,
                extra: ExtraType::None,
            } => write!(f, "{} run(s)", runs),
            Self::Delivery { runs, extra } => write!(f, "{} run(s) + {}", runs, extra),
            Self::Wicket { dismissal: None } => write!(f, "wicket"),
            Self::Wicket {
                dismissal: Some(how),
            } => write!(f, "wicket ({})", how),
            Self::Select { player, role } => write!(f, "{} -> {}", player, role),
        }
    }
}

/// Error that can occur when validating or applying a scoring event.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display)]
pub enum ScoringError {
    /// The match already has a result.
    #[display("Match is already completed")]
    MatchCompleted,

    /// A role that must be filled before scoring is empty.
    #[display("No {} selected", _0)]
    MissingPlayerSelection(PlayerRole),

    /// The player is not in the squad eligible for the role.
    #[display("Player {} is not eligible as {}", _0, _1)]
    UnknownPlayer(String, PlayerRole),

    /// The batter has already been dismissed.
    #[display("Player {} is already out", _0)]
    PlayerOut(PlayerId),

    /// The player already occupies the other batting slot.
    #[display("Player {} is already batting at the other end", _0)]
    DuplicateBatter(PlayerId),

    /// The bowler completed the previous over.
    #[display("Player {} bowled the previous over", _0)]
    ConsecutiveOver(PlayerId),

    /// More runs than can be taken off one ball.
    #[display("{} runs off one ball exceeds the limit of {}", _0, MAX_RUNS_PER_BALL)]
    TooManyRuns(u32),

    /// An invariant was violated (postcondition failure).
    #[display("Invariant violation: {}", _0)]
    InvariantViolation(String),
}

impl std::error::Error for ScoringError {}
