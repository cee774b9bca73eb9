//! Ball-by-ball cricket scoring.
//!
//! A [`Match`] is advanced one [`ScoringEvent`] at a time through the pure
//! [`apply`] transition. Every event is checked against contracts before it
//! runs and against the match invariants after.

pub mod action;
pub mod contracts;
pub mod engine;
pub mod invariants;
pub mod outcome;
pub(crate) mod rules;
pub mod scorecard;
pub mod script;
pub mod setup;
pub mod types;

pub use action::{PlayerRole, ScoringError, ScoringEvent};
pub use contracts::{Contract, ScoringContract, assert_invariants};
pub use engine::{Replay, ReplayError, ScriptedEvent, apply, replay, replay_events};
pub use invariants::{Invariant, InvariantSet, InvariantViolation, MatchInvariants};
pub use outcome::MatchOutcome;
pub use rules::{InningsEnd, innings_end};
pub use scorecard::{ScoreLine, ScoreLineError, Scorecard, economy, overs_notation, strike_rate};
pub use script::{MatchScript, ScriptError, ScriptSetup};
pub use setup::{DEFAULT_OVERS, DEFAULT_PLAYER_COUNT, MatchDefaults, MatchSetup, SetupError, ValidationError};
pub use types::{
    BALLS_PER_OVER, BattingRecord, BowlingRecord, Delivery, DeliveryId, ExtraType, Inning,
    MAX_RUNS_PER_BALL, Match, MatchId, MatchStatus, MatchType, PlayerId, PlayerMatchStats,
    ScoringRules, TossDecision,
};
