//! Contract-based validation for scoring events.
//!
//! Contracts define correctness through preconditions and postconditions:
//! {P(match, event)} apply {Q(before, after)}.

use super::action::{ScoringError, ScoringEvent};
use super::invariants::{InvariantSet, MatchInvariants};
use super::rules;
use super::types::{MAX_RUNS_PER_BALL, Match};
use tracing::{instrument, warn};

// ─────────────────────────────────────────────────────────────
//  Contract Trait
// ─────────────────────────────────────────────────────────────

/// A contract defines preconditions and postconditions for state transitions.
pub trait Contract<S, A> {
    /// Checks preconditions before applying the action.
    fn pre(state: &S, action: &A) -> Result<(), ScoringError>;

    /// Checks postconditions after applying the action.
    fn post(before: &S, after: &S) -> Result<(), ScoringError>;
}

// ─────────────────────────────────────────────────────────────
//  Preconditions
// ─────────────────────────────────────────────────────────────

/// Precondition: the match has no result yet.
pub struct MatchInPlay;

impl MatchInPlay {
    #[instrument(skip(game))]
    pub fn check(game: &Match) -> Result<(), ScoringError> {
        if game.is_completed() {
            Err(ScoringError::MatchCompleted)
        } else {
            Ok(())
        }
    }
}

/// Precondition: striker, non-striker and bowler are all selected.
pub struct CreaseOccupied;

impl CreaseOccupied {
    #[instrument(skip(game))]
    pub fn check(game: &Match) -> Result<(), ScoringError> {
        rules::crease(game).map(|_| ())
    }
}

/// Precondition: the runs on a delivery are within the per-ball limit.
pub struct RunsInRange;

impl RunsInRange {
    #[instrument]
    pub fn check(runs: u32) -> Result<(), ScoringError> {
        if runs > MAX_RUNS_PER_BALL {
            Err(ScoringError::TooManyRuns(runs))
        } else {
            Ok(())
        }
    }
}

/// Composite precondition for any scoring event.
pub struct LegalEvent;

impl LegalEvent {
    /// Validates all preconditions for an event.
    #[instrument(skip(game))]
    pub fn check(event: &ScoringEvent, game: &Match) -> Result<(), ScoringError> {
        MatchInPlay::check(game)?;
        match event {
            ScoringEvent::Delivery { runs, .. } => {
                RunsInRange::check(*runs)?;
                CreaseOccupied::check(game)
            }
            ScoringEvent::Wicket { .. } => CreaseOccupied::check(game),
            ScoringEvent::Select { player, role } => rules::check_selection(game, player, *role),
        }
    }
}

// ─────────────────────────────────────────────────────────────
//  Scoring Contract (Pre + Post)
// ─────────────────────────────────────────────────────────────

/// Contract for scoring events.
///
/// Postconditions:
/// - every match invariant holds
/// - status and inning index never move backwards
/// - the delivery logs only grow, and logged balls are never rewritten
pub struct ScoringContract;

impl Contract<Match, ScoringEvent> for ScoringContract {
    fn pre(game: &Match, event: &ScoringEvent) -> Result<(), ScoringError> {
        LegalEvent::check(event, game)
    }

    fn post(before: &Match, after: &Match) -> Result<(), ScoringError> {
        MatchInvariants::check_all(after).map_err(|violations| {
            let descriptions = violations
                .iter()
                .map(|v| v.description.as_str())
                .collect::<Vec<_>>()
                .join("; ");
            ScoringError::InvariantViolation(format!("Postcondition failed: {}", descriptions))
        })?;

        if !progresses(before, after) {
            warn!(match_id = %after.id(), "Match state moved backwards");
            return Err(ScoringError::InvariantViolation(
                "Postcondition failed: match state moved backwards".to_string(),
            ));
        }
        Ok(())
    }
}

fn progresses(before: &Match, after: &Match) -> bool {
    let forward = after.status().lifecycle_rank() >= before.status().lifecycle_rank()
        && after.current_inning() >= before.current_inning();
    let append_only = before
        .innings()
        .iter()
        .zip(after.innings())
        .all(|(b, a)| a.deliveries().starts_with(b.deliveries()));
    forward && append_only
}

/// Asserts that all match invariants hold (panics on violation in debug builds).
#[instrument(skip(game))]
pub fn assert_invariants(game: &Match) {
    debug_assert!(
        MatchInvariants::check_all(game).is_ok(),
        "Match invariants violated"
    );
}
