//! The scoring engine: pure transitions and replay.
//!
//! `apply` never mutates its input. It validates the event, runs the rule on
//! a private copy and, in debug builds, checks the postconditions before
//! handing the new match back.

use super::action::{PlayerRole, ScoringError, ScoringEvent};
use super::contracts::{Contract, ScoringContract};
use super::rules;
use super::setup::{MatchSetup, SetupError};
use super::types::{ExtraType, Match, PlayerId};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

/// Applies one event, returning the next match state.
#[instrument(skip(game), fields(match_id = %game.id(), event = %event))]
pub fn apply(game: &Match, event: &ScoringEvent) -> Result<Match, ScoringError> {
    ScoringContract::pre(game, event)?;

    let mut next = game.clone();
    match event {
        ScoringEvent::Delivery { runs, extra } => rules::record_delivery(&mut next, *runs, *extra)?,
        ScoringEvent::Wicket { dismissal } => rules::record_wicket(&mut next, dismissal.clone())?,
        ScoringEvent::Select { player, role } => rules::select_player(&mut next, player, *role)?,
    }

    #[cfg(debug_assertions)]
    ScoringContract::post(game, &next)?;

    Ok(next)
}

/// Re-applies a resolved event log to a starting match.
#[instrument(skip(initial, events), fields(match_id = %initial.id(), count = events.len()))]
pub fn replay_events(initial: &Match, events: &[ScoringEvent]) -> Result<Match, ScoringError> {
    events
        .iter()
        .try_fold(initial.clone(), |game, event| apply(&game, event))
}

impl Match {
    /// Applies one event. See [`apply`].
    pub fn apply(&self, event: &ScoringEvent) -> Result<Match, ScoringError> {
        apply(self, event)
    }

    /// Records a ball that was not a wicket.
    pub fn record_delivery(&self, runs: u32, extra: ExtraType) -> Result<Match, ScoringError> {
        apply(self, &ScoringEvent::Delivery { runs, extra })
    }

    /// Records the dismissal of the striker.
    pub fn record_wicket(&self, dismissal: Option<String>) -> Result<Match, ScoringError> {
        apply(self, &ScoringEvent::Wicket { dismissal })
    }

    /// Puts a player into a role.
    pub fn select_player(&self, player: &PlayerId, role: PlayerRole) -> Result<Match, ScoringError> {
        apply(self, &ScoringEvent::select(player.clone(), role))
    }
}

// ─────────────────────────────────────────────────────────────
//  Scripted replay
// ─────────────────────────────────────────────────────────────

/// An event that names players instead of referring to generated ids.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ScriptedEvent {
    /// A ball that was not a wicket.
    Delivery {
        /// Runs taken off the ball.
        #[serde(default)]
        runs: u32,
        /// Extra attached to the ball.
        #[serde(default)]
        extra: ExtraType,
    },
    /// The striker is dismissed.
    Wicket {
        /// Free-form dismissal description.
        #[serde(default)]
        dismissal: Option<String>,
    },
    /// A named player is put into a role.
    Select {
        /// Player name as it appears in the squad.
        player: String,
        /// Slot the player fills.
        role: PlayerRole,
    },
}

impl ScriptedEvent {
    /// Resolves player names against the match as it stands.
    pub fn resolve(&self, game: &Match) -> Result<ScoringEvent, ScoringError> {
        Ok(match self {
            Self::Delivery { runs, extra } => ScoringEvent::Delivery {
                runs: *runs,
                extra: *extra,
            },
            Self::Wicket { dismissal } => ScoringEvent::Wicket {
                dismissal: dismissal.clone(),
            },
            Self::Select { player, role } => {
                let id = game
                    .player_by_name(player, *role)
                    .ok_or_else(|| ScoringError::UnknownPlayer(player.clone(), *role))?;
                ScoringEvent::select(id.clone(), *role)
            }
        })
    }
}

/// Error raised while replaying a script.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display)]
pub enum ReplayError {
    /// The setup was rejected.
    #[display("{}", _0)]
    Setup(SetupError),

    /// An event was rejected.
    #[display("Event {} rejected: {}", index, source)]
    Event {
        /// Zero-based position in the script.
        index: usize,
        /// Why it was rejected.
        source: ScoringError,
    },
}

impl std::error::Error for ReplayError {}

/// A replayed script: the starting match, the resolved events and the result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Replay {
    /// The match as created from the setup.
    pub initial: Match,
    /// Events with names resolved to ids.
    pub events: Vec<ScoringEvent>,
    /// The match after the last event.
    pub current: Match,
}

/// Builds a match from `setup` and plays `script` against it.
#[instrument(skip(setup, script), fields(count = script.len()))]
pub fn replay(setup: &MatchSetup, script: &[ScriptedEvent]) -> Result<Replay, ReplayError> {
    let initial = setup.create_match().map_err(ReplayError::Setup)?;
    let mut current = initial.clone();
    let mut events = Vec::with_capacity(script.len());

    for (index, scripted) in script.iter().enumerate() {
        let event = scripted
            .resolve(&current)
            .map_err(|source| ReplayError::Event { index, source })?;
        current = apply(&current, &event).map_err(|source| ReplayError::Event { index, source })?;
        events.push(event);
    }

    debug!(status = %current.status(), "Script replayed");
    Ok(Replay {
        initial,
        events,
        current,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::MatchStatus;

    fn select(name: &str, role: PlayerRole) -> ScriptedEvent {
        ScriptedEvent::Select {
            player: name.to_string(),
            role,
        }
    }

    fn runs(runs: u32) -> ScriptedEvent {
        ScriptedEvent::Delivery {
            runs,
            extra: ExtraType::None,
        }
    }

    #[test]
    fn test_apply_leaves_input_untouched() {
        let game = MatchSetup::new("Tech Titans", "Code Warriors", "Oval")
            .create_match()
            .unwrap();
        let before = game.clone();
        assert!(apply(&game, &ScoringEvent::runs(4)).is_err());
        assert_eq!(game, before);
    }

    #[test]
    fn test_replay_resolves_names() {
        let setup = MatchSetup::new("Tech Titans", "Code Warriors", "Oval").with_squads(
            vec!["Ava".into(), "Bo".into()],
            vec!["Cy".into()],
        );
        let script = vec![
            select("Ava", PlayerRole::Striker),
            select("Bo", PlayerRole::NonStriker),
            select("Cy", PlayerRole::Bowler),
            runs(2),
        ];

        let replay = replay(&setup, &script).unwrap();
        assert_eq!(replay.events.len(), 4);
        assert_eq!(replay.current.live_inning().total_runs(), 2);
        assert_eq!(replay.current.status(), MatchStatus::Live);

        let rebuilt = replay_events(&replay.initial, &replay.events).unwrap();
        assert!(rebuilt.same_state(&replay.current));
    }

    #[test]
    fn test_replay_reports_failing_event() {
        let setup = MatchSetup::new("Tech Titans", "Code Warriors", "Oval");
        let script = vec![select("Tech Titans Player 1", PlayerRole::Striker), runs(1)];

        let err = replay(&setup, &script).unwrap_err();
        assert_eq!(
            err,
            ReplayError::Event {
                index: 1,
                source: ScoringError::MissingPlayerSelection(PlayerRole::NonStriker),
            }
        );
    }

    #[test]
    fn test_replay_rejects_unknown_name() {
        let setup = MatchSetup::new("Tech Titans", "Code Warriors", "Oval");
        let script = vec![select("Nobody", PlayerRole::Bowler)];
        assert!(matches!(
            replay(&setup, &script),
            Err(ReplayError::Event {
                index: 0,
                source: ScoringError::UnknownPlayer(_, PlayerRole::Bowler)
            })
        ));
    }
}
