//! Scoring rules.
//!
//! Each rule is a function over `&mut Match` that assumes the event has
//! passed its preconditions. The engine runs them on a private copy, so a
//! rule that bails out part way never leaks a half-applied state.

pub mod completion;
pub mod delivery;
pub mod over;
pub mod selection;
pub mod wicket;

pub use completion::{InningsEnd, check_completion, innings_end};
pub use delivery::record_delivery;
pub use over::advance_ball;
pub use selection::{check_selection, select_player};
pub use wicket::record_wicket;

use super::action::{PlayerRole, ScoringError};
use super::types::{Inning, Match, PlayerId, PlayerMatchStats};

/// The three players every ball needs: striker, non-striker and bowler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Crease {
    /// Batter on strike.
    pub striker: PlayerId,
    /// Batter at the other end.
    pub non_striker: PlayerId,
    /// Bowler of the over.
    pub bowler: PlayerId,
}

/// Reads the occupied crease of the live inning.
pub fn crease(game: &Match) -> Result<Crease, ScoringError> {
    if game.is_completed() {
        return Err(ScoringError::MatchCompleted);
    }
    let inning = game.live_inning();
    let striker = inning
        .striker()
        .ok_or(ScoringError::MissingPlayerSelection(PlayerRole::Striker))?;
    let non_striker = inning
        .non_striker()
        .ok_or(ScoringError::MissingPlayerSelection(PlayerRole::NonStriker))?;
    let bowler = inning
        .current_bowler()
        .ok_or(ScoringError::MissingPlayerSelection(PlayerRole::Bowler))?;
    Ok(Crease {
        striker: striker.clone(),
        non_striker: non_striker.clone(),
        bowler: bowler.clone(),
    })
}

pub(crate) fn stats_mut<'a>(
    inning: &'a mut Inning,
    player: &PlayerId,
    role: PlayerRole,
) -> Result<&'a mut PlayerMatchStats, ScoringError> {
    inning
        .player_stats
        .get_mut(player)
        .ok_or_else(|| ScoringError::UnknownPlayer(player.to_string(), role))
}
