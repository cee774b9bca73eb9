//! Player-role selection.

use super::stats_mut;
use crate::scoring::action::{PlayerRole, ScoringError};
use crate::scoring::types::{Match, PlayerId};
use tracing::{debug, instrument};

/// Checks that `player` may take `role` in the live inning.
///
/// Batters must belong to the batting side, must not be out and must not
/// already hold the other batting slot. Bowlers must belong to the fielding
/// side and, when consecutive overs are forbidden, must not have bowled the
/// previous over.
#[instrument(skip(game), fields(match_id = %game.id))]
pub fn check_selection(game: &Match, player: &PlayerId, role: PlayerRole) -> Result<(), ScoringError> {
    if game.is_completed() {
        return Err(ScoringError::MatchCompleted);
    }
    let inning = game.live_inning();

    match role {
        PlayerRole::Striker | PlayerRole::NonStriker => {
            let stats = inning
                .player(player)
                .ok_or_else(|| ScoringError::UnknownPlayer(player.to_string(), role))?;
            if stats.is_out() {
                return Err(ScoringError::PlayerOut(player.clone()));
            }
            let other_end = if role == PlayerRole::Striker {
                inning.non_striker()
            } else {
                inning.striker()
            };
            if other_end == Some(player) {
                return Err(ScoringError::DuplicateBatter(player.clone()));
            }
        }
        PlayerRole::Bowler => {
            if game.bowling_inning().player(player).is_none() {
                return Err(ScoringError::UnknownPlayer(player.to_string(), role));
            }
            if game.rules().forbid_consecutive_overs && inning.last_over_bowler() == Some(player) {
                return Err(ScoringError::ConsecutiveOver(player.clone()));
            }
        }
    }
    Ok(())
}

/// Puts `player` into `role`, replacing whoever held it.
///
/// The player's batting or bowling record is opened on first selection.
#[instrument(skip(game), fields(match_id = %game.id))]
pub fn select_player(game: &mut Match, player: &PlayerId, role: PlayerRole) -> Result<(), ScoringError> {
    check_selection(game, player, role)?;
    let (batting, bowling) = game.innings_mut();

    match role {
        PlayerRole::Striker => {
            stats_mut(batting, player, role)?.batting_mut();
            batting.striker = Some(player.clone());
        }
        PlayerRole::NonStriker => {
            stats_mut(batting, player, role)?.batting_mut();
            batting.non_striker = Some(player.clone());
        }
        PlayerRole::Bowler => {
            stats_mut(bowling, player, role)?.bowling_mut();
            batting.current_bowler = Some(player.clone());
        }
    }
    debug!(%player, %role, "Player selected");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::setup::MatchSetup;

    fn squads(game: &Match) -> (Vec<PlayerId>, Vec<PlayerId>) {
        let batters = game.live_inning().squad().iter().map(|p| p.id().clone()).collect();
        let bowlers = game.bowling_inning().squad().iter().map(|p| p.id().clone()).collect();
        (batters, bowlers)
    }

    fn fresh() -> Match {
        MatchSetup::new("Tech Titans", "Code Warriors", "Silicon Valley Oval")
            .create_match()
            .unwrap()
    }

    #[test]
    fn test_selection_opens_records() {
        let mut game = fresh();
        let (batters, bowlers) = squads(&game);
        select_player(&mut game, &batters[0], PlayerRole::Striker).unwrap();
        select_player(&mut game, &bowlers[0], PlayerRole::Bowler).unwrap();

        assert!(game.live_inning().player(&batters[0]).unwrap().batting().is_some());
        assert!(game.bowling_inning().player(&bowlers[0]).unwrap().bowling().is_some());
        assert_eq!(game.live_inning().current_bowler(), Some(&bowlers[0]));
    }

    #[test]
    fn test_bowler_must_field() {
        let game = fresh();
        let (batters, _) = squads(&game);
        assert!(matches!(
            check_selection(&game, &batters[0], PlayerRole::Bowler),
            Err(ScoringError::UnknownPlayer(_, PlayerRole::Bowler))
        ));
    }

    #[test]
    fn test_batter_must_bat() {
        let game = fresh();
        let (_, bowlers) = squads(&game);
        assert!(matches!(
            check_selection(&game, &bowlers[0], PlayerRole::Striker),
            Err(ScoringError::UnknownPlayer(_, PlayerRole::Striker))
        ));
    }

    #[test]
    fn test_same_batter_at_both_ends_rejected() {
        let mut game = fresh();
        let (batters, _) = squads(&game);
        select_player(&mut game, &batters[0], PlayerRole::Striker).unwrap();
        assert_eq!(
            check_selection(&game, &batters[0], PlayerRole::NonStriker),
            Err(ScoringError::DuplicateBatter(batters[0].clone()))
        );
    }

    #[test]
    fn test_dismissed_batter_rejected() {
        let mut game = fresh();
        let (batters, _) = squads(&game);
        game.innings[0]
            .player_stats
            .get_mut(&batters[2])
            .unwrap()
            .batting_mut()
            .out = true;
        assert_eq!(
            check_selection(&game, &batters[2], PlayerRole::Striker),
            Err(ScoringError::PlayerOut(batters[2].clone()))
        );
    }

    #[test]
    fn test_consecutive_over_rule_is_configurable() {
        let mut game = fresh();
        let (_, bowlers) = squads(&game);
        game.innings[0].last_over_bowler = Some(bowlers[0].clone());
        assert_eq!(
            check_selection(&game, &bowlers[0], PlayerRole::Bowler),
            Err(ScoringError::ConsecutiveOver(bowlers[0].clone()))
        );

        game.rules.forbid_consecutive_overs = false;
        assert!(check_selection(&game, &bowlers[0], PlayerRole::Bowler).is_ok());
    }
}
