//! Delivery processing: runs, extras and strike rotation.

use super::{completion, crease, over, stats_mut};
use crate::scoring::action::{PlayerRole, ScoringError};
use crate::scoring::types::{Delivery, ExtraType, Match};
use tracing::{debug, instrument};

/// Records a ball that was not a wicket.
///
/// Runs off the bat plus any wide/no-ball penalty go to the team total.
/// The striker is credited with the runs and the ball faced unless the ball
/// was a wide or no-ball. The bowler is charged the runs, plus the penalty on
/// an illegal ball, and only a legal ball advances the bowler's figures and
/// the over. An odd number of runs swaps the batters before the over check,
/// so a single off the last ball leaves the same batter facing the next over.
#[instrument(skip(game), fields(match_id = %game.id, inning = game.current_inning))]
pub fn record_delivery(game: &mut Match, runs: u32, extra: ExtraType) -> Result<(), ScoringError> {
    let crease = crease(game)?;
    let penalty = extra.penalty_runs();
    let (batting, bowling) = game.innings_mut();

    let batter = stats_mut(batting, &crease.striker, PlayerRole::Striker)?;
    if extra.credits_batter() {
        let record = batter.batting_mut();
        record.runs += runs;
        record.balls += 1;
        match runs {
            4 => record.fours += 1,
            6 => record.sixes += 1,
            _ => {}
        }
    }

    let spell = stats_mut(bowling, &crease.bowler, PlayerRole::Bowler)?.bowling_mut();
    if extra.is_legal() {
        spell.runs_conceded += runs;
        spell.bowl_legal_ball();
    } else {
        spell.runs_conceded += runs + penalty;
    }

    batting.total_runs += runs + penalty;
    batting.deliveries.push(Delivery::scored(
        batting.overs,
        batting.balls + 1,
        crease.striker,
        crease.bowler,
        runs,
        extra,
    ));
    debug!(runs, %extra, total = batting.total_runs, "Delivery recorded");

    if runs % 2 == 1 {
        batting.swap_strike();
    }
    if extra.is_legal() {
        over::advance_ball(batting);
    }

    completion::check_completion(game);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::rules::select_player;
    use crate::scoring::setup::MatchSetup;

    fn ready_match() -> Match {
        let mut game = MatchSetup::new("Tech Titans", "Code Warriors", "Silicon Valley Oval")
            .with_overs(2)
            .create_match()
            .unwrap();
        let batters = game.live_inning().squad().iter().map(|p| p.id().clone()).collect::<Vec<_>>();
        let bowler = game.bowling_inning().squad()[0].id().clone();
        select_player(&mut game, &batters[0], PlayerRole::Striker).unwrap();
        select_player(&mut game, &batters[1], PlayerRole::NonStriker).unwrap();
        select_player(&mut game, &bowler, PlayerRole::Bowler).unwrap();
        game
    }

    #[test]
    fn test_boundary_credits_striker() {
        let mut game = ready_match();
        let striker = game.live_inning().striker().cloned().unwrap();
        record_delivery(&mut game, 4, ExtraType::None).unwrap();

        let record = *game.live_inning().player(&striker).unwrap().batting().unwrap();
        assert_eq!(record.runs, 4);
        assert_eq!(record.balls, 1);
        assert_eq!(record.fours, 1);
        assert_eq!(game.live_inning().striker(), Some(&striker));
    }

    #[test]
    fn test_wide_is_not_a_ball() {
        let mut game = ready_match();
        let striker = game.live_inning().striker().cloned().unwrap();
        let bowler = game.live_inning().current_bowler().cloned().unwrap();
        record_delivery(&mut game, 0, ExtraType::Wide).unwrap();

        let inning = game.live_inning();
        assert_eq!(inning.total_runs(), 1);
        assert_eq!(inning.balls(), 0);
        assert_eq!(inning.player(&striker).unwrap().batting().unwrap().balls, 0);
        let spell = *game.bowling_inning().player(&bowler).unwrap().bowling().unwrap();
        assert_eq!(spell.runs_conceded, 1);
        assert_eq!(spell.balls_bowled, 0);
    }

    #[test]
    fn test_leg_bye_counts_the_ball() {
        let mut game = ready_match();
        record_delivery(&mut game, 2, ExtraType::LegBye).unwrap();
        let inning = game.live_inning();
        assert_eq!(inning.total_runs(), 2);
        assert_eq!(inning.balls(), 1);
        assert_eq!(inning.deliveries()[0].extra_runs(), &0);
    }

    #[test]
    fn test_three_runs_swap_strike() {
        let mut game = ready_match();
        let striker = game.live_inning().striker().cloned().unwrap();
        record_delivery(&mut game, 3, ExtraType::None).unwrap();
        assert_eq!(game.live_inning().non_striker(), Some(&striker));
    }

    #[test]
    fn test_requires_bowler() {
        let mut game = MatchSetup::new("Tech Titans", "Code Warriors", "Silicon Valley Oval")
            .create_match()
            .unwrap();
        let batters = game.live_inning().squad().iter().map(|p| p.id().clone()).collect::<Vec<_>>();
        select_player(&mut game, &batters[0], PlayerRole::Striker).unwrap();
        select_player(&mut game, &batters[1], PlayerRole::NonStriker).unwrap();

        assert_eq!(
            record_delivery(&mut game, 1, ExtraType::None),
            Err(ScoringError::MissingPlayerSelection(PlayerRole::Bowler))
        );
    }
}
