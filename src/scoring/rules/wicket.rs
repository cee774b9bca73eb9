//! Wicket processing.

use super::{completion, crease, over, stats_mut};
use crate::scoring::action::{PlayerRole, ScoringError};
use crate::scoring::types::{Delivery, Match};
use tracing::{info, instrument};

/// Records the dismissal of the striker on a legal ball.
///
/// The striker's slot is vacated before the over check. When the wicket
/// falls on the sixth ball the over-break swap then moves the surviving
/// batter onto strike and leaves the non-striker's end for the new batter.
#[instrument(skip(game), fields(match_id = %game.id, inning = game.current_inning))]
pub fn record_wicket(game: &mut Match, dismissal: Option<String>) -> Result<(), ScoringError> {
    let crease = crease(game)?;
    let (batting, bowling) = game.innings_mut();

    let record = stats_mut(batting, &crease.striker, PlayerRole::Striker)?.batting_mut();
    record.balls += 1;
    record.out = true;

    let spell = stats_mut(bowling, &crease.bowler, PlayerRole::Bowler)?.bowling_mut();
    spell.wickets += 1;
    spell.bowl_legal_ball();

    batting.wickets += 1;
    batting.deliveries.push(Delivery::wicket(
        batting.overs,
        batting.balls + 1,
        crease.striker.clone(),
        crease.bowler,
        dismissal,
    ));
    batting.striker = None;
    info!(
        batter = %crease.striker,
        wickets = batting.wickets,
        total = batting.total_runs,
        "Wicket"
    );

    over::advance_ball(batting);
    completion::check_completion(game);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::rules::{record_delivery, select_player};
    use crate::scoring::setup::MatchSetup;
    use crate::scoring::types::ExtraType;

    fn ready_match() -> Match {
        let mut game = MatchSetup::new("Tech Titans", "Code Warriors", "Silicon Valley Oval")
            .with_overs(5)
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
    fn test_wicket_vacates_striker() {
        let mut game = ready_match();
        let striker = game.live_inning().striker().cloned().unwrap();
        let bowler = game.live_inning().current_bowler().cloned().unwrap();
        record_wicket(&mut game, Some("bowled".to_string())).unwrap();

        let inning = game.live_inning();
        assert!(inning.striker().is_none());
        assert_eq!(inning.wickets(), 1);
        assert_eq!(inning.balls(), 1);
        assert!(inning.player(&striker).unwrap().is_out());
        assert_eq!(inning.deliveries()[0].dismissal().as_deref(), Some("bowled"));
        assert!(*inning.deliveries()[0].is_wicket());

        let spell = *game.bowling_inning().player(&bowler).unwrap().bowling().unwrap();
        assert_eq!(spell.wickets, 1);
        assert_eq!(spell.balls_bowled, 1);
    }

    #[test]
    fn test_wicket_on_last_ball_puts_survivor_on_strike() {
        let mut game = ready_match();
        let survivor = game.live_inning().non_striker().cloned().unwrap();
        for _ in 0..5 {
            record_delivery(&mut game, 0, ExtraType::None).unwrap();
        }
        record_wicket(&mut game, None).unwrap();

        let inning = game.live_inning();
        assert_eq!(inning.overs(), 1);
        assert_eq!(inning.balls(), 0);
        assert_eq!(inning.striker(), Some(&survivor));
        assert!(inning.non_striker().is_none());
        assert!(inning.current_bowler().is_none());
    }
}
