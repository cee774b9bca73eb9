//! Ball accounting: the over count agrees with the legal balls logged.

use super::Invariant;
use crate::scoring::types::Match;

/// Invariant: `overs * 6 + balls` equals the legal deliveries logged, and the
/// ball count never reaches six.
pub struct BallAccountingInvariant;

impl Invariant<Match> for BallAccountingInvariant {
    fn holds(game: &Match) -> bool {
        game.innings().iter().all(|inning| {
            let legal = inning.deliveries().iter().filter(|d| d.is_legal()).count() as u32;
            inning.legal_balls() == legal && inning.balls() < crate::scoring::BALLS_PER_OVER
        })
    }

    fn description() -> &'static str {
        "Overs and balls match the legal deliveries logged"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::{ExtraType, MatchSetup, PlayerRole, ScoringEvent};

    fn ready_match() -> Match {
        let game = MatchSetup::new("Tech Titans", "Code Warriors", "Silicon Valley Oval")
            .create_match()
            .unwrap();
        let batters: Vec<_> = game.live_inning().squad().iter().map(|p| p.id().clone()).collect();
        let bowler = game.bowling_inning().squad()[0].id().clone();
        game.apply(&ScoringEvent::select(batters[0].clone(), PlayerRole::Striker))
            .and_then(|g| g.apply(&ScoringEvent::select(batters[1].clone(), PlayerRole::NonStriker)))
            .and_then(|g| g.apply(&ScoringEvent::select(bowler, PlayerRole::Bowler)))
            .unwrap()
    }

    #[test]
    fn test_fresh_match_holds() {
        assert!(BallAccountingInvariant::holds(&ready_match()));
    }

    #[test]
    fn test_extras_do_not_count() {
        let game = ready_match()
            .apply(&ScoringEvent::extra(0, ExtraType::Wide))
            .and_then(|g| g.apply(&ScoringEvent::extra(2, ExtraType::NoBall)))
            .and_then(|g| g.apply(&ScoringEvent::runs(1)))
            .unwrap();
        assert_eq!(game.live_inning().balls(), 1);
        assert!(BallAccountingInvariant::holds(&game));
    }

    #[test]
    fn test_corrupted_ball_count_violates() {
        let mut game = ready_match().apply(&ScoringEvent::runs(0)).unwrap();
        game.innings[0].balls = 3;
        assert!(!BallAccountingInvariant::holds(&game));
    }
}
