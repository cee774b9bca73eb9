//! Crease integrity for the live inning.

use super::Invariant;
use crate::scoring::types::{Match, PlayerId};

/// Invariant: the two batters are different players from the batting side,
/// neither is out, and the bowler (if any) belongs to the fielding side.
pub struct CreaseIntegrityInvariant;

impl Invariant<Match> for CreaseIntegrityInvariant {
    fn holds(game: &Match) -> bool {
        let inning = game.live_inning();
        let batter_ok = |id: &PlayerId| inning.player(id).is_some_and(|p| !p.is_out());

        let distinct = match (inning.striker(), inning.non_striker()) {
            (Some(a), Some(b)) => a != b,
            _ => true,
        };
        let batters_ok = inning.striker().is_none_or(batter_ok)
            && inning.non_striker().is_none_or(batter_ok);
        let bowler_ok = inning
            .current_bowler()
            .is_none_or(|id| game.bowling_inning().player(id).is_some());

        distinct && batters_ok && bowler_ok
    }

    fn description() -> &'static str {
        "Batters at the crease are distinct and not out, and the bowler fields"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::{MatchSetup, PlayerRole, ScoringEvent};

    #[test]
    fn test_same_batter_both_ends_violates() {
        let game = MatchSetup::new("Tech Titans", "Code Warriors", "Silicon Valley Oval")
            .create_match()
            .unwrap();
        let opener = game.live_inning().squad()[0].id().clone();
        let mut game = game
            .apply(&ScoringEvent::select(opener.clone(), PlayerRole::Striker))
            .unwrap();
        assert!(CreaseIntegrityInvariant::holds(&game));

        game.innings[0].non_striker = Some(opener);
        assert!(!CreaseIntegrityInvariant::holds(&game));
    }

    #[test]
    fn test_bowler_from_batting_side_violates() {
        let mut game = MatchSetup::new("Tech Titans", "Code Warriors", "Silicon Valley Oval")
            .create_match()
            .unwrap();
        let batter = game.live_inning().squad()[0].id().clone();
        game.innings[0].current_bowler = Some(batter);
        assert!(!CreaseIntegrityInvariant::holds(&game));
    }
}
