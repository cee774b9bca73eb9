//! Run ledger: team totals agree with the delivery log and the bowlers.

use super::Invariant;
use crate::scoring::types::{Inning, Match};

/// Invariant: each inning's total equals the runs plus extra runs of its
/// deliveries, and equals the runs conceded by the fielding side's bowlers.
pub struct RunLedgerInvariant;

fn logged_runs(inning: &Inning) -> u64 {
    inning
        .deliveries()
        .iter()
        .map(|d| u64::from(*d.runs()) + u64::from(*d.extra_runs()))
        .sum()
}

fn conceded_runs(fielding: &Inning) -> u64 {
    fielding
        .player_stats()
        .values()
        .filter_map(|p| p.bowling())
        .map(|b| u64::from(b.runs_conceded))
        .sum()
}

impl Invariant<Match> for RunLedgerInvariant {
    fn holds(game: &Match) -> bool {
        let [first, second] = game.innings();
        [(first, second), (second, first)]
            .into_iter()
            .all(|(batting, fielding)| {
                let total = u64::from(batting.total_runs());
                total == logged_runs(batting) && total == conceded_runs(fielding)
            })
    }

    fn description() -> &'static str {
        "Team totals equal the runs logged ball by ball and the runs conceded"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::{ExtraType, MatchSetup, PlayerRole};

    fn opened() -> Match {
        let game = MatchSetup::new("Tech Titans", "Code Warriors", "Silicon Valley Oval")
            .create_match()
            .unwrap();
        let squad: Vec<_> = game.live_inning().squad().iter().map(|p| p.id().clone()).collect();
        let bowler = game.bowling_inning().squad()[0].id().clone();
        game.select_player(&squad[0], PlayerRole::Striker)
            .and_then(|g| g.select_player(&squad[1], PlayerRole::NonStriker))
            .and_then(|g| g.select_player(&bowler, PlayerRole::Bowler))
            .unwrap()
    }

    #[test]
    fn test_ledger_holds_with_extras() {
        let game = opened()
            .record_delivery(4, ExtraType::None)
            .and_then(|g| g.record_delivery(2, ExtraType::Wide))
            .and_then(|g| g.record_delivery(1, ExtraType::LegBye))
            .unwrap();
        assert!(RunLedgerInvariant::holds(&game));
    }

    #[test]
    fn test_ledger_catches_unbooked_conceded_runs() {
        let mut game = opened().record_delivery(4, ExtraType::None).unwrap();
        let bowler = game.innings[0].current_bowler.clone().unwrap();
        if let Some(stats) = game.innings[1].player_stats.get_mut(&bowler) {
            stats.bowling_mut().runs_conceded = 0;
        }
        assert!(!RunLedgerInvariant::holds(&game));
    }
}
