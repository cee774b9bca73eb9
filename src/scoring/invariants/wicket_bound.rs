//! Wicket bound: wickets are logged, bounded, and match the dismissed batters.

use super::Invariant;
use crate::scoring::types::Match;

/// Invariant: each inning has at most `player_count - 1` wickets, one wicket
/// delivery per wicket, and exactly that many dismissed batters.
pub struct WicketBoundInvariant;

impl Invariant<Match> for WicketBoundInvariant {
    fn holds(game: &Match) -> bool {
        let limit = game.player_count().saturating_sub(1);
        game.innings().iter().all(|inning| {
            let logged = inning.deliveries().iter().filter(|d| *d.is_wicket()).count() as u32;
            let dismissed = inning.player_stats().values().filter(|p| p.is_out()).count() as u32;
            inning.wickets() <= limit && inning.wickets() == logged && inning.wickets() == dismissed
        })
    }

    fn description() -> &'static str {
        "Wickets stay within the squad and match the dismissals logged"
    }
}
