//! Innings and match completion.

use crate::scoring::outcome::MatchOutcome;
use crate::scoring::types::{Match, MatchStatus};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use tracing::{info, instrument};

/// Why the live inning ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum InningsEnd {
    /// Only one batter left standing.
    AllOut,
    /// The overs limit was reached.
    OversFinished,
    /// The chasing side passed the target.
    TargetReached,
}

/// Evaluates whether the live inning is over.
///
/// Checked in priority order: all out, overs finished, then (in the chase
/// only) target reached.
pub fn innings_end(game: &Match) -> Option<InningsEnd> {
    let inning = game.live_inning();
    if inning.wickets() >= game.player_count().saturating_sub(1) {
        Some(InningsEnd::AllOut)
    } else if inning.overs() >= game.overs() {
        Some(InningsEnd::OversFinished)
    } else if game.current_inning() == 1 && inning.total_runs() > game.innings()[0].total_runs() {
        Some(InningsEnd::TargetReached)
    } else {
        None
    }
}

/// Decides the result of a match whose chase is over.
pub fn decide_outcome(game: &Match) -> MatchOutcome {
    let [first, second] = game.innings();
    match second.total_runs().cmp(&first.total_runs()) {
        Ordering::Greater => MatchOutcome::WonByWickets {
            team: second.team().to_string(),
            wickets: game
                .player_count()
                .saturating_sub(1)
                .saturating_sub(second.wickets()),
        },
        Ordering::Less => MatchOutcome::WonByRuns {
            team: first.team().to_string(),
            runs: first.total_runs() - second.total_runs(),
        },
        Ordering::Equal => MatchOutcome::Tied,
    }
}

/// Closes the live inning if it has ended.
///
/// After the first inning the chase begins; after the second the match is
/// completed with its result. Returns why the inning ended, if it did.
#[instrument(skip(game), fields(match_id = %game.id, inning = game.current_inning))]
pub fn check_completion(game: &mut Match) -> Option<InningsEnd> {
    if game.is_completed() {
        return None;
    }
    let end = innings_end(game)?;

    if game.current_inning == 0 {
        game.current_inning = 1;
        game.status_text = format!(
            "{} needs {} to win",
            game.innings[1].team,
            game.innings[0].total_runs + 1
        );
        info!(%end, status = %game.status_text, "First inning closed");
    } else {
        let outcome = decide_outcome(game);
        game.status = MatchStatus::Completed;
        game.result = Some(outcome.to_string());
        game.status_text = outcome.to_string();
        info!(%end, result = %outcome, "Match completed");
        game.outcome = Some(outcome);
    }
    Some(end)
}
