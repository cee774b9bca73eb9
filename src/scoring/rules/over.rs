//! Over progression.

use crate::scoring::types::{BALLS_PER_OVER, Inning};
use tracing::{debug, instrument};

/// Counts one legal ball against the inning.
///
/// On the sixth ball the over closes: the ball count resets, the batters
/// change ends, and the bowler steps off and is remembered as the bowler of
/// the previous over. Returns `true` when an over was completed.
#[instrument(skip(inning), fields(team = %inning.team, overs = inning.overs, balls = inning.balls))]
pub fn advance_ball(inning: &mut Inning) -> bool {
    inning.balls += 1;
    if inning.balls < BALLS_PER_OVER {
        return false;
    }

    inning.balls = 0;
    inning.overs += 1;
    inning.swap_strike();
    inning.last_over_bowler = inning.current_bowler.take();
    debug!(overs = inning.overs, "Over completed");
    true
}
