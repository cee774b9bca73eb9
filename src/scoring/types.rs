//! Core domain types for cricket scoring.

use super::action::PlayerRole;
use super::outcome::MatchOutcome;
use chrono::{DateTime, NaiveDate, Utc};
use derive_getters::Getters;
use derive_more::{Display, From};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::instrument;
use uuid::Uuid;

/// Legal deliveries in one over.
pub const BALLS_PER_OVER: u32 = 6;

/// Most runs that can be taken off one delivery, penalty runs excluded.
pub const MAX_RUNS_PER_BALL: u32 = 8;

// ─────────────────────────────────────────────────────────────
//  Identifiers
// ─────────────────────────────────────────────────────────────

/// Unique identifier for a match.
#[derive(
    Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Display, From,
)]
#[serde(transparent)]
pub struct MatchId(String);

impl MatchId {
    /// Generates a fresh id for a locally scored match.
    #[instrument]
    pub fn generate() -> Self {
        Self(format!(
            "local-{}-{}",
            Utc::now().timestamp_millis(),
            short_suffix()
        ))
    }

    /// Returns the id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for MatchId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

/// Unique identifier for a player within one match.
///
/// Generated from the squad position, the creation time and a random
/// suffix, so repeated setups of the same squads never collide.
#[derive(
    Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Display, From,
)]
#[serde(transparent)]
pub struct PlayerId(String);

impl PlayerId {
    /// Generates an id for the player at `index` in a squad.
    pub fn generate(index: usize) -> Self {
        Self(format!(
            "p{}-{}-{}",
            index,
            Utc::now().timestamp_millis(),
            short_suffix()
        ))
    }

    /// Returns the id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for PlayerId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

/// Unique identifier for a logged delivery.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[serde(transparent)]
pub struct DeliveryId(String);

impl DeliveryId {
    /// Generates a fresh delivery id.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }
}

fn short_suffix() -> String {
    Uuid::new_v4().simple().to_string()[..8].to_string()
}

// ─────────────────────────────────────────────────────────────
//  Enumerations
// ─────────────────────────────────────────────────────────────

/// Lifecycle status of a match.
///
/// Locally scored matches move `Upcoming → Live → Completed` and never back.
/// `Stumps` and `Delayed` only appear on matches reported by the live feed.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE", ascii_case_insensitive)]
pub enum MatchStatus {
    /// Scheduled, not started.
    Upcoming,
    /// In play.
    #[default]
    Live,
    /// Result decided.
    Completed,
    /// Close of play for the day.
    Stumps,
    /// Start or resumption delayed.
    Delayed,
}

impl MatchStatus {
    /// Position in the local lifecycle, used to check monotonic transitions.
    pub fn lifecycle_rank(self) -> u8 {
        match self {
            Self::Upcoming => 0,
            Self::Live | Self::Stumps | Self::Delayed => 1,
            Self::Completed => 2,
        }
    }
}

/// Where the match comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum MatchType {
    /// Reported by the live international feed.
    International,
    /// Scored ball by ball in this engine.
    Local,
}

/// What the toss winner chose to do.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, strum::Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum TossDecision {
    /// Toss winner bats first.
    #[default]
    Bat,
    /// Toss winner bowls first.
    Bowl,
}

/// Kind of extra attached to a delivery.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, strum::Display,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum ExtraType {
    /// A fair delivery.
    #[default]
    None,
    /// Wide: re-bowled, one penalty run.
    Wide,
    /// No-ball: re-bowled, one penalty run.
    NoBall,
    /// Byes run off a fair delivery.
    Bye,
    /// Leg-byes run off a fair delivery.
    LegBye,
}

impl ExtraType {
    /// Whether the delivery counts towards the over.
    pub fn is_legal(self) -> bool {
        !matches!(self, Self::Wide | Self::NoBall)
    }

    /// Penalty runs added on top of the runs taken.
    pub fn penalty_runs(self) -> u32 {
        if self.is_legal() { 0 } else { 1 }
    }

    /// Whether the striker is credited with the runs and the ball faced.
    pub fn credits_batter(self) -> bool {
        matches!(self, Self::None | Self::Bye | Self::LegBye)
    }
}

/// Optional rule toggles carried by a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringRules {
    /// Reject the bowler who completed the previous over.
    pub forbid_consecutive_overs: bool,
}

impl Default for ScoringRules {
    fn default() -> Self {
        Self {
            forbid_consecutive_overs: true,
        }
    }
}

// ─────────────────────────────────────────────────────────────
//  Player statistics
// ─────────────────────────────────────────────────────────────

/// Batting figures for one player in one match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BattingRecord {
    /// Runs credited to the batter.
    pub runs: u32,
    /// Balls faced.
    pub balls: u32,
    /// Boundaries scored along the ground.
    pub fours: u32,
    /// Boundaries cleared.
    pub sixes: u32,
    /// Dismissed; batting figures are frozen from here on.
    pub out: bool,
}

/// Bowling figures for one player in one match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BowlingRecord {
    /// Completed overs.
    pub overs: u32,
    /// Legal balls in the over being bowled (0..=5).
    pub balls_bowled: u32,
    /// Runs charged to the bowler.
    pub runs_conceded: u32,
    /// Wickets credited to the bowler.
    pub wickets: u32,
}

impl BowlingRecord {
    /// Counts one legal ball, rolling six into a completed over.
    pub(crate) fn bowl_legal_ball(&mut self) {
        self.balls_bowled += 1;
        if self.balls_bowled >= BALLS_PER_OVER {
            self.balls_bowled = 0;
            self.overs += 1;
        }
    }

    /// Total legal balls bowled.
    pub fn legal_balls(&self) -> u32 {
        self.overs * BALLS_PER_OVER + self.balls_bowled
    }
}

/// One player's record for a match.
///
/// A player who has not batted has no batting record and a player who has
/// not bowled has no bowling record; both may exist on the same player.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerMatchStats {
    id: PlayerId,
    name: String,
    order: u32,
    batting: Option<BattingRecord>,
    bowling: Option<BowlingRecord>,
}

impl PlayerMatchStats {
    /// Creates an empty record for the player at squad position `order`.
    pub fn new(id: PlayerId, name: impl Into<String>, order: u32) -> Self {
        Self {
            id,
            name: name.into(),
            order,
            batting: None,
            bowling: None,
        }
    }

    /// Returns the player id.
    pub fn id(&self) -> &PlayerId {
        &self.id
    }

    /// Returns the player name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the squad position (zero-based).
    pub fn order(&self) -> u32 {
        self.order
    }

    /// Returns the batting record, if the player has batted.
    pub fn batting(&self) -> Option<&BattingRecord> {
        self.batting.as_ref()
    }

    /// Returns the bowling record, if the player has bowled.
    pub fn bowling(&self) -> Option<&BowlingRecord> {
        self.bowling.as_ref()
    }

    /// Whether the player has been dismissed.
    pub fn is_out(&self) -> bool {
        self.batting.is_some_and(|b| b.out)
    }

    pub(crate) fn batting_mut(&mut self) -> &mut BattingRecord {
        self.batting.get_or_insert_with(BattingRecord::default)
    }

    pub(crate) fn bowling_mut(&mut self) -> &mut BowlingRecord {
        self.bowling.get_or_insert_with(BowlingRecord::default)
    }
}

// ─────────────────────────────────────────────────────────────
//  Delivery log
// ─────────────────────────────────────────────────────────────

/// One ball as it was bowled. Never mutated once logged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
pub struct Delivery {
    id: DeliveryId,
    over: u32,
    ball: u32,
    batsman_id: PlayerId,
    bowler_id: PlayerId,
    runs: u32,
    extra_type: ExtraType,
    extra_runs: u32,
    is_wicket: bool,
    dismissal: Option<String>,
    timestamp: DateTime<Utc>,
}

impl Delivery {
    pub(crate) fn scored(
        over: u32,
        ball: u32,
        batsman_id: PlayerId,
        bowler_id: PlayerId,
        runs: u32,
        extra_type: ExtraType,
    ) -> Self {
        Self {
            id: DeliveryId::generate(),
            over,
            ball,
            batsman_id,
            bowler_id,
            runs,
            extra_type,
            extra_runs: extra_type.penalty_runs(),
            is_wicket: false,
            dismissal: None,
            timestamp: Utc::now(),
        }
    }

    pub(crate) fn wicket(
        over: u32,
        ball: u32,
        batsman_id: PlayerId,
        bowler_id: PlayerId,
        dismissal: Option<String>,
    ) -> Self {
        Self {
            is_wicket: true,
            dismissal,
            ..Self::scored(over, ball, batsman_id, bowler_id, 0, ExtraType::None)
        }
    }

    /// Whether this ball counts towards the over.
    pub fn is_legal(&self) -> bool {
        self.extra_type.is_legal()
    }

    /// Runs added to the team total by this ball.
    pub fn total_runs(&self) -> u32 {
        self.runs + self.extra_runs
    }

    /// Whether both entries describe the same ball, ignoring id and timestamp.
    pub fn same_ball(&self, other: &Delivery) -> bool {
        self.over == other.over
            && self.ball == other.ball
            && self.batsman_id == other.batsman_id
            && self.bowler_id == other.bowler_id
            && self.runs == other.runs
            && self.extra_type == other.extra_type
            && self.extra_runs == other.extra_runs
            && self.is_wicket == other.is_wicket
            && self.dismissal == other.dismissal
    }
}

// ─────────────────────────────────────────────────────────────
//  Inning
// ─────────────────────────────────────────────────────────────

/// One team's batting effort.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Inning {
    pub(crate) team: String,
    pub(crate) total_runs: u32,
    pub(crate) wickets: u32,
    pub(crate) overs: u32,
    pub(crate) balls: u32,
    pub(crate) striker: Option<PlayerId>,
    pub(crate) non_striker: Option<PlayerId>,
    pub(crate) current_bowler: Option<PlayerId>,
    pub(crate) last_over_bowler: Option<PlayerId>,
    pub(crate) player_stats: BTreeMap<PlayerId, PlayerMatchStats>,
    pub(crate) deliveries: Vec<Delivery>,
}

impl Inning {
    /// Creates an inning for `team` batting with the given squad records.
    pub fn new(team: impl Into<String>, player_stats: BTreeMap<PlayerId, PlayerMatchStats>) -> Self {
        Self {
            team: team.into(),
            total_runs: 0,
            wickets: 0,
            overs: 0,
            balls: 0,
            striker: None,
            non_striker: None,
            current_bowler: None,
            last_over_bowler: None,
            player_stats,
            deliveries: Vec::new(),
        }
    }

    /// Returns the batting team.
    pub fn team(&self) -> &str {
        &self.team
    }

    /// Returns the team total.
    pub fn total_runs(&self) -> u32 {
        self.total_runs
    }

    /// Returns wickets fallen.
    pub fn wickets(&self) -> u32 {
        self.wickets
    }

    /// Returns completed overs.
    pub fn overs(&self) -> u32 {
        self.overs
    }

    /// Returns legal balls in the current over.
    pub fn balls(&self) -> u32 {
        self.balls
    }

    /// Total legal balls bowled in this inning.
    pub fn legal_balls(&self) -> u32 {
        self.overs * BALLS_PER_OVER + self.balls
    }

    /// Returns the batter on strike.
    pub fn striker(&self) -> Option<&PlayerId> {
        self.striker.as_ref()
    }

    /// Returns the batter at the non-striker's end.
    pub fn non_striker(&self) -> Option<&PlayerId> {
        self.non_striker.as_ref()
    }

    /// Returns the bowler of the current over (an id from the other inning's squad).
    pub fn current_bowler(&self) -> Option<&PlayerId> {
        self.current_bowler.as_ref()
    }

    /// Returns the bowler who completed the previous over.
    pub fn last_over_bowler(&self) -> Option<&PlayerId> {
        self.last_over_bowler.as_ref()
    }

    /// Returns every squad record keyed by player id.
    pub fn player_stats(&self) -> &BTreeMap<PlayerId, PlayerMatchStats> {
        &self.player_stats
    }

    /// Looks up one squad record.
    pub fn player(&self, id: &PlayerId) -> Option<&PlayerMatchStats> {
        self.player_stats.get(id)
    }

    /// Finds a squad member by name.
    pub fn player_by_name(&self, name: &str) -> Option<&PlayerMatchStats> {
        self.player_stats.values().find(|p| p.name() == name)
    }

    /// Squad records in squad order.
    pub fn squad(&self) -> Vec<&PlayerMatchStats> {
        let mut squad: Vec<_> = self.player_stats.values().collect();
        squad.sort_by_key(|p| p.order());
        squad
    }

    /// Returns the ball-by-ball log.
    pub fn deliveries(&self) -> &[Delivery] {
        &self.deliveries
    }

    /// Whether any ball has been bowled.
    pub fn has_started(&self) -> bool {
        !self.deliveries.is_empty()
    }

    /// Whether both innings hold the same score, crease and log.
    pub fn same_state(&self, other: &Inning) -> bool {
        self.team == other.team
            && self.total_runs == other.total_runs
            && self.wickets == other.wickets
            && self.overs == other.overs
            && self.balls == other.balls
            && self.striker == other.striker
            && self.non_striker == other.non_striker
            && self.current_bowler == other.current_bowler
            && self.last_over_bowler == other.last_over_bowler
            && self.player_stats == other.player_stats
            && self.deliveries.len() == other.deliveries.len()
            && self
                .deliveries
                .iter()
                .zip(&other.deliveries)
                .all(|(a, b)| a.same_ball(b))
    }

    pub(crate) fn swap_strike(&mut self) {
        std::mem::swap(&mut self.striker, &mut self.non_striker);
    }
}

// ─────────────────────────────────────────────────────────────
//  Match
// ─────────────────────────────────────────────────────────────

/// A fixture with its two innings.
///
/// `innings[0]` always belongs to the side that batted first, whoever won
/// the toss. Build one with [`MatchSetup`](super::MatchSetup) and advance it
/// with [`Match::apply`]. Serialize-only: a match is rebuilt from its
/// event log, never from a snapshot, so `current_inning` stays in range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Match {
    pub(crate) id: MatchId,
    pub(crate) match_type: MatchType,
    pub(crate) title: String,
    pub(crate) team_a: String,
    pub(crate) team_b: String,
    pub(crate) overs: u32,
    pub(crate) player_count: u32,
    pub(crate) venue: String,
    pub(crate) date: NaiveDate,
    pub(crate) status: MatchStatus,
    pub(crate) status_text: String,
    pub(crate) result: Option<String>,
    pub(crate) outcome: Option<MatchOutcome>,
    pub(crate) toss_winner: String,
    pub(crate) toss_decision: TossDecision,
    pub(crate) rules: ScoringRules,
    pub(crate) innings: [Inning; 2],
    pub(crate) current_inning: usize,
}

impl Match {
    /// Returns the match id.
    pub fn id(&self) -> &MatchId {
        &self.id
    }

    /// Returns the match type.
    pub fn match_type(&self) -> MatchType {
        self.match_type
    }

    /// Returns the title ("A vs B").
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Returns the first named team.
    pub fn team_a(&self) -> &str {
        &self.team_a
    }

    /// Returns the second named team.
    pub fn team_b(&self) -> &str {
        &self.team_b
    }

    /// Returns the overs limit per inning.
    pub fn overs(&self) -> u32 {
        self.overs
    }

    /// Returns the players per side.
    pub fn player_count(&self) -> u32 {
        self.player_count
    }

    /// Returns the venue.
    pub fn venue(&self) -> &str {
        &self.venue
    }

    /// Returns the match date.
    pub fn date(&self) -> NaiveDate {
        self.date
    }

    /// Returns the lifecycle status.
    pub fn status(&self) -> MatchStatus {
        self.status
    }

    /// Returns the human-readable status line.
    pub fn status_text(&self) -> &str {
        &self.status_text
    }

    /// Returns the result text once the match is completed.
    pub fn result(&self) -> Option<&str> {
        self.result.as_deref()
    }

    /// Returns the structured outcome once the match is completed.
    pub fn outcome(&self) -> Option<&MatchOutcome> {
        self.outcome.as_ref()
    }

    /// Returns the toss winner.
    pub fn toss_winner(&self) -> &str {
        &self.toss_winner
    }

    /// Returns the toss decision.
    pub fn toss_decision(&self) -> TossDecision {
        self.toss_decision
    }

    /// Returns the rule toggles.
    pub fn rules(&self) -> ScoringRules {
        self.rules
    }

    /// Returns both innings in batting order.
    pub fn innings(&self) -> &[Inning; 2] {
        &self.innings
    }

    /// Returns the index (0 or 1) of the live inning.
    pub fn current_inning(&self) -> usize {
        self.current_inning
    }

    /// Returns the live inning.
    pub fn live_inning(&self) -> &Inning {
        &self.innings[self.current_inning]
    }

    /// Returns the inning whose squad supplies the bowlers.
    pub fn bowling_inning(&self) -> &Inning {
        &self.innings[1 - self.current_inning]
    }

    /// Returns the side that batted first.
    pub fn batting_first(&self) -> &str {
        self.innings[0].team()
    }

    /// Returns the side that batted second.
    pub fn batting_second(&self) -> &str {
        self.innings[1].team()
    }

    /// Returns the runs the chasing side needs, once the chase has begun.
    pub fn target(&self) -> Option<u32> {
        (self.current_inning == 1).then(|| self.innings[0].total_runs + 1)
    }

    /// Whether the result has been decided.
    pub fn is_completed(&self) -> bool {
        self.status == MatchStatus::Completed
    }

    /// Finds a member of the batting side in the live inning by name.
    pub fn batter_by_name(&self, name: &str) -> Option<&PlayerId> {
        self.live_inning().player_by_name(name).map(|p| p.id())
    }

    /// Finds a member of the fielding side in the live inning by name.
    pub fn bowler_by_name(&self, name: &str) -> Option<&PlayerId> {
        self.bowling_inning().player_by_name(name).map(|p| p.id())
    }

    /// Whether two matches are in the same scoring state.
    ///
    /// Delivery ids and timestamps are ignored, so a match rebuilt by replay
    /// compares equal to the one built ball by ball.
    pub fn same_state(&self, other: &Match) -> bool {
        self.id == other.id
            && self.status == other.status
            && self.status_text == other.status_text
            && self.result == other.result
            && self.outcome == other.outcome
            && self.current_inning == other.current_inning
            && self.rules == other.rules
            && self
                .innings
                .iter()
                .zip(&other.innings)
                .all(|(a, b)| a.same_state(b))
    }

    /// Resolves a player name for a role: batters come from the side batting
    /// in the live inning, bowlers from the side fielding.
    pub fn player_by_name(&self, name: &str, role: PlayerRole) -> Option<&PlayerId> {
        match role {
            PlayerRole::Striker | PlayerRole::NonStriker => self.batter_by_name(name),
            PlayerRole::Bowler => self.bowler_by_name(name),
        }
    }

    /// Splits the innings into (batting, bowling) for the live inning.
    pub(crate) fn innings_mut(&mut self) -> (&mut Inning, &mut Inning) {
        let [first, second] = &mut self.innings;
        if self.current_inning == 0 {
            (first, second)
        } else {
            (second, first)
        }
    }
}
