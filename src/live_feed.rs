//! Live international scores.
//!
//! A [`LiveFeed`] reports summaries of matches scored elsewhere. The
//! [`LiveBoard`] keeps the latest list: an empty or failed refresh keeps the
//! previous list, and when refreshes overlap the most recently started one
//! that succeeds wins.

use crate::llm_client::{LlmClient, LlmError};
use crate::scoring::{MatchStatus, ScoreLine};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use derive_getters::Getters;
use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, info, instrument, warn};

/// Overs assumed for feed matches, which report no format.
pub const FEED_MATCH_OVERS: u32 = 50;

const FEED_SOURCE: &str = "LLM live feed";

const FEED_SYSTEM_PROMPT: &str = "You report live cricket scores. Answer with a JSON \
array only, no prose and no code fences.";

const FEED_PROMPT: &str = r#"Find current live or very recent international cricket matches (last 24-48 hours).
Return a JSON array of match objects. Each object MUST have:
- id (unique string)
- title (string)
- teamA, teamB (strings)
- status ("LIVE", "COMPLETED", "STUMPS", "UPCOMING", "DELAYED")
- statusText (short status like "Ind won by 4 wkts" or "Day 3 Stumps")
- venue (string)
- date (YYYY-MM-DD)
- teamAScore (string, e.g. "342/8 (50.0)")
- teamBScore (string, e.g. "210/4 (32.2)")
- battingTeam (string, either teamA or teamB)"#;

// ─────────────────────────────────────────────────────────────
//  Summaries
// ─────────────────────────────────────────────────────────────

/// A match reported by the feed. Display only; never scored locally.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
pub struct LiveMatchSummary {
    id: String,
    title: String,
    team_a: String,
    team_b: String,
    overs: u32,
    status: MatchStatus,
    status_text: Option<String>,
    venue: String,
    date: String,
    team_a_score: ScoreLine,
    team_b_score: ScoreLine,
    current_inning: usize,
    source: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct RawLiveMatch {
    id: Option<String>,
    title: Option<String>,
    team_a: String,
    team_b: String,
    status: Option<String>,
    status_text: Option<String>,
    venue: String,
    date: String,
    team_a_score: Option<String>,
    team_b_score: Option<String>,
    batting_team: Option<String>,
}

impl RawLiveMatch {
    fn into_summary(self, index: usize) -> LiveMatchSummary {
        let status = self
            .status
            .as_deref()
            .and_then(|s| s.parse().ok())
            .unwrap_or(MatchStatus::Live);
        let current_inning = usize::from(self.batting_team.as_deref() == Some(self.team_b.as_str()));
        LiveMatchSummary {
            id: self
                .id
                .filter(|id| !id.is_empty())
                .unwrap_or_else(|| format!("int-{}", index)),
            title: self
                .title
                .unwrap_or_else(|| format!("{} vs {}", self.team_a, self.team_b)),
            team_a_score: ScoreLine::parse_lenient(self.team_a_score.as_deref().unwrap_or_default()),
            team_b_score: ScoreLine::parse_lenient(self.team_b_score.as_deref().unwrap_or_default()),
            team_a: self.team_a,
            team_b: self.team_b,
            overs: FEED_MATCH_OVERS,
            status,
            status_text: self.status_text,
            venue: self.venue,
            date: self.date,
            current_inning,
            source: FEED_SOURCE.to_string(),
        }
    }
}

/// Parses the feed's JSON array into summaries.
///
/// Tolerates a surrounding code fence. Missing ids become `int-<index>`,
/// unknown statuses become `Live`, and unreadable scores become `0/0 (0.0)`.
#[instrument(skip(text), fields(len = text.len()))]
pub fn parse_live_matches(text: &str) -> Result<Vec<LiveMatchSummary>, FeedError> {
    let body = strip_code_fence(text);
    if body.is_empty() {
        return Ok(Vec::new());
    }
    let raw: Vec<RawLiveMatch> = serde_json::from_str(body)
        .map_err(|e| FeedError::new(format!("Failed to parse live matches: {}", e)))?;
    let matches: Vec<_> = raw
        .into_iter()
        .enumerate()
        .map(|(index, m)| m.into_summary(index))
        .collect();
    debug!(count = matches.len(), "Parsed live matches");
    Ok(matches)
}

fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let rest = rest.strip_prefix("json").unwrap_or(rest);
    rest.strip_suffix("```").unwrap_or(rest).trim()
}

// ─────────────────────────────────────────────────────────────
//  Feed
// ─────────────────────────────────────────────────────────────

/// A source of live match summaries.
#[async_trait]
pub trait LiveFeed: Send + Sync {
    /// Fetches the current list of matches.
    async fn fetch(&self) -> Result<Vec<LiveMatchSummary>, FeedError>;
}

/// Live scores gathered by an LLM.
#[derive(Debug, Clone)]
pub struct LlmLiveFeed {
    client: LlmClient,
}

impl LlmLiveFeed {
    /// Wraps a configured client.
    pub fn new(client: LlmClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl LiveFeed for LlmLiveFeed {
    #[instrument(skip(self))]
    async fn fetch(&self) -> Result<Vec<LiveMatchSummary>, FeedError> {
        let text = self.client.generate(FEED_SYSTEM_PROMPT, FEED_PROMPT).await?;
        parse_live_matches(&text)
    }
}

/// Live feed error.
#[derive(Debug, Clone, Display, Error)]
#[display("Feed error: {} at {}:{}", message, file, line)]
pub struct FeedError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl FeedError {
    /// Creates a new feed error.
    #[track_caller]
    pub fn new(message: String) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message,
            line: loc.line(),
            file: loc.file(),
        }
    }
}

impl From<LlmError> for FeedError {
    #[track_caller]
    fn from(err: LlmError) -> Self {
        Self::new(err.message)
    }
}

// ─────────────────────────────────────────────────────────────
//  Board
// ─────────────────────────────────────────────────────────────

/// Issued when a refresh starts; identifies it when it finishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RefreshTicket(u64);

/// What a finished refresh did to the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum RefreshOutcome {
    /// The list was replaced.
    Applied,
    /// The feed returned nothing; the previous list was kept.
    KeptEmpty,
    /// The feed failed; the previous list was kept.
    Failed,
    /// A later refresh already landed; the result was dropped.
    Superseded,
}

/// The latest list of live matches.
///
/// `revision` counts finished refreshes that were not superseded; zero means
/// no refresh has reported yet.
#[derive(Debug, Clone, Default, Getters)]
pub struct LiveBoard {
    matches: Vec<LiveMatchSummary>,
    refreshed_at: Option<DateTime<Utc>>,
    last_error: Option<String>,
    stale: bool,
    revision: u64,
    #[getter(skip)]
    issued: u64,
    #[getter(skip)]
    applied: u64,
}

impl LiveBoard {
    /// Creates an empty board.
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a refresh.
    pub fn begin_refresh(&mut self) -> RefreshTicket {
        self.issued += 1;
        RefreshTicket(self.issued)
    }

    /// Finishes a refresh with what the feed returned.
    #[instrument(skip(self, result))]
    pub fn complete(
        &mut self,
        ticket: RefreshTicket,
        result: Result<Vec<LiveMatchSummary>, FeedError>,
    ) -> RefreshOutcome {
        if ticket.0 <= self.applied {
            debug!("Dropping superseded refresh");
            return RefreshOutcome::Superseded;
        }
        self.revision += 1;
        match result {
            Ok(matches) if matches.is_empty() => {
                self.stale = true;
                RefreshOutcome::KeptEmpty
            }
            Ok(matches) => {
                info!(count = matches.len(), "Live board refreshed");
                self.matches = matches;
                self.applied = ticket.0;
                self.refreshed_at = Some(Utc::now());
                self.last_error = None;
                self.stale = false;
                RefreshOutcome::Applied
            }
            Err(e) => {
                warn!(error = %e, "Live refresh failed");
                self.last_error = Some(e.message);
                self.stale = true;
                RefreshOutcome::Failed
            }
        }
    }
}

fn lock(board: &Mutex<LiveBoard>) -> MutexGuard<'_, LiveBoard> {
    board.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Runs one refresh against the board. The lock is not held while fetching.
#[instrument(skip(feed, board))]
pub async fn refresh_once(feed: &dyn LiveFeed, board: &Mutex<LiveBoard>) -> RefreshOutcome {
    let ticket = lock(board).begin_refresh();
    let result = feed.fetch().await;
    lock(board).complete(ticket, result)
}

/// Refreshes the board every `period`, starting immediately.
///
/// Each refresh runs on its own task so a slow fetch never delays the next
/// tick; the board's tickets keep a late, older result from overwriting a
/// newer one.
pub fn spawn_refresher(
    feed: Arc<dyn LiveFeed>,
    board: Arc<Mutex<LiveBoard>>,
    period: Duration,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(period);
        interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
        loop {
            interval.tick().await;
            let feed = Arc::clone(&feed);
            let board = Arc::clone(&board);
            tokio::spawn(async move {
                let outcome = refresh_once(feed.as_ref(), &board).await;
                debug!(%outcome, "Refresh finished");
            });
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const FEED: &str = r#"```json
[
  {"id": "ind-aus-3", "title": "India vs Australia, 3rd ODI", "teamA": "India", "teamB": "Australia",
   "status": "LIVE", "statusText": "Australia need 133 runs", "venue": "Wankhede", "date": "2026-10-15",
   "teamAScore": "342/8 (50.0)", "teamBScore": "210/4 (32.2)", "battingTeam": "Australia"},
  {"title": "England vs Pakistan", "teamA": "England", "teamB": "Pakistan",
   "status": "ABANDONED", "venue": "Lord's", "date": "2026-10-14",
   "teamAScore": "Yet to bat"}
]
```"#;

    #[test]
    fn test_parse_feed() {
        let matches = parse_live_matches(FEED).unwrap();
        assert_eq!(matches.len(), 2);

        let first = &matches[0];
        assert_eq!(first.id(), "ind-aus-3");
        assert_eq!(first.team_a_score().to_string(), "342/8 (50.0)");
        assert_eq!(first.team_b_score().balls, 2);
        assert_eq!(*first.current_inning(), 1);
        assert_eq!(*first.overs(), FEED_MATCH_OVERS);

        let second = &matches[1];
        assert_eq!(second.id(), "int-1");
        assert_eq!(*second.status(), MatchStatus::Live);
        assert_eq!(*second.team_a_score(), ScoreLine::default());
        assert_eq!(*second.current_inning(), 0);
    }

    #[test]
    fn test_parse_rejects_prose() {
        assert!(parse_live_matches("Sorry, I cannot browse.").is_err());
        assert!(parse_live_matches("   ").unwrap().is_empty());
    }

    #[test]
    fn test_newer_result_wins() {
        let matches = parse_live_matches(FEED).unwrap();
        let mut board = LiveBoard::new();
        let older = board.begin_refresh();
        let newer = board.begin_refresh();

        assert_eq!(board.complete(newer, Ok(matches[..1].to_vec())), RefreshOutcome::Applied);
        assert_eq!(board.complete(older, Ok(matches.clone())), RefreshOutcome::Superseded);
        assert_eq!(board.matches().len(), 1);
    }

    #[test]
    fn test_failure_keeps_previous_list() {
        let matches = parse_live_matches(FEED).unwrap();
        let mut board = LiveBoard::new();
        let first = board.begin_refresh();
        board.complete(first, Ok(matches));

        let second = board.begin_refresh();
        let outcome = board.complete(second, Err(FeedError::new("timeout".into())));
        assert_eq!(outcome, RefreshOutcome::Failed);
        assert_eq!(board.matches().len(), 2);
        assert!(*board.stale());
        assert_eq!(board.last_error().as_deref(), Some("timeout"));

        let third = board.begin_refresh();
        assert_eq!(board.complete(third, Ok(Vec::new())), RefreshOutcome::KeptEmpty);
        assert_eq!(board.matches().len(), 2);
    }

    #[test]
    fn test_revision_counts_reported_refreshes() {
        let matches = parse_live_matches(FEED).unwrap();
        let mut board = LiveBoard::new();
        assert_eq!(*board.revision(), 0);

        let older = board.begin_refresh();
        let newer = board.begin_refresh();
        board.complete(newer, Ok(matches.clone()));
        assert_eq!(*board.revision(), 1);

        board.complete(older, Ok(matches));
        assert_eq!(*board.revision(), 1);

        let failed = board.begin_refresh();
        board.complete(failed, Err(FeedError::new("timeout".into())));
        assert_eq!(*board.revision(), 2);
    }
}
