//! Live board refreshes driven by fake feeds.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use strictly_cricket::{
    FeedError, LiveBoard, LiveFeed, LiveMatchSummary, MatchStatus, RefreshOutcome,
    parse_live_matches, refresh_once, spawn_refresher,
};
use tokio::sync::{Notify, Semaphore};
use tracing::instrument;

const ONE_MATCH: &str = r#"[{"id": "nz-sa-1", "teamA": "New Zealand", "teamB": "South Africa",
"status": "COMPLETED", "statusText": "NZ won by 12 runs", "venue": "Basin Reserve",
"date": "2026-10-15", "teamAScore": "256/9 (50)", "teamBScore": "244 (48.3)"}]"#;

const TWO_MATCHES: &str = r#"[
{"id": "eng-pak-2", "teamA": "England", "teamB": "Pakistan", "status": "stumps",
 "venue": "Lord's", "date": "2026-10-15", "teamAScore": "301/6 (90.0)"},
{"id": "ind-aus-3", "teamA": "India", "teamB": "Australia", "status": "LIVE",
 "venue": "Wankhede", "date": "2026-10-15", "teamAScore": "342/8 (50.0)",
 "teamBScore": "210/4 (32.2)", "battingTeam": "Australia"}
]"#;

fn matches(text: &str) -> Vec<LiveMatchSummary> {
    parse_live_matches(text).unwrap()
}

/// Returns the same answer every time.
struct FixedFeed(Result<Vec<LiveMatchSummary>, String>);

#[async_trait]
impl LiveFeed for FixedFeed {
    async fn fetch(&self) -> Result<Vec<LiveMatchSummary>, FeedError> {
        self.0.clone().map_err(FeedError::new)
    }
}

/// Signals when a fetch starts and holds it until released.
struct GatedFeed {
    started: Notify,
    gate: Semaphore,
    answer: Vec<LiveMatchSummary>,
}

#[async_trait]
impl LiveFeed for GatedFeed {
    async fn fetch(&self) -> Result<Vec<LiveMatchSummary>, FeedError> {
        self.started.notify_one();
        let _permit = self
            .gate
            .acquire()
            .await
            .map_err(|e| FeedError::new(e.to_string()))?;
        Ok(self.answer.clone())
    }
}

#[tokio::test]
#[instrument]
async fn test_refresh_applies_feed_result() {
    let board = Mutex::new(LiveBoard::new());
    let feed = FixedFeed(Ok(matches(TWO_MATCHES)));

    assert_eq!(refresh_once(&feed, &board).await, RefreshOutcome::Applied);

    let board = board.lock().unwrap();
    assert_eq!(board.matches().len(), 2);
    assert_eq!(*board.matches()[0].status(), MatchStatus::Stumps);
    assert!(board.refreshed_at().is_some());
    assert!(!*board.stale());
}

#[tokio::test]
#[instrument]
async fn test_failed_and_empty_refreshes_keep_previous_list() {
    let board = Mutex::new(LiveBoard::new());
    refresh_once(&FixedFeed(Ok(matches(ONE_MATCH))), &board).await;

    let failing = FixedFeed(Err("rate limited".into()));
    assert_eq!(refresh_once(&failing, &board).await, RefreshOutcome::Failed);
    {
        let board = board.lock().unwrap();
        assert_eq!(board.matches()[0].id(), "nz-sa-1");
        assert!(*board.stale());
        assert_eq!(board.last_error().as_deref(), Some("rate limited"));
    }

    let empty = FixedFeed(Ok(Vec::new()));
    assert_eq!(refresh_once(&empty, &board).await, RefreshOutcome::KeptEmpty);
    assert_eq!(board.lock().unwrap().matches().len(), 1);

    // A later success clears the error.
    refresh_once(&FixedFeed(Ok(matches(TWO_MATCHES))), &board).await;
    let board = board.lock().unwrap();
    assert_eq!(board.matches().len(), 2);
    assert!(board.last_error().is_none());
    assert!(!*board.stale());
}

#[tokio::test]
#[instrument]
async fn test_slow_older_refresh_does_not_overwrite_newer() {
    let board = Arc::new(Mutex::new(LiveBoard::new()));
    let slow = Arc::new(GatedFeed {
        started: Notify::new(),
        gate: Semaphore::new(0),
        answer: matches(TWO_MATCHES),
    });

    let pending = {
        let (slow, board) = (Arc::clone(&slow), Arc::clone(&board));
        tokio::spawn(async move { refresh_once(slow.as_ref(), &board).await })
    };
    slow.started.notified().await;

    let fast = FixedFeed(Ok(matches(ONE_MATCH)));
    assert_eq!(refresh_once(&fast, &board).await, RefreshOutcome::Applied);

    slow.gate.add_permits(1);
    assert_eq!(pending.await.unwrap(), RefreshOutcome::Superseded);

    let board = board.lock().unwrap();
    assert_eq!(board.matches().len(), 1);
    assert_eq!(board.matches()[0].id(), "nz-sa-1");
    assert_eq!(*board.revision(), 1, "A dropped refresh must not count as news");
}

#[tokio::test]
#[instrument]
async fn test_refresher_fills_board_in_background() {
    let board = Arc::new(Mutex::new(LiveBoard::new()));
    let feed: Arc<dyn LiveFeed> = Arc::new(FixedFeed(Ok(matches(TWO_MATCHES))));
    let handle = spawn_refresher(feed, Arc::clone(&board), Duration::from_millis(20));

    let mut filled = false;
    for _ in 0..100 {
        if !board.lock().unwrap().matches().is_empty() {
            filled = true;
            break;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    handle.abort();

    assert!(filled, "Refresher never populated the board");
}
